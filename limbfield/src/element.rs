//! Field elements.
//!
//! An element is a limb array plus a count of the additions folded into it since its last
//! reduction. Additions are lazy: limbs are summed without carrying, which is only safe while
//! every operand is a valid summand, i.e. has fewer than [`FieldParams::MAX_ADDS`] pending
//! additions. The count is checked on every addition and encoding.

mod mutable;

pub use self::mutable::MutableElement;

use crate::{
    error::{Error, Result},
    field::{self, FieldParams, IntegerField},
};
use core::{
    fmt::{self, Debug, Formatter, LowerHex, UpperHex},
    marker::PhantomData,
    ops::{Mul, Neg},
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::DefaultIsZeroes;

#[cfg(feature = "num-bigint")]
use num_bigint::{BigInt, BigUint, Sign};

/// Signed multiplier whose magnitude is below `2^(BITS_PER_LIMB - 1)`.
///
/// Obtained from [`IntegerField::small_value`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SmallValue<P: FieldParams> {
    value: i32,
    params: PhantomData<P>,
}

impl<P: FieldParams> SmallValue<P> {
    pub(crate) const fn new(value: i32) -> Self {
        Self {
            value,
            params: PhantomData,
        }
    }

    /// The wrapped integer.
    pub const fn value(&self) -> i32 {
        self.value
    }
}

/// Arithmetic shared by [`ImmutableElement`] and [`MutableElement`].
///
/// Every operation here leaves `self` untouched and returns a fresh [`ImmutableElement`].
pub trait IntegerModulo<P: FieldParams> {
    /// Limbs of this element.
    fn limbs(&self) -> &P::Limbs;

    /// Additions folded into this element since it was last reduced.
    fn pending_adds(&self) -> u32;

    /// Descriptor of the field this element belongs to.
    fn field(&self) -> IntegerField<P> {
        IntegerField::new()
    }

    /// Whether this element may be an operand of an addition or be encoded.
    fn is_summand(&self) -> bool {
        self.pending_adds() < P::MAX_ADDS
    }

    /// Copy into an immutable element.
    fn to_immutable(&self) -> ImmutableElement<P> {
        ImmutableElement::from_parts(*self.limbs(), self.pending_adds())
    }

    /// Copy into a mutable element.
    fn to_mutable(&self) -> MutableElement<P> {
        MutableElement::from_parts(*self.limbs(), self.pending_adds())
    }

    /// `self + rhs`, without reducing.
    ///
    /// Fails with [`Error::NotValidSummand`] unless both operands are valid summands.
    fn add<E: IntegerModulo<P>>(&self, rhs: &E) -> Result<ImmutableElement<P>> {
        let pending_adds = sum_pending_adds::<P, _, _>(self, rhs)?;
        let mut limbs = *self.limbs();
        add_limbs::<P>(&mut limbs, rhs.limbs());
        Ok(ImmutableElement::from_parts(limbs, pending_adds))
    }

    /// `self - rhs`, without reducing.
    ///
    /// Fails with [`Error::NotValidSummand`] unless both operands are valid summands.
    fn subtract<E: IntegerModulo<P>>(&self, rhs: &E) -> Result<ImmutableElement<P>> {
        let pending_adds = sum_pending_adds::<P, _, _>(self, rhs)?;
        let mut limbs = *self.limbs();
        sub_limbs::<P>(&mut limbs, rhs.limbs());
        Ok(ImmutableElement::from_parts(limbs, pending_adds))
    }

    /// `self * rhs`.
    fn multiply<E: IntegerModulo<P>>(&self, rhs: &E) -> ImmutableElement<P> {
        ImmutableElement::from_parts(P::multiply(self.limbs(), rhs.limbs()), 0)
    }

    /// `self^2`.
    fn square(&self) -> ImmutableElement<P> {
        ImmutableElement::from_parts(P::square(self.limbs()), 0)
    }

    /// `-self`, negating every limb without reducing.
    fn additive_inverse(&self) -> ImmutableElement<P> {
        let mut limbs = *self.limbs();
        negate_limbs::<P>(&mut limbs);
        ImmutableElement::from_parts(limbs, self.pending_adds())
    }

    /// `self * value`, scaling every limb before a single reduction.
    fn multiply_small(&self, value: SmallValue<P>) -> ImmutableElement<P> {
        let mut limbs = *self.limbs();
        scale_limbs::<P>(&mut limbs, value);
        ImmutableElement::from_parts(limbs, 0)
    }

    /// `self^exp` for a little-endian exponent.
    ///
    /// Runs in time dependent on `exp`, which must be public.
    fn pow_vartime(&self, exp: &[u64]) -> ImmutableElement<P> {
        let base = self.to_immutable();
        let mut result = self.field().one();
        for word in exp.iter().rev() {
            for i in (0..64).rev() {
                result = result.square();
                if (word >> i) & 1 == 1 {
                    result = result.multiply(&base);
                }
            }
        }
        result
    }

    /// Multiplicative inverse, or none if `self` is zero.
    fn invert(&self) -> CtOption<ImmutableElement<P>> {
        CtOption::new(self.pow_vartime(&P::INVERSION_EXPONENT), !self.is_zero())
    }

    /// Whether `self` is zero modulo `p`.
    fn is_zero(&self) -> Choice {
        canonical_limbs::<P>(self.limbs())
            .as_ref()
            .ct_eq(P::Limbs::default().as_ref())
    }

    /// Canonical little-endian encoding of the natural length.
    ///
    /// Fails with [`Error::NotValidSummand`] unless `self` is a valid summand.
    fn to_bytes(&self) -> Result<P::FieldBytes> {
        let mut bytes = P::ZERO_BYTES;
        self.write_bytes(bytes.as_mut())?;
        Ok(bytes)
    }

    /// Write the canonical little-endian encoding to `out`, truncating it or padding it with zeros
    /// to the length of `out`.
    ///
    /// Fails with [`Error::NotValidSummand`] unless `self` is a valid summand.
    fn write_bytes(&self, out: &mut [u8]) -> Result<()> {
        if !self.is_summand() {
            return Err(Error::NotValidSummand);
        }

        field::encode_limbs::<P>(canonical_limbs::<P>(self.limbs()).as_ref(), out);
        Ok(())
    }

    /// Write `(self + rhs) mod 2^(8 · out.len())` as little-endian bytes, where both operands
    /// are first taken to their canonical values.
    ///
    /// Fails with [`Error::NotValidSummand`] unless both operands are valid summands.
    fn add_mod_power_two<E: IntegerModulo<P>>(&self, rhs: &E, out: &mut [u8]) -> Result<()> {
        sum_pending_adds::<P, _, _>(self, rhs)?;

        let mut limbs = canonical_limbs::<P>(self.limbs());
        add_limbs::<P>(&mut limbs, &canonical_limbs::<P>(rhs.limbs()));
        field::unsigned_carry::<P>(limbs.as_mut());
        field::encode_limbs::<P>(limbs.as_ref(), out);
        Ok(())
    }

    /// Exact value in `[0, p)`.
    ///
    /// Not constant time.
    #[cfg(feature = "num-bigint")]
    fn to_biguint(&self) -> BigUint {
        let modulus = BigInt::from(self.field().modulus());
        let mut value =
            field::limbs_to_bigint(self.limbs().as_ref(), P::BITS_PER_LIMB) % &modulus;
        if value.sign() == Sign::Minus {
            value += &modulus;
        }
        value.magnitude().clone()
    }
}

/// Field element returned by value from every operation.
#[derive(Clone, Copy)]
pub struct ImmutableElement<P: FieldParams> {
    limbs: P::Limbs,
    pending_adds: u32,
}

impl<P: FieldParams> ImmutableElement<P> {
    pub(crate) const fn from_parts(limbs: P::Limbs, pending_adds: u32) -> Self {
        Self {
            limbs,
            pending_adds,
        }
    }

    /// Reduced copy with no pending additions.
    pub fn reduced(&self) -> Self {
        let mut limbs = self.limbs;
        P::reduce(&mut limbs);
        Self::from_parts(limbs, 0)
    }
}

impl<P: FieldParams> IntegerModulo<P> for ImmutableElement<P> {
    fn limbs(&self) -> &P::Limbs {
        &self.limbs
    }

    fn pending_adds(&self) -> u32 {
        self.pending_adds
    }
}

impl<P: FieldParams> Default for ImmutableElement<P> {
    fn default() -> Self {
        Self::from_parts(P::Limbs::default(), 0)
    }
}

impl<P: FieldParams> DefaultIsZeroes for ImmutableElement<P> {}

impl<P: FieldParams> ConditionallySelectable for ImmutableElement<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = a.limbs;
        field::conditional_assign(choice, limbs.as_mut(), b.limbs.as_ref());
        let pending_adds = u32::conditional_select(&a.pending_adds, &b.pending_adds, choice);
        Self::from_parts(limbs, pending_adds)
    }
}

impl<P: FieldParams> ConstantTimeEq for ImmutableElement<P> {
    fn ct_eq(&self, other: &Self) -> Choice {
        ct_eq_canonical::<P>(&self.limbs, &other.limbs)
    }
}

impl<P: FieldParams> PartialEq for ImmutableElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<P: FieldParams> Eq for ImmutableElement<P> {}

impl<P: FieldParams> Debug for ImmutableElement<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableElement")
            .field("field", &P::NAME)
            .field("limbs", &self.limbs)
            .field("pending_adds", &self.pending_adds)
            .finish()
    }
}

impl<P: FieldParams> LowerHex for ImmutableElement<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_canonical_hex::<P>(&self.limbs, f, false)
    }
}

impl<P: FieldParams> UpperHex for ImmutableElement<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_canonical_hex::<P>(&self.limbs, f, true)
    }
}

impl<P: FieldParams> Mul<&ImmutableElement<P>> for &ImmutableElement<P> {
    type Output = ImmutableElement<P>;

    fn mul(self, rhs: &ImmutableElement<P>) -> ImmutableElement<P> {
        self.multiply(rhs)
    }
}

impl<P: FieldParams> Mul<ImmutableElement<P>> for &ImmutableElement<P> {
    type Output = ImmutableElement<P>;

    fn mul(self, rhs: ImmutableElement<P>) -> ImmutableElement<P> {
        self * &rhs
    }
}

impl<P: FieldParams> Mul<&ImmutableElement<P>> for ImmutableElement<P> {
    type Output = ImmutableElement<P>;

    fn mul(self, rhs: &ImmutableElement<P>) -> ImmutableElement<P> {
        &self * rhs
    }
}

impl<P: FieldParams> Mul<ImmutableElement<P>> for ImmutableElement<P> {
    type Output = ImmutableElement<P>;

    fn mul(self, rhs: ImmutableElement<P>) -> ImmutableElement<P> {
        &self * &rhs
    }
}

impl<P: FieldParams> Neg for &ImmutableElement<P> {
    type Output = ImmutableElement<P>;

    fn neg(self) -> ImmutableElement<P> {
        self.additive_inverse()
    }
}

impl<P: FieldParams> Neg for ImmutableElement<P> {
    type Output = ImmutableElement<P>;

    fn neg(self) -> ImmutableElement<P> {
        -&self
    }
}

/// Pending additions of `a + b`, failing unless both are valid summands.
#[inline]
pub(crate) fn sum_pending_adds<P, A, B>(a: &A, b: &B) -> Result<u32>
where
    P: FieldParams,
    A: IntegerModulo<P> + ?Sized,
    B: IntegerModulo<P> + ?Sized,
{
    if !a.is_summand() || !b.is_summand() {
        return Err(Error::NotValidSummand);
    }

    Ok(a.pending_adds().max(b.pending_adds()) + 1)
}

#[inline]
pub(crate) fn add_limbs<P: FieldParams>(a: &mut P::Limbs, b: &P::Limbs) {
    for (x, y) in a.as_mut().iter_mut().zip(b.as_ref()) {
        *x += y;
    }
}

#[inline]
pub(crate) fn sub_limbs<P: FieldParams>(a: &mut P::Limbs, b: &P::Limbs) {
    for (x, y) in a.as_mut().iter_mut().zip(b.as_ref()) {
        *x -= y;
    }
}

#[inline]
pub(crate) fn negate_limbs<P: FieldParams>(a: &mut P::Limbs) {
    for x in a.as_mut() {
        *x = -*x;
    }
}

#[inline]
pub(crate) fn scale_limbs<P: FieldParams>(a: &mut P::Limbs, value: SmallValue<P>) {
    let v = i64::from(value.value);
    for x in a.as_mut() {
        *x *= v;
    }
    P::reduce(a);
}

/// Unique representative of `limbs` in `[0, p)`.
pub(crate) fn canonical_limbs<P: FieldParams>(limbs: &P::Limbs) -> P::Limbs {
    let mut limbs = *limbs;
    P::reduce(&mut limbs);
    field::final_reduce::<P>(&mut limbs);
    limbs
}

pub(crate) fn ct_eq_canonical<P: FieldParams>(a: &P::Limbs, b: &P::Limbs) -> Choice {
    canonical_limbs::<P>(a)
        .as_ref()
        .ct_eq(canonical_limbs::<P>(b).as_ref())
}

/// Big-endian hex of the canonical value, zero-padded to the natural length.
pub(crate) fn fmt_canonical_hex<P: FieldParams>(
    limbs: &P::Limbs,
    f: &mut Formatter<'_>,
    upper: bool,
) -> fmt::Result {
    let mut bytes = P::ZERO_BYTES;
    field::encode_limbs::<P>(canonical_limbs::<P>(limbs).as_ref(), bytes.as_mut());
    for byte in bytes.as_ref().iter().rev() {
        if upper {
            write!(f, "{byte:02X}")?;
        } else {
            write!(f, "{byte:02x}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::IntegerModulo;
    use crate::{CURVE448, CURVE25519, Error, POLY1305};
    use std::format;
    use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

    #[test]
    fn summand_bookkeeping() {
        let one = CURVE25519.one();
        assert!(one.is_summand());

        let two = one.add(&one).unwrap();
        assert_eq!(two.pending_adds(), 1);
        assert!(!two.is_summand());
        assert_eq!(two.add(&one), Err(Error::NotValidSummand));
        assert_eq!(one.subtract(&two), Err(Error::NotValidSummand));
        assert_eq!(two.to_bytes(), Err(Error::NotValidSummand));

        // negation keeps the count, multiplication clears it
        assert_eq!(two.additive_inverse().pending_adds(), 1);
        assert_eq!(two.multiply(&one).pending_adds(), 0);
        assert_eq!(two.square().pending_adds(), 0);
        assert_eq!(two.reduced().pending_adds(), 0);
        assert_eq!(two.reduced(), CURVE25519.from_u64(2));
    }

    #[test]
    fn select_copies_pending_adds() {
        let a = CURVE448.from_u64(5);
        let b = CURVE448.one().add(&CURVE448.one()).unwrap();

        let r = super::ImmutableElement::conditional_select(&a, &b, Choice::from(0));
        assert_eq!(r.limbs(), a.limbs());
        assert_eq!(r.pending_adds(), 0);

        let r = super::ImmutableElement::conditional_select(&a, &b, Choice::from(1));
        assert_eq!(r.limbs(), b.limbs());
        assert_eq!(r.pending_adds(), 1);
    }

    #[test]
    fn equality_is_on_canonical_values() {
        let p_minus_one = CURVE25519.zero().subtract(&CURVE25519.one()).unwrap();
        let also = CURVE25519.from_bytes(
            &hex_literal::hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f"),
            0,
        );
        assert_ne!(p_minus_one.limbs(), also.limbs());
        assert!(bool::from(p_minus_one.ct_eq(&also)));
        assert_eq!(p_minus_one, also);
    }

    #[test]
    fn invert_and_is_zero() {
        assert!(bool::from(POLY1305.zero().is_zero()));
        assert!(bool::from(POLY1305.zero().invert().is_none()));

        let x = POLY1305.from_u64(1234567);
        let inv = x.invert().unwrap();
        assert_eq!(x * inv, POLY1305.one());
        assert!(!bool::from(x.is_zero()));
    }

    #[test]
    fn hex_formatting() {
        let x = POLY1305.from_u64(0xabcdef);
        let s = format!("{x:x}");
        assert_eq!(s.len(), 34);
        assert!(s.ends_with("abcdef"));
        assert!(format!("{x:X}").ends_with("ABCDEF"));
    }
}
