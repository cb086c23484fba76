//! In-place field elements.

use super::{
    ImmutableElement, IntegerModulo, SmallValue, add_limbs, ct_eq_canonical, fmt_canonical_hex,
    negate_limbs, scale_limbs, sub_limbs, sum_pending_adds,
};
use crate::{
    error::Result,
    field::{self, FieldParams},
};
use core::fmt::{self, Debug, Formatter, LowerHex};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// Field element owned by a single caller and transformed in place.
///
/// Not `Copy`: copies are made explicitly with [`IntegerModulo::to_mutable`] or
/// [`IntegerModulo::to_immutable`].
#[derive(Clone)]
pub struct MutableElement<P: FieldParams> {
    limbs: P::Limbs,
    pending_adds: u32,
}

impl<P: FieldParams> MutableElement<P> {
    pub(crate) const fn from_parts(limbs: P::Limbs, pending_adds: u32) -> Self {
        Self {
            limbs,
            pending_adds,
        }
    }

    /// Overwrite with a copy of `value`.
    pub fn set_value<E: IntegerModulo<P>>(&mut self, value: &E) -> &mut Self {
        self.limbs = *value.limbs();
        self.pending_adds = value.pending_adds();
        self
    }

    /// Overwrite with the decoding of `bytes || high_byte`.
    pub fn set_bytes(&mut self, bytes: &[u8], high_byte: u8) -> &mut Self {
        self.limbs = P::decode(bytes, high_byte);
        self.pending_adds = 0;
        self
    }

    /// `self += rhs`, without reducing.
    ///
    /// Fails unless both operands are valid summands, leaving `self` unchanged.
    pub fn set_sum<E: IntegerModulo<P>>(&mut self, rhs: &E) -> Result<&mut Self> {
        self.pending_adds = sum_pending_adds::<P, _, _>(&*self, rhs)?;
        add_limbs::<P>(&mut self.limbs, rhs.limbs());
        Ok(self)
    }

    /// `self -= rhs`, without reducing.
    ///
    /// Fails unless both operands are valid summands, leaving `self` unchanged.
    pub fn set_difference<E: IntegerModulo<P>>(&mut self, rhs: &E) -> Result<&mut Self> {
        self.pending_adds = sum_pending_adds::<P, _, _>(&*self, rhs)?;
        sub_limbs::<P>(&mut self.limbs, rhs.limbs());
        Ok(self)
    }

    /// `self *= rhs`.
    pub fn set_product<E: IntegerModulo<P>>(&mut self, rhs: &E) -> &mut Self {
        self.limbs = P::multiply(&self.limbs, rhs.limbs());
        self.pending_adds = 0;
        self
    }

    /// `self *= value`.
    pub fn set_product_small(&mut self, value: SmallValue<P>) -> &mut Self {
        scale_limbs::<P>(&mut self.limbs, value);
        self.pending_adds = 0;
        self
    }

    /// `self = self^2`.
    pub fn set_square(&mut self) -> &mut Self {
        self.limbs = P::square(&self.limbs);
        self.pending_adds = 0;
        self
    }

    /// `self = -self`, without reducing.
    pub fn set_additive_inverse(&mut self) -> &mut Self {
        negate_limbs::<P>(&mut self.limbs);
        self
    }

    /// Reduce the limbs and clear the pending additions.
    pub fn set_reduced(&mut self) -> &mut Self {
        P::reduce(&mut self.limbs);
        self.pending_adds = 0;
        self
    }

    /// Copy `other` into `self` if `choice` is set, without branching on `choice`.
    pub fn conditional_set<E: IntegerModulo<P>>(&mut self, other: &E, choice: Choice) {
        field::conditional_assign(choice, self.limbs.as_mut(), other.limbs().as_ref());
        self.pending_adds.conditional_assign(&other.pending_adds(), choice);
    }

    /// Exchange `self` and `other` if `choice` is set, without branching on `choice`.
    pub fn conditional_swap_with(&mut self, other: &mut Self, choice: Choice) {
        field::conditional_swap(choice, self.limbs.as_mut(), other.limbs.as_mut());
        u32::conditional_swap(&mut self.pending_adds, &mut other.pending_adds, choice);
    }
}

impl<P: FieldParams> IntegerModulo<P> for MutableElement<P> {
    fn limbs(&self) -> &P::Limbs {
        &self.limbs
    }

    fn pending_adds(&self) -> u32 {
        self.pending_adds
    }
}

impl<P: FieldParams> Default for MutableElement<P> {
    fn default() -> Self {
        Self::from_parts(P::Limbs::default(), 0)
    }
}

impl<P: FieldParams> From<ImmutableElement<P>> for MutableElement<P> {
    fn from(element: ImmutableElement<P>) -> Self {
        element.to_mutable()
    }
}

impl<P: FieldParams> From<&MutableElement<P>> for ImmutableElement<P> {
    fn from(element: &MutableElement<P>) -> Self {
        element.to_immutable()
    }
}

impl<P: FieldParams> ConstantTimeEq for MutableElement<P> {
    fn ct_eq(&self, other: &Self) -> Choice {
        ct_eq_canonical::<P>(&self.limbs, &other.limbs)
    }
}

impl<P: FieldParams> PartialEq for MutableElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<P: FieldParams> Eq for MutableElement<P> {}

impl<P: FieldParams> Debug for MutableElement<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableElement")
            .field("field", &P::NAME)
            .field("limbs", &self.limbs)
            .field("pending_adds", &self.pending_adds)
            .finish()
    }
}

impl<P: FieldParams> LowerHex for MutableElement<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt_canonical_hex::<P>(&self.limbs, f, false)
    }
}

impl<P: FieldParams> Zeroize for MutableElement<P> {
    fn zeroize(&mut self) {
        self.limbs.as_mut().zeroize();
        self.pending_adds.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::MutableElement;
    use crate::{CURVE25519, CURVE448_ORDER, Error, IntegerModulo, POLY1305, Poly1305};
    use subtle::Choice;
    use zeroize::Zeroize;

    #[test]
    fn in_place_matches_immutable() {
        let a = CURVE448_ORDER.from_u64(0x1234_5678_9abc_def0);
        let b = CURVE448_ORDER.from_u64(0x0fed_cba9_8765_4321);
        let three = CURVE448_ORDER.small_value(3).unwrap();

        let mut m = a.to_mutable();
        m.set_product(&b).set_square();
        m.set_difference(&a).unwrap();
        m.set_reduced().set_product_small(three).set_additive_inverse();

        let expected = a
            .multiply(&b)
            .square()
            .subtract(&a)
            .unwrap()
            .reduced()
            .multiply_small(three)
            .additive_inverse();
        assert_eq!(m.to_immutable(), expected);
        assert_eq!(m.limbs(), expected.limbs());
    }

    #[test]
    fn failed_sum_leaves_value() {
        let one = POLY1305.one();
        let mut m = one.to_mutable();
        m.set_sum(&one).unwrap();
        let before = m.clone();

        assert_eq!(m.set_sum(&one).err(), Some(Error::NotValidSummand));
        assert_eq!(m.limbs(), before.limbs());
        assert_eq!(m.pending_adds(), 1);
    }

    #[test]
    fn conditional_set_and_swap() {
        let x = CURVE25519.from_u64(7).to_mutable();
        let mut y = CURVE25519.one().to_mutable();
        y.set_sum(&CURVE25519.one()).unwrap();

        let mut a = x.clone();
        a.conditional_set(&y, Choice::from(0));
        assert_eq!((a.limbs(), a.pending_adds()), (x.limbs(), 0));
        a.conditional_set(&y, Choice::from(1));
        assert_eq!((a.limbs(), a.pending_adds()), (y.limbs(), 1));

        let (mut a, mut b) = (x.clone(), y.clone());
        a.conditional_swap_with(&mut b, Choice::from(0));
        assert_eq!((a.limbs(), a.pending_adds()), (x.limbs(), 0));
        assert_eq!((b.limbs(), b.pending_adds()), (y.limbs(), 1));
        a.conditional_swap_with(&mut b, Choice::from(1));
        assert_eq!((a.limbs(), a.pending_adds()), (y.limbs(), 1));
        assert_eq!((b.limbs(), b.pending_adds()), (x.limbs(), 0));
    }

    #[test]
    fn set_bytes_resets_count() {
        let mut m = MutableElement::<Poly1305>::default();
        m.set_sum(&POLY1305.one()).unwrap();
        m.set_bytes(&[0xff; 16], 0);
        assert_eq!(m.pending_adds(), 0);
        let bytes = m.to_bytes().unwrap();
        assert_eq!(bytes[..16], [0xff; 16]);
        assert_eq!(bytes[16], 0);
    }

    #[test]
    fn zeroize() {
        let mut m = POLY1305.from_u64(99).to_mutable();
        m.set_sum(&POLY1305.one()).unwrap();
        m.zeroize();
        assert_eq!(m.limbs(), &[0; 5]);
        assert_eq!(m.pending_adds(), 0);
    }
}
