//! Field descriptors and the limb primitives shared by every modulus.

use crate::{
    element::{ImmutableElement, SmallValue},
    error::{Error, Result},
};
use core::{fmt::Debug, marker::PhantomData};
use rand_core::CryptoRng;
use subtle::Choice;
use zeroize::Zeroize;

#[cfg(feature = "num-bigint")]
use num_bigint::{BigInt, BigUint};

/// Largest natural encoding among the supported moduli, doubled for wide sampling.
const WIDE_BYTES: usize = 128;

/// Modulus-specific arithmetic on a fixed-width signed limb representation.
///
/// Limbs are little-endian digits in radix `2^BITS_PER_LIMB`. Digits may be negative and may
/// leave the radix range between reductions: the value of a limb array is
/// `Σ limbs[i] · 2^(i · BITS_PER_LIMB)`.
pub trait ReductionStrategy: Copy + Debug + Default + Eq + Send + Sync + 'static {
    /// Limb array.
    type Limbs: Copy + Debug + Default + Eq + AsRef<[i64]> + AsMut<[i64]> + Send + Sync;

    /// Width of a limb in bits.
    const BITS_PER_LIMB: u32;

    /// Number of limbs in [`Self::Limbs`].
    const NUM_LIMBS: usize;

    /// Carry out of `x`, leaving a residual in `[-2^(BITS_PER_LIMB-1), 2^(BITS_PER_LIMB-1))`.
    #[inline(always)]
    fn carry_value(x: i64) -> i64 {
        (x + (1i64 << (Self::BITS_PER_LIMB - 1))) >> Self::BITS_PER_LIMB
    }

    /// Bring every limb back within the bounds required by [`Self::multiply`].
    fn reduce(limbs: &mut Self::Limbs);

    /// Reduced product of `a` and `b`.
    fn multiply(a: &Self::Limbs, b: &Self::Limbs) -> Self::Limbs;

    /// Reduced square of `a`.
    fn square(a: &Self::Limbs) -> Self::Limbs;

    /// Add `v · 2^(i · BITS_PER_LIMB)`, folded through the modulus, to the limbs below `i`.
    fn reduce_in(limbs: &mut [i64], v: i64, i: usize);

    /// Fold the bits of the top limb above the modulus bit length back into the low limbs.
    fn final_carry_reduce_last(limbs: &mut Self::Limbs);

    /// Decode the little-endian integer `bytes || high_byte` into reduced limbs.
    fn decode(bytes: &[u8], high_byte: u8) -> Self::Limbs {
        decode_limbs::<Self>(bytes, high_byte)
    }
}

/// Constant parameters of a supported modulus.
pub trait FieldParams: ReductionStrategy {
    /// Encoded field element.
    type FieldBytes: Copy + Debug + Eq + AsRef<[u8]> + AsMut<[u8]> + Send + Sync;

    /// Name of the field.
    const NAME: &'static str;

    /// Modulus serialized as big-endian hex.
    const MODULUS_HEX: &'static str;

    /// Additions an element may absorb before it stops being a valid summand.
    const MAX_ADDS: u32;

    /// Length of [`Self::FieldBytes`].
    const NUM_BYTES: usize;

    /// All-zero encoding.
    const ZERO_BYTES: Self::FieldBytes;

    /// Modulus with every limb non-negative and every limb but the top one below the radix.
    const POSITIVE_MODULUS: Self::Limbs;

    /// `p - 2` as little-endian 64-bit words, the Fermat inversion exponent.
    const INVERSION_EXPONENT: [u64; 8] = modulus_minus_two(Self::MODULUS_HEX);
}

/// Descriptor of the field of integers modulo `P`'s modulus.
///
/// Every parameter is a compile-time constant, so a descriptor is a zero-sized handle which can be
/// copied freely and shared between threads.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IntegerField<P: FieldParams> {
    params: PhantomData<P>,
}

impl<P: FieldParams> IntegerField<P> {
    /// Create the descriptor.
    pub const fn new() -> Self {
        Self {
            params: PhantomData,
        }
    }

    /// Width of a limb in bits.
    pub const fn bits_per_limb(&self) -> u32 {
        P::BITS_PER_LIMB
    }

    /// Number of limbs per element.
    pub const fn num_limbs(&self) -> usize {
        P::NUM_LIMBS
    }

    /// Additions an element may absorb before it must be reduced.
    pub const fn max_adds(&self) -> u32 {
        P::MAX_ADDS
    }

    /// Length of the natural little-endian encoding.
    pub const fn num_bytes(&self) -> usize {
        P::NUM_BYTES
    }

    /// Name of the field.
    pub const fn name(&self) -> &'static str {
        P::NAME
    }

    /// Limb form of the modulus used by canonicalization.
    pub fn positive_modulus_limbs(&self) -> P::Limbs {
        P::POSITIVE_MODULUS
    }

    /// The modulus.
    #[cfg(feature = "num-bigint")]
    pub fn modulus(&self) -> BigUint {
        limbs_to_bigint(P::POSITIVE_MODULUS.as_ref(), P::BITS_PER_LIMB)
            .magnitude()
            .clone()
    }

    /// The additive identity.
    pub fn zero(&self) -> ImmutableElement<P> {
        ImmutableElement::from_parts(P::Limbs::default(), 0)
    }

    /// The multiplicative identity.
    pub fn one(&self) -> ImmutableElement<P> {
        let mut limbs = P::Limbs::default();
        limbs.as_mut()[0] = 1;
        ImmutableElement::from_parts(limbs, 0)
    }

    /// Decode the little-endian integer `bytes || high_byte`, reducing it modulo `p`.
    ///
    /// `high_byte` supplies bits beyond `bytes`, such as a sign bit folded in by the caller. Any
    /// input of any length is accepted.
    pub fn from_bytes(&self, bytes: &[u8], high_byte: u8) -> ImmutableElement<P> {
        ImmutableElement::from_parts(P::decode(bytes, high_byte), 0)
    }

    /// Element equal to `value` modulo `p`.
    pub fn from_u64(&self, value: u64) -> ImmutableElement<P> {
        self.from_bytes(&value.to_le_bytes(), 0)
    }

    /// Element equal to `value` modulo `p`.
    #[cfg(feature = "num-bigint")]
    pub fn from_biguint(&self, value: &BigUint) -> ImmutableElement<P> {
        self.from_bytes(&(value % self.modulus()).to_bytes_le(), 0)
    }

    /// Wrap `value` as a multiplier for [`IntegerModulo::multiply_small`].
    ///
    /// Fails unless `|value| < 2^(BITS_PER_LIMB - 1)`.
    ///
    /// [`IntegerModulo::multiply_small`]: crate::IntegerModulo::multiply_small
    pub fn small_value(&self, value: i32) -> Result<SmallValue<P>> {
        if value.unsigned_abs() >= 1 << (P::BITS_PER_LIMB - 1) {
            return Err(Error::SmallValueOutOfRange);
        }

        Ok(SmallValue::new(value))
    }

    /// Sample an element by reducing twice the natural encoding length of random bytes.
    pub fn random<R: CryptoRng + ?Sized>(&self, rng: &mut R) -> ImmutableElement<P> {
        let mut bytes = [0u8; WIDE_BYTES];
        let len = (2 * P::NUM_BYTES).min(WIDE_BYTES);
        rng.fill_bytes(&mut bytes[..len]);
        let element = self.from_bytes(&bytes[..len], 0);
        bytes.zeroize();
        element
    }

    /// Reduce `limbs` to the unique representative of their value in `[0, p)`, with every limb
    /// in `[0, 2^BITS_PER_LIMB)`.
    ///
    /// The input must satisfy the bounds left by [`ReductionStrategy::reduce`].
    pub fn final_reduce(&self, limbs: &mut P::Limbs) {
        final_reduce::<P>(limbs)
    }

    /// Set `a` to `b` if `choice` is set, without branching on `choice`.
    pub fn conditional_assign(&self, choice: Choice, a: &mut P::Limbs, b: &P::Limbs) {
        conditional_assign(choice, a.as_mut(), b.as_ref())
    }

    /// Exchange `a` and `b` if `choice` is set, without branching on `choice`.
    pub fn conditional_swap(&self, choice: Choice, a: &mut P::Limbs, b: &mut P::Limbs) {
        conditional_swap(choice, a.as_mut(), b.as_mut())
    }
}

/// Remove the carry out of `limbs[index]` and return it.
#[inline(always)]
pub(crate) fn carry_out<S: ReductionStrategy>(limbs: &mut [i64], index: usize) -> i64 {
    let c = S::carry_value(limbs[index]);
    limbs[index] -= c << S::BITS_PER_LIMB;
    c
}

/// Propagate carries out of `limbs[start..end]` into the limb above each.
#[inline(always)]
pub(crate) fn carry<S: ReductionStrategy>(limbs: &mut [i64], start: usize, end: usize) {
    for i in start..end {
        let c = carry_out::<S>(limbs, i);
        limbs[i + 1] += c;
    }
}

/// Floor-division carry across every limb but the top one, leaving them in `[0, 2^bits)`.
pub(crate) fn unsigned_carry<S: ReductionStrategy>(limbs: &mut [i64]) {
    for i in 0..limbs.len() - 1 {
        let c = limbs[i] >> S::BITS_PER_LIMB;
        limbs[i] -= c << S::BITS_PER_LIMB;
        limbs[i + 1] += c;
    }
}

pub(crate) fn final_reduce<P: FieldParams>(limbs: &mut P::Limbs) {
    for _ in 0..2 {
        P::final_carry_reduce_last(limbs);
        unsigned_carry::<P>(limbs.as_mut());
    }

    // Only the top limb can be negative here. Add the modulus back in that case.
    let top = P::NUM_LIMBS - 1;
    let negative = Choice::from(((limbs.as_ref()[top] >> 63) & 1) as u8);
    let mut t = *limbs;
    for (x, m) in t.as_mut().iter_mut().zip(P::POSITIVE_MODULUS.as_ref()) {
        *x += m;
    }
    unsigned_carry::<P>(t.as_mut());
    conditional_assign(negative, limbs.as_mut(), t.as_ref());

    // Subtract the modulus unless that borrows out of the top limb.
    let mut t = *limbs;
    for (x, m) in t.as_mut().iter_mut().zip(P::POSITIVE_MODULUS.as_ref()) {
        *x -= m;
    }
    unsigned_carry::<P>(t.as_mut());
    let borrow = Choice::from(((t.as_ref()[top] >> 63) & 1) as u8);
    conditional_assign(!borrow, limbs.as_mut(), t.as_ref());
}

/// `a = choice ? b : a` through an all-zeros or all-ones mask.
#[inline]
pub(crate) fn conditional_assign(choice: Choice, a: &mut [i64], b: &[i64]) {
    let mask = -i64::from(choice.unwrap_u8());
    for (x, y) in a.iter_mut().zip(b) {
        *x ^= mask & (*x ^ *y);
    }
}

/// `(a, b) = choice ? (b, a) : (a, b)` through an all-zeros or all-ones mask.
#[inline]
pub(crate) fn conditional_swap(choice: Choice, a: &mut [i64], b: &mut [i64]) {
    let mask = -i64::from(choice.unwrap_u8());
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        let t = mask & (*x ^ *y);
        *x ^= t;
        *y ^= t;
    }
}

/// Write canonical `limbs` to `out` as little-endian bytes.
///
/// Bits beyond `out` are dropped and bytes beyond the value are zero.
pub(crate) fn encode_limbs<S: ReductionStrategy>(limbs: &[i64], out: &mut [u8]) {
    let mut acc = 0u64;
    let mut acc_bits = 0;
    let mut next = limbs.iter();

    for byte in out.iter_mut() {
        while acc_bits < 8 {
            match next.next() {
                Some(&limb) => {
                    acc |= (limb as u64) << acc_bits;
                    acc_bits += S::BITS_PER_LIMB;
                }
                None => break,
            }
        }

        *byte = acc as u8;
        acc >>= 8;
        acc_bits = acc_bits.saturating_sub(8);
    }
}

/// Generic decoding used by every strategy without a specialized fast path.
pub(crate) fn decode_limbs<S: ReductionStrategy>(bytes: &[u8], high_byte: u8) -> S::Limbs {
    let bits = S::BITS_PER_LIMB as usize;
    let n = S::NUM_LIMBS;
    let total_bits = 8 * bytes.len() + 8;
    let mut limbs = S::Limbs::default();

    // The top limb absorbs up to 62 bits, which `reduce` folds back in.
    if total_bits <= (n - 1) * bits + 62 {
        load_digits::<S>(limbs.as_mut(), bytes, high_byte, 0);
        S::reduce(&mut limbs);
        return limbs;
    }

    // Longer inputs: load the most significant digits, then shift the rest in one digit at a
    // time, folding the digit pushed out of the top limb through the modulus.
    let extra = total_bits.div_ceil(bits) - n;
    load_digits::<S>(limbs.as_mut(), bytes, high_byte, extra);
    S::reduce(&mut limbs);

    for k in (0..extra).rev() {
        let l = limbs.as_mut();
        let overflow = l[n - 1];
        l.copy_within(0..n - 1, 1);
        l[0] = digit(bytes, high_byte, k * bits, bits);
        S::reduce_in(l, overflow, n);
        S::reduce(&mut limbs);
    }

    limbs
}

/// Load digits `first..` of `bytes || high_byte`, with every remaining bit in the top limb.
fn load_digits<S: ReductionStrategy>(limbs: &mut [i64], bytes: &[u8], high_byte: u8, first: usize) {
    let bits = S::BITS_PER_LIMB as usize;
    let top = limbs.len() - 1;

    for (i, limb) in limbs[..top].iter_mut().enumerate() {
        *limb = digit(bytes, high_byte, (first + i) * bits, bits);
    }

    let start = (first + top) * bits;
    let mut acc = 0u128;
    for index in start / 8..=bytes.len() {
        acc |= u128::from(byte_at(bytes, high_byte, index)) << (8 * (index - start / 8));
    }
    limbs[top] = (acc >> (start % 8)) as i64;
}

/// Bits `[start, start + width)` of `bytes || high_byte`.
#[inline]
fn digit(bytes: &[u8], high_byte: u8, start: usize, width: usize) -> i64 {
    let first = start / 8;
    let mut acc = 0u64;
    for k in 0..5 {
        acc |= u64::from(byte_at(bytes, high_byte, first + k)) << (8 * k);
    }
    ((acc >> (start % 8)) & ((1 << width) - 1)) as i64
}

#[inline]
fn byte_at(bytes: &[u8], high_byte: u8, index: usize) -> u8 {
    match bytes.get(index) {
        Some(&byte) => byte,
        None if index == bytes.len() => high_byte,
        None => 0,
    }
}

/// Exact value of `limbs` in radix `2^bits`.
#[cfg(feature = "num-bigint")]
pub(crate) fn limbs_to_bigint(limbs: &[i64], bits: u32) -> BigInt {
    limbs
        .iter()
        .rev()
        .fold(BigInt::default(), |acc, &limb| (acc << bits) + limb)
}

const fn hex_digit(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit"),
    }
}

/// Parse big-endian hex into non-negative limbs of `bits` bits.
///
/// Bits above the top limb's position stay in the top limb.
pub(crate) const fn limbs_from_be_hex<const N: usize>(hex: &str, bits: u32) -> [i64; N] {
    let hex = hex.as_bytes();
    let bits = bits as usize;
    let mut limbs = [0i64; N];
    let mut i = 0;

    while i < hex.len() {
        let nibble = hex_digit(hex[hex.len() - 1 - i]) as i64;
        let mut k = 0;
        while k < 4 {
            let bit = (nibble >> k) & 1;
            if bit != 0 {
                let pos = 4 * i + k;
                let (limb, offset) = if pos / bits < N {
                    (pos / bits, pos % bits)
                } else {
                    (N - 1, pos - (N - 1) * bits)
                };
                assert!(offset < 63, "value does not fit in limbs");
                limbs[limb] |= bit << offset;
            }
            k += 1;
        }
        i += 1;
    }

    limbs
}

/// Parse big-endian hex into limbs with every digit below the top one centred on zero, negated
/// if `negative` is set.
pub(crate) const fn signed_limbs_from_be_hex<const N: usize>(
    hex: &str,
    bits: u32,
    negative: bool,
) -> [i64; N] {
    let mut limbs = limbs_from_be_hex::<N>(hex, bits);
    let mut i = 0;

    while i + 1 < N {
        let c = (limbs[i] + (1 << (bits - 1))) >> bits;
        limbs[i] -= c << bits;
        limbs[i + 1] += c;
        i += 1;
    }

    if negative {
        i = 0;
        while i < N {
            limbs[i] = -limbs[i];
            i += 1;
        }
    }

    limbs
}

const fn modulus_minus_two(hex: &str) -> [u64; 8] {
    let hex = hex.as_bytes();
    let mut words = [0u64; 8];
    let mut i = 0;

    while i < hex.len() {
        assert!(i < 128, "modulus exceeds 512 bits");
        words[i / 16] |= (hex_digit(hex[hex.len() - 1 - i]) as u64) << (4 * (i % 16));
        i += 1;
    }

    let mut borrow = 2;
    i = 0;
    while i < 8 {
        let (word, overflow) = words[i].overflowing_sub(borrow);
        words[i] = word;
        borrow = overflow as u64;
        i += 1;
    }

    words
}

#[cfg(test)]
mod tests {
    use super::{
        conditional_assign, conditional_swap, decode_limbs, encode_limbs, limbs_from_be_hex,
        modulus_minus_two, signed_limbs_from_be_hex,
    };
    use crate::fields::Curve25519;
    use subtle::Choice;

    #[test]
    fn positive_limbs_from_hex() {
        let limbs: [i64; 5] = limbs_from_be_hex("3fffffffffffffffffffffffffffffffb", 26);
        let full = (1 << 26) - 1;
        assert_eq!(limbs, [full - 4, full, full, full, full]);
    }

    #[test]
    fn excess_bits_stay_in_top_limb() {
        let limbs: [i64; 2] = limbs_from_be_hex("1ffff", 8);
        assert_eq!(limbs, [0xff, 0x1ff]);
    }

    #[test]
    fn signed_limbs_are_centred() {
        // 0x80 = 2 * 2^8 - 0x80
        let limbs: [i64; 2] = signed_limbs_from_be_hex("180", 8, false);
        assert_eq!(limbs, [-0x80, 2]);
        let limbs: [i64; 2] = signed_limbs_from_be_hex("180", 8, true);
        assert_eq!(limbs, [0x80, -2]);
    }

    #[test]
    fn inversion_exponent_borrows() {
        let words = modulus_minus_two("10000000000000001");
        assert_eq!(words[..2], [u64::MAX, 0]);
    }

    #[test]
    fn conditional_primitives() {
        let a0 = [1, -2, 3];
        let b0 = [-4, 5, i64::MIN];

        let (mut a, mut b) = (a0, b0);
        conditional_swap(Choice::from(0), &mut a, &mut b);
        assert_eq!((a, b), (a0, b0));
        conditional_swap(Choice::from(1), &mut a, &mut b);
        assert_eq!((a, b), (b0, a0));

        let mut a = a0;
        conditional_assign(Choice::from(0), &mut a, &b0);
        assert_eq!(a, a0);
        conditional_assign(Choice::from(1), &mut a, &b0);
        assert_eq!(a, b0);
    }

    #[test]
    fn encode_truncates_and_pads() {
        let limbs = [0x3ff_ffff, 0x1, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut out = [0xaa; 5];
        encode_limbs::<Curve25519>(&limbs, &mut out);
        assert_eq!(out, [0xff, 0xff, 0xff, 0x07, 0x00]);

        let mut out = [0xaa; 2];
        encode_limbs::<Curve25519>(&limbs, &mut out);
        assert_eq!(out, [0xff, 0xff]);
    }

    #[test]
    fn short_decode() {
        let limbs = decode_limbs::<Curve25519>(&[], 7);
        assert_eq!(limbs, [7, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
