//! Field of integers modulo `2^255 - 19`, the Curve25519 base field.
//!
//! Elements are ten 26-bit limbs. Since `26 * 10 = 260`, position `i >= 10` carries a weight of
//! `2^(26 * (i - 10)) * 2^5 * 2^255`, which folds to `19 * 2^5` at position `i - 10`. The `2^5`
//! straddles two limbs, so every folded term is split at a 5-bit offset.

use crate::field::{FieldParams, ReductionStrategy, carry, carry_out, limbs_from_be_hex};

const MASK: i64 = (1 << 26) - 1;

/// Curve25519 base field modulus `2^255 - 19`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Curve25519;

impl FieldParams for Curve25519 {
    type FieldBytes = [u8; 32];

    const NAME: &'static str = "Curve25519";
    const MODULUS_HEX: &'static str =
        "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed";
    const MAX_ADDS: u32 = 1;
    const NUM_BYTES: usize = 32;
    const ZERO_BYTES: [u8; 32] = [0; 32];
    const POSITIVE_MODULUS: [i64; 10] = limbs_from_be_hex(Self::MODULUS_HEX, 26);
}

impl ReductionStrategy for Curve25519 {
    type Limbs = [i64; 10];

    const BITS_PER_LIMB: u32 = 26;
    const NUM_LIMBS: usize = 10;

    fn reduce(limbs: &mut [i64; 10]) {
        let c8 = carry_out::<Self>(limbs, 8);
        limbs[9] += c8;
        let c9 = carry_out::<Self>(limbs, 9);
        Self::reduce_in(limbs, c9, 10);
        carry::<Self>(limbs, 0, 9);
    }

    #[inline]
    fn multiply(a: &[i64; 10], b: &[i64; 10]) -> [i64; 10] {
        let c0 = a[0] * b[0];
        let c1 = a[0] * b[1] + a[1] * b[0];
        let c2 = a[0] * b[2] + a[1] * b[1] + a[2] * b[0];
        let c3 = a[0] * b[3] + a[1] * b[2] + a[2] * b[1] + a[3] * b[0];
        let c4 = a[0] * b[4] + a[1] * b[3] + a[2] * b[2] + a[3] * b[1] + a[4] * b[0];
        let c5 = a[0] * b[5] + a[1] * b[4] + a[2] * b[3] + a[3] * b[2] + a[4] * b[1] + a[5] * b[0];
        let c6 = a[0] * b[6]
            + a[1] * b[5]
            + a[2] * b[4]
            + a[3] * b[3]
            + a[4] * b[2]
            + a[5] * b[1]
            + a[6] * b[0];
        let c7 = a[0] * b[7]
            + a[1] * b[6]
            + a[2] * b[5]
            + a[3] * b[4]
            + a[4] * b[3]
            + a[5] * b[2]
            + a[6] * b[1]
            + a[7] * b[0];
        let c8 = a[0] * b[8]
            + a[1] * b[7]
            + a[2] * b[6]
            + a[3] * b[5]
            + a[4] * b[4]
            + a[5] * b[3]
            + a[6] * b[2]
            + a[7] * b[1]
            + a[8] * b[0];
        let c9 = a[0] * b[9]
            + a[1] * b[8]
            + a[2] * b[7]
            + a[3] * b[6]
            + a[4] * b[5]
            + a[5] * b[4]
            + a[6] * b[3]
            + a[7] * b[2]
            + a[8] * b[1]
            + a[9] * b[0];
        let c10 = a[1] * b[9]
            + a[2] * b[8]
            + a[3] * b[7]
            + a[4] * b[6]
            + a[5] * b[5]
            + a[6] * b[4]
            + a[7] * b[3]
            + a[8] * b[2]
            + a[9] * b[1];
        let c11 = a[2] * b[9]
            + a[3] * b[8]
            + a[4] * b[7]
            + a[5] * b[6]
            + a[6] * b[5]
            + a[7] * b[4]
            + a[8] * b[3]
            + a[9] * b[2];
        let c12 = a[3] * b[9]
            + a[4] * b[8]
            + a[5] * b[7]
            + a[6] * b[6]
            + a[7] * b[5]
            + a[8] * b[4]
            + a[9] * b[3];
        let c13 = a[4] * b[9] + a[5] * b[8] + a[6] * b[7] + a[7] * b[6] + a[8] * b[5] + a[9] * b[4];
        let c14 = a[5] * b[9] + a[6] * b[8] + a[7] * b[7] + a[8] * b[6] + a[9] * b[5];
        let c15 = a[6] * b[9] + a[7] * b[8] + a[8] * b[7] + a[9] * b[6];
        let c16 = a[7] * b[9] + a[8] * b[8] + a[9] * b[7];
        let c17 = a[8] * b[9] + a[9] * b[8];
        let c18 = a[9] * b[9];

        carry_reduce([
            c0, c1, c2, c3, c4, c5, c6, c7, c8, c9, c10, c11, c12, c13, c14, c15, c16, c17, c18, 0,
        ])
    }

    #[inline]
    fn square(a: &[i64; 10]) -> [i64; 10] {
        let c0 = a[0] * a[0];
        let c1 = 2 * (a[0] * a[1]);
        let c2 = 2 * (a[0] * a[2]) + a[1] * a[1];
        let c3 = 2 * (a[0] * a[3] + a[1] * a[2]);
        let c4 = 2 * (a[0] * a[4] + a[1] * a[3]) + a[2] * a[2];
        let c5 = 2 * (a[0] * a[5] + a[1] * a[4] + a[2] * a[3]);
        let c6 = 2 * (a[0] * a[6] + a[1] * a[5] + a[2] * a[4]) + a[3] * a[3];
        let c7 = 2 * (a[0] * a[7] + a[1] * a[6] + a[2] * a[5] + a[3] * a[4]);
        let c8 = 2 * (a[0] * a[8] + a[1] * a[7] + a[2] * a[6] + a[3] * a[5]) + a[4] * a[4];
        let c9 = 2 * (a[0] * a[9] + a[1] * a[8] + a[2] * a[7] + a[3] * a[6] + a[4] * a[5]);
        let c10 = 2 * (a[1] * a[9] + a[2] * a[8] + a[3] * a[7] + a[4] * a[6]) + a[5] * a[5];
        let c11 = 2 * (a[2] * a[9] + a[3] * a[8] + a[4] * a[7] + a[5] * a[6]);
        let c12 = 2 * (a[3] * a[9] + a[4] * a[8] + a[5] * a[7]) + a[6] * a[6];
        let c13 = 2 * (a[4] * a[9] + a[5] * a[8] + a[6] * a[7]);
        let c14 = 2 * (a[5] * a[9] + a[6] * a[8]) + a[7] * a[7];
        let c15 = 2 * (a[6] * a[9] + a[7] * a[8]);
        let c16 = 2 * (a[7] * a[9]) + a[8] * a[8];
        let c17 = 2 * (a[8] * a[9]);
        let c18 = a[9] * a[9];

        carry_reduce([
            c0, c1, c2, c3, c4, c5, c6, c7, c8, c9, c10, c11, c12, c13, c14, c15, c16, c17, c18, 0,
        ])
    }

    #[inline(always)]
    fn reduce_in(limbs: &mut [i64], v: i64, i: usize) {
        let t = 19 * v;
        limbs[i - 10] += (t << 5) & MASK;
        limbs[i - 9] += t >> 21;
    }

    fn final_carry_reduce_last(limbs: &mut [i64; 10]) {
        let c = limbs[9] >> 21;
        limbs[9] -= c << 21;
        limbs[0] += 19 * c;
    }
}

/// Fold the 19 product columns into 10 reduced limbs.
#[inline(always)]
fn carry_reduce(mut c: [i64; 20]) -> [i64; 10] {
    // Every fold lands below position 10, so a single ascending pass suffices.
    for i in 10..19 {
        let v = core::mem::take(&mut c[i]);
        Curve25519::reduce_in(&mut c, v, i);
    }

    carry::<Curve25519>(&mut c, 0, 10);
    let c10 = core::mem::take(&mut c[10]);
    Curve25519::reduce_in(&mut c, c10, 10);
    carry::<Curve25519>(&mut c, 0, 9);

    core::array::from_fn(|i| c[i])
}

#[cfg(test)]
mod tests {
    test_integer_field!(super::Curve25519);

    use hex_literal::hex;

    #[test]
    fn positive_modulus() {
        let full = (1 << 26) - 1;
        assert_eq!(
            FIELD.positive_modulus_limbs(),
            [full - 18, full, full, full, full, full, full, full, full, (1 << 21) - 1]
        );
    }

    #[test]
    fn reduces_extreme_limbs() {
        // every limb at the largest magnitude a reduced value can carry, summed twice
        let limbs = [(1 << 26) + (1 << 25); 10];
        let x = ImmutableElement::<P>::from_parts(limbs, 0);
        let expected = limbs_value(&limbs) % modulus();
        assert_eq!(value(&x.square()), (&expected * &expected) % modulus());
        assert_eq!(value(&x.additive_inverse().square()), (&expected * &expected) % modulus());
    }

    #[test]
    fn canonical_encoding_of_modulus() {
        let p = hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        assert_eq!(FIELD.from_bytes(&p, 0).to_bytes().unwrap(), [0; 32]);

        // 2^255 is 19
        let mut high_bit = [0; 32];
        high_bit[31] = 0x80;
        assert_eq!(FIELD.from_bytes(&high_bit, 0), FIELD.from_u64(19));
    }
}
