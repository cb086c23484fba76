//! Field of integers modulo `2^448 - 2^224 - 1`, the Curve448 base field.
//!
//! Elements are sixteen 28-bit limbs, so `2^448` sits exactly on a limb boundary. With two
//! nonzero terms below `2^448` in the modulus, `2^448 = 2^224 + 1` folds every term at position
//! `i >= 16` into both `i - 8` and `i - 16`.

use crate::field::{FieldParams, ReductionStrategy, carry, carry_out, limbs_from_be_hex};

/// Curve448 base field modulus `2^448 - 2^224 - 1`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Curve448;

impl FieldParams for Curve448 {
    type FieldBytes = [u8; 56];

    const NAME: &'static str = "Curve448";
    const MODULUS_HEX: &'static str = concat!(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffe",
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    );
    const MAX_ADDS: u32 = 1;
    const NUM_BYTES: usize = 56;
    const ZERO_BYTES: [u8; 56] = [0; 56];
    const POSITIVE_MODULUS: [i64; 16] = limbs_from_be_hex(Self::MODULUS_HEX, 28);
}

impl ReductionStrategy for Curve448 {
    type Limbs = [i64; 16];

    const BITS_PER_LIMB: u32 = 28;
    const NUM_LIMBS: usize = 16;

    fn reduce(limbs: &mut [i64; 16]) {
        let c14 = carry_out::<Self>(limbs, 14);
        limbs[15] += c14;
        let c15 = carry_out::<Self>(limbs, 15);
        Self::reduce_in(limbs, c15, 16);
        carry::<Self>(limbs, 0, 15);
    }

    #[inline]
    fn multiply(a: &[i64; 16], b: &[i64; 16]) -> [i64; 16] {
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
        let c10 = a[0] * b[10]
            + a[1] * b[9]
            + a[2] * b[8]
            + a[3] * b[7]
            + a[4] * b[6]
            + a[5] * b[5]
            + a[6] * b[4]
            + a[7] * b[3]
            + a[8] * b[2]
            + a[9] * b[1]
            + a[10] * b[0];
        let c11 = a[0] * b[11]
            + a[1] * b[10]
            + a[2] * b[9]
            + a[3] * b[8]
            + a[4] * b[7]
            + a[5] * b[6]
            + a[6] * b[5]
            + a[7] * b[4]
            + a[8] * b[3]
            + a[9] * b[2]
            + a[10] * b[1]
            + a[11] * b[0];
        let c12 = a[0] * b[12]
            + a[1] * b[11]
            + a[2] * b[10]
            + a[3] * b[9]
            + a[4] * b[8]
            + a[5] * b[7]
            + a[6] * b[6]
            + a[7] * b[5]
            + a[8] * b[4]
            + a[9] * b[3]
            + a[10] * b[2]
            + a[11] * b[1]
            + a[12] * b[0];
        let c13 = a[0] * b[13]
            + a[1] * b[12]
            + a[2] * b[11]
            + a[3] * b[10]
            + a[4] * b[9]
            + a[5] * b[8]
            + a[6] * b[7]
            + a[7] * b[6]
            + a[8] * b[5]
            + a[9] * b[4]
            + a[10] * b[3]
            + a[11] * b[2]
            + a[12] * b[1]
            + a[13] * b[0];
        let c14 = a[0] * b[14]
            + a[1] * b[13]
            + a[2] * b[12]
            + a[3] * b[11]
            + a[4] * b[10]
            + a[5] * b[9]
            + a[6] * b[8]
            + a[7] * b[7]
            + a[8] * b[6]
            + a[9] * b[5]
            + a[10] * b[4]
            + a[11] * b[3]
            + a[12] * b[2]
            + a[13] * b[1]
            + a[14] * b[0];
        let c15 = a[0] * b[15]
            + a[1] * b[14]
            + a[2] * b[13]
            + a[3] * b[12]
            + a[4] * b[11]
            + a[5] * b[10]
            + a[6] * b[9]
            + a[7] * b[8]
            + a[8] * b[7]
            + a[9] * b[6]
            + a[10] * b[5]
            + a[11] * b[4]
            + a[12] * b[3]
            + a[13] * b[2]
            + a[14] * b[1]
            + a[15] * b[0];
        let c16 = a[1] * b[15]
            + a[2] * b[14]
            + a[3] * b[13]
            + a[4] * b[12]
            + a[5] * b[11]
            + a[6] * b[10]
            + a[7] * b[9]
            + a[8] * b[8]
            + a[9] * b[7]
            + a[10] * b[6]
            + a[11] * b[5]
            + a[12] * b[4]
            + a[13] * b[3]
            + a[14] * b[2]
            + a[15] * b[1];
        let c17 = a[2] * b[15]
            + a[3] * b[14]
            + a[4] * b[13]
            + a[5] * b[12]
            + a[6] * b[11]
            + a[7] * b[10]
            + a[8] * b[9]
            + a[9] * b[8]
            + a[10] * b[7]
            + a[11] * b[6]
            + a[12] * b[5]
            + a[13] * b[4]
            + a[14] * b[3]
            + a[15] * b[2];
        let c18 = a[3] * b[15]
            + a[4] * b[14]
            + a[5] * b[13]
            + a[6] * b[12]
            + a[7] * b[11]
            + a[8] * b[10]
            + a[9] * b[9]
            + a[10] * b[8]
            + a[11] * b[7]
            + a[12] * b[6]
            + a[13] * b[5]
            + a[14] * b[4]
            + a[15] * b[3];
        let c19 = a[4] * b[15]
            + a[5] * b[14]
            + a[6] * b[13]
            + a[7] * b[12]
            + a[8] * b[11]
            + a[9] * b[10]
            + a[10] * b[9]
            + a[11] * b[8]
            + a[12] * b[7]
            + a[13] * b[6]
            + a[14] * b[5]
            + a[15] * b[4];
        let c20 = a[5] * b[15]
            + a[6] * b[14]
            + a[7] * b[13]
            + a[8] * b[12]
            + a[9] * b[11]
            + a[10] * b[10]
            + a[11] * b[9]
            + a[12] * b[8]
            + a[13] * b[7]
            + a[14] * b[6]
            + a[15] * b[5];
        let c21 = a[6] * b[15]
            + a[7] * b[14]
            + a[8] * b[13]
            + a[9] * b[12]
            + a[10] * b[11]
            + a[11] * b[10]
            + a[12] * b[9]
            + a[13] * b[8]
            + a[14] * b[7]
            + a[15] * b[6];
        let c22 = a[7] * b[15]
            + a[8] * b[14]
            + a[9] * b[13]
            + a[10] * b[12]
            + a[11] * b[11]
            + a[12] * b[10]
            + a[13] * b[9]
            + a[14] * b[8]
            + a[15] * b[7];
        let c23 = a[8] * b[15]
            + a[9] * b[14]
            + a[10] * b[13]
            + a[11] * b[12]
            + a[12] * b[11]
            + a[13] * b[10]
            + a[14] * b[9]
            + a[15] * b[8];
        let c24 = a[9] * b[15]
            + a[10] * b[14]
            + a[11] * b[13]
            + a[12] * b[12]
            + a[13] * b[11]
            + a[14] * b[10]
            + a[15] * b[9];
        let c25 = a[10] * b[15]
            + a[11] * b[14]
            + a[12] * b[13]
            + a[13] * b[12]
            + a[14] * b[11]
            + a[15] * b[10];
        let c26 = a[11] * b[15] + a[12] * b[14] + a[13] * b[13] + a[14] * b[12] + a[15] * b[11];
        let c27 = a[12] * b[15] + a[13] * b[14] + a[14] * b[13] + a[15] * b[12];
        let c28 = a[13] * b[15] + a[14] * b[14] + a[15] * b[13];
        let c29 = a[14] * b[15] + a[15] * b[14];
        let c30 = a[15] * b[15];

        carry_reduce([
            c0, c1, c2, c3, c4, c5, c6, c7, c8, c9, c10, c11, c12, c13, c14, c15, c16, c17, c18,
            c19, c20, c21, c22, c23, c24, c25, c26, c27, c28, c29, c30, 0,
        ])
    }

    #[inline]
    fn square(a: &[i64; 16]) -> [i64; 16] {
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
        let c10 = 2 * (a[0] * a[10]
            + a[1] * a[9]
            + a[2] * a[8]
            + a[3] * a[7]
            + a[4] * a[6])
            + a[5] * a[5];
        let c11 = 2 * (a[0] * a[11]
            + a[1] * a[10]
            + a[2] * a[9]
            + a[3] * a[8]
            + a[4] * a[7]
            + a[5] * a[6]);
        let c12 = 2 * (a[0] * a[12]
            + a[1] * a[11]
            + a[2] * a[10]
            + a[3] * a[9]
            + a[4] * a[8]
            + a[5] * a[7])
            + a[6] * a[6];
        let c13 = 2 * (a[0] * a[13]
            + a[1] * a[12]
            + a[2] * a[11]
            + a[3] * a[10]
            + a[4] * a[9]
            + a[5] * a[8]
            + a[6] * a[7]);
        let c14 = 2 * (a[0] * a[14]
            + a[1] * a[13]
            + a[2] * a[12]
            + a[3] * a[11]
            + a[4] * a[10]
            + a[5] * a[9]
            + a[6] * a[8])
            + a[7] * a[7];
        let c15 = 2 * (a[0] * a[15]
            + a[1] * a[14]
            + a[2] * a[13]
            + a[3] * a[12]
            + a[4] * a[11]
            + a[5] * a[10]
            + a[6] * a[9]
            + a[7] * a[8]);
        let c16 = 2 * (a[1] * a[15]
            + a[2] * a[14]
            + a[3] * a[13]
            + a[4] * a[12]
            + a[5] * a[11]
            + a[6] * a[10]
            + a[7] * a[9])
            + a[8] * a[8];
        let c17 = 2 * (a[2] * a[15]
            + a[3] * a[14]
            + a[4] * a[13]
            + a[5] * a[12]
            + a[6] * a[11]
            + a[7] * a[10]
            + a[8] * a[9]);
        let c18 = 2 * (a[3] * a[15]
            + a[4] * a[14]
            + a[5] * a[13]
            + a[6] * a[12]
            + a[7] * a[11]
            + a[8] * a[10])
            + a[9] * a[9];
        let c19 = 2 * (a[4] * a[15]
            + a[5] * a[14]
            + a[6] * a[13]
            + a[7] * a[12]
            + a[8] * a[11]
            + a[9] * a[10]);
        let c20 = 2 * (a[5] * a[15]
            + a[6] * a[14]
            + a[7] * a[13]
            + a[8] * a[12]
            + a[9] * a[11])
            + a[10] * a[10];
        let c21 = 2 * (a[6] * a[15] + a[7] * a[14] + a[8] * a[13] + a[9] * a[12] + a[10] * a[11]);
        let c22 = 2 * (a[7] * a[15] + a[8] * a[14] + a[9] * a[13] + a[10] * a[12]) + a[11] * a[11];
        let c23 = 2 * (a[8] * a[15] + a[9] * a[14] + a[10] * a[13] + a[11] * a[12]);
        let c24 = 2 * (a[9] * a[15] + a[10] * a[14] + a[11] * a[13]) + a[12] * a[12];
        let c25 = 2 * (a[10] * a[15] + a[11] * a[14] + a[12] * a[13]);
        let c26 = 2 * (a[11] * a[15] + a[12] * a[14]) + a[13] * a[13];
        let c27 = 2 * (a[12] * a[15] + a[13] * a[14]);
        let c28 = 2 * (a[13] * a[15]) + a[14] * a[14];
        let c29 = 2 * (a[14] * a[15]);
        let c30 = a[15] * a[15];

        carry_reduce([
            c0, c1, c2, c3, c4, c5, c6, c7, c8, c9, c10, c11, c12, c13, c14, c15, c16, c17, c18,
            c19, c20, c21, c22, c23, c24, c25, c26, c27, c28, c29, c30, 0,
        ])
    }

    #[inline(always)]
    fn reduce_in(limbs: &mut [i64], v: i64, i: usize) {
        limbs[i - 16] += v;
        limbs[i - 8] += v;
    }

    fn final_carry_reduce_last(limbs: &mut [i64; 16]) {
        let c = limbs[15] >> 28;
        limbs[15] -= c << 28;
        limbs[0] += c;
        limbs[8] += c;
    }
}

/// Fold the 31 product columns into 16 reduced limbs.
#[inline(always)]
fn carry_reduce(mut c: [i64; 32]) -> [i64; 16] {
    // Folds from positions 24 and up land at 16 and up again, so go top down.
    for i in (16..31).rev() {
        let v = core::mem::take(&mut c[i]);
        Curve448::reduce_in(&mut c, v, i);
    }

    carry::<Curve448>(&mut c, 0, 16);
    let c16 = core::mem::take(&mut c[16]);
    Curve448::reduce_in(&mut c, c16, 16);
    carry::<Curve448>(&mut c, 0, 15);

    core::array::from_fn(|i| c[i])
}

#[cfg(test)]
mod tests {
    test_integer_field!(super::Curve448);

    #[test]
    fn positive_modulus() {
        let full = (1 << 28) - 1;
        let mut expected = [full; 16];
        expected[8] = full - 1;
        assert_eq!(FIELD.positive_modulus_limbs(), expected);
    }

    #[test]
    fn golden_ratio_fold() {
        // 2^448 = 2^224 + 1
        let mut bytes = [0u8; 56];
        bytes[28] = 1;
        bytes[0] = 1;
        assert_eq!(FIELD.from_bytes(&[0; 56], 1), FIELD.from_bytes(&bytes, 0));
    }

    #[test]
    fn reduces_extreme_limbs() {
        let limbs = [-(1 << 28) - (1 << 27); 16];
        let x = ImmutableElement::<P>::from_parts(limbs, 0);
        let y = x.additive_inverse();
        assert_eq!(x.multiply(&y), x.square().additive_inverse());
    }
}
