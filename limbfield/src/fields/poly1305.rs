//! Field of integers modulo `2^130 - 5`, the Poly1305 field.
//!
//! Elements are five 26-bit limbs covering exactly 130 bits, so folding is a multiply by 5 with no
//! bit splitting. Carries are a plain arithmetic shift, not the rounded carry used by the other
//! fields, leaving every limb below the top one in `[0, 2^26)`.

use crate::field::{
    FieldParams, ReductionStrategy, carry, carry_out, decode_limbs, limbs_from_be_hex,
};

const MASK: i64 = (1 << 26) - 1;

/// Poly1305 field modulus `2^130 - 5`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Poly1305;

impl FieldParams for Poly1305 {
    type FieldBytes = [u8; 17];

    const NAME: &'static str = "Poly1305";
    const MODULUS_HEX: &'static str = "3fffffffffffffffffffffffffffffffb";
    const MAX_ADDS: u32 = 1;
    const NUM_BYTES: usize = 17;
    const ZERO_BYTES: [u8; 17] = [0; 17];
    const POSITIVE_MODULUS: [i64; 5] = limbs_from_be_hex(Self::MODULUS_HEX, 26);
}

impl ReductionStrategy for Poly1305 {
    type Limbs = [i64; 5];

    const BITS_PER_LIMB: u32 = 26;
    const NUM_LIMBS: usize = 5;

    #[inline(always)]
    fn carry_value(x: i64) -> i64 {
        x >> 26
    }

    fn reduce(limbs: &mut [i64; 5]) {
        let c3 = carry_out::<Self>(limbs, 3);
        limbs[4] += c3;
        let c4 = carry_out::<Self>(limbs, 4);
        Self::reduce_in(limbs, c4, 5);
        carry::<Self>(limbs, 0, 4);
    }

    #[inline]
    fn multiply(a: &[i64; 5], b: &[i64; 5]) -> [i64; 5] {
        let c0 = a[0] * b[0];
        let c1 = a[0] * b[1] + a[1] * b[0];
        let c2 = a[0] * b[2] + a[1] * b[1] + a[2] * b[0];
        let c3 = a[0] * b[3] + a[1] * b[2] + a[2] * b[1] + a[3] * b[0];
        let c4 = a[0] * b[4] + a[1] * b[3] + a[2] * b[2] + a[3] * b[1] + a[4] * b[0];
        let c5 = a[1] * b[4] + a[2] * b[3] + a[3] * b[2] + a[4] * b[1];
        let c6 = a[2] * b[4] + a[3] * b[3] + a[4] * b[2];
        let c7 = a[3] * b[4] + a[4] * b[3];
        let c8 = a[4] * b[4];

        carry_reduce([c0, c1, c2, c3, c4, c5, c6, c7, c8, 0])
    }

    #[inline]
    fn square(a: &[i64; 5]) -> [i64; 5] {
        let c0 = a[0] * a[0];
        let c1 = 2 * (a[0] * a[1]);
        let c2 = 2 * (a[0] * a[2]) + a[1] * a[1];
        let c3 = 2 * (a[0] * a[3] + a[1] * a[2]);
        let c4 = 2 * (a[0] * a[4] + a[1] * a[3]) + a[2] * a[2];
        let c5 = 2 * (a[1] * a[4] + a[2] * a[3]);
        let c6 = 2 * (a[2] * a[4]) + a[3] * a[3];
        let c7 = 2 * (a[3] * a[4]);
        let c8 = a[4] * a[4];

        carry_reduce([c0, c1, c2, c3, c4, c5, c6, c7, c8, 0])
    }

    #[inline(always)]
    fn reduce_in(limbs: &mut [i64], v: i64, i: usize) {
        limbs[i - 5] += 5 * v;
    }

    fn final_carry_reduce_last(limbs: &mut [i64; 5]) {
        let c = limbs[4] >> 26;
        limbs[4] -= c << 26;
        limbs[0] += 5 * c;
    }

    fn decode(bytes: &[u8], high_byte: u8) -> [i64; 5] {
        match <&[u8; 16]>::try_from(bytes) {
            Ok(block) => decode_block(block, high_byte),
            Err(_) => decode_limbs::<Self>(bytes, high_byte),
        }
    }
}

/// Decode a 16-byte message block from two little-endian words.
fn decode_block(block: &[u8; 16], high_byte: u8) -> [i64; 5] {
    let mut words = [0u64; 2];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(8)) {
        *word = chunk.iter().rev().fold(0, |acc, &b| (acc << 8) | u64::from(b));
    }
    let [low, high] = words.map(|w| w as i64);

    let mut limbs = [
        low & MASK,
        (low >> 26) & MASK,
        ((low >> 52) & 0xfff) | ((high & 0x3fff) << 12),
        (high >> 14) & MASK,
        ((high >> 40) & 0xff_ffff) | (i64::from(high_byte) << 24),
    ];
    Poly1305::reduce(&mut limbs);
    limbs
}

/// Fold the 9 product columns into 5 reduced limbs.
#[inline(always)]
fn carry_reduce(mut c: [i64; 10]) -> [i64; 5] {
    for i in 5..9 {
        let v = core::mem::take(&mut c[i]);
        Poly1305::reduce_in(&mut c, v, i);
    }

    carry::<Poly1305>(&mut c, 0, 5);
    let c5 = core::mem::take(&mut c[5]);
    Poly1305::reduce_in(&mut c, c5, 5);
    carry::<Poly1305>(&mut c, 0, 4);

    core::array::from_fn(|i| c[i])
}
