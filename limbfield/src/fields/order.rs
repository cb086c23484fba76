//! Group order fields of Curve25519 and Curve448.
//!
//! Both moduli have the form `2^k - s` where `s` spans several limbs, and for Curve25519 is
//! negative. Reduction folds each limb above `2^k` through every limb of `s` at the matching bit
//! offset. This is considerably slower than the base fields and is meant for scalar arithmetic.

use crate::field::{
    FieldParams, ReductionStrategy, carry, limbs_from_be_hex, signed_limbs_from_be_hex,
};

/// Carry-and-fold rounds which clear every position at or above the limb count.
const FOLD_ROUNDS: usize = 3;

macro_rules! order_field {
    (
        name: $name:ident,
        doc: $doc:expr,
        modulus: $modulus_hex:expr,
        power: $power:expr,
        subtrahend: $subtrahend_hex:expr,
        negative: $negative:expr,
        bits: $bits:expr,
        limbs: $limbs:expr,
        subtrahend_limbs: $subtrahend_limbs:expr,
        bytes: $bytes:expr
    ) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
        pub struct $name;

        impl $name {
            /// `s` in `2^k - s`, with every limb below the top one centred on zero.
            const SUBTRAHEND: [i64; $subtrahend_limbs] =
                signed_limbs_from_be_hex($subtrahend_hex, $bits, $negative);
        }

        impl FieldParams for $name {
            type FieldBytes = [u8; $bytes];

            const NAME: &'static str = stringify!($name);
            const MODULUS_HEX: &'static str = $modulus_hex;
            const MAX_ADDS: u32 = 1;
            const NUM_BYTES: usize = $bytes;
            const ZERO_BYTES: [u8; $bytes] = [0; $bytes];
            const POSITIVE_MODULUS: [i64; $limbs] = limbs_from_be_hex(Self::MODULUS_HEX, $bits);
        }

        impl ReductionStrategy for $name {
            type Limbs = [i64; $limbs];

            const BITS_PER_LIMB: u32 = $bits;
            const NUM_LIMBS: usize = $limbs;

            fn reduce(limbs: &mut [i64; $limbs]) {
                let mut wide = [0i64; 2 * $limbs];
                wide[..$limbs].copy_from_slice(&limbs[..]);
                *limbs = carry_reduce::<Self>(&mut wide);
            }

            fn multiply(a: &[i64; $limbs], b: &[i64; $limbs]) -> [i64; $limbs] {
                let mut wide = [0i64; 2 * $limbs];
                for (i, x) in a.iter().enumerate() {
                    for (j, y) in b.iter().enumerate() {
                        wide[i + j] += x * y;
                    }
                }
                carry_reduce::<Self>(&mut wide)
            }

            fn square(a: &[i64; $limbs]) -> [i64; $limbs] {
                let mut wide = [0i64; 2 * $limbs];
                for i in 0..$limbs {
                    wide[2 * i] += a[i] * a[i];
                    for j in i + 1..$limbs {
                        wide[i + j] += 2 * (a[i] * a[j]);
                    }
                }
                carry_reduce::<Self>(&mut wide)
            }

            #[inline]
            fn reduce_in(limbs: &mut [i64], v: i64, i: usize) {
                fold::<Self>(limbs, v, i, $power, &Self::SUBTRAHEND)
            }

            fn final_carry_reduce_last(limbs: &mut [i64; $limbs]) {
                let high_bits: u32 = $power - ($limbs - 1) * $bits;
                let c = limbs[$limbs - 1] >> high_bits;
                limbs[$limbs - 1] -= c << high_bits;
                for (limb, s) in limbs.iter_mut().zip(&Self::SUBTRAHEND) {
                    *limb += c * s;
                }
            }
        }
    };
}

order_field!(
    name: Curve25519Order,
    doc: "Order of the prime-order subgroup of Curve25519, \
          `2^252 + 27742317777372353535851937790883648493`.",
    modulus: "1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed",
    power: 252,
    subtrahend: "14def9dea2f79cd65812631a5cf5d3ed",
    negative: true,
    bits: 26,
    limbs: 10,
    subtrahend_limbs: 5,
    bytes: 32
);

order_field!(
    name: Curve448Order,
    doc: "Order of the prime-order subgroup of Curve448, \
          `2^446 - 0x8335dc163bb124b65129c96fde933d8d723a70aadc873d6d54a7bb0d`.",
    modulus: concat!(
        "3fffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        "7cca23e9c44edb49aed63690216cc2728dc58f552378c292ab5844f3"
    ),
    power: 446,
    subtrahend: "8335dc163bb124b65129c96fde933d8d723a70aadc873d6d54a7bb0d",
    negative: false,
    bits: 28,
    limbs: 16,
    subtrahend_limbs: 9,
    bytes: 56
);

/// Add `v · 2^(i · bits)` to `limbs` as `v · s · 2^(i · bits - power)`, splitting every term of
/// `s` across two limbs unless it lands on a limb boundary.
#[inline]
fn fold<S: ReductionStrategy>(
    limbs: &mut [i64],
    v: i64,
    i: usize,
    power: usize,
    subtrahend: &[i64],
) {
    let bits = S::BITS_PER_LIMB as usize;
    let mask = (1i64 << bits) - 1;

    for (j, s) in subtrahend.iter().enumerate() {
        let x = v * s;
        let target = (i + j) * bits - power;
        let (pos, offset) = (target / bits, target % bits);
        if offset == 0 {
            limbs[pos] += x;
        } else {
            limbs[pos] += (x << offset) & mask;
            limbs[pos + 1] += x >> (bits - offset);
        }
    }
}

/// Reduce a double-width accumulator into `S::NUM_LIMBS` limbs.
fn carry_reduce<S: ReductionStrategy>(wide: &mut [i64]) -> S::Limbs {
    let n = S::NUM_LIMBS;
    let len = wide.len();

    // Folding position `i` writes below `i` but possibly still above `n`, so repeat until the
    // high half drains. Ascending order keeps every intermediate within 64 bits.
    for _ in 0..FOLD_ROUNDS {
        carry::<S>(wide, 0, len - 1);
        for i in n..len {
            let v = core::mem::take(&mut wide[i]);
            S::reduce_in(wide, v, i);
        }
    }
    debug_assert!(wide[n..].iter().all(|&x| x == 0));

    carry::<S>(wide, 0, n - 1);
    let mut limbs = S::Limbs::default();
    limbs.as_mut().copy_from_slice(&wide[..n]);
    limbs
}
