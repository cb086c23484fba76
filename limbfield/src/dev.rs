//! Development-related functionality.

/// Implement the arithmetic test suite for a field, checking every operation against
/// `num-bigint` on random inputs.
macro_rules! test_integer_field {
    ($params:ty) => {
        use crate::{FieldParams, ImmutableElement, IntegerField, IntegerModulo, ReductionStrategy};
        use num_bigint::BigUint;
        use num_traits::Zero;
        use proptest::{collection::vec, prelude::*};

        type P = $params;

        const FIELD: IntegerField<P> = IntegerField::new();

        fn modulus() -> BigUint {
            BigUint::parse_bytes(<P as FieldParams>::MODULUS_HEX.as_bytes(), 16).unwrap()
        }

        /// Value of non-negative limbs.
        fn limbs_value(limbs: &[i64]) -> BigUint {
            limbs.iter().rev().fold(BigUint::zero(), |acc, &limb| {
                (acc << <P as ReductionStrategy>::BITS_PER_LIMB) + BigUint::from(limb as u64)
            })
        }

        /// Canonical value of an element with any number of pending additions.
        fn value<E: IntegerModulo<P>>(e: &E) -> BigUint {
            let mut reduced = e.to_mutable();
            reduced.set_reduced();
            BigUint::from_bytes_le(reduced.to_bytes().unwrap().as_ref())
        }

        fn reference(bytes: &[u8], high_byte: u8) -> BigUint {
            (BigUint::from_bytes_le(bytes) + (BigUint::from(high_byte) << (8 * bytes.len())))
                % modulus()
        }

        prop_compose! {
            fn element()(
                bytes in vec(any::<u8>(), <P as FieldParams>::NUM_BYTES),
                high_byte in prop_oneof![Just(0u8), any::<u8>()],
            ) -> (ImmutableElement<P>, BigUint) {
                (FIELD.from_bytes(&bytes, high_byte), reference(&bytes, high_byte))
            }
        }

        #[test]
        fn parameters() {
            assert_eq!(FIELD.num_limbs(), FIELD.positive_modulus_limbs().as_ref().len());
            assert_eq!(limbs_value(FIELD.positive_modulus_limbs().as_ref()), modulus());
            assert_eq!(FIELD.max_adds(), 1);
            assert_eq!(FIELD.num_bytes(), (modulus().bits() as usize).div_ceil(8));
        }

        #[test]
        fn identities() {
            assert_eq!(value(&FIELD.zero()), BigUint::zero());
            assert_eq!(value(&FIELD.one()), BigUint::from(1u8));
            assert_eq!(FIELD.one().square(), FIELD.one());
            assert_eq!(FIELD.zero().additive_inverse(), FIELD.zero());
        }

        #[test]
        fn edge_values() {
            let m = modulus();
            let one = BigUint::from(1u8);
            for v in [&m - &one, m.clone(), &m + &one, &m + &m - &one] {
                let mut bytes = v.to_bytes_le();
                bytes.resize(<P as FieldParams>::NUM_BYTES + 1, 0);
                let high_byte = bytes.pop().unwrap();
                let e = FIELD.from_bytes(&bytes, high_byte);
                assert_eq!(value(&e), &v % &m);
            }
        }

        #[test]
        fn addition_budget() {
            let x = FIELD.from_u64(3);
            let mut sum = x;
            for _ in 0..FIELD.max_adds() {
                sum = sum.add(&x).unwrap();
            }
            assert_eq!(sum.add(&x), Err(crate::Error::NotValidSummand));
            assert_eq!(x.add(&sum), Err(crate::Error::NotValidSummand));
            assert_eq!(sum.to_bytes(), Err(crate::Error::NotValidSummand));
            assert_eq!(value(&sum), BigUint::from(3u8 * (FIELD.max_adds() as u8 + 1)));
        }

        #[test]
        fn small_value_range() {
            let limit = 1i32 << (<P as ReductionStrategy>::BITS_PER_LIMB - 1);
            assert!(FIELD.small_value(limit - 1).is_ok());
            assert!(FIELD.small_value(1 - limit).is_ok());
            assert_eq!(FIELD.small_value(limit), Err(crate::Error::SmallValueOutOfRange));
            assert_eq!(FIELD.small_value(-limit), Err(crate::Error::SmallValueOutOfRange));
            assert_eq!(FIELD.small_value(i32::MIN), Err(crate::Error::SmallValueOutOfRange));
        }

        proptest! {
            #[test]
            fn decode((a, a_ref) in element()) {
                prop_assert_eq!(value(&a), a_ref);
            }

            #[test]
            fn wide_decode(
                bytes in vec(any::<u8>(), 0..(3 * <P as FieldParams>::NUM_BYTES)),
                high_byte in any::<u8>(),
            ) {
                let e = FIELD.from_bytes(&bytes, high_byte);
                prop_assert_eq!(value(&e), reference(&bytes, high_byte));
            }

            #[test]
            fn add((a, a_ref) in element(), (b, b_ref) in element()) {
                let sum = a.add(&b).unwrap();
                prop_assert_eq!(sum.pending_adds(), 1);
                prop_assert_eq!(value(&sum), (a_ref + b_ref) % modulus());
            }

            #[test]
            fn subtract((a, a_ref) in element(), (b, b_ref) in element()) {
                let difference = a.subtract(&b).unwrap();
                prop_assert_eq!(value(&difference), (a_ref + modulus() - b_ref) % modulus());
            }

            #[test]
            fn multiply((a, a_ref) in element(), (b, b_ref) in element()) {
                prop_assert_eq!(value(&a.multiply(&b)), (&a_ref * &b_ref) % modulus());

                // operands carrying a pending addition or a negation
                let sum = a.add(&b).unwrap();
                let difference = a.subtract(&b).unwrap().additive_inverse();
                let expected = ((&a_ref + &b_ref) * (&b_ref + modulus() - &a_ref)) % modulus();
                prop_assert_eq!(value(&sum.multiply(&difference)), expected);
            }

            #[test]
            fn square((a, a_ref) in element(), (b, b_ref) in element()) {
                prop_assert_eq!(value(&a.square()), (&a_ref * &a_ref) % modulus());

                let sum = a.add(&b).unwrap().additive_inverse();
                let expected = ((&a_ref + &b_ref) * (&a_ref + &b_ref)) % modulus();
                prop_assert_eq!(value(&sum.square()), expected);
            }

            #[test]
            fn negate((a, a_ref) in element()) {
                let negated = a.additive_inverse();
                prop_assert_eq!(negated.pending_adds(), a.pending_adds());
                prop_assert_eq!(value(&negated), (modulus() - a_ref) % modulus());
            }

            #[test]
            fn multiply_small(
                (a, a_ref) in element(),
                (b, b_ref) in element(),
                v in -((1i32 << (<P as ReductionStrategy>::BITS_PER_LIMB - 1)) - 1)
                    ..(1i32 << (<P as ReductionStrategy>::BITS_PER_LIMB - 1)),
            ) {
                let small = FIELD.small_value(v).unwrap();
                let sum = a.add(&b).unwrap();
                let product = sum.multiply_small(small);
                prop_assert_eq!(product.pending_adds(), 0);

                let m = modulus();
                let sum_ref = (a_ref + b_ref) % &m;
                let v_ref = BigUint::from(v.unsigned_abs());
                let expected = if v < 0 {
                    (&m - (sum_ref * v_ref) % &m) % &m
                } else {
                    (sum_ref * v_ref) % &m
                };
                prop_assert_eq!(value(&product), expected);
            }

            #[test]
            fn round_trip((a, _) in element()) {
                let bytes = a.to_bytes().unwrap();
                let decoded = FIELD.from_bytes(bytes.as_ref(), 0);
                prop_assert_eq!(decoded.to_bytes().unwrap(), bytes);
                prop_assert_eq!(decoded, a);
            }

            #[test]
            fn canonical((a, a_ref) in element(), (b, _) in element()) {
                for e in [a, a.additive_inverse(), a.multiply(&b), a.add(&b).unwrap().reduced()] {
                    let mut limbs = *e.limbs();
                    FIELD.final_reduce(&mut limbs);
                    let once = limbs;
                    FIELD.final_reduce(&mut limbs);
                    prop_assert_eq!(limbs, once);

                    let top = limbs.as_ref().len() - 1;
                    for &limb in &limbs.as_ref()[..top] {
                        prop_assert!((0..1i64 << <P as ReductionStrategy>::BITS_PER_LIMB).contains(&limb));
                    }
                    prop_assert!(limbs.as_ref()[top] >= 0);
                    prop_assert!(limbs_value(limbs.as_ref()) < modulus());
                    prop_assert_eq!(limbs_value(limbs.as_ref()), value(&e));
                }
                prop_assert_eq!(value(&a), a_ref);
            }

            #[test]
            fn invert((a, a_ref) in element()) {
                let inverse = a.invert();
                if a_ref.is_zero() {
                    prop_assert!(bool::from(inverse.is_none()));
                } else {
                    prop_assert_eq!(value(&a.multiply(&inverse.unwrap())), BigUint::from(1u8));
                }
            }
        }
    };
}
