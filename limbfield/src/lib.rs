//! Constant-time modular arithmetic over signed 64-bit limbs.
//!
//! Supported moduli:
//!
//! - [`Curve25519`]: `2^255 - 19`, ten 26-bit limbs
//! - [`Curve448`]: `2^448 - 2^224 - 1`, sixteen 28-bit limbs
//! - [`Poly1305`]: `2^130 - 5`, five 26-bit limbs
//! - [`Curve25519Order`] and [`Curve448Order`]: the prime subgroup orders of both curves
//!
//! Each modulus has an [`IntegerField`] descriptor which creates elements. Elements come in
//! two flavors sharing the [`IntegerModulo`] operations: [`ImmutableElement`], a `Copy` value
//! returned by every operation, and [`MutableElement`], which is updated in place.
//!
//! Additions are not carried. An element counts the additions folded into it since its last
//! multiplication or reduction and refuses to take part in another addition, or to be
//! encoded, once that count reaches the field's limit.
//!
//! ```
//! use limbfield::{CURVE25519, Error, IntegerModulo};
//!
//! let x = CURVE25519.from_bytes(&[9; 32], 0);
//! let y = CURVE25519.from_u64(121665);
//!
//! let sum = x.add(&y)?;
//! assert_eq!(sum.add(&y), Err(Error::NotValidSummand));
//!
//! let square = sum.square();
//! let bytes = square.to_bytes()?;
//! assert_eq!(CURVE25519.from_bytes(&bytes, 0), square);
//! # Ok::<(), Error>(())
//! ```
//!
//! ## Minimum Supported Rust Version
//!
//! Rust **1.85** or higher.
//!
//! Minimum supported Rust version can be changed in the future, but it will be
//! done with a minor version bump.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(test)]
#[macro_use]
mod dev;

mod element;
mod error;
mod field;
pub mod fields;

pub use crate::{
    element::{ImmutableElement, IntegerModulo, MutableElement, SmallValue},
    error::{Error, Result},
    field::{FieldParams, IntegerField, ReductionStrategy},
    fields::{Curve448, Curve448Order, Curve25519, Curve25519Order, Poly1305},
};
pub use rand_core;
pub use subtle;
pub use zeroize;

#[cfg(feature = "num-bigint")]
pub use num_bigint;

/// Curve25519 base field, integers modulo `2^255 - 19`.
pub type Curve25519Field = IntegerField<Curve25519>;

/// Curve448 base field, integers modulo `2^448 - 2^224 - 1`.
pub type Curve448Field = IntegerField<Curve448>;

/// Poly1305 field, integers modulo `2^130 - 5`.
pub type Poly1305Field = IntegerField<Poly1305>;

/// Scalars modulo the Curve25519 prime subgroup order.
pub type Curve25519OrderField = IntegerField<Curve25519Order>;

/// Scalars modulo the Curve448 prime subgroup order.
pub type Curve448OrderField = IntegerField<Curve448Order>;

/// Curve25519 base field descriptor.
pub const CURVE25519: Curve25519Field = IntegerField::new();

/// Curve448 base field descriptor.
pub const CURVE448: Curve448Field = IntegerField::new();

/// Poly1305 field descriptor.
pub const POLY1305: Poly1305Field = IntegerField::new();

/// Curve25519 subgroup order field descriptor.
pub const CURVE25519_ORDER: Curve25519OrderField = IntegerField::new();

/// Curve448 subgroup order field descriptor.
pub const CURVE448_ORDER: Curve448OrderField = IntegerField::new();
