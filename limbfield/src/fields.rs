//! Supported moduli.
//!
//! Each modulus is a zero-sized marker implementing [`FieldParams`] and
//! [`ReductionStrategy`], so field arithmetic is monomorphized per modulus.
//!
//! [`FieldParams`]: crate::FieldParams
//! [`ReductionStrategy`]: crate::ReductionStrategy

mod curve25519;
mod curve448;
mod order;
mod poly1305;

pub use self::{
    curve448::Curve448,
    curve25519::Curve25519,
    order::{Curve448Order, Curve25519Order},
    poly1305::Poly1305,
};
