//! Prime-order groups in which the discrete log problem is believed to be hard.
//!
//! The ElGamal [`crate::ElGamal`] cryptosystem is defined once over the [`Group`]
//! trait and instantiated with one of two backends:
//!
//! - [`ModPGroup`], the order-`q` subgroup of `Z*_p` described by [`ModParams`]
//!   (the setting of the Zeus protocol and of the proof engine).
//! - [`P256Group`], the NIST P-256 curve via the [`p256`] crate.

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use std::fmt;

use crate::utils::{byte_length, random_below};

mod ec;
mod modp;

pub use self::{ec::P256Group, modp::ModPGroup, modp::ModParams};

/// Prime-order group together with its scalar field.
///
/// Group operations are written multiplicatively (`mul`, `exp`, `invert`), matching the
/// notation of ElGamal over `Z*_p`; EC backends map them to point addition, scalar
/// multiplication and negation.
pub trait Group: Clone + fmt::Debug + PartialEq + Eq {
    /// Member of the group
    type Element: Clone + PartialEq + Eq + fmt::Debug;
    /// Member of the scalar field of order [`Self::order()`]
    type Scalar: Clone + PartialEq + Eq + fmt::Debug;

    /// Order `q` of the group, which is also the size of the scalar field.
    fn order(&self) -> &BigUint;

    /// Agreed-upon generator `g`.
    fn generator(&self) -> Self::Element;

    /// Group operation.
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Repeated group operation, `base^exponent`.
    fn exp(&self, base: &Self::Element, exponent: &Self::Scalar) -> Self::Element;

    /// Inverse of a group member.
    fn invert(&self, element: &Self::Element) -> Self::Element;

    /// Checks that `element` is a member of the prime-order group.
    fn is_member(&self, element: &Self::Element) -> bool;

    /// Reduces `value` modulo the group order into a scalar.
    fn scalar_from_biguint(&self, value: &BigUint) -> Self::Scalar;

    fn scalar_to_biguint(&self, scalar: &Self::Scalar) -> BigUint;

    /// Byte length of the field the group elements are encoded over (the modulus).
    fn element_byte_len(&self) -> usize;

    /// `a / b` in the group.
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.invert(b))
    }

    /// `g^exponent`
    fn exp_generator(&self, exponent: &Self::Scalar) -> Self::Element {
        self.exp(&self.generator(), exponent)
    }

    /// Byte length of a serialized scalar.
    fn scalar_byte_len(&self) -> usize {
        byte_length(self.order())
    }

    /// Negation in the scalar field.
    fn neg_scalar(&self, scalar: &Self::Scalar) -> Self::Scalar {
        let value = self.scalar_to_biguint(scalar) % self.order();
        self.scalar_from_biguint(&((self.order() - value) % self.order()))
    }

    /// Samples a scalar from `bits(q) + stat_dist` random bits reduced modulo `q`, so that
    /// its distribution is within statistical distance `2^-stat_dist` of uniform.
    fn random_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R, stat_dist: u32) -> Self::Scalar {
        let value = random_below(rng, self.order(), stat_dist);
        self.scalar_from_biguint(&value)
    }
}
