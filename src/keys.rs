//! Key types

use std::fmt;

use num_bigint::BigUint;

use crate::error::{Result, ZeusError};
use crate::group::Group;

/// ElGamal public key, the product-group pair `(g, h = g^x)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey<G: Group> {
    pub(crate) generator: G::Element,
    pub(crate) h: G::Element,
}

impl<G: Group> PublicKey<G> {
    pub fn new(generator: G::Element, h: G::Element) -> Self {
        PublicKey { generator, h }
    }

    /// Get the generator
    pub fn generator(&self) -> &G::Element {
        &self.generator
    }

    /// Get the public component `g^x`
    pub fn public_component(&self) -> &G::Element {
        &self.h
    }

    /// Checks that the key is `(g, h)` for the generator `g` of `group` and a member `h`.
    pub fn validate(&self, group: &G) -> Result<()> {
        if self.generator != group.generator() {
            return Err(ZeusError::encoding(
                "public key generator differs from the group generator",
            ));
        }
        if !group.is_member(&self.h) {
            return Err(ZeusError::encoding(
                "public key component is not a group member",
            ));
        }
        Ok(())
    }
}

/// ElGamal private key `x` in `[0, q)`
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey<G: Group> {
    x: G::Scalar,
}

impl<G: Group> PrivateKey<G> {
    /// Wraps the secret exponent `x` of `group`.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` unless `x < q`.
    pub fn new(group: &G, x: &BigUint) -> Result<Self> {
        if x >= group.order() {
            return Err(ZeusError::encoding("private key is not below the group order"));
        }
        Ok(Self::from_scalar(group.scalar_from_biguint(x)))
    }

    /// Caller guarantees `x` is a reduced scalar of the group.
    pub(crate) fn from_scalar(x: G::Scalar) -> Self {
        PrivateKey { x }
    }

    pub(crate) fn secret(&self) -> &G::Scalar {
        &self.x
    }

    /// Derives the matching public key.
    pub fn public_key(&self, group: &G) -> PublicKey<G> {
        PublicKey::new(group.generator(), group.exp_generator(&self.x))
    }
}

impl<G: Group> fmt::Debug for PrivateKey<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}

/// ElGamal key pair
#[derive(Clone, Debug)]
pub struct KeyPair<G: Group> {
    pub public_key: PublicKey<G>,
    pub private_key: PrivateKey<G>,
}

impl<G: Group> KeyPair<G> {
    /// Completes a private key into a key pair.
    pub fn from_private_key(group: &G, private_key: PrivateKey<G>) -> Self {
        KeyPair {
            public_key: private_key.public_key(group),
            private_key,
        }
    }
}
