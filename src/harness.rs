//! Deterministic-randomness entry points for tests.
//!
//! Compiled only for this crate's own tests or with the `test-harness` feature. A
//! predictable nonce or encryption randomness leaks the witness of every proof built
//! from it, so none of this may be used outside tests.

use num_bigint::BigUint;

use crate::encryption::ElGamal;
use crate::error::Result;
use crate::group::{Group, ModParams};
use crate::keys::PublicKey;
use crate::proofs::{self, DDHTupleProof, DLogProof};
use crate::types::Ciphertext;

/// Test-only factory exposing the injected-randomness code paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestHarness;

impl TestHarness {
    pub fn new() -> Self {
        TestHarness
    }

    /// Encrypts with the given randomness `r` instead of a fresh draw.
    pub fn encrypt_with_randomness<G: Group>(
        &self,
        elgamal: &ElGamal<G>,
        public_key: &PublicKey<G>,
        message: &G::Element,
        randomness: &G::Scalar,
    ) -> Result<Ciphertext<G>> {
        elgamal.encrypt_with_randomness(public_key, message, randomness)
    }

    /// [`proofs::prove_dlog()`] with a fixed nonce.
    pub fn prove_dlog_with_nonce(
        &self,
        params: &ModParams,
        power: &BigUint,
        dlog: &BigUint,
        extra: &[BigUint],
        nonce: &BigUint,
    ) -> Result<DLogProof> {
        proofs::prove_dlog_with_nonce(params, power, dlog, extra, nonce)
    }

    /// [`proofs::prove_ddh_tuple()`] with a fixed nonce.
    pub fn prove_ddh_tuple_with_nonce(
        &self,
        params: &ModParams,
        message: &BigUint,
        base_power: &BigUint,
        message_power: &BigUint,
        exponent: &BigUint,
        nonce: &BigUint,
    ) -> Result<DDHTupleProof> {
        proofs::prove_ddh_tuple_with_nonce(params, message, base_power, message_power, exponent, nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::fixtures::{small_group, small_params};
    use crate::keys::{KeyPair, PrivateKey};

    #[test]
    fn test_harness_is_deterministic() {
        let harness = TestHarness::new();
        let params = small_params();
        let power = BigUint::from(25u32);

        let first = harness
            .prove_dlog_with_nonce(&params, &power, &10u32.into(), &[], &7u32.into())
            .unwrap();
        let second = harness
            .prove_dlog_with_nonce(&params, &power, &10u32.into(), &[], &7u32.into())
            .unwrap();
        assert_eq!(first, second);
        first.verify(&params, &power, &[]).unwrap();

        // a nonce of q or more is refused
        assert!(harness
            .prove_dlog_with_nonce(&params, &power, &10u32.into(), &[], params.order())
            .is_err());
    }

    #[test]
    fn test_encryption_with_injected_randomness() {
        let harness = TestHarness::new();
        let elgamal = ElGamal::new(small_group());
        let private_key = PrivateKey::new(elgamal.group(), &10u32.into()).unwrap();
        let keypair = KeyPair::from_private_key(elgamal.group(), private_key);
        let message = BigUint::from(16u32);
        let r = BigUint::from(7u32);

        let ciphertext = harness
            .encrypt_with_randomness(&elgamal, &keypair.public_key, &message, &r)
            .unwrap();
        assert_eq!(ciphertext.alpha(), &BigUint::from(80u32));

        // the same randomness is the witness of a DDH tuple proof on (h, beta / m)
        let group = elgamal.group();
        let unblinded = group.div(ciphertext.beta(), &message);
        let proof = harness
            .prove_ddh_tuple_with_nonce(
                group.params(),
                keypair.public_key.public_component(),
                ciphertext.alpha(),
                &unblinded,
                &r,
                &3u32.into(),
            )
            .unwrap();
        proof
            .verify(
                group.params(),
                keypair.public_key.public_component(),
                ciphertext.alpha(),
                &unblinded,
            )
            .unwrap();
    }
}
