//! Core ElGamal encryption and decryption operations

use rand::{thread_rng, CryptoRng, RngCore};

use num_bigint::BigUint;

use crate::error::{Result, ZeusError};
use crate::group::{Group, ModPGroup};
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::proofs::{prove_ddh_tuple, prove_dlog};
use crate::types::{Ciphertext, ElGamalConfig, EncryptionProof, ProofStrategy};

/// ElGamal cryptosystem over a prime-order [`Group`]
#[derive(Clone, Debug)]
pub struct ElGamal<G: Group> {
    group: G,
    config: ElGamalConfig,
}

impl<G: Group> ElGamal<G> {
    /// Create a new ElGamal instance with the default configuration
    pub fn new(group: G) -> Self {
        Self::with_config(group, ElGamalConfig::default())
    }

    /// Create a new ElGamal instance with custom configuration
    pub fn with_config(group: G, config: ElGamalConfig) -> Self {
        ElGamal { group, config }
    }

    pub fn group(&self) -> &G {
        &self.group
    }

    /// Get the configuration
    pub fn config(&self) -> &ElGamalConfig {
        &self.config
    }

    /// Generates a key pair using the thread-local RNG.
    pub fn generate_keypair(&self) -> KeyPair<G> {
        self.generate_keypair_with_rng(&mut thread_rng())
    }

    /// Generates a key pair, sampling `x` within statistical distance `2^-stat_dist`
    /// of uniform over `[0, q)`.
    pub fn generate_keypair_with_rng<R: RngCore + CryptoRng>(&self, rng: &mut R) -> KeyPair<G> {
        let x = self.group.random_scalar(rng, self.config.stat_dist);
        log::debug!(
            "generated key pair over a group of {}-bit order",
            self.group.order().bits()
        );
        KeyPair::from_private_key(&self.group, PrivateKey::from_scalar(x))
    }

    /// Encrypts a group element using the thread-local RNG.
    pub fn encrypt(&self, public_key: &PublicKey<G>, message: &G::Element) -> Result<Ciphertext<G>> {
        self.encrypt_with_rng(public_key, message, &mut thread_rng())
    }

    /// Encrypts a group element with ephemeral randomness drawn from `rng`.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` if the public key or `message` is not valid for the group.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        public_key: &PublicKey<G>,
        message: &G::Element,
        rng: &mut R,
    ) -> Result<Ciphertext<G>> {
        self.check_inputs(public_key, message)?;
        let r = self.group.random_scalar(rng, self.config.stat_dist);
        Ok(self.blind(public_key, message, &r))
    }

    /// Encrypt with caller-chosen randomness `r`, which is also the proof witness.
    #[cfg(any(test, feature = "test-harness"))]
    pub(crate) fn encrypt_with_randomness(
        &self,
        public_key: &PublicKey<G>,
        message: &G::Element,
        r: &G::Scalar,
    ) -> Result<Ciphertext<G>> {
        self.check_inputs(public_key, message)?;
        Ok(self.blind(public_key, message, r))
    }

    fn check_inputs(&self, public_key: &PublicKey<G>, message: &G::Element) -> Result<()> {
        public_key.validate(&self.group)?;
        if !self.group.is_member(message) {
            return Err(ZeusError::encoding("message is not a group member"));
        }
        Ok(())
    }

    /// `(g^r, message * h^r)` for already validated inputs
    fn blind(
        &self,
        public_key: &PublicKey<G>,
        message: &G::Element,
        r: &G::Scalar,
    ) -> Ciphertext<G> {
        let alpha = self.group.exp_generator(r);
        let shared = self.group.exp(public_key.public_component(), r);
        let beta = self.group.mul(message, &shared);
        Ciphertext::new(alpha, beta)
    }

    /// Decrypts `ciphertext` as `beta * alpha^(-x)`.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` if either ciphertext component is not a group member.
    pub fn decrypt(
        &self,
        private_key: &PrivateKey<G>,
        ciphertext: &Ciphertext<G>,
    ) -> Result<G::Element> {
        if !self.group.is_member(ciphertext.alpha()) || !self.group.is_member(ciphertext.beta()) {
            return Err(ZeusError::encoding("ciphertext component is not a group member"));
        }
        let unblinding = self
            .group
            .exp(ciphertext.alpha(), &self.group.neg_scalar(private_key.secret()));
        Ok(self.group.mul(ciphertext.beta(), &unblinding))
    }
}

impl ElGamal<ModPGroup> {
    /// Proves that `ciphertext` was formed with the encryption randomness `randomness`,
    /// using the configured [`ProofStrategy`].
    ///
    /// With [`ProofStrategy::DLog`] the proof shows knowledge of `r` in `alpha = g^r` and
    /// binds `beta` into the transcript. With [`ProofStrategy::DdhTuple`] it shows that
    /// `(g, alpha)` and `(h, beta / message)` share the exponent `r`, which also binds the
    /// plaintext.
    pub fn prove(
        &self,
        public_key: &PublicKey<ModPGroup>,
        ciphertext: &Ciphertext<ModPGroup>,
        message: &BigUint,
        randomness: &BigUint,
    ) -> Result<EncryptionProof> {
        let params = self.group.params();
        match self.config.proof_strategy {
            ProofStrategy::DLog => prove_dlog(
                params,
                ciphertext.alpha(),
                randomness,
                std::slice::from_ref(ciphertext.beta()),
            )
            .map(EncryptionProof::DLog),
            ProofStrategy::DdhTuple => {
                if !self.group.is_member(message) {
                    return Err(ZeusError::encoding("message is not a group member"));
                }
                let unblinded = self.group.div(ciphertext.beta(), message);
                prove_ddh_tuple(
                    params,
                    public_key.public_component(),
                    ciphertext.alpha(),
                    &unblinded,
                    randomness,
                )
                .map(EncryptionProof::DdhTuple)
            }
        }
    }

    /// Verifies a proof produced by [`Self::prove()`] under the same configuration.
    ///
    /// # Errors
    ///
    /// `ProofVerificationFailed` if the proof does not verify or was produced with a
    /// different strategy than the configured one.
    pub fn verify_proof(
        &self,
        public_key: &PublicKey<ModPGroup>,
        ciphertext: &Ciphertext<ModPGroup>,
        message: &BigUint,
        proof: &EncryptionProof,
    ) -> Result<()> {
        if proof.strategy() != self.config.proof_strategy {
            return Err(ZeusError::verification(format!(
                "expected a {} proof, got {}",
                self.config.proof_strategy,
                proof.strategy()
            )));
        }

        let params = self.group.params();
        match proof {
            EncryptionProof::DLog(proof) => proof.verify(
                params,
                ciphertext.alpha(),
                std::slice::from_ref(ciphertext.beta()),
            ),
            EncryptionProof::DdhTuple(proof) => {
                if !self.group.is_member(message) {
                    return Err(ZeusError::verification("message is not a group member"));
                }
                let unblinded = self.group.div(ciphertext.beta(), message);
                proof.verify(
                    params,
                    public_key.public_component(),
                    ciphertext.alpha(),
                    &unblinded,
                )
            }
        }
    }

    /// Encrypts `message` and proves the encryption in one step.
    pub fn encrypt_with_proof(
        &self,
        public_key: &PublicKey<ModPGroup>,
        message: &BigUint,
    ) -> Result<(Ciphertext<ModPGroup>, EncryptionProof)> {
        self.encrypt_with_proof_with_rng(public_key, message, &mut thread_rng())
    }

    /// Like [`Self::encrypt_with_proof()`], drawing the encryption randomness from `rng`.
    pub fn encrypt_with_proof_with_rng<R: RngCore + CryptoRng>(
        &self,
        public_key: &PublicKey<ModPGroup>,
        message: &BigUint,
        rng: &mut R,
    ) -> Result<(Ciphertext<ModPGroup>, EncryptionProof)> {
        self.check_inputs(public_key, message)?;
        let r = self.group.random_scalar(rng, self.config.stat_dist);
        let ciphertext = self.blind(public_key, message, &r);
        let proof = self.prove(public_key, &ciphertext, message, &r)?;
        Ok((ciphertext, proof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{fixtures::small_group, P256Group};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_encryption_decryption() {
        let elgamal = ElGamal::new(small_group());
        let keypair = elgamal.generate_keypair();

        for value in [0u32, 1, 41, 508] {
            let message = elgamal.group().encode_plaintext(&value.into()).unwrap();
            let ciphertext = elgamal.encrypt(&keypair.public_key, &message).unwrap();
            let decrypted = elgamal.decrypt(&keypair.private_key, &ciphertext).unwrap();
            assert_eq!(decrypted, message);
            assert_eq!(
                elgamal.group().decode_plaintext(&decrypted).unwrap(),
                BigUint::from(value)
            );
        }
    }

    #[test]
    fn test_encryption_with_fixed_randomness() {
        let elgamal = ElGamal::new(small_group());
        let keypair = KeyPair::from_private_key(
            elgamal.group(),
            PrivateKey::new(elgamal.group(), &10u32.into()).unwrap(),
        );
        let message = BigUint::from(16u32);
        let ciphertext = elgamal
            .encrypt_with_randomness(&keypair.public_key, &message, &7u32.into())
            .unwrap();

        // alpha = 4^7, beta = 16 * 25^7 (mod 1019)
        assert_eq!(ciphertext.alpha(), &BigUint::from(80u32));
        assert_eq!(ciphertext.beta(), &BigUint::from(837u32));
    }

    #[test]
    fn test_rejected_encryption_consumes_no_randomness() {
        let elgamal = ElGamal::new(small_group());
        let keypair = elgamal.generate_keypair();
        // 2 is a non-residue mod 1019
        let outside = BigUint::from(2u32);
        let expected = ChaCha20Rng::seed_from_u64(5).next_u64();

        let mut rng = ChaCha20Rng::seed_from_u64(5);
        assert!(elgamal
            .encrypt_with_rng(&keypair.public_key, &outside, &mut rng)
            .is_err());
        assert_eq!(rng.next_u64(), expected);

        let mut rng = ChaCha20Rng::seed_from_u64(5);
        assert!(elgamal
            .encrypt_with_proof_with_rng(&keypair.public_key, &outside, &mut rng)
            .is_err());
        assert_eq!(rng.next_u64(), expected);

        let bad_key = PublicKey::new(elgamal.group().generator(), outside);
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        assert!(elgamal
            .encrypt_with_rng(&bad_key, &BigUint::from(16u32), &mut rng)
            .is_err());
        assert_eq!(rng.next_u64(), expected);
    }

    #[test]
    fn test_decryption_matches_division_by_shared_secret() {
        let elgamal = ElGamal::new(small_group());
        let group = elgamal.group();
        let private_key = PrivateKey::new(group, &10u32.into()).unwrap();
        let keypair = KeyPair::from_private_key(group, private_key);
        let ciphertext = Ciphertext::new(BigUint::from(80u32), BigUint::from(837u32));

        // 837 * 80^(509 - 10) = 837 / 25^7 (mod 1019)
        let decrypted = elgamal.decrypt(&keypair.private_key, &ciphertext).unwrap();
        assert_eq!(decrypted, BigUint::from(16u32));
        let shared = group.exp(ciphertext.alpha(), keypair.private_key.secret());
        assert_eq!(group.div(ciphertext.beta(), &shared), decrypted);

        // x = 0 leaves beta untouched
        let zero = PrivateKey::new(group, &0u32.into()).unwrap();
        assert_eq!(
            elgamal.decrypt(&zero, &ciphertext).unwrap(),
            BigUint::from(837u32)
        );
    }

    #[test]
    fn test_p256_encryption_decryption() {
        let elgamal = ElGamal::new(P256Group::new());
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let keypair = elgamal.generate_keypair_with_rng(&mut rng);

        let group = elgamal.group();
        let message = group.exp_generator(&group.scalar_from_biguint(&12345u32.into()));
        let ciphertext = elgamal
            .encrypt_with_rng(&keypair.public_key, &message, &mut rng)
            .unwrap();
        assert_ne!(ciphertext.beta(), &message);
        assert_eq!(
            elgamal.decrypt(&keypair.private_key, &ciphertext).unwrap(),
            message
        );
    }

    #[test]
    fn test_seeded_key_generation_is_deterministic() {
        let elgamal = ElGamal::new(small_group());
        let first = elgamal.generate_keypair_with_rng(&mut ChaCha20Rng::seed_from_u64(1));
        let second = elgamal.generate_keypair_with_rng(&mut ChaCha20Rng::seed_from_u64(1));
        assert_eq!(first.public_key, second.public_key);
        assert!(first.private_key.secret() < elgamal.group().order());
    }

    #[test]
    fn test_non_members_are_rejected() {
        let elgamal = ElGamal::new(small_group());
        let keypair = elgamal.generate_keypair();
        // 2 is a non-residue mod 1019
        let outside = BigUint::from(2u32);
        assert!(matches!(
            elgamal.encrypt(&keypair.public_key, &outside),
            Err(ZeusError::InvalidEncoding(_))
        ));

        let forged = Ciphertext::new(outside.clone(), BigUint::from(16u32));
        assert!(matches!(
            elgamal.decrypt(&keypair.private_key, &forged),
            Err(ZeusError::InvalidEncoding(_))
        ));

        let bad_key = PublicKey::new(elgamal.group().generator(), outside);
        assert!(elgamal.encrypt(&bad_key, &BigUint::from(16u32)).is_err());
    }

    #[test]
    fn test_dlog_proof_of_encryption() {
        let elgamal = ElGamal::new(ModPGroup::zeus());
        let keypair = elgamal.generate_keypair();
        let message = elgamal.group().encode_plaintext(&7u32.into()).unwrap();

        let (ciphertext, proof) = elgamal
            .encrypt_with_proof(&keypair.public_key, &message)
            .unwrap();
        assert_eq!(proof.strategy(), ProofStrategy::DLog);
        elgamal
            .verify_proof(&keypair.public_key, &ciphertext, &message, &proof)
            .unwrap();

        // The proof is not a blanket "valid": it fails for any other ciphertext
        let (other, _) = elgamal
            .encrypt_with_proof(&keypair.public_key, &message)
            .unwrap();
        assert!(matches!(
            elgamal.verify_proof(&keypair.public_key, &other, &message, &proof),
            Err(ZeusError::ProofVerificationFailed(_))
        ));

        // beta is bound into the transcript
        let swapped = Ciphertext::new(ciphertext.alpha().clone(), other.beta().clone());
        assert!(elgamal
            .verify_proof(&keypair.public_key, &swapped, &message, &proof)
            .is_err());
    }

    #[test]
    fn test_ddh_tuple_proof_binds_plaintext() {
        let config = ElGamalConfig {
            proof_strategy: ProofStrategy::DdhTuple,
            ..ElGamalConfig::default()
        };
        let elgamal = ElGamal::with_config(ModPGroup::zeus(), config);
        let keypair = elgamal.generate_keypair();
        let group = elgamal.group();
        let message = group.encode_plaintext(&7u32.into()).unwrap();

        let (ciphertext, proof) = elgamal
            .encrypt_with_proof(&keypair.public_key, &message)
            .unwrap();
        elgamal
            .verify_proof(&keypair.public_key, &ciphertext, &message, &proof)
            .unwrap();

        let other_message = group.encode_plaintext(&8u32.into()).unwrap();
        assert!(elgamal
            .verify_proof(&keypair.public_key, &ciphertext, &other_message, &proof)
            .is_err());
    }

    #[test]
    fn test_proof_strategy_mismatch_is_rejected() {
        let dlog = ElGamal::new(ModPGroup::zeus());
        let ddh = ElGamal::with_config(
            ModPGroup::zeus(),
            ElGamalConfig {
                proof_strategy: ProofStrategy::DdhTuple,
                ..ElGamalConfig::default()
            },
        );
        let keypair = dlog.generate_keypair();
        let message = dlog.group().encode_plaintext(&0u32.into()).unwrap();

        let (ciphertext, proof) = dlog
            .encrypt_with_proof(&keypair.public_key, &message)
            .unwrap();
        assert!(matches!(
            ddh.verify_proof(&keypair.public_key, &ciphertext, &message, &proof),
            Err(ZeusError::ProofVerificationFailed(_))
        ));
    }
}
