//! Core types and data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::group::Group;
use crate::proofs::{DDHTupleProof, DLogProof};

/// Ordered list of selected option indices
pub type Choice = Vec<usize>;

/// Kind of proof [`crate::ElGamal::prove()`] attaches to a ciphertext
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofStrategy {
    /// Schnorr proof of knowledge of the encryption randomness `r` in `alpha = g^r`,
    /// with `beta` bound into the transcript
    #[default]
    DLog,
    /// Chaum-Pedersen proof that `(alpha, beta / m)` shares the exponent `r` with
    /// `(g, h)`, which also binds the plaintext `m`
    DdhTuple,
}

impl fmt::Display for ProofStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofStrategy::DLog => write!(f, "DLog"),
            ProofStrategy::DdhTuple => write!(f, "DdhTuple"),
        }
    }
}

/// Proof of correct encryption, tagged with the strategy that produced it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionProof {
    DLog(DLogProof),
    DdhTuple(DDHTupleProof),
}

impl EncryptionProof {
    pub fn strategy(&self) -> ProofStrategy {
        match self {
            EncryptionProof::DLog(_) => ProofStrategy::DLog,
            EncryptionProof::DdhTuple(_) => ProofStrategy::DdhTuple,
        }
    }
}

/// ElGamal ciphertext `(alpha, beta) = (g^r, m * h^r)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext<G: Group> {
    pub(crate) alpha: G::Element,
    pub(crate) beta: G::Element,
}

impl<G: Group> Ciphertext<G> {
    pub fn new(alpha: G::Element, beta: G::Element) -> Self {
        Ciphertext { alpha, beta }
    }

    /// Randomness commitment `g^r`
    pub fn alpha(&self) -> &G::Element {
        &self.alpha
    }

    /// Blinded message `m * h^r`
    pub fn beta(&self) -> &G::Element {
        &self.beta
    }
}

/// Configuration for ElGamal operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElGamalConfig {
    /// Statistical distance `2^-stat_dist` from uniform when sampling scalars
    pub stat_dist: u32,
    /// Proof attached by `prove` / checked by `verify_proof`
    pub proof_strategy: ProofStrategy,
}

impl Default for ElGamalConfig {
    fn default() -> Self {
        ElGamalConfig {
            stat_dist: 50,
            proof_strategy: ProofStrategy::DLog,
        }
    }
}
