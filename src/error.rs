//! Error types for the Zeus crypto core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZeusError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZeusError {
    #[error("Invalid group parameters: {0}")]
    InvalidGroupParameters(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Encoding out of range: {0}")]
    EncodingOutOfRange(String),

    #[error("Proof verification failed: {0}")]
    ProofVerificationFailed(String),

    #[error("Plaintext too large for the group order")]
    PlaintextTooLarge,
}

impl ZeusError {
    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        ZeusError::InvalidEncoding(msg.into())
    }

    pub(crate) fn verification(msg: impl Into<String>) -> Self {
        ZeusError::ProofVerificationFailed(msg.into())
    }
}
