//! # Zeus-compatible e-voting crypto core
//!
//! This library provides the cryptographic core of a voting client compatible with the
//! Zeus protocol:
//! - Gamma encoding of ranked choices into ElGamal plaintexts
//! - Fiat-Shamir proofs of discrete-log knowledge and of DDH tuples
//! - ElGamal over a mod-p group or the P-256 curve, with a hex wire format
//!
//! ## Features
//!
//! - **Group-polymorphic**: the cryptosystem is written once over the [`Group`] trait
//! - **Zeus-exact proofs**: challenges are derived bit-for-bit as Zeus verifiers expect
//! - **Bounded memoization**: the encoder's combinatorics cache is capped and thread-safe
//!
//! ## Example
//!
//! ```rust
//! use zeus_core::{ElGamal, GammaEncoder, ModPGroup};
//!
//! let encoder = GammaEncoder::new();
//! let elgamal = ElGamal::new(ModPGroup::zeus());
//! let keypair = elgamal.generate_keypair();
//!
//! // Encode a ranked ballot and map it into the group
//! let plaintext = encoder.encode_ranking(&[2, 0], 4).unwrap();
//! let message = elgamal.group().encode_plaintext(&plaintext).unwrap();
//!
//! // Encrypt with a proof of correct encryption
//! let (ciphertext, proof) = elgamal
//!     .encrypt_with_proof(&keypair.public_key, &message)
//!     .unwrap();
//! elgamal
//!     .verify_proof(&keypair.public_key, &ciphertext, &message, &proof)
//!     .unwrap();
//!
//! // Decrypt and decode
//! let decrypted = elgamal.decrypt(&keypair.private_key, &ciphertext).unwrap();
//! let value = elgamal.group().decode_plaintext(&decrypted).unwrap();
//! assert_eq!(encoder.decode_ranking(&value, 4).unwrap(), vec![2, 0]);
//! ```

pub mod encoder;
pub mod encryption;
pub mod error;
pub mod group;
#[cfg(any(test, feature = "test-harness"))]
pub mod harness;
pub mod keys;
pub mod proofs;
pub mod serialization;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use encoder::{to_absolute_answers, to_relative_answers, ChoiceEncoder, GammaCache, GammaEncoder};
pub use encryption::ElGamal;
pub use error::{Result, ZeusError};
pub use group::{Group, ModPGroup, ModParams, P256Group};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use proofs::{DDHTupleProof, DLogProof};
pub use serialization::{SerializedCipher, SerializedEcCipher};
pub use types::{Choice, Ciphertext, ElGamalConfig, EncryptionProof, ProofStrategy};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
