//! Encrypting ranked ballots with proofs of correct encryption

use num_bigint::BigUint;
use zeus_core::serialization::{deserialize_cipher, serialize_cipher};
use zeus_core::{
    Ciphertext, ElGamal, EncryptionProof, GammaEncoder, KeyPair, ModPGroup, SerializedCipher,
};

/// A ballot as submitted by a voter
struct EncryptedBallot {
    voter_id: String,
    ciphertext: SerializedCipher,
    proof: EncryptionProof,
    /// Group element the voter encrypted; kept here so the demo can check the proof
    message: BigUint,
}

/// Ballot box for a single ranked question
struct BallotBox {
    elgamal: ElGamal<ModPGroup>,
    encoder: GammaEncoder,
    keypair: KeyPair<ModPGroup>,
    candidates: Vec<String>,
    ballots: Vec<EncryptedBallot>,
}

impl BallotBox {
    fn new(candidates: Vec<String>) -> Self {
        println!("Initializing ballot box over the Zeus group...");
        let elgamal = ElGamal::new(ModPGroup::zeus());
        let keypair = elgamal.generate_keypair();

        BallotBox {
            elgamal,
            encoder: GammaEncoder::new(),
            keypair,
            candidates,
            ballots: Vec::new(),
        }
    }

    /// Encode, encrypt and prove a ranking of candidate indices
    fn cast(&mut self, voter_id: &str, ranking: &[usize]) -> Result<(), String> {
        if self.ballots.iter().any(|b| b.voter_id == voter_id) {
            return Err("Voter has already voted".to_string());
        }

        let group = self.elgamal.group();
        let plaintext = self
            .encoder
            .encode_ranking(ranking, self.candidates.len())
            .map_err(|e| format!("Encoding failed: {}", e))?;
        let message = group
            .encode_plaintext(&plaintext)
            .map_err(|e| format!("Encoding failed: {}", e))?;

        let (ciphertext, proof) = self
            .elgamal
            .encrypt_with_proof(&self.keypair.public_key, &message)
            .map_err(|e| format!("Encryption failed: {}", e))?;

        self.ballots.push(EncryptedBallot {
            voter_id: voter_id.to_string(),
            ciphertext: serialize_cipher(group, &ciphertext),
            proof,
            message,
        });

        println!("✓ Ballot cast by {} (plaintext {})", voter_id, plaintext);
        Ok(())
    }

    fn parse(&self, ballot: &EncryptedBallot) -> Result<Ciphertext<ModPGroup>, String> {
        deserialize_cipher(self.elgamal.group(), &ballot.ciphertext)
            .map_err(|e| format!("Malformed ballot: {}", e))
    }

    /// Check every proof, then decrypt and decode each ballot
    fn open(&self) -> Result<Vec<(String, Vec<String>)>, String> {
        let mut results = Vec::new();

        for ballot in &self.ballots {
            let ciphertext = self.parse(ballot)?;
            self.elgamal
                .verify_proof(
                    &self.keypair.public_key,
                    &ciphertext,
                    &ballot.message,
                    &ballot.proof,
                )
                .map_err(|e| format!("Ballot of {} rejected: {}", ballot.voter_id, e))?;

            let decrypted = self
                .elgamal
                .decrypt(&self.keypair.private_key, &ciphertext)
                .map_err(|e| format!("Decryption failed: {}", e))?;
            let plaintext = self
                .elgamal
                .group()
                .decode_plaintext(&decrypted)
                .map_err(|e| format!("Decoding failed: {}", e))?;
            let ranking = self
                .encoder
                .decode_ranking(&plaintext, self.candidates.len())
                .map_err(|e| format!("Decoding failed: {}", e))?;

            let names = ranking
                .iter()
                .map(|&i| self.candidates[i].clone())
                .collect();
            results.push((ballot.voter_id.clone(), names));
        }

        Ok(results)
    }
}

fn main() -> Result<(), String> {
    println!("=== Ranked Ballot Demo ===\n");

    let candidates = vec![
        "Alice".to_string(),
        "Bob".to_string(),
        "Charlie".to_string(),
        "Diana".to_string(),
    ];
    let mut ballot_box = BallotBox::new(candidates);

    ballot_box.cast("voter1", &[2, 0, 1])?;
    ballot_box.cast("voter2", &[3])?;
    ballot_box.cast("voter3", &[])?;
    ballot_box.cast("voter4", &[1, 3, 0, 2])?;

    if let Err(e) = ballot_box.cast("voter1", &[0]) {
        println!("✗ Second ballot from voter1 refused: {}", e);
    }
    if let Err(e) = ballot_box.cast("voter5", &[0, 0]) {
        println!("✗ Ballot from voter5 refused: {}", e);
    }

    println!("\nOpening {} ballots...", ballot_box.ballots.len());
    for (voter, ranking) in ballot_box.open()? {
        if ranking.is_empty() {
            println!("  {}: blank", voter);
        } else {
            println!("  {}: {}", voter, ranking.join(" > "));
        }
    }

    Ok(())
}
