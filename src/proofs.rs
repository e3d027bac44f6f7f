//! Non-interactive zero-knowledge proofs over a mod-p group
//!
//! Both proofs are Sigma protocols made non-interactive with the Fiat-Shamir transform.
//! The challenge is derived exactly as Zeus does it: the transcript is prefixed with
//! `[p, g, q]`, hashed with [`numbers_hash()`], read back as an integer by
//! [`strbin_to_int()`], and used as an exponent of `g`. The resulting group element is
//! the challenge.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZeusError};
use crate::group::ModParams;
use crate::utils::{mod_exp, sha256};

/// Proof of knowledge of `x` such that `power = g^x mod p` (Schnorr)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DLogProof {
    pub commitment: BigUint,
    pub challenge: BigUint,
    pub response: BigUint,
}

/// Proof of knowledge of `x` such that `base_power = g^x` and `message_power = message^x`
/// (Chaum-Pedersen)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DDHTupleProof {
    pub base_commitment: BigUint,
    pub message_commitment: BigUint,
    pub challenge: BigUint,
    pub response: BigUint,
}

/// SHA-256 of the `"{hex}:"` rendering of each number, as a lowercase hex digest.
pub fn numbers_hash(numbers: &[BigUint]) -> String {
    sha256(numbers.iter().map(|n| format!("{n:x}:")))
}

/// Reads `s` as a little-endian base-256 integer over its UTF-16 code units.
pub fn strbin_to_int(s: &str) -> BigUint {
    let units: Vec<u16> = s.encode_utf16().collect();
    units
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, &unit| (acc << 8u32) + unit)
}

/// Fiat-Shamir challenge `g^strbin_to_int(numbers_hash([p, g, q] ++ elements)) mod p`.
pub fn challenge_from_transcript(params: &ModParams, elements: &[BigUint]) -> BigUint {
    let mut transcript = Vec::with_capacity(elements.len() + 3);
    transcript.push(params.modulus().clone());
    transcript.push(params.generator().clone());
    transcript.push(params.order().clone());
    transcript.extend_from_slice(elements);

    let exponent = strbin_to_int(&numbers_hash(&transcript));
    mod_exp(params.generator(), &exponent, params.modulus())
}

/// Proves knowledge of `dlog` with `power = g^dlog`, binding the `extra` public values
/// into the transcript.
///
/// # Errors
///
/// `InvalidEncoding` if `power` or any `extra` value is outside `[1, p)` or `dlog >= q`.
pub fn prove_dlog(
    params: &ModParams,
    power: &BigUint,
    dlog: &BigUint,
    extra: &[BigUint],
) -> Result<DLogProof> {
    check_dlog_inputs(params, power, dlog, extra)?;
    let nonce = draw_nonce(params)?;
    prove_dlog_with_nonce(params, power, dlog, extra, &nonce)
}

pub(crate) fn prove_dlog_with_nonce(
    params: &ModParams,
    power: &BigUint,
    dlog: &BigUint,
    extra: &[BigUint],
    nonce: &BigUint,
) -> Result<DLogProof> {
    check_dlog_inputs(params, power, dlog, extra)?;
    check_exponent(params, "nonce", nonce)?;

    let commitment = mod_exp(params.generator(), nonce, params.modulus());
    let mut transcript = vec![power.clone(), commitment.clone()];
    transcript.extend_from_slice(extra);
    let challenge = challenge_from_transcript(params, &transcript);
    let response = (&challenge * dlog + nonce) % params.order();

    Ok(DLogProof {
        commitment,
        challenge,
        response,
    })
}

impl DLogProof {
    /// Checks the proof against `power` and the `extra` values it was created with.
    ///
    /// # Errors
    ///
    /// `ProofVerificationFailed` if the challenge does not match the transcript, the
    /// response is not below `q`, or `g^response != commitment * power^challenge`.
    pub fn verify(&self, params: &ModParams, power: &BigUint, extra: &[BigUint]) -> Result<()> {
        let result = self.check(params, power, extra);
        if let Err(ref e) = result {
            log::warn!("DLog proof rejected: {e}");
        }
        result
    }

    fn check(&self, params: &ModParams, power: &BigUint, extra: &[BigUint]) -> Result<()> {
        let p = params.modulus();
        if !in_range(params, power) || !in_range(params, &self.commitment) {
            return Err(ZeusError::verification("public value outside [1, p)"));
        }
        if &self.response >= params.order() {
            return Err(ZeusError::verification("response is not below q"));
        }

        let mut transcript = vec![power.clone(), self.commitment.clone()];
        transcript.extend_from_slice(extra);
        if challenge_from_transcript(params, &transcript) != self.challenge {
            return Err(ZeusError::verification("challenge does not match transcript"));
        }

        let lhs = mod_exp(params.generator(), &self.response, p);
        let rhs = (&self.commitment * mod_exp(power, &self.challenge, p)) % p;
        if lhs != rhs {
            return Err(ZeusError::verification("g^response != commitment * power^challenge"));
        }
        Ok(())
    }
}

/// Proves that `base_power = g^exponent` and `message_power = message^exponent`.
///
/// # Errors
///
/// `InvalidEncoding` if a public value is outside `[1, p)` or `exponent >= q`.
pub fn prove_ddh_tuple(
    params: &ModParams,
    message: &BigUint,
    base_power: &BigUint,
    message_power: &BigUint,
    exponent: &BigUint,
) -> Result<DDHTupleProof> {
    check_ddh_inputs(params, message, base_power, message_power, exponent)?;
    let nonce = draw_nonce(params)?;
    prove_ddh_tuple_with_nonce(params, message, base_power, message_power, exponent, &nonce)
}

pub(crate) fn prove_ddh_tuple_with_nonce(
    params: &ModParams,
    message: &BigUint,
    base_power: &BigUint,
    message_power: &BigUint,
    exponent: &BigUint,
    nonce: &BigUint,
) -> Result<DDHTupleProof> {
    check_ddh_inputs(params, message, base_power, message_power, exponent)?;
    check_exponent(params, "nonce", nonce)?;

    let p = params.modulus();
    let base_commitment = mod_exp(params.generator(), nonce, p);
    let message_commitment = mod_exp(message, nonce, p);
    let challenge = challenge_from_transcript(
        params,
        &[
            base_power.clone(),
            base_commitment.clone(),
            message.clone(),
            message_power.clone(),
            message_commitment.clone(),
        ],
    );
    let response = (&challenge * exponent + nonce) % params.order();

    Ok(DDHTupleProof {
        base_commitment,
        message_commitment,
        challenge,
        response,
    })
}

impl DDHTupleProof {
    /// Checks the proof against the public tuple `(g, base_power, message, message_power)`.
    pub fn verify(
        &self,
        params: &ModParams,
        message: &BigUint,
        base_power: &BigUint,
        message_power: &BigUint,
    ) -> Result<()> {
        let result = self.check(params, message, base_power, message_power);
        if let Err(ref e) = result {
            log::warn!("DDH tuple proof rejected: {e}");
        }
        result
    }

    fn check(
        &self,
        params: &ModParams,
        message: &BigUint,
        base_power: &BigUint,
        message_power: &BigUint,
    ) -> Result<()> {
        let p = params.modulus();
        let publics = [
            message,
            base_power,
            message_power,
            &self.base_commitment,
            &self.message_commitment,
        ];
        if !publics.iter().all(|value| in_range(params, value)) {
            return Err(ZeusError::verification("public value outside [1, p)"));
        }
        if &self.response >= params.order() {
            return Err(ZeusError::verification("response is not below q"));
        }

        let challenge = challenge_from_transcript(
            params,
            &[
                base_power.clone(),
                self.base_commitment.clone(),
                message.clone(),
                message_power.clone(),
                self.message_commitment.clone(),
            ],
        );
        if challenge != self.challenge {
            return Err(ZeusError::verification("challenge does not match transcript"));
        }

        let base_lhs = mod_exp(params.generator(), &self.response, p);
        let base_rhs = (&self.base_commitment * mod_exp(base_power, &self.challenge, p)) % p;
        if base_lhs != base_rhs {
            return Err(ZeusError::verification(
                "g^response != base_commitment * base_power^challenge",
            ));
        }

        let message_lhs = mod_exp(message, &self.response, p);
        let message_rhs =
            (&self.message_commitment * mod_exp(message_power, &self.challenge, p)) % p;
        if message_lhs != message_rhs {
            return Err(ZeusError::verification(
                "message^response != message_commitment * message_power^challenge",
            ));
        }
        Ok(())
    }
}

fn check_dlog_inputs(
    params: &ModParams,
    power: &BigUint,
    dlog: &BigUint,
    extra: &[BigUint],
) -> Result<()> {
    check_element(params, "power", power)?;
    for value in extra {
        check_element(params, "extra transcript value", value)?;
    }
    check_exponent(params, "discrete log", dlog)
}

fn check_ddh_inputs(
    params: &ModParams,
    message: &BigUint,
    base_power: &BigUint,
    message_power: &BigUint,
    exponent: &BigUint,
) -> Result<()> {
    check_element(params, "message", message)?;
    check_element(params, "base power", base_power)?;
    check_element(params, "message power", message_power)?;
    check_exponent(params, "exponent", exponent)
}

/// Uniform nonce from `[2, q)`. Callers validate their inputs first.
fn draw_nonce(params: &ModParams) -> Result<BigUint> {
    let two = BigUint::from(2u32);
    if params.order() <= &two {
        return Err(ZeusError::InvalidGroupParameters(
            "group order too small to draw a proof nonce".to_string(),
        ));
    }
    Ok(thread_rng().gen_biguint_range(&two, params.order()))
}

fn in_range(params: &ModParams, value: &BigUint) -> bool {
    !value.is_zero() && value < params.modulus()
}

fn check_element(params: &ModParams, name: &str, value: &BigUint) -> Result<()> {
    if in_range(params, value) {
        Ok(())
    } else {
        Err(ZeusError::encoding(format!("{name} is outside [1, p)")))
    }
}

fn check_exponent(params: &ModParams, name: &str, value: &BigUint) -> Result<()> {
    if value < params.order() {
        Ok(())
    } else {
        Err(ZeusError::encoding(format!("{name} is not below q")))
    }
}
