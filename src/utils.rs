//! Utility functions for cryptographic operations

use crate::error::{Result, ZeusError};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

/// Modular exponentiation: base^exp mod modulus
pub fn mod_exp(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Miller-Rabin primality test
pub fn is_probable_prime(n: &BigUint, k: usize) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let mut rng = thread_rng();
    let n_minus_1 = n - BigUint::one();
    let (s, d) = factor_powers_of_two(&n_minus_1);

    'witness: for _ in 0..k {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 1..s {
            x = mod_exp(&x, &two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Factor out powers of 2 from n
pub fn factor_powers_of_two(n: &BigUint) -> (u64, BigUint) {
    let mut s = 0;
    let mut d = n.clone();

    while !d.is_zero() && d.is_even() {
        d >>= 1;
        s += 1;
    }

    (s, d)
}

/// Draws an integer in `[0, bound)` from `bits(bound) + stat_dist` uniform bits.
///
/// The distribution is within statistical distance `2^-stat_dist` of uniform.
pub fn random_below<R: Rng + ?Sized>(rng: &mut R, bound: &BigUint, stat_dist: u32) -> BigUint {
    let bits = bound.bits() + u64::from(stat_dist);
    rng.gen_biguint(bits) % bound
}

/// Number of bytes needed to hold any integer below `bound`
pub fn byte_length(bound: &BigUint) -> usize {
    // `bits()` of a usable modulus is far below usize::MAX
    ((bound.bits() + 7) / 8) as usize
}

/// Lowercase big-endian hex, left-padded to `byte_len` bytes
pub fn to_fixed_hex(value: &BigUint, byte_len: usize) -> String {
    format!("{:0width$x}", value, width = byte_len * 2)
}

/// Big-endian integer `value` as exactly `byte_len` bytes
pub fn to_fixed_bytes(value: &BigUint, byte_len: usize) -> Result<Vec<u8>> {
    let raw = value.to_bytes_be();
    // `to_bytes_be` of zero is a single zero byte
    let raw: &[u8] = if value.is_zero() { &[] } else { &raw };
    if raw.len() > byte_len {
        return Err(ZeusError::encoding(format!(
            "value needs {} bytes, only {} available",
            raw.len(),
            byte_len
        )));
    }
    let mut bytes = vec![0u8; byte_len - raw.len()];
    bytes.extend_from_slice(raw);
    Ok(bytes)
}

/// Parses hex of at most `byte_len` bytes into a big-endian integer.
///
/// Shorter (unpadded) strings are accepted; empty, overlong and non-hex input is rejected.
pub fn biguint_from_hex(s: &str, byte_len: usize) -> Result<BigUint> {
    if s.is_empty() {
        return Err(ZeusError::encoding("empty hex string"));
    }
    if s.len() > byte_len * 2 {
        return Err(ZeusError::encoding(format!(
            "hex string of {} digits exceeds {} bytes",
            s.len(),
            byte_len
        )));
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ZeusError::encoding(format!("not a hex string: {s:?}")));
    }
    BigUint::parse_bytes(s.as_bytes(), 16)
        .ok_or_else(|| ZeusError::encoding(format!("not a hex string: {s:?}")))
}

/// Parses hex into exactly `byte_len` big-endian bytes
pub fn bytes_from_hex(s: &str, byte_len: usize) -> Result<Vec<u8>> {
    let value = biguint_from_hex(s, byte_len)?;
    to_fixed_bytes(&value, byte_len)
}

/// SHA-256 over the concatenation of `parts`, as a lowercase hex digest
pub fn sha256<I, P>(parts: I) -> String
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    hex::encode(hasher.finalize())
}
