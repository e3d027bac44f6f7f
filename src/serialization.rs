//! Hex wire format for keys and ciphertexts
//!
//! All values are lowercase, big-endian and left-padded to the byte length of the group
//! modulus (elements) or order (scalars). Decoders accept shorter unpadded input but reject
//! empty, overlong and non-hex strings, and anything that does not decode to a group member
//! or a scalar below the group order.

use p256::ProjectivePoint;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::group::{Group, ModPGroup, P256Group};
use crate::keys::{PrivateKey, PublicKey};
use crate::types::Ciphertext;
use crate::utils::{biguint_from_hex, bytes_from_hex, to_fixed_hex};

/// Mod-p ciphertext on the wire
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedCipher {
    pub alpha: String,
    pub beta: String,
}

/// EC ciphertext on the wire, each component as affine `[x, y]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEcCipher {
    pub alpha: [String; 2],
    pub beta: [String; 2],
}

pub fn sk_to_hex<G: Group>(group: &G, private_key: &PrivateKey<G>) -> String {
    to_fixed_hex(
        &group.scalar_to_biguint(private_key.secret()),
        group.scalar_byte_len(),
    )
}

/// Parses a private key, rejecting values that are not below the group order.
pub fn sk_from_hex<G: Group>(hex: &str, group: &G) -> Result<PrivateKey<G>> {
    let value = biguint_from_hex(hex, group.scalar_byte_len())?;
    PrivateKey::new(group, &value)
}

/// Hex of the public component `g^x`
pub fn pk_to_hex(group: &ModPGroup, public_key: &PublicKey<ModPGroup>) -> String {
    to_fixed_hex(public_key.public_component(), group.element_byte_len())
}

pub fn pk_from_hex(hex: &str, group: &ModPGroup) -> Result<PublicKey<ModPGroup>> {
    let h = element_from_hex(hex, group)?;
    Ok(PublicKey::new(group.generator(), h))
}

/// Affine `(x, y)` hex of the public component `g^x`
pub fn pk_to_hex_ec(
    group: &P256Group,
    public_key: &PublicKey<P256Group>,
) -> Result<(String, String)> {
    let [x, y] = point_to_hex(group, public_key.public_component())?;
    Ok((x, y))
}

pub fn pk_from_hex_ec(x: &str, y: &str, group: &P256Group) -> Result<PublicKey<P256Group>> {
    let h = point_from_hex(group, x, y)?;
    Ok(PublicKey::new(group.generator(), h))
}

pub fn serialize_cipher(group: &ModPGroup, ciphertext: &Ciphertext<ModPGroup>) -> SerializedCipher {
    let byte_len = group.element_byte_len();
    SerializedCipher {
        alpha: to_fixed_hex(ciphertext.alpha(), byte_len),
        beta: to_fixed_hex(ciphertext.beta(), byte_len),
    }
}

pub fn deserialize_cipher(
    group: &ModPGroup,
    serialized: &SerializedCipher,
) -> Result<Ciphertext<ModPGroup>> {
    Ok(Ciphertext::new(
        element_from_hex(&serialized.alpha, group)?,
        element_from_hex(&serialized.beta, group)?,
    ))
}

/// # Errors
///
/// `InvalidEncoding` if a component is the point at infinity.
pub fn serialize_cipher_ec(
    group: &P256Group,
    ciphertext: &Ciphertext<P256Group>,
) -> Result<SerializedEcCipher> {
    Ok(SerializedEcCipher {
        alpha: point_to_hex(group, ciphertext.alpha())?,
        beta: point_to_hex(group, ciphertext.beta())?,
    })
}

pub fn deserialize_cipher_ec(
    group: &P256Group,
    serialized: &SerializedEcCipher,
) -> Result<Ciphertext<P256Group>> {
    let [alpha_x, alpha_y] = &serialized.alpha;
    let [beta_x, beta_y] = &serialized.beta;
    Ok(Ciphertext::new(
        point_from_hex(group, alpha_x, alpha_y)?,
        point_from_hex(group, beta_x, beta_y)?,
    ))
}

fn element_from_hex(hex: &str, group: &ModPGroup) -> Result<num_bigint::BigUint> {
    let bytes = bytes_from_hex(hex, group.element_byte_len())?;
    group.element_from_bytes(&bytes)
}

fn point_to_hex(group: &P256Group, point: &ProjectivePoint) -> Result<[String; 2]> {
    let (x, y) = group.affine_coordinates(point)?;
    let byte_len = group.element_byte_len();
    Ok([to_fixed_hex(&x, byte_len), to_fixed_hex(&y, byte_len)])
}

fn point_from_hex(group: &P256Group, x: &str, y: &str) -> Result<ProjectivePoint> {
    let byte_len = group.element_byte_len();
    group.point_from_coordinates(&bytes_from_hex(x, byte_len)?, &bytes_from_hex(y, byte_len)?)
}
