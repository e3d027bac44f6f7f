//! Order-`q` subgroup of the multiplicative group `Z*_p`.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Result, ZeusError};
use crate::utils::{byte_length, is_probable_prime, mod_exp, to_fixed_bytes};

use super::Group;

/// Miller-Rabin rounds used when validating a caller-supplied group order
const PRIMALITY_TEST_ROUNDS: usize = 16;

const ZEUS_MODULUS: &str = "9decdda7acdef3b3b7f2742887635785a12a3ce10183ffe882573830b28b7939e3feec0c2a850b88e96754ee46edf4b858b19c9587a7a29e72d6c4583478d4ee377a6111eb2a651d8ef9994c2fbb7a2343ec3fa7ef16317ebacd64d8cbd7ebdf3f68e7f63e606854aa609538a25818b8b661032e3ce8c5a1657d82e90d2249d3af079e7de9bf37e0911d6a9d396e2dda3a7793f0ba5ce0beb1f70fc1b5c8726805471028e176fb6ec4f9ce590e4a4506584248157ec44c36fd35d73871efbd8cf59d22dbeda34acb008dc303b1252c428fc6b8231f1bfdba3119e9743ea6f43ace51e347e13d18b1f5fd54c2846781a85290450ef9e37503d30d03315d569c73";
const ZEUS_ORDER: &str = "4ef66ed3d66f79d9dbf93a1443b1abc2d0951e7080c1fff4412b9c185945bc9cf1ff7606154285c474b3aa772376fa5c2c58ce4ac3d3d14f396b622c1a3c6a771bbd3088f595328ec77ccca617ddbd11a1f61fd3f78b18bf5d66b26c65ebf5ef9fb473fb1f30342a55304a9c512c0c5c5b3081971e7462d0b2bec174869124e9d783cf3ef4df9bf0488eb54e9cb716ed1d3bc9f85d2e705f58fb87e0dae4393402a3881470bb7db7627ce72c872522832c21240abf62261b7e9aeb9c38f7dec67ace916df6d1a5658046e181d892962147e35c118f8dfedd188cf4ba1f537a1d6728f1a3f09e8c58fafeaa614233c0d4294822877cf1ba81e9868198aeab4e39";
const ZEUS_GENERATOR: &str = "97d518e0f381ba1a990d70e4349d2affa2663fa85bde092507b827113607767053fe01f3432f1aa976824f1e8990ceb2349c5cb124535c0a0b32f65ab9009e95f4012820178483644b282134666ca71e62eaadeb8b80cccd0a690feca69c292036d6c2ab642e4a6ddc529ca687e16c48492e470ee82de4622235e5dd511eb86162fc700e53da42f27ddf640d4f15de7bf34bbd4107531f8448c2e1dca378e553801152ba96b5bb0fb716575a8c0a88b13ea74b53816a13fad7d1c1c6a822793922fe0eefc78463bea9465d745ba5ee35f1e72b95a076c20f6bbf26e93f8a8974db253f8d6519cb61474ffba95f2c749f1ccf93562983306437ac492dc22f8d77";

fn hex_constant(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("hard-coded hex constant")
}

/// Parameters `(p, q, g)` of an order-`q` subgroup of `Z*_p` generated by `g`.
///
/// Instances can only be obtained through [`ModParams::new()`] (or the hard-coded
/// [`ModParams::zeus()`]), so every `ModParams` value is consistent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModParams {
    modulus: BigUint,
    order: BigUint,
    generator: BigUint,
}

impl ModParams {
    /// Validates and wraps `(p, q, g)`.
    ///
    /// # Errors
    ///
    /// `InvalidGroupParameters` unless `p > 3`, `q` is a (probable) prime dividing `p - 1`,
    /// `1 < g < p` and `g^q ≡ 1 (mod p)`, i.e. `g` has order exactly `q`.
    pub fn new(modulus: BigUint, order: BigUint, generator: BigUint) -> Result<Self> {
        let invalid = |msg: &str| Err(ZeusError::InvalidGroupParameters(msg.to_string()));

        if modulus <= BigUint::from(3u32) {
            return invalid("modulus p must be > 3");
        }
        if order <= BigUint::one() || !((&modulus - 1u32) % &order).is_zero() {
            return invalid("order q must be > 1 and divide p - 1");
        }
        if generator <= BigUint::one() || generator >= modulus {
            return invalid("generator g must be in range (1, p)");
        }
        if !mod_exp(&generator, &order, &modulus).is_one() {
            return invalid("generator g does not have order q");
        }
        if !is_probable_prime(&order, PRIMALITY_TEST_ROUNDS) {
            return invalid("order q is not prime");
        }

        log::debug!(
            "validated mod-p group parameters ({}-bit modulus, {}-bit order)",
            modulus.bits(),
            order.bits()
        );
        Ok(ModParams {
            modulus,
            order,
            generator,
        })
    }

    /// Parses and validates hex-encoded `(p, q, g)`.
    pub fn from_hex(modulus: &str, order: &str, generator: &str) -> Result<Self> {
        let parse = |name: &str, hex: &str| {
            BigUint::parse_bytes(hex.as_bytes(), 16)
                .ok_or_else(|| ZeusError::encoding(format!("{name} is not a hex string")))
        };
        Self::new(
            parse("modulus", modulus)?,
            parse("order", order)?,
            parse("generator", generator)?,
        )
    }

    /// The 2048-bit safe-prime group used by Zeus deployments.
    pub fn zeus() -> Self {
        ModParams {
            modulus: hex_constant(ZEUS_MODULUS),
            order: hex_constant(ZEUS_ORDER),
            generator: hex_constant(ZEUS_GENERATOR),
        }
    }

    /// Get the prime modulus p
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Get the subgroup order q
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Get the generator g
    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// Whether `p = 2q + 1`, so that the group is the quadratic residues mod `p`
    pub fn is_safe_prime(&self) -> bool {
        self.modulus == &self.order * 2u32 + 1u32
    }
}

/// [`Group`] over `Z*_p`: elements are residues in `[1, p)`, scalars are integers in `[0, q)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModPGroup {
    params: ModParams,
    byte_len: usize,
}

impl ModPGroup {
    pub fn new(params: ModParams) -> Self {
        let byte_len = byte_length(params.modulus());
        ModPGroup { params, byte_len }
    }

    /// Group over the [`ModParams::zeus()`] parameters.
    pub fn zeus() -> Self {
        Self::new(ModParams::zeus())
    }

    pub fn params(&self) -> &ModParams {
        &self.params
    }

    pub fn modulus(&self) -> &BigUint {
        self.params.modulus()
    }

    /// Encodes a member as exactly [`Group::element_byte_len()`] big-endian bytes.
    pub fn element_to_bytes(&self, element: &BigUint) -> Result<Vec<u8>> {
        to_fixed_bytes(element, self.byte_len)
    }

    /// Decodes a fixed-length big-endian encoding, rejecting anything that is not
    /// a member of the order-`q` subgroup.
    pub fn element_from_bytes(&self, bytes: &[u8]) -> Result<BigUint> {
        if bytes.len() != self.byte_len {
            return Err(ZeusError::encoding(format!(
                "expected {} bytes, got {}",
                self.byte_len,
                bytes.len()
            )));
        }
        let element = BigUint::from_bytes_be(bytes);
        if !self.is_member(&element) {
            return Err(ZeusError::encoding("value is not a member of the group"));
        }
        Ok(element)
    }

    /// Maps an integer plaintext `value < q` into the group, as Zeus does before
    /// encryption: `value + 1` if it is a quadratic residue, `p - (value + 1)` otherwise.
    ///
    /// # Errors
    ///
    /// `InvalidGroupParameters` if the group is not a safe-prime group,
    /// `PlaintextTooLarge` if `value + 1 > q`.
    pub fn encode_plaintext(&self, value: &BigUint) -> Result<BigUint> {
        self.require_safe_prime()?;
        let shifted = value + 1u32;
        if &shifted > self.order() {
            return Err(ZeusError::PlaintextTooLarge);
        }
        // Euler's criterion, as (p - 1) / 2 = q
        if mod_exp(&shifted, self.order(), self.modulus()).is_one() {
            Ok(shifted)
        } else {
            Ok(self.modulus() - shifted)
        }
    }

    /// Inverse of [`Self::encode_plaintext()`].
    pub fn decode_plaintext(&self, element: &BigUint) -> Result<BigUint> {
        self.require_safe_prime()?;
        if !self.is_member(element) {
            return Err(ZeusError::encoding("value is not a member of the group"));
        }
        let shifted = if element > self.order() {
            self.modulus() - element
        } else {
            element.clone()
        };
        Ok(shifted - 1u32)
    }

    fn require_safe_prime(&self) -> Result<()> {
        if self.params.is_safe_prime() {
            Ok(())
        } else {
            Err(ZeusError::InvalidGroupParameters(
                "plaintext encoding requires a safe-prime group (p = 2q + 1)".to_string(),
            ))
        }
    }
}

impl Group for ModPGroup {
    type Element = BigUint;
    type Scalar = BigUint;

    fn order(&self) -> &BigUint {
        self.params.order()
    }

    fn generator(&self) -> BigUint {
        self.params.generator().clone()
    }

    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % self.modulus()
    }

    fn exp(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        mod_exp(base, exponent, self.modulus())
    }

    /// Inverse of a subgroup member, `a^(q-1)`. Only meaningful for members.
    fn invert(&self, element: &BigUint) -> BigUint {
        mod_exp(element, &(self.order() - 1u32), self.modulus())
    }

    fn is_member(&self, element: &BigUint) -> bool {
        !element.is_zero()
            && element < self.modulus()
            && mod_exp(element, self.order(), self.modulus()).is_one()
    }

    fn scalar_from_biguint(&self, value: &BigUint) -> BigUint {
        value % self.order()
    }

    fn scalar_to_biguint(&self, scalar: &BigUint) -> BigUint {
        scalar.clone()
    }

    fn element_byte_len(&self) -> usize {
        self.byte_len
    }
}
