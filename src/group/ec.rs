//! NIST P-256 backend.

use num_bigint::BigUint;
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};

use crate::error::{Result, ZeusError};

use super::Group;

/// Order of the P-256 base point
const P256_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84, 0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63, 0x25, 0x51,
];

/// Byte length of a P-256 field element (one affine coordinate)
const COORDINATE_LEN: usize = 32;

/// [`Group`] over the P-256 curve. Elements are kept in projective coordinates and
/// normalized to affine form only when their coordinates are read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct P256Group {
    order: BigUint,
}

impl Default for P256Group {
    fn default() -> Self {
        Self::new()
    }
}

impl P256Group {
    pub fn new() -> Self {
        P256Group {
            order: BigUint::from_bytes_be(&P256_ORDER),
        }
    }

    /// Affine `(x, y)` coordinates of `point`.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` for the identity, which has no affine representation.
    pub fn affine_coordinates(&self, point: &ProjectivePoint) -> Result<(BigUint, BigUint)> {
        let encoded = point.to_affine().to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Ok((BigUint::from_bytes_be(x), BigUint::from_bytes_be(y))),
            _ => Err(ZeusError::encoding(
                "the point at infinity has no affine coordinates",
            )),
        }
    }

    /// Rebuilds a point from fixed-length big-endian affine coordinates, rejecting
    /// coordinates that do not lie on the curve.
    pub fn point_from_coordinates(&self, x: &[u8], y: &[u8]) -> Result<ProjectivePoint> {
        if x.len() != COORDINATE_LEN || y.len() != COORDINATE_LEN {
            return Err(ZeusError::encoding(format!(
                "curve coordinates must be {COORDINATE_LEN} bytes each"
            )));
        }
        let encoded = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(x),
            FieldBytes::from_slice(y),
            false,
        );
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(ProjectivePoint::from)
            .ok_or_else(|| ZeusError::encoding("coordinates are not a point on P-256"))
    }
}

impl Group for P256Group {
    type Element = ProjectivePoint;
    type Scalar = Scalar;

    fn order(&self) -> &BigUint {
        &self.order
    }

    fn generator(&self) -> ProjectivePoint {
        ProjectivePoint::GENERATOR
    }

    fn mul(&self, a: &ProjectivePoint, b: &ProjectivePoint) -> ProjectivePoint {
        *a + *b
    }

    fn exp(&self, base: &ProjectivePoint, exponent: &Scalar) -> ProjectivePoint {
        *base * exponent
    }

    fn invert(&self, element: &ProjectivePoint) -> ProjectivePoint {
        -*element
    }

    /// P-256 has cofactor 1 and `ProjectivePoint` values can only be built from points
    /// on the curve, so every value is a member.
    fn is_member(&self, _element: &ProjectivePoint) -> bool {
        true
    }

    fn scalar_from_biguint(&self, value: &BigUint) -> Scalar {
        let reduced = (value % &self.order).to_bytes_be();
        let mut bytes = [0u8; COORDINATE_LEN];
        bytes[COORDINATE_LEN - reduced.len()..].copy_from_slice(&reduced);
        <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&bytes))
    }

    fn scalar_to_biguint(&self, scalar: &Scalar) -> BigUint {
        BigUint::from_bytes_be(&scalar.to_bytes())
    }

    fn element_byte_len(&self) -> usize {
        COORDINATE_LEN
    }
}
