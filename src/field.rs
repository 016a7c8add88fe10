//! Field arithmetic utilities
//!
//! This module provides utilities for working with BN254 scalar field
//! elements, including conversion, canonical byte encoding, exponentiation by
//! a field element and the positional encoding used by the inverted index.
//!
//! Key features:
//! - Convert between u64 and field elements
//! - Canonical little-endian byte/hex encoding of scalars
//! - Raise a scalar to the power of another scalar read as a 256-bit integer
//! - Encode `(row, col)` positions into a single integer and back

use crate::error::{ProtocolError, Result};
use ff::PrimeField;
use halo2curves::bn256::Fr as Field;
use serde::{Deserialize, Serialize};

/// Field element utilities
///
/// Provides static methods for common scalar operations used by the
/// commitment and accumulator schemes.
pub struct FieldUtils;

impl FieldUtils {
    /// Convert field element to u64 (if possible)
    ///
    /// Returns `None` if the field element is too large to fit in a u64.
    pub fn to_u64(field: &Field) -> Option<u64> {
        let bytes = Self::to_bytes(field);

        // Check if upper bytes are zero (field value fits in u64)
        if bytes[8..].iter().any(|&b| b != 0) {
            return None;
        }

        let mut low = [0u8; 8];
        low.copy_from_slice(&bytes[..8]);
        Some(u64::from_le_bytes(low))
    }

    /// Canonical little-endian encoding of a field element
    pub fn to_bytes(field: &Field) -> [u8; 32] {
        let repr = field.to_repr();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(repr.as_ref());
        bytes
    }

    /// Decode a canonical little-endian encoding
    ///
    /// # Returns
    /// `Err(InvalidEncoding)` for non-canonical input
    pub fn from_bytes(bytes: &[u8]) -> Result<Field> {
        let mut repr = <Field as PrimeField>::Repr::default();
        if bytes.len() != repr.as_ref().len() {
            return Err(ProtocolError::InvalidEncoding(format!(
                "scalar must be {} bytes, got {}",
                repr.as_ref().len(),
                bytes.len()
            )));
        }
        repr.as_mut().copy_from_slice(bytes);
        Option::from(Field::from_repr(repr))
            .ok_or_else(|| ProtocolError::InvalidEncoding("non-canonical scalar".to_string()))
    }

    /// Hex encoding of [`FieldUtils::to_bytes`]
    pub fn to_hex(field: &Field) -> String {
        hex::encode(Self::to_bytes(field))
    }

    /// Inverse of [`FieldUtils::to_hex`]
    pub fn from_hex(hex_str: &str) -> Result<Field> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ProtocolError::InvalidEncoding(format!("bad hex scalar: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Little-endian u64 limbs of the canonical integer representative
    pub fn to_limbs(field: &Field) -> [u64; 4] {
        let bytes = Self::to_bytes(field);
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(word);
        }
        limbs
    }

    /// Compute `base^exponent`, reading `exponent` as its integer representative
    ///
    /// The aggregation accumulator uses dataset values as exponents, so a
    /// value `v` contributes the monomial `s^v` rather than a coefficient.
    ///
    /// # Example
    /// ```
    /// use attested_query::field::FieldUtils;
    /// use halo2curves::bn256::Fr;
    ///
    /// let x = FieldUtils::pow(&Fr::from(3u64), &Fr::from(4u64));
    /// assert_eq!(x, Fr::from(81u64));
    /// ```
    pub fn pow(base: &Field, exponent: &Field) -> Field {
        ff::Field::pow_vartime(base, Self::to_limbs(exponent))
    }
}

/// A `(row, col)` pair folded into one integer
///
/// Uses the pairing `a ≥ b ⇒ a² + a + b`, else `a + b²`, a bijection between
/// pairs of non-negative integers and non-negative integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncodedPosition(pub u64);

impl EncodedPosition {
    /// Encode a `(row, col)` pair
    ///
    /// # Returns
    /// `Err(PositionOverflow)` when the encoding does not fit in a u64
    ///
    /// # Example
    /// ```
    /// use attested_query::field::EncodedPosition;
    ///
    /// let p = EncodedPosition::encode(2, 0).unwrap();
    /// assert_eq!(p.0, 6);
    /// assert_eq!(p.decode(), (2, 0));
    /// ```
    pub fn encode(row: u64, col: u64) -> Result<Self> {
        let overflow = || ProtocolError::PositionOverflow { row, col };
        let value = if row >= col {
            row.checked_mul(row)
                .and_then(|sq| sq.checked_add(row))
                .and_then(|v| v.checked_add(col))
        } else {
            col.checked_mul(col).and_then(|sq| sq.checked_add(row))
        };
        value.map(EncodedPosition).ok_or_else(overflow)
    }

    /// Recover the `(row, col)` pair
    pub fn decode(&self) -> (u64, u64) {
        let z = self.0;
        let s = isqrt(z);
        let rem = z - s * s;
        if rem >= s {
            (s, rem - s)
        } else {
            (rem, s)
        }
    }

    /// The position as a scalar, for accumulation
    pub fn to_scalar(&self) -> Field {
        Field::from(self.0)
    }
}

/// Floor of the square root of `z`
fn isqrt(z: u64) -> u64 {
    let mut s = (z as f64).sqrt() as u64;
    while (s as u128) * (s as u128) > z as u128 {
        s -= 1;
    }
    while ((s + 1) as u128) * ((s + 1) as u128) <= z as u128 {
        s += 1;
    }
    s
}
