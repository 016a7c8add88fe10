//! Serde helpers for curve points and scalars
//!
//! Scalars are stored as hex of their canonical little-endian bytes and
//! points as hex of their compressed encoding, so persisted records stay
//! readable in JSON and compact in bincode.

use crate::error::{ProtocolError, Result};
use group::GroupEncoding;

/// Hex-encode a point's compressed form
pub fn point_to_hex<P: GroupEncoding>(point: &P) -> String {
    hex::encode(point.to_bytes().as_ref())
}

/// Decode a point from hex, rejecting bytes that are not on the curve
pub fn point_from_hex<P: GroupEncoding>(hex_str: &str) -> Result<P> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| ProtocolError::InvalidEncoding(format!("bad hex point: {}", e)))?;
    let mut repr = P::Repr::default();
    if repr.as_ref().len() != bytes.len() {
        return Err(ProtocolError::InvalidEncoding(format!(
            "point must be {} bytes, got {}",
            repr.as_ref().len(),
            bytes.len()
        )));
    }
    repr.as_mut().copy_from_slice(&bytes);
    Option::from(P::from_bytes(&repr))
        .ok_or_else(|| ProtocolError::InvalidEncoding("bytes are not a valid point".to_string()))
}

/// Serialization helper for a single point
pub mod point_serde {
    use super::{point_from_hex, point_to_hex};
    use group::GroupEncoding;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<P, S>(point: &P, serializer: S) -> Result<S::Ok, S::Error>
    where
        P: GroupEncoding,
        S: Serializer,
    {
        serializer.serialize_str(&point_to_hex(point))
    }

    pub fn deserialize<'de, P, D>(deserializer: D) -> Result<P, D::Error>
    where
        P: GroupEncoding,
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        point_from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Serialization helper for point vectors
pub mod point_vec_serde {
    use super::{point_from_hex, point_to_hex};
    use group::GroupEncoding;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<P, S>(points: &[P], serializer: S) -> Result<S::Ok, S::Error>
    where
        P: GroupEncoding,
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(points.len()))?;
        for point in points {
            seq.serialize_element(&point_to_hex(point))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, P, D>(deserializer: D) -> Result<Vec<P>, D::Error>
    where
        P: GroupEncoding,
        D: Deserializer<'de>,
    {
        let hex_strs = Vec::<String>::deserialize(deserializer)?;
        hex_strs
            .iter()
            .map(|s| point_from_hex(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Serialization helper for a single scalar
pub mod scalar_serde {
    use crate::field::FieldUtils;
    use halo2curves::bn256::Fr as Field;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(field: &Field, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&FieldUtils::to_hex(field))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Field, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        FieldUtils::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Serialization helper for scalar vectors
pub mod scalar_vec_serde {
    use crate::field::FieldUtils;
    use halo2curves::bn256::Fr as Field;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(fields: &[Field], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(fields.len()))?;
        for field in fields {
            seq.serialize_element(&FieldUtils::to_hex(field))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Field>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_strs = Vec::<String>::deserialize(deserializer)?;
        hex_strs
            .iter()
            .map(|s| FieldUtils::from_hex(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PairingContext;
    use halo2curves::bn256::{Fr, G1Affine, G2Affine};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "point_serde")]
        g1: G1Affine,
        #[serde(with = "point_vec_serde")]
        g2s: Vec<G2Affine>,
        #[serde(with = "scalar_serde")]
        x: Fr,
        #[serde(with = "scalar_vec_serde")]
        xs: Vec<Fr>,
    }

    #[test]
    fn test_point_hex_roundtrip() {
        let ctx = PairingContext::new();
        let p = ctx.random_g1();
        let back: G1Affine = point_from_hex(&point_to_hex(&p)).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn test_point_from_hex_rejects_garbage() {
        assert!(point_from_hex::<G1Affine>("zz").is_err());
        assert!(point_from_hex::<G1Affine>("00").is_err());
    }

    #[test]
    fn test_serde_helpers_json() {
        let ctx = PairingContext::new();
        let sample = Sample {
            g1: ctx.random_g1(),
            g2s: vec![ctx.random_g2(), ctx.random_g2()],
            x: Fr::from(9u64),
            xs: vec![Fr::from(1u64), Fr::from(2u64)],
        };
        let json = serde_json::to_string(&sample).unwrap();
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(back.g1, sample.g1);
        assert_eq!(back.g2s, sample.g2s);
        assert_eq!(back.x, sample.x);
        assert_eq!(back.xs, sample.xs);
    }
}
