//! Random sampling
//!
//! This module provides utilities for sampling scalars and group elements
//! from the operating system RNG.

use crate::error::{ProtocolError, Result};
use ff::Field as _;
use group::{Curve, Group};
use halo2curves::bn256::{Fr as Field, G1Affine, G2Affine, G1, G2};
use rand_core::OsRng;

/// Random number generation utilities
pub struct RandomUtils;

impl RandomUtils {
    /// Generate random field element
    pub fn generate_field() -> Field {
        Field::random(OsRng)
    }

    /// Generate a random trapdoor
    ///
    /// Trapdoors equal to 0 or 1 make the quotient identities of the
    /// accumulators undefined. Such a draw is reported instead of silently
    /// retried, so the caller restarts key generation.
    ///
    /// # Returns
    /// `Err(DegenerateTrapdoor)` if the sample is 0 or 1
    pub fn generate_trapdoor() -> Result<Field> {
        Self::check_trapdoor(Self::generate_field())
    }

    /// Reject the two degenerate trapdoor values
    pub fn check_trapdoor(trapdoor: Field) -> Result<Field> {
        if trapdoor == Field::ZERO || trapdoor == Field::ONE {
            return Err(ProtocolError::DegenerateTrapdoor);
        }
        Ok(trapdoor)
    }

    /// Generate a random G1 generator
    pub fn generate_g1() -> G1Affine {
        loop {
            let point = G1::random(OsRng);
            if !bool::from(point.is_identity()) {
                return point.to_affine();
            }
        }
    }

    /// Generate a random G2 generator
    pub fn generate_g2() -> G2Affine {
        loop {
            let point = G2::random(OsRng);
            if !bool::from(point.is_identity()) {
                return point.to_affine();
            }
        }
    }
}
