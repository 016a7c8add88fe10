//! Setup storage layer
//!
//! This module persists setup output to disk and loads it back, either as
//! pretty-printed JSON or as compact bincode. Group elements are stored as
//! hex-encoded compressed points in both formats.
//!
//! # Example
//!
//! ```rust
//! use attested_query::crypto::PairingContext;
//! use attested_query::database::{SetupStorage, StorageFormat};
//! use attested_query::proof::{PublicSetup, Setup};
//! use attested_query::types::Dataset;
//!
//! let ctx = PairingContext::new();
//! let dataset = Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1]]).unwrap();
//! let record = Setup::run(&ctx, &dataset, 0).unwrap();
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("public.json");
//!
//! let storage = SetupStorage::new(StorageFormat::Json);
//! storage.save_public(&record.public(), &path).unwrap();
//! let loaded: PublicSetup = storage.load_public(&path).unwrap();
//! assert_eq!(loaded.committed_index.digest, record.committed_index.digest);
//! ```

use crate::error::Result;
use crate::proof::{PublicSetup, SetupRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// Pretty-printed JSON
    #[default]
    Json,

    /// bincode, standard configuration
    Binary,
}

impl StorageFormat {
    /// Guess the format from a file extension, defaulting to JSON
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("bin") | Some("bincode") => StorageFormat::Binary,
            _ => StorageFormat::Json,
        }
    }
}

/// Setup storage
///
/// Provides methods for saving and loading setup records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupStorage {
    format: StorageFormat,
}

impl SetupStorage {
    /// Create a storage instance writing `format`
    pub fn new(format: StorageFormat) -> Self {
        Self { format }
    }

    /// Save the prover's setup record
    ///
    /// # Arguments
    /// * `record` - Setup record to save
    /// * `path` - File path to save to
    pub fn save_record<P: AsRef<Path>>(&self, record: &SetupRecord, path: P) -> Result<()> {
        self.save(record, path)
    }

    /// Load a prover's setup record
    pub fn load_record<P: AsRef<Path>>(&self, path: P) -> Result<SetupRecord> {
        self.load(path)
    }

    /// Save the verifier's public setup
    pub fn save_public<P: AsRef<Path>>(&self, public: &PublicSetup, path: P) -> Result<()> {
        self.save(public, path)
    }

    /// Load a verifier's public setup
    pub fn load_public<P: AsRef<Path>>(&self, path: P) -> Result<PublicSetup> {
        self.load(path)
    }

    /// Serialize `value` to `path`
    pub fn save<T: Serialize, P: AsRef<Path>>(&self, value: &T, path: P) -> Result<()> {
        let bytes = match self.format {
            StorageFormat::Json => serde_json::to_vec_pretty(value)?,
            StorageFormat::Binary => {
                bincode::serde::encode_to_vec(value, bincode::config::standard())?
            }
        };
        fs::write(path.as_ref(), &bytes)?;
        log::debug!(
            "wrote {} bytes to {}",
            bytes.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Deserialize a value from `path`
    pub fn load<T: DeserializeOwned, P: AsRef<Path>>(&self, path: P) -> Result<T> {
        let bytes = fs::read(path.as_ref())?;
        let value = match self.format {
            StorageFormat::Json => serde_json::from_slice(&bytes)?,
            StorageFormat::Binary => {
                let (value, _) =
                    bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
                value
            }
        };
        log::debug!("loaded {}", path.as_ref().display());
        Ok(value)
    }
}
