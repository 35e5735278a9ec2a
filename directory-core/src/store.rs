//! The immutable in-memory record store.
//!
//! The store is built once at startup and shared by reference. It hands out
//! only shared slices, so nothing downstream can mutate a record.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::company::Company;

/// Errors raised while loading the dataset.
#[derive(Debug)]
pub enum StoreError {
    /// The dataset file could not be read.
    Io(std::io::Error),
    /// The dataset is not a JSON array of company records.
    Parse(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read dataset: {}", e),
            Self::Parse(e) => write!(f, "failed to parse dataset: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Ordered, read-only collection of company records.
///
/// Cloning is cheap: clones share the same backing slice.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Arc<[Company]>,
}

impl RecordStore {
    pub fn new(records: Vec<Company>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Parse a JSON array of company records.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let records: Vec<Company> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Load the dataset file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Records in their original load order.
    pub fn records(&self) -> &[Company] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
