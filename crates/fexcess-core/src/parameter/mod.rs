//! Parameter records and their (de)serialization.
use crate::errors::{FexError, FexResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A model record with an arbitrary identifier.
///
/// The fields of the model record are flattened into the record,
/// so that a JSON file reads
/// ```json
/// [{"identifier": "water", "temperature_boyle": 1408.4, ...}]
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Record<M> {
    pub identifier: String,
    #[serde(flatten)]
    pub model_record: M,
}

impl<M> Record<M> {
    /// Create a new `Record`.
    pub fn new<S: Into<String>>(identifier: S, model_record: M) -> Self {
        Self {
            identifier: identifier.into(),
            model_record,
        }
    }
}

impl<M: DeserializeOwned> Record<M> {
    /// Read all records contained in a JSON file.
    pub fn from_json_all<P: AsRef<Path>>(file: P) -> FexResult<Vec<Self>> {
        let reader = BufReader::new(File::open(file)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read the record with the given identifier from a JSON file.
    pub fn from_json<P: AsRef<Path>>(file: P, identifier: &str) -> FexResult<Self> {
        Self::from_json_all(file)?
            .into_iter()
            .find(|r| r.identifier == identifier)
            .ok_or_else(|| FexError::RecordNotFound(identifier.to_string()))
    }
}

impl<M: std::fmt::Display> std::fmt::Display for Record<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record(identifier={}, {})", self.identifier, self.model_record)
    }
}
