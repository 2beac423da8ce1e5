//! Indexer configuration.
//!
//! The defaults match the layout written by the STXM acquisition software;
//! a JSON file can override any subset of them:
//!
//! ```json
//! {
//!   "suffix": ".hdf5",
//!   "layout": { "counter": "counter1" }
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Dataset paths inside one STXM file.
///
/// `image`, `scan_type`, `sample_x`, `sample_y` and `energy` live under
/// `entry/counter`; `start_time` and `end_time` live directly under `entry`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StxmLayout {
    pub entry: String,
    pub counter: String,
    pub image: String,
    pub scan_type: String,
    pub start_time: String,
    pub end_time: String,
    pub sample_x: String,
    pub sample_y: String,
    pub energy: String,
}

impl Default for StxmLayout {
    fn default() -> Self {
        Self {
            entry: "entry0".to_string(),
            counter: "counter0".to_string(),
            image: "data".to_string(),
            scan_type: "stxm_scan_type".to_string(),
            start_time: "start_time".to_string(),
            end_time: "end_time".to_string(),
            sample_x: "sample_x".to_string(),
            sample_y: "sample_y".to_string(),
            energy: "energy".to_string(),
        }
    }
}

impl StxmLayout {
    fn names(&self) -> [(&'static str, &str); 9] {
        [
            ("entry", self.entry.as_str()),
            ("counter", self.counter.as_str()),
            ("image", self.image.as_str()),
            ("scan_type", self.scan_type.as_str()),
            ("start_time", self.start_time.as_str()),
            ("end_time", self.end_time.as_str()),
            ("sample_x", self.sample_x.as_str()),
            ("sample_y", self.sample_y.as_str()),
            ("energy", self.energy.as_str()),
        ]
    }
}

/// Settings for one indexer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Case-sensitive file name suffix identifying candidate files.
    pub suffix: String,
    pub layout: StxmLayout,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            suffix: ".hdf5".to_string(),
            layout: StxmLayout::default(),
        }
    }
}

impl IndexerConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON cannot be parsed or validated.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty suffixes and empty or nested dataset names.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] naming the offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.suffix.is_empty() {
            return Err(Error::InvalidFormat("suffix must not be empty".to_string()));
        }
        for (key, name) in self.layout.names() {
            if name.is_empty() || name.contains('/') {
                return Err(Error::InvalidFormat(format!(
                    "layout.{key} must be a single non-empty name, got {name:?}"
                )));
            }
        }
        Ok(())
    }
}
