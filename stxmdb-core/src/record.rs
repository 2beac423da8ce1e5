//! Dataset records: the unit of storage and query.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::axis::{AxisSummary, EnergyBounds};
use crate::error::{ExtractionError, Result};
use crate::payload::ImagePayload;
use crate::timestamp::parse_compact_timestamp;

/// Fields read from one source file before normalization.
#[derive(Clone, Debug)]
pub struct RawDataset {
    /// Raw image array, any dimensionality.
    pub image: ArrayD<f64>,
    /// Scan-type tag as text.
    pub scan_type: String,
    /// Start time text, empty if not recorded.
    pub start_time: String,
    /// End time text, empty if not recorded.
    pub end_time: String,
    /// X coordinate samples.
    pub sample_x: Vec<f64>,
    /// Y coordinate samples.
    pub sample_y: Vec<f64>,
    /// Energy samples.
    pub energy: Vec<f64>,
}

/// One indexed dataset.
///
/// Times are compact `YYYYMMDDHHMM` integers; `0` means the file did not
/// record that time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Base file name, the lookup key.
    pub name: String,
    /// Root directory of the scan that produced this record.
    pub directory: String,
    /// Full path of the source file.
    pub file_path: String,
    /// Serialized [`ImagePayload`].
    pub image_payload: Vec<u8>,
    pub scan_type: String,
    pub start_time: i64,
    pub end_time: i64,
    pub x_range: i64,
    pub y_range: i64,
    pub x_resolution: u32,
    pub y_resolution: u32,
    pub energy_min: i64,
    pub energy_max: i64,
}

impl DatasetRecord {
    /// Normalizes a raw dataset into a storable record.
    ///
    /// # Errors
    /// Returns the first [`ExtractionError`] hit while normalizing any field.
    pub fn from_raw(
        name: impl Into<String>,
        directory: impl Into<String>,
        file_path: impl Into<String>,
        raw: RawDataset,
    ) -> std::result::Result<Self, ExtractionError> {
        let image_payload = ImagePayload::from_dyn(raw.image)?
            .encode()
            .map_err(|e| ExtractionError::Payload(e.to_string()))?;

        let start_time = parse_compact_timestamp("start_time", &raw.start_time)?.unwrap_or(0);
        let end_time = parse_compact_timestamp("end_time", &raw.end_time)?.unwrap_or(0);

        let x = AxisSummary::from_samples("x", &raw.sample_x)?;
        let y = AxisSummary::from_samples("y", &raw.sample_y)?;
        let energy = EnergyBounds::from_samples(&raw.energy)?;

        Ok(Self {
            name: name.into(),
            directory: directory.into(),
            file_path: file_path.into(),
            image_payload,
            scan_type: raw.scan_type,
            start_time,
            end_time,
            x_range: x.range,
            y_range: y.range,
            x_resolution: x.resolution,
            y_resolution: y.resolution,
            energy_min: energy.min,
            energy_max: energy.max,
        })
    }

    /// Decodes the stored image.
    ///
    /// # Errors
    /// Returns an error if the payload blob is corrupt.
    pub fn image(&self) -> Result<ImagePayload> {
        ImagePayload::decode(&self.image_payload)
    }
}
