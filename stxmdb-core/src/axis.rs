//! Spatial axis and energy summaries.
#![allow(clippy::cast_possible_truncation)]

use crate::error::ExtractionError;

/// Extent and sample count along one spatial axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisSummary {
    /// Number of samples along the axis.
    pub resolution: u32,
    /// `|last - first|` coordinate, truncated toward zero.
    pub range: i64,
}

impl AxisSummary {
    /// Summarizes a coordinate sample array.
    ///
    /// A single-sample axis has resolution 1 and is measured against an
    /// implicit trailing coordinate of 0.
    ///
    /// # Errors
    /// Returns an error for an empty array or a non-finite endpoint.
    pub fn from_samples(axis: &'static str, samples: &[f64]) -> Result<Self, ExtractionError> {
        let (first, last, resolution) = match samples {
            [] => return Err(ExtractionError::EmptyAxis { axis }),
            [only] => (*only, 0.0, 1),
            [first, .., last] => (*first, *last, samples.len()),
        };

        if !first.is_finite() || !last.is_finite() {
            return Err(ExtractionError::NonFiniteSample { field: axis });
        }

        let resolution = u32::try_from(resolution).map_err(|_| ExtractionError::InvalidField {
            field: axis.to_string(),
            reason: format!("{resolution} samples exceeds u32"),
        })?;

        Ok(Self {
            resolution,
            range: (last - first).abs().trunc() as i64,
        })
    }
}

/// Integer-truncated energy extremes of one dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnergyBounds {
    pub min: i64,
    pub max: i64,
}

impl EnergyBounds {
    /// Truncates every energy sample toward zero and keeps the extremes.
    ///
    /// # Errors
    /// Returns an error for an empty list or any non-finite sample.
    pub fn from_samples(samples: &[f64]) -> Result<Self, ExtractionError> {
        let mut bounds: Option<Self> = None;
        for &sample in samples {
            if !sample.is_finite() {
                return Err(ExtractionError::NonFiniteSample { field: "energy" });
            }
            let value = sample.trunc() as i64;
            bounds = Some(match bounds {
                None => Self {
                    min: value,
                    max: value,
                },
                Some(b) => Self {
                    min: b.min.min(value),
                    max: b.max.max(value),
                },
            });
        }
        bounds.ok_or(ExtractionError::EmptyEnergy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sample_at_origin() {
        let axis = AxisSummary::from_samples("x", &[0.0]).unwrap();
        assert_eq!(axis.resolution, 1);
        assert_eq!(axis.range, 0);
    }

    #[test]
    fn test_single_sample_measured_against_zero() {
        let axis = AxisSummary::from_samples("y", &[-42.7]).unwrap();
        assert_eq!(axis.resolution, 1);
        assert_eq!(axis.range, 42);
    }

    #[test]
    fn test_range_uses_endpoints_only() {
        let axis = AxisSummary::from_samples("x", &[10.5, 500.0, -3.0, 60.9]).unwrap();
        assert_eq!(axis.resolution, 4);
        assert_eq!(axis.range, 50);
    }

    #[test]
    fn test_descending_axis_is_absolute() {
        let axis = AxisSummary::from_samples("x", &[100.0, 75.0, 50.0]).unwrap();
        assert_eq!(axis.range, 50);
    }

    #[test]
    fn test_empty_axis() {
        assert_eq!(
            AxisSummary::from_samples("y", &[]),
            Err(ExtractionError::EmptyAxis { axis: "y" })
        );
    }

    #[test]
    fn test_energy_truncates_toward_zero() {
        let bounds = EnergyBounds::from_samples(&[709.9, 700.1, 720.99]).unwrap();
        assert_eq!(bounds, EnergyBounds { min: 700, max: 720 });

        let negative = EnergyBounds::from_samples(&[-0.5, 1.5]).unwrap();
        assert_eq!(negative, EnergyBounds { min: 0, max: 1 });
    }

    #[test]
    fn test_energy_empty_and_nan() {
        assert_eq!(
            EnergyBounds::from_samples(&[]),
            Err(ExtractionError::EmptyEnergy)
        );
        assert_eq!(
            EnergyBounds::from_samples(&[700.0, f64::NAN]),
            Err(ExtractionError::NonFiniteSample { field: "energy" })
        );
    }
}
