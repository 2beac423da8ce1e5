//! Filter requests and the structured query they build.
//!
//! A [`FilterRequest`] is sparse: anything the user left unset falls back to
//! a wide default. The resulting [`Query`] always carries all eight
//! conditions, so "no filter" is a query whose conditions happen to be broad,
//! never a query with conditions left out.
//!
//! The defaults are bounded: resolution and range match `[0, 1000)` and the
//! scan type matches [`KNOWN_SCAN_TYPES`]. Records outside those bounds are
//! invisible to an unfiltered query.

use std::ops::Range;

use crate::error::RangeError;
use crate::record::DatasetRecord;
use crate::scan_type::KNOWN_SCAN_TYPES;
use crate::timestamp::{now_compact, EARLIEST_TIMESTAMP};

/// Exclusive upper bound of the resolution/range wildcard.
pub const WILDCARD_LIMIT: i64 = 1000;

/// Energy maximum used when none is requested.
pub const DEFAULT_ENERGY_MAX: i64 = 9999;

/// User-supplied filter values for one query.
///
/// Zero in any resolution, range, or `energy_max` field means unset, the
/// same as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub scan_type: Option<String>,
    /// Compact `YYYYMMDDHHMM` lower bound on `start_time`.
    pub start_at_or_after: Option<i64>,
    /// Compact `YYYYMMDDHHMM` upper bound on `end_time`.
    pub end_at_or_before: Option<i64>,
    pub x_resolution: Option<u32>,
    pub y_resolution: Option<u32>,
    pub x_range: Option<u32>,
    pub y_range: Option<u32>,
    pub energy_min: i64,
    pub energy_max: Option<i64>,
}

impl FilterRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scan_type(mut self, scan_type: impl Into<String>) -> Self {
        self.scan_type = Some(scan_type.into());
        self
    }

    #[must_use]
    pub fn with_start_at_or_after(mut self, timestamp: i64) -> Self {
        self.start_at_or_after = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_end_at_or_before(mut self, timestamp: i64) -> Self {
        self.end_at_or_before = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_resolution(mut self, x: u32, y: u32) -> Self {
        self.x_resolution = Some(x);
        self.y_resolution = Some(y);
        self
    }

    #[must_use]
    pub fn with_range(mut self, x: u32, y: u32) -> Self {
        self.x_range = Some(x);
        self.y_range = Some(y);
        self
    }

    #[must_use]
    pub fn with_energy(mut self, min: i64, max: i64) -> Self {
        self.energy_min = min;
        self.energy_max = Some(max);
        self
    }

    /// Upper energy bound if one was actually requested.
    fn bounded_energy_max(&self) -> Option<i64> {
        self.energy_max.filter(|&max| max != 0)
    }
}

/// A record attribute a condition can test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    ScanType,
    StartTime,
    EndTime,
    XRange,
    YRange,
    XResolution,
    YResolution,
    EnergyMin,
    EnergyMax,
}

impl Field {
    /// Stable attribute name, also used as the column name by stores.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Field::ScanType => "scan_type",
            Field::StartTime => "start_time",
            Field::EndTime => "end_time",
            Field::XRange => "x_range",
            Field::YRange => "y_range",
            Field::XResolution => "x_resolution",
            Field::YResolution => "y_resolution",
            Field::EnergyMin => "energy_min",
            Field::EnergyMax => "energy_max",
        }
    }

    fn integer(self, record: &DatasetRecord) -> Option<i64> {
        match self {
            Field::ScanType => None,
            Field::StartTime => Some(record.start_time),
            Field::EndTime => Some(record.end_time),
            Field::XRange => Some(record.x_range),
            Field::YRange => Some(record.y_range),
            Field::XResolution => Some(i64::from(record.x_resolution)),
            Field::YResolution => Some(i64::from(record.y_resolution)),
            Field::EnergyMin => Some(record.energy_min),
            Field::EnergyMax => Some(record.energy_max),
        }
    }
}

/// One clause of a conjunctive query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Text field equals one of `values`.
    OneOf { field: Field, values: Vec<String> },
    /// Integer field equals `value`.
    Equals { field: Field, value: i64 },
    /// Integer field lies in the half-open `range`.
    Within { field: Field, range: Range<i64> },
    /// `energy_min >= min` and `energy_max <= max`.
    EnergyWithin { min: i64, max: i64 },
    /// Integer field is `>= value`.
    AtLeast { field: Field, value: i64 },
    /// Integer field is `<= value`.
    AtMost { field: Field, value: i64 },
}

impl Condition {
    /// Evaluates this clause against one record.
    #[must_use]
    pub fn matches(&self, record: &DatasetRecord) -> bool {
        match self {
            Condition::OneOf { field, values } => {
                *field == Field::ScanType && values.iter().any(|v| *v == record.scan_type)
            }
            Condition::Equals { field, value } => field.integer(record) == Some(*value),
            Condition::Within { field, range } => {
                field.integer(record).is_some_and(|v| range.contains(&v))
            }
            Condition::EnergyWithin { min, max } => {
                record.energy_min >= *min && record.energy_max <= *max
            }
            Condition::AtLeast { field, value } => {
                field.integer(record).is_some_and(|v| v >= *value)
            }
            Condition::AtMost { field, value } => {
                field.integer(record).is_some_and(|v| v <= *value)
            }
        }
    }
}

/// A conjunction of conditions over dataset records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    conditions: Vec<Condition>,
}

impl Query {
    /// All conditions, in build order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// True when every condition holds for `record`.
    #[must_use]
    pub fn matches(&self, record: &DatasetRecord) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

/// Builds the query for `filters`, using the local clock as the default end time.
///
/// # Errors
/// Returns [`RangeError`] when a bounded `energy_max` is below `energy_min`.
pub fn build_filter_query(filters: &FilterRequest) -> Result<Query, RangeError> {
    build_filter_query_at(filters, now_compact())
}

/// Builds the query for `filters` with an explicit "now" (`YYYYMMDDHHMM`).
///
/// # Errors
/// Returns [`RangeError`] when a bounded `energy_max` is below `energy_min`.
pub fn build_filter_query_at(filters: &FilterRequest, now: i64) -> Result<Query, RangeError> {
    let energy_min = filters.energy_min;
    let energy_max = match filters.bounded_energy_max() {
        Some(max) if energy_min > max => {
            return Err(RangeError {
                min: energy_min,
                max,
            })
        }
        Some(max) => max,
        None => DEFAULT_ENERGY_MAX,
    };

    let scan_types = match &filters.scan_type {
        Some(tag) => vec![tag.clone()],
        None => KNOWN_SCAN_TYPES.iter().map(|t| (*t).to_string()).collect(),
    };

    let conditions = vec![
        Condition::OneOf {
            field: Field::ScanType,
            values: scan_types,
        },
        exact_or_wildcard(Field::XResolution, filters.x_resolution),
        exact_or_wildcard(Field::YResolution, filters.y_resolution),
        exact_or_wildcard(Field::XRange, filters.x_range),
        exact_or_wildcard(Field::YRange, filters.y_range),
        Condition::EnergyWithin {
            min: energy_min,
            max: energy_max,
        },
        Condition::AtLeast {
            field: Field::StartTime,
            value: filters.start_at_or_after.unwrap_or(EARLIEST_TIMESTAMP),
        },
        Condition::AtMost {
            field: Field::EndTime,
            value: filters.end_at_or_before.unwrap_or(now),
        },
    ];

    Ok(Query { conditions })
}

fn exact_or_wildcard(field: Field, value: Option<u32>) -> Condition {
    match value.filter(|&v| v != 0) {
        Some(v) => Condition::Equals {
            field,
            value: i64::from(v),
        },
        None => Condition::Within {
            field,
            range: 0..WILDCARD_LIMIT,
        },
    }
}
