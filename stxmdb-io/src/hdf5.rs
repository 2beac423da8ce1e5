//! HDF5 STXM dataset extraction.
//!
//! Reads the fixed set of fields an STXM acquisition writes into its NeXus-style
//! HDF5 file. Paths come from [`StxmLayout`]; by default:
//!
//! | field | path |
//! |---|---|
//! | image | `entry0/counter0/data` |
//! | scan type | `entry0/counter0/stxm_scan_type` |
//! | start / end time | `entry0/start_time`, `entry0/end_time` |
//! | coordinates | `entry0/counter0/sample_x`, `entry0/counter0/sample_y` |
//! | energy | `entry0/counter0/energy` |

use std::path::Path;

use hdf5::types::{FixedAscii, FixedUnicode, H5Type, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Dataset, File, Group};
use stxmdb_core::{ExtractionError, RawDataset, RecordStore};

use crate::config::{IndexerConfig, StxmLayout};
use crate::indexer::{DatasetExtractor, IndexSummary, Indexer, ProgressSink};
use crate::{Error, Result};

/// Longest fixed-length text value read in full.
const MAX_TEXT_LEN: usize = 1024;

/// Reads [`RawDataset`]s from STXM HDF5 files.
#[derive(Clone, Debug, Default)]
pub struct Hdf5Extractor {
    layout: StxmLayout,
}

impl Hdf5Extractor {
    #[must_use]
    pub fn new(layout: StxmLayout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub fn layout(&self) -> &StxmLayout {
        &self.layout
    }
}

impl DatasetExtractor for Hdf5Extractor {
    fn extract(&self, path: &Path) -> Result<RawDataset> {
        let layout = &self.layout;
        let file = File::open(path)?;

        let entry = open_group(&file, &layout.entry, &layout.entry)?;
        let counter_path = format!("{}/{}", layout.entry, layout.counter);
        let counter = open_group(&entry, &layout.counter, &counter_path)?;

        let field = |name: &str| format!("{counter_path}/{name}");
        let entry_field = |name: &str| format!("{}/{name}", layout.entry);

        let image_path = field(&layout.image);
        let image = open_dataset(&counter, &layout.image, &image_path)?
            .read_dyn::<f64>()
            .map_err(|e| invalid(&image_path, e))?;

        let scan_type = read_text(&counter, &layout.scan_type, &field(&layout.scan_type))?;
        let start_time = read_text(&entry, &layout.start_time, &entry_field(&layout.start_time))?;
        let end_time = read_text(&entry, &layout.end_time, &entry_field(&layout.end_time))?;

        let sample_x = read_samples(&counter, &layout.sample_x, &field(&layout.sample_x))?;
        let sample_y = read_samples(&counter, &layout.sample_y, &field(&layout.sample_y))?;
        let energy = read_samples(&counter, &layout.energy, &field(&layout.energy))?;

        Ok(RawDataset {
            image,
            scan_type,
            start_time,
            end_time,
            sample_x,
            sample_y,
            energy,
        })
    }
}

impl Indexer<Hdf5Extractor> {
    /// Build an HDF5 indexer from configuration.
    #[must_use]
    pub fn from_config(config: &IndexerConfig) -> Self {
        Indexer::new(Hdf5Extractor::new(config.layout.clone())).with_suffix(config.suffix.clone())
    }
}

/// Indexes `root` with the default STXM layout and `.hdf5` suffix.
///
/// # Errors
/// See [`Indexer::index_directory`].
pub fn index_directory<S, P>(root: &Path, store: &mut S, progress: &mut P) -> Result<IndexSummary>
where
    S: RecordStore + ?Sized,
    P: ProgressSink + ?Sized,
{
    Indexer::from_config(&IndexerConfig::default()).index_directory(root, store, progress)
}

fn missing(path: &str) -> Error {
    stxmdb_core::Error::from(ExtractionError::MissingField(path.to_string())).into()
}

fn invalid(path: &str, reason: impl ToString) -> Error {
    stxmdb_core::Error::from(ExtractionError::InvalidField {
        field: path.to_string(),
        reason: reason.to_string(),
    })
    .into()
}

fn open_group(parent: &Group, name: &str, path: &str) -> Result<Group> {
    if !parent.link_exists(name) {
        return Err(missing(path));
    }
    parent.group(name).map_err(|e| invalid(path, e))
}

fn open_dataset(parent: &Group, name: &str, path: &str) -> Result<Dataset> {
    if !parent.link_exists(name) {
        return Err(missing(path));
    }
    parent.dataset(name).map_err(|e| invalid(path, e))
}

fn read_samples(parent: &Group, name: &str, path: &str) -> Result<Vec<f64>> {
    open_dataset(parent, name, path)?
        .read_raw::<f64>()
        .map_err(|e| invalid(path, e))
}

fn read_first<T: H5Type>(dataset: &Dataset, path: &str) -> Result<T> {
    dataset
        .read_raw::<T>()
        .map_err(|e| invalid(path, e))?
        .into_iter()
        .next()
        .ok_or_else(|| invalid(path, "dataset is empty"))
}

/// Reads a scalar or single-element text dataset of any HDF5 string type.
fn read_text(parent: &Group, name: &str, path: &str) -> Result<String> {
    let dataset = open_dataset(parent, name, path)?;
    let descriptor = dataset
        .dtype()
        .and_then(|dtype| dtype.to_descriptor())
        .map_err(|e| invalid(path, e))?;

    let text = match descriptor {
        TypeDescriptor::VarLenUnicode => read_first::<VarLenUnicode>(&dataset, path)?
            .as_str()
            .to_owned(),
        TypeDescriptor::VarLenAscii => read_first::<VarLenAscii>(&dataset, path)?
            .as_str()
            .to_owned(),
        TypeDescriptor::FixedAscii(_) => read_first::<FixedAscii<MAX_TEXT_LEN>>(&dataset, path)?
            .as_str()
            .to_owned(),
        TypeDescriptor::FixedUnicode(_) => {
            read_first::<FixedUnicode<MAX_TEXT_LEN>>(&dataset, path)?
                .as_str()
                .to_owned()
        }
        other => return Err(invalid(path, format!("expected text, found {other:?}"))),
    };

    Ok(text.trim_end_matches(['\0', ' ']).to_string())
}
