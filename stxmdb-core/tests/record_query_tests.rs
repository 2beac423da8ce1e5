#![allow(clippy::unreadable_literal, clippy::cast_precision_loss)]
use approx::assert_relative_eq;
use ndarray::Array;
use stxmdb_core::{
    build_filter_query_at, DatasetRecord, ExtractionError, FilterRequest, MemoryStore, RawDataset,
    RecordStore,
};

const NOW: i64 = 202610181200;

fn raw(scan_type: &str, columns: usize) -> RawDataset {
    let image = Array::from_shape_fn((4, columns), |(r, c)| (r * columns + c) as f64).into_dyn();
    RawDataset {
        image,
        scan_type: scan_type.to_string(),
        start_time: "2023-11-02T14:05:31.120".to_string(),
        end_time: "2023-11-02T14:47:09".to_string(),
        sample_x: (0..columns).map(|i| -20.0 + i as f64 * 2.5).collect(),
        sample_y: vec![10.0, 12.0, 14.0, 16.0],
        energy: vec![708.9, 700.2, 712.7],
    }
}

fn normalize(name: &str, raw: RawDataset) -> DatasetRecord {
    DatasetRecord::from_raw(name, "/data/beamtime", format!("/data/beamtime/{name}"), raw).unwrap()
}

#[test]
fn test_normalized_record_fields() {
    let record = normalize("Sample_Image_001.hdf5", raw("sample image", 9));

    assert_eq!(record.start_time, 202311021405);
    assert_eq!(record.end_time, 202311021447);
    assert_eq!((record.x_resolution, record.y_resolution), (9, 4));
    assert_eq!((record.x_range, record.y_range), (20, 6));
    assert_eq!((record.energy_min, record.energy_max), (700, 712));

    let image = record.image().unwrap();
    assert_eq!(image.shape(), (1, 4, 9));
    let (lo, hi) = image.value_range().unwrap();
    assert_relative_eq!(lo, 0.0);
    assert_relative_eq!(hi, 35.0);
}

#[test]
fn test_missing_times_become_zero() {
    let mut dataset = raw("osa focus", 3);
    dataset.start_time.clear();
    dataset.end_time.clear();
    let record = normalize("focus.hdf5", dataset);

    assert_eq!((record.start_time, record.end_time), (0, 0));
}

#[test]
fn test_empty_energy_is_rejected() {
    let mut dataset = raw("sample image", 3);
    dataset.energy.clear();
    let err = DatasetRecord::from_raw("e.hdf5", "/d", "/d/e.hdf5", dataset).unwrap_err();
    assert_eq!(err, ExtractionError::EmptyEnergy);
}

#[test]
fn test_filtering_a_memory_store() {
    let mut store = MemoryStore::new();
    store.insert(normalize("a.hdf5", raw("sample image", 9))).unwrap();
    store.insert(normalize("b.hdf5", raw("sample image", 128))).unwrap();
    store.insert(normalize("c.hdf5", raw("osa focus", 9))).unwrap();
    store.insert(normalize("d.hdf5", raw("alignment", 9))).unwrap();

    let names = |filters: &FilterRequest| -> Vec<String> {
        let query = build_filter_query_at(filters, NOW).unwrap();
        store.query(&query).unwrap().into_iter().map(|r| r.name).collect()
    };

    assert_eq!(names(&FilterRequest::new()), vec!["a.hdf5", "b.hdf5", "c.hdf5"]);
    assert_eq!(
        names(&FilterRequest::new().with_scan_type("sample image")),
        vec!["a.hdf5", "b.hdf5"]
    );
    assert_eq!(
        names(&FilterRequest::new().with_resolution(128, 4)),
        vec!["b.hdf5"]
    );
    assert_eq!(
        names(&FilterRequest::new().with_energy(700, 712)),
        vec!["a.hdf5", "b.hdf5", "c.hdf5"]
    );
    assert!(names(&FilterRequest::new().with_energy(701, 0)).is_empty());
    assert!(names(&FilterRequest::new().with_end_at_or_before(202311021446)).is_empty());
}
