use std::fs;

use avian_flu_ingest::ErrorKind;
use avian_flu_ingest::ingestion::{BulkOptions, ingest_directory};
use avian_flu_ingest::store::{DatasetStore, MemoryStore};

const HEADER: &str = "latitude,longitude,species,H5N1,H5N2,H7N2,H7N8,timestamp,provenance";

#[test]
fn ingest_directory_seeds_every_supported_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy("tests/fixtures/birds.csv", dir.path().join("switzerland.csv")).unwrap();
    fs::copy("tests/fixtures/birds.json", dir.path().join("geneva.json")).unwrap();
    fs::write(dir.path().join("README.txt"), "not data").unwrap();
    fs::write(dir.path().join("broken.csv"), format!("{HEADER}\n")).unwrap();
    fs::create_dir(dir.path().join("archive.csv")).unwrap();

    let store = MemoryStore::new();
    let opts = BulkOptions {
        num_threads: Some(2),
        ..Default::default()
    };
    let entries = ingest_directory(&store, dir.path(), &opts).unwrap();

    let files: Vec<String> = entries
        .iter()
        .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["broken.csv", "geneva.json", "switzerland.csv"]);
    assert_eq!(entries[0].result.as_ref().unwrap_err().kind(), ErrorKind::FormatError);
    assert_eq!(entries[1].result.as_ref().unwrap().records, 2);
    assert_eq!(entries[2].result.as_ref().unwrap().records, 3);

    let mut names = store.list().unwrap();
    names.sort();
    assert_eq!(names, vec!["geneva".to_string(), "switzerland".to_string()]);
}

#[test]
fn same_named_files_resolve_in_path_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy("tests/fixtures/birds.csv", dir.path().join("survey.csv")).unwrap();
    fs::copy("tests/fixtures/birds.json", dir.path().join("survey.json")).unwrap();

    let store = MemoryStore::new();
    let entries = ingest_directory(&store, dir.path(), &BulkOptions::default()).unwrap();
    assert!(entries.iter().all(|e| e.result.is_ok()));

    let records = store.get("survey").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].species, "Tufted Duck");
}

#[test]
fn missing_directory_fails_the_whole_call() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();

    let err = ingest_directory(&store, dir.path().join("absent"), &BulkOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageError);
}

#[test]
fn dotfile_uploads_group_by_derived_dataset_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy("tests/fixtures/birds.csv", dir.path().join(".csv")).unwrap();
    fs::copy("tests/fixtures/birds.json", dir.path().join(".csv.json")).unwrap();

    let store = MemoryStore::new();
    let opts = BulkOptions {
        num_threads: Some(4),
        ..Default::default()
    };
    let entries = ingest_directory(&store, dir.path(), &opts).unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert_eq!(entry.result.as_ref().unwrap().dataset.as_str(), ".csv");
    }

    assert_eq!(store.list().unwrap(), vec![".csv".to_string()]);
    let records = store.get(".csv").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].species, "Tufted Duck");
}
