use std::sync::Arc;
use std::thread;

use avian_flu_ingest::store::{DatasetStore, DirectoryStore, MemoryStore};
use avian_flu_ingest::types::{CanonicalRecord, DatasetName};
use avian_flu_ingest::{ErrorKind, IngestionError};

fn records(tag: &str, n: usize) -> Vec<CanonicalRecord> {
    (0..n)
        .map(|i| CanonicalRecord {
            latitude: 46.0 + i as f64,
            longitude: 6.0,
            species: format!("{tag}-{i}"),
            provenance: tag.to_string(),
            ..Default::default()
        })
        .collect()
}

fn name(s: &str) -> DatasetName {
    DatasetName::new(s).unwrap()
}

#[test]
fn put_writes_one_json_file_per_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::open(dir.path().join("data")).unwrap();

    store.put(&name("alpha"), &records("a", 2)).unwrap();
    store.put(&name("beta.v2"), &records("b", 1)).unwrap();

    let path = store.dataset_path(&name("alpha"));
    assert_eq!(path, dir.path().join("data").join("alpha.json"));
    let on_disk: Vec<CanonicalRecord> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(on_disk, records("a", 2));

    let mut names = store.list().unwrap();
    names.sort();
    assert_eq!(names, vec!["alpha".to_string(), "beta.v2".to_string()]);
}

#[test]
fn list_ignores_foreign_files_and_leftover_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();
    store.put(&name("kept"), &records("k", 1)).unwrap();

    std::fs::write(dir.path().join("legacy.csv"), "a,b\n").unwrap();
    std::fs::write(dir.path().join(".kept.abc123.tmp"), "[").unwrap();
    std::fs::create_dir(dir.path().join("nested.json")).unwrap();

    assert_eq!(store.list().unwrap(), vec!["kept".to_string()]);
}

#[test]
fn get_missing_or_unsafe_name_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();

    for n in ["never_ingested", "../etc/passwd", ""] {
        let err = store.get(n).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "name: {n:?}");
    }
}

#[test]
fn get_corrupt_dataset_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();
    std::fs::write(dir.path().join("broken.json"), "[{\"latitude\":").unwrap();

    let err = store.get("broken").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageError);
    assert!(matches!(err, IngestionError::Storage { source: Some(_), .. }));
}

#[test]
fn concurrent_writers_to_one_name_never_leave_a_mixed_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirectoryStore::open(dir.path()).unwrap());
    let target = name("contended");

    thread::scope(|s| {
        for w in 0..4 {
            let store = Arc::clone(&store);
            let target = target.clone();
            s.spawn(move || {
                let tag = format!("writer{w}");
                for _ in 0..10 {
                    store.put(&target, &records(&tag, 50 + w)).unwrap();
                }
            });
        }
        let store = Arc::clone(&store);
        s.spawn(move || {
            for _ in 0..40 {
                match store.get("contended") {
                    Ok(rs) => {
                        let first = rs[0].provenance.clone();
                        assert!(rs.iter().all(|r| r.provenance == first));
                    }
                    Err(IngestionError::NotFound { .. }) => {}
                    Err(e) => panic!("unexpected read failure: {e}"),
                }
            }
        });
    });

    let rs = store.get("contended").unwrap();
    let tag = rs[0].provenance.clone();
    let w: usize = tag.trim_start_matches("writer").parse().unwrap();
    assert_eq!(rs.len(), 50 + w);
    assert!(rs.iter().all(|r| r.provenance == tag));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn memory_store_replaces_whole_dataset() {
    let store = MemoryStore::new();
    store.put(&name("m"), &records("old", 3)).unwrap();
    store.put(&name("m"), &records("new", 1)).unwrap();

    let rs = store.get("m").unwrap();
    assert_eq!(rs, records("new", 1));
    assert_eq!(store.list().unwrap(), vec!["m".to_string()]);
    assert_eq!(store.get("other").unwrap_err().kind(), ErrorKind::NotFound);
}
