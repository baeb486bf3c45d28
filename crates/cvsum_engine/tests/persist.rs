use std::fs;

use cvsum_engine::{write_atomically, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("reports").join("job-1.json");

    let written = write_atomically(&target, "{}").unwrap();

    assert_eq!(written, target);
    assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
}

#[test]
fn replaces_existing_report() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("report.json");

    write_atomically(&target, "first").unwrap();
    write_atomically(&target, "second").unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn parent_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let err = write_atomically(&blocker.join("report.json"), "data").unwrap_err();
    assert!(matches!(err, PersistError::OutputDir(_)), "{err:?}");
}
