use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

fn script() -> tempfile::NamedTempFile {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "command, user, cart, agreement, installment, enabled").unwrap();
    writeln!(csv, "create, U001, C001, , ,").unwrap();
    csv
}

fn paylater(script: &tempfile::NamedTempFile) -> Command {
    let mut cmd = Command::new(cargo_bin!("paylater"));
    cmd.arg(script.path())
        .arg("--users")
        .arg("tests/fixtures/users.csv")
        .arg("--carts")
        .arg("tests/fixtures/carts.csv");
    cmd
}

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let csv = script();

    let mut cmd = paylater(&csv);
    cmd.arg("--db-path").arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."))
        .stdout(predicate::str::contains("PL-000001-U001"));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let csv = script();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = paylater(&csv);
    cmd.arg("--db-path").arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());
}
