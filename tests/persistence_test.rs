#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

fn run(script: &tempfile::NamedTempFile, db_path: &std::path::Path) -> String {
    let output = Command::new(cargo_bin!("paylater"))
        .arg(script.path())
        .arg("--users")
        .arg("tests/fixtures/users.csv")
        .arg("--carts")
        .arg("tests/fixtures/carts.csv")
        .arg("--db-path")
        .arg(db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: create one agreement
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "command, user, cart, agreement, installment, enabled").unwrap();
    writeln!(csv1, "create, U001, C001, , ,").unwrap();

    let stdout1 = run(&csv1, &db_path);
    assert!(stdout1.contains("PL-000001-U001,U001,C001,120.00,ACTIVE,1,40.00,PAID,"));

    // 2. Second run: the stored agreement is listed and numbering continues
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "command, user, cart, agreement, installment, enabled").unwrap();
    writeln!(csv2, "create, U001, C002, , ,").unwrap();

    let stdout2 = run(&csv2, &db_path);
    assert!(stdout2.contains("PL-000001-U001,U001,C001,120.00,ACTIVE,1,40.00,PAID,"));
    assert!(stdout2.contains("PL-000002-U001,U001,C002,45.50,ACTIVE,1,15.17,PAID,"));
}
