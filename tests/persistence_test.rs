#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_workflow_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("buyout_db");

    // First run: seed the commitment and submit it.
    let commitments1 = dir.path().join("commitments1.csv");
    let actions1 = dir.path().join("actions1.csv");
    common::write_commitments(
        &commitments1,
        &["P-100,e1,22-1000,Plumbing,30000,0,FlowRight Plumbing,28000,true,true,,true,true,true,true,received"],
    )
    .unwrap();
    common::write_actions(&actions1, &["submit,P-100,e1,,,,"]).unwrap();

    let output1 = Command::new(cargo_bin!("buyoutflow"))
        .arg(&commitments1)
        .arg(&actions1)
        .arg("--project")
        .arg("P-100")
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("PendingReview"));

    // Second run: same DB, no new commitments; the pending step must have
    // been recovered so the approval lands.
    let commitments2 = dir.path().join("commitments2.csv");
    let actions2 = dir.path().join("actions2.csv");
    common::write_commitments(&commitments2, &[]).unwrap();
    common::write_actions(&actions2, &["approve,P-100,e1,,,,"]).unwrap();

    let output2 = Command::new(cargo_bin!("buyoutflow"))
        .arg(&commitments2)
        .arg(&actions2)
        .arg("--project")
        .arg("P-100")
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(
        predicate::str::contains(
            "P-100,e1,22-1000,Plumbing,FlowRight Plumbing,Committed,true,true,true,true,true"
        )
        .eval(&stdout2)
    );
}
