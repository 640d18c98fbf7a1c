//! Integration tests for the remedy binary.
//!
//! These tests verify end-to-end behavior including:
//! - Drug and dosage registration
//! - The prescribe workflow with overlap rejection
//! - Day usage queries
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("remedy"))
}

/// Register a drug and return its assigned id
fn add_drug(data_dir: &Path, name: &str) -> String {
    let output = cli()
        .arg("add-drug")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--name")
        .arg(name)
        .output()
        .expect("Failed to run add-drug");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .trim()
        .rsplit(' ')
        .next()
        .expect("id in add-drug output")
        .to_string()
}

/// Register a dosage and return its assigned id
fn add_dosage(data_dir: &Path, quantity: &str, form: &str, intakes: &str) -> String {
    let output = cli()
        .arg("add-dosage")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--quantity")
        .arg(quantity)
        .arg("--form")
        .arg(form)
        .arg("--intakes")
        .arg(intakes)
        .output()
        .expect("Failed to run add-dosage");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .trim()
        .rsplit(' ')
        .next()
        .expect("id in add-dosage output")
        .to_string()
}

/// Prescribe one month of the drug starting 2017-03-16 and return stdout
fn prescribe_month(data_dir: &Path, drug_id: &str, dosage_id: &str) -> assert_cmd::assert::Assert {
    cli()
        .arg("prescribe")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--drug-id")
        .arg(drug_id)
        .arg("--dosage-id")
        .arg(dosage_id)
        .arg("--start-date")
        .arg("2017-03-16")
        .arg("--period-amount")
        .arg("1")
        .arg("--period-unit")
        .arg("Months")
        .assert()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Drug treatment prescription system"));
}

#[test]
fn test_add_drug_reports_assigned_id() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add-drug")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("Arsen Alb")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved drug 'Arsen Alb' with id"));

    assert!(temp_dir.path().join("drugs.json").exists());
}

#[test]
fn test_prescribe_derives_the_inclusive_end_date() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Arsen Alb");
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    prescribe_month(temp_dir.path(), &drug_id, &dosage_id)
        .success()
        .stdout(predicate::str::contains("from 2017-03-16 to 2017-04-15"));

    assert!(temp_dir.path().join("treatments.json").exists());
}

#[test]
fn test_second_overlapping_prescription_is_rejected() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Arsen Alb");
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    prescribe_month(temp_dir.path(), &drug_id, &dosage_id).success();

    prescribe_month(temp_dir.path(), &drug_id, &dosage_id)
        .failure()
        .stderr(predicate::str::contains("overlaps"));
}

#[test]
fn test_same_period_on_another_drug_is_accepted() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Arsen Alb");
    let other_drug_id = add_drug(temp_dir.path(), "Vocara");
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    prescribe_month(temp_dir.path(), &drug_id, &dosage_id).success();
    prescribe_month(temp_dir.path(), &other_drug_id, &dosage_id).success();
}

#[test]
fn test_validation_errors_are_reported() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Arsen Alb");
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    cli()
        .arg("prescribe")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--drug-id")
        .arg(&drug_id)
        .arg("--dosage-id")
        .arg(&dosage_id)
        .arg("--start-date")
        .arg("2017 03 16")
        .arg("--period-amount")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'Start Date' is malformed"))
        .stderr(predicate::str::contains(
            "'Amount of Treatment Period' must be greater than zero",
        ));
}

#[test]
fn test_unknown_drug_id_is_reported() {
    let temp_dir = setup_test_dir();
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    prescribe_month(temp_dir.path(), "nonExistingDrugId", &dosage_id)
        .failure()
        .stderr(predicate::str::contains(
            "No drug found with 'nonExistingDrugId' id",
        ));
}

#[test]
fn test_decreasing_taper_prolongs_the_period() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Vocara");
    // 9 drops, 7 times a day
    let dosage_id = add_dosage(temp_dir.path(), "9", "Drops", "7");

    // nominal 3 days, but the taper to 2 intakes needs 6 days
    cli()
        .arg("prescribe")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--drug-id")
        .arg(&drug_id)
        .arg("--dosage-id")
        .arg(&dosage_id)
        .arg("--start-date")
        .arg("2018-03-08")
        .arg("--period-amount")
        .arg("3")
        .arg("--period-unit")
        .arg("Days")
        .arg("--mode")
        .arg("Decreasing")
        .arg("--delta")
        .arg("1")
        .arg("--limit")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("from 2018-03-08 to 2018-03-13"));
}

#[test]
fn test_usage_query_for_a_periodic_treatment() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Arsen Alb");
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    let output = cli()
        .arg("prescribe")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--drug-id")
        .arg(&drug_id)
        .arg("--dosage-id")
        .arg(&dosage_id)
        .arg("--start-date")
        .arg("2017-03-16")
        .arg("--period-amount")
        .arg("10")
        .arg("--period-unit")
        .arg("Days")
        .arg("--mode")
        .arg("Periodic")
        .arg("--taken")
        .arg("3")
        .arg("--interval")
        .arg("2")
        .output()
        .expect("Failed to run prescribe");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let treatment_id = stdout
        .lines()
        .find(|line| line.starts_with("Prescribed treatment"))
        .and_then(|line| line.rsplit(' ').next())
        .expect("treatment id in prescribe output")
        .to_string();

    // third taken day of the first cycle
    cli()
        .arg("usage")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--treatment-id")
        .arg(&treatment_id)
        .arg("--date")
        .arg("2017-03-18")
        .assert()
        .success()
        .stdout(predicate::str::contains("2017-03-18: used"));

    // first pause day of the first cycle
    cli()
        .arg("usage")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--treatment-id")
        .arg(&treatment_id)
        .arg("--date")
        .arg("2017-03-19")
        .assert()
        .success()
        .stdout(predicate::str::contains("2017-03-19: not used"));

    // outside the treatment period entirely
    cli()
        .arg("usage")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--treatment-id")
        .arg(&treatment_id)
        .arg("--date")
        .arg("2017-04-01")
        .assert()
        .success()
        .stdout(predicate::str::contains("2017-04-01: not used"));
}

#[test]
fn test_list_and_drugs_commands() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Arsen Alb");
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    prescribe_month(temp_dir.path(), &drug_id, &dosage_id).success();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Arsen Alb"))
        .stdout(predicate::str::contains("2017-03-16"));

    cli()
        .arg("drugs")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Arsen Alb"));
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let drug_id = add_drug(temp_dir.path(), "Arsen Alb");
    let dosage_id = add_dosage(temp_dir.path(), "3", "Pill", "2");

    prescribe_month(temp_dir.path(), &drug_id, &dosage_id).success();

    let csv_path = temp_dir.path().join("out.csv");
    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--out")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 treatments"));

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(contents.contains("Arsen Alb"));
    assert!(contents.contains("2017-04-15"));
}
