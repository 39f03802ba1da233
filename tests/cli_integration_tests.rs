//! End-to-end CLI integration tests
//!
//! These tests use assert_cmd to run the transfer-wizard binary inside a
//! scratch directory, so no stray config or .env file is picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use tempfile::TempDir;

const SOURCE: &str = "https://t.me/cryptotraders";
const DESTINATION: &str = "https://t.me/mygrouppriv";

/// Binary invocation isolated from the caller's environment
fn wizard(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("transfer-wizard").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("TRANSFER_WIZARD_VARIANT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_command_shows_getting_started() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Member Transfer Wizard"))
        .stdout(predicate::str::contains("Active preset: standard (4 steps, $0.01 per member)"))
        .stdout(predicate::str::contains("transfer-wizard quote --members 1000"));
}

#[test]
fn test_quote_standard_preset() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args(["quote", "--members", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$10.00"))
        .stdout(predicate::str::contains("Processing fee").not());
}

#[test]
fn test_quote_strict_preset_includes_fee() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args(["--variant", "strict", "quote", "--members", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rate:           $0.015 per member"))
        .stdout(predicate::str::contains("Base cost:      $15.00"))
        .stdout(predicate::str::contains("Processing fee: $5.00"))
        .stdout(predicate::str::contains("$20.00 USD"));
}

#[test]
fn test_quote_json_output() {
    let dir = TempDir::new().unwrap();
    let output = wizard(&dir)
        .args(["--variant", "strict", "quote", "--members", "1000", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let amount = |key: &str| Decimal::from_str(report[key].as_str().unwrap()).unwrap();
    assert_eq!(report["variant"], "strict");
    assert_eq!(report["members"], 1000);
    assert_eq!(report["accepted"], true);
    assert_eq!(amount("unit_rate"), Decimal::new(15, 3));
    assert_eq!(amount("base"), Decimal::new(15, 0));
    assert_eq!(amount("processing_fee"), Decimal::new(5, 0));
    assert_eq!(amount("total"), Decimal::new(20, 0));
}

#[test]
fn test_quote_json_flags_out_of_range_count() {
    let dir = TempDir::new().unwrap();
    let output = wizard(&dir)
        .args(["quote", "--members", "50", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["accepted"], false);
    assert!(report["warning"].as_str().unwrap().contains("50"));
}

#[test]
fn test_quote_warns_below_minimum() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args(["quote", "--members", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$0.50"))
        .stdout(predicate::str::contains("⚠️"));
}

#[test]
fn test_config_file_overrides_pricing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[pricing]\nunit_rate = \"0.02\"\n").unwrap();

    wizard(&dir)
        .args(["--config", path.to_str().unwrap(), "quote", "--members", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$20.00"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args(["--config", "nope.toml", "quote", "--members", "1000"])
        .assert()
        .failure();
}

#[test]
fn test_check_link_accepts_group_links() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args(["check-link", SOURCE, "https://t.me/mygrouppriv?join"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ https://t.me/cryptotraders"));
}

#[test]
fn test_check_link_rejects_bad_links() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args(["check-link", SOURCE, "not-a-link"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("❌ not-a-link"))
        .stderr(predicate::str::contains("1 of 2 links rejected"));
}

#[test]
fn test_run_instant_completes_with_order_id() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args([
            "run",
            "--source",
            SOURCE,
            "--destination",
            DESTINATION,
            "--members",
            "1000",
            "--active-only",
            "--instant",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("STEP 4/4: CONFIRMATION"))
        .stdout(predicate::str::contains("Filters: active only"))
        .stdout(predicate::str::is_match(r"✅ completed\s+100%").unwrap())
        .stdout(predicate::str::contains("$10.00"))
        .stdout(predicate::str::is_match(r"Order ID: TT-\d+").unwrap());
}

#[test]
fn test_run_compact_completes_on_payment_step() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args([
            "--variant",
            "compact",
            "run",
            "--source",
            SOURCE,
            "--destination",
            DESTINATION,
            "--members",
            "500",
            "--instant",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("STEP 3/3"))
        .stdout(predicate::str::contains("STEP 4").not())
        .stdout(predicate::str::contains("$20.00"))
        .stdout(predicate::str::contains("Order ID: TT-"));
}

#[test]
fn test_run_reports_forced_failure() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .env("TRANSFER_WIZARD_SIMULATION__FAILURE_RATE", "1")
        .args([
            "run",
            "--source",
            SOURCE,
            "--destination",
            DESTINATION,
            "--members",
            "1000",
            "--instant",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_match(r"❌ failed\s+50%").unwrap())
        .stdout(predicate::str::contains("Transfer failed at 50%"))
        .stdout(predicate::str::contains("Order ID").not());
}

#[test]
fn test_run_rejects_low_member_count() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args([
            "run",
            "--source",
            SOURCE,
            "--destination",
            DESTINATION,
            "--members",
            "50",
            "--instant",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("❌"))
        .stdout(predicate::str::contains("Order ID").not());
}

#[test]
fn test_run_rejects_bad_source_link() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args([
            "run",
            "--source",
            "not-a-link",
            "--destination",
            DESTINATION,
            "--members",
            "1000",
            "--instant",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("STEP 2").not());
}

#[test]
fn test_strict_run_needs_proof() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .env("TRANSFER_WIZARD_SIMULATION__FAILURE_RATE", "0")
        .args([
            "--variant",
            "strict",
            "run",
            "--source",
            SOURCE,
            "--destination",
            DESTINATION,
            "--members",
            "1000",
            "--instant",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("payment proof"));
}

#[test]
fn test_strict_run_with_proof_completes() {
    let dir = TempDir::new().unwrap();
    let receipt = dir.path().join("receipt.png");
    fs::write(&receipt, vec![0u8; 2048]).unwrap();

    wizard(&dir)
        .env("TRANSFER_WIZARD_SIMULATION__FAILURE_RATE", "0")
        .args([
            "--variant",
            "strict",
            "run",
            "--source",
            SOURCE,
            "--destination",
            DESTINATION,
            "--members",
            "1000",
            "--proof",
            receipt.to_str().unwrap(),
            "--instant",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Proof:   receipt.png (2 KB)"))
        .stdout(predicate::str::contains("$20.00"))
        .stdout(predicate::str::contains("Order ID: TT-"));
}

#[test]
fn test_run_rejects_unsupported_proof_type() {
    let dir = TempDir::new().unwrap();
    let receipt = dir.path().join("receipt.gif");
    fs::write(&receipt, b"GIF89a").unwrap();

    wizard(&dir)
        .args([
            "run",
            "--source",
            SOURCE,
            "--destination",
            DESTINATION,
            "--members",
            "1000",
            "--proof",
            receipt.to_str().unwrap(),
            "--instant",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Order ID").not());
}

#[test]
fn test_config_command_prints_toml() {
    let dir = TempDir::new().unwrap();
    wizard(&dir)
        .args(["--variant", "compact", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("variant = \"compact\""))
        .stdout(predicate::str::contains("total_steps = 3"));
}

#[test]
fn test_config_write_creates_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("written.toml");

    wizard(&dir)
        .args(["config", "--write", target.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Wrote standard configuration"));

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("[pricing]"));
    assert!(written.contains("[simulation]"));
}
