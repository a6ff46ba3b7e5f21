use std::io::Write;

use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("demand-forecast").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn predict_prints_forecast_for_fixture() {
    let mut fixture = tempfile::NamedTempFile::new().unwrap();
    writeln!(fixture, "material_id,date,quantity,price").unwrap();
    for i in 0..30 {
        let year = 2023 + i / 12;
        let month = i % 12 + 1;
        let quantity = 50 + (i % 12) * 4 + i;
        writeln!(fixture, "M7,{year}-{month:02}-01,{quantity},3.25").unwrap();
    }
    fixture.flush().unwrap();

    let output = Command::cargo_bin("demand-forecast")
        .expect("binary exists")
        .env_remove("FORECAST_AS_OF")
        .env_remove("NOISE_SEED")
        .args(["predict", "--material-id", "M7", "--as-of", "2026-02-14", "--seed", "3"])
        .arg("--fixture")
        .arg(fixture.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["Material ID"], "M7");
    assert_eq!(body["Price"], 3.25);
    assert!(body["Predicted Quantity Feb 2026"].is_u64());
    assert!(body["Predicted Quantity Nov 2026"].is_u64());
    // 2024 and 2025 lie strictly between the first year (2023) and 2026
    assert!(body["Predicted Quantity Jun 2025"].is_i64());
    assert!(body["Predicted Quantity Jan 2024"].is_i64());
    assert!(body.get("Predicted Quantity Jan 2023").is_none());
}
