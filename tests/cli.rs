//! Runs the `augur` binary end to end on a temporary directory.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn augur() -> Command {
    Command::new(env!("CARGO_BIN_EXE_augur"))
}

fn write_trend_series(path: &Path, n: usize) {
    let mut text = String::from("date,value\n");
    for t in 0..n {
        let v = 50.0 + 0.5 * t as f64 + ((t * 7) % 5) as f64 * 0.3;
        text.push_str(&format!("2020-{:02}-01,{v}\n", t % 12 + 1));
    }
    fs::write(path, text).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn train_then_predict() {
    let dir = tempfile::tempdir().unwrap();
    let series = dir.path().join("series.csv");
    let model = dir.path().join("models").join("arima.json");
    let result = dir.path().join("train.json");
    let config = dir.path().join("augur.toml");
    write_trend_series(&series, 60);
    fs::write(
        &config,
        "[search]\nd = 1\np_max = 2\nq_max = 2\n\n[train]\nheld_out = 4\nalpha = 0.05\n",
    )
    .unwrap();

    let status = augur()
        .arg("train")
        .arg("--config")
        .arg(&config)
        .arg("--input")
        .arg(&series)
        .arg("--model")
        .arg(&model)
        .arg("--output")
        .arg(&result)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(model.exists());

    let report = read_json(&result);
    assert_eq!(report["d"], 1);
    assert_eq!(report["d_source"], "config");
    assert_eq!(report["n_train"], 56);
    assert_eq!(report["n_test"], 4);
    assert_eq!(report["forecast"].as_array().unwrap().len(), 4);
    let rmse = report["accuracy"]["rmse"].as_f64().unwrap();
    assert!(rmse.is_finite() && rmse >= 0.0);
    assert!(report["model"]["label"].as_str().unwrap().starts_with("ARIMA("));
    assert!(!report["search"].as_array().unwrap().is_empty());

    let predict = dir.path().join("predict.json");
    let values = dir.path().join("values.txt");
    let status = augur()
        .arg("predict")
        .arg("--model")
        .arg(&model)
        .arg("--input")
        .arg(&series)
        .args(["--periods", "6", "--alpha", "0.1"])
        .arg("--output")
        .arg(&predict)
        .arg("--values")
        .arg(&values)
        .status()
        .unwrap();
    assert!(status.success());

    let report = read_json(&predict);
    assert_eq!(report["periods"], 6);
    assert_eq!(report["model"]["nobs"], 60);
    assert_eq!(report["forecast"]["values"].as_array().unwrap().len(), 6);
    assert_eq!(report["forecast"]["intervals"].as_array().unwrap().len(), 6);
    assert_eq!(fs::read_to_string(&values).unwrap().lines().count(), 6);
}

#[test]
fn analyse_writes_correlogram() {
    let dir = tempfile::tempdir().unwrap();
    let series = dir.path().join("series.csv");
    let output = dir.path().join("analysis.json");
    write_trend_series(&series, 80);

    let status = augur()
        .arg("analyse")
        .arg("--input")
        .arg(&series)
        .args(["--diff", "1", "--max-lag", "10"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let report = read_json(&output);
    assert_eq!(report["n_obs"], 80);
    assert!(report["recommended_d"].as_u64().unwrap() <= 2);
    assert_eq!(report["correlogram"]["diff_order"], 1);
    assert_eq!(report["correlogram"]["acf"].as_array().unwrap().len(), 11);
    assert!(report["significance_bound"].as_f64().unwrap() > 0.0);
}

#[test]
fn analyse_separates_test_and_band_levels() {
    let dir = tempfile::tempdir().unwrap();
    let series = dir.path().join("series.txt");
    let output = dir.path().join("analysis.json");
    write_trend_series(&series, 80);
    let text = fs::read_to_string(&series).unwrap().replace(',', ";");
    fs::write(&series, text).unwrap();

    let status = augur()
        .arg("analyse")
        .arg("--input")
        .arg(&series)
        .args(["--delimiter", ";", "--column", "value"])
        .args(["--alpha", "0.01", "--adf-alpha", "0.1", "--max-lag", "5"])
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let report = read_json(&output);
    assert_eq!(report["n_obs"], 80);
    assert_eq!(report["alpha"], 0.01);
    assert_eq!(report["adf_alpha"], 0.1);
    // z(0.995) / sqrt(n) is wider than the default 5% band.
    let n = report["correlogram"]["n_obs"].as_f64().unwrap();
    let bound = report["significance_bound"].as_f64().unwrap();
    assert!(bound > 1.96 / n.sqrt());
}

#[test]
fn predict_reads_with_delimiter_flag() {
    let dir = tempfile::tempdir().unwrap();
    let series = dir.path().join("series.csv");
    let semicolon = dir.path().join("series.txt");
    let model = dir.path().join("arima.json");
    let config = dir.path().join("augur.toml");
    write_trend_series(&series, 40);
    let text = fs::read_to_string(&series).unwrap().replace(',', ";");
    fs::write(&semicolon, text).unwrap();
    fs::write(
        &config,
        "[io]\ndelimiter = \";\"\n\n[search]\nd = 1\np_max = 1\nq_max = 1\n",
    )
    .unwrap();

    let status = augur()
        .arg("train")
        .arg("--config")
        .arg(&config)
        .arg("--input")
        .arg(&semicolon)
        .arg("--model")
        .arg(&model)
        .arg("--output")
        .arg(dir.path().join("train.json"))
        .status()
        .unwrap();
    assert!(status.success());

    let predict = dir.path().join("predict.json");
    let status = augur()
        .arg("predict")
        .arg("--model")
        .arg(&model)
        .arg("--input")
        .arg(&semicolon)
        .args(["--delimiter", ";", "--periods", "2"])
        .arg("--output")
        .arg(&predict)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(read_json(&predict)["model"]["nobs"], 40);
}

#[test]
fn missing_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = augur()
        .arg("predict")
        .arg("--model")
        .arg(dir.path().join("absent.json"))
        .args(["--periods", "3"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error:"), "stderr: {stderr}");
}

#[test]
fn unknown_config_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("augur.toml");
    fs::write(&config, "[search]\nbogus = 1\n").unwrap();
    let status = augur()
        .arg("train")
        .arg("--config")
        .arg(&config)
        .status()
        .unwrap();
    assert!(!status.success());
}
