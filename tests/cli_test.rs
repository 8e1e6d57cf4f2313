//! End-to-end checks of the `learning-risk` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn learning_risk_bin() -> &'static str {
    env!("CARGO_BIN_EXE_learning-risk")
}

fn model_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("models/completion_model.json")
}

fn run(args: &[&str]) -> Output {
    Command::new(learning_risk_bin())
        .args(args)
        .env_remove("LEARNING_RISK_MODEL")
        .output()
        .expect("failed to run learning-risk")
}

fn write_students(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("students.csv");
    std::fs::write(&path, body).unwrap();
    path
}

const STUDENTS: &str = "student_id,avg_score,avg_time_spent,chapter_retries\n\
5000,85.5,12.5,2\n\
5001,72.3,8.3,3\n\
5002,32.0,5.0,8\n\
5003,91.0,20.0,0\n";

#[test]
fn analyze_writes_consistent_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_students(dir.path(), STUDENTS);
    let output = dir.path().join("out").join("report.json");

    let result = run(&[
        "analyze",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--model",
        model_path().to_str().unwrap(),
    ]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let report: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let flagged = report["high_risk_students"].as_array().unwrap();

    assert_eq!(report["summary"]["total_students"], 4);
    assert_eq!(report["summary"]["at_risk_count"], flagged.len() as u64);
    assert!(flagged.iter().any(|entry| entry["student_id"] == 5002));
    assert!(report.get("generated_at").is_none());
}

#[test]
fn analyze_twice_gives_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_students(dir.path(), STUDENTS);
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    for out in [&first, &second] {
        let result = run(&[
            "analyze",
            "--input",
            input.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--model",
            model_path().to_str().unwrap(),
        ]);
        assert!(result.status.success());
    }

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn stamped_and_markdown_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_students(dir.path(), STUDENTS);
    let stamped = dir.path().join("stamped.json");
    let markdown = dir.path().join("report.md");

    let result = run(&[
        "analyze",
        "--input",
        input.to_str().unwrap(),
        "--output",
        stamped.to_str().unwrap(),
        "--model",
        model_path().to_str().unwrap(),
        "--stamp",
    ]);
    assert!(result.status.success());
    let report: Value = serde_json::from_str(&std::fs::read_to_string(&stamped).unwrap()).unwrap();
    assert!(report["generated_at"].is_string());
    assert!(report["summary"].is_object());

    let result = run(&[
        "analyze",
        "--input",
        input.to_str().unwrap(),
        "--output",
        markdown.to_str().unwrap(),
        "--model",
        model_path().to_str().unwrap(),
        "--format",
        "markdown",
    ]);
    assert!(result.status.success());
    let body = std::fs::read_to_string(&markdown).unwrap();
    assert!(body.starts_with("# Learning Risk Report"));
    assert!(body.contains("| 5002 | Dropout |"));
    assert!(body.contains("| 32.0 |"));
    assert!(!body.contains("Generated at"));
}

#[test]
fn stamp_applies_to_markdown_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_students(dir.path(), STUDENTS);
    let markdown = dir.path().join("stamped.md");

    let result = run(&[
        "analyze",
        "--input",
        input.to_str().unwrap(),
        "--output",
        markdown.to_str().unwrap(),
        "--model",
        model_path().to_str().unwrap(),
        "--format",
        "markdown",
        "--stamp",
    ]);
    assert!(result.status.success());
    let body = std::fs::read_to_string(&markdown).unwrap();
    assert!(body.lines().any(|line| line.starts_with("Generated at ")));
}

#[test]
fn missing_columns_fail_with_every_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_students(dir.path(), "student_id,avg_score\n1,50\n");
    let output = dir.path().join("report.json");

    let result = run(&[
        "analyze",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--model",
        model_path().to_str().unwrap(),
    ]);

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("avg_time_spent, chapter_retries"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn missing_model_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_students(dir.path(), STUDENTS);
    let absent = dir.path().join("absent.json");

    let result = run(&[
        "analyze",
        "--input",
        input.to_str().unwrap(),
        "--output",
        dir.path().join("report.json").to_str().unwrap(),
        "--model",
        absent.to_str().unwrap(),
    ]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("model unavailable"));
}

#[test]
fn sample_csv_and_model_info() {
    let dir = tempfile::tempdir().unwrap();
    let sample = dir.path().join("sample.csv");

    let result = run(&["sample-csv", "--out", sample.to_str().unwrap()]);
    assert!(result.status.success());
    let body = std::fs::read_to_string(&sample).unwrap();
    assert!(body.starts_with("student_id,avg_score,avg_time_spent,chapter_retries"));
    assert_eq!(body.lines().count(), 4);

    let result = run(&["model-info", "--model", model_path().to_str().unwrap()]);
    assert!(result.status.success());
    let info: Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(info["model_type"], "Logistic Regression");
    assert_eq!(info["features"].as_array().unwrap().len(), 3);
    assert_eq!(
        info["feature_descriptions"]["chapter_retries"],
        "Number of chapter retakes/failures"
    );
}
