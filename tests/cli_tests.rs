use std::fs;
use std::process::Command;

fn bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_placement-predictor"));
    command
        .env_remove("PLACEMENT_API_URL")
        .env("PLACEMENT_LOG", "error");
    command
}

const DATASET: &str = "\
student_id,gender,cgpa,technical_skill_score,soft_skill_score,backlogs,internship_count,placement_status
S001,Female,9.0,90,85,0,2,1
S002,Male,6.5,40,45,4,0,0
S003,Male,7.2,65,70,1,1,0
S004,Female,8.6,88,82,0,1,1
";

fn write_dataset(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("cohort.csv");
    fs::write(&path, DATASET).expect("dataset should be written");
    path
}

#[test]
fn predict_scores_flags_locally() {
    let output = bin()
        .args([
            "predict",
            "--cgpa",
            "7.2",
            "--technical-skill-score",
            "65",
            "--soft-skill-score",
            "70",
            "--backlogs",
            "1",
        ])
        .output()
        .expect("predict should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("predict should emit json");
    assert_eq!(payload["source"], "local");
    assert_eq!(payload["probability"], 57);
    assert_eq!(payload["tier"], "moderate");
    assert_eq!(payload["prediction"], "Placed");
    assert_eq!(payload["suggestions"][0]["priority"], "High");
}

#[test]
fn predict_reads_profile_file_and_renders_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    fs::write(
        &path,
        r#"{"cgpa": "9.0", "technical_skill_score": 90, "soft_skill_score": 85, "backlogs": 0, "gender": "Female"}"#,
    )
    .unwrap();

    let output = bin()
        .args(["predict", "--offline", "--format", "markdown", "--input"])
        .arg(&path)
        .output()
        .expect("predict should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Placed (95% placement probability)"));
    assert!(stdout.contains("Excellent tier, Top 5% of candidates."));
}

#[test]
fn predict_falls_back_when_remote_is_down() {
    let output = bin()
        .args([
            "predict",
            "--api-url",
            "http://127.0.0.1:9",
            "--retries",
            "0",
            "--timeout-secs",
            "1",
            "--backlogs",
            "5",
        ])
        .output()
        .expect("predict should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["source"], "local");
    assert_eq!(payload["tier"], "critical");
}

#[test]
fn predict_reports_missing_input_file() {
    let output = bin()
        .args(["predict", "--input", "/nonexistent/profile.json"])
        .output()
        .expect("predict should run");

    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read /nonexistent/profile.json"));
}

#[test]
fn batch_emits_one_line_per_student() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_dataset(&dir);

    let output = bin()
        .args(["batch", "--csv"])
        .arg(&csv)
        .output()
        .expect("batch should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["student_id"], "S001");
    assert_eq!(lines[0]["probability"], 95);
    assert_eq!(lines[1]["probability"], 5);
    assert_eq!(lines[1]["percentile"], "Bottom 40%");
}

#[test]
fn evaluate_compares_against_labels() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_dataset(&dir);

    let output = bin()
        .args(["evaluate", "--csv"])
        .arg(&csv)
        .output()
        .expect("evaluate should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // S003 is predicted placed but recorded as not placed.
    assert_eq!(payload["labelled"], 4);
    assert_eq!(payload["accuracy"], 75.0);
    assert_eq!(payload["recall"], 100.0);
    assert_eq!(payload["confusion"]["false_positive"], 1);
}

#[test]
fn report_writes_markdown_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_dataset(&dir);
    let out = dir.path().join("readiness.md");

    let output = bin()
        .args(["report", "--csv"])
        .arg(&csv)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("report should run");

    assert_eq!(output.status.code(), Some(0));
    let report = fs::read_to_string(&out).expect("report should exist");
    assert!(report.contains("Generated for cohort.csv"));
    assert!(report.contains("## Heuristic vs Recorded Outcomes"));
    assert!(report.contains("- S002 probability 5% (critical), top focus: Backlogs"));
}

#[test]
fn sample_prints_three_cards() {
    let output = bin().arg("sample").output().expect("sample should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("## Strengths").count(), 3);
    assert!(stdout.contains("## At-risk candidate"));
}
