use assert_cmd::Command;
use predicates::prelude::*;
use pt_grading::models::{Landmark, PoseFrame, PoseLandmark, LANDMARK_COUNT};
use std::io::Write;

fn pt_grade() -> Command {
    let mut cmd = Command::cargo_bin("pt-grade").unwrap();
    cmd.env_remove("PT_GRADING_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn plank(timestamp_ms: u64, elbow_deg: f32) -> PoseFrame {
    let theta = elbow_deg.to_radians();
    let shoulder = Landmark::new(0.30 - 0.15 * theta.sin(), 0.65 + 0.15 * theta.cos());
    let ankle = Landmark::new(0.90, 0.80);
    let hip = Landmark::new((shoulder.x + ankle.x) / 2.0, (shoulder.y + ankle.y) / 2.0);
    let knee = Landmark::new((hip.x + ankle.x) / 2.0, (hip.y + ankle.y) / 2.0);

    let mut frame = PoseFrame::new(timestamp_ms, vec![Landmark::default(); LANDMARK_COUNT]);
    for (left, right, point) in [
        (PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder, shoulder),
        (PoseLandmark::LeftElbow, PoseLandmark::RightElbow, Landmark::new(0.30, 0.65)),
        (PoseLandmark::LeftWrist, PoseLandmark::RightWrist, Landmark::new(0.30, 0.80)),
        (PoseLandmark::LeftHip, PoseLandmark::RightHip, hip),
        (PoseLandmark::LeftKnee, PoseLandmark::RightKnee, knee),
        (PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle, ankle),
    ] {
        frame.set(left, point);
        frame.set(right, point);
    }
    frame
}

/// Two clean push-ups recorded as JSON lines
fn recording() -> tempfile::NamedTempFile {
    let angles = [
        170.0, 170.0, 170.0, 140.0, 110.0, 85.0, 85.0, 85.0, 110.0, 140.0, 170.0, 170.0, 170.0,
        140.0, 110.0, 85.0, 85.0, 85.0, 110.0, 140.0, 170.0, 170.0, 170.0,
    ];
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for (i, angle) in angles.iter().enumerate() {
        let line = serde_json::to_string(&plank(i as u64 * 100, *angle)).unwrap();
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_help_command() {
    let mut cmd = pt_grade();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Replay pose recordings"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("score"));
}

#[test]
fn test_version_command() {
    let mut cmd = pt_grade();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = pt_grade();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pt-grade"))
        .stdout(predicate::str::contains("complete -F"));
}

#[test]
fn test_score_command() {
    let mut cmd = pt_grade();
    cmd.args(["score", "pushup", "48"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("push-up: 48 reps → 71 points"));
}

#[test]
fn test_score_rejects_running() {
    let mut cmd = pt_grade();
    cmd.args(["score", "running", "10"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("pt-grade run"));
}

#[test]
fn test_run_command_json() {
    let mut cmd = pt_grade();
    cmd.args(["--no-color", "run", "--distance", "3218.69", "--duration", "15:00", "--json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"score\": 80.0"))
        .stdout(predicate::str::contains("\"pace_per_mile\": \"07:29\""));
}

#[test]
fn test_replay_counts_reps() {
    let file = recording();
    let mut cmd = pt_grade();
    cmd.arg("--no-color")
        .arg("replay")
        .arg(file.path())
        .args(["--exercise", "pushup"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Perfect Rep!"))
        .stdout(predicate::str::contains("Completed 2 valid reps out of 2 attempts (100.0%)."))
        .stdout(predicate::str::contains("2 reps → 3 points"));
}

#[test]
fn test_replay_json_report() {
    let file = recording();
    let mut cmd = pt_grade();
    cmd.arg("replay")
        .arg(file.path())
        .args(["-e", "push-up", "--json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"total_reps\": 2"))
        .stdout(predicate::str::contains("\"standardized_score\": 3"))
        .stdout(predicate::str::contains("\"calibrated\": true"));
}

#[test]
fn test_replay_missing_file() {
    let mut cmd = pt_grade();
    cmd.args(["replay", "/nonexistent/recording.jsonl", "--exercise", "situp"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open recording"));
}

#[test]
fn test_config_init_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut cmd = pt_grade();
    cmd.arg("--config").arg(&path).args(["config", "init"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized at"));
    assert!(path.exists());

    let mut cmd = pt_grade();
    cmd.arg("--config").arg(&path).args(["config", "show"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("state_stability_threshold = 3"));

    let mut cmd = pt_grade();
    cmd.arg("--config").arg(&path).args(["config", "init"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Use --force to overwrite"));
}
