// Drives the compiled binary end to end against the embedded demo bundle.
// HOME is pointed at a temp directory so config, results log, and leaderboard
// all stay inside the test sandbox.

use assert_cmd::Command;

fn snapquiz(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("snapquiz").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"));
    cmd
}

#[test]
fn info_summarizes_the_demo_bundle() {
    let home = tempfile::tempdir().unwrap();

    let output = snapquiz(home.path()).arg("info").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("test: demo"));
    assert!(stdout.contains("frames: 3"));
    assert!(stdout.contains("(sequential)"));
    assert!(stdout.contains("total boxes: 6"));
}

#[test]
fn replay_scores_a_perfect_demo_run_and_submits() {
    let home = tempfile::tempdir().unwrap();

    // Centers of the demo bundle's hotspots, in sequence order, with waits
    // long enough for each auto-advance.
    let script = r#"[
        {"event": "click", "x": 640, "y": 564},
        {"event": "wait", "ms": 300},
        {"event": "click", "x": 48, "y": 40},
        {"event": "click", "x": 158, "y": 138},
        {"event": "click", "x": 1040, "y": 660},
        {"event": "wait", "ms": 300},
        {"event": "input", "box_id": "capital-of-france", "text": " paris "},
        {"event": "click", "x": 640, "y": 624}
    ]"#;
    let script_path = home.path().join("session.json");
    std::fs::write(&script_path, script).unwrap();

    let output = snapquiz(home.path())
        .arg("replay")
        .arg(&script_path)
        .arg("--submit")
        .arg("--email")
        .arg("player@example.com")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("score: 6/6"), "unexpected output: {stdout}");
    assert!(stdout.contains("submitted to"));

    // The submission shows up on the board, ranked.
    let output = snapquiz(home.path())
        .arg("board")
        .arg("demo")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("player@example.com"));
    assert!(stdout.contains("6/6"));
}

#[test]
fn replay_reports_an_unfinished_session() {
    let home = tempfile::tempdir().unwrap();

    let script_path = home.path().join("partial.json");
    std::fs::write(&script_path, r#"[{"event": "click", "x": 640, "y": 564}]"#).unwrap();

    let output = snapquiz(home.path())
        .arg("replay")
        .arg(&script_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("did not reach review"));
}

#[test]
fn malformed_manifest_fails_with_a_message() {
    let home = tempfile::tempdir().unwrap();

    let manifest_path = home.path().join("broken.json");
    std::fs::write(&manifest_path, "[]").unwrap();

    let output = snapquiz(home.path())
        .arg("info")
        .arg(&manifest_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no frames"), "unexpected stderr: {stderr}");
}

#[test]
fn board_with_no_scores_says_so() {
    let home = tempfile::tempdir().unwrap();

    let output = snapquiz(home.path())
        .arg("board")
        .arg("unknown-test")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("no scores"));
}
