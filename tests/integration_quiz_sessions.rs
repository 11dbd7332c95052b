use std::collections::HashSet;

use snapquiz::leaderboard::{Leaderboard, ScoreEntry, SqliteLeaderboard};
use snapquiz::manifest::parse_manifest;
use snapquiz::player::{Phase, Player};
use snapquiz::replay::{parse_script, run_script};
use snapquiz::session_log::{SessionLog, SessionRecord};

const MANIFEST: &str = r#"[
    {
        "id": "menu",
        "image": "menu.png", "width": 640, "height": 480,
        "hotspots": [
            {"id": "file", "x": 10, "y": 10, "width": 60, "height": 20, "order": 1},
            {"id": "open", "x": 10, "y": 40, "width": 60, "height": 20, "order": 2}
        ]
    },
    {
        "id": "dialog",
        "image": "dialog.png", "width": 640, "height": 480,
        "hotspots": [{"id": "ok", "x": 300, "y": 400, "width": 80, "height": 30}],
        "inputs": [{"id": "filename", "x": 100, "y": 100, "width": 200, "height": 24, "expected": "report.txt"}]
    }
]"#;

fn assets() -> HashSet<String> {
    ["menu.png", "dialog.png"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn imperfect_session_scores_with_deductions() {
    let frames = parse_manifest(MANIFEST, Some(&assets())).unwrap();
    let mut player = Player::new(frames);

    // Wrong order first, then the proper sequence.
    player.click(20.0, 50.0); // "open" while expecting "file"
    player.click(20.0, 20.0); // "file"
    player.click(600.0, 20.0); // background miss
    player.click(20.0, 50.0); // "open", completes the sequence
    while player.advance_pending() {
        player.on_tick();
    }
    assert_eq!(player.current, 1);

    player.set_input("filename", "REPORT.TXT ");
    player.click(340.0, 415.0); // "ok"
    while player.advance_pending() {
        player.on_tick();
    }

    assert_eq!(player.phase, Phase::Review);
    let report = player.report.as_ref().unwrap();
    assert_eq!(report.possible, 4);
    assert_eq!(report.correct_boxes, 4);
    assert_eq!(report.wrong_hotspots, 1);
    assert_eq!(report.background_clicks, 1);
    assert_eq!(report.points, 2);
    assert_eq!(report.frames[0].background_misses.len(), 1);
}

#[test]
fn scripted_session_feeds_log_and_leaderboard() {
    let frames = parse_manifest(MANIFEST, Some(&assets())).unwrap();

    let script = parse_script(
        r#"[
        {"event": "click", "x": 20, "y": 20},
        {"event": "click", "x": 20, "y": 50},
        {"event": "wait", "ms": 400},
        {"event": "input", "box_id": "filename", "text": "report.txt"},
        {"event": "click", "x": 340, "y": 415}
    ]"#,
    )
    .unwrap();

    let mut player = Player::new(frames);
    run_script(&mut player, &script);

    assert_eq!(player.phase, Phase::Review);
    let report = player.report.clone().unwrap();
    assert_eq!(report.points, 4);

    let dir = tempfile::tempdir().unwrap();

    // Results log gains a header plus one row.
    let log_path = dir.path().join("results.csv");
    let record = SessionRecord::from_report("menu-test", &report, player.elapsed_secs());
    SessionLog::new(&log_path).append(&record).unwrap();
    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("menu-test"));

    // Leaderboard ranks a second, weaker submission below this one.
    let board = SqliteLeaderboard::open(&dir.path().join("scores.db")).unwrap();
    board
        .submit(&ScoreEntry {
            email: "first@example.com".to_string(),
            score: report.points,
            total: report.possible,
            elapsed_secs: player.elapsed_secs(),
            test_id: "menu-test".to_string(),
            submitted_at: chrono::Local::now(),
        })
        .unwrap();
    board
        .submit(&ScoreEntry {
            email: "second@example.com".to_string(),
            score: 1,
            total: report.possible,
            elapsed_secs: 99,
            test_id: "menu-test".to_string(),
            submitted_at: chrono::Local::now(),
        })
        .unwrap();

    let entries = board.entries_for("menu-test").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].email, "first@example.com");
    assert_eq!(entries[1].score, 1);
}

#[test]
fn review_mode_survives_hostile_scripts() {
    let frames = parse_manifest(MANIFEST, Some(&assets())).unwrap();
    let mut player = Player::new(frames);

    // Skip through without answering anything.
    player.start();
    player.advance();
    player.advance();
    assert_eq!(player.phase, Phase::Review);
    let report = player.report.clone().unwrap();
    assert_eq!(report.points, 0);

    // Hammer the finished session with more events; nothing moves.
    let script = parse_script(
        r#"[
        {"event": "click", "x": 20, "y": 20},
        {"event": "input", "box_id": "filename", "text": "report.txt"},
        {"event": "wait", "ms": 1000},
        {"event": "retreat"},
        {"event": "advance"}
    ]"#,
    )
    .unwrap();
    run_script(&mut player, &script);

    assert_eq!(player.phase, Phase::Review);
    assert_eq!(player.report.unwrap(), report);
    assert_eq!(player.mistakes.total(), 0);
}

#[test]
fn reset_supports_a_clean_second_run() {
    let frames = parse_manifest(MANIFEST, Some(&assets())).unwrap();
    let mut player = Player::new(frames);

    player.click(600.0, 20.0); // background mistake
    player.start();
    player.advance();
    player.advance();
    assert_eq!(player.phase, Phase::Review);

    player.reset();
    assert_eq!(player.phase, Phase::NotStarted);

    // A perfect second run is unaffected by the first one's mistakes.
    player.click(20.0, 20.0);
    player.click(20.0, 50.0);
    while player.advance_pending() {
        player.on_tick();
    }
    player.set_input("filename", "report.txt");
    player.click(340.0, 415.0);
    while player.advance_pending() {
        player.on_tick();
    }

    let report = player.report.as_ref().unwrap();
    assert_eq!(report.points, 4);
    assert_eq!(report.background_clicks, 0);
}
