use std::fs;

use mazechase::scores::{append_score, high_score, load_scores};
use mazechase::ScoreError;

#[test]
fn first_score_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");

    assert!(load_scores(&path).unwrap().is_empty());
    append_score(&path, 1230).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1230");
}

#[test]
fn later_scores_are_comma_joined() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");

    append_score(&path, 50).unwrap();
    append_score(&path, 7000).unwrap();
    append_score(&path, 0).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "50, 7000, 0");
    let scores = load_scores(&path).unwrap();
    assert_eq!(scores, vec![50, 7000, 0]);
    assert_eq!(high_score(&scores), 7000);
}

#[test]
fn empty_file_counts_as_new() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "").unwrap();

    append_score(&path, 10).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "10");
}

#[test]
fn malformed_entry_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "10, lots").unwrap();

    match load_scores(&path) {
        Err(ScoreError::Malformed { entry, .. }) => assert_eq!(entry, "lots"),
        other => panic!("unexpected {other:?}"),
    }
}
