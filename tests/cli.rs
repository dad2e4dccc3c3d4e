use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn calendar(events: &[(&str, &str, &str)]) -> String {
    let mut out = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\n");
    for (uid, summary, start) in events {
        out.push_str(&format!(
            "BEGIN:VEVENT\r\nUID:{uid}\r\nSUMMARY:{summary}\r\nDTSTART:{start}\r\nEND:VEVENT\r\n"
        ));
    }
    out.push_str("END:VCALENDAR\r\n");
    out
}

/// Command isolated from the user's config file and environment.
fn icalkit(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("icalkit").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_split_writes_chunk_files() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("big.ics");
    fs::write(
        &input,
        calendar(&[
            ("c", "Third", "20240103T090000Z"),
            ("a", "First", "20240101T090000Z"),
            ("b", "Second", "20240102T090000Z"),
        ]),
    )
    .unwrap();
    let out_dir = dir.path().join("out");

    icalkit(dir.path())
        .arg("split")
        .arg(&input)
        .args(["--chunk-size", "2", "--output-dir"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Split 3 events into 2 files"));

    let first = fs::read_to_string(out_dir.join("calendar_part_1_of_2.ics")).unwrap();
    let second = fs::read_to_string(out_dir.join("calendar_part_2_of_2.ics")).unwrap();

    assert!(first.contains("UID:a\r\n"));
    assert!(first.contains("UID:b\r\n"));
    assert!(second.contains("UID:c\r\n"));
    assert!(second.starts_with("BEGIN:VCALENDAR\r\n"));
}

#[test]
fn test_split_rejects_zero_chunk_size() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cal.ics");
    fs::write(&input, calendar(&[("a", "A", "20240101T090000Z")])).unwrap();

    icalkit(dir.path())
        .arg("split")
        .arg(&input)
        .args(["--chunk-size", "0", "--output-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Chunk size must be a positive integer"));
}

#[test]
fn test_split_rejects_non_calendar_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.ics");
    fs::write(&input, "just some text\n").unwrap();

    icalkit(dir.path())
        .arg("split")
        .arg(&input)
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn test_merge_removes_duplicates() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.ics");
    let b = dir.path().join("b.ics");
    let merged = dir.path().join("merged.ics");
    fs::write(
        &a,
        calendar(&[("x", "Standup", "20240101T090000Z"), ("y", "Review", "20240102T090000Z")]),
    )
    .unwrap();
    fs::write(
        &b,
        calendar(&[("y", "Review again", "20240102T090000Z"), ("z", "Retro", "20240103T090000Z")]),
    )
    .unwrap();

    icalkit(dir.path())
        .arg("merge")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(&merged)
        .args(["--duplicates", "remove", "--name", "Team"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 calendars"))
        .stdout(predicate::str::contains("Total events: 3"))
        .stdout(predicate::str::contains("Duplicates removed: 1"));

    let content = fs::read_to_string(&merged).unwrap();
    assert_eq!(content.matches("BEGIN:VEVENT").count(), 3);
    assert!(content.contains("X-WR-CALNAME:Team\r\n"));
    assert!(!content.contains("Review again"));
}

#[test]
fn test_merge_warn_reports_duplicates_on_stderr() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.ics");
    let b = dir.path().join("b.ics");
    let merged = dir.path().join("merged.ics");
    fs::write(&a, calendar(&[("x", "Standup", "20240101T090000Z")])).unwrap();
    fs::write(&b, calendar(&[("x", "Standup", "20240101T090000Z")])).unwrap();

    icalkit(dir.path())
        .arg("merge")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(&merged)
        .assert()
        .success()
        .stderr(predicate::str::contains("appears in calendars 1 and 2"))
        .stdout(predicate::str::contains("Duplicates found: 1"));

    let content = fs::read_to_string(&merged).unwrap();
    assert_eq!(content.matches("BEGIN:VEVENT").count(), 2);
}

#[test]
fn test_merge_requires_two_files() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.ics");
    fs::write(&a, calendar(&[("x", "Standup", "20240101T090000Z")])).unwrap();

    icalkit(dir.path())
        .arg("merge")
        .arg(&a)
        .arg("-o")
        .arg(dir.path().join("out.ics"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least two input files"));
}

#[test]
fn test_merge_rejects_unknown_duplicate_mode() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.ics");
    let b = dir.path().join("b.ics");
    fs::write(&a, calendar(&[])).unwrap();
    fs::write(&b, calendar(&[])).unwrap();

    icalkit(dir.path())
        .arg("merge")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(dir.path().join("out.ics"))
        .args(["--duplicates", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sometimes"));

    assert!(!dir.path().join("out.ics").exists());
}

#[test]
fn test_view_json_lists_matching_events() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cal.ics");
    fs::write(
        &input,
        calendar(&[
            ("2", "Dentist", "20240105T140000Z"),
            ("1", "Team lunch", "20240102T120000Z"),
            ("3", "Team retro", "20240103T160000Z"),
        ]),
    )
    .unwrap();

    let output = icalkit(dir.path())
        .arg("view")
        .arg(&input)
        .args(["--json", "--search", "team"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["eventCount"], 3);

    let summaries: Vec<&str> = json["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["summary"].as_str().unwrap())
        .collect();
    assert_eq!(summaries, vec!["Team lunch", "Team retro"]);
}

#[test]
fn test_view_limit_truncates_listing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cal.ics");
    fs::write(
        &input,
        calendar(&[
            ("1", "One", "20240101T090000Z"),
            ("2", "Two", "20240102T090000Z"),
            ("3", "Three", "20240103T090000Z"),
        ]),
    )
    .unwrap();

    icalkit(dir.path())
        .arg("view")
        .arg(&input)
        .args(["--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("One"))
        .stdout(predicate::str::contains("... and 2 more"));
}

#[test]
fn test_clean_overwrites_input_without_duplicates() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cal.ics");
    fs::write(
        &input,
        calendar(&[
            ("x", "Standup", "20240101T090000Z"),
            ("x", "Standup copy", "20240101T090000Z"),
            ("y", "Review", "20240102T090000Z"),
        ]),
    )
    .unwrap();

    icalkit(dir.path())
        .arg("clean")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 duplicate event"));

    let content = fs::read_to_string(&input).unwrap();
    assert_eq!(content.matches("BEGIN:VEVENT").count(), 2);
    assert!(!content.contains("Standup copy"));
}

#[test]
fn test_missing_input_file_is_reported() {
    let dir = TempDir::new().unwrap();

    icalkit(dir.path())
        .arg("view")
        .arg(dir.path().join("nope.ics"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_split_output_keeps_escaped_text() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cal.ics");
    let event = "BEGIN:VEVENT\r\n\
UID:esc\r\n\
DTSTART:20240101T090000Z\r\n\
SUMMARY:Offsite\\, day 1\\; travel\r\n\
DESCRIPTION:Bring C:\\\\slides\\nand a charger\r\n\
END:VEVENT\r\n";
    fs::write(
        &input,
        format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n{event}END:VCALENDAR\r\n"),
    )
    .unwrap();
    let out_dir = dir.path().join("out");

    icalkit(dir.path())
        .arg("split")
        .arg(&input)
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success();

    let chunk = fs::read_to_string(out_dir.join("calendar_part_1_of_1.ics")).unwrap();
    assert!(chunk.contains(event), "Chunk:\n{}", chunk);
}

#[test]
fn test_config_prints_effective_settings() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join(".config").join("icalkit");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "chunk_size = 250\nduplicates = \"remove\"\n").unwrap();

    icalkit(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains("chunk_size = 250"))
        .stdout(predicate::str::contains("duplicates = \"remove\""))
        .stdout(predicate::str::contains("sort_by = \"dtstart\""));
}
