use std::io::Write;
use std::process::{Command, Output, Stdio};

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "portalgun-cli-{label}-{}.json",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run_with_input(args: &[&str], input: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_portalgun");
    let mut child = Command::new(exe)
        .args(args)
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(input.as_bytes())
        .expect("write answers");
    child.wait_with_output().expect("run cli")
}

#[test]
fn cli_without_arguments_prints_usage() {
    let output = run_with_input(&[], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Incorrect parameters"));
}

#[test]
fn cli_single_argument_prints_usage() {
    let output = run_with_input(&["1"], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Incorrect parameters"));
}

#[test]
fn cli_lists_strategies() {
    let output = run_with_input(&["--list-strategies"], "");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available strategies"));
    assert!(stdout.contains("classic"));
    assert!(stdout.contains("LazyMorty"));
}

#[test]
fn cli_unknown_morty_fails_with_details() {
    let output = run_with_input(&["--boxes", "3", "--morty", "unknownMorty"], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Incorrect parameters"));
    assert!(stderr.contains("Details:"));
    assert!(stderr.contains("Morty module not found"));
}

#[test]
fn cli_rejects_two_boxes() {
    let output = run_with_input(&["--boxes", "2", "--morty", "classic"], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("boxes must be an integer > 2"));
}

#[test]
fn cli_plays_fixed_rounds_and_reports() {
    // Per round: Rick's number, guess, stay.
    let output = run_with_input(
        &["--boxes", "3", "--morty", "lazy", "--rounds", "2"],
        "0\n0\n1\n1\n2\n1\n",
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded Morty: LazyMorty"));
    assert!(stdout.contains("Morty HMAC1="));
    assert!(stdout.contains("Morty HMAC2="));
    assert!(stdout.contains("Check HMAC1: OK"));
    assert!(stdout.contains("Check HMAC2: OK"));
    assert!(stdout.contains("GAME STATS"));
    assert!(stdout.contains("| Rounds       | 0             | 2           |"));
    assert!(stdout.contains("| P (exact)    | 0.667         | 0.333       |"));
}

#[test]
fn cli_asks_to_continue_without_round_cap() {
    let output = run_with_input(&["3", "classic", "--report", "json"], "0\n1\n0\n1\nn\n");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Do you want to play another round (y/n)?"));
    let json_start = stdout.find("{\n").expect("json report");
    let report: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("report parses");
    assert_eq!(report["rounds"], 1);
    assert_eq!(report["strategy"], "ClassicMorty");
}

#[test]
fn cli_closed_input_reports_partial_stats() {
    let output = run_with_input(&["--morty", "lazy", "--rounds", "3"], "0\n0\n0\n");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("GAME STATS"));
    assert!(stderr.contains("session ended early after 1 completed rounds"));
}

#[test]
fn cli_input_ending_at_continue_prompt_is_a_normal_exit() {
    let output = run_with_input(&["--boxes", "3", "--morty", "lazy"], "0\n0\n1\n");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Do you want to play another round (y/n)?"));
    assert!(stdout.contains("| Rounds       | 0             | 1           |"));
}

#[test]
fn cli_loads_descriptor_file() {
    let path = temp_path("descriptor");
    std::fs::write(
        &path,
        r#"[{"name": "TopMorty", "description": "keeps the highest other box", "keep": "highest"}]"#,
    )
    .expect("write descriptor");
    let output = run_with_input(
        &["--morty", path.to_str().unwrap(), "--rounds", "1", "--seed", "9"],
        "0\n0\n0\n",
    );
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded Morty: TopMorty"));
    assert!(stdout.contains("TopMorty: keeps the highest other box"));
}
