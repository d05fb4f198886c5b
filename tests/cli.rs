//! CLI integration tests driving the menu over stdin.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn run_with_input(args: &[&str], input: &str) -> Output {
    let bin = env!("CARGO_BIN_EXE_taskmaster");
    let mut child = Command::new(bin)
        .args(args)
        .env_remove("TASKMASTER_FILE")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start taskmaster binary");

    child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");

    child.wait_with_output().expect("failed to wait for taskmaster")
}

#[test]
fn create_save_and_exit() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.txt");
    let input = format!(
        "1\nFinish Report\nQuarterly numbers\n1\n3\n2024-05-15\n5\n{}\n8\n",
        path.display()
    );

    let output = run_with_input(&[], &input);
    assert!(
        output.status.success(),
        "taskmaster exited with non-zero status: {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to TaskMaster!"));
    assert!(stdout.contains("Task \"Finish Report\" has been created successfully!"));
    assert!(stdout.contains("Exiting TaskMaster. Goodbye!"));
    // Output is not a terminal, so no color escapes
    assert!(!stdout.contains('\u{1b}'));

    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        saved,
        "1|Finish Report|Quarterly numbers|Work|High|2024-05-15|Pending\n"
    );
}

#[test]
fn load_on_start_from_default_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.txt");
    std::fs::write(
        &path,
        "2|a||Work|Low|2999-01-01|Pending\n5|b||Personal|Medium|2999-01-02|Completed\n1|c||Urgent|High|2999-01-03|Pending\n",
    )
    .unwrap();

    let path_arg = path.display().to_string();
    let output = run_with_input(&["--file", &path_arg, "--load"], "1\nd\n\n1\n1\n2999-02-01\n5\n\n8\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tasks loaded successfully"));

    let saved = std::fs::read_to_string(&path).unwrap();
    let last = saved.lines().last().unwrap();
    assert!(last.starts_with("6|d|"), "unexpected last line: {last}");
}

#[test]
fn end_of_input_exits_cleanly() {
    let output = run_with_input(&[], "2\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks available."));
    assert!(stdout.contains("Exiting TaskMaster. Goodbye!"));
}

#[test]
fn load_requires_file() {
    let output = run_with_input(&["--load"], "");
    assert!(!output.status.success());
}
