use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

#[test]
fn pack_then_unpack_roundtrip() {
    let exe = env!("CARGO_BIN_EXE_linepack");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("service.log");

    let mut content = String::new();
    for i in 0..500 {
        content.push_str(&format!("[shard-{}] flushed {} entries\n", i % 4, i));
    }
    fs::write(&input, &content).unwrap();

    let status = Command::new(exe)
        .args(["-l", "6", input.to_str().unwrap()])
        .status()
        .expect("pack failed to launch");
    assert!(status.success());

    let packed = dir.path().join("service.log.lp");
    assert!(packed.exists());
    assert!(fs::metadata(&packed).unwrap().len() < content.len() as u64);

    // unpacking writes back to service.log, which still exists
    fs::remove_file(&input).unwrap();

    let status = Command::new(exe)
        .args(["-d", packed.to_str().unwrap()])
        .status()
        .expect("unpack failed to launch");
    assert!(status.success());

    assert_eq!(fs::read_to_string(&input).unwrap(), content);
}

#[test]
fn unpack_refuses_unknown_extension() {
    let exe = env!("CARGO_BIN_EXE_linepack");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notpacked.log");
    fs::write(&input, "data\n").unwrap();

    let output = Command::new(exe)
        .args(["-d", input.to_str().unwrap()])
        .output()
        .expect("launch failed");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(".lp expected"));
}

#[test]
fn declining_the_overwrite_prompt_keeps_the_file() {
    let exe = env!("CARGO_BIN_EXE_linepack");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    let packed = dir.path().join("app.log.lp");
    fs::write(&input, "fresh line\n").unwrap();
    fs::write(&packed, "sentinel").unwrap();

    let mut child = Command::new(exe)
        .arg(input.to_str().unwrap())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("launch failed");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"n\n")
        .expect("write to stdin failed");
    let output = child.wait_with_output().expect("wait failed");

    assert!(output.status.success());
    assert_eq!(fs::read(&packed).unwrap(), b"sentinel");
}

#[test]
fn force_overwrites_without_a_prompt() {
    let exe = env!("CARGO_BIN_EXE_linepack");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    let packed = dir.path().join("app.log.lp");
    fs::write(&input, "only line\nonly line\n").unwrap();
    fs::write(&packed, "sentinel").unwrap();

    let status = Command::new(exe)
        .args(["--force", input.to_str().unwrap()])
        .status()
        .expect("launch failed");
    assert!(status.success());
    assert_ne!(fs::read(&packed).unwrap(), b"sentinel");
}

#[test]
fn json_summary_reports_byte_counts() {
    let exe = env!("CARGO_BIN_EXE_linepack");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    fs::write(&input, "a line\na line\n").unwrap();

    let output = Command::new(exe)
        .args(["--json", input.to_str().unwrap()])
        .output()
        .expect("launch failed");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"input_bytes\": 14"), "stdout: {stdout}");
    assert!(stdout.contains("ratio_percent"), "stdout: {stdout}");
}

#[test]
fn truncated_archive_fails_with_a_message() {
    let exe = env!("CARGO_BIN_EXE_linepack");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.log");
    fs::write(&input, "one\ntwo\nthree\n").unwrap();

    let status = Command::new(exe)
        .arg(input.to_str().unwrap())
        .status()
        .expect("launch failed");
    assert!(status.success());

    let packed = dir.path().join("app.log.lp");
    let mut bytes = fs::read(&packed).unwrap();
    bytes.pop();
    fs::write(&packed, &bytes).unwrap();

    fs::remove_file(&input).unwrap();
    let output = Command::new(exe)
        .args(["-d", packed.to_str().unwrap()])
        .output()
        .expect("launch failed");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("truncated"));
}
