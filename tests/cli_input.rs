use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn matshow_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_matshow")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "matshow.exe"
            } else {
                "matshow"
            });
            p
        })
}

fn run_with_stdin(input: &[u8], out_path: &Path) -> std::process::ExitStatus {
    let mut child = Command::new(matshow_exe())
        .arg("--no-window")
        .arg("--out")
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait().unwrap()
}

#[test]
fn malformed_json_exits_nonzero_without_output() {
    let dir = PathBuf::from("target").join("cli_input");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("malformed.mp4");
    let _ = std::fs::remove_file(&out_path);

    let status = run_with_stdin(b"[[1, 2", &out_path);
    assert!(!status.success());
    assert!(!out_path.exists());
}

#[test]
fn empty_sequence_exits_nonzero_without_output() {
    let dir = PathBuf::from("target").join("cli_input");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("empty.mp4");
    let _ = std::fs::remove_file(&out_path);

    let status = run_with_stdin(b"[]", &out_path);
    assert!(!status.success());
    assert!(!out_path.exists());
}

#[test]
fn spaced_trailing_comma_exits_nonzero() {
    let dir = PathBuf::from("target").join("cli_input");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("spaced.mp4");
    let _ = std::fs::remove_file(&out_path);

    // ", ]" is not the literal ",]" sequence, so it stays a parse error.
    let status = run_with_stdin(b"[[[1, 2, ]]]", &out_path);
    assert!(!status.success());
    assert!(!out_path.exists());
}
