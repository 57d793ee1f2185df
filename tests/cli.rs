use std::io::Write;
use std::process::{Command, Output, Stdio};

fn zen_lisp() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_zen-lisp"));
    command.env_remove("RUST_LOG").arg("--color").arg("never");
    command
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = zen_lisp()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn zen-lisp");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_version_flag() {
    let output = zen_lisp().arg("--version").output().expect("Failed to execute zen-lisp");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("zen-lisp"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_evaluates_source_argument() {
    let output = zen_lisp().arg("(+ 1 2 3)").output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "6\n");
}

#[test]
fn test_inputs_are_bound() {
    let output = zen_lisp()
        .arg("{... $1 newValue (+ (value $1) 10)}")
        .arg("--input")
        .arg(r#"{"1": {"value": 45}}"#)
        .arg("--compact")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "{\"value\":45,\"newValue\":55}\n");
}

#[test]
fn test_pretty_output_by_default() {
    let output = zen_lisp().arg("{a 1 b (list 1 2)}").output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ]\n}\n"
    );
}

#[test]
fn test_source_and_inputs_from_files() {
    let dir = std::env::temp_dir().join(format!("zen-lisp-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let source = dir.join("rule.zen");
    let inputs = dir.join("inputs.json");
    let out = dir.join("out.json");
    std::fs::write(&source, "(defun (grade v) (if (> v 50) \"High\" \"Low\"))\n(grade (score $row))\n").unwrap();
    std::fs::write(&inputs, r#"{"row": {"score": 72}}"#).unwrap();

    let output = zen_lisp()
        .arg("--file")
        .arg(&source)
        .arg("--input-file")
        .arg(&inputs)
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "\"High\"\n");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_runtime_error_exit_code() {
    let output = zen_lisp().arg("(unknown 1 2)").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("error[E0201]: unknown function or property: unknown"));
    assert!(stderr.contains("aborting due to 1 error"));
}

#[test]
fn test_parse_error_exit_code() {
    let output = zen_lisp().arg("(+ 1 2").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("error[E0101]"));
}

#[test]
fn test_invalid_inputs() {
    let output = zen_lisp().arg("1").arg("--input").arg("[1, 2]").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("inputs must be a JSON object"));
}

#[test]
fn test_max_depth_flag() {
    let output = zen_lisp()
        .arg("(defun (f n) (f n)) (f 1)")
        .arg("--max-depth")
        .arg("50")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("maximum evaluation depth of 50 exceeded"));
}

#[test]
fn test_print_goes_to_stdout() {
    let output = zen_lisp().arg("(print \"hello\" 1) 2").output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "hello 1\n2\n");
}

#[test]
fn test_interactive_session() {
    let output = run_with_stdin(&[], "(set x 5)\n(nope)\n(* x 2)\nexit\n(+ 1 1)\n");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("> 5\n"));
    assert!(stdout.contains("> 10\n"));
    assert!(!stdout.contains("> 2\n"));
    assert!(stderr_of(&output).contains("error[E0201]"));
}

#[test]
fn test_interactive_session_prints_structures_as_json() {
    let output = run_with_stdin(&[], "{a 1 b (list 1 \"x\")}\n(list)\n\"hi\"\n");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("> {\n  \"a\": 1,\n  \"b\": [\n    1,\n    \"x\"\n  ]\n}\n"));
    assert!(stdout.contains("> []\n"));
    assert!(stdout.contains("> hi\n"));
}

#[test]
fn test_deeply_nested_result() {
    let depth = 6000;
    let dir = std::env::temp_dir().join(format!("zen-lisp-deep-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let source = dir.join("deep.zen");
    std::fs::write(&source, format!("{}1{}", "(list ".repeat(depth), ")".repeat(depth))).unwrap();

    let output = zen_lisp().arg("--file").arg(&source).arg("--compact").output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(
        stdout_of(&output),
        format!("{}1{}\n", "[".repeat(depth), "]".repeat(depth))
    );

    let output = zen_lisp().arg("--file").arg(&source).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).starts_with("[\n  [\n"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_interactive_session_ends_at_eof() {
    let output = run_with_stdin(&[], "(+ 1 2)\n");
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("3"));
}

#[test]
fn test_completions() {
    let output = zen_lisp().arg("complete").arg("bash").output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("zen-lisp"));
}
