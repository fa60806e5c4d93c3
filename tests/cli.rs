use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lox"))
}

struct CommandResult {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn run_cmd(command: &str, source: &str) -> CommandResult {
    let mut file = NamedTempFile::new().expect("Failed to create temp file.");
    file.write_all(source.as_bytes())
        .expect("Failed to write temp source file.");

    let output = Command::new(bin_path())
        .arg(command)
        .arg(file.path())
        .env_remove("RUST_LOG")
        .env_remove("LOXWALK_MAX_DEPTH")
        .output()
        .expect("Failed to execute lox");

    CommandResult {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

#[test]
fn tokenize_lists_tokens_then_eof() {
    let result = run_cmd("tokenize", "var x = 1;");
    assert_eq!(result.code, Some(0));
    assert_eq!(
        result.stdout,
        "VAR var null\nIDENTIFIER x null\nEQUAL = null\nNUMBER 1 1.0\nSEMICOLON ; null\nEOF  null\n"
    );
}

#[test]
fn tokenize_reports_lex_errors_with_exit_65() {
    let result = run_cmd("tokenize", "(@)");
    assert_eq!(result.code, Some(65));
    assert_eq!(result.stdout, "LEFT_PAREN ( null\nRIGHT_PAREN ) null\nEOF  null\n");
    assert!(result.stderr.contains("[line 1] Error: Unexpected character: @"));
}

#[test]
fn parse_prints_group_rendering() {
    let result = run_cmd("parse", "(5)");
    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "(group 5)\n");
}

#[test]
fn parse_evaluates_left_to_right() {
    let result = run_cmd("parse", "1 + 2 * 3");
    assert_eq!(result.stdout, "9\n");
}

#[test]
fn parse_formats_numbers_without_exponent() {
    let result = run_cmd("parse", "0.00001");
    assert_eq!(result.stdout, "0.00001\n");

    let program = run_cmd("run", "print 0.00001;");
    assert_eq!(program.stdout, "1e-05\n");
}

#[test]
fn run_executes_program() {
    let source = "
        var greeting = \"hello\";
        var n = 3;
        if (n < 2) {
            print \"small\";
        } else if (n == 3) {
            print greeting + \" three\";
        } else {
            print \"big\";
        }
        n = n - 1;
        print n;
    ";
    let result = run_cmd("run", source);
    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "hello three\n2\n");
}

#[test]
fn run_survives_long_flat_chain() {
    let source = format!("print {};", vec!["1"; 100_000].join(" + "));
    let result = run_cmd("run", &source);
    assert_eq!(result.code, Some(0));
    assert_eq!(result.stdout, "nil\n");
}

#[test]
fn run_failure_exits_70() {
    let result = run_cmd("run", "print 1;\nvar x = 2\n");
    assert_eq!(result.code, Some(70));
    assert_eq!(result.stdout, "1\n");
    assert!(result.stderr.contains("no semicolon found after declaration"));
}

#[test]
fn run_refuses_source_with_lex_errors() {
    let result = run_cmd("run", "print 1; #");
    assert_eq!(result.code, Some(65));
    assert_eq!(result.stdout, "");
}

#[test]
fn unknown_command_is_usage_error() {
    let result = run_cmd("compile", "print 1;");
    assert_eq!(result.code, Some(1));
    assert!(result.stderr.contains("Unknown command: compile"));
}
