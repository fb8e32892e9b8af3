//! End-to-end tests driving the compiled `ontoc` binary.

use std::process::Command;

fn ontoc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ontoc"))
}

#[test]
fn compiles_file_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pipeline.dsl");
    std::fs::write(&input, "VALIDATE ghg_report WITH \"total_equals_sum\"\n").unwrap();

    let output = ontoc().arg(&input).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("// VALIDATE: ghg_report WITH total_equals_sum"));
    assert!(stdout.contains("RETURN n;"));
}

#[test]
fn writes_output_file_instead_of_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("load.dsl");
    let out = dir.path().join("load.cypher");
    std::fs::write(
        &input,
        "LOAD_CSV \"level1.csv\" AS measurement MAP_COLUMNS { factory -> factory_id }\n",
    )
    .unwrap();

    let output = ontoc()
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("// LOAD_CSV: level1.csv AS measurement"));
    assert!(written.contains("MERGE (m)-[:AT_FACTORY]->(f);"));
}

#[test]
fn emit_ast_dumps_parsed_program_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("one.dsl");
    std::fs::write(&input, "VALIDATE report WITH \"rule\"\n").unwrap();

    let output = ontoc()
        .arg(&input)
        .arg("--emit")
        .arg("ast")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["statements"][0]["Validate"]["rule_name"], "rule");
}

#[test]
fn missing_input_file_fails() {
    let output = ontoc().arg("/nonexistent/pipeline.dsl").output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read input file"));
}

#[test]
fn syntax_error_reports_location_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.dsl");
    std::fs::write(&input, "VALIDATE 42 WITH \"r\"\n").unwrap();

    let output = ontoc().arg(&input).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("line 1, column 10"));
}

#[test]
fn diagnostics_go_to_stderr_not_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("v.dsl");
    std::fs::write(&input, "VALIDATE r WITH \"x\"\n").unwrap();

    let output = ontoc().arg(&input).arg("--verbose").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(!stdout.contains("Parsing"));
    assert!(stderr.contains("Parsed 1 statements"));
}
