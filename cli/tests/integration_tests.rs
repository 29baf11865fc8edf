use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Definition used by most tests: a copy-like tool.
fn write_definition(dir: &Path) -> PathBuf {
    let yaml = r#"description: Copies files.
help:
  prefix: "--"
parameters:
  - name: src
    required: true
    min_values: 1
    max_values: 4
    description: Source files
  - name: dst
    min_values: 1
    max_values: 1
  - name: mode
    min_values: 1
    max_values: 1
    values: [fast, safe]
  - name: v
"#;
    let path = dir.join("copy.yaml");
    fs::write(&path, yaml).expect("failed to write definition");
    path
}

fn cla(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cla"))
        .args(args)
        .output()
        .expect("failed to run cla")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_tokens_outputs_json() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&[
        "parse",
        "--definition",
        def.to_str().unwrap(),
        "--",
        "-src",
        "a",
        "b",
        "-mode",
        "safe",
        "-v",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["parameters"]["src"], serde_json::json!(["a", "b"]));
    assert_eq!(json["parameters"]["mode"], serde_json::json!(["safe"]));
    assert_eq!(json["parameters"]["v"], serde_json::json!([]));
    assert_eq!(json["warnings"], serde_json::json!([]));
}

#[test]
fn parse_line_outputs_table() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&[
        "parse",
        "--definition",
        def.to_str().unwrap(),
        "--format",
        "table",
        "--line",
        r#"-src "my file.txt" -dst out"#,
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("src  my file.txt"));
    assert!(text.contains("dst  out"));
}

#[test]
fn parse_rejection_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&[
        "parse",
        "--definition",
        def.to_str().unwrap(),
        "--",
        "-src",
        "a",
        "-mode",
        "turbo",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("value \"turbo\" invalid for parameter \"mode\""));
}

#[test]
fn parse_missing_required_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&["parse", "--definition", def.to_str().unwrap(), "--", "-v"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("parameter \"src\" required"));
}

#[test]
fn parse_run_prints_help_before_result() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&[
        "parse",
        "--definition",
        def.to_str().unwrap(),
        "--run",
        "--format",
        "table",
        "--",
        "--help",
        "-src",
        "x",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let help_at = text.find("Copies files.").expect("help listing missing");
    let result_at = text.find("src   x").expect("result table missing");
    assert!(help_at < result_at);
    assert!(text.contains("-src value{1-4}   \"Source files\"   <<required>>"));
}

#[test]
fn parse_marker_value_reports_warning() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&[
        "parse",
        "--definition",
        def.to_str().unwrap(),
        "--",
        "-src",
        "a",
        "-dst",
        "-v",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["parameters"]["dst"], serde_json::json!(["-v"]));
    assert_eq!(json["warnings"][0]["shadowed"], "v");
}

// ---------------------------------------------------------------------------
// validate / help
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_definition() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&["validate", "--definition", def.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("5 parameters OK"));
}

#[test]
fn validate_rejects_inverted_cardinality() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"parameters": [{"name": "n", "min_values": 3, "max_values": 1}]}"#,
    )
    .unwrap();

    let output = cla(&["validate", "--definition", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("requires 3 values but allows at most 1"));
}

#[test]
fn help_lists_parameters_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let def = write_definition(dir.path());

    let output = cla(&["help", "--definition", def.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let dst = text.find("-dst value{1}").unwrap();
    let help = text.find("--help").unwrap();
    let mode = text.find("-mode [fast|safe]{1}").unwrap();
    let src = text.find("-src").unwrap();
    assert!(dst < help && help < mode && mode < src);
}

#[test]
fn unsupported_definition_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("defs.txt");
    fs::write(&path, "").unwrap();

    let output = cla(&["help", "--definition", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unsupported definition format"));
}
