use assert_cmd::Command;

fn cli() -> Command {
    Command::cargo_bin("mermend-cli").expect("binary builds")
}

#[test]
fn detect_reads_stdin_and_prints_the_dialect() {
    cli()
        .arg("detect")
        .write_stdin("stateDiagram-v2\n[*] --> A\n")
        .assert()
        .success()
        .stdout("stateDiagram\n");
}

#[test]
fn convert_transpiles_a_state_diagram_from_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("in.mmd");
    std::fs::write(&path, "stateDiagram-v2\nIdle --> Busy: start\n").expect("write fixture");

    let assert = cli().arg("convert").arg(&path).assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    assert!(out.starts_with("flowchart LR"));
    assert!(out.contains("Idle -- \"start\" --> Busy"));
}

#[test]
fn convert_json_tags_the_outcome() {
    let assert = cli()
        .args(["convert", "--json"])
        .write_stdin("this is prose, not a diagram")
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value["kind"], "explanation");
}

#[test]
fn detect_json_wraps_the_dialect() {
    let assert = cli()
        .args(["detect", "--json"])
        .write_stdin("erDiagram\nUSER {\n}\n")
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value["dialect"], "erDiagram");
}

#[test]
fn clean_only_repairs_without_converting() {
    let assert = cli()
        .arg("clean")
        .write_stdin("```mermaid\nflowchart TD\nA[需求 分析] --> B\n```")
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8");
    assert!(out.starts_with("flowchart TD"));
    assert!(out.contains("A[\"需求 分析\"]"));
    assert!(!out.contains("```"));
}

#[test]
fn unknown_flags_print_usage_and_fail() {
    cli().arg("--nope").assert().code(2);
}
