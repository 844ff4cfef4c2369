//! End-to-end smoke tests for the maquette binary.
//!
//! These run the compiled CLI against small fixture files and check the
//! derive/validate/apply workflow from the outside.

use std::fs;
use std::process::Command;

fn layout_fixture() -> &'static str {
    r#"{
        "pageSize": {"width": 595.0, "height": 842.0},
        "pages": [{"objects": {"foreground": [
            {"type": "text", "id": 1, "geometry": "40 60 515 90",
             "transform": "1 0 0 1 0 0", "textType": "headline",
             "story": "<h1>Fixture headline</h1>"},
            {"type": "image", "id": 2, "geometry": "40 180 515 290",
             "transform": "1 0 0 1 0 0", "imageType": "feature image"}
        ]}}]
    }"#
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_maquette"))
}

#[test]
fn test_fields_derives_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = dir.path().join("layout.json");
    fs::write(&layout, layout_fixture()).expect("write fixture");

    let output = bin()
        .arg("fields")
        .arg(&layout)
        .output()
        .expect("binary runs");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"headline\""));
    assert!(stdout.contains("\"feature_image\""));
    assert!(stdout.contains("Fixture headline"));
}

#[test]
fn test_validate_fails_on_missing_mandatory_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = dir.path().join("layout.json");
    let values = dir.path().join("values.json");
    fs::write(&layout, layout_fixture()).expect("write fixture");
    fs::write(&values, r#"{"headline": ""}"#).expect("write values");

    let output = bin()
        .arg("validate")
        .arg(&layout)
        .arg("--values")
        .arg(&values)
        .output()
        .expect("binary runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("headline"), "stderr: {stderr}");
}

#[test]
fn test_apply_writes_rehydrated_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = dir.path().join("layout.json");
    let values = dir.path().join("values.json");
    let out = dir.path().join("out.json");
    fs::write(&layout, layout_fixture()).expect("write fixture");
    fs::write(&values, r#"{"headline": "Edited headline"}"#).expect("write values");

    let output = bin()
        .arg("apply")
        .arg(&layout)
        .arg("--values")
        .arg(&values)
        .arg("--output")
        .arg(&out)
        .output()
        .expect("binary runs");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let written = fs::read_to_string(&out).expect("output written");
    // The wrapper tag survives the edit.
    assert!(written.contains("<h1>Edited headline</h1>"));
}
