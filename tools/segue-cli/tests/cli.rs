use std::path::PathBuf;
use std::process::Command;

fn segue() -> Command {
    Command::new(env!("CARGO_BIN_EXE_segue"))
}

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-project")
}

#[test]
fn build_prints_timeline_summary() {
    let output = segue().arg("build").arg(fixture_root()).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Timeline: 26.000s"));
    assert!(stdout.contains("Transitions: 2"));
}

#[test]
fn build_json_is_parseable() {
    let output = segue()
        .args(["build", "--json", "--curve", "none"])
        .arg(fixture_root())
        .output()
        .unwrap();
    assert!(output.status.success());

    let timeline: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(timeline["status"], "built");
    assert_eq!(timeline["placed"].as_array().map(Vec::len), Some(3));
}

#[test]
fn unknown_curve_is_rejected() {
    let output = segue()
        .args(["build", "--curve", "wipe"])
        .arg(fixture_root())
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn init_then_export() {
    let dir = std::env::temp_dir().join("segue_cli_test_init");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let status = segue()
        .args(["init", "demo", "--output"])
        .arg(&dir)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.join("demo").join("meta").join("project.json").exists());

    let status = segue().arg("export").arg(dir.join("demo")).status().unwrap();
    assert!(status.success());
    assert!(dir
        .join("demo")
        .join("exports")
        .join("render-plan.json")
        .exists());

    std::fs::remove_dir_all(&dir).ok();
}
