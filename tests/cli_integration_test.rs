mod common;

use assert_cmd::Command;
use common::repo_with;
use indoc::indoc;
use pretty_assertions::assert_eq;

fn routemap() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_routemap"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_detect_prints_detection_json() {
    let repo = repo_with(&[("Gemfile", "gem 'rails'\n")]);

    let output = routemap().arg("detect").arg(repo.path()).output().unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["language"], "ruby");
    assert_eq!(value["framework"], "rails");
}

#[test]
fn test_routes_jsonl_on_local_directory() {
    let repo = repo_with(&[
        ("package.json", "{}"),
        (
            "server.js",
            indoc! {r#"
                const router = express.Router();
                router.get('/users', listUsers);
                router.post('/users', createUser);
            "#},
        ),
    ]);

    let output = routemap()
        .args(["routes", "--format", "jsonl"])
        .arg(repo.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["method"], "GET");
    assert_eq!(records[1]["method"], "POST");
    assert_eq!(records[1]["routePath"], "/users");
    assert!(records[0].get("explanation").is_none());
}

#[test]
fn test_routes_json_document_to_file() {
    let repo = repo_with(&[
        ("requirements.txt", ""),
        ("app.py", "@app.route('/items', methods=['POST'])\ndef create():\n    return 1\n"),
    ]);
    let out_dir = tempfile::TempDir::new().unwrap();
    let out_file = out_dir.path().join("routes.json");

    routemap()
        .args(["routes", "--format", "json", "--output"])
        .arg(&out_file)
        .arg(repo.path())
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_file).unwrap()).unwrap();
    assert_eq!(value["detection"]["framework"], "flask");
    assert_eq!(value["route_count"], 1);
    assert_eq!(value["routes"][0]["routePath"], "/items");
    assert_eq!(value["truncated"], false);
}

#[test]
fn test_invalid_source_reports_kind() {
    let output = routemap()
        .args(["routes", "ftp://example.com/repo.git"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error[invalid_input]"), "{stderr}");
}

#[test]
fn test_detect_requires_directory() {
    let output = routemap()
        .args(["detect", "/definitely/not/here"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error[invalid_input]"));
}

#[test]
fn test_declarations_json() {
    let repo = repo_with(&[("types.ts", "interface Item { sku: string }\n")]);

    let output = routemap()
        .args(["declarations", "--format", "json"])
        .arg(repo.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["declarations"]["types"][0]["name"], "Item");
    assert_eq!(value["declarations"]["types"][0]["properties"][0], "sku");
}
