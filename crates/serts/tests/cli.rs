//! End-to-end tests for the `serts` binary.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

const BLOG: &str = r#"{
  "schemas": [
    {
      "name": "PostSerializer",
      "module_path": ["blog"],
      "fields": [
        {"name": "id", "kind": "primitive", "primitive": "integer"},
        {"name": "author", "kind": "nested", "schema": "UserSerializer"}
      ]
    },
    {
      "name": "UserSerializer",
      "module_path": ["blog"],
      "fields": [
        {"name": "id", "kind": "primitive", "primitive": "integer"},
        {"name": "tag", "kind": "choice", "choices": ["a", "b"]}
      ]
    }
  ]
}"#;

const BROKEN: &str = r#"[
  {"name": "Post", "module_path": ["blog"], "fields": [
    {"name": "author", "kind": "nested", "schema": "Ghost"}
  ]}
]"#;

const METHOD_FIELD: &str = r#"[
  {"name": "Post", "fields": [
    {"name": "summary", "kind": "SerializerMethodField"}
  ]}
]"#;

/// A `serts` invocation isolated from the user's config.
fn serts(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("serts").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn workspace(descriptors: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("descriptors.json"), descriptors).unwrap();
    dir
}

#[test]
fn test_generate_writes_files_and_index() {
    let dir = workspace(BLOG);
    serts(dir.path())
        .args(["generate", "descriptors.json", "-o", "out", "--strip-suffix", "Serializer"])
        .assert()
        .success();

    let post = std::fs::read_to_string(dir.path().join("out/blog/Post.ts")).unwrap();
    assert!(post.starts_with("// Auto-generated. Do not edit manually.\n\n"));
    assert!(post.contains("import type { User } from './User';"));
    assert!(post.contains("  author: User;"));

    let index = std::fs::read_to_string(dir.path().join("out/index.ts")).unwrap();
    assert!(index.ends_with("export * from './blog/Post';\nexport * from './blog/User';\n"));
}

#[test]
fn test_generate_second_run_is_unchanged() {
    let dir = workspace(BLOG);
    let args = ["generate", "descriptors.json", "-o", "out"];
    serts(dir.path()).args(args).assert().success();

    let output = serts(dir.path()).args(args).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("0 created, 0 updated, 3 unchanged"), "{stdout}");
}

#[test]
fn test_generate_reads_stdin() {
    let dir = TempDir::new().unwrap();
    serts(dir.path())
        .args(["generate", "-", "-o", "out"])
        .write_stdin(BLOG)
        .assert()
        .success();
    assert!(dir.path().join("out/blog/PostSerializer.ts").exists());
}

#[test]
fn test_generate_dry_run() {
    let dir = workspace(BLOG);
    serts(dir.path())
        .args(["generate", "descriptors.json", "-o", "out", "--dry-run"])
        .assert()
        .success();
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_generate_errors_gate_write() {
    let dir = workspace(BROKEN);
    serts(dir.path())
        .args(["generate", "descriptors.json", "-o", "out"])
        .assert()
        .code(2);
    assert!(!dir.path().join("out").exists());

    serts(dir.path())
        .args(["generate", "descriptors.json", "-o", "out", "--force"])
        .assert()
        .success();
    let post = std::fs::read_to_string(dir.path().join("out/blog/Post.ts")).unwrap();
    assert!(post.contains("  author: unknown;"));
}

#[test]
fn test_generate_deny_warnings() {
    let dir = workspace(METHOD_FIELD);
    serts(dir.path())
        .args(["generate", "descriptors.json", "-o", "out"])
        .assert()
        .success();
    serts(dir.path())
        .args(["generate", "descriptors.json", "-o", "other", "--deny-warnings"])
        .assert()
        .code(2);
    assert!(!dir.path().join("other").exists());
}

#[test]
fn test_generate_malformed_input() {
    let dir = workspace(r#"[{"name": "Post"}, {"name": "Post"}]"#);
    serts(dir.path())
        .args(["generate", "descriptors.json", "-o", "out"])
        .assert()
        .code(1);
}

#[test]
fn test_generate_requires_output_dir() {
    let dir = workspace(BLOG);
    let output = serts(dir.path())
        .args(["generate", "descriptors.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no output directory"));
}

#[test]
fn test_project_config() {
    let dir = workspace(BLOG);
    std::fs::create_dir_all(dir.path().join(".serts")).unwrap();
    std::fs::write(
        dir.path().join(".serts/config.toml"),
        r#"
[output]
dir = "types"
header = ""

[typescript]
optional = "always"

[naming]
strip_suffix = "Serializer"
"#,
    )
    .unwrap();

    serts(dir.path())
        .args(["generate", "descriptors.json"])
        .assert()
        .success();
    let user = std::fs::read_to_string(dir.path().join("types/blog/User.ts")).unwrap();
    assert_eq!(
        user,
        "export interface User {\n  id?: number;\n  tag?: \"a\" | \"b\";\n}\n"
    );
}

#[test]
fn test_check_json_report() {
    let dir = workspace(BROKEN);
    let output = serts(dir.path())
        .args(["check", "descriptors.json", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["translated"], true);
    assert_eq!(report["diagnostics"][0]["kind"], "unresolved_reference");
    assert_eq!(report["diagnostics"][0]["referenced"], "Ghost");
    assert_eq!(report["diagnostics"][0]["field"], "author");
}

#[test]
fn test_check_clean_input() {
    let dir = workspace(BLOG);
    serts(dir.path())
        .args(["check", "descriptors.json"])
        .assert()
        .success();
}

#[test]
fn test_graph_reports_cycles() {
    let dir = workspace(
        r#"[
          {"name": "A", "fields": [{"name": "b", "kind": "nested", "schema": "B"}]},
          {"name": "B", "fields": [{"name": "a", "kind": "nested", "schema": "A"}]}
        ]"#,
    );
    let output = serts(dir.path())
        .args(["graph", "descriptors.json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("A\n  -> B (./B)"), "{stdout}");
    assert!(stdout.contains("1 cycle(s):"), "{stdout}");
    assert!(stdout.contains("A -> B -> A"), "{stdout}");
}
