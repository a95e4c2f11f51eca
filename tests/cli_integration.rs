//! CLI integration tests for Rigging.
//!
//! These tests run the binary against workspaces written to temporary
//! directories.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the rigging binary command, isolated from the host environment.
fn rigging(home: &Path, toolset: &str) -> Command {
    let mut cmd = Command::cargo_bin("rigging").unwrap();
    cmd.env("HOME", home)
        .env("RIGGING_TOOLSET", toolset)
        .env_remove("CC")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// The `samples` workspace: v1..v4 each requiring the shared library so_5.
fn samples() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "Rigging.toml",
        r#"[root]
name = "samples"
cpp-std = "c++14"
include-paths = ["."]
projects = ["v1", "v2", "v3", "v4"]
"#,
    );
    write(
        root,
        "so_5/Project.toml",
        "[target]\nname = \"so.5.5\"\nkind = \"lib\"\nsources = [\"*.cpp\"]\n",
    );
    write(root, "so_5/agent.cpp", "int agent() { return 0; }\n");
    for i in 1..=4 {
        write(
            root,
            &format!("v{}/Project.toml", i),
            &format!(
                "[target]\nname = \"v{i}_app\"\nkind = \"exe\"\nsources = [\"main.cpp\"]\nrequires = [\"so_5\"]\n"
            ),
        );
        write(root, &format!("v{}/main.cpp", i), "int main() { return 0; }\n");
    }
    tmp
}

fn cyclic() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "Rigging.toml", "[root]\nname = \"loop\"\nprojects = [\"p1\"]\n");
    write(
        root,
        "p1/Project.toml",
        "[target]\nname = \"p1\"\nkind = \"exe\"\nsources = [\"main.cpp\"]\nrequires = [\"p2\"]\n",
    );
    write(
        root,
        "p2/Project.toml",
        "[target]\nname = \"p2\"\nkind = \"lib\"\nsources = [\"lib.cpp\"]\nrequires = [\"p1\"]\n",
    );
    tmp
}

// ============================================================================
// rigging resolve
// ============================================================================

#[test]
fn test_resolve_shared_dependency() {
    let ws = samples();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .args(["resolve", "--waves"])
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("projects: 5"))
        .stdout(predicate::str::contains("so_5 [lib so.5.5] <- 4 requirer(s)"))
        .stdout(predicate::str::contains("wave 1: v1 v2 v3 v4"));
}

#[test]
fn test_resolve_from_subdirectory() {
    let ws = samples();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "clang")
        .arg("resolve")
        .current_dir(ws.path().join("v2"))
        .assert()
        .success()
        .stdout(predicate::str::contains("root: samples"));
}

#[test]
fn test_cycle_fails_with_path() {
    let ws = cyclic();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .arg("resolve")
        .current_dir(ws.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("p1 -> p2 -> p1"));
}

#[test]
fn test_missing_project_names_node() {
    let ws = samples();
    write(
        ws.path(),
        "v4/Project.toml",
        "[target]\nname = \"v4_app\"\nkind = \"exe\"\nsources = [\"main.cpp\"]\nrequires = [\"so_6\"]\n",
    );
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .arg("resolve")
        .current_dir(ws.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find project `so_6`"))
        .stderr(predicate::str::contains("required by `v4`"));
}

#[test]
fn test_empty_toolset_env_is_fatal() {
    let ws = samples();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "")
        .arg("resolve")
        .current_dir(ws.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not identify the active toolset"));
}

#[test]
fn test_no_root_descriptor() {
    let tmp = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .arg("resolve")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rigging.toml"));
}

#[test]
fn test_resolve_brief_prints_summary_only() {
    let ws = samples();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .args(["resolve", "--brief"])
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("projects: 5"))
        .stdout(predicate::str::contains("requirer(s)").not());
}

#[test]
fn test_resolve_brief_from_config() {
    let ws = samples();
    write(ws.path(), ".rigging/config.toml", "[build]\nbrief = true\n");
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .args(["resolve", "--waves"])
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("requirer(s)").not())
        .stdout(predicate::str::contains("wave 1: v1 v2 v3 v4"));
}

#[test]
fn test_override_descriptor_takes_over_policy() {
    let ws = samples();
    write(ws.path(), "local-build.toml", "runtime-mode = \"debug\"\n");
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .arg("resolve")
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("policy: override-defined"));
}

// ============================================================================
// rigging plan
// ============================================================================

#[test]
fn test_plan_json() {
    let ws = samples();
    let home = TempDir::new().unwrap();

    let output = rigging(home.path(), "gcc")
        .arg("plan")
        .current_dir(ws.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["root"], "samples");
    assert_eq!(plan["units"].as_array().unwrap().len(), 5);
    assert_eq!(plan["units"][0]["name"], "so_5");
    assert_eq!(plan["globals"]["linker_args"][0], "-pthread");
    assert_eq!(plan["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn test_plan_to_file_with_manifest_path() {
    let ws = samples();
    let home = TempDir::new().unwrap();
    let out = home.path().join("plan.json");

    rigging(home.path(), "msvc")
        .arg("plan")
        .arg("--manifest-path")
        .arg(ws.path().join("Rigging.toml"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let plan: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(plan["toolset"]["id"], "msvc");
    assert!(plan["globals"]["linker_args"].as_array().unwrap().is_empty());
}

// ============================================================================
// rigging tree / toolset
// ============================================================================

#[test]
fn test_tree_marks_shared_dependency() {
    let ws = samples();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .arg("tree")
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("samples"))
        .stdout(predicate::str::contains("so_5 (lib) (*)"));
}

#[test]
fn test_tree_discovered_lists_without_resolving() {
    let ws = cyclic();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .args(["tree", "--discovered"])
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("p1 [exe p1]"))
        .stdout(predicate::str::contains("p2 [lib p2]"));
}

#[test]
fn test_tree_discovered_with_relative_manifest_path() {
    let ws = samples();
    let home = TempDir::new().unwrap();

    rigging(home.path(), "gcc")
        .args(["tree", "--discovered", "--manifest-path", "Rigging.toml"])
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("so_5 [lib so.5.5]"))
        .stdout(predicate::str::contains("v4 [exe v4_app]"));
}

#[test]
fn test_toolset_unknown_gets_no_options() {
    let home = TempDir::new().unwrap();

    rigging(home.path(), "icc")
        .arg("toolset")
        .current_dir(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("toolset: icc"))
        .stdout(predicate::str::contains("global options: (none)"));
}

#[test]
fn test_toolset_from_project_config() {
    let ws = samples();
    write(ws.path(), ".rigging/config.toml", "[toolset]\nname = \"clang\"\n");
    let home = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("rigging").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RIGGING_TOOLSET")
        .env_remove("CC")
        .arg("toolset")
        .current_dir(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("toolset: clang"))
        .stdout(predicate::str::contains("origin: config"))
        .stdout(predicate::str::contains("-pthread"));
}

#[test]
fn test_bundled_samples_plan() {
    let samples = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/samples/Rigging.toml");
    let home = TempDir::new().unwrap();

    let output = rigging(home.path(), "clang")
        .arg("plan")
        .arg("--manifest-path")
        .arg(&samples)
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["waves"][0].as_array().unwrap().len(), 2);
    assert_eq!(plan["waves"][1].as_array().unwrap().len(), 4);
    assert_eq!(plan["units"][0]["sources"][0], "so_5/agent.cpp");

    let units = plan["units"].as_array().unwrap();
    let variant = units.iter().find(|u| u["name"] == "so_5/static").unwrap();
    assert_eq!(variant["artifact"], "libso.5.5_s.a");
    let v2 = units.iter().find(|u| u["name"] == "v2").unwrap();
    assert_eq!(v2["deps"][0], "so_5/static");
}
