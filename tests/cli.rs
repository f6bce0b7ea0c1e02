//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::{Command, Output};

const SEED: &str = "\
default:
- id: home
  label: Home
  route: /
  icon: house
  status: 1
- id: reports
  label: Reports
  icon: chart
  status: 1
  order: 1
  submenu:
  - id: sales
    label: Sales
    route: /reports/sales
    icon: dot
    status: 1
    level: 1
    parentId: reports
";

const SCRIPT: &str = "\
- op: insert_submenu_item
  parent: reports
- op: update_item
  id: tmp-1
  patch: { label: Inventory, icon: box, route: /reports/inventory }
";

fn run_menutree(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_menutree");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env("MENUTREE_STORE", dir.join("store.yaml"))
        .env_remove("MENUTREE_BACKEND_URL")
        .env_remove("MENUTREE_RECORD")
        .env_remove("MENUTREE_SCOPE")
        .output()
        .expect("failed to run menutree binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn seeded() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("store.yaml"), SEED).unwrap();
    std::fs::write(dir.path().join("script.yaml"), SCRIPT).unwrap();
    dir
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_menutree(dir.path(), &["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn show_on_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_menutree(dir.path(), &["show"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Menu 'default' is empty."));
}

#[test]
fn show_filters_by_query() {
    let dir = seeded();
    let output = run_menutree(dir.path(), &["show", "--query", "sales"]);
    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("Reports (reports)"));
    assert!(text.contains("  Sales (sales) /reports/sales"));
    assert!(!text.contains("Home"));
}

#[test]
fn check_rejects_broken_tree() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.yaml"), "- id: a\n  label: A\n  status: 1\n  level: 4\n").unwrap();
    let output = run_menutree(dir.path(), &["check", "bad.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("level 4"));
}

#[test]
fn apply_then_payload_shows_wrapper_and_create() {
    let dir = seeded();
    assert!(run_menutree(dir.path(), &["pull", "--out", "base.yaml"]).status.success());
    let applied = run_menutree(dir.path(), &["apply", "base.yaml", "script.yaml", "--out", "work.yaml"]);
    assert!(applied.status.success());
    assert!(stdout(&applied).contains("step 1: created tmp-1"));

    let payload = run_menutree(dir.path(), &["payload", "base.yaml", "work.yaml"]);
    assert!(payload.status.success());
    let forest: serde_json::Value = serde_json::from_slice(&payload.stdout).unwrap();
    assert_eq!(forest[0]["op"], "path");
    assert_eq!(forest[0]["id"], "reports");
    assert_eq!(forest[0]["submenu"][0]["op"], "upsert");
    assert_eq!(forest[0]["submenu"][0]["label"], "Inventory");
    assert!(forest[0]["submenu"][0].get("id").is_none());
}

#[test]
fn pull_edit_sync_round_trip() {
    let dir = seeded();
    assert!(run_menutree(dir.path(), &["pull", "--out", "menu.yaml"]).status.success());
    assert!(run_menutree(dir.path(), &["apply", "menu.yaml", "script.yaml", "--out", "menu.yaml"])
        .status
        .success());

    let dry = run_menutree(dir.path(), &["sync", "menu.yaml", "--dry-run"]);
    assert!(dry.status.success());
    assert!(stdout(&dry).contains("CREATE (new): Inventory"));

    let synced = run_menutree(dir.path(), &["sync", "menu.yaml"]);
    assert!(synced.status.success(), "{}", String::from_utf8_lossy(&synced.stderr));
    assert!(stdout(&synced).contains("Synced: 1 created"));

    let rewritten = std::fs::read_to_string(dir.path().join("menu.yaml")).unwrap();
    assert!(!rewritten.contains("tmp-1"));

    let again = run_menutree(dir.path(), &["sync", "menu.yaml"]);
    assert!(stdout(&again).contains("No changes to sync."));
}

#[test]
fn sync_refuses_incomplete_items() {
    let dir = seeded();
    std::fs::write(dir.path().join("blank.yaml"), "- op: insert_root_item\n").unwrap();
    assert!(run_menutree(dir.path(), &["pull", "--out", "menu.yaml"]).status.success());
    assert!(run_menutree(dir.path(), &["apply", "menu.yaml", "blank.yaml", "--out", "menu.yaml"])
        .status
        .success());

    let output = run_menutree(dir.path(), &["sync", "menu.yaml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("item 'tmp-1' is missing its label"), "{stderr}");
}
