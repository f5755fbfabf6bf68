//! The repowiki binary as a user runs it

mod support;

use support::{Workspace, run_cli};

#[test]
fn test_help_lists_subcommands() {
    let output = run_cli(&["--help"], None);
    assert_eq!(output.status, 0);
    for name in ["index", "scan", "analyze", "init"] {
        assert!(output.stdout.contains(name), "missing {name} in help");
    }
}

#[test]
fn test_unknown_subcommand_fails() {
    let output = run_cli(&["publish"], None);
    assert_ne!(output.status, 0);
    assert!(output.stderr.contains("publish"));
}

#[test]
fn test_index_requires_paths() {
    let output = run_cli(&["index"], None);
    assert_ne!(output.status, 0);
}

#[test]
fn test_index_missing_repository_exits_non_zero() {
    let workspace = Workspace::new();
    let output = run_cli(
        &["index", "does-not-exist", "--no-generate"],
        Some(workspace.path()),
    );
    assert_ne!(output.status, 0);
    assert!(output.stderr.contains("1 of 1 repositories failed to index"));
}

#[test]
fn test_index_writes_documentation_and_json_summary() {
    let workspace = Workspace::new();
    workspace.python_repository("orders");

    let output = run_cli(
        &["index", "orders", "--no-generate", "--json", "-o", "docs"],
        Some(workspace.path()),
    );
    assert_eq!(output.status, 0, "stderr: {}", output.stderr);

    let summary: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(summary["success"], true);
    assert_eq!(summary["outcomes"][0]["name"], "orders");

    let docs = workspace.path().join("docs");
    assert!(docs.join("README.md").is_file());
    assert!(docs.join("index.md").is_file());
}

#[test]
fn test_init_then_refuse_overwrite() {
    let workspace = Workspace::new();

    let first = run_cli(&["init"], Some(workspace.path()));
    assert_eq!(first.status, 0, "stderr: {}", first.stderr);
    assert!(workspace.path().join("repowiki.yaml").is_file());

    let second = run_cli(&["init"], Some(workspace.path()));
    assert_ne!(second.status, 0);

    let forced = run_cli(&["init", "--overwrite"], Some(workspace.path()));
    assert_eq!(forced.status, 0);
}

#[test]
fn test_invalid_config_file_is_reported() {
    let workspace = Workspace::new();
    workspace.python_repository("orders");
    workspace.write_file("repowiki.yaml", "chunking:\n  target_size: 10\n  overlap: 20\n");

    let output = run_cli(&["scan", "orders"], Some(workspace.path()));
    assert_ne!(output.status, 0);
    assert!(output.stderr.contains("chunking.overlap"));
}

#[test]
fn test_scan_json() {
    let workspace = Workspace::new();
    workspace.python_repository("orders");

    let output = run_cli(&["scan", "orders", "--json"], Some(workspace.path()));
    assert_eq!(output.status, 0, "stderr: {}", output.stderr);

    let metadata: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(metadata["name"], "orders");
    assert_eq!(metadata["primary_language"], "Python");
    assert!(metadata["file_count"].as_u64().unwrap() > 0);
}

#[test]
fn test_analyze_json() {
    let workspace = Workspace::new();
    workspace.python_repository("orders");

    let output = run_cli(&["analyze", "orders", "--json"], Some(workspace.path()));
    assert_eq!(output.status, 0, "stderr: {}", output.stderr);

    let analysis: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert!(analysis.get("src/app.py").is_some());
    assert!(analysis.get("tests/test_app.py").is_none());
}
