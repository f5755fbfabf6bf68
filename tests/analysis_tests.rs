//! Eligibility, dispatch and scheduling of structural analysis

mod support;

use repowiki::analysis::{self, AnalysisScheduler, AnalyzerKind, is_eligible};
use repowiki::config::AnalysisConfig;
use repowiki::logging::Logger;
use support::{Workspace, scanner};
use tokio_util::sync::CancellationToken;

#[test]
fn test_size_bounds_in_large_repository() {
    let workspace = Workspace::new();
    for i in 0..248 {
        workspace.write_sized(&format!("src/module_{:03}.py", i), 2_000);
    }
    workspace.write_sized("src/large.py", 260_000);
    workspace.write_sized("src/tiny.py", 40);

    let records = scanner(&workspace).scan(workspace.path()).unwrap();
    assert_eq!(records.len(), 250);

    let config = AnalysisConfig::default();
    let large = records.iter().find(|r| r.relative_path == "src/large.py").unwrap();
    let tiny = records.iter().find(|r| r.relative_path == "src/tiny.py").unwrap();
    assert!(is_eligible(large, &config));
    assert!(!is_eligible(tiny, &config));
}

#[tokio::test]
async fn test_scheduler_merges_results_by_path() {
    let workspace = Workspace::new();
    let root = workspace.python_repository("orders");
    let records = scanner(&workspace).scan(&root).unwrap();

    let analysis = AnalysisScheduler::new(AnalysisConfig::default(), Logger::quiet())
        .analyze_repository(&records, &CancellationToken::new())
        .await;

    let app = &analysis["src/app.py"];
    assert_eq!(app.apis.len(), 2);
    assert_eq!(app.apis[0].path, "/api/orders");
    assert_eq!(app.apis[0].method, "GET");

    let services = &analysis["src/services.py"];
    let classes: Vec<&str> = services.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(classes, vec!["OrderService", "PaymentManager"]);

    // Test files are never analyzed
    assert!(!analysis.contains_key("tests/test_app.py"));
}

#[tokio::test]
async fn test_single_worker_matches_parallel_result() {
    let workspace = Workspace::new();
    let root = workspace.python_repository("orders");
    let records = scanner(&workspace).scan(&root).unwrap();

    let serial = AnalysisScheduler::new(
        AnalysisConfig {
            workers: 1,
            ..AnalysisConfig::default()
        },
        Logger::quiet(),
    )
    .analyze_repository(&records, &CancellationToken::new())
    .await;
    let parallel = AnalysisScheduler::new(AnalysisConfig::default(), Logger::quiet())
        .analyze_repository(&records, &CancellationToken::new())
        .await;

    assert_eq!(serial, parallel);
}

#[tokio::test]
async fn test_cap_keeps_entry_points() {
    let workspace = Workspace::new();
    for i in 0..10 {
        workspace.write_sized(&format!("tools/script_{}.py", i), 5_000);
    }
    workspace.write_sized("main.py", 100);

    let records = scanner(&workspace).scan(workspace.path()).unwrap();
    let config = AnalysisConfig {
        max_files: 3,
        ..AnalysisConfig::default()
    };
    let analysis = AnalysisScheduler::new(config, Logger::quiet())
        .analyze_repository(&records, &CancellationToken::new())
        .await;

    assert_eq!(analysis.len(), 3);
    assert!(analysis.contains_key("main.py"));
}

#[test]
fn test_every_language_family_produces_facts() {
    let samples = [
        ("lib.rs", "pub struct Engine;\nimpl Engine {\n    pub async fn start(&self) {}\n}\n"),
        ("app.py", "class Handler:\n    def handle(self):\n        pass\n"),
        ("index.ts", "export class Store {}\nexport async function load(): Promise<void> {}\n"),
        ("main.go", "package main\n\nfunc main() {}\n"),
        ("App.java", "public class App {\n    public void run() {}\n}\n"),
        ("script.sh", "deploy() {\n  echo hi\n}\n"),
    ];

    for (path, content) in samples {
        let facts = analysis::analyze(path, content).unwrap();
        assert!(
            !facts.functions.is_empty() || !facts.classes.is_empty(),
            "no facts extracted from {}",
            path
        );
        assert_ne!(facts.analyzer, AnalyzerKind::Generic, "{} fell back", path);
    }
}

#[test]
fn test_unparseable_input_degrades_instead_of_failing() {
    let facts = analysis::analyze("broken.json", "{\"unterminated\": ").unwrap();
    assert_eq!(facts.analyzer, AnalyzerKind::Generic);
    assert_eq!(facts.language, "JSON");
}

#[tokio::test]
async fn test_empty_block_comment_does_not_abort_scheduler() {
    let workspace = Workspace::new();
    workspace.write_file(
        "web/app.js",
        "/**/\nfunction load() {\n  return fetch('/api/items').then((r) => r.json());\n}\n",
    );
    workspace.write_file(
        "src/A.java",
        "/**/\npublic class A {\n    private final String name = \"example\";\n}\n",
    );
    let records = scanner(&workspace).scan(workspace.path()).unwrap();

    let analysis = AnalysisScheduler::new(AnalysisConfig::default(), Logger::quiet())
        .analyze_repository(&records, &CancellationToken::new())
        .await;

    assert_eq!(analysis["web/app.js"].functions[0].name, "load");
    assert_eq!(analysis["src/A.java"].classes[0].name, "A");
}
