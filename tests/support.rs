//! Common test support utilities and fixtures
//!
//! Shared by the integration tests through `mod support;`.

#![allow(dead_code)]

use async_trait::async_trait;
use repowiki::config::{IndexerConfig, ScannerConfig};
use repowiki::generation::{GenerationError, TextGenerator};
use repowiki::git::{GitMetadata, GitMetadataProvider};
use repowiki::logging::Logger;
use repowiki::pipeline::Indexer;
use repowiki::scanner::RepositoryScanner;
use repowiki::store::InMemoryStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Result of running the CLI binary
#[derive(Debug)]
pub struct CliOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// A temporary directory holding one or more fixture repositories
pub struct Workspace {
    pub root: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write `content` to a workspace-relative path, creating parent directories
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write a file of exactly `size` bytes of Python-looking code
    pub fn write_sized(&self, relative: &str, size: usize) -> PathBuf {
        let line = "value = compute_something(alpha, beta)\n";
        let mut content = line.repeat(size / line.len() + 1);
        content.truncate(size);
        self.write_file(relative, &content)
    }

    /// Create a small Python service repository named `name`
    pub fn python_repository(&self, name: &str) -> PathBuf {
        self.write_file(
            &format!("{}/README.md", name),
            "# Orders\n\nTracks and fulfils customer orders.\n",
        );
        self.write_file(
            &format!("{}/requirements.txt", name),
            "flask==3.0.0\nsqlalchemy==2.0.0\npytest==8.0.0\n",
        );
        self.write_file(
            &format!("{}/src/app.py", name),
            "from flask import Flask\n\napp = Flask(__name__)\n\n\
             @app.route('/api/orders', methods=['GET'])\n\
             def list_orders():\n    \"\"\"List every order.\"\"\"\n    return []\n\n\
             @app.route('/api/orders/<id>', methods=['GET'])\n\
             def get_order(id):\n    return {}\n",
        );
        self.write_file(
            &format!("{}/src/services.py", name),
            concat!(
                "import os\n\n",
                "class OrderService:\n",
                "    \"\"\"Places orders.\"\"\"\n\n",
                "    def place(self, order):\n",
                "        return order\n\n",
                "class PaymentManager:\n",
                "    def charge(self, amount):\n",
                "        return amount > 0\n",
            ),
        );
        self.write_file(
            &format!("{}/tests/test_app.py", name),
            "def test_list_orders():\n    assert True\n",
        );
        self.path().join(name)
    }
}

/// Scanner configuration that ignores the user's global ignore file
pub fn isolated_scanner_config(workspace: &Workspace) -> ScannerConfig {
    ScannerConfig {
        global_ignore_file: Some(workspace.path().join("no-global-ignore")),
        ..ScannerConfig::default()
    }
}

pub fn scanner(workspace: &Workspace) -> RepositoryScanner {
    RepositoryScanner::new(isolated_scanner_config(workspace), Logger::quiet())
}

/// Indexer configuration isolated from the user's environment
pub fn isolated_config(workspace: &Workspace) -> IndexerConfig {
    IndexerConfig {
        scanner: isolated_scanner_config(workspace),
        ..IndexerConfig::default()
    }
}

/// Indexer wired to quiet logging, no git and the given collaborators
pub fn indexer(
    config: IndexerConfig,
    generator: Arc<dyn TextGenerator>,
    store: Arc<InMemoryStore>,
) -> Indexer {
    Indexer::builder(config)
        .generator(generator)
        .store(store)
        .git(Arc::new(NoGit))
        .logger(Logger::quiet())
        .build()
}

/// Git provider for directories that are never repositories
pub struct NoGit;

impl GitMetadataProvider for NoGit {
    fn metadata(&self, _repo_path: &Path) -> Option<GitMetadata> {
        None
    }
}

/// Generator that answers every prompt with the same text and records prompts
#[derive(Default)]
pub struct StaticGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _temperature: f32,
        _max_output: u32,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Generator whose endpoint always times out
pub struct TimeoutGenerator;

#[async_trait]
impl TextGenerator for TimeoutGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _temperature: f32,
        _max_output: u32,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::Timeout(60))
    }
}

/// Run the repowiki binary with the given arguments
pub fn run_cli(args: &[&str], cwd: Option<&Path>) -> CliOutput {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_repowiki"));
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().expect("Failed to execute repowiki");
    CliOutput {
        status: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
