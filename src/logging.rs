//! Console logging shared by every pipeline stage

use colored::*;

/// Logger with consistent per-repository formatting
///
/// Each message is prefixed with a scope (usually the repository name) in
/// cyan/bold so interleaved output from a batch stays readable. A quiet
/// logger drops informational output but still reports warnings and errors.
///
/// ## Example
///
/// ```rust,no_run
/// use repowiki::logging::Logger;
///
/// let logger = Logger::default();
/// logger.step("my-repo", 1, "Scanning files");
/// logger.success("my-repo", "Indexed 42 files");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    quiet: bool,
}

impl Logger {
    /// A logger that only prints warnings and errors
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn info(&self, scope: &str, msg: &str) {
        if !self.quiet {
            println!("{} | {}", scope.cyan().bold(), msg);
        }
    }

    pub fn step(&self, scope: &str, number: usize, msg: &str) {
        if !self.quiet {
            println!(
                "{} | {} {}",
                scope.cyan().bold(),
                format!("Step {}:", number).bold(),
                msg
            );
        }
    }

    pub fn success(&self, scope: &str, msg: &str) {
        if !self.quiet {
            println!("{} | {}", scope.cyan().bold(), msg.green());
        }
    }

    pub fn warn(&self, scope: &str, msg: &str) {
        eprintln!("{} | {}", scope.cyan().bold(), msg.yellow());
    }

    pub fn error(&self, scope: &str, msg: &str) {
        eprintln!("{} | {}", scope.cyan().bold(), msg.red());
    }
}
