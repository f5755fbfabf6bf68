//! Command implementations for the repowiki CLI

pub mod analyze;
pub mod base;
pub mod index;
pub mod init;
pub mod scan;
pub mod validators;

pub use analyze::AnalyzeCommand;
pub use base::{Command, CommandContext};
pub use index::IndexCommand;
pub use init::InitCommand;
pub use scan::ScanCommand;
