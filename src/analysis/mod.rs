//! Structural analysis of source files
//!
//! [`dispatch::analyze`] picks an analyzer by extension: the tree-sitter
//! backed Rust analyzer, the Python analyzer, one of the regex family tables,
//! or the generic fallback. [`AnalysisScheduler`] runs it over a whole
//! repository on a bounded worker pool.

pub mod dispatch;
pub mod eligibility;
pub mod facts;
pub mod generic;
pub mod heuristic;
pub mod python;
pub mod rust_native;
pub mod scheduler;

pub use dispatch::{LanguageFamily, analyze};
pub use eligibility::{is_eligible, matches_skip_pattern};
pub use facts::{
    AnalyzerKind, ApiFact, ClassFact, ClassKind, ComplexityFacts, ConfigFact, FunctionFact,
    ImportFacts, StructuralFacts,
};
pub use scheduler::{AnalysisMap, AnalysisScheduler};
