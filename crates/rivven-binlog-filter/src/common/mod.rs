//! # Common Admission Types and Classifiers
//!
//! Database-agnostic building blocks of the admission decision:
//!
//! - [`Table`] - Source table identity
//! - [`EventKind`] / [`FilterAction`] - Rule filter vocabulary
//! - [`StatementNode`] - Parsed DDL statement handle
//! - [`TableScope`] / [`BlockAllowList`] - Replication scope
//! - [`GhostClassifier`] / [`OnlineDdlClassifier`] - Online schema change artifacts
//! - [`RuleFilter`] / [`BinlogEventFilter`] - Event rule filtering
//! - [`AdmissionError`] - Error classification
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Common Module                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TableScope      ←─── BlockAllowList (include/exclude)      │
//! │  GhostClassifier ←─── OnlineDdlClassifier (gh-ost, pt-osc)  │
//! │  RuleFilter      ←─── BinlogEventFilter (hot-reloadable)    │
//! │  PatternSet      ←─── Glob/regex name matching              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod error;
mod event;
pub mod online_ddl;
pub mod pattern;
pub mod rule;
pub mod scope;
mod table;

pub use error::*;
pub use event::*;
pub use online_ddl::{
    GhostClassifier, OnlineDdlClassifier, OnlineDdlConfig, OnlineDdlTool, TableType,
};
pub use pattern::{PatternError, PatternMatcher, PatternSet};
pub use rule::{BinlogEventFilter, BinlogEventRule, FilterError, RuleFilter};
pub use scope::{BlockAllowList, BlockAllowListConfig, TableScope};
pub use table::*;
