//! # Online Schema Change Artifacts
//!
//! Online schema change tools rebuild a table by copying it into a shadow
//! table, applying the change there, and swapping names at the end. The
//! shadow table and the renamed-away original ("trash") are artifacts of
//! the tool and must never be replicated as user data.
//!
//! | Tool | Shadow table | Trash tables |
//! |------|--------------|--------------|
//! | gh-ost | `_<table>_gho` | `_<table>_ghc`, `_<table>_del` |
//! | pt-online-schema-change | `_<table>_new` | `_<table>_old` |
//!
//! Custom naming rules (regular expressions) replace the tool defaults.

use crate::common::pattern::PatternError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableType {
    /// A user table
    RealTable,
    /// Shadow copy being built by the tool
    GhostTable,
    /// Leftover of the tool (changelog, renamed original)
    TrashTable,
}

/// Classifier for online schema change artifacts.
///
/// Implementations must tolerate concurrent queries.
pub trait GhostClassifier: Send + Sync {
    /// Classify a table by name.
    fn table_type(&self, table: &str) -> TableType;
}

/// Supported online schema change tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnlineDdlTool {
    /// github/gh-ost
    #[serde(rename = "gh-ost", alias = "ghost")]
    GhOst,
    /// percona pt-online-schema-change
    #[serde(rename = "pt", alias = "pt-osc")]
    PtOsc,
}

impl OnlineDdlTool {
    fn default_shadow_rules(&self) -> &'static [&'static str] {
        match self {
            OnlineDdlTool::GhOst => &[r"^_(.+)_gho$"],
            OnlineDdlTool::PtOsc => &[r"^_(.+)_new$"],
        }
    }

    fn default_trash_rules(&self) -> &'static [&'static str] {
        match self {
            OnlineDdlTool::GhOst => &[r"^_(.+)_(?:ghc|del)$"],
            OnlineDdlTool::PtOsc => &[r"^_(.+)_old$"],
        }
    }
}

impl fmt::Display for OnlineDdlTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnlineDdlTool::GhOst => f.write_str("gh-ost"),
            OnlineDdlTool::PtOsc => f.write_str("pt"),
        }
    }
}

/// Online schema change configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineDdlConfig {
    /// Tool used on the source database
    pub tool: OnlineDdlTool,

    /// Regexes for shadow table names; overrides the tool default when set.
    /// The first capture group, if any, is the origin table name.
    #[serde(default)]
    pub shadow_table_rules: Vec<String>,

    /// Regexes for trash table names; overrides the tool default when set
    #[serde(default)]
    pub trash_table_rules: Vec<String>,
}

impl OnlineDdlConfig {
    /// Configuration using the tool's default naming rules.
    pub fn new(tool: OnlineDdlTool) -> Self {
        Self {
            tool,
            shadow_table_rules: Vec::new(),
            trash_table_rules: Vec::new(),
        }
    }
}

/// Name-based classifier for gh-ost / pt-osc artifacts
#[derive(Debug, Clone)]
pub struct OnlineDdlClassifier {
    tool: OnlineDdlTool,
    shadow_rules: Vec<Regex>,
    trash_rules: Vec<Regex>,
}

impl OnlineDdlClassifier {
    /// Compile the classifier from configuration
    pub fn new(config: &OnlineDdlConfig) -> Result<Self, PatternError> {
        let shadow_rules = compile_rules(
            &config.shadow_table_rules,
            config.tool.default_shadow_rules(),
        )?;
        let trash_rules =
            compile_rules(&config.trash_table_rules, config.tool.default_trash_rules())?;

        Ok(Self {
            tool: config.tool,
            shadow_rules,
            trash_rules,
        })
    }

    /// Classifier with the tool's default naming rules
    pub fn for_tool(tool: OnlineDdlTool) -> Self {
        let compile = |rules: &[&str]| {
            rules
                .iter()
                .filter_map(|r| Regex::new(r).ok())
                .collect::<Vec<_>>()
        };
        Self {
            tool,
            shadow_rules: compile(tool.default_shadow_rules()),
            trash_rules: compile(tool.default_trash_rules()),
        }
    }

    pub fn tool(&self) -> OnlineDdlTool {
        self.tool
    }

    /// Name of the user table a shadow/trash table was derived from.
    ///
    /// Returns `None` for real tables and for rules without a capture group.
    pub fn origin_table(&self, table: &str) -> Option<String> {
        self.trash_rules
            .iter()
            .chain(self.shadow_rules.iter())
            .find_map(|rule| rule.captures(table))
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
    }
}

impl GhostClassifier for OnlineDdlClassifier {
    fn table_type(&self, table: &str) -> TableType {
        // `_t_del` must not be mistaken for a shadow table of `t_del`
        if self.trash_rules.iter().any(|r| r.is_match(table)) {
            return TableType::TrashTable;
        }
        if self.shadow_rules.iter().any(|r| r.is_match(table)) {
            return TableType::GhostTable;
        }
        TableType::RealTable
    }
}

fn compile_rules(custom: &[String], defaults: &[&str]) -> Result<Vec<Regex>, PatternError> {
    let compile = |rule: &str| {
        if rule.is_empty() {
            return Err(PatternError::EmptyPattern);
        }
        Regex::new(rule).map_err(|source| PatternError::InvalidRegex {
            pattern: rule.to_string(),
            source,
        })
    };

    if custom.is_empty() {
        defaults.iter().map(|r| compile(*r)).collect()
    } else {
        custom.iter().map(|r| compile(r.as_str())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gh_ost_tables() {
        let classifier = OnlineDdlClassifier::for_tool(OnlineDdlTool::GhOst);
        assert_eq!(classifier.table_type("t1"), TableType::RealTable);
        assert_eq!(classifier.table_type("_t1_gho"), TableType::GhostTable);
        assert_eq!(classifier.table_type("_t1_ghc"), TableType::TrashTable);
        assert_eq!(classifier.table_type("_t1_del"), TableType::TrashTable);
        assert_eq!(classifier.table_type("t1_gho"), TableType::RealTable);
        assert_eq!(classifier.table_type("_t1_new"), TableType::RealTable);
    }

    #[test]
    fn test_pt_osc_tables() {
        let classifier = OnlineDdlClassifier::for_tool(OnlineDdlTool::PtOsc);
        assert_eq!(classifier.table_type("orders"), TableType::RealTable);
        assert_eq!(classifier.table_type("_orders_new"), TableType::GhostTable);
        assert_eq!(classifier.table_type("_orders_old"), TableType::TrashTable);
        assert_eq!(classifier.table_type("_orders_gho"), TableType::RealTable);
    }

    #[test]
    fn test_origin_table() {
        let classifier = OnlineDdlClassifier::for_tool(OnlineDdlTool::GhOst);
        assert_eq!(classifier.origin_table("_orders_gho").as_deref(), Some("orders"));
        assert_eq!(classifier.origin_table("_orders_del").as_deref(), Some("orders"));
        assert_eq!(classifier.origin_table("orders"), None);
    }

    #[test]
    fn test_custom_rules_override_defaults() {
        let config = OnlineDdlConfig {
            tool: OnlineDdlTool::GhOst,
            shadow_table_rules: vec![r"^(.+)_shadow$".to_string()],
            trash_table_rules: vec![r"^(.+)_trash$".to_string()],
        };
        let classifier = OnlineDdlClassifier::new(&config).unwrap();
        assert_eq!(classifier.table_type("t1_shadow"), TableType::GhostTable);
        assert_eq!(classifier.table_type("t1_trash"), TableType::TrashTable);
        assert_eq!(classifier.table_type("_t1_gho"), TableType::RealTable);
        assert_eq!(classifier.tool(), OnlineDdlTool::GhOst);
    }

    #[test]
    fn test_invalid_rule_rejected() {
        let config = OnlineDdlConfig {
            tool: OnlineDdlTool::PtOsc,
            shadow_table_rules: vec!["(unclosed".to_string()],
            trash_table_rules: Vec::new(),
        };
        assert!(matches!(
            OnlineDdlClassifier::new(&config),
            Err(PatternError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_tool_serde() {
        let config: OnlineDdlConfig = serde_json::from_str(r#"{"tool": "gh-ost"}"#).unwrap();
        assert_eq!(config, OnlineDdlConfig::new(OnlineDdlTool::GhOst));
        let tool: OnlineDdlTool = serde_json::from_str("\"pt\"").unwrap();
        assert_eq!(tool, OnlineDdlTool::PtOsc);
        assert_eq!(tool.to_string(), "pt");
    }
}
