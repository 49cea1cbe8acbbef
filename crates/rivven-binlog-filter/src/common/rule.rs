//! # Binlog Event Rule Filter
//!
//! Rule-based filtering by schema, table, event kind and SQL text.
//!
//! ## Rule Evaluation
//!
//! For an event `(schema, table, kind, sql)` the filter collects matching
//! rules: table-level rules (schema and table pattern match) first, then
//! schema-level rules (empty table pattern), each in configuration order.
//! The first rule that reaches a verdict wins:
//!
//! | Rule action | Event kind / SQL matched | Verdict |
//! |-------------|--------------------------|---------|
//! | `ignore`    | yes                      | Ignore  |
//! | `do`        | no                       | Ignore  |
//!
//! Events no rule decides on are admitted.
//!
//! ## Example
//!
//! ```rust
//! use rivven_binlog_filter::common::{
//!     BinlogEventFilter, BinlogEventRule, EventKind, FilterAction, RuleFilter,
//! };
//!
//! let filter = BinlogEventFilter::new(vec![
//!     BinlogEventRule::new("shop_*", FilterAction::Ignore)
//!         .with_table("*")
//!         .with_events(vec![EventKind::Delete, EventKind::TruncateTable]),
//! ])
//! .unwrap();
//!
//! let action = filter.filter("shop_eu", "orders", EventKind::Delete, "").unwrap();
//! assert_eq!(action, FilterAction::Ignore);
//! ```

use crate::common::pattern::{PatternError, PatternMatcher};
use crate::common::{EventKind, FilterAction};
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Errors raised by a rule filter.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Group kinds describe sets of events and cannot be evaluated
    #[error("event kind `{0}` is a rule selector, not an event")]
    InvalidEventKind(EventKind),

    /// Invalid rule configuration
    #[error("invalid filter rule: {0}")]
    Config(String),

    /// Failure inside a rule filter implementation
    #[error("{0}")]
    Engine(String),
}

impl FilterError {
    /// Create an engine failure
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}

impl From<PatternError> for FilterError {
    fn from(err: PatternError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Rule-based event classifier.
///
/// Implementations must tolerate concurrent queries.
pub trait RuleFilter: Send + Sync {
    /// Decide the action for an event.
    ///
    /// `schema`/`table` are empty for queries that reference no table, and
    /// `sql` is empty for row events.
    fn filter(
        &self,
        schema: &str,
        table: &str,
        kind: EventKind,
        sql: &str,
    ) -> Result<FilterAction, FilterError>;
}

/// A binlog event filter rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinlogEventRule {
    /// Schema pattern (glob)
    pub schema_pattern: String,

    /// Table pattern (glob); empty makes this a schema-level rule
    #[serde(default)]
    pub table_pattern: String,

    /// Event kinds the rule selects (group kinds allowed)
    #[serde(default)]
    pub events: Vec<EventKind>,

    /// SQL regexes the rule selects (case-insensitive)
    #[serde(default)]
    pub sql_patterns: Vec<String>,

    /// Action for selected events
    #[serde(default)]
    pub action: FilterAction,
}

impl BinlogEventRule {
    /// Create a schema-level rule
    pub fn new(schema_pattern: impl Into<String>, action: FilterAction) -> Self {
        Self {
            schema_pattern: schema_pattern.into(),
            table_pattern: String::new(),
            events: Vec::new(),
            sql_patterns: Vec::new(),
            action,
        }
    }

    /// Restrict the rule to tables matching `pattern`
    pub fn with_table(mut self, pattern: impl Into<String>) -> Self {
        self.table_pattern = pattern.into();
        self
    }

    /// Set the selected event kinds
    pub fn with_events(mut self, events: Vec<EventKind>) -> Self {
        self.events = events;
        self
    }

    /// Set the selected SQL patterns
    pub fn with_sql_patterns(mut self, patterns: Vec<String>) -> Self {
        self.sql_patterns = patterns;
        self
    }

    /// Check the rule for configuration errors, compiling its patterns
    pub fn validate(&self) -> Result<(), FilterError> {
        CompiledRule::compile(self).map(|_| ())
    }

    fn check_selectors(&self) -> Result<(), FilterError> {
        if self.schema_pattern.is_empty() {
            return Err(FilterError::Config(
                "schema pattern must not be empty".to_string(),
            ));
        }
        if self.events.is_empty() && self.sql_patterns.is_empty() {
            return Err(FilterError::Config(format!(
                "rule for schema `{}` selects neither events nor SQL",
                self.schema_pattern
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct CompiledRule {
    schema: PatternMatcher,
    table: Option<PatternMatcher>,
    events: Vec<EventKind>,
    sql: Option<Regex>,
    action: FilterAction,
}

impl CompiledRule {
    fn compile(rule: &BinlogEventRule) -> Result<Self, FilterError> {
        rule.check_selectors()?;

        let table = if rule.table_pattern.is_empty() {
            None
        } else {
            Some(PatternMatcher::new(&rule.table_pattern)?)
        };

        let sql = if rule.sql_patterns.is_empty() {
            None
        } else {
            let joined = rule.sql_patterns.join("|");
            let regex = regex::RegexBuilder::new(&joined)
                .case_insensitive(true)
                .build()
                .map_err(|e| FilterError::Config(format!("sql pattern {:?}: {}", joined, e)))?;
            Some(regex)
        };

        Ok(Self {
            schema: PatternMatcher::new(&rule.schema_pattern)?,
            table,
            events: rule.events.clone(),
            sql,
            action: rule.action,
        })
    }

    fn matches_kind(&self, kind: EventKind) -> bool {
        self.events.iter().any(|selector| kind.matches(*selector))
    }

    /// Verdict of this rule alone; `None` lets later rules decide.
    fn evaluate(&self, kind: EventKind, sql: &str) -> Option<FilterAction> {
        if kind != EventKind::NullEvent && !self.events.is_empty() {
            let matched = self.matches_kind(kind);
            if matched == (self.action == FilterAction::Ignore) {
                return Some(FilterAction::Ignore);
            }
        }

        if let Some(regex) = self.sql.as_ref().filter(|_| !sql.is_empty()) {
            let matched = regex.is_match(sql);
            if matched == (self.action == FilterAction::Ignore) {
                return Some(FilterAction::Ignore);
            }
        }

        None
    }
}

#[derive(Debug, Default)]
struct RuleSet {
    table_rules: Vec<CompiledRule>,
    schema_rules: Vec<CompiledRule>,
}

impl RuleSet {
    fn compile(rules: &[BinlogEventRule]) -> Result<Self, FilterError> {
        let mut set = Self::default();
        for rule in rules {
            let compiled = CompiledRule::compile(rule)?;
            if compiled.table.is_some() {
                set.table_rules.push(compiled);
            } else {
                set.schema_rules.push(compiled);
            }
        }
        Ok(set)
    }

    fn matching<'a>(
        &'a self,
        schema: &'a str,
        table: &'a str,
    ) -> impl Iterator<Item = &'a CompiledRule> + 'a {
        let table_rules = self.table_rules.iter().filter(move |r| {
            r.schema.matches(schema) && r.table.as_ref().is_some_and(|t| t.matches(table))
        });
        let schema_rules = self
            .schema_rules
            .iter()
            .filter(move |r| r.schema.matches(schema));
        table_rules.chain(schema_rules)
    }

    fn len(&self) -> usize {
        self.table_rules.len() + self.schema_rules.len()
    }
}

/// Configuration-driven [`RuleFilter`] with hot-reloadable rules.
///
/// Each query evaluates against one snapshot of the rule set; a concurrent
/// [`reload`](Self::reload) only affects queries that start after it.
#[derive(Debug, Default)]
pub struct BinlogEventFilter {
    rules: RwLock<Arc<RuleSet>>,
}

impl BinlogEventFilter {
    /// Compile a filter from rules
    pub fn new(rules: Vec<BinlogEventRule>) -> Result<Self, FilterError> {
        let set = RuleSet::compile(&rules)?;
        debug!("Compiled {} binlog event filter rules", set.len());
        Ok(Self {
            rules: RwLock::new(Arc::new(set)),
        })
    }

    /// Replace the rule set.
    ///
    /// Invalid rules are rejected and the current rule set stays active.
    pub fn reload(&self, rules: Vec<BinlogEventRule>) -> Result<(), FilterError> {
        let set = Arc::new(RuleSet::compile(&rules)?);
        let count = set.len();
        *self.rules.write() = set;
        info!("Reloaded binlog event filter with {} rules", count);
        Ok(())
    }

    /// Number of active rules
    pub fn rule_count(&self) -> usize {
        self.rules.read().len()
    }

    fn snapshot(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules.read())
    }
}

impl RuleFilter for BinlogEventFilter {
    fn filter(
        &self,
        schema: &str,
        table: &str,
        kind: EventKind,
        sql: &str,
    ) -> Result<FilterAction, FilterError> {
        if kind.is_group() {
            return Err(FilterError::InvalidEventKind(kind));
        }

        let rules = self.snapshot();
        let verdict = rules
            .matching(schema, table)
            .find_map(|rule| rule.evaluate(kind, sql));

        Ok(verdict.unwrap_or(FilterAction::Admit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(rules: Vec<BinlogEventRule>) -> BinlogEventFilter {
        BinlogEventFilter::new(rules).unwrap()
    }

    #[test]
    fn test_no_rules_admits() {
        let f = filter(vec![]);
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Insert, "").unwrap(),
            FilterAction::Admit
        );
        assert_eq!(f.rule_count(), 0);
    }

    #[test]
    fn test_ignore_rule_by_event() {
        let f = filter(vec![BinlogEventRule::new("mydb", FilterAction::Ignore)
            .with_table("t*")
            .with_events(vec![EventKind::Delete])]);

        assert_eq!(
            f.filter("mydb", "t1", EventKind::Delete, "").unwrap(),
            FilterAction::Ignore
        );
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Insert, "").unwrap(),
            FilterAction::Admit
        );
        assert_eq!(
            f.filter("mydb", "orders", EventKind::Delete, "").unwrap(),
            FilterAction::Admit
        );
    }

    #[test]
    fn test_do_rule_ignores_unselected_events() {
        let f = filter(vec![
            BinlogEventRule::new("mydb", FilterAction::Admit).with_events(vec![EventKind::AllDml])
        ]);

        assert_eq!(
            f.filter("mydb", "t1", EventKind::Update, "").unwrap(),
            FilterAction::Admit
        );
        assert_eq!(
            f.filter("mydb", "t1", EventKind::DropTable, "DROP TABLE t1")
                .unwrap(),
            FilterAction::Ignore
        );
        assert_eq!(
            f.filter("other", "t1", EventKind::DropTable, "DROP TABLE t1")
                .unwrap(),
            FilterAction::Admit
        );
    }

    #[test]
    fn test_null_event_skips_event_check() {
        let f = filter(vec![
            BinlogEventRule::new("mydb", FilterAction::Admit).with_events(vec![EventKind::AllDml])
        ]);
        assert_eq!(
            f.filter("mydb", "t1", EventKind::NullEvent, "ALTER TABLE t1 ADD c INT")
                .unwrap(),
            FilterAction::Admit
        );
    }

    #[test]
    fn test_sql_pattern() {
        let f = filter(vec![BinlogEventRule::new("*", FilterAction::Ignore)
            .with_sql_patterns(vec![r"^ALTER\s+TABLE\s+.*\s+PARTITION".to_string()])]);

        assert_eq!(
            f.filter(
                "mydb",
                "t1",
                EventKind::AlterTable,
                "alter table t1 add partition (partition p1 values less than (10))"
            )
            .unwrap(),
            FilterAction::Ignore
        );
        assert_eq!(
            f.filter("mydb", "t1", EventKind::AlterTable, "ALTER TABLE t1 ADD c INT")
                .unwrap(),
            FilterAction::Admit
        );
        // row events carry no SQL
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Insert, "").unwrap(),
            FilterAction::Admit
        );
    }

    #[test]
    fn test_wildcard_schema_matches_tableless_query() {
        let f = filter(vec![BinlogEventRule::new("*", FilterAction::Ignore)
            .with_events(vec![EventKind::CreateDatabase])]);
        assert_eq!(
            f.filter("", "", EventKind::CreateDatabase, "CREATE DATABASE db2")
                .unwrap(),
            FilterAction::Ignore
        );
    }

    #[test]
    fn test_table_rules_take_precedence() {
        let f = filter(vec![
            BinlogEventRule::new("mydb", FilterAction::Ignore).with_events(vec![EventKind::AllDml]),
            BinlogEventRule::new("mydb", FilterAction::Ignore)
                .with_table("t1")
                .with_events(vec![EventKind::Insert]),
        ]);
        // table rule does not decide on an update; the schema rule does
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Update, "").unwrap(),
            FilterAction::Ignore
        );
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Insert, "").unwrap(),
            FilterAction::Ignore
        );
    }

    #[test]
    fn test_group_kind_is_an_error() {
        let f = filter(vec![]);
        for kind in [
            EventKind::AllEvent,
            EventKind::AllDml,
            EventKind::AllDdl,
            EventKind::NoneEvent,
        ] {
            assert!(matches!(
                f.filter("mydb", "t1", kind, ""),
                Err(FilterError::InvalidEventKind(k)) if k == kind
            ));
        }
    }

    #[test]
    fn test_invalid_rules_rejected() {
        assert!(matches!(
            BinlogEventFilter::new(vec![BinlogEventRule::new("", FilterAction::Ignore)
                .with_events(vec![EventKind::Insert])]),
            Err(FilterError::Config(_))
        ));
        assert!(matches!(
            BinlogEventFilter::new(vec![BinlogEventRule::new("mydb", FilterAction::Ignore)]),
            Err(FilterError::Config(_))
        ));
        assert!(matches!(
            BinlogEventFilter::new(vec![BinlogEventRule::new("mydb", FilterAction::Ignore)
                .with_sql_patterns(vec!["(unclosed".to_string()])]),
            Err(FilterError::Config(_))
        ));
    }

    #[test]
    fn test_validate_compiles_sql_patterns() {
        let rule = BinlogEventRule::new("mydb", FilterAction::Ignore)
            .with_sql_patterns(vec!["^DROP".to_string(), "(unclosed".to_string()]);
        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("(unclosed"));

        let rule = BinlogEventRule::new("mydb", FilterAction::Ignore)
            .with_table("t?")
            .with_sql_patterns(vec!["^DROP".to_string()]);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_reload_replaces_rules() {
        let f = filter(vec![]);
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Delete, "").unwrap(),
            FilterAction::Admit
        );

        f.reload(vec![BinlogEventRule::new("mydb", FilterAction::Ignore)
            .with_events(vec![EventKind::Delete])])
            .unwrap();
        assert_eq!(f.rule_count(), 1);
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Delete, "").unwrap(),
            FilterAction::Ignore
        );
    }

    #[test]
    fn test_failed_reload_keeps_rules() {
        let f = filter(vec![BinlogEventRule::new("mydb", FilterAction::Ignore)
            .with_events(vec![EventKind::Delete])]);
        assert!(f
            .reload(vec![BinlogEventRule::new("", FilterAction::Ignore)])
            .is_err());
        assert_eq!(f.rule_count(), 1);
        assert_eq!(
            f.filter("mydb", "t1", EventKind::Delete, "").unwrap(),
            FilterAction::Ignore
        );
    }

    #[test]
    fn test_rule_deserialize() {
        let rule: BinlogEventRule = serde_json::from_str(
            r#"{
                "schema_pattern": "shop_*",
                "table_pattern": "orders",
                "events": ["truncate table", "drop table"],
                "action": "ignore"
            }"#,
        )
        .unwrap();
        assert_eq!(
            rule,
            BinlogEventRule::new("shop_*", FilterAction::Ignore)
                .with_table("orders")
                .with_events(vec![EventKind::TruncateTable, EventKind::DropTable])
        );
    }
}
