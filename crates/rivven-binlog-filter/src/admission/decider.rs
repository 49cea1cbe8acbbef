//! # Event Admission Decider
//!
//! Decides, per binlog event, whether the event is skipped before it
//! reaches the apply path. Filter layers run in a fixed order with early
//! exit; the order is part of the contract:
//!
//! ```text
//! Query (DDL)                          Row (DML)
//! ───────────                          ─────────
//! 1. built-in skip statement           1. system schema
//! 2. any system schema table           2. block-allow list
//! 3. any table out of scope            3. online DDL artifact
//! 4. rule filter (per table)           4. rule filter
//! ```
//!
//! A multi-table statement is skipped in full when any one of its tables
//! is vetoed; it is never partially admitted.
//!
//! Rule filter failures and unknown row event types are returned as errors
//! and never turned into a skip or an admit.

use crate::common::{
    query_event_kind, AdmissionError, BinlogEventFilter, BlockAllowList, FilterAction,
    GhostClassifier, OnlineDdlClassifier, Result, RuleFilter, StatementNode, Table, TableScope,
    TableType,
};
use crate::mysql::{dml_event_kind, is_builtin_skip_ddl, is_system_schema, BinlogEventType};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::AdmissionConfig;

/// Predicate over raw SQL selecting always-skipped statements.
pub type BuiltinSkipFn = fn(&str) -> bool;

/// Predicate over a schema name selecting internal schemas.
pub type SystemSchemaFn = fn(&str) -> bool;

/// Why an event was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Statement in the built-in skip set
    Builtin,
    /// References an internal schema
    SystemSchema,
    /// Rejected by the block-allow list
    OutOfScope,
    /// Online schema change shadow/trash table
    OnlineDdl,
    /// Ignored by a binlog event filter rule
    Rule,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Builtin => "builtin",
            SkipReason::SystemSchema => "system_schema",
            SkipReason::OutOfScope => "out_of_scope",
            SkipReason::OnlineDdl => "online_ddl",
            SkipReason::Rule => "rule",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event admission decider.
///
/// Holds no mutable state; classifiers are shared behind `Arc` and queried
/// on every call, so reconfiguring a classifier (e.g.
/// [`BinlogEventFilter::reload`]) takes effect on the next event.
#[derive(Clone)]
pub struct AdmissionDecider {
    builtin_skip: BuiltinSkipFn,
    system_schema: SystemSchemaFn,
    scope: Arc<dyn TableScope>,
    ghost: Option<Arc<dyn GhostClassifier>>,
    rules: Option<Arc<dyn RuleFilter>>,
}

impl AdmissionDecider {
    /// Decider with only the scope filter and the built-in classifiers.
    pub fn new(scope: Arc<dyn TableScope>) -> Self {
        Self::builder(scope).build()
    }

    /// Create a builder around a scope filter.
    pub fn builder(scope: Arc<dyn TableScope>) -> AdmissionDeciderBuilder {
        AdmissionDeciderBuilder {
            builtin_skip: is_builtin_skip_ddl,
            system_schema: is_system_schema,
            scope,
            ghost: None,
            rules: None,
        }
    }

    /// Build a decider and all of its classifiers from configuration.
    pub fn from_config(config: &AdmissionConfig) -> Result<Self> {
        let scope = BlockAllowList::new(config.block_allow_list.clone())?;
        let mut builder = Self::builder(Arc::new(scope));

        if let Some(online_ddl) = &config.online_ddl {
            builder = builder.ghost_classifier(Arc::new(OnlineDdlClassifier::new(online_ddl)?));
        }

        if !config.filter_rules.is_empty() {
            let filter = BinlogEventFilter::new(config.filter_rules.clone())
                .map_err(|e| AdmissionError::config(e.to_string()))?;
            builder = builder.rule_filter(Arc::new(filter));
        }

        let decider = builder.build();
        debug!(
            ghost = decider.has_ghost_classifier(),
            rules = config.filter_rules.len(),
            "Built admission decider from config"
        );
        Ok(decider)
    }

    pub fn has_ghost_classifier(&self) -> bool {
        self.ghost.is_some()
    }

    pub fn has_rule_filter(&self) -> bool {
        self.rules.is_some()
    }

    /// Decide whether a query event is skipped.
    ///
    /// `tables` are the tables the statement references (possibly none),
    /// `stmt` the parsed statement if the query could be parsed.
    pub fn skip_query(
        &self,
        tables: &[Table],
        stmt: Option<&dyn StatementNode>,
        sql: &str,
    ) -> Result<bool> {
        match self.query_skip_reason(tables, stmt, sql) {
            Ok(Some(reason)) => {
                record_skip("query", reason);
                debug!(reason = %reason, sql, "Skipping query event");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                record_error(&e);
                Err(e)
            }
        }
    }

    /// Decide whether a row event on `table` is skipped.
    pub fn skip_dml_event(&self, table: &Table, event_type: BinlogEventType) -> Result<bool> {
        match self.dml_skip_reason(table, event_type) {
            Ok(Some(reason)) => {
                record_skip("dml", reason);
                debug!(
                    reason = %reason,
                    table = %table,
                    event_type = %event_type,
                    "Skipping row event"
                );
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                record_error(&e);
                Err(e)
            }
        }
    }

    /// Reason a query event is skipped, `None` if it is admitted.
    pub fn query_skip_reason(
        &self,
        tables: &[Table],
        stmt: Option<&dyn StatementNode>,
        sql: &str,
    ) -> Result<Option<SkipReason>> {
        if (self.builtin_skip)(sql) {
            return Ok(Some(SkipReason::Builtin));
        }

        if tables.iter().any(|t| (self.system_schema)(&t.schema)) {
            return Ok(Some(SkipReason::SystemSchema));
        }

        if !tables.is_empty() && self.scope.apply(tables).len() != tables.len() {
            return Ok(Some(SkipReason::OutOfScope));
        }

        let Some(rules) = self.rules.as_deref() else {
            return Ok(None);
        };

        let kind = query_event_kind(stmt);

        if tables.is_empty() {
            let action = rules.filter("", "", kind, sql).map_err(|e| {
                AdmissionError::binlog_event_filter(e, format!("skip query {}", sql))
            })?;
            return Ok((action == FilterAction::Ignore).then_some(SkipReason::Rule));
        }

        for table in tables {
            let action = rules
                .filter(&table.schema, &table.name, kind, sql)
                .map_err(|e| {
                    AdmissionError::binlog_event_filter(
                        e,
                        format!("skip query {} on {}", sql, table),
                    )
                })?;
            if action == FilterAction::Ignore {
                return Ok(Some(SkipReason::Rule));
            }
        }

        Ok(None)
    }

    /// Reason a row event is skipped, `None` if it is admitted.
    pub fn dml_skip_reason(
        &self,
        table: &Table,
        event_type: BinlogEventType,
    ) -> Result<Option<SkipReason>> {
        if (self.system_schema)(&table.schema) {
            return Ok(Some(SkipReason::SystemSchema));
        }

        if self.scope.apply(std::slice::from_ref(table)).is_empty() {
            return Ok(Some(SkipReason::OutOfScope));
        }

        if let Some(ghost) = &self.ghost {
            if ghost.table_type(&table.name) != TableType::RealTable {
                return Ok(Some(SkipReason::OnlineDdl));
            }
        }

        let Some(rules) = self.rules.as_deref() else {
            return Ok(None);
        };

        let kind = dml_event_kind(event_type)?;
        let action = rules
            .filter(&table.schema, &table.name, kind, "")
            .map_err(|e| {
                AdmissionError::binlog_event_filter(
                    e,
                    format!("skip row event {} on {}", event_type, table),
                )
            })?;

        Ok((action == FilterAction::Ignore).then_some(SkipReason::Rule))
    }
}

impl fmt::Debug for AdmissionDecider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionDecider")
            .field("ghost_classifier", &self.ghost.is_some())
            .field("rule_filter", &self.rules.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for AdmissionDecider.
pub struct AdmissionDeciderBuilder {
    builtin_skip: BuiltinSkipFn,
    system_schema: SystemSchemaFn,
    scope: Arc<dyn TableScope>,
    ghost: Option<Arc<dyn GhostClassifier>>,
    rules: Option<Arc<dyn RuleFilter>>,
}

impl AdmissionDeciderBuilder {
    /// Replace the built-in skip statement predicate.
    pub fn builtin_skip(mut self, predicate: BuiltinSkipFn) -> Self {
        self.builtin_skip = predicate;
        self
    }

    /// Replace the system schema predicate.
    pub fn system_schema(mut self, predicate: SystemSchemaFn) -> Self {
        self.system_schema = predicate;
        self
    }

    /// Skip row events on online schema change artifacts.
    pub fn ghost_classifier(mut self, classifier: Arc<dyn GhostClassifier>) -> Self {
        self.ghost = Some(classifier);
        self
    }

    /// Filter events through binlog event rules.
    pub fn rule_filter(mut self, filter: Arc<dyn RuleFilter>) -> Self {
        self.rules = Some(filter);
        self
    }

    /// Build the decider.
    pub fn build(self) -> AdmissionDecider {
        AdmissionDecider {
            builtin_skip: self.builtin_skip,
            system_schema: self.system_schema,
            scope: self.scope,
            ghost: self.ghost,
            rules: self.rules,
        }
    }
}

fn record_skip(path: &'static str, reason: SkipReason) {
    metrics::counter!(
        "rivven_binlog_filter_skipped_total",
        "path" => path,
        "reason" => reason.as_str()
    )
    .increment(1);
}

fn record_error(err: &AdmissionError) {
    metrics::counter!(
        "rivven_binlog_filter_errors_total",
        "error_code" => err.error_code()
    )
    .increment(1);
}
