//! Table scope filtering (block-allow list)
//!
//! Restricts which schemas and tables a replication task is allowed to
//! touch. Patterns use glob syntax and are case-insensitive:
//!
//! - Exclusions always win over inclusions
//! - Empty include lists admit everything not excluded
//! - Table patterns match `schema.table` or the bare table name
//!
//! # Example
//!
//! ```rust
//! use rivven_binlog_filter::common::{BlockAllowList, BlockAllowListConfig, Table, TableScope};
//!
//! let config = BlockAllowListConfig {
//!     include_schemas: vec!["shop_*".to_string()],
//!     exclude_tables: vec!["*.audit_log".to_string()],
//!     ..Default::default()
//! };
//! let scope = BlockAllowList::new(config).unwrap();
//!
//! let admitted = scope.apply(&[
//!     Table::new("shop_eu", "orders"),
//!     Table::new("shop_eu", "audit_log"),
//!     Table::new("billing", "invoices"),
//! ]);
//! assert_eq!(admitted, vec![Table::new("shop_eu", "orders")]);
//! ```

use crate::common::pattern::{PatternError, PatternSet};
use crate::common::Table;
use serde::{Deserialize, Serialize};

/// Classifier deciding which tables are in replication scope.
///
/// Implementations must tolerate concurrent queries.
pub trait TableScope: Send + Sync {
    /// Return the subset of `tables` that passes the scope rules.
    ///
    /// Set membership is what matters to callers; order is not.
    fn apply(&self, tables: &[Table]) -> Vec<Table>;
}

/// Block-allow list configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAllowListConfig {
    /// Schemas to replicate (glob); empty means all
    #[serde(default)]
    pub include_schemas: Vec<String>,

    /// Schemas never replicated (glob)
    #[serde(default)]
    pub exclude_schemas: Vec<String>,

    /// Tables to replicate (glob, `schema.table` or `table`); empty means all
    #[serde(default)]
    pub include_tables: Vec<String>,

    /// Tables never replicated (glob, `schema.table` or `table`)
    #[serde(default)]
    pub exclude_tables: Vec<String>,
}

impl BlockAllowListConfig {
    /// Whether any rule is configured.
    pub fn is_empty(&self) -> bool {
        self.include_schemas.is_empty()
            && self.exclude_schemas.is_empty()
            && self.include_tables.is_empty()
            && self.exclude_tables.is_empty()
    }
}

/// Compiled block-allow list
#[derive(Debug, Clone, Default)]
pub struct BlockAllowList {
    include_schemas: PatternSet,
    exclude_schemas: PatternSet,
    include_tables: PatternSet,
    exclude_tables: PatternSet,
}

impl BlockAllowList {
    /// Compile a block-allow list from configuration
    pub fn new(config: BlockAllowListConfig) -> Result<Self, PatternError> {
        Ok(Self {
            include_schemas: PatternSet::from_patterns(&config.include_schemas)?,
            exclude_schemas: PatternSet::from_patterns(&config.exclude_schemas)?,
            include_tables: PatternSet::from_patterns(&config.include_tables)?,
            exclude_tables: PatternSet::from_patterns(&config.exclude_tables)?,
        })
    }

    /// A list that admits every table
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Check if a single table is in scope
    pub fn is_table_allowed(&self, table: &Table) -> bool {
        if self.exclude_schemas.matches(&table.schema)
            || self
                .exclude_tables
                .matches_qualified(&table.schema, &table.name)
        {
            return false;
        }

        if !self.include_schemas.is_empty() && !self.include_schemas.matches(&table.schema) {
            return false;
        }

        self.include_tables.is_empty()
            || self
                .include_tables
                .matches_qualified(&table.schema, &table.name)
    }
}

impl TableScope for BlockAllowList {
    fn apply(&self, tables: &[Table]) -> Vec<Table> {
        tables
            .iter()
            .filter(|t| self.is_table_allowed(t))
            .cloned()
            .collect()
    }
}
