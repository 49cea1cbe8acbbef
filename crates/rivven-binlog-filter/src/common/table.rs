//! Source table identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// A source database object identified by schema and table name.
///
/// Produced by the statement parser or the binlog decoder; consumed by
/// every classifier the admission decider consults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Table {
    /// Schema (MySQL database) name
    pub schema: String,
    /// Table name
    pub name: String,
}

impl Table {
    /// Create a new table reference.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Qualified `schema.table` name (unquoted).
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`.`{}`", self.schema, self.name)
    }
}
