//! Abstract event kinds and filter actions
//!
//! [`EventKind`] is the vocabulary shared between the admission decider and
//! the rule filter: concrete DDL/DML kinds describe an event, while the
//! group kinds (`all`, `all dml`, `all ddl`, `none`) only appear in rule
//! configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Abstract kind of a binlog event as seen by the rule filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Every event (rule configuration only)
    #[serde(rename = "all")]
    AllEvent,
    /// Every DML event (rule configuration only)
    #[serde(rename = "all dml")]
    AllDml,
    /// Every DDL event (rule configuration only)
    #[serde(rename = "all ddl")]
    AllDdl,
    /// No event (rule configuration only)
    #[serde(rename = "none")]
    NoneEvent,

    /// Query whose statement kind is unknown (unparsed or non-DDL)
    #[serde(rename = "null")]
    NullEvent,

    #[serde(rename = "create database")]
    CreateDatabase,
    #[serde(rename = "drop database")]
    DropDatabase,
    #[serde(rename = "alter database")]
    AlterDatabase,
    #[serde(rename = "create table")]
    CreateTable,
    #[serde(rename = "drop table")]
    DropTable,
    #[serde(rename = "truncate table")]
    TruncateTable,
    #[serde(rename = "rename table")]
    RenameTable,
    #[serde(rename = "create index")]
    CreateIndex,
    #[serde(rename = "drop index")]
    DropIndex,
    #[serde(rename = "alter table")]
    AlterTable,
    #[serde(rename = "create view")]
    CreateView,
    #[serde(rename = "drop view")]
    DropView,

    #[serde(rename = "insert")]
    Insert,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "delete")]
    Delete,
}

impl EventKind {
    /// Configuration name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AllEvent => "all",
            EventKind::AllDml => "all dml",
            EventKind::AllDdl => "all ddl",
            EventKind::NoneEvent => "none",
            EventKind::NullEvent => "null",
            EventKind::CreateDatabase => "create database",
            EventKind::DropDatabase => "drop database",
            EventKind::AlterDatabase => "alter database",
            EventKind::CreateTable => "create table",
            EventKind::DropTable => "drop table",
            EventKind::TruncateTable => "truncate table",
            EventKind::RenameTable => "rename table",
            EventKind::CreateIndex => "create index",
            EventKind::DropIndex => "drop index",
            EventKind::AlterTable => "alter table",
            EventKind::CreateView => "create view",
            EventKind::DropView => "drop view",
            EventKind::Insert => "insert",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
        }
    }

    /// Row-change kind
    pub fn is_dml(&self) -> bool {
        matches!(self, EventKind::Insert | EventKind::Update | EventKind::Delete)
    }

    /// Schema-change kind (excludes [`EventKind::NullEvent`])
    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            EventKind::CreateDatabase
                | EventKind::DropDatabase
                | EventKind::AlterDatabase
                | EventKind::CreateTable
                | EventKind::DropTable
                | EventKind::TruncateTable
                | EventKind::RenameTable
                | EventKind::CreateIndex
                | EventKind::DropIndex
                | EventKind::AlterTable
                | EventKind::CreateView
                | EventKind::DropView
        )
    }

    /// Group kinds may only be used in rules, never to describe an event.
    pub fn is_group(&self) -> bool {
        matches!(
            self,
            EventKind::AllEvent | EventKind::AllDml | EventKind::AllDdl | EventKind::NoneEvent
        )
    }

    /// Check whether this (concrete) kind is selected by a rule entry.
    pub fn matches(&self, selector: EventKind) -> bool {
        match selector {
            EventKind::AllEvent => true,
            EventKind::AllDml => self.is_dml(),
            EventKind::AllDdl => self.is_ddl(),
            EventKind::NoneEvent => false,
            concrete => concrete == *self,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of the rule filter for a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    /// Replicate the event
    #[default]
    #[serde(rename = "do", alias = "admit", alias = "Do")]
    Admit,
    /// Drop the event
    #[serde(alias = "Ignore")]
    Ignore,
}

/// A parsed DDL statement.
///
/// The admission decider never inspects a statement beyond the event kind
/// it describes; any parser output can be plugged in by implementing this.
pub trait StatementNode {
    /// Kind of schema change this statement performs.
    fn ddl_event(&self) -> EventKind;
}

/// Statement kinds produced by the MySQL DDL parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DdlStatement {
    CreateDatabase,
    DropDatabase,
    AlterDatabase,
    CreateTable,
    DropTable,
    TruncateTable,
    RenameTable,
    CreateIndex,
    DropIndex,
    AlterTable,
    CreateView,
    DropView,
    /// Parsed, but not a schema change the rule filter knows about
    Other,
}

impl StatementNode for DdlStatement {
    fn ddl_event(&self) -> EventKind {
        match self {
            DdlStatement::CreateDatabase => EventKind::CreateDatabase,
            DdlStatement::DropDatabase => EventKind::DropDatabase,
            DdlStatement::AlterDatabase => EventKind::AlterDatabase,
            DdlStatement::CreateTable => EventKind::CreateTable,
            DdlStatement::DropTable => EventKind::DropTable,
            DdlStatement::TruncateTable => EventKind::TruncateTable,
            DdlStatement::RenameTable => EventKind::RenameTable,
            DdlStatement::CreateIndex => EventKind::CreateIndex,
            DdlStatement::DropIndex => EventKind::DropIndex,
            DdlStatement::AlterTable => EventKind::AlterTable,
            DdlStatement::CreateView => EventKind::CreateView,
            DdlStatement::DropView => EventKind::DropView,
            DdlStatement::Other => EventKind::NullEvent,
        }
    }
}

/// Kind of a query event; a missing statement is a [`EventKind::NullEvent`].
pub fn query_event_kind(stmt: Option<&dyn StatementNode>) -> EventKind {
    stmt.map_or(EventKind::NullEvent, |s| s.ddl_event())
}
