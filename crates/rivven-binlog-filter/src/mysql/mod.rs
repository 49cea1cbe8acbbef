//! MySQL/MariaDB specifics
//!
//! - Binlog event type codes and the row-event → DML kind mapping
//! - Statements skipped unconditionally (account management, stored
//!   programs, maintenance) and the engine's internal schemas

pub mod binlog;
pub mod builtin;

pub use binlog::*;
pub use builtin::*;
