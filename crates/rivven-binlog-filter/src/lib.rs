//! # rivven-binlog-filter - Binlog Event Admission for Rivven CDC
//!
//! Decides, for every DDL query event and DML row event read from a MySQL
//! binlog, whether the event is skipped before it reaches the apply path.
//!
//! ## Architecture
//!
//! ```text
//!         query event                      row event
//!   (tables, stmt?, sql)             (table, event type)
//!            │                                │
//!            ▼                                ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                   AdmissionDecider                       │
//! │  built-in skip → system schema → BlockAllowList          │
//! │      → OnlineDdlClassifier (rows) → BinlogEventFilter    │
//! └──────────────────────────────────────────────────────────┘
//!            │
//!            ▼
//!     Ok(skip: bool) | Err(AdmissionError)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rivven_binlog_filter::{AdmissionConfig, AdmissionDecider, Table};
//! use rivven_binlog_filter::common::{BinlogEventRule, EventKind, FilterAction};
//! use rivven_binlog_filter::mysql::BinlogEventType;
//!
//! # fn example() -> rivven_binlog_filter::Result<()> {
//! let config = AdmissionConfig::builder()
//!     .include_schemas(vec!["shop_*".to_string()])
//!     .filter_rule(
//!         BinlogEventRule::new("shop_*", FilterAction::Ignore)
//!             .with_events(vec![EventKind::Delete]),
//!     )
//!     .build();
//! let decider = AdmissionDecider::from_config(&config)?;
//!
//! let orders = Table::new("shop_eu", "orders");
//! assert!(decider.skip_dml_event(&orders, BinlogEventType::DeleteRowsEventV2)?);
//! assert!(!decider.skip_dml_event(&orders, BinlogEventType::WriteRowsEventV2)?);
//! assert!(decider.skip_query(&[], None, "GRANT SELECT ON *.* TO 'app'@'%'")?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod admission;
pub mod common;
pub mod mysql;

pub use admission::{AdmissionConfig, AdmissionDecider, SkipReason};
pub use common::{
    AdmissionError, BinlogEventFilter, BlockAllowList, ErrorCategory, EventKind, FilterAction,
    Result, StatementNode, Table,
};
