//! MySQL binlog event types
//!
//! Raw event type codes as they appear in the binlog event header, and the
//! mapping from row events (every format version) to abstract DML kinds.

use crate::common::{AdmissionError, EventKind, Result};
use std::fmt;

/// Binlog event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinlogEventType {
    Unknown = 0,
    StartEventV3 = 1,
    QueryEvent = 2,
    StopEvent = 3,
    RotateEvent = 4,
    IntvarEvent = 5,
    LoadEvent = 6,
    SlaveEvent = 7,
    CreateFileEvent = 8,
    AppendBlockEvent = 9,
    ExecLoadEvent = 10,
    DeleteFileEvent = 11,
    NewLoadEvent = 12,
    RandEvent = 13,
    UserVarEvent = 14,
    FormatDescriptionEvent = 15,
    XidEvent = 16,
    BeginLoadQueryEvent = 17,
    ExecuteLoadQueryEvent = 18,
    TableMapEvent = 19,
    /// Row events of MySQL 5.1.0 - 5.1.15 (v0)
    PreGaWriteRowsEvent = 20,
    PreGaUpdateRowsEvent = 21,
    PreGaDeleteRowsEvent = 22,
    WriteRowsEventV1 = 23,
    UpdateRowsEventV1 = 24,
    DeleteRowsEventV1 = 25,
    IncidentEvent = 26,
    HeartbeatLogEvent = 27,
    IgnorableLogEvent = 28,
    RowsQueryLogEvent = 29,
    WriteRowsEventV2 = 30,
    UpdateRowsEventV2 = 31,
    DeleteRowsEventV2 = 32,
    GtidLogEvent = 33,
    AnonymousGtidLogEvent = 34,
    PreviousGtidsLogEvent = 35,
    TransactionContextEvent = 36,
    ViewChangeEvent = 37,
    XaPrepareLogEvent = 38,
    PartialUpdateRowsEvent = 39,
    TransactionPayloadEvent = 40,
}

impl BinlogEventType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => BinlogEventType::StartEventV3,
            2 => BinlogEventType::QueryEvent,
            3 => BinlogEventType::StopEvent,
            4 => BinlogEventType::RotateEvent,
            5 => BinlogEventType::IntvarEvent,
            6 => BinlogEventType::LoadEvent,
            7 => BinlogEventType::SlaveEvent,
            8 => BinlogEventType::CreateFileEvent,
            9 => BinlogEventType::AppendBlockEvent,
            10 => BinlogEventType::ExecLoadEvent,
            11 => BinlogEventType::DeleteFileEvent,
            12 => BinlogEventType::NewLoadEvent,
            13 => BinlogEventType::RandEvent,
            14 => BinlogEventType::UserVarEvent,
            15 => BinlogEventType::FormatDescriptionEvent,
            16 => BinlogEventType::XidEvent,
            17 => BinlogEventType::BeginLoadQueryEvent,
            18 => BinlogEventType::ExecuteLoadQueryEvent,
            19 => BinlogEventType::TableMapEvent,
            20 => BinlogEventType::PreGaWriteRowsEvent,
            21 => BinlogEventType::PreGaUpdateRowsEvent,
            22 => BinlogEventType::PreGaDeleteRowsEvent,
            23 => BinlogEventType::WriteRowsEventV1,
            24 => BinlogEventType::UpdateRowsEventV1,
            25 => BinlogEventType::DeleteRowsEventV1,
            26 => BinlogEventType::IncidentEvent,
            27 => BinlogEventType::HeartbeatLogEvent,
            28 => BinlogEventType::IgnorableLogEvent,
            29 => BinlogEventType::RowsQueryLogEvent,
            30 => BinlogEventType::WriteRowsEventV2,
            31 => BinlogEventType::UpdateRowsEventV2,
            32 => BinlogEventType::DeleteRowsEventV2,
            33 => BinlogEventType::GtidLogEvent,
            34 => BinlogEventType::AnonymousGtidLogEvent,
            35 => BinlogEventType::PreviousGtidsLogEvent,
            36 => BinlogEventType::TransactionContextEvent,
            37 => BinlogEventType::ViewChangeEvent,
            38 => BinlogEventType::XaPrepareLogEvent,
            39 => BinlogEventType::PartialUpdateRowsEvent,
            40 => BinlogEventType::TransactionPayloadEvent,
            _ => BinlogEventType::Unknown,
        }
    }

    /// Write/update/delete rows event of any format version.
    pub fn is_row_event(&self) -> bool {
        dml_event_kind(*self).is_ok()
    }
}

impl fmt::Display for BinlogEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Map a row event type to its DML kind.
///
/// Anything other than a write/update/delete rows event is rejected with
/// [`AdmissionError::InvalidReplicaEvent`]; there is no fallback kind.
pub fn dml_event_kind(event_type: BinlogEventType) -> Result<EventKind> {
    match event_type {
        BinlogEventType::PreGaWriteRowsEvent
        | BinlogEventType::WriteRowsEventV1
        | BinlogEventType::WriteRowsEventV2 => Ok(EventKind::Insert),
        BinlogEventType::PreGaUpdateRowsEvent
        | BinlogEventType::UpdateRowsEventV1
        | BinlogEventType::UpdateRowsEventV2 => Ok(EventKind::Update),
        BinlogEventType::PreGaDeleteRowsEvent
        | BinlogEventType::DeleteRowsEventV1
        | BinlogEventType::DeleteRowsEventV2 => Ok(EventKind::Delete),
        other => Err(AdmissionError::InvalidReplicaEvent(other)),
    }
}
