//! Request and response messages
//!
//! Both unions are externally tagged with camelCase names, so a request
//! looks like `{"getEvents": {"maxCount": 20, "clearBuffer": false}}`.
//! Missing fields take their zero value.

use crate::diagnostics::KeyEvent;
use crate::matrix::{KeyPosition, KeyShape, LineInfo, MatrixKind};
use serde::{Deserialize, Serialize};

/// Diagnostic query, exactly one case per message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    GetConfig(GetConfigRequest),
    #[serde(alias = "getKeyMatrix")]
    Snapshot(SnapshotRequest),
    StartMonitoring(StartMonitoringRequest),
    StopMonitoring(StopMonitoringRequest),
    GetEvents(GetEventsRequest),
    GetChatteringAlerts(GetChatteringAlertsRequest),
    ClearData(ClearDataRequest),
    TestGpioPin(TestGpioPinRequest),
}

impl Request {
    /// Every tag a request may carry on the wire
    pub const TAGS: &'static [&'static str] = &[
        "getConfig",
        "snapshot",
        "getKeyMatrix",
        "startMonitoring",
        "stopMonitoring",
        "getEvents",
        "getChatteringAlerts",
        "clearData",
        "testGpioPin",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GetConfig(_) => "getConfig",
            Self::Snapshot(_) => "snapshot",
            Self::StartMonitoring(_) => "startMonitoring",
            Self::StopMonitoring(_) => "stopMonitoring",
            Self::GetEvents(_) => "getEvents",
            Self::GetChatteringAlerts(_) => "getChatteringAlerts",
            Self::ClearData(_) => "clearData",
            Self::TestGpioPin(_) => "testGpioPin",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetConfigRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapshotRequest {
    /// Zero all counters after the snapshot is taken
    pub reset_counters: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartMonitoringRequest {
    /// Chatter window override; 0 keeps the configured default
    pub chatter_threshold_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopMonitoringRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetEventsRequest {
    pub max_count: u32,
    /// Discard the whole buffer after copying
    pub clear_buffer: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetChatteringAlertsRequest {
    /// Zero chatter accounting after reporting
    pub clear_alerts: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearDataRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestGpioPinRequest {
    /// Scan line index
    pub index: u32,
}

/// Diagnostic reply, exactly one case per message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Response {
    Config(ConfigResponse),
    Snapshot(SnapshotResponse),
    StartMonitoring(StartMonitoringResponse),
    StopMonitoring(StopMonitoringResponse),
    Events(EventsResponse),
    ChatteringAlerts(ChatteringAlertsResponse),
    ClearData(ClearDataResponse),
    TestGpioPin(TestGpioPinResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorResponse {
            message: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub matrix_kind: MatrixKind,
    pub line_count: u32,
    pub key_count: u32,
    pub lines: Vec<LineInfo>,
    pub chatter_window_ms: u64,
    pub chatter_burst_threshold: u32,
    pub event_buffer_capacity: u32,
    pub monitoring_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatus {
    pub position: KeyPosition,
    pub pressed: bool,
    pub press_count: u32,
    pub release_count: u32,
    pub chatter_count: u32,
    pub last_change_ms: u64,
    pub never_seen: bool,
    /// Absent for keys without a line pair
    pub line_drive: Option<u32>,
    pub line_sense: Option<u32>,
    /// Physical placement from the configured layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<KeyShape>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatus {
    pub index: u32,
    pub port: String,
    pub pin: u32,
    pub activity: u32,
    pub involved_keys: u32,
    pub chatter_keys: u32,
    pub missing_keys: u32,
    pub suspected_fault: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub matrix_kind: MatrixKind,
    pub keys: Vec<KeyStatus>,
    pub lines: Vec<LineStatus>,
    pub chatter_window_ms: u64,
    pub chatter_burst_threshold: u32,
    pub monitoring_active: bool,
    pub total_events: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMonitoringResponse {
    pub success: bool,
    pub message: String,
    pub chatter_window_ms: u64,
    pub chatter_burst_threshold: u32,
    pub line_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopMonitoringResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    /// Oldest first
    pub events: Vec<KeyEvent>,
    pub total_events: u64,
    pub overflow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatterAlert {
    pub position: KeyPosition,
    /// Press plus release transitions
    pub event_count: u32,
    pub chatter_count: u32,
    pub first_event_ms: u64,
    pub last_event_ms: u64,
    pub min_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatteringAlertsResponse {
    pub alerts: Vec<ChatterAlert>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearDataResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestGpioPinResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
