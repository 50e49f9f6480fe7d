//! Request dispatch
//!
//! One request in, exactly one response out. Handler failures turn into an
//! `error` response; nothing here panics on caller input.

use super::codec::{decode_request, encode_response};
use super::snapshot::SnapshotBuilder;
use super::{
    ChatteringAlertsResponse, ClearDataResponse, ConfigResponse, EventsResponse,
    GetChatteringAlertsRequest, GetEventsRequest, Request, Response, SnapshotRequest,
    StartMonitoringRequest, StartMonitoringResponse, StopMonitoringResponse, TestGpioPinRequest,
    TestGpioPinResponse,
};
use crate::diagnostics::Diagnostics;
use crate::error::DiagnosticsError;
use crate::gpio::{GpioProbe, NoGpio};
use crate::report::DiagnosticReport;
use log::{debug, info, warn};

/// Encoded fallback when even the error response cannot be serialized
const ENCODE_FAILURE: &[u8] = br#"{"error":{"message":"Failed to encode response"}}"#;

/// Dispatches protocol requests against a [`Diagnostics`] engine
pub struct RequestRouter<'a> {
    diagnostics: &'a Diagnostics,
    builder: SnapshotBuilder,
    gpio: Box<dyn GpioProbe + 'a>,
}

impl<'a> RequestRouter<'a> {
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self {
            diagnostics,
            builder: SnapshotBuilder::new(diagnostics.mapper(), diagnostics.event_capacity()),
            gpio: Box::new(NoGpio),
        }
    }

    /// Attach the hardware collaborator used by `testGpioPin`
    pub fn with_gpio(mut self, probe: impl GpioProbe + 'a) -> Self {
        self.gpio = Box::new(probe);
        self
    }

    /// Handle one encoded request and return the encoded response.
    pub fn handle_bytes(&mut self, payload: &[u8]) -> Vec<u8> {
        let response = match decode_request(payload) {
            Ok(request) => self.handle(request),
            Err(e) => {
                warn!("Rejecting diagnostics request: {}", e);
                Response::error(e.to_string())
            }
        };

        match encode_response(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{}", e);
                ENCODE_FAILURE.to_vec()
            }
        }
    }

    /// Handle one decoded request.
    pub fn handle(&mut self, request: Request) -> Response {
        let name = request.name();
        let result = match request {
            Request::GetConfig(_) => Ok(self.get_config()),
            Request::Snapshot(req) => Ok(self.snapshot(&req)),
            Request::StartMonitoring(req) => Ok(self.start_monitoring(&req)),
            Request::StopMonitoring(_) => Ok(self.stop_monitoring()),
            Request::GetEvents(req) => Ok(self.get_events(&req)),
            Request::GetChatteringAlerts(req) => Ok(self.chattering_alerts(&req)),
            Request::ClearData(_) => Ok(self.clear_data()),
            Request::TestGpioPin(req) => self.test_gpio_pin(&req),
        };

        result.unwrap_or_else(|e: DiagnosticsError| {
            warn!("Failed to process {} request: {}", name, e);
            Response::error(e.to_string())
        })
    }

    fn get_config(&mut self) -> Response {
        debug!("Get config request");
        Response::Config(self.config())
    }

    fn config(&self) -> ConfigResponse {
        let mapper = self.diagnostics.mapper();
        let monitoring = self.diagnostics.monitoring();

        ConfigResponse {
            matrix_kind: mapper.kind(),
            line_count: mapper.line_count() as u32,
            key_count: mapper.key_count() as u32,
            lines: mapper.lines().to_vec(),
            chatter_window_ms: monitoring.chatter_window_ms,
            chatter_burst_threshold: monitoring.chatter_burst_threshold,
            event_buffer_capacity: self.diagnostics.event_capacity() as u32,
            monitoring_active: monitoring.active,
        }
    }

    fn snapshot(&mut self, req: &SnapshotRequest) -> Response {
        debug!("Snapshot request (reset: {})", req.reset_counters);
        let builder = &mut self.builder;
        self.diagnostics.with_state(|state| {
            builder.capture_stats(state);
            if req.reset_counters {
                state.reset_counters();
            }
        });

        if req.reset_counters {
            info!("Keyscan diagnostics counters reset after snapshot");
        }
        Response::Snapshot(self.builder.snapshot(self.diagnostics.mapper()))
    }

    fn start_monitoring(&mut self, req: &StartMonitoringRequest) -> Response {
        info!(
            "Start monitoring request: chatter_threshold={} ms",
            req.chatter_threshold_ms
        );
        let monitoring = self.diagnostics.start(req.chatter_threshold_ms);

        Response::StartMonitoring(StartMonitoringResponse {
            success: true,
            message: format!(
                "Monitoring started: window {} ms, burst {}",
                monitoring.chatter_window_ms, monitoring.chatter_burst_threshold
            ),
            chatter_window_ms: monitoring.chatter_window_ms,
            chatter_burst_threshold: monitoring.chatter_burst_threshold,
            line_count: self.diagnostics.mapper().line_count() as u32,
        })
    }

    fn stop_monitoring(&mut self) -> Response {
        info!("Stop monitoring request");
        self.diagnostics.stop();
        Response::StopMonitoring(StopMonitoringResponse { success: true })
    }

    fn get_events(&mut self, req: &GetEventsRequest) -> Response {
        debug!(
            "Get events request (max: {}, clear: {})",
            req.max_count, req.clear_buffer
        );
        let builder = &mut self.builder;
        self.diagnostics.with_state(|state| {
            builder.capture_events(state, req.max_count as usize);
            if req.clear_buffer {
                state.events.clear();
            }
        });

        Response::Events(EventsResponse {
            events: self.builder.events().to_vec(),
            total_events: self.builder.total_events(),
            overflow: self.builder.overflow(),
        })
    }

    fn chattering_alerts(&mut self, req: &GetChatteringAlertsRequest) -> Response {
        debug!("Get chattering alerts request (clear: {})", req.clear_alerts);
        let builder = &mut self.builder;
        self.diagnostics.with_state(|state| {
            builder.capture_stats(state);
            if req.clear_alerts {
                state.stats.clear_chatter();
            }
        });

        Response::ChatteringAlerts(ChatteringAlertsResponse {
            alerts: self.builder.chatter_alerts(),
        })
    }

    fn clear_data(&mut self) -> Response {
        info!("Clear data request");
        self.diagnostics.clear();
        Response::ClearData(ClearDataResponse { success: true })
    }

    fn test_gpio_pin(&mut self, req: &TestGpioPinRequest) -> Result<Response, DiagnosticsError> {
        let diagnostics = self.diagnostics;
        let mapper = diagnostics.mapper();
        let index = req.index as usize;
        let line = mapper
            .line(index)
            .ok_or(DiagnosticsError::InvalidPosition {
                what: "line",
                index,
                limit: mapper.line_count(),
            })?;

        info!("Test GPIO request: line {} ({} pin {})", index, line.port, line.pin);
        let response = match self.gpio.read_line(index, line) {
            Ok(level) => TestGpioPinResponse {
                success: true,
                pin_state: Some(level),
                error_message: None,
            },
            Err(e) => TestGpioPinResponse {
                success: false,
                pin_state: None,
                error_message: Some(e.to_string()),
            },
        };
        Ok(Response::TestGpioPin(response))
    }

    /// Structured summary of the current session
    pub fn report(&mut self) -> DiagnosticReport {
        let config = self.config();
        let builder = &mut self.builder;
        self.diagnostics.with_state(|state| builder.capture_stats(state));
        let snapshot = self.builder.snapshot(self.diagnostics.mapper());
        let alerts = self.builder.chatter_alerts();
        DiagnosticReport::new(config, snapshot, alerts)
    }
}
