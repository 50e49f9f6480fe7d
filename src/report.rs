//! Session report and export functionality

use crate::protocol::{ChatterAlert, ConfigResponse, SnapshotResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete diagnostics report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Topology and engine settings
    pub config: ConfigResponse,
    /// Per-key and per-line dump
    pub snapshot: SnapshotResponse,
    /// Keys with chattering episodes
    pub alerts: Vec<ChatterAlert>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
}

/// Session summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Events recorded since the last reset
    pub total_events: u64,
    /// Keys with at least one transition
    pub keys_seen: u32,
    /// Keys with no transition
    pub keys_missing: u32,
    /// Keys with at least one chattering episode
    pub chattering_keys: u32,
    /// Lines flagged by the fault heuristic
    pub suspected_lines: Vec<u32>,
}

impl DiagnosticReport {
    pub fn new(
        config: ConfigResponse,
        snapshot: SnapshotResponse,
        alerts: Vec<ChatterAlert>,
    ) -> Self {
        let now: DateTime<Utc> = Utc::now();

        let keys_missing = snapshot.keys.iter().filter(|k| k.never_seen).count() as u32;
        let summary = ReportSummary {
            total_events: snapshot.total_events,
            keys_seen: snapshot.keys.len() as u32 - keys_missing,
            keys_missing,
            chattering_keys: alerts.len() as u32,
            suspected_lines: snapshot
                .lines
                .iter()
                .filter(|l| l.suspected_fault)
                .map(|l| l.index)
                .collect(),
        };

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            summary,
            config,
            snapshot,
            alerts,
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text summary for terminals and logs
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "KEYSCAN DIAGNOSTICS REPORT");
        let _ = writeln!(out, "Generated: {}", self.metadata.generated_at);
        let _ = writeln!(
            out,
            "Matrix: {} ({} lines, {} keys)",
            self.config.matrix_kind.name(),
            self.config.line_count,
            self.config.key_count
        );
        let _ = writeln!(
            out,
            "Chatter: window {} ms, burst {}",
            self.snapshot.chatter_window_ms, self.snapshot.chatter_burst_threshold
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "SUMMARY");
        let _ = writeln!(out, "Total Events: {}", self.summary.total_events);
        let _ = writeln!(
            out,
            "Keys Seen: {} / {}",
            self.summary.keys_seen,
            self.snapshot.keys.len()
        );
        let _ = writeln!(out, "Chattering Keys: {}", self.summary.chattering_keys);

        for alert in &self.alerts {
            let _ = writeln!(
                out,
                "  key {}: {} episodes over {} events ({}..{} ms)",
                alert.position,
                alert.chatter_count,
                alert.event_count,
                alert.first_event_ms,
                alert.last_event_ms
            );
        }

        if self.summary.suspected_lines.is_empty() {
            let _ = writeln!(out, "Suspected Lines: none");
        } else {
            let _ = writeln!(out, "Suspected Lines:");
            for line in self.snapshot.lines.iter().filter(|l| l.suspected_fault) {
                let _ = writeln!(
                    out,
                    "  line {} ({} pin {}): activity {}, chatter keys {}, missing keys {}",
                    line.index,
                    line.port,
                    line.pin,
                    line.activity,
                    line.chatter_keys,
                    line.missing_keys
                );
            }
        }

        out
    }
}
