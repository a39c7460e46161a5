//! JSONL audit log: one append-only record per prediction run.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// A single prediction run.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub run_id: String,
    pub timestamp: String,
    pub input: String,
    pub artifacts: String,
    pub policy: String,
    pub elements: Option<usize>,
    pub titles: Option<usize>,
    pub contents: Option<usize>,
    pub duration_ms: u64,
    pub status: String,
}

impl AuditEvent {
    /// Start an event for a run; counts and status are filled in afterwards.
    pub fn begin(input: &str, artifacts: &Path, policy: &str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            input: input.to_string(),
            artifacts: artifacts.display().to_string(),
            policy: policy.to_string(),
            elements: None,
            titles: None,
            contents: None,
            duration_ms: 0,
            status: "ok".to_string(),
        }
    }
}

/// Append-only JSONL audit logger.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create the audit log file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open audit log: {}", path.display()))?;

        Ok(Self { file })
    }

    /// Log an audit event.
    pub fn log(&mut self, event: &AuditEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.file, "{json}")?;
        Ok(())
    }
}
