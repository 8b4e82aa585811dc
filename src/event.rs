// src/event.rs

use crate::core::error::ApiError;
use crate::core::health::HealthUpdate;
use crate::core::models::{Ack, ReportContent, ReportSummary, ScanRequest};
use crate::core::monitor::MonitorUpdate;
use crate::core::session::MonitorHandle;
use std::path::PathBuf;

/// Where a fetched report should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
    /// The "last report" panel, filled when a scan completes.
    LastReport,
    /// The view popup opened from the report list.
    Popup,
}

/// Side effects requested by [`crate::app::App`]. The dispatcher runs them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StartScan(ScanRequest),
    StopScan,
    /// Start polling with a freshly armed handle.
    Monitor(MonitorHandle),
    FetchReport { id: String, target: ReportTarget },
    RefreshReports,
    DownloadReport { id: String },
    DeleteReport { id: String, name: String },
    ClearReports,
    ExportReports,
}

/// Results delivered back to the UI loop by background tasks.
#[derive(Debug)]
pub enum AppEvent {
    Health(HealthUpdate),
    Monitor(MonitorUpdate),
    ScanStarted(Result<Ack, ApiError>),
    ScanStopped(Result<Ack, ApiError>),
    ReportLoaded { target: ReportTarget, result: Result<ReportContent, ApiError> },
    ReportsLoaded(Result<Vec<ReportSummary>, ApiError>),
    ReportDeleted { name: String, result: Result<Ack, ApiError> },
    ReportsCleared(Result<Ack, ApiError>),
    Downloaded(Result<PathBuf, ApiError>),
    Exported(Result<PathBuf, ApiError>),
}

impl From<HealthUpdate> for AppEvent {
    fn from(update: HealthUpdate) -> Self {
        AppEvent::Health(update)
    }
}

impl From<MonitorUpdate> for AppEvent {
    fn from(update: MonitorUpdate) -> Self {
        AppEvent::Monitor(update)
    }
}
