// src/core/monitor.rs

//! Polls `/estado` on a fixed period after a scan has been accepted and
//! stops itself once the service reports a terminal state.
//!
//! Idle -> Polling -> (Completed | Failed) -> Idle. A monitor emits at most
//! one terminal event, and none at all once its handle is cancelled.

use crate::core::api::ApiClient;
use crate::core::models::ScanStatusSnapshot;
use crate::core::session::{MonitorHandle, Session};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const SCANNING_PLACEHOLDER: &str = "Escaneando...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Polling,
    Completed,
    Failed,
}

impl MonitorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MonitorState::Completed | MonitorState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The scan is still running; carries the service's progress message.
    Progress(String),
    Completed { report_id: String, message: Option<String> },
    Failed(String),
    /// Not in progress, no report and no message: the loop ended quietly.
    Stopped,
    /// `failures` consecutive polls have failed. Polling continues.
    Degraded { failures: u32 },
    /// A poll succeeded after the monitor had reported degraded connectivity.
    Recovered,
}

/// An event tagged with the monitor that produced it, so receivers can drop
/// anything coming from a monitor that has since been replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorUpdate {
    pub monitor_id: u64,
    pub event: MonitorEvent,
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub period: Duration,
    pub degraded_after: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self { period: Duration::from_secs(1), degraded_after: 5 }
    }
}

/// Maps one status snapshot to the state it moves the monitor into.
pub fn classify(snapshot: &ScanStatusSnapshot) -> (MonitorState, MonitorEvent) {
    if snapshot.in_progress {
        let message = snapshot.message().unwrap_or(SCANNING_PLACEHOLDER).to_string();
        return (MonitorState::Polling, MonitorEvent::Progress(message));
    }
    match (snapshot.report_id(), snapshot.message()) {
        (Some(report_id), message) => (
            MonitorState::Completed,
            MonitorEvent::Completed {
                report_id: report_id.to_string(),
                message: message.map(String::from),
            },
        ),
        (None, Some(message)) => (MonitorState::Failed, MonitorEvent::Failed(message.to_string())),
        (None, None) => (MonitorState::Idle, MonitorEvent::Stopped),
    }
}

pub struct StatusMonitor {
    api: ApiClient,
    session: Arc<Session>,
    handle: MonitorHandle,
    settings: MonitorSettings,
}

impl StatusMonitor {
    pub fn new(
        api: ApiClient,
        session: Arc<Session>,
        handle: MonitorHandle,
        settings: MonitorSettings,
    ) -> Self {
        Self { api, session, handle, settings }
    }

    /// Spawns the polling loop. The task resolves to the state it ended in.
    pub fn spawn<T>(self, tx: mpsc::Sender<T>) -> JoinHandle<MonitorState>
    where
        T: From<MonitorUpdate> + Send + 'static,
    {
        tokio::spawn(self.run(tx))
    }

    pub async fn run<T>(self, tx: mpsc::Sender<T>) -> MonitorState
    where
        T: From<MonitorUpdate> + Send + 'static,
    {
        let monitor_id = self.handle.id();
        let token = self.handle.token().clone();
        info!(monitor_id, period_ms = self.settings.period.as_millis() as u64, "Status monitor started.");

        // The first tick fires immediately, which gives the initial check.
        let mut ticker = tokio::time::interval(self.settings.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut failures: u32 = 0;
        let mut degraded = false;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if !self.session.is_api_online() {
                debug!(monitor_id, "Service marked offline, skipping tick.");
                continue;
            }

            // A poll never outlives its period.
            let result = tokio::select! {
                _ = token.cancelled() => break,
                result = tokio::time::timeout(self.settings.period, self.api.status()) => result,
            };

            let failure = match result {
                Ok(Ok(snapshot)) => Ok(snapshot),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("no response within {:?}", self.settings.period)),
            };
            let snapshot = match failure {
                Ok(snapshot) => snapshot,
                Err(reason) => {
                    failures = failures.saturating_add(1);
                    warn!(monitor_id, failures, error = %reason, "Status poll failed, will retry on next tick.");
                    if !degraded && failures >= self.settings.degraded_after {
                        degraded = true;
                        emit(&tx, &token, monitor_id, MonitorEvent::Degraded { failures }).await;
                    }
                    continue;
                }
            };

            failures = 0;
            if degraded {
                degraded = false;
                emit(&tx, &token, monitor_id, MonitorEvent::Recovered).await;
            }

            let (state, event) = classify(&snapshot);
            if state == MonitorState::Polling {
                emit(&tx, &token, monitor_id, event).await;
                continue;
            }

            if token.is_cancelled() {
                break;
            }
            self.session.finish_monitor(monitor_id);
            info!(monitor_id, ?state, "Status monitor reached a final state.");
            // The handle is cancelled by `finish_monitor`, so send directly.
            if tx.send(T::from(MonitorUpdate { monitor_id, event })).await.is_err() {
                warn!(monitor_id, ?state, "Event receiver dropped before the final state was delivered.");
            }
            return state;
        }

        info!(monitor_id, "Status monitor cancelled.");
        MonitorState::Idle
    }
}

async fn emit<T>(tx: &mpsc::Sender<T>, token: &tokio_util::sync::CancellationToken, monitor_id: u64, event: MonitorEvent)
where
    T: From<MonitorUpdate>,
{
    if token.is_cancelled() {
        return;
    }
    if tx.send(T::from(MonitorUpdate { monitor_id, event })).await.is_err() {
        debug!(monitor_id, "Event receiver dropped.");
    }
}
