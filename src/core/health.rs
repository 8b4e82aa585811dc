// src/core/health.rs

use crate::core::api::ApiClient;
use crate::core::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthUpdate {
    Online { reports_in_memory: Option<u64> },
    Offline(String),
}

impl HealthUpdate {
    /// Text shown in the header for this connectivity state.
    pub fn label(&self) -> String {
        match self {
            HealthUpdate::Online { reports_in_memory: Some(n) } => {
                format!("Conectado ({} reportes en memoria)", n)
            }
            HealthUpdate::Online { reports_in_memory: None } => "Conectado".to_string(),
            HealthUpdate::Offline(_) => "Desconectado".to_string(),
        }
    }
}

/// Checks `/health` once and records the outcome in the session.
pub async fn check_health(api: &ApiClient, session: &Session) -> HealthUpdate {
    match api.health().await {
        Ok(info) => {
            session.set_api_online(true);
            debug!(reports = ?info.reports_in_memory, "Health check succeeded.");
            HealthUpdate::Online { reports_in_memory: info.reports_in_memory }
        }
        Err(e) => {
            session.set_api_online(false);
            warn!(error = %e, "Health check failed.");
            HealthUpdate::Offline(e.to_string())
        }
    }
}

/// Spawns the periodic connectivity checker. It runs until the session
/// shuts down; the first check happens immediately.
pub fn spawn_health_checker<T>(
    api: ApiClient,
    session: Arc<Session>,
    interval: Duration,
    tx: mpsc::Sender<T>,
) -> JoinHandle<()>
where
    T: From<HealthUpdate> + Send + 'static,
{
    let token = session.shutdown_token();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let update = tokio::select! {
                _ = token.cancelled() => break,
                update = check_health(&api, &session) => update,
            };
            if tx.send(T::from(update)).await.is_err() {
                break;
            }
        }
        debug!("Health checker stopped.");
    })
}
