// src/core/session.rs

//! Process-wide client state: whether the remote service is reachable and
//! which status monitor, if any, is currently armed.
//!
//! Only the connectivity checker writes the reachability flag and only the
//! arm/stop/finish accessors touch the monitor slot.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Cancellation handle for one armed status monitor.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    id: u64,
    token: CancellationToken,
}

impl MonitorHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl PartialEq for MonitorHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MonitorHandle {}

#[derive(Debug, Default)]
pub struct Session {
    api_online: AtomicBool,
    next_monitor_id: AtomicU64,
    active_monitor: Mutex<Option<MonitorHandle>>,
    shutdown: CancellationToken,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_api_online(&self) -> bool {
        self.api_online.load(Ordering::Acquire)
    }

    /// Records the latest connectivity result and returns the previous one.
    pub fn set_api_online(&self, online: bool) -> bool {
        let previous = self.api_online.swap(online, Ordering::AcqRel);
        if previous != online {
            info!(online, "Remote service connectivity changed.");
        }
        previous
    }

    /// Arms a new monitor handle. Any monitor still armed is cancelled first,
    /// so at most one is ever active.
    pub fn arm_monitor(&self) -> MonitorHandle {
        let handle = MonitorHandle {
            id: self.next_monitor_id.fetch_add(1, Ordering::Relaxed) + 1,
            token: self.shutdown.child_token(),
        };
        let mut slot = self.slot();
        if let Some(previous) = slot.replace(handle.clone()) {
            debug!(previous = previous.id, "Cancelling previous monitor before re-arming.");
            previous.cancel();
        }
        debug!(monitor_id = handle.id, "Monitor armed.");
        handle
    }

    /// Cancels the active monitor, if any. Returns whether one was active.
    pub fn stop_monitor(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                handle.cancel();
                debug!(monitor_id = handle.id, "Monitor stopped.");
                true
            }
            None => false,
        }
    }

    /// Called by a monitor reaching a terminal state. Clears the slot only
    /// if it still holds that monitor.
    pub fn finish_monitor(&self, id: u64) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|h| h.id == id) {
            if let Some(handle) = slot.take() {
                handle.cancel();
            }
        }
    }

    pub fn has_active_scan(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_cancelled())
    }

    pub fn active_monitor_id(&self) -> Option<u64> {
        self.slot().as_ref().map(|h| h.id)
    }

    /// Token cancelled on [`Session::shutdown`]; background tasks hang off it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stops every background task tied to this session.
    pub fn shutdown(&self) {
        self.stop_monitor();
        self.shutdown.cancel();
    }

    fn slot(&self) -> MutexGuard<'_, Option<MonitorHandle>> {
        self.active_monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_offline_and_idle() {
        let session = Session::new();
        assert!(!session.is_api_online());
        assert!(!session.has_active_scan());
    }

    #[test]
    fn rearming_leaves_exactly_one_active_monitor() {
        let session = Session::new();
        let first = session.arm_monitor();
        let second = session.arm_monitor();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_ne!(first, second);
        assert_eq!(session.active_monitor_id(), Some(second.id()));
        assert!(session.has_active_scan());
    }

    #[test]
    fn stop_cancels_and_clears() {
        let session = Session::new();
        let handle = session.arm_monitor();
        assert!(session.stop_monitor());
        assert!(handle.is_cancelled());
        assert!(!session.has_active_scan());
        assert!(!session.stop_monitor());
    }

    #[test]
    fn finishing_a_stale_monitor_keeps_the_current_one() {
        let session = Session::new();
        let stale = session.arm_monitor();
        let current = session.arm_monitor();
        session.finish_monitor(stale.id());
        assert_eq!(session.active_monitor_id(), Some(current.id()));
        session.finish_monitor(current.id());
        assert_eq!(session.active_monitor_id(), None);
    }

    #[test]
    fn shutdown_cancels_armed_monitors() {
        let session = Session::new();
        let handle = session.arm_monitor();
        session.shutdown();
        assert!(handle.is_cancelled());
        assert!(session.shutdown_token().is_cancelled());
    }

    #[test]
    fn connectivity_swap_reports_previous_value() {
        let session = Session::new();
        assert!(!session.set_api_online(true));
        assert!(session.is_api_online());
        assert!(session.set_api_online(false));
    }
}
