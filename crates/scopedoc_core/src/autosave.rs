//! Edit-mode-gated autosave timer and navigation guard.
//!
//! # Responsibility
//! - Track the Idle/Active autosave state mirrored from edit mode.
//! - Decide when a periodic save is due.
//! - Decide whether leaving the page must be confirmed.
//!
//! # Invariants
//! - A save is only ever reported due while Active.
//! - Leaving Active cancels the pending deadline; re-entering starts a fresh
//!   full interval.
//! - The scheduler never performs I/O; the editor runs the save pipeline.

use log::debug;

/// Default periodic autosave interval.
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 30_000;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Active { next_due_ms: i64 },
}

/// Answer to a navigation-away request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    /// Edit mode is active; the host must ask before leaving.
    Confirm,
}

/// Periodic autosave trigger.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    interval_ms: i64,
    state: SchedulerState,
}

impl AutosaveScheduler {
    /// Creates an idle scheduler. A zero interval is raised to 1 ms.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: i64::try_from(interval_ms.max(1)).unwrap_or(i64::MAX),
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SchedulerState::Active { .. })
    }

    /// Idle -> Active; (re)starts the timer from `now_ms`.
    pub fn activate(&mut self, now_ms: i64) {
        let next_due_ms = now_ms.saturating_add(self.interval_ms);
        self.state = SchedulerState::Active { next_due_ms };
        debug!("event=autosave_timer module=autosave status=started next_due_ms={next_due_ms}");
    }

    /// Active -> Idle; cancels the timer.
    pub fn deactivate(&mut self) {
        if self.is_active() {
            debug!("event=autosave_timer module=autosave status=cancelled");
        }
        self.state = SchedulerState::Idle;
    }

    /// Returns `true` when a periodic save is due at `now_ms`, and arms the
    /// next deadline. Missed intervals collapse into a single save.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        match self.state {
            SchedulerState::Active { next_due_ms } if now_ms >= next_due_ms => {
                self.state = SchedulerState::Active {
                    next_due_ms: now_ms.saturating_add(self.interval_ms),
                };
                true
            }
            _ => false,
        }
    }

    pub fn navigation_guard(&self) -> NavigationDecision {
        if self.is_active() {
            NavigationDecision::Confirm
        } else {
            NavigationDecision::Allow
        }
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL_MS)
    }
}
