//! Per-operation status and banners.
//!
//! ```text
//! Idle ──begin──▶ Pending ──succeed──▶ Succeeded ──(3s)──▶ Idle
//!                    │
//!                    └────fail────▶ Failed ──dismiss / begin──▶ ...
//! ```
//!
//! Time is passed in explicitly so callers drive expiry from their own
//! clock and tests stay deterministic.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// How long a transient banner stays visible.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(3);

/// Whether a failure banner clears itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissPolicy {
    /// Cleared after [`BANNER_TIMEOUT`].
    Transient,
    /// Stays until dismissed or the operation is retried.
    Sticky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// A message shown above the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    shown_at: Instant,
    policy: DismissPolicy,
}

impl Banner {
    fn expired(&self, now: Instant) -> bool {
        self.policy == DismissPolicy::Transient
            && now.saturating_duration_since(self.shown_at) >= BANNER_TIMEOUT
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    Pending,
    Succeeded(Banner),
    Failed(Banner),
}

/// Lifecycle of one user-triggered operation (Run, Save, Load).
#[derive(Debug, Clone)]
pub struct OperationStatus {
    state: OperationState,
    failure_policy: DismissPolicy,
}

impl OperationStatus {
    /// Status whose failures use `failure_policy`.
    pub fn new(failure_policy: DismissPolicy) -> Self {
        Self {
            state: OperationState::Idle,
            failure_policy,
        }
    }

    pub fn state(&self) -> &OperationState {
        &self.state
    }

    /// Whether actions should be disabled.
    pub fn is_busy(&self) -> bool {
        self.state == OperationState::Pending
    }

    /// Enter Pending. Refused while already pending; allowed from Failed so
    /// that a retry replaces the error banner.
    pub fn begin(&mut self) -> Result<()> {
        if self.is_busy() {
            return Err(Error::InvalidOperation(
                "operation already in progress".to_string(),
            ));
        }
        self.state = OperationState::Pending;
        Ok(())
    }

    pub fn succeed(&mut self, message: impl Into<String>, now: Instant) {
        self.state = OperationState::Succeeded(Banner {
            kind: BannerKind::Success,
            message: message.into(),
            shown_at: now,
            policy: DismissPolicy::Transient,
        });
    }

    pub fn fail(&mut self, message: impl Into<String>, now: Instant) {
        self.state = OperationState::Failed(Banner {
            kind: BannerKind::Error,
            message: message.into(),
            shown_at: now,
            policy: self.failure_policy,
        });
    }

    /// Return to Idle from a settled state.
    pub fn dismiss(&mut self) {
        if !self.is_busy() {
            self.state = OperationState::Idle;
        }
    }

    /// Clear expired transient banners.
    pub fn tick(&mut self, now: Instant) {
        let expired = match &self.state {
            OperationState::Succeeded(banner) | OperationState::Failed(banner) => {
                banner.expired(now)
            }
            _ => false,
        };
        if expired {
            self.state = OperationState::Idle;
        }
    }

    /// Banner visible at `now`, if any.
    pub fn banner(&self, now: Instant) -> Option<&Banner> {
        match &self.state {
            OperationState::Succeeded(banner) | OperationState::Failed(banner)
                if !banner.expired(now) =>
            {
                Some(banner)
            }
            _ => None,
        }
    }
}
