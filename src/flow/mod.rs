//! Request lifecycle shared by every flow
//!
//! `Idle -> Pending -> {Success, Failed} -> Idle`. There are no automatic
//! retries; each user action starts again from `Idle`.

use serde::Serialize;
use std::fmt;

/// Where a flow is in its request lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

impl FlowState {
    /// `Idle -> Pending`
    pub fn begin(&mut self) -> bool {
        self.transition(Self::Idle, Self::Pending)
    }

    /// `Pending -> Success`
    pub fn succeed(&mut self) -> bool {
        self.transition(Self::Pending, Self::Success)
    }

    /// `Pending -> Failed`
    pub fn fail(&mut self) -> bool {
        self.transition(Self::Pending, Self::Failed)
    }

    /// `{Success, Failed} -> Idle`
    pub fn settle(&mut self) -> bool {
        match self {
            Self::Success | Self::Failed => {
                *self = Self::Idle;
                true
            }
            _ => false,
        }
    }

    /// Abandon whatever is in progress. Used when a newer action supersedes it.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_pending(&self) -> bool {
        *self == Self::Pending
    }

    fn transition(&mut self, from: Self, to: Self) -> bool {
        if *self == from {
            *self = to;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
