//! Error type shared by the core.
//!
//! Only configuration and transition errors are recoverable. Mesh precondition
//! violations (bad face indices, isolated particle vertices) panic instead.

use thiserror::Error;

use crate::phase::{Phase, Trigger};

#[derive(Debug, Error)]
pub enum MorphError {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("config json parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("illegal transition: {trigger:?} while in {}", from.name())]
    IllegalTransition { from: Phase, trigger: Trigger },

    #[error("unknown label: {name}")]
    UnknownLabel { name: String },
}

impl MorphError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = MorphError> = std::result::Result<T, E>;
