//! Error types for the Q-learning crate

use thiserror::Error;

use crate::env::EnvError;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("corrupt value table data: {reason}")]
    CorruptData { reason: String },

    #[error("state ({position}, {velocity}) is not part of the discretization grid")]
    UnknownState { position: f64, velocity: f64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("action {action} is out of range (action set has {num_actions} actions)")]
    InvalidAction { action: usize, num_actions: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("environment error: {0}")]
    Env(#[from] EnvError),
}

impl Error {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Error::CorruptData {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
