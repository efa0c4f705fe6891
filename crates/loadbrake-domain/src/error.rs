//! Error handling types

use crate::value_objects::{ControllerState, MetricKey};
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for loadbrake
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network-related error
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single metric collector failed
    #[error("Collector error for {key}: {message}")]
    Collector {
        /// Metric key whose collector failed
        key: MetricKey,
        /// Description of the failure
        message: String,
    },

    /// The remote threshold could not be retrieved or parsed
    #[error("Threshold fetch error: {message}")]
    ThresholdFetch {
        /// Description of the failure
        message: String,
    },

    /// The breaker extension rejected or failed to process a snapshot
    #[error("Extension '{extension}' dispatch error: {message}")]
    ExtensionDispatch {
        /// Extension name
        extension: String,
        /// Description of the failure
        message: String,
    },

    /// The engine start/stop action failed
    #[error("Control action to {target} failed: {message}")]
    ControlAction {
        /// State the failed action was trying to reach
        target: ControllerState,
        /// Description of the failure
        message: String,
    },

    /// The operation was cancelled before completion
    #[error("Operation cancelled: {operation}")]
    Cancelled {
        /// Operation that was cancelled
        operation: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }
}

// Network error creation methods
impl Error {
    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Breaker failure taxonomy
impl Error {
    /// Create a collector failure for the given metric key
    pub fn collector<S: Into<String>>(key: MetricKey, message: S) -> Self {
        Self::Collector {
            key,
            message: message.into(),
        }
    }

    /// Create a threshold fetch failure
    pub fn threshold_fetch<S: Into<String>>(message: S) -> Self {
        Self::ThresholdFetch {
            message: message.into(),
        }
    }

    /// Create an extension dispatch failure
    pub fn extension_dispatch<N: Into<String>, S: Into<String>>(extension: N, message: S) -> Self {
        Self::ExtensionDispatch {
            extension: extension.into(),
            message: message.into(),
        }
    }

    /// Create a control action failure for a transition towards `target`
    pub fn control_action<S: Into<String>>(target: ControllerState, message: S) -> Self {
        Self::ControlAction {
            target,
            message: message.into(),
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Internal {
            message: s.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Internal { message: s }
    }
}
