//! Controller state and throttling threshold

use crate::constants::{
    CONTROLLER_STATE_RUNNING, CONTROLLER_STATE_STOPPED, PERCENT_MAX, THRESHOLD_DEFAULT_PERCENT,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-state engine controller state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerState {
    /// Detection engine active
    #[default]
    Running,
    /// Detection engine suspended
    Stopped,
}

impl ControllerState {
    /// Numeric status mirrored to the engine (`0` running, `1` stopped)
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Running => CONTROLLER_STATE_RUNNING,
            Self::Stopped => CONTROLLER_STATE_STOPPED,
        }
    }
}

impl TryFrom<u8> for ControllerState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            CONTROLLER_STATE_RUNNING => Ok(Self::Running),
            CONTROLLER_STATE_STOPPED => Ok(Self::Stopped),
            other => Err(Error::invalid_argument(format!(
                "Invalid controller state: {other}"
            ))),
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("RUNNING"),
            Self::Stopped => f.write_str("STOPPED"),
        }
    }
}

/// CPU-usage percentage in `[0, 100]` at which the controller acts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Threshold(u8);

impl Threshold {
    /// No throttling
    pub const DEFAULT: Threshold = Threshold(THRESHOLD_DEFAULT_PERCENT);

    /// Validate and wrap a percentage
    pub fn new(percent: u8) -> Result<Self> {
        if percent > PERCENT_MAX {
            return Err(Error::invalid_argument(format!(
                "Threshold must be within 0..={PERCENT_MAX}, got {percent}"
            )));
        }
        Ok(Self(percent))
    }

    /// Percentage value
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Threshold {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for u8 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
