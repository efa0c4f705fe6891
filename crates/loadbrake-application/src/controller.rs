//! Circuit Controller
//!
//! Two-state machine deciding each cycle whether the detection engine runs:
//!
//! | From | To | Condition | Action |
//! |------|----|-----------|--------|
//! | `RUNNING` | `STOPPED` | `usage > threshold` | `engine.stop()` |
//! | `STOPPED` | `RUNNING` | `usage < resume threshold` | `engine.start()` |
//!
//! The resume threshold defaults to the fetched threshold, so by default
//! there is no dead band. A configured resume threshold never exceeds the
//! fetched one, so the two edges cannot overlap. A transition is committed
//! only after the engine action succeeds; a failed or panicking action leaves
//! the state untouched and the same transition is attempted again next cycle.

use crate::isolation::catch_panic;
use loadbrake_domain::ports::EngineControl;
use loadbrake_domain::{ControllerState, Threshold};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{error, info};

/// What the controller intends to do for one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No transition
    Hold,
    /// `RUNNING → STOPPED`
    Stop,
    /// `STOPPED → RUNNING`
    Start,
}

/// Decide the transition for `usage` in `state`
///
/// `resume_threshold` replaces `threshold` for the `STOPPED → RUNNING` edge
/// when set, capped at `threshold`.
pub fn decide(
    state: ControllerState,
    usage: u8,
    threshold: Threshold,
    resume_threshold: Option<Threshold>,
) -> Decision {
    match state {
        ControllerState::Running if usage > threshold.value() => Decision::Stop,
        ControllerState::Stopped if usage < resume_limit(threshold, resume_threshold).value() => {
            Decision::Start
        }
        _ => Decision::Hold,
    }
}

/// Effective threshold of the `STOPPED → RUNNING` edge
pub fn resume_limit(threshold: Threshold, resume_threshold: Option<Threshold>) -> Threshold {
    resume_threshold.map_or(threshold, |resume| resume.min(threshold))
}

/// Result of one controller evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// No transition was due
    Unchanged(ControllerState),
    /// The engine action succeeded and the new state was committed
    Transitioned {
        /// Previous state
        from: ControllerState,
        /// New state
        to: ControllerState,
    },
    /// The engine action failed; the state stays at `from`
    ActionFailed {
        /// Unchanged state
        from: ControllerState,
        /// State the action tried to reach
        target: ControllerState,
    },
}

/// Hysteretic start/stop controller for the detection engine
pub struct CircuitController {
    engine: Arc<dyn EngineControl>,
    state: AtomicU8,
    resume_threshold: Option<Threshold>,
}

impl CircuitController {
    /// Controller in the initial `RUNNING` state
    pub fn new(engine: Arc<dyn EngineControl>) -> Self {
        Self {
            engine,
            state: AtomicU8::new(ControllerState::Running.as_u8()),
            resume_threshold: None,
        }
    }

    /// Use a separate threshold for the `STOPPED → RUNNING` edge
    pub fn with_resume_threshold(mut self, resume_threshold: Option<Threshold>) -> Self {
        self.resume_threshold = resume_threshold;
        self
    }

    /// Current controller state
    pub fn state(&self) -> ControllerState {
        // Only valid discriminants are ever stored.
        ControllerState::try_from(self.state.load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Evaluate one reading and drive the engine on a state change
    pub async fn evaluate(&self, usage: u8, threshold: Threshold) -> Evaluation {
        let from = self.state();
        let target = match decide(from, usage, threshold, self.resume_threshold) {
            Decision::Hold => return Evaluation::Unchanged(from),
            Decision::Stop => ControllerState::Stopped,
            Decision::Start => ControllerState::Running,
        };

        if let Err(e) = self.drive(target).await {
            error!(
                usage = usage,
                threshold = threshold.value(),
                from = %from,
                to = %target,
                error = %e,
                "Engine control action failed, state unchanged"
            );
            return Evaluation::ActionFailed { from, target };
        }

        self.state.store(target.as_u8(), Ordering::Release);
        self.engine.set_running_status(target);

        match target {
            ControllerState::Stopped => info!(
                usage = usage,
                threshold = threshold.value(),
                "CPU usage is above the threshold, detection engine stopped"
            ),
            ControllerState::Running => info!(
                usage = usage,
                threshold = resume_limit(threshold, self.resume_threshold).value(),
                "CPU usage is below the threshold, detection engine started"
            ),
        }
        Evaluation::Transitioned { from, to: target }
    }

    /// Start the engine if the controller holds it stopped, regardless of load
    ///
    /// Used on shutdown. Follows the same commit rule as [`Self::evaluate`].
    pub async fn release(&self) -> Evaluation {
        let from = self.state();
        if from == ControllerState::Running {
            return Evaluation::Unchanged(from);
        }

        if let Err(e) = self.drive(ControllerState::Running).await {
            error!(error = %e, "Failed to resume detection engine on release");
            return Evaluation::ActionFailed {
                from,
                target: ControllerState::Running,
            };
        }

        self.state.store(ControllerState::Running.as_u8(), Ordering::Release);
        self.engine.set_running_status(ControllerState::Running);
        info!("Detection engine resumed on release");
        Evaluation::Transitioned {
            from,
            to: ControllerState::Running,
        }
    }

    /// Run the engine action reaching `target`, with panics reported as errors
    async fn drive(&self, target: ControllerState) -> Result<(), String> {
        let action = match target {
            ControllerState::Stopped => self.engine.stop(),
            ControllerState::Running => self.engine.start(),
        };
        match catch_panic(action).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(panic) => Err(format!("engine control panicked: {panic}")),
        }
    }
}
