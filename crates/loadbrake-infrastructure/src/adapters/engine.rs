//! Detection engine control adapters

use async_trait::async_trait;
use loadbrake_domain::ControllerState;
use loadbrake_domain::error::Result;
use loadbrake_domain::ports::EngineControl;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

fn load_state(status: &AtomicU8) -> ControllerState {
    ControllerState::try_from(status.load(Ordering::Acquire)).unwrap_or_default()
}

/// Engine running in the host process, observed through a flag
///
/// The host polls [`InProcessEngine::is_running`] and pauses its own
/// detection work while it is `false`.
pub struct InProcessEngine {
    running: AtomicBool,
    status: AtomicU8,
}

impl InProcessEngine {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            status: AtomicU8::new(ControllerState::Running.as_u8()),
        }
    }

    /// Whether detection should currently run
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Default for InProcessEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineControl for InProcessEngine {
    async fn start(&self) -> Result<()> {
        self.running.store(true, Ordering::Release);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.running.store(false, Ordering::Release);
        Ok(())
    }

    fn running_status(&self) -> ControllerState {
        load_state(&self.status)
    }

    fn set_running_status(&self, state: ControllerState) {
        self.status.store(state.as_u8(), Ordering::Release);
    }
}

#[cfg(unix)]
pub use signal::ProcessSignalEngine;

#[cfg(unix)]
mod signal {
    use super::load_state;
    use async_trait::async_trait;
    use loadbrake_domain::ControllerState;
    use loadbrake_domain::error::{Error, Result};
    use loadbrake_domain::ports::EngineControl;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;
    use std::sync::atomic::{AtomicU8, Ordering};
    use tracing::debug;

    /// Engine running as a separate process, paused with `SIGSTOP`
    pub struct ProcessSignalEngine {
        pid: Pid,
        status: AtomicU8,
    }

    impl ProcessSignalEngine {
        /// Control the process `pid`
        ///
        /// Rejects pid 0 (the whole process group) and the current process.
        pub fn new(pid: u32) -> Result<Self> {
            let raw = i32::try_from(pid)
                .map_err(|_| Error::invalid_argument(format!("Engine pid {pid} out of range")))?;
            if raw == 0 {
                return Err(Error::invalid_argument("Engine pid cannot be 0"));
            }
            if pid == std::process::id() {
                return Err(Error::invalid_argument(
                    "Engine pid cannot be the monitoring process itself",
                ));
            }
            Ok(Self {
                pid: Pid::from_raw(raw),
                status: AtomicU8::new(ControllerState::Running.as_u8()),
            })
        }

        /// Controlled process id
        pub fn pid(&self) -> u32 {
            self.pid.as_raw().unsigned_abs()
        }

        fn signal(&self, signal: Signal, target: ControllerState) -> Result<()> {
            kill(self.pid, signal).map_err(|errno| {
                Error::control_action(
                    target,
                    format!("{signal} to pid {} failed: {errno}", self.pid),
                )
            })?;
            debug!(pid = self.pid.as_raw(), signal = %signal, "Engine signalled");
            Ok(())
        }
    }

    #[async_trait]
    impl EngineControl for ProcessSignalEngine {
        async fn start(&self) -> Result<()> {
            self.signal(Signal::SIGCONT, ControllerState::Running)
        }

        async fn stop(&self) -> Result<()> {
            self.signal(Signal::SIGSTOP, ControllerState::Stopped)
        }

        fn running_status(&self) -> ControllerState {
            load_state(&self.status)
        }

        fn set_running_status(&self, state: ControllerState) {
            self.status.store(state.as_u8(), Ordering::Release);
        }
    }
}
