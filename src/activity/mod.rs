//! Detection of user inactivity. Ticks are skipped while the user is away from the machine.
//! [GenericIdleDetector] picks the platform implementation.

#[cfg(feature = "win")]
pub mod win;

#[cfg(feature = "win")]
extern crate windows;

use std::time::Duration;

use anyhow::Result;

#[cfg_attr(test, mockall::automock)]
pub trait IdleDetector {
    /// Time since the last keyboard or mouse input.
    fn idle_time(&mut self) -> Result<Duration>;
}

/// Used where there is no way to ask the system about input. The user is always active.
#[derive(Debug, Default)]
pub struct NeverIdle;

impl IdleDetector for NeverIdle {
    fn idle_time(&mut self) -> Result<Duration> {
        Ok(Duration::ZERO)
    }
}

/// Serves as a cross-compatible IdleDetector implementation.
pub struct GenericIdleDetector {
    inner: Box<dyn IdleDetector>,
}

impl GenericIdleDetector {
    pub fn new() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "win")] {
                use win::WindowsIdleDetector;
                Self {
                    inner: Box::new(WindowsIdleDetector::new()),
                }
            } else {
                Self {
                    inner: Box::new(NeverIdle),
                }
            }
        }
    }
}

impl Default for GenericIdleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleDetector for GenericIdleDetector {
    fn idle_time(&mut self) -> Result<Duration> {
        self.inner.idle_time()
    }
}
