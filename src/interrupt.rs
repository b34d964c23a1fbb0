//! @ai:module:intent SIGINT latch polled between subprocess invocations
//! @ai:module:layer infrastructure
//! @ai:module:public_api InterruptFlag

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// @ai:intent Shared flag set by the Ctrl-C hook and polled by the stage loops
///
/// The harness never kills an in-flight child: the hook only latches
/// the flag, the current subprocess runs to completion (or dies with
/// the rest of the foreground process group), and the loops convert
/// the latched flag into an early return that reaches teardown through
/// the run guard.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    /// @ai:intent Create an unset flag
    /// @ai:effects pure
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// @ai:intent Latch the flag
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// @ai:intent Whether an interrupt has been requested
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// @ai:intent Install the process-wide Ctrl-C hook; call once at startup
    /// @ai:effects io
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();

        ctrlc::set_handler(move || {
            flag.set();
        })
    }
}
