//! Signal-driven reconfiguration
//!
//! Signal handlers never touch stream state. They only record a request; the
//! requests are applied on the stream's own thread of control by
//! [`LogStream::process_signals`], which runs at the start of every emission
//! and on every iteration of an attached drain loop.

use super::stream::LogStream;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Debug toggles are counted so that two toggles between checks cancel out.
/// Reopen is idempotent and only needs a flag.
#[derive(Debug, Default)]
pub(crate) struct SignalRequests {
    toggle_debug: Arc<AtomicUsize>,
    reopen: Arc<AtomicBool>,
}

impl SignalRequests {
    fn take_toggles(&self) -> usize {
        if self.toggle_debug.load(Ordering::Relaxed) == 0 {
            return 0;
        }
        self.toggle_debug.swap(0, Ordering::AcqRel)
    }

    fn take_reopen(&self) -> bool {
        self.reopen.load(Ordering::Relaxed) && self.reopen.swap(false, Ordering::AcqRel)
    }
}

impl LogStream {
    /// Post a debug-toggle request, as the toggle signal would. An attached
    /// writer applies it right away; otherwise the next emission does.
    pub fn request_toggle_debug(&self) {
        self.signals.toggle_debug.fetch_add(1, Ordering::AcqRel);
        self.wake_writer();
    }

    /// Post a reopen request, as the reopen signal would
    pub fn request_reopen(&self) {
        self.signals.reopen.store(true, Ordering::Release);
        self.wake_writer();
    }

    /// Apply pending signal requests: each toggle request flips debug logging,
    /// and any number of reopen requests reapplies the last reopen target once.
    pub fn process_signals(&self) {
        for _ in 0..self.signals.take_toggles() {
            self.toggle_debug();
        }
        if self.signals.take_reopen() {
            self.reopen_last();
        }
    }
}

#[cfg(all(unix, feature = "signals"))]
pub use traps::{SignalTraps, REOPEN_SIGNAL, TOGGLE_DEBUG_SIGNAL};

#[cfg(all(unix, feature = "signals"))]
mod traps {
    use super::super::error::{LoggerError, Result};
    use super::super::stream::LogStream;
    use signal_hook::consts::signal::{SIGTRAP, SIGUSR2};
    use signal_hook::{flag, SigId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Toggles debug logging
    pub const TOGGLE_DEBUG_SIGNAL: i32 = SIGTRAP;

    /// Reapplies the last reopen target
    pub const REOPEN_SIGNAL: i32 = SIGUSR2;

    /// Registered signal handlers; unregistered on drop
    #[derive(Debug)]
    pub struct SignalTraps {
        ids: Vec<SigId>,
    }

    impl Drop for SignalTraps {
        fn drop(&mut self) {
            for id in self.ids.drain(..) {
                signal_hook::low_level::unregister(id);
            }
        }
    }

    fn register_counter(signal: i32, counter: Arc<AtomicUsize>) -> Result<SigId> {
        // SAFETY: the handler performs a single atomic increment, which is
        // async-signal-safe, and captures nothing else.
        unsafe {
            signal_hook::low_level::register(signal, move || {
                counter.fetch_add(1, Ordering::AcqRel);
            })
        }
        .map_err(|e| LoggerError::signal_registration(signal, e.to_string()))
    }

    impl LogStream {
        /// Trap the debug-toggle and reopen signals for this stream.
        ///
        /// Keep the returned guard alive for as long as the traps should stay
        /// installed.
        pub fn setup_signal_traps(&self) -> Result<SignalTraps> {
            let mut traps = SignalTraps { ids: Vec::with_capacity(2) };
            traps.ids.push(register_counter(
                TOGGLE_DEBUG_SIGNAL,
                Arc::clone(&self.signals.toggle_debug),
            )?);
            traps.ids.push(
                flag::register(REOPEN_SIGNAL, Arc::clone(&self.signals.reopen))
                    .map_err(|e| LoggerError::signal_registration(REOPEN_SIGNAL, e.to_string()))?,
            );
            Ok(traps)
        }
    }
}
