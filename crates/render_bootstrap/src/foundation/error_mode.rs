//! Process-wide critical error reporting mode
//!
//! Probing optional renderer modules can make the host surface "module
//! missing" errors of its own. [`ErrorModeScope`] suppresses that for the
//! duration of a probing window and restores it on every exit path.

/// Switch for the host's own critical error reporting
pub trait ErrorMode {
    /// Suppress (`true`) or restore (`false`) critical error reporting
    fn set_suppress_critical_errors(&mut self, suppress: bool);
}

/// Default error mode
///
/// No OS dialog layer is linked, so this only tracks the state.
#[derive(Debug, Default)]
pub struct ProcessErrorMode {
    suppressed: bool,
}

impl ProcessErrorMode {
    /// Create with reporting enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether reporting is currently suppressed
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}

impl ErrorMode for ProcessErrorMode {
    fn set_suppress_critical_errors(&mut self, suppress: bool) {
        if self.suppressed != suppress {
            log::trace!("Critical error reporting suppressed: {}", suppress);
        }
        self.suppressed = suppress;
    }
}

/// Suppresses critical error reporting until dropped
pub struct ErrorModeScope<'a> {
    mode: &'a mut dyn ErrorMode,
}

impl<'a> ErrorModeScope<'a> {
    /// Enter the suppression window
    pub fn suppress(mode: &'a mut dyn ErrorMode) -> Self {
        mode.set_suppress_critical_errors(true);
        Self { mode }
    }
}

impl Drop for ErrorModeScope<'_> {
    fn drop(&mut self) {
        self.mode.set_suppress_critical_errors(false);
    }
}
