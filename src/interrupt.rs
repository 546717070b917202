//! Process-wide cancellation flag raised by Ctrl-C.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, TermdoroError};

/// Shared interrupt flag. Clones observe the same signal.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    triggered: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a Ctrl-C handler that raises this flag.
    pub fn install_handler(&self) -> std::result::Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || flag.trigger())
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Returns `Err(Interrupted)` once the flag has been raised.
    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            Err(TermdoroError::Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes_until_triggered() {
        let interrupt = Interrupt::new();
        assert!(interrupt.check().is_ok());

        interrupt.trigger();
        assert!(matches!(interrupt.check(), Err(TermdoroError::Interrupted)));
    }

    #[test]
    fn test_clones_share_flag() {
        let interrupt = Interrupt::new();
        let handle = interrupt.clone();
        handle.trigger();
        assert!(interrupt.is_triggered());
    }
}
