use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{Result, SolverErr};

/// A shared flag asking long running work to stop at the next batch boundary.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every holder of this flag to stop.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// # Returns
    /// `SolverErr::Interrupted` once the flag has been triggered.
    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            return Err(SolverErr::Interrupted);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let interrupt = Interrupt::new();
        let handle = interrupt.clone();
        assert!(interrupt.check().is_ok());

        handle.trigger();

        assert!(interrupt.is_triggered());
        assert!(matches!(interrupt.check(), Err(SolverErr::Interrupted)));
    }
}
