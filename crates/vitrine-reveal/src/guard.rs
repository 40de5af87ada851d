//! Single-Flight Guard
//!
//! Prevents re-entrant execution of a hover handler while one instance is
//! in progress. Single-threaded, so a plain flag suffices.

/// Re-entrancy guard for one interactive element
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleFlight {
    in_flight: bool,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start. Returns false while a previous run is still active.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Mark the current run finished
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight() {
        let mut guard = SingleFlight::new();
        assert!(guard.try_begin());
        assert!(!guard.try_begin());
        assert!(guard.is_in_flight());

        guard.finish();
        assert!(guard.try_begin());
    }
}
