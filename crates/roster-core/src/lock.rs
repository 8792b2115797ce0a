use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One mutex per flight number.
///
/// Serializes the read-modify-write sequences of a single flight (rebuild,
/// pilot update, seat assignment) while leaving other flights free to run.
/// An entry lives only while some caller holds or waits on it.
#[derive(Debug, Default)]
pub struct FlightLocks {
    flights: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FlightLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex for `flight`, created on first use.
    fn handle(&self, flight: &str) -> Arc<Mutex<()>> {
        let mut map = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(flight.to_string()).or_default())
    }

    /// Run `f` while holding the lock for `flight`. Poisoned locks are recovered.
    pub fn with<T>(&self, flight: &str, f: impl FnOnce() -> T) -> T {
        let handle = self.handle(flight);
        let out = {
            let _guard: MutexGuard<'_, ()> =
                handle.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        self.release(flight, &handle);
        out
    }

    fn release(&self, flight: &str, handle: &Arc<Mutex<()>>) {
        let mut map = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        // held by the map and by `handle` only: nobody else is waiting
        if Arc::strong_count(handle) == 2 {
            map.remove(flight);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.flights.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
