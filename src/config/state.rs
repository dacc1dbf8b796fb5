// Application state module
// Holds the configuration and the process-wide visit counter.

use std::sync::atomic::{AtomicU64, Ordering};

use super::types::Config;

/// Shared application state, passed by `Arc` into handler construction.
///
/// The visit counter lives here instead of in a global; `AtomicU64` keeps
/// concurrent increments from losing updates.
pub struct AppState {
    pub config: Config,
    fileserver_hits: AtomicU64,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fileserver_hits: AtomicU64::new(0),
        }
    }

    /// Number of requests served through the metrics middleware so far.
    pub fn hits(&self) -> u64 {
        self.fileserver_hits.load(Ordering::Relaxed)
    }

    /// Record one served request.
    pub fn record_hit(&self) {
        self.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero the counter.
    pub fn reset_hits(&self) {
        self.fileserver_hits.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_zero() {
        let state = AppState::new(Config::default());
        assert_eq!(state.hits(), 0);
    }

    #[test]
    fn record_and_reset() {
        let state = AppState::new(Config::default());
        state.record_hit();
        state.record_hit();
        state.record_hit();
        assert_eq!(state.hits(), 3);
        state.reset_hits();
        assert_eq!(state.hits(), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        use std::sync::Arc;

        let state = Arc::new(AppState::new(Config::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        state.record_hit();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.hits(), 8000);
    }
}
