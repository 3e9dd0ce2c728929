//! Run-level scope shared by every phase of one allocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Timing, cancellation and seeding state for a single allocation run.
///
/// The terminate flag is shared with the worker tasks of the parallel
/// phases; setting it makes them stop between placements.
#[derive(Debug, Clone)]
pub struct RunScope {
    start_time: Instant,
    time_limit: Duration,
    seed: u64,
    terminate_flag: Arc<AtomicBool>,
}

impl RunScope {
    pub fn new(time_limit: Duration, seed: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            seed,
            terminate_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Time left before the limit, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.time_limit.saturating_sub(self.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.time_limit
    }

    /// Requests every worker of this run to stop.
    pub fn terminate(&self) {
        self.terminate_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_terminated(&self) -> bool {
        self.terminate_flag.load(Ordering::SeqCst)
    }

    /// True once the run was terminated or its time limit passed.
    pub fn should_terminate(&self) -> bool {
        self.is_terminated() || self.is_expired()
    }

    /// Independent RNG stream for one phase, derived from the run seed.
    pub fn phase_rng(&self, phase_index: usize) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(phase_index as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_fresh_scope_is_running() {
        let scope = RunScope::new(Duration::from_secs(30), 1);
        assert!(!scope.should_terminate());
        assert!(scope.remaining() <= Duration::from_secs(30));
    }

    #[test]
    fn test_zero_limit_expires_immediately() {
        let scope = RunScope::new(Duration::ZERO, 1);
        assert!(scope.is_expired());
        assert!(scope.should_terminate());
        assert_eq!(scope.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_terminate_is_shared_between_clones() {
        let scope = RunScope::new(Duration::from_secs(30), 1);
        let worker_view = scope.clone();
        scope.terminate();
        assert!(worker_view.is_terminated());
        assert!(worker_view.should_terminate());
    }

    #[test]
    fn test_phase_rng_streams() {
        let scope = RunScope::new(Duration::from_secs(30), 42);
        assert_eq!(scope.seed(), 42);
        let a: u64 = scope.phase_rng(3).random();
        let b: u64 = scope.phase_rng(3).random();
        let c: u64 = scope.phase_rng(4).random();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
