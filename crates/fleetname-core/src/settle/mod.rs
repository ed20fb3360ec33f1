//! Sources of the settle delay waited between writing a candidate and verifying it.
//!
//! The delay desynchronizes instances that wrote at the same moment. It is injected
//! through [`crate::EngineContext`] so tests can collapse or script it.
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rand::{Rng, SeedableRng, rngs::StdRng};

use fleetname_model::SettleWindow;

/// Picks how long to wait before verifying a written candidate.
pub trait SettleDelay: Send + Sync {
    fn pick(&self, window: &SettleWindow) -> Duration;
}

/// Shared handle to a settle delay source.
pub type SettleHandle = Arc<dyn SettleDelay>;

/// Uniformly random delay within the window, bounds inclusive, millisecond resolution.
#[derive(Debug, Default)]
pub struct RandomSettle {
    seeded: Option<Mutex<StdRng>>,
}

impl RandomSettle {
    /// Draw from the thread-local generator.
    pub fn new() -> Self {
        Self { seeded: None }
    }

    /// Draw from a deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl SettleDelay for RandomSettle {
    fn pick(&self, window: &SettleWindow) -> Duration {
        if window.min_ms >= window.max_ms {
            return window.min();
        }
        let range = window.min_ms..=window.max_ms;
        let ms = match &self.seeded {
            Some(rng) => match rng.lock() {
                Ok(mut g) => g.gen_range(range),
                Err(poisoned) => poisoned.into_inner().gen_range(range),
            },
            None => rand::thread_rng().gen_range(range),
        };
        Duration::from_millis(ms)
    }
}

/// Always the same delay, ignoring the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSettle(pub Duration);

impl SettleDelay for FixedSettle {
    fn pick(&self, _: &SettleWindow) -> Duration {
        self.0
    }
}

/// Default settle source: random within the window.
#[inline]
pub fn random_settle() -> SettleHandle {
    Arc::new(RandomSettle::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_stays_within_inclusive_bounds() {
        let window = SettleWindow::new(1_000, 1_003).unwrap();
        let settle = RandomSettle::new();

        for _ in 0..500 {
            let d = settle.pick(&window);
            assert!(d >= window.min() && d <= window.max(), "{d:?} out of {window}");
        }
    }

    #[test]
    fn seeded_is_reproducible() {
        let window = SettleWindow::default();
        let a = RandomSettle::seeded(7);
        let b = RandomSettle::seeded(7);

        let xs: Vec<_> = (0..16).map(|_| a.pick(&window)).collect();
        let ys: Vec<_> = (0..16).map(|_| b.pick(&window)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn degenerate_window_returns_min() {
        let settle = RandomSettle::new();
        assert_eq!(settle.pick(&SettleWindow::immediate()), Duration::ZERO);
    }

    #[test]
    fn fixed_ignores_window() {
        let settle = FixedSettle(Duration::from_millis(42));
        assert_eq!(
            settle.pick(&SettleWindow::default()),
            Duration::from_millis(42)
        );
    }
}
