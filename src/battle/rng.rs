use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Critical hit probability.
const CRIT_CHANCE: f64 = 1.0 / 24.0;

/// All battle randomness flows through this. Seedable so tests can pin
/// every roll.
#[derive(Debug, Clone)]
pub struct BattleRng {
    inner: StdRng,
}

impl BattleRng {
    /// An RNG seeded from OS entropy.
    pub fn new() -> Self {
        BattleRng {
            inner: StdRng::from_os_rng(),
        }
    }

    /// A deterministic RNG for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        BattleRng {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform value in [0, 1).
    pub fn unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Damage variance roll, uniform in [0.85, 1.0].
    pub fn variance(&mut self) -> f64 {
        self.inner.random_range(0.85..=1.0)
    }

    /// Critical hit roll.
    pub fn crit(&mut self) -> bool {
        self.chance(CRIT_CHANCE)
    }

    /// Sleep duration roll, 1 to 3 turns.
    pub fn sleep_turns(&mut self) -> u8 {
        self.inner.random_range(1..=3)
    }
}

impl Default for BattleRng {
    fn default() -> Self {
        Self::new()
    }
}
