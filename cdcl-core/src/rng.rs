//! A tiny seedable generator used only for branching-polarity choice.
//!
//! Ported from the teacher's own `drand`, a linear congruential generator operating on an
//! `f64` seed. VSIDS-style activity is a non-goal; this is the entire "randomness" surface
//! of the solver, and it is deterministic for a fixed seed so runs (and tests) reproduce.

/// Default seed used when a caller doesn't supply one, matching the teacher's own default.
pub const DEFAULT_SEED: f64 = 91648253.0;

#[derive(Clone, Copy, Debug)]
pub struct Rng {
    seed: f64,
}

impl Rng {
    pub fn new(seed: f64) -> Self {
        Rng { seed }
    }

    /// Returns a value in `[0, 1)` and advances the internal seed.
    pub fn next_f64(&mut self) -> f64 {
        self.seed *= 1389796.0;
        let q = (self.seed / 2147483647.0) as i64;
        self.seed -= q as f64 * 2147483647.0;
        self.seed / 2147483647.0
    }

    /// Returns a uniformly random bit, used to choose a decision literal's polarity.
    pub fn next_bool(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}

impl Default for Rng {
    fn default() -> Self {
        Rng::new(DEFAULT_SEED)
    }
}
