use serde::{Deserialize, Serialize};

use crate::{traits::RandomSource, Float};

/// A [`RandomSource`] which replays a recorded sequence of uniform draws.
///
/// Every call to [`RandomSource::float`] consumes the next recorded value, wrapping around to the
/// start once the sequence is exhausted. Range draws are mapped linearly from the recorded value,
/// so a draw of `0.5` in `[-1, 1)` is exactly `0.0`. This makes it possible to pin down the exact
/// trajectory of a swarm.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplaySource {
    draws: Vec<Float>,
    cursor: usize,
}
impl ReplaySource {
    /// Create a new [`ReplaySource`] from a non-empty sequence of values in `[0, 1)`.
    ///
    /// # Panics
    ///
    /// This method will panic if `draws` is empty or contains a value outside of `[0, 1)`.
    pub fn new<I: IntoIterator<Item = Float>>(draws: I) -> Self {
        let draws: Vec<Float> = draws.into_iter().collect();
        assert!(!draws.is_empty(), "a replay needs at least one draw");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "replayed draws must lie in [0, 1)"
        );
        Self { draws, cursor: 0 }
    }
    /// A replay which always yields the same value.
    pub fn constant(value: Float) -> Self {
        Self::new([value])
    }
    /// The total number of draws consumed so far.
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}
impl RandomSource for ReplaySource {
    fn float(&mut self) -> Float {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}
