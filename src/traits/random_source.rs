use fastrand::Rng;
use fastrand_contrib::RngExt;

use crate::Float;

/// A source of uniformly distributed floating-point values.
///
/// The optimizer owns its random source for the whole run, so two runs with the same
/// configuration and the same sequence of draws produce identical trajectories.
pub trait RandomSource {
    /// Get a random value in the range `[0, 1)`.
    fn float(&mut self) -> Float;
    /// Get a random value in the range `[lower, upper)`.
    ///
    /// A degenerate range (`upper <= lower`) always yields `lower`.
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        if upper <= lower {
            return lower;
        }
        lower + (upper - lower) * self.float()
    }
}

impl RandomSource for Rng {
    #[cfg(not(feature = "f32"))]
    fn float(&mut self) -> Float {
        self.f64()
    }
    #[cfg(feature = "f32")]
    fn float(&mut self) -> Float {
        self.f32()
    }
    #[cfg(not(feature = "f32"))]
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        if upper <= lower {
            return lower;
        }
        self.f64_range(lower..upper)
    }
    #[cfg(feature = "f32")]
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        if upper <= lower {
            return lower;
        }
        self.f32_range(lower..upper)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn float(&mut self) -> Float {
        (**self).float()
    }
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        (**self).range(lower, upper)
    }
}
