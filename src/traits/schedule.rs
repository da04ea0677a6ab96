use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};

use crate::{algorithms::particles::SwarmStatus, Float};

/// A parameter of the update rule expressed as a function of the run's state.
///
/// Schedules are resolved once per iteration, before any particle moves, so every particle in an
/// iteration sees the same value. A plain [`Float`] is a constant schedule.
pub trait Schedule: DynClone {
    /// The value of the parameter given the current state of the run.
    fn value(&self, status: &SwarmStatus) -> Float;
}
dyn_clone::clone_trait_object!(Schedule);

impl Schedule for Float {
    fn value(&self, _status: &SwarmStatus) -> Float {
        *self
    }
}

/// A [`Schedule`] which moves linearly from `start` to `end` as the evaluation budget is spent.
///
/// This is the classic decreasing inertia weight, e.g. `LinearSchedule::new(0.9, 0.4)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LinearSchedule {
    /// the value when no evaluations have been spent
    pub start: Float,
    /// the value once the whole budget has been spent
    pub end: Float,
}
impl LinearSchedule {
    /// Create a new [`LinearSchedule`].
    pub const fn new(start: Float, end: Float) -> Self {
        Self { start, end }
    }
}
impl Schedule for LinearSchedule {
    fn value(&self, status: &SwarmStatus) -> Float {
        let progress = if status.max_evals == 0 {
            1.0
        } else {
            (status.n_f_evals as Float / status.max_evals as Float).min(1.0)
        };
        (self.end - self.start).mul_add(progress, self.start)
    }
}

/// A [`Schedule`] backed by a closure.
#[derive(Clone)]
pub struct ScheduleFn<F>(pub F);
impl<F> Schedule for ScheduleFn<F>
where
    F: Fn(&SwarmStatus) -> Float + Clone,
{
    fn value(&self, status: &SwarmStatus) -> Float {
        (self.0)(status)
    }
}

/// Decides which particles are moved in an iteration.
///
/// The decision for every particle is taken after the statistics and neighbor-propagation passes
/// and before the first particle moves. Particles which are not moved keep their position,
/// velocity, and fitness, and cost no evaluation.
pub trait UpdateStrategy: DynClone {
    /// Returns `true` if the particle at `index` should be moved in this iteration.
    fn should_update(&mut self, index: usize, status: &SwarmStatus) -> bool;
}
dyn_clone::clone_trait_object!(UpdateStrategy);

/// The default [`UpdateStrategy`]: every particle moves in every iteration.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysUpdate;
impl UpdateStrategy for AlwaysUpdate {
    fn should_update(&mut self, _index: usize, _status: &SwarmStatus) -> bool {
        true
    }
}

/// An [`UpdateStrategy`] backed by a closure.
#[derive(Clone)]
pub struct UpdateFn<F>(pub F);
impl<F> UpdateStrategy for UpdateFn<F>
where
    F: FnMut(usize, &SwarmStatus) -> bool + Clone,
{
    fn should_update(&mut self, index: usize, status: &SwarmStatus) -> bool {
        (self.0)(index, status)
    }
}
