use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    algorithms::particles::{SwarmParticle, SwarmStatus},
    core::Point,
    traits::SwarmObserver,
};

/// A set of [`SwarmObserver`]s which can be used as an input to
/// [`PSO::process`](crate::algorithms::particles::PSO::process).
///
/// Observers are notified in the order in which they were added.
pub struct Observers<U>(Vec<Box<dyn SwarmObserver<U>>>);

impl<U> Default for Observers<U> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<U> Observers<U> {
    /// Create an empty set of observers.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }
    /// Return the set of [`Observers`] with an additional [`SwarmObserver`] added.
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: SwarmObserver<U> + 'static,
    {
        self.0.push(Box::new(observer));
        self
    }
    /// The number of observers in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Returns `true` if the set has no observers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<U> SwarmObserver<U> for Observers<U> {
    fn on_population_updated(&mut self, status: &SwarmStatus, user_data: &U) {
        for observer in &mut self.0 {
            observer.on_population_updated(status, user_data);
        }
    }
    fn on_iteration(&mut self, status: &SwarmStatus, user_data: &U) {
        for observer in &mut self.0 {
            observer.on_iteration(status, user_data);
        }
    }
}

/// A debugging observer which emits a `tracing` event with the population statistics and the
/// state of every particle at each iteration.
///
/// # Usage:
///
/// ```rust
/// use fastrand::Rng;
/// use openpso::prelude::*;
/// use openpso::test_functions::Sphere;
///
/// let config = PSOConfig::new(2).with_topology(Global::new(5)).with_max_evals(50);
/// let mut pso = PSO::new(config, Rng::with_seed(1));
/// let summary = pso
///     .process(&Sphere, &mut (), Observers::empty().with_observer(DebugObserver))
///     .unwrap();
/// // ^ With a subscriber at the DEBUG level, this logs every iteration
/// assert_eq!(summary.cost_evals, 50);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DebugObserver;
impl<U> SwarmObserver<U> for DebugObserver {
    fn on_population_updated(&mut self, status: &SwarmStatus, _user_data: &U) {
        debug!(
            iteration = status.iteration + 1,
            best_particle = status.stats.best.0,
            best_fx = status.stats.best.1,
            worst_particle = status.stats.worst.0,
            worst_fx = status.stats.worst.1,
            mean_fx = status.stats.mean_fx,
            "population updated"
        );
    }
    fn on_iteration(&mut self, status: &SwarmStatus, _user_data: &U) {
        debug!(
            iteration = status.iteration,
            n_f_evals = status.n_f_evals,
            best = %status.best.point,
            particles = ?status.swarm.particles,
            "iteration complete"
        );
    }
}

/// A [`SwarmObserver`] which stores the swarm particles' history as well as the
/// history of best-so-far positions, once per completed iteration.
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct TrackingSwarmObserver {
    /// The history of the swarm particles
    pub history: Vec<Vec<SwarmParticle>>,
    /// The history of the best position in the swarm
    pub best_history: Vec<Point>,
}

impl TrackingSwarmObserver {
    /// Finalize the [`TrackingSwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }
}

impl<U> SwarmObserver<U> for TrackingSwarmObserver {
    fn on_iteration(&mut self, status: &SwarmStatus, _user_data: &U) {
        self.history.push(status.swarm.particles.clone());
        self.best_history.push(status.get_best().clone());
    }
}
