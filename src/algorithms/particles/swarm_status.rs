use serde::{Deserialize, Serialize};

use crate::{
    algorithms::particles::{BestSoFar, PopulationStats, Swarm},
    core::Point,
    Float,
};

/// The lifecycle of a [`PSO`](super::PSO) run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// The swarm has not been built yet (or has just been built).
    #[default]
    Init,
    /// Iterations are being performed.
    Iterating,
    /// The run is over; no further iterations will be performed.
    Stopped,
}

/// The state of a particle swarm optimization run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SwarmStatus {
    /// The swarm
    pub swarm: Swarm,
    /// The best position found by all particles over all iterations
    pub best: BestSoFar,
    /// Statistics of the most recent population scan
    pub stats: PopulationStats,
    /// The number of objective evaluations spent moving particles
    pub n_f_evals: usize,
    /// The number of objective evaluations spent building the swarm
    pub n_init_evals: usize,
    /// The evaluation budget of the run
    pub max_evals: usize,
    /// The walls `(x_min, x_max)` of the search box used by the most recent iteration
    pub bounds: (Float, Float),
    /// The value of [`SwarmStatus::n_f_evals`] when the stop criterion was first met
    pub criteria_evals: Option<usize>,
    /// The number of completed iterations
    pub iteration: usize,
    /// Where the run is in its lifecycle
    pub state: RunState,
    /// An indicator of whether the stop criterion has been met
    pub converged: bool,
    /// A message containing information about the condition of the swarm or convergence
    pub message: String,
}

impl SwarmStatus {
    /// Get the best position found by the swarm so far.
    pub const fn get_best(&self) -> &Point {
        &self.best.point
    }
    /// Returns `true` once the run has stopped.
    pub fn is_stopped(&self) -> bool {
        self.state == RunState::Stopped
    }
    /// Resets the status to its default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
    /// Sets the message of the run.
    pub fn update_message(&mut self, message: &str) {
        self.message = message.to_string();
    }
}
