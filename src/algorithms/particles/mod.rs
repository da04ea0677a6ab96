/// [`SwarmParticle`] type and the per-particle update rule.
pub mod particle;
pub use particle::{GroupBestSource, StepParameters, SwarmParticle, VelocityInitializer};

/// [`Swarm`] type and the population-wide passes of each iteration.
pub mod swarm;
pub use swarm::{BestSoFar, PopulationStats, Swarm};

/// [`SwarmStatus`] type for swarm-based optimizers.
pub mod swarm_status;
pub use swarm_status::{RunState, SwarmStatus};

/// Neighbor topologies.
pub mod topology;
pub use topology::{Global, Graph, RandomGraph, Ring};

/// Observer sets and the observers provided by this crate.
pub mod observers;
pub use observers::{DebugObserver, Observers, TrackingSwarmObserver};

/// Implementation of Particle Swarm Optimization (PSO) algorithm
pub mod pso;
pub use pso::{GroupBest, PSOConfig, PSO};
