use dyn_clone::DynClone;

use crate::core::ConfigError;

/// A neighbor graph over a fixed-size population of particles.
///
/// The topology decides which personal bests a particle may learn about. Information spreads
/// along the graph by exactly one hop per iteration, so sparse topologies trade convergence speed
/// for exploration.
pub trait Topology: DynClone {
    /// The number of particles in the population.
    fn n_particles(&self) -> usize;
    /// The indices of the neighbors of the particle at `index`.
    ///
    /// An empty slice is allowed and means the particle never learns from anyone else.
    fn neighbors(&self, index: usize) -> &[usize];
    /// Check that the topology describes a non-empty population and that every neighbor index
    /// refers to a particle in it. Particles are always visited in index order.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first inconsistency found.
    fn validate(&self) -> Result<(), ConfigError> {
        let n_particles = self.n_particles();
        if n_particles == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        for particle in 0..n_particles {
            if let Some(&neighbor) = self
                .neighbors(particle)
                .iter()
                .find(|&&neighbor| neighbor >= n_particles)
            {
                return Err(ConfigError::NeighborOutOfRange {
                    particle,
                    neighbor,
                    n_particles,
                });
            }
        }
        Ok(())
    }
}
dyn_clone::clone_trait_object!(Topology);
