use serde::{Deserialize, Serialize};

use crate::{
    algorithms::particles::{SwarmParticle, VelocityInitializer},
    core::{PSOError, Point},
    traits::{CostFunction, RandomSource, Topology},
    Float,
};

/// The best position found by the whole swarm over all iterations so far.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BestSoFar {
    /// The best evaluated point
    pub point: Point,
    /// The index of the particle which found it
    pub particle: usize,
}

/// Population statistics for a single iteration, taken before any particle moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Index and fitness of the best particle in this iteration
    pub best: (usize, Float),
    /// Index and fitness of the worst particle in this iteration
    pub worst: (usize, Float),
    /// Mean fitness over the population
    pub mean_fx: Float,
}

/// A swarm of particles used in particle swarm optimization.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Swarm {
    /// A list of the particles in the swarm, in population order
    pub particles: Vec<SwarmParticle>,
}

impl Swarm {
    /// Create and evaluate `n_particles` particles in population order.
    ///
    /// # Errors
    ///
    /// Returns an `Err(PSOError<E>)` if any evaluation fails or is not finite.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize<R, U, E>(
        n_particles: usize,
        dimension: usize,
        init_limits: (Float, Float),
        velocity_init: &VelocityInitializer,
        rng: &mut R,
        func: &dyn CostFunction<U, E>,
        user_data: &mut U,
    ) -> Result<Self, PSOError<E>>
    where
        R: RandomSource + ?Sized,
    {
        let particles = (0..n_particles)
            .map(|index| {
                SwarmParticle::initialize(
                    index,
                    dimension,
                    init_limits,
                    velocity_init,
                    rng,
                    func,
                    user_data,
                )
            })
            .collect::<Result<Vec<SwarmParticle>, PSOError<E>>>()?;
        Ok(Self { particles })
    }
    /// The number of particles in the swarm.
    pub fn len(&self) -> usize {
        self.particles.len()
    }
    /// Returns `true` if the swarm has no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
    /// The particle whose personal best is lowest (the first one on ties).
    pub fn best_particle(&self) -> Option<&SwarmParticle> {
        self.particles.iter().reduce(|best, p| {
            if p.best.improves_on(&best.best) {
                p
            } else {
                best
            }
        })
    }
    /// Scan the population once: find the best and worst current fitness (first encountered wins
    /// ties), let every particle refresh its personal best, compute the mean fitness, and replace
    /// `best_so_far` with a copy of the iteration's best particle if that particle is strictly
    /// better.
    ///
    /// # Panics
    ///
    /// This method panics if the swarm is empty.
    pub fn update_population_data(&mut self, best_so_far: &mut BestSoFar) -> PopulationStats {
        assert!(!self.particles.is_empty(), "swarm has no particles");
        let mut best = (0, Float::INFINITY);
        let mut worst = (0, Float::NEG_INFINITY);
        let mut sum_fx = 0.0;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            if particle.fx > worst.1 {
                worst = (i, particle.fx);
            }
            if particle.fx < best.1 {
                best = (i, particle.fx);
            }
            particle.refresh_personal_best();
            sum_fx += particle.fx;
        }
        if best.1 < best_so_far.point.fx {
            *best_so_far = BestSoFar {
                point: Point::new(self.particles[best.0].position.clone(), best.1),
                particle: best.0,
            };
        }
        PopulationStats {
            best,
            worst,
            mean_fx: sum_fx / self.particles.len() as Float,
        }
    }
    /// Let every particle adopt the best personal best among its neighbors if it beats the
    /// neighbor best it already knows.
    ///
    /// Only personal bests are shared, never neighbor bests, so a personal best travels at most one
    /// topology hop per call. Returns the number of particles whose neighbor best changed.
    pub fn propagate_neighbor_bests(&mut self, topology: &dyn Topology) -> usize {
        let mut n_changed = 0;
        for p in 0..self.particles.len() {
            let mut informant = None;
            let mut nbest_fx = self.particles[p].nbest.fx;
            for &n in topology.neighbors(p) {
                let fx = self.particles[n].best.fx;
                if fx < nbest_fx {
                    nbest_fx = fx;
                    informant = Some(n);
                }
            }
            if let Some(n) = informant {
                let best = self.particles[n].best.clone();
                if self.particles[p].absorb_neighbor_best(&best) {
                    n_changed += 1;
                }
            }
        }
        n_changed
    }
}
