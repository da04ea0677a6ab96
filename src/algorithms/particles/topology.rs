use serde::{Deserialize, Serialize};

use crate::{
    traits::{RandomSource, Topology},
    Float,
};

/// The global (star) topology: every particle is a neighbor of every particle, itself included.
///
/// With this topology the neighbor best of every particle is the best personal best in the
/// swarm after a single propagation pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Global {
    everyone: Vec<usize>,
}
impl Global {
    /// Create a fully-connected topology over `n_particles` particles.
    pub fn new(n_particles: usize) -> Self {
        Self {
            everyone: (0..n_particles).collect(),
        }
    }
}
impl Topology for Global {
    fn n_particles(&self) -> usize {
        self.everyone.len()
    }
    fn neighbors(&self, _index: usize) -> &[usize] {
        &self.everyone
    }
}

/// A ring (circular lattice) topology: each particle is connected to the `radius` particles on
/// either side of it, with the two ends of the population joined.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ring {
    radius: usize,
    adjacency: Vec<Vec<usize>>,
}
impl Ring {
    /// Create a ring over `n_particles` particles where each particle sees its immediate left and
    /// right neighbors.
    pub fn new(n_particles: usize) -> Self {
        Self::with_radius(n_particles, 1)
    }
    /// Create a ring over `n_particles` particles where each particle sees `radius` particles on
    /// each side. A particle is never its own neighbor, and small populations do not list the
    /// same neighbor twice.
    pub fn with_radius(n_particles: usize, radius: usize) -> Self {
        let adjacency = (0..n_particles)
            .map(|i| {
                let mut neighbors = Vec::with_capacity(2 * radius);
                for offset in 1..=radius {
                    for j in [
                        (i + n_particles - offset % n_particles) % n_particles,
                        (i + offset) % n_particles,
                    ] {
                        if j != i && !neighbors.contains(&j) {
                            neighbors.push(j);
                        }
                    }
                }
                neighbors
            })
            .collect();
        Self { radius, adjacency }
    }
    /// The number of particles seen on each side.
    pub const fn radius(&self) -> usize {
        self.radius
    }
}
impl Topology for Ring {
    fn n_particles(&self) -> usize {
        self.adjacency.len()
    }
    fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }
}

/// An arbitrary topology given by an explicit adjacency list.
///
/// `adjacency[i]` lists the neighbors of particle `i`. Lists may be empty, and the graph does not
/// need to be symmetric.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
}
impl Graph {
    /// Create a topology from an adjacency list. Indices are checked when the run starts.
    pub fn new<I, N>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: IntoIterator<Item = usize>,
    {
        Self {
            adjacency: adjacency
                .into_iter()
                .map(|n| n.into_iter().collect())
                .collect(),
        }
    }
}
impl Topology for Graph {
    fn n_particles(&self) -> usize {
        self.adjacency.len()
    }
    fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }
}

/// A random directed topology: each particle is informed by `k` distinct other particles chosen
/// uniformly at random when the topology is built.
///
/// The graph is fixed for the lifetime of the topology; build it from a seeded
/// [`RandomSource`] to make it reproducible.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomGraph {
    k: usize,
    adjacency: Vec<Vec<usize>>,
}
impl RandomGraph {
    /// Draw a random topology over `n_particles` particles with `k` informants each (capped at
    /// `n_particles - 1`).
    pub fn new<R: RandomSource + ?Sized>(n_particles: usize, k: usize, rng: &mut R) -> Self {
        let k = k.min(n_particles.saturating_sub(1));
        let adjacency = (0..n_particles)
            .map(|i| {
                let mut others: Vec<usize> = (0..n_particles).filter(|&j| j != i).collect();
                // partial Fisher-Yates: the first k slots end up a uniform sample
                for slot in 0..k {
                    let remaining = others.len() - slot;
                    let offset = (rng.float() * remaining as Float) as usize;
                    let pick = slot + offset.min(remaining - 1);
                    others.swap(slot, pick);
                }
                others.truncate(k);
                others
            })
            .collect();
        Self { k, adjacency }
    }
    /// The number of informants of each particle.
    pub const fn k(&self) -> usize {
        self.k
    }
}
impl Topology for RandomGraph {
    fn n_particles(&self) -> usize {
        self.adjacency.len()
    }
    fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }
}
