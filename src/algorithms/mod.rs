/// Particle swarm optimization: particles, swarms, topologies, and the run controller.
pub mod particles;
