//! `openpso` provides Particle Swarm Optimization (PSO) for minimizing functions of the form
//! $`f(\mathbb{R}^n) \to \mathbb{R}`$ through a small, trait-based interface. The user
//! implements the [`CostFunction`](crate::traits::CostFunction) trait on some struct which takes
//! a slice of parameters and returns a single-valued [`Result`], picks a
//! [`Topology`](crate::traits::Topology) describing how particles share information, and hands
//! both to a [`PSO`](crate::algorithms::particles::PSO) run.
//!
//! <div class="warning">
//!
//! This crate only models minimization. To maximize a function, minimize its negation.
//!
//! </div>
//!
//! # Table of Contents
//! - [Key Features](#key-features)
//! - [Quick Start](#quick-start)
//! - [The Update Rule](#the-update-rule)
//! - [Topologies](#topologies)
//!
//! # Key Features
//! * A single, immutable run configuration with explicit global/local group-best selection.
//! * Pluggable neighbor topologies (global, ring, explicit graphs, random graphs).
//! * Time-varying parameters through [`Schedule`](crate::traits::Schedule) strategy objects.
//! * Reproducible runs: the random source is owned by the run and can be seeded or replayed.
//! * Observers which are notified after the population statistics pass and after every
//!   iteration.
//!
//! # Quick Start
//!
//! ```rust
//! use std::convert::Infallible;
//! use fastrand::Rng;
//! use openpso::prelude::*;
//!
//! pub struct SumOfSquares;
//! impl CostFunction for SumOfSquares {
//!     fn evaluate(&self, x: &[Float], _user_data: &mut ()) -> Result<Float, Infallible> {
//!         Ok(x.iter().map(|xi| xi.powi(2)).sum())
//!     }
//! }
//!
//! fn main() -> Result<(), PSOError<Infallible>> {
//!     let config = PSOConfig::new(2)
//!         .with_topology(Global::new(10))
//!         .with_bounds(-10.0, 10.0)
//!         .with_max_evals(5_000)
//!         .with_criteria(1e-6);
//!     let mut pso = PSO::new(config, Rng::with_seed(0));
//!     let summary = pso.process(&SumOfSquares, &mut (), Observers::empty())?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```
//!
//! # The Update Rule
//!
//! Each particle $`i`$ moves according to
//!
//! ```math
//! v_{i,d}^{t+1} = \omega v_{i,d}^t + c_1 r_1 (p_{i,d} - x_{i,d}^t) + c_2 r_2 (g_{i,d} - x_{i,d}^t)
//! ```
//! ```math
//! x_{i,d}^{t+1} = x_{i,d}^t + v_{i,d}^{t+1}
//! ```
//! where $`r_1, r_2 \sim U[0, 1)`$ are drawn separately for every dimension, $`p_i`$ is the
//! particle's personal best, and $`g_i`$ is either the swarm's best-so-far position
//! ([`GroupBest::Global`](crate::algorithms::particles::GroupBest)) or the best personal best
//! known among the particle's neighbors
//! ([`GroupBest::Local`](crate::algorithms::particles::GroupBest)). Velocities are clamped to
//! $`[-v_\text{max}, v_\text{max}]`$, and a particle which hits a wall of the search box is placed
//! on the wall and loses its velocity in that dimension.
//!
//! # Topologies
//!
//! Neighbor-best knowledge spreads by exactly one topology hop per iteration, so a topology
//! with diameter $`D`$ needs $`D`$ iterations to reach consensus. The [`Global`](crate::algorithms::particles::Global)
//! topology connects every particle to every other one, while a
//! [`Ring`](crate::algorithms::particles::Ring) slows diffusion down and tends to explore more.
#![warn(
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::doc_link_with_quotes,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::perf,
    clippy::style,
    missing_docs
)]

/// Module containing the swarm optimizer itself.
pub mod algorithms;
/// Module containing core types such as [`Point`](crate::core::Point) and the run summary.
pub mod core;
/// Module containing standard functions for testing algorithms.
pub mod test_functions;
/// Module containing the traits which form the boundary of the optimizer.
pub mod traits;

pub use nalgebra::DVector;

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(feature = "f32")]
pub type Float = f32;

/// The mathematical constant $`\pi`$ in the crate's [`Float`] type.
#[cfg(not(feature = "f32"))]
pub const PI: Float = std::f64::consts::PI;

/// The mathematical constant $`\pi`$ in the crate's [`Float`] type.
#[cfg(feature = "f32")]
pub const PI: Float = std::f32::consts::PI;

/// Prelude module containing everything someone should need to use this crate for non-development
/// purposes.
pub mod prelude {
    pub use crate::algorithms::particles::{
        DebugObserver, Global, Graph, GroupBest, Observers, PSOConfig, RandomGraph, Ring,
        SwarmStatus, TrackingSwarmObserver, PSO,
    };
    pub use crate::core::{ConfigError, PSOError, PSOSummary, Point};
    pub use crate::traits::{
        CostFunction, RandomSource, Schedule, SwarmObserver, Topology, UpdateStrategy,
    };
    pub use crate::{DVector, Float};
}
