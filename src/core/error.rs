use crate::Float;
use thiserror::Error;

/// Errors raised while validating a [`PSOConfig`](crate::algorithms::particles::PSOConfig)
/// before a run starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The topology describes an empty population.
    #[error("population size must be positive")]
    EmptyPopulation,

    /// The problem has no dimensions.
    #[error("dimension must be positive")]
    ZeroDimension,

    /// The maximum velocity is zero, negative, or not finite.
    #[error("maximum velocity must be positive and finite (got {0})")]
    InvalidVelocityLimit(Float),

    /// The initial position range is empty or not finite.
    #[error("initial position range [{min}, {max}) is empty or not finite")]
    InvalidInitialBounds {
        /// lower limit of the initial positions
        min: Float,
        /// upper limit of the initial positions
        max: Float,
    },

    /// The position bounds are inverted or not finite.
    #[error("position bounds [{min}, {max}] are inverted or not finite")]
    InvalidBounds {
        /// lower wall of the search box
        min: Float,
        /// upper wall of the search box
        max: Float,
    },

    /// A velocity initialization range is inverted or not finite.
    #[error("velocity initialization range ({min}, {max}) is inverted or not finite")]
    InvalidVelocityInit {
        /// lower limit of the draw
        min: Float,
        /// upper limit of the draw
        max: Float,
    },

    /// The evaluation budget is zero.
    #[error("maximum number of evaluations must be positive")]
    ZeroEvaluationBudget,

    /// A topology refers to a particle outside of the population.
    #[error("particle {particle} lists neighbor {neighbor}, but the population has {n_particles} particles")]
    NeighborOutOfRange {
        /// the particle whose neighbor list is invalid
        particle: usize,
        /// the offending neighbor index
        neighbor: usize,
        /// the population size
        n_particles: usize,
    },
}

/// Errors which can end a [`PSO`](crate::algorithms::particles::PSO) run.
///
/// The generic `E` is the error type of the user's
/// [`CostFunction`](crate::traits::CostFunction).
#[derive(Error, Debug)]
pub enum PSOError<E> {
    /// The configuration was rejected before the run started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The objective function returned NaN or an infinite value.
    #[error("objective returned a non-finite value ({fx}) for particle {particle}")]
    NonFiniteFitness {
        /// the particle being evaluated
        particle: usize,
        /// the offending value
        fx: Float,
    },

    /// A [`Schedule`](crate::traits::Schedule) produced a value the update rule cannot use.
    #[error("parameter {name} resolved to an invalid value ({value})")]
    InvalidParameter {
        /// the parameter name
        name: &'static str,
        /// the offending value
        value: Float,
    },

    /// The objective function itself failed.
    #[error("objective evaluation failed: {0}")]
    Evaluation(E),
}
