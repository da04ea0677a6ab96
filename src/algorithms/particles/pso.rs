use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    algorithms::particles::{
        BestSoFar, Global, GroupBestSource, Observers, RunState, StepParameters, Swarm,
        SwarmStatus, VelocityInitializer,
    },
    core::{ConfigError, PSOError, PSOSummary},
    traits::{
        AlwaysUpdate, CostFunction, RandomSource, Schedule, SwarmObserver, Topology,
        UpdateStrategy,
    },
    Float,
};

/// Which position pulls on each particle through the social term of the update rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBest {
    /// Every particle is pulled toward the best position found by the whole swarm so far.
    #[default]
    Global,
    /// Each particle is pulled toward the best personal best among its topology neighbors.
    Local,
}

/// The configuration of a [`PSO`] run.
///
/// A configuration is built once with the `with_*` methods and is never changed while a run is in
/// progress. Problems with it are reported as a [`ConfigError`] when the run starts. The weights,
/// the velocity limit, and the walls of the search box are [`Schedule`]s, resolved against the
/// [`SwarmStatus`] at the start of every iteration.
#[derive(Clone)]
pub struct PSOConfig {
    dimension: usize,
    topology: Box<dyn Topology>,
    omega: Box<dyn Schedule>,
    c1: Box<dyn Schedule>,
    c2: Box<dyn Schedule>,
    v_max: Option<Box<dyn Schedule>>,
    x_min: Box<dyn Schedule>,
    x_max: Box<dyn Schedule>,
    init_limits: Option<(Float, Float)>,
    velocity_init: Option<VelocityInitializer>,
    group_best: GroupBest,
    max_evals: usize,
    max_iterations: Option<usize>,
    criteria: Float,
    crit_keep_going: bool,
    update_strategy: Box<dyn UpdateStrategy>,
}

impl PSOConfig {
    /// Create a configuration for a problem with `dimension` free parameters.
    ///
    /// The defaults are a [`Global`] topology of 20 particles, the constriction-equivalent
    /// weights $`\omega = 0.7298`$ and $`c_1 = c_2 = 1.49618`$, a search box of $`[-10, 10]`$ in
    /// every dimension, 10,000 evaluations, and no stop criterion.
    pub fn new(dimension: usize) -> Self {
        let omega: Float = 0.7298;
        let c: Float = 1.49618;
        let wall: Float = 10.0;
        Self {
            dimension,
            topology: Box::new(Global::new(20)),
            omega: Box::new(omega),
            c1: Box::new(c),
            c2: Box::new(c),
            v_max: None,
            x_min: Box::new(-wall),
            x_max: Box::new(wall),
            init_limits: None,
            velocity_init: None,
            group_best: GroupBest::default(),
            max_evals: 10_000,
            max_iterations: None,
            criteria: Float::NEG_INFINITY,
            crit_keep_going: false,
            update_strategy: Box::new(AlwaysUpdate),
        }
    }
    /// Sets the neighbor [`Topology`], which also fixes the population size.
    pub fn with_topology<T: Topology + 'static>(mut self, topology: T) -> Self {
        self.topology = Box::new(topology);
        self
    }
    /// Sets the inertial weight $`\omega`$ (default = `0.7298`).
    pub fn with_omega<S: Schedule + 'static>(mut self, omega: S) -> Self {
        self.omega = Box::new(omega);
        self
    }
    /// Sets the cognitive weight $`c_1`$ which controls the particle's tendency to move towards
    /// its personal best (default = `1.49618`).
    pub fn with_c1<S: Schedule + 'static>(mut self, c1: S) -> Self {
        self.c1 = Box::new(c1);
        self
    }
    /// Sets the social weight $`c_2`$ which controls the particle's tendency to move towards the
    /// group best selected by [`GroupBest`] (default = `1.49618`).
    pub fn with_c2<S: Schedule + 'static>(mut self, c2: S) -> Self {
        self.c2 = Box::new(c2);
        self
    }
    /// Sets the maximum absolute velocity in any dimension (default = the width of the search
    /// box). The value must stay positive and finite for the whole run.
    pub fn with_v_max<S: Schedule + 'static>(mut self, v_max: S) -> Self {
        self.v_max = Some(Box::new(v_max));
        self
    }
    /// Sets fixed walls of the search box, applied to every dimension (default = `[-10, 10]`).
    pub fn with_bounds(mut self, x_min: Float, x_max: Float) -> Self {
        self.x_min = Box::new(x_min);
        self.x_max = Box::new(x_max);
        self
    }
    /// Sets walls of the search box which may move during the run. Both must stay finite with
    /// `x_min <= x_max`. The walls resolved before the first iteration also set the defaults of
    /// the initial position range, the velocity initializer, and the velocity limit.
    pub fn with_bound_schedules<A, B>(mut self, x_min: A, x_max: B) -> Self
    where
        A: Schedule + 'static,
        B: Schedule + 'static,
    {
        self.x_min = Box::new(x_min);
        self.x_max = Box::new(x_max);
        self
    }
    /// Sets the range `[min, max)` from which initial positions are drawn (default = the search
    /// box).
    pub const fn with_init_bounds(mut self, min: Float, max: Float) -> Self {
        self.init_limits = Some((min, max));
        self
    }
    /// Sets the ranges of the two draws whose product gives each initial velocity component
    /// (default = [`VelocityInitializer::for_bounds`] of the search box).
    pub const fn with_velocity_initializer(mut self, velocity_init: VelocityInitializer) -> Self {
        self.velocity_init = Some(velocity_init);
        self
    }
    /// Sets the [`GroupBest`] mode (default = [`GroupBest::Global`]).
    pub const fn with_group_best(mut self, group_best: GroupBest) -> Self {
        self.group_best = group_best;
        self
    }
    /// Sets the evaluation budget (default = `10_000`). Evaluations made while building the
    /// swarm are not counted.
    pub const fn with_max_evals(mut self, max_evals: usize) -> Self {
        self.max_evals = max_evals;
        self
    }
    /// Stop after a number of iterations even if the evaluation budget is not spent.
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
    /// Sets the stop criterion: the run is considered converged once the best-so-far fitness is
    /// strictly below `criteria`.
    pub const fn with_criteria(mut self, criteria: Float) -> Self {
        self.criteria = criteria;
        self
    }
    /// If `true`, the run continues until the evaluation budget is spent even after the stop
    /// criterion has been met (default = `false`).
    pub const fn with_keep_going(mut self, crit_keep_going: bool) -> Self {
        self.crit_keep_going = crit_keep_going;
        self
    }
    /// Sets the [`UpdateStrategy`] deciding which particles move in each iteration (default =
    /// [`AlwaysUpdate`]).
    pub fn with_update_strategy<S: UpdateStrategy + 'static>(mut self, strategy: S) -> Self {
        self.update_strategy = Box::new(strategy);
        self
    }
    /// The dimension of the search space.
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
    /// The number of particles in the swarm.
    pub fn n_particles(&self) -> usize {
        self.topology.n_particles()
    }
    fn initial_status(&self) -> SwarmStatus {
        SwarmStatus {
            max_evals: self.max_evals,
            ..Default::default()
        }
    }
    fn walls(&self, status: &SwarmStatus) -> (Float, Float) {
        (self.x_min.value(status), self.x_max.value(status))
    }
    fn init_limits(&self, (x_min, x_max): (Float, Float)) -> (Float, Float) {
        self.init_limits.unwrap_or((x_min, x_max))
    }
    fn velocity_init(&self, (x_min, x_max): (Float, Float)) -> VelocityInitializer {
        self.velocity_init
            .unwrap_or_else(|| VelocityInitializer::for_bounds(x_min, x_max))
    }
    fn v_max(&self, status: &SwarmStatus, (x_min, x_max): (Float, Float)) -> Float {
        self.v_max
            .as_ref()
            .map_or(x_max - x_min, |v_max| v_max.value(status))
    }
    /// Check everything that can be checked without evaluating the objective. Scheduled values
    /// are checked as they resolve before the first iteration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        self.topology.validate()?;
        let walls = self.walls(&self.initial_status());
        let (x_min, x_max) = walls;
        if !(x_min.is_finite() && x_max.is_finite()) || x_min > x_max {
            return Err(ConfigError::InvalidBounds {
                min: x_min,
                max: x_max,
            });
        }
        let (min, max) = self.init_limits(walls);
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(ConfigError::InvalidInitialBounds { min, max });
        }
        let velocity_init = self.velocity_init(walls);
        for (min, max) in [velocity_init.scale, velocity_init.factor] {
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(ConfigError::InvalidVelocityInit { min, max });
            }
        }
        if self.max_evals == 0 {
            return Err(ConfigError::ZeroEvaluationBudget);
        }
        Ok(())
    }
}

impl Default for PSOConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Particle Swarm Optimizer
///
/// The PSO algorithm involves a population of particles which are aware of the best positions
/// found by their neighbors in some [`Topology`]. Every iteration:
///
/// 1. the population is scanned once: each particle refreshes its personal best, the
///    iteration's best, worst, and mean fitness are recorded, and the best-so-far is replaced if
///    the iteration's best particle beats it,
/// 2. observers are told the population data was updated,
/// 3. each particle adopts the best personal best among its neighbors as its neighbor best (one
///    topology hop per iteration),
/// 4. every particle selected by the [`UpdateStrategy`] is moved by the update rule and
///    evaluated once,
/// 5. observers are told the iteration is complete,
/// 6. the stop criterion is checked.
///
/// The loop always performs at least one iteration and continues while fewer than `max_evals`
/// evaluations have been spent. The random source is owned by the optimizer, so a run is fully
/// determined by its configuration and the draws of its [`RandomSource`].
///
/// See [^1] for more information on the variants of the algorithm.
///
/// [^1]: [Houssein, E. H., Gad, A. G., Hussain, K., & Suganthan, P. N. (2021). Major Advances in Particle Swarm Optimization: Theory, Analysis, and Application. In Swarm and Evolutionary Computation (Vol. 63, p. 100868). Elsevier BV.](https://doi.org/10.1016/j.swevo.2021.100868)
#[derive(Clone)]
pub struct PSO<R: RandomSource = Rng> {
    config: PSOConfig,
    rng: R,
    update_strategy: Box<dyn UpdateStrategy>,
}

impl<R: RandomSource> PSO<R> {
    /// Construct a new particle swarm optimizer from a configuration and a random source.
    pub fn new(config: PSOConfig, rng: R) -> Self {
        let update_strategy = config.update_strategy.clone();
        Self {
            config,
            rng,
            update_strategy,
        }
    }
    /// The configuration of the optimizer.
    pub const fn config(&self) -> &PSOConfig {
        &self.config
    }
    /// Resolve the update-rule parameters for the coming iteration.
    fn step_parameters<E>(&self, status: &SwarmStatus) -> Result<StepParameters, PSOError<E>> {
        let (x_min, x_max) = self.config.walls(status);
        let params = StepParameters {
            omega: self.config.omega.value(status),
            c1: self.config.c1.value(status),
            c2: self.config.c2.value(status),
            v_max: self.config.v_max(status, (x_min, x_max)),
            x_min,
            x_max,
        };
        for (name, value) in [
            ("omega", params.omega),
            ("c1", params.c1),
            ("c2", params.c2),
            ("x_min", x_min),
            ("x_max", x_max),
        ] {
            if !value.is_finite() {
                return Err(PSOError::InvalidParameter { name, value });
            }
        }
        if x_min > x_max {
            return Err(PSOError::InvalidParameter {
                name: "x_min",
                value: x_min,
            });
        }
        if !(params.v_max.is_finite() && params.v_max > 0.0) {
            return Err(PSOError::InvalidParameter {
                name: "v_max",
                value: params.v_max,
            });
        }
        Ok(params)
    }
    /// Validate the configuration and build a freshly evaluated swarm.
    ///
    /// The evaluations made here are reported in [`SwarmStatus::n_init_evals`] and do not count
    /// against the evaluation budget. The best-so-far starts at particle 0. Every run starts from
    /// a fresh copy of the configured [`UpdateStrategy`].
    ///
    /// # Errors
    ///
    /// Returns an `Err(PSOError<E>)` if the configuration is invalid or if any evaluation fails
    /// or is not finite.
    pub fn initialize<U, E>(
        &mut self,
        func: &dyn CostFunction<U, E>,
        user_data: &mut U,
    ) -> Result<SwarmStatus, PSOError<E>> {
        self.config.validate()?;
        let mut status = self.config.initial_status();
        let walls = self.config.walls(&status);
        let v_max = self.config.v_max(&status, walls);
        if !(v_max.is_finite() && v_max > 0.0) {
            return Err(ConfigError::InvalidVelocityLimit(v_max).into());
        }
        let n_particles = self.config.n_particles();
        status.swarm = Swarm::initialize(
            n_particles,
            self.config.dimension,
            self.config.init_limits(walls),
            &self.config.velocity_init(walls),
            &mut self.rng,
            func,
            user_data,
        )?;
        status.n_init_evals = n_particles;
        status.bounds = walls;
        self.update_strategy = self.config.update_strategy.clone();
        status.best = BestSoFar {
            point: status.swarm.particles[0].best.clone(),
            particle: 0,
        };
        status.update_message("Initialized");
        Ok(status)
    }
    /// Perform a single iteration on a swarm built by [`PSO::initialize`].
    ///
    /// # Errors
    ///
    /// Returns an `Err(PSOError<E>)` if a schedule produces an unusable value or if any
    /// evaluation fails or is not finite.
    pub fn iterate<U, E>(
        &mut self,
        status: &mut SwarmStatus,
        func: &dyn CostFunction<U, E>,
        user_data: &mut U,
        observers: &mut Observers<U>,
    ) -> Result<(), PSOError<E>> {
        status.state = RunState::Iterating;
        let params = self.step_parameters::<E>(status)?;
        status.bounds = (params.x_min, params.x_max);
        status.stats = status.swarm.update_population_data(&mut status.best);
        observers.on_population_updated(status, user_data);

        let n_informed = status
            .swarm
            .propagate_neighbor_bests(self.config.topology.as_ref());
        let snapshot: &SwarmStatus = status;
        let strategy = &mut self.update_strategy;
        let selected: Vec<bool> = snapshot
            .swarm
            .particles
            .iter()
            .map(|particle| strategy.should_update(particle.index(), snapshot))
            .collect();
        let group_best = match self.config.group_best {
            GroupBest::Global => GroupBestSource::Global(&status.best.point.x),
            GroupBest::Local => GroupBestSource::Local,
        };
        let mut n_stepped = 0;
        for (particle, _) in status
            .swarm
            .particles
            .iter_mut()
            .zip(&selected)
            .filter(|(_, selected)| **selected)
        {
            particle.step(&params, group_best, &mut self.rng, func, user_data)?;
            status.n_f_evals += 1;
            n_stepped += 1;
        }
        if n_stepped == 0 {
            warn!(
                iteration = status.iteration + 1,
                "no particle was selected for update"
            );
        }
        status.iteration += 1;
        debug!(
            iteration = status.iteration,
            n_f_evals = status.n_f_evals,
            best_fx = status.best.point.fx,
            mean_fx = status.stats.mean_fx,
            n_informed,
            n_stepped,
            omega = params.omega,
            v_max = params.v_max,
            x_min = params.x_min,
            x_max = params.x_max,
            "iteration complete"
        );
        observers.on_iteration(status, user_data);

        if status.criteria_evals.is_none() && status.best.point.fx < self.config.criteria {
            status.criteria_evals = Some(status.n_f_evals);
            status.converged = true;
            status.update_message(&format!(
                "Stop criterion met (f < {}) after {} evaluations",
                self.config.criteria, status.n_f_evals
            ));
            info!(
                criteria = self.config.criteria,
                n_f_evals = status.n_f_evals,
                best_fx = status.best.point.fx,
                "stop criterion met"
            );
            if !self.config.crit_keep_going {
                status.state = RunState::Stopped;
            }
        }
        Ok(())
    }
    /// Run the optimizer to completion and return the final [`SwarmStatus`].
    ///
    /// # Errors
    ///
    /// Returns an `Err(PSOError<E>)` if the configuration is invalid, if a schedule produces an
    /// unusable value, or if any evaluation fails or is not finite.
    pub fn run<U, E>(
        &mut self,
        func: &dyn CostFunction<U, E>,
        user_data: &mut U,
        mut observers: Observers<U>,
    ) -> Result<SwarmStatus, PSOError<E>> {
        let mut status = self.initialize(func, user_data)?;
        info!(
            dimension = self.config.dimension,
            n_particles = status.swarm.len(),
            max_evals = self.config.max_evals,
            group_best = ?self.config.group_best,
            "starting particle swarm optimization"
        );
        loop {
            self.iterate(&mut status, func, user_data, &mut observers)?;
            if status.is_stopped() {
                break;
            }
            if status.n_f_evals >= self.config.max_evals {
                status.update_message(&format!(
                    "Maximum number of evaluations reached ({})",
                    self.config.max_evals
                ));
                break;
            }
            if let Some(max_iterations) = self.config.max_iterations {
                if status.iteration >= max_iterations {
                    status.update_message(&format!(
                        "Maximum number of iterations reached ({max_iterations})"
                    ));
                    break;
                }
            }
        }
        status.state = RunState::Stopped;
        info!(
            iterations = status.iteration,
            n_f_evals = status.n_f_evals,
            best_fx = status.best.point.fx,
            best_particle = status.best.particle,
            converged = status.converged,
            message = %status.message,
            "particle swarm optimization stopped"
        );
        Ok(status)
    }
    /// Run the optimizer to completion and summarize the result.
    ///
    /// # Errors
    ///
    /// Returns an `Err(PSOError<E>)` if the configuration is invalid, if a schedule produces an
    /// unusable value, or if any evaluation fails or is not finite.
    pub fn process<U, E>(
        &mut self,
        func: &dyn CostFunction<U, E>,
        user_data: &mut U,
        observers: Observers<U>,
    ) -> Result<PSOSummary, PSOError<E>> {
        let status = self.run(func, user_data, observers)?;
        Ok(self.summarize(&status))
    }
    /// Build a [`PSOSummary`] from a [`SwarmStatus`].
    pub fn summarize(&self, status: &SwarmStatus) -> PSOSummary {
        PSOSummary {
            parameter_names: None,
            message: status.message.clone(),
            x: status.best.point.x.iter().copied().collect(),
            fx: status.best.point.fx,
            best_particle: status.best.particle,
            x_min: status.bounds.0,
            x_max: status.bounds.1,
            cost_evals: status.n_f_evals,
            init_evals: status.n_init_evals,
            criteria_evals: status.criteria_evals,
            iterations: status.iteration,
            converged: status.converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, convert::Infallible, rc::Rc};

    use approx::assert_relative_eq;
    use fastrand::Rng;

    use super::*;
    use crate::{
        algorithms::particles::{Graph, Ring, TrackingSwarmObserver},
        core::ReplaySource,
        traits::{ScheduleFn, UpdateFn},
    };

    struct SumOfSquares;
    impl CostFunction for SumOfSquares {
        fn evaluate(&self, x: &[Float], _: &mut ()) -> Result<Float, Infallible> {
            Ok(x.iter().map(|xi| xi * xi).sum())
        }
    }

    struct Constant(Float);
    impl CostFunction for Constant {
        fn evaluate(&self, _x: &[Float], _: &mut ()) -> Result<Float, Infallible> {
            Ok(self.0)
        }
    }

    /// Counts its own calls through the user data.
    struct Counted;
    impl CostFunction<usize> for Counted {
        fn evaluate(&self, x: &[Float], calls: &mut usize) -> Result<Float, Infallible> {
            *calls += 1;
            Ok(x.iter().map(|xi| xi * xi).sum())
        }
    }

    struct Blows;
    impl CostFunction<(), String> for Blows {
        fn evaluate(&self, x: &[Float], _: &mut ()) -> Result<Float, String> {
            if x[0] > 1.0 {
                Err(format!("cannot evaluate at {}", x[0]))
            } else {
                Ok(x[0])
            }
        }
    }

    /// Checks the movement invariants after every iteration.
    #[derive(Default)]
    struct Invariants {
        v_max: Float,
        x_min: Float,
        x_max: Float,
        violations: Vec<String>,
        best_history: Vec<Float>,
        n_f_evals_history: Vec<usize>,
    }
    impl<U> SwarmObserver<U> for Invariants {
        fn on_population_updated(&mut self, status: &SwarmStatus, _user_data: &U) {
            for p in &status.swarm.particles {
                if p.best.fx > p.fx {
                    self.violations
                        .push(format!("personal best of {} is stale", p.index()));
                }
            }
        }
        fn on_iteration(&mut self, status: &SwarmStatus, _user_data: &U) {
            for p in &status.swarm.particles {
                for (x, v) in p.position.iter().zip(p.velocity.iter()) {
                    if v.abs() > self.v_max {
                        self.violations.push(format!("velocity {v} exceeds v_max"));
                    }
                    if *x < self.x_min || *x > self.x_max {
                        self.violations.push(format!("position {x} is outside the box"));
                    }
                    if (*x == self.x_min || *x == self.x_max) && *v != 0.0 {
                        self.violations
                            .push(format!("particle on a wall at {x} still moves at {v}"));
                    }
                }
            }
            self.best_history.push(status.best.point.fx);
            self.n_f_evals_history.push(status.n_f_evals);
        }
    }

    /// Records the first iteration after which every particle knows the best-so-far.
    #[derive(Default)]
    struct Consensus(Option<usize>);
    impl<U> SwarmObserver<U> for Consensus {
        fn on_iteration(&mut self, status: &SwarmStatus, _user_data: &U) {
            if self.0.is_none()
                && status
                    .swarm
                    .particles
                    .iter()
                    .all(|p| p.nbest.fx == status.best.point.fx)
            {
                self.0 = Some(status.iteration);
            }
        }
    }

    /// Four one-dimensional particles start at 0.0, 0.9, 0.8, and 0.7 at rest. With no inertia,
    /// no cognitive pull, and `c2 * r2 = 1`, every particle jumps exactly onto its neighbor best.
    fn first_consensus<T: Topology + 'static>(topology: T) -> Option<usize> {
        let consensus = Rc::new(RefCell::new(Consensus::default()));
        let config = PSOConfig::new(1)
            .with_topology(topology)
            .with_group_best(GroupBest::Local)
            .with_bounds(-1.0, 1.0)
            .with_init_bounds(0.0, 1.0)
            .with_velocity_initializer(VelocityInitializer {
                scale: (0.0, 0.0),
                factor: (0.0, 0.0),
            })
            .with_omega(0.0)
            .with_c1(0.0)
            .with_c2(2.0)
            .with_max_evals(12);
        // degenerate velocity ranges draw nothing, so the first four draws are the positions
        let draws = [0.0, 0.9, 0.8, 0.7]
            .into_iter()
            .chain(std::iter::repeat(0.5).take(24));
        PSO::new(config, ReplaySource::new(draws))
            .run(
                &SumOfSquares,
                &mut (),
                Observers::empty().with_observer(consensus.clone()),
            )
            .unwrap();
        let first = consensus.borrow().0;
        first
    }

    #[test]
    fn test_constant_objective_on_a_point() {
        let config = PSOConfig::new(1)
            .with_topology(Global::new(1))
            .with_bounds(0.0, 0.0)
            .with_init_bounds(-1.0, 1.0)
            .with_v_max(1.0)
            .with_max_evals(10);
        let invariants = Rc::new(RefCell::new(Invariants {
            v_max: 1.0,
            ..Default::default()
        }));
        let mut pso = PSO::new(config, ReplaySource::constant(0.5));
        let status = pso
            .run(
                &Constant(5.0),
                &mut (),
                Observers::empty().with_observer(invariants.clone()),
            )
            .unwrap();
        let particle = &status.swarm.particles[0];
        assert_eq!(particle.fx, 5.0);
        assert_eq!(particle.position[0], 0.0);
        assert_eq!(particle.velocity[0], 0.0);
        assert_eq!(status.best.point.fx, 5.0);
        assert_eq!(status.best.point.x[0], 0.0);
        assert_eq!(status.best.particle, 0);
        assert_eq!(status.n_f_evals, 10);
        assert_eq!(status.n_init_evals, 1);
        assert_eq!(status.iteration, 10);
        assert_eq!(status.criteria_evals, None);
        assert!(!status.converged);
        assert_eq!(status.state, RunState::Stopped);
        assert!(invariants.borrow().violations.is_empty());
    }

    #[test]
    fn test_global_two_particles_converge() {
        let config = PSOConfig::new(1)
            .with_topology(Global::new(2))
            .with_omega(0.7298)
            .with_c1(1.49618)
            .with_c2(1.49618)
            .with_bounds(-5.0, 5.0)
            .with_max_evals(20_000)
            .with_criteria(1e-4);
        let mut pso = PSO::new(config, Rng::with_seed(0));
        let status = pso.run(&SumOfSquares, &mut (), Observers::empty()).unwrap();
        assert!(status.best.point.fx < 1e-4);
        assert!(status.converged);
        assert_eq!(status.criteria_evals, Some(status.n_f_evals));
        assert!(status.n_f_evals < 20_000);
        assert!(status.message.starts_with("Stop criterion met"));
    }

    #[test]
    fn test_larger_swarm_finds_the_minimum() {
        let config = PSOConfig::new(2)
            .with_topology(Global::new(20))
            .with_bounds(-5.0, 5.0)
            .with_max_evals(20_000)
            .with_criteria(1e-8);
        let summary = PSO::new(config, Rng::with_seed(1))
            .process(&SumOfSquares, &mut (), Observers::empty())
            .unwrap();
        assert!(summary.converged);
        assert!(summary.fx < 1e-8);
        assert_relative_eq!(summary.x[0], 0.0, epsilon = 1e-4);
        assert_relative_eq!(summary.x[1], 0.0, epsilon = 1e-4);
        assert_eq!(summary.init_evals, 20);
        assert_eq!(summary.criteria_evals, Some(summary.cost_evals));
        assert_eq!(summary.cost_evals % 20, 0);
        assert_eq!(summary.iterations * 20, summary.cost_evals);
    }

    #[test]
    fn test_keep_going_spends_the_budget() {
        let config = PSOConfig::new(1)
            .with_topology(Global::new(5))
            .with_max_evals(50)
            .with_criteria(1e9)
            .with_keep_going(true);
        let status = PSO::new(config, Rng::with_seed(2))
            .run(&SumOfSquares, &mut (), Observers::empty())
            .unwrap();
        assert_eq!(status.criteria_evals, Some(5));
        assert!(status.converged);
        assert_eq!(status.n_f_evals, 50);
        assert_eq!(status.iteration, 10);
        assert!(status.message.starts_with("Maximum number of evaluations"));

        let config = PSOConfig::new(1)
            .with_topology(Global::new(5))
            .with_max_evals(50)
            .with_criteria(1e9);
        let status = PSO::new(config, Rng::with_seed(2))
            .run(&SumOfSquares, &mut (), Observers::empty())
            .unwrap();
        assert_eq!(status.criteria_evals, Some(5));
        assert_eq!(status.n_f_evals, 5);
        assert_eq!(status.iteration, 1);
    }

    #[test]
    fn test_budget_is_checked_after_each_iteration() {
        // 7 particles never divide 20 evenly: the last iteration overshoots the budget
        let config = PSOConfig::new(3)
            .with_topology(Ring::new(7))
            .with_max_evals(20);
        let status = PSO::new(config, Rng::with_seed(3))
            .run(&SumOfSquares, &mut (), Observers::empty())
            .unwrap();
        assert_eq!(status.iteration, 3);
        assert_eq!(status.n_f_evals, 21);
    }

    #[test]
    fn test_max_iterations() {
        let config = PSOConfig::new(2)
            .with_topology(Global::new(4))
            .with_max_iterations(3);
        let summary = PSO::new(config, Rng::with_seed(4))
            .process(&SumOfSquares, &mut (), Observers::empty())
            .unwrap();
        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.cost_evals, 12);
        assert!(!summary.converged);
        assert_eq!(summary.message, "Maximum number of iterations reached (3)");
    }

    #[test]
    fn test_only_selected_particles_are_evaluated() {
        let config = PSOConfig::new(2)
            .with_topology(Global::new(5))
            .with_max_evals(9)
            .with_update_strategy(UpdateFn(|index: usize, _: &SwarmStatus| index % 2 == 0));
        let invariants = Rc::new(RefCell::new(Invariants {
            v_max: 20.0,
            x_min: -10.0,
            x_max: 10.0,
            ..Default::default()
        }));
        let mut calls = 0;
        let mut pso = PSO::new(config, Rng::with_seed(5));
        let initial = pso.clone().initialize(&Counted, &mut 0).unwrap();
        let status = pso
            .run(
                &Counted,
                &mut calls,
                Observers::empty().with_observer(invariants.clone()),
            )
            .unwrap();
        assert_eq!(calls, 5 + 9);
        assert_eq!(status.n_init_evals, 5);
        assert_eq!(status.n_f_evals, 9);
        assert_eq!(invariants.borrow().n_f_evals_history, vec![3, 6, 9]);
        for index in [1, 3] {
            assert_eq!(
                status.swarm.particles[index].position,
                initial.swarm.particles[index].position
            );
            assert_eq!(
                status.swarm.particles[index].velocity,
                initial.swarm.particles[index].velocity
            );
        }
        assert!(invariants.borrow().violations.is_empty());
    }

    #[test]
    fn test_movement_invariants_on_a_ring() {
        let invariants = Rc::new(RefCell::new(Invariants {
            v_max: 0.5,
            x_min: -2.0,
            x_max: 2.0,
            ..Default::default()
        }));
        let config = PSOConfig::new(3)
            .with_topology(Ring::new(8))
            .with_group_best(GroupBest::Local)
            .with_bounds(-2.0, 2.0)
            .with_v_max(0.5)
            .with_c1(2.5)
            .with_c2(2.5)
            .with_omega(1.1)
            .with_max_evals(2_000);
        let rastrigin = crate::test_functions::Rastrigin;
        PSO::new(config, Rng::with_seed(6))
            .run(
                &rastrigin,
                &mut (),
                Observers::empty().with_observer(invariants.clone()),
            )
            .unwrap();
        let invariants = invariants.borrow();
        assert!(invariants.violations.is_empty(), "{:?}", invariants.violations);
        assert_eq!(invariants.best_history.len(), 250);
        assert!(invariants
            .best_history
            .windows(2)
            .all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn test_identical_seeds_give_identical_trajectories() {
        let run = |seed: u64| {
            let tracker = TrackingSwarmObserver::build();
            let config = PSOConfig::new(2)
                .with_topology(Ring::with_radius(6, 2))
                .with_group_best(GroupBest::Local)
                .with_max_evals(120);
            PSO::new(config, Rng::with_seed(seed))
                .run(
                    &SumOfSquares,
                    &mut (),
                    Observers::empty().with_observer(tracker.clone()),
                )
                .unwrap();
            let tracker = tracker.read().clone();
            tracker
        };
        let a = run(8);
        let b = run(8);
        let c = run(9);
        assert_eq!(a.history.len(), 20);
        for (pa, pb) in a.history.iter().zip(&b.history) {
            for (x, y) in pa.iter().zip(pb) {
                assert_eq!(x.position, y.position);
                assert_eq!(x.velocity, y.velocity);
                assert_eq!(x.fx, y.fx);
            }
        }
        for (x, y) in a.best_history.iter().zip(&b.best_history) {
            assert_eq!(x.x, y.x);
            assert_eq!(x.fx, y.fx);
        }
        assert_ne!(
            a.history[0][0].position, c.history[0][0].position,
            "different seeds should give different swarms"
        );
    }

    #[test]
    fn test_ring_diffuses_slower_than_global() {
        let global = first_consensus(Global::new(4));
        let ring = first_consensus(Ring::new(4));
        assert_eq!(global, Some(1));
        // particle 2 only hears of the optimum once particle 1 or 3 has moved onto it
        assert_eq!(ring, Some(2));
    }

    #[test]
    fn test_search_box_can_shrink_mid_run() {
        #[derive(Default)]
        struct Walls {
            seen: Vec<(Float, Float)>,
            violations: Vec<String>,
        }
        impl<U> SwarmObserver<U> for Walls {
            fn on_iteration(&mut self, status: &SwarmStatus, _user_data: &U) {
                let (x_min, x_max) = status.bounds;
                self.seen.push(status.bounds);
                for p in &status.swarm.particles {
                    for (x, v) in p.position.iter().zip(p.velocity.iter()) {
                        if *x < x_min || *x > x_max {
                            self.violations
                                .push(format!("position {x} is outside [{x_min}, {x_max}]"));
                        }
                        if (*x == x_min || *x == x_max) && *v != 0.0 {
                            self.violations
                                .push(format!("particle on a wall at {x} still moves at {v}"));
                        }
                    }
                }
            }
        }
        let shrinking = |wall: Float| {
            ScheduleFn(move |status: &SwarmStatus| {
                if status.iteration >= 3 {
                    wall
                } else {
                    4.0 * wall
                }
            })
        };
        let walls = Rc::new(RefCell::new(Walls::default()));
        let config = PSOConfig::new(2)
            .with_topology(Global::new(6))
            .with_bound_schedules(shrinking(-1.0), shrinking(1.0))
            .with_v_max(2.0)
            .with_max_iterations(8);
        let summary = PSO::new(config, Rng::with_seed(13))
            .process(
                &SumOfSquares,
                &mut (),
                Observers::empty().with_observer(walls.clone()),
            )
            .unwrap();
        let walls = walls.borrow();
        assert!(walls.violations.is_empty(), "{:?}", walls.violations);
        assert_eq!(walls.seen.len(), 8);
        assert!(walls.seen[..3].iter().all(|&w| w == (-4.0, 4.0)));
        assert!(walls.seen[3..].iter().all(|&w| w == (-1.0, 1.0)));
        assert_eq!(summary.x_min, -1.0);
        assert_eq!(summary.x_max, 1.0);
    }

    #[test]
    fn test_inverted_walls_mid_run_are_rejected() {
        let upper: Float = 1.0;
        let config = PSOConfig::new(1)
            .with_topology(Global::new(2))
            .with_v_max(1.0)
            .with_bound_schedules(
                ScheduleFn(|status: &SwarmStatus| {
                    if status.iteration >= 2 {
                        2.0
                    } else {
                        -1.0
                    }
                }),
                upper,
            );
        let err = PSO::new(config, Rng::with_seed(0))
            .run(&SumOfSquares, &mut (), Observers::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            PSOError::InvalidParameter { name: "x_min", value } if value == 2.0
        ));

        let config = PSOConfig::new(1)
            .with_bound_schedules(ScheduleFn(|_: &SwarmStatus| Float::NAN), upper);
        let err = PSO::new(config, Rng::with_seed(0))
            .run(&SumOfSquares, &mut (), Observers::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            PSOError::Config(ConfigError::InvalidBounds { max, .. }) if max == 1.0
        ));
    }

    #[test]
    fn test_update_strategy_state_does_not_leak_between_runs() {
        /// Selects every particle on odd-numbered calls only.
        #[derive(Clone, Default)]
        struct EveryOtherCall(usize);
        impl UpdateStrategy for EveryOtherCall {
            fn should_update(&mut self, _index: usize, _status: &SwarmStatus) -> bool {
                self.0 += 1;
                self.0 % 2 == 1
            }
        }
        let config = PSOConfig::new(1)
            .with_topology(Global::new(1))
            .with_update_strategy(EveryOtherCall::default())
            .with_max_iterations(3);
        let mut pso = PSO::new(config, Rng::with_seed(14));
        let first = pso.run(&SumOfSquares, &mut (), Observers::empty()).unwrap();
        let second = pso.run(&SumOfSquares, &mut (), Observers::empty()).unwrap();
        // calls 1 and 3 move the particle in both runs
        assert_eq!(first.n_f_evals, 2);
        assert_eq!(second.n_f_evals, 2);
        assert_eq!(second.iteration, 3);
    }

    #[test]
    fn test_population_update_precedes_movement() {
        #[derive(Default)]
        struct Order(Vec<(&'static str, usize, usize)>);
        impl<U> SwarmObserver<U> for Order {
            fn on_population_updated(&mut self, status: &SwarmStatus, _user_data: &U) {
                self.0
                    .push(("population", status.iteration, status.n_f_evals));
            }
            fn on_iteration(&mut self, status: &SwarmStatus, _user_data: &U) {
                self.0.push(("iteration", status.iteration, status.n_f_evals));
            }
        }
        let order = Rc::new(RefCell::new(Order::default()));
        let config = PSOConfig::new(1)
            .with_topology(Global::new(3))
            .with_max_evals(6);
        PSO::new(config, Rng::with_seed(10))
            .run(
                &SumOfSquares,
                &mut (),
                Observers::empty().with_observer(order.clone()),
            )
            .unwrap();
        assert_eq!(
            order.borrow().0,
            vec![
                ("population", 0, 0),
                ("iteration", 1, 3),
                ("population", 1, 3),
                ("iteration", 2, 6),
            ]
        );
    }

    #[test]
    fn test_invalid_configurations_are_rejected_before_evaluating() {
        let cases = [
            (PSOConfig::new(0), ConfigError::ZeroDimension),
            (
                PSOConfig::new(1).with_bounds(1.0, -1.0),
                ConfigError::InvalidBounds {
                    min: 1.0,
                    max: -1.0,
                },
            ),
            (
                PSOConfig::new(1).with_init_bounds(0.5, 0.5),
                ConfigError::InvalidInitialBounds { min: 0.5, max: 0.5 },
            ),
            (
                PSOConfig::new(1).with_max_evals(0),
                ConfigError::ZeroEvaluationBudget,
            ),
            (
                PSOConfig::new(1).with_v_max(-1.0),
                ConfigError::InvalidVelocityLimit(-1.0),
            ),
            (
                PSOConfig::new(1).with_topology(Graph::new(vec![vec![2], vec![0]])),
                ConfigError::NeighborOutOfRange {
                    particle: 0,
                    neighbor: 2,
                    n_particles: 2,
                },
            ),
            (
                PSOConfig::new(1).with_topology(Global::new(0)),
                ConfigError::EmptyPopulation,
            ),
            (
                PSOConfig::new(1).with_velocity_initializer(VelocityInitializer {
                    scale: (1.0, -1.0),
                    factor: (-0.5, 0.5),
                }),
                ConfigError::InvalidVelocityInit {
                    min: 1.0,
                    max: -1.0,
                },
            ),
        ];
        for (config, expected) in cases {
            let mut calls = 0;
            let err = PSO::new(config, Rng::with_seed(0))
                .process(&Counted, &mut calls, Observers::empty())
                .unwrap_err();
            assert!(matches!(err, PSOError::Config(ref e) if *e == expected), "{err}");
            assert_eq!(calls, 0);
        }
    }

    #[test]
    fn test_zero_width_box_needs_explicit_v_max() {
        let config = PSOConfig::new(1)
            .with_bounds(0.0, 0.0)
            .with_init_bounds(-1.0, 1.0);
        let err = PSO::new(config, Rng::with_seed(0))
            .process(&SumOfSquares, &mut (), Observers::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            PSOError::Config(ConfigError::InvalidVelocityLimit(v)) if v == 0.0
        ));
    }

    #[test]
    fn test_schedule_going_bad_mid_run() {
        let config = PSOConfig::new(1)
            .with_topology(Global::new(2))
            .with_v_max(ScheduleFn(|status: &SwarmStatus| {
                if status.iteration >= 2 {
                    -1.0
                } else {
                    1.0
                }
            }));
        let err = PSO::new(config, Rng::with_seed(0))
            .run(&SumOfSquares, &mut (), Observers::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            PSOError::InvalidParameter { name: "v_max", value } if value == -1.0
        ));
    }

    #[test]
    fn test_objective_errors_end_the_run() {
        let config = PSOConfig::new(1)
            .with_topology(Global::new(3))
            .with_bounds(-1.0, 1.0);
        let mut pso = PSO::new(config.clone(), Rng::with_seed(0));
        // inside [-1, 1] every evaluation succeeds
        assert!(pso.run(&Blows, &mut (), Observers::empty()).is_ok());

        let config = config.with_bounds(-1.0, 3.0).with_init_bounds(2.0, 3.0);
        let err = PSO::new(config, Rng::with_seed(0))
            .run(&Blows, &mut (), Observers::empty())
            .unwrap_err();
        assert!(matches!(err, PSOError::Evaluation(ref msg) if msg.starts_with("cannot evaluate")));

        let config = PSOConfig::new(1).with_topology(Global::new(2));
        let err = PSO::new(config, Rng::with_seed(0))
            .run(&Constant(Float::INFINITY), &mut (), Observers::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            PSOError::NonFiniteFitness { particle: 0, fx } if fx.is_infinite()
        ));
    }

    #[test]
    fn test_summary() {
        let config = PSOConfig::new(2)
            .with_topology(Global::new(5))
            .with_bounds(-3.0, 3.0)
            .with_max_evals(100);
        let mut pso = PSO::new(config, Rng::with_seed(11));
        let status = pso.run(&SumOfSquares, &mut (), Observers::empty()).unwrap();
        let summary = pso.summarize(&status).with_parameter_names(["a", "b"]);
        assert_eq!(summary.x, status.best.point.x.as_slice());
        assert_eq!(summary.fx, status.best.point.fx);
        assert_eq!(summary.best_particle, status.best.particle);
        assert_eq!(summary.cost_evals, 100);
        assert_eq!(summary.init_evals, 5);
        assert_eq!(summary.iterations, 20);
        assert_eq!(summary.x_min, -3.0);
        assert_eq!(summary.x_max, 3.0);
        let table = summary.to_string();
        assert!(table.contains("SWARM RESULTS"));
        assert!(table.contains('a'));
    }
}
