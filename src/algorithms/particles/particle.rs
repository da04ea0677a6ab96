use serde::{Deserialize, Serialize};

use crate::{
    core::{PSOError, Point},
    traits::{CostFunction, RandomSource},
    DVector, Float,
};

/// The parameters of the update rule for a single iteration, resolved from the run's
/// [`Schedule`](crate::traits::Schedule)s before any particle moves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepParameters {
    /// The inertial weight $`\omega`$
    pub omega: Float,
    /// The cognitive weight $`c_1`$
    pub c1: Float,
    /// The social weight $`c_2`$
    pub c2: Float,
    /// The maximum absolute velocity in any dimension
    pub v_max: Float,
    /// The lower wall of the search box
    pub x_min: Float,
    /// The upper wall of the search box
    pub x_max: Float,
}

/// Where the social term of the update rule points.
#[derive(Clone, Copy, Debug)]
pub enum GroupBestSource<'a> {
    /// Every particle is pulled toward the same position (the swarm's best so far).
    Global(&'a DVector<Float>),
    /// Each particle is pulled toward its own neighbor best.
    Local,
}

/// Ranges for the two uniform draws whose product gives each initial velocity component.
///
/// The product of two independent draws concentrates initial velocities around zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VelocityInitializer {
    /// The range of the first draw
    pub scale: (Float, Float),
    /// The range of the second draw
    pub factor: (Float, Float),
}
impl VelocityInitializer {
    /// The default initializer for a search box `[x_min, x_max]`: a draw in
    /// $`\pm (x_\text{max} - x_\text{min}) / 2`$ times a draw in $`[-0.5, 0.5)`$.
    pub fn for_bounds(x_min: Float, x_max: Float) -> Self {
        let half_width = (x_max - x_min) / 2.0;
        Self {
            scale: (-half_width, half_width),
            factor: (-0.5, 0.5),
        }
    }
    fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Float {
        rng.range(self.scale.0, self.scale.1) * rng.range(self.factor.0, self.factor.1)
    }
}

pub(crate) fn evaluate_checked<U, E>(
    index: usize,
    x: &DVector<Float>,
    func: &dyn CostFunction<U, E>,
    user_data: &mut U,
) -> Result<Float, PSOError<E>> {
    let fx = func
        .evaluate(x.as_slice(), user_data)
        .map_err(PSOError::Evaluation)?;
    if !fx.is_finite() {
        return Err(PSOError::NonFiniteFitness {
            particle: index,
            fx,
        });
    }
    Ok(fx)
}

/// A particle with a position, velocity, and the best positions it knows of.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SwarmParticle {
    index: usize,
    /// The current position of the particle
    pub position: DVector<Float>,
    /// The current velocity of the particle
    pub velocity: DVector<Float>,
    /// The value of the objective function at [`SwarmParticle::position`]
    pub fx: Float,
    /// The best position this particle has visited (its personal best)
    pub best: Point,
    /// The best personal best this particle has heard of from its neighbors (its neighbor best)
    pub nbest: Point,
}

impl SwarmParticle {
    /// Create and evaluate a new particle.
    ///
    /// For every dimension in order, the position is drawn uniformly from `init_limits` and the
    /// velocity is drawn with the given [`VelocityInitializer`]. The personal best and neighbor
    /// best both start at the initial position.
    ///
    /// # Errors
    ///
    /// Returns an `Err(PSOError<E>)` if the evaluation fails or is not finite.
    pub fn initialize<R, U, E>(
        index: usize,
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
        let mut position = DVector::zeros(dimension);
        let mut velocity = DVector::zeros(dimension);
        for i in 0..dimension {
            position[i] = rng.range(init_limits.0, init_limits.1);
            velocity[i] = velocity_init.draw(rng);
        }
        let fx = evaluate_checked(index, &position, func, user_data)?;
        let best = Point::new(position.clone(), fx);
        Ok(Self {
            index,
            position,
            velocity,
            fx,
            nbest: best.clone(),
            best,
        })
    }
    /// The particle's stable index in the population.
    pub const fn index(&self) -> usize {
        self.index
    }
    /// The dimension of the particle's position.
    pub fn dimension(&self) -> usize {
        self.position.len()
    }
    /// Compare the personal best of this particle to that of another.
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.best.total_cmp(&other.best)
    }
    /// Record the current position as the personal best (and the neighbor best) if it is
    /// strictly better than what is currently stored.
    pub fn refresh_personal_best(&mut self) {
        if self.fx < self.best.fx {
            self.best = Point::new(self.position.clone(), self.fx);
        }
        if self.fx < self.nbest.fx {
            self.nbest = Point::new(self.position.clone(), self.fx);
        }
    }
    /// Adopt `other` (a neighbor's personal best) as the neighbor best if it is strictly better.
    ///
    /// Returns `true` if the neighbor best changed.
    pub fn absorb_neighbor_best(&mut self, other: &Point) -> bool {
        if other.improves_on(&self.nbest) {
            self.nbest = other.clone();
            true
        } else {
            false
        }
    }
    /// Move the particle one step and evaluate it at its new position.
    ///
    /// For each dimension the velocity is updated with fresh cognitive and social draws, clamped
    /// to $`[-v_\text{max}, v_\text{max}]`$, and added to the position. A position which leaves the
    /// search box is placed on the wall it crossed and its velocity in that dimension is zeroed.
    ///
    /// # Errors
    ///
    /// Returns an `Err(PSOError<E>)` if the evaluation fails or is not finite.
    pub fn step<R, U, E>(
        &mut self,
        params: &StepParameters,
        group_best: GroupBestSource<'_>,
        rng: &mut R,
        func: &dyn CostFunction<U, E>,
        user_data: &mut U,
    ) -> Result<(), PSOError<E>>
    where
        R: RandomSource + ?Sized,
    {
        for i in 0..self.position.len() {
            let x = self.position[i];
            let g = match group_best {
                GroupBestSource::Global(gbest) => gbest[i],
                GroupBestSource::Local => self.nbest.x[i],
            };
            let r1 = rng.float();
            let r2 = rng.float();
            let mut v = params.omega * self.velocity[i]
                + params.c1 * r1 * (self.best.x[i] - x)
                + params.c2 * r2 * (g - x);
            if v > params.v_max {
                v = params.v_max;
            } else if v < -params.v_max {
                v = -params.v_max;
            }
            let mut x = x + v;
            if x > params.x_max {
                x = params.x_max;
                v = 0.0;
            } else if x < params.x_min {
                x = params.x_min;
                v = 0.0;
            }
            self.position[i] = x;
            self.velocity[i] = v;
        }
        self.fx = evaluate_checked(self.index, &self.position, func, user_data)?;
        Ok(())
    }
}
