use std::convert::Infallible;

use crate::{traits::CostFunction, Float};

/// The Rosenbrock function, a non-convex function with a single minimum at the end of a long,
/// flat valley.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^{n-1} \left[100(x_{i+1} - x_i^2)^2 + (1 - x_i)^2 \right]
/// ```
/// where $`n \geq 2`$. This function has a minimum at $`f(\vec{1}) = 0`$. A single coordinate
/// evaluates to zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rosenbrock;
impl CostFunction for Rosenbrock {
    fn evaluate(&self, x: &[Float], _user_data: &mut ()) -> Result<Float, Infallible> {
        #[allow(clippy::suboptimal_flops)]
        Ok(x.windows(2)
            .map(|w| 100.0 * (w[1] - w[0].powi(2)).powi(2) + (1.0 - w[0]).powi(2))
            .sum())
    }
}
