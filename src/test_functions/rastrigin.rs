use std::convert::Infallible;

use crate::{traits::CostFunction, Float, PI};

/// The Rastrigin function, a non-convex function with a single minimum but many local minima.
///
/// ```math
/// f(\vec{x}) = 10n + \sum_{i=1}^n (x_i^2 - 10cos(2\pi x_i))
/// ```
/// The usual search box is $`x_i \in [-5.12, 5.12]`$ and the minimum is $`f(\vec{0}) = 0`$.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rastrigin;
impl CostFunction for Rastrigin {
    fn evaluate(&self, x: &[Float], _user_data: &mut ()) -> Result<Float, Infallible> {
        #[allow(clippy::suboptimal_flops)]
        Ok(10.0 * x.len() as Float
            + x.iter()
                .map(|xi| xi.powi(2) - 10.0 * Float::cos(2.0 * PI * xi))
                .sum::<Float>())
    }
}
