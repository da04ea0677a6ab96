use std::convert::Infallible;

use crate::{traits::CostFunction, Float};

/// The sphere function, a convex function with a single minimum.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^n x_i^2
/// ```
/// This function has a minimum at $`f(\vec{0}) = 0`$ in any number of dimensions.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sphere;
impl CostFunction for Sphere {
    fn evaluate(&self, x: &[Float], _user_data: &mut ()) -> Result<Float, Infallible> {
        Ok(x.iter().map(|xi| xi.powi(2)).sum())
    }
}
