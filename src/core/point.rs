use crate::{DVector, Float};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt::Display};

/// Describes an evaluated point in parameter space.
///
/// Best-so-far records (personal, neighbor, and global bests) are stored as [`Point`]s and are
/// always replaced by a fresh copy when they improve, never edited in place.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct Point {
    /// the point's position
    pub x: DVector<Float>,
    /// the point's evaluation
    pub fx: Float,
}
impl Point {
    /// Create a new point from a position and its evaluation.
    pub const fn new(x: DVector<Float>, fx: Float) -> Self {
        Self { x, fx }
    }
    /// The dimension of the point's position.
    pub fn dimension(&self) -> usize {
        self.x.len()
    }
    /// Compare two points by their `fx` value.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.fx.total_cmp(&other.fx)
    }
    /// Returns `true` if this point is strictly better (lower) than `other`.
    pub fn improves_on(&self, other: &Self) -> bool {
        self.fx < other.fx
    }
    /// Convert the [`Point`] into a `(Vec<Float>, Float)` tuple.
    pub fn destructure(self) -> (Vec<Float>, Float) {
        (self.x.iter().copied().collect(), self.fx)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x: {:?}, f(x): {}", self.x.as_slice(), self.fx)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.fx == other.fx
    }
}
impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.fx.partial_cmp(&other.fx)
    }
}
