/// [`ConfigError`] and [`PSOError`] types.
pub mod error;
/// [`Point`] type for defining an evaluated point in the parameter space.
pub mod point;
/// [`PSOSummary`] type for the result of a run.
pub mod summary;
/// Miscellaneous helpers, including the [`ReplaySource`] random source.
pub mod utils;

pub use error::{ConfigError, PSOError};
pub use point::Point;
pub use summary::PSOSummary;
pub use utils::ReplaySource;
