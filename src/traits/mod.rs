/// Module containing the [`CostFunction`] trait.
pub mod cost_function;
/// Module containing the [`SwarmObserver`] trait.
pub mod observer;
/// Module containing the [`RandomSource`] trait.
pub mod random_source;
/// Module containing the [`Schedule`] and [`UpdateStrategy`] strategy traits.
pub mod schedule;
/// Module containing the [`Topology`] trait.
pub mod topology;

pub use cost_function::CostFunction;
pub use observer::SwarmObserver;
pub use random_source::RandomSource;
pub use schedule::{AlwaysUpdate, LinearSchedule, Schedule, ScheduleFn, UpdateFn, UpdateStrategy};
pub use topology::Topology;
