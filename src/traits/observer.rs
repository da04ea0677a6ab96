use parking_lot::{Mutex, RwLock};
use std::{cell::RefCell, rc::Rc, sync::Arc};

use crate::algorithms::particles::SwarmStatus;

/// A trait for observers which are notified as a [`PSO`](crate::algorithms::particles::PSO) run
/// progresses.
///
/// Notifications are fire-and-forget: observers can read the [`SwarmStatus`] and the user data
/// but cannot change the course of the run. Both methods do nothing by default.
pub trait SwarmObserver<U> {
    /// Called after the population statistics pass of each iteration, before any particle moves.
    #[allow(unused_variables)]
    fn on_population_updated(&mut self, status: &SwarmStatus, user_data: &U) {}
    /// Called at the end of each iteration, after the particles have moved and before the stop
    /// criteria are checked.
    #[allow(unused_variables)]
    fn on_iteration(&mut self, status: &SwarmStatus, user_data: &U) {}
}

impl<O, U> SwarmObserver<U> for Rc<RefCell<O>>
where
    O: SwarmObserver<U>,
{
    fn on_population_updated(&mut self, status: &SwarmStatus, user_data: &U) {
        self.borrow_mut().on_population_updated(status, user_data)
    }
    fn on_iteration(&mut self, status: &SwarmStatus, user_data: &U) {
        self.borrow_mut().on_iteration(status, user_data)
    }
}
impl<O, U> SwarmObserver<U> for Rc<RwLock<O>>
where
    O: SwarmObserver<U>,
{
    fn on_population_updated(&mut self, status: &SwarmStatus, user_data: &U) {
        self.write().on_population_updated(status, user_data)
    }
    fn on_iteration(&mut self, status: &SwarmStatus, user_data: &U) {
        self.write().on_iteration(status, user_data)
    }
}
impl<O, U> SwarmObserver<U> for Arc<RwLock<O>>
where
    O: SwarmObserver<U>,
{
    fn on_population_updated(&mut self, status: &SwarmStatus, user_data: &U) {
        self.write().on_population_updated(status, user_data)
    }
    fn on_iteration(&mut self, status: &SwarmStatus, user_data: &U) {
        self.write().on_iteration(status, user_data)
    }
}
impl<O, U> SwarmObserver<U> for Arc<Mutex<O>>
where
    O: SwarmObserver<U>,
{
    fn on_population_updated(&mut self, status: &SwarmStatus, user_data: &U) {
        self.lock().on_population_updated(status, user_data)
    }
    fn on_iteration(&mut self, status: &SwarmStatus, user_data: &U) {
        self.lock().on_iteration(status, user_data)
    }
}
