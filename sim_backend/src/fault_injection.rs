//! Deterministic fault injection for testing
//!
//! Lets tests make the simulated backend fail specific routes a set number of
//! times.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: No randomness; faults fire in plan order
//! - **Composable**: Several faults can target the same or different routes
//! - **Test-focused**: Not intended for production use
//!
//! ## Example
//!
//! ```
//! use sim_backend::fault_injection::{FaultPlan, RouteFault};
//! use services_network::BackendRoute;
//!
//! let plan = FaultPlan::new()
//!     .with_fault(RouteFault::FailNext { route: BackendRoute::ListBucketContents, count: 1, status: 500 })
//!     .with_fault(RouteFault::DisconnectNext { route: BackendRoute::QuickPreview, count: 2 });
//! ```

use services_network::BackendRoute;

/// A fault to inject into request handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteFault {
    /// Answer the next N requests on `route` with `status`
    FailNext {
        route: BackendRoute,
        count: usize,
        status: u16,
    },

    /// Fail the next N requests on `route` below HTTP
    DisconnectNext { route: BackendRoute, count: usize },

    /// Time out the next N requests on `route`
    TimeoutNext { route: BackendRoute, count: usize },
}

/// What the injector decided for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultAction {
    Status(u16),
    Disconnect,
    Timeout,
}

/// A plan describing all faults to inject
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<RouteFault>,
}

impl FaultPlan {
    /// Creates a new empty fault plan
    pub fn new() -> Self {
        Self { faults: Vec::new() }
    }

    /// Adds a fault to the plan
    pub fn with_fault(mut self, fault: RouteFault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Faults in plan order
    pub fn faults(&self) -> &[RouteFault] {
        &self.faults
    }
}

/// Applies a [`FaultPlan`] to incoming requests
#[derive(Debug, Default)]
pub struct FaultInjector {
    // (route, remaining, action) in plan order
    remaining: Vec<(BackendRoute, usize, FaultAction)>,
    injected: usize,
}

impl FaultInjector {
    /// Creates an injector with the given plan
    pub fn new(plan: FaultPlan) -> Self {
        let remaining = plan
            .faults()
            .iter()
            .map(|fault| match *fault {
                RouteFault::FailNext {
                    route,
                    count,
                    status,
                } => (route, count, FaultAction::Status(status)),
                RouteFault::DisconnectNext { route, count } => {
                    (route, count, FaultAction::Disconnect)
                }
                RouteFault::TimeoutNext { route, count } => (route, count, FaultAction::Timeout),
            })
            .collect();
        Self {
            remaining,
            injected: 0,
        }
    }

    /// Returns the fault for the next request on `route`, if any
    pub fn next_fault(&mut self, route: BackendRoute) -> Option<FaultAction> {
        let slot = self
            .remaining
            .iter_mut()
            .find(|(target, count, _)| *target == route && *count > 0)?;
        slot.1 -= 1;
        self.injected += 1;
        Some(slot.2)
    }

    /// Number of faults injected so far
    pub fn injected(&self) -> usize {
        self.injected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_plan_creation() {
        assert!(FaultPlan::new().faults().is_empty());
    }

    #[test]
    fn test_fail_next_counts_down() {
        let plan = FaultPlan::new().with_fault(RouteFault::FailNext {
            route: BackendRoute::ListBuckets,
            count: 2,
            status: 403,
        });
        let mut injector = FaultInjector::new(plan);

        assert_eq!(
            injector.next_fault(BackendRoute::ListBuckets),
            Some(FaultAction::Status(403))
        );
        assert_eq!(
            injector.next_fault(BackendRoute::ListBuckets),
            Some(FaultAction::Status(403))
        );
        assert_eq!(injector.next_fault(BackendRoute::ListBuckets), None);
        assert_eq!(injector.injected(), 2);
    }

    #[test]
    fn test_faults_are_per_route() {
        let plan = FaultPlan::new().with_fault(RouteFault::DisconnectNext {
            route: BackendRoute::QuickPreview,
            count: 1,
        });
        let mut injector = FaultInjector::new(plan);

        assert_eq!(injector.next_fault(BackendRoute::ListBucketContents), None);
        assert_eq!(
            injector.next_fault(BackendRoute::QuickPreview),
            Some(FaultAction::Disconnect)
        );
    }

    #[test]
    fn test_faults_fire_in_plan_order() {
        let plan = FaultPlan::new()
            .with_fault(RouteFault::TimeoutNext {
                route: BackendRoute::VerifyCredentials,
                count: 1,
            })
            .with_fault(RouteFault::FailNext {
                route: BackendRoute::VerifyCredentials,
                count: 1,
                status: 500,
            });
        let mut injector = FaultInjector::new(plan);

        assert_eq!(
            injector.next_fault(BackendRoute::VerifyCredentials),
            Some(FaultAction::Timeout)
        );
        assert_eq!(
            injector.next_fault(BackendRoute::VerifyCredentials),
            Some(FaultAction::Status(500))
        );
        assert_eq!(injector.next_fault(BackendRoute::VerifyCredentials), None);
    }
}
