//! Candidate solution type.

use serde::{Deserialize, Serialize};

use super::Route;

/// A single-route candidate solution together with the figures it reports
/// about itself.
///
/// # Examples
///
/// ```
/// use u_evrp::models::{Route, Solution};
///
/// let sol = Solution::new(Route::from_node_ids(&[0, 1, 0]), 10.0)
///     .with_total_cost(1010.0);
/// assert_eq!(sol.reported_segment_cost(), 10.0);
/// assert_eq!(sol.reported_total_cost(), Some(1010.0));
/// assert_eq!(sol.route_id(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    route: Route,
    route_id: usize,
    reported_node_count: Option<usize>,
    reported_segment_cost: f64,
    reported_vehicle_count: Option<usize>,
    reported_total_cost: Option<f64>,
}

impl Solution {
    /// Creates a solution with the route's reported travel cost.
    pub fn new(route: Route, reported_segment_cost: f64) -> Self {
        Self {
            route,
            route_id: 0,
            reported_node_count: None,
            reported_segment_cost,
            reported_vehicle_count: None,
            reported_total_cost: None,
        }
    }

    /// Sets the route identifier.
    pub fn with_route_id(mut self, id: usize) -> Self {
        self.route_id = id;
        self
    }

    /// Sets the node count stated in the route header.
    pub fn with_node_count(mut self, count: usize) -> Self {
        self.reported_node_count = Some(count);
        self
    }

    /// Sets the vehicle count stated by the solution.
    pub fn with_vehicle_count(mut self, count: usize) -> Self {
        self.reported_vehicle_count = Some(count);
        self
    }

    /// Sets the reported total cost (travel plus dispatch).
    pub fn with_total_cost(mut self, cost: f64) -> Self {
        self.reported_total_cost = Some(cost);
        self
    }

    /// The route under validation.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Route identifier from the header.
    pub fn route_id(&self) -> usize {
        self.route_id
    }

    /// Node count stated in the route header, if any.
    pub fn reported_node_count(&self) -> Option<usize> {
        self.reported_node_count
    }

    /// Travel cost stated in the route header.
    pub fn reported_segment_cost(&self) -> f64 {
        self.reported_segment_cost
    }

    /// Vehicle count stated by the solution, if any.
    pub fn reported_vehicle_count(&self) -> Option<usize> {
        self.reported_vehicle_count
    }

    /// Total cost stated in the trailer, if any.
    pub fn reported_total_cost(&self) -> Option<f64> {
        self.reported_total_cost
    }
}
