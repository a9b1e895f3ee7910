//! Route and visit types.

use serde::{Deserialize, Serialize};

/// A single stop on a route, with the battery levels the solution claims.
///
/// Reported charges are what the candidate solution states; the validator
/// recomputes them and compares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Node ID being visited.
    pub node_id: usize,
    /// Charge on arrival as reported by the solution.
    pub reported_arrival_charge: Option<f64>,
    /// Charge on departure as reported by the solution.
    pub reported_departure_charge: Option<f64>,
}

impl Visit {
    /// A visit without charge annotations.
    pub fn new(node_id: usize) -> Self {
        Self {
            node_id,
            reported_arrival_charge: None,
            reported_departure_charge: None,
        }
    }

    /// A visit annotated with arrival and departure charge.
    pub fn with_charges(node_id: usize, arrival: f64, departure: f64) -> Self {
        Self {
            node_id,
            reported_arrival_charge: Some(arrival),
            reported_departure_charge: Some(departure),
        }
    }
}

/// An ordered sequence of visits driven by a single vehicle.
///
/// A well-formed route starts and ends at the depot, and both depot visits
/// are stored in `visits`.
///
/// # Examples
///
/// ```
/// use u_evrp::models::{Route, Visit};
///
/// let route = Route::from_node_ids(&[0, 3, 7, 0]);
/// assert_eq!(route.len(), 4);
/// assert_eq!(route.first().map(|v| v.node_id), Some(0));
///
/// let mut annotated = Route::new();
/// annotated.push_visit(Visit::with_charges(0, 60.0, 60.0));
/// annotated.push_visit(Visit::new(3));
/// assert_eq!(annotated.node_ids(), vec![0, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    visits: Vec<Visit>,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a route of unannotated visits.
    pub fn from_node_ids(ids: &[usize]) -> Self {
        Self {
            visits: ids.iter().copied().map(Visit::new).collect(),
        }
    }

    /// Appends a visit.
    pub fn push_visit(&mut self, visit: Visit) {
        self.visits.push(visit);
    }

    /// The ordered visits.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of visits, depot visits included.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if the route has no visits.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// First visit.
    pub fn first(&self) -> Option<&Visit> {
        self.visits.first()
    }

    /// Last visit.
    pub fn last(&self) -> Option<&Visit> {
        self.visits.last()
    }

    /// Node IDs in visit order.
    pub fn node_ids(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.node_id).collect()
    }

    /// Consecutive `(from, to)` visit pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Visit, &Visit)> {
        self.visits.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

impl FromIterator<Visit> for Route {
    fn from_iter<I: IntoIterator<Item = Visit>>(iter: I) -> Self {
        Self {
            visits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_empty() {
        let r = Route::new();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert!(r.first().is_none());
        assert_eq!(r.segments().count(), 0);
    }

    #[test]
    fn test_route_segments() {
        let r = Route::from_node_ids(&[0, 5, 3, 0]);
        let pairs: Vec<_> = r.segments().map(|(a, b)| (a.node_id, b.node_id)).collect();
        assert_eq!(pairs, vec![(0, 5), (5, 3), (3, 0)]);
    }

    #[test]
    fn test_route_from_iter() {
        let r: Route = [Visit::with_charges(0, 10.0, 12.0), Visit::new(2)]
            .into_iter()
            .collect();
        assert_eq!(r.len(), 2);
        assert_eq!(r.visits()[0].reported_departure_charge, Some(12.0));
        assert_eq!(r.last().map(|v| v.node_id), Some(2));
    }

    #[test]
    fn test_visit_equality() {
        let a = Visit::with_charges(1, 10.0, 20.0);
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, Visit::new(1));
    }
}
