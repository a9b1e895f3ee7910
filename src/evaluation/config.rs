//! Validation tolerance and modelling policies.

use serde::{Deserialize, Serialize};

use crate::models::{Node, NodeKind};

/// Absolute tolerance applied to every charge, time, load and cost comparison.
pub const DEFAULT_EPSILON: f64 = 1e-2;

/// How much cargo the vehicle carries when it leaves the depot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreloadPolicy {
    /// Load the total delivery demand of every customer visit on the route.
    ///
    /// Single vehicle, single route: everything delivered along the way is
    /// on board at departure, and pickups accumulate on top.
    RouteDeliveries,
    /// Depart with a fixed payload.
    Fixed(f64),
}

impl PreloadPolicy {
    /// Payload at departure for a route visiting `nodes` in order.
    ///
    /// Customers visited more than once contribute their delivery each time.
    pub fn initial_payload<'a, I>(&self, nodes: I) -> f64
    where
        I: IntoIterator<Item = &'a Node>,
    {
        match self {
            Self::RouteDeliveries => nodes
                .into_iter()
                .filter(|n| n.kind() == NodeKind::Customer)
                .map(Node::delivery)
                .sum(),
            Self::Fixed(amount) => *amount,
        }
    }
}

/// How an arrival-charge mismatch at the closing depot visit is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalChargePolicy {
    /// Record a note; feasibility is unaffected.
    Informational,
    /// Record an arrival-charge violation like at any other node.
    Enforced,
}

/// Settings for [`RouteValidator`](super::RouteValidator).
///
/// # Examples
///
/// ```
/// use u_evrp::evaluation::{FinalChargePolicy, PreloadPolicy, ValidationConfig};
///
/// let config = ValidationConfig::default()
///     .with_epsilon(1e-3)
///     .with_final_charge(FinalChargePolicy::Enforced);
/// assert_eq!(config.epsilon, 1e-3);
/// assert_eq!(config.preload, PreloadPolicy::RouteDeliveries);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Comparison tolerance.
    pub epsilon: f64,
    /// Payload at departure.
    pub preload: PreloadPolicy,
    /// Treatment of the final depot's reported arrival charge.
    pub final_charge: FinalChargePolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            preload: PreloadPolicy::RouteDeliveries,
            final_charge: FinalChargePolicy::Informational,
        }
    }
}

impl ValidationConfig {
    /// Sets the comparison tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the preload policy.
    pub fn with_preload(mut self, preload: PreloadPolicy) -> Self {
        self.preload = preload;
        self
    }

    /// Sets the final depot charge policy.
    pub fn with_final_charge(mut self, policy: FinalChargePolicy) -> Self {
        self.final_charge = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn nodes() -> Vec<Node> {
        let tw = TimeWindow::new(0.0, 100.0).expect("valid");
        vec![
            Node::depot(0, 0.0, 0.0, tw),
            Node::customer(1, 0.0, 0.0, tw).with_demand(19.0, 4.0),
            Node::station(2, 0.0, 0.0, tw),
            Node::customer(3, 0.0, 0.0, tw).with_demand(2.0, 27.0),
        ]
    }

    #[test]
    fn test_route_deliveries_sums_customers_only() {
        let ns = nodes();
        let payload = PreloadPolicy::RouteDeliveries.initial_payload(&ns);
        assert!((payload - 21.0).abs() < 1e-10);
    }

    #[test]
    fn test_route_deliveries_counts_repeats() {
        let ns = nodes();
        let repeated = [&ns[0], &ns[1], &ns[1], &ns[0]];
        let payload = PreloadPolicy::RouteDeliveries.initial_payload(repeated);
        assert!((payload - 38.0).abs() < 1e-10);
    }

    #[test]
    fn test_fixed_preload() {
        assert_eq!(PreloadPolicy::Fixed(7.5).initial_payload(&nodes()), 7.5);
    }

    #[test]
    fn test_default_config() {
        let c = ValidationConfig::default();
        assert_eq!(c.epsilon, DEFAULT_EPSILON);
        assert_eq!(c.preload, PreloadPolicy::RouteDeliveries);
        assert_eq!(c.final_charge, FinalChargePolicy::Informational);
    }

    #[test]
    fn test_config_from_partial_json() {
        let c: ValidationConfig =
            serde_json::from_str(r#"{"epsilon": 0.001, "preload": {"fixed": 40.0}}"#)
                .expect("valid json");
        assert_eq!(c.epsilon, 0.001);
        assert_eq!(c.preload, PreloadPolicy::Fixed(40.0));
        assert_eq!(c.final_charge, FinalChargePolicy::Informational);
    }
}
