//! Static problem instance: vehicle parameters, nodes, arcs and depots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::distance::{Edge, EdgeTable};
use crate::error::InstanceError;

use super::{Node, NodeKind, TimeWindow};

/// Vehicle, battery and cost parameters shared by every route.
///
/// # Examples
///
/// ```
/// use u_evrp::models::VehicleParams;
///
/// let p = VehicleParams::new(1000.0, 60.63)
///     .with_consumption_rate(1.0)
///     .with_recharging_rate(0.49)
///     .with_dispatch_cost(1000.0);
/// assert_eq!(p.capacity(), 1000.0);
/// assert_eq!(p.unit_cost(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    capacity: f64,
    max_battery: f64,
    consumption_rate: f64,
    recharging_rate: f64,
    unit_cost: f64,
    dispatch_cost: f64,
}

impl VehicleParams {
    /// Creates parameters with the given payload and battery capacity.
    ///
    /// Default: consumption 1 per unit distance, recharging 1 time unit per
    /// unit of charge, unit cost 1, no dispatch cost.
    pub fn new(capacity: f64, max_battery: f64) -> Self {
        Self {
            capacity,
            max_battery,
            consumption_rate: 1.0,
            recharging_rate: 1.0,
            unit_cost: 1.0,
            dispatch_cost: 0.0,
        }
    }

    /// Sets energy consumed per unit distance.
    pub fn with_consumption_rate(mut self, rate: f64) -> Self {
        self.consumption_rate = rate;
        self
    }

    /// Sets time spent per unit of charge gained.
    pub fn with_recharging_rate(mut self, rate: f64) -> Self {
        self.recharging_rate = rate;
        self
    }

    /// Sets cost per unit distance.
    pub fn with_unit_cost(mut self, cost: f64) -> Self {
        self.unit_cost = cost;
        self
    }

    /// Sets the fixed cost of dispatching a vehicle.
    pub fn with_dispatch_cost(mut self, cost: f64) -> Self {
        self.dispatch_cost = cost;
        self
    }

    /// Maximum payload.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Battery capacity.
    pub fn max_battery(&self) -> f64 {
        self.max_battery
    }

    /// Energy consumed per unit distance.
    pub fn consumption_rate(&self) -> f64 {
        self.consumption_rate
    }

    /// Time per unit of charge gained.
    pub fn recharging_rate(&self) -> f64 {
        self.recharging_rate
    }

    /// Cost per unit distance.
    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    /// Fixed cost per dispatched vehicle.
    pub fn dispatch_cost(&self) -> f64 {
        self.dispatch_cost
    }

    fn check(&self) -> Result<(), InstanceError> {
        let values = [
            ("capacity", self.capacity),
            ("max_battery", self.max_battery),
            ("consumption_rate", self.consumption_rate),
            ("unit_cost", self.unit_cost),
            ("dispatch_cost", self.dispatch_cost),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(InstanceError::InvalidParameter { name, value });
            }
        }
        // A non-positive recharging rate is legal; it makes charging impossible.
        if !self.recharging_rate.is_finite() {
            return Err(InstanceError::InvalidParameter {
                name: "recharging_rate",
                value: self.recharging_rate,
            });
        }
        Ok(())
    }
}

/// An immutable EVRP-TW-SPD instance.
///
/// Built through [`Instance::new`], which enforces unique node IDs,
/// non-negative arcs between declared nodes, and a non-empty depot list.
///
/// # Examples
///
/// ```
/// use u_evrp::distance::{Edge, EdgeTable};
/// use u_evrp::models::{Instance, Node, TimeWindow, VehicleParams};
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let nodes = vec![Node::depot(0, 0.0, 0.0, tw), Node::customer(1, 3.0, 4.0, tw)];
/// let mut edges = EdgeTable::new();
/// edges.insert(0, 1, Edge::new(5.0, 5.0));
/// edges.insert(1, 0, Edge::new(5.0, 5.0));
///
/// let instance = Instance::new(VehicleParams::new(100.0, 50.0), nodes, edges, vec![]).unwrap();
/// assert_eq!(instance.depot_id(), 0);
/// assert_eq!(instance.num_nodes(), 2);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    name: Option<String>,
    vehicles: Option<usize>,
    params: VehicleParams,
    nodes: BTreeMap<usize, Node>,
    edges: EdgeTable,
    depots: Vec<usize>,
}

impl Instance {
    /// Creates an instance, checking construction invariants.
    ///
    /// An empty `depots` list falls back to `[0]` when node 0 is a depot.
    pub fn new(
        params: VehicleParams,
        nodes: Vec<Node>,
        edges: EdgeTable,
        depots: Vec<usize>,
    ) -> Result<Self, InstanceError> {
        params.check()?;

        let mut by_id = BTreeMap::new();
        for node in nodes {
            check_node(&node)?;
            let id = node.id();
            if by_id.insert(id, node).is_some() {
                return Err(InstanceError::DuplicateNode(id));
            }
        }

        for (from, to, edge) in edges.iter() {
            if !edge.is_valid() {
                return Err(InstanceError::InvalidEdge {
                    from,
                    to,
                    distance: edge.distance,
                    travel_time: edge.travel_time,
                });
            }
            if !by_id.contains_key(&from) || !by_id.contains_key(&to) {
                return Err(InstanceError::DanglingEdge { from, to });
            }
        }

        let depots = if depots.is_empty() {
            match by_id.get(&0) {
                Some(node) if node.kind() == NodeKind::Depot => vec![0],
                _ => return Err(InstanceError::NoDepot),
            }
        } else {
            depots
        };
        for &id in &depots {
            if by_id.get(&id).map(Node::kind) != Some(NodeKind::Depot) {
                return Err(InstanceError::InvalidDepot(id));
            }
        }

        Ok(Self {
            name: None,
            vehicles: None,
            params,
            nodes: by_id,
            edges,
            depots,
        })
    }

    /// Sets the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the declared fleet size.
    pub fn with_vehicles(mut self, vehicles: usize) -> Self {
        self.vehicles = Some(vehicles);
        self
    }

    /// Instance name, if declared.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared fleet size, if any. Validation always assumes one vehicle.
    pub fn vehicles(&self) -> Option<usize> {
        self.vehicles
    }

    /// Vehicle, battery and cost parameters.
    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// The depot every route starts and ends at (first declared depot).
    pub fn depot_id(&self) -> usize {
        self.depots[0]
    }

    /// All declared depots.
    pub fn depots(&self) -> &[usize] {
        &self.depots
    }

    /// Looks up a node by ID.
    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Iterates over nodes in ascending ID order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Looks up the arc `from -> to`.
    pub fn edge(&self, from: usize, to: usize) -> Option<&Edge> {
        self.edges.get(from, to)
    }

    /// The full arc table.
    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }
}

fn check_node(node: &Node) -> Result<(), InstanceError> {
    let id = node.id();
    let tw = node.time_window();
    if TimeWindow::new(tw.ready(), tw.due()).is_none() {
        return Err(InstanceError::InvalidTimeWindow {
            id,
            ready: tw.ready(),
            due: tw.due(),
        });
    }
    let values = [
        ("delivery", node.delivery()),
        ("pickup", node.pickup()),
        ("service_time", node.service_time()),
    ];
    for (field, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(InstanceError::InvalidNodeValue { id, field, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tw() -> TimeWindow {
        TimeWindow::new(0.0, 100.0).expect("valid")
    }

    fn nodes() -> Vec<Node> {
        vec![
            Node::depot(0, 0.0, 0.0, tw()),
            Node::customer(1, 3.0, 4.0, tw()).with_demand(5.0, 2.0),
            Node::station(2, 0.0, 8.0, tw()),
        ]
    }

    fn params() -> VehicleParams {
        VehicleParams::new(100.0, 50.0)
    }

    #[test]
    fn test_params_builder() {
        let p = VehicleParams::new(200.0, 80.0)
            .with_consumption_rate(1.2)
            .with_recharging_rate(3.39)
            .with_unit_cost(2.0)
            .with_dispatch_cost(500.0);
        assert_eq!(p.capacity(), 200.0);
        assert_eq!(p.max_battery(), 80.0);
        assert_eq!(p.consumption_rate(), 1.2);
        assert_eq!(p.recharging_rate(), 3.39);
        assert_eq!(p.unit_cost(), 2.0);
        assert_eq!(p.dispatch_cost(), 500.0);
    }

    #[test]
    fn test_instance_default_depot() {
        let inst = Instance::new(params(), nodes(), EdgeTable::from_nodes(&nodes()), vec![])
            .expect("valid");
        assert_eq!(inst.depot_id(), 0);
        assert_eq!(inst.depots(), &[0]);
        assert_eq!(inst.num_nodes(), 3);
        assert!(inst.edge(0, 1).is_some());
        assert_eq!(inst.nodes().map(Node::id).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_instance_no_depot() {
        let ns = vec![Node::customer(0, 0.0, 0.0, tw())];
        let err = Instance::new(params(), ns, EdgeTable::new(), vec![]).unwrap_err();
        assert_eq!(err, InstanceError::NoDepot);
    }

    #[test]
    fn test_instance_depot_must_be_depot_kind() {
        let err = Instance::new(params(), nodes(), EdgeTable::new(), vec![1]).unwrap_err();
        assert_eq!(err, InstanceError::InvalidDepot(1));
    }

    #[test]
    fn test_instance_duplicate_node() {
        let mut ns = nodes();
        ns.push(Node::customer(1, 9.0, 9.0, tw()));
        let err = Instance::new(params(), ns, EdgeTable::new(), vec![]).unwrap_err();
        assert_eq!(err, InstanceError::DuplicateNode(1));
    }

    #[test]
    fn test_instance_negative_edge() {
        let mut edges = EdgeTable::new();
        edges.insert(0, 1, Edge::new(-1.0, 1.0));
        let err = Instance::new(params(), nodes(), edges, vec![]).unwrap_err();
        assert!(matches!(err, InstanceError::InvalidEdge { from: 0, to: 1, .. }));
    }

    #[test]
    fn test_instance_dangling_edge() {
        let mut edges = EdgeTable::new();
        edges.insert(0, 7, Edge::new(1.0, 1.0));
        let err = Instance::new(params(), nodes(), edges, vec![]).unwrap_err();
        assert_eq!(err, InstanceError::DanglingEdge { from: 0, to: 7 });
    }

    #[test]
    fn test_instance_negative_demand() {
        let ns = vec![
            Node::depot(0, 0.0, 0.0, tw()),
            Node::customer(1, 0.0, 0.0, tw()).with_demand(-1.0, 0.0),
        ];
        let err = Instance::new(params(), ns, EdgeTable::new(), vec![]).unwrap_err();
        assert!(matches!(
            err,
            InstanceError::InvalidNodeValue {
                id: 1,
                field: "delivery",
                ..
            }
        ));
    }

    #[test]
    fn test_instance_invalid_params() {
        let err = Instance::new(
            VehicleParams::new(-1.0, 50.0),
            nodes(),
            EdgeTable::new(),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InstanceError::InvalidParameter {
                name: "capacity",
                ..
            }
        ));

        // zero recharging rate is allowed
        let p = params().with_recharging_rate(0.0);
        assert!(Instance::new(p, nodes(), EdgeTable::new(), vec![]).is_ok());
    }

    #[test]
    fn test_instance_metadata() {
        let inst = Instance::new(params(), nodes(), EdgeTable::new(), vec![0])
            .expect("valid")
            .with_name("r202C15")
            .with_vehicles(25);
        assert_eq!(inst.name(), Some("r202C15"));
        assert_eq!(inst.vehicles(), Some(25));
    }
}
