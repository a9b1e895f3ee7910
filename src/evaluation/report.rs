//! Violation, note, trace and report types.

use std::fmt;

use serde::Serialize;

/// A type of constraint violation found while walking a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationType {
    /// Route is empty or does not start and end at the depot.
    NotAnchoredAtDepot {
        /// The instance depot.
        depot_id: usize,
        /// First visited node, if any.
        first: Option<usize>,
        /// Last visited node, if any.
        last: Option<usize>,
    },
    /// Route references a node the instance does not declare.
    UnknownNode {
        /// The unknown node ID.
        node_id: usize,
    },
    /// No arc is declared between two consecutive visits.
    MissingEdge {
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
    },
    /// Charge fell below zero on the way to a node.
    BatteryDepleted {
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
        /// Computed charge on arrival.
        charge: f64,
        /// Energy consumed on the arc.
        consumed: f64,
    },
    /// Reported arrival charge differs from the computed one.
    ArrivalChargeMismatch {
        /// Node where the mismatch occurred.
        node_id: usize,
        /// Computed arrival charge.
        computed: f64,
        /// Charge stated by the solution.
        reported: f64,
    },
    /// Service starts after the node's time window closes.
    TimeWindowViolated {
        /// Node where the violation occurred.
        node_id: usize,
        /// Arrival time.
        arrival: f64,
        /// Service start (arrival or ready time, whichever is later).
        service_start: f64,
        /// Time window due date.
        due: f64,
    },
    /// Not enough cargo on board to make a customer's delivery.
    InsufficientLoad {
        /// Customer node.
        node_id: usize,
        /// Payload on arrival.
        load: f64,
        /// Delivery demand.
        delivery: f64,
    },
    /// Payload after pickup exceeds vehicle capacity.
    CapacityExceeded {
        /// Customer node.
        node_id: usize,
        /// Payload after service.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// Payload after service is negative.
    NegativeLoad {
        /// Customer node.
        node_id: usize,
        /// Payload after service.
        load: f64,
    },
    /// A reported charge is NaN or infinite.
    NonFiniteCharge {
        /// Visit carrying the value.
        node_id: usize,
        /// The reported value.
        value: f64,
    },
    /// A charging station visit states no departure charge.
    MissingDepartureCharge {
        /// Station node.
        node_id: usize,
    },
    /// Target charge exceeds battery capacity.
    ChargeAboveMaximum {
        /// Node where charging took place.
        node_id: usize,
        /// Stated departure charge.
        target: f64,
        /// Battery capacity.
        max_battery: f64,
    },
    /// Departure charge is below arrival charge with no way to discharge.
    ChargeDecrease {
        /// Node where the decrease occurred.
        node_id: usize,
        /// Charge before the stop.
        arrival: f64,
        /// Stated departure charge.
        departure: f64,
    },
    /// Charge gain requested while the recharging rate is not positive.
    ChargingUnavailable {
        /// Node where charging was requested.
        node_id: usize,
        /// Instance recharging rate.
        recharging_rate: f64,
        /// Requested gain.
        gain: f64,
    },
    /// Recomputed travel cost differs from the route header's cost.
    RouteCostMismatch {
        /// Recomputed travel cost.
        computed: f64,
        /// Reported travel cost.
        reported: f64,
    },
    /// Recomputed total cost differs from the trailer's total.
    TotalCostMismatch {
        /// Recomputed travel plus dispatch cost.
        computed: f64,
        /// Reported total cost.
        reported: f64,
    },
}

impl ViolationType {
    /// Returns `true` for violations that make the route meaningless to
    /// simulate (bad anchoring, unknown nodes, missing arcs).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::NotAnchoredAtDepot { .. } | Self::UnknownNode { .. } | Self::MissingEdge { .. }
        )
    }

    /// The node the violation is attributed to, if any.
    pub fn node_id(&self) -> Option<usize> {
        match self {
            Self::NotAnchoredAtDepot { .. }
            | Self::RouteCostMismatch { .. }
            | Self::TotalCostMismatch { .. } => None,
            Self::MissingEdge { to, .. } | Self::BatteryDepleted { to, .. } => Some(*to),
            Self::UnknownNode { node_id }
            | Self::ArrivalChargeMismatch { node_id, .. }
            | Self::TimeWindowViolated { node_id, .. }
            | Self::InsufficientLoad { node_id, .. }
            | Self::CapacityExceeded { node_id, .. }
            | Self::NegativeLoad { node_id, .. }
            | Self::NonFiniteCharge { node_id, .. }
            | Self::MissingDepartureCharge { node_id }
            | Self::ChargeAboveMaximum { node_id, .. }
            | Self::ChargeDecrease { node_id, .. }
            | Self::ChargingUnavailable { node_id, .. } => Some(*node_id),
        }
    }
}

fn fmt_node(node: &Option<usize>) -> String {
    node.map_or_else(|| String::from("None"), |id| id.to_string())
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnchoredAtDepot {
                depot_id,
                first,
                last,
            } => write!(
                f,
                "route must start and end at depot {depot_id}; starts at {}, ends at {}",
                fmt_node(first),
                fmt_node(last)
            ),
            Self::UnknownNode { node_id } => {
                write!(f, "node {node_id} is not declared in the instance")
            }
            Self::MissingEdge { from, to } => {
                write!(f, "missing distance/time data for segment {from} -> {to}")
            }
            Self::BatteryDepleted {
                from,
                to,
                charge,
                consumed,
            } => write!(
                f,
                "battery depleted before reaching node {to} from {from}: arrived with {charge:.2} (needed {consumed:.2})"
            ),
            Self::ArrivalChargeMismatch {
                node_id,
                computed,
                reported,
            } => write!(
                f,
                "node {node_id}: computed arrival charge {computed:.2} differs from reported {reported:.2}"
            ),
            Self::TimeWindowViolated {
                node_id,
                arrival,
                service_start,
                due,
            } => write!(
                f,
                "node {node_id}: service starts at {service_start:.2} after due date {due:.2} (arrived at {arrival:.2})"
            ),
            Self::InsufficientLoad {
                node_id,
                load,
                delivery,
            } => write!(
                f,
                "node {node_id}: insufficient load for delivery, load {load:.2}, delivery {delivery:.2}"
            ),
            Self::CapacityExceeded {
                node_id,
                load,
                capacity,
            } => write!(
                f,
                "node {node_id}: load {load:.2} exceeds capacity {capacity:.2} after pickup"
            ),
            Self::NegativeLoad { node_id, load } => {
                write!(f, "node {node_id}: negative load {load:.2}")
            }
            Self::NonFiniteCharge { node_id, value } => {
                write!(f, "node {node_id}: reported charge {value} is not a finite number")
            }
            Self::MissingDepartureCharge { node_id } => {
                write!(f, "charging station {node_id}: no departure charge given")
            }
            Self::ChargeAboveMaximum {
                node_id,
                target,
                max_battery,
            } => write!(
                f,
                "node {node_id}: departure charge {target:.2} exceeds battery capacity {max_battery:.2}"
            ),
            Self::ChargeDecrease {
                node_id,
                arrival,
                departure,
            } => write!(
                f,
                "node {node_id}: departure charge {departure:.2} is below arrival charge {arrival:.2}"
            ),
            Self::ChargingUnavailable {
                node_id,
                recharging_rate,
                gain,
            } => write!(
                f,
                "node {node_id}: recharging rate is {recharging_rate}, cannot gain charge {gain:.2}"
            ),
            Self::RouteCostMismatch { computed, reported } => write!(
                f,
                "route cost mismatch: computed {computed:.2}, reported {reported:.2}"
            ),
            Self::TotalCostMismatch { computed, reported } => write!(
                f,
                "total cost mismatch: computed {computed:.2}, reported {reported:.2}"
            ),
        }
    }
}

/// A constraint violation in a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }

    /// See [`ViolationType::is_structural`].
    pub fn is_structural(&self) -> bool {
        self.kind.is_structural()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Informational finding that never affects feasibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Note {
    /// The first visit reports no charge; a full battery is assumed.
    AssumedFullCharge { depot_id: usize, charge: f64 },
    /// The route departs with a reported charge other than a full battery.
    InitialChargeNotFull {
        depot_id: usize,
        charge: f64,
        max_battery: f64,
    },
    /// The closing depot visit reports a charge that differs from the
    /// computed one.
    FinalChargeMismatch {
        node_id: usize,
        computed: f64,
        reported: f64,
    },
    /// The route header's node count differs from the parsed visit count.
    NodeCountMismatch { reported: usize, actual: usize },
    /// The solution states a vehicle count other than one; only the single
    /// route is checked.
    VehicleCountMismatch { reported: usize },
    /// No total cost was reported, so it could not be checked.
    TotalCostUnverified { computed: f64 },
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssumedFullCharge { depot_id, charge } => write!(
                f,
                "no initial charge reported at depot {depot_id}, assuming full charge {charge:.2}"
            ),
            Self::InitialChargeNotFull {
                depot_id,
                charge,
                max_battery,
            } => write!(
                f,
                "initial charge at depot {depot_id} is {charge:.2}, battery capacity is {max_battery:.2}"
            ),
            Self::FinalChargeMismatch {
                node_id,
                computed,
                reported,
            } => write!(
                f,
                "final depot {node_id}: computed arrival charge {computed:.2} differs from reported {reported:.2}"
            ),
            Self::NodeCountMismatch { reported, actual } => write!(
                f,
                "route header states {reported} nodes, sequence has {actual}"
            ),
            Self::VehicleCountMismatch { reported } => write!(
                f,
                "solution states {reported} vehicles, only one route is validated"
            ),
            Self::TotalCostUnverified { computed } => write!(
                f,
                "total cost not reported; computed total is {computed:.2}"
            ),
        }
    }
}

/// Simulation state when the vehicle leaves the depot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StartState {
    pub depot_id: usize,
    /// Departure time, including any pre-departure charging.
    pub time: f64,
    /// Departure charge.
    pub charge: f64,
    /// Departure payload.
    pub payload: f64,
}

/// Simulated state for one traversed arc and the service at its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentTrace {
    pub from: usize,
    pub to: usize,
    pub distance: f64,
    pub travel_time: f64,
    /// Energy consumed on the arc.
    pub energy: f64,
    pub arrival_time: f64,
    pub service_start: f64,
    /// Time the vehicle leaves `to` (arrival time at the closing depot).
    pub departure_time: f64,
    pub arrival_charge: f64,
    pub departure_charge: f64,
    /// Payload after service at `to`.
    pub payload: f64,
}

/// Outcome of validating one route.
///
/// Violations are kept in the order they were found. Cost figures are only
/// present when the walk reached the closing depot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    feasible: bool,
    violations: Vec<Violation>,
    notes: Vec<Note>,
    start: Option<StartState>,
    trace: Vec<SegmentTrace>,
    travel_cost: Option<f64>,
    total_cost: Option<f64>,
}

impl ValidationReport {
    pub(crate) fn new() -> Self {
        Self {
            feasible: true,
            violations: Vec::new(),
            notes: Vec::new(),
            start: None,
            trace: Vec::new(),
            travel_cost: None,
            total_cost: None,
        }
    }

    pub(crate) fn push_violation(&mut self, kind: ViolationType) {
        self.feasible = false;
        self.violations.push(Violation::new(kind));
    }

    pub(crate) fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub(crate) fn set_start(&mut self, start: StartState) {
        self.start = Some(start);
    }

    pub(crate) fn push_trace(&mut self, segment: SegmentTrace) {
        self.trace.push(segment);
    }

    pub(crate) fn set_costs(&mut self, travel_cost: f64, total_cost: f64) {
        self.travel_cost = Some(travel_cost);
        self.total_cost = Some(total_cost);
    }

    /// `true` iff no violations were recorded.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Violations in discovery order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Non-fatal findings.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// State at departure from the depot, if the route passed the structural
    /// checks.
    pub fn start(&self) -> Option<&StartState> {
        self.start.as_ref()
    }

    /// Per-arc simulated state, one entry per traversed arc.
    pub fn trace(&self) -> &[SegmentTrace] {
        &self.trace
    }

    /// Recomputed travel cost, if the walk completed.
    pub fn travel_cost(&self) -> Option<f64> {
        self.travel_cost
    }

    /// Recomputed travel plus dispatch cost, if the walk completed.
    pub fn total_cost(&self) -> Option<f64> {
        self.total_cost
    }

    /// Returns `true` if the simulation reached the end of the route.
    pub fn is_complete(&self) -> bool {
        self.travel_cost.is_some()
    }
}
