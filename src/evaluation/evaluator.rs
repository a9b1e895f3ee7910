//! Route validator that simulates time, charge and payload along a route.

use tracing::{debug, info, warn};

use crate::models::{Instance, Node, NodeKind, Route, Solution, Visit};

use super::config::{FinalChargePolicy, ValidationConfig};
use super::report::{Note, SegmentTrace, StartState, ValidationReport, ViolationType};

/// Mutable state of the vehicle during one validation pass.
#[derive(Debug, Clone, Copy)]
struct Vehicle {
    time: f64,
    charge: f64,
    payload: f64,
    travel_cost: f64,
}

/// Validates single-vehicle EVRP-TW-SPD routes against an instance.
///
/// Walks the route arc by arc, tracking elapsed time, battery charge and
/// payload, and records every constraint violated. The walk stops after the
/// first arc that produced a violation; costs are only reconciled when the
/// route was walked to the end.
///
/// # Examples
///
/// ```
/// use u_evrp::distance::EdgeTable;
/// use u_evrp::evaluation::RouteValidator;
/// use u_evrp::models::{Instance, Node, Route, Solution, TimeWindow, VehicleParams};
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0, tw),
///     Node::customer(1, 3.0, 4.0, tw).with_demand(10.0, 5.0),
/// ];
/// let edges = EdgeTable::from_nodes(&nodes);
/// let params = VehicleParams::new(50.0, 20.0).with_dispatch_cost(100.0);
/// let instance = Instance::new(params, nodes, edges, vec![0]).unwrap();
///
/// let solution = Solution::new(Route::from_node_ids(&[0, 1, 0]), 10.0).with_total_cost(110.0);
/// let report = RouteValidator::new(&instance).validate(&solution);
/// assert!(report.is_feasible());
/// assert_eq!(report.trace().len(), 2);
/// ```
pub struct RouteValidator<'a> {
    instance: &'a Instance,
    config: ValidationConfig,
}

impl<'a> RouteValidator<'a> {
    /// Creates a validator with the default configuration.
    pub fn new(instance: &'a Instance) -> Self {
        Self::with_config(instance, ValidationConfig::default())
    }

    /// Creates a validator with the given configuration.
    pub fn with_config(instance: &'a Instance, config: ValidationConfig) -> Self {
        Self { instance, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a solution, returning the verdict, violations, notes and
    /// per-arc trace.
    pub fn validate(&self, solution: &Solution) -> ValidationReport {
        let mut report = ValidationReport::new();
        let route = solution.route();

        let nodes = match self.resolve(route) {
            Ok(nodes) => nodes,
            Err(kind) => {
                warn!(violation = %kind, "route rejected");
                report.push_violation(kind);
                return report;
            }
        };

        if let Some(reported) = solution.reported_node_count() {
            if reported != route.len() {
                report.push_note(Note::NodeCountMismatch {
                    reported,
                    actual: route.len(),
                });
            }
        }

        if let Some(reported) = solution.reported_vehicle_count() {
            if reported != 1 {
                report.push_note(Note::VehicleCountMismatch { reported });
            }
        }

        let mut vehicle = self.depart(route.visits()[0], nodes[0], &nodes, &mut report);
        if !report.is_feasible() {
            self.finish(&report);
            return report;
        }

        let last = route.len() - 1;
        for (i, (from, to)) in route.segments().enumerate() {
            let found = report.violations().len();
            if !self.advance(&mut vehicle, from, to, nodes[i + 1], i + 1 == last, &mut report) {
                self.finish(&report);
                return report;
            }
            if report.violations().len() > found {
                self.finish(&report);
                return report;
            }
        }

        self.reconcile_costs(&vehicle, solution, &mut report);
        self.finish(&report);
        report
    }

    /// Checks depot anchoring and node existence, returning the node of
    /// every visit in route order.
    fn resolve(&self, route: &Route) -> Result<Vec<&'a Node>, ViolationType> {
        let depot_id = self.instance.depot_id();
        let first = route.first().map(|v| v.node_id);
        let last = route.last().map(|v| v.node_id);
        if first != Some(depot_id) || last != Some(depot_id) {
            return Err(ViolationType::NotAnchoredAtDepot {
                depot_id,
                first,
                last,
            });
        }

        route
            .visits()
            .iter()
            .map(|v| {
                self.instance
                    .node(v.node_id)
                    .ok_or(ViolationType::UnknownNode { node_id: v.node_id })
            })
            .collect()
    }

    /// Builds the departure state, applying any charging the first visit
    /// reports before leaving the depot.
    fn depart(
        &self,
        visit: Visit,
        depot: &Node,
        nodes: &[&Node],
        report: &mut ValidationReport,
    ) -> Vehicle {
        let params = self.instance.params();
        let eps = self.config.epsilon;
        let max_battery = params.max_battery();

        let charge = match visit.reported_arrival_charge {
            Some(charge) if !charge.is_finite() => {
                report.push_violation(ViolationType::NonFiniteCharge {
                    node_id: depot.id(),
                    value: charge,
                });
                max_battery
            }
            Some(charge) => {
                self.check_charge_target(depot.id(), charge, report);
                if charge < max_battery - eps {
                    report.push_note(Note::InitialChargeNotFull {
                        depot_id: depot.id(),
                        charge,
                        max_battery,
                    });
                }
                charge
            }
            None => {
                report.push_note(Note::AssumedFullCharge {
                    depot_id: depot.id(),
                    charge: max_battery,
                });
                max_battery
            }
        };

        let mut vehicle = Vehicle {
            time: depot.ready_time(),
            charge,
            payload: self.config.preload.initial_payload(nodes.iter().copied()),
            travel_cost: 0.0,
        };

        if let Some(target) = visit.reported_departure_charge {
            let gain = target - vehicle.charge;
            if !target.is_finite() {
                report.push_violation(ViolationType::NonFiniteCharge {
                    node_id: depot.id(),
                    value: target,
                });
            } else if gain.abs() > eps {
                self.check_charge_target(depot.id(), target, report);
                if gain < 0.0 {
                    report.push_violation(ViolationType::ChargeDecrease {
                        node_id: depot.id(),
                        arrival: vehicle.charge,
                        departure: target,
                    });
                } else if params.recharging_rate() <= 0.0 {
                    report.push_violation(ViolationType::ChargingUnavailable {
                        node_id: depot.id(),
                        recharging_rate: params.recharging_rate(),
                        gain,
                    });
                } else {
                    vehicle.time += gain * params.recharging_rate();
                }
                vehicle.charge = target;
            }
        }

        report.set_start(StartState {
            depot_id: depot.id(),
            time: vehicle.time,
            charge: vehicle.charge,
            payload: vehicle.payload,
        });
        debug!(
            depot = depot.id(),
            time = vehicle.time,
            charge = vehicle.charge,
            payload = vehicle.payload,
            "departing"
        );
        vehicle
    }

    /// Drives one arc and serves its destination. Returns `false` if the arc
    /// is missing and the walk cannot continue.
    fn advance(
        &self,
        vehicle: &mut Vehicle,
        from: &Visit,
        to: &Visit,
        node: &Node,
        is_final: bool,
        report: &mut ValidationReport,
    ) -> bool {
        let params = self.instance.params();
        let eps = self.config.epsilon;

        let Some(edge) = self.instance.edge(from.node_id, to.node_id) else {
            report.push_violation(ViolationType::MissingEdge {
                from: from.node_id,
                to: to.node_id,
            });
            return false;
        };

        vehicle.travel_cost += edge.distance * params.unit_cost();

        let energy = edge.distance * params.consumption_rate();
        vehicle.charge -= energy;
        if vehicle.charge < -eps {
            report.push_violation(ViolationType::BatteryDepleted {
                from: from.node_id,
                to: to.node_id,
                charge: vehicle.charge,
                consumed: energy,
            });
        }

        let arrival = vehicle.time + edge.travel_time;
        let arrival_charge = vehicle.charge;

        if let Some(reported) = to.reported_arrival_charge {
            if !reported.is_finite() {
                report.push_violation(ViolationType::NonFiniteCharge {
                    node_id: node.id(),
                    value: reported,
                });
            } else if differs(reported, arrival_charge, eps) {
                if is_final && self.config.final_charge == FinalChargePolicy::Informational {
                    report.push_note(Note::FinalChargeMismatch {
                        node_id: node.id(),
                        computed: arrival_charge,
                        reported,
                    });
                } else {
                    report.push_violation(ViolationType::ArrivalChargeMismatch {
                        node_id: node.id(),
                        computed: arrival_charge,
                        reported,
                    });
                }
            }
        }

        let tw = node.time_window();
        let service_start = tw.service_start(arrival);
        if tw.is_violated(service_start, eps) {
            report.push_violation(ViolationType::TimeWindowViolated {
                node_id: node.id(),
                arrival,
                service_start,
                due: tw.due(),
            });
        }

        match node.kind() {
            NodeKind::Customer => {
                self.serve(vehicle, node, report);
                vehicle.time = service_start + node.service_time();
            }
            NodeKind::Station => {
                vehicle.time = service_start + self.recharge(vehicle, node, to, report);
            }
            NodeKind::Depot => {
                vehicle.time = arrival;
            }
        }

        let segment = SegmentTrace {
            from: from.node_id,
            to: to.node_id,
            distance: edge.distance,
            travel_time: edge.travel_time,
            energy,
            arrival_time: arrival,
            service_start,
            departure_time: vehicle.time,
            arrival_charge,
            departure_charge: vehicle.charge,
            payload: vehicle.payload,
        };
        debug!(
            from = segment.from,
            to = segment.to,
            arrival = segment.arrival_time,
            departure = segment.departure_time,
            charge = segment.departure_charge,
            payload = segment.payload,
            "segment"
        );
        report.push_trace(segment);
        true
    }

    /// Unloads the customer's delivery, then loads its pickup.
    fn serve(&self, vehicle: &mut Vehicle, node: &Node, report: &mut ValidationReport) {
        let eps = self.config.epsilon;
        let capacity = self.instance.params().capacity();

        if vehicle.payload < node.delivery() - eps {
            report.push_violation(ViolationType::InsufficientLoad {
                node_id: node.id(),
                load: vehicle.payload,
                delivery: node.delivery(),
            });
        }
        vehicle.payload -= node.delivery();
        vehicle.payload += node.pickup();

        if vehicle.payload > capacity + eps {
            report.push_violation(ViolationType::CapacityExceeded {
                node_id: node.id(),
                load: vehicle.payload,
                capacity,
            });
        }
        if vehicle.payload < -eps {
            report.push_violation(ViolationType::NegativeLoad {
                node_id: node.id(),
                load: vehicle.payload,
            });
        }
    }

    /// Charges up to the visit's reported departure charge. Returns the time
    /// spent at the station, service time included.
    fn recharge(
        &self,
        vehicle: &mut Vehicle,
        node: &Node,
        visit: &Visit,
        report: &mut ValidationReport,
    ) -> f64 {
        let eps = self.config.epsilon;
        let rate = self.instance.params().recharging_rate();

        let Some(target) = visit.reported_departure_charge else {
            report.push_violation(ViolationType::MissingDepartureCharge { node_id: node.id() });
            return node.service_time();
        };
        if !target.is_finite() {
            report.push_violation(ViolationType::NonFiniteCharge {
                node_id: node.id(),
                value: target,
            });
            return node.service_time();
        }

        self.check_charge_target(node.id(), target, report);

        let gain = target - vehicle.charge;
        if gain < -eps {
            report.push_violation(ViolationType::ChargeDecrease {
                node_id: node.id(),
                arrival: vehicle.charge,
                departure: target,
            });
        }
        if rate <= 0.0 && gain > eps {
            report.push_violation(ViolationType::ChargingUnavailable {
                node_id: node.id(),
                recharging_rate: rate,
                gain,
            });
        }

        vehicle.charge = target;
        gain.max(0.0) * rate.max(0.0) + node.service_time()
    }

    fn check_charge_target(&self, node_id: usize, target: f64, report: &mut ValidationReport) {
        let max_battery = self.instance.params().max_battery();
        if target > max_battery + self.config.epsilon {
            report.push_violation(ViolationType::ChargeAboveMaximum {
                node_id,
                target,
                max_battery,
            });
        }
    }

    /// Compares recomputed travel and total cost with the reported figures.
    fn reconcile_costs(&self, vehicle: &Vehicle, solution: &Solution, report: &mut ValidationReport) {
        let eps = self.config.epsilon;
        let travel_cost = vehicle.travel_cost;
        let total_cost = travel_cost + self.instance.params().dispatch_cost();
        report.set_costs(travel_cost, total_cost);

        let reported = solution.reported_segment_cost();
        if differs(travel_cost, reported, eps) {
            report.push_violation(ViolationType::RouteCostMismatch {
                computed: travel_cost,
                reported,
            });
        }

        match solution.reported_total_cost() {
            Some(reported) if differs(total_cost, reported, eps) => {
                report.push_violation(ViolationType::TotalCostMismatch {
                    computed: total_cost,
                    reported,
                });
            }
            Some(_) => {}
            None => report.push_note(Note::TotalCostUnverified {
                computed: total_cost,
            }),
        }
    }

    fn finish(&self, report: &ValidationReport) {
        for violation in report.violations() {
            warn!(%violation, "violation");
        }
        info!(
            feasible = report.is_feasible(),
            violations = report.violations().len(),
            notes = report.notes().len(),
            "route validated"
        );
    }
}

/// Tolerance comparison that treats NaN on either side as a difference.
fn differs(a: f64, b: f64, eps: f64) -> bool {
    let diff = (a - b).abs();
    diff.is_nan() || diff > eps
}

/// Validates a solution with the default configuration.
///
/// Shorthand for `RouteValidator::new(instance).validate(solution)`.
pub fn validate(instance: &Instance, solution: &Solution) -> ValidationReport {
    RouteValidator::new(instance).validate(solution)
}
