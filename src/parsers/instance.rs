//! Reader for the EVRP-TW-SPD instance text format.
//!
//! ```text
//! NAME : r202C15
//! DIMENSION : 22
//! CAPACITY : 1000.0
//! ELECTRIC_POWER : 60.63
//! ...
//! NODE_SECTION
//! ID,type,x,y,delivery,pickup,ready_time,due_date,service_time
//! 0,d,35.0,35.0,0,0,0.0,1000.0,0.0
//! ...
//! DISTANCETIME_SECTION
//! ID,from_node,to_node,distance,spend_tm
//! 0,0,1,25.55,25.55
//! ...
//! DEPOT_SECTION
//! 0
//! -1
//! ```

use std::str::FromStr;

use tracing::{debug, warn};

use crate::distance::{Edge, EdgeTable};
use crate::error::{InstanceError, ParseError};
use crate::models::{Instance, Node, NodeKind, TimeWindow, VehicleParams};

const NODE_COLUMNS: usize = 9;
const EDGE_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Nodes,
    Edges,
    Depots,
}

#[derive(Debug, Default)]
struct Header {
    name: Option<String>,
    dimension: Option<usize>,
    vehicles: Option<usize>,
    dispatch_cost: Option<f64>,
    unit_cost: Option<f64>,
    capacity: Option<f64>,
    max_battery: Option<f64>,
    consumption_rate: Option<f64>,
    recharging_rate: Option<f64>,
}

impl Header {
    fn set(&mut self, line: usize, key: &str, value: &str) -> Result<(), ParseError> {
        match key {
            "NAME" => self.name = Some(value.to_string()),
            "DIMENSION" => self.dimension = Some(parse_field(line, "DIMENSION", value)?),
            "VEHICLES" => self.vehicles = Some(parse_field(line, "VEHICLES", value)?),
            "DISPATCHINGCOST" => {
                self.dispatch_cost = Some(parse_field(line, "DISPATCHINGCOST", value)?)
            }
            "UNITCOST" => self.unit_cost = Some(parse_field(line, "UNITCOST", value)?),
            "CAPACITY" => self.capacity = Some(parse_field(line, "CAPACITY", value)?),
            "ELECTRIC_POWER" => {
                self.max_battery = Some(parse_field(line, "ELECTRIC_POWER", value)?)
            }
            "CONSUMPTION_RATE" => {
                self.consumption_rate = Some(parse_field(line, "CONSUMPTION_RATE", value)?)
            }
            "RECHARGING_RATE" => {
                self.recharging_rate = Some(parse_field(line, "RECHARGING_RATE", value)?)
            }
            _ => debug!(key, value, "ignoring header key"),
        }
        Ok(())
    }

    fn params(&self) -> Result<VehicleParams, ParseError> {
        let capacity = self.capacity.ok_or(ParseError::MissingKey("CAPACITY"))?;
        let max_battery = self
            .max_battery
            .ok_or(ParseError::MissingKey("ELECTRIC_POWER"))?;
        let consumption_rate = self
            .consumption_rate
            .ok_or(ParseError::MissingKey("CONSUMPTION_RATE"))?;
        let recharging_rate = self
            .recharging_rate
            .ok_or(ParseError::MissingKey("RECHARGING_RATE"))?;
        let unit_cost = self.unit_cost.ok_or(ParseError::MissingKey("UNITCOST"))?;
        let dispatch_cost = self
            .dispatch_cost
            .ok_or(ParseError::MissingKey("DISPATCHINGCOST"))?;

        Ok(VehicleParams::new(capacity, max_battery)
            .with_consumption_rate(consumption_rate)
            .with_recharging_rate(recharging_rate)
            .with_unit_cost(unit_cost)
            .with_dispatch_cost(dispatch_cost))
    }
}

/// Parses an instance from its text form.
///
/// Header keys outside the known set are ignored. Rows in `NODE_SECTION`
/// and `DISTANCETIME_SECTION` are comma separated and may be preceded by a
/// column header row. When `DEPOT_SECTION` is absent or empty, node 0 is the
/// depot provided it is typed `d`.
///
/// # Errors
///
/// Returns [`ParseError`] for malformed lines, missing keys or sections, and
/// for data that breaks an [`Instance`] invariant.
///
/// # Examples
///
/// ```
/// use u_evrp::parsers::parse_instance;
///
/// let text = "\
/// CAPACITY : 100
/// ELECTRIC_POWER : 50
/// CONSUMPTION_RATE : 1.0
/// RECHARGING_RATE : 0.5
/// UNITCOST : 1.0
/// DISPATCHINGCOST : 1000
/// NODE_SECTION
/// ID,type,x,y,delivery,pickup,ready_time,due_date,service_time
/// 0,d,0,0,0,0,0,100,0
/// 1,c,3,4,10,2,0,100,5
/// DISTANCETIME_SECTION
/// ID,from_node,to_node,distance,spend_tm
/// 0,0,1,5.0,5.0
/// 1,1,0,5.0,5.0
/// ";
/// let instance = parse_instance(text).unwrap();
/// assert_eq!(instance.depot_id(), 0);
/// assert_eq!(instance.edge(1, 0).map(|e| e.distance), Some(5.0));
/// ```
pub fn parse_instance(text: &str) -> Result<Instance, ParseError> {
    let mut header = Header::default();
    let mut nodes: Option<Vec<Node>> = None;
    let mut edges: Option<EdgeTable> = None;
    let mut depots: Vec<usize> = Vec::new();
    let mut section = Section::Header;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "EOF" {
            break;
        }

        match line {
            "NODE_SECTION" => {
                section = Section::Nodes;
                nodes.get_or_insert_with(Vec::new);
                continue;
            }
            "DISTANCETIME_SECTION" => {
                section = Section::Edges;
                edges.get_or_insert_with(EdgeTable::new);
                continue;
            }
            "DEPOT_SECTION" => {
                section = Section::Depots;
                continue;
            }
            _ => {}
        }

        match section {
            Section::Header => match line.split_once(':') {
                Some((key, value)) => header.set(line_no, key.trim(), value.trim())?,
                None => debug!(line = line_no, "skipping line outside any section"),
            },
            Section::Nodes => {
                if is_column_header(line) {
                    continue;
                }
                let node = parse_node(line_no, line)?;
                nodes.get_or_insert_with(Vec::new).push(node);
            }
            Section::Edges => {
                if is_column_header(line) {
                    continue;
                }
                let (from, to, edge) = parse_edge(line_no, line)?;
                let table = edges.get_or_insert_with(EdgeTable::new);
                if table.insert(from, to, edge).is_some() {
                    warn!(from, to, line = line_no, "arc declared twice, keeping last");
                }
            }
            Section::Depots => {
                if line == "-1" {
                    section = Section::Header;
                    continue;
                }
                depots.push(parse_field(line_no, "depot id", line)?);
            }
        }
    }

    let params = header.params()?;
    let nodes = nodes.ok_or(ParseError::MissingSection("NODE_SECTION"))?;
    let edges = edges.ok_or(ParseError::MissingSection("DISTANCETIME_SECTION"))?;

    if let Some(dimension) = header.dimension {
        if dimension != nodes.len() {
            warn!(
                dimension,
                nodes = nodes.len(),
                "DIMENSION disagrees with NODE_SECTION"
            );
        }
    }

    let mut instance = Instance::new(params, nodes, edges, depots)?;
    if let Some(name) = header.name {
        instance = instance.with_name(name);
    }
    if let Some(vehicles) = header.vehicles {
        instance = instance.with_vehicles(vehicles);
    }
    debug!(
        name = instance.name(),
        nodes = instance.num_nodes(),
        arcs = instance.edges().len(),
        depot = instance.depot_id(),
        "instance parsed"
    );
    Ok(instance)
}

fn is_column_header(line: &str) -> bool {
    line.split(',')
        .next()
        .is_some_and(|first| first.trim().eq_ignore_ascii_case("id"))
}

fn columns(line_no: usize, line: &str, expected: usize) -> Result<Vec<&str>, ParseError> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return Err(ParseError::ColumnCount {
            line: line_no,
            expected,
            found: parts.len(),
        });
    }
    Ok(parts)
}

fn parse_node(line_no: usize, line: &str) -> Result<Node, ParseError> {
    let parts = columns(line_no, line, NODE_COLUMNS)?;

    let id: usize = parse_field(line_no, "id", parts[0])?;
    let kind = NodeKind::from_tag(parts[1]).ok_or_else(|| ParseError::UnknownNodeKind {
        line: line_no,
        tag: parts[1].to_string(),
    })?;
    let x = parse_field(line_no, "x", parts[2])?;
    let y = parse_field(line_no, "y", parts[3])?;
    let delivery = parse_field(line_no, "delivery", parts[4])?;
    let pickup = parse_field(line_no, "pickup", parts[5])?;
    let ready = parse_field(line_no, "ready_time", parts[6])?;
    let due = parse_field(line_no, "due_date", parts[7])?;
    let service_time = parse_field(line_no, "service_time", parts[8])?;

    let tw = TimeWindow::new(ready, due)
        .ok_or(InstanceError::InvalidTimeWindow { id, ready, due })?;

    Ok(Node::new(id, kind, x, y, tw)
        .with_demand(delivery, pickup)
        .with_service_time(service_time))
}

fn parse_edge(line_no: usize, line: &str) -> Result<(usize, usize, Edge), ParseError> {
    let parts = columns(line_no, line, EDGE_COLUMNS)?;

    let from = parse_field(line_no, "from_node", parts[1])?;
    let to = parse_field(line_no, "to_node", parts[2])?;
    let distance = parse_field(line_no, "distance", parts[3])?;
    let travel_time = parse_field(line_no, "spend_tm", parts[4])?;

    Ok((from, to, Edge::new(distance, travel_time)))
}

fn parse_field<T: FromStr>(line: usize, field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        line,
        field,
        value: value.to_string(),
    })
}
