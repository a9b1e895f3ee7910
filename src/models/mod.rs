//! Domain model types for EVRP-TW-SPD validation.
//!
//! Provides the static instance (nodes with time windows and pickup/delivery
//! demand, vehicle and battery parameters, directed arcs) and the candidate
//! solution (a single route of visits with reported charges and costs).

mod instance;
mod node;
mod route;
mod solution;

pub use instance::{Instance, VehicleParams};
pub use node::{Node, NodeKind, TimeWindow};
pub use route::{Route, Visit};
pub use solution::Solution;
