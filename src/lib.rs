//! # u-evrp
//!
//! Feasibility validation for single-vehicle routes of the Electric Vehicle
//! Routing Problem with Time Windows and Simultaneous Pickup-Delivery
//! (EVRP-TW-SPD).
//!
//! A route is simulated visit by visit, tracking elapsed time, battery charge
//! and payload. Time windows, battery, capacity and reported costs are
//! checked along the way and every broken constraint is reported.
//!
//! ## Modules
//!
//! - [`models`]: Instance and solution types (Node, VehicleParams, Instance, Route, Solution)
//! - [`distance`]: Directed arc table with distances and travel times
//! - [`evaluation`]: Route validator, configuration and report
//! - [`parsers`]: Instance and solution text readers
//! - [`error`]: Construction and parse errors
//!
//! ## Example
//!
//! ```
//! use u_evrp::distance::EdgeTable;
//! use u_evrp::evaluation::validate;
//! use u_evrp::models::{Instance, Node, Route, Solution, TimeWindow, VehicleParams};
//!
//! let tw = TimeWindow::new(0.0, 100.0).unwrap();
//! let nodes = vec![
//!     Node::depot(0, 0.0, 0.0, tw),
//!     Node::customer(1, 6.0, 8.0, tw).with_demand(5.0, 0.0),
//! ];
//! let edges = EdgeTable::from_nodes(&nodes);
//! let instance = Instance::new(VehicleParams::new(10.0, 15.0), nodes, edges, vec![0]).unwrap();
//!
//! // 20 units of travel on a 15 unit battery
//! let solution = Solution::new(Route::from_node_ids(&[0, 1, 0]), 20.0);
//! let report = validate(&instance, &solution);
//! assert!(!report.is_feasible());
//! ```

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod parsers;
