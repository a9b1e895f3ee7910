//! Text readers for instances and solutions.
//!
//! Both readers work on in-memory text; reading files is left to the caller.

pub mod instance;
pub mod solution;

pub use instance::parse_instance;
pub use solution::{parse_route_sequence, parse_solution};
