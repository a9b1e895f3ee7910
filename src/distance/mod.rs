//! Directed travel distance and time tables.
//!
//! EVRP-TW-SPD instances list every arc explicitly with its own distance and
//! travel time, and arcs need not be symmetric.

mod edges;

pub use edges::{Edge, EdgeTable};
