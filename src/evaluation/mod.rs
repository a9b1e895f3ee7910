//! Route feasibility checking and cost reconciliation.
//!
//! [`RouteValidator`] simulates a route against an [`Instance`](crate::models::Instance)
//! and produces a [`ValidationReport`]: the verdict, the ordered violations,
//! non-fatal notes and a per-segment trace.

mod config;
mod evaluator;
mod report;

pub use config::{FinalChargePolicy, PreloadPolicy, ValidationConfig, DEFAULT_EPSILON};
pub use evaluator::{validate, RouteValidator};
pub use report::{Note, SegmentTrace, StartState, ValidationReport, Violation, ViolationType};
