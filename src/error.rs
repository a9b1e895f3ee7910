//! Error types for instance construction and text ingestion.
//!
//! Route feasibility problems are never errors; they are reported as
//! [`Violation`](crate::evaluation::Violation) values.

use thiserror::Error;

/// An instance whose data breaks a construction invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstanceError {
    #[error("node {0} is declared more than once")]
    DuplicateNode(usize),
    #[error("node {id} has an invalid time window [{ready}, {due}]")]
    InvalidTimeWindow { id: usize, ready: f64, due: f64 },
    #[error("node {id} has invalid {field} {value}")]
    InvalidNodeValue {
        id: usize,
        field: &'static str,
        value: f64,
    },
    #[error("edge {from} -> {to} has invalid distance {distance} or time {travel_time}")]
    InvalidEdge {
        from: usize,
        to: usize,
        distance: f64,
        travel_time: f64,
    },
    #[error("edge {from} -> {to} references an undeclared node")]
    DanglingEdge { from: usize, to: usize },
    #[error("vehicle parameter {name} has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("no depot declared and node 0 is not a depot")]
    NoDepot,
    #[error("depot {0} is not declared as a depot node")]
    InvalidDepot(usize),
}

/// Failure to read an instance or solution text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: invalid {field} value '{value}'")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unknown node type '{tag}'")]
    UnknownNodeKind { line: usize, tag: String },
    #[error("missing required key {0}")]
    MissingKey(&'static str),
    #[error("missing section {0}")]
    MissingSection(&'static str),
    #[error("solution has {0} lines, expected at least 2")]
    TooShort(usize),
    #[error("missing '{0}' line")]
    MissingLine(&'static str),
    #[error("malformed route line: {0}")]
    MalformedRoute(String),
    #[error("route sequence, column {column}: {reason}")]
    MalformedToken { column: usize, reason: String },
    #[error(transparent)]
    Instance(#[from] InstanceError),
}
