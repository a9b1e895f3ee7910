//! Node and time window types.

use serde::{Deserialize, Serialize};

/// A time window constraint for service at a node.
///
/// The vehicle must begin service no later than `due` and may arrive as early
/// as it likes; arriving before `ready` means waiting.
///
/// # Examples
///
/// ```
/// use u_evrp::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest service start.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Service start for a vehicle arriving at `arrival` (waits until ready).
    pub fn service_start(&self, arrival: f64) -> f64 {
        arrival.max(self.ready)
    }

    /// Returns `true` if starting service at `time` misses the window by more
    /// than `epsilon`.
    pub fn is_violated(&self, time: f64, epsilon: f64) -> bool {
        time > self.due + epsilon
    }
}

/// Role of a node in an EVRP-TW-SPD instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Route start and end point.
    Depot,
    /// Customer with delivery and pickup demand.
    Customer,
    /// Charging station.
    Station,
}

impl NodeKind {
    /// Parses the single-letter tag used in instance files (`d`, `c`, `f`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "d" | "D" => Some(Self::Depot),
            "c" | "C" => Some(Self::Customer),
            "f" | "F" => Some(Self::Station),
            _ => None,
        }
    }

    /// The single-letter tag used in instance files.
    pub fn tag(&self) -> char {
        match self {
            Self::Depot => 'd',
            Self::Customer => 'c',
            Self::Station => 'f',
        }
    }
}

/// A depot, customer or charging station.
///
/// Demands are only meaningful on customers; constructors for the other kinds
/// leave them at zero. For customers `service_time` is the fixed dwell; for
/// stations it is added on top of the charging duration.
///
/// # Examples
///
/// ```
/// use u_evrp::models::{Node, NodeKind, TimeWindow};
///
/// let depot = Node::depot(0, 35.0, 35.0, TimeWindow::new(0.0, 1000.0).unwrap());
/// assert_eq!(depot.kind(), NodeKind::Depot);
///
/// let c = Node::customer(1, 57.0, 48.0, TimeWindow::new(0.0, 964.0).unwrap())
///     .with_demand(19.0, 4.0)
///     .with_service_time(10.0);
/// assert_eq!(c.delivery(), 19.0);
/// assert_eq!(c.pickup(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    kind: NodeKind,
    x: f64,
    y: f64,
    delivery: f64,
    pickup: f64,
    time_window: TimeWindow,
    service_time: f64,
}

impl Node {
    /// Creates a node with zero demand and zero service time.
    pub fn new(id: usize, kind: NodeKind, x: f64, y: f64, time_window: TimeWindow) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            delivery: 0.0,
            pickup: 0.0,
            time_window,
            service_time: 0.0,
        }
    }

    /// Creates a depot node.
    pub fn depot(id: usize, x: f64, y: f64, time_window: TimeWindow) -> Self {
        Self::new(id, NodeKind::Depot, x, y, time_window)
    }

    /// Creates a customer node.
    pub fn customer(id: usize, x: f64, y: f64, time_window: TimeWindow) -> Self {
        Self::new(id, NodeKind::Customer, x, y, time_window)
    }

    /// Creates a charging station node.
    pub fn station(id: usize, x: f64, y: f64, time_window: TimeWindow) -> Self {
        Self::new(id, NodeKind::Station, x, y, time_window)
    }

    /// Sets delivery and pickup demand.
    pub fn with_demand(mut self, delivery: f64, pickup: f64) -> Self {
        self.delivery = delivery;
        self.pickup = pickup;
        self
    }

    /// Sets the service (dwell) time.
    pub fn with_service_time(mut self, service_time: f64) -> Self {
        self.service_time = service_time;
        self
    }

    /// Node ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Node role.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Goods unloaded at this node.
    pub fn delivery(&self) -> f64 {
        self.delivery
    }

    /// Goods loaded at this node.
    pub fn pickup(&self) -> f64 {
        self.pickup
    }

    /// Service time window.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Earliest service start.
    pub fn ready_time(&self) -> f64 {
        self.time_window.ready()
    }

    /// Latest service start.
    pub fn due_date(&self) -> f64 {
        self.time_window.due()
    }

    /// Service (dwell) time.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
