// core/mod.rs

// Control core of the motion executor: sensor readiness, the node that owns
// all runtime state, and the cooperative scheduler that drives it. Nothing in
// here knows about the transport.

/// Wall-clock tick source
pub mod clock;
/// Node state and event handlers
pub mod node;
/// Sensor readiness latch
pub mod readiness;
/// Transport-neutral sensor samples
pub mod samples;
/// Per-source event queues and cooperative dispatch
pub mod scheduler;

pub use clock::TickClock;
pub use node::{CommandPublisher, MotionNode};
pub use readiness::{ReadinessTracker, SensorKind};
pub use samples::{ImuSample, OdomSample, ScanSample, SensorSample, Stamp, yaw_from_quaternion};
pub use scheduler::{DispatchReport, Event, EventQueues, Scheduler};
