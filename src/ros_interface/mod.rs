//! ROS 2 interface for the motion executor
//!
//! This module handles all communication with ROS 2:
//! - Subscribing to the IMU, odometry and laser topics
//! - Publishing velocity commands on `cmd_vel`
//! - Spinning the node and feeding the cooperative scheduler

mod publisher;
mod subscriber;

use crate::core::{CommandPublisher, Event, MotionNode, Scheduler, TickClock};
use crate::{NodeError, Reliability, RosConfig};
use log::info;
use r2r::{Context, Node, QosProfile};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub use publisher::*;
pub use subscriber::*;

/// QoS for the sensor subscriptions: keep-last history, volatile durability
pub fn sensor_qos(config: &RosConfig) -> QosProfile {
    let qos = QosProfile::default().keep_last(config.qos_depth).volatile();
    match config.reliability {
        Reliability::BestEffort => qos.best_effort(),
        Reliability::Reliable => qos.reliable(),
    }
}

/// ROS 2 node with its sensor subscriptions
pub struct RosInterface {
    node: Node,
    streams: SensorStreams,
    spin_timeout: Duration,
}

impl RosInterface {
    /// Creates the node, subscribes to the sensors and advertises `cmd_vel`
    pub fn new(config: &RosConfig) -> Result<(Self, TwistPublisher), NodeError> {
        let context = Context::create()?;
        let mut node = Node::create(context, &config.node_name, &config.namespace)?;
        info!("ROS 2 node '{}' created", config.node_name);

        let streams = SensorStreams::subscribe(
            &mut node,
            &config.imu_topic,
            &config.odom_topic,
            &config.scan_topic,
            sensor_qos(config),
        )?;
        info!(
            "Subscribed to {}, {} and {}",
            config.imu_topic, config.odom_topic, config.scan_topic
        );

        let cmd_qos = QosProfile::default().keep_last(config.qos_depth);
        let publisher = TwistPublisher::new(&mut node, &config.cmd_vel_topic, cmd_qos)?;
        info!("Publishing to {}", config.cmd_vel_topic);

        Ok((
            RosInterface {
                node,
                streams,
                spin_timeout: Duration::from_millis(config.spin_timeout_ms),
            },
            publisher,
        ))
    }

    /// Spins until `running` is cleared. Each pass waits for middleware work
    /// (bounded by the next tick deadline), queues delivered messages and
    /// due ticks, then dispatches them in order.
    pub fn run<P: CommandPublisher>(
        &mut self,
        motion: &mut MotionNode<P>,
        period: Duration,
        running: &AtomicBool,
    ) {
        let mut scheduler = Scheduler::new();
        let mut clock = TickClock::new(period, Instant::now());
        info!("Control loop running every {:?}", clock.period());

        while running.load(Ordering::SeqCst) {
            let wait = clock.time_until_next(Instant::now()).min(self.spin_timeout);
            self.node.spin_once(wait);
            if !running.load(Ordering::SeqCst) {
                break;
            }

            self.streams.drain_into(&mut scheduler);
            if clock.poll(Instant::now()) {
                scheduler.enqueue(Event::Tick);
            }
            scheduler.dispatch_pending(motion);
        }

        scheduler.shutdown();
        info!(
            "Stopped after {} commands ({:.1}s of {} motion, step {}s)",
            motion.control().ticks_emitted(),
            motion.control().elapsed(),
            motion.control().profile(),
            motion.control().time_step()
        );
    }
}
