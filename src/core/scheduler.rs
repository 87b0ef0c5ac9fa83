// src/core/scheduler.rs
// Single-threaded cooperative dispatch. Each event source has its own FIFO
// queue; handlers run one at a time to completion, so node state needs no lock.

use super::node::{CommandPublisher, MotionNode};
use super::samples::{ImuSample, OdomSample, ScanSample};
use crate::NodeError;
use log::{error, info, warn};
use std::collections::VecDeque;

/// Something a handler has to react to
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Inertial sample arrived
    Imu(ImuSample),
    /// Odometry sample arrived
    Odom(OdomSample),
    /// Laser scan arrived
    Scan(ScanSample),
    /// Control period elapsed
    Tick,
}

/// One FIFO per event source
#[derive(Debug, Default)]
pub struct EventQueues {
    imu: VecDeque<ImuSample>,
    odom: VecDeque<OdomSample>,
    scan: VecDeque<ScanSample>,
    ticks: usize,
}

impl EventQueues {
    /// Empty queues
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes an event to the queue of its source
    pub fn push(&mut self, event: Event) {
        match event {
            Event::Imu(sample) => self.imu.push_back(sample),
            Event::Odom(sample) => self.odom.push_back(sample),
            Event::Scan(sample) => self.scan.push_back(sample),
            Event::Tick => self.ticks += 1,
        }
    }

    /// Events waiting across all sources
    pub fn len(&self) -> usize {
        self.imu.len() + self.odom.len() + self.scan.len() + self.ticks
    }

    /// True when nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops everything still queued
    pub fn clear(&mut self) {
        self.imu.clear();
        self.odom.clear();
        self.scan.clear();
        self.ticks = 0;
    }
}

/// Counts from one `dispatch_pending` pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Sensor handlers run
    pub sensor_events: usize,
    /// Tick handlers run
    pub ticks: usize,
    /// Commands that went out
    pub commands: usize,
    /// Handlers that returned an error
    pub failures: usize,
}

/// Owns the queues and feeds them to a node
#[derive(Debug, Default)]
pub struct Scheduler {
    queues: EventQueues,
    stopped: bool,
}

impl Scheduler {
    /// Scheduler with empty queues
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event. Ignored after `shutdown`.
    pub fn enqueue(&mut self, event: Event) {
        if !self.stopped {
            self.queues.push(event);
        }
    }

    /// Pending events
    pub fn pending(&self) -> usize {
        self.queues.len()
    }

    /// Whether `shutdown` has been called
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Drops pending events and refuses new ones
    pub fn shutdown(&mut self) {
        if !self.stopped {
            let dropped = self.queues.len();
            self.queues.clear();
            self.stopped = true;
            info!("Scheduler stopped, {} pending events dropped", dropped);
        }
    }

    /// Runs every queued handler. Sensor queues drain first (imu, odom, scan),
    /// then ticks one after another. Handler errors are logged and counted;
    /// they never stop the pass.
    pub fn dispatch_pending<P: CommandPublisher>(&mut self, node: &mut MotionNode<P>) -> DispatchReport {
        let mut report = DispatchReport::default();
        if self.stopped {
            return report;
        }

        while let Some(sample) = self.queues.imu.pop_front() {
            report.sensor_events += 1;
            note_failure(node.handle_imu(&sample), &mut report);
        }
        while let Some(sample) = self.queues.odom.pop_front() {
            report.sensor_events += 1;
            note_failure(node.handle_odom(&sample), &mut report);
        }
        while let Some(sample) = self.queues.scan.pop_front() {
            report.sensor_events += 1;
            note_failure(node.handle_scan(&sample), &mut report);
        }

        while self.queues.ticks > 0 {
            self.queues.ticks -= 1;
            report.ticks += 1;
            match node.handle_tick() {
                Ok(Some(_)) => report.commands += 1,
                Ok(None) => {}
                Err(e) => {
                    report.failures += 1;
                    error!("Tick failed: {}", e);
                }
            }
        }

        report
    }
}

fn note_failure(result: Result<(), NodeError>, report: &mut DispatchReport) {
    if let Err(e) = result {
        report.failures += 1;
        warn!("Sensor message handling failed: {}", e);
    }
}
