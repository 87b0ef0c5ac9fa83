// src/ros_interface/subscriber.rs
// Sensor subscriptions. Messages are converted into transport-neutral samples
// and handed to the scheduler's per-source queues after each spin.

use crate::NodeError;
use crate::core::{Event, ImuSample, OdomSample, ScanSample, Scheduler, Stamp, yaw_from_quaternion};
use futures::{FutureExt, Stream, StreamExt};
use r2r::QosProfile;
use r2r::builtin_interfaces::msg::Time;
use r2r::nav_msgs::msg::Odometry;
use r2r::sensor_msgs::msg::{Imu, LaserScan};

type MessageStream<T> = Box<dyn Stream<Item = T> + Unpin>;

fn stamp(time: &Time) -> Option<Stamp> {
    Some(Stamp::new(time.sec, time.nanosec))
}

/// IMU message to sample
pub fn imu_sample(msg: &Imu) -> ImuSample {
    ImuSample {
        linear_accel_x: msg.linear_acceleration.x,
        linear_accel_y: msg.linear_acceleration.y,
        angular_vel_z: msg.angular_velocity.z,
        stamp: stamp(&msg.header.stamp),
    }
}

/// Odometry message to sample; heading is the yaw of the pose quaternion
pub fn odom_sample(msg: &Odometry) -> OdomSample {
    let pose = &msg.pose.pose;
    let q = &pose.orientation;
    OdomSample {
        pos_x: pose.position.x,
        pos_y: pose.position.y,
        yaw: yaw_from_quaternion(q.x, q.y, q.z, q.w),
        stamp: stamp(&msg.header.stamp),
    }
}

/// LaserScan message to sample
pub fn scan_sample(msg: &LaserScan) -> ScanSample {
    ScanSample {
        ranges: msg.ranges.clone(),
        angle_increment: msg.angle_increment,
        stamp: stamp(&msg.header.stamp),
    }
}

/// The three sensor subscriptions
pub struct SensorStreams {
    imu: MessageStream<Imu>,
    odom: MessageStream<Odometry>,
    scan: MessageStream<LaserScan>,
}

impl SensorStreams {
    /// Subscribes to the IMU, odometry and scan topics with a shared QoS
    pub fn subscribe(
        node: &mut r2r::Node,
        imu_topic: &str,
        odom_topic: &str,
        scan_topic: &str,
        qos: QosProfile,
    ) -> Result<Self, NodeError> {
        let imu = node.subscribe::<Imu>(imu_topic, qos.clone())?;
        let odom = node.subscribe::<Odometry>(odom_topic, qos.clone())?;
        let scan = node.subscribe::<LaserScan>(scan_topic, qos)?;
        Ok(SensorStreams {
            imu: Box::new(imu),
            odom: Box::new(odom),
            scan: Box::new(scan),
        })
    }

    /// Moves every message already delivered into the scheduler.
    /// Returns how many were queued. Never waits.
    pub fn drain_into(&mut self, scheduler: &mut Scheduler) -> usize {
        let mut queued = 0;
        while let Some(Some(msg)) = self.imu.next().now_or_never() {
            scheduler.enqueue(Event::Imu(imu_sample(&msg)));
            queued += 1;
        }
        while let Some(Some(msg)) = self.odom.next().now_or_never() {
            scheduler.enqueue(Event::Odom(odom_sample(&msg)));
            queued += 1;
        }
        while let Some(Some(msg)) = self.scan.next().now_or_never() {
            scheduler.enqueue(Event::Scan(scan_sample(&msg)));
            queued += 1;
        }
        queued
    }
}
