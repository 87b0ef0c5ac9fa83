// src/ros_interface/publisher.rs
// Publishes velocity commands as geometry_msgs/Twist.

use crate::NodeError;
use crate::core::CommandPublisher;
use crate::navigation::VelocityCommand;
use r2r::QosProfile;
use r2r::geometry_msgs::msg::{Twist, Vector3};

/// Converts a command into the Twist the base controller expects
pub fn to_twist(command: &VelocityCommand) -> Twist {
    Twist {
        linear: Vector3 {
            x: command.linear_x,
            y: 0.0,
            z: 0.0,
        },
        angular: Vector3 {
            x: 0.0,
            y: 0.0,
            z: command.angular_z,
        },
    }
}

/// `cmd_vel` publisher
pub struct TwistPublisher {
    inner: r2r::Publisher<Twist>,
}

impl TwistPublisher {
    /// Advertises `topic` on `node`
    pub fn new(node: &mut r2r::Node, topic: &str, qos: QosProfile) -> Result<Self, NodeError> {
        let inner = node.create_publisher::<Twist>(topic, qos)?;
        Ok(TwistPublisher { inner })
    }
}

impl CommandPublisher for TwistPublisher {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), NodeError> {
        self.inner
            .publish(&to_twist(command))
            .map_err(|e| NodeError::Publish(e.to_string()))
    }
}
