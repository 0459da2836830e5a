//! Provides tool and base for the robot.
//! Both Tool and Base take arbitrary implementation of Kinematics and are such
//! implementations themselves. Hence, they can be cascaded: the robot stands on
//! a pedestal and carries the gripper.
//! ```
//! use std::sync::Arc;
//! use nalgebra::{Isometry3, Translation3, UnitQuaternion};
//! use rs_pick_place::kinematic_traits::{Joints, Kinematics, Pose};
//! use rs_pick_place::kinematics_impl::OPWKinematics;
//! use rs_pick_place::parameters::Parameters;
//! let robot_alone = OPWKinematics::new(Parameters::irb2400_10());
//!
//! // Robot on a 20 cm pedestal
//! let robot_with_base = rs_pick_place::tool::Base {
//!   robot: Arc::new(robot_alone),
//!   base: Isometry3::from_parts(Translation3::new(0.0, 0.0, 0.2), UnitQuaternion::identity()),
//! };
//!
//! // Gripper fingertips 15 cm beyond the flange
//! let robot_complete = rs_pick_place::tool::Tool {
//!   robot: Arc::new(robot_with_base),
//!   tool: Isometry3::from_parts(Translation3::new(0.0, 0.0, 0.15), UnitQuaternion::identity()),
//! };
//!
//! let joints: Joints = [0.0, 0.1, 0.2, 0.3, 0.0, 0.5];
//! let tcp_pose: Pose = robot_complete.forward(&joints);
//! println!("The fingertips are at: {:?}", tcp_pose);
//! ```

use crate::constraints::Constraints;
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use std::sync::Arc;

/// Defines the fixed tool that is attached to the flange of the robot.
/// The tool moves with the robot, providing additional translation and, if needed,
/// rotation. The "pose" of the tool is the pose of its center point (TCP).
#[derive(Clone)]
pub struct Tool {
    pub robot: Arc<dyn Kinematics>, // The robot

    /// Transformation from the robot's flange to the tool's TCP.
    pub tool: Isometry3<f64>,
}

/// Defines the fixed base that holds the robot.
#[derive(Clone)]
pub struct Base {
    pub robot: Arc<dyn Kinematics>, // The robot

    /// Transformation from the world origin to the robots base.
    pub base: Isometry3<f64>,
}

impl Tool {
    /// Tool that extends straight along the flange Z axis.
    pub fn straight(robot: Arc<dyn Kinematics>, length: f64) -> Self {
        Tool {
            robot,
            tool: Isometry3::from_parts(Translation3::new(0.0, 0.0, length), UnitQuaternion::identity()),
        }
    }
}

impl Base {
    /// Robot standing on a pedestal of the given height.
    pub fn raised(robot: Arc<dyn Kinematics>, height: f64) -> Self {
        Base {
            robot,
            base: Isometry3::from_parts(Translation3::new(0.0, 0.0, height), UnitQuaternion::identity()),
        }
    }
}

impl Kinematics for Tool {
    fn forward(&self, qs: &Joints) -> Pose {
        self.robot.forward(qs) * self.tool
    }

    fn inverse(&self, tcp: &Pose) -> Joints {
        self.robot.inverse(&(tcp * self.tool.inverse()))
    }

    fn inverse_continuing(&self, tcp: &Pose, previous: &Joints) -> Joints {
        self.robot.inverse_continuing(&(tcp * self.tool.inverse()), previous)
    }

    fn constraints(&self) -> Option<&Constraints> {
        self.robot.constraints()
    }

    fn dof(&self) -> usize {
        self.robot.dof()
    }
}

impl Kinematics for Base {
    fn forward(&self, joints: &Joints) -> Pose {
        self.base * self.robot.forward(joints)
    }

    fn inverse(&self, tcp: &Pose) -> Joints {
        self.robot.inverse(&(self.base.inverse() * tcp))
    }

    fn inverse_continuing(&self, tcp: &Pose, previous: &Joints) -> Joints {
        self.robot.inverse_continuing(&(self.base.inverse() * tcp), previous)
    }

    fn constraints(&self) -> Option<&Constraints> {
        self.robot.constraints()
    }

    fn dof(&self) -> usize {
        self.robot.dof()
    }
}
