//! Defines the interface of the kinematic model used by the sequencer.

extern crate nalgebra as na;

use crate::constraints::Constraints;
use na::{Isometry3, Vector3};

/// Pose is used a pose of the robot tcp. It contains both Cartesian position and rotation quaternion
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion, Vector3};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(-0.75, 0.5, 0.5);
/// // Gripper looking down: 180 degrees around the world X axis.
/// let rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI);
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Cartesian position in the world frame, meters.
pub type Position = Vector3<f64>;

/// Rotations of the 6 joints, radians.
pub type Joints = [f64; 6];

/// Joint configuration with all joints at zero.
pub const JOINTS_AT_ZERO: Joints = [0.0; 6];

/// Kinematic model of the arm. Implementations are pure functions of their arguments
/// (apart from any internal solver state).
pub trait Kinematics {
    /// Returns the pose of the tool center point for the given joint configuration.
    fn forward(&self, qs: &Joints) -> Pose;

    /// Finds the joint configuration for the given pose. This is a best effort: the
    /// solver returns its best candidate even when it has not converged, so the caller
    /// must check the result with [`Kinematics::forward`].
    fn inverse(&self, pose: &Pose) -> Joints;

    /// Same as `inverse` but starting the search from `previous` so that the solution
    /// stays close to the current configuration of the robot.
    fn inverse_continuing(&self, pose: &Pose, _previous: &Joints) -> Joints {
        self.inverse(pose)
    }

    /// Joint limits, if the model has any.
    fn constraints(&self) -> Option<&Constraints> {
        None
    }

    /// Degrees of freedom of the robot.
    fn dof(&self) -> usize {
        6
    }
}
