extern crate nalgebra as na;

use crate::kinematic_traits::{Joints, Kinematics, Pose};
use na::{Matrix6, Vector6};

/// Function to compute the Jacobian matrix for a given robot and joint configuration
///
/// # Arguments
///
/// * `robot` - A reference to the robot implementing the Kinematics trait
/// * `joints` - A reference to the joint configuration
/// * `epsilon` - A small value used for numerical differentiation
///
/// # Returns
///
/// A 6x6 matrix representing the Jacobian
///
/// The Jacobian matrix maps the joint velocities to the end-effector velocities.
/// Each column corresponds to a joint, and each row corresponds to a degree of freedom
/// of the end-effector (linear and angular velocities).
pub fn compute_jacobian<K: Kinematics + ?Sized>(robot: &K, joints: &Joints, epsilon: f64) -> Matrix6<f64> {
    let mut jacobian = Matrix6::zeros();
    let current_pose = robot.forward(joints);
    let current_position = current_pose.translation.vector;
    let current_orientation = current_pose.rotation;

    for i in 0..6 {
        let mut perturbed_qs = *joints;
        perturbed_qs[i] += epsilon;
        let perturbed_pose = robot.forward(&perturbed_qs);

        let delta_position = (perturbed_pose.translation.vector - current_position) / epsilon;
        let delta_orientation =
            (perturbed_pose.rotation * current_orientation.inverse()).scaled_axis() / epsilon;

        jacobian.fixed_view_mut::<3, 1>(0, i).copy_from(&delta_position);
        jacobian.fixed_view_mut::<3, 1>(3, i).copy_from(&delta_orientation);
    }

    jacobian
}

/// Twist that brings `current` to `target`: linear part first, then the rotation
/// as a scaled axis, both in the world frame.
pub fn pose_error(current: &Pose, target: &Pose) -> Vector6<f64> {
    let linear = target.translation.vector - current.translation.vector;
    let angular = (target.rotation * current.rotation.inverse()).scaled_axis();
    Vector6::new(linear.x, linear.y, linear.z, angular.x, angular.y, angular.z)
}

/// Damped least squares step `J^T (J J^T + lambda^2 I)^-1 e`. Stays finite near
/// singularities where the plain inverse does not exist.
pub fn damped_step(jacobian: &Matrix6<f64>, error: &Vector6<f64>, lambda: f64) -> Option<Vector6<f64>> {
    let damped = jacobian * jacobian.transpose() + Matrix6::identity() * (lambda * lambda);
    let solved = damped.cholesky()?.solve(error);
    Some(jacobian.transpose() * solved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

    const EPSILON: f64 = 1e-6;

    /// Single rotary joint robot. When the first joint rotates, the end-effector,
    /// one meter away along X, moves in Y and turns around Z.
    pub struct SingleRotaryJointRobot;

    impl Kinematics for SingleRotaryJointRobot {
        fn forward(&self, qs: &Joints) -> Pose {
            let angle = qs[0];
            Isometry3::from_parts(
                Translation3::new(angle.cos(), angle.sin(), 0.0),
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle),
            )
        }

        fn inverse(&self, pose: &Pose) -> Joints {
            let t = pose.translation.vector;
            [t.y.atan2(t.x), 0.0, 0.0, 0.0, 0.0, 0.0]
        }
    }

    #[test]
    fn test_compute_jacobian() {
        let robot = SingleRotaryJointRobot;
        let jacobian = compute_jacobian(&robot, &[0.0; 6], EPSILON);

        assert!((jacobian[(1, 0)] - 1.0).abs() < 1e-5, "dy/dq1 should be 1");
        assert!((jacobian[(5, 0)] - 1.0).abs() < 1e-5, "dRz/dq1 should be 1");
        for column in 1..6 {
            for row in 0..6 {
                assert!(jacobian[(row, column)].abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_pose_error_zero_for_same_pose() {
        let robot = SingleRotaryJointRobot;
        let pose = robot.forward(&[0.3, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(pose_error(&pose, &pose).norm() < 1e-12);
    }

    #[test]
    fn test_damped_step_moves_toward_target() {
        let robot = SingleRotaryJointRobot;
        let joints = [0.0; 6];
        let target = robot.forward(&[0.1, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let jacobian = compute_jacobian(&robot, &joints, EPSILON);
        let error = pose_error(&robot.forward(&joints), &target);
        let step = damped_step(&jacobian, &error, 0.01).expect("damped system is positive definite");
        assert!(step[0] > 0.05 && step[0] < 0.15, "step {}", step[0]);
        assert!(step.iter().skip(1).all(|s| s.abs() < 1e-9));
    }
}
