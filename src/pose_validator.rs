//! Checks how close the solved configuration brings the robot to the requested pose.
//!
//! Only the position takes part in the tolerance decision. The angular deviation is
//! reported alongside for diagnostics.

use crate::kinematic_traits::Pose;
use crate::sequence_error::SequenceError;
use crate::utils::format_pose;
use std::fmt;

/// Maximal acceptable position error, meters.
pub const DEFAULT_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct PoseCheck {
    pub desired: Pose,
    pub achieved: Pose,

    /// Euclidean distance between the desired and achieved positions, meters.
    pub position_error: f64,

    /// Rotation angle between the desired and achieved orientations, radians.
    pub angular_error: f64,

    pub tolerance: f64,
    pub within_tolerance: bool,
}

/// Compares the achieved pose with the desired one.
pub fn validate(desired: &Pose, achieved: &Pose, tolerance: f64) -> PoseCheck {
    let position_error = (desired.translation.vector - achieved.translation.vector).norm();
    PoseCheck {
        desired: *desired,
        achieved: *achieved,
        position_error,
        angular_error: desired.rotation.angle_to(&achieved.rotation),
        tolerance,
        within_tolerance: position_error <= tolerance,
    }
}

impl PoseCheck {
    /// Named outcome of a failed check, for callers that want to escalate it.
    pub fn unreachable(&self, phase: &str) -> Option<SequenceError> {
        if self.within_tolerance {
            None
        } else {
            Some(SequenceError::UnreachablePose {
                phase: phase.to_string(),
                error: self.position_error,
                tolerance: self.tolerance,
            })
        }
    }
}

impl fmt::Display for PoseCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "desired {}, actual {}, position error {:.5} m ({}), angular error {:.3} deg",
            format_pose(&self.desired),
            format_pose(&self.achieved),
            self.position_error,
            if self.within_tolerance { "ok" } else { "OUT OF TOLERANCE" },
            self.angular_error.to_degrees()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion, Vector3};

    fn pose(x: f64, y: f64, z: f64) -> Pose {
        Pose::from_parts(
            Translation3::new(x, y, z),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI),
        )
    }

    #[test]
    fn test_identical_positions() {
        let check = validate(&pose(-0.75, 0.5, 0.5), &pose(-0.75, 0.5, 0.5), DEFAULT_TOLERANCE);
        assert_eq!(check.position_error, 0.0);
        assert!(check.within_tolerance);
        assert!(check.unreachable("pickup").is_none());
    }

    #[test]
    fn test_error_is_euclidean() {
        let check = validate(&pose(0.0, 0.0, 0.0), &pose(0.003, 0.004, 0.0), DEFAULT_TOLERANCE);
        assert!((check.position_error - 0.005).abs() < 1e-12);
        let check = validate(&pose(1.0, 2.0, 3.0), &pose(1.0, 2.0, 3.1), DEFAULT_TOLERANCE);
        assert!(check.position_error > 0.0);
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        let check = validate(&pose(0.0, 0.0, 0.0), &pose(0.0, 0.0, 0.25), 0.25);
        assert!(check.within_tolerance);
        let check = validate(&pose(0.0, 0.0, 0.0), &pose(0.0, 0.0, 0.25), 0.125);
        assert!(!check.within_tolerance);
        assert_eq!(
            check.unreachable("dropoff item 2"),
            Some(SequenceError::UnreachablePose {
                phase: "dropoff item 2".into(),
                error: 0.25,
                tolerance: 0.125,
            })
        );
    }

    #[test]
    fn test_orientation_does_not_decide() {
        let desired = pose(0.5, 0.5, 0.5);
        let achieved = Pose::from_parts(Translation3::new(0.5, 0.5, 0.5), UnitQuaternion::identity());
        let check = validate(&desired, &achieved, DEFAULT_TOLERANCE);
        assert!(check.within_tolerance);
        assert!((check.angular_error - std::f64::consts::PI).abs() < 1e-9);
    }
}
