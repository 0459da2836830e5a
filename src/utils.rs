//! Helper functions

use crate::kinematic_traits::{Joints, Pose};

/// Checks if all elements in the array are finite
pub fn is_valid(qs: &Joints) -> bool {
    qs.iter().all(|&q| q.is_finite())
}

/// Formats joint values, converting radians to degrees.
pub fn format_joints(joints: &Joints) -> String {
    let row = joints
        .iter()
        .map(|q| format!("{:5.2}", q.to_degrees()))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{}]", row)
}

/// Formats the pose as translation and quaternion.
pub fn format_pose(pose: &Pose) -> String {
    let translation = pose.translation.vector;
    let rotation = pose.rotation;
    format!(
        "[{:.3}, {:.3}, {:.3}], quat {{ w: {:.3}, i: {:.3}, j: {:.3}, k: {:.3} }}",
        translation.x,
        translation.y,
        translation.z,
        rotation.w,
        rotation.i,
        rotation.j,
        rotation.k
    )
}

/// Allows to specify joint values in degrees (converts to radians)
pub fn as_radians(degrees: [f64; 6]) -> Joints {
    degrees.map(f64::to_radians)
}

/// Formatting for YAML output
pub(crate) fn deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    format!("deg({:.4})", x.to_degrees())
}
