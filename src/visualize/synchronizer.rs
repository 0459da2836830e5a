//! Drives the gripper in lockstep with the arm.
//!
//! The gripper has no timing of its own. On every interpolation step its pose is
//! derived from the instantaneous arm pose through a constant mounting rotation, and
//! both are handed to the visualizer as a single frame.

use crate::annotations::PhaseFlags;
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::visualizer::{Frame, Visualizer};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripperState {
    Open,
    Closed,
}

/// How the gripper is mounted on the flange: rotated 90 degrees around the flange Z axis.
pub fn default_mount() -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::identity(),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
    )
}

/// Describes the phase the emitted frames belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct StepLabel {
    pub status: String,
    pub flags: PhaseFlags,
    pub gripper: GripperState,
}

pub struct ActuatorSynchronizer<'a, V: Visualizer> {
    robot: &'a dyn Kinematics,

    /// Constant transform from the arm flange to the gripper.
    pub mount: Isometry3<f64>,

    visualizer: V,
    frames: usize,
}

impl<'a, V: Visualizer> ActuatorSynchronizer<'a, V> {
    pub fn new(robot: &'a dyn Kinematics, visualizer: V) -> Self {
        Self::with_mount(robot, default_mount(), visualizer)
    }

    pub fn with_mount(robot: &'a dyn Kinematics, mount: Isometry3<f64>, visualizer: V) -> Self {
        ActuatorSynchronizer {
            robot,
            mount,
            visualizer,
            frames: 0,
        }
    }

    /// Gripper pose for the given arm pose.
    pub fn gripper_pose(&self, arm_pose: &Pose) -> Pose {
        arm_pose * self.mount
    }

    /// Computes arm and gripper poses for the configuration and renders them.
    /// Returns the emitted frame.
    pub fn on_step(&mut self, joints: &Joints, step: usize, steps: usize, label: &StepLabel) -> Frame {
        let arm_pose = self.robot.forward(joints);
        let frame = Frame {
            index: self.frames,
            step,
            steps,
            joints: *joints,
            arm_pose,
            gripper_pose: self.gripper_pose(&arm_pose),
            gripper: label.gripper,
            flags: label.flags,
            status: label.status.clone(),
        };
        self.visualizer.render_frame(&frame);
        self.frames += 1;
        frame
    }

    /// Number of frames emitted so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_visualizer(self) -> V {
        self.visualizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics_impl::OPWKinematics;
    use crate::parameters::Parameters;
    use crate::utils::as_radians;
    use crate::visualizer::RecordingVisualizer;

    fn label() -> StepLabel {
        StepLabel {
            status: "moving to pickup".into(),
            flags: PhaseFlags::APPROACH,
            gripper: GripperState::Open,
        }
    }

    #[test]
    fn test_gripper_follows_flange() {
        let robot = OPWKinematics::new(Parameters::irb2400_10());
        let mut synchronizer = ActuatorSynchronizer::new(&robot, RecordingVisualizer::new());
        let joints = as_radians([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        let frame = synchronizer.on_step(&joints, 0, 1, &label());

        let flange = robot.forward(&joints);
        assert_eq!(frame.arm_pose, flange);
        // Same position, rotated by the mount around the flange Z axis
        assert!((frame.gripper_pose.translation.vector - flange.translation.vector).norm() < 1e-12);
        let relative = flange.rotation.inverse() * frame.gripper_pose.rotation;
        assert!((relative.angle() - FRAC_PI_2).abs() < 1e-9);
        let axis = relative.axis().expect("non zero rotation");
        assert!((axis.into_inner() - Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn test_every_step_is_rendered() {
        let robot = OPWKinematics::new(Parameters::irb2400_10());
        let mut recorder = RecordingVisualizer::new();
        {
            let mut synchronizer = ActuatorSynchronizer::new(&robot, &mut recorder);
            for step in 0..5 {
                synchronizer.on_step(&[0.1 * step as f64; 6], step, 5, &label());
            }
            assert_eq!(synchronizer.frames(), 5);
        }
        assert_eq!(recorder.frames.len(), 5);
        let indices: Vec<usize> = recorder.frames.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(recorder.frames.iter().all(|f| f.status == "moving to pickup"));
    }
}
