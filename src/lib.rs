//! Pick-and-place sequencing for a six-axis industrial arm with a synchronized gripper.
//!
//! The arm moves items one by one from a pickup tray to a dropoff tray. For every item the
//! sequencer goes through `ApproachPickup -> Pickup -> ApproachDropoff -> Dropoff` and, once
//! all items are done, returns home. Each phase:
//!
//! - resolves the named waypoint (`home`, `pickup`, `dropoff`, `item-pickup <i>`,
//!   `item-dropoff <i>`) into a Cartesian pose,
//! - solves inverse kinematics for it, seeded by the current configuration,
//! - validates the solution by forward kinematics against a position tolerance,
//! - interpolates joint space from the current configuration with a Linear Segment with
//!   Parabolic Blends (LSPB) profile,
//! - streams every step to a [`visualizer::Visualizer`] together with the gripper pose,
//!   which is rigidly derived from the arm flange.
//!
//! The arm model uses seven OPW parameters (_a1, a2, b, c1, c2, c3_, and _c4_) for robots with an
//! ortho-parallel base and a spherical wrist. The arm is at zero when all joints stick straight up.
//! Presets for a few known robots are in `parameters_robots.rs`.
//!
//! # Example
//!
//! ```
//! use rs_pick_place::cell_config::CellConfig;
//! use rs_pick_place::visualizer::RecordingVisualizer;
//! use rs_pick_place::sequencer::TaskPlan;
//!
//! let config = CellConfig::default();
//! let robot = config.robot.build();
//! let sequencer = config.sequencer(robot.as_ref()).expect("valid profile");
//! let plan = TaskPlan::for_items(&[0], &config.settings.steps);
//!
//! let mut recorder = RecordingVisualizer::new();
//! let summary = sequencer.run(&plan, config.start_joints, &mut recorder).expect("run completes");
//! assert_eq!(summary.completed, vec![0]);
//! assert_eq!(summary.frames, recorder.frames.len());
//! ```

pub mod parameters;
pub mod parameters_robots;

pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;

pub mod constraints;

pub mod tool;

pub mod jacobian;

pub mod annotations;

pub mod sequence_error;

pub mod pose_validator;

#[path = "planning/inventory.rs"]
pub mod inventory;

#[path = "planning/waypoints.rs"]
pub mod waypoints;

#[path = "path_plan/lspb.rs"]
pub mod lspb;

#[path = "path_plan/interpolator.rs"]
pub mod interpolator;

#[path = "visualize/visualizer.rs"]
pub mod visualizer;

#[path = "visualize/synchronizer.rs"]
pub mod synchronizer;

pub mod sequencer;

pub mod cell_config;

#[cfg(feature = "allow_filesystem")]
pub mod config_error;

#[cfg(feature = "allow_filesystem")]
pub mod cell_config_from_file;

#[cfg(test)]
mod tests;
