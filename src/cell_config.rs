//! Description of the pick-and-place cell: robot, fixed poses, worklist and motion
//! settings. The defaults describe the demo cell; see `cell_config_from_file.rs` for
//! reading it from YAML.

use crate::constraints::Constraints;
use crate::interpolator::Interpolator;
use crate::inventory::Worklist;
use crate::kinematic_traits::{Joints, Kinematics, Pose, Position, JOINTS_AT_ZERO};
use crate::kinematics_impl::OPWKinematics;
use crate::lspb::{DEFAULT_VELOCITY, Lspb, ProfileError};
use crate::parameters::Parameters;
use crate::sequencer::{Sequencer, SequencerSettings, UnreachablePolicy};
use crate::tool::{Base, Tool};
use crate::utils::deg;
use crate::waypoints::{WaypointResolver, top_down_at};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RobotConfig {
    /// Name of the preset the parameters come from, if any.
    pub model: Option<String>,
    pub parameters: Parameters,
    pub constraints: Option<Constraints>,

    /// Height of the pedestal the robot stands on, meters.
    pub base_height: f64,

    /// Distance from the flange to the gripper fingertips, meters.
    pub tool_length: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            model: Some("irb2400_10".to_string()),
            parameters: Parameters::irb2400_10(),
            constraints: Some(Constraints::irb2400_10()),
            base_height: 0.0,
            tool_length: 0.0,
        }
    }
}

impl RobotConfig {
    /// Kinematic model with the base and the tool applied.
    pub fn build(&self) -> Arc<dyn Kinematics> {
        let arm = match &self.constraints {
            Some(constraints) => OPWKinematics::new_with_constraints(self.parameters, constraints.clone()),
            None => OPWKinematics::new(self.parameters),
        };
        let mut robot: Arc<dyn Kinematics> = Arc::new(arm);
        if self.base_height != 0.0 {
            robot = Arc::new(Base::raised(robot, self.base_height));
        }
        if self.tool_length != 0.0 {
            robot = Arc::new(Tool::straight(robot, self.tool_length));
        }
        robot
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellConfig {
    pub robot: RobotConfig,

    pub home: Pose,
    pub pickup: Pose,
    pub dropoff: Pose,

    pub worklist: Worklist,

    pub settings: SequencerSettings,

    /// Cruise velocity of the LSPB profile on the unit interval.
    pub lspb_velocity: f64,

    /// Pause after every rendered frame. Zero for headless runs.
    pub frame_delay: Duration,

    /// Configuration of the robot when the run starts.
    pub start_joints: Joints,
}

impl Default for CellConfig {
    fn default() -> Self {
        CellConfig {
            robot: RobotConfig::default(),
            home: top_down_at(Position::new(0.9, 0.0, 1.2)),
            pickup: top_down_at(Position::new(-0.75, 0.5, 0.5)),
            dropoff: top_down_at(Position::new(0.75, 0.5, 0.5)),
            worklist: Worklist::demo(),
            settings: SequencerSettings::default(),
            lspb_velocity: DEFAULT_VELOCITY,
            frame_delay: Duration::ZERO,
            start_joints: JOINTS_AT_ZERO,
        }
    }
}

impl CellConfig {
    pub fn interpolator(&self) -> Result<Interpolator, ProfileError> {
        Ok(Interpolator::new(Lspb::new(self.lspb_velocity)?))
    }

    pub fn resolver(&self) -> WaypointResolver<'_> {
        WaypointResolver::new(self.home, self.pickup, self.dropoff, &self.worklist)
    }

    /// Sequencer for this cell driving the given robot (normally from [`RobotConfig::build`]).
    pub fn sequencer<'a>(&'a self, robot: &'a dyn Kinematics) -> Result<Sequencer<'a>, ProfileError> {
        Ok(Sequencer::new(robot, self.resolver(), self.settings).with_interpolator(self.interpolator()?))
    }

    /// Motion settings in the same layout as the `motion` section of the YAML file.
    pub fn motion_yaml(&self) -> String {
        let policy = match self.settings.on_unreachable {
            UnreachablePolicy::Continue => "continue",
            UnreachablePolicy::Abort => "abort",
        };
        format!(
            "motion:\n  \
              tolerance: {}\n  \
              approach_steps: {}\n  \
              descent_steps: {}\n  \
              lspb_velocity: {}\n  \
              frame_delay_ms: {}\n  \
              on_unreachable: {}\n  \
              start_joints: [{}]\n",
            self.settings.tolerance,
            self.settings.steps.approach,
            self.settings.steps.descent,
            self.lspb_velocity,
            self.frame_delay.as_millis(),
            policy,
            self.start_joints.iter().map(deg).collect::<Vec<_>>().join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;

    #[test]
    fn test_default_cell() {
        let config = CellConfig::default();
        assert_eq!(config.worklist.len(), 9);
        assert_eq!(config.settings.tolerance, 0.005);
        assert_eq!(config.pickup.translation.vector, Position::new(-0.75, 0.5, 0.5));
        assert!(config.interpolator().is_ok());
    }

    #[test]
    fn test_build_applies_base_and_tool() {
        let mut config = RobotConfig::default();
        let bare = config.build();
        config.base_height = 0.3;
        let raised = config.build();
        let joints = [0.0; 6];
        let lift = raised.forward(&joints).translation.vector - bare.forward(&joints).translation.vector;
        assert!((lift - Position::new(0.0, 0.0, 0.3)).norm() < 1e-12);
        assert!(raised.constraints().is_some());
        assert_eq!(raised.dof(), 6);
    }

    #[test]
    fn test_invalid_profile_is_reported() {
        let config = CellConfig {
            lspb_velocity: 0.5,
            ..CellConfig::default()
        };
        assert!(config.interpolator().is_err());
    }

    #[test]
    fn test_motion_yaml() {
        let yaml = CellConfig::default().motion_yaml();
        assert!(yaml.contains("approach_steps: 50"));
        assert!(yaml.contains("on_unreachable: continue"));
        assert!(yaml.contains("start_joints: [0, 0, 0, 0, 0, 0]"));
    }
}
