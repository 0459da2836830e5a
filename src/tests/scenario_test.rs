#[cfg(test)]
mod tests {
    use crate::cell_config::CellConfig;
    use crate::kinematic_traits::{Kinematics, Position};
    use crate::sequencer::{Phase, StepCounts, TaskPlan};
    use crate::synchronizer::GripperState;
    use crate::utils::is_valid;
    use crate::visualizer::RecordingVisualizer;
    use crate::waypoints::top_down_at;

    /// Demo cell moving a single item with short motions.
    fn single_item_cell() -> CellConfig {
        let mut config = CellConfig::default();
        config.pickup = top_down_at(Position::new(-0.75, 0.5, 0.5));
        config.settings.tolerance = 0.005;
        config.settings.steps = StepCounts { approach: 10, descent: 10 };
        config
    }

    #[test]
    fn test_single_item_on_demo_cell() {
        let config = single_item_cell();
        let robot = config.robot.build();
        let sequencer = config.sequencer(robot.as_ref()).expect("valid profile");
        let plan = TaskPlan::for_items(&[0], &config.settings.steps);

        let mut recorder = RecordingVisualizer::new();
        let summary = sequencer
            .run(&plan, config.start_joints, &mut recorder)
            .expect("continue policy never aborts");

        assert_eq!(summary.phases.len(), 5);
        assert_eq!(summary.frames, 50);
        assert_eq!(recorder.frames.len(), 50);
        assert_eq!(summary.completed, vec![0]);

        for record in &summary.phases {
            assert!(is_valid(&record.end));
            // Reported error is the distance the solved configuration really misses by
            let achieved = robot.forward(&record.end);
            let target = sequencer.resolver.resolve(&record.waypoint).expect("valid waypoint");
            let error = (target.translation.vector - achieved.translation.vector).norm();
            assert!((record.check.position_error - error).abs() < 1e-12);
            assert_eq!(record.check.within_tolerance, error <= 0.005);
        }

        let approach = &summary.phases[0];
        assert_eq!(approach.phase, Phase::ApproachPickup);
        assert_eq!(approach.frames, 10);
        // The approach segment runs from the start configuration to the solved one
        assert_eq!(recorder.frames[0].joints, config.start_joints);
        assert_eq!(recorder.frames[9].joints, approach.end);
        assert_eq!(
            approach.check.desired.translation.vector,
            Position::new(-0.75, 0.5, 0.5)
        );
    }

    #[test]
    fn test_gripper_stays_mounted_on_flange() {
        let config = single_item_cell();
        let robot = config.robot.build();
        let sequencer = config.sequencer(robot.as_ref()).expect("valid profile");
        let plan = TaskPlan::for_items(&[0], &config.settings.steps);

        let mut recorder = RecordingVisualizer::new();
        sequencer
            .run(&plan, config.start_joints, &mut recorder)
            .expect("continue policy never aborts");

        for frame in &recorder.frames {
            let arm = robot.forward(&frame.joints);
            assert_eq!(frame.arm_pose, arm);
            let offset = arm.inverse() * frame.gripper_pose;
            assert!((offset.translation.vector).norm() < 1e-9);
            assert!(offset.rotation.angle_to(&sequencer.mount.rotation) < 1e-9);
        }
        let closed = recorder
            .frames
            .iter()
            .filter(|f| f.gripper == GripperState::Closed)
            .count();
        // Approach dropoff and dropoff are carried
        assert_eq!(closed, 20);
    }

    #[test]
    fn test_all_items_of_demo_worklist() {
        let config = CellConfig {
            settings: crate::sequencer::SequencerSettings {
                steps: StepCounts { approach: 3, descent: 2 },
                ..CellConfig::default().settings
            },
            ..CellConfig::default()
        };
        let robot = config.robot.build();
        let sequencer = config.sequencer(robot.as_ref()).expect("valid profile");
        let summary = sequencer
            .run(&sequencer.plan(), config.start_joints, RecordingVisualizer::new())
            .expect("continue policy never aborts");
        assert_eq!(summary.completed, (0..9).collect::<Vec<_>>());
        assert_eq!(summary.phases.len(), 9 * 4 + 1);
        assert_eq!(summary.frames, 9 * (3 + 2 + 3 + 2) + 3);
    }
}
