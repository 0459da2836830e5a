//! Pick-and-place task sequencing.
//!
//! A run moves through `ApproachPickup -> Pickup -> ApproachDropoff -> Dropoff` once
//! per item and ends with a single `ReturnHome`. Every phase is executed by the same
//! primitive ([`Sequencer::execute_phase`]): resolve the target, solve it, check the
//! solution, interpolate from the previous configuration and stream the steps to the
//! visualizer. The joint configuration is passed by value from one phase to the next.

use crate::annotations::PhaseFlags;
use crate::interpolator::Interpolator;
use crate::kinematic_traits::{Joints, Kinematics};
use crate::pose_validator::{DEFAULT_TOLERANCE, PoseCheck, validate};
use crate::sequence_error::SequenceError;
use crate::synchronizer::{ActuatorSynchronizer, GripperState, StepLabel, default_mount};
use crate::utils::format_joints;
use crate::visualizer::Visualizer;
use crate::waypoints::{Waypoint, WaypointResolver};
use nalgebra::Isometry3;
use std::fmt;
use tracing::{error, info, warn};

/// Steps of the fast transfer moves (approach, return home).
pub const DEFAULT_APPROACH_STEPS: usize = 50;

/// Steps of the short vertical moves to and from the item.
pub const DEFAULT_DESCENT_STEPS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    ApproachPickup,
    Pickup,
    ApproachDropoff,
    Dropoff,
    ReturnHome,
}

impl Phase {
    /// Phases of one pickup and dropoff cycle, in execution order.
    pub const CYCLE: [Phase; 4] = [
        Phase::ApproachPickup,
        Phase::Pickup,
        Phase::ApproachDropoff,
        Phase::Dropoff,
    ];

    pub fn waypoint(&self, item: usize) -> Waypoint {
        match self {
            Phase::ApproachPickup => Waypoint::Pickup,
            Phase::Pickup => Waypoint::ItemPickup(item),
            Phase::ApproachDropoff => Waypoint::Dropoff,
            Phase::Dropoff => Waypoint::ItemDropoff(item),
            Phase::ReturnHome => Waypoint::Home,
        }
    }

    pub fn flags(&self) -> PhaseFlags {
        match self {
            Phase::ApproachPickup => PhaseFlags::APPROACH,
            Phase::Pickup => PhaseFlags::DESCEND | PhaseFlags::GRASP,
            Phase::ApproachDropoff => PhaseFlags::APPROACH | PhaseFlags::CARRYING,
            Phase::Dropoff => PhaseFlags::DESCEND | PhaseFlags::RELEASE | PhaseFlags::CARRYING,
            Phase::ReturnHome => PhaseFlags::HOME,
        }
    }

    /// Gripper state while the arm moves in this phase.
    pub fn gripper(&self) -> GripperState {
        if self.flags().contains(PhaseFlags::CARRYING) {
            GripperState::Closed
        } else {
            GripperState::Open
        }
    }

    fn steps(&self, steps: &StepCounts) -> usize {
        if self.flags().contains(PhaseFlags::DESCEND) {
            steps.descent
        } else {
            steps.approach
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ApproachPickup => "approach pickup",
            Phase::Pickup => "pickup",
            Phase::ApproachDropoff => "approach dropoff",
            Phase::Dropoff => "dropoff",
            Phase::ReturnHome => "return home",
        };
        write!(f, "{}", name)
    }
}

/// State of the sequencer. The index is the position of the task in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    ApproachPickup(usize),
    Pickup(usize),
    ApproachDropoff(usize),
    Dropoff(usize),
    ReturnHome,
    Done,
}

impl SequencerState {
    /// Where a run over the given number of tasks starts.
    pub fn initial(tasks: usize) -> Self {
        if tasks == 0 {
            SequencerState::ReturnHome
        } else {
            SequencerState::ApproachPickup(0)
        }
    }

    pub fn next(&self, tasks: usize) -> Self {
        match *self {
            SequencerState::ApproachPickup(task) => SequencerState::Pickup(task),
            SequencerState::Pickup(task) => SequencerState::ApproachDropoff(task),
            SequencerState::ApproachDropoff(task) => SequencerState::Dropoff(task),
            SequencerState::Dropoff(task) if task + 1 < tasks => SequencerState::ApproachPickup(task + 1),
            SequencerState::Dropoff(_) => SequencerState::ReturnHome,
            SequencerState::ReturnHome | SequencerState::Done => SequencerState::Done,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            SequencerState::ApproachPickup(_) => Some(Phase::ApproachPickup),
            SequencerState::Pickup(_) => Some(Phase::Pickup),
            SequencerState::ApproachDropoff(_) => Some(Phase::ApproachDropoff),
            SequencerState::Dropoff(_) => Some(Phase::Dropoff),
            SequencerState::ReturnHome => Some(Phase::ReturnHome),
            SequencerState::Done => None,
        }
    }

    pub fn task(&self) -> Option<usize> {
        match *self {
            SequencerState::ApproachPickup(task)
            | SequencerState::Pickup(task)
            | SequencerState::ApproachDropoff(task)
            | SequencerState::Dropoff(task) => Some(task),
            _ => None,
        }
    }
}

/// Interpolation steps per motion class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCounts {
    pub approach: usize,
    pub descent: usize,
}

impl Default for StepCounts {
    fn default() -> Self {
        StepCounts {
            approach: DEFAULT_APPROACH_STEPS,
            descent: DEFAULT_DESCENT_STEPS,
        }
    }
}

/// One motion of the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpec {
    pub phase: Phase,
    pub waypoint: Waypoint,
    pub steps: usize,
}

/// Pickup and dropoff of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub item: usize,
    pub phases: Vec<PhaseSpec>,
}

/// All motions of a run: the tasks in order, then the way home.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPlan {
    pub tasks: Vec<Task>,
    pub home: PhaseSpec,
}

impl TaskPlan {
    /// Tasks for every item of a worklist of the given size, in worklist order.
    pub fn for_worklist(items: usize, steps: &StepCounts) -> Self {
        Self::for_items(&(0..items).collect::<Vec<_>>(), steps)
    }

    /// Tasks for the given items in the given order. Indices are not checked here,
    /// a task with an invalid index fails when executed.
    pub fn for_items(items: &[usize], steps: &StepCounts) -> Self {
        let mut tasks: Vec<Task> = items
            .iter()
            .map(|&item| Task {
                item,
                phases: Vec::with_capacity(Phase::CYCLE.len()),
            })
            .collect();
        let mut home = None;

        let mut state = SequencerState::initial(items.len());
        while let Some(phase) = state.phase() {
            let spec = |item| PhaseSpec {
                phase,
                waypoint: phase.waypoint(item),
                steps: phase.steps(steps),
            };
            match state.task() {
                Some(task) => tasks[task].phases.push(spec(items[task])),
                None => home = Some(spec(0)),
            }
            state = state.next(items.len());
        }

        TaskPlan {
            tasks,
            home: home.unwrap_or(PhaseSpec {
                phase: Phase::ReturnHome,
                waypoint: Waypoint::Home,
                steps: steps.approach,
            }),
        }
    }

    /// All phases in execution order.
    pub fn phases(&self) -> impl Iterator<Item = &PhaseSpec> {
        self.tasks
            .iter()
            .flat_map(|task| task.phases.iter())
            .chain(std::iter::once(&self.home))
    }
}

/// What to do when the solved configuration misses the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreachablePolicy {
    /// Report and carry on with the imperfect configuration.
    #[default]
    Continue,
    /// Report and stop the run before moving.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerSettings {
    /// Maximal position error, meters.
    pub tolerance: f64,
    pub steps: StepCounts,
    pub on_unreachable: UnreachablePolicy,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        SequencerSettings {
            tolerance: DEFAULT_TOLERANCE,
            steps: StepCounts::default(),
            on_unreachable: UnreachablePolicy::Continue,
        }
    }
}

/// Result of one executed phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub waypoint: Waypoint,
    pub start: Joints,
    pub end: Joints,
    pub check: PoseCheck,
    pub frames: usize,
}

/// Everything that happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub phases: Vec<PhaseRecord>,
    pub frames: usize,

    /// Items that were picked and placed.
    pub completed: Vec<usize>,

    /// Items whose tasks failed, with the reason.
    pub failed: Vec<(usize, SequenceError)>,

    pub final_joints: Joints,
}

impl RunSummary {
    /// Phases whose solution was out of tolerance.
    pub fn unreachable(&self) -> impl Iterator<Item = &PhaseRecord> {
        self.phases.iter().filter(|p| !p.check.within_tolerance)
    }
}

pub struct Sequencer<'a> {
    pub robot: &'a dyn Kinematics,
    pub resolver: WaypointResolver<'a>,
    pub interpolator: Interpolator,

    /// Mounting of the gripper on the flange.
    pub mount: Isometry3<f64>,

    pub settings: SequencerSettings,
}

impl<'a> Sequencer<'a> {
    pub fn new(robot: &'a dyn Kinematics, resolver: WaypointResolver<'a>, settings: SequencerSettings) -> Self {
        Sequencer {
            robot,
            resolver,
            interpolator: Interpolator::default(),
            mount: default_mount(),
            settings,
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Plan over the whole inventory with the configured step counts.
    pub fn plan(&self) -> TaskPlan {
        TaskPlan::for_worklist(self.resolver.items(), &self.settings.steps)
    }

    /// Moves the arm from `start` to the waypoint of the phase. The returned record
    /// holds the configuration to start the next phase from.
    pub fn execute_phase<V: Visualizer>(
        &self,
        spec: &PhaseSpec,
        start: Joints,
        synchronizer: &mut ActuatorSynchronizer<'_, V>,
    ) -> Result<PhaseRecord, SequenceError> {
        let target = self.resolver.resolve(&spec.waypoint)?;
        let status = format!("moving to {}", spec.waypoint);
        info!(phase = %spec.phase, "{}", status);

        let end = self.robot.inverse_continuing(&target, &start);
        let check = validate(&target, &self.robot.forward(&end), self.settings.tolerance);
        if check.within_tolerance {
            info!("{}", check);
        } else {
            warn!("{}", check);
        }
        if let Some(unreachable) = check.unreachable(&spec.waypoint.to_string()) {
            if self.settings.on_unreachable == UnreachablePolicy::Abort {
                error!("{}, stopping", unreachable);
                return Err(unreachable);
            }
        }

        let segment = self.interpolator.interpolate(&start, &end, spec.steps);
        let label = StepLabel {
            status,
            flags: spec.phase.flags(),
            gripper: spec.phase.gripper(),
        };
        for (step, joints) in segment.iter().enumerate() {
            synchronizer.on_step(joints, step, segment.len(), &label);
        }

        Ok(PhaseRecord {
            phase: spec.phase,
            waypoint: spec.waypoint,
            start,
            end,
            check,
            frames: segment.len(),
        })
    }

    /// Executes all phases of the task. All waypoints are resolved before the arm
    /// moves, so a task with an invalid item index fails without any motion.
    pub fn execute_task<V: Visualizer>(
        &self,
        task: &Task,
        start: Joints,
        synchronizer: &mut ActuatorSynchronizer<'_, V>,
    ) -> Result<Vec<PhaseRecord>, SequenceError> {
        for spec in &task.phases {
            self.resolver.resolve(&spec.waypoint)?;
        }
        let mut joints = start;
        let mut records = Vec::with_capacity(task.phases.len());
        for spec in &task.phases {
            let record = self.execute_phase(spec, joints, synchronizer)?;
            joints = record.end;
            records.push(record);
        }
        Ok(records)
    }

    /// Executes the plan starting from the given configuration. Failed tasks are
    /// reported in the summary; only an escalated unreachable pose stops the run.
    pub fn run<V: Visualizer>(
        &self,
        plan: &TaskPlan,
        start: Joints,
        visualizer: V,
    ) -> Result<RunSummary, SequenceError> {
        let mut synchronizer = ActuatorSynchronizer::with_mount(self.robot, self.mount, visualizer);
        let mut summary = RunSummary {
            phases: Vec::new(),
            frames: 0,
            completed: Vec::new(),
            failed: Vec::new(),
            final_joints: start,
        };

        info!(
            tasks = plan.tasks.len(),
            "starting from {}",
            format_joints(&start)
        );
        let mut joints = start;
        for task in &plan.tasks {
            match self.execute_task(task, joints, &mut synchronizer) {
                Ok(records) => {
                    if let Some(last) = records.last() {
                        joints = last.end;
                    }
                    summary.phases.extend(records);
                    summary.completed.push(task.item);
                }
                Err(failure @ SequenceError::InvalidIndex { .. }) => {
                    error!(item = task.item, "task skipped: {}", failure);
                    summary.failed.push((task.item, failure));
                }
                Err(failure) => return Err(failure),
            }
        }

        let home = self.execute_phase(&plan.home, joints, &mut synchronizer)?;
        joints = home.end;
        summary.phases.push(home);

        summary.frames = synchronizer.frames();
        summary.final_joints = joints;
        info!(
            completed = summary.completed.len(),
            failed = summary.failed.len(),
            out_of_tolerance = summary.unreachable().count(),
            frames = summary.frames,
            "run complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_single_item() {
        let mut state = SequencerState::initial(1);
        let mut visited = vec![state];
        while state != SequencerState::Done {
            state = state.next(1);
            visited.push(state);
        }
        assert_eq!(
            visited,
            vec![
                SequencerState::ApproachPickup(0),
                SequencerState::Pickup(0),
                SequencerState::ApproachDropoff(0),
                SequencerState::Dropoff(0),
                SequencerState::ReturnHome,
                SequencerState::Done,
            ]
        );
        assert_eq!(SequencerState::Done.next(1), SequencerState::Done);
    }

    #[test]
    fn test_state_machine_moves_to_next_item() {
        assert_eq!(SequencerState::Dropoff(0).next(2), SequencerState::ApproachPickup(1));
        assert_eq!(SequencerState::Dropoff(1).next(2), SequencerState::ReturnHome);
        assert_eq!(SequencerState::initial(0), SequencerState::ReturnHome);
    }

    #[test]
    fn test_plan_for_worklist() {
        let plan = TaskPlan::for_worklist(3, &StepCounts::default());
        assert_eq!(plan.tasks.len(), 3);
        for (i, task) in plan.tasks.iter().enumerate() {
            assert_eq!(task.item, i);
            let phases: Vec<Phase> = task.phases.iter().map(|p| p.phase).collect();
            assert_eq!(phases, Phase::CYCLE.to_vec());
            assert_eq!(task.phases[1].waypoint, Waypoint::ItemPickup(i));
            assert_eq!(task.phases[3].waypoint, Waypoint::ItemDropoff(i));
            assert_eq!(task.phases[0].steps, DEFAULT_APPROACH_STEPS);
            assert_eq!(task.phases[1].steps, DEFAULT_DESCENT_STEPS);
        }
        assert_eq!(plan.home.waypoint, Waypoint::Home);
        assert_eq!(plan.phases().count(), 13);
        assert_eq!(plan.phases().last().map(|p| p.phase), Some(Phase::ReturnHome));
    }

    #[test]
    fn test_plan_for_explicit_items() {
        let plan = TaskPlan::for_items(&[4, 2], &StepCounts { approach: 20, descent: 5 });
        let items: Vec<usize> = plan.tasks.iter().map(|t| t.item).collect();
        assert_eq!(items, vec![4, 2]);
        assert_eq!(plan.tasks[1].phases[3].waypoint, Waypoint::ItemDropoff(2));
        assert_eq!(plan.tasks[1].phases[3].steps, 5);
        assert_eq!(plan.home.steps, 20);
    }

    #[test]
    fn test_empty_plan_only_goes_home() {
        let plan = TaskPlan::for_worklist(0, &StepCounts::default());
        assert!(plan.tasks.is_empty());
        assert_eq!(plan.phases().count(), 1);
    }

    #[test]
    fn test_gripper_closed_while_carrying() {
        assert_eq!(Phase::ApproachPickup.gripper(), GripperState::Open);
        assert_eq!(Phase::Pickup.gripper(), GripperState::Open);
        assert_eq!(Phase::ApproachDropoff.gripper(), GripperState::Closed);
        assert_eq!(Phase::Dropoff.gripper(), GripperState::Closed);
        assert_eq!(Phase::ReturnHome.gripper(), GripperState::Open);
    }
}
