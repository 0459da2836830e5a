//! Sinks for the frames produced while the arm moves.
//!
//! The sequencer never draws anything itself. It hands every interpolated step to a
//! [`Visualizer`]; rendering, logging or recording is up to the implementation. The
//! call returns only when the frame is done, there is no buffering.

use crate::annotations::PhaseFlags;
use crate::kinematic_traits::{Joints, Pose};
use crate::synchronizer::GripperState;
use crate::utils::{format_joints, format_pose};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Everything known about the robot at one interpolation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Running number of the frame within the run.
    pub index: usize,

    /// Step within the current phase, and the number of steps of the phase.
    pub step: usize,
    pub steps: usize,

    pub joints: Joints,

    /// Pose of the arm flange (or tool, if one is configured).
    pub arm_pose: Pose,

    /// Pose of the gripper, derived from the arm pose.
    pub gripper_pose: Pose,

    pub gripper: GripperState,
    pub flags: PhaseFlags,

    /// Text shown next to the robot, describes the current phase.
    pub status: String,
}

pub trait Visualizer {
    fn render_frame(&mut self, frame: &Frame);
}

impl<V: Visualizer + ?Sized> Visualizer for &mut V {
    fn render_frame(&mut self, frame: &Frame) {
        (**self).render_frame(frame)
    }
}

/// Keeps every frame in memory. Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingVisualizer {
    pub frames: Vec<Frame>,
}

impl RecordingVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames whose status starts with the given text.
    pub fn frames_with_status<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Frame> + 'a {
        self.frames.iter().filter(move |f| f.status.starts_with(prefix))
    }
}

impl Visualizer for RecordingVisualizer {
    fn render_frame(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// The single text label shown next to the robot. Replaced as a whole on every
/// frame; dropping it removes it from the screen.
#[derive(Debug)]
struct StatusOverlay {
    text: String,
}

impl Drop for StatusOverlay {
    fn drop(&mut self) {
        trace!(text = %self.text, "status overlay released");
    }
}

/// Writes frames to the log (`debug` level) and keeps the current status overlay.
#[derive(Debug, Default)]
pub struct ConsoleVisualizer {
    overlay: Option<StatusOverlay>,
    frames: usize,
}

impl ConsoleVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the overlay currently on screen.
    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_ref().map(|o| o.text.as_str())
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Removes the overlay, as when the figure is closed.
    pub fn clear(&mut self) {
        self.overlay = None;
    }
}

impl Visualizer for ConsoleVisualizer {
    fn render_frame(&mut self, frame: &Frame) {
        // Previous overlay is dropped by the replacement.
        self.overlay = Some(StatusOverlay {
            text: frame.status.clone(),
        });
        self.frames += 1;
        debug!(
            frame = frame.index,
            step = frame.step + 1,
            steps = frame.steps,
            flags = %frame.flags,
            gripper = ?frame.gripper,
            "{} joints {} gripper {}",
            frame.status,
            format_joints(&frame.joints),
            format_pose(&frame.gripper_pose)
        );
    }
}

/// Slows another visualizer down to a human watchable speed.
#[derive(Debug)]
pub struct Paced<V> {
    pub inner: V,
    pub delay: Duration,
}

impl<V: Visualizer> Paced<V> {
    pub fn new(inner: V, delay: Duration) -> Self {
        Paced { inner, delay }
    }

    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V: Visualizer> Visualizer for Paced<V> {
    fn render_frame(&mut self, frame: &Frame) {
        self.inner.render_frame(frame);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn frame(index: usize, status: &str) -> Frame {
        Frame {
            index,
            step: index,
            steps: 3,
            joints: [0.0; 6],
            arm_pose: Pose::identity(),
            gripper_pose: Pose::identity(),
            gripper: GripperState::Open,
            flags: PhaseFlags::APPROACH,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_console_overlay_is_replaced() {
        let mut console = ConsoleVisualizer::new();
        assert_eq!(console.overlay(), None);
        console.render_frame(&frame(0, "moving to pickup"));
        console.render_frame(&frame(1, "moving to item-pickup 0"));
        assert_eq!(console.overlay(), Some("moving to item-pickup 0"));
        assert_eq!(console.frames(), 2);
        console.clear();
        assert_eq!(console.overlay(), None);
    }

    #[test]
    fn test_recording_through_mutable_reference() {
        fn feed<V: Visualizer>(mut sink: V, frame: &Frame) {
            sink.render_frame(frame);
        }

        let mut recorder = RecordingVisualizer::new();
        feed(&mut recorder, &frame(0, "moving to home"));
        assert_eq!(recorder.frames.len(), 1);
        assert_eq!(recorder.frames_with_status("moving to home").count(), 1);
    }

    #[test]
    fn test_paced_waits_after_frame() {
        let mut paced = Paced::new(RecordingVisualizer::new(), Duration::from_millis(5));
        let started = Instant::now();
        paced.render_frame(&frame(0, "a"));
        paced.render_frame(&frame(1, "b"));
        assert!(started.elapsed() >= Duration::from_millis(10));
        assert_eq!(paced.into_inner().frames.len(), 2);
    }
}
