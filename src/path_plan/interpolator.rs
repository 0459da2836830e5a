use crate::kinematic_traits::Joints;
use crate::lspb::Lspb;

/// Convex combination of two joint configurations: `(1 - s) * start + s * end`.
/// Values of `s` outside of [0, 1] are clamped.
pub fn interpolate_joints(start: &Joints, end: &Joints, s: f64) -> Joints {
    if s <= 0.0 {
        return *start;
    } else if s >= 1.0 {
        return *end;
    }
    std::array::from_fn(|i| {
        if start[i] == end[i] {
            start[i] // keeps stationary joints bit-exact
        } else {
            (1.0 - s) * start[i] + s * end[i]
        }
    })
}

/// Ordered joint configurations of one motion, first is the start and last the end.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySegment {
    steps: Vec<Joints>,
}

impl TrajectorySegment {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<&Joints> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&Joints> {
        self.steps.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Joints> {
        self.steps.iter()
    }

    pub fn as_slice(&self) -> &[Joints] {
        &self.steps
    }
}

impl IntoIterator for TrajectorySegment {
    type Item = Joints;
    type IntoIter = std::vec::IntoIter<Joints>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Builds joint space motions with LSPB time scaling. All joints follow the same
/// path parameter, so joints with different travel do not peak in velocity together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Interpolator {
    pub profile: Lspb,
}

impl Interpolator {
    pub fn new(profile: Lspb) -> Self {
        Interpolator { profile }
    }

    /// Samples the motion from `start` to `end` at `steps` uniformly spaced instants.
    /// The first and the last element are exact copies of `start` and `end`.
    /// A single step only contains `end`, zero steps produce an empty segment.
    pub fn interpolate(&self, start: &Joints, end: &Joints, steps: usize) -> TrajectorySegment {
        let steps = match steps {
            0 => Vec::new(),
            1 => vec![*end],
            _ => {
                let last = (steps - 1) as f64;
                (0..steps)
                    .map(|j| {
                        let s = self.profile.position(j as f64 / last);
                        interpolate_joints(start, end, s)
                    })
                    .collect()
            }
        };
        TrajectorySegment { steps }
    }
}
