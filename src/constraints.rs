//! Joint limits of the robot.

use crate::kinematic_traits::Joints;

#[derive(Clone, Debug, PartialEq)]
pub struct Constraints {
    /// Lower limit of each joint, radians.
    pub from: Joints,

    /// Upper limit of each joint, radians. A joint with from == to is unconstrained.
    pub to: Joints,
}

impl Constraints {
    /// Creates limits from the given ranges. Bounds given in the wrong order are swapped.
    pub fn new(from: Joints, to: Joints) -> Self {
        let mut lower = from;
        let mut upper = to;
        for i in 0..6 {
            if lower[i] > upper[i] {
                std::mem::swap(&mut lower[i], &mut upper[i]);
            }
        }
        Constraints { from: lower, to: upper }
    }

    /// Same as new but with limits given in degrees.
    pub fn from_degrees(from: [f64; 6], to: [f64; 6]) -> Self {
        Self::new(from.map(f64::to_radians), to.map(f64::to_radians))
    }

    fn unconstrained(&self, joint: usize) -> bool {
        self.from[joint] == self.to[joint]
    }

    pub fn compliant(&self, angles: &Joints) -> bool {
        (0..6).all(|i| {
            self.unconstrained(i) || (angles[i] >= self.from[i] && angles[i] <= self.to[i])
        })
    }

    /// Brings every joint into its allowed range.
    pub fn clamp(&self, angles: &Joints) -> Joints {
        std::array::from_fn(|i| {
            if self.unconstrained(i) {
                angles[i]
            } else {
                angles[i].clamp(self.from[i], self.to[i])
            }
        })
    }

    /// Middle of the allowed range of every joint (0 for unconstrained joints).
    pub fn center(&self) -> Joints {
        std::array::from_fn(|i| {
            if self.unconstrained(i) {
                0.0
            } else {
                (self.from[i] + self.to[i]) / 2.0
            }
        })
    }
}
