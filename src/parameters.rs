//! Defines the geometric parameters of the arm

use crate::utils::deg;

/// Parameters of a six axis robot with ortho-parallel base and spherical wrist.
/// See [parameters_robots.rs](parameters_robots.rs) for concrete robot models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Offset along x between the joint 1 axis and the joint 2 axis.
    pub a1: f64,

    /// Offset between joint 3 and the forearm, along x when the arm points up.
    pub a2: f64,

    /// Lateral offset in y between joint 1 and joint 2.
    /// This can be 0 for robots without a lateral offset that is very common.
    pub b: f64,

    /// Height of the joint 2 axis above the base.
    pub c1: f64,

    /// Length of the upper arm (joint 2 to joint 3).
    pub c2: f64,

    /// Length of the forearm (joint 3 to the wrist center).
    pub c3: f64,

    /// Distance from the wrist center to the flange.
    pub c4: f64,

    /// Offsets applied to each joint angle to adjust the reference zero position.
    pub offsets: [f64; 6],

    /// Direction of positive rotation of each joint. `-1` reverses the direction.
    pub sign_corrections: [i8; 6],
}

impl Parameters {
    /// Convert to string yaml representation, same layout as the `robot` section
    /// of the cell configuration.
    pub fn to_yaml(&self) -> String {
        format!(
            "  a1: {}\n  \
              a2: {}\n  \
              b: {}\n  \
              c1: {}\n  \
              c2: {}\n  \
              c3: {}\n  \
              c4: {}\n  \
              offsets: [{}]\n  \
              sign_corrections: [{}]\n",
            self.a1,
            self.a2,
            self.b,
            self.c1,
            self.c2,
            self.c3,
            self.c4,
            self.offsets.iter().map(deg).collect::<Vec<_>>().join(", "),
            self.sign_corrections
                .iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
