//! Hardcoded parameters and joint limits for a few robots

use crate::constraints::Constraints;
use crate::parameters::Parameters;
use std::f64::consts::PI;

/// Names accepted by [`Parameters::by_name`].
pub const KNOWN_ROBOTS: [&str; 3] = ["irb2400_10", "kuka_kr6_r700_sixx", "igus_rebel"];

impl Parameters {
    // Provides default values
    pub fn new() -> Self {
        Parameters {
            a1: 0.0,
            a2: 0.0,
            b: 0.0,
            c1: 0.0,
            c2: 0.0,
            c3: 0.0,
            c4: 0.0,
            offsets: [0.0; 6],
            sign_corrections: [1; 6],
        }
    }

    /// ABB IRB 2400/10, the default robot of the cell.
    pub fn irb2400_10() -> Self {
        Parameters {
            a1: 0.100,
            a2: -0.135,
            b: 0.000,
            c1: 0.615,
            c2: 0.705,
            c3: 0.755,
            c4: 0.085,
            offsets: [0.0, 0.0, -PI / 2.0, 0.0, 0.0, 0.0],
            ..Self::new()
        }
    }

    pub fn kuka_kr6_r700_sixx() -> Self {
        Parameters {
            a1: 0.025,
            a2: -0.035,
            b: 0.000,
            c1: 0.400,
            c2: 0.315,
            c3: 0.365,
            c4: 0.080,
            offsets: [0.0, -PI / 2.0, 0.0, 0.0, 0.0, 0.0],
            sign_corrections: [-1, 1, 1, -1, 1, -1],
        }
    }

    pub fn igus_rebel() -> Self {
        Parameters {
            a1: 0.149,
            a2: -0.119,
            b: 0.,
            c1: 0.1,
            c2: 0.2384,
            c3: 0.17,
            c4: 0.1208,
            offsets: [0.0; 6],
            sign_corrections: [-1, 1, 1, 1, 1, 1],
        }
    }

    /// Looks up one of the [`KNOWN_ROBOTS`].
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "irb2400_10" => Some(Self::irb2400_10()),
            "kuka_kr6_r700_sixx" => Some(Self::kuka_kr6_r700_sixx()),
            "igus_rebel" => Some(Self::igus_rebel()),
            _ => None,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::irb2400_10()
    }
}

impl Constraints {
    /// Axis ranges of the IRB 2400 from the product specification.
    pub fn irb2400_10() -> Self {
        Constraints::from_degrees(
            [-180.0, -100.0, -60.0, -200.0, -120.0, -400.0],
            [180.0, 110.0, 65.0, 200.0, 120.0, 400.0],
        )
    }

    pub fn kuka_kr6_r700_sixx() -> Self {
        Constraints::from_degrees(
            [-170.0, -190.0, -120.0, -185.0, -120.0, -350.0],
            [170.0, 45.0, 156.0, 185.0, 120.0, 350.0],
        )
    }

    pub fn igus_rebel() -> Self {
        Constraints::from_degrees(
            [-179.0, -45.0, -80.0, -179.0, -100.0, -179.0],
            [179.0, 70.0, 135.0, 179.0, 100.0, 179.0],
        )
    }

    /// Limits of one of the [`KNOWN_ROBOTS`].
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "irb2400_10" => Some(Self::irb2400_10()),
            "kuka_kr6_r700_sixx" => Some(Self::kuka_kr6_r700_sixx()),
            "igus_rebel" => Some(Self::igus_rebel()),
            _ => None,
        }
    }
}
