//! Linear segment with parabolic blends (trapezoidal velocity) time scaling on the
//! unit interval.
//!
//! The profile `s(t)` accelerates uniformly during the first blend, cruises at the
//! constant velocity `V` and decelerates symmetrically, so that `s(0) = 0`,
//! `s(1) = 1` and `s'(0) = s'(1) = 0`. The blend time is `1 - 1/V`, which requires
//! `1 < V <= 2`. At `V = 2` the linear segment vanishes and both parabolas meet in
//! the middle.

use std::fmt;

/// Cruise velocity used unless configured otherwise (blend time 1/3).
pub const DEFAULT_VELOCITY: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lspb {
    velocity: f64,
    blend: f64,
    acceleration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileError {
    pub velocity: f64,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LSPB cruise velocity must be in (1, 2] on the unit interval, got {}",
            self.velocity
        )
    }
}

impl std::error::Error for ProfileError {}

impl Lspb {
    pub fn new(velocity: f64) -> Result<Self, ProfileError> {
        if !(velocity > 1.0 && velocity <= 2.0) {
            return Err(ProfileError { velocity });
        }
        let blend = 1.0 - 1.0 / velocity;
        Ok(Lspb {
            velocity,
            blend,
            acceleration: velocity / blend,
        })
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Duration of each parabolic blend as a fraction of the motion.
    pub fn blend_time(&self) -> f64 {
        self.blend
    }

    /// Path parameter at time `t`. Values of `t` outside of [0, 1] are clamped.
    pub fn position(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let a = self.acceleration;
        if t <= self.blend {
            a / 2.0 * t * t
        } else if t < 1.0 - self.blend {
            let cruise_start = a / 2.0 * self.blend * self.blend;
            cruise_start + self.velocity * (t - self.blend)
        } else {
            let remaining = 1.0 - t;
            1.0 - a / 2.0 * remaining * remaining
        }
    }

    /// Derivative of [`Lspb::position`].
    pub fn velocity_at(&self, t: f64) -> f64 {
        if !(0.0..=1.0).contains(&t) {
            return 0.0;
        }
        if t <= self.blend {
            self.acceleration * t
        } else if t < 1.0 - self.blend {
            self.velocity
        } else {
            self.acceleration * (1.0 - t)
        }
    }
}

impl Default for Lspb {
    fn default() -> Self {
        let blend = 1.0 - 1.0 / DEFAULT_VELOCITY;
        Lspb {
            velocity: DEFAULT_VELOCITY,
            blend,
            acceleration: DEFAULT_VELOCITY / blend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: usize = 1000;

    fn profiles() -> Vec<Lspb> {
        [1.1, 1.5, 1.9, 2.0].iter().map(|&v| Lspb::new(v).unwrap()).collect()
    }

    #[test]
    fn test_endpoints() {
        for profile in profiles() {
            assert_eq!(profile.position(0.0), 0.0);
            assert_eq!(profile.position(1.0), 1.0);
            assert_eq!(profile.velocity_at(0.0), 0.0);
            assert_eq!(profile.velocity_at(1.0), 0.0);
        }
    }

    #[test]
    fn test_monotonic() {
        for profile in profiles() {
            let mut previous = profile.position(0.0);
            for i in 1..=SAMPLES {
                let s = profile.position(i as f64 / SAMPLES as f64);
                assert!(s >= previous, "not monotonic at sample {}: {} < {}", i, s, previous);
                previous = s;
            }
        }
    }

    #[test]
    fn test_continuous_at_blend_boundaries() {
        for profile in profiles() {
            for boundary in [profile.blend_time(), 1.0 - profile.blend_time()] {
                let before = boundary - 1e-9;
                let after = boundary + 1e-9;
                assert!((profile.position(before) - profile.position(after)).abs() < 1e-8);
                assert!(
                    (profile.velocity_at(before) - profile.velocity_at(after)).abs() < 1e-6,
                    "velocity jump at {} for V = {}",
                    boundary,
                    profile.velocity()
                );
            }
        }
    }

    #[test]
    fn test_velocity_matches_position_slope() {
        let profile = Lspb::default();
        let h = 1e-6;
        for i in 1..SAMPLES {
            let t = i as f64 / SAMPLES as f64;
            let slope = (profile.position(t + h) - profile.position(t - h)) / (2.0 * h);
            assert!((slope - profile.velocity_at(t)).abs() < 1e-4, "at t = {}", t);
        }
    }

    #[test]
    fn test_default_profile() {
        let profile = Lspb::default();
        assert_eq!(profile, Lspb::new(DEFAULT_VELOCITY).unwrap());
        assert!((profile.blend_time() - 1.0 / 3.0).abs() < 1e-12);
        assert!((profile.position(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_velocity() {
        assert_eq!(Lspb::new(1.0), Err(ProfileError { velocity: 1.0 }));
        assert!(Lspb::new(2.5).is_err());
        assert!(Lspb::new(f64::NAN).is_err());
    }
}
