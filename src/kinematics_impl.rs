//! Kinematic model of a six axis robot with ortho-parallel base and spherical wrist.
//!
//! Forward kinematics is closed form. Inverse kinematics is numerical: damped least
//! squares over the finite-difference Jacobian, with adaptive damping, clamped to the
//! joint limits. The solver always returns its best candidate; it is up to the caller
//! to check how close this candidate actually gets.

use crate::constraints::Constraints;
use crate::jacobian::{compute_jacobian, damped_step, pose_error};
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::parameters::Parameters;
use crate::utils::is_valid;
use nalgebra::{Matrix3, Rotation3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::{FRAC_PI_2, PI};

/// Tuning of the numerical inverse kinematics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Iteration limit for a single seed.
    pub max_iterations: usize,

    /// Residual (norm of the 6D pose error) below which the solution is accepted.
    pub convergence: f64,

    /// Initial damping factor, adapted while iterating.
    pub initial_damping: f64,

    /// Joint perturbation used for the numerical Jacobian, radians.
    pub jacobian_epsilon: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            max_iterations: 400,
            convergence: 1e-9,
            initial_damping: 0.05,
            jacobian_epsilon: 1e-7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OPWKinematics {
    parameters: Parameters,
    constraints: Option<Constraints>,
    solver: SolverSettings,
}

impl OPWKinematics {
    /// Creates a new `OPWKinematics` instance with the given parameters.
    pub fn new(parameters: Parameters) -> Self {
        OPWKinematics {
            parameters,
            constraints: None,
            solver: SolverSettings::default(),
        }
    }

    /// Creates a new instance that keeps all solutions within the given joint limits.
    pub fn new_with_constraints(parameters: Parameters, constraints: Constraints) -> Self {
        OPWKinematics {
            parameters,
            constraints: Some(constraints),
            solver: SolverSettings::default(),
        }
    }

    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn clamp(&self, joints: &Joints) -> Joints {
        match &self.constraints {
            Some(constraints) => constraints.clamp(joints),
            None => *joints,
        }
    }

    /// Joint 1 value that turns the arm towards the given position.
    fn facing(&self, pose: &Pose) -> f64 {
        let p = &self.parameters;
        let t = pose.translation.vector;
        let heading = t.y.atan2(t.x);
        (heading + p.offsets[0]) * p.sign_corrections[0] as f64
    }

    /// Deterministic restart seeds used when the caller provided seed does not converge.
    fn restart_seeds(&self, pose: &Pose) -> Vec<Joints> {
        let j1 = self.facing(pose);
        let center = match &self.constraints {
            Some(constraints) => constraints.center(),
            None => [0.0; 6],
        };
        let mut seeds = vec![
            [j1, 0.3, 0.3, 0.0, FRAC_PI_2, 0.0],
            [j1, 0.3, 0.3, 0.0, -FRAC_PI_2, 0.0],
            [j1 - PI, -0.3, 0.3, 0.0, FRAC_PI_2, 0.0],
            center,
        ];
        for seed in seeds.iter_mut() {
            seed[0] = (seed[0] + PI).rem_euclid(2.0 * PI) - PI;
        }
        seeds
    }

    /// Iterates from the given seed and returns the best configuration found
    /// together with its residual.
    fn solve_from(&self, target: &Pose, seed: &Joints) -> (Joints, f64) {
        let settings = &self.solver;
        let mut joints = self.clamp(seed);
        let mut error = pose_error(&self.forward(&joints), target);
        let mut cost = error.norm_squared();
        let mut lambda = settings.initial_damping;

        for _ in 0..settings.max_iterations {
            if cost.sqrt() < settings.convergence {
                break;
            }
            let jacobian = compute_jacobian(self, &joints, settings.jacobian_epsilon);
            let Some(step) = damped_step(&jacobian, &error, lambda) else {
                break;
            };
            let candidate = self.clamp(&std::array::from_fn(|i| joints[i] + step[i]));
            if !is_valid(&candidate) {
                break;
            }
            let candidate_error = pose_error(&self.forward(&candidate), target);
            let candidate_cost = candidate_error.norm_squared();
            if candidate_cost < cost {
                joints = candidate;
                error = candidate_error;
                cost = candidate_cost;
                lambda = (lambda * 0.5).max(1e-6);
            } else {
                lambda *= 4.0;
                if lambda > 1e3 {
                    break; // Stuck in a local minimum.
                }
            }
        }
        (joints, cost.sqrt())
    }

    fn solve(&self, target: &Pose, first_seed: Option<&Joints>) -> Joints {
        let mut best: Option<(Joints, f64)> = None;
        let seeds = first_seed.into_iter().copied().chain(self.restart_seeds(target));
        for seed in seeds {
            let (joints, residual) = self.solve_from(target, &seed);
            if best.is_none_or(|(_, best_residual)| residual < best_residual) {
                best = Some((joints, residual));
            }
            if residual < self.solver.convergence {
                break;
            }
        }
        match best {
            Some((joints, _)) => joints,
            None => self.clamp(&[0.0; 6]),
        }
    }
}

impl Kinematics for OPWKinematics {
    fn forward(&self, joints: &Joints) -> Pose {
        let p = &self.parameters;
        let q: [f64; 6] =
            std::array::from_fn(|i| joints[i] * p.sign_corrections[i] as f64 - p.offsets[i]);

        let psi3 = f64::atan2(p.a2, p.c3);
        let k = f64::sqrt(p.a2 * p.a2 + p.c3 * p.c3);

        let cx1 = p.c2 * f64::sin(q[1]) + k * f64::sin(q[1] + q[2] + psi3) + p.a1;
        let cy1 = p.b;
        let cz1 = p.c2 * f64::cos(q[1]) + k * f64::cos(q[1] + q[2] + psi3);

        let cx0 = cx1 * f64::cos(q[0]) - cy1 * f64::sin(q[0]);
        let cy0 = cx1 * f64::sin(q[0]) + cy1 * f64::cos(q[0]);
        let cz0 = cz1 + p.c1;

        let (s1, c1) = q[0].sin_cos();
        let (s2, c2) = q[1].sin_cos();
        let (s3, c3) = q[2].sin_cos();
        let (s4, c4) = q[3].sin_cos();
        let (s5, c5) = q[4].sin_cos();
        let (s6, c6) = q[5].sin_cos();

        let r_0c = Matrix3::new(
            c1 * c2 * c3 - c1 * s2 * s3, -s1, c1 * c2 * s3 + c1 * s2 * c3,
            s1 * c2 * c3 - s1 * s2 * s3, c1, s1 * c2 * s3 + s1 * s2 * c3,
            -s2 * c3 - c2 * s3, 0.0, -s2 * s3 + c2 * c3,
        );

        let r_ce = Matrix3::new(
            c4 * c5 * c6 - s4 * s6, -c4 * c5 * s6 - s4 * c6, c4 * s5,
            s4 * c5 * c6 + c4 * s6, -s4 * c5 * s6 + c4 * c6, s4 * s5,
            -s5 * c6, s5 * s6, c5,
        );

        let r_oe = r_0c * r_ce;

        let translation = Vector3::new(cx0, cy0, cz0) + p.c4 * r_oe * Vector3::z();
        let rotation = Rotation3::from_matrix_unchecked(r_oe);

        Pose::from_parts(
            Translation3::from(translation),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }

    fn inverse(&self, pose: &Pose) -> Joints {
        self.solve(pose, None)
    }

    fn inverse_continuing(&self, pose: &Pose, previous: &Joints) -> Joints {
        self.solve(pose, Some(previous))
    }

    fn constraints(&self) -> Option<&Constraints> {
        self.constraints.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::as_radians;

    fn translation_error(a: &Pose, b: &Pose) -> f64 {
        (a.translation.vector - b.translation.vector).norm()
    }

    #[test]
    fn test_forward_at_zero() {
        // With all joints at zero the arm of this robot points straight up,
        // the forearm being horizontal because of the joint 3 offset.
        let robot = OPWKinematics::new(Parameters::irb2400_10());
        let pose = robot.forward(&[0.0; 6]);
        let p = Parameters::irb2400_10();
        let t = pose.translation.vector;
        assert!((t.y).abs() < 1e-12);
        // x: a1 + c3 + c4 (forearm horizontal), z: c1 + c2 - a2
        assert!((t.x - (p.a1 + p.c3 + p.c4)).abs() < 1e-9, "x = {}", t.x);
        assert!((t.z - (p.c1 + p.c2 - p.a2)).abs() < 1e-9, "z = {}", t.z);
    }

    #[test]
    fn test_inverse_from_nearby_seed() {
        let robot = OPWKinematics::new_with_constraints(
            Parameters::irb2400_10(),
            Constraints::irb2400_10(),
        );
        let joints = as_radians([30.0, 20.0, 10.0, 15.0, 40.0, 25.0]);
        let pose = robot.forward(&joints);
        let seed = as_radians([28.0, 22.0, 8.0, 14.0, 42.0, 20.0]);
        let solved = robot.inverse_continuing(&pose, &seed);
        let achieved = robot.forward(&solved);
        assert!(translation_error(&pose, &achieved) < 1e-6);
        assert!(pose.rotation.angle_to(&achieved.rotation) < 1e-6);
        assert!(robot.constraints().is_some_and(|c| c.compliant(&solved)));
    }

    #[test]
    fn test_inverse_returns_candidate_for_unreachable_pose() {
        let robot = OPWKinematics::new(Parameters::irb2400_10());
        let far_away = Pose::translation(10.0, 0.0, 0.5);
        let solved = robot.inverse(&far_away);
        assert!(is_valid(&solved));
        let achieved = robot.forward(&solved);
        assert!(translation_error(&far_away, &achieved) > 5.0);
    }

    #[test]
    fn test_restart_seeds_face_target() {
        let robot = OPWKinematics::new(Parameters::irb2400_10());
        let pose = Pose::translation(0.0, 1.0, 0.5);
        let seeds = robot.restart_seeds(&pose);
        assert!((seeds[0][0] - FRAC_PI_2).abs() < 1e-12);
        assert!((seeds[2][0] + FRAC_PI_2).abs() < 1e-12);
    }
}
