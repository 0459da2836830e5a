//! Supports reading the cell configuration from a YAML file (optional)

use std::path::Path;
use std::time::Duration;

use nalgebra::{Translation3, UnitQuaternion};
use yaml_rust2::{Yaml, YamlLoader};

use crate::cell_config::CellConfig;
use crate::config_error::ConfigError;
use crate::constraints::Constraints;
use crate::inventory::{Grid, Worklist};
use crate::kinematic_traits::{Joints, Pose, Position};
use crate::lspb::Lspb;
use crate::parameters::Parameters;
use crate::parameters_robots::KNOWN_ROBOTS;
use crate::sequencer::UnreachablePolicy;
use crate::waypoints::top_down;

/// Largest worklist a grid may describe.
const MAX_GRID_ITEMS: usize = 10_000;

impl CellConfig {
    /// Read the cell configuration from YAML file. All sections and fields are optional,
    /// missing ones keep the values of the demo cell:
    /// ```yaml
    /// robot:
    ///   model: irb2400_10          # or a1, a2, b, c1, c2, c3, c4, offsets, sign_corrections
    ///   limits:
    ///     from: [deg(-180), deg(-100), deg(-60), deg(-200), deg(-120), deg(-400)]
    ///     to: [deg(180), deg(110), deg(65), deg(200), deg(120), deg(400)]
    ///   base_height: 0.0
    ///   tool_length: 0.0
    /// waypoints:
    ///   home: { position: [0.9, 0.0, 1.2] }
    ///   pickup: { position: [-0.75, 0.5, 0.5], rotation: [deg(180), 0, 0] }
    ///   dropoff: { position: [0.75, 0.5, 0.5] }
    /// worklist:
    ///   pickup_grid: { rows: 3, columns: 3, origin: [-0.85, 0.4, 0.25], spacing: [0.1, 0.1] }
    ///   dropoff_grid: { rows: 3, columns: 3, origin: [0.65, 0.4, 0.25], spacing: [0.1, 0.1] }
    /// motion:
    ///   tolerance: 0.005
    ///   approach_steps: 50
    ///   descent_steps: 10
    ///   lspb_velocity: 1.5
    ///   frame_delay_ms: 0
    ///   on_unreachable: continue   # or abort
    ///   start_joints: [0, 0, 0, 0, 0, 0]
    /// ```
    /// Angles are radians unless written as `deg(angle)`. Rotations are roll, pitch, yaw
    /// and default to the top down approach. Instead of grids, the worklist may list
    /// `pickups` and `dropoffs` explicitly as lists of positions.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("{}", e)))?;
        let mut config = CellConfig::default();
        let Some(root) = docs.first() else {
            return Ok(config); // Empty file
        };

        if let Some(robot) = field(root, "robot") {
            read_robot(robot, &mut config)?;
        }
        if let Some(waypoints) = field(root, "waypoints") {
            if let Some(pose) = field(waypoints, "home") {
                config.home = read_pose(pose, "waypoints.home")?;
            }
            if let Some(pose) = field(waypoints, "pickup") {
                config.pickup = read_pose(pose, "waypoints.pickup")?;
            }
            if let Some(pose) = field(waypoints, "dropoff") {
                config.dropoff = read_pose(pose, "waypoints.dropoff")?;
            }
        }
        if let Some(worklist) = field(root, "worklist") {
            config.worklist = read_worklist(worklist)?;
        }
        if let Some(motion) = field(root, "motion") {
            read_motion(motion, &mut config)?;
        }
        Ok(config)
    }
}

fn read_robot(robot: &Yaml, config: &mut CellConfig) -> Result<(), ConfigError> {
    let target = &mut config.robot;
    match field(robot, "model") {
        Some(model) => {
            let name = text(model, "robot.model")?;
            target.parameters = Parameters::by_name(name).ok_or_else(|| ConfigError::InvalidValue {
                field: "robot.model".into(),
                reason: format!("unknown robot {}, known are {}", name, KNOWN_ROBOTS.join(", ")),
            })?;
            target.constraints = Constraints::by_name(name);
            target.model = Some(name.to_string());
        }
        None if field(robot, "a1").is_some() => {
            target.parameters = read_parameters(robot)?;
            target.constraints = None;
            target.model = None;
        }
        None => {}
    }
    if let Some(limits) = field(robot, "limits") {
        let from = angles6(required(limits, "from", "robot.limits")?, "robot.limits.from")?;
        let to = angles6(required(limits, "to", "robot.limits")?, "robot.limits.to")?;
        target.constraints = Some(Constraints::new(from, to));
    }
    if let Some(height) = field(robot, "base_height") {
        target.base_height = number(height, "robot.base_height")?;
    }
    if let Some(length) = field(robot, "tool_length") {
        target.tool_length = number(length, "robot.tool_length")?;
    }
    Ok(())
}

fn read_parameters(robot: &Yaml) -> Result<Parameters, ConfigError> {
    let get = |name: &str| -> Result<f64, ConfigError> {
        number(required(robot, name, "robot")?, &format!("robot.{}", name))
    };
    let mut parameters = Parameters {
        a1: get("a1")?,
        a2: get("a2")?,
        b: get("b")?,
        c1: get("c1")?,
        c2: get("c2")?,
        c3: get("c3")?,
        c4: get("c4")?,
        ..Parameters::new()
    };
    if let Some(offsets) = field(robot, "offsets") {
        parameters.offsets = angles6(offsets, "robot.offsets")?;
    }
    if let Some(signs) = field(robot, "sign_corrections") {
        let items = list(signs, "robot.sign_corrections", 6)?;
        for (i, item) in items.iter().enumerate() {
            parameters.sign_corrections[i] = match item.as_i64() {
                Some(1) => 1,
                Some(-1) => -1,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: format!("robot.sign_corrections[{}]", i),
                        reason: "must be 1 or -1".into(),
                    });
                }
            };
        }
    }
    Ok(parameters)
}

fn read_pose(node: &Yaml, path: &str) -> Result<Pose, ConfigError> {
    let position = vec3(required(node, "position", path)?, &format!("{}.position", path))?;
    let rotation = match field(node, "rotation") {
        Some(rotation) => {
            let rpy = list(rotation, &format!("{}.rotation", path), 3)?;
            let path = format!("{}.rotation", path);
            UnitQuaternion::from_euler_angles(
                angle(&rpy[0], &path)?,
                angle(&rpy[1], &path)?,
                angle(&rpy[2], &path)?,
            )
        }
        None => top_down(),
    };
    Ok(Pose::from_parts(Translation3::from(position), rotation))
}

fn read_worklist(worklist: &Yaml) -> Result<Worklist, ConfigError> {
    let pickups = read_positions(worklist, "pickups", "pickup_grid")?;
    let dropoffs = read_positions(worklist, "dropoffs", "dropoff_grid")?;
    match (pickups, dropoffs) {
        (Some(pickups), Some(dropoffs)) => {
            Worklist::new(pickups, dropoffs).map_err(|e| ConfigError::InvalidLength {
                field: "worklist.dropoffs".into(),
                expected: e.pickups,
                found: e.dropoffs,
            })
        }
        (None, _) => Err(ConfigError::MissingField("worklist.pickups".into())),
        (_, None) => Err(ConfigError::MissingField("worklist.dropoffs".into())),
    }
}

/// Positions given either as an explicit list or as a grid.
fn read_positions(worklist: &Yaml, list_name: &str, grid_name: &str) -> Result<Option<Vec<Position>>, ConfigError> {
    if let Some(positions) = field(worklist, list_name) {
        let path = format!("worklist.{}", list_name);
        let items = positions.as_vec().ok_or_else(|| ConfigError::InvalidValue {
            field: path.clone(),
            reason: "expected a list of positions".into(),
        })?;
        return items
            .iter()
            .enumerate()
            .map(|(i, item)| vec3(item, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Some);
    }
    if let Some(grid) = field(worklist, grid_name) {
        let path = format!("worklist.{}", grid_name);
        let spacing = list(required(grid, "spacing", &path)?, &format!("{}.spacing", path), 2)?;
        let grid = Grid {
            rows: count(required(grid, "rows", &path)?, &format!("{}.rows", path))?,
            columns: count(required(grid, "columns", &path)?, &format!("{}.columns", path))?,
            origin: vec3(required(grid, "origin", &path)?, &format!("{}.origin", path))?,
            spacing: (
                number(&spacing[0], &format!("{}.spacing", path))?,
                number(&spacing[1], &format!("{}.spacing", path))?,
            ),
        };
        return match grid.count() {
            Some(cells) if cells <= MAX_GRID_ITEMS => Ok(Some(grid.positions())),
            _ => Err(ConfigError::InvalidValue {
                field: format!("{}.rows", path),
                reason: format!(
                    "{} x {} grid exceeds {} items",
                    grid.rows, grid.columns, MAX_GRID_ITEMS
                ),
            }),
        };
    }
    Ok(None)
}

fn read_motion(motion: &Yaml, config: &mut CellConfig) -> Result<(), ConfigError> {
    let settings = &mut config.settings;
    if let Some(tolerance) = field(motion, "tolerance") {
        settings.tolerance = number(tolerance, "motion.tolerance")?;
        if !(settings.tolerance >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "motion.tolerance".into(),
                reason: "must not be negative".into(),
            });
        }
    }
    if let Some(steps) = field(motion, "approach_steps") {
        settings.steps.approach = steps_count(steps, "motion.approach_steps")?;
    }
    if let Some(steps) = field(motion, "descent_steps") {
        settings.steps.descent = steps_count(steps, "motion.descent_steps")?;
    }
    if let Some(velocity) = field(motion, "lspb_velocity") {
        config.lspb_velocity = number(velocity, "motion.lspb_velocity")?;
        Lspb::new(config.lspb_velocity).map_err(|e| ConfigError::InvalidValue {
            field: "motion.lspb_velocity".into(),
            reason: e.to_string(),
        })?;
    }
    if let Some(delay) = field(motion, "frame_delay_ms") {
        config.frame_delay = Duration::from_millis(count(delay, "motion.frame_delay_ms")? as u64);
    }
    if let Some(policy) = field(motion, "on_unreachable") {
        config.settings.on_unreachable = match text(policy, "motion.on_unreachable")? {
            "continue" => UnreachablePolicy::Continue,
            "abort" => UnreachablePolicy::Abort,
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "motion.on_unreachable".into(),
                    reason: format!("expected continue or abort, got {}", other),
                });
            }
        };
    }
    if let Some(joints) = field(motion, "start_joints") {
        config.start_joints = angles6(joints, "motion.start_joints")?;
    }
    Ok(())
}

/// Value of the key, `None` if absent or empty.
fn field<'a>(node: &'a Yaml, name: &str) -> Option<&'a Yaml> {
    let value = &node[name];
    if value.is_badvalue() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn required<'a>(node: &'a Yaml, name: &str, path: &str) -> Result<&'a Yaml, ConfigError> {
    field(node, name).ok_or_else(|| ConfigError::MissingField(format!("{}.{}", path, name)))
}

fn text<'a>(value: &'a Yaml, path: &str) -> Result<&'a str, ConfigError> {
    value.as_str().ok_or_else(|| ConfigError::InvalidValue {
        field: path.into(),
        reason: "expected a string".into(),
    })
}

fn number(value: &Yaml, path: &str) -> Result<f64, ConfigError> {
    let parsed = match value {
        Yaml::Real(_) => value.as_f64(),
        Yaml::Integer(i) => Some(*i as f64),
        _ => None,
    };
    match parsed {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(ConfigError::InvalidValue {
            field: path.into(),
            reason: "expected a finite number".into(),
        }),
    }
}

/// Number of radians, or `deg(x)` for degrees.
fn angle(value: &Yaml, path: &str) -> Result<f64, ConfigError> {
    match value {
        Yaml::String(s) => s
            .trim()
            .strip_prefix("deg(")
            .and_then(|rest| rest.strip_suffix(')'))
            .and_then(|degrees| degrees.trim().parse::<f64>().ok())
            .filter(|degrees| degrees.is_finite())
            .map(f64::to_radians)
            .ok_or_else(|| ConfigError::WrongAngle(format!("{}: {}", path, s))),
        _ => number(value, path),
    }
}

fn count(value: &Yaml, path: &str) -> Result<usize, ConfigError> {
    match value.as_i64() {
        Some(n) if n >= 0 => Ok(n as usize),
        _ => Err(ConfigError::InvalidValue {
            field: path.into(),
            reason: "expected a non negative integer".into(),
        }),
    }
}

/// Step count of a motion: both ends must be part of it.
fn steps_count(value: &Yaml, path: &str) -> Result<usize, ConfigError> {
    let steps = count(value, path)?;
    if steps < 2 {
        return Err(ConfigError::InvalidValue {
            field: path.into(),
            reason: format!("at least 2 steps are required, got {}", steps),
        });
    }
    Ok(steps)
}

fn list<'a>(value: &'a Yaml, path: &str, expected: usize) -> Result<&'a [Yaml], ConfigError> {
    let items = value.as_vec().ok_or_else(|| ConfigError::InvalidValue {
        field: path.into(),
        reason: "expected a list".into(),
    })?;
    if items.len() != expected {
        return Err(ConfigError::InvalidLength {
            field: path.into(),
            expected,
            found: items.len(),
        });
    }
    Ok(items)
}

fn vec3(value: &Yaml, path: &str) -> Result<Position, ConfigError> {
    let items = list(value, path, 3)?;
    Ok(Position::new(
        number(&items[0], path)?,
        number(&items[1], path)?,
        number(&items[2], path)?,
    ))
}

fn angles6(value: &Yaml, path: &str) -> Result<Joints, ConfigError> {
    let items = list(value, path, 6)?;
    let mut joints = [0.0; 6];
    for (joint, item) in joints.iter_mut().zip(items) {
        *joint = angle(item, path)?;
    }
    Ok(joints)
}
