//! Symbolic waypoints and their resolution into poses

use crate::inventory::Inventory;
use crate::kinematic_traits::{Pose, Position};
use crate::sequence_error::SequenceError;
use nalgebra::{Translation3, UnitQuaternion, Vector3};
use std::f64::consts::PI;
use std::fmt;

/// Named target of a motion phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waypoint {
    Home,
    /// Above the pickup area.
    Pickup,
    /// Above the dropoff area.
    Dropoff,
    /// Grasp position of the given item.
    ItemPickup(usize),
    /// Release position of the given item.
    ItemDropoff(usize),
}

impl Waypoint {
    /// Builds the waypoint from its name and the optional item index.
    pub fn parse(name: &str, item: Option<usize>) -> Result<Self, SequenceError> {
        let indexed = |build: fn(usize) -> Waypoint| {
            item.map(build)
                .ok_or_else(|| SequenceError::MissingIndex(name.to_string()))
        };
        match name {
            "home" => Ok(Waypoint::Home),
            "pickup" => Ok(Waypoint::Pickup),
            "dropoff" => Ok(Waypoint::Dropoff),
            "item-pickup" => indexed(Waypoint::ItemPickup),
            "item-dropoff" => indexed(Waypoint::ItemDropoff),
            _ => Err(SequenceError::UnknownWaypoint(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Waypoint::Home => "home",
            Waypoint::Pickup => "pickup",
            Waypoint::Dropoff => "dropoff",
            Waypoint::ItemPickup(_) => "item-pickup",
            Waypoint::ItemDropoff(_) => "item-dropoff",
        }
    }

    pub fn item(&self) -> Option<usize> {
        match self {
            Waypoint::ItemPickup(item) | Waypoint::ItemDropoff(item) => Some(*item),
            _ => None,
        }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item() {
            Some(item) => write!(f, "{} {}", self.name(), item),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Orientation of the gripper approaching from above: 180 degrees around world X.
pub fn top_down() -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI)
}

/// Pose at the given position with the top down approach orientation.
pub fn top_down_at(position: Position) -> Pose {
    Pose::from_parts(Translation3::from(position), top_down())
}

/// Maps waypoints to poses. Fixed waypoints do not depend on the robot configuration,
/// item waypoints take the position from the inventory.
pub struct WaypointResolver<'a> {
    pub home: Pose,
    pub pickup: Pose,
    pub dropoff: Pose,

    /// Orientation used for all item waypoints.
    pub approach: UnitQuaternion<f64>,

    pub inventory: &'a dyn Inventory,
}

impl<'a> WaypointResolver<'a> {
    pub fn new(home: Pose, pickup: Pose, dropoff: Pose, inventory: &'a dyn Inventory) -> Self {
        WaypointResolver {
            home,
            pickup,
            dropoff,
            approach: top_down(),
            inventory,
        }
    }

    pub fn items(&self) -> usize {
        self.inventory.len()
    }

    pub fn resolve(&self, waypoint: &Waypoint) -> Result<Pose, SequenceError> {
        let invalid = |index: usize| SequenceError::InvalidIndex {
            index,
            len: self.inventory.len(),
        };
        match *waypoint {
            Waypoint::Home => Ok(self.home),
            Waypoint::Pickup => Ok(self.pickup),
            Waypoint::Dropoff => Ok(self.dropoff),
            Waypoint::ItemPickup(item) => self
                .inventory
                .pickup_position(item)
                .map(|p| self.item_pose(p))
                .ok_or_else(|| invalid(item)),
            Waypoint::ItemDropoff(item) => self
                .inventory
                .dropoff_position(item)
                .map(|p| self.item_pose(p))
                .ok_or_else(|| invalid(item)),
        }
    }

    /// Resolves the waypoint given by name, see [`Waypoint::parse`].
    pub fn resolve_named(&self, name: &str, item: Option<usize>) -> Result<Pose, SequenceError> {
        self.resolve(&Waypoint::parse(name, item)?)
    }

    fn item_pose(&self, position: Position) -> Pose {
        Pose::from_parts(Translation3::from(position), self.approach)
    }
}
