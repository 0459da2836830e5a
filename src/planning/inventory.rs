//! Item positions of the pick-and-place cell

use crate::kinematic_traits::Position;
use std::fmt;

/// Source of per-item positions. Indices are zero based.
pub trait Inventory {
    /// Number of items in the worklist.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Where the item is picked up, `None` if the index is out of range.
    fn pickup_position(&self, item: usize) -> Option<Position>;

    /// Where the item is placed, `None` if the index is out of range.
    fn dropoff_position(&self, item: usize) -> Option<Position>;
}

/// Rectangular arrangement of positions on a horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,

    /// Position of the first cell (row 0, column 0).
    pub origin: Position,

    /// Distance between rows (along X) and columns (along Y), meters.
    pub spacing: (f64, f64),
}

impl Grid {
    /// Number of cells, `None` if it does not fit into `usize`.
    pub fn count(&self) -> Option<usize> {
        self.rows.checked_mul(self.columns)
    }

    /// Positions row by row.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.count().unwrap_or(0));
        for row in 0..self.rows {
            for column in 0..self.columns {
                positions.push(
                    self.origin
                        + Position::new(row as f64 * self.spacing.0, column as f64 * self.spacing.1, 0.0),
                );
            }
        }
        positions
    }
}

/// Pickup and dropoff lists of a worklist have different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbalancedWorklist {
    pub pickups: usize,
    pub dropoffs: usize,
}

impl fmt::Display for UnbalancedWorklist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Worklist has {} pickup but {} dropoff positions",
            self.pickups, self.dropoffs
        )
    }
}

impl std::error::Error for UnbalancedWorklist {}

/// Fixed worklist: one pickup and one dropoff position per item.
#[derive(Debug, Clone, PartialEq)]
pub struct Worklist {
    pickups: Vec<Position>,
    dropoffs: Vec<Position>,
}

impl Worklist {
    /// Pairs pickup and dropoff positions. Both lists must have the same length.
    pub fn new(pickups: Vec<Position>, dropoffs: Vec<Position>) -> Result<Self, UnbalancedWorklist> {
        if pickups.len() != dropoffs.len() {
            return Err(UnbalancedWorklist {
                pickups: pickups.len(),
                dropoffs: dropoffs.len(),
            });
        }
        Ok(Worklist { pickups, dropoffs })
    }

    pub fn from_grids(pickups: &Grid, dropoffs: &Grid) -> Result<Self, UnbalancedWorklist> {
        Self::new(pickups.positions(), dropoffs.positions())
    }

    /// The 3 x 3 cell: items taken from a tray at negative X, placed at positive X.
    pub fn demo() -> Self {
        let tray = |x: f64| Grid {
            rows: 3,
            columns: 3,
            origin: Position::new(x, 0.4, 0.25),
            spacing: (0.1, 0.1),
        };
        // Same grid shape on both sides.
        Worklist {
            pickups: tray(-0.85).positions(),
            dropoffs: tray(0.65).positions(),
        }
    }
}

impl Inventory for Worklist {
    fn len(&self) -> usize {
        self.pickups.len()
    }

    fn pickup_position(&self, item: usize) -> Option<Position> {
        self.pickups.get(item).copied()
    }

    fn dropoff_position(&self, item: usize) -> Option<Position> {
        self.dropoffs.get(item).copied()
    }
}
