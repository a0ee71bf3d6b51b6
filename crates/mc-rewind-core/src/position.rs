//! Last known absolute position per entity.
//!
//! 1.14 moves entities with fixed-point deltas (`raw / 4096` blocks). The
//! cache folds every delta into an absolute coordinate so packets that need
//! a full position can be rebuilt later.

use std::collections::HashMap;

/// Units per block in relative move packets.
pub const RELATIVE_MOVE_FACTOR: f64 = 4096.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Whether a delta found an earlier absolute position to add to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Known,
    /// No prior record; the delta was applied to the origin.
    Missing,
}

#[derive(Debug, Default)]
pub struct PositionCache {
    positions: HashMap<i32, Position>,
    anomalies: u64,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_absolute(&mut self, id: i32, x: f64, y: f64, z: f64) {
        self.positions.insert(id, Position::new(x, y, z));
    }

    /// Add a delta in blocks to the last known position.
    pub fn record_delta(&mut self, id: i32, dx: f64, dy: f64, dz: f64) -> Baseline {
        let (base, baseline) = match self.positions.get(&id) {
            Some(pos) => (*pos, Baseline::Known),
            None => {
                self.anomalies += 1;
                (Position::new(0.0, 0.0, 0.0), Baseline::Missing)
            }
        };
        self.positions
            .insert(id, Position::new(base.x + dx, base.y + dy, base.z + dz));
        baseline
    }

    /// Add a fixed-point relative move as carried on the wire.
    pub fn record_relative_move(&mut self, id: i32, dx: i16, dy: i16, dz: i16) -> Baseline {
        self.record_delta(
            id,
            f64::from(dx) / RELATIVE_MOVE_FACTOR,
            f64::from(dy) / RELATIVE_MOVE_FACTOR,
            f64::from(dz) / RELATIVE_MOVE_FACTOR,
        )
    }

    pub fn get(&self, id: i32) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    pub fn forget(&mut self, id: i32) -> Option<Position> {
        self.positions.remove(&id)
    }

    /// Deltas that arrived before any absolute position.
    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
