//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Turn counter (starts at 1)
pub type Turn = u32;

/// The two opposing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Axis,
    Allied,
}

impl Side {
    /// Both sides, in turn order
    pub fn all() -> [Side; 2] {
        [Side::Axis, Side::Allied]
    }

    /// Index into per-side counter arrays
    pub fn index(&self) -> usize {
        match self {
            Side::Axis => 0,
            Side::Allied => 1,
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Side::Axis => Side::Allied,
            Side::Allied => Side::Axis,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Axis => "Axis",
            Side::Allied => "Allied",
        }
    }
}

/// Generation-tagged handle into the unit arena.
///
/// A handle goes stale once its slot is freed; reusing the slot bumps the
/// generation so old handles never alias a newly deployed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId {
    pub index: u32,
    pub generation: u32,
}

impl UnitId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}
