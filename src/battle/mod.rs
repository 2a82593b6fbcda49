//! Battle system - the hex map, movement and turn processing
//!
//! Geometry and terrain are pure lookups. `GameSession` owns the mutable
//! state (map, units, log) and is the only place player actions apply.

pub mod battle_map;
pub mod constants;
pub mod execution;
pub mod hex;
pub mod log;
pub mod pathfinding;
pub mod terrain;
pub mod units;
pub mod visibility;
pub mod zoc;

// Re-exports for convenient access
pub use battle_map::{BattleMap, GameHex};
pub use constants::*;
pub use execution::{
    AttackOutcome, AttackRejection, AttackReport, GameOutcome, GameSession, MoveOutcome,
    MoveRejection,
};
pub use hex::{CubeCoord, FractionalCube, HexCoord, HexDirection, HexLayout, Point};
pub use log::{CombatLog, LogMessage};
pub use pathfinding::PathContext;
pub use terrain::{MoveCost, MovementCostTable, MovementMethod, TerrainColumn, TerrainType};
pub use units::{Unit, UnitClass, UnitRoster};
pub use visibility::{initialize_all_spotting, is_unit_visible, set_unit_spotting};
pub use zoc::{initialize_all_zoc, set_unit_zoc};
