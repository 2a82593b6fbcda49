//! Battle constants - all tunable defaults in one place
//!
//! `RulesConfig` starts from these; unit stats are fixed per deployment.

// Map
pub const DEFAULT_MAP_ROWS: u32 = 12;
pub const DEFAULT_MAP_COLS: u32 = 16;
pub const DEFAULT_HEX_SIZE: f64 = 40.0;
pub const MIN_HEX_SIZE: f64 = 20.0;
pub const MAX_HEX_SIZE: f64 = 80.0;

// Movement
pub const DEFAULT_MOVEMENT_POINTS: u32 = 6;
pub const ZOC_ENTRY_PENALTY: u32 = 100; // More than any unit can ever spend
pub const CRIPPLED_MOVEMENT_POINTS: u32 = 1; // One leg gone

// Combat
pub const DEFAULT_ATTACK: u32 = 8;
pub const DEFAULT_WEAPON_RANGE: u32 = 3;
pub const DEFAULT_SPOT_RANGE: u32 = 2;

// Session
pub const DEFAULT_MAX_TURNS: u32 = 20;
