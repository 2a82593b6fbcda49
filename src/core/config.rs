//! Rules configuration with documented constants
//!
//! All tunable numbers for a session are collected here. Loaded from TOML;
//! any key left out falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    DEFAULT_HEX_SIZE, DEFAULT_MAP_COLS, DEFAULT_MAP_ROWS, DEFAULT_MAX_TURNS, DEFAULT_WEAPON_RANGE,
    MAX_HEX_SIZE, MIN_HEX_SIZE, ZOC_ENTRY_PENALTY,
};
use crate::combat::arcs::FIRING_ARC_HALF_ANGLE;
use crate::core::error::{Result, TacticsError};

/// Configuration for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    // === MAP ===
    /// Number of hex rows on the map
    pub map_rows: u32,

    /// Number of hex columns on the map
    pub map_cols: u32,

    /// Hex radius in pixels for the rendering layout.
    ///
    /// Has no effect on simulation results: arcs are computed in a unit layout.
    pub hex_size: f64,

    // === MOVEMENT ===
    /// Extra cost charged when entering a hex under enemy zone of control.
    ///
    /// Large enough that nothing can be entered afterwards, so the entering
    /// move is always the last one.
    pub zoc_entry_penalty: u32,

    // === COMBAT ===
    /// Weapon range in hexes for freshly deployed units
    pub default_weapon_range: u32,

    /// Half-width of the attacker's firing cone in degrees.
    ///
    /// At 60 the cone is 120 degrees wide.
    pub firing_arc_half_angle: f64,

    // === SESSION ===
    /// Turn after which the game ends regardless of losses
    pub max_turns: u32,

    /// Seed for hit-location rolls and map generation.
    ///
    /// `None` means draw a fresh seed from the OS.
    pub seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            map_rows: DEFAULT_MAP_ROWS,
            map_cols: DEFAULT_MAP_COLS,
            hex_size: DEFAULT_HEX_SIZE,
            zoc_entry_penalty: ZOC_ENTRY_PENALTY,
            default_weapon_range: DEFAULT_WEAPON_RANGE,
            firing_arc_half_angle: FIRING_ARC_HALF_ANGLE,
            max_turns: DEFAULT_MAX_TURNS,
            seed: None,
        }
    }
}

impl RulesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: RulesConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "Loaded rules config");
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map_rows == 0 || self.map_cols == 0 {
            return Err(TacticsError::InvalidConfig(format!(
                "map must have at least one hex (got {}x{})",
                self.map_rows, self.map_cols
            )));
        }

        if !(MIN_HEX_SIZE..=MAX_HEX_SIZE).contains(&self.hex_size) {
            return Err(TacticsError::InvalidConfig(format!(
                "hex_size ({}) must be within {}..={}",
                self.hex_size, MIN_HEX_SIZE, MAX_HEX_SIZE
            )));
        }

        if !(self.firing_arc_half_angle > 0.0 && self.firing_arc_half_angle <= 180.0) {
            return Err(TacticsError::InvalidConfig(format!(
                "firing_arc_half_angle ({}) must be within (0, 180]",
                self.firing_arc_half_angle
            )));
        }

        if self.max_turns == 0 {
            return Err(TacticsError::InvalidConfig("max_turns must be positive".into()));
        }

        Ok(())
    }
}
