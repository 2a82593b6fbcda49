//! Battle map: a dense rectangular grid of hexes
//!
//! Hexes are created once with the map and live for the whole session. Only
//! their counters and selection flags change.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::hex::HexCoord;
use crate::battle::terrain::TerrainType;
use crate::core::types::Side;

/// A single hex on the battle map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHex {
    pub coord: HexCoord,
    pub terrain: TerrainType,
    /// None = neutral
    pub owner: Option<Side>,
    pub is_victory_hex: bool,
    spotted: [u32; 2],
    zoc: [u32; 2],
    /// Highlighted as a movement destination
    pub is_move_sel: bool,
    /// Highlighted as an attack target
    pub is_attack_sel: bool,
}

impl GameHex {
    pub fn new(coord: HexCoord, terrain: TerrainType) -> Self {
        Self {
            coord,
            terrain,
            owner: None,
            is_victory_hex: false,
            spotted: [0; 2],
            zoc: [0; 2],
            is_move_sel: false,
            is_attack_sel: false,
        }
    }

    /// Add or remove one unit's zone of control
    pub fn set_zoc(&mut self, side: Side, on: bool) {
        let counter = &mut self.zoc[side.index()];
        if on {
            *counter += 1;
        } else {
            *counter = counter.saturating_sub(1);
        }
    }

    /// Is this hex under the given side's zone of control?
    pub fn is_zoc(&self, side: Side) -> bool {
        self.zoc[side.index()] > 0
    }

    pub fn zoc_count(&self, side: Side) -> u32 {
        self.zoc[side.index()]
    }

    /// Add or remove one unit's spotting
    pub fn set_spotted(&mut self, side: Side, on: bool) {
        let counter = &mut self.spotted[side.index()];
        if on {
            *counter += 1;
        } else {
            *counter = counter.saturating_sub(1);
        }
    }

    pub fn is_spotted(&self, side: Side) -> bool {
        self.spotted[side.index()] > 0
    }

    pub fn spotted_count(&self, side: Side) -> u32 {
        self.spotted[side.index()]
    }

    pub(crate) fn reset_zoc(&mut self) {
        self.zoc = [0; 2];
    }

    pub(crate) fn reset_spotting(&mut self) {
        self.spotted = [0; 2];
    }
}

/// The full battle map, stored row-major
/// Objectives placed on generated maps; the defender holds them at the start
pub const VICTORY_HEXES: [HexCoord; 2] = [HexCoord::new(5, 4), HexCoord::new(5, 12)];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleMap {
    pub rows: u32,
    pub cols: u32,
    hexes: Vec<GameHex>,
}

impl BattleMap {
    /// Create a new battle map with plains everywhere
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut hexes = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows as i32 {
            for col in 0..cols as i32 {
                hexes.push(GameHex::new(HexCoord::new(row, col), TerrainType::Plains));
            }
        }

        Self { rows, cols, hexes }
    }

    /// Create a map with randomized terrain
    pub fn generate<R: Rng>(rows: u32, cols: u32, rng: &mut R) -> Self {
        let mut map = Self::new(rows, cols);
        for hex in &mut map.hexes {
            hex.terrain = random_terrain(rng);
        }
        for coord in VICTORY_HEXES {
            if let Some(hex) = map.get_hex_mut(coord) {
                hex.is_victory_hex = true;
                hex.owner = Some(Side::Allied);
            }
        }
        map
    }

    fn index(&self, coord: HexCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.row as usize * self.cols as usize + coord.col as usize)
        } else {
            None
        }
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && coord.row < self.rows as i32
            && coord.col < self.cols as i32
    }

    /// Get a hex at the given coordinate
    pub fn get_hex(&self, coord: HexCoord) -> Option<&GameHex> {
        self.index(coord).map(|i| &self.hexes[i])
    }

    /// Get a mutable hex at the given coordinate
    pub fn get_hex_mut(&mut self, coord: HexCoord) -> Option<&mut GameHex> {
        let index = self.index(coord)?;
        Some(&mut self.hexes[index])
    }

    pub fn hexes(&self) -> impl Iterator<Item = &GameHex> {
        self.hexes.iter()
    }

    pub fn hexes_mut(&mut self) -> impl Iterator<Item = &mut GameHex> {
        self.hexes.iter_mut()
    }

    /// Terrain at a coordinate (None off-map)
    pub fn terrain(&self, coord: HexCoord) -> Option<TerrainType> {
        self.get_hex(coord).map(|hex| hex.terrain)
    }

    /// Set terrain at a coordinate
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: TerrainType) {
        if let Some(hex) = self.get_hex_mut(coord) {
            hex.terrain = terrain;
        }
    }

    /// In-bounds neighbors of a hex
    pub fn adjacent(&self, coord: HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.in_bounds(*n))
            .collect()
    }

    /// All in-bounds hexes within `range` steps (inclusive)
    pub fn cells_in_range(&self, center: HexCoord, range: u32) -> Vec<HexCoord> {
        center
            .to_cube()
            .hexes_in_range(range)
            .into_iter()
            .map(|cube| cube.to_offset())
            .filter(|coord| self.in_bounds(*coord))
            .collect()
    }

    /// Clear every movement and attack highlight
    pub fn clear_selection_highlights(&mut self) {
        for hex in &mut self.hexes {
            hex.is_move_sel = false;
            hex.is_attack_sel = false;
        }
    }

    /// Hand a victory hex to `side`. True if its owner changed.
    pub fn capture(&mut self, coord: HexCoord, side: Side) -> bool {
        match self.get_hex_mut(coord) {
            Some(hex) if hex.is_victory_hex && hex.owner != Some(side) => {
                hex.owner = Some(side);
                true
            }
            _ => false,
        }
    }

    /// Number of victory hexes `side` controls
    pub fn objectives_held(&self, side: Side) -> usize {
        self.hexes
            .iter()
            .filter(|hex| hex.is_victory_hex && hex.owner == Some(side))
            .count()
    }

    /// Coordinates currently flagged as move-selectable
    pub fn move_selection(&self) -> Vec<HexCoord> {
        self.hexes
            .iter()
            .filter(|hex| hex.is_move_sel)
            .map(|hex| hex.coord)
            .collect()
    }
}

/// Terrain distribution: mostly open, water and cities rare
fn random_terrain<R: Rng>(rng: &mut R) -> TerrainType {
    let roll: u32 = rng.gen_range(0..=100);
    match roll {
        0..=34 => TerrainType::Plains,
        35..=54 => TerrainType::Forest,
        55..=67 => TerrainType::Hill,
        68..=74 => TerrainType::Rough,
        75..=81 => TerrainType::Desert,
        82..=86 => TerrainType::Mountain,
        87..=90 => TerrainType::Swamp,
        91..=94 => TerrainType::City,
        _ => TerrainType::Water,
    }
}
