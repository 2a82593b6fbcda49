//! Terrain types and the movement cost table
//!
//! The table is indexed by movement method and a table column. Map terrain
//! is a coarser enum that maps onto one column each.

use serde::{Deserialize, Serialize};

/// Primary terrain type for a map hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainType {
    #[default]
    Plains,   // Open grassland
    Forest,   // Woods
    Mountain, // High elevation, stops most movement
    Hill,     // Low elevation
    Desert,   // Sand
    Swamp,    // Marsh
    City,     // Urban
    Water,    // Lake or sea
    Road,     // Paved road
    Rough,    // Broken ground
}

impl TerrainType {
    pub fn all() -> [TerrainType; 10] {
        [
            TerrainType::Plains,
            TerrainType::Forest,
            TerrainType::Mountain,
            TerrainType::Hill,
            TerrainType::Desert,
            TerrainType::Swamp,
            TerrainType::City,
            TerrainType::Water,
            TerrainType::Road,
            TerrainType::Rough,
        ]
    }

    /// Column of the movement table this terrain reads from
    pub fn table_column(&self) -> TerrainColumn {
        match self {
            TerrainType::Plains => TerrainColumn::Clear,
            TerrainType::Forest => TerrainColumn::Forest,
            TerrainType::Mountain => TerrainColumn::Mountain,
            TerrainType::Hill => TerrainColumn::Hill,
            TerrainType::Desert => TerrainColumn::Sand,
            TerrainType::Swamp => TerrainColumn::Swamp,
            TerrainType::City => TerrainColumn::City,
            TerrainType::Water => TerrainColumn::Ocean,
            TerrainType::Road => TerrainColumn::Road,
            TerrainType::Rough => TerrainColumn::Rough,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TerrainType::Plains => "Plains",
            TerrainType::Forest => "Forest",
            TerrainType::Mountain => "Mountain",
            TerrainType::Hill => "Hill",
            TerrainType::Desert => "Desert",
            TerrainType::Swamp => "Swamp",
            TerrainType::City => "City",
            TerrainType::Water => "Water",
            TerrainType::Road => "Road",
            TerrainType::Rough => "Rough",
        }
    }
}

/// Movement table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum TerrainColumn {
    Clear = 0,
    City = 1,
    Airfield = 2,
    Forest = 3,
    Bocage = 4,
    Hill = 5,
    Mountain = 6,
    Sand = 7,
    Swamp = 8,
    Ocean = 9,
    River = 10,
    Fortification = 11,
    Port = 12,
    Stream = 13,
    Escarpment = 14,
    ImpassableRiver = 15,
    Rough = 16,
    Road = 17,
}

pub const TERRAIN_COLUMN_COUNT: usize = 18;

/// How a unit moves across the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(usize)]
pub enum MovementMethod {
    #[default]
    Tracked = 0,
    HalfTracked = 1,
    Wheeled = 2,
    Leg = 3,
    Towed = 4,
    Air = 5,
    DeepNaval = 6,
    Coastal = 7,
    AllTerrainTracked = 8,
    Amphibious = 9,
    Naval = 10,
    AllTerrainLeg = 11,
}

pub const MOVEMENT_METHOD_COUNT: usize = 12;

impl MovementMethod {
    pub fn all() -> [MovementMethod; MOVEMENT_METHOD_COUNT] {
        [
            MovementMethod::Tracked,
            MovementMethod::HalfTracked,
            MovementMethod::Wheeled,
            MovementMethod::Leg,
            MovementMethod::Towed,
            MovementMethod::Air,
            MovementMethod::DeepNaval,
            MovementMethod::Coastal,
            MovementMethod::AllTerrainTracked,
            MovementMethod::Amphibious,
            MovementMethod::Naval,
            MovementMethod::AllTerrainLeg,
        ]
    }
}

/// Cost of entering one hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCost {
    /// Spend this many movement points
    Points(u32),
    /// May enter, but movement ends there
    Stop,
    /// May not enter
    Impassable,
}

/// Raw table sentinel: enter and stop
pub const STOP: u8 = 254;
/// Raw table sentinel: do not enter
pub const IMPASSABLE: u8 = 255;

impl MoveCost {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            STOP => MoveCost::Stop,
            IMPASSABLE => MoveCost::Impassable,
            points => MoveCost::Points(points as u32),
        }
    }

    pub fn is_passable(&self) -> bool {
        !matches!(self, MoveCost::Impassable)
    }
}

// Clear, City, Airfield, Forest, Bocage, Hill, Mountain, Sand, Swamp, Ocean,
// River, Fort, Port, Stream, Escarpment, ImpassableRiver, Rough, Road
const DRY_TABLE: [[u8; TERRAIN_COLUMN_COUNT]; MOVEMENT_METHOD_COUNT] = [
    [1, 1, 1, 2, 4, 2, 254, 1, 4, 255, 254, 1, 1, 2, 255, 255, 2, 1], // Tracked
    [1, 1, 1, 2, 254, 2, 254, 1, 4, 255, 254, 1, 1, 2, 255, 255, 2, 1], // HalfTracked
    [2, 1, 1, 4, 254, 3, 254, 3, 254, 255, 254, 2, 1, 4, 255, 255, 2, 1], // Wheeled
    [1, 1, 1, 2, 2, 2, 254, 2, 2, 255, 254, 1, 1, 1, 255, 255, 2, 1], // Leg
    [1, 1, 1, 1, 1, 1, 254, 1, 255, 255, 254, 1, 1, 254, 255, 255, 1, 1], // Towed
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1], // Air
    [255, 255, 255, 255, 255, 255, 255, 255, 255, 1, 255, 255, 1, 255, 255, 255, 255, 255], // DeepNaval
    [255, 255, 255, 255, 255, 255, 255, 255, 255, 2, 1, 255, 1, 255, 255, 255, 255, 255], // Coastal
    [1, 1, 1, 2, 3, 3, 254, 2, 254, 255, 254, 1, 1, 1, 255, 255, 3, 1], // AllTerrainTracked
    [1, 1, 1, 2, 4, 2, 254, 1, 3, 254, 3, 1, 1, 2, 255, 255, 2, 1], // Amphibious
    [255, 255, 255, 255, 255, 255, 255, 255, 255, 1, 255, 255, 1, 255, 255, 255, 255, 255], // Naval
    [1, 1, 1, 1, 2, 1, 1, 2, 2, 255, 254, 1, 1, 1, 255, 255, 1, 1], // AllTerrainLeg
];

/// Immutable movement cost lookup, injected into the pathfinder.
///
/// The backing array is sized by the method and column enums, so every pair
/// has an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementCostTable {
    rows: [[u8; TERRAIN_COLUMN_COUNT]; MOVEMENT_METHOD_COUNT],
}

impl MovementCostTable {
    /// Dry-weather table
    pub fn dry() -> Self {
        Self { rows: DRY_TABLE }
    }

    /// Build from a custom grid (scenario variants, tests)
    pub fn from_rows(rows: [[u8; TERRAIN_COLUMN_COUNT]; MOVEMENT_METHOD_COUNT]) -> Self {
        Self { rows }
    }

    pub fn column_cost(&self, method: MovementMethod, column: TerrainColumn) -> MoveCost {
        MoveCost::from_raw(self.rows[method as usize][column as usize])
    }

    pub fn cost(&self, method: MovementMethod, terrain: TerrainType) -> MoveCost {
        self.column_cost(method, terrain.table_column())
    }
}

impl Default for MovementCostTable {
    fn default() -> Self {
        Self::dry()
    }
}
