//! Mech units and the arena that owns them
//!
//! Units live in a dense slot vector addressed by generation-tagged
//! `UnitId`s. "Which unit stands here" goes through a coordinate index that
//! the roster rebuilds after moves and removals.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    CRIPPLED_MOVEMENT_POINTS, DEFAULT_ATTACK, DEFAULT_MOVEMENT_POINTS, DEFAULT_SPOT_RANGE,
    DEFAULT_WEAPON_RANGE,
};
use crate::battle::hex::HexCoord;
use crate::battle::terrain::MovementMethod;
use crate::combat::arcs::{facing_name, normalize_degrees};
use crate::combat::armor_location::{ArmorLocation, LocationStatus, Locations, WeightClass};
use crate::combat::damage::{self, DamageReport};
use crate::core::types::{Side, UnitId};

/// Deployable unit classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    Light,
    Medium,
    Heavy,
    Assault,
    /// Airborne: flies over terrain and ignores zones of control
    Aerospace,
}

impl UnitClass {
    pub fn default_name(&self) -> &'static str {
        match self {
            UnitClass::Light => "Light Mech",
            UnitClass::Medium => "Medium Mech",
            UnitClass::Heavy => "Heavy Mech",
            UnitClass::Assault => "Assault Mech",
            UnitClass::Aerospace => "Aerospace Fighter",
        }
    }

    pub fn movement_method(&self) -> MovementMethod {
        match self {
            UnitClass::Light => MovementMethod::Leg,
            UnitClass::Medium => MovementMethod::Wheeled,
            UnitClass::Heavy => MovementMethod::HalfTracked,
            UnitClass::Assault => MovementMethod::Tracked,
            UnitClass::Aerospace => MovementMethod::Air,
        }
    }

    pub fn weight_class(&self) -> WeightClass {
        match self {
            UnitClass::Light | UnitClass::Aerospace => WeightClass::Light,
            UnitClass::Medium => WeightClass::Medium,
            UnitClass::Heavy => WeightClass::Heavy,
            UnitClass::Assault => WeightClass::Assault,
        }
    }

    /// Unconstrained by enemy zones of control
    pub fn is_zoc_immune(&self) -> bool {
        matches!(self, UnitClass::Aerospace)
    }

    /// Projects a zone of control onto adjacent hexes
    pub fn exerts_zoc(&self) -> bool {
        !matches!(self, UnitClass::Aerospace)
    }
}

/// A single mech on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub class: UnitClass,
    pub side: Side,
    pub weight_class: WeightClass,
    pub position: HexCoord,
    /// Degrees, east = 0, south = 90
    pub facing: f64,
    pub movement_method: MovementMethod,
    pub movement_points: u32,
    pub moves_left: u32,
    pub spot_range: u32,
    pub attack: u32,
    pub weapon_range: u32,
    pub has_moved: bool,
    pub has_fired: bool,
    pub locations: Locations,
}

impl Unit {
    pub fn new(class: UnitClass, side: Side, position: HexCoord) -> Self {
        let weight_class = class.weight_class();
        Self {
            name: class.default_name().to_string(),
            class,
            side,
            weight_class,
            position,
            facing: match side {
                Side::Axis => 0.0,
                Side::Allied => 180.0,
            },
            movement_method: class.movement_method(),
            movement_points: DEFAULT_MOVEMENT_POINTS,
            moves_left: DEFAULT_MOVEMENT_POINTS,
            spot_range: DEFAULT_SPOT_RANGE,
            attack: DEFAULT_ATTACK,
            weapon_range: DEFAULT_WEAPON_RANGE,
            has_moved: false,
            has_fired: false,
            locations: Locations::for_weight_class(weight_class),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_weapon_range(mut self, range: u32) -> Self {
        self.weapon_range = range;
        self
    }

    pub fn with_movement_points(mut self, points: u32) -> Self {
        self.movement_points = points;
        self.moves_left = points;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.locations.is_alive()
    }

    pub fn can_move(&self) -> bool {
        self.is_alive() && !self.has_moved && self.moves_left > 0
    }

    pub fn is_zoc_immune(&self) -> bool {
        self.class.is_zoc_immune()
    }

    /// Remaining armor plus structure as a whole percentage
    pub fn overall_health_percent(&self) -> u32 {
        let (current, max) = self.locations.totals();
        if max == 0 {
            return 0;
        }
        current * 100 / max
    }

    /// Per-location armor and structure, in location order
    pub fn location_snapshot(&self) -> Vec<(ArmorLocation, LocationStatus)> {
        self.locations
            .iter()
            .map(|(location, status)| (location, *status))
            .collect()
    }

    /// Apply damage to one location and update mobility
    pub fn apply_damage(&mut self, location: ArmorLocation, damage: u32) -> DamageReport {
        let report = damage::apply_damage(&mut self.locations, location, damage);
        if report.leg_lost() {
            self.movement_points = CRIPPLED_MOVEMENT_POINTS;
            self.moves_left = self.moves_left.min(CRIPPLED_MOVEMENT_POINTS);
        }
        if report.unit_destroyed().is_some() {
            self.moves_left = 0;
        }
        report
    }

    /// Start-of-turn refresh
    pub fn reset_for_turn(&mut self) {
        self.has_moved = false;
        self.has_fired = false;
        self.moves_left = if self.is_alive() { self.movement_points } else { 0 };
    }

    pub fn set_facing(&mut self, degrees: f64) {
        self.facing = normalize_degrees(degrees);
    }

    pub fn facing_name(&self) -> String {
        facing_name(self.facing)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    unit: Option<Unit>,
}

/// Arena of units with a coordinate index
#[derive(Debug, Clone, Default)]
pub struct UnitRoster {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_coord: AHashMap<HexCoord, UnitId>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a unit, reusing a freed slot if one exists
    pub fn insert(&mut self, unit: Unit) -> UnitId {
        let position = unit.position;
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation += 1;
                slot.unit = Some(unit);
                UnitId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    unit: Some(unit),
                });
                UnitId::new(self.slots.len() as u32 - 1, 0)
            }
        };
        self.by_coord.insert(position, id);
        id
    }

    /// Free a unit's slot. Its id goes stale.
    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let unit = slot.unit.take()?;
        self.free.push(id.index);
        if self.by_coord.get(&unit.position) == Some(&id) {
            self.by_coord.remove(&unit.position);
        }
        Some(unit)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.unit.as_ref()
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.unit.as_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.unit.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.unit
                .as_ref()
                .map(|unit| (UnitId::new(index as u32, slot.generation), unit))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (UnitId, &mut Unit)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.unit
                .as_mut()
                .map(|unit| (UnitId::new(index as u32, generation), unit))
        })
    }

    /// Living units of one side
    pub fn living(&self, side: Side) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.iter()
            .filter(move |(_, unit)| unit.side == side && unit.is_alive())
    }

    /// Unit standing on a hex
    pub fn unit_at(&self, coord: HexCoord) -> Option<UnitId> {
        self.by_coord.get(&coord).copied()
    }

    /// Rebuild the coordinate index from unit positions
    pub fn reindex(&mut self) {
        let entries: Vec<(HexCoord, UnitId)> = self
            .iter()
            .filter(|(_, unit)| unit.is_alive())
            .map(|(id, unit)| (unit.position, id))
            .collect();
        self.by_coord.clear();
        self.by_coord.extend(entries);
    }
}
