//! Per-side spotting
//!
//! A unit spots every hex within its `spot_range`. Counters follow the same
//! add/remove discipline as zones of control.

use crate::battle::battle_map::BattleMap;
use crate::battle::units::{Unit, UnitRoster};
use crate::core::types::Side;

/// Add (`on`) or remove one unit's spotting
pub fn set_unit_spotting(map: &mut BattleMap, unit: &Unit, on: bool) {
    for coord in map.cells_in_range(unit.position, unit.spot_range) {
        if let Some(hex) = map.get_hex_mut(coord) {
            hex.set_spotted(unit.side, on);
        }
    }
}

/// Rebuild every spotting counter from the living units
pub fn initialize_all_spotting(map: &mut BattleMap, units: &UnitRoster) {
    for hex in map.hexes_mut() {
        hex.reset_spotting();
    }
    for (_, unit) in units.iter() {
        if unit.is_alive() {
            set_unit_spotting(map, unit, true);
        }
    }
}

/// Can `viewer` see this unit? Own units are always visible.
pub fn is_unit_visible(map: &BattleMap, unit: &Unit, viewer: Side) -> bool {
    unit.side == viewer
        || map
            .get_hex(unit.position)
            .is_some_and(|hex| hex.is_spotted(viewer))
}
