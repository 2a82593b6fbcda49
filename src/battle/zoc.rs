//! Zone-of-control counters
//!
//! Every unit that exerts ZOC adds one to its side's counter on each
//! in-bounds neighbor. Counters are removed the same way when the unit
//! leaves or dies, so overlapping zones stay correct.

use crate::battle::battle_map::BattleMap;
use crate::battle::units::{Unit, UnitRoster};

/// Add (`on`) or remove one unit's zone of control
pub fn set_unit_zoc(map: &mut BattleMap, unit: &Unit, on: bool) {
    if !unit.class.exerts_zoc() {
        return;
    }
    for coord in map.adjacent(unit.position) {
        if let Some(hex) = map.get_hex_mut(coord) {
            hex.set_zoc(unit.side, on);
        }
    }
}

/// Rebuild every ZOC counter from the living units
pub fn initialize_all_zoc(map: &mut BattleMap, units: &UnitRoster) {
    for hex in map.hexes_mut() {
        hex.reset_zoc();
    }
    for (_, unit) in units.iter() {
        if unit.is_alive() {
            set_unit_zoc(map, unit, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::hex::HexCoord;
    use crate::battle::units::UnitClass;
    use crate::core::types::Side;

    #[test]
    fn test_zoc_covers_neighbors_only() {
        let mut map = BattleMap::new(8, 8);
        let unit = Unit::new(UnitClass::Medium, Side::Axis, HexCoord::new(4, 4));
        set_unit_zoc(&mut map, &unit, true);

        assert!(!map.get_hex(HexCoord::new(4, 4)).unwrap().is_zoc(Side::Axis));
        for coord in HexCoord::new(4, 4).neighbors() {
            let hex = map.get_hex(coord).unwrap();
            assert!(hex.is_zoc(Side::Axis));
            assert!(!hex.is_zoc(Side::Allied));
        }
    }

    #[test]
    fn test_overlapping_zones_count() {
        let mut map = BattleMap::new(8, 8);
        let a = Unit::new(UnitClass::Light, Side::Allied, HexCoord::new(4, 3));
        let b = Unit::new(UnitClass::Light, Side::Allied, HexCoord::new(4, 5));
        set_unit_zoc(&mut map, &a, true);
        set_unit_zoc(&mut map, &b, true);
        assert_eq!(map.get_hex(HexCoord::new(4, 4)).unwrap().zoc_count(Side::Allied), 2);

        set_unit_zoc(&mut map, &a, false);
        assert!(map.get_hex(HexCoord::new(4, 4)).unwrap().is_zoc(Side::Allied));
    }

    #[test]
    fn test_aerospace_exerts_none() {
        let mut map = BattleMap::new(8, 8);
        let unit = Unit::new(UnitClass::Aerospace, Side::Axis, HexCoord::new(4, 4));
        set_unit_zoc(&mut map, &unit, true);
        assert!(map.hexes().all(|hex| !hex.is_zoc(Side::Axis)));
    }

    #[test]
    fn test_initialize_rebuilds_from_scratch() {
        let mut map = BattleMap::new(8, 8);
        let mut units = UnitRoster::new();
        units.insert(Unit::new(UnitClass::Heavy, Side::Axis, HexCoord::new(0, 0)));
        initialize_all_zoc(&mut map, &units);
        initialize_all_zoc(&mut map, &units);
        assert_eq!(map.get_hex(HexCoord::new(0, 1)).unwrap().zoc_count(Side::Axis), 1);
    }
}
