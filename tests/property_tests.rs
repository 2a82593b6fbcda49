//! Property-based tests for hex geometry, arcs, damage and movement budgets

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use mech_tactics::battle::*;
use mech_tactics::combat::arcs::{classify_relative_angle, normalize_relative};
use mech_tactics::combat::*;
use mech_tactics::core::types::Side;

fn coord() -> impl Strategy<Value = HexCoord> {
    (-40i32..40, -40i32..40).prop_map(|(row, col)| HexCoord::new(row, col))
}

fn location() -> impl Strategy<Value = ArmorLocation> {
    (0usize..ArmorLocation::all().len()).prop_map(|i| ArmorLocation::all()[i])
}

fn weight_class() -> impl Strategy<Value = WeightClass> {
    prop_oneof![
        Just(WeightClass::Light),
        Just(WeightClass::Medium),
        Just(WeightClass::Heavy),
        Just(WeightClass::Assault),
    ]
}

proptest! {
    #[test]
    fn test_offset_cube_round_trip(c in coord()) {
        prop_assert_eq!(c.to_cube().to_offset(), c);
        prop_assert!(c.to_cube().is_valid());
    }

    #[test]
    fn test_distance_is_a_metric(a in coord(), b in coord(), c in coord()) {
        prop_assert_eq!(a.distance(&a), 0);
        prop_assert_eq!(a.distance(&b), b.distance(&a));
        prop_assert!(a.distance(&c) <= a.distance(&b) + b.distance(&c));
        if a != b {
            prop_assert!(a.distance(&b) > 0);
        }
    }

    #[test]
    fn test_neighbors_are_one_step_away(c in coord()) {
        for n in c.neighbors() {
            prop_assert_eq!(c.distance(&n), 1);
        }
    }

    #[test]
    fn test_pixel_round_trip(c in coord(), size in 20.0f64..80.0, zoom in 0.5f64..2.0) {
        let layout = HexLayout::pointy(size, Point::new(13.0, -7.0), zoom);
        prop_assert_eq!(layout.pixel_to_hex(layout.hex_to_pixel(c)), c);
    }

    #[test]
    fn test_rounding_lands_on_valid_cube(q in -50.0f64..50.0, r in -50.0f64..50.0) {
        let rounded = FractionalCube::new(q, r, -q - r).round();
        prop_assert!(rounded.is_valid());
    }

    #[test]
    fn test_arc_classification_is_total(relative in -720.0f64..720.0) {
        let normalized = normalize_relative(relative);
        prop_assert!((-180.0..=180.0).contains(&normalized));
        let arc = classify_relative_angle(normalized);
        let expected = if normalized.abs() <= 30.0 {
            AttackArc::Front
        } else if normalized > 30.0 && normalized <= 150.0 {
            AttackArc::RightSide
        } else if (-150.0..-30.0).contains(&normalized) {
            AttackArc::LeftSide
        } else {
            AttackArc::Rear
        };
        prop_assert_eq!(arc, expected);
    }

    #[test]
    fn test_every_roll_maps_to_a_location(roll in 0u32..=HIT_ROLL_MAX) {
        for arc in [AttackArc::Front, AttackArc::LeftSide, AttackArc::RightSide, AttackArc::Rear] {
            let location = location_for_roll(arc, roll);
            if arc != AttackArc::Rear {
                prop_assert!(!location.is_rear());
            }
        }
    }

    #[test]
    fn test_damage_never_repairs(
        class in weight_class(),
        hits in prop::collection::vec((location(), 0u32..120), 1..12),
    ) {
        let mut locations = Locations::for_weight_class(class);
        for (target, amount) in hits {
            let before = locations.clone();
            let report = apply_damage(&mut locations, target, amount);
            prop_assert_eq!(report.absorbed + report.overflow, amount);

            // A location that was already gone never hands damage on
            for event in &report.events {
                if let DamageEvent::Transfer { from, .. } = event {
                    prop_assert!(!before.is_destroyed(*from));
                }
            }
            for (loc, status) in locations.iter() {
                let old = before.get(loc);
                prop_assert!(status.current_armor <= old.current_armor);
                prop_assert!(status.current_structure <= old.current_structure);
                prop_assert!(status.is_destroyed || !old.is_destroyed);
                prop_assert!(status.current_armor <= status.max_armor);
            }
        }
    }

    #[test]
    fn test_damage_is_conserved(
        class in weight_class(),
        target in location(),
        amount in 0u32..600,
    ) {
        let mut locations = Locations::for_weight_class(class);
        let (before, _) = locations.totals();
        let report = apply_damage(&mut locations, target, amount);
        let (after, _) = locations.totals();

        prop_assert_eq!(report.absorbed + report.overflow, amount);
        prop_assert!(report.absorbed <= amount);
        prop_assert_eq!(before - after, report.absorbed);
        if report.overflow > 0 {
            prop_assert!(report.unit_destroyed().is_some());
        }
    }

    #[test]
    fn test_paths_stay_within_budget(seed in any::<u64>(), row in 0i32..12, col in 0i32..16) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let map = BattleMap::generate(12, 16, &mut rng);
        let costs = MovementCostTable::dry();
        let start = HexCoord::new(row, col);

        let mut units = UnitRoster::new();
        let id = units.insert(Unit::new(UnitClass::Medium, Side::Axis, start));
        let context = PathContext::new(&map, &units, &costs, ZOC_ENTRY_PENALTY);
        let Some(mover) = units.get(id) else {
            return Err(TestCaseError::fail("unit missing"));
        };

        let reachable = context.reachable_set(id);
        prop_assert!(reachable.contains(&start));
        for goal in reachable {
            let path = context.find_path(id, start, goal);
            prop_assert_eq!(path.first(), Some(&start));
            prop_assert_eq!(path.last(), Some(&goal));
            let cost = context.path_cost(mover, &path);
            prop_assert!(cost.is_some());
            prop_assert!(cost.unwrap_or(u32::MAX) <= mover.moves_left);
        }
    }

    #[test]
    fn test_zoc_start_allows_one_hex(row in 1i32..11, col in 1i32..15, side in 0usize..6) {
        let mut map = BattleMap::new(12, 16);
        let costs = MovementCostTable::dry();
        let start = HexCoord::new(row, col);
        let enemy_at = start.neighbors()[side];

        let mut units = UnitRoster::new();
        let id = units.insert(Unit::new(UnitClass::Light, Side::Axis, start));
        units.insert(Unit::new(UnitClass::Heavy, Side::Allied, enemy_at));
        initialize_all_zoc(&mut map, &units);

        let context = PathContext::new(&map, &units, &costs, ZOC_ENTRY_PENALTY);
        for coord in context.reachable_set(id) {
            prop_assert!(coord.distance(&start) <= 1);
            prop_assert_ne!(coord, enemy_at);
        }
    }
}
