//! Hit-location tables, one per attack arc
//!
//! A roll is uniform over `0..=HIT_ROLL_MAX`. Each table is a list of
//! exclusive upper bounds; the first band whose bound exceeds the roll wins
//! and the last band takes everything else.

use rand::Rng;

use crate::combat::arcs::AttackArc;
use crate::combat::armor_location::ArmorLocation;

/// Largest possible hit roll (inclusive)
pub const HIT_ROLL_MAX: u32 = 80;

type Band = (u32, ArmorLocation);

const FRONT_TABLE: &[Band] = &[
    (1, ArmorLocation::Head),
    (17, ArmorLocation::CenterTorso),
    (31, ArmorLocation::LeftTorso),
    (45, ArmorLocation::RightTorso),
    (55, ArmorLocation::LeftArm),
    (65, ArmorLocation::RightArm),
    (73, ArmorLocation::LeftLeg),
];
const FRONT_FALLBACK: ArmorLocation = ArmorLocation::RightLeg;

const LEFT_TABLE: &[Band] = &[
    (1, ArmorLocation::Head),
    (5, ArmorLocation::CenterTorso),
    (33, ArmorLocation::LeftTorso),
    (61, ArmorLocation::LeftArm),
];
const LEFT_FALLBACK: ArmorLocation = ArmorLocation::LeftLeg;

const RIGHT_TABLE: &[Band] = &[
    (1, ArmorLocation::Head),
    (5, ArmorLocation::CenterTorso),
    (33, ArmorLocation::RightTorso),
    (61, ArmorLocation::RightArm),
];
const RIGHT_FALLBACK: ArmorLocation = ArmorLocation::RightLeg;

// Rear shots never reach the head
const REAR_TABLE: &[Band] = &[
    (16, ArmorLocation::CenterTorsoRear),
    (30, ArmorLocation::LeftTorsoRear),
    (44, ArmorLocation::RightTorsoRear),
    (48, ArmorLocation::LeftArm),
    (52, ArmorLocation::RightArm),
    (57, ArmorLocation::LeftLeg),
];
const REAR_FALLBACK: ArmorLocation = ArmorLocation::RightLeg;

fn table_for(arc: AttackArc) -> (&'static [Band], ArmorLocation) {
    match arc {
        AttackArc::Front => (FRONT_TABLE, FRONT_FALLBACK),
        AttackArc::LeftSide => (LEFT_TABLE, LEFT_FALLBACK),
        AttackArc::RightSide => (RIGHT_TABLE, RIGHT_FALLBACK),
        AttackArc::Rear => (REAR_TABLE, REAR_FALLBACK),
    }
}

/// Pure table lookup. Rolls above `HIT_ROLL_MAX` land in the last band.
pub fn location_for_roll(arc: AttackArc, roll: u32) -> ArmorLocation {
    let (bands, fallback) = table_for(arc);
    bands
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map(|(_, location)| *location)
        .unwrap_or(fallback)
}

/// Roll a hit location for a shot landing in `arc`
pub fn roll_hit_location<R: Rng>(arc: AttackArc, rng: &mut R) -> (u32, ArmorLocation) {
    let roll = rng.gen_range(0..=HIT_ROLL_MAX);
    (roll, location_for_roll(arc, roll))
}
