//! Combat resolution: where a shot lands and what it breaks
//!
//! - `arcs`: facing-relative attack arcs and firing cones
//! - `hit_table`: per-arc hit-location rolls
//! - `armor_location`: the 11 armor locations and their transfer graph
//! - `damage`: the armor/structure/transfer cascade

pub mod arcs;
pub mod armor_location;
pub mod damage;
pub mod hit_table;

pub use arcs::{attack_arc, facing_name, is_in_firing_arc, is_in_firing_cone, AttackArc};
pub use armor_location::{
    validate_transfer_graph, ArmorLocation, DeathCause, LocationStatus, Locations,
    WeightClass,
};
pub use damage::{apply_damage, DamageEvent, DamageReport};
pub use hit_table::{location_for_roll, roll_hit_location, HIT_ROLL_MAX};
