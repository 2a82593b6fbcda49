//! Facing-relative combat geometry
//!
//! Angles are in degrees, screen convention: east = 0, south = 90 (y grows
//! downward). Positions are pixel-space centers from a `HexLayout`; the
//! result is independent of hex size and origin.

use serde::{Deserialize, Serialize};

use crate::battle::hex::{HexCoord, HexLayout, Point};

/// Half-width of the front arc
pub const FRONT_ARC_LIMIT: f64 = 30.0;
/// Boundary between the side arcs and the rear arc
pub const SIDE_ARC_LIMIT: f64 = 150.0;
/// Half-width of the default firing cone (120 degrees total)
pub const FIRING_ARC_HALF_ANGLE: f64 = 60.0;

/// Which side of the target a shot comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackArc {
    Front,
    LeftSide,
    RightSide,
    Rear,
}

impl AttackArc {
    pub fn name(&self) -> &'static str {
        match self {
            AttackArc::Front => "FRONT",
            AttackArc::LeftSide => "LEFT SIDE",
            AttackArc::RightSide => "RIGHT SIDE",
            AttackArc::Rear => "REAR",
        }
    }
}

/// Normalize any angle into [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize an angle difference into (-180, 180]
pub fn normalize_relative(angle: f64) -> f64 {
    let wrapped = normalize_degrees(angle);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Bearing from `from` to `to`, in [0, 360)
pub fn bearing(from: Point, to: Point) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    normalize_degrees(dy.atan2(dx).to_degrees())
}

/// Classify a relative angle in (-180, 180] into an arc.
///
/// Boundaries belong to the smaller-magnitude arc: exactly 30 is front,
/// exactly 150 is side.
pub fn classify_relative_angle(relative: f64) -> AttackArc {
    if relative.abs() <= FRONT_ARC_LIMIT {
        AttackArc::Front
    } else if relative > FRONT_ARC_LIMIT && relative <= SIDE_ARC_LIMIT {
        AttackArc::RightSide
    } else if relative < -FRONT_ARC_LIMIT && relative >= -SIDE_ARC_LIMIT {
        AttackArc::LeftSide
    } else {
        AttackArc::Rear
    }
}

/// Facing that points from one hex center toward another
pub fn facing_toward(layout: &HexLayout, from: HexCoord, to: HexCoord) -> f64 {
    bearing(layout.hex_to_pixel(from), layout.hex_to_pixel(to))
}

/// Arc of the target that a shot from `attacker` strikes
pub fn attack_arc(attacker: Point, target: Point, target_facing: f64) -> AttackArc {
    let relative = normalize_relative(bearing(target, attacker) - target_facing);
    classify_relative_angle(relative)
}

/// Is `target` inside the attacker's firing cone of the given half-width?
pub fn is_in_firing_cone(attacker: Point, attacker_facing: f64, target: Point, half_angle: f64) -> bool {
    let relative = normalize_relative(bearing(attacker, target) - attacker_facing);
    relative.abs() <= half_angle
}

/// Is `target` inside the attacker's 120 degree frontal firing arc?
pub fn is_in_firing_arc(attacker: Point, attacker_facing: f64, target: Point) -> bool {
    is_in_firing_cone(attacker, attacker_facing, target, FIRING_ARC_HALF_ANGLE)
}

/// 16-point compass name with zero-padded degrees, e.g. `NNE (290°)`.
///
/// Labels follow the screen rather than a map bearing: facings run clockwise
/// from east with y down, so 0 reads as "E" and 270 as "N". A bearing-style
/// label (0 as "N") would disagree with `facing_toward` and the arc math.
pub fn facing_name(facing: f64) -> String {
    const POINTS: [&str; 16] = [
        "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW", "N", "NNE",
        "NE", "ENE",
    ];
    let facing = normalize_degrees(facing);
    let sector = (((facing + 11.25) / 22.5) as usize) % 16;
    format!("{} ({:03}°)", POINTS[sector], facing as u32)
}
