//! Damage cascade: armor, then structure, then transfer inward
//!
//! Damage hitting a location first strips that location's armor. What is
//! left goes into the structure slot behind it (a rear facing uses its front
//! torso's structure). When a slot is destroyed the remainder moves on to the
//! location's transfer target and the process repeats. The transfer graph is
//! acyclic, so the loop visits each location at most once.

use serde::{Deserialize, Serialize};

use crate::combat::armor_location::{ArmorLocation, DeathCause, Locations, LOCATION_COUNT};

/// One step of the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageEvent {
    /// Damage landed on a location
    Hit {
        location: ArmorLocation,
        armor_absorbed: u32,
        structure_absorbed: u32,
        armor_left: u32,
        max_armor: u32,
        structure_left: u32,
        max_structure: u32,
    },
    /// A structure slot reached zero
    LocationDestroyed { location: ArmorLocation },
    /// Overflow moving to the next location
    Transfer {
        from: ArmorLocation,
        to: ArmorLocation,
        amount: u32,
    },
    /// One leg gone; the unit limps on one movement point
    LegLost { location: ArmorLocation },
    UnitDestroyed { cause: DeathCause },
}

impl DamageEvent {
    /// Combat-log line for this event
    pub fn describe(&self) -> String {
        match self {
            DamageEvent::Hit {
                location,
                armor_absorbed,
                structure_absorbed,
                ..
            } => format!(
                "[DAMAGE] {} takes {} damage (armor -{}, structure -{})",
                location.name(),
                armor_absorbed + structure_absorbed,
                armor_absorbed,
                structure_absorbed
            ),
            DamageEvent::LocationDestroyed { location } => {
                format!("[LOCATION DESTROYED] {} destroyed!", location.name())
            }
            DamageEvent::Transfer { from, to, amount } => format!(
                "[DAMAGE TRANSFER] {} damage transfers from {} to {}",
                amount,
                from.name(),
                to.name()
            ),
            DamageEvent::LegLost { location } => {
                format!("[LOCATION STATUS] {} lost, movement reduced to 1", location.name())
            }
            DamageEvent::UnitDestroyed { cause } => match cause {
                DeathCause::CriticalLocation(_) => {
                    "[MECH DEATH] Critical location destroyed!".to_string()
                }
                DeathCause::BothLegs => "[MECH DEATH] Both legs destroyed!".to_string(),
            },
        }
    }

    /// Status line following a hit
    pub fn status_line(&self) -> Option<String> {
        match self {
            DamageEvent::Hit {
                location,
                armor_left,
                max_armor,
                structure_left,
                max_structure,
                ..
            } => Some(format!(
                "[LOCATION STATUS] {}: armor {}/{}, structure {}/{}",
                location.name(),
                armor_left,
                max_armor,
                structure_left,
                max_structure
            )),
            _ => None,
        }
    }
}

/// Everything one call to `apply_damage` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub location: ArmorLocation,
    pub damage: u32,
    /// Total armor and structure removed across all locations
    pub absorbed: u32,
    /// Damage left over when the cascade stopped: after a kill, or when the
    /// hit landed on a location that was already destroyed
    pub overflow: u32,
    pub events: Vec<DamageEvent>,
}

impl DamageReport {
    fn new(location: ArmorLocation, damage: u32) -> Self {
        Self {
            location,
            damage,
            absorbed: 0,
            overflow: 0,
            events: Vec::new(),
        }
    }

    pub fn unit_destroyed(&self) -> Option<DeathCause> {
        self.events.iter().find_map(|event| match event {
            DamageEvent::UnitDestroyed { cause } => Some(*cause),
            _ => None,
        })
    }

    pub fn leg_lost(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, DamageEvent::LegLost { .. }))
    }

    pub fn destroyed_locations(&self) -> Vec<ArmorLocation> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DamageEvent::LocationDestroyed { location } => Some(*location),
                _ => None,
            })
            .collect()
    }

    /// Log lines in cascade order
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.events.len() * 2);
        for event in &self.events {
            lines.push(event.describe());
            if let Some(status) = event.status_line() {
                lines.push(status);
            }
        }
        lines
    }
}

fn other_leg(leg: ArmorLocation) -> ArmorLocation {
    match leg {
        ArmorLocation::LeftLeg => ArmorLocation::RightLeg,
        _ => ArmorLocation::LeftLeg,
    }
}

/// Apply `damage` to `location` and cascade any overflow
pub fn apply_damage(locations: &mut Locations, location: ArmorLocation, damage: u32) -> DamageReport {
    let mut report = DamageReport::new(location, damage);
    let mut current = location;
    let mut remaining = damage;

    for _ in 0..LOCATION_COUNT {
        if remaining == 0 {
            break;
        }

        let slot = current.structure_slot();
        let armor_absorbed = locations.get_mut(current).absorb_armor(remaining);
        remaining -= armor_absorbed;

        // A destroyed slot only soaks what armor it has left
        let was_destroyed = locations.get(slot).is_destroyed;
        let structure_absorbed = if was_destroyed {
            0
        } else {
            locations.get_mut(slot).absorb_structure(remaining)
        };
        remaining -= structure_absorbed;
        report.absorbed += armor_absorbed + structure_absorbed;

        let armor = *locations.get(current);
        let structure = *locations.get(slot);
        report.events.push(DamageEvent::Hit {
            location: current,
            armor_absorbed,
            structure_absorbed,
            armor_left: armor.current_armor,
            max_armor: armor.max_armor,
            structure_left: structure.current_structure,
            max_structure: structure.max_structure,
        });

        if !was_destroyed && structure.current_structure == 0 {
            locations.mark_destroyed(slot);
            report.events.push(DamageEvent::LocationDestroyed { location: slot });
            tracing::debug!(location = slot.name(), "Location destroyed");

            if slot.is_critical() {
                report.events.push(DamageEvent::UnitDestroyed {
                    cause: DeathCause::CriticalLocation(slot),
                });
                break;
            }
            if slot.is_leg() {
                if locations.is_destroyed(other_leg(slot)) {
                    report.events.push(DamageEvent::UnitDestroyed {
                        cause: DeathCause::BothLegs,
                    });
                    break;
                }
                report.events.push(DamageEvent::LegLost { location: slot });
            }
        }

        if remaining == 0 {
            break;
        }
        // Only a location destroyed by this hit hands damage on
        if was_destroyed {
            tracing::debug!(location = current.name(), remaining, "Damage lost on destroyed location");
            break;
        }

        match current.transfer_target() {
            Some(next) => {
                report.events.push(DamageEvent::Transfer {
                    from: current,
                    to: next,
                    amount: remaining,
                });
                current = next;
            }
            None => {
                // Only the critical locations end a chain, and they are dead
                tracing::debug!(location = current.name(), remaining, "Transfer chain ended");
                break;
            }
        }
    }

    report.overflow = remaining;
    report
}
