//! Armor locations for mech damage tracking (11 locations)
//!
//! Eight structural locations plus three rear-torso armor facings. A rear
//! facing has its own armor but shares internal structure with the matching
//! front torso.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticsError};

/// Hit location on a mech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArmorLocation {
    Head,
    CenterTorso,
    LeftTorso,
    RightTorso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    CenterTorsoRear,
    LeftTorsoRear,
    RightTorsoRear,
}

pub const LOCATION_COUNT: usize = 11;

impl ArmorLocation {
    /// Returns all locations, in storage order
    pub fn all() -> [ArmorLocation; LOCATION_COUNT] {
        [
            ArmorLocation::Head,
            ArmorLocation::CenterTorso,
            ArmorLocation::LeftTorso,
            ArmorLocation::RightTorso,
            ArmorLocation::LeftArm,
            ArmorLocation::RightArm,
            ArmorLocation::LeftLeg,
            ArmorLocation::RightLeg,
            ArmorLocation::CenterTorsoRear,
            ArmorLocation::LeftTorsoRear,
            ArmorLocation::RightTorsoRear,
        ]
    }

    fn slot(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArmorLocation::Head => "HEAD",
            ArmorLocation::CenterTorso => "CENTER TORSO",
            ArmorLocation::LeftTorso => "LEFT TORSO",
            ArmorLocation::RightTorso => "RIGHT TORSO",
            ArmorLocation::LeftArm => "LEFT ARM",
            ArmorLocation::RightArm => "RIGHT ARM",
            ArmorLocation::LeftLeg => "LEFT LEG",
            ArmorLocation::RightLeg => "RIGHT LEG",
            ArmorLocation::CenterTorsoRear => "CT (REAR)",
            ArmorLocation::LeftTorsoRear => "LT (REAR)",
            ArmorLocation::RightTorsoRear => "RT (REAR)",
        }
    }

    pub fn is_rear(&self) -> bool {
        matches!(
            self,
            ArmorLocation::CenterTorsoRear
                | ArmorLocation::LeftTorsoRear
                | ArmorLocation::RightTorsoRear
        )
    }

    /// Location whose internal structure backs this location's armor
    pub fn structure_slot(&self) -> ArmorLocation {
        match self {
            ArmorLocation::CenterTorsoRear => ArmorLocation::CenterTorso,
            ArmorLocation::LeftTorsoRear => ArmorLocation::LeftTorso,
            ArmorLocation::RightTorsoRear => ArmorLocation::RightTorso,
            other => *other,
        }
    }

    /// Where overflow damage goes once this location is destroyed.
    ///
    /// None for the critical locations: destroying them ends the unit.
    pub fn transfer_target(&self) -> Option<ArmorLocation> {
        match self {
            ArmorLocation::LeftArm | ArmorLocation::LeftLeg => Some(ArmorLocation::LeftTorso),
            ArmorLocation::RightArm | ArmorLocation::RightLeg => Some(ArmorLocation::RightTorso),
            ArmorLocation::LeftTorso
            | ArmorLocation::RightTorso
            | ArmorLocation::LeftTorsoRear
            | ArmorLocation::RightTorsoRear => Some(ArmorLocation::CenterTorso),
            ArmorLocation::Head
            | ArmorLocation::CenterTorso
            | ArmorLocation::CenterTorsoRear => None,
        }
    }

    /// Destroying this location kills the unit
    pub fn is_critical(&self) -> bool {
        matches!(self, ArmorLocation::Head | ArmorLocation::CenterTorso)
    }

    pub fn is_leg(&self) -> bool {
        matches!(self, ArmorLocation::LeftLeg | ArmorLocation::RightLeg)
    }

    pub fn is_arm(&self) -> bool {
        matches!(self, ArmorLocation::LeftArm | ArmorLocation::RightArm)
    }

    /// Rear armor facings backed by this location's structure
    pub fn rear_facings(&self) -> &'static [ArmorLocation] {
        match self {
            ArmorLocation::CenterTorso => &[ArmorLocation::CenterTorsoRear],
            ArmorLocation::LeftTorso => &[ArmorLocation::LeftTorsoRear],
            ArmorLocation::RightTorso => &[ArmorLocation::RightTorsoRear],
            _ => &[],
        }
    }
}

/// Check once that following transfer targets always terminates
pub fn validate_transfer_graph() -> Result<()> {
    for start in ArmorLocation::all() {
        let mut current = start;
        let mut steps = 0;
        while let Some(next) = current.transfer_target() {
            steps += 1;
            if steps > LOCATION_COUNT {
                return Err(TacticsError::DataIntegrity(format!(
                    "transfer chain from {} does not terminate",
                    start.name()
                )));
            }
            current = next;
        }
        if !current.structure_slot().is_critical() {
            return Err(TacticsError::DataIntegrity(format!(
                "transfer chain from {} ends at non-critical {}",
                start.name(),
                current.name()
            )));
        }
    }
    Ok(())
}

/// Armor and internal structure of one location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocationStatus {
    pub current_armor: u32,
    pub max_armor: u32,
    pub current_structure: u32,
    pub max_structure: u32,
    pub is_destroyed: bool,
}

impl LocationStatus {
    pub fn new(armor: u32, structure: u32) -> Self {
        Self {
            current_armor: armor,
            max_armor: armor,
            current_structure: structure,
            max_structure: structure,
            is_destroyed: false,
        }
    }

    /// Remove up to `damage` armor, returning the amount absorbed
    pub fn absorb_armor(&mut self, damage: u32) -> u32 {
        let absorbed = self.current_armor.min(damage);
        self.current_armor -= absorbed;
        absorbed
    }

    /// Remove up to `damage` structure, returning the amount absorbed
    pub fn absorb_structure(&mut self, damage: u32) -> u32 {
        let absorbed = self.current_structure.min(damage);
        self.current_structure -= absorbed;
        absorbed
    }
}

/// Mech weight classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeightClass {
    Light,
    #[default]
    Medium,
    Heavy,
    Assault,
}

impl WeightClass {
    pub fn tonnage(&self) -> u32 {
        match self {
            WeightClass::Light => 35,
            WeightClass::Medium => 50,
            WeightClass::Heavy => 70,
            WeightClass::Assault => 100,
        }
    }

    /// (armor, structure) per location, in `ArmorLocation::all()` order
    fn profile(&self) -> [(u32, u32); LOCATION_COUNT] {
        match self {
            WeightClass::Light => [
                (18, 6),
                (50, 18),
                (32, 14),
                (32, 14),
                (28, 12),
                (28, 12),
                (36, 14),
                (36, 14),
                (10, 0),
                (8, 0),
                (8, 0),
            ],
            WeightClass::Medium => [
                (18, 8),
                (80, 26),
                (52, 20),
                (52, 20),
                (40, 16),
                (40, 16),
                (52, 20),
                (52, 20),
                (16, 0),
                (12, 0),
                (12, 0),
            ],
            WeightClass::Heavy => [
                (18, 10),
                (100, 36),
                (64, 28),
                (64, 28),
                (52, 24),
                (52, 24),
                (64, 28),
                (64, 28),
                (24, 0),
                (16, 0),
                (16, 0),
            ],
            WeightClass::Assault => [
                (18, 12),
                (120, 50),
                (80, 40),
                (80, 40),
                (64, 34),
                (64, 34),
                (80, 40),
                (80, 40),
                (36, 0),
                (24, 0),
                (24, 0),
            ],
        }
    }
}

/// What ended a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    CriticalLocation(ArmorLocation),
    BothLegs,
}

/// Per-location status for one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locations {
    slots: [LocationStatus; LOCATION_COUNT],
}

impl Locations {
    /// Fresh armor for a weight class
    pub fn for_weight_class(weight_class: WeightClass) -> Self {
        let profile = weight_class.profile();
        Self {
            slots: profile.map(|(armor, structure)| LocationStatus::new(armor, structure)),
        }
    }

    pub fn get(&self, location: ArmorLocation) -> &LocationStatus {
        &self.slots[location.slot()]
    }

    pub fn get_mut(&mut self, location: ArmorLocation) -> &mut LocationStatus {
        &mut self.slots[location.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArmorLocation, &LocationStatus)> {
        ArmorLocation::all().into_iter().zip(self.slots.iter())
    }

    /// A rear facing counts as destroyed once its front structure is gone
    pub fn is_destroyed(&self, location: ArmorLocation) -> bool {
        self.get(location.structure_slot()).is_destroyed
    }

    /// Mark a structural location destroyed along with its rear facings
    pub(crate) fn mark_destroyed(&mut self, slot: ArmorLocation) {
        self.get_mut(slot).is_destroyed = true;
        for rear in slot.rear_facings() {
            self.get_mut(*rear).is_destroyed = true;
        }
    }

    /// Why the unit is dead, if it is
    pub fn death_cause(&self) -> Option<DeathCause> {
        for critical in [ArmorLocation::Head, ArmorLocation::CenterTorso] {
            if self.is_destroyed(critical) {
                return Some(DeathCause::CriticalLocation(critical));
            }
        }
        if self.is_destroyed(ArmorLocation::LeftLeg) && self.is_destroyed(ArmorLocation::RightLeg) {
            return Some(DeathCause::BothLegs);
        }
        None
    }

    pub fn is_alive(&self) -> bool {
        self.death_cause().is_none()
    }

    /// Sum of current and maximum armor plus structure
    pub fn totals(&self) -> (u32, u32) {
        self.slots.iter().fold((0, 0), |(current, max), status| {
            (
                current + status.current_armor + status.current_structure,
                max + status.max_armor + status.max_structure,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_count() {
        assert_eq!(ArmorLocation::all().len(), 11);
    }

    #[test]
    fn test_transfer_graph_is_acyclic() {
        assert!(validate_transfer_graph().is_ok());
    }

    #[test]
    fn test_limbs_transfer_to_side_torso() {
        assert_eq!(ArmorLocation::LeftArm.transfer_target(), Some(ArmorLocation::LeftTorso));
        assert_eq!(ArmorLocation::RightLeg.transfer_target(), Some(ArmorLocation::RightTorso));
        assert_eq!(ArmorLocation::LeftTorso.transfer_target(), Some(ArmorLocation::CenterTorso));
    }

    #[test]
    fn test_critical_locations_have_no_transfer() {
        assert_eq!(ArmorLocation::Head.transfer_target(), None);
        assert_eq!(ArmorLocation::CenterTorso.transfer_target(), None);
        assert!(ArmorLocation::Head.is_critical());
        assert!(!ArmorLocation::LeftTorso.is_critical());
    }

    #[test]
    fn test_rear_maps_to_front_structure() {
        assert_eq!(
            ArmorLocation::CenterTorsoRear.structure_slot(),
            ArmorLocation::CenterTorso
        );
        assert_eq!(ArmorLocation::LeftTorsoRear.structure_slot(), ArmorLocation::LeftTorso);
        assert_eq!(ArmorLocation::LeftArm.structure_slot(), ArmorLocation::LeftArm);
        for location in ArmorLocation::all() {
            assert!(!location.structure_slot().is_rear());
        }
    }

    #[test]
    fn test_medium_profile() {
        let locations = Locations::for_weight_class(WeightClass::Medium);
        assert_eq!(*locations.get(ArmorLocation::CenterTorso), LocationStatus::new(80, 26));
        assert_eq!(locations.get(ArmorLocation::LeftTorsoRear).max_structure, 0);
    }

    #[test]
    fn test_heavier_classes_carry_more() {
        let light = Locations::for_weight_class(WeightClass::Light).totals().1;
        let assault = Locations::for_weight_class(WeightClass::Assault).totals().1;
        assert!(assault > light);
    }

    #[test]
    fn test_rear_facing_follows_front_destruction() {
        let mut locations = Locations::for_weight_class(WeightClass::Light);
        assert!(!locations.is_destroyed(ArmorLocation::LeftTorsoRear));
        locations.mark_destroyed(ArmorLocation::LeftTorso);
        assert!(locations.is_destroyed(ArmorLocation::LeftTorsoRear));
        assert!(locations.get(ArmorLocation::LeftTorsoRear).is_destroyed);
        assert!(locations.is_alive());
    }

    #[test]
    fn test_death_causes() {
        let mut locations = Locations::for_weight_class(WeightClass::Heavy);
        locations.mark_destroyed(ArmorLocation::LeftLeg);
        assert_eq!(locations.death_cause(), None);
        locations.mark_destroyed(ArmorLocation::RightLeg);
        assert_eq!(locations.death_cause(), Some(DeathCause::BothLegs));

        let mut locations = Locations::for_weight_class(WeightClass::Heavy);
        locations.mark_destroyed(ArmorLocation::Head);
        assert_eq!(
            locations.death_cause(),
            Some(DeathCause::CriticalLocation(ArmorLocation::Head))
        );
    }

    #[test]
    fn test_armor_absorbs_before_structure() {
        let mut status = LocationStatus::new(5, 3);
        assert_eq!(status.absorb_armor(8), 5);
        assert_eq!(status.current_armor, 0);
        assert_eq!(status.current_structure, 3);
        assert_eq!(status.absorb_structure(10), 3);
        assert_eq!(status.current_structure, 0);
    }
}
