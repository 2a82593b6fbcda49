//! Game session: the single owner of map, units and turn state
//!
//! Player actions (`move_unit`, `perform_attack`) each read and write the
//! session in one call. Illegal actions are not errors: they come back as a
//! `Rejected` outcome and leave a line in the combat log. Only stale unit
//! handles and bad setup return `Err`.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::{HexCoord, HexLayout, Point};
use crate::battle::log::CombatLog;
use crate::battle::pathfinding::PathContext;
use crate::battle::terrain::{MoveCost, MovementCostTable};
use crate::battle::units::{Unit, UnitClass, UnitRoster};
use crate::battle::visibility::{initialize_all_spotting, is_unit_visible, set_unit_spotting};
use crate::battle::zoc::{initialize_all_zoc, set_unit_zoc};
use crate::combat::arcs::{attack_arc, facing_toward, is_in_firing_cone, AttackArc};
use crate::combat::armor_location::{validate_transfer_graph, ArmorLocation};
use crate::combat::damage::DamageReport;
use crate::combat::hit_table::{location_for_roll, roll_hit_location, HIT_ROLL_MAX};
use crate::core::config::RulesConfig;
use crate::core::error::{Result, TacticsError};
use crate::core::types::{Side, Turn, UnitId};

/// How the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    Undecided,
    Victory(Side),
    /// Turn limit reached with both sides standing
    Draw,
}

/// Why a move did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRejection {
    NotYourTurn,
    UnitDestroyed,
    AlreadyMoved,
    OffMap,
    Occupied,
    Impassable,
    NotEnoughMovementPoints,
    Unreachable,
}

impl MoveRejection {
    pub fn message(&self) -> &'static str {
        match self {
            MoveRejection::NotYourTurn => "Unit cannot move out of turn",
            MoveRejection::UnitDestroyed => "Unit is destroyed",
            MoveRejection::AlreadyMoved => "Unit has already moved this turn",
            MoveRejection::OffMap => "Target is off the map",
            MoveRejection::Occupied => "Target hex is occupied",
            MoveRejection::Impassable => "Terrain is impassable",
            MoveRejection::NotEnoughMovementPoints => "Not enough movement points",
            MoveRejection::Unreachable => "Target hex is not reachable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Moved {
        from: HexCoord,
        to: HexCoord,
        path: Vec<HexCoord>,
    },
    Rejected(MoveRejection),
}

/// Why an attack did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackRejection {
    NotYourTurn,
    AttackerDestroyed,
    AlreadyFired,
    TargetDestroyed,
    FriendlyTarget,
    OutOfRange,
    OutOfFiringArc,
}

impl AttackRejection {
    pub fn message(&self) -> &'static str {
        match self {
            AttackRejection::NotYourTurn => "Unit cannot fire out of turn",
            AttackRejection::AttackerDestroyed => "Unit is destroyed",
            AttackRejection::AlreadyFired => "Unit has already fired this turn",
            AttackRejection::TargetDestroyed => "[COMBAT] Target is already destroyed",
            AttackRejection::FriendlyTarget => "[COMBAT] Cannot fire on a friendly unit",
            AttackRejection::OutOfRange => "[COMBAT] Target out of range",
            AttackRejection::OutOfFiringArc => "[COMBAT] Target outside firing arc",
        }
    }
}

/// A resolved shot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub distance: u32,
    pub arc: AttackArc,
    pub roll: u32,
    pub location: ArmorLocation,
    pub damage: DamageReport,
    pub defender_destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    Hit(AttackReport),
    Rejected(AttackRejection),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameSession {
    map: BattleMap,
    units: UnitRoster,
    costs: MovementCostTable,
    config: RulesConfig,
    rng: ChaCha8Rng,
    turn: Turn,
    current_side: Side,
    outcome: GameOutcome,
    log: CombatLog,
    /// Labels of destroyed units, by their now-stale handles
    wrecks: AHashMap<UnitId, String>,
}

fn session_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

impl GameSession {
    /// Start a session on a prepared map
    pub fn new(config: RulesConfig, map: BattleMap, costs: MovementCostTable) -> Result<Self> {
        config.validate()?;
        validate_transfer_graph()?;
        let rng = session_rng(config.seed);
        Ok(Self::assemble(config, map, costs, rng))
    }

    /// Start a session on a randomly generated map
    pub fn generate(config: RulesConfig) -> Result<Self> {
        config.validate()?;
        validate_transfer_graph()?;
        let mut rng = session_rng(config.seed);
        let map = BattleMap::generate(config.map_rows, config.map_cols, &mut rng);
        Ok(Self::assemble(config, map, MovementCostTable::dry(), rng))
    }

    fn assemble(config: RulesConfig, map: BattleMap, costs: MovementCostTable, rng: ChaCha8Rng) -> Self {
        tracing::info!(
            rows = map.rows,
            cols = map.cols,
            seed = ?config.seed,
            "Game session started"
        );
        let mut log = CombatLog::new();
        log.push(1, "--- Turn 1 ---");
        log.push(1, format!("{} turn begins", Side::Axis.name()));
        Self {
            map,
            units: UnitRoster::new(),
            costs,
            config,
            rng,
            turn: 1,
            current_side: Side::Axis,
            outcome: GameOutcome::Undecided,
            log,
            wrecks: AHashMap::new(),
        }
    }

    pub fn map(&self) -> &BattleMap {
        &self.map
    }

    /// Mutable map access for scenario setup.
    ///
    /// Call `rebuild_overlays` afterwards if unit positions were touched.
    pub fn map_mut(&mut self) -> &mut BattleMap {
        &mut self.map
    }

    pub fn units(&self) -> &UnitRoster {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Mutable unit access for scenario setup.
    ///
    /// Call `rebuild_overlays` afterwards if the position changed.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn current_side(&self) -> Side {
        self.current_side
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome != GameOutcome::Undecided
    }

    /// Layout for renderers, sized from the config
    pub fn render_layout(&self, origin: Point, zoom: f64) -> HexLayout {
        HexLayout::pointy(self.config.hex_size, origin, zoom)
    }

    /// Append a line to the combat log
    pub fn add_log_message(&mut self, message: impl Into<String>) {
        self.log.push(self.turn, message);
    }

    fn path_context(&self) -> PathContext<'_> {
        PathContext::new(&self.map, &self.units, &self.costs, self.config.zoc_entry_penalty)
    }

    fn unit_label(unit: &Unit) -> String {
        format!("{} ({})", unit.name, unit.side.name())
    }

    // ===== DEPLOYMENT =====

    /// Deploy a unit of the given class with default stats
    pub fn deploy_unit(&mut self, class: UnitClass, side: Side, coord: HexCoord) -> Result<UnitId> {
        let unit = Unit::new(class, side, coord).with_weapon_range(self.config.default_weapon_range);
        self.deploy(unit)
    }

    /// Deploy a fully built unit at its own position
    pub fn deploy(&mut self, unit: Unit) -> Result<UnitId> {
        let coord = unit.position;
        if !self.map.in_bounds(coord) {
            return Err(TacticsError::OutOfBounds(coord));
        }
        if self.units.unit_at(coord).is_some() {
            return Err(TacticsError::InvalidAction(format!(
                "hex ({}, {}) is already occupied",
                coord.row, coord.col
            )));
        }

        set_unit_zoc(&mut self.map, &unit, true);
        set_unit_spotting(&mut self.map, &unit, true);
        tracing::info!(unit = %unit.name, side = unit.side.name(), row = coord.row, col = coord.col, "Unit deployed");
        Ok(self.units.insert(unit))
    }

    /// Recompute ZOC and spotting counters from scratch
    pub fn rebuild_overlays(&mut self) {
        self.units.reindex();
        initialize_all_zoc(&mut self.map, &self.units);
        initialize_all_spotting(&mut self.map, &self.units);
    }

    // ===== QUERIES =====

    pub fn unit_at(&self, coord: HexCoord) -> Option<UnitId> {
        self.units.unit_at(coord)
    }

    /// Can `viewer` see this unit?
    pub fn is_visible_to(&self, id: UnitId, viewer: Side) -> bool {
        self.units
            .get(id)
            .is_some_and(|unit| is_unit_visible(&self.map, unit, viewer))
    }

    /// Route for a unit, empty if there is none
    pub fn find_path(&self, id: UnitId, start: HexCoord, goal: HexCoord) -> Vec<HexCoord> {
        self.path_context().find_path(id, start, goal)
    }

    /// Reachable hexes, without touching highlights
    pub fn reachable_hexes(&self, id: UnitId) -> Vec<HexCoord> {
        self.path_context().reachable_set(id)
    }

    /// Reachable hexes for a unit; also flags them as move-selectable
    pub fn reachable_set(&mut self, id: UnitId) -> Vec<HexCoord> {
        self.map.clear_selection_highlights();
        let reachable = self.reachable_hexes(id);
        for coord in &reachable {
            if let Some(hex) = self.map.get_hex_mut(*coord) {
                hex.is_move_sel = true;
            }
        }
        reachable
    }

    /// Living enemies within weapon range and inside the firing arc
    pub fn valid_targets(&self, attacker: UnitId) -> Vec<UnitId> {
        let Some(unit) = self.units.get(attacker) else {
            return Vec::new();
        };
        if !unit.is_alive() {
            return Vec::new();
        }
        let layout = HexLayout::unit();
        let origin = layout.hex_to_pixel(unit.position);
        self.units
            .living(unit.side.opponent())
            .filter(|(_, target)| unit.position.distance(&target.position) <= unit.weapon_range)
            .filter(|(_, target)| {
                is_in_firing_cone(
                    origin,
                    unit.facing,
                    layout.hex_to_pixel(target.position),
                    self.config.firing_arc_half_angle,
                )
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Flag hexes holding valid targets for an attacker
    pub fn highlight_attack_range(&mut self, attacker: UnitId) -> Vec<UnitId> {
        for hex in self.map.hexes_mut() {
            hex.is_attack_sel = false;
        }
        let targets = self.valid_targets(attacker);
        for id in &targets {
            if let Some(coord) = self.units.get(*id).map(|unit| unit.position) {
                if let Some(hex) = self.map.get_hex_mut(coord) {
                    hex.is_attack_sel = true;
                }
            }
        }
        targets
    }

    // ===== COMMANDS =====

    /// Turn a unit to an absolute facing (wraps into [0, 360))
    pub fn set_facing(&mut self, id: UnitId, degrees: f64) -> Result<()> {
        let unit = self.units.get_mut(id).ok_or(TacticsError::UnitNotFound(id))?;
        unit.set_facing(degrees);
        tracing::debug!(unit = %unit.name, facing = unit.facing, "Facing changed");
        Ok(())
    }

    /// Turn a unit to face a hex
    pub fn face_toward(&mut self, id: UnitId, target: HexCoord) -> Result<()> {
        let position = self
            .units
            .get(id)
            .map(|unit| unit.position)
            .ok_or(TacticsError::UnitNotFound(id))?;
        if position == target {
            return Ok(());
        }
        self.set_facing(id, facing_toward(&HexLayout::unit(), position, target))
    }

    fn reject_move(&mut self, rejection: MoveRejection) -> Result<MoveOutcome> {
        self.add_log_message(rejection.message());
        tracing::debug!(?rejection, "Move rejected");
        Ok(MoveOutcome::Rejected(rejection))
    }

    /// Move a unit to a reachable hex. Uses the unit's whole move for the turn.
    pub fn move_unit(&mut self, id: UnitId, target: HexCoord) -> Result<MoveOutcome> {
        let Some(unit) = self.units.get(id) else {
            if self.wrecks.contains_key(&id) {
                return self.reject_move(MoveRejection::UnitDestroyed);
            }
            return Err(TacticsError::UnitNotFound(id));
        };

        if !unit.is_alive() {
            return self.reject_move(MoveRejection::UnitDestroyed);
        }
        if unit.side != self.current_side {
            return self.reject_move(MoveRejection::NotYourTurn);
        }
        if unit.has_moved {
            return self.reject_move(MoveRejection::AlreadyMoved);
        }
        let Some(terrain) = self.map.terrain(target) else {
            return self.reject_move(MoveRejection::OffMap);
        };
        if self.units.unit_at(target).is_some() {
            return self.reject_move(MoveRejection::Occupied);
        }

        let cost = self.costs.cost(unit.movement_method, terrain);
        if cost == MoveCost::Impassable {
            return self.reject_move(MoveRejection::Impassable);
        }
        if !self.reachable_hexes(id).contains(&target) {
            let rejection = match cost {
                MoveCost::Points(points) if points > unit.moves_left => {
                    MoveRejection::NotEnoughMovementPoints
                }
                _ if unit.moves_left == 0 => MoveRejection::NotEnoughMovementPoints,
                _ => MoveRejection::Unreachable,
            };
            return self.reject_move(rejection);
        }

        let from = unit.position;
        let side = unit.side;
        let path = self.find_path(id, from, target);

        let Some(unit) = self.units.get_mut(id) else {
            return Err(TacticsError::UnitNotFound(id));
        };
        set_unit_zoc(&mut self.map, unit, false);
        set_unit_spotting(&mut self.map, unit, false);
        unit.position = target;
        unit.moves_left = 0;
        unit.has_moved = true;
        set_unit_zoc(&mut self.map, unit, true);
        set_unit_spotting(&mut self.map, unit, true);

        let message = format!(
            "{} moves to ({},{})",
            Self::unit_label(unit),
            target.row,
            target.col
        );
        tracing::info!(unit = %unit.name, ?cost, row = target.row, col = target.col, "Unit moved");

        self.units.reindex();
        self.map.clear_selection_highlights();
        self.add_log_message(message);
        if self.map.capture(target, side) {
            tracing::info!(?side, row = target.row, col = target.col, "Objective captured");
            self.add_log_message(format!(
                "{} captures the objective at ({},{})",
                side.name(),
                target.row,
                target.col
            ));
        }

        Ok(MoveOutcome::Moved {
            from,
            to: target,
            path,
        })
    }

    fn reject_attack(&mut self, rejection: AttackRejection) -> Result<AttackOutcome> {
        self.add_log_message(rejection.message());
        tracing::debug!(?rejection, "Attack rejected");
        Ok(AttackOutcome::Rejected(rejection))
    }

    /// Fire at a target, rolling the hit location from the session RNG
    pub fn perform_attack(&mut self, attacker: UnitId, defender: UnitId) -> Result<AttackOutcome> {
        self.resolve_attack(attacker, defender, None)
    }

    /// Fire at a target with a fixed hit-location roll (replays, tests)
    pub fn perform_attack_with_roll(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        roll: u32,
    ) -> Result<AttackOutcome> {
        self.resolve_attack(attacker, defender, Some(roll.min(HIT_ROLL_MAX)))
    }

    fn resolve_attack(
        &mut self,
        attacker_id: UnitId,
        defender_id: UnitId,
        fixed_roll: Option<u32>,
    ) -> Result<AttackOutcome> {
        let Some(attacker) = self.units.get(attacker_id) else {
            if self.wrecks.contains_key(&attacker_id) {
                return self.reject_attack(AttackRejection::AttackerDestroyed);
            }
            return Err(TacticsError::UnitNotFound(attacker_id));
        };
        let defender_label = match self.units.get(defender_id) {
            Some(defender) => Self::unit_label(defender),
            None => self
                .wrecks
                .get(&defender_id)
                .cloned()
                .ok_or(TacticsError::UnitNotFound(defender_id))?,
        };

        if !attacker.is_alive() {
            return self.reject_attack(AttackRejection::AttackerDestroyed);
        }
        if attacker.side != self.current_side {
            return self.reject_attack(AttackRejection::NotYourTurn);
        }
        if attacker.has_fired {
            return self.reject_attack(AttackRejection::AlreadyFired);
        }

        let attacker_label = Self::unit_label(attacker);
        self.add_log_message(format!("[COMBAT] {} fires at {}", attacker_label, defender_label));

        let attacker = self
            .units
            .get(attacker_id)
            .ok_or(TacticsError::UnitNotFound(attacker_id))?;
        let Some(defender) = self.units.get(defender_id) else {
            return self.reject_attack(AttackRejection::TargetDestroyed);
        };
        if !defender.is_alive() {
            return self.reject_attack(AttackRejection::TargetDestroyed);
        }
        if defender.side == attacker.side {
            return self.reject_attack(AttackRejection::FriendlyTarget);
        }
        let distance = attacker.position.distance(&defender.position);
        if distance > attacker.weapon_range {
            return self.reject_attack(AttackRejection::OutOfRange);
        }

        let layout = HexLayout::unit();
        let attacker_point = layout.hex_to_pixel(attacker.position);
        let defender_point = layout.hex_to_pixel(defender.position);
        if !is_in_firing_cone(
            attacker_point,
            attacker.facing,
            defender_point,
            self.config.firing_arc_half_angle,
        ) {
            return self.reject_attack(AttackRejection::OutOfFiringArc);
        }

        let arc = attack_arc(attacker_point, defender_point, defender.facing);
        let damage = attacker.attack;
        let (roll, location) = match fixed_roll {
            Some(roll) => (roll, location_for_roll(arc, roll)),
            None => roll_hit_location(arc, &mut self.rng),
        };

        self.add_log_message(format!("[HIT LOCATION] Attack from {} arc", arc.name()));
        self.add_log_message(format!("[HIT LOCATION] Roll {} hits {}", roll, location.name()));

        let defender = self
            .units
            .get_mut(defender_id)
            .ok_or(TacticsError::UnitNotFound(defender_id))?;
        let report = defender.apply_damage(location, damage);
        let destroyed = !defender.is_alive();
        let health = defender.overall_health_percent();
        tracing::info!(
            attacker = %attacker_label,
            defender = %defender_label,
            ?arc,
            roll,
            location = location.name(),
            damage,
            destroyed,
            "Attack resolved"
        );
        self.log.extend(self.turn, report.log_lines());

        if destroyed {
            self.add_log_message(format!("[COMBAT RESULT] {} DESTROYED!", defender_label));
            self.remove_destroyed(defender_id);
        } else {
            self.add_log_message(format!(
                "[COMBAT RESULT] {} damaged ({}% health)",
                defender_label, health
            ));
        }
        self.add_log_message("---");

        if let Some(attacker) = self.units.get_mut(attacker_id) {
            attacker.has_fired = true;
        }
        self.update_outcome();

        Ok(AttackOutcome::Hit(AttackReport {
            attacker: attacker_id,
            defender: defender_id,
            distance,
            arc,
            roll,
            location,
            damage: report,
            defender_destroyed: destroyed,
        }))
    }

    /// Take a destroyed unit off the map and free its slot
    fn remove_destroyed(&mut self, id: UnitId) {
        if let Some(unit) = self.units.remove(id) {
            set_unit_zoc(&mut self.map, &unit, false);
            set_unit_spotting(&mut self.map, &unit, false);
            self.wrecks.insert(id, Self::unit_label(&unit));
            tracing::info!(unit = %unit.name, side = unit.side.name(), "Unit destroyed");
        }
    }

    // ===== TURNS =====

    /// Hand the turn to the other side
    pub fn end_turn(&mut self) {
        let ending = self.current_side;
        self.add_log_message(format!("{} turn ended", ending.name()));

        self.current_side = ending.opponent();
        if self.current_side == Side::Axis {
            self.turn += 1;
            self.add_log_message(format!("--- Turn {} ---", self.turn));
        }
        self.add_log_message(format!("{} turn begins", self.current_side.name()));

        let side = self.current_side;
        for (_, unit) in self.units.iter_mut() {
            if unit.side == side {
                unit.reset_for_turn();
            }
        }
        self.map.clear_selection_highlights();
        tracing::info!(turn = self.turn, side = side.name(), "Turn started");

        self.update_outcome();
    }

    fn update_outcome(&mut self) {
        if self.outcome != GameOutcome::Undecided {
            return;
        }
        let [axis_alive, allied_alive] =
            Side::all().map(|side| self.units.living(side).next().is_some());

        let outcome = match (axis_alive, allied_alive) {
            (true, false) => GameOutcome::Victory(Side::Axis),
            (false, true) => GameOutcome::Victory(Side::Allied),
            (false, false) => GameOutcome::Draw,
            (true, true) if self.turn > self.config.max_turns => GameOutcome::Draw,
            (true, true) => GameOutcome::Undecided,
        };
        if outcome != GameOutcome::Undecided {
            self.outcome = outcome;
            let message = match outcome {
                GameOutcome::Victory(side) => format!("{} wins!", side.name()),
                _ => "Game ends in a draw".to_string(),
            };
            tracing::info!(?outcome, turn = self.turn, "Game over");
            self.add_log_message(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::terrain::TerrainType;

    fn session() -> GameSession {
        let config = RulesConfig {
            seed: Some(42),
            ..RulesConfig::default()
        };
        let map = BattleMap::new(config.map_rows, config.map_cols);
        GameSession::new(config, map, MovementCostTable::dry()).unwrap()
    }

    #[test]
    fn test_deploy_rejects_occupied_and_off_map() {
        let mut game = session();
        game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(2, 2)).unwrap();
        assert!(matches!(
            game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(2, 2)),
            Err(TacticsError::InvalidAction(_))
        ));
        assert!(matches!(
            game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(40, 2)),
            Err(TacticsError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_reachable_set_flags_hexes() {
        let mut game = session();
        let id = game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(5, 5)).unwrap();
        let reachable = game.reachable_set(id);
        assert_eq!(game.map().move_selection(), reachable);
        assert!(reachable.contains(&HexCoord::new(5, 5)));

        let other = game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(0, 0)).unwrap();
        game.units.get_mut(other).unwrap().moves_left = 1;
        let small = game.reachable_set(other);
        assert_eq!(game.map().move_selection(), small);
    }

    #[test]
    fn test_move_unit_updates_index_and_flags() {
        let mut game = session();
        let id = game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(2, 2)).unwrap();
        let outcome = game.move_unit(id, HexCoord::new(2, 5)).unwrap();
        assert!(matches!(outcome, MoveOutcome::Moved { .. }));
        assert_eq!(game.unit_at(HexCoord::new(2, 5)), Some(id));
        assert_eq!(game.unit_at(HexCoord::new(2, 2)), None);

        let unit = game.unit(id).unwrap();
        assert!(unit.has_moved);
        assert_eq!(unit.moves_left, 0);
        assert_eq!(
            game.log().last().unwrap().message,
            "Light Mech (Axis) moves to (2,5)"
        );

        let again = game.move_unit(id, HexCoord::new(2, 6)).unwrap();
        assert_eq!(again, MoveOutcome::Rejected(MoveRejection::AlreadyMoved));
    }

    #[test]
    fn test_move_moves_zoc_with_unit() {
        let mut game = session();
        let id = game.deploy_unit(UnitClass::Heavy, Side::Axis, HexCoord::new(2, 2)).unwrap();
        assert!(game.map().get_hex(HexCoord::new(2, 3)).unwrap().is_zoc(Side::Axis));
        game.move_unit(id, HexCoord::new(2, 6)).unwrap();
        assert!(!game.map().get_hex(HexCoord::new(2, 3)).unwrap().is_zoc(Side::Axis));
        assert!(game.map().get_hex(HexCoord::new(2, 7)).unwrap().is_zoc(Side::Axis));
    }

    #[test]
    fn test_move_into_water_is_logged_noop() {
        let mut game = session();
        game.map_mut().set_terrain(HexCoord::new(2, 3), TerrainType::Water);
        let id = game.deploy_unit(UnitClass::Assault, Side::Axis, HexCoord::new(2, 2)).unwrap();
        let outcome = game.move_unit(id, HexCoord::new(2, 3)).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::Impassable));
        assert_eq!(game.log().last().unwrap().message, "Terrain is impassable");
        assert_eq!(game.unit(id).unwrap().position, HexCoord::new(2, 2));
        assert!(!game.unit(id).unwrap().has_moved);
    }

    #[test]
    fn test_move_too_far_rejected() {
        let mut game = session();
        let id = game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(0, 0)).unwrap();
        let outcome = game.move_unit(id, HexCoord::new(0, 12)).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(MoveRejection::Unreachable));
    }

    #[test]
    fn test_stale_handle_is_error() {
        let mut game = session();
        let bogus = UnitId::new(7, 3);
        assert!(matches!(
            game.move_unit(bogus, HexCoord::new(1, 1)),
            Err(TacticsError::UnitNotFound(_))
        ));
        assert!(game.set_facing(bogus, 90.0).is_err());
    }

    #[test]
    fn test_attack_twice_rejected() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Heavy, Side::Axis, HexCoord::new(5, 5)).unwrap();
        let d = game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(5, 7)).unwrap();
        assert!(matches!(game.perform_attack(a, d).unwrap(), AttackOutcome::Hit(_)));
        assert_eq!(
            game.perform_attack(a, d).unwrap(),
            AttackOutcome::Rejected(AttackRejection::AlreadyFired)
        );
        assert_eq!(
            game.log().last().unwrap().message,
            "Unit has already fired this turn"
        );
    }

    #[test]
    fn test_attack_out_of_range_and_arc() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Heavy, Side::Axis, HexCoord::new(5, 5)).unwrap();
        let far = game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(5, 12)).unwrap();
        let behind = game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(5, 3)).unwrap();

        assert_eq!(
            game.perform_attack(a, far).unwrap(),
            AttackOutcome::Rejected(AttackRejection::OutOfRange)
        );
        assert_eq!(
            game.perform_attack(a, behind).unwrap(),
            AttackOutcome::Rejected(AttackRejection::OutOfFiringArc)
        );
        assert!(!game.unit(a).unwrap().has_fired);
    }

    #[test]
    fn test_friendly_fire_rejected() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Heavy, Side::Axis, HexCoord::new(5, 5)).unwrap();
        let b = game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(5, 6)).unwrap();
        assert_eq!(
            game.perform_attack(a, b).unwrap(),
            AttackOutcome::Rejected(AttackRejection::FriendlyTarget)
        );
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Heavy, Side::Axis, HexCoord::new(5, 5)).unwrap();
        let d = game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(5, 7)).unwrap();
        assert_eq!(
            game.perform_attack(d, a).unwrap(),
            AttackOutcome::Rejected(AttackRejection::NotYourTurn)
        );
        assert_eq!(
            game.move_unit(d, HexCoord::new(6, 7)).unwrap(),
            MoveOutcome::Rejected(MoveRejection::NotYourTurn)
        );
    }

    #[test]
    fn test_kill_removes_unit_and_ends_game() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Assault, Side::Axis, HexCoord::new(5, 5)).unwrap();
        let d = game.deploy_unit(UnitClass::Light, Side::Allied, HexCoord::new(5, 6)).unwrap();
        game.units.get_mut(a).unwrap().attack = 500;

        let outcome = game.perform_attack_with_roll(a, d, 0).unwrap();
        let AttackOutcome::Hit(report) = outcome else {
            panic!("expected a hit");
        };
        assert!(report.defender_destroyed);
        assert_eq!(report.location, ArmorLocation::Head);
        assert!(game.unit(d).is_none());
        assert_eq!(game.unit_at(HexCoord::new(5, 6)), None);
        assert!(!game.map().get_hex(HexCoord::new(5, 5)).unwrap().is_zoc(Side::Allied));
        assert_eq!(game.outcome(), GameOutcome::Victory(Side::Axis));
        assert!(game.is_game_over());
    }

    #[test]
    fn test_end_turn_cycle() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(1, 1)).unwrap();
        game.deploy_unit(UnitClass::Light, Side::Allied, HexCoord::new(9, 9)).unwrap();
        game.move_unit(a, HexCoord::new(1, 2)).unwrap();

        game.end_turn();
        assert_eq!(game.current_side(), Side::Allied);
        assert_eq!(game.turn(), 1);
        // Axis flags persist until Axis's next turn
        assert!(game.unit(a).unwrap().has_moved);

        game.end_turn();
        assert_eq!(game.current_side(), Side::Axis);
        assert_eq!(game.turn(), 2);
        assert!(!game.unit(a).unwrap().has_moved);
        assert_eq!(game.unit(a).unwrap().moves_left, 6);

        let tail: Vec<&str> = game
            .log()
            .messages()
            .iter()
            .rev()
            .take(3)
            .map(|m| m.message.as_str())
            .collect();
        assert_eq!(tail, vec!["Axis turn begins", "--- Turn 2 ---", "Allied turn ended"]);
    }

    #[test]
    fn test_turn_limit_draw() {
        let config = RulesConfig {
            seed: Some(1),
            max_turns: 1,
            ..RulesConfig::default()
        };
        let map = BattleMap::new(6, 6);
        let mut game = GameSession::new(config, map, MovementCostTable::dry()).unwrap();
        game.deploy_unit(UnitClass::Light, Side::Axis, HexCoord::new(0, 0)).unwrap();
        game.deploy_unit(UnitClass::Light, Side::Allied, HexCoord::new(5, 5)).unwrap();
        game.end_turn();
        assert!(!game.is_game_over());
        game.end_turn();
        assert_eq!(game.outcome(), GameOutcome::Draw);
    }

    #[test]
    fn test_highlight_attack_range() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Heavy, Side::Axis, HexCoord::new(5, 5)).unwrap();
        let d = game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(5, 7)).unwrap();
        game.deploy_unit(UnitClass::Heavy, Side::Allied, HexCoord::new(5, 2)).unwrap();

        assert_eq!(game.highlight_attack_range(a), vec![d]);
        let flagged: Vec<HexCoord> = game
            .map()
            .hexes()
            .filter(|h| h.is_attack_sel)
            .map(|h| h.coord)
            .collect();
        assert_eq!(flagged, vec![HexCoord::new(5, 7)]);
    }

    #[test]
    fn test_face_toward_rotates() {
        let mut game = session();
        let a = game.deploy_unit(UnitClass::Heavy, Side::Axis, HexCoord::new(5, 5)).unwrap();
        game.face_toward(a, HexCoord::new(5, 2)).unwrap();
        assert!((game.unit(a).unwrap().facing - 180.0).abs() < 1e-9);
        game.set_facing(a, -30.0).unwrap();
        assert!((game.unit(a).unwrap().facing - 330.0).abs() < 1e-9);
    }
}
