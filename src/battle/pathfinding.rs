//! Movement range and pathfinding over the hex grid
//!
//! Both queries share one search: a best-first expansion keyed on movement
//! points remaining. A hex is re-queued only when a new route reaches it
//! with strictly more points left than any earlier route, so a cheaper
//! detour found late still opens up the hexes beyond it.
//!
//! Rules applied at every step:
//! - `Impassable` terrain is never entered.
//! - `Stop` terrain can be entered with any points left; the unit has none
//!   afterwards.
//! - Hexes holding another unit are blocked, except an enemy on the goal of
//!   `find_path`.
//! - A unit starting in enemy ZOC moves at most one hex and stops there.
//! - Entering enemy ZOC costs the terrain plus `zoc_entry_penalty`.
//! - ZOC-immune units skip both ZOC rules.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::HexCoord;
use crate::battle::terrain::{MoveCost, MovementCostTable};
use crate::battle::units::{Unit, UnitRoster};
use crate::core::types::UnitId;

/// Everything a movement query reads
#[derive(Debug, Clone, Copy)]
pub struct PathContext<'a> {
    pub map: &'a BattleMap,
    pub units: &'a UnitRoster,
    pub costs: &'a MovementCostTable,
    pub zoc_entry_penalty: u32,
}

/// Node in the open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchNode {
    coord: HexCoord,
    remaining: u32,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on remaining points; coordinate order keeps ties stable
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best known remaining points per hex, and the hex each was reached from
#[derive(Debug, Default)]
struct Search {
    best: AHashMap<HexCoord, u32>,
    came_from: AHashMap<HexCoord, HexCoord>,
}

impl<'a> PathContext<'a> {
    pub fn new(
        map: &'a BattleMap,
        units: &'a UnitRoster,
        costs: &'a MovementCostTable,
        zoc_entry_penalty: u32,
    ) -> Self {
        Self {
            map,
            units,
            costs,
            zoc_entry_penalty,
        }
    }

    /// Is the mover standing in enemy ZOC (and bound by it)?
    pub fn starts_in_enemy_zoc(&self, mover: &Unit, start: HexCoord) -> bool {
        if mover.is_zoc_immune() {
            return false;
        }
        self.map
            .get_hex(start)
            .is_some_and(|hex| hex.is_zoc(mover.side.opponent()))
    }

    /// Points left after stepping into `to` with `remaining` points, or None
    /// if the step is not allowed
    fn step(&self, mover: &Unit, remaining: u32, to: HexCoord, forced_stop: bool) -> Option<u32> {
        let hex = self.map.get_hex(to)?;
        let left = match self.costs.cost(mover.movement_method, hex.terrain) {
            MoveCost::Impassable => return None,
            MoveCost::Stop => {
                if remaining == 0 {
                    return None;
                }
                0
            }
            MoveCost::Points(points) => {
                if points > remaining {
                    return None;
                }
                let mut left = remaining - points;
                if !mover.is_zoc_immune() && hex.is_zoc(mover.side.opponent()) {
                    left = left.saturating_sub(self.zoc_entry_penalty);
                }
                left
            }
        };
        Some(if forced_stop { 0 } else { left })
    }

    fn explore(&self, mover_id: UnitId, mover: &Unit, start: HexCoord, goal: Option<HexCoord>) -> Search {
        let mut search = Search::default();
        if !self.map.in_bounds(start) {
            return search;
        }

        let forced_stop = self.starts_in_enemy_zoc(mover, start);
        let enemy = mover.side.opponent();

        let mut open_set = BinaryHeap::new();
        search.best.insert(start, mover.moves_left);
        open_set.push(SearchNode {
            coord: start,
            remaining: mover.moves_left,
        });

        while let Some(current) = open_set.pop() {
            // Stale entry: a better route to this hex was queued later
            if search.best.get(&current.coord).copied() != Some(current.remaining) {
                continue;
            }
            if current.remaining == 0 {
                continue;
            }
            if forced_stop && current.coord != start {
                continue;
            }
            if Some(current.coord) == goal && current.coord != start {
                continue;
            }

            for neighbor in self.map.adjacent(current.coord) {
                if neighbor == start {
                    continue;
                }

                if let Some(occupant) = self.units.unit_at(neighbor) {
                    let enemy_goal = Some(neighbor) == goal
                        && occupant != mover_id
                        && self.units.get(occupant).is_some_and(|u| u.side == enemy);
                    if occupant != mover_id && !enemy_goal {
                        continue;
                    }
                }

                let Some(left) = self.step(mover, current.remaining, neighbor, forced_stop) else {
                    continue;
                };

                let improved = search
                    .best
                    .get(&neighbor)
                    .map_or(true, |&best| left > best);
                if improved {
                    search.best.insert(neighbor, left);
                    search.came_from.insert(neighbor, current.coord);
                    open_set.push(SearchNode {
                        coord: neighbor,
                        remaining: left,
                    });
                }
            }
        }

        search
    }

    /// Hexes the unit can reach this turn, including its own, sorted
    pub fn reachable_set(&self, mover_id: UnitId) -> Vec<HexCoord> {
        let Some(mover) = self.units.get(mover_id) else {
            return Vec::new();
        };
        if !mover.is_alive() {
            return Vec::new();
        }

        let search = self.explore(mover_id, mover, mover.position, None);
        let mut reachable: Vec<HexCoord> = search.best.into_keys().collect();
        reachable.sort();
        reachable
    }

    /// Route from `start` to `goal`, both ends included. Empty if unreachable.
    pub fn find_path(&self, mover_id: UnitId, start: HexCoord, goal: HexCoord) -> Vec<HexCoord> {
        let Some(mover) = self.units.get(mover_id) else {
            return Vec::new();
        };
        if !self.map.in_bounds(start) || !self.map.in_bounds(goal) {
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }

        let search = self.explore(mover_id, mover, start, Some(goal));
        if !search.best.contains_key(&goal) {
            return Vec::new();
        }
        reconstruct_path(&search.came_from, goal)
    }

    /// Terrain points spent along a path, not counting the first hex.
    ///
    /// `Stop` steps count as zero; None if the path crosses impassable
    /// terrain or leaves the map.
    pub fn path_cost(&self, mover: &Unit, path: &[HexCoord]) -> Option<u32> {
        let mut total = 0;
        for coord in path.iter().skip(1) {
            let terrain = self.map.terrain(*coord)?;
            match self.costs.cost(mover.movement_method, terrain) {
                MoveCost::Points(points) => total += points,
                MoveCost::Stop => {}
                MoveCost::Impassable => return None,
            }
        }
        Some(total)
    }
}

/// Reconstruct path from came_from map
fn reconstruct_path(came_from: &AHashMap<HexCoord, HexCoord>, mut current: HexCoord) -> Vec<HexCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
