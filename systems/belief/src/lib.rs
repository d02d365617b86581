#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent-private belief map tracking what the agent has sensed or deduced.
//!
//! The belief map shares the grid abstraction with the authoritative cave
//! but is an independent instance: every square starts `Unknown` and only
//! [`BeliefMap::sense`] lets world perception data in, which keeps the
//! partial-observability contract explicit. The map never stores hazard
//! counts; the agent does not know how many hazards remain.

use cave_quest_core::{GridPos, Perceptions, SquareStatus};
use cave_quest_world::{GridError, SquareGrid};

/// The agent's partially-filled private copy of the cave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeliefMap {
    grid: SquareGrid,
}

impl BeliefMap {
    /// Creates a belief map of the given side with every square `Unknown`,
    /// unvisited, and without perceptions.
    pub fn new(side: u8) -> Result<Self, GridError> {
        Ok(Self {
            grid: SquareGrid::with_side(side, SquareStatus::Unknown)?,
        })
    }

    /// Read-only view of the believed grid.
    #[must_use]
    pub const fn grid(&self) -> &SquareGrid {
        &self.grid
    }

    /// Records the perception set sensed at a square and marks it visited.
    /// This is the only path by which world perception data enters the
    /// belief map.
    pub fn sense(&mut self, position: GridPos, perceptions: Perceptions) {
        if let Some(square) = self.grid.get_mut(position) {
            square.set_visited(true);
            square.set_perceptions(Some(perceptions));
        }
    }

    /// Overwrites the believed status of a square. Out-of-bounds positions
    /// are ignored.
    pub fn set_status(&mut self, position: GridPos, status: SquareStatus) {
        if let Some(square) = self.grid.get_mut(position) {
            square.set_status(status);
        }
    }

    /// Clears the believed treasure flag of a square.
    pub fn clear_treasure(&mut self, position: GridPos) {
        if let Some(square) = self.grid.get_mut(position) {
            square.set_treasure(false);
        }
    }

    /// Re-derives the perception sets of the neighbors of `position` from
    /// the believed statuses, after a believed status change there.
    pub fn recompute_neighbor_perceptions(&mut self, position: GridPos) {
        self.grid.recompute_neighbor_perceptions(position);
    }
}
