#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative cave state management for Cave Quest.
//!
//! The [`World`] owns the ground-truth grid the editor shapes before
//! exploration and the agent mutates during it. Editing flows through
//! [`apply`] with guarded [`Command`] values; the agent uses the raw
//! mutators directly, keeping hazard counts consistent through the explicit
//! adjustment calls.

mod grid;

pub use grid::{GridError, Square, SquareGrid};

use cave_quest_core::{
    Command, Event, GridPos, PlacementError, SquareStatus, MAX_MONSTERS, MAX_TREASURES, MIN_SIDE,
    WELCOME_BANNER,
};

/// Represents the authoritative cave state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    grid: SquareGrid,
    monsters: u8,
    treasures: u8,
    agents: u8,
    started: bool,
}

impl World {
    /// Creates a cave of the minimum supported side, ready for editing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_side(MIN_SIDE).expect("minimum side is always valid")
    }

    /// Creates a cave with the provided side length, all squares clean.
    pub fn with_side(side: u8) -> Result<Self, GridError> {
        Ok(Self {
            banner: WELCOME_BANNER,
            grid: SquareGrid::with_side(side, SquareStatus::Clean)?,
            monsters: 0,
            treasures: 0,
            agents: 0,
            started: false,
        })
    }

    /// Read-only access to the ground-truth grid.
    #[must_use]
    pub const fn grid(&self) -> &SquareGrid {
        &self.grid
    }

    /// The bottom-left square reserved for the agent's entry.
    #[must_use]
    pub const fn start_square(&self) -> GridPos {
        GridPos::new(self.grid.side() - 1, 0)
    }

    /// Overwrites a square's status without touching hazard counts; count
    /// adjustment is a separate explicit operation, mirroring the editing
    /// semantics. Out-of-bounds positions are ignored.
    pub fn set_status(&mut self, position: GridPos, status: SquareStatus) {
        if let Some(square) = self.grid.get_mut(position) {
            square.set_status(status);
        }
    }

    /// Clears the treasure flag of a square.
    pub fn clear_treasure(&mut self, position: GridPos) {
        if let Some(square) = self.grid.get_mut(position) {
            square.set_treasure(false);
        }
    }

    /// Marks a square as visited by the agent.
    pub fn mark_visited(&mut self, position: GridPos) {
        if let Some(square) = self.grid.get_mut(position) {
            square.set_visited(true);
        }
    }

    /// Number of monsters currently bookkept in the cave.
    #[must_use]
    pub const fn monster_count(&self) -> u8 {
        self.monsters
    }

    /// Number of treasures currently bookkept in the cave.
    #[must_use]
    pub const fn treasure_count(&self) -> u8 {
        self.treasures
    }

    /// Number of agents currently bookkept in the cave.
    #[must_use]
    pub const fn agent_count(&self) -> u8 {
        self.agents
    }

    /// Adjusts the monster count by the provided delta.
    pub fn adjust_monsters(&mut self, delta: i8) {
        self.monsters = self.monsters.saturating_add_signed(delta);
    }

    /// Adjusts the treasure count by the provided delta.
    pub fn adjust_treasures(&mut self, delta: i8) {
        self.treasures = self.treasures.saturating_add_signed(delta);
    }

    /// Adjusts the agent count by the provided delta.
    pub fn adjust_agents(&mut self, delta: i8) {
        self.agents = self.agents.saturating_add_signed(delta);
    }

    /// Whether editing froze and exploration began.
    #[must_use]
    pub const fn exploration_started(&self) -> bool {
        self.started
    }

    /// Recomputes the perception sets of every neighbor of `position`.
    pub fn recompute_neighbor_perceptions(&mut self, position: GridPos) {
        self.grid.recompute_neighbor_perceptions(position);
    }

    fn configure(&mut self, side: u8) -> Result<(), GridError> {
        self.grid = SquareGrid::with_side(side, SquareStatus::Clean)?;
        self.monsters = 0;
        self.treasures = 0;
        self.agents = 0;
        self.started = false;
        Ok(())
    }

    fn place_item(
        &mut self,
        position: GridPos,
        status: SquareStatus,
    ) -> Result<Option<Event>, PlacementError> {
        if self.started {
            return Err(PlacementError::Frozen);
        }
        if !matches!(
            status,
            SquareStatus::Monster | SquareStatus::Hole | SquareStatus::Treasure | SquareStatus::Clean
        ) {
            return Err(PlacementError::UnsupportedItem);
        }

        let current = self
            .grid
            .square(position)
            .map_err(|_| PlacementError::OutOfBounds)?
            .status();
        if position == self.start_square() {
            return Err(PlacementError::ReservedSquare);
        }
        if current == status {
            return Ok(None);
        }
        if status == SquareStatus::Monster && self.monsters >= MAX_MONSTERS {
            return Err(PlacementError::MonsterLimit);
        }
        if status == SquareStatus::Treasure && self.treasures >= MAX_TREASURES {
            return Err(PlacementError::TreasureLimit);
        }

        match current {
            SquareStatus::Monster => self.adjust_monsters(-1),
            SquareStatus::Treasure => self.adjust_treasures(-1),
            _ => {}
        }
        match status {
            SquareStatus::Monster => self.adjust_monsters(1),
            SquareStatus::Treasure => self.adjust_treasures(1),
            _ => {}
        }

        if let Some(square) = self.grid.get_mut(position) {
            square.set_status(status);
            square.set_treasure(status == SquareStatus::Treasure);
        }

        Ok(Some(Event::ItemPlaced { position, status }))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state
/// deterministically and reporting outcomes through events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { side } => match world.configure(side) {
            Ok(()) => out_events.push(Event::GridConfigured { side }),
            Err(_) => out_events.push(Event::ConfigurationRejected { side }),
        },
        Command::PlaceItem { position, status } => match world.place_item(position, status) {
            Ok(Some(event)) => out_events.push(event),
            Ok(None) => {}
            Err(reason) => out_events.push(Event::PlacementRejected {
                position,
                status,
                reason,
            }),
        },
        Command::StartExploration => {
            world.started = true;
            world.grid.recompute_all_perceptions();
            out_events.push(Event::ExplorationStarted);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use cave_quest_core::{GridPos, Perceptions, SquareStatus};

    /// Retrieves the welcome banner adapters may display.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Side length of the configured cave.
    #[must_use]
    pub fn side(world: &World) -> u8 {
        world.grid().side()
    }

    /// Square reserved for the agent's entry.
    #[must_use]
    pub fn start_square(world: &World) -> GridPos {
        world.start_square()
    }

    /// Number of monsters currently bookkept in the cave.
    #[must_use]
    pub fn monster_count(world: &World) -> u8 {
        world.monster_count()
    }

    /// Number of treasures currently bookkept in the cave.
    #[must_use]
    pub fn treasure_count(world: &World) -> u8 {
        world.treasure_count()
    }

    /// Number of agents currently bookkept in the cave.
    #[must_use]
    pub fn agent_count(world: &World) -> u8 {
        world.agent_count()
    }

    /// Captures a read-only snapshot of one square, if it is in bounds.
    #[must_use]
    pub fn square_snapshot(world: &World, position: GridPos) -> Option<SquareSnapshot> {
        world.grid().get(position).map(|square| SquareSnapshot {
            position,
            status: square.status(),
            perceptions: square.perceptions(),
            visited: square.visited(),
            treasure: square.has_treasure(),
        })
    }

    /// Captures a read-only snapshot of the entire ground-truth grid in
    /// row-major order, for rendering and debugging views.
    #[must_use]
    pub fn grid_snapshot(world: &World) -> GridSnapshot {
        let squares = world
            .grid()
            .positions()
            .filter_map(|position| square_snapshot(world, position))
            .collect();
        GridSnapshot {
            side: world.grid().side(),
            squares,
        }
    }

    /// Immutable representation of a single square used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SquareSnapshot {
        /// Location of the captured square.
        pub position: GridPos,
        /// Status carried by the square.
        pub status: SquareStatus,
        /// Ambient cues last computed for the square.
        pub perceptions: Option<Perceptions>,
        /// Whether the agent has stood on the square.
        pub visited: bool,
        /// Whether the treasure rests on the square.
        pub treasure: bool,
    }

    /// Read-only snapshot of the full grid.
    #[derive(Clone, Debug)]
    pub struct GridSnapshot {
        side: u8,
        squares: Vec<SquareSnapshot>,
    }

    impl GridSnapshot {
        /// Side length of the captured grid.
        #[must_use]
        pub const fn side(&self) -> u8 {
            self.side
        }

        /// Iterator over the captured squares in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = &SquareSnapshot> {
            self.squares.iter()
        }
    }
}
