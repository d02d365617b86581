#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cave Quest engine.
//!
//! This crate defines the vocabulary that connects the editor-facing driver,
//! the authoritative world, and the agent systems. The driver submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and engine components broadcast
//! [`Event`] values the driver renders. Everything here is plain data; the
//! perception physics and inference rules live in the world and system
//! crates.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cave Quest.";

/// Smallest cave side length the engine accepts.
pub const MIN_SIDE: u8 = 4;

/// Largest cave side length the engine accepts.
pub const MAX_SIDE: u8 = 16;

/// Maximum number of monsters an editor may place in the cave.
pub const MAX_MONSTERS: u8 = 1;

/// Maximum number of treasures an editor may place in the cave.
pub const MAX_TREASURES: u8 = 1;

/// Location of a single cave square expressed as row and column indices.
///
/// Row zero is the northern edge; the agent starts at the bottom-left square
/// `(side - 1, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    row: u8,
    column: u8,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the square.
    #[must_use]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// Zero-based column index of the square.
    #[must_use]
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// Returns the position one step in the provided direction, if it does
    /// not underflow the grid origin. Upper-bound checks are the grid's job.
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<GridPos> {
        let (row_delta, column_delta) = direction.delta();
        let row = self.row.checked_add_signed(row_delta)?;
        let column = self.column.checked_add_signed(column_delta)?;
        Some(Self { row, column })
    }
}

/// Cardinal directions the agent can face, scan, and move along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in canonical scan order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Row and column deltas of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

/// Status carried by every cave square. Exactly one status at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareStatus {
    /// A monster occupies the square.
    Monster,
    /// A bottomless hole occupies the square.
    Hole,
    /// The treasure rests on the square.
    Treasure,
    /// The agent currently stands on the square.
    Player,
    /// Nothing occupies the square.
    Clean,
    /// The agent has not determined what occupies the square.
    Unknown,
}

/// Cues a square can emit or signal.
///
/// `Stench`, `Breeze` and `Radiance` are ambient cues recomputed from
/// neighboring statuses and stored in [`Perceptions`] sets. `Bang` and
/// `Groan` are transient shot signals reported only through
/// [`ShotOutcome`], never stored on squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerceptionType {
    /// A monster occupies an orthogonal neighbor.
    Stench,
    /// A hole occupies an orthogonal neighbor.
    Breeze,
    /// The treasure rests on an orthogonal neighbor.
    Radiance,
    /// An arrow struck the boundary wall.
    Bang,
    /// A monster died to an arrow.
    Groan,
}

/// Ambient cues in the order inference rules examine them.
pub const AMBIENT_CUES: [PerceptionType; 3] = [
    PerceptionType::Stench,
    PerceptionType::Breeze,
    PerceptionType::Radiance,
];

/// Maps a square status to the ambient cue it emits to its neighbors.
#[must_use]
pub const fn ambient_cue(status: SquareStatus) -> Option<PerceptionType> {
    match status {
        SquareStatus::Monster => Some(PerceptionType::Stench),
        SquareStatus::Hole => Some(PerceptionType::Breeze),
        SquareStatus::Treasure => Some(PerceptionType::Radiance),
        SquareStatus::Player | SquareStatus::Clean | SquareStatus::Unknown => None,
    }
}

/// Maps an ambient cue back to the status that emits it.
#[must_use]
pub const fn cue_source(cue: PerceptionType) -> Option<SquareStatus> {
    match cue {
        PerceptionType::Stench => Some(SquareStatus::Monster),
        PerceptionType::Breeze => Some(SquareStatus::Hole),
        PerceptionType::Radiance => Some(SquareStatus::Treasure),
        PerceptionType::Bang | PerceptionType::Groan => None,
    }
}

/// Set of ambient cues observed at a square.
///
/// An empty set is a meaningful observation: it proves no hazard occupies
/// any in-bounds orthogonal neighbor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perceptions {
    stench: bool,
    breeze: bool,
    radiance: bool,
}

impl Perceptions {
    /// Creates an empty cue set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stench: false,
            breeze: false,
            radiance: false,
        }
    }

    /// Reports whether the given cue is present. Transient cue types are
    /// never stored and always read as absent.
    #[must_use]
    pub const fn has(&self, cue: PerceptionType) -> bool {
        match cue {
            PerceptionType::Stench => self.stench,
            PerceptionType::Breeze => self.breeze,
            PerceptionType::Radiance => self.radiance,
            PerceptionType::Bang | PerceptionType::Groan => false,
        }
    }

    /// Sets or clears the given ambient cue. Transient cue types are
    /// ignored; they travel through [`ShotOutcome`] instead.
    pub fn set(&mut self, cue: PerceptionType, present: bool) {
        match cue {
            PerceptionType::Stench => self.stench = present,
            PerceptionType::Breeze => self.breeze = present,
            PerceptionType::Radiance => self.radiance = present,
            PerceptionType::Bang | PerceptionType::Groan => {}
        }
    }

    /// Reports whether no ambient cue is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.stench && !self.breeze && !self.radiance
    }
}

/// Actions the decision policy can select for a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Step one square in the given direction.
    Move(Direction),
    /// Fire an arrow along the given direction.
    Shoot(Direction),
    /// Pick up the treasure on the current square.
    Take,
    /// Exit the cave from the starting square.
    Leave,
    /// Stall for this tick; no branch of the policy applied.
    Wait,
}

/// Lifecycle phase of the exploring agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentPhase {
    /// Searching for the treasure.
    Exploring,
    /// Carrying the treasure back to the start.
    TreasureHeld,
    /// Left the cave; terminal.
    Finished,
}

/// Immutable view of the agent state consumed by the decision policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Square the agent currently occupies.
    pub position: GridPos,
    /// Reserved square the agent entered the cave from.
    pub start: GridPos,
    /// Arrows remaining in the quiver.
    pub arrows: u32,
    /// Whether the treasure has been collected.
    pub treasure_found: bool,
    /// Whether the agent has exited the cave.
    pub left_cave: bool,
}

/// Result of firing an arrow, named after the transient cue it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotOutcome {
    /// The arrow killed the monster on the given square.
    Groan {
        /// Square the slain monster occupied.
        monster: GridPos,
    },
    /// The arrow crossed the cave and struck the boundary wall.
    Bang,
}

/// Reasons an editing request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested square lies outside the configured grid.
    OutOfBounds,
    /// The bottom-left square is reserved for the agent's start.
    ReservedSquare,
    /// The cave already holds the maximum number of monsters.
    MonsterLimit,
    /// The cave already holds the maximum number of treasures.
    TreasureLimit,
    /// The status is not part of the editing palette.
    UnsupportedItem,
    /// Editing is frozen because exploration has started.
    Frozen,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reinitializes the cave with the provided side length.
    ConfigureGrid {
        /// Number of rows and columns of the square grid.
        side: u8,
    },
    /// Places an item from the editing palette on a square.
    PlaceItem {
        /// Square targeted by the edit.
        position: GridPos,
        /// Status to write; `Clean` removes whatever was there.
        status: SquareStatus,
    },
    /// Freezes editing and computes every square's perceptions.
    StartExploration,
}

/// Events broadcast by the world and the agent after processing a command
/// or a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms the grid was reinitialized with a new side length.
    GridConfigured {
        /// Side length now in effect.
        side: u8,
    },
    /// Reports that a grid configuration request was rejected.
    ConfigurationRejected {
        /// Side length that was requested.
        side: u8,
    },
    /// Confirms an item was placed on a square.
    ItemPlaced {
        /// Square that was edited.
        position: GridPos,
        /// Status now carried by the square.
        status: SquareStatus,
    },
    /// Reports that an editing request was rejected.
    PlacementRejected {
        /// Square targeted by the rejected edit.
        position: GridPos,
        /// Status the edit attempted to write.
        status: SquareStatus,
        /// Specific reason the edit failed.
        reason: PlacementError,
    },
    /// Announces that editing froze and perceptions were computed.
    ExplorationStarted,
    /// Confirms the agent stepped between two squares.
    AgentMoved {
        /// Square the agent occupied before the step.
        from: GridPos,
        /// Square the agent occupies after the step.
        to: GridPos,
    },
    /// Reports an arrow shot and its transient signal.
    ArrowFired {
        /// Direction the arrow traveled.
        direction: Direction,
        /// Signal produced by the shot.
        outcome: ShotOutcome,
    },
    /// Confirms the agent collected the treasure.
    TreasureTaken {
        /// Square the treasure rested on.
        position: GridPos,
    },
    /// Confirms the agent exited the cave from the starting square.
    CaveLeft {
        /// Square the agent exited from.
        position: GridPos,
    },
    /// Reports that no policy branch applied this tick.
    AgentStalled {
        /// Square the agent idled on.
        position: GridPos,
    },
}
