//! Shared square-grid abstraction backing both the authoritative cave and
//! the agent's belief map.

use cave_quest_core::{ambient_cue, Direction, GridPos, Perceptions, SquareStatus, MAX_SIDE, MIN_SIDE};
use thiserror::Error;

/// Errors raised by grid construction and the checked square accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested side length falls outside the supported range.
    #[error("cave side {side} is outside the supported range {MIN_SIDE}..={MAX_SIDE}")]
    InvalidSide {
        /// Side length that was requested.
        side: u8,
    },
    /// The requested square lies outside the configured grid.
    #[error("square ({row}, {column}) is outside the {side}x{side} grid")]
    OutOfBounds {
        /// Row index that was requested.
        row: u8,
        /// Column index that was requested.
        column: u8,
        /// Side length of the grid that rejected the access.
        side: u8,
    },
}

/// A single cave square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    status: SquareStatus,
    perceptions: Option<Perceptions>,
    visited: bool,
    treasure: bool,
}

impl Square {
    const fn with_status(status: SquareStatus) -> Self {
        Self {
            status,
            perceptions: None,
            visited: false,
            treasure: false,
        }
    }

    /// Status currently carried by the square.
    #[must_use]
    pub const fn status(&self) -> SquareStatus {
        self.status
    }

    /// Overwrites the square's status. Hazard counts are bookkept by the
    /// caller; a raw status write never touches them.
    pub fn set_status(&mut self, status: SquareStatus) {
        self.status = status;
    }

    /// Ambient cues last computed for the square, or `None` if perceptions
    /// were never computed here.
    #[must_use]
    pub const fn perceptions(&self) -> Option<Perceptions> {
        self.perceptions
    }

    /// Stores a perception set. Perceptions are derived state; callers other
    /// than the recompute routines should only feed sets copied from the
    /// authoritative grid.
    pub fn set_perceptions(&mut self, perceptions: Option<Perceptions>) {
        self.perceptions = perceptions;
    }

    /// Whether the agent has stood on this square.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.visited
    }

    /// Marks or clears the visited flag.
    pub fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    /// Whether the treasure rests on this square. The flag survives status
    /// overwrites, so the square still yields the treasure after the agent's
    /// `Player` status replaces `Treasure`.
    #[must_use]
    pub const fn has_treasure(&self) -> bool {
        self.treasure
    }

    /// Sets or clears the treasure flag.
    pub fn set_treasure(&mut self, treasure: bool) {
        self.treasure = treasure;
    }
}

/// Dense row-major grid of [`Square`] values.
///
/// The cave and the belief map are two independent instances of this type;
/// they never alias, which keeps ground truth and belief cleanly separated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareGrid {
    side: u8,
    squares: Vec<Square>,
}

impl SquareGrid {
    /// Allocates a `side * side` grid with every square carrying the
    /// provided initial status.
    pub fn with_side(side: u8, initial_status: SquareStatus) -> Result<Self, GridError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(GridError::InvalidSide { side });
        }

        let capacity = usize::from(side) * usize::from(side);
        Ok(Self {
            side,
            squares: vec![Square::with_status(initial_status); capacity],
        })
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn side(&self) -> u8 {
        self.side
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, position: GridPos) -> bool {
        position.row() < self.side && position.column() < self.side
    }

    /// Checked access to a square; callers are expected to prevent the
    /// error with [`SquareGrid::in_bounds`] rather than recover from it.
    pub fn square(&self, position: GridPos) -> Result<&Square, GridError> {
        self.index(position)
            .map(|index| &self.squares[index])
            .ok_or(GridError::OutOfBounds {
                row: position.row(),
                column: position.column(),
                side: self.side,
            })
    }

    /// Checked mutable access to a square.
    pub fn square_mut(&mut self, position: GridPos) -> Result<&mut Square, GridError> {
        let side = self.side;
        self.index(position)
            .map(|index| &mut self.squares[index])
            .ok_or(GridError::OutOfBounds {
                row: position.row(),
                column: position.column(),
                side,
            })
    }

    /// Total lookup returning `None` outside the grid.
    #[must_use]
    pub fn get(&self, position: GridPos) -> Option<&Square> {
        self.index(position).map(|index| &self.squares[index])
    }

    /// Total mutable lookup returning `None` outside the grid.
    pub fn get_mut(&mut self, position: GridPos) -> Option<&mut Square> {
        self.index(position).map(move |index| &mut self.squares[index])
    }

    fn index(&self, position: GridPos) -> Option<usize> {
        if self.in_bounds(position) {
            Some(usize::from(position.row()) * usize::from(self.side) + usize::from(position.column()))
        } else {
            None
        }
    }

    /// Position one step in the given direction, if it stays in bounds.
    #[must_use]
    pub fn neighbor(&self, position: GridPos, direction: Direction) -> Option<GridPos> {
        position
            .offset(direction)
            .filter(|next| self.in_bounds(*next))
    }

    /// In-bounds orthogonal neighbors in canonical direction order; slots of
    /// out-of-bounds directions hold `None`.
    #[must_use]
    pub fn neighbors(&self, position: GridPos) -> [Option<GridPos>; 4] {
        let mut neighbors = [None; 4];
        for (slot, direction) in neighbors.iter_mut().zip(Direction::ALL) {
            *slot = self.neighbor(position, direction);
        }
        neighbors
    }

    /// Iterator over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let side = self.side;
        (0..side).flat_map(move |row| (0..side).map(move |column| GridPos::new(row, column)))
    }

    /// Computes the cue set a square would observe from the current statuses
    /// of its in-bounds orthogonal neighbors.
    #[must_use]
    pub fn perceived_from_neighbors(&self, position: GridPos) -> Perceptions {
        let mut perceptions = Perceptions::new();
        for neighbor in self.neighbors(position).into_iter().flatten() {
            if let Some(square) = self.get(neighbor) {
                if let Some(cue) = ambient_cue(square.status()) {
                    perceptions.set(cue, true);
                }
            }
        }
        perceptions
    }

    /// Recomputes and overwrites the stored perception set of one square.
    /// The previous set is replaced, never merged into.
    pub fn recompute_perceptions(&mut self, position: GridPos) {
        let perceptions = self.perceived_from_neighbors(position);
        if let Some(square) = self.get_mut(position) {
            square.set_perceptions(Some(perceptions));
        }
    }

    /// Recomputes the perception sets of every in-bounds orthogonal
    /// neighbor, after a status change at `position` altered what they
    /// perceive.
    pub fn recompute_neighbor_perceptions(&mut self, position: GridPos) {
        for neighbor in self.neighbors(position).into_iter().flatten() {
            self.recompute_perceptions(neighbor);
        }
    }

    /// Recomputes every square's perception set from the current statuses.
    /// Called once when editing freezes and exploration begins.
    pub fn recompute_all_perceptions(&mut self) {
        let positions: Vec<GridPos> = self.positions().collect();
        for position in positions {
            self.recompute_perceptions(position);
        }
    }
}
