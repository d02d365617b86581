use std::fmt::Write as _;

use cave_quest_core::{Direction, Event, GridPos, PlacementError, ShotOutcome, SquareStatus};
use cave_quest_world::{query, SquareGrid, World};

/// Renders the authoritative cave, one glyph per square.
pub(crate) fn ground_view(world: &World) -> String {
    let snapshot = query::grid_snapshot(world);
    let mut rows = vec![vec!['?'; usize::from(snapshot.side())]; usize::from(snapshot.side())];
    for square in snapshot.iter() {
        rows[usize::from(square.position.row())][usize::from(square.position.column())] =
            square_glyph(square.status, square.treasure);
    }
    draw(&rows)
}

/// Renders a belief grid, one glyph per square.
pub(crate) fn belief_view(grid: &SquareGrid) -> String {
    let mut rows = vec![vec!['?'; usize::from(grid.side())]; usize::from(grid.side())];
    for position in grid.positions() {
        if let Some(square) = grid.get(position) {
            rows[usize::from(position.row())][usize::from(position.column())] =
                square_glyph(square.status(), square.has_treasure());
        }
    }
    draw(&rows)
}

fn draw(rows: &[Vec<char>]) -> String {
    let mut out = String::new();
    out.push_str("   ");
    for column in 0..rows.len() {
        write!(out, " {column:2}").expect("writing to a string never fails");
    }
    out.push('\n');
    for (row, glyphs) in rows.iter().enumerate() {
        write!(out, "{row:3}").expect("writing to a string never fails");
        for glyph in glyphs {
            write!(out, "  {glyph}").expect("writing to a string never fails");
        }
        out.push('\n');
    }
    out
}

fn square_glyph(status: SquareStatus, treasure: bool) -> char {
    match status {
        SquareStatus::Monster => 'M',
        SquareStatus::Hole => 'H',
        SquareStatus::Treasure => 'T',
        SquareStatus::Player => 'A',
        // The treasure flag survives status overwrites.
        SquareStatus::Clean if treasure => 'T',
        SquareStatus::Clean => '.',
        SquareStatus::Unknown => '?',
    }
}

/// One human-readable line per engine event.
pub(crate) fn describe_event(event: &Event) -> String {
    match event {
        Event::GridConfigured { side } => {
            format!("cave configured with side {side}")
        }
        Event::ConfigurationRejected { side } => {
            format!("cave side {side} was rejected")
        }
        Event::ItemPlaced { position, status } => {
            format!("{} placed at {}", status_name(*status), coords(*position))
        }
        Event::PlacementRejected {
            position,
            status,
            reason,
        } => format!(
            "{} rejected at {}: {}",
            status_name(*status),
            coords(*position),
            describe_rejection(*reason)
        ),
        Event::ExplorationStarted => "exploration started".to_owned(),
        Event::AgentMoved { from, to } => {
            format!("agent stepped from {} to {}", coords(*from), coords(*to))
        }
        Event::ArrowFired { direction, outcome } => match outcome {
            ShotOutcome::Groan { monster } => format!(
                "arrow flew {}; a groan, the monster at {} is dead",
                direction_name(*direction),
                coords(*monster)
            ),
            ShotOutcome::Bang => format!(
                "arrow flew {}; a bang against the cave wall",
                direction_name(*direction)
            ),
        },
        Event::TreasureTaken { position } => {
            format!("agent picked up the treasure at {}", coords(*position))
        }
        Event::CaveLeft { position } => {
            format!("agent left the cave at {}", coords(*position))
        }
        Event::AgentStalled { position } => {
            format!("agent found no safe move and stayed at {}", coords(*position))
        }
    }
}

/// Reason text used when a setup command is refused.
pub(crate) fn describe_rejection(reason: PlacementError) -> &'static str {
    match reason {
        PlacementError::OutOfBounds => "the square lies outside the cave",
        PlacementError::ReservedSquare => "the entry square is reserved for the agent",
        PlacementError::MonsterLimit => "the cave already holds its monster",
        PlacementError::TreasureLimit => "the cave already holds its treasure",
        PlacementError::UnsupportedItem => "only monsters, holes, and treasure can be placed",
        PlacementError::Frozen => "editing is frozen once exploration starts",
    }
}

fn status_name(status: SquareStatus) -> &'static str {
    match status {
        SquareStatus::Monster => "monster",
        SquareStatus::Hole => "hole",
        SquareStatus::Treasure => "treasure",
        SquareStatus::Player => "agent",
        SquareStatus::Clean => "clean square",
        SquareStatus::Unknown => "unknown square",
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "north",
        Direction::East => "east",
        Direction::South => "south",
        Direction::West => "west",
    }
}

fn coords(position: GridPos) -> String {
    format!("({}, {})", position.row(), position.column())
}
