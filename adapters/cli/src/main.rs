#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that sets up a cave and runs the exploration loop.

mod render;

use std::{io, thread, time::Duration};

use anyhow::bail;
use clap::{Parser, ValueEnum};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cave_quest_core::{Command, Event, GridPos, SquareStatus, MAX_SIDE, MIN_SIDE};
use cave_quest_system_agent::Agent;
use cave_quest_world::{apply, query, World};

/// Arguments accepted by the cave-quest command-line interface.
#[derive(Debug, Parser)]
#[command(name = "cave-quest", about = "Watch an agent explore a hazardous cave")]
struct Args {
    /// Side length of the square cave.
    #[arg(long, default_value_t = MIN_SIDE)]
    side: u8,
    /// Monster position as ROW,COL.
    #[arg(long, value_parser = parse_position)]
    monster: Option<GridPos>,
    /// Hole position as ROW,COL; repeatable.
    #[arg(long = "hole", value_parser = parse_position)]
    holes: Vec<GridPos>,
    /// Treasure position as ROW,COL.
    #[arg(long, value_parser = parse_position)]
    treasure: Option<GridPos>,
    /// Generate a random layout instead of explicit placements.
    #[arg(long, conflicts_with_all = ["monster", "holes", "treasure"])]
    random: bool,
    /// Seed for the random layout; omitted means entropy-seeded.
    #[arg(long, requires = "random")]
    seed: Option<u64>,
    /// Delay between ticks.
    #[arg(long, value_enum, default_value_t = Speed::Normal)]
    speed: Speed,
    /// Safety limit on the number of ticks.
    #[arg(long, default_value_t = 200)]
    max_ticks: u32,
    /// Also print the agent's belief map every tick.
    #[arg(long)]
    show_belief: bool,
}

/// Tick cadence presets; `manual` steps on Enter instead of a timer.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Speed {
    Slow,
    Normal,
    Fast,
    Manual,
}

impl Speed {
    const fn delay(self) -> Option<Duration> {
        match self {
            Self::Slow => Some(Duration::from_millis(3000)),
            Self::Normal => Some(Duration::from_millis(2000)),
            Self::Fast => Some(Duration::from_millis(1000)),
            Self::Manual => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !args.random && args.treasure.is_none() {
        bail!("a cave without a treasure cannot be cleared; pass --treasure or --random");
    }

    let mut world = World::new();
    apply_checked(&mut world, Command::ConfigureGrid { side: args.side })?;
    for (position, status) in placements(&args) {
        apply_checked(&mut world, Command::PlaceItem { position, status })?;
    }
    apply_checked(&mut world, Command::StartExploration)?;

    println!("{}", query::welcome_banner(&world));
    let mut agent = Agent::new(&mut world);
    println!("{}", render::ground_view(&world));

    let mut ticks = 0;
    while ticks < args.max_ticks && !agent.finished() {
        pause(args.speed)?;
        ticks += 1;

        let mut events = Vec::new();
        agent.tick(&mut world, &mut events);

        println!("tick {ticks}");
        for event in &events {
            println!("  {}", render::describe_event(event));
        }
        println!("{}", render::ground_view(&world));
        if args.show_belief {
            println!("belief:");
            println!("{}", render::belief_view(agent.belief().grid()));
        }
    }

    let snapshot = agent.snapshot();
    if agent.finished() {
        println!("the treasure was recovered in {ticks} ticks; {} arrows left", snapshot.arrows);
    } else {
        println!("tick limit of {} reached without clearing the cave", args.max_ticks);
    }
    Ok(())
}

/// Applies one setup command, surfacing rejection events as errors.
fn apply_checked(world: &mut World, command: Command) -> anyhow::Result<()> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    for event in &events {
        match event {
            Event::ConfigurationRejected { side } => {
                bail!("cave side {side} is outside the supported range {MIN_SIDE}..={MAX_SIDE}")
            }
            Event::PlacementRejected {
                position, reason, ..
            } => bail!(
                "cannot place at ({}, {}): {}",
                position.row(),
                position.column(),
                render::describe_rejection(*reason)
            ),
            _ => {}
        }
    }
    Ok(())
}

fn placements(args: &Args) -> Vec<(GridPos, SquareStatus)> {
    if args.random {
        return random_layout(args.side, args.seed);
    }
    let mut items = Vec::new();
    if let Some(position) = args.monster {
        items.push((position, SquareStatus::Monster));
    }
    for &position in &args.holes {
        items.push((position, SquareStatus::Hole));
    }
    if let Some(position) = args.treasure {
        items.push((position, SquareStatus::Treasure));
    }
    items
}

/// Shuffles the non-entry squares and deals out one treasure, one monster,
/// and `side / 2` holes. Nothing guarantees the treasure stays reachable;
/// the tick limit covers unlucky layouts.
fn random_layout(side: u8, seed: Option<u64>) -> Vec<(GridPos, SquareStatus)> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let start = GridPos::new(side.saturating_sub(1), 0);
    let mut open = Vec::new();
    for row in 0..side {
        for column in 0..side {
            let position = GridPos::new(row, column);
            if position != start {
                open.push(position);
            }
        }
    }
    open.shuffle(&mut rng);

    let mut draws = open.into_iter();
    let mut items = Vec::new();
    if let Some(position) = draws.next() {
        items.push((position, SquareStatus::Treasure));
    }
    if let Some(position) = draws.next() {
        items.push((position, SquareStatus::Monster));
    }
    for position in draws.take(usize::from(side / 2)) {
        items.push((position, SquareStatus::Hole));
    }
    items
}

fn parse_position(value: &str) -> Result<GridPos, String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{value}'"))?;
    let row = row
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("could not parse row '{row}'"))?;
    let column = column
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("could not parse column '{column}'"))?;
    Ok(GridPos::new(row, column))
}

fn pause(speed: Speed) -> anyhow::Result<()> {
    match speed.delay() {
        Some(delay) => thread::sleep(delay),
        None => {
            println!("press Enter to step");
            let mut line = String::new();
            let _ = io::stdin().read_line(&mut line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_position, placements, random_layout, Args, Speed};
    use cave_quest_core::{GridPos, SquareStatus};
    use clap::Parser;

    #[test]
    fn positions_parse_from_row_col_pairs() {
        assert_eq!(parse_position("1,2"), Ok(GridPos::new(1, 2)));
        assert_eq!(parse_position(" 3 , 0 "), Ok(GridPos::new(3, 0)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,b").is_err());
    }

    #[test]
    fn explicit_placements_follow_the_flags() {
        let args = Args::parse_from([
            "cave-quest",
            "--monster",
            "1,1",
            "--hole",
            "2,2",
            "--hole",
            "0,1",
            "--treasure",
            "0,3",
        ]);

        let items = placements(&args);

        assert_eq!(
            items,
            vec![
                (GridPos::new(1, 1), SquareStatus::Monster),
                (GridPos::new(2, 2), SquareStatus::Hole),
                (GridPos::new(0, 1), SquareStatus::Hole),
                (GridPos::new(0, 3), SquareStatus::Treasure),
            ]
        );
    }

    #[test]
    fn seeded_random_layouts_are_reproducible() {
        let first = random_layout(8, Some(7));
        let second = random_layout(8, Some(7));
        assert_eq!(first, second);

        let treasures = first
            .iter()
            .filter(|(_, status)| *status == SquareStatus::Treasure)
            .count();
        let monsters = first
            .iter()
            .filter(|(_, status)| *status == SquareStatus::Monster)
            .count();
        assert_eq!(treasures, 1);
        assert_eq!(monsters, 1);
        assert!(first
            .iter()
            .all(|(position, _)| *position != GridPos::new(7, 0)));
    }

    #[test]
    fn manual_speed_has_no_timer() {
        assert!(Speed::Manual.delay().is_none());
        assert!(Speed::Slow.delay() > Speed::Fast.delay());
    }
}
