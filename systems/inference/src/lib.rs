#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic deduction pass that upgrades `Unknown` belief squares to
//! concrete statuses.
//!
//! The engine performs exactly one row-major sweep per invocation instead of
//! iterating to a fixed point; knowledge therefore propagates across ticks
//! at the pace of the sweeps. Later squares in a sweep observe updates made
//! earlier in the same sweep. Both properties are intentional and load
//! bearing for behavioral parity with the simulated cadence.

use cave_quest_core::{ambient_cue, cue_source, GridPos, Perceptions, SquareStatus, AMBIENT_CUES};
use cave_quest_system_belief::BeliefMap;

/// Single-pass propositional inference over a belief map.
#[derive(Debug, Default)]
pub struct Inference;

impl Inference {
    /// Runs one row-major sweep, applying the three deduction rules to
    /// every square in order. Squares that cannot be resolved stay
    /// `Unknown`.
    pub fn sweep(&self, map: &mut BeliefMap) {
        let positions: Vec<GridPos> = map.grid().positions().collect();
        for position in positions {
            resolve_square(map, position);
        }
    }
}

fn resolve_square(map: &mut BeliefMap, position: GridPos) {
    let sensed = map
        .grid()
        .get(position)
        .and_then(|square| square.perceptions());

    // Rule 1: an empty sensed set proves every neighbor hazard-free.
    if matches!(sensed, Some(perceptions) if perceptions.is_empty()) {
        mark_unknown_neighbors_clean(map, position);
    }

    // Rule 2: with a single unknown neighbor left, any mismatch between the
    // sensed set and the set reconstructed from known neighbors is
    // attributable to that neighbor.
    if let Some(sensed) = sensed {
        if let Some(lone) = lone_unknown_neighbor(map, position) {
            pin_lone_neighbor(map, position, lone, sensed);
        }
    }

    // Rule 3: the square itself, if still unknown, can be resolved by
    // corroborating reports from at least two informed neighbors.
    let status = map.grid().get(position).map(|square| square.status());
    if status == Some(SquareStatus::Unknown) {
        corroborate(map, position);
    }
}

fn mark_unknown_neighbors_clean(map: &mut BeliefMap, position: GridPos) {
    for neighbor in map.grid().neighbors(position).into_iter().flatten() {
        let status = map.grid().get(neighbor).map(|square| square.status());
        if status == Some(SquareStatus::Unknown) {
            map.set_status(neighbor, SquareStatus::Clean);
        }
    }
}

fn lone_unknown_neighbor(map: &BeliefMap, position: GridPos) -> Option<GridPos> {
    let mut lone = None;
    let mut count = 0;
    for neighbor in map.grid().neighbors(position).into_iter().flatten() {
        let status = map.grid().get(neighbor).map(|square| square.status());
        if status == Some(SquareStatus::Unknown) {
            lone = Some(neighbor);
            count += 1;
        }
    }
    if count == 1 {
        lone
    } else {
        None
    }
}

fn pin_lone_neighbor(map: &mut BeliefMap, position: GridPos, lone: GridPos, sensed: Perceptions) {
    let mut expected = Perceptions::new();
    for neighbor in map.grid().neighbors(position).into_iter().flatten() {
        if let Some(square) = map.grid().get(neighbor) {
            if let Some(cue) = ambient_cue(square.status()) {
                expected.set(cue, true);
            }
        }
    }

    for cue in AMBIENT_CUES {
        if sensed.has(cue) != expected.has(cue) {
            if let Some(source) = cue_source(cue) {
                map.set_status(lone, source);
            }
        }
    }
}

fn corroborate(map: &mut BeliefMap, position: GridPos) {
    let mut informed: u8 = 0;
    let mut reports = [0u8; AMBIENT_CUES.len()];

    for neighbor in map.grid().neighbors(position).into_iter().flatten() {
        let Some(perceptions) = map.grid().get(neighbor).and_then(|square| square.perceptions())
        else {
            continue;
        };
        informed += 1;
        for (slot, cue) in reports.iter_mut().zip(AMBIENT_CUES) {
            if perceptions.has(cue) {
                *slot += 1;
            }
        }
    }

    // A single perceiving neighbor is ambiguous; the cue could originate
    // from a different neighbor of that square. Two independent vantage
    // points pin the source down to the shared square.
    if informed < 2 {
        return;
    }

    for (count, cue) in reports.into_iter().zip(AMBIENT_CUES) {
        if count == informed {
            if let Some(source) = cue_source(cue) {
                map.set_status(position, source);
                return;
            }
        }
    }

    map.set_status(position, SquareStatus::Clean);
}
