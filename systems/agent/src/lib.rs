#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven exploration agent tying perception, deduction, and action
//! selection together.
//!
//! Each tick runs the same pipeline: sense the current square if it has not
//! been sensed yet, run one deduction sweep over the private belief map,
//! pick an action, and execute it against both the authoritative cave and
//! the belief map. The agent is the only component allowed to touch both
//! sides at once.

use cave_quest_core::{
    Action, AgentPhase, AgentSnapshot, Direction, Event, GridPos, ShotOutcome, SquareStatus,
};
use cave_quest_system_belief::BeliefMap;
use cave_quest_system_inference::Inference;
use cave_quest_system_policy::Policy;
use cave_quest_world::{query, World};

/// The explorer occupying the cave's entry square.
#[derive(Debug)]
pub struct Agent {
    start: GridPos,
    position: GridPos,
    arrows: u32,
    treasure_found: bool,
    left_cave: bool,
    belief: BeliefMap,
    inference: Inference,
    policy: Policy,
}

impl Agent {
    /// Places a fresh agent on the cave's entry square. The quiver holds
    /// one arrow per monster currently in the cave.
    pub fn new(world: &mut World) -> Self {
        let start = world.start_square();
        let mut belief =
            BeliefMap::new(world.grid().side()).expect("world side is always within range");
        world.set_status(start, SquareStatus::Player);
        belief.set_status(start, SquareStatus::Player);
        world.adjust_agents(1);
        Self {
            start,
            position: start,
            arrows: u32::from(world.monster_count()),
            treasure_found: false,
            left_cave: false,
            belief,
            inference: Inference,
            policy: Policy,
        }
    }

    /// Lifecycle phase derived from the treasure and exit flags.
    #[must_use]
    pub const fn phase(&self) -> AgentPhase {
        if self.left_cave {
            AgentPhase::Finished
        } else if self.treasure_found {
            AgentPhase::TreasureHeld
        } else {
            AgentPhase::Exploring
        }
    }

    /// Whether the agent has left the cave.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.left_cave
    }

    /// Copies the agent's public state.
    #[must_use]
    pub const fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            start: self.start,
            arrows: self.arrows,
            treasure_found: self.treasure_found,
            left_cave: self.left_cave,
        }
    }

    /// Read-only view of the agent's private belief map.
    #[must_use]
    pub const fn belief(&self) -> &BeliefMap {
        &self.belief
    }

    /// Runs one sense-deduce-act cycle. Does nothing once the agent has
    /// left the cave.
    pub fn tick(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        if self.left_cave {
            return;
        }
        let Some(snapshot) = query::square_snapshot(world, self.position) else {
            return;
        };
        if !snapshot.visited {
            if let Some(perceptions) = snapshot.perceptions {
                self.belief.sense(self.position, perceptions);
            }
            world.mark_visited(self.position);
        }
        self.inference.sweep(&mut self.belief);

        let action = self
            .policy
            .decide(&self.belief, &self.snapshot(), snapshot.treasure);
        match action {
            Action::Move(direction) => self.step(world, direction, out_events),
            Action::Shoot(direction) => self.shoot(world, direction, out_events),
            Action::Take => self.take(world, out_events),
            Action::Leave => self.leave(world, out_events),
            Action::Wait => out_events.push(Event::AgentStalled {
                position: self.position,
            }),
        }
    }

    fn step(&mut self, world: &mut World, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(next) = self.position.offset(direction) else {
            return;
        };
        if !world.grid().in_bounds(next) {
            return;
        }
        world.set_status(self.position, SquareStatus::Clean);
        world.set_status(next, SquareStatus::Player);
        self.belief.set_status(self.position, SquareStatus::Clean);
        self.belief.set_status(next, SquareStatus::Player);
        out_events.push(Event::AgentMoved {
            from: self.position,
            to: next,
        });
        self.position = next;
    }

    fn shoot(&mut self, world: &mut World, direction: Direction, out_events: &mut Vec<Event>) {
        self.arrows = self.arrows.saturating_sub(1);
        let outcome = match self.strike(world, direction) {
            Some(monster) => ShotOutcome::Groan { monster },
            None => ShotOutcome::Bang,
        };
        out_events.push(Event::ArrowFired { direction, outcome });
    }

    /// Walks the arrow's ray across the authoritative cave and removes the
    /// first monster hit, keeping both maps' ambient cues in step.
    fn strike(&mut self, world: &mut World, direction: Direction) -> Option<GridPos> {
        let mut cursor = self.position;
        while let Some(next) = cursor.offset(direction) {
            let Some(square) = world.grid().get(next) else {
                break;
            };
            if square.status() == SquareStatus::Monster {
                world.set_status(next, SquareStatus::Clean);
                world.adjust_monsters(-1);
                world.recompute_neighbor_perceptions(next);
                self.belief.set_status(next, SquareStatus::Clean);
                self.belief.recompute_neighbor_perceptions(next);
                return Some(next);
            }
            cursor = next;
        }
        None
    }

    fn take(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        self.treasure_found = true;
        world.clear_treasure(self.position);
        world.adjust_treasures(-1);
        world.recompute_neighbor_perceptions(self.position);
        self.belief.clear_treasure(self.position);
        self.belief.recompute_neighbor_perceptions(self.position);
        out_events.push(Event::TreasureTaken {
            position: self.position,
        });
    }

    fn leave(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        self.left_cave = true;
        world.set_status(self.position, SquareStatus::Clean);
        world.adjust_agents(-1);
        out_events.push(Event::CaveLeft {
            position: self.position,
        });
    }
}
