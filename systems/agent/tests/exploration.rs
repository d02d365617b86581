//! Full exploration runs against small authoritative caves, checking the
//! milestone events and the final state of both maps.

use cave_quest_core::{AgentPhase, Command, Direction, Event, GridPos, ShotOutcome, SquareStatus};
use cave_quest_system_agent::Agent;
use cave_quest_world::{apply, query, World};

const TICK_LIMIT: u32 = 40;

fn started_world(items: &[(GridPos, SquareStatus)]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    apply(&mut world, Command::ConfigureGrid { side: 4 }, &mut events);
    for (position, status) in items {
        apply(
            &mut world,
            Command::PlaceItem {
                position: *position,
                status: *status,
            },
            &mut events,
        );
    }
    apply(&mut world, Command::StartExploration, &mut events);
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::PlacementRejected { .. })));
    world
}

fn run_to_completion(world: &mut World, agent: &mut Agent) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..TICK_LIMIT {
        agent.tick(world, &mut events);
        if agent.finished() {
            return events;
        }
    }
    panic!("agent did not finish within {TICK_LIMIT} ticks");
}

#[test]
fn the_agent_slays_the_monster_takes_the_treasure_and_leaves() {
    let mut world = started_world(&[
        (GridPos::new(1, 1), SquareStatus::Monster),
        (GridPos::new(0, 3), SquareStatus::Treasure),
    ]);
    let mut agent = Agent::new(&mut world);

    let events = run_to_completion(&mut world, &mut agent);

    let shot = events
        .iter()
        .position(|event| {
            matches!(
                event,
                Event::ArrowFired {
                    direction: Direction::North,
                    outcome: ShotOutcome::Groan { monster },
                } if *monster == GridPos::new(1, 1)
            )
        })
        .expect("the monster is slain");
    let taken = events
        .iter()
        .position(|event| {
            matches!(event, Event::TreasureTaken { position } if *position == GridPos::new(0, 3))
        })
        .expect("the treasure is taken");
    let left = events
        .iter()
        .position(|event| {
            matches!(event, Event::CaveLeft { position } if *position == GridPos::new(3, 0))
        })
        .expect("the cave is left");
    assert!(shot < taken);
    assert!(taken < left);

    let snapshot = agent.snapshot();
    assert_eq!(agent.phase(), AgentPhase::Finished);
    assert_eq!(snapshot.arrows, 0);
    assert!(snapshot.treasure_found);
    assert_eq!(world.monster_count(), 0);
    assert_eq!(world.agent_count(), 0);

    // The slain monster's stench is gone from both maps.
    let world_cue = query::square_snapshot(&world, GridPos::new(1, 0))
        .expect("in bounds")
        .perceptions
        .expect("computed");
    assert!(world_cue.is_empty());
    let believed_cue = agent
        .belief()
        .grid()
        .square(GridPos::new(2, 1))
        .expect("in bounds")
        .perceptions()
        .expect("sensed");
    assert!(believed_cue.is_empty());

    // The treasure square no longer carries the flag anywhere.
    assert!(!query::square_snapshot(&world, GridPos::new(0, 3))
        .expect("in bounds")
        .treasure);
}

#[test]
fn a_monsterless_cave_is_cleared_without_firing() {
    let mut world = started_world(&[(GridPos::new(0, 3), SquareStatus::Treasure)]);
    let mut agent = Agent::new(&mut world);

    let events = run_to_completion(&mut world, &mut agent);

    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::ArrowFired { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TreasureTaken { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::CaveLeft { .. })));
    assert_eq!(agent.snapshot().arrows, 0);
    assert_eq!(agent.phase(), AgentPhase::Finished);
}

#[test]
fn a_finished_agent_ignores_further_ticks() {
    let mut world = started_world(&[(GridPos::new(0, 3), SquareStatus::Treasure)]);
    let mut agent = Agent::new(&mut world);
    let _ = run_to_completion(&mut world, &mut agent);

    let mut events = Vec::new();
    agent.tick(&mut world, &mut events);
    agent.tick(&mut world, &mut events);

    assert!(events.is_empty());
    assert_eq!(agent.phase(), AgentPhase::Finished);
}

#[test]
fn the_agent_never_steps_onto_a_hazard() {
    let mut world = started_world(&[
        (GridPos::new(1, 1), SquareStatus::Monster),
        (GridPos::new(2, 2), SquareStatus::Hole),
        (GridPos::new(0, 3), SquareStatus::Treasure),
    ]);
    let hazards = [GridPos::new(1, 1), GridPos::new(2, 2)];
    let mut agent = Agent::new(&mut world);

    let mut events = Vec::new();
    for _ in 0..TICK_LIMIT {
        agent.tick(&mut world, &mut events);
        let position = agent.snapshot().position;
        // The monster square is only enterable once the monster is dead.
        if position == GridPos::new(1, 1) {
            assert_eq!(world.monster_count(), 0);
        }
        assert_ne!(position, hazards[1]);
        if agent.finished() {
            break;
        }
    }
}

#[test]
fn the_treasure_phase_flips_exactly_once() {
    let mut world = started_world(&[(GridPos::new(0, 3), SquareStatus::Treasure)]);
    let mut agent = Agent::new(&mut world);

    let mut seen_held = false;
    let mut events = Vec::new();
    for _ in 0..TICK_LIMIT {
        agent.tick(&mut world, &mut events);
        match agent.phase() {
            AgentPhase::Exploring => {
                assert!(!seen_held, "phase went back to exploring");
            }
            AgentPhase::TreasureHeld => seen_held = true,
            AgentPhase::Finished => break,
        }
    }
    assert!(seen_held);
    assert_eq!(agent.phase(), AgentPhase::Finished);
}
