#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Action selection for the exploring agent.
//!
//! The policy is a pure function of the belief map and the agent snapshot:
//! it never reads the authoritative cave. Ground truth the agent is allowed
//! to feel directly, such as standing on the treasure, arrives as an
//! explicit input instead.

use cave_quest_core::{Action, AgentSnapshot, Direction, GridPos, PerceptionType, SquareStatus};
use cave_quest_system_belief::BeliefMap;

/// Neighbor order tried while searching for the treasure.
pub const OUTBOUND_PREFERENCES: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Neighbor order tried while carrying the treasure back to the entry.
pub const HOMEWARD_PREFERENCES: [Direction; 4] = [
    Direction::West,
    Direction::South,
    Direction::East,
    Direction::North,
];

/// Priority-driven decision policy over a belief map.
#[derive(Debug, Default)]
pub struct Policy;

impl Policy {
    /// Picks the next action. `treasure_underfoot` reports whether the
    /// square the agent stands on actually carries the treasure.
    #[must_use]
    pub fn decide(
        &self,
        map: &BeliefMap,
        agent: &AgentSnapshot,
        treasure_underfoot: bool,
    ) -> Action {
        if agent.treasure_found {
            if agent.position == agent.start {
                return Action::Leave;
            }
            if let Some(direction) = shot_direction(map, agent) {
                return Action::Shoot(direction);
            }
            movement(map, agent, HOMEWARD_PREFERENCES)
        } else {
            if treasure_underfoot {
                return Action::Take;
            }
            if let Some(direction) = shot_direction(map, agent) {
                return Action::Shoot(direction);
            }
            movement(map, agent, OUTBOUND_PREFERENCES)
        }
    }
}

fn shot_direction(map: &BeliefMap, agent: &AgentSnapshot) -> Option<Direction> {
    if agent.arrows == 0 {
        return None;
    }
    Direction::ALL
        .into_iter()
        .find(|direction| monster_on_ray(map, agent.position, *direction))
}

fn monster_on_ray(map: &BeliefMap, from: GridPos, direction: Direction) -> bool {
    let mut cursor = from;
    while let Some(next) = cursor.offset(direction) {
        let Some(square) = map.grid().get(next) else {
            break;
        };
        if square.status() == SquareStatus::Monster {
            return true;
        }
        cursor = next;
    }
    false
}

/// Two passes over the preference order: safe-and-unvisited first, then any
/// safe neighbor. With no safe neighbor at all the agent stands still.
fn movement(map: &BeliefMap, agent: &AgentSnapshot, preferences: [Direction; 4]) -> Action {
    for direction in preferences {
        if is_safe(map, agent.position, direction) && !is_visited(map, agent.position, direction) {
            return Action::Move(direction);
        }
    }
    for direction in preferences {
        if is_safe(map, agent.position, direction) {
            return Action::Move(direction);
        }
    }
    Action::Wait
}

fn is_safe(map: &BeliefMap, from: GridPos, direction: Direction) -> bool {
    let Some(target) = from.offset(direction) else {
        return false;
    };
    let Some(square) = map.grid().get(target) else {
        return false;
    };
    match square.status() {
        SquareStatus::Treasure | SquareStatus::Player | SquareStatus::Clean => true,
        // An unknown square is only worth the risk when the square the
        // agent stands on carries neither hazard cue.
        SquareStatus::Unknown => map
            .grid()
            .get(from)
            .and_then(|current| current.perceptions())
            .map_or(false, |perceptions| {
                !perceptions.has(PerceptionType::Stench) && !perceptions.has(PerceptionType::Breeze)
            }),
        SquareStatus::Monster | SquareStatus::Hole => false,
    }
}

fn is_visited(map: &BeliefMap, from: GridPos, direction: Direction) -> bool {
    from.offset(direction)
        .and_then(|target| map.grid().get(target))
        .map_or(false, |square| square.visited())
}

#[cfg(test)]
mod tests {
    use super::{Policy, HOMEWARD_PREFERENCES, OUTBOUND_PREFERENCES};
    use cave_quest_core::{
        Action, AgentSnapshot, Direction, GridPos, PerceptionType, Perceptions, SquareStatus,
    };
    use cave_quest_system_belief::BeliefMap;

    fn agent_at(row: u8, column: u8) -> AgentSnapshot {
        AgentSnapshot {
            position: GridPos::new(row, column),
            start: GridPos::new(3, 0),
            arrows: 1,
            treasure_found: false,
            left_cave: false,
        }
    }

    fn mark_visited(map: &mut BeliefMap, row: u8, column: u8) {
        map.sense(GridPos::new(row, column), Perceptions::new());
    }

    #[test]
    fn preference_tables_cover_all_directions() {
        for direction in Direction::ALL {
            assert!(OUTBOUND_PREFERENCES.contains(&direction));
            assert!(HOMEWARD_PREFERENCES.contains(&direction));
        }
    }

    #[test]
    fn treasure_underfoot_is_taken_before_anything_else() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        // A believed monster on the northern ray would otherwise win.
        map.set_status(GridPos::new(0, 2), SquareStatus::Monster);

        let action = Policy.decide(&map, &agent_at(2, 2), true);

        assert_eq!(action, Action::Take);
    }

    #[test]
    fn a_believed_monster_on_a_ray_draws_a_shot() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(0, 0), SquareStatus::Monster);
        map.set_status(GridPos::new(2, 1), SquareStatus::Clean);

        let action = Policy.decide(&map, &agent_at(2, 0), false);

        assert_eq!(action, Action::Shoot(Direction::North));
    }

    #[test]
    fn ray_scan_prefers_north_over_west() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(0, 2), SquareStatus::Monster);
        map.set_status(GridPos::new(2, 0), SquareStatus::Monster);

        let action = Policy.decide(&map, &agent_at(2, 2), false);

        assert_eq!(action, Action::Shoot(Direction::North));
    }

    #[test]
    fn no_arrows_means_no_shot() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(0, 0), SquareStatus::Monster);
        map.set_status(GridPos::new(2, 1), SquareStatus::Clean);
        let mut agent = agent_at(2, 0);
        agent.arrows = 0;

        let action = Policy.decide(&map, &agent, false);

        assert_eq!(action, Action::Move(Direction::East));
    }

    #[test]
    fn outbound_movement_tries_north_first() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(1, 1), SquareStatus::Clean);
        map.set_status(GridPos::new(2, 2), SquareStatus::Clean);

        let action = Policy.decide(&map, &agent_at(2, 1), false);

        assert_eq!(action, Action::Move(Direction::North));
    }

    #[test]
    fn visited_squares_yield_to_unvisited_ones() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(1, 1), SquareStatus::Clean);
        mark_visited(&mut map, 1, 1);
        map.set_status(GridPos::new(2, 2), SquareStatus::Clean);

        let action = Policy.decide(&map, &agent_at(2, 1), false);

        assert_eq!(action, Action::Move(Direction::East));
    }

    #[test]
    fn all_visited_falls_back_to_the_preferred_safe_square() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(1, 1), SquareStatus::Clean);
        mark_visited(&mut map, 1, 1);
        map.set_status(GridPos::new(2, 2), SquareStatus::Clean);
        mark_visited(&mut map, 2, 2);
        map.set_status(GridPos::new(3, 1), SquareStatus::Hole);
        map.set_status(GridPos::new(2, 0), SquareStatus::Hole);

        let action = Policy.decide(&map, &agent_at(2, 1), false);

        assert_eq!(action, Action::Move(Direction::North));
    }

    #[test]
    fn unknown_squares_are_safe_only_without_hazard_cues_underfoot() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        mark_visited(&mut map, 2, 1);

        let calm = Policy.decide(&map, &agent_at(2, 1), false);
        assert_eq!(calm, Action::Move(Direction::North));

        let mut breeze = Perceptions::new();
        breeze.set(PerceptionType::Breeze, true);
        map.sense(GridPos::new(2, 1), breeze);

        let wary = Policy.decide(&map, &agent_at(2, 1), false);
        assert_eq!(wary, Action::Wait);
    }

    #[test]
    fn unknown_squares_are_unsafe_before_the_first_sensing() {
        let map = BeliefMap::new(4).expect("side 4 is valid");

        let action = Policy.decide(&map, &agent_at(2, 1), false);

        assert_eq!(action, Action::Wait);
    }

    #[test]
    fn surrounded_by_believed_hazards_the_agent_waits() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(1, 1), SquareStatus::Monster);
        map.set_status(GridPos::new(2, 2), SquareStatus::Hole);
        map.set_status(GridPos::new(3, 1), SquareStatus::Hole);
        map.set_status(GridPos::new(2, 0), SquareStatus::Hole);
        let mut agent = agent_at(2, 1);
        agent.arrows = 0;

        let action = Policy.decide(&map, &agent, false);

        assert_eq!(action, Action::Wait);
    }

    #[test]
    fn carrying_the_treasure_reverses_the_preference_order() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        map.set_status(GridPos::new(1, 1), SquareStatus::Clean);
        map.set_status(GridPos::new(2, 2), SquareStatus::Clean);
        map.set_status(GridPos::new(3, 1), SquareStatus::Clean);
        map.set_status(GridPos::new(2, 0), SquareStatus::Clean);
        let mut agent = agent_at(2, 1);
        agent.treasure_found = true;

        let action = Policy.decide(&map, &agent, false);

        assert_eq!(action, Action::Move(Direction::West));
    }

    #[test]
    fn reaching_the_entry_with_the_treasure_means_leaving() {
        let mut map = BeliefMap::new(4).expect("side 4 is valid");
        // Even a shootable monster does not delay the exit.
        map.set_status(GridPos::new(0, 0), SquareStatus::Monster);
        let mut agent = agent_at(3, 0);
        agent.treasure_found = true;

        let action = Policy.decide(&map, &agent, false);

        assert_eq!(action, Action::Leave);
    }
}
