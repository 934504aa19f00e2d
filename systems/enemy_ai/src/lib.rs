#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that plans enemy actions from world snapshots.
//!
//! The planner consumes the world's event stream and answers with command
//! batches. It never mutates the world and draws no randomness of its own;
//! every roll an enemy action needs is resolved by the world, so a round
//! replays identically from its seed regardless of how the planner is
//! driven.

use std::collections::VecDeque;

use hexfield_core::hex::HexCoord;
use hexfield_core::{CharacterId, CharacterSnapshot, Command, Event, RoundOutcome, Team, TurnPhase};
use hexfield_world::field::PlayingField;
use hexfield_world::{query, World};

/// Hit chance above which a ranged enemy fires instead of lining up a
/// better shot.
const CONFIDENT_SHOT_THRESHOLD: f64 = 0.3;

/// Plans one enemy action batch per call, walking the roster captured at
/// the start of the enemy turn.
///
/// Drive it by feeding back the events each batch produced: the planner
/// enqueues every living enemy when it sees the turn change, emits one
/// enemy's commands per [`EnemyTurnPlanner::handle`] call, and asks the
/// world to finish the enemy turn once the roster is exhausted.
#[derive(Debug, Default)]
pub struct EnemyTurnPlanner {
    queue: VecDeque<CharacterId>,
}

impl EnemyTurnPlanner {
    /// Creates a planner with an empty roster queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the next enemy's command batch into the output buffer.
    ///
    /// The buffer is cleared first. Enemies spawned mid-turn (mother
    /// births) do not act until the next enemy turn.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        out.clear();

        for event in events {
            match event {
                Event::TurnChanged {
                    phase: TurnPhase::Enemy,
                } => self.enlist_roster(world),
                Event::TurnChanged {
                    phase: TurnPhase::Player,
                }
                | Event::RoundLost { .. } => self.queue.clear(),
                _ => {}
            }
        }

        if query::phase(world) != TurnPhase::Enemy
            || query::outcome(world) != RoundOutcome::Ongoing
        {
            return;
        }

        let view = query::character_view(world);
        while let Some(id) = self.queue.pop_front() {
            let Some(enemy) = view
                .iter()
                .find(|snapshot| snapshot.id == id && snapshot.alive)
            else {
                continue;
            };
            plan_enemy(world, enemy, out);
            return;
        }
        out.push(Command::FinishEnemyTurn);
    }

    fn enlist_roster(&mut self, world: &World) {
        self.queue.clear();
        for snapshot in query::character_view(world).iter() {
            if snapshot.alive && snapshot.team == Team::Enemy {
                self.queue.push_back(snapshot.id);
            }
        }
    }
}

/// Plans a single enemy: acquire the nearest living opponent by path
/// distance, then dispatch on the archetype's capability flags.
fn plan_enemy(world: &World, enemy: &CharacterSnapshot, out: &mut Vec<Command>) {
    let target = query::field(world).and_then(|field| acquire_target(world, field, enemy));

    if let Some((_, target)) = target {
        // Fields exist whenever a target was found.
        if let Some(field) = query::field(world) {
            if enemy.archetype.can_ranged() {
                if !plan_ranged(world, enemy, target.id, out) {
                    plan_melee_seek(world, field, enemy, &target, out);
                }
            } else if enemy.archetype.can_melee() {
                plan_melee_seek(world, field, enemy, &target, out);
            }
        }
    }
    out.push(Command::EndCharacterTurn {
        character: enemy.id,
    });
}

/// Nearest living opposing character together with its path distance.
/// Unreachable characters are never preferred; ties keep the lower id.
fn acquire_target(
    world: &World,
    field: &PlayingField,
    enemy: &CharacterSnapshot,
) -> Option<(u32, CharacterSnapshot)> {
    let rival_team = enemy.team.opponent();
    let mut target: Option<(u32, CharacterSnapshot)> = None;
    for candidate in query::character_view(world).iter() {
        if !candidate.alive || candidate.team != rival_team {
            continue;
        }
        let Some(distance) = field.distance(enemy.position, candidate.position) else {
            continue;
        };
        let closer = target.map_or(true, |(best, _)| distance < best);
        if closer {
            target = Some((distance, *candidate));
        }
    }
    target
}

/// Ranged policy: fire on a confident shot, line up the aim on a long
/// shot, hold position on an impossible one. Holding still counts as
/// having acted, so ranged enemies never reposition.
fn plan_ranged(
    world: &World,
    enemy: &CharacterSnapshot,
    target: CharacterId,
    out: &mut Vec<Command>,
) -> bool {
    let chance = query::hit_chance_between(world, enemy.id, target);
    if chance > CONFIDENT_SHOT_THRESHOLD {
        out.push(Command::Attack {
            attacker: enemy.id,
            defender: target,
        });
    } else if chance > 0.0 {
        out.push(Command::SteadyAim {
            character: enemy.id,
        });
    }
    true
}

/// Shared default behavior: step onto the unoccupied reachable hex with
/// minimum path distance to the target, even when every such hex is
/// farther than where the enemy stands, then strike only when that
/// minimum is exactly 1. The current hex never counts as a candidate, so
/// an enemy whose adjacent spot is contested gives it up rather than
/// holding position. Ties keep the lowest-ordered hex.
fn plan_melee_seek(
    world: &World,
    field: &PlayingField,
    enemy: &CharacterSnapshot,
    target: &CharacterSnapshot,
    out: &mut Vec<Command>,
) {
    let budget = query::movement_budget(world, enemy.id);
    let target_distances = field.shortest_path_distances(target.position);

    let mut best: Option<(u32, HexCoord)> = None;
    for (hex, _) in field.reachable_fields(enemy.position, budget) {
        if hex == enemy.position || query::character_on(world, hex).is_some() {
            continue;
        }
        let Some(distance) = target_distances.get(&hex) else {
            continue;
        };
        if best.map_or(true, |(shortest, _)| *distance < shortest) {
            best = Some((*distance, hex));
        }
    }

    let Some((closest, to)) = best else {
        return;
    };
    out.push(Command::MoveCharacter {
        character: enemy.id,
        to,
    });
    if closest == 1 {
        out.push(Command::MeleeStrike {
            attacker: enemy.id,
            defender: target.id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfield_core::Archetype;
    use hexfield_world::{apply, scaffold};

    fn hex(x: i32, y: i32) -> HexCoord {
        HexCoord::from_map_coords(x, y)
    }

    /// Applies the planner's batch, returning the events it produced.
    fn run_batch(world: &mut World, commands: &[Command]) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(world, command.clone(), &mut events).expect("command applies");
        }
        events
    }

    fn enemy_turn_events() -> Vec<Event> {
        vec![Event::TurnChanged {
            phase: TurnPhase::Enemy,
        }]
    }

    #[test]
    fn adjacent_regulars_keep_melee_range_and_bite() {
        let mut world = scaffold::open_world(12, 12);
        let victim =
            scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(6, 5));
        let biter =
            scaffold::place_character(&mut world, Archetype::Regular, Team::Enemy, hex(5, 5));
        scaffold::set_phase(&mut world, TurnPhase::Enemy);

        let mut planner = EnemyTurnPlanner::new();
        let mut out = Vec::new();
        planner.handle(&enemy_turn_events(), &world, &mut out);

        // The current hex is never a candidate, so the biter shifts to
        // the lowest-ordered free hex beside the victim before striking.
        assert_eq!(
            out,
            vec![
                Command::MoveCharacter {
                    character: biter,
                    to: hex(5, 6),
                },
                Command::MeleeStrike {
                    attacker: biter,
                    defender: victim,
                },
                Command::EndCharacterTurn { character: biter },
            ]
        );

        let events = run_batch(&mut world, &out);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::DamageDealt { amount: 5, .. })));
    }

    #[test]
    fn crowded_out_regulars_fall_back_without_striking() {
        let mut world = scaffold::open_world(12, 12);
        let _ = scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(6, 5));
        let biter =
            scaffold::place_character(&mut world, Archetype::Regular, Team::Enemy, hex(5, 5));
        // Fill every other hex beside the victim so the closest free
        // hex sits two steps out.
        for blocker in [hex(7, 5), hex(6, 4), hex(5, 6), hex(5, 4), hex(6, 6)] {
            let _ = scaffold::place_character(&mut world, Archetype::Regular, Team::Enemy, blocker);
        }
        scaffold::set_phase(&mut world, TurnPhase::Enemy);

        let mut planner = EnemyTurnPlanner::new();
        let mut out = Vec::new();
        planner.handle(&enemy_turn_events(), &world, &mut out);

        assert_eq!(
            out,
            vec![
                Command::MoveCharacter {
                    character: biter,
                    to: hex(4, 5),
                },
                Command::EndCharacterTurn { character: biter },
            ]
        );
    }

    #[test]
    fn snipers_fire_on_confident_shots() {
        let mut world = scaffold::open_world(12, 12);
        let victim =
            scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(7, 5));
        let sniper =
            scaffold::place_character(&mut world, Archetype::Sniper, Team::Enemy, hex(5, 5));
        scaffold::set_phase(&mut world, TurnPhase::Enemy);

        let mut planner = EnemyTurnPlanner::new();
        let mut out = Vec::new();
        planner.handle(&enemy_turn_events(), &world, &mut out);

        assert_eq!(
            out,
            vec![
                Command::Attack {
                    attacker: sniper,
                    defender: victim,
                },
                Command::EndCharacterTurn { character: sniper },
            ]
        );
    }

    #[test]
    fn snipers_steady_their_aim_on_long_shots() {
        let mut world = scaffold::open_world(28, 6);
        // 22 hexes out: hit chance rounds to 0.27, under the firing bar.
        let _ = scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(24, 2));
        let sniper =
            scaffold::place_character(&mut world, Archetype::Sniper, Team::Enemy, hex(2, 2));
        scaffold::set_phase(&mut world, TurnPhase::Enemy);

        let mut planner = EnemyTurnPlanner::new();
        let mut out = Vec::new();
        planner.handle(&enemy_turn_events(), &world, &mut out);

        assert_eq!(
            out,
            vec![
                Command::SteadyAim { character: sniper },
                Command::EndCharacterTurn { character: sniper },
            ]
        );
    }

    #[test]
    fn mothers_only_end_their_turn() {
        let mut world = scaffold::open_world(12, 12);
        let _ = scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(8, 5));
        let mother =
            scaffold::place_character(&mut world, Archetype::Mother, Team::Enemy, hex(5, 5));
        scaffold::set_phase(&mut world, TurnPhase::Enemy);

        let mut planner = EnemyTurnPlanner::new();
        let mut out = Vec::new();
        planner.handle(&enemy_turn_events(), &world, &mut out);

        assert_eq!(out, vec![Command::EndCharacterTurn { character: mother }]);
    }

    #[test]
    fn enemies_without_targets_still_end_their_turn() {
        let mut world = scaffold::open_world(12, 12);
        let biter =
            scaffold::place_character(&mut world, Archetype::Regular, Team::Enemy, hex(5, 5));
        scaffold::set_phase(&mut world, TurnPhase::Enemy);

        let mut planner = EnemyTurnPlanner::new();
        let mut out = Vec::new();
        planner.handle(&enemy_turn_events(), &world, &mut out);

        assert_eq!(out, vec![Command::EndCharacterTurn { character: biter }]);
    }

}
