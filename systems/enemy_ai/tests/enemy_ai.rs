use hexfield_core::hex::HexCoord;
use hexfield_core::{Archetype, Command, Event, Team, TurnPhase};
use hexfield_system_enemy_ai::EnemyTurnPlanner;
use hexfield_world::{apply, scaffold, World};

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
fn regulars_close_the_distance_and_bite() {
    let mut world = scaffold::open_world(12, 12);
    let victim =
        scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(8, 5));
    let biter = scaffold::place_character(&mut world, Archetype::Regular, Team::Enemy, hex(5, 5));
    scaffold::set_phase(&mut world, TurnPhase::Enemy);

    let mut planner = EnemyTurnPlanner::new();
    let mut out = Vec::new();
    planner.handle(&enemy_turn_events(), &world, &mut out);

    assert_eq!(
        out,
        vec![
            Command::MoveCharacter {
                character: biter,
                to: hex(7, 5),
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
fn a_drained_roster_finishes_the_enemy_turn() {
    let mut world = scaffold::open_world(12, 12);
    let _ = scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(8, 5));
    let _ = scaffold::place_character(&mut world, Archetype::Mother, Team::Enemy, hex(5, 5));
    scaffold::set_phase(&mut world, TurnPhase::Enemy);

    let mut planner = EnemyTurnPlanner::new();
    let mut out = Vec::new();
    planner.handle(&enemy_turn_events(), &world, &mut out);
    let events = run_batch(&mut world, &out);

    planner.handle(&events, &world, &mut out);
    assert_eq!(out, vec![Command::FinishEnemyTurn]);

    let events = run_batch(&mut world, &out);
    assert!(events.contains(&Event::TurnChanged {
        phase: TurnPhase::Player,
    }));
    planner.handle(&events, &world, &mut out);
    assert!(out.is_empty());
}

#[test]
fn every_living_enemy_acts_exactly_once() {
    let mut world = scaffold::open_world(16, 16);
    let _ = scaffold::place_character(&mut world, Archetype::Operative, Team::Player, hex(3, 3));
    let first =
        scaffold::place_character(&mut world, Archetype::Regular, Team::Enemy, hex(10, 10));
    let second =
        scaffold::place_character(&mut world, Archetype::Regular, Team::Enemy, hex(12, 12));
    scaffold::set_phase(&mut world, TurnPhase::Enemy);

    let mut planner = EnemyTurnPlanner::new();
    let mut out = Vec::new();
    let mut events = enemy_turn_events();
    let mut actors = Vec::new();
    loop {
        planner.handle(&events, &world, &mut out);
        if out == vec![Command::FinishEnemyTurn] {
            break;
        }
        for command in &out {
            if let Command::EndCharacterTurn { character } = command {
                actors.push(*character);
            }
        }
        events = run_batch(&mut world, &out);
    }

    assert_eq!(actors, vec![first, second]);
}
