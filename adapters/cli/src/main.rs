#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays seeded Hexfield rounds in the terminal.
//!
//! The player team holds its ground while the enemy planner drives each
//! enemy turn, so a run shows the generated house, the fog of war and the
//! full journal of an unfolding round. Equal seeds print equal runs.

use anyhow::{Context, Result};
use clap::Parser;

use hexfield_core::hex::HexCoord;
use hexfield_core::{Archetype, Command, Event, RoundOutcome, Team, Tile};
use hexfield_system_enemy_ai::EnemyTurnPlanner;
use hexfield_world::{apply, query, RoundConfig, World};

#[derive(Debug, Parser)]
#[command(name = "hexfield", about = "Runs seeded Hexfield rounds in the terminal.")]
struct Args {
    /// Seed for the round's random generator.
    #[arg(long, default_value_t = 1337)]
    seed: u64,
    /// Hex columns on the playing field.
    #[arg(long, default_value_t = 34)]
    columns: i32,
    /// Hex rows on the playing field.
    #[arg(long, default_value_t = 29)]
    rows: i32,
    /// Center-to-edge hex size used for pixel queries.
    #[arg(long, default_value_t = 30.0)]
    hex_size: f32,
    /// Player turns to simulate before stopping.
    #[arg(long, default_value_t = 10)]
    turns: u32,
    /// Draw hexes the player team cannot currently see.
    #[arg(long)]
    reveal: bool,
}

/// Entry point for the Hexfield command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let mut world = World::new(RoundConfig::new(args.columns, args.rows, args.hex_size));

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::StartRound { seed: args.seed },
        &mut events,
    )
    .context("starting the round")?;

    println!("{}", query::welcome_banner(&world));
    let mut printed_lines = 0;
    print_journal_tail(&world, &mut printed_lines);
    println!("{}", render_field(&world, args.reveal));

    let mut planner = EnemyTurnPlanner::new();
    for turn in 1..=args.turns {
        if query::outcome(&world) == RoundOutcome::Lost {
            break;
        }
        println!();
        println!("=== Turn {turn} ===");

        events.clear();
        apply(&mut world, Command::EndTurn, &mut events).context("ending the player turn")?;
        drive_enemy_turn(&mut world, &mut planner, &mut events)?;

        print_journal_tail(&world, &mut printed_lines);
        println!("{}", render_field(&world, args.reveal));
    }

    if query::outcome(&world) == RoundOutcome::Lost {
        println!("Round over on wave {}.", query::wave(&world));
    } else {
        println!("Stopping after {} turns on wave {}.", args.turns, query::wave(&world));
    }
    Ok(())
}

/// Feeds the planner its own event stream until the enemy turn is over.
fn drive_enemy_turn(
    world: &mut World,
    planner: &mut EnemyTurnPlanner,
    events: &mut Vec<Event>,
) -> Result<()> {
    let mut commands = Vec::new();
    loop {
        planner.handle(events, world, &mut commands);
        if commands.is_empty() {
            return Ok(());
        }
        events.clear();
        for command in commands.drain(..) {
            apply(world, command, events).context("applying an enemy command")?;
        }
    }
}

/// Prints journal lines added since the previous call.
fn print_journal_tail(world: &World, printed_lines: &mut usize) {
    let journal = query::journal(world);
    for line in &journal[*printed_lines..] {
        println!("{line}");
    }
    *printed_lines = journal.len();
}

/// Renders the field as staggered rows of glyphs, one per hex.
fn render_field(world: &World, reveal: bool) -> String {
    let Some(field) = query::field(world) else {
        return String::new();
    };
    let view = query::character_view(world);
    let powerups = query::powerups(world);

    let mut lines = Vec::with_capacity(field.height() as usize);
    for y in 0..field.height() {
        let mut line = String::new();
        if y % 2 == 1 {
            line.push(' ');
        }
        for x in 0..field.width() {
            let hex = HexCoord::from_map_coords(x, y);
            line.push(hex_glyph(world, field, &view, &powerups, hex, reveal));
            line.push(' ');
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn hex_glyph(
    world: &World,
    field: &hexfield_world::field::PlayingField,
    view: &hexfield_core::CharacterView,
    powerups: &[hexfield_core::PowerupSnapshot],
    hex: HexCoord,
    reveal: bool,
) -> char {
    if !reveal && query::is_in_fog(world, hex) {
        return '~';
    }
    if let Some(id) = query::character_on(world, hex) {
        if let Some(snapshot) = view.iter().find(|snapshot| snapshot.id == id) {
            return character_glyph(snapshot.team, snapshot.archetype);
        }
    }
    if powerups.iter().any(|powerup| powerup.position == hex) {
        return '*';
    }
    match field.tile_at(hex) {
        Tile::Empty => ' ',
        Tile::Floor => '.',
        Tile::ConcreteWall => '#',
        Tile::Glass => '=',
    }
}

fn character_glyph(team: Team, archetype: Archetype) -> char {
    if team == Team::Player {
        return '@';
    }
    match archetype {
        Archetype::Regular => 'w',
        Archetype::Mother => 'M',
        Archetype::Sniper => 's',
        Archetype::Operative => 'o',
    }
}
