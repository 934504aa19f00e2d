#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hexfield.
//!
//! A round is a generated building, a character roster and a turn state
//! machine. Adapters and systems mutate the round exclusively through
//! [`apply`]; every mutation broadcasts [`Event`] values and appends
//! human-readable journal lines, which together form the complete
//! observable record of a round. All randomness is drawn from one
//! `ChaCha8Rng` seeded by [`Command::StartRound`], so equal seeds replay
//! identical rounds.

pub mod combat;
pub mod field;
pub mod generator;
pub mod map;

mod character;

pub use character::movement_range;

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use hexfield_core::hex::HexCoord;
use hexfield_core::{
    Archetype, CharacterId, Command, Event, PowerupKind, RoundOutcome, Team, TurnPhase,
    WaveComposition, WELCOME_BANNER,
};

use crate::character::{Character, Powerup, MAX_ACTION_POINTS};
use crate::field::PlayingField;
use crate::map::MapStorage;

const SPAWN_ATTEMPTS: u32 = 1000;
const MIN_SPAWN_DISTANCE: u32 = 3;
const POWERUP_DROP_KINDS: [PowerupKind; 5] = [
    PowerupKind::Health,
    PowerupKind::Agility,
    PowerupKind::Aim,
    PowerupKind::Damage,
    PowerupKind::Ammo,
];

/// Fatal failures that leave the round unable to proceed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    /// Bounded resampling found no valid spawn location.
    #[error("no valid spawn location found after {attempts} attempts")]
    SpawnPlacementExhausted {
        /// Number of placement attempts that were made before giving up.
        attempts: u32,
    },
}

/// Static parameters of a round; the seed arrives separately through
/// [`Command::StartRound`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundConfig {
    columns: i32,
    rows: i32,
    hex_size: f32,
}

impl RoundConfig {
    /// Creates a round configuration with explicit field dimensions.
    #[must_use]
    pub const fn new(columns: i32, rows: i32, hex_size: f32) -> Self {
        Self {
            columns,
            rows,
            hex_size,
        }
    }

    /// Number of hex columns on the field.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of hex rows on the field.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Center-to-edge pixel distance of a rendered hex.
    #[must_use]
    pub const fn hex_size(&self) -> f32 {
        self.hex_size
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::new(34, 29, 30.0)
    }
}

/// Represents the authoritative Hexfield world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: RoundConfig,
    rng: ChaCha8Rng,
    field: Option<PlayingField>,
    characters: Vec<Character>,
    powerups: Vec<Powerup>,
    visible: BTreeSet<HexCoord>,
    phase: TurnPhase,
    outcome: RoundOutcome,
    wave: u32,
    combat_pending: bool,
    journal: Vec<String>,
}

impl World {
    /// Creates a world awaiting its first [`Command::StartRound`].
    #[must_use]
    pub fn new(config: RoundConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            config,
            rng: ChaCha8Rng::seed_from_u64(0),
            field: None,
            characters: Vec::new(),
            powerups: Vec::new(),
            visible: BTreeSet::new(),
            phase: TurnPhase::Player,
            outcome: RoundOutcome::Ongoing,
            wave: 0,
            combat_pending: false,
            journal: Vec::new(),
        }
    }

    fn active_team(&self) -> Team {
        match self.phase {
            TurnPhase::Player => Team::Player,
            TurnPhase::Enemy => Team::Enemy,
        }
    }

    fn character_index(&self, id: CharacterId) -> Option<usize> {
        self.characters
            .iter()
            .position(|character| character.id == id)
    }

    fn living_character_on(&self, hex: HexCoord) -> Option<usize> {
        self.characters
            .iter()
            .position(|character| character.is_alive() && character.position == hex)
    }

    fn is_team_dead(&self, team: Team) -> bool {
        !self
            .characters
            .iter()
            .any(|character| character.team == team && character.is_alive())
    }

    fn team_finished(&self, team: Team) -> bool {
        self.characters
            .iter()
            .filter(|character| character.is_alive() && character.team == team)
            .all(|character| character.action_points == 0 && character.remaining_steps == 0)
    }

    /// Refills action points and clears leftover steps for every living
    /// character, readying the next full turn cycle.
    fn prepare_turn(&mut self) {
        for character in &mut self.characters {
            if !character.is_alive() {
                continue;
            }
            character.remaining_steps = 0;
            character.action_points = MAX_ACTION_POINTS;
        }
    }

    fn spawn_character(
        &mut self,
        archetype: Archetype,
        team: Team,
        at: HexCoord,
        out_events: &mut Vec<Event>,
    ) -> CharacterId {
        let id = CharacterId::new(self.characters.len() as u32);
        self.characters
            .push(Character::spawn(id, archetype, team, at));
        out_events.push(Event::CharacterSpawned {
            character: id,
            archetype,
            team,
            at,
        });
        id
    }

    /// Finds a hex that is walkable, unoccupied, hidden in the fog and at
    /// least [`MIN_SPAWN_DISTANCE`] walking steps from every living
    /// player character.
    fn spawnable_coord(&mut self) -> Result<HexCoord, RoundError> {
        for _ in 0..SPAWN_ATTEMPTS {
            let Some(field) = self.field.as_ref() else {
                break;
            };
            let x = self.rng.gen_range(0..field.width().max(1));
            let y = self.rng.gen_range(0..field.height().max(1));
            let candidate = HexCoord::from_map_coords(x, y);

            if field.tile_at(candidate).is_solid() {
                continue;
            }
            if self.living_character_on(candidate).is_some() {
                continue;
            }
            if self.visible.contains(&candidate) {
                continue;
            }

            let too_close = self
                .characters
                .iter()
                .filter(|character| character.team == Team::Player && character.is_alive())
                .any(|character| {
                    field
                        .distance(character.position, candidate)
                        .map_or(true, |distance| distance < MIN_SPAWN_DISTANCE)
                });
            if too_close {
                continue;
            }

            return Ok(candidate);
        }
        Err(RoundError::SpawnPlacementExhausted {
            attempts: SPAWN_ATTEMPTS,
        })
    }

    fn spawn_wave(&mut self, out_events: &mut Vec<Event>) -> Result<(), RoundError> {
        self.wave += 1;
        self.journal.push(format!("Spawning wave #{}", self.wave));
        let composition = WaveComposition::for_wave(self.wave);
        out_events.push(Event::WaveSpawned {
            wave: self.wave,
            composition,
        });

        for _ in 0..composition.regulars {
            let at = self.spawnable_coord()?;
            let _ = self.spawn_character(Archetype::Regular, Team::Enemy, at, out_events);
        }
        for _ in 0..composition.mothers {
            let at = self.spawnable_coord()?;
            let _ = self.spawn_character(Archetype::Mother, Team::Enemy, at, out_events);
        }
        for _ in 0..composition.snipers {
            let at = self.spawnable_coord()?;
            let _ = self.spawn_character(Archetype::Sniper, Team::Enemy, at, out_events);
        }

        self.prepare_turn();
        Ok(())
    }

    /// Recomputes the set of hexes seen by living player characters. The
    /// per-hex checks are independent, so the result is an
    /// order-insensitive union.
    fn update_fog(&mut self) {
        let Some(field) = self.field.as_ref() else {
            return;
        };
        let viewers: Vec<HexCoord> = self
            .characters
            .iter()
            .filter(|character| character.team == Team::Player && character.is_alive())
            .map(|character| character.position)
            .collect();

        let mut visible = BTreeSet::new();
        for x in 0..field.width() {
            for y in 0..field.height() {
                let hex = HexCoord::from_map_coords(x, y);
                if viewers.iter().any(|viewer| field.line_of_sight(*viewer, hex)) {
                    let _ = visible.insert(hex);
                }
            }
        }
        self.visible = visible;
    }

    fn start_round(&mut self, seed: u64, out_events: &mut Vec<Event>) -> Result<(), RoundError> {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.characters.clear();
        self.powerups.clear();
        self.visible.clear();
        self.journal.clear();
        self.phase = TurnPhase::Player;
        self.outcome = RoundOutcome::Ongoing;
        self.wave = 0;
        self.combat_pending = false;

        let mut map = MapStorage::new(self.config.columns, self.config.rows);
        map.seal_border();
        generator::carve_house(&mut map, &mut self.rng);
        self.field = Some(PlayingField::new(map, self.config.hex_size));

        out_events.push(Event::RoundStarted { seed });
        for _ in 0..2 {
            let at = self.spawnable_coord()?;
            let _ = self.spawn_character(Archetype::Operative, Team::Player, at, out_events);
        }
        self.spawn_wave(out_events)?;
        self.update_fog();
        Ok(())
    }

    fn move_character(&mut self, id: CharacterId, to: HexCoord, out_events: &mut Vec<Event>) {
        if self.outcome != RoundOutcome::Ongoing || self.combat_pending {
            return;
        }
        let Some(field) = self.field.as_ref() else {
            return;
        };
        let Some(index) = self.character_index(id) else {
            return;
        };
        {
            let character = &self.characters[index];
            if !character.is_alive() || character.team != self.active_team() {
                return;
            }
        }
        if field.tile_at(to).is_solid() {
            return;
        }
        if self.living_character_on(to).is_some() {
            return;
        }

        let from = self.characters[index].position;
        let Some(cost) = field.distance(from, to) else {
            return;
        };
        if cost == 0 {
            return;
        }

        {
            let character = &mut self.characters[index];
            if character.remaining_steps == 0 {
                let range = character.range();
                if character.action_points == 0 || cost > range {
                    return;
                }
                character.action_points -= 1;
                character.remaining_steps = range - cost;
            } else {
                if cost > character.remaining_steps {
                    return;
                }
                character.remaining_steps -= cost;
            }
            character.position = to;
        }
        out_events.push(Event::CharacterMoved {
            character: id,
            from,
            to,
            cost,
        });

        if self.characters[index].team == Team::Player {
            self.collect_powerups(index, out_events);
            self.update_fog();
        }
    }

    fn collect_powerups(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let position = self.characters[index].position;
        let mut remaining = Vec::with_capacity(self.powerups.len());
        for powerup in std::mem::take(&mut self.powerups) {
            if powerup.position != position {
                remaining.push(powerup);
                continue;
            }
            let stats = &mut self.characters[index].stats;
            match powerup.kind {
                PowerupKind::Health => stats.hp += powerup.value,
                PowerupKind::Agility => stats.agility += powerup.value,
                PowerupKind::Aim => stats.aim += powerup.value,
                PowerupKind::Damage => stats.damage += powerup.value,
                PowerupKind::Ammo => stats.shots_per_turn += 1,
            }
            out_events.push(Event::PowerupCollected {
                character: self.characters[index].id,
                kind: powerup.kind,
                value: powerup.value,
            });
        }
        self.powerups = remaining;
    }

    fn attack(
        &mut self,
        attacker: CharacterId,
        defender: CharacterId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoundError> {
        if self.outcome != RoundOutcome::Ongoing || self.combat_pending {
            return Ok(());
        }
        let Some(field) = self.field.as_ref() else {
            return Ok(());
        };
        let (Some(attacker_index), Some(defender_index)) =
            (self.character_index(attacker), self.character_index(defender))
        else {
            return Ok(());
        };

        let (from, aim, damage, shots) = {
            let source = &self.characters[attacker_index];
            if !source.is_alive()
                || source.team != self.active_team()
                || source.action_points == 0
            {
                return Ok(());
            }
            (
                source.position,
                source.stats.aim,
                source.stats.damage,
                source.stats.shots_per_turn,
            )
        };
        let (to, defence) = {
            let target = &self.characters[defender_index];
            if !target.is_alive() {
                return Ok(());
            }
            (target.position, target.stats.defence)
        };
        if field.distance(from, to).is_none() {
            return Ok(());
        }

        self.characters[attacker_index].action_points -= 1;

        let chance = combat::hit_chance(field, from, to, aim);
        let mut hits = Vec::with_capacity(shots as usize);
        for _ in 0..shots {
            hits.push(self.rng.gen::<f64>() < chance);
        }
        let hit_count = hits.iter().filter(|hit| **hit).count() as u32;
        let total_damage = hit_count * combat::effective_damage(damage, defence);

        // Stray shots land on whatever stopped them, or beside the target
        // when nothing did.
        let miss_landing = if hits.iter().all(|hit| *hit) {
            None
        } else {
            let blocked = field
                .line_trace(from, to)
                .into_iter()
                .find(|hex| field.tile_at(*hex).is_solid());
            Some(match blocked {
                Some(hex) => hex,
                None => to.neighbors()[self.rng.gen_range(0..6)],
            })
        };

        out_events.push(Event::AttackResolved {
            attacker,
            defender,
            hits,
            damage: total_damage,
            miss_landing,
        });
        if self.characters[attacker_index].team == Team::Player {
            self.combat_pending = true;
        }

        if total_damage > 0 {
            self.attack_direct(attacker_index, defender_index, total_damage, out_events)?;
        } else {
            let shooter = self.characters[attacker_index].archetype.display_name();
            let target = self.characters[defender_index].archetype.display_name();
            self.journal
                .push(format!("{shooter} shot at {target} but missed."));
        }
        Ok(())
    }

    /// Applies direct damage and runs the full death cascade: death hook,
    /// powerup drop, elimination checks and the follow-up wave.
    fn attack_direct(
        &mut self,
        attacker_index: usize,
        defender_index: usize,
        damage: u32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoundError> {
        let attacker_id = self.characters[attacker_index].id;
        let attacker_name = self.characters[attacker_index].archetype.display_name();
        let defender_name = self.characters[defender_index].archetype.display_name();
        self.journal
            .push(format!("{attacker_name} hit {defender_name} for {damage} damage"));

        let dealt = {
            let target = &mut self.characters[defender_index];
            let dealt = target.stats.hp.min(damage);
            target.stats.hp -= dealt;
            dealt
        };
        out_events.push(Event::DamageDealt {
            attacker: attacker_id,
            defender: self.characters[defender_index].id,
            amount: dealt,
        });

        if self.characters[defender_index].is_alive() {
            return Ok(());
        }
        out_events.push(Event::CharacterDied {
            character: self.characters[defender_index].id,
        });

        let deceased = &self.characters[defender_index];
        let team = deceased.team;
        let archetype = deceased.archetype;
        let position = deceased.position;
        if team == Team::Enemy {
            self.journal.push(format!("{defender_name} killed"));
        }

        if archetype == Archetype::Mother {
            let births = self.mother_births(defender_index, true, out_events);
            self.journal.push(format!(
                "But wait - With it's final breath it's spawning {births} more children!"
            ));
        }

        if team == Team::Enemy && self.rng.gen_range(0..2) == 0 {
            let mut value = self.rng.gen_range(1..=archetype.stat_increment_bound());
            let kind = POWERUP_DROP_KINDS[self.rng.gen_range(0..POWERUP_DROP_KINDS.len())];
            match kind {
                PowerupKind::Health => value *= 5,
                PowerupKind::Ammo => value = 1,
                _ => {}
            }
            self.powerups.push(Powerup {
                position,
                kind,
                value,
            });
            out_events.push(Event::PowerupDropped {
                at: position,
                kind,
                value,
            });
        }

        if self.is_team_dead(Team::Player) {
            self.outcome = RoundOutcome::Lost;
            self.journal.push(format!(
                "You were defeated @ wave {}. Rest in Pieces ;)",
                self.wave
            ));
            out_events.push(Event::RoundLost { wave: self.wave });
        } else if self.is_team_dead(Team::Enemy) {
            self.journal
                .push("You defeated this wave, congratulations!".to_owned());
            self.spawn_wave(out_events)?;
        }
        Ok(())
    }

    /// Spawns regular enemies around a mother, each empty walkable
    /// neighbor with independent 30% probability, plus one on her own hex
    /// when she just died. Returns the number of births.
    fn mother_births(
        &mut self,
        mother_index: usize,
        died: bool,
        out_events: &mut Vec<Event>,
    ) -> u32 {
        let position = self.characters[mother_index].position;
        let walkable: Vec<HexCoord> = match self.field.as_ref() {
            Some(field) => position
                .neighbors()
                .into_iter()
                .filter(|hex| !field.tile_at(*hex).is_solid())
                .collect(),
            None => return 0,
        };

        let mut births = 0;
        for hex in walkable {
            if self.living_character_on(hex).is_none() && self.rng.gen::<f64>() < 0.30 {
                let _ = self.spawn_character(Archetype::Regular, Team::Enemy, hex, out_events);
                births += 1;
            }
        }
        if died {
            let _ = self.spawn_character(Archetype::Regular, Team::Enemy, position, out_events);
            births += 1;
        }
        births
    }

    fn melee_strike(
        &mut self,
        attacker: CharacterId,
        defender: CharacterId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoundError> {
        if self.outcome != RoundOutcome::Ongoing || self.combat_pending {
            return Ok(());
        }
        let (Some(attacker_index), Some(defender_index)) =
            (self.character_index(attacker), self.character_index(defender))
        else {
            return Ok(());
        };

        let (position, archetype) = {
            let source = &self.characters[attacker_index];
            if !source.is_alive() || source.team != self.active_team() {
                return Ok(());
            }
            (source.position, source.archetype)
        };
        let damage = archetype.melee_damage();
        if damage == 0 {
            return Ok(());
        }
        {
            let target = &self.characters[defender_index];
            if !target.is_alive() || !position.neighbors().contains(&target.position) {
                return Ok(());
            }
        }

        if archetype == Archetype::Regular {
            let name = archetype.display_name();
            self.journal.push(format!("{name} bites in your foot, ugh!"));
        }
        self.attack_direct(attacker_index, defender_index, damage, out_events)
    }

    fn steady_aim(&mut self, id: CharacterId, out_events: &mut Vec<Event>) {
        if self.outcome != RoundOutcome::Ongoing || self.combat_pending {
            return;
        }
        let Some(index) = self.character_index(id) else {
            return;
        };
        {
            let character = &self.characters[index];
            if !character.is_alive() || character.team != self.active_team() {
                return;
            }
        }

        let character = &mut self.characters[index];
        character.stats.aim += 1;
        let aim = character.stats.aim;
        let name = character.archetype.display_name();
        self.journal
            .push(format!("{name} is aiming for you! Better get behind cover"));
        out_events.push(Event::AimSteadied { character: id, aim });
    }

    fn end_character_turn(&mut self, id: CharacterId, out_events: &mut Vec<Event>) {
        if self.outcome != RoundOutcome::Ongoing || self.phase != TurnPhase::Enemy {
            return;
        }
        let Some(index) = self.character_index(id) else {
            return;
        };
        {
            let character = &self.characters[index];
            if !character.is_alive() || character.team != Team::Enemy {
                return;
            }
        }

        if self.characters[index].archetype == Archetype::Mother && self.rng.gen::<f64>() < 0.10 {
            let births = self.mother_births(index, false, out_events);
            if births > 0 {
                self.journal.push(format!(
                    "Oh oh, the mother is giving birth! {births} children spawned"
                ));
            }
        }
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome != RoundOutcome::Ongoing
            || self.combat_pending
            || self.phase != TurnPhase::Player
            || self.field.is_none()
            || self.is_team_dead(Team::Player)
        {
            return;
        }
        self.journal.push("-------- Next turn --------".to_owned());
        self.phase = TurnPhase::Enemy;
        out_events.push(Event::TurnChanged {
            phase: TurnPhase::Enemy,
        });
    }

    fn finish_enemy_turn(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome != RoundOutcome::Ongoing || self.phase != TurnPhase::Enemy {
            return;
        }
        self.prepare_turn();
        self.phase = TurnPhase::Player;
        out_events.push(Event::TurnChanged {
            phase: TurnPhase::Player,
        });
    }

    /// Hands the turn to the enemy system once every living player
    /// character has exhausted both action points and leftover steps.
    fn auto_end_turn(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome != RoundOutcome::Ongoing
            || self.combat_pending
            || self.phase != TurnPhase::Player
            || self.field.is_none()
            || self.is_team_dead(Team::Player)
        {
            return;
        }
        if self.team_finished(Team::Player) {
            self.end_turn(out_events);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid commands (acting out of turn, overspending action points,
/// moving onto solid terrain, acting while combat resolution is pending)
/// are silent no-ops; only fatal configuration failures surface as errors.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), RoundError> {
    match command {
        Command::StartRound { seed } => world.start_round(seed, out_events)?,
        Command::MoveCharacter { character, to } => world.move_character(character, to, out_events),
        Command::Attack { attacker, defender } => world.attack(attacker, defender, out_events)?,
        Command::MeleeStrike { attacker, defender } => {
            world.melee_strike(attacker, defender, out_events)?;
        }
        Command::SteadyAim { character } => world.steady_aim(character, out_events),
        Command::EndCharacterTurn { character } => world.end_character_turn(character, out_events),
        Command::EndTurn => world.end_turn(out_events),
        Command::FinishEnemyTurn => world.finish_enemy_turn(out_events),
        Command::AcknowledgeCombat => world.combat_pending = false,
    }
    world.auto_end_turn(out_events);
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{PlayingField, World};
    use hexfield_core::hex::HexCoord;
    use hexfield_core::{
        CharacterId, CharacterSnapshot, CharacterView, PowerupSnapshot, RoundOutcome, TurnPhase,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Playing field of the running round, if one was started.
    #[must_use]
    pub fn field(world: &World) -> Option<&PlayingField> {
        world.field.as_ref()
    }

    /// Captures a read-only view of every character in the round.
    #[must_use]
    pub fn character_view(world: &World) -> CharacterView {
        let snapshots: Vec<CharacterSnapshot> = world
            .characters
            .iter()
            .map(super::Character::snapshot)
            .collect();
        CharacterView::from_snapshots(snapshots)
    }

    /// Living character occupying the provided hex, if any.
    #[must_use]
    pub fn character_on(world: &World, hex: HexCoord) -> Option<CharacterId> {
        world
            .living_character_on(hex)
            .map(|index| world.characters[index].id)
    }

    /// Steps the character may still take right now: the leftover of a
    /// move in progress, a whole fresh move if an action point remains,
    /// otherwise zero.
    #[must_use]
    pub fn movement_budget(world: &World, character: CharacterId) -> u32 {
        world
            .character_index(character)
            .map_or(0, |index| world.characters[index].current_range())
    }

    /// Powerups currently lying on the field.
    #[must_use]
    pub fn powerups(world: &World) -> Vec<PowerupSnapshot> {
        world
            .powerups
            .iter()
            .map(|powerup| PowerupSnapshot {
                position: powerup.position,
                kind: powerup.kind,
                value: powerup.value,
            })
            .collect()
    }

    /// Hexes currently seen by the player team, in deterministic order.
    #[must_use]
    pub fn visible_hexes(world: &World) -> Vec<HexCoord> {
        world.visible.iter().copied().collect()
    }

    /// Whether the provided hex is hidden from the player team.
    #[must_use]
    pub fn is_in_fog(world: &World, hex: HexCoord) -> bool {
        !world.visible.contains(&hex)
    }

    /// Phase of the turn state machine.
    #[must_use]
    pub fn phase(world: &World) -> TurnPhase {
        world.phase
    }

    /// Terminal state of the round.
    #[must_use]
    pub fn outcome(world: &World) -> RoundOutcome {
        world.outcome
    }

    /// One-based number of the wave currently being fought.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Whether a published attack outcome still awaits acknowledgement.
    #[must_use]
    pub fn combat_pending(world: &World) -> bool {
        world.combat_pending
    }

    /// Ordered journal of human-readable round happenings.
    #[must_use]
    pub fn journal(world: &World) -> &[String] {
        &world.journal
    }

    /// Probability that `attacker` hits `defender` right now; zero when
    /// either character or the round is missing.
    #[must_use]
    pub fn hit_chance_between(
        world: &World,
        attacker: CharacterId,
        defender: CharacterId,
    ) -> f64 {
        let Some(field) = world.field.as_ref() else {
            return 0.0;
        };
        let (Some(source), Some(target)) = (
            world.character_index(attacker),
            world.character_index(defender),
        ) else {
            return 0.0;
        };
        let source = &world.characters[source];
        let target = &world.characters[target];
        super::combat::hit_chance(field, source.position, target.position, source.stats.aim)
    }
}

/// Test-only constructors for crafting scenario worlds.
#[cfg(feature = "scenario_scaffolding")]
pub mod scaffold {
    use super::{Character, PlayingField, RoundConfig, World, MAX_ACTION_POINTS};
    use crate::map::MapStorage;
    use hexfield_core::hex::HexCoord;
    use hexfield_core::{Archetype, CharacterId, Team, TurnPhase};

    /// Builds a world around an open floor field with a sealed border and
    /// no generated house, ready for hand-placed rosters.
    #[must_use]
    pub fn open_world(columns: i32, rows: i32) -> World {
        let mut world = World::new(RoundConfig::new(columns, rows, 30.0));
        let mut map = MapStorage::new(columns, rows);
        map.seal_border();
        world.field = Some(PlayingField::new(map, 30.0));
        world.wave = 1;
        world
    }

    /// Places a character with full action points at the provided hex.
    pub fn place_character(
        world: &mut World,
        archetype: Archetype,
        team: Team,
        at: HexCoord,
    ) -> CharacterId {
        let id = CharacterId::new(world.characters.len() as u32);
        let mut character = Character::spawn(id, archetype, team, at);
        character.action_points = MAX_ACTION_POINTS;
        world.characters.push(character);
        id
    }

    /// Forces the turn state machine into the provided phase.
    pub fn set_phase(world: &mut World, phase: TurnPhase) {
        world.phase = phase;
    }

    /// Recomputes the fog of war for the current roster.
    pub fn refresh_fog(world: &mut World) {
        world.update_fog();
    }
}
