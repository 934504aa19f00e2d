#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hexfield engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod hex;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hexfield.";

/// Kinds of terrain a single hex can hold.
///
/// `Empty` plays a double role: it is solid (it marks the outside of the
/// building, which nothing may enter) and at the same time transparent
/// (sight lines pass over open ground). Both predicates below are the
/// single source of truth for that duality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Unbuilt ground outside the generated structure.
    Empty,
    /// Walkable interior flooring.
    Floor,
    /// Opaque load-bearing wall.
    ConcreteWall,
    /// Window pane that blocks movement but not sight.
    Glass,
}

impl Tile {
    /// Reports whether characters are barred from entering the tile.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Empty | Self::ConcreteWall | Self::Glass)
    }

    /// Reports whether sight lines pass through the tile.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        matches!(self, Self::Floor | Self::Glass | Self::Empty)
    }
}

/// Allegiance of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Characters controlled by the player.
    Player,
    /// Characters driven by the enemy system.
    Enemy,
}

impl Team {
    /// Returns the opposing allegiance.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Unique identifier assigned to a character for the duration of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(u32);

impl CharacterId {
    /// Creates a new character identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Combat statistics carried by every character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Accuracy factor feeding the hit-chance formula.
    pub aim: u32,
    /// Mobility factor feeding the movement-range formula.
    pub agility: u32,
    /// Raw damage dealt per successful hit, before defence.
    pub damage: u32,
    /// Remaining health; the character is alive while this exceeds zero.
    pub hp: u32,
    /// Flat reduction subtracted from every incoming hit.
    pub defence: u32,
    /// Number of independent shots fired per ranged attack.
    pub shots_per_turn: u32,
}

/// Character templates with fixed base statistics and capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Player-team soldier.
    Operative,
    /// Common melee enemy.
    Regular,
    /// Durable enemy that births more regulars.
    Mother,
    /// Fragile enemy with extreme accuracy.
    Sniper,
}

impl Archetype {
    /// Display name used by the journal.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Operative => "Player",
            Self::Regular => "Weakling",
            Self::Mother => "The Mother",
            Self::Sniper => "Sniper",
        }
    }

    /// Statistics a freshly spawned character of this archetype starts with.
    #[must_use]
    pub const fn base_stats(self) -> Stats {
        match self {
            Self::Operative => Stats {
                aim: 10,
                agility: 10,
                damage: 5,
                hp: 50,
                defence: 3,
                shots_per_turn: 2,
            },
            Self::Regular => Stats {
                aim: 0,
                agility: 2,
                damage: 5,
                hp: 5,
                defence: 3,
                shots_per_turn: 1,
            },
            Self::Mother => Stats {
                aim: 1,
                agility: 2,
                damage: 10,
                hp: 150,
                defence: 1,
                shots_per_turn: 5,
            },
            Self::Sniper => Stats {
                aim: 30,
                agility: 1,
                damage: 20,
                hp: 1,
                defence: 3,
                shots_per_turn: 1,
            },
        }
    }

    /// Whether the archetype's combat policy attempts ranged attacks.
    #[must_use]
    pub const fn can_ranged(self) -> bool {
        matches!(self, Self::Operative | Self::Sniper)
    }

    /// Whether the archetype's combat policy seeks melee strikes.
    #[must_use]
    pub const fn can_melee(self) -> bool {
        matches!(self, Self::Operative | Self::Regular)
    }

    /// Direct damage dealt by a melee strike from this archetype.
    #[must_use]
    pub const fn melee_damage(self) -> u32 {
        match self {
            Self::Regular | Self::Operative => 5,
            Self::Mother | Self::Sniper => 0,
        }
    }

    /// Inclusive upper bound for the archetype's random stat increments,
    /// used when sizing the powerups it drops.
    #[must_use]
    pub const fn stat_increment_bound(self) -> u32 {
        match self {
            Self::Operative | Self::Regular => 2,
            Self::Sniper => 5,
            Self::Mother => 20,
        }
    }
}

/// Stat-boosting item dropped by dying enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Restores hit points.
    Health,
    /// Raises the agility stat.
    Agility,
    /// Raises the aim stat.
    Aim,
    /// Raises the damage stat.
    Damage,
    /// Grants one additional shot per ranged attack.
    Ammo,
}

/// Identifies which team is currently taking actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The player team acts.
    Player,
    /// The enemy system acts.
    Enemy,
}

/// Terminal state of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The round is still being played.
    Ongoing,
    /// Every player-team character died.
    Lost,
}

/// Enemy counts spawned at the start of a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveComposition {
    /// Number of `Regular` enemies.
    pub regulars: u32,
    /// Number of `Mother` enemies.
    pub mothers: u32,
    /// Number of `Sniper` enemies.
    pub snipers: u32,
}

impl WaveComposition {
    /// Computes the roster for the given one-based wave number.
    #[must_use]
    pub const fn for_wave(wave: u32) -> Self {
        Self {
            regulars: wave * 3,
            mothers: wave / 4,
            snipers: wave / 3,
        }
    }

    /// Total number of enemies in the wave.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.regulars + self.mothers + self.snipers
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Regenerates the map, places the player team and spawns the first wave.
    StartRound {
        /// Seed for the round's deterministic random number generator.
        seed: u64,
    },
    /// Requests that a character walk to the provided destination.
    MoveCharacter {
        /// Identifier of the character attempting to move.
        character: CharacterId,
        /// Hex the character should end up on.
        to: HexCoord,
    },
    /// Requests a ranged attack between two characters.
    Attack {
        /// Identifier of the attacking character.
        attacker: CharacterId,
        /// Identifier of the character under fire.
        defender: CharacterId,
    },
    /// Requests an adjacent melee strike between two characters.
    MeleeStrike {
        /// Identifier of the striking character.
        attacker: CharacterId,
        /// Identifier of the character being struck.
        defender: CharacterId,
    },
    /// Requests that a character spend its action steadying its aim.
    SteadyAim {
        /// Identifier of the character taking aim.
        character: CharacterId,
    },
    /// Marks a single character's turn as finished, firing its end-of-turn
    /// behaviour.
    EndCharacterTurn {
        /// Identifier of the character whose turn ended.
        character: CharacterId,
    },
    /// Ends the player phase and hands control to the enemy system.
    EndTurn,
    /// Ends the enemy phase, refreshing action points for all living
    /// characters.
    FinishEnemyTurn,
    /// Confirms that a published attack outcome has been presented,
    /// unblocking further commands.
    AcknowledgeCombat,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh round began.
    RoundStarted {
        /// Seed the round was generated from.
        seed: u64,
    },
    /// Announces that a wave of enemies was spawned.
    WaveSpawned {
        /// One-based wave number.
        wave: u32,
        /// Enemy counts that were placed.
        composition: WaveComposition,
    },
    /// Confirms that a character entered the round.
    CharacterSpawned {
        /// Identifier assigned to the character.
        character: CharacterId,
        /// Template the character was built from.
        archetype: Archetype,
        /// Allegiance of the character.
        team: Team,
        /// Hex the character occupies after spawning.
        at: HexCoord,
    },
    /// Confirms that a character moved between two hexes.
    CharacterMoved {
        /// Identifier of the character that moved.
        character: CharacterId,
        /// Hex the character occupied before moving.
        from: HexCoord,
        /// Hex the character occupies after moving.
        to: HexCoord,
        /// Path distance covered by the move.
        cost: u32,
    },
    /// Announces that a dying enemy left a powerup behind.
    PowerupDropped {
        /// Hex the powerup landed on.
        at: HexCoord,
        /// Kind of boost the powerup grants.
        kind: PowerupKind,
        /// Magnitude of the boost.
        value: u32,
    },
    /// Confirms that a character collected a powerup.
    PowerupCollected {
        /// Identifier of the collecting character.
        character: CharacterId,
        /// Kind of boost that was granted.
        kind: PowerupKind,
        /// Magnitude of the boost.
        value: u32,
    },
    /// Publishes the complete outcome of a ranged attack.
    ///
    /// The outcome is immutable once emitted; adapters replay it at their
    /// own pace and then acknowledge via [`Command::AcknowledgeCombat`].
    AttackResolved {
        /// Identifier of the attacking character.
        attacker: CharacterId,
        /// Identifier of the character under fire.
        defender: CharacterId,
        /// Outcome of each Bernoulli shot, in firing order.
        hits: Vec<bool>,
        /// Total damage applied to the defender.
        damage: u32,
        /// Hex where stray shots land, present when at least one shot missed.
        miss_landing: Option<HexCoord>,
    },
    /// Reports damage applied to a character.
    DamageDealt {
        /// Identifier of the character that dealt the damage.
        attacker: CharacterId,
        /// Identifier of the character that took the damage.
        defender: CharacterId,
        /// Hit points removed, after defence and hp clamping.
        amount: u32,
    },
    /// Confirms that a character spent its action steadying its aim.
    AimSteadied {
        /// Identifier of the character that took aim.
        character: CharacterId,
        /// Aim value after the adjustment.
        aim: u32,
    },
    /// Announces that a character's hit points reached zero.
    CharacterDied {
        /// Identifier of the character that died.
        character: CharacterId,
    },
    /// Announces that the active phase flipped.
    TurnChanged {
        /// Phase that became active.
        phase: TurnPhase,
    },
    /// Announces that the player team was wiped out.
    RoundLost {
        /// Wave number the round ended on.
        wave: u32,
    },
}

/// Immutable representation of a single character's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterSnapshot {
    /// Identifier assigned to the character.
    pub id: CharacterId,
    /// Template the character was built from.
    pub archetype: Archetype,
    /// Allegiance of the character.
    pub team: Team,
    /// Hex the character currently occupies.
    pub position: HexCoord,
    /// Current statistics, including any collected boosts.
    pub stats: Stats,
    /// Whether the character still has hit points.
    pub alive: bool,
    /// Unspent action points for the current turn.
    pub action_points: u32,
    /// Steps left in a move that already paid its action point.
    pub remaining_steps: u32,
}

/// Read-only view over all characters in the round.
#[derive(Clone, Debug, Default)]
pub struct CharacterView {
    snapshots: Vec<CharacterSnapshot>,
}

impl CharacterView {
    /// Creates a new character view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CharacterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &CharacterSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CharacterSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single powerup lying on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerupSnapshot {
    /// Hex the powerup rests on.
    pub position: HexCoord,
    /// Kind of boost the powerup grants.
    pub kind: PowerupKind,
    /// Magnitude of the boost.
    pub value: u32,
}

#[cfg(test)]
mod tests {
    use super::{
        Archetype, CharacterId, CharacterSnapshot, PowerupKind, Stats, Team, Tile,
        WaveComposition,
    };
    use crate::hex::HexCoord;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn empty_is_both_solid_and_transparent() {
        assert!(Tile::Empty.is_solid());
        assert!(Tile::Empty.is_transparent());
    }

    #[test]
    fn glass_blocks_movement_but_not_sight() {
        assert!(Tile::Glass.is_solid());
        assert!(Tile::Glass.is_transparent());
        assert!(!Tile::Floor.is_solid());
        assert!(Tile::Floor.is_transparent());
        assert!(Tile::ConcreteWall.is_solid());
        assert!(!Tile::ConcreteWall.is_transparent());
    }

    #[test]
    fn wave_four_composition_matches_formula() {
        let composition = WaveComposition::for_wave(4);
        assert_eq!(composition.regulars, 12);
        assert_eq!(composition.mothers, 1);
        assert_eq!(composition.snipers, 1);
        assert_eq!(composition.total(), 14);
    }

    #[test]
    fn archetype_capabilities_separate_ranged_and_melee() {
        assert!(Archetype::Sniper.can_ranged());
        assert!(!Archetype::Sniper.can_melee());
        assert!(Archetype::Regular.can_melee());
        assert!(!Archetype::Regular.can_ranged());
        assert!(!Archetype::Mother.can_ranged());
        assert!(!Archetype::Mother.can_melee());
    }

    #[test]
    fn base_stats_match_archetype_table() {
        let operative = Archetype::Operative.base_stats();
        assert_eq!(operative.hp, 50);
        assert_eq!(operative.shots_per_turn, 2);
        let sniper = Archetype::Sniper.base_stats();
        assert_eq!(sniper.aim, 30);
        assert_eq!(sniper.hp, 1);
    }

    #[test]
    fn character_views_sort_by_identifier() {
        let snapshot = |value: u32| CharacterSnapshot {
            id: CharacterId::new(value),
            archetype: Archetype::Regular,
            team: Team::Enemy,
            position: HexCoord::new(0, 0),
            stats: Archetype::Regular.base_stats(),
            alive: true,
            action_points: 2,
            remaining_steps: 0,
        };
        let view = super::CharacterView::from_snapshots(vec![snapshot(2), snapshot(0)]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn character_id_round_trips_through_bincode() {
        assert_round_trip(&CharacterId::new(42));
    }

    #[test]
    fn hex_coord_round_trips_through_bincode() {
        assert_round_trip(&HexCoord::new(-7, 13));
    }

    #[test]
    fn stats_round_trip_through_bincode() {
        assert_round_trip(&Stats {
            aim: 1,
            agility: 2,
            damage: 3,
            hp: 4,
            defence: 5,
            shots_per_turn: 6,
        });
    }

    #[test]
    fn powerup_kind_round_trips_through_bincode() {
        assert_round_trip(&PowerupKind::Ammo);
    }
}
