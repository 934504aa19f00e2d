//! Characters and powerups living inside a round.

use hexfield_core::hex::HexCoord;
use hexfield_core::{Archetype, CharacterId, CharacterSnapshot, PowerupKind, Stats, Team};

/// Turn budget shared by every archetype.
pub(crate) const MAX_ACTION_POINTS: u32 = 2;

#[derive(Clone, Debug)]
pub(crate) struct Character {
    pub(crate) id: CharacterId,
    pub(crate) archetype: Archetype,
    pub(crate) team: Team,
    pub(crate) position: HexCoord,
    pub(crate) stats: Stats,
    pub(crate) action_points: u32,
    pub(crate) remaining_steps: u32,
}

impl Character {
    /// Spawns a character with its archetype's base statistics and an
    /// empty turn budget; the budget fills when a turn is prepared.
    pub(crate) fn spawn(id: CharacterId, archetype: Archetype, team: Team, at: HexCoord) -> Self {
        Self {
            id,
            archetype,
            team,
            position: at,
            stats: archetype.base_stats(),
            action_points: 0,
            remaining_steps: 0,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    /// Full movement range granted by one action point.
    pub(crate) fn range(&self) -> u32 {
        movement_range(self.stats.agility)
    }

    /// Steps the character may still take right now: the leftover of a
    /// move in progress, a whole fresh move if an action point remains,
    /// otherwise nothing.
    pub(crate) fn current_range(&self) -> u32 {
        if self.remaining_steps > 0 {
            self.remaining_steps
        } else if self.action_points > 0 {
            self.range()
        } else {
            0
        }
    }

    pub(crate) fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            id: self.id,
            archetype: self.archetype,
            team: self.team,
            position: self.position,
            stats: self.stats,
            alive: self.is_alive(),
            action_points: self.action_points,
            remaining_steps: self.remaining_steps,
        }
    }
}

/// Movement range derived from agility: `round(1 + agility / 4)`.
#[must_use]
pub fn movement_range(agility: u32) -> u32 {
    (1.0 + f64::from(agility) * 0.25).round() as u32
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Powerup {
    pub(crate) position: HexCoord,
    pub(crate) kind: PowerupKind,
    pub(crate) value: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_range_follows_agility() {
        assert_eq!(movement_range(0), 1);
        assert_eq!(movement_range(1), 1);
        assert_eq!(movement_range(2), 2); // rounds half up
        assert_eq!(movement_range(10), 4);
    }

    #[test]
    fn current_range_prefers_a_move_in_progress() {
        let mut character = Character::spawn(
            CharacterId::new(0),
            Archetype::Operative,
            Team::Player,
            HexCoord::new(0, 0),
        );
        assert_eq!(character.current_range(), 0);

        character.action_points = 2;
        assert_eq!(character.current_range(), character.range());

        character.remaining_steps = 1;
        assert_eq!(character.current_range(), 1);
    }

    #[test]
    fn characters_die_at_zero_hp() {
        let mut character = Character::spawn(
            CharacterId::new(3),
            Archetype::Sniper,
            Team::Enemy,
            HexCoord::new(1, 1),
        );
        assert!(character.is_alive());
        character.stats.hp = 0;
        assert!(!character.is_alive());
    }
}
