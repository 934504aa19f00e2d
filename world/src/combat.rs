//! Pure combat arithmetic shared by the resolver and the enemy system.

use hexfield_core::hex::HexCoord;

use crate::field::PlayingField;

/// Damage that survives the defender's flat reduction.
#[must_use]
pub fn effective_damage(damage: u32, defence: u32) -> u32 {
    damage.saturating_sub(defence)
}

/// Chance attenuated by the number of traced hexes and scaled by aim.
///
/// Each traced hex multiplies by 0.9; the result is scaled by `aim / 10`,
/// rounded to two decimals and clamped to the unit interval. High-aim
/// archetypes saturate at 1.0 over short traces.
#[must_use]
pub fn scaled_chance(traced_hexes: usize, aim: u32) -> f64 {
    let attenuated = 0.9_f64.powi(traced_hexes as i32) * f64::from(aim) / 10.0;
    ((attenuated * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

/// Probability that a shot from `from` hits a target on `to`.
///
/// Zero whenever the trace crosses a solid hex (no line of fire, and
/// windows stop bullets even though they pass sight).
#[must_use]
pub fn hit_chance(field: &PlayingField, from: HexCoord, to: HexCoord, aim: u32) -> f64 {
    let trace = field.line_trace(from, to);
    if trace.iter().any(|hex| field.tile_at(*hex).is_solid()) {
        return 0.0;
    }
    scaled_chance(trace.len(), aim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapStorage;
    use hexfield_core::Tile;

    #[test]
    fn effective_damage_floors_at_zero() {
        assert_eq!(effective_damage(10, 3), 7);
        assert_eq!(effective_damage(10, 12), 0);
        assert_eq!(effective_damage(10, 10), 0);
    }

    #[test]
    fn unobstructed_chance_with_full_aim_is_certain() {
        assert_eq!(scaled_chance(0, 10), 1.0);
    }

    #[test]
    fn three_hex_trace_with_aim_five_rounds_to_point_thirty_six() {
        // 0.9^3 * 0.5 = 0.3645, rounded to two decimals.
        assert_eq!(scaled_chance(3, 5), 0.36);
    }

    #[test]
    fn chance_decreases_with_trace_length_and_scales_with_aim() {
        for hexes in 1..12 {
            assert!(scaled_chance(hexes + 1, 8) < scaled_chance(hexes, 8));
        }
        assert!(scaled_chance(4, 10) > scaled_chance(4, 5));
    }

    #[test]
    fn extreme_aim_clamps_to_certainty() {
        assert_eq!(scaled_chance(2, 30), 1.0);
    }

    #[test]
    fn solid_hexes_on_the_trace_zero_the_chance() {
        let mut map = MapStorage::new(7, 3);
        map.set_tile(3, 1, Tile::ConcreteWall);
        let field = PlayingField::new(map, 30.0);
        let from = hexfield_core::hex::HexCoord::from_map_coords(1, 1);
        let to = hexfield_core::hex::HexCoord::from_map_coords(5, 1);
        assert_eq!(hit_chance(&field, from, to, 10), 0.0);

        let mut glazed = MapStorage::new(7, 3);
        glazed.set_tile(3, 1, Tile::Glass);
        let glazed = PlayingField::new(glazed, 30.0);
        assert_eq!(hit_chance(&glazed, from, to, 10), 0.0);
    }

    #[test]
    fn open_traces_attenuate_per_hex() {
        let field = PlayingField::new(MapStorage::new(7, 3), 30.0);
        let from = hexfield_core::hex::HexCoord::from_map_coords(1, 1);
        let to = hexfield_core::hex::HexCoord::from_map_coords(3, 1);
        let traced = field.line_trace(from, to).len();
        assert_eq!(traced, 3);
        assert_eq!(hit_chance(&field, from, to, 10), scaled_chance(traced, 10));
    }
}
