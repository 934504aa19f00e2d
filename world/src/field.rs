//! Playing field queries: pathfinding, sight lines and pixel conversions.

use std::collections::{BTreeMap, HashMap, VecDeque};

use hexfield_core::hex::{FractionalHex, HexCoord, PixelPoint};
use hexfield_core::Tile;

use crate::map::MapStorage;

const LINE_SAMPLES: i32 = 50;

/// Hex battlefield owning the generated map.
///
/// The map is written only while a round is generated; afterwards the
/// field exposes read-only queries. Pathfinding is a plain breadth-first
/// search, which is exact here because every step costs one.
#[derive(Clone, Debug)]
pub struct PlayingField {
    map: MapStorage,
    hex_size: f32,
}

impl PlayingField {
    /// Wraps a generated map together with the hex pixel size.
    #[must_use]
    pub fn new(map: MapStorage, hex_size: f32) -> Self {
        Self { map, hex_size }
    }

    /// Number of hex columns on the field.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.map.width()
    }

    /// Number of hex rows on the field.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.map.height()
    }

    /// Center-to-edge distance of a rendered hex, in pixels.
    #[must_use]
    pub fn hex_size(&self) -> f32 {
        self.hex_size
    }

    /// Tile under the provided hex.
    #[must_use]
    pub fn tile_at(&self, hex: HexCoord) -> Tile {
        self.map.get_tile_hex(hex)
    }

    /// Tile at the provided square map coordinates.
    #[must_use]
    pub fn tile_at_map_coords(&self, x: i32, y: i32) -> Tile {
        self.map.get_tile(x, y)
    }

    /// Hexes crossed by the straight segment between two hex centers.
    ///
    /// The segment is sampled at 50 equally spaced fractional points, each
    /// rounded to its hex; consecutive duplicates are suppressed, repeated
    /// visits are not. `line_trace(a, a)` is `[a]`.
    #[must_use]
    pub fn line_trace(&self, from: HexCoord, to: HexCoord) -> Vec<HexCoord> {
        let step_q = f64::from(to.q() - from.q()) / f64::from(LINE_SAMPLES);
        let step_r = f64::from(to.r() - from.r()) / f64::from(LINE_SAMPLES);

        let mut traced = Vec::new();
        for i in 0..LINE_SAMPLES {
            let sample = FractionalHex::new(
                f64::from(from.q()) + step_q * f64::from(i),
                f64::from(from.r()) + step_r * f64::from(i),
            )
            .round();
            if traced.last() != Some(&sample) {
                traced.push(sample);
            }
        }
        traced
    }

    /// Whether an unbroken sight line connects the two hexes.
    #[must_use]
    pub fn line_of_sight(&self, from: HexCoord, to: HexCoord) -> bool {
        if from == to {
            return true;
        }
        self.line_trace(from, to)
            .into_iter()
            .all(|hex| self.tile_at(hex).is_transparent())
    }

    /// Breadth-first path costs from the origin over non-solid hexes.
    ///
    /// The origin itself carries cost 0 even when its own tile is solid; a
    /// hex is reachable iff it appears as a key.
    #[must_use]
    pub fn shortest_path_distances(&self, from: HexCoord) -> HashMap<HexCoord, u32> {
        let mut costs = HashMap::new();
        let _ = costs.insert(from, 0);

        let mut frontier = VecDeque::new();
        frontier.push_back(from);
        while let Some(node) = frontier.pop_front() {
            let node_cost = costs[&node];
            for neighbor in node.neighbors() {
                if self.tile_at(neighbor).is_solid() {
                    continue;
                }
                if !costs.contains_key(&neighbor) {
                    let _ = costs.insert(neighbor, node_cost + 1);
                    frontier.push_back(neighbor);
                }
            }
        }
        costs
    }

    /// Path distance between two hexes, or `None` when unreachable.
    #[must_use]
    pub fn distance(&self, from: HexCoord, to: HexCoord) -> Option<u32> {
        self.shortest_path_distances(from).get(&to).copied()
    }

    /// Hexes within the given path distance of the origin, keyed by cost.
    ///
    /// Scans a bounding box twice the range wide; the slack absorbs the
    /// skew between axial and square coordinates. The `BTreeMap` keeps
    /// iteration order deterministic for callers that pick among entries.
    #[must_use]
    pub fn reachable_fields(&self, origin: HexCoord, max_range: u32) -> BTreeMap<HexCoord, u32> {
        let distances = self.shortest_path_distances(origin);
        let span = max_range as i32 * 2;

        let mut reachable = BTreeMap::new();
        for q in (origin.q() - span)..=(origin.q() + span) {
            for r in (origin.r() - span)..=(origin.r() + span) {
                let hex = HexCoord::new(q, r);
                if let Some(&cost) = distances.get(&hex) {
                    if cost <= max_range {
                        let _ = reachable.insert(hex, cost);
                    }
                }
            }
        }
        reachable
    }

    /// Converts a hex center to pixel space, including the rendering
    /// margin that keeps the top-left hex fully on screen.
    #[must_use]
    pub fn to_pixel(&self, hex: HexCoord) -> PixelPoint {
        let point = hex.to_pixel(self.hex_size);
        PixelPoint::new(
            point.x + self.hex_size,
            point.y + self.long_hex_size() / 2.0,
        )
    }

    /// Nearest hex for a pixel position; the exact inverse of
    /// [`PlayingField::to_pixel`] at every hex center.
    #[must_use]
    pub fn from_pixel(&self, point: PixelPoint) -> HexCoord {
        let long = f64::from(self.long_hex_size());
        let size = f64::from(self.hex_size);
        let x = f64::from(point.x - self.hex_size);
        let y = f64::from(point.y) - long / 2.0;

        let r = y / (3.0 * long / 4.0);
        let q = (x - r * size / 2.0) / size;
        FractionalHex::new(q, r).round()
    }

    fn long_hex_size(&self) -> f32 {
        self.hex_size / (30.0_f32).to_radians().cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfield_core::Tile;

    fn open_field(width: i32, height: i32) -> PlayingField {
        PlayingField::new(MapStorage::new(width, height), 30.0)
    }

    fn walled_field(width: i32, height: i32, walls: &[(i32, i32)]) -> PlayingField {
        let mut map = MapStorage::new(width, height);
        for (x, y) in walls {
            map.set_tile(*x, *y, Tile::ConcreteWall);
        }
        PlayingField::new(map, 30.0)
    }

    #[test]
    fn trace_of_a_hex_onto_itself_is_the_hex() {
        let field = open_field(5, 5);
        let hex = HexCoord::from_map_coords(2, 2);
        assert_eq!(field.line_trace(hex, hex), vec![hex]);
        assert!(field.line_of_sight(hex, hex));
    }

    #[test]
    fn trace_between_neighbors_covers_both_hexes() {
        let field = open_field(5, 5);
        let a = HexCoord::from_map_coords(1, 2);
        let b = HexCoord::from_map_coords(2, 2);
        assert_eq!(field.line_trace(a, b), vec![a, b]);
    }

    #[test]
    fn walls_break_line_of_sight_but_glass_does_not() {
        let field = walled_field(7, 3, &[(3, 1)]);
        let left = HexCoord::from_map_coords(1, 1);
        let right = HexCoord::from_map_coords(5, 1);
        assert!(!field.line_of_sight(left, right));

        let mut map = MapStorage::new(7, 3);
        map.set_tile(3, 1, Tile::Glass);
        let glazed = PlayingField::new(map, 30.0);
        assert!(glazed.line_of_sight(left, right));
    }

    #[test]
    fn path_costs_start_at_zero_and_match_grid_distance_on_open_ground() {
        let field = open_field(5, 5);
        let origin = HexCoord::from_map_coords(2, 2);
        let costs = field.shortest_path_distances(origin);

        assert_eq!(costs[&origin], 0);
        assert_eq!(costs.len(), 25);
        for y in 0..5 {
            for x in 0..5 {
                let hex = HexCoord::from_map_coords(x, y);
                assert_eq!(costs[&hex], origin.grid_distance(hex), "({x}, {y})");
            }
        }
    }

    #[test]
    fn walls_reroute_paths() {
        // A wall column with a single gap forces a detour.
        let field = walled_field(5, 5, &[(2, 0), (2, 1), (2, 3), (2, 4)]);
        let from = HexCoord::from_map_coords(0, 0);
        let to = HexCoord::from_map_coords(4, 0);
        let direct = HexCoord::from_map_coords(0, 0)
            .grid_distance(HexCoord::from_map_coords(4, 0));
        let routed = field.distance(from, to).expect("gap keeps the map connected");
        assert!(routed > direct);
    }

    #[test]
    fn unreachable_hexes_are_absent() {
        let field = walled_field(5, 1, &[(2, 0)]);
        let from = HexCoord::from_map_coords(0, 0);
        let to = HexCoord::from_map_coords(4, 0);
        assert_eq!(field.distance(from, to), None);
    }

    #[test]
    fn reachable_fields_match_distance_filter_and_are_idempotent() {
        let field = open_field(9, 9);
        let origin = HexCoord::from_map_coords(4, 4);
        let first = field.reachable_fields(origin, 2);
        let second = field.reachable_fields(origin, 2);
        assert_eq!(first, second);

        // A range-2 disk on an open hex grid holds 19 hexes.
        assert_eq!(first.len(), 19);
        for (hex, cost) in &first {
            assert_eq!(field.distance(origin, *hex), Some(*cost));
            assert!(*cost <= 2);
        }
    }

    #[test]
    fn pixel_conversions_invert_each_other_for_every_field_hex() {
        let field = open_field(12, 10);
        for y in 0..10 {
            for x in 0..12 {
                let hex = HexCoord::from_map_coords(x, y);
                assert_eq!(field.from_pixel(field.to_pixel(hex)), hex, "({x}, {y})");
            }
        }
    }
}
