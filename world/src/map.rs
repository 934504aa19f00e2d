//! Skewed rectangular tile storage backing the playing field.

use hexfield_core::hex::{half_round, HexCoord};
use hexfield_core::Tile;

/// Grid of tiles addressed through square map coordinates.
///
/// The grid stores a `width` by `height` parallelogram of hexes. A square
/// coordinate `(x, y)` lands on storage column
/// `x + round(height / 2) - round(y / 2)` and row `y`, which keeps every
/// hex row contiguous in memory despite the axial skew. Reads outside the
/// stored area resolve to [`Tile::Empty`]; writes outside it are ignored.
#[derive(Clone, Debug)]
pub struct MapStorage {
    width: i32,
    height: i32,
    columns: i32,
    tiles: Vec<Tile>,
}

impl MapStorage {
    /// Creates a storage whose valid parallelogram is filled with floor and
    /// whose remaining slack columns stay empty.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let columns = width + half_round(height);
        let capacity = (columns as usize) * (height as usize);
        let mut storage = Self {
            width,
            height,
            columns,
            tiles: vec![Tile::Empty; capacity],
        };
        for y in 0..height {
            for x in 0..width {
                storage.set_tile(x, y, Tile::Floor);
            }
        }
        storage
    }

    /// Number of hex columns in the valid map area.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of hex rows in the valid map area.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Stamps a concrete wall around the square-coordinate rim of the map.
    pub fn seal_border(&mut self) {
        for x in 0..self.width {
            for y in 0..self.height {
                if x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1 {
                    self.set_tile(x, y, Tile::ConcreteWall);
                }
            }
        }
    }

    /// Writes a tile at the provided square coordinates, ignoring writes
    /// that fall outside the stored area.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(index) = self.storage_index(x, y) {
            self.tiles[index] = tile;
        }
    }

    /// Reads the tile at the provided square coordinates, defaulting to
    /// [`Tile::Empty`] outside the stored area.
    #[must_use]
    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        self.storage_index(x, y)
            .map_or(Tile::Empty, |index| self.tiles[index])
    }

    /// Reads the tile under an axial hex coordinate.
    #[must_use]
    pub fn get_tile_hex(&self, hex: HexCoord) -> Tile {
        let (x, y) = hex.to_map_coords();
        self.get_tile(x, y)
    }

    fn storage_index(&self, x: i32, y: i32) -> Option<usize> {
        let column = x + half_round(self.height) - half_round(y);
        if column >= 0 && column < self.columns && y >= 0 && y < self.height {
            Some((column as usize) * (self.height as usize) + y as usize)
        } else {
            None
        }
    }
}
