//! Axial hexagon geometry shared by the world and its systems.
//!
//! Hexes are addressed by axial `(q, r)` pairs. The map itself stores
//! tiles in a skewed rectangle, so this module also carries the
//! conversions between axial space, the square map coordinates used by
//! storage and generation, and pixel space used by adapters.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Offsets of the six hexes adjacent to any axial coordinate, in the
/// canonical order used by pathfinding, birth placement and tests.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] =
    [(1, 0), (-1, 0), (1, -1), (-1, 1), (0, -1), (0, 1)];

/// Rounds `value / 2` toward positive infinity on ties.
///
/// Both the map-coordinate conversions and the storage skew rely on this
/// exact rounding convention; using a different tie-break breaks the
/// round-trip between the two coordinate systems.
#[must_use]
pub const fn half_round(value: i32) -> i32 {
    (value + 1).div_euclid(2)
}

/// Axial address of a single hexagon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    q: i32,
    r: i32,
}

impl HexCoord {
    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column component of the axial pair.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row component of the axial pair.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// The six adjacent hexes in [`NEIGHBOR_OFFSETS`] order.
    #[must_use]
    pub fn neighbors(&self) -> [HexCoord; 6] {
        NEIGHBOR_OFFSETS.map(|(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
    }

    /// Converts the hex into square map coordinates used by tile storage.
    #[must_use]
    pub const fn to_map_coords(&self) -> (i32, i32) {
        (self.q + half_round(self.r), self.r)
    }

    /// Reconstructs the hex addressed by the given square map coordinates.
    #[must_use]
    pub const fn from_map_coords(x: i32, y: i32) -> Self {
        Self::new(x - half_round(y), y)
    }

    /// Converts the hex center into pixel space for a pointy-top hex whose
    /// center-to-edge distance is `size`.
    #[must_use]
    pub fn to_pixel(&self, size: f32) -> PixelPoint {
        let long = size / (30.0_f32).to_radians().cos();
        PixelPoint::new(
            self.q as f32 * size + (self.r as f32 * size / 2.0).round(),
            self.r as f32 * (3.0 * long / 4.0),
        )
    }

    /// Grid distance between two hexes on an unobstructed field.
    #[must_use]
    pub fn grid_distance(&self, other: HexCoord) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).unsigned_abs();
        (dq + dr + ds) / 2
    }

    /// Packs both components into a single lossless integer key.
    ///
    /// `q` occupies the high 32 bits and `r` the low 32 bits, two's
    /// complement. The supported range is therefore the full `i32` domain
    /// on both axes; this widens the 16-bit packing of earlier revisions,
    /// which overflowed for |r| >= 2^15.
    #[must_use]
    pub const fn packed(&self) -> u64 {
        ((self.q as u32 as u64) << 32) | (self.r as u32 as u64)
    }

    /// Reverses [`HexCoord::packed`].
    #[must_use]
    pub const fn from_packed(key: u64) -> Self {
        Self::new((key >> 32) as u32 as i32, key as u32 as i32)
    }
}

impl Hash for HexCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.packed().hash(state);
    }
}

/// Fractional axial coordinate produced while interpolating lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractionalHex {
    q: f64,
    r: f64,
}

impl FractionalHex {
    /// Creates a fractional axial coordinate.
    #[must_use]
    pub const fn new(q: f64, r: f64) -> Self {
        Self { q, r }
    }

    /// Rounds to the nearest valid hex using the cube rounding rule.
    ///
    /// The candidate `q`, `r` and the implied `s = -q - r` are rounded
    /// independently; whichever carries the largest rounding error is then
    /// recomputed from the other two so that `q + r + s` stays zero. `s`
    /// only exists to pick the correction target and is never stored.
    #[must_use]
    pub fn round(&self) -> HexCoord {
        let s = -self.q - self.r;
        let mut q = self.q.round();
        let mut r = self.r.round();
        let z = s.round();

        let dq = (self.q - q).abs();
        let dr = (self.r - r).abs();
        let dz = (s - z).abs();

        if dq > dr && dq > dz {
            q = -r - z;
        } else if dr > dz {
            r = -q - z;
        }
        // Correcting s would be discarded anyway.

        HexCoord::new(q as i32, r as i32)
    }
}

impl From<HexCoord> for FractionalHex {
    fn from(hex: HexCoord) -> Self {
        Self::new(f64::from(hex.q()), f64::from(hex.r()))
    }
}

/// Point in pixel space used when exchanging positions with adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    /// Horizontal pixel offset.
    pub x: f32,
    /// Vertical pixel offset.
    pub y: f32,
}

impl PixelPoint {
    /// Creates a pixel point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
