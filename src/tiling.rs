// ============================================================================
// TILING — per-tile randomized UV remap for breaking up texture repetition
// ============================================================================
//
// A tiled texture sampled naively shows its period immediately. The remap
// here makes adjacent tiles sample *different* tiles of the source pattern:
// hash the tile a coordinate falls in, quantize the hash onto the same tile
// grid, and shift the coordinate by that offset before sampling. Everything
// is pure f32 arithmetic — no state, no I/O, safe to evaluate per pixel in
// parallel.

use crate::vec2::Vec2;

// ============================================================================
// TILE GRID
// ============================================================================

/// Error type for tile grid construction.
#[derive(Debug, PartialEq, Eq)]
pub enum GridError {
    /// A grid dimension was zero. Zero columns or rows would divide by zero
    /// inside the remap, so it is rejected here instead.
    Invalid { cols: u32, rows: u32 },
    /// A grid string did not look like `COLSxROWS` (e.g. `4x4`).
    Unparseable(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::Invalid { cols, rows } => {
                write!(f, "invalid tile grid {}x{}: both dimensions must be >= 1", cols, rows)
            }
            GridError::Unparseable(s) => {
                write!(f, "cannot parse tile grid '{}': expected COLSxROWS, e.g. 4x4", s)
            }
        }
    }
}

/// How many tiles subdivide the unit texture domain along each axis.
///
/// Construction validates both dimensions, so a `TileGrid` in hand is always
/// safe to divide by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
}

impl TileGrid {
    /// A 4×4 layout — e.g. a 1024×1024 texture made of 256×256 tiles.
    pub const DEFAULT: TileGrid = TileGrid { cols: 4, rows: 4 };

    pub fn new(cols: u32, rows: u32) -> Result<TileGrid, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::Invalid { cols, rows });
        }
        Ok(TileGrid { cols, rows })
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32)
    }
}

impl Default for TileGrid {
    fn default() -> TileGrid {
        TileGrid::DEFAULT
    }
}

impl std::fmt::Display for TileGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

impl std::str::FromStr for TileGrid {
    type Err = GridError;

    /// Parse `COLSxROWS` (also accepts a single number for square grids).
    fn from_str(s: &str) -> Result<TileGrid, GridError> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u32>() {
            return TileGrid::new(n, n);
        }
        let (c, r) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| GridError::Unparseable(s.to_string()))?;
        let cols = c.trim().parse::<u32>().map_err(|_| GridError::Unparseable(s.to_string()))?;
        let rows = r.trim().parse::<u32>().map_err(|_| GridError::Unparseable(s.to_string()))?;
        TileGrid::new(cols, rows)
    }
}

// ============================================================================
// HASH
// ============================================================================

/// Deterministic sine hash of a coordinate plus a seed, nominally in [0, 1).
///
/// The classic one-liner: dot the coordinate against two large irrational-ish
/// constants, reduce mod 3.14 (truncated on purpose — the constants were
/// tuned against exactly this value, and changing it changes every derived
/// random number), add the seed, take the sine, keep the fractional part of
/// a large multiple.
///
/// Rounding can in principle land the result exactly on 0.0 or 1.0; callers
/// must not assume a strictly exclusive upper bound (`quantize_to_grid`
/// clamps the bucket index so selection stays in range regardless).
#[inline]
pub fn hash(co: Vec2, seed: f32) -> f32 {
    let a = 12.9898_f32;
    let b = 78.233_f32;
    let c = 43758.5453_f32;
    let dt = co.dot(Vec2::new(a, b));
    // GLSL mod(): result carries the sign of the divisor, so dt < 0 still
    // reduces into [0, 3.14).
    let sn = dt - 3.14 * (dt / 3.14).floor();
    let v = (sn + seed).sin() * c;
    v - v.floor()
}

/// Quantize a pair of hash values onto the tile grid: each component becomes
/// one of `cols` (resp. `rows`) discrete offsets, a multiple of 1/cols
/// (resp. 1/rows).
///
/// The bucket index is clamped to `[0, n-1]`, so a hash that rounds to
/// exactly 1.0 (or a hair below 0.0) still selects a valid tile.
#[inline]
pub(crate) fn quantize_to_grid(h: Vec2, grid_size: Vec2) -> Vec2 {
    let bx = (h.x * grid_size.x).floor().clamp(0.0, grid_size.x - 1.0);
    let by = (h.y * grid_size.y).floor().clamp(0.0, grid_size.y - 1.0);
    Vec2::new(bx / grid_size.x, by / grid_size.y)
}

// ============================================================================
// RANDOMIZED TILE REMAP
// ============================================================================

/// Remap a texture coordinate so that each tile of the grid samples a
/// pseudo-randomly chosen tile of the source pattern.
///
/// Steps:
/// 1. `tile_origin` — the normalized lower corner of the tile `tex_coord`
///    falls in. Deliberately *not* wrapped into [0, 1): for coordinates past
///    the first repeat the origin keeps growing, so every instance of the
///    pattern gets its own random selection instead of one fixed lookup
///    table.
/// 2. Two hash samples with swapped component order (decorrelates x and y so
///    a tile does not always pick a diagonal offset).
/// 3. Quantize the hashes onto the grid and shift.
///
/// The shift depends only on the tile and the seed, so every coordinate
/// inside one tile moves by the same amount and the image stays continuous
/// within tiles.
pub fn randomized_tile_uv(tex_coord: Vec2, grid: TileGrid, seed: f32) -> Vec2 {
    let n = grid.as_vec2();
    let tile_origin = (tex_coord * n).floor() / n;
    let h = Vec2::new(hash(tile_origin.swap(), seed), hash(tile_origin, seed));
    let random_tile = quantize_to_grid(h, n);
    tex_coord - (tile_origin + random_tile)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The shift applied to a coordinate (constant across a tile).
    fn shift(tex_coord: Vec2, grid: TileGrid, seed: f32) -> Vec2 {
        tex_coord - randomized_tile_uv(tex_coord, grid, seed)
    }

    #[test]
    fn hash_is_bit_deterministic() {
        let cases = [
            (Vec2::new(0.0, 0.0), 333.0),
            (Vec2::new(0.25, 0.5), 333.0),
            (Vec2::new(-3.75, 12.5), 17.5),
            (Vec2::new(1e6, -1e6), 0.0),
        ];
        for (co, seed) in cases {
            let a = hash(co, seed);
            let b = hash(co, seed);
            assert_eq!(a.to_bits(), b.to_bits(), "hash not reproducible for {:?}", co);
        }
    }

    #[test]
    fn hash_matches_reference_values() {
        // Reference values from the formula evaluated in f32:
        //   fract(sin(mod(dot(co, (12.9898, 78.233)), 3.14) + seed) * 43758.5453)
        let cases = [
            (Vec2::new(0.0, 0.0), 333.0, 0.99859619),
            (Vec2::new(0.0, 0.0), 0.0, 0.0),
            (Vec2::new(0.25, 0.5), 333.0, 0.7109375),
            (Vec2::new(0.5, 0.25), 333.0, 0.42578125),
        ];
        for (co, seed, expected) in cases {
            let h = hash(co, seed);
            assert!(
                (h - expected).abs() < 1e-4,
                "hash({:?}, {}) = {}, expected ~{}",
                co, seed, h, expected
            );
        }
    }

    #[test]
    fn hash_stays_in_unit_range() {
        for i in 0..100 {
            let co = Vec2::new(i as f32 * 0.37 - 18.0, i as f32 * -0.91 + 7.0);
            let h = hash(co, 333.0);
            assert!((0.0..=1.0).contains(&h), "hash out of range: {}", h);
        }
    }

    #[test]
    fn shift_is_constant_within_a_tile() {
        let grid = TileGrid::new(4, 4).unwrap();
        let seed = 333.0;
        // All inside tile (1, 2), including points close to its edges.
        let in_tile = [
            Vec2::new(0.2501, 0.5001),
            Vec2::new(0.3125, 0.5625),
            Vec2::new(0.4999, 0.7499),
        ];
        let first = shift(in_tile[0], grid, seed);
        for tc in in_tile {
            let s = shift(tc, grid, seed);
            assert_eq!(s.x.to_bits(), first.x.to_bits());
            assert_eq!(s.y.to_bits(), first.y.to_bits());
        }
    }

    #[test]
    fn shift_is_constant_within_tiles_beyond_the_first_repeat() {
        let grid = TileGrid::new(4, 4).unwrap();
        // Tile (21, 9) — tex coords well past 1.0 (no wrapping applied).
        let a = shift(Vec2::new(5.26, 2.251), grid, 42.0);
        let b = shift(Vec2::new(5.49, 2.499), grid, 42.0);
        assert_eq!(a, b);
    }

    #[test]
    fn shift_is_grid_quantized() {
        // Shift components must be exact multiples of 1/cols and 1/rows,
        // for non-square grids too.
        for (cols, rows) in [(4u32, 4u32), (8, 2), (3, 5)] {
            let grid = TileGrid::new(cols, rows).unwrap();
            let n = Vec2::new(cols as f32, rows as f32);
            for seed in [0.0, 333.0, 1234.5] {
                for i in 0..16 {
                    let tc = Vec2::new(
                        (i % 4) as f32 / cols as f32 + 0.01,
                        (i / 4) as f32 / rows as f32 + 0.01,
                    );
                    let s = shift(tc, grid, seed) * n;
                    assert!(
                        (s.x - s.x.round()).abs() < 1e-3,
                        "x shift not a multiple of 1/{} (grid {}, seed {})",
                        cols, grid, seed
                    );
                    assert!(
                        (s.y - s.y.round()).abs() < 1e-3,
                        "y shift not a multiple of 1/{} (grid {}, seed {})",
                        rows, grid, seed
                    );
                }
            }
        }
    }

    #[test]
    fn distinct_seeds_give_distinct_offsets_somewhere() {
        let grid = TileGrid::new(4, 4).unwrap();
        // Collisions on a single tile are possible, so sample the whole 4x4
        // range and require at least one difference.
        let mut differing = 0;
        for ty in 0..4 {
            for tx in 0..4 {
                let tc = Vec2::new(tx as f32 * 0.25 + 0.125, ty as f32 * 0.25 + 0.125);
                if shift(tc, grid, 333.0) != shift(tc, grid, 334.0) {
                    differing += 1;
                }
            }
        }
        assert!(differing > 0, "seeds 333 and 334 produced identical offsets on all 16 tiles");
    }

    #[test]
    fn unit_grid_reduces_to_fract() {
        let grid = TileGrid::new(1, 1).unwrap();
        for seed in [0.0, 333.0, -7.25] {
            for tc in [
                Vec2::new(0.3, 0.8),
                Vec2::new(2.75, 5.5),
                Vec2::new(-1.25, 0.0),
            ] {
                // Only one offset bucket exists, so the remap degenerates to
                // fractional-part extraction.
                assert_eq!(randomized_tile_uv(tc, grid, seed), tc.fract_gl());
            }
        }
    }

    #[test]
    fn default_grid_seed_333_tile_zero() {
        // grid 4x4, seed 333, tex coord in tile (0,0): both hash inputs are
        // the origin, hash(0,0,333) ~= 0.9986 -> bucket 3 -> offset 0.75 on
        // both axes.
        let grid = TileGrid::DEFAULT;
        let tc = Vec2::new(0.125, 0.125);
        let uv = randomized_tile_uv(tc, grid, 333.0);
        assert!((uv.x - (0.125 - 0.75)).abs() < 1e-4, "uv.x = {}", uv.x);
        assert!((uv.y - (0.125 - 0.75)).abs() < 1e-4, "uv.y = {}", uv.y);

        // Whatever the hash does, the offset must be one of the 16 valid
        // (k/4, m/4) pairs.
        let s = shift(tc, grid, 333.0);
        let kx = (s.x * 4.0).round();
        let ky = (s.y * 4.0).round();
        assert!((0.0..=3.0).contains(&kx));
        assert!((0.0..=3.0).contains(&ky));
    }

    #[test]
    fn quantize_clamps_boundary_hash_values() {
        let n = Vec2::splat(4.0);
        // Exactly 1.0 must still select the last bucket, not fall off the end.
        assert_eq!(quantize_to_grid(Vec2::splat(1.0), n), Vec2::splat(0.75));
        // A rounding artifact just below zero resolves to bucket 0.
        assert_eq!(quantize_to_grid(Vec2::splat(-1e-7), n), Vec2::ZERO);
    }

    #[test]
    fn grid_rejects_zero_dimensions() {
        assert_eq!(
            TileGrid::new(0, 4),
            Err(GridError::Invalid { cols: 0, rows: 4 })
        );
        assert_eq!(
            TileGrid::new(4, 0),
            Err(GridError::Invalid { cols: 4, rows: 0 })
        );
        assert!(TileGrid::new(1, 1).is_ok());
    }

    #[test]
    fn grid_parses_from_string() {
        assert_eq!("4x4".parse::<TileGrid>(), TileGrid::new(4, 4));
        assert_eq!("8X2".parse::<TileGrid>(), TileGrid::new(8, 2));
        assert_eq!("5".parse::<TileGrid>(), TileGrid::new(5, 5));
        assert!("0x4".parse::<TileGrid>().is_err());
        assert!("axb".parse::<TileGrid>().is_err());
        assert!("".parse::<TileGrid>().is_err());
    }
}
