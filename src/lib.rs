// ============================================================================
// tilebreak — randomized-tiling texture sampler
// ============================================================================
//
// Breaks up the visible repetition of a tiled texture: each cell of a fixed
// tile grid samples a pseudo-randomly chosen tile of the source pattern,
// selected by a deterministic sine hash of the cell and a seed.
//
// Layout:
//   vec2.rs    — minimal 2-component f32 vector
//   tiling.rs  — hash + per-tile randomized UV remap (the pure core)
//   sampler.rs — rayon-parallel CPU render of the remap over real images
//   io.rs      — texture decode + format-dispatched encode
//   cli.rs     — clap batch driver
//   logger.rs  — per-session log file + macros
// ============================================================================

pub mod cli;
pub mod io;
pub mod logger;
pub mod sampler;
pub mod tiling;
pub mod vec2;

pub use sampler::{RenderParams, WrapMode, render};
pub use tiling::{GridError, TileGrid, hash, randomized_tile_uv};
pub use vec2::Vec2;
