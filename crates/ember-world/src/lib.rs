//! World sizing parameters and the pure terrain interface.
#![forbid(unsafe_code)]

mod chunk_coord;
mod terrain;

pub use chunk_coord::ChunkCoord;
pub use terrain::{FlatTerrain, NoiseTerrain, TerrainControl, TerrainSource};

/// Side length of one cubic subchunk in voxels.
pub const SUBCHUNK_SIZE: usize = 16;

/// Subchunks stacked vertically per chunk column.
pub const SUBCHUNKS_PER_CHUNK: usize = 8;

/// World-space dimensions shared by every component. The grid is unbounded
/// horizontally; vertically it spans exactly one chunk column.
#[derive(Clone, Copy, Debug)]
pub struct World {
    pub chunk_size: usize,
    pub subchunks_y: usize,
    pub seed: i32,
}

impl World {
    pub fn new(seed: i32) -> Self {
        Self {
            chunk_size: SUBCHUNK_SIZE,
            subchunks_y: SUBCHUNKS_PER_CHUNK,
            seed,
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.chunk_size * self.subchunks_y
    }

    #[inline]
    pub fn in_height_bounds(&self, wy: i32) -> bool {
        wy >= 0 && (wy as usize) < self.height()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(0)
    }
}
