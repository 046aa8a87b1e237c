//! Chunk containers: palette storage, subchunks, the chunk lifecycle state
//! machine, and the concurrent chunk registry.
#![forbid(unsafe_code)]

mod chunk;
mod generation;
mod light;
mod map;
mod palette;
mod subchunk;

pub use chunk::{Chunk, ChunkState};
pub use generation::{ChunkOccupancy, GeneratedVoxels, generate_chunk_voxels};
pub use light::{LightMap, light_word};
pub use map::ChunkMap;
pub use palette::{BlockPalette, IndexStorage};
pub use subchunk::SubChunk;
