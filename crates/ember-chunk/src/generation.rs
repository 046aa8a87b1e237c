use ember_blocks::{Block, BlockRegistry};
use ember_world::{ChunkCoord, SUBCHUNK_SIZE, TerrainSource, World};

use crate::subchunk::SubChunk;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedVoxels {
    pub subchunks: Vec<SubChunk>,
    pub occupancy: ChunkOccupancy,
}

/// Fills a fresh subchunk stack from the terrain functions. Pure in
/// (terrain, coord), so workers may generate columns in any order.
pub fn generate_chunk_voxels(
    world: &World,
    terrain: &dyn TerrainSource,
    reg: &BlockRegistry,
    coord: ChunkCoord,
) -> GeneratedVoxels {
    let s = world.chunk_size;
    let base_x = coord.cx * s as i32;
    let base_z = coord.cz * s as i32;
    let mut subchunks: Vec<SubChunk> = (0..world.subchunks_y).map(|_| SubChunk::new()).collect();
    let mut populated = false;
    for z in 0..s {
        for x in 0..s {
            let wx = base_x + x as i32;
            let wz = base_z + z as i32;
            let ctl = terrain.column_control(wx, wz);
            for wy in 0..world.height() as i32 {
                let d = terrain.density(wx, wy, wz, &ctl);
                let block = terrain.block_at(reg, wx, wy, wz, &ctl, d);
                if block == Block::AIR {
                    continue;
                }
                populated = true;
                let si = wy as usize / SUBCHUNK_SIZE;
                let sy = wy as usize % SUBCHUNK_SIZE;
                subchunks[si].set(x, sy, z, block, reg);
            }
        }
    }
    GeneratedVoxels {
        subchunks,
        occupancy: if populated {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
    }
}
