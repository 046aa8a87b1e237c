use std::sync::RwLock;
use std::sync::atomic::{AtomicU8, Ordering};

use ember_blocks::{Block, BlockRegistry};
use ember_geom::{Aabb, Vec3};
use ember_world::{ChunkCoord, SUBCHUNK_SIZE, World};

use crate::light::LightMap;
use crate::subchunk::SubChunk;

/// Lifecycle of one chunk column. Forward-progressing, except that shedding
/// mesh resources regresses Built/Meshed back to VoxelOnly. Deleted is
/// terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ChunkState {
    Initialized = 0,
    VoxelOnly = 1,
    Meshed = 2,
    Built = 3,
    Deleted = 4,
}

impl ChunkState {
    #[inline]
    fn from_u8(v: u8) -> ChunkState {
        match v {
            0 => ChunkState::Initialized,
            1 => ChunkState::VoxelOnly,
            2 => ChunkState::Meshed,
            3 => ChunkState::Built,
            _ => ChunkState::Deleted,
        }
    }
}

/// One vertical column of subchunks plus its lifecycle state and light field.
///
/// The state lives in an atomic so worker threads observe transitions without
/// taking a lock on the hot read path. Voxel and light data sit behind
/// `RwLock` because mesh workers read them while the manager thread writes.
pub struct Chunk {
    coord: ChunkCoord,
    state: AtomicU8,
    voxels: RwLock<Vec<SubChunk>>,
    light: RwLock<LightMap>,
    bounds: Aabb,
    subchunks_y: usize,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, world: &World) -> Self {
        let s = world.chunk_size as f32;
        let min = Vec3::new(coord.cx as f32 * s, 0.0, coord.cz as f32 * s);
        let max = min + Vec3::new(s, world.height() as f32, s);
        Self {
            coord,
            state: AtomicU8::new(ChunkState::Initialized as u8),
            voxels: RwLock::new(Vec::new()),
            light: RwLock::new(LightMap::new(
                world.chunk_size,
                world.height(),
                world.chunk_size,
            )),
            bounds: Aabb::new(min, max),
            subchunks_y: world.subchunks_y,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        ChunkState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Moves to `next` unless the chunk is already Deleted. Returns whether
    /// the transition took effect.
    pub fn set_state(&self, next: ChunkState) -> bool {
        let mut cur = self.state.load(Ordering::Acquire);
        loop {
            if ChunkState::from_u8(cur) == ChunkState::Deleted {
                return false;
            }
            match self.state.compare_exchange_weak(
                cur,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => cur = observed,
            }
        }
    }

    #[inline]
    pub fn has_voxel_data(&self) -> bool {
        matches!(
            self.state(),
            ChunkState::VoxelOnly | ChunkState::Meshed | ChunkState::Built
        )
    }

    /// Remeshing is only allowed from Built, so a chunk whose neighbors may
    /// still be mid-generation is never rebuilt.
    #[inline]
    pub fn is_remeshable(&self) -> bool {
        self.state() == ChunkState::Built
    }

    pub fn install_voxels(&self, subchunks: Vec<SubChunk>) {
        let mut guard = self.voxels.write().unwrap();
        *guard = subchunks;
    }

    pub fn release_voxels(&self) {
        let mut guard = self.voxels.write().unwrap();
        guard.clear();
        guard.shrink_to_fit();
    }

    pub fn block_local(&self, lx: usize, ly: usize, lz: usize) -> Block {
        let guard = self.voxels.read().unwrap();
        let (si, sy) = (ly / SUBCHUNK_SIZE, ly % SUBCHUNK_SIZE);
        match guard.get(si) {
            Some(sc) => sc.get(lx, sy, lz),
            None => Block::AIR,
        }
    }

    /// Returns the replaced block, or None when voxel data is absent (the
    /// write is then a silent no-op, per the stale-reference policy).
    pub fn set_block_local(
        &self,
        lx: usize,
        ly: usize,
        lz: usize,
        block: Block,
        reg: &BlockRegistry,
    ) -> Option<Block> {
        let mut guard = self.voxels.write().unwrap();
        let (si, sy) = (ly / SUBCHUNK_SIZE, ly % SUBCHUNK_SIZE);
        guard.get_mut(si).map(|sc| sc.set(lx, sy, lz, block, reg))
    }

    pub fn subchunk_is_all_air(&self, si: usize) -> bool {
        let guard = self.voxels.read().unwrap();
        guard.get(si).map(|sc| sc.is_all_air()).unwrap_or(true)
    }

    #[inline]
    pub fn subchunk_count(&self) -> usize {
        self.subchunks_y
    }

    /// Chunk-local positions of every light-emitting cell, gathered from the
    /// subchunk source lists.
    pub fn emitter_cells(&self) -> Vec<(usize, usize, usize)> {
        let guard = self.voxels.read().unwrap();
        let mut out = Vec::new();
        for (si, sc) in guard.iter().enumerate() {
            for (x, y, z) in sc.emitter_cells() {
                out.push((x, si * SUBCHUNK_SIZE + y, z));
            }
        }
        out
    }

    #[inline]
    pub fn light_word(&self, lx: usize, ly: usize, lz: usize) -> u16 {
        self.light.read().unwrap().get(lx, ly, lz)
    }

    #[inline]
    pub fn set_light_word(&self, lx: usize, ly: usize, lz: usize, word: u16) {
        self.light.write().unwrap().set(lx, ly, lz, word);
    }

    pub fn clear_light(&self) {
        self.light.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(1)
    }

    #[test]
    fn deleted_is_terminal() {
        let c = Chunk::new(ChunkCoord::new(0, 0), &world());
        assert!(c.set_state(ChunkState::VoxelOnly));
        assert!(c.set_state(ChunkState::Deleted));
        assert!(!c.set_state(ChunkState::VoxelOnly));
        assert!(!c.set_state(ChunkState::Built));
        assert_eq!(c.state(), ChunkState::Deleted);
    }

    #[test]
    fn voxel_data_tracks_state() {
        let c = Chunk::new(ChunkCoord::new(2, -3), &world());
        assert!(!c.has_voxel_data());
        c.set_state(ChunkState::VoxelOnly);
        assert!(c.has_voxel_data());
        assert!(!c.is_remeshable());
        c.set_state(ChunkState::Built);
        assert!(c.is_remeshable());
    }

    #[test]
    fn block_reads_default_to_air_before_generation() {
        let c = Chunk::new(ChunkCoord::new(0, 0), &world());
        assert_eq!(c.block_local(3, 40, 5), Block::AIR);
        assert_eq!(c.light_word(3, 40, 5), 0);
    }
}
