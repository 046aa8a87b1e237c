use std::sync::Arc;

use dashmap::DashMap;
use ember_blocks::{Block, BlockRegistry};
use ember_world::{ChunkCoord, World};

use crate::chunk::Chunk;

/// Concurrent coordinate→chunk registry with world-space accessors.
///
/// Every lookup that misses (unloaded chunk, out-of-height coordinate)
/// degrades to the air/zero-light sentinel instead of an error; transient
/// inconsistency is resolved by the next manager tick.
pub struct ChunkMap {
    world: World,
    chunks: DashMap<ChunkCoord, Arc<Chunk>>,
}

impl ChunkMap {
    pub fn new(world: World) -> Self {
        Self {
            world,
            chunks: DashMap::new(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks.get(&coord).map(|e| Arc::clone(e.value()))
    }

    pub fn insert(&self, chunk: Arc<Chunk>) {
        self.chunks.insert(chunk.coord(), chunk);
    }

    pub fn remove(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks.remove(&coord).map(|(_, c)| c)
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn coords(&self) -> Vec<ChunkCoord> {
        self.chunks.iter().map(|e| *e.key()).collect()
    }

    /// Splits a world position into its owning chunk coordinate and the
    /// chunk-local cell. None when outside world height.
    #[inline]
    pub fn to_local(&self, wx: i32, wy: i32, wz: i32) -> Option<(ChunkCoord, (usize, usize, usize))> {
        if !self.world.in_height_bounds(wy) {
            return None;
        }
        let s = self.world.chunk_size as i32;
        let coord = ChunkCoord::of_world(wx, wz, self.world.chunk_size);
        let lx = wx.rem_euclid(s) as usize;
        let lz = wz.rem_euclid(s) as usize;
        Some((coord, (lx, wy as usize, lz)))
    }

    pub fn is_voxel_ready(&self, coord: ChunkCoord) -> bool {
        self.get(coord).map(|c| c.has_voxel_data()).unwrap_or(false)
    }

    /// The VoxelOnly→Meshed gate: all four planar neighbors hold voxel data.
    pub fn neighbors_ready(&self, coord: ChunkCoord) -> bool {
        coord
            .planar_neighbors()
            .iter()
            .all(|&n| self.is_voxel_ready(n))
    }

    pub fn block_at_world(&self, wx: i32, wy: i32, wz: i32) -> Block {
        match self.to_local(wx, wy, wz) {
            Some((coord, (lx, ly, lz))) => match self.get(coord) {
                Some(chunk) if chunk.has_voxel_data() => chunk.block_local(lx, ly, lz),
                _ => Block::AIR,
            },
            None => Block::AIR,
        }
    }

    /// Returns the replaced block, or None when the owning chunk is missing
    /// or not yet generated (silent no-op).
    pub fn set_block_at_world(
        &self,
        wx: i32,
        wy: i32,
        wz: i32,
        block: Block,
        reg: &BlockRegistry,
    ) -> Option<Block> {
        let (coord, (lx, ly, lz)) = self.to_local(wx, wy, wz)?;
        let chunk = self.get(coord)?;
        if !chunk.has_voxel_data() {
            return None;
        }
        chunk.set_block_local(lx, ly, lz, block, reg)
    }

    pub fn light_word_at_world(&self, wx: i32, wy: i32, wz: i32) -> u16 {
        match self.to_local(wx, wy, wz) {
            Some((coord, (lx, ly, lz))) => self
                .get(coord)
                .map(|c| c.light_word(lx, ly, lz))
                .unwrap_or(0),
            None => 0,
        }
    }

    pub fn set_light_word_at_world(&self, wx: i32, wy: i32, wz: i32, word: u16) {
        if let Some((coord, (lx, ly, lz))) = self.to_local(wx, wy, wz) {
            if let Some(chunk) = self.get(coord) {
                chunk.set_light_word(lx, ly, lz, word);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkState;

    #[test]
    fn missing_chunks_read_as_air_and_dark() {
        let map = ChunkMap::new(World::new(7));
        assert_eq!(map.block_at_world(100, 10, -40), Block::AIR);
        assert_eq!(map.light_word_at_world(100, 10, -40), 0);
        assert!(!map.is_voxel_ready(ChunkCoord::new(6, -3)));
    }

    #[test]
    fn out_of_height_reads_are_sentinels() {
        let map = ChunkMap::new(World::new(7));
        assert!(map.to_local(0, -1, 0).is_none());
        assert!(map.to_local(0, map.world().height() as i32, 0).is_none());
        assert_eq!(map.block_at_world(0, -1, 0), Block::AIR);
    }

    #[test]
    fn neighbors_ready_requires_all_four() {
        let world = World::new(7);
        let map = ChunkMap::new(world);
        let center = ChunkCoord::new(0, 0);
        for c in [center, center.offset(1, 0), center.offset(-1, 0), center.offset(0, 1)] {
            let chunk = Arc::new(Chunk::new(c, &world));
            chunk.set_state(ChunkState::VoxelOnly);
            map.insert(chunk);
        }
        assert!(!map.neighbors_ready(center));
        let last = Arc::new(Chunk::new(center.offset(0, -1), &world));
        last.set_state(ChunkState::VoxelOnly);
        map.insert(last);
        assert!(map.neighbors_ready(center));
    }
}
