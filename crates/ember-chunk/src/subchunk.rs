use ember_blocks::{Block, BlockRegistry};
use ember_world::SUBCHUNK_SIZE;

use crate::palette::{BlockPalette, IndexStorage};

const VOLUME: usize = SUBCHUNK_SIZE * SUBCHUNK_SIZE * SUBCHUNK_SIZE;

/// Packs a subchunk-local cell into 12 bits (4 per axis).
#[inline]
pub(crate) fn pack_local(x: usize, y: usize, z: usize) -> u16 {
    (x as u16) | ((y as u16) << 4) | ((z as u16) << 8)
}

#[inline]
pub(crate) fn unpack_local(p: u16) -> (usize, usize, usize) {
    (
        (p & 0xF) as usize,
        ((p >> 4) & 0xF) as usize,
        ((p >> 8) & 0xF) as usize,
    )
}

/// Fixed 16³ block container: one palette, one index array, and the packed
/// local coordinates of light-emitting cells.
#[derive(Clone, Debug)]
pub struct SubChunk {
    palette: BlockPalette,
    indices: IndexStorage,
    light_sources: Vec<u16>,
}

impl SubChunk {
    pub fn new() -> Self {
        Self {
            palette: BlockPalette::new(Block::AIR),
            indices: IndexStorage::new(VOLUME),
            light_sources: Vec::new(),
        }
    }

    #[inline]
    fn cell(x: usize, y: usize, z: usize) -> usize {
        x + SUBCHUNK_SIZE * (y + SUBCHUNK_SIZE * z)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Block {
        self.palette.get(self.indices.get(Self::cell(x, y, z)))
    }

    /// Writes a block and returns the previous one, keeping the emitter list
    /// in sync with what the registry says about old and new types.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: Block, reg: &BlockRegistry) -> Block {
        let i = Self::cell(x, y, z);
        let old = self.palette.get(self.indices.get(i));
        if old == block {
            return old;
        }
        let idx = self.palette.get_or_add(block);
        self.indices.set(i, idx);
        let packed = pack_local(x, y, z);
        if reg.is_light_source(old) {
            self.light_sources.retain(|&p| p != packed);
        }
        if reg.is_light_source(block) {
            self.light_sources.push(packed);
        }
        old
    }

    /// True iff the palette has never seen a non-air state, meaning every cell
    /// is air and meshing/propagation can skip this subchunk outright.
    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.palette.entries().iter().all(|&b| b == Block::AIR)
    }

    /// Packed local coordinates of light-emitting cells.
    #[inline]
    pub fn light_sources(&self) -> &[u16] {
        &self.light_sources
    }

    #[inline]
    pub fn emitter_cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.light_sources.iter().map(|&p| unpack_local(p))
    }

    #[inline]
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    #[inline]
    pub fn storage_is_wide(&self) -> bool {
        self.indices.is_wide()
    }
}

impl Default for SubChunk {
    fn default() -> Self {
        Self::new()
    }
}
