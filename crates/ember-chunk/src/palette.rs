use ember_blocks::Block;
use hashbrown::HashMap;

/// Per-subchunk deduplicated block table. Grows monotonically for the life of
/// the subchunk: removals keep their entry so indices never need rewriting.
#[derive(Clone, Debug)]
pub struct BlockPalette {
    entries: Vec<Block>,
    lookup: HashMap<Block, u16>,
}

impl BlockPalette {
    pub fn new(first: Block) -> Self {
        let mut lookup = HashMap::new();
        lookup.insert(first, 0u16);
        Self {
            entries: vec![first],
            lookup,
        }
    }

    /// Index of `block`, appending it on first sight. Amortized O(1).
    pub fn get_or_add(&mut self, block: Block) -> u16 {
        if let Some(&idx) = self.lookup.get(&block) {
            return idx;
        }
        let idx = self.entries.len() as u16;
        self.entries.push(block);
        self.lookup.insert(block, idx);
        idx
    }

    #[inline]
    pub fn get(&self, index: u16) -> Block {
        self.entries
            .get(index as usize)
            .copied()
            .unwrap_or(Block::AIR)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[Block] {
        &self.entries
    }
}

/// Index array behind a palette, byte-wide until the palette outgrows 255
/// entries, then word-wide for the rest of the subchunk's life.
#[derive(Clone, Debug)]
pub enum IndexStorage {
    Byte(Vec<u8>),
    Word(Vec<u16>),
}

impl IndexStorage {
    pub fn new(volume: usize) -> Self {
        IndexStorage::Byte(vec![0; volume])
    }

    #[inline]
    pub fn get(&self, i: usize) -> u16 {
        match self {
            IndexStorage::Byte(v) => v[i] as u16,
            IndexStorage::Word(v) => v[i],
        }
    }

    /// Stores an index, upgrading to the wide representation the first time a
    /// value would overflow a byte. Upgrade copies every existing cell; there
    /// is no downgrade path.
    pub fn set(&mut self, i: usize, index: u16) {
        if index > u8::MAX as u16 {
            self.upgrade();
        }
        match self {
            IndexStorage::Byte(v) => v[i] = index as u8,
            IndexStorage::Word(v) => v[i] = index,
        }
    }

    fn upgrade(&mut self) {
        if let IndexStorage::Byte(narrow) = self {
            let wide: Vec<u16> = narrow.iter().map(|&b| b as u16).collect();
            *self = IndexStorage::Word(wide);
        }
    }

    #[inline]
    pub fn is_wide(&self) -> bool {
        matches!(self, IndexStorage::Word(_))
    }
}
