//! Packed light words and the chunk-local light map.
//!
//! One u16 per voxel: three 4-bit block-light channels in the low 12 bits and
//! a 4-bit sky channel on top.

pub mod light_word {
    #[inline]
    pub fn pack(rgb: [u8; 3], sky: u8) -> u16 {
        (rgb[0] as u16 & 0xF)
            | ((rgb[1] as u16 & 0xF) << 4)
            | ((rgb[2] as u16 & 0xF) << 8)
            | ((sky as u16 & 0xF) << 12)
    }

    #[inline]
    pub fn rgb(word: u16) -> [u8; 3] {
        [
            (word & 0xF) as u8,
            ((word >> 4) & 0xF) as u8,
            ((word >> 8) & 0xF) as u8,
        ]
    }

    #[inline]
    pub fn sky(word: u16) -> u8 {
        ((word >> 12) & 0xF) as u8
    }

    #[inline]
    pub fn with_rgb(word: u16, rgb: [u8; 3]) -> u16 {
        pack(rgb, sky(word))
    }

    #[inline]
    pub fn with_sky(word: u16, sky: u8) -> u16 {
        (word & 0x0FFF) | ((sky as u16 & 0xF) << 12)
    }
}

/// Chunk-relative light field covering the whole column.
#[derive(Clone, Debug)]
pub struct LightMap {
    sx: usize,
    sy: usize,
    sz: usize,
    words: Vec<u16>,
}

impl LightMap {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            words: vec![0; sx * sy * sz],
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u16 {
        self.words[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, word: u16) {
        let i = self.idx(x, y, z);
        self.words[i] = word;
    }

    #[inline]
    pub fn set_block_light(&mut self, x: usize, y: usize, z: usize, rgb: [u8; 3]) {
        let i = self.idx(x, y, z);
        self.words[i] = light_word::with_rgb(self.words[i], rgb);
    }

    #[inline]
    pub fn set_sky_light(&mut self, x: usize, y: usize, z: usize, sky: u8) {
        let i = self.idx(x, y, z);
        self.words[i] = light_word::with_sky(self.words[i], sky);
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }
}
