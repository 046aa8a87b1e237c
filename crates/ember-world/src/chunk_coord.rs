use serde::{Deserialize, Serialize};

/// Identifies one vertical chunk column. Plain value type; equality and hash
/// are by field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk column owning the given world X/Z.
    #[inline]
    pub fn of_world(wx: i32, wz: i32, chunk_size: usize) -> Self {
        let s = chunk_size as i32;
        Self::new(wx.div_euclid(s), wz.div_euclid(s))
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.cx + dx, self.cz + dz)
    }

    /// The four planar neighbors, in +X, -X, +Z, -Z order.
    #[inline]
    pub fn planar_neighbors(self) -> [ChunkCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// Chebyshev distance, the metric used for square load radii.
    #[inline]
    pub fn ring_distance(self, other: ChunkCoord) -> i32 {
        (self.cx - other.cx).abs().max((self.cz - other.cz).abs())
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_world_floors_negative_coordinates() {
        assert_eq!(ChunkCoord::of_world(0, 0, 16), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::of_world(15, 15, 16), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::of_world(-1, -16, 16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::of_world(-17, 16, 16), ChunkCoord::new(-2, 1));
    }

    #[test]
    fn ring_distance_is_chebyshev() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.ring_distance(ChunkCoord::new(3, -2)), 3);
        assert_eq!(a.ring_distance(ChunkCoord::new(-1, 5)), 5);
    }
}
