use ember_chunk::ChunkMap;
use ember_world::ChunkCoord;

/// Voxel readiness of the four planar neighbors, captured at promote time and
/// re-checked inside the mesh job before any sampling happens.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeighborsReady {
    pub neg_x: bool,
    pub pos_x: bool,
    pub neg_z: bool,
    pub pos_z: bool,
}

impl NeighborsReady {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            neg_x: false,
            pos_x: false,
            neg_z: false,
            pos_z: false,
        }
    }

    pub fn capture(map: &ChunkMap, coord: ChunkCoord) -> Self {
        Self {
            pos_x: map.is_voxel_ready(coord.offset(1, 0)),
            neg_x: map.is_voxel_ready(coord.offset(-1, 0)),
            pos_z: map.is_voxel_ready(coord.offset(0, 1)),
            neg_z: map.is_voxel_ready(coord.offset(0, -1)),
        }
    }

    #[inline]
    pub fn all(self) -> bool {
        self.neg_x && self.pos_x && self.neg_z && self.pos_z
    }
}
