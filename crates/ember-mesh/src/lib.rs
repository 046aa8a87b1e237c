//! CPU meshing boundary: face-culled chunk meshes built from voxel data and
//! the packed light field. GPU upload lives behind the runtime's uploader
//! seam; nothing here touches a graphics API.
#![forbid(unsafe_code)]

mod build;
mod face;
mod mesh_build;
mod neighbors;

pub use build::build_chunk_mesh;
pub use face::Face;
pub use mesh_build::MeshBuild;
pub use neighbors::NeighborsReady;

use ember_geom::Aabb;
use ember_world::ChunkCoord;

// Visual-only lighting floor to avoid pitch-black faces in darkness.
// Does not affect logical light propagation.
pub(crate) const VISUAL_LIGHT_MIN: u8 = 18;

/// CPU-side mesh for one chunk: an opaque pass and a translucent pass, plus
/// the bounds the renderer culls against.
#[derive(Clone)]
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub solid: MeshBuild,
    pub translucent: MeshBuild,
}

impl ChunkMeshCpu {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solid.idx.is_empty() && self.translucent.idx.is_empty()
    }
}
