use ember_mesh::ChunkMeshCpu;

/// Opaque handle to an uploaded mesh. Meaning is entirely up to the uploader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Main-thread seam between the engine and whatever owns the GPU. The
/// manager calls `upload` under its per-frame time budget and `release` when
/// a chunk's mesh is cleared or the chunk is deleted.
pub trait ChunkUploader {
    fn upload(&mut self, mesh: &ChunkMeshCpu) -> MeshHandle;
    fn release(&mut self, handle: MeshHandle);
}

/// Headless uploader: hands out handles and counts. Used by the demo binary
/// and the integration tests.
#[derive(Default)]
pub struct NullUploader {
    next: u64,
    pub uploads: usize,
    pub releases: usize,
    pub live: usize,
}

impl ChunkUploader for NullUploader {
    fn upload(&mut self, _mesh: &ChunkMeshCpu) -> MeshHandle {
        self.next += 1;
        self.uploads += 1;
        self.live += 1;
        MeshHandle(self.next)
    }

    fn release(&mut self, _handle: MeshHandle) {
        self.releases += 1;
        self.live = self.live.saturating_sub(1);
    }
}
