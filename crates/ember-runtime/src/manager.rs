use std::sync::Arc;
use std::time::{Duration, Instant};

use ember_blocks::{Block, BlockRegistry};
use ember_chunk::{Chunk, ChunkMap, ChunkState};
use ember_lighting::{BlockLightEngine, DeferredLightStore, SkyLightEngine};
use ember_mesh::ChunkMeshCpu;
use ember_world::{ChunkCoord, TerrainSource, World};
use hashbrown::HashMap;

use crate::config::EngineConfig;
use crate::queue::DedupQueue;
use crate::uploader::{ChunkUploader, MeshHandle};
use crate::worker::{GenJob, MeshJob, WorkerPool};

/// Snapshot of every pipeline queue plus worker-lane depths, for logging and
/// the debug overlay.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueueDebugCounts {
    pub generate: usize,
    pub try_mesh: usize,
    pub mesh: usize,
    pub upload: usize,
    pub mesh_delete: usize,
    pub delete: usize,
    pub gen_queued: usize,
    pub gen_inflight: usize,
    pub mesh_queued: usize,
    pub mesh_inflight: usize,
}

/// Owns the chunk pipeline: the registry of live chunks, the six stage
/// queues, the worker pool, the deferred-light mailboxes, and the CPU meshes
/// waiting for upload. `update` runs once per tick on the manager thread;
/// lighting mutation happens only there.
pub struct ChunkManager {
    map: Arc<ChunkMap>,
    reg: Arc<BlockRegistry>,
    lights: DeferredLightStore,
    pool: WorkerPool,
    cfg: EngineConfig,
    observer: Option<ChunkCoord>,
    next_job_id: u64,

    q_generate: DedupQueue<ChunkCoord>,
    q_try_mesh: DedupQueue<ChunkCoord>,
    q_mesh: DedupQueue<ChunkCoord>,
    q_upload: DedupQueue<ChunkCoord>,
    q_mesh_delete: DedupQueue<ChunkCoord>,
    q_delete: DedupQueue<ChunkCoord>,

    pending_meshes: HashMap<ChunkCoord, ChunkMeshCpu>,
    handles: HashMap<ChunkCoord, MeshHandle>,
}

impl ChunkManager {
    pub fn new(
        world: World,
        reg: Arc<BlockRegistry>,
        terrain: Arc<dyn TerrainSource>,
        cfg: EngineConfig,
    ) -> Self {
        let map = Arc::new(ChunkMap::new(world));
        let pool = WorkerPool::new(map.clone(), reg.clone(), terrain, cfg.workers);
        log::info!(
            "chunk manager up: render={} gen={} workers={}+{}",
            cfg.render_distance,
            cfg.generation_distance(),
            pool.w_gen,
            pool.w_mesh
        );
        Self {
            map,
            reg,
            lights: DeferredLightStore::new(),
            pool,
            cfg,
            observer: None,
            next_job_id: 0,
            q_generate: DedupQueue::new(),
            q_try_mesh: DedupQueue::new(),
            q_mesh: DedupQueue::new(),
            q_upload: DedupQueue::new(),
            q_mesh_delete: DedupQueue::new(),
            q_delete: DedupQueue::new(),
            pending_meshes: HashMap::new(),
            handles: HashMap::new(),
        }
    }

    #[inline]
    pub fn map(&self) -> &ChunkMap {
        &self.map
    }

    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Runs one pipeline tick around the observer's world position.
    pub fn update(&mut self, observer_wx: i32, observer_wz: i32, uploader: &mut dyn ChunkUploader) {
        let center = ChunkCoord::of_world(observer_wx, observer_wz, self.map.world().chunk_size);
        if self.observer != Some(center) {
            self.observer = Some(center);
            self.rescan_radii(center);
        }

        self.drain_gen_results();
        self.dispatch_one_gen(center);
        self.drain_try_mesh(center);
        self.drain_mesh_results(center);
        self.dispatch_one_mesh();
        self.process_uploads(uploader);
        self.drain_mesh_deletes(uploader);
        self.drain_deletes(uploader);
    }

    /// Observer moved to a new chunk: register newly in-range coords, queue
    /// out-of-range ones for demotion or deletion, and drop deferred light
    /// aimed at coords that will now never load.
    fn rescan_radii(&mut self, center: ChunkCoord) {
        let gen_r = self.cfg.generation_distance();
        for dz in -gen_r..=gen_r {
            for dx in -gen_r..=gen_r {
                let coord = center.offset(dx, dz);
                if !self.map.contains(coord) {
                    self.map
                        .insert(Arc::new(Chunk::new(coord, self.map.world())));
                    self.q_generate.push(coord);
                }
            }
        }
        for coord in self.map.coords() {
            let d = coord.ring_distance(center);
            if d > gen_r {
                self.q_delete.push(coord);
            } else if d > self.cfg.render_distance {
                self.q_mesh_delete.push(coord);
            }
        }
        let evicted = self.lights.evict_outside(center, gen_r);
        if evicted > 0 {
            log::debug!("evicted {evicted} deferred light mailboxes");
        }
    }

    fn next_job_id(&mut self) -> u64 {
        self.next_job_id += 1;
        self.next_job_id
    }

    /// One generation dispatch per tick. Coords that left the radius or
    /// already advanced are dropped here instead of wasting a worker.
    fn dispatch_one_gen(&mut self, center: ChunkCoord) {
        while let Some(coord) = self.q_generate.pop() {
            if coord.ring_distance(center) > self.cfg.generation_distance() {
                continue;
            }
            let valid = self
                .map
                .get(coord)
                .map(|c| c.state() == ChunkState::Initialized)
                .unwrap_or(false);
            if !valid {
                continue;
            }
            let job_id = self.next_job_id();
            self.pool.submit_gen(GenJob { coord, job_id });
            break;
        }
    }

    /// Installs finished voxel data, runs the light seeds plus the deferred
    /// mailbox, and hands the chunk to the try-mesh stage.
    fn drain_gen_results(&mut self) {
        for res in self.pool.drain_gen_results() {
            let coord = res.coord;
            let Some(chunk) = self.map.get(coord) else {
                continue;
            };
            if chunk.state() != ChunkState::Initialized {
                continue;
            }
            chunk.install_voxels(res.voxels.subchunks);
            if !chunk.set_state(ChunkState::VoxelOnly) {
                continue;
            }
            SkyLightEngine::seed_chunk(&self.map, &self.reg, &self.lights, coord);
            BlockLightEngine::seed_chunk(&self.map, &self.reg, &self.lights, coord);
            let deferred = self.lights.take(coord);
            if !deferred.is_empty() {
                BlockLightEngine::replay_deferred(&self.map, &self.reg, &self.lights, coord, &deferred);
                SkyLightEngine::replay_deferred(&self.map, &self.reg, &self.lights, coord, &deferred);
            }
            self.q_try_mesh.push(coord);
        }
    }

    /// Promotes chunks whose four planar neighbors are voxel-ready; everyone
    /// else waits another tick unless they left the radius or moved on.
    fn drain_try_mesh(&mut self, center: ChunkCoord) {
        for coord in self.q_try_mesh.drain_all() {
            let Some(chunk) = self.map.get(coord) else {
                continue;
            };
            if chunk.state() != ChunkState::VoxelOnly {
                continue;
            }
            if coord.ring_distance(center) > self.cfg.render_distance {
                continue;
            }
            if self.map.neighbors_ready(coord) {
                self.q_mesh.push(coord);
            } else {
                self.q_try_mesh.push(coord);
            }
        }
    }

    fn dispatch_one_mesh(&mut self) {
        while let Some(coord) = self.q_mesh.pop() {
            if !self.map.is_voxel_ready(coord) {
                continue;
            }
            let job_id = self.next_job_id();
            self.pool.submit_mesh(MeshJob { coord, job_id });
            break;
        }
    }

    fn drain_mesh_results(&mut self, center: ChunkCoord) {
        for res in self.pool.drain_mesh_results() {
            let coord = res.coord;
            let Some(chunk) = self.map.get(coord) else {
                continue;
            };
            match res.cpu {
                Some(cpu) => {
                    // A result can land after the chunk was demoted out of the
                    // render radius; accepting it would rebuild a mesh nothing
                    // will draw.
                    if coord.ring_distance(center) > self.cfg.render_distance {
                        continue;
                    }
                    if !chunk.has_voxel_data() {
                        continue;
                    }
                    if !chunk.set_state(ChunkState::Meshed) {
                        continue;
                    }
                    self.pending_meshes.insert(coord, cpu);
                    self.q_upload.push(coord);
                }
                None => {
                    // Job bailed; retry through try-mesh if still relevant.
                    if chunk.state() == ChunkState::VoxelOnly
                        && coord.ring_distance(center) <= self.cfg.render_distance
                    {
                        self.q_try_mesh.push(coord);
                    }
                }
            }
        }
    }

    /// Uploads pending meshes until the accumulated frame budget runs out.
    /// A chunk whose voxel data vanished mid-flight is dropped silently.
    fn process_uploads(&mut self, uploader: &mut dyn ChunkUploader) {
        let budget = Duration::from_millis(self.cfg.max_chunk_build_per_frame_ms);
        let start = Instant::now();
        while start.elapsed() < budget {
            let Some(coord) = self.q_upload.pop() else {
                break;
            };
            let Some(mesh) = self.pending_meshes.remove(&coord) else {
                continue;
            };
            let Some(chunk) = self.map.get(coord) else {
                continue;
            };
            if !chunk.has_voxel_data() {
                continue;
            }
            if let Some(old) = self.handles.remove(&coord) {
                uploader.release(old);
            }
            if !mesh.is_empty() {
                let handle = uploader.upload(&mesh);
                self.handles.insert(coord, handle);
            }
            chunk.set_state(ChunkState::Built);
        }
    }

    /// Fully drained each tick: chunks between render and generation radius
    /// keep voxels but shed mesh resources.
    fn drain_mesh_deletes(&mut self, uploader: &mut dyn ChunkUploader) {
        for coord in self.q_mesh_delete.drain_all() {
            self.q_try_mesh.cancel(coord);
            self.q_mesh.cancel(coord);
            self.q_upload.cancel(coord);
            self.pending_meshes.remove(&coord);
            if let Some(handle) = self.handles.remove(&coord) {
                uploader.release(handle);
            }
            if let Some(chunk) = self.map.get(coord) {
                if matches!(chunk.state(), ChunkState::Meshed | ChunkState::Built) {
                    chunk.set_state(ChunkState::VoxelOnly);
                }
            }
        }
    }

    /// Fully drained each tick. A registry removal that loses a race with a
    /// concurrent insert re-queues itself for the next tick.
    fn drain_deletes(&mut self, uploader: &mut dyn ChunkUploader) {
        for coord in self.q_delete.drain_all() {
            self.q_generate.cancel(coord);
            self.q_try_mesh.cancel(coord);
            self.q_mesh.cancel(coord);
            self.q_upload.cancel(coord);
            self.pending_meshes.remove(&coord);
            if let Some(handle) = self.handles.remove(&coord) {
                uploader.release(handle);
            }
            if let Some(chunk) = self.map.get(coord) {
                chunk.set_state(ChunkState::Deleted);
                chunk.release_voxels();
            }
            self.map.remove(coord);
            if self.map.contains(coord) {
                self.q_delete.push(coord);
            }
        }
    }

    pub fn get_block_world(&self, wx: i32, wy: i32, wz: i32) -> Block {
        self.map.block_at_world(wx, wy, wz)
    }

    /// Writes a block, runs the incremental lighting updates, and marks the
    /// owner plus boundary-sharing neighbors for remesh. A write into a
    /// missing or ungenerated chunk is a silent no-op.
    pub fn set_block_world(&mut self, wx: i32, wy: i32, wz: i32, block: Block) {
        let Some(old) = self.map.set_block_at_world(wx, wy, wz, block, &self.reg) else {
            return;
        };
        if old == block {
            return;
        }
        if self.reg.is_light_source(old) {
            BlockLightEngine::remove_at(&self.map, &self.reg, &self.lights, wx, wy, wz);
        }
        if !self.reg.is_light_passable(block) {
            BlockLightEngine::remove_at(&self.map, &self.reg, &self.lights, wx, wy, wz);
        }
        if !self.reg.is_sky_passable(block) {
            SkyLightEngine::remove_at(&self.map, &self.reg, &self.lights, wx, wy, wz);
        }
        if self.reg.is_light_source(block) {
            BlockLightEngine::place_source(
                &self.map,
                &self.reg,
                &self.lights,
                wx,
                wy,
                wz,
                self.reg.light_source_level(block),
            );
        }
        if self.reg.is_light_passable(block) && !self.reg.is_light_passable(old) {
            BlockLightEngine::reseed_neighbors(&self.map, &self.reg, &self.lights, wx, wy, wz);
        }
        if self.reg.is_sky_passable(block) && !self.reg.is_sky_passable(old) {
            SkyLightEngine::reseed_neighbors(&self.map, &self.reg, &self.lights, wx, wy, wz);
        }
        self.mark_remesh_around(wx, wy, wz);
    }

    /// Only Built chunks are remeshable; everyone else is still moving
    /// through the pipeline and will pick the edit up on its normal pass.
    fn mark_remesh(&mut self, coord: ChunkCoord) {
        if let Some(chunk) = self.map.get(coord) {
            if chunk.is_remeshable() {
                self.q_mesh.push(coord);
            }
        }
    }

    fn mark_remesh_around(&mut self, wx: i32, wy: i32, wz: i32) {
        let Some((coord, (lx, _ly, lz))) = self.map.to_local(wx, wy, wz) else {
            return;
        };
        let s = self.map.world().chunk_size;
        self.mark_remesh(coord);
        if lx == 0 {
            self.mark_remesh(coord.offset(-1, 0));
        }
        if lx == s - 1 {
            self.mark_remesh(coord.offset(1, 0));
        }
        if lz == 0 {
            self.mark_remesh(coord.offset(0, -1));
        }
        if lz == s - 1 {
            self.mark_remesh(coord.offset(0, 1));
        }
    }

    pub fn queue_debug_counts(&self) -> QueueDebugCounts {
        let (gen_queued, gen_inflight, mesh_queued, mesh_inflight) =
            self.pool.queue_debug_counts();
        QueueDebugCounts {
            generate: self.q_generate.len(),
            try_mesh: self.q_try_mesh.len(),
            mesh: self.q_mesh.len(),
            upload: self.q_upload.len(),
            mesh_delete: self.q_mesh_delete.len(),
            delete: self.q_delete.len(),
            gen_queued,
            gen_inflight,
            mesh_queued,
            mesh_inflight,
        }
    }

    /// Chunks currently holding an uploaded mesh.
    pub fn built_count(&self) -> usize {
        self.map
            .coords()
            .into_iter()
            .filter(|&c| {
                self.map
                    .get(c)
                    .map(|ch| ch.state() == ChunkState::Built)
                    .unwrap_or(false)
            })
            .count()
    }
}
