use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use ember_blocks::BlockRegistry;
use ember_chunk::{ChunkMap, GeneratedVoxels, generate_chunk_voxels};
use ember_mesh::{ChunkMeshCpu, NeighborsReady, build_chunk_mesh};
use ember_world::{ChunkCoord, TerrainSource, World};
use rayon::{ThreadPool, ThreadPoolBuilder};

#[derive(Clone, Copy, Debug)]
pub struct GenJob {
    pub coord: ChunkCoord,
    pub job_id: u64,
}

pub struct GenResult {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub voxels: GeneratedVoxels,
}

#[derive(Clone, Copy, Debug)]
pub struct MeshJob {
    pub coord: ChunkCoord,
    pub job_id: u64,
}

pub struct MeshResult {
    pub coord: ChunkCoord,
    pub job_id: u64,
    /// None when the job bailed: chunk gone, voxels gone, or a neighbor
    /// regressed since promote time. The manager decides whether to requeue.
    pub cpu: Option<ChunkMeshCpu>,
}

fn process_gen_job(
    job: GenJob,
    world: &World,
    terrain: &dyn TerrainSource,
    reg: &BlockRegistry,
    tx: &Sender<GenResult>,
) {
    let voxels = generate_chunk_voxels(world, terrain, reg, job.coord);
    let _ = tx.send(GenResult {
        coord: job.coord,
        job_id: job.job_id,
        voxels,
    });
}

fn process_mesh_job(job: MeshJob, map: &ChunkMap, reg: &BlockRegistry, tx: &Sender<MeshResult>) {
    // Re-validate inside the job: promote-time checks can go stale while the
    // job sits in the channel.
    let ready = map.is_voxel_ready(job.coord) && NeighborsReady::capture(map, job.coord).all();
    let cpu = if ready {
        build_chunk_mesh(map, reg, job.coord)
    } else {
        None
    };
    let _ = tx.send(MeshResult {
        coord: job.coord,
        job_id: job.job_id,
        cpu,
    });
}

/// Two worker lanes fed over unbounded channels: terrain generation and CPU
/// meshing. Queue depth and inflight counters are kept per lane for the
/// debug overlay.
pub struct WorkerPool {
    gen_tx: Sender<GenJob>,
    mesh_tx: Sender<MeshJob>,
    gen_rx: Receiver<GenResult>,
    mesh_rx: Receiver<MeshResult>,
    _gen_pool: Arc<ThreadPool>,
    _mesh_pool: Arc<ThreadPool>,
    q_gen: Arc<AtomicUsize>,
    q_mesh: Arc<AtomicUsize>,
    inflight_gen: Arc<AtomicUsize>,
    inflight_mesh: Arc<AtomicUsize>,
    pub w_gen: usize,
    pub w_mesh: usize,
}

impl WorkerPool {
    pub fn new(
        map: Arc<ChunkMap>,
        reg: Arc<BlockRegistry>,
        terrain: Arc<dyn TerrainSource>,
        workers: Option<usize>,
    ) -> Self {
        let (gen_tx, gen_job_rx) = unbounded::<GenJob>();
        let (mesh_tx, mesh_job_rx) = unbounded::<MeshJob>();
        let (gen_res_tx, gen_rx) = unbounded::<GenResult>();
        let (mesh_res_tx, mesh_rx) = unbounded::<MeshResult>();

        let total = workers.unwrap_or_else(|| {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
        });
        let w_mesh = 1usize.max(total / 4);
        let w_gen = (total.saturating_sub(w_mesh)).max(1);

        let q_gen = Arc::new(AtomicUsize::new(0));
        let q_mesh = Arc::new(AtomicUsize::new(0));
        let inflight_gen = Arc::new(AtomicUsize::new(0));
        let inflight_mesh = Arc::new(AtomicUsize::new(0));

        let world = *map.world();
        let gen_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_gen)
                .thread_name(|i| format!("ember-gen-{i}"))
                .build()
                .expect("gen pool"),
        );
        for _ in 0..w_gen {
            let rx = gen_job_rx.clone();
            let tx = gen_res_tx.clone();
            let terrain = terrain.clone();
            let reg = reg.clone();
            let q = q_gen.clone();
            let inflight = inflight_gen.clone();
            gen_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    q.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, &world, terrain.as_ref(), reg.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        let mesh_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_mesh)
                .thread_name(|i| format!("ember-mesh-{i}"))
                .build()
                .expect("mesh pool"),
        );
        for _ in 0..w_mesh {
            let rx = mesh_job_rx.clone();
            let tx = mesh_res_tx.clone();
            let map = map.clone();
            let reg = reg.clone();
            let q = q_mesh.clone();
            let inflight = inflight_mesh.clone();
            mesh_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    q.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_mesh_job(job, map.as_ref(), reg.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        Self {
            gen_tx,
            mesh_tx,
            gen_rx,
            mesh_rx,
            _gen_pool: gen_pool,
            _mesh_pool: mesh_pool,
            q_gen,
            q_mesh,
            inflight_gen,
            inflight_mesh,
            w_gen,
            w_mesh,
        }
    }

    pub fn submit_gen(&self, job: GenJob) {
        self.q_gen.fetch_add(1, Ordering::Relaxed);
        if self.gen_tx.send(job).is_err() {
            self.q_gen.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn submit_mesh(&self, job: MeshJob) {
        self.q_mesh.fetch_add(1, Ordering::Relaxed);
        if self.mesh_tx.send(job).is_err() {
            self.q_mesh.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn drain_gen_results(&self) -> Vec<GenResult> {
        self.gen_rx.try_iter().collect()
    }

    pub fn drain_mesh_results(&self) -> Vec<MeshResult> {
        self.mesh_rx.try_iter().collect()
    }

    /// (gen queued, gen inflight, mesh queued, mesh inflight).
    pub fn queue_debug_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.q_gen.load(Ordering::Relaxed),
            self.inflight_gen.load(Ordering::Relaxed),
            self.q_mesh.load(Ordering::Relaxed),
            self.inflight_mesh.load(Ordering::Relaxed),
        )
    }
}
