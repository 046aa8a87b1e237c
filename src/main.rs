//! Headless streaming demo: walks an observer across a generated world and
//! logs pipeline counters, exercising the full chunk lifecycle without a
//! renderer attached.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use ember::blocks::BlockRegistry;
use ember::runtime::{ChunkManager, EngineConfig, NullUploader};
use ember::world::{FlatTerrain, NoiseTerrain, TerrainSource, World};

#[derive(Parser, Debug)]
#[command(name = "ember", about = "Headless voxel streaming demo")]
struct Args {
    /// Chunk render radius around the observer.
    #[arg(long, default_value_t = 6)]
    render_distance: i32,

    /// World seed.
    #[arg(long, default_value_t = 1337)]
    seed: i32,

    /// Ticks to run before exiting.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Observer speed in blocks per tick.
    #[arg(long, default_value_t = 0.5)]
    speed: f32,

    /// Use the flat test terrain instead of noise.
    #[arg(long)]
    flat: bool,

    /// Block definitions file.
    #[arg(long, default_value = "assets/voxels/blocks.toml")]
    blocks: String,

    /// Optional engine config file; CLI flags win over it.
    #[arg(long)]
    config: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let reg = match BlockRegistry::load_from_path(&args.blocks) {
        Ok(reg) => Arc::new(reg),
        Err(e) => {
            log::error!("failed to load {}: {e}", args.blocks);
            std::process::exit(1);
        }
    };

    let mut cfg = match &args.config {
        Some(path) => match EngineConfig::load_from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };
    cfg.render_distance = args.render_distance;

    let world = World::new(args.seed);
    let terrain: Arc<dyn TerrainSource> = if args.flat {
        Arc::new(FlatTerrain::new(world.height() as i32 / 3))
    } else {
        Arc::new(NoiseTerrain::new(&world))
    };

    let mut mgr = ChunkManager::new(world, reg, terrain, cfg);
    let mut uploader = NullUploader::default();

    let mut last_report = Instant::now();
    for tick in 0..args.ticks {
        let wx = (tick as f32 * args.speed) as i32;
        mgr.update(wx, 0, &mut uploader);

        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            let q = mgr.queue_debug_counts();
            log::info!(
                "tick {tick}: chunks={} built={} live_meshes={} queues={q:?}",
                mgr.map().len(),
                mgr.built_count(),
                uploader.live,
            );
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    log::info!(
        "done: {} chunks registered, {} built, {} uploads / {} releases",
        mgr.map().len(),
        mgr.built_count(),
        uploader.uploads,
        uploader.releases,
    );
}
