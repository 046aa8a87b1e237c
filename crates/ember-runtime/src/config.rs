use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

fn default_render_distance() -> i32 {
    6
}

fn default_build_budget_ms() -> u64 {
    4
}

/// Engine knobs. `render_distance` is the one the host is expected to touch;
/// generation radius is always render + 1 so meshing never starves on
/// missing neighbors.
#[derive(Clone, Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_render_distance")]
    pub render_distance: i32,
    /// Worker thread count; None means all available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Accumulated main-thread time allowed for mesh uploads per frame.
    #[serde(default = "default_build_budget_ms")]
    pub max_chunk_build_per_frame_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_distance: default_render_distance(),
            workers: None,
            max_chunk_build_per_frame_ms: default_build_budget_ms(),
        }
    }
}

impl EngineConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: EngineConfig = toml::from_str(&text)?;
        if cfg.render_distance < 1 {
            return Err("render_distance must be at least 1".into());
        }
        Ok(cfg)
    }

    #[inline]
    pub fn generation_distance(&self) -> i32 {
        self.render_distance + 1
    }
}
