use ember_blocks::{Block, BlockRegistry};
use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::World;

/// Per-column control values sampled once before walking a column.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerrainControl {
    /// Terrain surface height in world voxels.
    pub surface: i32,
    /// 0..1 knob mixing flat plains into rough hills.
    pub roughness: f32,
}

/// Pure terrain functions consumed during voxel generation. Implementations
/// must be deterministic in (seed, coordinates) so workers can generate the
/// same column in any order.
pub trait TerrainSource: Send + Sync {
    fn column_control(&self, wx: i32, wz: i32) -> TerrainControl;

    fn density(&self, wx: i32, wy: i32, wz: i32, ctl: &TerrainControl) -> f32;

    /// Maps a density sample to a concrete block. The default gives a
    /// stone/dirt/grass layering; implementations may override for biomes.
    fn block_at(
        &self,
        reg: &BlockRegistry,
        _wx: i32,
        wy: i32,
        _wz: i32,
        ctl: &TerrainControl,
        density: f32,
    ) -> Block {
        if density <= 0.0 {
            return Block::AIR;
        }
        // Solid cells run up to surface - 1; the top one is grass.
        let named = |n: &str| reg.block_by_name_or_unknown(n);
        if wy >= ctl.surface - 1 {
            named("grass")
        } else if wy >= ctl.surface - 4 {
            named("dirt")
        } else {
            named("stone")
        }
    }
}

/// OpenSimplex2 height-field terrain with a low-frequency roughness warp.
pub struct NoiseTerrain {
    height: FastNoiseLite,
    rough: FastNoiseLite,
    base_height: i32,
    amplitude: f32,
    world_height: i32,
}

impl NoiseTerrain {
    pub fn new(world: &World) -> Self {
        let mut height = FastNoiseLite::with_seed(world.seed);
        height.set_noise_type(Some(NoiseType::OpenSimplex2));
        height.set_frequency(Some(0.008));
        let mut rough = FastNoiseLite::with_seed(world.seed ^ 0x51_F2A3);
        rough.set_noise_type(Some(NoiseType::OpenSimplex2));
        rough.set_frequency(Some(0.0015));
        let world_height = world.height() as i32;
        Self {
            height,
            rough,
            base_height: world_height / 3,
            amplitude: world_height as f32 / 4.0,
            world_height,
        }
    }
}

impl TerrainSource for NoiseTerrain {
    fn column_control(&self, wx: i32, wz: i32) -> TerrainControl {
        let roughness = (self.rough.get_noise_2d(wx as f32, wz as f32) * 0.5 + 0.5).clamp(0.0, 1.0);
        let h = self.height.get_noise_2d(wx as f32, wz as f32);
        let surface = self.base_height + (h * self.amplitude * (0.35 + 0.65 * roughness)) as i32;
        TerrainControl {
            surface: surface.clamp(1, self.world_height - 1),
            roughness,
        }
    }

    fn density(&self, _wx: i32, wy: i32, _wz: i32, ctl: &TerrainControl) -> f32 {
        (ctl.surface - wy) as f32
    }
}

/// Flat slab of stone up to a fixed height. Deterministic and cheap; used by
/// tests and the headless demo's `--flat` mode.
pub struct FlatTerrain {
    pub thickness: i32,
}

impl FlatTerrain {
    pub fn new(thickness: i32) -> Self {
        Self { thickness }
    }
}

impl TerrainSource for FlatTerrain {
    fn column_control(&self, _wx: i32, _wz: i32) -> TerrainControl {
        TerrainControl {
            surface: self.thickness,
            roughness: 0.0,
        }
    }

    fn density(&self, _wx: i32, wy: i32, _wz: i32, ctl: &TerrainControl) -> f32 {
        (ctl.surface - wy) as f32
    }

    fn block_at(
        &self,
        reg: &BlockRegistry,
        _wx: i32,
        _wy: i32,
        _wz: i32,
        _ctl: &TerrainControl,
        density: f32,
    ) -> Block {
        if density <= 0.0 {
            Block::AIR
        } else {
            reg.block_by_name_or_unknown("stone")
        }
    }
}
