use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::{BlockDef, BlocksConfig, StateFieldDef};
use crate::types::{Block, BlockId, BlockType, Shape, StateField};

pub const MAX_LIGHT: u8 = 15;

/// Immutable table of block types, built once at startup and passed by
/// reference into every component that needs block metadata.
#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
    pub unknown_block_id: Option<BlockId>,
    air_id: BlockId,
}

impl BlockRegistry {
    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn air_id(&self) -> BlockId {
        self.air_id
    }

    #[inline]
    pub fn is_air(&self, b: Block) -> bool {
        b.id == self.air_id
    }

    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::new)
    }

    /// Name lookup that degrades to the configured unknown block, then air.
    pub fn block_by_name_or_unknown(&self, name: &str) -> Block {
        self.id_by_name(name)
            .or(self.unknown_block_id)
            .map(Block::new)
            .unwrap_or(Block::AIR)
    }

    /// Whether block light may enter this voxel.
    #[inline]
    pub fn is_light_passable(&self, b: Block) -> bool {
        if self.is_air(b) {
            return true;
        }
        self.get(b.id).map(|ty| ty.is_light_passable()).unwrap_or(false)
    }

    /// Whether sky light may enter this voxel.
    #[inline]
    pub fn is_sky_passable(&self, b: Block) -> bool {
        if self.is_air(b) {
            return true;
        }
        self.get(b.id).map(|ty| !ty.blocks_skylight).unwrap_or(false)
    }

    #[inline]
    pub fn is_light_source(&self, b: Block) -> bool {
        self.get(b.id).map(|ty| ty.is_light_source()).unwrap_or(false)
    }

    #[inline]
    pub fn light_source_level(&self, b: Block) -> [u8; 3] {
        self.get(b.id).map(|ty| ty.light_source_level()).unwrap_or([0; 3])
    }

    /// Sky-light cost of the downward step into this voxel, clamped to 0-15.
    #[inline]
    pub fn light_attenuation(&self, b: Block) -> u8 {
        self.get(b.id)
            .map(|ty| ty.light_attenuation().min(MAX_LIGHT))
            .unwrap_or(0)
    }

    #[inline]
    pub fn is_full_opaque(&self, b: Block) -> bool {
        self.get(b.id).map(|ty| ty.is_full_opaque()).unwrap_or(false)
    }

    #[inline]
    pub fn is_translucent(&self, b: Block) -> bool {
        self.get(b.id).map(|ty| ty.is_translucent()).unwrap_or(false)
    }

    #[inline]
    pub fn shape(&self, b: Block) -> Shape {
        self.get(b.id).map(|ty| ty.shape).unwrap_or(Shape::Empty)
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(blocks_path)?;
        let cfg: BlocksConfig = toml::from_str(&text)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::default();
        let profiles = cfg
            .lighting
            .as_ref()
            .map(|l| l.profiles.clone())
            .unwrap_or_default();
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if reg.blocks.len() != id as usize {
                return Err(format!(
                    "block '{}' declared id {} but registry is at {}",
                    def.name,
                    id,
                    reg.blocks.len()
                )
                .into());
            }
            let ty = compile_block(&profiles, def, id)?;
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks.push(ty);
        }
        reg.air_id = reg.id_by_name("air").unwrap_or(0);
        reg.unknown_block_id = cfg.unknown_block.as_deref().and_then(|n| reg.id_by_name(n));
        Ok(reg)
    }
}

fn compile_block(
    profiles: &HashMap<String, crate::config::LightProfile>,
    def: BlockDef,
    id: BlockId,
) -> Result<BlockType, Box<dyn Error>> {
    let solid = def.solid.unwrap_or(true);
    let blocks_skylight = def.blocks_skylight.unwrap_or(solid);
    let propagates_light = def.propagates_light.unwrap_or(!solid);
    let profile = def
        .light_profile
        .as_deref()
        .and_then(|name| profiles.get(name));
    let emission = def
        .emission
        .or(profile.map(|p| p.emission))
        .unwrap_or([0; 3]);
    let sky_attenuation = def
        .sky_attenuation
        .or(profile.map(|p| p.sky_attenuation))
        .unwrap_or(if blocks_skylight { MAX_LIGHT } else { 0 });
    let shape = def
        .shape
        .as_deref()
        .map(Shape::from_name)
        .unwrap_or(Shape::Full);
    let state_fields = compile_state_schema(&def.name, def.state_schema.unwrap_or_default())?;
    Ok(BlockType {
        id,
        name: def.name,
        shape,
        solid,
        blocks_skylight,
        propagates_light,
        emission: emission.map(|c| c.min(MAX_LIGHT)),
        sky_attenuation: sky_attenuation.min(MAX_LIGHT),
        state_fields,
    })
}

/// Assigns sequential bit offsets to the declared fields. The layout belongs
/// to one block type; nothing is shared across types.
fn compile_state_schema(
    block_name: &str,
    schema: Vec<StateFieldDef>,
) -> Result<HashMap<String, StateField>, Box<dyn Error>> {
    let mut fields = HashMap::new();
    let mut offset = 0u8;
    for f in schema {
        if f.width == 0 || f.width > 16 {
            return Err(format!("block '{block_name}': field '{}' has bad width", f.name).into());
        }
        if offset + f.width > 16 {
            return Err(format!("block '{block_name}': state schema exceeds 16 bits").into());
        }
        fields.insert(
            f.name,
            StateField {
                offset,
                width: f.width,
            },
        );
        offset += f.width;
    }
    Ok(fields)
}
