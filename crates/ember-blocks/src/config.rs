//! Serde mirror of the on-disk block definitions.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    pub unknown_block: Option<String>,
    #[serde(default)]
    pub lighting: Option<LightingConfig>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LightingConfig {
    #[serde(default)]
    pub profiles: HashMap<String, LightProfile>,
}

/// Reusable emission/attenuation bundle referenced by name from block defs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LightProfile {
    #[serde(default)]
    pub emission: [u8; 3],
    #[serde(default)]
    pub sky_attenuation: u8,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub blocks_skylight: Option<bool>,
    #[serde(default)]
    pub propagates_light: Option<bool>,
    #[serde(default)]
    pub emission: Option<[u8; 3]>,
    #[serde(default)]
    pub sky_attenuation: Option<u8>,
    #[serde(default)]
    pub light_profile: Option<String>,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub state_schema: Option<Vec<StateFieldDef>>,
}

/// Declared in order; offsets are assigned sequentially at registry build.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StateFieldDef {
    pub name: String,
    pub width: u8,
}
