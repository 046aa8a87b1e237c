use std::collections::HashMap;

pub type BlockId = u16;

/// Packed block value: a registry id plus up to 16 bits of state metadata.
/// Equality is structural over both halves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
    pub state: u16,
}

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self { id, state: 0 }
    }
}

/// Closed set of block shapes. New shapes are rare and hand-written, so the
/// mesher and placement logic dispatch over this enum exhaustively instead of
/// a per-block virtual hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Full,
    Slab,
    CrossQuad,
    Log,
    Water,
    Glass,
    Leaves,
    Empty,
}

impl Shape {
    pub fn from_name(name: &str) -> Shape {
        match name {
            "full" | "cube" => Shape::Full,
            "slab" => Shape::Slab,
            "cross" | "cross_quad" => Shape::CrossQuad,
            "log" => Shape::Log,
            "water" => Shape::Water,
            "glass" => Shape::Glass,
            "leaves" => Shape::Leaves,
            _ => Shape::Empty,
        }
    }

    /// Every face of this shape fills its voxel face and blocks sight/light.
    #[inline]
    pub fn is_full_opaque(self) -> bool {
        matches!(self, Shape::Full | Shape::Log)
    }

    /// Drawn in the translucent pass rather than the solid one.
    #[inline]
    pub fn is_translucent(self) -> bool {
        matches!(self, Shape::Water | Shape::Glass | Shape::Leaves)
    }
}

/// Bit placement of one named state property within a block's 16 state bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateField {
    pub offset: u8,
    pub width: u8,
}

impl StateField {
    #[inline]
    pub fn read(self, state: u16) -> u16 {
        (state >> self.offset) & ((1u16 << self.width) - 1)
    }

    #[inline]
    pub fn write(self, state: u16, value: u16) -> u16 {
        let mask = ((1u16 << self.width) - 1) << self.offset;
        (state & !mask) | ((value << self.offset) & mask)
    }
}

/// One registered block type. The property bit layout is computed once when
/// the registry is built and lives here, on the type, not on block values.
#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub shape: Shape,
    pub solid: bool,
    pub blocks_skylight: bool,
    pub propagates_light: bool,
    /// RGB emission, 0-15 per channel. All-zero means not a light source.
    pub emission: [u8; 3],
    /// Sky-light cost of passing downward through this block, 0-15.
    pub sky_attenuation: u8,
    pub state_fields: HashMap<String, StateField>,
}

impl BlockType {
    #[inline]
    pub fn is_light_source(&self) -> bool {
        self.emission.iter().any(|&c| c > 0)
    }

    #[inline]
    pub fn light_source_level(&self) -> [u8; 3] {
        self.emission
    }

    #[inline]
    pub fn is_light_passable(&self) -> bool {
        self.propagates_light
    }

    #[inline]
    pub fn light_attenuation(&self) -> u8 {
        self.sky_attenuation
    }

    #[inline]
    pub fn is_full_opaque(&self) -> bool {
        self.solid && self.shape.is_full_opaque()
    }

    #[inline]
    pub fn is_translucent(&self) -> bool {
        self.shape.is_translucent()
    }

    /// Decodes a named property from a state word, if this type declares it.
    pub fn state_value(&self, state: u16, field: &str) -> Option<u16> {
        self.state_fields.get(field).map(|f| f.read(state))
    }

    /// Packs named property values into a state word. Unknown names are
    /// ignored so callers can share placement code across types.
    pub fn pack_state(&self, values: &[(&str, u16)]) -> u16 {
        let mut state = 0u16;
        for (name, v) in values {
            if let Some(f) = self.state_fields.get(*name) {
                state = f.write(state, *v);
            }
        }
        state
    }
}
