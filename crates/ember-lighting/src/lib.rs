//! Flood-fill lighting: block-light and sky-light BFS propagation, two-phase
//! removal with re-flow, and deferred cross-chunk contributions.
//!
//! All functions here are stateless over `(ChunkMap, BlockRegistry,
//! DeferredLightStore)` and are intended to run on the manager thread; chunk
//! light maps are reader-locked so mesh workers can sample concurrently.
#![forbid(unsafe_code)]

mod block;
mod sky;
mod store;

#[cfg(test)]
mod tests;

pub use block::BlockLightEngine;
pub use sky::SkyLightEngine;
pub use store::{DeferredLightStore, PendingLight};

pub const MAX_LIGHT: u8 = 15;

/// The six axis step directions. `DOWN` gets special sky attenuation.
pub(crate) const DIRS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
    (0, 1, 0),
    (0, -1, 0),
];

/// Transient block-light BFS work item; queued and discarded within one pass.
#[derive(Clone, Copy, Debug)]
pub struct LightNode {
    pub wx: i32,
    pub wy: i32,
    pub wz: i32,
    pub rgb: [u8; 3],
}

#[derive(Clone, Copy, Debug)]
pub struct RemoveLightNode {
    pub wx: i32,
    pub wy: i32,
    pub wz: i32,
    pub rgb: [u8; 3],
}

/// Transient sky-light BFS work item.
#[derive(Clone, Copy, Debug)]
pub struct SkyLightNode {
    pub wx: i32,
    pub wy: i32,
    pub wz: i32,
    pub level: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct RemoveSkyNode {
    pub wx: i32,
    pub wy: i32,
    pub wz: i32,
    pub level: u8,
}
