use std::collections::VecDeque;

use ember_blocks::BlockRegistry;
use ember_chunk::{ChunkMap, light_word};
use ember_world::ChunkCoord;

use crate::store::DeferredLightStore;
use crate::{DIRS, MAX_LIGHT, RemoveSkyNode, SkyLightNode};

/// Directional sky light: one 4-bit channel. Horizontal and upward steps cost
/// one level; the downward step costs the destination block's attenuation, so
/// open columns carry full daylight straight down and drop sharply at canopy.
pub struct SkyLightEngine;

impl SkyLightEngine {
    /// Seeds the chunk's top layer with `15 - attenuation` wherever sky light
    /// passes, then floods. Called when a chunk reaches VoxelOnly.
    pub fn seed_chunk(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        coord: ChunkCoord,
    ) {
        let Some(chunk) = map.get(coord) else {
            return;
        };
        let s = map.world().chunk_size;
        let top = map.world().height() - 1;
        let base_x = coord.cx * s as i32;
        let base_z = coord.cz * s as i32;
        let mut queue = VecDeque::new();
        for lz in 0..s {
            for lx in 0..s {
                let b = chunk.block_local(lx, top, lz);
                if !reg.is_sky_passable(b) {
                    continue;
                }
                let level = MAX_LIGHT.saturating_sub(reg.light_attenuation(b));
                if level == 0 {
                    continue;
                }
                let word = chunk.light_word(lx, top, lz);
                if light_word::sky(word) < level {
                    chunk.set_light_word(lx, top, lz, light_word::with_sky(word, level));
                }
                queue.push_back(SkyLightNode {
                    wx: base_x + lx as i32,
                    wy: top as i32,
                    wz: base_z + lz as i32,
                    level,
                });
            }
        }
        Self::propagate(map, reg, store, queue);
    }

    /// Core flood fill; monotonic like block light. Deferred contributions
    /// only arise on horizontal steps since columns span full world height.
    pub fn propagate(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        mut queue: VecDeque<SkyLightNode>,
    ) {
        let size = map.world().chunk_size;
        while let Some(node) = queue.pop_front() {
            if node.level == 0 {
                continue;
            }
            for (dx, dy, dz) in DIRS {
                let (nx, ny, nz) = (node.wx + dx, node.wy + dy, node.wz + dz);
                if !map.world().in_height_bounds(ny) {
                    continue;
                }
                let coord = ChunkCoord::of_world(nx, nz, size);
                let chunk = match map.get(coord) {
                    Some(c) if c.has_voxel_data() => c,
                    _ => {
                        let stepped = node.level.saturating_sub(1);
                        if stepped > 0 {
                            store.push_sky(coord, nx, ny, nz, stepped);
                        }
                        continue;
                    }
                };
                let Some((_, (lx, ly, lz))) = map.to_local(nx, ny, nz) else {
                    continue;
                };
                let b = chunk.block_local(lx, ly, lz);
                if !reg.is_sky_passable(b) {
                    continue;
                }
                let cost = if dy < 0 { reg.light_attenuation(b) } else { 1 };
                let stepped = node.level.saturating_sub(cost);
                if stepped == 0 {
                    continue;
                }
                let word = chunk.light_word(lx, ly, lz);
                if light_word::sky(word) >= stepped {
                    continue;
                }
                chunk.set_light_word(lx, ly, lz, light_word::with_sky(word, stepped));
                queue.push_back(SkyLightNode {
                    wx: nx,
                    wy: ny,
                    wz: nz,
                    level: stepped,
                });
            }
        }
    }

    /// Removal mirror of the block-light pass. Downward steps also clear on
    /// equality: a zero-cost descent produces a value equal to its support,
    /// and that support can only have come through the removed cell's column.
    pub fn remove_at(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        wx: i32,
        wy: i32,
        wz: i32,
    ) {
        let word = map.light_word_at_world(wx, wy, wz);
        let removed = light_word::sky(word);
        if removed == 0 {
            return;
        }
        map.set_light_word_at_world(wx, wy, wz, light_word::with_sky(word, 0));
        let mut removals = VecDeque::new();
        removals.push_back(RemoveSkyNode {
            wx,
            wy,
            wz,
            level: removed,
        });
        let mut readd: VecDeque<SkyLightNode> = VecDeque::new();
        while let Some(node) = removals.pop_front() {
            for (dx, dy, dz) in DIRS {
                let (nx, ny, nz) = (node.wx + dx, node.wy + dy, node.wz + dz);
                if !map.world().in_height_bounds(ny) {
                    continue;
                }
                let Some((coord, (lx, ly, lz))) = map.to_local(nx, ny, nz) else {
                    continue;
                };
                let chunk = match map.get(coord) {
                    Some(c) if c.has_voxel_data() => c,
                    _ => continue,
                };
                let nword = chunk.light_word(lx, ly, lz);
                let cur = light_word::sky(nword);
                if cur == 0 {
                    continue;
                }
                let caused_by_source = cur < node.level || (dy < 0 && cur == node.level);
                if caused_by_source {
                    chunk.set_light_word(lx, ly, lz, light_word::with_sky(nword, 0));
                    removals.push_back(RemoveSkyNode {
                        wx: nx,
                        wy: ny,
                        wz: nz,
                        level: cur,
                    });
                } else {
                    readd.push_back(SkyLightNode {
                        wx: nx,
                        wy: ny,
                        wz: nz,
                        level: cur,
                    });
                }
            }
        }
        Self::propagate(map, reg, store, readd);
    }

    /// Blocker removal: re-seed the neighbors' surviving values so daylight
    /// flows into the newly opened cell.
    pub fn reseed_neighbors(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        wx: i32,
        wy: i32,
        wz: i32,
    ) {
        let mut queue = VecDeque::new();
        for (dx, dy, dz) in DIRS {
            let (nx, ny, nz) = (wx + dx, wy + dy, wz + dz);
            let level = light_word::sky(map.light_word_at_world(nx, ny, nz));
            if level > 0 {
                queue.push_back(SkyLightNode {
                    wx: nx,
                    wy: ny,
                    wz: nz,
                    level,
                });
            }
        }
        Self::propagate(map, reg, store, queue);
    }

    /// Replays deferred sky contributions for a freshly voxel-ready chunk.
    pub fn replay_deferred(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        coord: ChunkCoord,
        entries: &[crate::PendingLight],
    ) {
        let mut queue = VecDeque::new();
        for p in entries {
            if p.sky == 0 {
                continue;
            }
            let Some((c, (lx, ly, lz))) = map.to_local(p.wx, p.wy, p.wz) else {
                continue;
            };
            debug_assert_eq!(c, coord);
            let Some(chunk) = map.get(coord) else {
                return;
            };
            if !reg.is_sky_passable(chunk.block_local(lx, ly, lz)) {
                continue;
            }
            let word = chunk.light_word(lx, ly, lz);
            if light_word::sky(word) >= p.sky {
                continue;
            }
            chunk.set_light_word(lx, ly, lz, light_word::with_sky(word, p.sky));
            queue.push_back(SkyLightNode {
                wx: p.wx,
                wy: p.wy,
                wz: p.wz,
                level: p.sky,
            });
        }
        Self::propagate(map, reg, store, queue);
    }
}
