use std::collections::VecDeque;

use ember_blocks::BlockRegistry;
use ember_chunk::{ChunkMap, light_word};
use ember_world::ChunkCoord;

use crate::store::DeferredLightStore;
use crate::{DIRS, LightNode, RemoveLightNode};

/// Point-source block light: three independent 4-bit channels, each losing
/// one level per step.
pub struct BlockLightEngine;

impl BlockLightEngine {
    /// Seeds every emitter recorded in the chunk's subchunk source lists and
    /// floods outward. Called when a chunk reaches VoxelOnly.
    pub fn seed_chunk(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        coord: ChunkCoord,
    ) {
        let Some(chunk) = map.get(coord) else {
            return;
        };
        let s = map.world().chunk_size as i32;
        let base_x = coord.cx * s;
        let base_z = coord.cz * s;
        let mut queue = VecDeque::new();
        for (lx, ly, lz) in chunk.emitter_cells() {
            let emission = reg.light_source_level(chunk.block_local(lx, ly, lz));
            if emission == [0; 3] {
                continue;
            }
            let word = chunk.light_word(lx, ly, lz);
            let merged = max_rgb(light_word::rgb(word), emission);
            chunk.set_light_word(lx, ly, lz, light_word::with_rgb(word, merged));
            queue.push_back(LightNode {
                wx: base_x + lx as i32,
                wy: ly as i32,
                wz: base_z + lz as i32,
                rgb: merged,
            });
        }
        Self::propagate(map, reg, store, queue);
    }

    /// Raises the cell to at least `rgb` and floods outward. Used when an
    /// emitting block is placed.
    pub fn place_source(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        wx: i32,
        wy: i32,
        wz: i32,
        rgb: [u8; 3],
    ) {
        let word = map.light_word_at_world(wx, wy, wz);
        let merged = max_rgb(light_word::rgb(word), rgb);
        map.set_light_word_at_world(wx, wy, wz, light_word::with_rgb(word, merged));
        let mut queue = VecDeque::new();
        queue.push_back(LightNode {
            wx,
            wy,
            wz,
            rgb: merged,
        });
        Self::propagate(map, reg, store, queue);
    }

    /// Core flood fill. Values only ever rise here; lowering is the removal
    /// pass's job. Light that would enter a chunk without voxel data is
    /// deferred, pre-decremented, keyed by that chunk's coordinate.
    pub fn propagate(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        mut queue: VecDeque<LightNode>,
    ) {
        let size = map.world().chunk_size;
        while let Some(node) = queue.pop_front() {
            let stepped = step_down(node.rgb);
            if stepped == [0; 3] {
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
                        store.push_block(coord, nx, ny, nz, stepped);
                        continue;
                    }
                };
                let Some((_, (lx, ly, lz))) = map.to_local(nx, ny, nz) else {
                    continue;
                };
                if !reg.is_light_passable(chunk.block_local(lx, ly, lz)) {
                    continue;
                }
                let word = chunk.light_word(lx, ly, lz);
                let cur = light_word::rgb(word);
                if !brighter_any(stepped, cur) {
                    continue;
                }
                let merged = max_rgb(cur, stepped);
                chunk.set_light_word(lx, ly, lz, light_word::with_rgb(word, merged));
                queue.push_back(LightNode {
                    wx: nx,
                    wy: ny,
                    wz: nz,
                    rgb: merged,
                });
            }
        }
    }

    /// Two-phase removal: zero every channel strictly dimmer than the value
    /// being removed (it must have come from this source), queue every
    /// greater-or-equal channel as an independently-sourced survivor, then
    /// re-flow the survivors through ordinary propagation.
    pub fn remove_at(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        wx: i32,
        wy: i32,
        wz: i32,
    ) {
        let word = map.light_word_at_world(wx, wy, wz);
        let removed = light_word::rgb(word);
        if removed == [0; 3] {
            return;
        }
        map.set_light_word_at_world(wx, wy, wz, light_word::with_rgb(word, [0; 3]));
        let mut removals = VecDeque::new();
        removals.push_back(RemoveLightNode {
            wx,
            wy,
            wz,
            rgb: removed,
        });
        let mut readd: VecDeque<LightNode> = VecDeque::new();
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
                let cur = light_word::rgb(nword);
                let mut cleared = [0u8; 3];
                let mut kept = cur;
                let mut survivors = [0u8; 3];
                let mut any_cleared = false;
                let mut any_survivor = false;
                for c in 0..3 {
                    if cur[c] == 0 || node.rgb[c] == 0 {
                        continue;
                    }
                    if cur[c] < node.rgb[c] {
                        cleared[c] = cur[c];
                        kept[c] = 0;
                        any_cleared = true;
                    } else {
                        survivors[c] = cur[c];
                        any_survivor = true;
                    }
                }
                if any_cleared {
                    // A cleared cell may itself emit; restore its emission and
                    // queue it for reflow, or a dimmer independent source
                    // inside the cone would be wiped along with the field.
                    let emission = reg.light_source_level(chunk.block_local(lx, ly, lz));
                    let restored = max_rgb(kept, emission);
                    chunk.set_light_word(lx, ly, lz, light_word::with_rgb(nword, restored));
                    removals.push_back(RemoveLightNode {
                        wx: nx,
                        wy: ny,
                        wz: nz,
                        rgb: cleared,
                    });
                    if restored != kept {
                        readd.push_back(LightNode {
                            wx: nx,
                            wy: ny,
                            wz: nz,
                            rgb: restored,
                        });
                    }
                }
                if any_survivor {
                    readd.push_back(LightNode {
                        wx: nx,
                        wy: ny,
                        wz: nz,
                        rgb: survivors,
                    });
                }
            }
        }
        Self::propagate(map, reg, store, readd);
    }

    /// A solid block was broken: nothing changed at the neighbors, so re-seed
    /// their existing values and let light flow through the now-open cell.
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
            let rgb = light_word::rgb(map.light_word_at_world(nx, ny, nz));
            if rgb != [0; 3] {
                queue.push_back(LightNode {
                    wx: nx,
                    wy: ny,
                    wz: nz,
                    rgb,
                });
            }
        }
        Self::propagate(map, reg, store, queue);
    }

    /// Replays the deferred mailbox for a chunk that just became voxel-ready.
    pub fn replay_deferred(
        map: &ChunkMap,
        reg: &BlockRegistry,
        store: &DeferredLightStore,
        coord: ChunkCoord,
        entries: &[crate::PendingLight],
    ) {
        let mut queue = VecDeque::new();
        for p in entries {
            if p.rgb == [0; 3] {
                continue;
            }
            let Some((c, (lx, ly, lz))) = map.to_local(p.wx, p.wy, p.wz) else {
                continue;
            };
            debug_assert_eq!(c, coord);
            let Some(chunk) = map.get(coord) else {
                return;
            };
            if !reg.is_light_passable(chunk.block_local(lx, ly, lz)) {
                continue;
            }
            let word = chunk.light_word(lx, ly, lz);
            let cur = light_word::rgb(word);
            if !brighter_any(p.rgb, cur) {
                continue;
            }
            let merged = max_rgb(cur, p.rgb);
            chunk.set_light_word(lx, ly, lz, light_word::with_rgb(word, merged));
            queue.push_back(LightNode {
                wx: p.wx,
                wy: p.wy,
                wz: p.wz,
                rgb: merged,
            });
        }
        Self::propagate(map, reg, store, queue);
    }
}

#[inline]
fn step_down(rgb: [u8; 3]) -> [u8; 3] {
    rgb.map(|c| c.saturating_sub(1))
}

#[inline]
fn max_rgb(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])]
}

/// True when `a` exceeds `b` in at least one channel.
#[inline]
fn brighter_any(a: [u8; 3], b: [u8; 3]) -> bool {
    a[0] > b[0] || a[1] > b[1] || a[2] > b[2]
}
