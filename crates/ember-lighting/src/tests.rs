use std::collections::VecDeque;
use std::sync::Arc;

use ember_blocks::config::{BlockDef, BlocksConfig};
use ember_blocks::{Block, BlockRegistry};
use ember_chunk::{Chunk, ChunkMap, ChunkState, SubChunk, light_word};
use ember_world::{ChunkCoord, World};

use crate::{BlockLightEngine, DeferredLightStore, LightNode, SkyLightEngine};

fn def(name: &str, id: u16) -> BlockDef {
    BlockDef {
        name: name.into(),
        id: Some(id),
        ..Default::default()
    }
}

fn make_registry() -> BlockRegistry {
    let blocks = vec![
        BlockDef {
            solid: Some(false),
            ..def("air", 0)
        },
        BlockDef {
            solid: Some(true),
            ..def("stone", 1)
        },
        BlockDef {
            solid: Some(false),
            emission: Some([15, 15, 15]),
            ..def("glowstone", 2)
        },
        BlockDef {
            solid: Some(false),
            emission: Some([12, 0, 0]),
            ..def("ember_lamp", 3)
        },
        BlockDef {
            solid: Some(false),
            blocks_skylight: Some(false),
            sky_attenuation: Some(2),
            ..def("leaves", 4)
        },
    ];
    BlockRegistry::from_config(BlocksConfig {
        blocks,
        lighting: None,
        unknown_block: None,
    })
    .unwrap()
}

fn ready_air_chunk(map: &ChunkMap, coord: ChunkCoord) {
    let world = *map.world();
    let chunk = Arc::new(Chunk::new(coord, &world));
    let subchunks = (0..world.subchunks_y).map(|_| SubChunk::new()).collect();
    chunk.install_voxels(subchunks);
    chunk.set_state(ChunkState::VoxelOnly);
    map.insert(chunk);
}

fn setup() -> (ChunkMap, BlockRegistry, DeferredLightStore) {
    let map = ChunkMap::new(World::new(0));
    ready_air_chunk(&map, ChunkCoord::new(0, 0));
    (map, make_registry(), DeferredLightStore::new())
}

fn place_source(map: &ChunkMap, reg: &BlockRegistry, store: &DeferredLightStore, pos: (i32, i32, i32), name: &str) {
    let b = reg.block_by_name(name).unwrap();
    map.set_block_at_world(pos.0, pos.1, pos.2, b, reg);
    BlockLightEngine::place_source(map, reg, store, pos.0, pos.1, pos.2, reg.light_source_level(b));
}

fn remove_source(map: &ChunkMap, reg: &BlockRegistry, store: &DeferredLightStore, pos: (i32, i32, i32)) {
    map.set_block_at_world(pos.0, pos.1, pos.2, Block::AIR, reg);
    BlockLightEngine::remove_at(map, reg, store, pos.0, pos.1, pos.2);
}

fn rgb_at(map: &ChunkMap, x: i32, y: i32, z: i32) -> [u8; 3] {
    light_word::rgb(map.light_word_at_world(x, y, z))
}

fn sky_at(map: &ChunkMap, x: i32, y: i32, z: i32) -> u8 {
    light_word::sky(map.light_word_at_world(x, y, z))
}

fn block_field(map: &ChunkMap, around: (i32, i32, i32), radius: i32) -> Vec<[u8; 3]> {
    let mut out = Vec::new();
    for dy in -radius..=radius {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                out.push(rgb_at(map, around.0 + dx, around.1 + dy, around.2 + dz));
            }
        }
    }
    out
}

#[test]
fn corridor_attenuates_one_per_step() {
    let (map, reg, store) = setup();
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    for d in 0..=15i32 {
        let expect = (15 - d).max(0) as u8;
        if 8 + d < 16 {
            assert_eq!(rgb_at(&map, 8 + d, 64, 8), [expect; 3], "distance {d}");
        }
        assert_eq!(rgb_at(&map, 8, 64 + d, 8), [expect; 3], "vertical distance {d}");
    }
}

#[test]
fn opaque_blocks_stop_propagation() {
    let (map, reg, store) = setup();
    let stone = reg.block_by_name("stone").unwrap();
    // Wall one step east of the source.
    for dy in -2..=2 {
        for dz in -2..=2 {
            map.set_block_at_world(10, 64 + dy, 8 + dz, stone, &reg);
        }
    }
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    assert_eq!(rgb_at(&map, 9, 64, 8), [14; 3]);
    assert_eq!(rgb_at(&map, 10, 64, 8), [0; 3]);
    // Directly behind the wall: only light that went around reaches it.
    assert!(rgb_at(&map, 11, 64, 8)[0] < 13);
}

#[test]
fn removal_restores_the_unlit_field() {
    let (map, reg, store) = setup();
    let baseline = block_field(&map, (8, 64, 8), 6);
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    remove_source(&map, &reg, &store, (8, 64, 8));
    assert_eq!(block_field(&map, (8, 64, 8), 6), baseline);
}

#[test]
fn independent_source_survives_removal() {
    let (map, reg, store) = setup();
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    let solo = block_field(&map, (8, 64, 8), 6);
    place_source(&map, &reg, &store, (12, 64, 8), "glowstone");
    remove_source(&map, &reg, &store, (12, 64, 8));
    let after = block_field(&map, (8, 64, 8), 6);
    for (a, b) in after.iter().zip(solo.iter()) {
        for c in 0..3 {
            assert!(a[c] >= b[c], "removal dropped a cell below the solo field");
        }
    }
}

#[test]
fn dimmer_source_inside_the_removal_cone_survives() {
    let (map, reg, store) = setup();
    // The lamp's whole field sits strictly below the glowstone's, so the
    // removal wavefront clears its every cell; the lamp must re-seed itself.
    place_source(&map, &reg, &store, (10, 64, 8), "ember_lamp");
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    remove_source(&map, &reg, &store, (8, 64, 8));
    assert_eq!(rgb_at(&map, 10, 64, 8), [12, 0, 0]);
    assert_eq!(rgb_at(&map, 9, 64, 8), [11, 0, 0]);
    assert_eq!(rgb_at(&map, 11, 64, 8), [11, 0, 0]);
    assert_eq!(rgb_at(&map, 14, 64, 8), [8, 0, 0]);
    // No residue of the removed source: what remains is the lamp's own
    // field, 12 minus the step distance in red only.
    assert_eq!(rgb_at(&map, 8, 64, 8), [10, 0, 0]);
    assert_eq!(rgb_at(&map, 8, 70, 8), [4, 0, 0]);
}

#[test]
fn channels_are_independent() {
    let (map, reg, store) = setup();
    place_source(&map, &reg, &store, (4, 64, 8), "ember_lamp");
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    // Red is served by both (max wins); green/blue only by the glowstone.
    assert_eq!(rgb_at(&map, 6, 64, 8), [13, 13, 13]);
    assert_eq!(rgb_at(&map, 5, 64, 8), [12, 12, 12]);
    assert_eq!(rgb_at(&map, 4, 64, 8), [12, 11, 11]);
    // Removing the lamp must not dent the glowstone's field.
    remove_source(&map, &reg, &store, (4, 64, 8));
    assert_eq!(rgb_at(&map, 5, 64, 8), [12, 12, 12]);
    assert_eq!(rgb_at(&map, 4, 64, 8), [11, 11, 11]);
}

#[test]
fn blocker_removal_reflows_existing_light() {
    let (map, reg, store) = setup();
    let stone = reg.block_by_name("stone").unwrap();
    map.set_block_at_world(10, 64, 8, stone, &reg);
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    assert_eq!(rgb_at(&map, 10, 64, 8), [0; 3]);
    // Break the blocker: no removal needed, just reseed the neighbors.
    map.set_block_at_world(10, 64, 8, Block::AIR, &reg);
    BlockLightEngine::reseed_neighbors(&map, &reg, &store, 10, 64, 8);
    assert_eq!(rgb_at(&map, 10, 64, 8), [13; 3]);
}

#[test]
fn monotonic_propagation_never_lowers() {
    let (map, reg, store) = setup();
    place_source(&map, &reg, &store, (8, 64, 8), "glowstone");
    let before = block_field(&map, (8, 64, 8), 6);
    // Re-running the same propagation is a no-op, never a downgrade.
    let mut q = VecDeque::new();
    q.push_back(LightNode {
        wx: 8,
        wy: 64,
        wz: 8,
        rgb: [15; 3],
    });
    BlockLightEngine::propagate(&map, &reg, &store, q);
    assert_eq!(block_field(&map, (8, 64, 8), 6), before);
}

#[test]
fn sky_seeds_full_daylight_down_open_columns() {
    let (map, reg, store) = setup();
    SkyLightEngine::seed_chunk(&map, &reg, &store, ChunkCoord::new(0, 0));
    let top = map.world().height() as i32 - 1;
    assert_eq!(sky_at(&map, 5, top, 5), 15);
    assert_eq!(sky_at(&map, 5, 0, 5), 15);
}

#[test]
fn canopy_attenuates_downward_step() {
    let (map, reg, store) = setup();
    let leaves = reg.block_by_name("leaves").unwrap();
    let stone = reg.block_by_name("stone").unwrap();
    // Roof the whole top layer in stone except one leaf cell, so the only
    // daylight entering the chunk passes through the canopy.
    let top = map.world().height() as i32 - 1;
    for z in 0..16 {
        for x in 0..16 {
            let b = if (x, z) == (5, 5) { leaves } else { stone };
            map.set_block_at_world(x, top, z, b, &reg);
        }
    }
    SkyLightEngine::seed_chunk(&map, &reg, &store, ChunkCoord::new(0, 0));
    // Leaf cell seeds at 15 - 2; the open air below falls without loss.
    assert_eq!(sky_at(&map, 5, top, 5), 13);
    assert_eq!(sky_at(&map, 5, top - 1, 5), 13);
    assert_eq!(sky_at(&map, 5, 0, 5), 13);
    // Horizontal spread under the roof loses one per step.
    assert_eq!(sky_at(&map, 6, top - 1, 5), 12);
    assert_eq!(sky_at(&map, 7, top - 1, 5), 11);
}

#[test]
fn sky_removal_clears_the_shadow_column() {
    let (map, reg, store) = setup();
    SkyLightEngine::seed_chunk(&map, &reg, &store, ChunkCoord::new(0, 0));
    let stone = reg.block_by_name("stone").unwrap();
    map.set_block_at_world(8, 100, 8, stone, &reg);
    SkyLightEngine::remove_at(&map, &reg, &store, 8, 100, 8);
    assert_eq!(sky_at(&map, 8, 100, 8), 0);
    // Below the blocker the straight-down path is gone; what remains came
    // sideways from the neighboring open columns.
    assert_eq!(sky_at(&map, 8, 99, 8), 14);
    assert_eq!(sky_at(&map, 8, 101, 8), 15);
}

#[test]
fn cross_chunk_light_is_deferred_and_replayed() {
    let (map, reg, store) = setup();
    // Source near the +X border of chunk (0,0); chunk (1,0) does not exist.
    place_source(&map, &reg, &store, (14, 64, 8), "glowstone");
    assert!(store.pending_chunks() > 0);

    // Control world where both chunks existed from the start.
    let control = ChunkMap::new(World::new(0));
    ready_air_chunk(&control, ChunkCoord::new(0, 0));
    ready_air_chunk(&control, ChunkCoord::new(1, 0));
    let cstore = DeferredLightStore::new();
    place_source(&control, &reg, &cstore, (14, 64, 8), "glowstone");

    // Chunk (1,0) loads; its mailbox is consumed exactly once.
    ready_air_chunk(&map, ChunkCoord::new(1, 0));
    let coord = ChunkCoord::new(1, 0);
    let entries = store.take(coord);
    assert!(!entries.is_empty());
    BlockLightEngine::replay_deferred(&map, &reg, &store, coord, &entries);
    SkyLightEngine::replay_deferred(&map, &reg, &store, coord, &entries);
    assert!(store.take(coord).is_empty());

    for x in 16..24 {
        for dy in -4..=4 {
            assert_eq!(
                rgb_at(&map, x, 64 + dy, 8),
                rgb_at(&control, x, 64 + dy, 8),
                "mismatch at x={x} dy={dy}"
            );
        }
    }
}

#[test]
fn deferred_mailboxes_evict_when_out_of_range() {
    let (map, reg, store) = setup();
    place_source(&map, &reg, &store, (14, 64, 8), "glowstone");
    place_source(&map, &reg, &store, (1, 64, 8), "glowstone");
    assert!(store.pending_chunks() >= 2);
    let evicted = store.evict_outside(ChunkCoord::new(40, 40), 2);
    assert!(evicted >= 2);
    assert_eq!(store.pending_chunks(), 0);
}
