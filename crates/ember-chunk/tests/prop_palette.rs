use ember_blocks::config::{BlockDef, BlocksConfig};
use ember_blocks::{Block, BlockRegistry};
use ember_chunk::{BlockPalette, SubChunk};
use proptest::prelude::*;
use std::collections::HashMap;

fn registry() -> BlockRegistry {
    let blocks = vec![
        BlockDef {
            name: "air".into(),
            id: Some(0),
            solid: Some(false),
            ..Default::default()
        },
        BlockDef {
            name: "stone".into(),
            id: Some(1),
            ..Default::default()
        },
        BlockDef {
            name: "lamp".into(),
            id: Some(2),
            solid: Some(false),
            emission: Some([15, 15, 15]),
            ..Default::default()
        },
    ];
    BlockRegistry::from_config(BlocksConfig {
        blocks,
        lighting: None,
        unknown_block: None,
    })
    .expect("registry")
}

// Inserting 256 distinct non-air states forces the index array past the byte
// range; every cell written before and after the upgrade must read back
// exactly what was stored.
#[test]
fn storage_upgrade_preserves_every_cell() {
    let reg = registry();
    let mut sc = SubChunk::new();
    assert!(!sc.storage_is_wide());

    for i in 0..256u16 {
        let (x, y) = ((i % 16) as usize, (i / 16) as usize);
        sc.set(x, y, 0, Block { id: 1, state: i }, &reg);
    }
    assert!(sc.storage_is_wide());
    assert_eq!(sc.palette_len(), 257);

    for i in 0..256u16 {
        let (x, y) = ((i % 16) as usize, (i / 16) as usize);
        assert_eq!(sc.get(x, y, 0), Block { id: 1, state: i });
    }
    // Untouched cells are still air.
    assert_eq!(sc.get(0, 0, 15), Block::AIR);
}

proptest! {
    // The palette hands back exactly the block stored under an index, and
    // re-adding never mints a new entry.
    #[test]
    fn palette_get_inverts_get_or_add(
        ids in proptest::collection::vec((0u16..8, any::<u16>()), 1..64),
    ) {
        let mut p = BlockPalette::new(Block::AIR);
        for (id, state) in ids {
            let b = Block { id, state };
            let idx = p.get_or_add(b);
            prop_assert_eq!(p.get(idx), b);
            prop_assert_eq!(p.get_or_add(b), idx);
            prop_assert!((idx as usize) < p.len());
        }
    }

    // A subchunk behaves like a dense map from cells to blocks: every read
    // returns the last write, air where nothing was written.
    #[test]
    fn subchunk_matches_a_map_model(
        writes in proptest::collection::vec(
            (0usize..16, 0usize..16, 0usize..16, 0u16..3, 0u16..4),
            0..200,
        ),
    ) {
        let reg = registry();
        let mut sc = SubChunk::new();
        let mut model: HashMap<(usize, usize, usize), Block> = HashMap::new();
        for (x, y, z, id, state) in writes {
            let b = Block { id, state };
            sc.set(x, y, z, b, &reg);
            model.insert((x, y, z), b);
        }
        for z in 0..16 {
            for y in 0..16 {
                for x in 0..16 {
                    let want = model.get(&(x, y, z)).copied().unwrap_or(Block::AIR);
                    prop_assert_eq!(sc.get(x, y, z), want);
                }
            }
        }
        // The emitter list tracks exactly the cells whose current block emits.
        let mut emitters: Vec<_> = sc.emitter_cells().collect();
        emitters.sort_unstable();
        let mut want: Vec<_> = model
            .iter()
            .filter(|(_, b)| reg.is_light_source(**b))
            .map(|(&c, _)| c)
            .collect();
        want.sort_unstable();
        prop_assert_eq!(emitters, want);
    }
}
