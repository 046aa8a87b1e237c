use ember_blocks::config::{BlockDef, BlocksConfig, LightProfile, LightingConfig, StateFieldDef};
use ember_blocks::registry::{BlockRegistry, MAX_LIGHT};
use ember_blocks::types::Shape;
use proptest::prelude::*;
use std::collections::HashMap;

fn def(name: &str, id: u16) -> BlockDef {
    BlockDef {
        name: name.into(),
        id: Some(id),
        ..Default::default()
    }
}

fn build(blocks: Vec<BlockDef>) -> BlockRegistry {
    BlockRegistry::from_config(BlocksConfig {
        blocks,
        lighting: None,
        unknown_block: None,
    })
    .expect("registry")
}

#[test]
fn ids_must_be_sequential() {
    let cfg = BlocksConfig {
        blocks: vec![def("air", 0), def("stone", 2)],
        lighting: None,
        unknown_block: None,
    };
    assert!(BlockRegistry::from_config(cfg).is_err());
}

#[test]
fn omitted_id_takes_the_next_slot() {
    let reg = build(vec![
        def("air", 0),
        BlockDef {
            name: "stone".into(),
            id: None,
            ..Default::default()
        },
    ]);
    assert_eq!(reg.id_by_name("stone"), Some(1));
}

#[test]
fn light_profile_resolves_and_explicit_fields_win() {
    let mut profiles = HashMap::new();
    profiles.insert(
        "torchlight".to_string(),
        LightProfile {
            emission: [14, 12, 8],
            sky_attenuation: 0,
        },
    );
    let cfg = BlocksConfig {
        blocks: vec![
            def("air", 0),
            BlockDef {
                name: "torch".into(),
                id: Some(1),
                solid: Some(false),
                light_profile: Some("torchlight".into()),
                ..Default::default()
            },
            BlockDef {
                name: "dim_torch".into(),
                id: Some(2),
                solid: Some(false),
                light_profile: Some("torchlight".into()),
                emission: Some([4, 4, 4]),
                ..Default::default()
            },
        ],
        lighting: Some(LightingConfig { profiles }),
        unknown_block: None,
    };
    let reg = BlockRegistry::from_config(cfg).expect("registry");
    let torch = reg.block_by_name("torch").unwrap();
    let dim = reg.block_by_name("dim_torch").unwrap();
    assert_eq!(reg.light_source_level(torch), [14, 12, 8]);
    assert_eq!(reg.light_source_level(dim), [4, 4, 4]);
}

#[test]
fn sky_attenuation_defaults_follow_skylight_blocking() {
    let reg = build(vec![
        BlockDef {
            name: "air".into(),
            id: Some(0),
            solid: Some(false),
            ..Default::default()
        },
        def("stone", 1),
        BlockDef {
            name: "water".into(),
            id: Some(2),
            solid: Some(false),
            blocks_skylight: Some(false),
            sky_attenuation: Some(2),
            shape: Some("water".into()),
            ..Default::default()
        },
    ]);
    let stone = reg.block_by_name("stone").unwrap();
    let water = reg.block_by_name("water").unwrap();
    let air = reg.block_by_name("air").unwrap();
    assert_eq!(reg.light_attenuation(stone), MAX_LIGHT);
    assert_eq!(reg.light_attenuation(water), 2);
    assert_eq!(reg.light_attenuation(air), 0);
    assert!(reg.is_sky_passable(air));
}

#[test]
fn emission_clamps_to_the_light_range() {
    let reg = build(vec![
        def("air", 0),
        BlockDef {
            name: "flare".into(),
            id: Some(1),
            solid: Some(false),
            emission: Some([200, 15, 0]),
            ..Default::default()
        },
    ]);
    let flare = reg.block_by_name("flare").unwrap();
    assert_eq!(reg.light_source_level(flare), [15, 15, 0]);
}

#[test]
fn shape_names_map_onto_the_closed_set() {
    let reg = build(vec![
        def("air", 0),
        BlockDef {
            name: "fern".into(),
            id: Some(1),
            solid: Some(false),
            shape: Some("cross".into()),
            ..Default::default()
        },
        BlockDef {
            name: "mystery".into(),
            id: Some(2),
            shape: Some("dodecahedron".into()),
            ..Default::default()
        },
    ]);
    assert_eq!(reg.shape(reg.block_by_name("fern").unwrap()), Shape::CrossQuad);
    assert_eq!(reg.shape(reg.block_by_name("mystery").unwrap()), Shape::Empty);
}

#[test]
fn unknown_names_resolve_to_the_fallback_block() {
    let cfg = BlocksConfig {
        blocks: vec![def("air", 0), def("stone", 1)],
        lighting: None,
        unknown_block: Some("stone".into()),
    };
    let reg = BlockRegistry::from_config(cfg).expect("registry");
    let stone = reg.block_by_name("stone").unwrap();
    assert_eq!(reg.block_by_name_or_unknown("basalt"), stone);
    assert!(reg.block_by_name("basalt").is_none());

    let no_fallback = build(vec![def("air", 0)]);
    assert_eq!(
        no_fallback.block_by_name_or_unknown("basalt"),
        no_fallback.block_by_name("air").unwrap()
    );
}

#[test]
fn state_schema_wider_than_sixteen_bits_is_rejected() {
    let cfg = BlocksConfig {
        blocks: vec![BlockDef {
            name: "air".into(),
            id: Some(0),
            state_schema: Some(vec![
                StateFieldDef {
                    name: "a".into(),
                    width: 9,
                },
                StateFieldDef {
                    name: "b".into(),
                    width: 8,
                },
            ]),
            ..Default::default()
        }],
        lighting: None,
        unknown_block: None,
    };
    assert!(BlockRegistry::from_config(cfg).is_err());
}

proptest! {
    // Packing values into declared state fields and reading them back is the
    // identity for any in-range values, regardless of declaration order.
    #[test]
    fn state_pack_read_roundtrip(
        w0 in 1u8..=4,
        w1 in 1u8..=4,
        w2 in 1u8..=4,
        raw0 in any::<u16>(),
        raw1 in any::<u16>(),
        raw2 in any::<u16>(),
    ) {
        let reg = build(vec![
            def("air", 0),
            BlockDef {
                name: "machine".into(),
                id: Some(1),
                state_schema: Some(vec![
                    StateFieldDef { name: "p0".into(), width: w0 },
                    StateFieldDef { name: "p1".into(), width: w1 },
                    StateFieldDef { name: "p2".into(), width: w2 },
                ]),
                ..Default::default()
            },
        ]);
        let ty = reg.get(1).unwrap();
        let v0 = raw0 & ((1u16 << w0) - 1);
        let v1 = raw1 & ((1u16 << w1) - 1);
        let v2 = raw2 & ((1u16 << w2) - 1);
        let state = ty.pack_state(&[("p0", v0), ("p1", v1), ("p2", v2)]);
        prop_assert_eq!(ty.state_value(state, "p0"), Some(v0));
        prop_assert_eq!(ty.state_value(state, "p1"), Some(v1));
        prop_assert_eq!(ty.state_value(state, "p2"), Some(v2));
        prop_assert_eq!(ty.state_value(state, "missing"), None);
    }
}
