use ember_blocks::{Block, BlockRegistry, Shape};
use ember_chunk::{ChunkMap, light_word};
use ember_geom::Vec3;
use ember_world::{ChunkCoord, SUBCHUNK_SIZE};

use crate::face::{ALL_FACES, Face};
use crate::mesh_build::MeshBuild;
use crate::{ChunkMeshCpu, VISUAL_LIGHT_MIN};

/// Builds the CPU mesh for one chunk by face culling against the six
/// neighbors of every non-air cell. Neighbor chunks are sampled through the
/// map, so the caller must have gated on `NeighborsReady` first; a border
/// sample into a missing chunk degrades to air and the next remesh heals it.
///
/// Returns None when the chunk is missing or holds no voxel data.
pub fn build_chunk_mesh(
    map: &ChunkMap,
    reg: &BlockRegistry,
    coord: ChunkCoord,
) -> Option<ChunkMeshCpu> {
    let chunk = map.get(coord)?;
    if !chunk.has_voxel_data() {
        return None;
    }
    let s = map.world().chunk_size;
    let base_x = coord.cx * s as i32;
    let base_z = coord.cz * s as i32;
    let mut solid = MeshBuild::default();
    let mut translucent = MeshBuild::default();

    for si in 0..chunk.subchunk_count() {
        if chunk.subchunk_is_all_air(si) {
            continue;
        }
        let y0 = si * SUBCHUNK_SIZE;
        for ly in y0..y0 + SUBCHUNK_SIZE {
            for lz in 0..s {
                for lx in 0..s {
                    let b = chunk.block_local(lx, ly, lz);
                    if b == Block::AIR {
                        continue;
                    }
                    let wx = base_x + lx as i32;
                    let wy = ly as i32;
                    let wz = base_z + lz as i32;
                    let origin = Vec3::new(wx as f32, wy as f32, wz as f32);
                    match reg.shape(b) {
                        Shape::Empty => {}
                        Shape::CrossQuad => {
                            emit_cross(&mut solid, origin, face_shade(map, wx, wy, wz));
                        }
                        Shape::Slab => {
                            emit_slab(&mut solid, map, reg, origin, wx, wy, wz);
                        }
                        shape => {
                            let out = if shape.is_translucent() {
                                &mut translucent
                            } else {
                                &mut solid
                            };
                            emit_cube(out, map, reg, b, origin, wx, wy, wz);
                        }
                    }
                }
            }
        }
    }

    log::trace!(
        "meshed chunk ({}, {}): {} solid / {} translucent quads",
        coord.cx,
        coord.cz,
        solid.quad_count(),
        translucent.quad_count()
    );
    Some(ChunkMeshCpu {
        coord,
        bbox: chunk.bounds(),
        solid,
        translucent,
    })
}

fn emit_cube(
    out: &mut MeshBuild,
    map: &ChunkMap,
    reg: &BlockRegistry,
    b: Block,
    origin: Vec3,
    wx: i32,
    wy: i32,
    wz: i32,
) {
    let translucent = reg.is_translucent(b);
    for face in ALL_FACES {
        let (dx, dy, dz) = face.delta();
        let (nx, ny, nz) = (wx + dx, wy + dy, wz + dz);
        let nb = map.block_at_world(nx, ny, nz);
        if reg.is_full_opaque(nb) {
            continue;
        }
        // No internal faces inside a body of the same translucent block.
        if translucent && nb.id == b.id {
            continue;
        }
        let rgba = face_shade(map, nx, ny, nz);
        let face_origin = match face {
            Face::PosY => Vec3::new(origin.x, origin.y + 1.0, origin.z),
            Face::PosX => Vec3::new(origin.x + 1.0, origin.y, origin.z),
            Face::PosZ => Vec3::new(origin.x, origin.y, origin.z + 1.0),
            _ => origin,
        };
        out.add_face_rect(face, face_origin, 1.0, 1.0, rgba);
    }
}

/// Bottom-half slab: half-height sides, an always-visible interior top, and a
/// normally culled bottom.
fn emit_slab(
    out: &mut MeshBuild,
    map: &ChunkMap,
    reg: &BlockRegistry,
    origin: Vec3,
    wx: i32,
    wy: i32,
    wz: i32,
) {
    let top_origin = Vec3::new(origin.x, origin.y + 0.5, origin.z);
    out.add_face_rect(Face::PosY, top_origin, 1.0, 1.0, face_shade(map, wx, wy, wz));
    for face in [Face::NegY, Face::PosX, Face::NegX, Face::PosZ, Face::NegZ] {
        let (dx, dy, dz) = face.delta();
        let (nx, ny, nz) = (wx + dx, wy + dy, wz + dz);
        if reg.is_full_opaque(map.block_at_world(nx, ny, nz)) {
            continue;
        }
        let rgba = face_shade(map, nx, ny, nz);
        let v1 = if face == Face::NegY { 1.0 } else { 0.5 };
        let face_origin = match face {
            Face::PosX => Vec3::new(origin.x + 1.0, origin.y, origin.z),
            Face::PosZ => Vec3::new(origin.x, origin.y, origin.z + 1.0),
            _ => origin,
        };
        out.add_face_rect(face, face_origin, 1.0, v1, rgba);
    }
}

/// Two diagonal quads through the cell, lit from the cell itself. Plants are
/// never culled; they do not fill their voxel faces.
fn emit_cross(out: &mut MeshBuild, origin: Vec3, rgba: [u8; 4]) {
    let o = origin;
    let n1 = Vec3::new(1.0, 0.0, -1.0).normalized();
    out.add_quad_uv(
        Vec3::new(o.x, o.y, o.z),
        Vec3::new(o.x + 1.0, o.y, o.z + 1.0),
        Vec3::new(o.x + 1.0, o.y + 1.0, o.z + 1.0),
        Vec3::new(o.x, o.y + 1.0, o.z),
        n1,
        [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        rgba,
    );
    let n2 = Vec3::new(-1.0, 0.0, -1.0).normalized();
    out.add_quad_uv(
        Vec3::new(o.x + 1.0, o.y, o.z),
        Vec3::new(o.x, o.y, o.z + 1.0),
        Vec3::new(o.x, o.y + 1.0, o.z + 1.0),
        Vec3::new(o.x + 1.0, o.y + 1.0, o.z),
        n2,
        [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        rgba,
    );
}

/// Vertex color for a face looking into the given open cell: the block-light
/// channels and the white sky channel, whichever is brighter, with a small
/// floor so unlit caves stay barely visible.
fn face_shade(map: &ChunkMap, wx: i32, wy: i32, wz: i32) -> [u8; 4] {
    let word = map.light_word_at_world(wx, wy, wz);
    let rgb = light_word::rgb(word);
    let sky = light_word::sky(word) * 17;
    [
        (rgb[0] * 17).max(sky).max(VISUAL_LIGHT_MIN),
        (rgb[1] * 17).max(sky).max(VISUAL_LIGHT_MIN),
        (rgb[2] * 17).max(sky).max(VISUAL_LIGHT_MIN),
        255,
    ]
}
