use ember_geom::Vec3;

use crate::face::Face;

/// Growable vertex/index arrays for one mesh pass. Interleave-free so the
/// uploader can hand each attribute straight to the GPU.
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across builds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
        self.col.clear();
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    /// Appends a quad (two triangles) with explicit per-vertex UVs, fixing
    /// winding so the triangles face along `n`.
    pub fn add_quad_uv(
        &mut self,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        d: Vec3,
        n: Vec3,
        mut uvs: [(f32, f32); 4],
        rgba: [u8; 4],
    ) {
        let base = self.pos.len() as u32 / 3;
        let mut vs = [a, d, c, b];
        let e1 = vs[1] - vs[0];
        let e2 = vs[2] - vs[0];
        let cross = Vec3::new(
            e1.y * e2.z - e1.z * e2.y,
            e1.z * e2.x - e1.x * e2.z,
            e1.x * e2.y - e1.y * e2.x,
        );
        if cross.dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
            self.col
                .extend_from_slice(&[rgba[0], rgba[1], rgba[2], rgba[3]]);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Emits a face-aligned rectangle for `face` at `origin` with extents
    /// `(u1, v1)` in the face plane. UVs come from world coordinates so
    /// adjacent faces tile seamlessly.
    pub fn add_face_rect(&mut self, face: Face, origin: Vec3, u1: f32, v1: f32, rgba: [u8; 4]) {
        let n = face.normal();
        let o = origin;
        let (a, b, c, d) = match face {
            Face::PosY => (
                o,
                Vec3::new(o.x + u1, o.y, o.z),
                Vec3::new(o.x + u1, o.y, o.z + v1),
                Vec3::new(o.x, o.y, o.z + v1),
            ),
            Face::NegY => (
                Vec3::new(o.x, o.y, o.z + v1),
                Vec3::new(o.x + u1, o.y, o.z + v1),
                Vec3::new(o.x + u1, o.y, o.z),
                o,
            ),
            Face::PosX => (
                Vec3::new(o.x, o.y + v1, o.z + u1),
                Vec3::new(o.x, o.y + v1, o.z),
                o,
                Vec3::new(o.x, o.y, o.z + u1),
            ),
            Face::NegX => (
                Vec3::new(o.x, o.y + v1, o.z),
                Vec3::new(o.x, o.y + v1, o.z + u1),
                Vec3::new(o.x, o.y, o.z + u1),
                o,
            ),
            Face::PosZ => (
                Vec3::new(o.x + u1, o.y + v1, o.z),
                Vec3::new(o.x, o.y + v1, o.z),
                o,
                Vec3::new(o.x + u1, o.y, o.z),
            ),
            Face::NegZ => (
                Vec3::new(o.x, o.y + v1, o.z),
                Vec3::new(o.x + u1, o.y + v1, o.z),
                Vec3::new(o.x + u1, o.y, o.z),
                o,
            ),
        };
        let uv_from = |p: Vec3| match face {
            Face::PosY | Face::NegY => (p.x, p.z),
            Face::PosX | Face::NegX => (p.z, p.y),
            Face::PosZ | Face::NegZ => (p.x, p.y),
        };
        let uvs = [uv_from(a), uv_from(d), uv_from(c), uv_from(b)];
        self.add_quad_uv(a, b, c, d, n, uvs, rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_rect_emits_one_quad() {
        let mut mb = MeshBuild::default();
        mb.add_face_rect(Face::PosY, Vec3::new(0.0, 1.0, 0.0), 1.0, 1.0, [255; 4]);
        assert_eq!(mb.pos.len(), 12);
        assert_eq!(mb.idx.len(), 6);
        assert_eq!(mb.quad_count(), 1);
        // All four vertices sit on the y=1 plane.
        for v in mb.pos.chunks(3) {
            assert_eq!(v[1], 1.0);
        }
    }

    #[test]
    fn clear_retains_capacity() {
        let mut mb = MeshBuild::default();
        mb.reserve_quads(8);
        mb.add_face_rect(Face::PosX, Vec3::new(2.0, 0.0, 0.0), 1.0, 1.0, [255; 4]);
        let cap = mb.pos.capacity();
        mb.clear_keep_capacity();
        assert!(mb.pos.is_empty());
        assert_eq!(mb.pos.capacity(), cap);
    }
}
