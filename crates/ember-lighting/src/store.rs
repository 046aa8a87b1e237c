use std::collections::HashMap;
use std::sync::Mutex;

use ember_world::ChunkCoord;

/// One light contribution that could not be applied because its target chunk
/// had no voxel data yet. Already decremented for the step that produced it.
#[derive(Clone, Copy, Debug)]
pub struct PendingLight {
    pub wx: i32,
    pub wy: i32,
    pub wz: i32,
    pub rgb: [u8; 3],
    pub sky: u8,
}

/// Per-coordinate mailbox of pending light contributions, delivered exactly
/// once when that chunk's generation completes and evicted outright when the
/// observer moves far enough away that the chunk will never load.
#[derive(Default)]
pub struct DeferredLightStore {
    pending: Mutex<HashMap<ChunkCoord, Vec<PendingLight>>>,
}

impl DeferredLightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_block(&self, coord: ChunkCoord, wx: i32, wy: i32, wz: i32, rgb: [u8; 3]) {
        self.push(
            coord,
            PendingLight {
                wx,
                wy,
                wz,
                rgb,
                sky: 0,
            },
        );
    }

    pub fn push_sky(&self, coord: ChunkCoord, wx: i32, wy: i32, wz: i32, level: u8) {
        self.push(
            coord,
            PendingLight {
                wx,
                wy,
                wz,
                rgb: [0; 3],
                sky: level,
            },
        );
    }

    fn push(&self, coord: ChunkCoord, entry: PendingLight) {
        let mut map = self.pending.lock().unwrap();
        let v = map.entry(coord).or_default();
        // Merge same-cell entries so a long propagation pass cannot grow the
        // mailbox beyond one entry per border cell.
        if let Some(existing) = v
            .iter_mut()
            .find(|p| p.wx == entry.wx && p.wy == entry.wy && p.wz == entry.wz)
        {
            for c in 0..3 {
                existing.rgb[c] = existing.rgb[c].max(entry.rgb[c]);
            }
            existing.sky = existing.sky.max(entry.sky);
        } else {
            v.push(entry);
        }
    }

    /// Consumes the mailbox for a chunk that just became voxel-ready.
    pub fn take(&self, coord: ChunkCoord) -> Vec<PendingLight> {
        let mut map = self.pending.lock().unwrap();
        map.remove(&coord).unwrap_or_default()
    }

    /// Drops mailboxes for coordinates that will never load. Returns how many
    /// were evicted.
    pub fn evict_outside(&self, center: ChunkCoord, radius: i32) -> usize {
        let mut map = self.pending.lock().unwrap();
        let before = map.len();
        map.retain(|coord, _| coord.ring_distance(center) <= radius);
        before - map.len()
    }

    pub fn pending_chunks(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}
