//! Facade over the engine workspace: one `use ember::...` per concern for
//! host applications.
#![forbid(unsafe_code)]

pub use ember_blocks as blocks;
pub use ember_chunk as chunk;
pub use ember_geom as geom;
pub use ember_lighting as lighting;
pub use ember_mesh as mesh;
pub use ember_runtime as runtime;
pub use ember_world as world;
