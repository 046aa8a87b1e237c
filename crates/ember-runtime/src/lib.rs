//! Runtime orchestration: the chunk pipeline queues, worker lanes, and the
//! per-tick manager that drives chunks from generation through upload.
#![forbid(unsafe_code)]

mod config;
mod manager;
mod queue;
mod uploader;
mod worker;

pub use config::EngineConfig;
pub use manager::{ChunkManager, QueueDebugCounts};
pub use queue::DedupQueue;
pub use uploader::{ChunkUploader, MeshHandle, NullUploader};
pub use worker::{GenJob, GenResult, MeshJob, MeshResult, WorkerPool};
