//! Crawl state persisted between runs

mod checkpoint;

pub use checkpoint::{Checkpoint, CheckpointStore};
