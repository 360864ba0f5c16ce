//! Persistence of fitted pipelines (bincode)

mod serializer;

pub use serializer::{load_pipeline, save_pipeline};
