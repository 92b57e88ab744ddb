pub mod config;
pub mod core;
pub mod ecs;      // Render scene mirrored for the external renderer
pub mod ingest;
pub mod timeline; // Discs, casualty points and the frame orchestrator

pub use config::TimelineConfig;
pub use timeline::{Disc, Entity, Kind, Record, Timeline};
