//! # reverie-core
//!
//! Foundation crate for the Reverie consolidation engine.
//! Defines observations, the priority table, models, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod observation;
pub mod priority;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ReverieConfig;
pub use errors::{ReverieError, ReverieResult};
pub use observation::{MemoryTier, Observation, ObservationId, ObservationType};
pub use priority::PriorityTier;
