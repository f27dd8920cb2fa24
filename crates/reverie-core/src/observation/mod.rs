pub mod base;
pub mod tier;
pub mod types;

pub use base::{Observation, ObservationId};
pub use tier::MemoryTier;
pub use types::ObservationType;
