//! # reverie-tiering
//!
//! Derives a lifecycle tier for each observation from reference count,
//! access recency, and supersession/deprecation state, and persists changes.
//! Rules, first match wins: core by references, ephemeral when deprecated or
//! long idle, archive when superseded or idle, otherwise working.

pub mod engine;
pub mod rules;

pub use engine::MemoryTierEngine;
pub use rules::{classify_at, TierRule};
