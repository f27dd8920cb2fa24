//! # reverie-consolidation
//!
//! Finds observations that a newer observation replaces, links them, ages out
//! long-superseded rows, and runs whole sleep-cycle passes.
//!
//! Detection scores every eligible (older, newer) pair with the confidence
//! model from `reverie-learning`; lifecycle tiers come from `reverie-tiering`.

pub mod algorithms;
pub mod applier;
pub mod cycle;
pub mod detector;
pub mod engine;

pub use applier::ConsolidationApplier;
pub use engine::ConsolidationEngine;
