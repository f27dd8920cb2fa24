//! # reverie-learning
//!
//! Turns an (older, newer) observation pair into a feature vector and scores
//! it with a small logistic model that can be retrained online from feedback.

pub mod features;
pub mod model;

pub use features::{extract_features, text_similarity};
pub use model::{validate_example, SupersessionModel};
