use chrono::{DateTime, Utc};

use crate::errors::ReverieResult;
use crate::models::{ModelWeights, TrainingExample};

/// Append-only persistence for training examples and weight rows.
pub trait IModelStore: Send + Sync {
    fn append_training_example(&self, example: &TrainingExample) -> ReverieResult<()>;

    /// The `limit` most recent examples, returned oldest first.
    fn recent_training_examples(&self, limit: usize) -> ReverieResult<Vec<TrainingExample>>;

    fn count_training_examples_since(&self, since: DateTime<Utc>) -> ReverieResult<usize>;

    fn append_model_weights(&self, weights: &ModelWeights) -> ReverieResult<()>;

    /// The authoritative (most recently trained) weight row.
    fn latest_model_weights(&self) -> ReverieResult<Option<ModelWeights>>;
}
