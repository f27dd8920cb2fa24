use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::features::FeatureVector;
use crate::observation::ObservationId;

/// A labelled example in the append-only training log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub older_id: ObservationId,
    pub newer_id: ObservationId,
    pub features: FeatureVector,
    /// Whether the supersession was judged correct.
    pub label: bool,
    /// The confidence that was shown or used at decision time.
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}
