pub mod candidate;
pub mod cycle_summary;
pub mod features;
pub mod model_stats;
pub mod prediction;
pub mod similarity;
pub mod tier_classification;
pub mod training;
pub mod weights;

pub use candidate::{ApplyOutcome, SupersessionCandidate, SupersessionResult};
pub use cycle_summary::{CycleSummary, PriorityTierCounts};
pub use features::FeatureVector;
pub use model_stats::LearnedModelStats;
pub use prediction::{FeatureContributions, Prediction, WeightSource};
pub use similarity::{SimilarityFilter, SimilarityMatches};
pub use tier_classification::{MemoryTierClassification, TierFactors, TierStats};
pub use training::TrainingExample;
pub use weights::{FeatureWeights, ModelWeights};
