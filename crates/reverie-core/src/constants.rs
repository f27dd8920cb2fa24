/// Reverie version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Floor for the priority-adjusted acceptance threshold.
pub const MIN_ADJUSTED_THRESHOLD: f64 = 0.3;

/// Document type used to scope similarity queries.
pub const OBSERVATION_DOC_TYPE: &str = "observation";

/// Distance assumed when a provider omits one for a returned id.
pub const MISSING_DISTANCE: f64 = 2.0;

/// Confidence assigned to examples bootstrapped from historical supersessions.
pub const BOOTSTRAP_EXAMPLE_CONFIDENCE: f64 = 0.8;

/// Cap (hours) used to normalise the time-delta feature.
pub const TIME_DELTA_CAP_HOURS: f64 = 720.0;

/// Cap used to normalise the reference-count feature.
pub const REFERENCE_COUNT_CAP: f64 = 10.0;

/// Logits are clamped to this magnitude before the sigmoid.
pub const LOGIT_CLAMP: f64 = 10.0;

/// Learned weights are clipped to [-MAX_WEIGHT, MAX_WEIGHT].
pub const MAX_WEIGHT: f64 = 5.0;

/// Window used by model stats to count recent training examples.
pub const RECENT_EXAMPLES_WINDOW_DAYS: i64 = 30;
