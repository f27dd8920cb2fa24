// Storage
pub const DEFAULT_DB_PATH: &str = "reverie.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// Supersession
pub const DEFAULT_MIN_SEMANTIC_SIMILARITY: f64 = 0.7;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_SAME_TYPE_REQUIRED: bool = true;
pub const DEFAULT_SAME_PROJECT_REQUIRED: bool = true;
pub const DEFAULT_MAX_AGE_DIFFERENCE_HOURS: f64 = 720.0;
pub const DEFAULT_SIMILARITY_TOP_K: usize = 50;
pub const DEFAULT_PARALLEL_EVALUATION: bool = true;

// Priority
pub const DEFAULT_PRIORITY_ENABLED: bool = true;
pub const DEFAULT_CONFIDENCE_BOOST_FACTOR: f64 = 0.1;
pub const DEFAULT_PRIORITY_ORDERING: bool = true;

// Memory tiers
pub const DEFAULT_MEMORY_TIER_ENABLED: bool = true;
pub const DEFAULT_WORKING_TO_ARCHIVE_DAYS: u32 = 30;
pub const DEFAULT_ARCHIVE_TO_EPHEMERAL_DAYS: u32 = 180;
pub const DEFAULT_CORE_REFERENCE_THRESHOLD: u64 = 5;
pub const DEFAULT_RECLASSIFY_ON_SLEEP_CYCLE: bool = true;

// Learned model
pub const DEFAULT_LEARNED_MODEL_ENABLED: bool = false;
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DEFAULT_REGULARIZATION: f64 = 0.001;
pub const DEFAULT_MIN_EXAMPLES_BEFORE_USE: usize = 50;
pub const DEFAULT_FALLBACK_TO_FIXED: bool = true;
pub const DEFAULT_MAX_TRAINING_EXAMPLES: usize = 1000;
pub const DEFAULT_ALWAYS_COLLECT_DATA: bool = true;
pub const DEFAULT_TRAINING_EPOCHS: usize = 5;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
