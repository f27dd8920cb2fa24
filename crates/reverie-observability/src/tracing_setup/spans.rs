//! Span definitions per operation: detection, tiering, training, cycle.

/// Create a supersession detection span.
#[macro_export]
macro_rules! detection_span {
    ($mode:expr, $scope:expr) => {
        tracing::info_span!("reverie.detection", mode = %$mode, scope = %$scope)
    };
}

/// Create a memory tier reclassification span.
#[macro_export]
macro_rules! tiering_span {
    ($project:expr) => {
        tracing::info_span!("reverie.tiering", project = %$project)
    };
}

/// Create a confidence model training span.
#[macro_export]
macro_rules! training_span {
    ($examples:expr) => {
        tracing::info_span!("reverie.training", examples = $examples)
    };
}

/// Create a sleep cycle span.
#[macro_export]
macro_rules! cycle_span {
    ($cycle_type:expr) => {
        tracing::info_span!("reverie.cycle", cycle_type = %$cycle_type)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const DETECTION: &str = "reverie.detection";
    pub const TIERING: &str = "reverie.tiering";
    pub const TRAINING: &str = "reverie.training";
    pub const CYCLE: &str = "reverie.cycle";
}
