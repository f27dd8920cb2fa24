//! Pure helpers used by detection: similarity scoring, candidate ranking and lookback cutoffs.

pub mod ranking;
pub mod similarity;
pub mod window;
