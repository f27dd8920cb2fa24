//! Lookback cutoffs.

use chrono::{DateTime, Duration, Utc};

/// The instant `days` days before `now`.
///
/// Windows reaching past chrono's representable range clamp to
/// [`DateTime::<Utc>::MIN_UTC`], so an oversized window means "everything".
pub fn days_before(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
