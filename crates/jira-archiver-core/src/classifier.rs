use chrono::{DateTime, Utc};

use crate::config::UnknownActivityPolicy;
use crate::models::{Activity, ActivityRecord, Age, ClassificationResult};

/// Whole days elapsed between `at` and `now`, floored. Timestamps in the
/// future count as zero days old.
pub fn age_in_days(at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from(now.signed_duration_since(at).num_days()).unwrap_or(0)
}

/// Decides whether a project is inactive.
///
/// A known activity is inactive once its age reaches `threshold_days`
/// (the boundary counts as inactive). An unknown activity has no age and is
/// handled by `unknown`.
pub fn classify(
    record: ActivityRecord,
    threshold_days: u64,
    unknown: UnknownActivityPolicy,
    now: DateTime<Utc>,
) -> ClassificationResult {
    let (age, is_inactive) = match record.activity {
        Activity::Known { at, .. } => {
            let days = age_in_days(at, now);
            (Age::Days(days), days >= threshold_days)
        }
        Activity::Unknown => (Age::Unknown, unknown == UnknownActivityPolicy::Archive),
    };

    ClassificationResult {
        project: record.project,
        age,
        is_inactive,
        resolution_error: record.resolution_error,
    }
}
