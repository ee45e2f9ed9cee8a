use tracing::{debug, warn};

use crate::models::{Activity, ActivityRecord, ActivitySource, Project};
use crate::tracker::Tracker;

/// Combines project metadata with the latest issue update to find when a
/// project was last touched.
pub struct ActivityResolver<T: Tracker> {
    tracker: T,
}

impl<T: Tracker> ActivityResolver<T> {
    pub fn new(tracker: T) -> Self {
        Self { tracker }
    }

    /// Never fails: a query error degrades the record to [`Activity::Unknown`]
    /// and is kept in `resolution_error` for the run summary.
    pub fn resolve(&self, project: Project) -> ActivityRecord {
        let metadata = project.last_updated.map(|at| Activity::Known {
            at,
            source: ActivitySource::ProjectMetadata,
        });

        match self.tracker.latest_issue_activity(&project.key) {
            Ok(latest_issue) => {
                let issue = latest_issue.map(|at| Activity::Known {
                    at,
                    source: ActivitySource::IssueEvent,
                });
                let activity = most_recent(metadata, issue);
                debug!(project = %project.key, ?activity, "Resolved activity.");
                ActivityRecord { project, activity, resolution_error: None }
            }
            Err(e) => {
                warn!(project = %project.key, error = %e, "Activity lookup failed, marking as unknown.");
                ActivityRecord {
                    project,
                    activity: Activity::Unknown,
                    resolution_error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Picks the later of two signals. Ties go to the project metadata.
fn most_recent(metadata: Option<Activity>, issue: Option<Activity>) -> Activity {
    match (metadata, issue) {
        (Some(m), Some(i)) => {
            if i.timestamp() > m.timestamp() {
                i
            } else {
                m
            }
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => Activity::Unknown,
    }
}
