use tracing::{debug, info, span, warn, Level};

use crate::models::{Age, ArchiveAction, ArchiveOutcome, ClassificationResult};
use crate::tracker::Tracker;

/// Turns classification results into archive calls (or, in a dry run, into
/// report lines only).
pub struct ArchiveDriver<T: Tracker> {
    tracker: T,
    dry_run: bool,
}

impl<T: Tracker> ArchiveDriver<T> {
    pub fn new(tracker: T, dry_run: bool) -> Self {
        Self { tracker, dry_run }
    }

    /// Processes every result in project-key order. A failed archive call is
    /// recorded and the loop moves on.
    pub fn drive(&self, mut results: Vec<ClassificationResult>) -> Vec<ArchiveOutcome> {
        results.sort_by(|a, b| a.project.key.cmp(&b.project.key));
        results.into_iter().map(|result| self.drive_one(result)).collect()
    }

    fn drive_one(&self, result: ClassificationResult) -> ArchiveOutcome {
        let project_span = span!(Level::INFO, "archive_project", project = %result.project.key);
        let _enter = project_span.enter();

        let lookup_note = result
            .resolution_error
            .as_ref()
            .map(|reason| format!("activity lookup failed: {}", reason));

        if !result.is_inactive {
            debug!(age = %result.age, "Project is active, skipping.");
            let detail = match (lookup_note, result.age) {
                (Some(note), _) => Some(note),
                (None, Age::Unknown) => Some("activity unknown".to_string()),
                (None, Age::Days(_)) => None,
            };
            return outcome(&result, ArchiveAction::Skipped, detail);
        }

        if self.dry_run {
            info!(age = %result.age, "Would archive project.");
            return outcome(&result, ArchiveAction::WouldArchive, lookup_note);
        }

        info!(age = %result.age, "Archiving project...");
        match self.tracker.archive_project(&result.project) {
            Ok(()) => outcome(&result, ArchiveAction::Archived, lookup_note),
            Err(e) => {
                warn!(error = %e, "Archive call failed.");
                outcome(&result, ArchiveAction::Failed, Some(e.to_string()))
            }
        }
    }
}

fn outcome(result: &ClassificationResult, action: ArchiveAction, detail: Option<String>) -> ArchiveOutcome {
    ArchiveOutcome {
        project_key: result.project.key.clone(),
        project_name: result.project.name.clone(),
        age: result.age,
        action,
        detail,
    }
}
