pub mod classifier;
pub mod config;
pub mod driver;
pub mod enumerator;
pub mod error;
pub mod jira;
pub mod models;
pub mod notify;
pub mod resolver;
pub mod tracker;

// Publicly re-export the main types for a clean external API.
pub use classifier::classify;
pub use config::{Settings, UnknownActivityPolicy};
pub use driver::ArchiveDriver;
pub use enumerator::ProjectPages;
pub use error::{Error, Result};
pub use jira::JiraClient;
pub use models::{
    Activity, ActivityRecord, ActivitySource, Age, ArchiveAction, ArchiveOutcome,
    ClassificationResult, Project, ProjectPage, ProjectStatus,
};
pub use notify::SlackNotifier;
pub use resolver::ActivityResolver;
pub use tracker::Tracker;

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Result of one archive pass, ordered by project key.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub dry_run: bool,
    pub inactivity_days: u64,
    pub outcomes: Vec<ArchiveOutcome>,
    /// `(project key, reason)` for every activity lookup that failed.
    pub resolution_failures: Vec<(String, String)>,
}

impl RunReport {
    pub fn count(&self, action: ArchiveAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }

    /// True when at least one archive call failed. Drives the exit status.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.action == ArchiveAction::Failed)
    }

    /// Every per-project failure of the run, lookups first.
    pub fn failures(&self) -> Vec<Error> {
        let resolution = self
            .resolution_failures
            .iter()
            .map(|(key, reason)| Error::resolution(key, Error::Custom(reason.clone())));
        let archive = self
            .outcomes
            .iter()
            .filter(|o| o.action == ArchiveAction::Failed)
            .map(|o| {
                let reason = o.detail.clone().unwrap_or_else(|| "unknown error".to_string());
                Error::archive(&o.project_key, Error::Custom(reason))
            });
        resolution.chain(archive).collect()
    }

    /// Plain-text digest suitable for a chat message.
    pub fn summary(&self) -> String {
        let listing = |action: ArchiveAction| {
            self.outcomes
                .iter()
                .filter(move |o| o.action == action)
                .map(|o| format!("• {} ({}) - last activity {}", o.project_name, o.project_key, o.age))
        };
        let mut lines = Vec::new();

        if self.dry_run {
            let would = self.count(ArchiveAction::WouldArchive);
            if would == 0 {
                lines.push("Dry run: no Jira projects need archiving.".to_string());
            } else {
                lines.push(format!("Dry run: {} project(s) would be archived:", would));
                lines.extend(listing(ArchiveAction::WouldArchive));
            }
        } else {
            let archived = self.count(ArchiveAction::Archived);
            if archived == 0 && !self.has_failures() {
                lines.push("No Jira projects needed archiving.".to_string());
            } else {
                lines.push(format!(
                    "Archived {} project(s) inactive for at least {} days.",
                    archived, self.inactivity_days
                ));
            }
            if archived > 0 {
                lines.push("Archived:".to_string());
                lines.extend(listing(ArchiveAction::Archived));
            }
            if self.has_failures() {
                lines.push("Failed:".to_string());
                lines.extend(listing(ArchiveAction::Failed));
            }
        }
        lines.push(format!("Skipped: {}", self.count(ArchiveAction::Skipped)));

        let failures = self.failures();
        if !failures.is_empty() {
            lines.push("Errors:".to_string());
            lines.extend(failures.iter().map(|failure| format!("• {}", failure)));
        }
        lines.join("\n")
    }
}

#[derive(Debug)]
pub struct Archiver<T: Tracker> {
    settings: Settings,
    tracker: T,
}

impl<T: Tracker> Archiver<T> {
    pub fn new(settings: Settings, tracker: T) -> Self {
        Self { settings, tracker }
    }

    pub fn run_archive_process(&self, dry_run: bool) -> Result<RunReport> {
        self.run_archive_process_at(dry_run, Utc::now())
    }

    /// Enumerates, resolves, classifies and archives against a fixed clock.
    ///
    /// Only an enumeration failure returns `Err`, and it does so before any
    /// archive call is made.
    #[instrument(skip(self, now), name = "archive_process", fields(dry_run = %dry_run))]
    pub fn run_archive_process_at(&self, dry_run: bool, now: DateTime<Utc>) -> Result<RunReport> {
        info!(inactivity_days = self.settings.inactivity_days, "Starting archive process...");
        let resolver = ActivityResolver::new(&self.tracker);

        let mut seen = HashSet::new();
        let mut exempt = Vec::new();
        let mut classified = Vec::new();

        for project in ProjectPages::new(&self.tracker, self.settings.page_size) {
            let project = project?;
            if !seen.insert(project.key.clone()) {
                debug!(project = %project.key, "Duplicate project in listing, ignoring.");
                continue;
            }
            if let Some(reason) = self.exemption(&project) {
                debug!(project = %project.key, reason, "Skipping exempt project.");
                exempt.push(exempt_outcome(&project, reason, now));
                continue;
            }
            let record = resolver.resolve(project);
            classified.push(classify(
                record,
                self.settings.inactivity_days,
                self.settings.unknown_activity,
                now,
            ));
        }
        info!(project_count = seen.len(), "Enumeration complete.");

        let resolution_failures = classified
            .iter()
            .filter_map(|c| c.resolution_error.clone().map(|reason| (c.project.key.clone(), reason)))
            .collect();
        let inactive = classified.iter().filter(|c| c.is_inactive).count();
        info!(count = inactive, "Classified inactive projects.");

        let mut outcomes = ArchiveDriver::new(&self.tracker, dry_run).drive(classified);
        outcomes.extend(exempt);
        outcomes.sort_by(|a, b| a.project_key.cmp(&b.project_key));

        let report = RunReport {
            dry_run,
            inactivity_days: self.settings.inactivity_days,
            outcomes,
            resolution_failures,
        };
        if dry_run {
            info!("Dry run complete. No projects were changed.");
        } else {
            info!(
                archived = report.count(ArchiveAction::Archived),
                failed = report.count(ArchiveAction::Failed),
                "Archive process finished."
            );
        }
        Ok(report)
    }

    fn exemption(&self, project: &Project) -> Option<&'static str> {
        if self.settings.is_excluded(&project.key) {
            Some("excluded")
        } else if project.status == ProjectStatus::Archived {
            Some("already archived")
        } else {
            None
        }
    }
}

fn exempt_outcome(project: &Project, reason: &str, now: DateTime<Utc>) -> ArchiveOutcome {
    let age = project
        .last_updated
        .map_or(Age::Unknown, |at| Age::Days(classifier::age_in_days(at, now)));
    ArchiveOutcome {
        project_key: project.key.clone(),
        project_name: project.name.clone(),
        age,
        action: ArchiveAction::Skipped,
        detail: Some(reason.to_string()),
    }
}
