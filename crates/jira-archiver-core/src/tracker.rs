use crate::error::Result;
use crate::models::{Project, ProjectPage};
use chrono::{DateTime, Utc};

/// The operations the archiver needs from an issue tracker.
///
/// [`crate::jira::JiraClient`] talks to Jira Cloud over HTTP; tests plug in an
/// in-memory implementation.
pub trait Tracker {
    /// Fetches one page of projects starting at offset `start_at`.
    fn project_page(&self, start_at: u64, max_results: u32) -> Result<ProjectPage>;

    /// Returns the update time of the most recently changed issue in a project,
    /// or `None` when the project has no issues.
    fn latest_issue_activity(&self, project_key: &str) -> Result<Option<DateTime<Utc>>>;

    /// Moves a project to the archived state.
    fn archive_project(&self, project: &Project) -> Result<()>;
}

impl<T: Tracker + ?Sized> Tracker for &T {
    fn project_page(&self, start_at: u64, max_results: u32) -> Result<ProjectPage> {
        (**self).project_page(start_at, max_results)
    }

    fn latest_issue_activity(&self, project_key: &str) -> Result<Option<DateTime<Utc>>> {
        (**self).latest_issue_activity(project_key)
    }

    fn archive_project(&self, project: &Project) -> Result<()> {
        (**self).archive_project(project)
    }
}
