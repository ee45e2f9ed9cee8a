use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
}

/// Snapshot of a Jira project taken while enumerating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,
    /// Last-updated field from the project metadata, if Jira reported one.
    pub last_updated: Option<DateTime<Utc>>,
    pub status: ProjectStatus,
}

/// One page of the paginated project listing.
#[derive(Debug, Clone, Default)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub total: Option<u64>,
    pub is_last: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    ProjectMetadata,
    IssueEvent,
}

/// Resolved last activity. `Unknown` is explicit, never a synthetic date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Known {
        at: DateTime<Utc>,
        source: ActivitySource,
    },
    Unknown,
}

impl Activity {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Activity::Known { at, .. } => Some(*at),
            Activity::Unknown => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub project: Project,
    pub activity: Activity,
    /// Reason the resolver degraded this record to unknown, if a query failed.
    pub resolution_error: Option<String>,
}

/// Age of a project's last activity in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Age {
    Days(u64),
    /// No activity signal at all. Orders after every finite age.
    Unknown,
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Days(days) => write!(f, "{}d", days),
            Age::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub project: Project,
    pub age: Age,
    pub is_inactive: bool,
    pub resolution_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveAction {
    Archived,
    WouldArchive,
    Skipped,
    Failed,
}

impl fmt::Display for ArchiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArchiveAction::Archived => "archived",
            ArchiveAction::WouldArchive => "would-archive",
            ArchiveAction::Skipped => "skipped",
            ArchiveAction::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub project_key: String,
    pub project_name: String,
    pub age: Age,
    pub action: ArchiveAction,
    pub detail: Option<String>,
}

impl ArchiveOutcome {
    /// One human-readable line: `<KEY> <age> <action>[: <detail>]`.
    pub fn report_line(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} {} {}: {}", self.project_key, self.age, self.action, detail),
            None => format!("{} {} {}", self.project_key, self.age, self.action),
        }
    }
}

impl fmt::Display for ArchiveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report_line())
    }
}
