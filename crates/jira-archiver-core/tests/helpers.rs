#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, TimeZone, Utc};
use jira_archiver_core::{Error, Project, ProjectPage, ProjectStatus, Result, Settings, Tracker};

/// Fixed clock used across the tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn project(key: &str, last_updated: Option<DateTime<Utc>>) -> Project {
    Project {
        id: format!("id-{}", key),
        key: key.to_string(),
        name: format!("{} project", key),
        last_updated,
        status: ProjectStatus::Active,
    }
}

/// Settings with a 180 day threshold and no credentials.
pub fn settings() -> Settings {
    Settings { inactivity_days: 180, page_size: 2, ..Default::default() }
}

/// In-memory tracker that serves fixed pages and records every call.
#[derive(Default)]
pub struct FakeTracker {
    pub projects: Vec<Project>,
    pub issue_activity: HashMap<String, DateTime<Utc>>,
    pub failing_lookups: HashSet<String>,
    pub failing_archives: HashSet<String>,
    /// Fail the page request at this offset.
    pub failing_page: Option<u64>,
    /// Report `total` on each page instead of `is_last`.
    pub report_total_only: bool,
    pub page_requests: Cell<usize>,
    pub lookups: RefCell<Vec<String>>,
    pub archived: RefCell<Vec<String>>,
}

impl FakeTracker {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self { projects, ..Default::default() }
    }

    pub fn issue_at(mut self, key: &str, at: DateTime<Utc>) -> Self {
        self.issue_activity.insert(key.to_string(), at);
        self
    }

    pub fn failing_lookup(mut self, key: &str) -> Self {
        self.failing_lookups.insert(key.to_string());
        self
    }

    pub fn failing_archive(mut self, key: &str) -> Self {
        self.failing_archives.insert(key.to_string());
        self
    }

    pub fn archived_keys(&self) -> Vec<String> {
        self.archived.borrow().clone()
    }
}

impl Tracker for FakeTracker {
    fn project_page(&self, start_at: u64, max_results: u32) -> Result<ProjectPage> {
        self.page_requests.set(self.page_requests.get() + 1);
        if self.failing_page == Some(start_at) {
            return Err(Error::HttpStatus { status: 503, body: "service unavailable".into() });
        }
        let start = (start_at as usize).min(self.projects.len());
        let end = (start + max_results as usize).min(self.projects.len());
        let is_last = end >= self.projects.len();
        Ok(ProjectPage {
            projects: self.projects[start..end].to_vec(),
            total: Some(self.projects.len() as u64),
            is_last: is_last && !self.report_total_only,
        })
    }

    fn latest_issue_activity(&self, project_key: &str) -> Result<Option<DateTime<Utc>>> {
        self.lookups.borrow_mut().push(project_key.to_string());
        if self.failing_lookups.contains(project_key) {
            return Err(Error::HttpStatus { status: 500, body: "search failed".into() });
        }
        Ok(self.issue_activity.get(project_key).copied())
    }

    fn archive_project(&self, project: &Project) -> Result<()> {
        if self.failing_archives.contains(&project.key) {
            return Err(Error::HttpStatus { status: 403, body: "not allowed".into() });
        }
        self.archived.borrow_mut().push(project.key.clone());
        Ok(())
    }
}

/// Helper function to initialize the tracing subscriber for tests.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
