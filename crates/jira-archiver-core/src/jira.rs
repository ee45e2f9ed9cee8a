//! Blocking Jira Cloud REST v3 client covering the three calls the archiver makes.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{Project, ProjectPage, ProjectStatus};
use crate::tracker::Tracker;

#[derive(Debug)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    const PROJECT_SEARCH_PATH: &'static str = "/rest/api/3/project/search";
    const JQL_SEARCH_PATH: &'static str = "/rest/api/3/search/jql";

    /// Builds a client from settings. Credentials must be present.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.jira_base_url()?;
        let email = settings
            .email
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or(Error::MissingSetting("email"))?;
        let api_token = settings
            .api_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingSetting("api_token"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self { client, base_url, email, api_token })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(Error::HttpStatus { status: status.as_u16(), body })
    }
}

impl Tracker for JiraClient {
    fn project_page(&self, start_at: u64, max_results: u32) -> Result<ProjectPage> {
        debug!(start_at, max_results, "Requesting project page.");
        let response = self
            .client
            .get(self.url(Self::PROJECT_SEARCH_PATH))
            .basic_auth(&self.email, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("startAt", start_at.to_string()),
                ("maxResults", max_results.to_string()),
                ("expand", "insight".to_string()),
            ])
            .send()?;
        let page: ProjectSearchResponse = Self::check(response)?.json()?;
        Ok(page.into())
    }

    fn latest_issue_activity(&self, project_key: &str) -> Result<Option<DateTime<Utc>>> {
        let body = json!({
            "jql": latest_issue_jql(project_key),
            "maxResults": 1,
            "fields": ["updated"],
        });
        let response = self
            .client
            .post(self.url(Self::JQL_SEARCH_PATH))
            .basic_auth(&self.email, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()?;
        let result: JqlSearchResponse = Self::check(response)?.json()?;

        match result.issues.first().and_then(|issue| issue.fields.updated.as_deref()) {
            Some(updated) => {
                trace!(%project_key, %updated, "Latest issue update.");
                parse_jira_timestamp(updated).map(Some)
            }
            None => Ok(None),
        }
    }

    fn archive_project(&self, project: &Project) -> Result<()> {
        let url = self.url(&format!("/rest/api/3/project/{}/archive", project.id));
        let response = self
            .client
            .post(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}

fn latest_issue_jql(project_key: &str) -> String {
    format!("project = \"{}\" ORDER BY updated DESC", project_key.replace('"', "\\\""))
}

/// Parses Jira's `2024-03-01T10:15:30.000+0000` format as well as plain RFC 3339.
pub fn parse_jira_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(raw.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSearchResponse {
    #[serde(default)]
    values: Vec<RawProject>,
    total: Option<u64>,
    #[serde(default)]
    is_last: bool,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    id: String,
    key: String,
    name: String,
    #[serde(default)]
    archived: bool,
    insight: Option<RawInsight>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInsight {
    last_issue_update_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JqlSearchResponse {
    #[serde(default)]
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    fields: RawIssueFields,
}

#[derive(Debug, Deserialize)]
struct RawIssueFields {
    updated: Option<String>,
}

impl From<ProjectSearchResponse> for ProjectPage {
    fn from(response: ProjectSearchResponse) -> Self {
        let projects = response.values.into_iter().map(Project::from).collect();
        ProjectPage { projects, total: response.total, is_last: response.is_last }
    }
}

impl From<RawProject> for Project {
    fn from(raw: RawProject) -> Self {
        let last_updated = raw
            .insight
            .and_then(|insight| insight.last_issue_update_time)
            .and_then(|value| match parse_jira_timestamp(&value) {
                Ok(dt) => Some(dt),
                Err(e) => {
                    warn!(project = %raw.key, error = %e, "Ignoring unparseable project timestamp.");
                    None
                }
            });
        Project {
            id: raw.id,
            key: raw.key,
            name: raw.name,
            last_updated,
            status: if raw.archived { ProjectStatus::Archived } else { ProjectStatus::Active },
        }
    }
}
