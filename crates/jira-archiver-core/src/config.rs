use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with a project whose last activity could not be determined.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownActivityPolicy {
    /// Treat the project as maximally inactive.
    #[default]
    Archive,
    /// Leave the project alone and report it as skipped.
    Skip,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// Jira Cloud tenant, without ".atlassian.net".
    pub domain: Option<String>,

    /// Full base URL of the Jira instance. Takes precedence over `domain`.
    pub base_url: Option<String>,

    /// Account email used for basic auth.
    pub email: Option<String>,

    /// API token used for basic auth.
    pub api_token: Option<String>,

    /// Number of days without activity before a project is considered for archiving.
    pub inactivity_days: u64,

    /// Projects requested per page while enumerating.
    pub page_size: u32,

    /// Timeout applied to every request against Jira or Slack.
    pub request_timeout_secs: u64,

    /// How to treat projects with no activity signal at all.
    pub unknown_activity: UnknownActivityPolicy,

    /// Project keys that are never archived.
    pub exclude: Vec<String>,

    /// Incoming webhook that receives the run summary.
    pub slack_webhook_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: None,
            base_url: None,
            email: None,
            api_token: None,
            inactivity_days: 180,
            page_size: 50,
            request_timeout_secs: 30,
            unknown_activity: UnknownActivityPolicy::Archive,
            exclude: vec![],
            slack_webhook_url: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = std::env::var("HOME").map_err(|_| Error::HomeDirNotFound)?;
        Ok(PathBuf::from(format!(
            "{}/.config/jira-archiver/settings.toml",
            home_dir
        )))
    }

    pub fn new() -> Result<Self> {
        let home_dir = std::env::var("HOME").map_err(|_| Error::HomeDirNotFound)?;

        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("{}/.config/jira-archiver/settings", home_dir))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("JIRA")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("exclude"),
            )
            .set_override_option("slack_webhook_url", std::env::var("SLACK_WEBHOOK_URL").ok())?
            .set_default("inactivity_days", 180)?
            .set_default("page_size", 50)?
            .set_default("request_timeout_secs", 30)?
            .build()?;
        config_builder.try_deserialize().map_err(Error::Config)
    }

    /// Resolves the REST base URL, preferring an explicit `base_url` over the tenant domain.
    pub fn jira_base_url(&self) -> Result<String> {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.trim_end_matches('/').to_string());
        }
        let domain = self
            .domain
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or(Error::MissingSetting("domain"))?;
        Ok(format!("https://{}.atlassian.net", domain))
    }

    pub fn is_excluded(&self, project_key: &str) -> bool {
        self.exclude.iter().any(|excluded| excluded.eq_ignore_ascii_case(project_key))
    }
}
