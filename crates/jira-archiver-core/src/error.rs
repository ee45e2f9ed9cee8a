use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Settings error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Missing required setting '{0}'")]
    MissingSetting(&'static str),

    #[error("Jira responded with HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// Listing projects failed part-way. Fatal to the run.
    #[error("Failed to enumerate projects at offset {start_at}: {source}")]
    Enumeration {
        start_at: u64,
        #[source]
        source: Box<Error>,
    },

    #[error("Could not resolve activity for {project}: {source}")]
    Resolution {
        project: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Could not archive {project}: {source}")]
    Archive {
        project: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn enumeration(start_at: u64, source: Error) -> Self {
        Error::Enumeration { start_at, source: Box::new(source) }
    }

    pub fn resolution(project: impl Into<String>, source: Error) -> Self {
        Error::Resolution { project: project.into(), source: Box::new(source) }
    }

    pub fn archive(project: impl Into<String>, source: Error) -> Self {
        Error::Archive { project: project.into(), source: Box::new(source) }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
