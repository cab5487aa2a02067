//! Action environment and input validation.
//!
//! The runner exposes everything through environment variables. They are read
//! once, validated together and turned into an [`ActionEnvironment`]; a
//! missing required value fails the whole construction so no partially valid
//! environment ever exists.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// Threshold used when `required_approvals` is not configured.
pub const DEFAULT_REQUIRED_APPROVALS: u32 = 1;

/// Public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
pub const ENV_API_URL: &str = "GITHUB_API_URL";
pub const ENV_OUTPUT: &str = "GITHUB_OUTPUT";
pub const ENV_STEP_SUMMARY: &str = "GITHUB_STEP_SUMMARY";

/// `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepositorySlug {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(AppError::configuration_field(
                format!("Expected repository as owner/repo, got '{}'", s),
                ENV_REPOSITORY,
            )),
        }
    }
}

impl std::fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Validated runner environment.
#[derive(Clone)]
pub struct ActionEnvironment {
    /// API token.
    pub token: String,

    pub repository: RepositorySlug,

    /// Path to the JSON payload of the triggering event.
    pub event_path: PathBuf,

    /// Base URL of the REST API (differs on GitHub Enterprise Server).
    pub api_url: String,

    /// File the runner reads step outputs from.
    pub output_path: Option<PathBuf>,

    /// File the runner renders as the job summary.
    pub step_summary_path: Option<PathBuf>,
}

impl std::fmt::Debug for ActionEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEnvironment")
            .field("token", &"***")
            .field("repository", &self.repository)
            .field("event_path", &self.event_path)
            .field("api_url", &self.api_url)
            .field("output_path", &self.output_path)
            .field("step_summary_path", &self.step_summary_path)
            .finish()
    }
}

impl ActionEnvironment {
    /// Read the environment of the current process.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the environment from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                AppError::configuration_field(format!("{} is not set", key), key)
            })
        };

        let token = require(ENV_TOKEN)?;
        let repository: RepositorySlug = require(ENV_REPOSITORY)?.parse()?;
        let event_path = PathBuf::from(require(ENV_EVENT_PATH)?);

        Ok(Self {
            token,
            repository,
            event_path,
            api_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            output_path: get(ENV_OUTPUT).map(PathBuf::from),
            step_summary_path: get(ENV_STEP_SUMMARY).map(PathBuf::from),
        })
    }
}

/// Parse the `required_approvals` input.
///
/// Unset or blank input falls back to [`DEFAULT_REQUIRED_APPROVALS`]. Any
/// other value must be a positive integer.
pub fn parse_required_approvals(input: Option<&str>) -> Result<u32, AppError> {
    let value = match input.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_REQUIRED_APPROVALS),
        Some(value) => value,
    };

    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::configuration_field(
            format!("required_approvals must be a positive integer, got '{}'", value),
            "required_approvals",
        )),
    }
}
