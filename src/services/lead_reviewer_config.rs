//! Lead reviewer configuration file.
//!
//! The file lives in the repository and lists the reviewers who must be
//! requested on every pull request:
//!
//! ```yaml
//! reviewers:
//!   defaults:
//!     - alice
//!     - bob
//! ```

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;

use crate::error::AppError;
use crate::services::source::FileContent;

#[derive(Debug, Deserialize)]
struct ReviewerConfigFile {
    reviewers: Option<ReviewerSection>,
}

#[derive(Debug, Deserialize)]
struct ReviewerSection {
    defaults: Option<Vec<String>>,
}

/// Decode the body of a contents API file object.
pub fn decode_content(file: &FileContent) -> Result<String, AppError> {
    let (content, encoding) = match (&file.content, &file.encoding) {
        (Some(content), Some(encoding)) => (content, encoding),
        _ => {
            return Err(AppError::invalid_reviewer_config_at(
                "File object has no content or encoding",
                &file.path,
            ))
        }
    };

    if !encoding.eq_ignore_ascii_case("base64") {
        return Err(AppError::invalid_reviewer_config_at(
            format!("Unsupported content encoding '{}'", encoding),
            &file.path,
        ));
    }

    // The API wraps base64 output at 60 columns.
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes())?;

    String::from_utf8(bytes).map_err(|_| {
        AppError::invalid_reviewer_config_at("File content is not valid UTF-8", &file.path)
    })
}

/// Parse the lead reviewer list from YAML text.
pub fn parse_lead_reviewers(yaml: &str, path: &str) -> Result<Vec<String>, AppError> {
    let file: ReviewerConfigFile = serde_yaml::from_str(yaml).map_err(|e| {
        AppError::invalid_reviewer_config_at(format!("Failed to parse YAML: {}", e), path)
    })?;

    file.reviewers
        .and_then(|r| r.defaults)
        .ok_or_else(|| {
            AppError::invalid_reviewer_config_at("Missing list under reviewers.defaults", path)
        })
}

/// Decode a fetched config file and return its lead reviewers, in file order.
pub fn load_lead_reviewers(file: &FileContent) -> Result<Vec<String>, AppError> {
    let text = decode_content(file)?;
    let leads = parse_lead_reviewers(&text, &file.path)?;
    log::debug!("Loaded {} lead reviewers from {}", leads.len(), file.path);
    Ok(leads)
}
