//! GitHub API client.
//!
//! Provides an HTTP client for the GitHub REST API with token authentication
//! and `Link` header pagination. Only the read-only endpoints the gate needs
//! are implemented.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{RepositorySlug, DEFAULT_API_URL};
use crate::error::AppError;
use crate::models::{PendingReviewRequest, ReviewEvent, ReviewState};
use crate::services::source::{FileContent, PullRequestSource};

/// REST API version pinned through the `X-GitHub-Api-Version` header.
const API_VERSION: &str = "2022-11-28";

/// Largest page size GitHub accepts.
const PER_PAGE: &str = "100";

/// GitHub API client configuration.
#[derive(Clone)]
pub struct GitHubClientConfig {
    /// Base URL of the REST API (e.g., `https://api.github.com`).
    pub base_url: String,

    /// Token for authentication.
    pub token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// GitHub API client scoped to one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    repository: RepositorySlug,
}

/// GitHub user from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// GitHub team from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubTeam {
    pub slug: String,
}

/// Pull request review from API (GET /repos/:owner/:repo/pulls/:n/reviews).
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubReview {
    pub id: i64,
    /// `null` for reviews left by deleted accounts.
    pub user: Option<GitHubUser>,
    pub state: ReviewState,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<GitHubReview> for ReviewEvent {
    fn from(review: GitHubReview) -> Self {
        Self {
            reviewer: review.user.map(|u| u.login),
            state: review.state,
            submitted_at: review.submitted_at,
        }
    }
}

/// Response from the requested reviewers endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestedReviewers {
    #[serde(default)]
    pub users: Vec<GitHubUser>,
    #[serde(default)]
    pub teams: Vec<GitHubTeam>,
}

/// File object from the repository contents endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryContent {
    pub path: Option<String>,
    pub content: Option<String>,
    pub encoding: Option<String>,
}

/// Extract the `rel="next"` target from a `Link` header value.
fn parse_next_link(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let mut sections = part.split(';');
        let target = sections.next()?.trim();
        let is_next = sections.any(|s| s.trim() == r#"rel="next""#);
        if is_next {
            target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(String::from)
        } else {
            None
        }
    })
}

/// Percent-encode each segment of a repository path, keeping the separators.
fn encode_repo_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(config: GitHubClientConfig, repository: RepositorySlug) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| AppError::authentication("Invalid token format"))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            repository,
        })
    }

    /// Full URL for a repository-relative endpoint.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, self.repo_endpoint(path))
    }

    /// Endpoint path under `/repos/:owner/:repo`.
    fn repo_endpoint(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            self.repository.owner, self.repository.name, path
        )
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)))
        } else if status == StatusCode::UNAUTHORIZED {
            Err(AppError::authentication(
                "GitHub token is invalid or expired",
            ))
        } else {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            // GitHub returns errors as {"message": "...", "documentation_url": "..."}
            let body_message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message")?.as_str().map(String::from));

            let message = match (status, &body_message) {
                (StatusCode::FORBIDDEN, Some(msg)) if msg.contains("rate limit") => {
                    "Rate limit exceeded".to_string()
                }
                (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
                (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
                (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
                (_, Some(msg)) => msg.clone(),
                _ => format!("Request failed ({}): {}", status_code, body),
            };

            Err(AppError::github_api_full(message, status_code, endpoint))
        }
    }

    /// Fetch all pages of a paginated endpoint, in API order.
    pub async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, AppError> {
        let endpoint = self.repo_endpoint(path);
        let mut all_data = Vec::new();

        let mut request = self
            .client
            .get(self.api_url(path))
            .query(&[("per_page", PER_PAGE)]);

        loop {
            let response = request.send().await?;
            let next = response
                .headers()
                .get(header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_next_link);
            let data = self.handle_response::<Vec<T>>(response, &endpoint).await?;

            all_data.extend(data);

            match next {
                // The next link already carries every query parameter.
                Some(url) => request = self.client.get(url),
                None => break,
            }
        }

        Ok(all_data)
    }

    /// List posted reviews for a pull request, oldest first.
    pub async fn list_reviews(&self, number: u64) -> Result<Vec<GitHubReview>, AppError> {
        self.get_all_pages(&format!("/pulls/{}/reviews", number))
            .await
    }

    /// List users and teams with an open review request.
    pub async fn list_requested_reviewers(
        &self,
        number: u64,
    ) -> Result<RequestedReviewers, AppError> {
        let path = format!("/pulls/{}/requested_reviewers", number);
        let response = self.client.get(self.api_url(&path)).send().await?;
        self.handle_response(response, &self.repo_endpoint(&path))
            .await
    }

    /// Get a file from the repository contents API.
    ///
    /// `git_ref` selects a branch, tag or SHA; `None` uses the default branch.
    pub async fn get_repository_content(
        &self,
        file_path: &str,
        git_ref: Option<&str>,
    ) -> Result<RepositoryContent, AppError> {
        let path = format!("/contents/{}", encode_repo_path(file_path));
        let mut request = self.client.get(self.api_url(&path));
        if let Some(r) = git_ref {
            request = request.query(&[("ref", r)]);
        }

        let response = request.send().await?;
        self.handle_response(response, &self.repo_endpoint(&path))
            .await
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn reviews(&self, number: u64) -> Result<Vec<ReviewEvent>, AppError> {
        let reviews = self.list_reviews(number).await?;
        log::debug!("Fetched {} reviews for #{}", reviews.len(), number);
        Ok(reviews.into_iter().map(ReviewEvent::from).collect())
    }

    async fn pending_requests(&self, number: u64) -> Result<Vec<PendingReviewRequest>, AppError> {
        let requested = self.list_requested_reviewers(number).await?;
        for team in &requested.teams {
            log::debug!("Ignoring team review request for '{}'", team.slug);
        }
        Ok(requested
            .users
            .into_iter()
            .map(|u| PendingReviewRequest::new(u.login))
            .collect())
    }

    async fn file_content(
        &self,
        file_path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent, AppError> {
        let content = self.get_repository_content(file_path, git_ref).await?;
        Ok(FileContent {
            path: content.path.unwrap_or_else(|| file_path.to_string()),
            content: content.content,
            encoding: content.encoding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GitHubClient {
        GitHubClient::new(
            GitHubClientConfig {
                base_url: base_url.to_string(),
                token: "test-token".to_string(),
                timeout_secs: 30,
            },
            "octo/widgets".parse().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_api_url_construction() {
        let client = client("https://github.example.com/api/v3/");
        assert_eq!(
            client.api_url("/pulls/5/reviews"),
            "https://github.example.com/api/v3/repos/octo/widgets/pulls/5/reviews"
        );
    }

    #[test]
    fn test_parse_next_link() {
        let link = r#"<https://api.github.com/repositories/1/pulls/5/reviews?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/pulls/5/reviews?per_page=100&page=4>; rel="last""#;
        assert_eq!(
            parse_next_link(link).as_deref(),
            Some("https://api.github.com/repositories/1/pulls/5/reviews?per_page=100&page=2")
        );
    }

    #[test]
    fn test_parse_next_link_last_page() {
        let link = r#"<https://api.github.com/x?page=1>; rel="prev", <https://api.github.com/x?page=1>; rel="first""#;
        assert_eq!(parse_next_link(link), None);
        assert_eq!(parse_next_link(""), None);
    }

    #[test]
    fn test_encode_repo_path() {
        assert_eq!(encode_repo_path(".github/reviewers.yml"), ".github/reviewers.yml");
        assert_eq!(encode_repo_path("/conf/my file.yml"), "conf/my%20file.yml");
    }

    #[test]
    fn test_review_deserialization() {
        let json = r#"[
            {"id": 1, "user": {"login": "alice", "id": 10}, "state": "APPROVED",
             "submitted_at": "2024-03-01T10:00:00Z", "body": ""},
            {"id": 2, "user": null, "state": "CHANGES_REQUESTED", "submitted_at": null},
            {"id": 3, "user": {"login": "bob"}, "state": "COMMENTED"}
        ]"#;
        let reviews: Vec<GitHubReview> = serde_json::from_str(json).unwrap();
        let events: Vec<ReviewEvent> = reviews.into_iter().map(ReviewEvent::from).collect();

        assert_eq!(events[0].reviewer.as_deref(), Some("alice"));
        assert_eq!(events[0].state, ReviewState::Approved);
        assert!(events[0].submitted_at.is_some());
        assert_eq!(events[1].reviewer, None);
        assert_eq!(events[2].state, ReviewState::Commented);
    }

    #[test]
    fn test_requested_reviewers_deserialization() {
        let json = r#"{"users": [{"login": "carol"}], "teams": [{"slug": "core", "name": "Core"}]}"#;
        let requested: RequestedReviewers = serde_json::from_str(json).unwrap();
        assert_eq!(requested.users[0].login, "carol");
        assert_eq!(requested.teams[0].slug, "core");

        let empty: RequestedReviewers = serde_json::from_str("{}").unwrap();
        assert!(empty.users.is_empty());
    }
}
