use crate::config::GitHubConfig;
use crate::constants::{CREATE_COMMIT_MESSAGE, UPDATE_COMMIT_MESSAGE};
use crate::error::{PublishError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::{self, BufRead, Write};
use tracing::{info, instrument};

const GITHUB_API_BASE: &str = "https://api.github.com";

/// A file as it currently exists in the remote repository
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub content: Vec<u8>,
    pub sha: String,
}

/// Remote file store with create-or-update semantics, addressed by path
/// and branch.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_file(&self, path: &str, branch: &str) -> Result<Option<RemoteFile>>;

    async fn create_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &[u8],
    ) -> Result<()>;

    async fn update_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &[u8],
        sha: &str,
    ) -> Result<()>;
}

/// What happened on each target branch
#[derive(Debug, Default, Serialize)]
pub struct PublishSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

/// Publishes a serialized payload to every configured branch. A branch is
/// only written when the payload differs byte-for-byte from what is
/// already there; with the commit toggle off this is a dry run that reads
/// but never writes.
pub struct Publisher<'a> {
    store: &'a dyn ContentStore,
    config: &'a GitHubConfig,
}

impl<'a> Publisher<'a> {
    pub fn new(store: &'a dyn ContentStore, config: &'a GitHubConfig) -> Self {
        Self { store, config }
    }

    pub async fn publish(&self, path: &str, payload: &[u8]) -> Result<PublishSummary> {
        let repo = format!("{}/{}", self.config.repo_owner, self.config.repo_name);
        let mut summary = PublishSummary::default();

        for branch in &self.config.target_branches {
            let existing = self.store.get_file(path, branch).await?;

            if !self.config.commit {
                info!(
                    "Dry run: not writing {} to {} on branch {}",
                    path, repo, branch
                );
                summary.skipped += 1;
                continue;
            }

            if self.config.prompt_before_commit && !confirm_commit(path, &repo, branch)? {
                info!("Commit to branch {} declined at prompt", branch);
                summary.skipped += 1;
                continue;
            }

            match existing {
                None => {
                    self.store
                        .create_file(path, branch, CREATE_COMMIT_MESSAGE, payload)
                        .await?;
                    info!("Created new data file {} in repo {} ({})", path, repo, branch);
                    summary.created += 1;
                }
                Some(remote) if remote.content == payload => {
                    info!("Data has not changed, no commit created ({})", branch);
                    summary.unchanged += 1;
                }
                Some(remote) => {
                    self.store
                        .update_file(path, branch, UPDATE_COMMIT_MESSAGE, payload, &remote.sha)
                        .await?;
                    info!(
                        "Data updated! Updated {} has been committed to repo {} ({})",
                        path, repo, branch
                    );
                    summary.updated += 1;
                }
            }
        }

        Ok(summary)
    }
}

fn confirm_commit(path: &str, repo: &str, branch: &str) -> Result<bool> {
    print!("[Please Confirm] Commit {path} to repo {repo} (branch {branch})? (Y/N): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim() == "Y")
}

/// GitHub contents API client
pub struct GitHubClient {
    client: reqwest::Client,
    repo_owner: String,
    repo_name: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("schedule_publisher/0.1.0")
            .build()?;
        Ok(Self {
            client,
            repo_owner: config.repo_owner.clone(),
            repo_name: config.repo_name.clone(),
            token: config.token.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{GITHUB_API_BASE}/repos/{}/{}/contents/{}",
            self.repo_owner, self.repo_name, path
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
    }
}

#[async_trait::async_trait]
impl ContentStore for GitHubClient {
    #[instrument(skip(self))]
    async fn get_file(&self, path: &str, branch: &str) -> Result<Option<RemoteFile>> {
        let response = self
            .authorized(self.client.get(self.contents_url(path)))
            .query(&[("ref", branch)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let contents: ContentsResponse = response.error_for_status()?.json().await?;

        // The API wraps base64 bodies in newlines
        let encoded: String = contents
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let content = STANDARD.decode(encoded).map_err(|e| PublishError::Api {
            message: format!("Failed to decode remote file content: {e}"),
        })?;

        Ok(Some(RemoteFile {
            content,
            sha: contents.sha,
        }))
    }

    #[instrument(skip(self, content))]
    async fn create_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &[u8],
    ) -> Result<()> {
        let body = json!({
            "message": message,
            "content": STANDARD.encode(content),
            "branch": branch,
        });

        self.authorized(self.client.put(self.contents_url(path)))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn update_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        content: &[u8],
        sha: &str,
    ) -> Result<()> {
        let body = json!({
            "message": message,
            "content": STANDARD.encode(content),
            "branch": branch,
            "sha": sha,
        });

        self.authorized(self.client.put(self.contents_url(path)))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
