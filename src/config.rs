use crate::constants::{DEFAULT_CATEGORY_LABEL, DEFAULT_TAGS_LABEL, DEFAULT_TARGET_FILE};
use crate::error::{PublishError, Result};
use serde::Deserialize;
use std::fs;

/// Resolved configuration for a publishing run. Loaded once at startup and
/// passed by reference into the pipelines; transformation code never reads
/// the environment on its own.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub spreadsheet: SpreadsheetConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub github: GitHubConfig,
}

#[derive(Debug, Deserialize)]
pub struct SpreadsheetConfig {
    /// Key of the source Google spreadsheet
    pub key: String,
    /// When false, all rows come from the spreadsheet's first worksheet
    #[serde(default = "default_true")]
    pub fetch_multiple_worksheets: bool,
    /// Titles of the session worksheets to fetch in multi-sheet mode
    #[serde(default)]
    pub sessions_worksheets: Vec<String>,
    /// Google API key; the GOOGLE_API_KEY environment variable wins over this
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ColumnConfig {
    /// Source column to publish as `category`, e.g. "space" for some events
    #[serde(default = "default_category_label")]
    pub category_label: String,
    /// Source column to publish as `tags`, e.g. "pathways"
    #[serde(default = "default_tags_label")]
    pub tags_label: String,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Write the serialized document to a local file as well
    #[serde(default = "default_true")]
    pub make_local_json: bool,
    /// Directory inside the target repo; empty means the repo root
    #[serde(default)]
    pub target_dir: String,
    #[serde(default = "default_target_file")]
    pub target_file: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubConfig {
    pub repo_owner: String,
    pub repo_name: String,
    #[serde(default = "default_branches")]
    pub target_branches: Vec<String>,
    /// When false the publisher runs in dry-run mode and never writes
    #[serde(default)]
    pub commit: bool,
    /// Ask for confirmation on the terminal before each branch write
    #[serde(default)]
    pub prompt_before_commit: bool,
    /// Personal access token; the GITHUB_TOKEN environment variable wins
    #[serde(default)]
    pub token: String,
}

fn default_true() -> bool {
    true
}

fn default_category_label() -> String {
    DEFAULT_CATEGORY_LABEL.to_string()
}

fn default_tags_label() -> String {
    DEFAULT_TAGS_LABEL.to_string()
}

fn default_target_file() -> String {
    DEFAULT_TARGET_FILE.to_string()
}

fn default_branches() -> Vec<String> {
    vec!["gh-pages".to_string()]
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            PublishError::Config(format!(
                "Failed to read config file '{config_path}': {e}"
            ))
        })?;

        let mut config: Config = toml::from_str(&config_content)?;

        // Secrets come from the environment when present
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            config.github.token = token;
        }
        if let Ok(api_key) = std::env::var("GOOGLE_API_KEY") {
            config.spreadsheet.api_key = api_key;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.spreadsheet.key.is_empty() {
            return Err(PublishError::Config(
                "spreadsheet.key must be set".to_string(),
            ));
        }
        if self.spreadsheet.fetch_multiple_worksheets
            && self.spreadsheet.sessions_worksheets.is_empty()
        {
            return Err(PublishError::Config(
                "spreadsheet.sessions_worksheets must list at least one worksheet \
                 title when fetch_multiple_worksheets is enabled"
                    .to_string(),
            ));
        }
        if self.spreadsheet.api_key.is_empty() {
            return Err(PublishError::Config(
                "Google API key missing; set spreadsheet.api_key or GOOGLE_API_KEY"
                    .to_string(),
            ));
        }
        if self.github.commit && self.github.token.is_empty() {
            return Err(PublishError::Config(
                "GitHub token missing; set github.token or GITHUB_TOKEN when \
                 github.commit is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the published artifact inside the target repository.
    pub fn target_path(&self) -> String {
        if self.output.target_dir.is_empty() {
            self.output.target_file.clone()
        } else {
            format!(
                "{}/{}",
                self.output.target_dir.trim_end_matches('/'),
                self.output.target_file
            )
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            category_label: default_category_label(),
            tags_label: default_tags_label(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            make_local_json: true,
            target_dir: String::new(),
            target_file: default_target_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_defaults_for_optional_sections() {
        let config: Config = toml::from_str(
            r#"
            [spreadsheet]
            key = "abc123"
            fetch_multiple_worksheets = false

            [github]
            repo_owner = "example"
            repo_name = "schedule-site"
            "#,
        )
        .unwrap();

        assert_eq!(config.columns.category_label, "category");
        assert_eq!(config.columns.tags_label, "tags");
        assert!(config.output.make_local_json);
        assert_eq!(config.output.target_file, "sessions.json");
        assert_eq!(config.github.target_branches, vec!["gh-pages"]);
        assert!(!config.github.commit);
        assert_eq!(config.target_path(), "sessions.json");
    }

    #[test]
    fn target_path_joins_dir_and_file() {
        let config: Config = toml::from_str(
            r#"
            [spreadsheet]
            key = "abc123"
            fetch_multiple_worksheets = false

            [output]
            target_dir = "data/"

            [github]
            repo_owner = "example"
            repo_name = "schedule-site"
            "#,
        )
        .unwrap();

        assert_eq!(config.target_path(), "data/sessions.json");
    }
}
