use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for glbackup.
///
/// Lets users keep connection settings and fetch limits out of the command
/// line. Values from a configuration file are overridden by command-line
/// flags and environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitLab connection settings
    #[serde(default)]
    pub gitlab: GitLabConfig,

    /// Output file preferences
    #[serde(default)]
    pub output: OutputConfig,

    /// Fetch limits and concurrency
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitLabConfig {
    /// GitLab personal access token
    pub token: Option<String>,

    /// GitLab instance base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Numeric id of the user whose activity is backed up
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory the JSON files are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Pretty-print the JSON files
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Maximum number of pages fetched per collection
    #[serde(default = "default_max_pages")]
    pub max_pages: u64,

    /// Number of per-item lookups to run concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gitlab: GitLabConfig::default(),
            output: OutputConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            user_id: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pretty: false,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_pages() -> u64 {
    1000
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./glbackup.toml
    /// 3. ./glbackup.json
    /// 4. ./glbackup.yaml
    /// 5. ./glbackup.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        // Try common configuration file names
        let candidates = [
            "glbackup.toml",
            "glbackup.json",
            "glbackup.yaml",
            "glbackup.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gitlab.base_url, "https://gitlab.com");
        assert_eq!(config.gitlab.token, None);
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert!(!config.output.pretty);
        assert_eq!(config.fetch.max_pages, 1000);
        assert_eq!(config.fetch.concurrency, 4);
        assert_eq!(config.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[gitlab]
token = "glpat-test-token"
base-url = "https://gitlab.example.com"
user-id = 42

[output]
dir = "backups"
pretty = true

[fetch]
max-pages = 50
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.gitlab.token, Some("glpat-test-token".to_string()));
        assert_eq!(config.gitlab.base_url, "https://gitlab.example.com");
        assert_eq!(config.gitlab.user_id, Some(42));
        assert_eq!(config.output.dir, PathBuf::from("backups"));
        assert!(config.output.pretty);
        assert_eq!(config.fetch.max_pages, 50);
        // Unspecified values fall back to defaults
        assert_eq!(config.fetch.concurrency, 4);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "gitlab": {
    "token": "glpat-json-token",
    "base-url": "https://gitlab.json.com",
    "user-id": 7
  },
  "fetch": {
    "concurrency": 8
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.gitlab.token, Some("glpat-json-token".to_string()));
        assert_eq!(config.gitlab.base_url, "https://gitlab.json.com");
        assert_eq!(config.gitlab.user_id, Some(7));
        assert_eq!(config.fetch.concurrency, 8);
    }

    #[test]
    fn test_load_without_config_file_returns_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let config = Config::load(None).unwrap();

        std::env::set_current_dir(original_dir).unwrap();

        assert_eq!(config.gitlab.base_url, "https://gitlab.com");
        assert_eq!(config.fetch.max_pages, 1000);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = Config::load(Some(Path::new("nonexistent-glbackup.toml")));
        assert!(result.is_err());
    }
}
