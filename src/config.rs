//! Connection settings from flags, environment and `~/.isvc/config.yaml`.

use crate::traits::BackendSettings;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:9090";

/// Contents of the optional YAML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub organization: Option<String>,
    pub cluster: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `explicit` if given (it must exist), otherwise the default file if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading config file");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `~/.isvc/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".isvc").join("config.yaml"))
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub organization: Option<String>,
    pub cluster: Option<String>,
}

/// Effective settings after applying precedence
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub token: Option<String>,
    pub organization: Option<String>,
    pub cluster: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: None,
            organization: None,
            cluster: None,
        }
    }
}

impl Settings {
    /// Flags and environment win over the file, the file wins over built-in defaults
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Self {
            endpoint: non_empty(overrides.endpoint)
                .or(non_empty(file.endpoint))
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            token: non_empty(overrides.token).or(non_empty(file.token)),
            organization: non_empty(overrides.organization).or(non_empty(file.organization)),
            cluster: non_empty(overrides.cluster).or(non_empty(file.cluster)),
        }
    }

    /// Connection settings for the backend client
    pub fn backend(&self) -> Result<BackendSettings> {
        let endpoint = url::Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid backend endpoint: {}", self.endpoint))?;
        if endpoint.cannot_be_a_base() {
            bail!("Invalid backend endpoint: {}", self.endpoint);
        }

        let Some(organization) = self.organization.clone() else {
            bail!("No organization configured. Use --organization or ISVC_ORG");
        };
        let Some(cluster) = self.cluster.clone() else {
            bail!("No cluster configured. Use --cluster or ISVC_CLUSTER");
        };

        Ok(BackendSettings {
            endpoint,
            token: self.token.clone(),
            organization,
            cluster,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_file() {
        let file = write_config("endpoint: https://api.example.com\norganization: acme\n");
        let config = FileConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.endpoint.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.organization.as_deref(), Some("acme"));
        assert_eq!(config.cluster, None);
    }

    #[test]
    fn test_empty_config_file() {
        let file = write_config("");
        assert_eq!(FileConfig::load(Some(file.path())).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(FileConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_malformed_config_file() {
        let file = write_config("organization: [unterminated");
        let err = FileConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = FileConfig {
            endpoint: Some("https://file.example.com".to_string()),
            token: Some("file-token".to_string()),
            organization: Some("file-org".to_string()),
            cluster: Some("file-cluster".to_string()),
        };
        let overrides = Overrides {
            organization: Some("flag-org".to_string()),
            cluster: Some(String::new()),
            ..Overrides::default()
        };

        let settings = Settings::resolve(overrides, file);

        assert_eq!(settings.endpoint, "https://file.example.com");
        assert_eq!(settings.token.as_deref(), Some("file-token"));
        assert_eq!(settings.organization.as_deref(), Some("flag-org"));
        assert_eq!(settings.cluster.as_deref(), Some("file-cluster"));
    }

    #[test]
    fn test_default_endpoint() {
        let settings = Settings::resolve(Overrides::default(), FileConfig::default());
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_backend_settings_need_organization_and_cluster() {
        let mut settings = Settings::default();
        assert!(settings.backend().is_err());

        settings.organization = Some("acme".to_string());
        let err = settings.backend().unwrap_err();
        assert!(err.to_string().contains("cluster"));

        settings.cluster = Some("prod".to_string());
        let backend = settings.backend().unwrap();
        assert_eq!(backend.endpoint.as_str(), "http://localhost:9090/");
    }

    #[test]
    fn test_invalid_endpoint() {
        let settings = Settings {
            endpoint: "not a url".to_string(),
            organization: Some("acme".to_string()),
            cluster: Some("prod".to_string()),
            ..Settings::default()
        };
        assert!(settings.backend().is_err());
    }
}
