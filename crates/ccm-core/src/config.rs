use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Settings for talking to the configuration backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Project used when a command names neither `--project` nor `--user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            default_project: None,
        }
    }
}

impl ClientConfig {
    /// Read the config at `path`, or the defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: ClientConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let url = self.api_url.trim();
        if url.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "api_url is empty".to_string(),
            });
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("api_url '{url}' must start with http:// or https://"),
            });
        }

        if self.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "timeout_secs must be greater than zero".to_string(),
            });
        } else if self.timeout_secs > 300 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "timeout_secs={} (>300 is unusual)",
                    self.timeout_secs
                ),
            });
        }

        if let Some(p) = &self.default_project {
            if p.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "default_project is set but blank".to_string(),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = ClientConfig::load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".ccm/config.yaml");
        let cfg = ClientConfig {
            api_url: "http://127.0.0.1:9000/api".into(),
            timeout_secs: 10,
            default_project: Some("web".into()),
        };
        cfg.save(&path).unwrap();
        assert_eq!(ClientConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: ClientConfig = serde_yaml::from_str("default_project: api\n").unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.default_project.as_deref(), Some("api"));
    }

    #[test]
    fn default_project_not_serialized_when_unset() {
        let yaml = serde_yaml::to_string(&ClientConfig::default()).unwrap();
        assert!(!yaml.contains("default_project"));
    }

    #[test]
    fn validate_default_is_clean() {
        assert!(ClientConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_url_and_timeout() {
        let cfg = ClientConfig {
            api_url: "localhost:3000".into(),
            timeout_secs: 0,
            default_project: None,
        };
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("http://")));
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("timeout_secs")));
    }

    #[test]
    fn validate_long_timeout_is_warning() {
        let cfg = ClientConfig {
            timeout_secs: 900,
            ..ClientConfig::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }
}
