use crate::core::importer::{DEFAULT_CSV_PATH, DEFAULT_DEMO_PASSWORD};
use crate::core::retry::RetryPolicy;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "six-wraps.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub import: ImportConfig,
    pub storage: StorageConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Host part, e.g. `https://api.sixwraps.com`.
    pub api_path: String,
    pub api_version: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_path: "http://localhost:4000".to_string(),
            api_version: "v1".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_base_delay_ms: 1000,
        }
    }
}

impl ApiConfig {
    /// `{api_path}/api/{api_version}`
    pub fn base_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.api_path.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_base_delay_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub csv_path: String,
    pub database_url: String,
    pub demo_password: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
            database_url: "sqlite://six-wraps.db".to_string(),
            demo_password: DEFAULT_DEMO_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Holds the session tokens and the cached metadata.
    pub state_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: ".six-wraps".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub limit: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { limit: 6 }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Reads `path` when it exists; a missing file means defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables stay as written.
fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.api_path", &self.api.api_path)?;
        validate_non_empty_string("api.api_version", &self.api.api_version)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;
        validate_range("api.max_retries", self.api.max_retries, 0, 10)?;
        validate_range("api.retry_base_delay_ms", self.api.retry_base_delay_ms, 1, 60_000)?;

        validate_path("import.csv_path", &self.import.csv_path)?;
        validate_file_extension("import.csv_path", &self.import.csv_path, &["csv"])?;
        validate_non_empty_string("import.database_url", &self.import.database_url)?;
        if !self.import.database_url.starts_with("sqlite:") {
            return Err(AppError::InvalidConfigValue {
                field: "import.database_url".to_string(),
                value: self.import.database_url.clone(),
                reason: "Only sqlite: URLs are supported".to_string(),
            });
        }
        validate_non_empty_string("import.demo_password", &self.import.demo_password)?;

        validate_path("storage.state_dir", &self.storage.state_dir)?;
        validate_range("list.limit", self.list.limit, 1, 1000)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert_ok!(config.validate());
        assert_eq!(config.api.base_url(), "http://localhost:4000/api/v1");
        assert_eq!(config.import.csv_path, "../../../files/users.csv");
        assert_eq!(config.list.limit, 6);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
[api]
api_path = "https://api.sixwraps.com/"
api_version = "v2"
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url(), "https://api.sixwraps.com/api/v2");
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.storage.state_dir, ".six-wraps");
    }

    #[test]
    fn test_env_var_substitution() {
        assert_eq!(
            substitute_env_vars("path = \"${SIX_WRAPS_SURELY_UNSET_VAR}\""),
            "path = \"${SIX_WRAPS_SURELY_UNSET_VAR}\""
        );
        let home = std::env::var("PATH").unwrap_or_default();
        assert_eq!(substitute_env_vars("x = \"${PATH}\""), format!("x = \"{}\"", home));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.api.api_path = "ftp://example.com".to_string();
        assert_err!(config.validate());

        let mut config = AppConfig::default();
        config.import.csv_path = "users.xlsx".to_string();
        assert_err!(config.validate());

        let mut config = AppConfig::default();
        config.import.database_url = "mysql://localhost/legacy".to_string();
        assert_err!(config.validate());

        let mut config = AppConfig::default();
        config.list.limit = 0;
        assert_err!(config.validate());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let policy = ApiConfig::default().retry_policy();
        assert_eq!(policy, RetryPolicy::default());
    }
}
