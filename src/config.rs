//! Service configuration loaded from `recruitd.toml`.
//!
//! [`RecruitConfig`] holds every tunable. Keys missing from the file fall
//! back to defaults. `RECRUITD_BIND_ADDR` takes precedence over the file for
//! the listen address.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::batch::DEFAULT_MAX_BATCH_SIZE;
use crate::error::RecruitError;
use crate::model::{Entity, Role};

pub const DEFAULT_CONFIG_FILE: &str = "recruitd.toml";
pub const BIND_ADDR_ENV: &str = "RECRUITD_BIND_ADDR";

#[derive(Debug, Clone, Deserialize)]
pub struct RecruitConfig {
    /// Socket address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum number of ids accepted in one bulk request.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Page size of the operation listing when `limit` is absent.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Hard cap on `limit` for the operation listing.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Roles allowed to roll back operations started by someone else.
    #[serde(default = "default_elevated_roles")]
    pub elevated_roles: Vec<Role>,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// JSON array of entities loaded into the in-memory store at startup.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

fn default_elevated_roles() -> Vec<Role> {
    vec![Role::Admin, Role::Owner]
}

fn default_log_filter() -> String {
    "info,recruitd=debug".to_string()
}

impl Default for RecruitConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_batch_size: default_max_batch_size(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            elevated_roles: default_elevated_roles(),
            log_filter: default_log_filter(),
            seed_path: None,
        }
    }
}

impl RecruitConfig {
    /// Loads `path`, or `recruitd.toml` in the working directory when no path
    /// is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, RecruitError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(addr) = std::env::var(BIND_ADDR_ENV)
            && !addr.is_empty()
        {
            config.bind_addr = addr;
        }

        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, RecruitError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<RecruitConfig>(&contents)?)
    }

    fn check(&self) -> Result<(), RecruitError> {
        if self.max_batch_size == 0 {
            return Err(RecruitError::Config("max_batch_size must be positive".into()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(RecruitError::Config(format!(
                "default_page_size must be between 1 and max_page_size ({})",
                self.max_page_size
            )));
        }
        Ok(())
    }

    /// Reads the seed fixture, if one is configured.
    pub fn load_seed(&self) -> Result<Vec<Entity>, RecruitError> {
        match &self.seed_path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&contents)?)
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_values() {
        let config = RecruitConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.max_batch_size, 100);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.elevated_roles, vec![Role::Admin, Role::Owner]);
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            max_batch_size = 25
            elevated_roles = ["owner"]
        "#;
        let config: RecruitConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_batch_size, 25);
        assert_eq!(config.elevated_roles, vec![Role::Owner]);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.log_filter, "info,recruitd=debug");
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_page_size = 5\nmax_page_size = 10").unwrap();

        let config = RecruitConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_page_size, 5);
        assert!(config.check().is_ok());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecruitConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, RecruitError::Io(_)));
    }

    #[test]
    fn inconsistent_page_sizes_are_rejected() {
        let config = RecruitConfig {
            default_page_size: 50,
            max_page_size: 10,
            ..RecruitConfig::default()
        };
        assert!(matches!(config.check(), Err(RecruitError::Config(_))));
    }

    #[test]
    fn seed_fixture_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"[{"entityType":"job","id":1,"tenantId":"acme","title":"SRE","status":"draft",
                 "createdAt":"2026-01-01T00:00:00Z","updatedAt":"2026-01-01T00:00:00Z"}]"#,
        )
        .unwrap();

        let config = RecruitConfig {
            seed_path: Some(path),
            ..RecruitConfig::default()
        };
        let seed = config.load_seed().unwrap();
        assert_eq!(seed.len(), 1);
        assert_eq!(seed[0].status_label(), "draft");
    }
}
