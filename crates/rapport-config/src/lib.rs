use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rapport_core::rules::score::DEFAULT_ENGAGEMENT_WEIGHT;
use rapport_core::rules::status::validate_near_due_days;
use rapport_core::rules::{DEFAULT_CUTOFF_HOUR, DEFAULT_NEAR_DUE_DAYS, MAX_CADENCE_DAYS};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "rapport";
const CONFIG_FILENAME: &str = "config.toml";

pub const SECRET_ENV_VAR: &str = "RAPPORT_TRIGGER_SECRET";

pub const DEFAULT_STALE_DAYS: i64 = 21;
pub const DEFAULT_USER_ACTIVITY_DAYS: i64 = 7;
pub const DEFAULT_DAILY_NURTURE_CAP: i64 = 3;
pub const DEFAULT_BATCH_BUDGET_SECS: u64 = 60;
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub near_due_days: i64,
    pub stale_days: i64,
    pub user_activity_days: i64,
    pub daily_nurture_cap: i64,
    pub engagement_weight: i32,
    pub post_call_window_min_hours: i64,
    pub post_call_window_max_hours: i64,
    pub post_call_cutoff_hour: u32,
    pub batch_budget_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub trigger_secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            near_due_days: DEFAULT_NEAR_DUE_DAYS,
            stale_days: DEFAULT_STALE_DAYS,
            user_activity_days: DEFAULT_USER_ACTIVITY_DAYS,
            daily_nurture_cap: DEFAULT_DAILY_NURTURE_CAP,
            engagement_weight: DEFAULT_ENGAGEMENT_WEIGHT,
            post_call_window_min_hours: 1,
            post_call_window_max_hours: 2,
            post_call_cutoff_hour: DEFAULT_CUTOFF_HOUR,
            batch_budget_secs: DEFAULT_BATCH_BUDGET_SECS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            trigger_secret: None,
        }
    }
}

impl AppConfig {
    /// The shared trigger secret, with the environment taking precedence
    /// over the config file.
    pub fn trigger_secret(&self) -> Option<String> {
        if let Ok(secret) = env::var(SECRET_ENV_VAR) {
            if !secret.is_empty() {
                return Some(secret);
            }
        }
        self.server.trigger_secret.clone()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid near_due_days value: {0}")]
    InvalidNearDueDays(i64),
    #[error("invalid stale_days value: {0}")]
    InvalidStaleDays(i64),
    #[error("invalid user_activity_days value: {0}")]
    InvalidUserActivityDays(i64),
    #[error("invalid daily_nurture_cap value: {0}")]
    InvalidDailyNurtureCap(i64),
    #[error("invalid engagement_weight value: {0}")]
    InvalidEngagementWeight(i32),
    #[error("invalid post-call window: min {min} must be below max {max}")]
    InvalidPostCallWindow { min: i64, max: i64 },
    #[error("invalid post_call_cutoff_hour value: {0}")]
    InvalidCutoffHour(u32),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    engine: Option<EngineFile>,
    server: Option<ServerFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineFile {
    near_due_days: Option<i64>,
    stale_days: Option<i64>,
    user_activity_days: Option<i64>,
    daily_nurture_cap: Option<i64>,
    engagement_weight: Option<i32>,
    post_call_window_min_hours: Option<i64>,
    post_call_window_max_hours: Option<i64>,
    post_call_cutoff_hour: Option<u32>,
    batch_budget_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
    trigger_secret: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(engine) = parsed.engine {
        if let Some(days) = engine.near_due_days {
            config.engine.near_due_days =
                validate_near_due_days(days).map_err(|_| ConfigError::InvalidNearDueDays(days))?;
        }
        if let Some(days) = engine.stale_days {
            if days <= 0 || days > i64::from(MAX_CADENCE_DAYS) {
                return Err(ConfigError::InvalidStaleDays(days));
            }
            config.engine.stale_days = days;
        }
        if let Some(days) = engine.user_activity_days {
            if days <= 0 {
                return Err(ConfigError::InvalidUserActivityDays(days));
            }
            config.engine.user_activity_days = days;
        }
        if let Some(cap) = engine.daily_nurture_cap {
            if cap <= 0 {
                return Err(ConfigError::InvalidDailyNurtureCap(cap));
            }
            config.engine.daily_nurture_cap = cap;
        }
        if let Some(weight) = engine.engagement_weight {
            if !(0..=100).contains(&weight) {
                return Err(ConfigError::InvalidEngagementWeight(weight));
            }
            config.engine.engagement_weight = weight;
        }
        if let Some(min) = engine.post_call_window_min_hours {
            config.engine.post_call_window_min_hours = min;
        }
        if let Some(max) = engine.post_call_window_max_hours {
            config.engine.post_call_window_max_hours = max;
        }
        if config.engine.post_call_window_min_hours < 0
            || config.engine.post_call_window_min_hours >= config.engine.post_call_window_max_hours
        {
            return Err(ConfigError::InvalidPostCallWindow {
                min: config.engine.post_call_window_min_hours,
                max: config.engine.post_call_window_max_hours,
            });
        }
        if let Some(hour) = engine.post_call_cutoff_hour {
            if hour >= 24 {
                return Err(ConfigError::InvalidCutoffHour(hour));
            }
            config.engine.post_call_cutoff_hour = hour;
        }
        if let Some(secs) = engine.batch_budget_secs {
            config.engine.batch_budget_secs = secs;
        }
    }

    if let Some(server) = parsed.server {
        if let Some(bind) = server.bind {
            config.server.bind = bind;
        }
        config.server.trigger_secret = server.trigger_secret;
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, merge_config, ConfigFile, EngineFile, ServerFile};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            engine: Some(EngineFile {
                near_due_days: Some(3),
                stale_days: Some(30),
                user_activity_days: Some(14),
                daily_nurture_cap: Some(5),
                engagement_weight: Some(8),
                post_call_window_min_hours: None,
                post_call_window_max_hours: None,
                post_call_cutoff_hour: Some(16),
                batch_budget_secs: Some(30),
            }),
            server: Some(ServerFile {
                bind: Some("0.0.0.0:9000".to_string()),
                trigger_secret: Some("hunter2".to_string()),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.engine.near_due_days, 3);
        assert_eq!(merged.engine.stale_days, 30);
        assert_eq!(merged.engine.daily_nurture_cap, 5);
        assert_eq!(merged.engine.post_call_cutoff_hour, 16);
        assert_eq!(merged.server.bind, "0.0.0.0:9000");
        assert_eq!(merged.server.trigger_secret.as_deref(), Some("hunter2"));
    }

    #[test]
    fn merge_config_rejects_bad_window() {
        let parsed = ConfigFile {
            engine: Some(EngineFile {
                near_due_days: None,
                stale_days: None,
                user_activity_days: None,
                daily_nurture_cap: None,
                engagement_weight: None,
                post_call_window_min_hours: Some(3),
                post_call_window_max_hours: Some(2),
                post_call_cutoff_hour: None,
                batch_budget_secs: None,
            }),
            server: None,
        };
        assert!(merge_config(parsed).is_err());
    }

    #[test]
    fn merge_config_rejects_nonpositive_cap() {
        let parsed = ConfigFile {
            engine: Some(EngineFile {
                near_due_days: None,
                stale_days: None,
                user_activity_days: None,
                daily_nurture_cap: Some(0),
                engagement_weight: None,
                post_call_window_min_hours: None,
                post_call_window_max_hours: None,
                post_call_cutoff_hour: None,
                batch_budget_secs: None,
            }),
            server: None,
        };
        assert!(merge_config(parsed).is_err());
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[engine]\nstale_days = 28\ndaily_nurture_cap = 2\n[server]\ntrigger_secret = \"s3cret\"\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.engine.stale_days, 28);
        assert_eq!(config.engine.daily_nurture_cap, 2);
        assert_eq!(config.server.trigger_secret.as_deref(), Some("s3cret"));
    }
}
