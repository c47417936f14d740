use rapport_config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state passed to all route handlers. The store is
/// opened per request inside `spawn_blocking`, so only the path travels
/// here; SQLite connections never cross the async boundary.
#[derive(Clone)]
pub struct AppState {
    pub db_path: PathBuf,
    pub config: Arc<AppConfig>,
    pub trigger_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(db_path: PathBuf, config: AppConfig) -> Self {
        let trigger_secret = config.trigger_secret().map(Arc::from);
        Self {
            db_path,
            config: Arc::new(config),
            trigger_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_db_path() {
        let state = AppState::new(PathBuf::from("/tmp/rapport.sqlite3"), AppConfig::default());
        assert_eq!(state.db_path, PathBuf::from("/tmp/rapport.sqlite3"));
    }
}
