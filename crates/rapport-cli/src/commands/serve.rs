use anyhow::{Context as _, Result};
use clap::Args;
use rapport_server::AppState;
use rapport_store::paths;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the configured bind address.
    #[arg(long)]
    pub bind: Option<String>,
}

pub fn launch(db_path: Option<PathBuf>, config_path: Option<PathBuf>, args: ServeArgs) -> Result<()> {
    let mut config = rapport_config::load(config_path).with_context(|| "load config")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(rapport_server::serve(AppState::new(db_path, config)))
}
