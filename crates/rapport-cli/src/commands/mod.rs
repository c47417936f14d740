use anyhow::Result;
use rapport_config::AppConfig;
use rapport_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod actions;
pub mod completions;
pub mod relationships;
pub mod run;
pub mod serve;
pub mod users;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
