mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{actions, completions, relationships, run, serve, users, Context};
use crate::error::{exit_code_for, report_error};
use rapport_config as config;
use rapport_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "rapport", version, about = "rapport CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a generator batch once
    Run(run::RunArgs),
    /// Start the HTTP trigger server
    Serve(serve::ServeArgs),
    #[command(subcommand)]
    Relationships(RelationshipsCommand),
    /// Log an interaction and reschedule the next touch
    Touch(relationships::TouchArgs),
    #[command(subcommand)]
    Actions(ActionsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[derive(Debug, Subcommand)]
enum RelationshipsCommand {
    List(relationships::ListArgs),
    Add(relationships::AddArgs),
    Rate(relationships::RateArgs),
}

#[derive(Debug, Subcommand)]
enum ActionsCommand {
    List(actions::ListArgs),
    Move(actions::MoveArgs),
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    Add(users::AddArgs),
    Seen(users::SeenArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Serve(args) => serve::launch(db_path, config_path, args),
        Command::Completions(args) => completions::emit(args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path.clone()) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }
            let db_path =
                paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;

            if verbose {
                debug!(path = %db_path.display(), "database path resolved");
            }

            let store = Store::open(&db_path)
                .with_context(|| format!("open database {}", db_path.display()))?;
            store.migrate().with_context(|| "run migrations")?;

            let ctx = Context {
                store: &store,
                json,
                config: &app_config,
            };

            match command {
                Command::Run(args) => run::run_job(&ctx, args),
                Command::Relationships(cmd) => match cmd {
                    RelationshipsCommand::List(args) => relationships::list(&ctx, args),
                    RelationshipsCommand::Add(args) => relationships::add(&ctx, args),
                    RelationshipsCommand::Rate(args) => relationships::rate(&ctx, args),
                },
                Command::Touch(args) => relationships::touch(&ctx, args),
                Command::Actions(cmd) => match cmd {
                    ActionsCommand::List(args) => actions::list(&ctx, args),
                    ActionsCommand::Move(args) => actions::move_action(&ctx, args),
                },
                Command::Users(cmd) => match cmd {
                    UsersCommand::Add(args) => users::add(&ctx, args),
                    UsersCommand::Seen(args) => users::seen(&ctx, args),
                },
                Command::Serve(_) => unreachable!("serve command handled before store initialization"),
                Command::Completions(_) => {
                    unreachable!("completions command handled before store initialization")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
