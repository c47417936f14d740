use crate::commands::{print_json, Context};
use crate::util::{local_offset, now_utc};
use anyhow::Result;
use clap::{Args, ValueEnum};
use rapport_engine::{BatchBudget, NurtureGenerator, PostCallGenerator};

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(value_enum)]
    pub job: Job,
    /// Override the configured batch budget, in seconds. 0 disables it.
    #[arg(long)]
    pub budget_secs: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Job {
    Nurture,
    #[value(name = "post-call")]
    PostCall,
}

impl Job {
    fn name(self) -> &'static str {
        match self {
            Job::Nurture => "nurture",
            Job::PostCall => "post-call",
        }
    }
}

pub fn run_job(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    let budget = match args.budget_secs {
        Some(0) => BatchBudget::unlimited(),
        Some(secs) => BatchBudget::from_secs(secs),
        None => BatchBudget::from_secs(ctx.config.engine.batch_budget_secs),
    };
    let now = now_utc();
    let offset = local_offset();

    let report = match args.job {
        Job::Nurture => NurtureGenerator::run(ctx.store, &ctx.config.engine, now, offset, budget)?,
        Job::PostCall => {
            PostCallGenerator::run(ctx.store, &ctx.config.engine, now, offset, budget)?
        }
    };

    if ctx.json {
        print_json(&report.to_dto(args.job.name()))?;
    } else {
        println!("{}", report.summary(args.job.name()));
    }
    Ok(())
}
