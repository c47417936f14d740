use crate::commands::{print_json, Context};
use crate::util::{now_utc, parse_user_id};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct SeenArgs {
    pub id: String,
}

pub fn add(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let user = ctx.store.users().create(now_utc(), &args.name)?;
    if ctx.json {
        print_json(&user)?;
    } else {
        println!("added user {}", user.id);
    }
    Ok(())
}

pub fn seen(ctx: &Context<'_>, args: SeenArgs) -> Result<()> {
    let id = parse_user_id(&args.id)?;
    ctx.store.users().record_activity(now_utc(), id)?;
    if !ctx.json {
        println!("recorded activity for {id}");
    }
    Ok(())
}
