use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{
    format_timestamp_date, now_utc, parse_local_timestamp, parse_relationship_id, parse_user_id,
    status_label,
};
use anyhow::Result;
use clap::Args;
use rapport_core::domain::{Cadence, Tier};
use rapport_core::dto::RelationshipListItemDto;
use rapport_core::rules::compute_status;
use rapport_store::repo::RelationshipNew;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub user: String,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, default_value = "monthly")]
    pub cadence: String,
    #[arg(long, default_value = "b")]
    pub tier: String,
    #[arg(long)]
    pub last_interaction_at: Option<String>,
}

#[derive(Debug, Args)]
pub struct TouchArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct RateArgs {
    pub id: String,
    /// Observed reply rate, 0.0 to 1.0.
    #[arg(long, conflicts_with = "clear")]
    pub rate: Option<f64>,
    /// Forget the reply rate instead of setting one.
    #[arg(long)]
    pub clear: bool,
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let now = now_utc();
    let user_id = parse_user_id(&args.user)?;
    let relationships = ctx.store.relationships().list_for_user(now, user_id)?;

    let items: Vec<RelationshipListItemDto> = relationships
        .iter()
        .map(|r| RelationshipListItemDto {
            id: r.id,
            user_id: r.user_id,
            display_name: r.display_name.clone(),
            status: compute_status(r, now, ctx.config.engine.near_due_days),
            tier: r.tier,
            next_touch_due_at: rapport_core::rules::touch_due_at(r),
            overdue_actions_count: r.overdue_actions_count,
            reply_rate: r.reply_rate,
        })
        .collect();

    if ctx.json {
        print_json(&items)?;
    } else if items.is_empty() {
        println!("no relationships");
    } else {
        for item in items {
            let due = item
                .next_touch_due_at
                .map(format_timestamp_date)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}  {:13} tier {}  due {}  {}",
                item.id,
                status_label(item.status),
                item.tier.as_str(),
                due,
                item.display_name
            );
        }
    }
    Ok(())
}

pub fn add(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let now = now_utc();
    let last_interaction_at = match args.last_interaction_at {
        Some(value) => Some(parse_local_timestamp(&value)?),
        None => None,
    };

    let relationship = ctx.store.relationships().create(
        now,
        RelationshipNew {
            user_id: parse_user_id(&args.user)?,
            display_name: args.name,
            email: args.email,
            cadence: Cadence::parse(&args.cadence)?,
            tier: Tier::parse(&args.tier)?,
            last_interaction_at,
            next_touch_due_at: None,
            reply_rate: None,
        },
    )?;

    if ctx.json {
        print_json(&relationship)?;
    } else {
        println!("added relationship {}", relationship.id);
    }
    Ok(())
}

pub fn rate(ctx: &Context<'_>, args: RateArgs) -> Result<()> {
    let id = parse_relationship_id(&args.id)?;
    let reply_rate = if args.clear {
        None
    } else {
        match args.rate {
            Some(rate) => Some(rate),
            None => return Err(invalid_input("pass --rate or --clear")),
        }
    };

    ctx.store
        .relationships()
        .update_reply_rate(now_utc(), id, reply_rate)?;

    if !ctx.json {
        match reply_rate {
            Some(rate) => println!("reply rate for {id} set to {rate}"),
            None => println!("reply rate for {id} cleared"),
        }
    }
    Ok(())
}

pub fn touch(ctx: &Context<'_>, args: TouchArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_relationship_id(&args.id)?;
    let relationship = ctx.store.relationships().record_interaction(now, id)?;

    if ctx.json {
        print_json(&relationship)?;
    } else {
        let due = relationship
            .next_touch_due_at
            .map(format_timestamp_date)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "touched {}; next touch due {}",
            relationship.display_name, due
        );
    }
    Ok(())
}
