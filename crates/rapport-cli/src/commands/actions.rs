use crate::commands::{print_json, Context};
use crate::util::{
    format_timestamp_datetime, lane_label, now_utc, parse_action_id, parse_user_id,
};
use anyhow::Result;
use clap::{Args, ValueEnum};
use rapport_core::domain::{Action, ActionState, Tier};
use rapport_core::dto::ActionListItemDto;
use rapport_core::rules::{compute_status, lane_for_score, next_move_score, RelationshipStatus};

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub user: String,
    /// Include actions already in a terminal state.
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub id: String,
    #[arg(value_enum)]
    pub state: StateArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StateArg {
    New,
    Sent,
    Snoozed,
    Done,
    Replied,
    Archived,
}

impl From<StateArg> for ActionState {
    fn from(value: StateArg) -> Self {
        match value {
            StateArg::New => ActionState::New,
            StateArg::Sent => ActionState::Sent,
            StateArg::Snoozed => ActionState::Snoozed,
            StateArg::Done => ActionState::Done,
            StateArg::Replied => ActionState::Replied,
            StateArg::Archived => ActionState::Archived,
        }
    }
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let now = now_utc();
    let user_id = parse_user_id(&args.user)?;
    let actions = ctx.store.actions().list_for_user(user_id)?;

    let mut items: Vec<ActionListItemDto> = Vec::new();
    for action in &actions {
        if !args.all && action.state.is_terminal() {
            continue;
        }
        items.push(score_item(ctx, action, now)?);
    }
    // Freshly scored on every read, so sorting here is the lane view.
    items.sort_by(|a, b| b.next_move_score.cmp(&a.next_move_score));

    if ctx.json {
        print_json(&items)?;
    } else if items.is_empty() {
        println!("no actions");
    } else {
        for item in items {
            let due = item
                .promised_due_at
                .map(format_timestamp_datetime)
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}  {:3}  {:9}  {:8}  due {}  {}",
                item.id,
                item.next_move_score,
                lane_label(item.lane),
                item.state.as_str(),
                due,
                item.title
            );
        }
    }
    Ok(())
}

pub fn move_action(ctx: &Context<'_>, args: MoveArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_action_id(&args.id)?;
    let action = ctx.store.actions().transition(now, id, args.state.into())?;

    if ctx.json {
        print_json(&action)?;
    } else {
        println!("action {} is now {}", action.id, action.state.as_str());
    }
    Ok(())
}

fn score_item(ctx: &Context<'_>, action: &Action, now: i64) -> Result<ActionListItemDto> {
    // Actions without a relationship score from a neutral baseline.
    let (status, tier, reply_rate) = match action.lead_id {
        Some(lead_id) => match ctx.store.relationships().get(now, lead_id)? {
            Some(relationship) => (
                compute_status(&relationship, now, ctx.config.engine.near_due_days),
                relationship.tier,
                relationship.reply_rate,
            ),
            None => (RelationshipStatus::Unestablished, Tier::C, None),
        },
        None => (RelationshipStatus::Unestablished, Tier::C, None),
    };

    let score = next_move_score(
        status,
        tier,
        action.promised_due_at,
        reply_rate,
        now,
        ctx.config.engine.engagement_weight,
    );

    Ok(ActionListItemDto {
        id: action.id,
        lead_id: action.lead_id,
        title: action.title.clone(),
        action_type: action.action_type,
        state: action.state,
        lane: lane_for_score(score),
        next_move_score: score,
        promised_due_at: action.promised_due_at,
        estimated_minutes: action.estimated_minutes,
    })
}
