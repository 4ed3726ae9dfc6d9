use clap::Subcommand;

use super::{print_outcome, CliResult, Context};

#[derive(Subcommand)]
pub enum BadgeAction {
    /// Award a badge (no-op if already held)
    Award {
        /// Badge identifier, e.g. "first-streak"
        id: String,
    },
    /// List held badges
    List,
}

pub fn run(ctx: &Context, action: BadgeAction) -> CliResult {
    let mut progress = ctx.open_progress()?;

    match action {
        BadgeAction::Award { id } => {
            let award = progress.ledger_mut().award_badge(&id)?;
            print_outcome(&mut progress, &award)?;
        }
        BadgeAction::List => {
            let json = serde_json::to_string_pretty(progress.ledger().badges())?;
            println!("{json}");
        }
    }
    Ok(())
}
