use clap::Subcommand;
use studyquest_core::Clock;

use super::{print_outcome, CliResult, Context};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Record a completion for today
    Complete,
    /// Print the streak record as JSON
    Show,
}

pub fn run(ctx: &Context, action: StreakAction) -> CliResult {
    let mut progress = ctx.open_progress()?;

    match action {
        StreakAction::Complete => {
            let update = progress.streak_mut().mark_completed();
            print_outcome(&mut progress, &update.summary())?;
        }
        StreakAction::Show => {
            let today = ctx.clock().today();
            let state = progress.streak().state();
            let json = serde_json::json!({
                "record": state,
                "completedToday": progress.streak().completed_on(today),
                "graceAvailable": state.grace_available(today),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
