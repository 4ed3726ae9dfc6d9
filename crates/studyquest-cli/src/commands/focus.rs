use clap::Subcommand;

use super::{print_outcome, CliResult, Context};

#[derive(Subcommand)]
pub enum FocusAction {
    /// A timed work session finished; credit the configured reward
    Finish,
}

pub fn run(ctx: &Context, action: FocusAction) -> CliResult {
    let mut progress = ctx.open_progress()?;

    match action {
        FocusAction::Finish => {
            let update = progress.finish_focus_session()?;
            print_outcome(&mut progress, &update)?;
        }
    }
    Ok(())
}
