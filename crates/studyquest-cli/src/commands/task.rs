use clap::Subcommand;

use super::{print_outcome, CliResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Tick off a study task: updates the streak and awards milestone badges
    Complete,
}

pub fn run(ctx: &Context, action: TaskAction) -> CliResult {
    let mut progress = ctx.open_progress()?;

    match action {
        TaskAction::Complete => {
            let completion = progress.complete_task();
            print_outcome(&mut progress, &completion)?;
        }
    }
    Ok(())
}
