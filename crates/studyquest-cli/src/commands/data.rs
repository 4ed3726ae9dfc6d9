use clap::Subcommand;

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete the streak and gamification records
    Wipe {
        /// Confirm the deletion; it cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(ctx: &Context, action: DataAction) -> CliResult {
    match action {
        DataAction::Wipe { yes } => {
            if !yes {
                return Err("refusing to wipe progress without --yes".into());
            }
            let mut progress = ctx.open_progress()?;
            progress.wipe()?;
            println!("progress wiped");
        }
    }
    Ok(())
}
