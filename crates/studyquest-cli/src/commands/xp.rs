use clap::Subcommand;

use super::{print_outcome, CliResult, Context};

#[derive(Subcommand)]
pub enum XpAction {
    /// Credit experience points
    Add {
        /// Non-negative number of points
        amount: String,
    },
    /// Print XP, level and badges as JSON
    Show,
}

pub fn run(ctx: &Context, action: XpAction) -> CliResult {
    let mut progress = ctx.open_progress()?;

    match action {
        XpAction::Add { amount } => {
            let update = progress.ledger_mut().add_xp(amount.as_str())?;
            print_outcome(&mut progress, &update)?;
        }
        XpAction::Show => {
            let ledger = progress.ledger();
            let json = serde_json::json!({
                "xp": ledger.xp(),
                "level": ledger.level(),
                "xpToNextLevel": ledger.xp_to_next_level(),
                "badges": ledger.badges(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
