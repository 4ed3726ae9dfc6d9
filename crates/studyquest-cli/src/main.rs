use clap::{Parser, Subcommand};
use studyquest_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyquest-cli", version, about = "StudyQuest CLI")]
struct Cli {
    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily completion streak
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Study task completion (streak plus milestone badges)
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Experience points and level
    Xp {
        #[command(subcommand)]
        action: commands::xp::XpAction,
    },
    /// Focus session rewards
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Achievement badges
    Badge {
        #[command(subcommand)]
        action: commands::badge::BadgeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Stored progress data
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("STUDYQUEST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config);

    if let Some(e) = load_error {
        // `config reset` stays usable so a broken file can be repaired.
        if !matches!(cli.command, Commands::Config { .. }) {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
        tracing::warn!(error = %e, "configuration unreadable; using defaults");
    }

    let ctx = match commands::Context::new(config, cli.date.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Streak { action } => commands::streak::run(&ctx, action),
        Commands::Task { action } => commands::task::run(&ctx, action),
        Commands::Xp { action } => commands::xp::run(&ctx, action),
        Commands::Focus { action } => commands::focus::run(&ctx, action),
        Commands::Badge { action } => commands::badge::run(&ctx, action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
