pub mod badge;
pub mod config;
pub mod data;
pub mod focus;
pub mod streak;
pub mod task;
pub mod xp;

use chrono::NaiveDate;
use serde::Serialize;
use studyquest_core::clock::parse_iso_date;
use studyquest_core::{Clock, Config, FixedClock, JsonFileStore, StudyProgress, SystemClock};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Either the wall clock or the `--date` override.
pub enum AppClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for AppClock {
    fn today(&self) -> NaiveDate {
        match self {
            AppClock::System(clock) => clock.today(),
            AppClock::Fixed(clock) => clock.today(),
        }
    }
}

/// Shared state for one CLI invocation.
pub struct Context {
    config: Config,
    date: Option<NaiveDate>,
}

impl Context {
    pub fn new(config: Config, date: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let date = date
            .map(|raw| parse_iso_date(raw).map_err(|e| format!("invalid --date '{raw}': {e}")))
            .transpose()?;
        Ok(Self { config, date })
    }

    pub fn clock(&self) -> AppClock {
        match self.date {
            Some(date) => AppClock::Fixed(FixedClock::new(date)),
            None => AppClock::System(SystemClock),
        }
    }

    pub fn open_progress(
        &self,
    ) -> Result<StudyProgress<AppClock, JsonFileStore>, Box<dyn std::error::Error>> {
        let dir = self.config.records_dir()?;
        tracing::debug!(dir = %dir.display(), "opening progress records");
        let store = JsonFileStore::open(dir)?;
        Ok(StudyProgress::open(
            self.clock(),
            store,
            self.config.rewards.clone(),
        ))
    }
}

/// Print an operation outcome together with the events it produced.
pub fn print_outcome<T: Serialize>(
    progress: &mut StudyProgress<AppClock, JsonFileStore>,
    outcome: &T,
) -> CliResult {
    let events = progress.drain_events();
    let json = serde_json::json!({
        "outcome": outcome,
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
