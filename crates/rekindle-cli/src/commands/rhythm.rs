//! Rhythm status command.

use clap::Subcommand;
use rekindle_core::Database;

use super::open_tracker;

#[derive(Subcommand)]
pub enum RhythmAction {
    /// Show the derived rhythm status
    Status {
        /// Emit JSON instead of the summary line
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: RhythmAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let tracker = open_tracker(&db)?;

    match action {
        RhythmAction::Status { json } => {
            let status = tracker.fetch_rhythm_status();
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Rhythm: {}", status.state);
                println!("{}", status.message);
                println!(
                    "Success days this week: {}",
                    status.weekly_completed_count
                );
                match status.last_check_in {
                    Some(date) => println!("Last check-in: {date}"),
                    None => println!("No check-ins yet"),
                }
            }
        }
    }
    Ok(())
}
