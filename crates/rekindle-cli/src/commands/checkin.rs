//! Daily check-in commands for CLI.

use clap::Subcommand;
use rekindle_core::{Database, EventKind};

use super::{open_tracker, save_tracker};

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Record today's check-in for a pledge
    Record {
        /// Pledge ID
        pledge_id: String,
        /// Outcome: success, skip, grace or unknown (default: success)
        #[arg(long, default_value = "success")]
        kind: String,
        /// Why the day went the way it did
        #[arg(long)]
        reason: Option<String>,
        /// Free-form note for the day
        #[arg(long)]
        note: Option<String>,
    },
}

pub fn run(action: CheckinAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = open_tracker(&db)?;

    match action {
        CheckinAction::Record {
            pledge_id,
            kind,
            reason,
            note,
        } => {
            let kind: EventKind = kind.parse()?;
            let event = tracker.record_checkin(&pledge_id, kind, reason, note)?;
            save_tracker(&db, &tracker)?;
            println!("Check-in recorded: {} ({})", event.id, event.kind);

            let pledge = tracker
                .get_pledge_by_id(&pledge_id)
                .ok_or("pledge vanished after check-in")?;
            let run = &pledge.current_run;
            println!(
                "Run {}: {}/{} success days",
                run.number, run.completed_days, run.target_days
            );
            let advisory = tracker.advisory_state_of(&pledge_id)?;
            println!("Advisory: {advisory}");
        }
    }
    Ok(())
}
