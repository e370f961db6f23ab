//! Pledge management commands for CLI.

use clap::Subcommand;
use rekindle_core::{Config, Database, PledgeStatus};

use super::{open_tracker, save_tracker};

#[derive(Subcommand)]
pub enum PledgeAction {
    /// Create a new pledge
    Create {
        /// Pledge title
        title: String,
        /// The concrete action pledged
        #[arg(long)]
        action: String,
        /// Frequency: daily, weekdays or N/week (default: daily)
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Success days per run (default: from config)
        #[arg(long)]
        target_days: Option<u32>,
        /// One-shot pledge: complete instead of rolling over
        #[arg(long)]
        once: bool,
        /// Comma-separated names to share with
        #[arg(long)]
        share_with: Option<String>,
    },
    /// List pledges
    List {
        /// Filter by status (active, paused, completed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Get pledge details
    Get {
        /// Pledge ID
        id: String,
    },
    /// List pledges currently slipped
    Slipped,
    /// Pause an active pledge
    Pause {
        /// Pledge ID
        id: String,
    },
    /// Resume a paused or lapsed pledge
    Resume {
        /// Pledge ID
        id: String,
        /// Reason for the gap
        #[arg(long)]
        reason: Option<String>,
    },
}

fn parse_status(s: &str) -> Option<PledgeStatus> {
    match s {
        "active" => Some(PledgeStatus::Active),
        "paused" => Some(PledgeStatus::Paused),
        "completed" => Some(PledgeStatus::Completed),
        _ => None,
    }
}

pub fn run(action: PledgeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = open_tracker(&db)?;

    match action {
        PledgeAction::Create {
            title,
            action,
            frequency,
            target_days,
            once,
            share_with,
        } => {
            let config = Config::load()?;
            let target_days = target_days.unwrap_or(config.default_target_days);
            let share_with = share_with
                .map(|s| s.split(',').map(|n| n.trim().to_string()).collect())
                .unwrap_or_default();
            let pledge =
                tracker.create_pledge(title, action, &frequency, target_days, !once, share_with)?;
            save_tracker(&db, &tracker)?;
            println!("Pledge created: {}", pledge.id);
            println!("{}", serde_json::to_string_pretty(&pledge)?);
        }
        PledgeAction::List { status } => {
            let status = match status.as_deref() {
                Some(s) => match parse_status(s) {
                    Some(status) => Some(status),
                    None => {
                        println!("Unknown status: {s}");
                        return Ok(());
                    }
                },
                None => None,
            };
            let pledges = tracker.fetch_pledges(status);
            println!("{}", serde_json::to_string_pretty(&pledges)?);
        }
        PledgeAction::Get { id } => match tracker.get_pledge_by_id(&id) {
            Some(pledge) => println!("{}", serde_json::to_string_pretty(pledge)?),
            None => println!("Pledge not found: {id}"),
        },
        PledgeAction::Slipped => {
            let pledges = tracker.get_slipped_pledges();
            println!("{}", serde_json::to_string_pretty(&pledges)?);
        }
        PledgeAction::Pause { id } => {
            tracker.pause_pledge(&id)?;
            save_tracker(&db, &tracker)?;
            println!("Pledge paused: {id}");
        }
        PledgeAction::Resume { id, reason } => {
            let record = tracker.resume_pledge(&id, reason)?;
            save_tracker(&db, &tracker)?;
            println!("Pledge resumed: {id}");
            if let Some(record) = record {
                println!(
                    "Welcome back after {} days. Return recorded: {}",
                    record.gap_days, record.id
                );
            }
        }
    }
    Ok(())
}
