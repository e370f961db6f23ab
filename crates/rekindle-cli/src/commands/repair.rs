//! Repair commands for slipped pledges.

use clap::Subcommand;
use rekindle_core::Database;

use super::{open_tracker, save_tracker};

#[derive(Subcommand)]
pub enum RepairAction {
    /// Submit a repair for a slipped pledge
    Submit {
        /// Pledge ID
        pledge_id: String,
        /// Comma-separated cause tags (at least one required)
        #[arg(long)]
        causes: String,
        /// What was going on when the slip happened
        #[arg(long)]
        situation: Option<String>,
        /// Adjusted rules going forward
        #[arg(long)]
        rules: Option<String>,
        /// Why this pledge still matters
        #[arg(long)]
        mission: Option<String>,
    },
}

pub fn run(action: RepairAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tracker = open_tracker(&db)?;

    match action {
        RepairAction::Submit {
            pledge_id,
            causes,
            situation,
            rules,
            mission,
        } => {
            let cause_tags: Vec<String> = causes
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            let repair =
                tracker.submit_repair(&pledge_id, cause_tags, situation, rules, mission)?;
            save_tracker(&db, &tracker)?;
            println!("Repair submitted: {}", repair.id);
            println!("{}", serde_json::to_string_pretty(&repair)?);
        }
    }
    Ok(())
}
