pub mod checkin;
pub mod config;
pub mod memory;
pub mod pledge;
pub mod repair;
pub mod rhythm;

use rekindle_core::{Config, Database, Tracker};

/// Load the persisted store into a tracker.
pub fn open_tracker(db: &Database) -> Result<Tracker, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Ok(Tracker::from_store(db.load(&config.user_name)?))
}

/// Persist the tracker's store.
pub fn save_tracker(db: &Database, tracker: &Tracker) -> Result<(), Box<dyn std::error::Error>> {
    db.save(tracker.store())?;
    Ok(())
}
