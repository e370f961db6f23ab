//! Free-form journal notes ("memories") attached to a pledge and day.
//!
//! No derived logic applies to memories; the core only stores and
//! retrieves them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A journal note attached to a pledge and date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// Unique identifier
    pub id: String,
    /// Pledge this note belongs to
    pub pledge_id: String,
    /// Day the note is about
    pub date: NaiveDate,
    /// The note itself
    pub text: String,
    /// When the note was written
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// Create a memory for `pledge_id` about `date`.
    pub fn new(pledge_id: impl Into<String>, date: NaiveDate, text: impl Into<String>) -> Self {
        Memory {
            id: Uuid::new_v4().to_string(),
            pledge_id: pledge_id.into(),
            date,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
