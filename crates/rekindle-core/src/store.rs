//! In-memory entity store: the canonical state container.
//!
//! Holds the user record plus id-keyed maps for pledges (each embedding
//! its current run and return history), repairs, returns and memories.
//! All writes are whole-entity replacements; the store never triggers
//! derived recomputation itself. Derived views (slippage, rhythm status)
//! are computed by their own modules on read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::journal::Memory;
use crate::pledge::{Pledge, Return};
use crate::repair::Repair;
use crate::user::User;

/// Canonical entity state for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    user: User,
    pledges: HashMap<String, Pledge>,
    repairs: HashMap<String, Repair>,
    returns: HashMap<String, Return>,
    memories: HashMap<String, Memory>,
}

impl Store {
    /// Create an empty store owned by `user`.
    pub fn new(user: User) -> Self {
        Store {
            user,
            pledges: HashMap::new(),
            repairs: HashMap::new(),
            returns: HashMap::new(),
            memories: HashMap::new(),
        }
    }

    // === User ===

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    // === Pledges ===

    /// Get a pledge by id.
    pub fn get_pledge(&self, id: &str) -> Result<&Pledge> {
        self.pledges
            .get(id)
            .ok_or_else(|| CoreError::not_found("pledge", id))
    }

    /// Get a mutable pledge by id.
    pub fn get_pledge_mut(&mut self, id: &str) -> Result<&mut Pledge> {
        self.pledges
            .get_mut(id)
            .ok_or_else(|| CoreError::not_found("pledge", id))
    }

    /// Insert or replace a pledge.
    pub fn upsert_pledge(&mut self, pledge: Pledge) {
        self.pledges.insert(pledge.id.clone(), pledge);
    }

    /// Remove a pledge, returning it.
    pub fn remove_pledge(&mut self, id: &str) -> Result<Pledge> {
        self.pledges
            .remove(id)
            .ok_or_else(|| CoreError::not_found("pledge", id))
    }

    /// All pledges, ordered by title for stable output.
    pub fn list_pledges(&self) -> Vec<&Pledge> {
        let mut pledges: Vec<&Pledge> = self.pledges.values().collect();
        pledges.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        pledges
    }

    // === Repairs ===

    /// Get a repair by id.
    pub fn get_repair(&self, id: &str) -> Result<&Repair> {
        self.repairs
            .get(id)
            .ok_or_else(|| CoreError::not_found("repair", id))
    }

    /// Insert or replace a repair record.
    pub fn upsert_repair(&mut self, repair: Repair) {
        self.repairs.insert(repair.id.clone(), repair);
    }

    /// All repair records, newest first.
    pub fn list_repairs(&self) -> Vec<&Repair> {
        let mut repairs: Vec<&Repair> = self.repairs.values().collect();
        repairs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        repairs
    }

    /// Repairs recorded against one pledge, newest first.
    pub fn repairs_for(&self, pledge_id: &str) -> Vec<&Repair> {
        let mut repairs: Vec<&Repair> = self
            .repairs
            .values()
            .filter(|r| r.pledge_id == pledge_id)
            .collect();
        repairs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        repairs
    }

    // === Returns ===

    /// Insert or replace a return record.
    pub fn upsert_return(&mut self, record: Return) {
        self.returns.insert(record.id.clone(), record);
    }

    /// All return records, newest first.
    pub fn list_returns(&self) -> Vec<&Return> {
        let mut returns: Vec<&Return> = self.returns.values().collect();
        returns.sort_by(|a, b| b.date.cmp(&a.date));
        returns
    }

    // === Memories ===

    /// Get a memory by id.
    pub fn get_memory(&self, id: &str) -> Result<&Memory> {
        self.memories
            .get(id)
            .ok_or_else(|| CoreError::not_found("memory", id))
    }

    /// Insert or replace a memory.
    pub fn upsert_memory(&mut self, memory: Memory) {
        self.memories.insert(memory.id.clone(), memory);
    }

    /// Remove a memory, returning it.
    pub fn remove_memory(&mut self, id: &str) -> Result<Memory> {
        self.memories
            .remove(id)
            .ok_or_else(|| CoreError::not_found("memory", id))
    }

    /// Memories, newest first, optionally filtered to one pledge.
    pub fn memories_for(&self, pledge_id: Option<&str>) -> Vec<&Memory> {
        let mut memories: Vec<&Memory> = self
            .memories
            .values()
            .filter(|m| pledge_id.map_or(true, |id| m.pledge_id == id))
            .collect();
        memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        memories
    }
}
