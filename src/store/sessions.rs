//! Which users are mid-dialogue, and at which step.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::gateway::UserId;
use crate::state_machine::Step;

/// Per-user dialogue cursor. A user absent from the table is idle.
#[derive(Debug, Default)]
pub struct SessionTable {
    steps: Mutex<HashMap<UserId, Step>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self, user: UserId) -> Option<Step> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user)
            .copied()
    }

    pub fn set(&self, user: UserId, step: Step) {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user, step);
    }

    /// Returns the user to idle.
    pub fn end(&self, user: UserId) {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user);
    }
}
