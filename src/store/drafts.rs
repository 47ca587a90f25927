//! Per-user scratch space for submissions in progress.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::VacancyError;
use crate::gateway::UserId;
use crate::state_machine::{DraftField, DraftVacancy};

/// At most one [`DraftVacancy`] per user.
///
/// Drafts are never expired; an abandoned one stays until the same user
/// starts over, cancels or finishes.
#[derive(Debug, Default)]
pub struct DraftRegistry {
    drafts: Mutex<HashMap<UserId, DraftVacancy>>,
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty draft for `user`, silently replacing any previous one.
    pub fn start_draft(&self, user: UserId) {
        self.lock().insert(user, DraftVacancy::default());
    }

    pub fn set_field(
        &self,
        user: UserId,
        field: DraftField,
        value: String,
    ) -> Result<(), VacancyError> {
        let mut drafts = self.lock();
        let draft = drafts.get_mut(&user).ok_or(VacancyError::NoActiveDraft(user))?;
        draft.set(field, value);
        Ok(())
    }

    pub fn get_draft(&self, user: UserId) -> Result<DraftVacancy, VacancyError> {
        self.lock()
            .get(&user)
            .cloned()
            .ok_or(VacancyError::NoActiveDraft(user))
    }

    /// Removes the user's draft. No-op when there is none.
    pub fn clear_draft(&self, user: UserId) {
        self.lock().remove(&user);
    }

    pub fn has_draft(&self, user: UserId) -> bool {
        self.lock().contains_key(&user)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, DraftVacancy>> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
