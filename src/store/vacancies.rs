//! Append-only list of confirmed vacancies.

use std::sync::{PoisonError, RwLock};

use crate::error::VacancyError;
use crate::state_machine::VacancyRecord;

/// Ordered collection of published vacancies.
///
/// Records are addressed by their 1-based position. There is no update or
/// delete; identical records may be appended any number of times.
#[derive(Debug, Default)]
pub struct VacancyStore {
    records: RwLock<Vec<VacancyRecord>>,
}

impl VacancyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` and returns its 1-based display index.
    pub fn append(&self, record: VacancyRecord) -> usize {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.push(record);
        records.len()
    }

    /// All records paired with their 1-based index, in insertion order.
    pub fn list(&self) -> Vec<(usize, VacancyRecord)> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .iter()
            .enumerate()
            .map(|(i, record)| (i + 1, record.clone()))
            .collect()
    }

    pub fn get_by_index(&self, index: usize) -> Result<VacancyRecord, VacancyError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        index
            .checked_sub(1)
            .and_then(|i| records.get(i))
            .cloned()
            .ok_or(VacancyError::NotFound(index))
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
