use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six fields collected by the submission dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftField {
    JobTitle,
    Company,
    Location,
    Salary,
    Description,
    ApplyLink,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftField::JobTitle => write!(f, "job_title"),
            DraftField::Company => write!(f, "company"),
            DraftField::Location => write!(f, "location"),
            DraftField::Salary => write!(f, "salary"),
            DraftField::Description => write!(f, "description"),
            DraftField::ApplyLink => write!(f, "apply_link"),
        }
    }
}

/// A vacancy submission in progress, filled one field per dialogue step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftVacancy {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub apply_link: Option<String>,
}

impl DraftVacancy {
    /// Stores `value` verbatim, replacing whatever the field held.
    pub fn set(&mut self, field: DraftField, value: String) {
        let slot = match field {
            DraftField::JobTitle => &mut self.job_title,
            DraftField::Company => &mut self.company,
            DraftField::Location => &mut self.location,
            DraftField::Salary => &mut self.salary,
            DraftField::Description => &mut self.description,
            DraftField::ApplyLink => &mut self.apply_link,
        };
        *slot = Some(value);
    }

    /// Promotes the draft to an immutable record.
    ///
    /// Fields that were never entered become empty strings, except salary
    /// which stays optional.
    pub fn to_record(&self) -> VacancyRecord {
        VacancyRecord {
            job_title: self.job_title.clone().unwrap_or_default(),
            company: self.company.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            salary: self.salary.clone(),
            description: self.description.clone().unwrap_or_default(),
            apply_link: self.apply_link.clone().unwrap_or_default(),
        }
    }
}

/// A confirmed job posting. Never changed after it enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
    pub apply_link: String,
}
