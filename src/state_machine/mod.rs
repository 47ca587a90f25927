mod draft;
mod state;

pub use draft::{DraftField, DraftVacancy, VacancyRecord};
pub use state::{StateMachine, Step, Transition};
