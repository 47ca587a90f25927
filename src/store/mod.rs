mod drafts;
mod sessions;
mod vacancies;

pub use drafts::DraftRegistry;
pub use sessions::SessionTable;
pub use vacancies::VacancyStore;
