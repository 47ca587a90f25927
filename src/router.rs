use std::sync::Arc;

use tracing::{debug, info};

use crate::config::AdminList;
use crate::engine::{ConversationEngine, EngineOutcome};
use crate::error::VacancyError;
use crate::gateway::{InboundMessage, Keyboard, Reply, UserId};
use crate::state_machine::VacancyRecord;
use crate::store::{DraftRegistry, SessionTable, VacancyStore};
use crate::texts;

/// What an inbound message asks for, judged by its text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    Start,
    AddVacancy,
    Cancel,
    Search,
    Back,
    /// Starts with the vacancy marker; may still be malformed.
    VacancyCaption(&'a str),
    /// Any other `/command`.
    UnknownCommand,
    Text(&'a str),
}

impl<'a> Intent<'a> {
    /// Exact, case-sensitive match against captions and commands.
    pub fn classify(text: &'a str) -> Self {
        match text {
            texts::START_COMMAND => Intent::Start,
            texts::ADD_COMMAND | texts::ADD_VACANCY => Intent::AddVacancy,
            texts::CANCEL_COMMAND | texts::CANCEL => Intent::Cancel,
            texts::SEARCH_VACANCIES => Intent::Search,
            texts::BACK => Intent::Back,
            _ if text.starts_with(texts::VACANCY_MARKER) => Intent::VacancyCaption(text),
            _ if text.starts_with('/') => Intent::UnknownCommand,
            _ => Intent::Text(text),
        }
    }

    /// Whether this intent is honored even in the middle of a dialogue.
    fn overrides_dialogue(self) -> bool {
        matches!(self, Intent::Start | Intent::AddVacancy | Intent::Cancel)
    }
}

/// Extracts the ordinal from a caption shaped like `"📋 Вакансия 3: Title"`.
///
/// The caption must contain a colon; the ordinal is the first word after the
/// marker, up to the first colon. Returns `None` for anything else.
pub fn parse_vacancy_caption(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(texts::VACANCY_MARKER)?;
    if !rest.contains(':') {
        return None;
    }
    let word = rest.split(' ').next()?;
    word.split(':').next()?.parse().ok()
}

/// Dispatches every inbound message to the dialogue or a menu handler.
pub struct DialogRouter {
    engine: ConversationEngine,
    vacancies: Arc<VacancyStore>,
    admins: Arc<AdminList>,
}

impl DialogRouter {
    pub fn new(
        engine: ConversationEngine,
        vacancies: Arc<VacancyStore>,
        admins: Arc<AdminList>,
    ) -> Self {
        Self {
            engine,
            vacancies,
            admins,
        }
    }

    /// Builds a router over fresh, empty stores.
    pub fn in_memory(admins: AdminList, affirmative: &str) -> Self {
        let admins = Arc::new(admins);
        let vacancies = Arc::new(VacancyStore::new());
        let engine = ConversationEngine::new(
            Arc::new(DraftRegistry::new()),
            Arc::new(SessionTable::new()),
            vacancies.clone(),
            admins.clone(),
            affirmative,
        );
        Self::new(engine, vacancies, admins)
    }

    /// Handles one message and returns the replies, in sending order.
    pub fn dispatch(&self, message: &InboundMessage) -> Vec<Reply> {
        let user = message.sender;
        let intent = Intent::classify(&message.text);

        if !intent.overrides_dialogue()
            && let Some(step) = self.engine.current_step(user)
        {
            return match intent {
                Intent::UnknownCommand | Intent::Text("") => vec![self.engine.reprompt(user, step)],
                // Menu captions typed mid-dialogue are plain field values.
                _ => match self.engine.handle(user, step, &message.text) {
                    EngineOutcome::Continue(reply) => vec![reply],
                    EngineOutcome::Finished(reply) => vec![reply, self.main_menu(user)],
                },
            };
        }

        match intent {
            Intent::Start => {
                self.engine.cancel(user);
                info!(
                    %user,
                    name = message.sender_name.as_deref().unwrap_or(""),
                    "user started the conversation"
                );
                vec![
                    Reply::text(texts::greeting(message.sender_name.as_deref())),
                    self.main_menu(user),
                ]
            }
            Intent::AddVacancy => match self.engine.add_vacancy(user) {
                Ok(reply) => vec![reply],
                Err(err) => {
                    info!(%user, %err, "submission refused");
                    vec![Reply::text(texts::ADMINS_ONLY), self.main_menu(user)]
                }
            },
            Intent::Cancel => {
                self.engine.cancel(user);
                vec![Reply::text(texts::CANCELLED), self.main_menu(user)]
            }
            Intent::Search => self.browse(user),
            Intent::Back => vec![self.main_menu(user)],
            Intent::VacancyCaption(text) => self.show_vacancy(user, text),
            Intent::UnknownCommand | Intent::Text(_) => {
                vec![Reply::text(texts::USE_BUTTONS), self.main_menu(user)]
            }
        }
    }

    /// Administrators get submit and browse; everyone else only browse.
    pub fn main_menu(&self, user: UserId) -> Reply {
        let row = if self.admins.contains(user) {
            vec![texts::ADD_VACANCY.to_string(), texts::SEARCH_VACANCIES.to_string()]
        } else {
            vec![texts::SEARCH_VACANCIES.to_string()]
        };
        Reply::text(texts::CHOOSE_OPTION).with_keyboard(Keyboard::Rows(vec![row]))
    }

    fn browse(&self, user: UserId) -> Vec<Reply> {
        if self.vacancies.is_empty() {
            return vec![Reply::text(texts::NO_VACANCIES), self.main_menu(user)];
        }
        vec![self.listing()]
    }

    fn listing(&self) -> Reply {
        let mut rows: Vec<Vec<String>> = self
            .vacancies
            .list()
            .into_iter()
            .map(|(ordinal, record)| vec![texts::vacancy_caption(ordinal, &record.job_title)])
            .collect();
        rows.push(vec![texts::BACK.to_string()]);
        Reply::text(texts::PICK_VACANCY).with_keyboard(Keyboard::Rows(rows))
    }

    fn show_vacancy(&self, user: UserId, caption: &str) -> Vec<Reply> {
        match self.lookup(caption) {
            Ok(record) => vec![
                Reply::text(texts::details(&record))
                    .markdown()
                    .with_link(texts::APPLY_BUTTON, record.apply_link.clone()),
                self.listing(),
            ],
            Err(err) => {
                debug!(%user, %err, caption, "vacancy caption did not resolve");
                vec![Reply::text(texts::PICK_FROM_LIST), self.main_menu(user)]
            }
        }
    }

    fn lookup(&self, caption: &str) -> Result<VacancyRecord, VacancyError> {
        let ordinal = parse_vacancy_caption(caption).ok_or(VacancyError::NotFound(0))?;
        self.vacancies.get_by_index(ordinal)
    }
}
