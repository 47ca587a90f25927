//! Applies [`StateMachine`] transitions to the shared stores.
//!
//! The state machine itself is pure; [`ConversationEngine`] loads the
//! sender's draft and step, feeds the message through, writes the result
//! back and decides what to say.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AdminList;
use crate::error::VacancyError;
use crate::gateway::{Keyboard, Reply, UserId};
use crate::state_machine::{StateMachine, Step, Transition};
use crate::store::{DraftRegistry, SessionTable, VacancyStore};
use crate::texts;

/// What the router should do after the engine handled a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// The dialogue goes on; send the reply as is.
    Continue(Reply),
    /// The dialogue ended; send the reply followed by the main menu.
    Finished(Reply),
}

pub struct ConversationEngine {
    drafts: Arc<DraftRegistry>,
    sessions: Arc<SessionTable>,
    vacancies: Arc<VacancyStore>,
    admins: Arc<AdminList>,
    affirmative: String,
}

impl ConversationEngine {
    pub fn new(
        drafts: Arc<DraftRegistry>,
        sessions: Arc<SessionTable>,
        vacancies: Arc<VacancyStore>,
        admins: Arc<AdminList>,
        affirmative: impl Into<String>,
    ) -> Self {
        Self {
            drafts,
            sessions,
            vacancies,
            admins,
            affirmative: affirmative.into(),
        }
    }

    pub fn current_step(&self, user: UserId) -> Option<Step> {
        self.sessions.current(user)
    }

    /// Entry point of the submission dialogue. Administrators only.
    ///
    /// Any unfinished draft of the same user is replaced.
    pub fn add_vacancy(&self, user: UserId) -> Result<Reply, VacancyError> {
        if !self.admins.contains(user) {
            return Err(VacancyError::Unauthorized(user));
        }
        if self.drafts.has_draft(user) {
            debug!(%user, "replacing unfinished draft");
        }
        self.drafts.start_draft(user);
        self.sessions.set(user, Step::AwaitingTitle);
        info!(%user, pending_drafts = self.drafts.len(), "vacancy submission started");

        Ok(Reply::text(texts::prompt(Step::AwaitingTitle)).with_keyboard(Keyboard::Remove))
    }

    /// Feeds `input` to the dialogue step the user is at.
    pub fn handle(&self, user: UserId, step: Step, input: &str) -> EngineOutcome {
        let mut draft = match self.drafts.get_draft(user) {
            Ok(draft) => draft,
            Err(err) => return self.restart(user, &err),
        };

        match StateMachine::next(step, &mut draft, input, &self.affirmative) {
            Transition::Next(next) => {
                if let Some(field) = step.field()
                    && let Err(err) = self.drafts.set_field(user, field, input.to_string())
                {
                    return self.restart(user, &err);
                }
                self.sessions.set(user, next);
                debug!(%user, from = %step, to = %next, "dialogue advanced");

                let text = if next == Step::AwaitingConfirmation {
                    texts::preview(&draft, &self.affirmative)
                } else {
                    texts::prompt(next).to_string()
                };
                EngineOutcome::Continue(Reply::text(text))
            }
            Transition::Commit(record) => {
                let title = record.job_title.clone();
                let index = self.vacancies.append(record);
                self.finish(user);
                info!(%user, index, %title, total = self.vacancies.len(), "vacancy published");
                EngineOutcome::Finished(Reply::text(texts::ADDED))
            }
            Transition::Decline => {
                self.finish(user);
                info!(%user, "vacancy submission declined");
                EngineOutcome::Finished(Reply::text(texts::DECLINED))
            }
        }
    }

    /// Repeats the question for `step` without changing anything.
    pub fn reprompt(&self, user: UserId, step: Step) -> Reply {
        match (step, self.drafts.get_draft(user)) {
            (Step::AwaitingConfirmation, Ok(draft)) => {
                Reply::text(texts::preview(&draft, &self.affirmative))
            }
            _ => Reply::text(texts::prompt(step)),
        }
    }

    /// Drops the user's dialogue and draft, whatever step they were at.
    /// Returns whether a dialogue was active.
    pub fn cancel(&self, user: UserId) -> bool {
        let step = self.sessions.current(user);
        self.finish(user);
        if let Some(step) = step {
            info!(%user, %step, "vacancy submission cancelled");
        }
        step.is_some()
    }

    fn finish(&self, user: UserId) {
        self.drafts.clear_draft(user);
        self.sessions.end(user);
    }

    // The session said the user is mid-dialogue but the draft is gone.
    fn restart(&self, user: UserId, err: &VacancyError) -> EngineOutcome {
        warn!(%user, %err, "draft missing, restarting submission");
        self.drafts.start_draft(user);
        self.sessions.set(user, Step::AwaitingTitle);
        EngineOutcome::Continue(Reply::text(format!(
            "{}\n{}",
            texts::RESTARTED,
            texts::prompt(Step::AwaitingTitle)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: UserId = UserId(100);
    const GUEST: UserId = UserId(200);

    struct Fixture {
        engine: ConversationEngine,
        drafts: Arc<DraftRegistry>,
        vacancies: Arc<VacancyStore>,
    }

    fn fixture() -> Fixture {
        let drafts = Arc::new(DraftRegistry::new());
        let vacancies = Arc::new(VacancyStore::new());
        let engine = ConversationEngine::new(
            drafts.clone(),
            Arc::new(SessionTable::new()),
            vacancies.clone(),
            Arc::new(AdminList::new([ADMIN])),
            "да",
        );
        Fixture {
            engine,
            drafts,
            vacancies,
        }
    }

    fn feed(engine: &ConversationEngine, user: UserId, input: &str) -> EngineOutcome {
        let step = engine.current_step(user).expect("user should be mid-dialogue");
        engine.handle(user, step, input)
    }

    #[test]
    fn guest_cannot_start() {
        let f = fixture();
        assert_eq!(f.engine.add_vacancy(GUEST), Err(VacancyError::Unauthorized(GUEST)));
        assert_eq!(f.engine.current_step(GUEST), None);
        assert!(!f.drafts.has_draft(GUEST));
    }

    #[test]
    fn start_hides_keyboard_and_asks_for_title() {
        let f = fixture();
        let reply = f.engine.add_vacancy(ADMIN).unwrap();
        assert_eq!(reply.keyboard, Some(Keyboard::Remove));
        assert_eq!(reply.text, texts::prompt(Step::AwaitingTitle));
        assert_eq!(f.engine.current_step(ADMIN), Some(Step::AwaitingTitle));
    }

    #[test]
    fn link_step_replies_with_preview() {
        let f = fixture();
        f.engine.add_vacancy(ADMIN).unwrap();
        for input in ["Dev", "Acme", "Berlin", "1000", "Code"] {
            feed(&f.engine, ADMIN, input);
        }
        match feed(&f.engine, ADMIN, "https://acme.example") {
            EngineOutcome::Continue(reply) => {
                assert!(reply.text.starts_with("Проверьте введенные данные"));
                assert!(reply.text.contains("Ссылка: https://acme.example"));
            }
            other => panic!("expected Continue, got {other:?}"),
        }
        assert_eq!(f.engine.current_step(ADMIN), Some(Step::AwaitingConfirmation));
    }

    #[test]
    fn commit_appends_and_clears() {
        let f = fixture();
        f.engine.add_vacancy(ADMIN).unwrap();
        for input in ["Dev", "Acme", "Berlin", "1000", "Code", "https://acme.example"] {
            feed(&f.engine, ADMIN, input);
        }
        let outcome = feed(&f.engine, ADMIN, "Да");
        assert_eq!(outcome, EngineOutcome::Finished(Reply::text(texts::ADDED)));
        assert_eq!(f.vacancies.len(), 1);
        assert!(!f.drafts.has_draft(ADMIN));
        assert_eq!(f.engine.current_step(ADMIN), None);
    }

    #[test]
    fn missing_draft_restarts_from_title() {
        let f = fixture();
        f.engine.add_vacancy(ADMIN).unwrap();
        feed(&f.engine, ADMIN, "Dev");
        f.drafts.clear_draft(ADMIN);

        let outcome = feed(&f.engine, ADMIN, "Acme");
        match outcome {
            EngineOutcome::Continue(reply) => assert!(reply.text.starts_with(texts::RESTARTED)),
            other => panic!("expected Continue, got {other:?}"),
        }
        assert_eq!(f.engine.current_step(ADMIN), Some(Step::AwaitingTitle));
        assert_eq!(f.drafts.get_draft(ADMIN).unwrap().company, None);
    }

    #[test]
    fn cancel_reports_whether_dialogue_was_active() {
        let f = fixture();
        assert!(!f.engine.cancel(ADMIN));
        f.engine.add_vacancy(ADMIN).unwrap();
        assert!(f.engine.cancel(ADMIN));
        assert!(!f.drafts.has_draft(ADMIN));
    }

    #[test]
    fn reprompt_at_confirmation_repeats_preview() {
        let f = fixture();
        f.engine.add_vacancy(ADMIN).unwrap();
        for input in ["Dev", "Acme", "Berlin", "1000", "Code", "https://acme.example"] {
            feed(&f.engine, ADMIN, input);
        }
        let reply = f.engine.reprompt(ADMIN, Step::AwaitingConfirmation);
        assert!(reply.text.contains("Должность: Dev"));
        assert_eq!(
            f.engine.reprompt(ADMIN, Step::AwaitingSalary).text,
            texts::prompt(Step::AwaitingSalary)
        );
    }
}
