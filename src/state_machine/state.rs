use std::fmt;

use serde::{Deserialize, Serialize};

use super::draft::{DraftField, DraftVacancy, VacancyRecord};

/// The seven steps of the vacancy submission dialogue.
///
/// Each dialogue flows through: TITLE → COMPANY → LOCATION → SALARY →
/// DESCRIPTION → LINK → CONFIRMATION, then leaves the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    AwaitingTitle,
    AwaitingCompany,
    AwaitingLocation,
    AwaitingSalary,
    AwaitingDescription,
    AwaitingLink,
    AwaitingConfirmation,
}

impl Step {
    /// The draft field this step collects. `None` for the confirmation step.
    pub fn field(self) -> Option<DraftField> {
        match self {
            Step::AwaitingTitle => Some(DraftField::JobTitle),
            Step::AwaitingCompany => Some(DraftField::Company),
            Step::AwaitingLocation => Some(DraftField::Location),
            Step::AwaitingSalary => Some(DraftField::Salary),
            Step::AwaitingDescription => Some(DraftField::Description),
            Step::AwaitingLink => Some(DraftField::ApplyLink),
            Step::AwaitingConfirmation => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::AwaitingTitle => write!(f, "AWAITING_TITLE"),
            Step::AwaitingCompany => write!(f, "AWAITING_COMPANY"),
            Step::AwaitingLocation => write!(f, "AWAITING_LOCATION"),
            Step::AwaitingSalary => write!(f, "AWAITING_SALARY"),
            Step::AwaitingDescription => write!(f, "AWAITING_DESCRIPTION"),
            Step::AwaitingLink => write!(f, "AWAITING_LINK"),
            Step::AwaitingConfirmation => write!(f, "AWAITING_CONFIRMATION"),
        }
    }
}

/// The result of feeding one message to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The field was stored; wait for input at this step.
    Next(Step),
    /// The user confirmed; this record should be appended to the store.
    Commit(VacancyRecord),
    /// The user answered anything other than the affirmative token.
    Decline,
}

/// Pure transition function of the submission dialogue.
pub struct StateMachine;

impl StateMachine {
    /// Compute the transition for `input` received at `step`.
    ///
    /// - In every `Awaiting*` step except confirmation the raw input is
    ///   written to the step's field and the machine advances.
    /// - In `AwaitingConfirmation` the input is lowercased and compared with
    ///   `affirmative`; a match commits, anything else declines.
    ///
    /// The draft is only mutated by field steps. Clearing it after a commit
    /// or decline is the caller's job.
    pub fn next(
        step: Step,
        draft: &mut DraftVacancy,
        input: &str,
        affirmative: &str,
    ) -> Transition {
        let next = match step {
            Step::AwaitingTitle => Step::AwaitingCompany,
            Step::AwaitingCompany => Step::AwaitingLocation,
            Step::AwaitingLocation => Step::AwaitingSalary,
            Step::AwaitingSalary => Step::AwaitingDescription,
            Step::AwaitingDescription => Step::AwaitingLink,
            Step::AwaitingLink => Step::AwaitingConfirmation,
            Step::AwaitingConfirmation => {
                return if is_affirmative(input, affirmative) {
                    Transition::Commit(draft.to_record())
                } else {
                    Transition::Decline
                };
            }
        };

        if let Some(field) = step.field() {
            draft.set(field, input.to_string());
        }
        Transition::Next(next)
    }
}

/// Case-insensitive exact match against the configured "yes" word.
pub fn is_affirmative(input: &str, affirmative: &str) -> bool {
    input.to_lowercase() == affirmative.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const YES: &str = "да";

    fn walk(inputs: &[&str]) -> (DraftVacancy, Vec<Transition>) {
        let mut draft = DraftVacancy::default();
        let mut step = Step::AwaitingTitle;
        let mut transitions = Vec::new();
        for input in inputs {
            let t = StateMachine::next(step, &mut draft, input, YES);
            if let Transition::Next(next) = &t {
                step = *next;
            }
            transitions.push(t);
        }
        (draft, transitions)
    }

    #[test]
    fn happy_path_walks_all_steps() {
        let (_, transitions) = walk(&[
            "Rust developer",
            "Acme",
            "Berlin",
            "5000",
            "Write parsers",
            "https://acme.example",
            "ДА",
        ]);

        assert_eq!(
            transitions[..6],
            [
                Transition::Next(Step::AwaitingCompany),
                Transition::Next(Step::AwaitingLocation),
                Transition::Next(Step::AwaitingSalary),
                Transition::Next(Step::AwaitingDescription),
                Transition::Next(Step::AwaitingLink),
                Transition::Next(Step::AwaitingConfirmation),
            ]
        );
        match &transitions[6] {
            Transition::Commit(record) => {
                assert_eq!(record.job_title, "Rust developer");
                assert_eq!(record.company, "Acme");
                assert_eq!(record.location, "Berlin");
                assert_eq!(record.salary.as_deref(), Some("5000"));
                assert_eq!(record.description, "Write parsers");
                assert_eq!(record.apply_link, "https://acme.example");
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }

    #[test]
    fn input_is_stored_without_trimming() {
        let (draft, _) = walk(&["  padded title \n"]);
        assert_eq!(draft.job_title.as_deref(), Some("  padded title \n"));
    }

    #[test]
    fn anything_but_affirmative_declines() {
        for answer in ["нет", "yes", "да!", " да", "lol", "дa"] {
            let mut draft = DraftVacancy::default();
            let t = StateMachine::next(Step::AwaitingConfirmation, &mut draft, answer, YES);
            assert_eq!(t, Transition::Decline, "answer {answer:?}");
        }
    }

    #[test]
    fn confirmation_does_not_touch_draft() {
        let mut draft = DraftVacancy::default();
        draft.set(DraftField::JobTitle, "QA".into());
        let before = draft.clone();
        StateMachine::next(Step::AwaitingConfirmation, &mut draft, "нет", YES);
        assert_eq!(draft, before);
    }

    #[test]
    fn same_draft_commits_same_record() {
        let (draft, _) = walk(&["QA", "Acme", "Remote", "", "Tests", "https://acme.example"]);
        let first = StateMachine::next(Step::AwaitingConfirmation, &mut draft.clone(), "да", YES);
        let second = StateMachine::next(Step::AwaitingConfirmation, &mut draft.clone(), "да", YES);
        assert_eq!(first, second);
        assert_eq!(first, Transition::Commit(draft.to_record()));
    }

    #[test]
    fn affirmative_comparison_ignores_case() {
        assert!(is_affirmative("Да", YES));
        assert!(is_affirmative("YES", "yes"));
        assert!(!is_affirmative("yes ", "yes"));
    }

    #[test]
    fn field_steps_map_to_fields() {
        let fields: Vec<_> = [
            Step::AwaitingTitle,
            Step::AwaitingCompany,
            Step::AwaitingLocation,
            Step::AwaitingSalary,
            Step::AwaitingDescription,
            Step::AwaitingLink,
            Step::AwaitingConfirmation,
        ]
        .iter()
        .filter_map(|s| s.field())
        .collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(Step::AwaitingConfirmation.field(), None);
    }

    #[test]
    fn step_display() {
        assert_eq!(Step::AwaitingTitle.to_string(), "AWAITING_TITLE");
        assert_eq!(Step::AwaitingConfirmation.to_string(), "AWAITING_CONFIRMATION");
    }
}
