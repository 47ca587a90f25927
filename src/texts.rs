//! User-facing strings and menu captions.

use crate::state_machine::{DraftVacancy, Step, VacancyRecord};

pub const ADD_VACANCY: &str = "Добавить вакансию";
pub const SEARCH_VACANCIES: &str = "Поиск вакансий";
pub const BACK: &str = "⬅️ Назад";
pub const CANCEL: &str = "Отмена";
/// Prefix of every browse-list caption: `"📋 Вакансия {n}: {title}"`.
pub const VACANCY_MARKER: &str = "📋 Вакансия ";

pub const START_COMMAND: &str = "/start";
pub const ADD_COMMAND: &str = "/add";
pub const CANCEL_COMMAND: &str = "/cancel";

pub const CHOOSE_OPTION: &str = "Выберите опцию:";
pub const ADMINS_ONLY: &str = "Только администраторы могут добавлять вакансии.";
pub const ADDED: &str = "✅ Вакансия успешно добавлена!";
pub const DECLINED: &str = "❌ Добавление вакансии отменено.";
pub const CANCELLED: &str = "Операция отменена.";
pub const NO_VACANCIES: &str = "📭 Пока нет доступных вакансий.";
pub const PICK_VACANCY: &str = "Выберите вакансию для просмотра:";
pub const PICK_FROM_LIST: &str = "Пожалуйста, выберите вакансию из списка.";
pub const USE_BUTTONS: &str = "Используйте кнопки для навигации.";
pub const APPLY_BUTTON: &str = "📨 Перейти к отклику";

pub fn greeting(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("Привет, {name}! Я бот для поиска работы."),
        None => "Привет! Я бот для поиска работы.".to_string(),
    }
}

/// The question asked when the dialogue enters `step`.
pub fn prompt(step: Step) -> &'static str {
    match step {
        Step::AwaitingTitle => "Давайте добавим новую вакансию. Введите название должности:",
        Step::AwaitingCompany => "Отлично! Теперь введите название компании:",
        Step::AwaitingLocation => "Теперь введите местоположение (город/страна):",
        Step::AwaitingSalary => "Введите зарплату или диапазон зарплат (необязательно):",
        Step::AwaitingDescription => "Теперь введите описание вакансии:",
        Step::AwaitingLink => "Введите ссылку для отклика на вакансию:",
        Step::AwaitingConfirmation => "Все верно? (да/нет)",
    }
}

pub const RESTARTED: &str = "Черновик вакансии потерян, начнём заново.";

/// Summary shown before the confirmation question.
pub fn preview(draft: &DraftVacancy, affirmative: &str) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    format!(
        "Проверьте введенные данные:\n\n\
         Должность: {}\n\
         Компания: {}\n\
         Местоположение: {}\n\
         Зарплата: {}\n\
         Описание: {}\n\
         Ссылка: {}\n\n\
         Все верно? ({affirmative}/нет)",
        field(&draft.job_title),
        field(&draft.company),
        field(&draft.location),
        field(&draft.salary),
        field(&draft.description),
        field(&draft.apply_link),
    )
}

/// Characters Telegram's MarkdownV2 treats as markup.
const MARKDOWN_RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Backslash-escapes `text` so it renders literally in MarkdownV2.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// MarkdownV2 card for a single vacancy.
pub fn details(record: &VacancyRecord) -> String {
    format!(
        "🏢 *{}*\n\
         📋 *Компания:* {}\n\
         📍 *Местоположение:* {}\n\
         💰 *Зарплата:* {}\n\
         📝 *Описание:* {}\n\n\
         🔗 *Ссылка для отклика:* {}",
        escape_markdown(&record.job_title),
        escape_markdown(&record.company),
        escape_markdown(&record.location),
        escape_markdown(record.salary.as_deref().unwrap_or_default()),
        escape_markdown(&record.description),
        escape_markdown(&record.apply_link),
    )
}

pub fn vacancy_caption(ordinal: usize, title: &str) -> String {
    format!("{VACANCY_MARKER}{ordinal}: {title}")
}
