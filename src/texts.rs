//! Everything the bot says to users.

use crate::quiz::{AnswerOutcome, Verdict};

pub const START_GAME_BUTTON: &str = "Начать игру";
pub const STATISTICS_BUTTON: &str = "Статистика";

pub const GREETING: &str =
    "Бот запущен. Нажмите кнопку «Начать игру» или введите /quiz для старта.";
pub const QUIZ_INTRO: &str = "Давайте начнем квиз!";
pub const NO_STATISTICS: &str = "Статистика отсутствует. Сыграйте в квиз!";
pub const INVALID_INPUT: &str = "Неверные данные. Попробуйте снова.";
pub const ALREADY_FINISHED: &str = "Квиз уже завершён.";
pub const RESTART_NOTICE: &str =
    "Бот был перезапущен. Введите /start или введите /quiz и начните квиз.";

pub fn verdict(verdict: &Verdict<'_>) -> String {
    if verdict.is_correct {
        format!("Вы выбрали: {}\nВерно!", verdict.selected)
    } else {
        format!(
            "Вы выбрали: {}\nНеправильно. Правильный ответ: {}",
            verdict.selected, verdict.correct
        )
    }
}

/// The pop-up shown instead of moving on, for answers that are not accepted.
pub fn alert(outcome: &AnswerOutcome<'_>) -> Option<&'static str> {
    match outcome {
        AnswerOutcome::InvalidInput => Some(INVALID_INPUT),
        AnswerOutcome::AlreadyFinished => Some(ALREADY_FINISHED),
        AnswerOutcome::Next { .. } | AnswerOutcome::Finished { .. } => None,
    }
}

pub fn final_summary(score: usize, total: usize) -> String {
    format!("Квиз завершен! Ваш результат: {} из {}", score, total)
}

pub fn last_result(score: usize, total: usize) -> String {
    format!("Ваш последний результат: {} из {}", score, total)
}
