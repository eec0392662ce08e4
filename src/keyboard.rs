use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};
use thiserror::Error;

use crate::{
    questions::Question,
    texts::{START_GAME_BUTTON, STATISTICS_BUTTON},
};

pub const ANSWER_PREFIX: &str = "answer:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerPayloadError {
    #[error("callback data {0:?} is not an answer")]
    NotAnAnswer(String),
    #[error("callback data {0:?} carries no option index")]
    BadIndex(String),
}

pub fn answer_payload(index: usize) -> String {
    format!("{ANSWER_PREFIX}{index}")
}

/// Extracts the option index from `answer:<index>` callback data.
pub fn parse_answer(data: &str) -> Result<usize, AnswerPayloadError> {
    let index = data
        .strip_prefix(ANSWER_PREFIX)
        .ok_or_else(|| AnswerPayloadError::NotAnAnswer(data.to_owned()))?;

    index
        .parse()
        .map_err(|_| AnswerPayloadError::BadIndex(data.to_owned()))
}

pub fn is_answer(data: &str) -> bool {
    data.starts_with(ANSWER_PREFIX)
}

/// The persistent menu under the input field.
pub fn main_menu_keyboard() -> KeyboardMarkup {
    let keyboard = vec![vec![
        KeyboardButton::new(START_GAME_BUTTON),
        KeyboardButton::new(STATISTICS_BUTTON),
    ]];

    KeyboardMarkup::new(keyboard).resize_keyboard()
}

pub fn options_keyboard(question: &Question) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = question
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| vec![InlineKeyboardButton::callback(option, answer_payload(i))])
        .collect();

    InlineKeyboardMarkup::new(keyboard)
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;

    #[test]
    fn parses_well_formed_payloads() {
        assert_eq!(parse_answer("answer:0"), Ok(0));
        assert_eq!(parse_answer("answer:12"), Ok(12));
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(
            parse_answer("answer:abc"),
            Err(AnswerPayloadError::BadIndex("answer:abc".into()))
        );
        assert_eq!(
            parse_answer("answer:"),
            Err(AnswerPayloadError::BadIndex("answer:".into()))
        );
        assert_eq!(
            parse_answer("answer:-1"),
            Err(AnswerPayloadError::BadIndex("answer:-1".into()))
        );
        assert_eq!(
            parse_answer("stats"),
            Err(AnswerPayloadError::NotAnAnswer("stats".into()))
        );
    }

    #[test]
    fn options_keyboard_has_one_row_per_option() {
        let question = Question::new("q", ["int", "float", "str"], 0);

        let markup = options_keyboard(&question);

        assert_eq!(markup.inline_keyboard.len(), 3);
        for (i, row) in markup.inline_keyboard.iter().enumerate() {
            assert_eq!(row.len(), 1);
            assert_eq!(row[0].text, question.options()[i]);
            assert_eq!(
                row[0].kind,
                InlineKeyboardButtonKind::CallbackData(format!("answer:{i}"))
            );
        }
    }

    #[test]
    fn main_menu_has_both_buttons_in_one_row() {
        let markup = main_menu_keyboard();

        assert!(markup.resize_keyboard);
        assert_eq!(markup.keyboard.len(), 1);
        let texts: Vec<&str> = markup.keyboard[0].iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec![START_GAME_BUTTON, STATISTICS_BUTTON]);
    }
}
