use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: usize,
}

impl Question {
    pub fn new<T, O>(text: T, options: O, correct_option: usize) -> Self
    where
        T: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_option,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    /// Text of the correct option. Only meaningful for questions that went
    /// through [`QuestionBank::new`].
    pub fn correct_answer(&self) -> &str {
        self.option(self.correct_option).unwrap_or_default()
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionBankError {
    #[error("question bank is empty")]
    Empty,
    #[error("question #{number} has {options} option(s), at least 2 are required")]
    TooFewOptions { number: usize, options: usize },
    #[error("question #{number} marks option {correct} as correct but has only {options} option(s)")]
    CorrectOptionOutOfRange {
        number: usize,
        correct: usize,
        options: usize,
    },
}

/// Ordered, validated set of questions shared by every user.
///
/// The order of the questions is the order in which they are asked.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }

        for (i, question) in questions.iter().enumerate() {
            let options = question.options().len();
            if options < 2 {
                return Err(QuestionBankError::TooFewOptions {
                    number: i + 1,
                    options,
                });
            }
            if question.correct_option() >= options {
                return Err(QuestionBankError::CorrectOptionOutOfRange {
                    number: i + 1,
                    correct: question.correct_option(),
                    options,
                });
            }
        }

        Ok(Self { questions })
    }

    /// The quiz deployed with the bot.
    pub fn builtin() -> Result<Self, QuestionBankError> {
        let questions = vec![
            Question::new(
                "Что такое Python?",
                ["Язык программирования", "Змея", "Планета", "Кофе"],
                0,
            ),
            Question::new(
                "Какой тип данных используется для хранения целых чисел?",
                ["int", "float", "str", "bool"],
                0,
            ),
            Question::new(
                "Как называется цикл, который выполняется, пока условие истинно?",
                ["while", "for", "do-while", "repeat"],
                0,
            ),
            Question::new(
                "Какая функция используется для вывода на экран в Python?",
                ["print", "echo", "write", "show"],
                0,
            ),
            Question::new(
                "Что такое список (list) в Python?",
                [
                    "Изменяемая последовательность",
                    "Неизменяемая последовательность",
                    "Ключ-значение",
                    "Функция",
                ],
                0,
            ),
            Question::new(
                "Какой символ используется для комментариев в Python?",
                ["#", "//", "/*", ";"],
                0,
            ),
            Question::new(
                "Как называется функция, которая возвращает количество элементов в списке?",
                ["len()", "count()", "size()", "number()"],
                0,
            ),
            Question::new(
                "Что такое словарь (dict) в Python?",
                ["Набор пар ключ-значение", "Список чисел", "Строка", "Кортеж"],
                0,
            ),
            Question::new(
                "Какой метод используется для добавления элемента в список?",
                ["append()", "add()", "insert()", "push()"],
                0,
            ),
            Question::new(
                "Как называется исключение, возникающее при делении на ноль?",
                ["ZeroDivisionError", "TypeError", "ValueError", "IndexError"],
                0,
            ),
        ];

        Self::new(questions)
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn first(&self) -> &Question {
        // never empty after construction
        &self.questions[0]
    }

    pub fn count(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_passes_validation() {
        let bank = QuestionBank::builtin().unwrap();

        assert_eq!(bank.count(), 10);
        assert_eq!(bank.first().correct_answer(), "Язык программирования");
    }

    #[test]
    fn rejects_empty_bank() {
        assert_eq!(QuestionBank::new(vec![]).unwrap_err(), QuestionBankError::Empty);
    }

    #[test]
    fn rejects_single_option_question() {
        let err = QuestionBank::new(vec![
            Question::new("ok", ["a", "b"], 1),
            Question::new("lonely", ["a"], 0),
        ])
        .unwrap_err();

        assert_eq!(err, QuestionBankError::TooFewOptions { number: 2, options: 1 });
    }

    #[test]
    fn rejects_correct_option_outside_options() {
        let err = QuestionBank::new(vec![Question::new("q", ["a", "b", "c"], 3)]).unwrap_err();

        assert_eq!(
            err,
            QuestionBankError::CorrectOptionOutOfRange {
                number: 1,
                correct: 3,
                options: 3
            }
        );
    }

    #[test]
    fn lookups_follow_bank_order() {
        let bank = QuestionBank::new(vec![
            Question::new("first", ["a", "b"], 0),
            Question::new("second", ["c", "d"], 1),
        ])
        .unwrap();

        assert_eq!(bank.first().text(), "first");
        assert_eq!(bank.get(1).map(Question::text), Some("second"));
        assert!(bank.get(2).is_none());
        assert_eq!(bank.get(1).unwrap().correct_answer(), "d");
    }
}
