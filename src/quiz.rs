use teloxide::types::UserId;
use tracing::instrument;

use crate::{
    database::{QuizProgress, QuizResultStore, QuizStateStore, StorageResult},
    keyboard::parse_answer,
    questions::{Question, QuestionBank},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    InProgress { index: usize, score: usize },
    Completed { score: usize },
}

impl Stage {
    pub fn of(progress: QuizProgress, total: usize) -> Self {
        if progress.question_index() >= total {
            Stage::Completed {
                score: progress.score(),
            }
        } else {
            Stage::InProgress {
                index: progress.question_index(),
                score: progress.score(),
            }
        }
    }
}

/// How the chosen option compares to the right one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict<'a> {
    pub selected: &'a str,
    pub correct: &'a str,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome<'a> {
    /// The answer was recorded and `question` (1-based `number`) is up next.
    Next {
        verdict: Verdict<'a>,
        number: usize,
        question: &'a Question,
    },
    /// The answer was recorded and it was the last question.
    Finished {
        verdict: Verdict<'a>,
        score: usize,
        total: usize,
    },
    AlreadyFinished,
    /// The selected option does not exist for the current question.
    InvalidInput,
}

/// Drives one user through the question bank.
///
/// Nothing is cached between calls: every transition reads the stored
/// progress first and writes it back before returning.
pub struct Runner<'a, S> {
    store: &'a S,
    questions: &'a QuestionBank,
}

impl<'a, S> Runner<'a, S> {
    pub fn new(store: &'a S, questions: &'a QuestionBank) -> Self {
        Self { store, questions }
    }
}

impl<'a, S> Runner<'a, S>
where
    S: QuizStateStore + QuizResultStore,
{
    pub fn total(&self) -> usize {
        self.questions.count()
    }

    /// Restarts the quiz from scratch and returns the first question.
    #[instrument(level = "info", skip(self))]
    pub async fn start(&self, user_id: UserId) -> StorageResult<&'a Question> {
        self.store
            .set_state(user_id, QuizProgress::default())
            .await?;
        tracing::info!("{} starts the quiz", user_id);

        Ok(self.questions.first())
    }

    #[instrument(level = "info", skip(self))]
    pub async fn answer(&self, user_id: UserId, selected: usize) -> StorageResult<AnswerOutcome<'a>> {
        let progress = self.store.get_state(user_id).await?;

        let index = match Stage::of(progress, self.total()) {
            Stage::Completed { score } => {
                tracing::info!("{} answers after finishing the quiz with {}", user_id, score);
                return Ok(AnswerOutcome::AlreadyFinished);
            }
            Stage::InProgress { index, .. } => index,
        };

        let Some(question) = self.questions.get(index) else {
            return Ok(AnswerOutcome::AlreadyFinished);
        };
        let Some(selected_text) = question.option(selected) else {
            tracing::warn!(
                "{} selected option {} of question #{} which has only {}",
                user_id,
                selected,
                index + 1,
                question.options().len()
            );
            return Ok(AnswerOutcome::InvalidInput);
        };

        let verdict = Verdict {
            selected: selected_text,
            correct: question.correct_answer(),
            is_correct: question.is_correct(selected),
        };
        tracing::info!(
            "{} answers '{}' to question #{}. Correctness: {}",
            user_id,
            verdict.selected,
            index + 1,
            verdict.is_correct
        );

        let progress = progress.advance(verdict.is_correct);
        self.store.set_state(user_id, progress).await?;

        match self.questions.get(progress.question_index()) {
            Some(next) => Ok(AnswerOutcome::Next {
                verdict,
                number: progress.question_index() + 1,
                question: next,
            }),
            None => {
                self.store.save_result(user_id, progress.score()).await?;
                tracing::info!(
                    "{} completed the quiz with result {}/{}",
                    user_id,
                    progress.score(),
                    self.total()
                );
                Ok(AnswerOutcome::Finished {
                    verdict,
                    score: progress.score(),
                    total: self.total(),
                })
            }
        }
    }

    /// Answers with the raw data of a pressed option button. Data that is not
    /// an `answer:<index>` payload is invalid input and changes nothing.
    pub async fn answer_data(&self, user_id: UserId, data: &str) -> StorageResult<AnswerOutcome<'a>> {
        match parse_answer(data) {
            Ok(selected) => self.answer(user_id, selected).await,
            Err(e) => {
                tracing::warn!("{}: {}", user_id, e);
                Ok(AnswerOutcome::InvalidInput)
            }
        }
    }

    /// Score of the user's last completed run, if any.
    pub async fn stats(&self, user_id: UserId) -> StorageResult<Option<usize>> {
        self.store.get_result(user_id).await
    }
}
