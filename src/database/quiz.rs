use teloxide::types::UserId;

/// A user's position in the question sequence and the points earned so far.
///
/// A user without a stored row is treated as `QuizProgress::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizProgress {
    question_index: usize,
    score: usize,
}

impl QuizProgress {
    pub fn new(question_index: usize, score: usize) -> Self {
        Self {
            question_index,
            score,
        }
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Moves to the next question, adding a point when the answer was right.
    pub fn advance(self, correct: bool) -> Self {
        Self {
            question_index: self.question_index + 1,
            score: self.score + usize::from(correct),
        }
    }
}

/// Score of the last completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    user_id: UserId,
    score: usize,
}

impl QuizResult {
    pub fn new(user_id: UserId, score: usize) -> Self {
        Self { user_id, score }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn score(&self) -> usize {
        self.score
    }
}
