use crate::{database::Connection, questions::QuestionBank, quiz::Runner};

/// Shared state of the running bot, built once at startup and handed to
/// every handler.
pub struct AppContext<S = Connection> {
    store: S,
    questions: QuestionBank,
}

impl<S> AppContext<S> {
    pub fn new(store: S, questions: QuestionBank) -> Self {
        Self { store, questions }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn runner(&self) -> Runner<'_, S> {
        Runner::new(&self.store, &self.questions)
    }
}
