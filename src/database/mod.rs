pub mod connection;
pub mod quiz;

pub use connection::{Connection, QuizResultStore, QuizStateStore, StorageResult};
pub use quiz::{QuizProgress, QuizResult};
