use std::{future::Future, str::FromStr};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use teloxide::types::UserId;
use tracing::instrument;

use super::quiz::{QuizProgress, QuizResult};

pub type StorageResult<T> = Result<T, sqlx::Error>;

pub struct Connection {
    pool: SqlitePool,
}

impl Connection {
    /// Opens a pool on `database_url`, creating the database file if needed.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database. The pool keeps exactly one connection
    /// alive forever, since the data lives as long as that connection.
    pub async fn in_memory() -> StorageResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self { pool })
    }

    pub async fn create_tables(&self) -> StorageResult<()> {
        tracing::debug!("Creating quiz tables");
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS quiz_state (
                user_id INTEGER PRIMARY KEY,
                question_index INTEGER NOT NULL DEFAULT 0,
                score INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS quiz_results (
                user_id INTEGER PRIMARY KEY,
                score INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// Telegram user ids use at most 52 bits, so they round-trip through i64.
fn user_key(user_id: UserId) -> i64 {
    user_id.0 as i64
}

fn user_from_key(key: i64) -> UserId {
    UserId(key as u64)
}

fn encode_count(value: usize) -> StorageResult<i64> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_count(value: i64) -> StorageResult<usize> {
    usize::try_from(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub trait QuizStateStore: Sync {
    fn find_state(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = StorageResult<Option<QuizProgress>>> + Send;

    fn set_state(
        &self,
        user_id: UserId,
        progress: QuizProgress,
    ) -> impl Future<Output = StorageResult<()>> + Send;

    /// Zeroes every stored progress row and returns how many there were.
    fn reset_all_states(&self) -> impl Future<Output = StorageResult<u64>> + Send;

    fn all_user_ids(&self) -> impl Future<Output = StorageResult<Vec<UserId>>> + Send;

    /// Stored progress, or the beginning of the quiz for unknown users.
    fn get_state(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = StorageResult<QuizProgress>> + Send {
        async move { Ok(self.find_state(user_id).await?.unwrap_or_default()) }
    }
}

pub trait QuizResultStore: Sync {
    fn save_result(
        &self,
        user_id: UserId,
        score: usize,
    ) -> impl Future<Output = StorageResult<()>> + Send;

    fn get_result(&self, user_id: UserId)
        -> impl Future<Output = StorageResult<Option<usize>>> + Send;

    fn list_results(&self) -> impl Future<Output = StorageResult<Vec<QuizResult>>> + Send;
}

impl QuizStateStore for Connection {
    async fn find_state(&self, user_id: UserId) -> StorageResult<Option<QuizProgress>> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT question_index, score FROM quiz_state WHERE user_id = ?1")
                .bind(user_key(user_id))
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((question_index, score)) => Ok(Some(QuizProgress::new(
                decode_count(question_index)?,
                decode_count(score)?,
            ))),
            None => Ok(None),
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn set_state(&self, user_id: UserId, progress: QuizProgress) -> StorageResult<()> {
        sqlx::query(
            r"
            INSERT INTO quiz_state (user_id, question_index, score)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                question_index = excluded.question_index,
                score = excluded.score
            ",
        )
        .bind(user_key(user_id))
        .bind(encode_count(progress.question_index())?)
        .bind(encode_count(progress.score())?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn reset_all_states(&self) -> StorageResult<u64> {
        let reset = sqlx::query("UPDATE quiz_state SET question_index = 0, score = 0")
            .execute(&self.pool)
            .await?;

        Ok(reset.rows_affected())
    }

    async fn all_user_ids(&self) -> StorageResult<Vec<UserId>> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT user_id FROM quiz_state")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(key,)| user_from_key(key)).collect())
    }
}

impl QuizResultStore for Connection {
    #[instrument(level = "debug", skip(self))]
    async fn save_result(&self, user_id: UserId, score: usize) -> StorageResult<()> {
        sqlx::query(
            r"
            INSERT INTO quiz_results (user_id, score)
            VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET score = excluded.score
            ",
        )
        .bind(user_key(user_id))
        .bind(encode_count(score)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_result(&self, user_id: UserId) -> StorageResult<Option<usize>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT score FROM quiz_results WHERE user_id = ?1")
            .bind(user_key(user_id))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(score,)| decode_count(score)).transpose()
    }

    async fn list_results(&self) -> StorageResult<Vec<QuizResult>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as("SELECT user_id, score FROM quiz_results")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(key, score)| Ok(QuizResult::new(user_from_key(key), decode_count(score)?)))
            .collect()
    }
}
