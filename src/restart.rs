use std::{fmt::Display, future::Future};

use teloxide::{prelude::Requester, types::UserId, Bot, RequestError};
use tracing::instrument;

use crate::{database::QuizStateStore, texts::RESTART_NOTICE};

/// Delivers a plain text message to a single user.
pub trait Notifier: Sync {
    type Error: Display;

    fn notify(
        &self,
        user_id: UserId,
        text: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl Notifier for Bot {
    type Error = RequestError;

    async fn notify(&self, user_id: UserId, text: &str) -> Result<(), RequestError> {
        self.send_message(user_id, text).await?;
        Ok(())
    }
}

/// Tells every user with stored progress that the bot restarted.
///
/// Delivery failures are logged and skipped. Returns how many users were
/// reached.
#[instrument(level = "info", skip_all)]
pub async fn notify_users_restart<N, S>(notifier: &N, store: &S) -> Result<usize, sqlx::Error>
where
    N: Notifier,
    S: QuizStateStore,
{
    let user_ids = store.all_user_ids().await?;
    let mut delivered = 0;

    for user_id in &user_ids {
        match notifier.notify(*user_id, RESTART_NOTICE).await {
            Ok(()) => delivered += 1,
            Err(e) => tracing::error!("Failed to notify {} about the restart: {}", user_id, e),
        }
    }

    tracing::info!(
        "Restart notice delivered to {}/{} users",
        delivered,
        user_ids.len()
    );
    Ok(delivered)
}
