use std::sync::Arc;

use teloxide::{
    dispatching::dialogue::GetChatId,
    payloads::AnswerCallbackQuerySetters,
    prelude::Requester,
    types::{CallbackQuery, ChatId},
    Bot,
};
use tracing::instrument;

use crate::{
    commands::send_question,
    context::AppContext,
    quiz::AnswerOutcome,
    texts, HandlerResult,
};

async fn alert(bot: &Bot, q: &CallbackQuery, text: &str) -> HandlerResult {
    bot.answer_callback_query(&q.id)
        .text(text)
        .show_alert(true)
        .await?;
    Ok(())
}

/// Acknowledges the press and strips the options from the question message
/// so the same question can't be answered twice.
async fn close_question(bot: &Bot, q: &CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(&q.id).await?;

    if let Some(message) = &q.message {
        // the answer is already stored at this point
        if let Err(e) = bot
            .edit_message_reply_markup(message.chat().id, message.id())
            .await
        {
            tracing::warn!("Failed to remove answer options from {}: {}", message.id(), e);
        }
    }
    Ok(())
}

#[instrument(level = "info", skip(bot, ctx))]
pub(crate) async fn take_answer(bot: Bot, q: CallbackQuery, ctx: Arc<AppContext>) -> HandlerResult {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let user_id = q.from.id;
    let chat_id = q.chat_id().unwrap_or(ChatId::from(user_id));

    // Presses are scored against the stored question, so a second tap that
    // lands before the keyboard is removed counts for the next question.
    let outcome = ctx.runner().answer_data(user_id, data).await?;
    if let Some(text) = texts::alert(&outcome) {
        return alert(&bot, &q, text).await;
    }

    match outcome {
        AnswerOutcome::Next {
            verdict,
            number,
            question,
        } => {
            close_question(&bot, &q).await?;
            bot.send_message(chat_id, texts::verdict(&verdict)).await?;
            tracing::info!("{}: asking question #{}", user_id, number);
            send_question(&bot, chat_id, question).await?;
        }
        AnswerOutcome::Finished {
            verdict,
            score,
            total,
        } => {
            close_question(&bot, &q).await?;
            bot.send_message(chat_id, texts::verdict(&verdict)).await?;
            bot.send_message(chat_id, texts::final_summary(score, total))
                .await?;
        }
        AnswerOutcome::InvalidInput | AnswerOutcome::AlreadyFinished => {}
    }

    Ok(())
}
