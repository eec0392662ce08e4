use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{ChatId, Message, UserId},
    utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{
    context::AppContext,
    keyboard::{main_menu_keyboard, options_keyboard},
    questions::Question,
    texts, HandlerResult,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "show the main menu.")]
    Start,
    #[command(description = "start the quiz from the first question.")]
    Quiz,
    #[command(description = "show your last result.")]
    Stats,
}

fn sender(msg: &Message) -> Option<UserId> {
    msg.from.as_ref().map(|user| user.id)
}

pub(crate) async fn send_question(bot: &Bot, chat_id: ChatId, question: &Question) -> HandlerResult {
    bot.send_message(chat_id, question.text())
        .reply_markup(options_keyboard(question))
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot))]
pub(crate) async fn start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, texts::GREETING)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, ctx))]
pub(crate) async fn quiz(bot: Bot, msg: Message, ctx: Arc<AppContext>) -> HandlerResult {
    let Some(user_id) = sender(&msg) else {
        tracing::debug!("Quiz requested by a message without a sender");
        return Ok(());
    };

    bot.send_message(msg.chat.id, texts::QUIZ_INTRO)
        .reply_markup(main_menu_keyboard())
        .await?;

    let question = ctx.runner().start(user_id).await?;
    send_question(&bot, msg.chat.id, question).await
}

#[instrument(level = "info", skip(bot, ctx))]
pub(crate) async fn stats(bot: Bot, msg: Message, ctx: Arc<AppContext>) -> HandlerResult {
    let Some(user_id) = sender(&msg) else {
        tracing::debug!("Stats requested by a message without a sender");
        return Ok(());
    };

    let runner = ctx.runner();
    let text = match runner.stats(user_id).await? {
        Some(score) => texts::last_result(score, runner.total()),
        None => texts::NO_STATISTICS.to_owned(),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_in_lowercase() {
        assert!(matches!(Command::parse("/start", "quizbot"), Ok(Command::Start)));
        assert!(matches!(Command::parse("/quiz", "quizbot"), Ok(Command::Quiz)));
        assert!(matches!(
            Command::parse("/stats@quizbot", "quizbot"),
            Ok(Command::Stats)
        ));
        assert!(Command::parse("/help", "quizbot").is_err());
    }
}
