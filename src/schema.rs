use std::error::Error;

use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::{CallbackQuery, Message, Update},
};
use tracing::instrument;

use crate::{
    commands::{quiz, start, stats, Command},
    keyboard::is_answer,
    runner::take_answer,
    texts::{START_GAME_BUTTON, STATISTICS_BUTTON},
    HandlerResult,
};

/// Routes updates to handlers. Every handler expects an `Arc<AppContext>`
/// among the dispatcher dependencies.
pub fn schema() -> UpdateHandler<Box<dyn Error + Send + Sync + 'static>> {
    use dptree::case;

    tracing::debug!("Building the dispatching tree");

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Quiz].endpoint(quiz))
        .branch(case![Command::Stats].endpoint(stats));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::filter(is_start_button).endpoint(quiz))
        .branch(dptree::filter(is_stats_button).endpoint(stats))
        .endpoint(ignore);

    let callback_handler = Update::filter_callback_query()
        .filter(is_answer_press)
        .endpoint(take_answer);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

fn is_start_button(msg: Message) -> bool {
    msg.text() == Some(START_GAME_BUTTON)
}

fn is_stats_button(msg: Message) -> bool {
    msg.text() == Some(STATISTICS_BUTTON)
}

fn is_answer_press(q: CallbackQuery) -> bool {
    q.data.as_deref().is_some_and(is_answer)
}

#[instrument(level = "debug", skip_all)]
async fn ignore(msg: Message) -> HandlerResult {
    tracing::debug!("{}: ignoring {:?}", msg.chat.id, msg.text());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{ops::ControlFlow, sync::Arc};

    use serde_json::{json, Value};
    use teloxide::{
        types::{Me, UserId},
        Bot,
    };
    use url::Url;

    use super::*;
    use crate::{
        context::AppContext,
        database::{Connection, QuizProgress, QuizStateStore},
        questions::QuestionBank,
    };

    const USER: UserId = UserId(10);

    fn message_json(text: &str) -> Value {
        json!({
            "message_id": 1,
            "date": 0,
            "chat": { "id": USER.0, "type": "private", "first_name": "Ann" },
            "from": { "id": USER.0, "is_bot": false, "first_name": "Ann" },
            "text": text,
        })
    }

    fn press_json(data: &str) -> Value {
        json!({
            "id": "1",
            "from": { "id": USER.0, "is_bot": false, "first_name": "Ann" },
            "chat_instance": "1",
            "data": data,
        })
    }

    fn update(kind: &str, payload: Value) -> Update {
        let mut body = json!({ "update_id": 1 });
        body[kind] = payload;
        serde_json::from_str(&body.to_string()).expect("update")
    }

    fn me() -> Me {
        serde_json::from_value(json!({
            "id": 1,
            "is_bot": true,
            "first_name": "Quiz",
            "username": "quizbot",
            "can_join_groups": false,
            "can_read_all_group_messages": false,
            "supports_inline_queries": false,
        }))
        .expect("me")
    }

    async fn app() -> Arc<AppContext> {
        let connection = Connection::in_memory().await.expect("connect");
        connection.create_tables().await.expect("create tables");
        Arc::new(AppContext::new(
            connection,
            QuestionBank::builtin().expect("builtin bank"),
        ))
    }

    type Outcome = ControlFlow<HandlerResult, dptree::di::DependencyMap>;

    /// Every request of this bot fails, so an endpoint that talks to
    /// Telegram ends with an error while `ignore` ends with `Ok`.
    async fn route(ctx: &Arc<AppContext>, update: Update) -> Outcome {
        let bot = Bot::new("0:test").set_api_url(Url::parse("http://127.0.0.1:1/").expect("url"));
        schema()
            .dispatch(dptree::deps![bot, ctx.clone(), me(), update])
            .await
    }

    #[test]
    fn menu_buttons_match_their_exact_text() {
        let message = |text: &str| serde_json::from_value::<Message>(message_json(text)).expect("message");

        assert!(is_start_button(message(START_GAME_BUTTON)));
        assert!(!is_start_button(message(STATISTICS_BUTTON)));
        assert!(is_stats_button(message(STATISTICS_BUTTON)));
        assert!(!is_stats_button(message("статистика")));
    }

    #[test]
    fn only_answer_payloads_are_answer_presses() {
        let press = |data: &str| serde_json::from_value::<CallbackQuery>(press_json(data)).expect("press");

        assert!(is_answer_press(press("answer:0")));
        assert!(is_answer_press(press("answer:abc")));
        assert!(!is_answer_press(press("menu")));
    }

    #[tokio::test]
    async fn free_text_and_unknown_commands_are_ignored() {
        let ctx = app().await;

        for text in ["hello", "/help"] {
            let outcome = route(&ctx, update("message", message_json(text))).await;
            assert!(matches!(outcome, ControlFlow::Break(Ok(()))), "{text}");
        }
        assert_eq!(ctx.store().find_state(USER).await.expect("state"), None);
    }

    #[tokio::test]
    async fn commands_and_menu_buttons_reach_a_replying_handler() {
        let ctx = app().await;

        for text in ["/start", "/quiz", "/stats", START_GAME_BUTTON, STATISTICS_BUTTON] {
            let outcome = route(&ctx, update("message", message_json(text))).await;
            assert!(matches!(outcome, ControlFlow::Break(Err(_))), "{text}");
        }
    }

    #[tokio::test]
    async fn answer_presses_are_scored_before_replying() {
        let ctx = app().await;

        let outcome = route(&ctx, update("callback_query", press_json("answer:0"))).await;

        assert!(matches!(outcome, ControlFlow::Break(Err(_))));
        assert_eq!(
            ctx.store().get_state(USER).await.expect("state"),
            QuizProgress::new(1, 1)
        );
    }

    #[tokio::test]
    async fn malformed_answer_press_leaves_progress_alone() {
        let ctx = app().await;

        let outcome = route(&ctx, update("callback_query", press_json("answer:abc"))).await;

        assert!(matches!(outcome, ControlFlow::Break(Err(_))));
        assert_eq!(ctx.store().find_state(USER).await.expect("state"), None);
    }

    #[tokio::test]
    async fn other_callbacks_are_not_handled() {
        let ctx = app().await;

        let outcome = route(&ctx, update("callback_query", press_json("menu"))).await;

        assert!(matches!(outcome, ControlFlow::Continue(_)));
    }
}
