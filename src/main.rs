use std::{error::Error, process::ExitCode, sync::Arc};

use teloxide::{
    prelude::*,
    update_listeners::{webhooks, Polling},
};
use tgquizbot::{
    config::Config,
    context::AppContext,
    database::{Connection, QuizStateStore},
    questions::QuestionBank,
    restart::notify_users_restart,
    schema::schema,
};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

type BoxError = Box<dyn Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> ExitCode {
    // loads `.env` as well, so it goes before the `LOG_LEVEL` lookup
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("The bot stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() -> Result<(), BoxError> {
    LogTracer::init()?;

    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

async fn run(config: Config) -> Result<(), BoxError> {
    let connection = Connection::connect(&config.database_url).await?;
    connection.create_tables().await?;
    let reset = connection.reset_all_states().await?;
    tracing::info!("Reset quiz progress of {} users", reset);

    let ctx = Arc::new(AppContext::new(connection, QuestionBank::builtin()?));
    let bot = Bot::new(config.token);

    notify_users_restart(&bot, ctx.store()).await?;

    tracing::info!("Starting bot...");
    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![ctx])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            tracing::info!("Receiving updates through the webhook at {}", webhook.url);
            let options =
                webhooks::Options::new(webhook.address, webhook.url).drop_pending_updates();
            let listener = webhooks::axum(bot, options).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
                )
                .await;
        }
        None => {
            tracing::info!("Receiving updates through long polling");
            let listener = Polling::builder(bot).drop_pending_updates().build();
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
    }

    Ok(())
}
