pub mod commands;
pub mod config;
pub mod context;
pub mod database;
pub mod keyboard;
pub mod questions;
pub mod quiz;
pub mod restart;
pub mod runner;
pub mod schema;
pub mod texts;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
