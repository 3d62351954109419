mod command;
mod query;

pub mod commands;
pub mod queries;

pub use command::{Command, CommandHandler};
pub use query::{Query, QueryHandler};
