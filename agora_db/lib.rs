pub mod uow;

mod connection;
mod models;
mod repository;
mod seed;

pub use connection::{DbPool, establish_connection_pool, establish_test_connection_pool};
pub use repository::*;
pub use seed::seed_demo_data;
