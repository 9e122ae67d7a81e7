pub mod connection;
pub mod json;
pub mod matches;
pub mod models;
pub mod profiles;
pub mod seasons;
pub mod setup;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
