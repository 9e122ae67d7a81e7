pub mod axescores_client;
pub mod handlers;
pub mod models;
pub mod routes;

pub use axescores_client::AxeScoresClient;
