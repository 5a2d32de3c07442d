pub mod app;
pub mod config;
pub mod error;
pub mod outbox;
pub mod render;
pub mod routes;
pub mod state;
pub mod storage;
pub mod types;
