pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod proxy;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::{AppState, Stores};
