pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod views;

pub use config::Config;
pub use db::Database;
pub use error::{AppError, Result};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}
