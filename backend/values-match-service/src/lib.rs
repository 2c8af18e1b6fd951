pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod render;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
