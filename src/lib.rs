//! Bookshelf book registry
//!
//! An in-memory REST JSON API for recording books and reading progress.
//! Data lives for the lifetime of the process.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state with an empty book collection
    pub fn new(config: &AppConfig) -> Self {
        let repository = repository::Repository::new(config.books.id_length);
        Self {
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
