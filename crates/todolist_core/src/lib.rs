//! Core domain logic for the TodoList app.
//! This crate owns the todo item store and the list view model that the UI
//! shell renders.

pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use controller::list_controller::{ListController, ListObserver};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::todo_item::{validate_title, TodoItem, TodoItemId, TodoItemValidationError};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoItemRepository, TodoItemRepository};
pub use service::item_store::ItemStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
