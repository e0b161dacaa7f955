//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list, create, update and delete intents to Dart via FRB.
//! - Return the refreshed list with every response so the UI can re-render
//!   without a second call.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Persistence failures become `ok = false` envelopes, never errors.
//! - The database location is resolved once per process.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use todolist_core::db::open_db;
use todolist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, ItemStore, ListController, SqliteTodoItemRepository, TodoItem, TodoItemId,
};

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Initializes logging from `TODOLIST_LOG_LEVEL` / `TODOLIST_LOG_DIR`.
///
/// Returns an empty string on success or when no log directory is
/// configured, and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging_from_env() -> String {
    match CoreConfig::from_env() {
        Ok(config) => init_logging_with_config(&config),
        Err(err) => err.to_string(),
    }
}

fn init_logging_with_config(config: &CoreConfig) -> String {
    let Some(log_dir) = &config.log_dir else {
        return String::new();
    };
    init_logging(
        config.log_level.as_str().to_string(),
        log_dir.to_string_lossy().into_owned(),
    )
}

/// One row of the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListItem {
    /// Stable item ID in string form.
    pub id: String,
    pub title: String,
    pub subtitle: String,
    /// Unix epoch milliseconds.
    pub adding_time_ms: i64,
}

/// Response envelope for a plain list load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    pub items: Vec<TodoListItem>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

/// Response envelope for create/update/delete intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the mutation was persisted.
    pub ok: bool,
    /// List after the action. Unchanged from the prior state when `ok` is
    /// false; empty only when storage itself cannot be opened.
    pub items: Vec<TodoListItem>,
    pub message: String,
}

impl TodoActionResponse {
    /// Failure envelope carrying whatever the store currently holds.
    fn failure(message: impl Into<String>) -> Self {
        let items = with_list_controller(|controller| to_list_items(controller.items()))
            .unwrap_or_default();
        Self {
            ok: false,
            items,
            message: message.into(),
        }
    }
}

/// Loads every stored item.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list_items() -> TodoListResponse {
    match with_list_controller(|controller| to_list_items(controller.items())) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No items.".to_string()
            } else {
                format!("Loaded {} item(s).", items.len())
            };
            TodoListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=todo_list_items error={err}");
            TodoListResponse {
                ok: false,
                items: Vec::new(),
                message: format!("todo_list_items failed: {err}"),
            }
        }
    }
}

/// Creates an item from the "new item" dialog.
///
/// `title` is trimmed; an empty result is rejected without touching storage.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_create_item(title: String, subtitle: String) -> TodoActionResponse {
    run_action("todo_create_item", |controller| {
        let created = controller.request_create(title.trim(), subtitle.trim());
        (created, if created { "Item created." } else { "Item not created." })
    })
}

/// Replaces title and subtitle of an existing item.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_update_item(item_id: String, title: String, subtitle: String) -> TodoActionResponse {
    let id = match parse_item_id(&item_id) {
        Ok(id) => id,
        Err(message) => return TodoActionResponse::failure(message),
    };
    run_action("todo_update_item", |controller| {
        let updated = controller.request_update(id, title.trim(), subtitle.trim());
        (updated, if updated { "Item updated." } else { "Item not updated." })
    })
}

/// Deletes an item.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete_item(item_id: String) -> TodoActionResponse {
    let id = match parse_item_id(&item_id) {
        Ok(id) => id,
        Err(message) => return TodoActionResponse::failure(message),
    };
    run_action("todo_delete_item", |controller| {
        let deleted = controller.request_delete(id);
        (deleted, if deleted { "Item deleted." } else { "Item not deleted." })
    })
}

type EntryController<'conn> = ListController<SqliteTodoItemRepository<'conn>>;

fn run_action(
    name: &str,
    action: impl FnOnce(&mut EntryController<'_>) -> (bool, &'static str),
) -> TodoActionResponse {
    let result = with_list_controller(|controller| {
        let (ok, message) = action(controller);
        TodoActionResponse {
            ok,
            items: to_list_items(controller.items()),
            message: message.to_string(),
        }
    });
    result.unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call={name} error={err}");
        TodoActionResponse::failure(format!("{name} failed: {err}"))
    })
}

fn with_list_controller<T>(f: impl FnOnce(&mut EntryController<'_>) -> T) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("todo DB open failed: {err}"))?;
    let repo = SqliteTodoItemRepository::try_new(&conn)
        .map_err(|err| format!("todo repo init failed: {err}"))?;
    let mut controller = ListController::new(ItemStore::new(repo));
    Ok(f(&mut controller))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH.get_or_init(CoreConfig::db_path_from_env).clone()
}

fn parse_item_id(raw: &str) -> Result<TodoItemId, String> {
    TodoItemId::parse_str(raw.trim()).map_err(|_| format!("invalid item id `{}`", raw.trim()))
}

fn to_list_items(items: &[TodoItem]) -> Vec<TodoListItem> {
    items
        .iter()
        .map(|item| TodoListItem {
            id: item.id.to_string(),
            title: item.title.clone(),
            subtitle: item.subtitle.clone(),
            adding_time_ms: item.adding_time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, init_logging_with_config, ping, todo_create_item,
        todo_delete_item, todo_list_items, todo_update_item,
    };
    use std::path::PathBuf;
    use todolist_core::{CoreConfig, LogLevel};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn create_update_delete_flow_round_trips_through_storage() {
        let title = unique_token("ffi-flow");
        let created = todo_create_item(format!("  {title}  "), "2%".to_string());
        assert!(created.ok, "{}", created.message);
        let row = created
            .items
            .iter()
            .find(|item| item.title == title)
            .expect("created item should be listed with trimmed title")
            .clone();
        assert_eq!(row.subtitle, "2%");
        assert!(row.adding_time_ms > 0);

        let renamed = format!("{title}-renamed");
        let updated = todo_update_item(row.id.clone(), renamed.clone(), String::new());
        assert!(updated.ok, "{}", updated.message);
        assert!(updated
            .items
            .iter()
            .any(|item| item.id == row.id && item.title == renamed && item.subtitle.is_empty()));

        let listed = todo_list_items();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.id == row.id));

        let deleted = todo_delete_item(row.id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.items.iter().all(|item| item.id != row.id));
    }

    #[test]
    fn create_rejects_blank_title() {
        let response = todo_create_item("   ".to_string(), "subtitle".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, "Item not created.");
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let response = todo_delete_item("not-an-id".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid item id"));

        let response = todo_update_item("".to_string(), "title".to_string(), String::new());
        assert!(!response.ok);
    }

    #[test]
    fn malformed_delete_keeps_existing_items_in_response() {
        let title = unique_token("ffi-malformed-delete");
        let created = todo_create_item(title.clone(), String::new());
        assert!(created.ok, "{}", created.message);

        let response = todo_delete_item("not-an-id".to_string());
        assert!(!response.ok);
        assert!(response.items.iter().any(|item| item.title == title));

        let response = todo_update_item("???".to_string(), "renamed".to_string(), String::new());
        assert!(!response.ok);
        assert!(response.items.iter().any(|item| item.title == title));
    }

    #[test]
    fn logging_config_without_dir_is_a_no_op() {
        let config = CoreConfig {
            db_path: PathBuf::from("/unused.sqlite3"),
            log_level: LogLevel::Info,
            log_dir: None,
        };
        assert_eq!(init_logging_with_config(&config), "");
    }

    #[test]
    fn logging_config_with_relative_dir_reports_error() {
        let config = CoreConfig {
            db_path: PathBuf::from("/unused.sqlite3"),
            log_level: LogLevel::Info,
            log_dir: Some(PathBuf::from("relative/logs")),
        };
        assert!(init_logging_with_config(&config).contains("absolute"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
