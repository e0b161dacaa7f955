//! Todo item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/fetch/update/delete over the `todo_items` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Writes are not validated here; the schema `CHECK` on `title` is the
//!   last line, and violations surface as `RepoError::Db`.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Updates never touch `adding_time`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::todo_item::{TodoItem, TodoItemId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TODO_ITEMS_TABLE: &str = "todo_items";
const REQUIRED_COLUMNS: &[&str] = &["id", "title", "subtitle", "adding_time"];

const TODO_ITEM_SELECT_SQL: &str = "SELECT
    id,
    title,
    subtitle,
    adding_time
FROM todo_items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure for todo item storage.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TodoItemId),
    InvalidData(String),
    /// Connection was not opened through `open_db*` or is behind on migrations.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo item: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence backend contract for todo items.
pub trait TodoItemRepository {
    fn insert_item(&self, item: &TodoItem) -> RepoResult<TodoItemId>;
    /// Persists `title` and `subtitle` of an existing record.
    fn update_item(&self, item: &TodoItem) -> RepoResult<()>;
    fn get_item(&self, id: TodoItemId) -> RepoResult<Option<TodoItem>>;
    fn list_items(&self) -> RepoResult<Vec<TodoItem>>;
    fn delete_item(&self, id: TodoItemId) -> RepoResult<()>;
}

/// SQLite-backed todo item repository.
pub struct SqliteTodoItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoItemRepository<'conn> {
    /// Wraps a connection after checking that its schema is usable.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl TodoItemRepository for SqliteTodoItemRepository<'_> {
    fn insert_item(&self, item: &TodoItem) -> RepoResult<TodoItemId> {
        self.conn.execute(
            "INSERT INTO todo_items (id, title, subtitle, adding_time)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.to_string(),
                item.title.as_str(),
                item.subtitle.as_str(),
                item.adding_time,
            ],
        )?;

        Ok(item.id)
    }

    fn update_item(&self, item: &TodoItem) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE todo_items
             SET title = ?1, subtitle = ?2
             WHERE id = ?3;",
            params![
                item.title.as_str(),
                item.subtitle.as_str(),
                item.id.to_string()
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        Ok(())
    }

    fn get_item(&self, id: TodoItemId) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_items(&self) -> RepoResult<Vec<TodoItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_ITEM_SELECT_SQL} ORDER BY adding_time ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_todo_row(row)?);
        }

        Ok(items)
    }

    fn delete_item(&self, id: TodoItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todo_items WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in todo_items.id"))
    })?;

    let item = TodoItem {
        id,
        title: row.get("title")?,
        subtitle: row.get("subtitle")?,
        adding_time: row.get("adding_time")?,
    };
    item.validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} (todo_items.id = {id})")))?;
    Ok(item)
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [TODO_ITEMS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(TODO_ITEMS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([TODO_ITEMS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name.as_str() == *column) {
            return Err(RepoError::MissingRequiredColumn {
                table: TODO_ITEMS_TABLE,
                column: *column,
            });
        }
    }

    Ok(())
}
