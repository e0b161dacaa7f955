use rusqlite::Connection;
use todolist_core::db::migrations::{apply_migrations, current_user_version, latest_version};
use todolist_core::db::{open_db, open_db_in_memory, DbError};

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")
        .unwrap();
    stmt.query_map([table], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn item_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM todo_items;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn fresh_in_memory_database_has_todo_items_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_eq!(
        column_names(&conn, "todo_items"),
        vec!["id", "title", "subtitle", "adding_time"]
    );

    let index_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'index' AND name = 'idx_todo_items_adding_time';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(index_count, 1);
}

#[test]
fn rerunning_migrations_on_current_schema_changes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todo_items (id, title, adding_time)
         VALUES ('00000000-0000-4000-8000-000000000001', 'kept', 1);",
        [],
    )
    .unwrap();

    apply_migrations(&mut conn).unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn reopening_a_file_keeps_rows_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todolist.db");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO todo_items (id, title, subtitle, adding_time)
             VALUES ('00000000-0000-4000-8000-000000000002', 'persisted', 'x', 5);",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn file_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(
        matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version: 999, latest_supported }
                if latest_supported == latest_version()
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn subtitle_defaults_to_empty_and_title_must_be_non_empty() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todo_items (id, title, adding_time)
         VALUES ('00000000-0000-4000-8000-000000000003', 'no subtitle', 1);",
        [],
    )
    .unwrap();
    let subtitle: String = conn
        .query_row("SELECT subtitle FROM todo_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(subtitle, "");

    let rejected = conn.execute(
        "INSERT INTO todo_items (id, title, subtitle, adding_time)
         VALUES ('00000000-0000-4000-8000-000000000004', '', '', 1);",
        [],
    );
    assert!(rejected.is_err());
    assert_eq!(item_count(&conn), 1);
}
