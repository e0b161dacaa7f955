//! Domain model for the todo list.
//!
//! # Responsibility
//! - Define the single persisted entity (`TodoItem`) and its identity.
//!
//! # Invariants
//! - Every item is identified by an explicit `TodoItemId`, compared by value.
//! - Deletion removes the record; there are no tombstones.

pub mod todo_item;
