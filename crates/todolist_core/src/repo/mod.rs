//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence backend contract used by the item store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod todo_repo;
