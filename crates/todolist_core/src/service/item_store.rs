//! Item store: durable CRUD for todo items.
//!
//! # Responsibility
//! - Build new records (identity + timestamp) and hand them to the backend.
//! - Apply title/subtitle edits to caller-held items only after they persist.
//!
//! # Invariants
//! - Every mutation is persisted immediately; nothing is batched.
//! - The store does not validate titles; callers check with
//!   `validate_title` first.
//! - A failed `update` leaves the caller's item untouched.

use crate::model::todo_item::{TodoItem, TodoItemId};
use crate::repo::todo_repo::{RepoResult, TodoItemRepository};
use log::{debug, error, info};

/// Use-case service over a todo item repository.
pub struct ItemStore<R: TodoItemRepository> {
    repo: R,
}

impl<R: TodoItemRepository> ItemStore<R> {
    /// Creates a store using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates and persists a new item stamped with the current time.
    ///
    /// Returns the id of the created record.
    pub fn create(
        &self,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> RepoResult<TodoItemId> {
        let item = TodoItem::new(title, subtitle);
        match self.repo.insert_item(&item) {
            Ok(id) => {
                info!("event=item_create module=store status=ok item_id={id}");
                Ok(id)
            }
            Err(err) => {
                error!("event=item_create module=store status=error error={err}");
                Err(err)
            }
        }
    }

    /// Creates an item with an empty subtitle.
    pub fn create_titled(&self, title: impl Into<String>) -> RepoResult<TodoItemId> {
        self.create(title, String::new())
    }

    /// Returns every stored item in backend order.
    pub fn fetch_all(&self) -> RepoResult<Vec<TodoItem>> {
        let items = self.repo.list_items().map_err(|err| {
            error!("event=item_fetch_all module=store status=error error={err}");
            err
        })?;
        debug!(
            "event=item_fetch_all module=store status=ok count={}",
            items.len()
        );
        Ok(items)
    }

    /// Looks up one item by id.
    pub fn get(&self, id: TodoItemId) -> RepoResult<Option<TodoItem>> {
        self.repo.get_item(id)
    }

    /// Replaces `title` and `subtitle` of `item` and persists the change.
    ///
    /// `item` is only modified once the backend accepted the write.
    pub fn update(
        &self,
        item: &mut TodoItem,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> RepoResult<()> {
        let edited = TodoItem {
            title: title.into(),
            subtitle: subtitle.into(),
            ..item.clone()
        };

        if let Err(err) = self.repo.update_item(&edited) {
            error!(
                "event=item_update module=store status=error item_id={} error={err}",
                item.id
            );
            return Err(err);
        }

        info!(
            "event=item_update module=store status=ok item_id={}",
            item.id
        );
        *item = edited;
        Ok(())
    }

    /// Removes the record with `id`.
    pub fn delete(&self, id: TodoItemId) -> RepoResult<()> {
        match self.repo.delete_item(id) {
            Ok(()) => {
                info!("event=item_delete module=store status=ok item_id={id}");
                Ok(())
            }
            Err(err) => {
                error!("event=item_delete module=store status=error item_id={id} error={err}");
                Err(err)
            }
        }
    }
}
