//! List controller: cached item list plus create/update/delete intents.
//!
//! # Responsibility
//! - Load all items on construction and after every successful mutation.
//! - Notify the presentation observer whenever the cache is replaced.
//! - Reject empty titles before they reach the store.
//!
//! # Invariants
//! - The cache is replaced wholesale, never patched.
//! - A failed operation leaves the cache exactly as it was.
//! - Persistence errors are logged and reported as `false`, never returned.

use crate::model::todo_item::{validate_title, TodoItem, TodoItemId};
use crate::repo::todo_repo::TodoItemRepository;
use crate::service::item_store::ItemStore;
use log::{error, warn};

/// Receives the new item list every time the controller cache changes.
///
/// Called synchronously on the thread that issued the request.
pub trait ListObserver {
    fn items_changed(&self, items: &[TodoItem]);
}

impl<F> ListObserver for F
where
    F: Fn(&[TodoItem]),
{
    fn items_changed(&self, items: &[TodoItem]) {
        self(items);
    }
}

/// Presentation-facing owner of the item cache.
pub struct ListController<R: TodoItemRepository> {
    store: ItemStore<R>,
    items: Vec<TodoItem>,
    observer: Option<Box<dyn ListObserver>>,
}

impl<R: TodoItemRepository> ListController<R> {
    /// Creates a controller without an observer and loads all items.
    pub fn new(store: ItemStore<R>) -> Self {
        Self::build(store, None)
    }

    /// Creates a controller that reports cache changes to `observer`.
    pub fn with_observer(store: ItemStore<R>, observer: impl ListObserver + 'static) -> Self {
        Self::build(store, Some(Box::new(observer)))
    }

    fn build(store: ItemStore<R>, observer: Option<Box<dyn ListObserver>>) -> Self {
        let mut controller = Self {
            store,
            items: Vec::new(),
            observer,
        };
        controller.reload();
        controller
    }

    /// Current cached items, in backend order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Looks up a cached item by id.
    pub fn item(&self, id: TodoItemId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Re-fetches all items from the store.
    ///
    /// Returns `false` and keeps the previous cache when the fetch fails.
    pub fn reload(&mut self) -> bool {
        match self.store.fetch_all() {
            Ok(items) => {
                self.replace_items(items);
                true
            }
            Err(err) => {
                error!("event=list_reload module=controller status=error error={err}");
                false
            }
        }
    }

    /// Handles a create intent from the UI.
    ///
    /// Returns whether the item was persisted. A failed follow-up reload is
    /// logged but does not turn a persisted create into `false`.
    pub fn request_create(&mut self, title: &str, subtitle: &str) -> bool {
        if let Err(err) = validate_title(title) {
            warn!("event=list_create module=controller status=rejected reason={err}");
            return false;
        }

        match self.store.create(title, subtitle) {
            Ok(_) => {
                self.reload();
                true
            }
            Err(err) => {
                error!("event=list_create module=controller status=error error={err}");
                false
            }
        }
    }

    /// Handles a delete intent for a row.
    pub fn request_delete(&mut self, id: TodoItemId) -> bool {
        match self.store.delete(id) {
            Ok(()) => {
                self.reload();
                true
            }
            Err(err) => {
                error!(
                    "event=list_delete module=controller status=error item_id={id} error={err}"
                );
                false
            }
        }
    }

    /// Handles an edit intent for a cached row.
    ///
    /// Ids that are not in the cache are ignored.
    pub fn request_update(&mut self, id: TodoItemId, title: &str, subtitle: &str) -> bool {
        if let Err(err) = validate_title(title) {
            warn!(
                "event=list_update module=controller status=rejected item_id={id} reason={err}"
            );
            return false;
        }

        let Some(mut item) = self.item(id).cloned() else {
            warn!(
                "event=list_update module=controller status=rejected item_id={id} reason=unknown_item"
            );
            return false;
        };

        match self.store.update(&mut item, title, subtitle) {
            Ok(()) => {
                self.reload();
                true
            }
            Err(err) => {
                error!(
                    "event=list_update module=controller status=error item_id={id} error={err}"
                );
                false
            }
        }
    }

    fn replace_items(&mut self, items: Vec<TodoItem>) {
        self.items = items;
        if let Some(observer) = &self.observer {
            observer.items_changed(&self.items);
        }
    }
}
