use todolist_core::{validate_title, TodoItem, TodoItemValidationError};
use uuid::Uuid;

#[test]
fn new_item_gets_identity_and_timestamp() {
    let item = TodoItem::new("Buy milk", "2%");

    assert!(!item.id.is_nil());
    assert_eq!(item.title, "Buy milk");
    assert_eq!(item.subtitle, "2%");
    assert!(item.adding_time > 0);
    assert!(item.validate().is_ok());
}

#[test]
fn each_new_item_has_a_distinct_id() {
    let first = TodoItem::new("same", "");
    let second = TodoItem::new("same", "");
    assert_ne!(first.id, second.id);
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = TodoItem::with_id(Uuid::nil(), "title", "", 1).unwrap_err();
    assert_eq!(err, TodoItemValidationError::NilId);
}

#[test]
fn validate_title_rejects_only_empty_text() {
    assert_eq!(validate_title(""), Err(TodoItemValidationError::EmptyTitle));
    assert!(validate_title("x").is_ok());

    let item = TodoItem::new("", "subtitle only");
    assert_eq!(item.validate(), Err(TodoItemValidationError::EmptyTitle));
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let item = TodoItem::with_id(id, "Buy milk", "2%", 1_700_000_000_000).unwrap();

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Buy milk");
    assert_eq!(json["subtitle"], "2%");
    assert_eq!(json["adding_time"], 1_700_000_000_000_i64);

    let decoded: TodoItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}
