use super::*;

use serde_json::json;

// =============================================================
// Constructors
// =============================================================

#[test]
fn request_sets_fields() {
    let frame = Frame::request("scene:load", json!({}));
    assert_eq!(frame.syscall, "scene:load");
    assert_eq!(frame.status, Status::Request);
    assert!(frame.parent_id.is_none());
    assert!(frame.scene_id.is_none());
    assert!(frame.ts > 0);
    assert!(!frame.id.is_empty());
}

#[test]
fn request_ids_are_unique() {
    let a = Frame::request("scene:tick", json!({}));
    let b = Frame::request("scene:tick", json!({}));
    assert_ne!(a.id, b.id);
}

#[test]
fn reply_inherits_context() {
    let req = Frame::request("entity:create", json!({})).with_scene_id("main");
    let item = req.item(json!({"id": "box"}));

    assert_eq!(item.parent_id.as_deref(), Some(req.id.as_str()));
    assert_eq!(item.scene_id.as_deref(), Some("main"));
    assert_eq!(item.syscall, "entity:create");
    assert_eq!(item.status, Status::Item);
}

#[test]
fn done_is_terminal() {
    assert!(Status::Done.is_terminal());
    assert!(Status::Error.is_terminal());
    assert!(Status::Cancel.is_terminal());
    assert!(!Status::Request.is_terminal());
    assert!(!Status::Item.is_terminal());
    assert!(!Status::Bulk.is_terminal());
}

#[test]
fn error_carries_message() {
    let req = Frame::request("entity:update", json!({}));
    let err = req.error("no such entity");
    assert_eq!(err.status, Status::Error);
    assert_eq!(err.data_str(FRAME_MESSAGE), Some("no such entity"));
}

#[test]
fn error_from_typed() {
    #[derive(Debug, thiserror::Error)]
    #[error("entity not found")]
    struct NotFound;

    impl ErrorCode for NotFound {
        fn error_code(&self) -> &'static str {
            "E_ENTITY_NOT_FOUND"
        }
    }

    let req = Frame::request("entity:string", json!({}));
    let err = req.error_from(&NotFound);

    assert_eq!(err.status, Status::Error);
    assert_eq!(err.data_str(FRAME_CODE), Some("E_ENTITY_NOT_FOUND"));
    assert_eq!(err.data_str(FRAME_MESSAGE), Some("entity not found"));
    assert_eq!(
        err.data.get(FRAME_RETRYABLE).and_then(Value::as_bool),
        Some(false)
    );
}

#[test]
fn cancel_references_target() {
    let req = Frame::request("script:run", json!({}));
    let cancel = Frame::cancel(&req.id);

    assert_eq!(cancel.parent_id.as_deref(), Some(req.id.as_str()));
    assert_eq!(cancel.status, Status::Cancel);
    assert!(cancel.status.is_terminal());
}

// =============================================================
// Builders and routing
// =============================================================

#[test]
fn with_data_inserts_into_payload() {
    let frame = Frame::request("entity:delete", json!({}))
        .with_data("id", "box")
        .with_from("scene-window");
    assert_eq!(frame.data_str("id"), Some("box"));
    assert_eq!(frame.from.as_deref(), Some("scene-window"));
}

#[test]
fn with_data_leaves_non_object_payload_alone() {
    let frame = Frame::request("scene:tick", json!(0.016)).with_data("extra", 1);
    assert_eq!(frame.data, json!(0.016));
}

#[test]
fn prefix_extraction() {
    let frame = Frame::request("entity:create", json!({}));
    assert_eq!(frame.prefix(), "entity");

    let frame = Frame::request("noseparator", json!({}));
    assert_eq!(frame.prefix(), "noseparator");
}

#[test]
fn data_str_rejects_non_strings() {
    let frame = Frame::request("entity:update", json!({"id": 7}));
    assert_eq!(frame.data_str("id"), None);
    assert_eq!(frame.data_str("missing"), None);
}

// =============================================================
// Serde
// =============================================================

#[test]
fn json_round_trip() {
    let original = Frame::request("scene:load", json!({}))
        .with_scene_id("main")
        .with_from("test-window")
        .with_data("path", "scenes/intro.txt");

    let encoded = serde_json::to_string(&original).expect("serialize");
    let restored: Frame = serde_json::from_str(&encoded).expect("deserialize");

    assert_eq!(restored.id, original.id);
    assert_eq!(restored.scene_id.as_deref(), Some("main"));
    assert_eq!(restored.syscall, "scene:load");
    assert_eq!(restored.from.as_deref(), Some("test-window"));
    assert_eq!(restored.data_str("path"), Some("scenes/intro.txt"));
}

#[test]
fn status_serializes_as_lowercase_json() {
    assert_eq!(
        serde_json::to_string(&Status::Request).expect("serialize"),
        "\"request\""
    );
    assert_eq!(
        serde_json::to_string(&Status::Bulk).expect("serialize"),
        "\"bulk\""
    );
}

#[test]
fn status_rejects_non_lowercase_json() {
    assert!(serde_json::from_str::<Status>("\"Error\"").is_err());
}
