#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn rect_entity() -> Entity {
    Entity {
        id: "box".to_owned(),
        pos: Vec2::new(10.0, 20.0),
        rotation: Some(45.0),
        selectable: true,
        layer: Some(2),
        scripts: BTreeMap::new(),
        kind: EntityKind::Rect {
            size: Size { width: 100.0, height: 50.0 },
            color: Some("#d94b4b".to_owned()),
        },
    }
}

// =============================================================
// Serde: tagging and defaults
// =============================================================

#[test]
fn rect_round_trip_keeps_lowercase_tag() {
    let entity = rect_entity();
    let encoded = serde_json::to_string(&entity).expect("serialize");
    assert!(encoded.contains("\"type\":\"rect\""));

    let back: Entity = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(back, entity);
}

#[test]
fn text_input_uses_snake_case_tag() {
    let raw = json!({
        "id": "name-field",
        "type": "text_input",
        "pos": {"x": 0.0, "y": 0.0},
        "size": {"width": 120.0, "height": 24.0},
        "placeholder": "your name"
    });
    let entity: Entity = serde_json::from_value(raw).expect("deserialize");
    match &entity.kind {
        EntityKind::TextInput { placeholder, disabled, .. } => {
            assert_eq!(placeholder.as_deref(), Some("your name"));
            assert_eq!(*disabled, None);
        }
        other => panic!("wrong variant: {other:?}"),
    }
}

#[test]
fn optional_common_fields_default() {
    let raw = json!({
        "id": "label",
        "type": "text",
        "pos": {"x": 1.0, "y": 2.0},
        "content": "hello"
    });
    let entity: Entity = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(entity.rotation, None);
    assert!(!entity.selectable);
    assert_eq!(entity.layer, None);
    assert!(entity.scripts.is_empty());
    assert_eq!(entity.rotation_degrees(), 0.0);
    assert_eq!(entity.layer_or_default(), 0);
}

#[test]
fn font_size_round_trips_under_wire_name() {
    let raw = json!({
        "id": "label",
        "type": "text",
        "pos": {"x": 0.0, "y": 0.0},
        "content": "hi",
        "fontSize": 18.0
    });
    let entity: Entity = serde_json::from_value(raw).expect("deserialize");
    let EntityKind::Text { font_size, .. } = &entity.kind else {
        panic!("wrong variant");
    };
    assert_eq!(*font_size, Some(18.0));

    let encoded = serde_json::to_string(&entity).expect("serialize");
    assert!(encoded.contains("\"fontSize\":18.0"));
}

#[test]
fn scripts_round_trip_by_key() {
    let mut entity = rect_entity();
    entity
        .scripts
        .insert("on_click".to_owned(), "print('hi')".to_owned());
    let encoded = serde_json::to_value(&entity).expect("serialize");
    assert_eq!(encoded["scripts"]["on_click"], "print('hi')");

    let back: Entity = serde_json::from_value(encoded).expect("deserialize");
    assert_eq!(back.scripts, entity.scripts);
}

#[test]
fn unknown_type_rejects() {
    let raw = json!({
        "id": "mystery",
        "type": "hexagon",
        "pos": {"x": 0.0, "y": 0.0}
    });
    assert!(serde_json::from_value::<Entity>(raw).is_err());
}

#[test]
fn rect_without_size_rejects() {
    let raw = json!({
        "id": "box",
        "type": "rect",
        "pos": {"x": 0.0, "y": 0.0}
    });
    assert!(serde_json::from_value::<Entity>(raw).is_err());
}

#[test]
fn fields_outside_the_variant_are_ignored() {
    // A text payload carrying rect leftovers still parses as text.
    let raw = json!({
        "id": "label",
        "type": "text",
        "pos": {"x": 0.0, "y": 0.0},
        "content": "hi",
        "placeholder": "stale"
    });
    let entity: Entity = serde_json::from_value(raw).expect("deserialize");
    assert!(matches!(entity.kind, EntityKind::Text { .. }));
}

// =============================================================
// visual_state
// =============================================================

#[test]
fn visual_state_rect() {
    let vs = visual_state(&rect_entity());
    assert_eq!(vs.x, 10.0);
    assert_eq!(vs.y, 20.0);
    assert_eq!(vs.rotation, 45.0);
    assert_eq!(vs.layer, 2);
    assert!(vs.selectable);
    assert_eq!(vs.size, Some(Size { width: 100.0, height: 50.0 }));
    assert_eq!(vs.color.as_deref(), Some("#d94b4b"));
    assert_eq!(vs.content, None);
}

#[test]
fn visual_state_text() {
    let entity = Entity {
        id: "label".to_owned(),
        pos: Vec2::new(5.0, 6.0),
        rotation: None,
        selectable: false,
        layer: None,
        scripts: BTreeMap::new(),
        kind: EntityKind::Text {
            content: "hello".to_owned(),
            font_size: Some(14.0),
            color: None,
        },
    };
    let vs = visual_state(&entity);
    assert_eq!(vs.content.as_deref(), Some("hello"));
    assert_eq!(vs.font_size, Some(14.0));
    assert_eq!(vs.size, None);
    assert_eq!(vs.rotation, 0.0);
    assert_eq!(vs.layer, 0);
}

#[test]
fn visual_state_svg_carries_markup_and_box() {
    let entity = Entity {
        id: "icon".to_owned(),
        pos: Vec2::new(0.0, 0.0),
        rotation: None,
        selectable: false,
        layer: None,
        scripts: BTreeMap::new(),
        kind: EntityKind::Svg {
            size: Size { width: 24.0, height: 24.0 },
            content: "<svg/>".to_owned(),
        },
    };
    let vs = visual_state(&entity);
    assert_eq!(vs.content.as_deref(), Some("<svg/>"));
    assert_eq!(vs.size, Some(Size { width: 24.0, height: 24.0 }));
}

#[test]
fn visual_state_text_input_disabled_defaults_false() {
    let entity = Entity {
        id: "field".to_owned(),
        pos: Vec2::new(0.0, 0.0),
        rotation: None,
        selectable: true,
        layer: None,
        scripts: BTreeMap::new(),
        kind: EntityKind::TextInput {
            size: Size { width: 120.0, height: 24.0 },
            placeholder: Some("type here".to_owned()),
            disabled: None,
        },
    };
    let vs = visual_state(&entity);
    assert!(!vs.disabled);
    assert_eq!(vs.placeholder.as_deref(), Some("type here"));
}
