//! Entity model: the typed scene objects mirrored from the remote process.
//!
//! Entities arrive on the wire as JSON field bags discriminated by a `type`
//! key. They are modeled here as a closed sum type (variant data lives in
//! [`EntityKind`], common fields on [`Entity`]) so that every consumer goes
//! through one exhaustive match instead of probing string keys at runtime.
//! Fields outside the active variant are ignored on ingest, never erased by
//! us: the remote table is the authority and each snapshot rebuilds ours.

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A point or offset in scene-space units (not device pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in scene-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Variant-specific entity payload, discriminated by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    /// Filled rectangle.
    Rect {
        size: Size,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Text label.
    Text {
        content: String,
        #[serde(rename = "fontSize", default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Inline SVG markup drawn into a fixed box.
    Svg { size: Size, content: String },
    /// Editable text field.
    TextInput {
        size: Size,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        disabled: Option<bool>,
    },
}

/// A scene entity as mirrored from the remote process.
///
/// `id` is unique within a scene and only ever changes through an explicit
/// rename; `scripts` maps event names (`on_click`, `on_change`, ...) to
/// source text; the keys are the only identity, ordering carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub pos: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub selectable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scripts: BTreeMap<String, String>,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    /// Effective rotation in degrees; entities without one are unrotated.
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.unwrap_or(0.0)
    }

    /// Effective stacking layer; entities without one sit on layer 0.
    #[must_use]
    pub fn layer_or_default(&self) -> i64 {
        self.layer.unwrap_or(0)
    }
}

/// Renderer-facing attributes derived from an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualState {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub layer: i64,
    pub selectable: bool,
    pub size: Option<Size>,
    pub color: Option<String>,
    pub content: Option<String>,
    pub placeholder: Option<String>,
    pub font_size: Option<f64>,
    pub disabled: bool,
}

/// Derive the full set of visual attributes for one entity.
///
/// The single place where variant data fans out to renderer attributes;
/// callers must not re-derive these from the variant themselves.
#[must_use]
pub fn visual_state(entity: &Entity) -> VisualState {
    let base = VisualState {
        x: entity.pos.x,
        y: entity.pos.y,
        rotation: entity.rotation_degrees(),
        layer: entity.layer_or_default(),
        selectable: entity.selectable,
        ..VisualState::default()
    };

    match &entity.kind {
        EntityKind::Rect { size, color } => VisualState {
            size: Some(*size),
            color: color.clone(),
            ..base
        },
        EntityKind::Text { content, font_size, color } => VisualState {
            content: Some(content.clone()),
            font_size: *font_size,
            color: color.clone(),
            ..base
        },
        EntityKind::Svg { size, content } => VisualState {
            size: Some(*size),
            content: Some(content.clone()),
            ..base
        },
        EntityKind::TextInput { size, placeholder, disabled } => VisualState {
            size: Some(*size),
            placeholder: placeholder.clone(),
            disabled: disabled.unwrap_or(false),
            ..base
        },
    }
}
