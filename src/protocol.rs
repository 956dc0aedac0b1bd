//! Syscall vocabulary: the frames this client sends and dispatches on.
//!
//! Every outbound operation has one typed constructor here so the session
//! never assembles payload shapes inline. Inbound syscalls the client
//! consumes are named alongside for the dispatch match.

#[cfg(test)]
#[path = "protocol_test.rs"]
mod protocol_test;

use frames::Frame;
use scene::diff::ChangeSet;
use scene::entity::{Entity, Vec2};
use scene::viewport::ResizeRequest;
use serde_json::{Value, json};

// =============================================================================
// INBOUND SYSCALLS
// =============================================================================

/// Full scene snapshot: data maps entity id → field bag.
pub const SCENE_UPDATE: &str = "scene:update";

/// Host window resize notification.
pub const WINDOW_RESIZE: &str = "window:resize";

/// Backend-rendered textual form of an entity, for the inspector.
pub const ENTITY_STRING: &str = "entity:string";

// =============================================================================
// OUTBOUND SYSCALLS
// =============================================================================

pub const ENTITY_UPDATE: &str = "entity:update";
pub const ENTITY_CREATE: &str = "entity:create";
pub const ENTITY_RENAME: &str = "entity:rename";
pub const ENTITY_DELETE: &str = "entity:delete";
pub const ENTITY_DUPLICATE: &str = "entity:duplicate";
pub const SCRIPT_RUN: &str = "script:run";
pub const SCENE_SAVE: &str = "scene:save";
pub const SCENE_LOAD: &str = "scene:load";
pub const SCENE_TICK: &str = "scene:tick";
pub const WINDOW_RESIZE_REQUEST: &str = "window:resize_request";

// =============================================================================
// CONSTRUCTORS
// =============================================================================

/// One gesture drag sample: the full target position.
#[must_use]
pub fn position_update(id: &str, pos: Vec2) -> Frame {
    Frame::request(
        ENTITY_UPDATE,
        json!({ "id": id, "data": { "pos": { "x": pos.x, "y": pos.y } } }),
    )
}

/// One gesture rotation sample: the full target angle in degrees.
#[must_use]
pub fn rotation_update(id: &str, rotation: f64) -> Frame {
    Frame::request(
        ENTITY_UPDATE,
        json!({ "id": id, "data": { "rotation": rotation } }),
    )
}

/// Property update from a change-set. `complete` signals whole-object
/// replace intent rather than a partial patch; callers must pick explicitly.
#[must_use]
pub fn update_entity(id: &str, change: &ChangeSet, complete: bool) -> Frame {
    let mut data = change.fields.clone();
    if let Some(scripts) = &change.scripts {
        data.insert("scripts".to_owned(), json!(scripts));
    }

    let mut payload = json!({ "id": id, "data": Value::Object(data) });
    if complete {
        payload["complete"] = Value::Bool(true);
    }
    Frame::request(ENTITY_UPDATE, payload)
}

/// Create an entity. The caller is responsible for id uniqueness.
///
/// # Errors
///
/// Fails only if the entity cannot be serialized, which a well-formed
/// [`Entity`] never is.
pub fn create_entity(entity: &Entity) -> Result<Frame, serde_json::Error> {
    Ok(Frame::request(
        ENTITY_CREATE,
        json!({ "data": serde_json::to_value(entity)? }),
    ))
}

/// Rename an entity. Always issued before the property update it precedes.
#[must_use]
pub fn rename_entity(original_id: &str, new_id: &str) -> Frame {
    Frame::request(
        ENTITY_RENAME,
        json!({ "original_id": original_id, "new_id": new_id }),
    )
}

#[must_use]
pub fn delete_entity(id: &str) -> Frame {
    Frame::request(ENTITY_DELETE, json!({ "id": id }))
}

#[must_use]
pub fn duplicate_entity(id: &str) -> Frame {
    Frame::request(ENTITY_DUPLICATE, json!({ "id": id }))
}

/// Invoke an entity script (e.g. `on_click`) with JSON params.
#[must_use]
pub fn run_script(id: &str, function: &str, params: Value) -> Frame {
    Frame::request(
        SCRIPT_RUN,
        json!({ "id": id, "function": function, "params": params }),
    )
}

#[must_use]
pub fn save_scene(path: &str) -> Frame {
    Frame::request(SCENE_SAVE, json!({ "path": path }))
}

#[must_use]
pub fn load_scene(path: &str) -> Frame {
    Frame::request(SCENE_LOAD, json!({ "path": path }))
}

/// Heartbeat tick carrying elapsed seconds since the previous frame.
#[must_use]
pub fn tick(dt: f64) -> Frame {
    Frame::request(SCENE_TICK, json!({ "dt": dt }))
}

/// Ask the backend for the rendered textual form of an entity.
#[must_use]
pub fn request_entity_string(id: &str, window: &str) -> Frame {
    Frame::request(ENTITY_STRING, json!({ "id": id, "window": window }))
}

/// Snap the host window to the size the scale controller derived.
#[must_use]
pub fn resize_request(request: ResizeRequest) -> Frame {
    Frame::request(
        WINDOW_RESIZE_REQUEST,
        json!({ "width": request.width, "height": request.height }),
    )
}
