//! Scene session: client-side orchestration for one scene view.
//!
//! DESIGN
//! ======
//! The session owns the mirror, the selection/gesture machine, the scale
//! controller, and the open inspector draft, and is the single dispatch
//! point for inbound frames. Handlers return the frames to send rather than
//! sending them, so the whole session is synchronous and testable without a
//! transport. Each handler validates its own preconditions ("is this resize
//! for my window", "is the selected entity still present") instead of
//! assuming an invariant held across awaits.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use frames::{Frame, Status};
use scene::diff::{DiffError, compute_change_set};
use scene::entity::{Entity, Vec2};
use scene::gesture::{GestureUpdate, SelectionState};
use scene::inspector::InspectorDraft;
use scene::store::SceneStore;
use scene::viewport::{ResizeEvent, ViewportScale};

use crate::protocol;

/// Why a session operation could not produce commands.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error("no inspector draft is open")]
    NoDraft,
    #[error("entity {0} is no longer in the scene")]
    MissingBaseline(String),
    #[error("entity could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A save whose confirmation is still outstanding. The draft's baseline id
/// advances only when the terminal reply for `frame_id` comes back done.
#[derive(Debug, Clone)]
struct PendingSave {
    frame_id: String,
    new_id: String,
}

/// Client-side state for one scene view.
pub struct SceneSession {
    window: String,
    store: SceneStore,
    selection: SelectionState,
    viewport: ViewportScale,
    draft: Option<InspectorDraft>,
    pending_save: Option<PendingSave>,
}

impl SceneSession {
    /// Create a session owning the given window label.
    #[must_use]
    pub fn new(window: impl Into<String>) -> Self {
        let window = window.into();
        Self {
            viewport: ViewportScale::new(window.clone()),
            window,
            store: SceneStore::new(),
            selection: SelectionState::new(),
            draft: None,
            pending_save: None,
        }
    }

    // --- Inbound dispatch ---

    /// Dispatch one inbound frame, returning any frames to send back.
    pub fn handle_frame(&mut self, frame: &Frame) -> Vec<Frame> {
        if frame.status.is_terminal() {
            self.handle_reply(frame);
            return Vec::new();
        }

        match frame.syscall.as_str() {
            protocol::SCENE_UPDATE => self.handle_snapshot(frame),
            protocol::WINDOW_RESIZE => self.handle_resize(frame),
            protocol::ENTITY_STRING if frame.status != Status::Request => {
                self.handle_entity_string(frame);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_snapshot(&mut self, frame: &Frame) -> Vec<Frame> {
        let Some(raw) = frame.data.as_object() else {
            tracing::warn!("scene update payload is not an object; ignoring");
            return Vec::new();
        };

        let rejected = self.store.apply_snapshot(raw);
        if !rejected.is_empty() {
            tracing::warn!(ids = ?rejected, "snapshot entries dropped as malformed");
        }
        // A snapshot always wins; the selection must never outlive its entity.
        self.selection.revalidate(&self.store);
        Vec::new()
    }

    fn handle_resize(&mut self, frame: &Frame) -> Vec<Frame> {
        let event = match serde_json::from_value::<ResizeEvent>(frame.data.clone()) {
            Ok(event) => event,
            Err(error) => {
                tracing::debug!(%error, "ignoring malformed resize event");
                return Vec::new();
            }
        };

        let Some(request) = self.viewport.handle_resize(&event) else {
            // Foreign window; not ours to react to.
            return Vec::new();
        };
        self.selection.clear();
        vec![protocol::resize_request(request)]
    }

    fn handle_entity_string(&mut self, frame: &Frame) {
        let (Some(id), Some(table)) = (frame.data_str("id"), frame.data_str("table")) else {
            tracing::warn!("entity string payload missing id or table");
            return;
        };
        match self.store.get(id) {
            Some(entity) => self.draft = Some(InspectorDraft::seed(entity, table)),
            None => tracing::debug!(id, "entity string for unknown entity ignored"),
        }
    }

    fn handle_reply(&mut self, frame: &Frame) {
        let pending_matches = self
            .pending_save
            .as_ref()
            .is_some_and(|pending| frame.parent_id.as_deref() == Some(pending.frame_id.as_str()));

        match frame.status {
            Status::Done if pending_matches => {
                if let Some(pending) = self.pending_save.take() {
                    if let Some(draft) = self.draft.as_mut() {
                        draft.confirm_saved(pending.new_id);
                    }
                }
            }
            Status::Error => {
                tracing::warn!(
                    syscall = %frame.syscall,
                    message = frame.data_str(frames::FRAME_MESSAGE).unwrap_or("unknown"),
                    "backend rejected command"
                );
                // A rejected save leaves the draft dirty and unsynced until
                // the next snapshot.
                if pending_matches {
                    self.pending_save = None;
                }
            }
            _ => {}
        }
    }

    // --- Pointer input ---

    /// Pointer-down on an entity (or `None` for empty background).
    pub fn pointer_down(&mut self, target_id: Option<&str>) {
        let target = target_id.and_then(|id| self.store.get(id));
        self.selection.pointer_down(target);
    }

    /// Begin dragging the current selection.
    pub fn begin_drag(&mut self) {
        self.selection.begin_drag();
    }

    /// Begin rotating the current selection.
    pub fn begin_rotate(&mut self) {
        self.selection.begin_rotate();
    }

    /// One raw drag delta in device px; returns the update frame to send.
    pub fn drag_sample(&mut self, raw: Vec2) -> Option<Frame> {
        let scale = self.viewport.transform_scale();
        self.selection
            .drag_sample(&self.store, scale, raw)
            .map(update_frame)
    }

    /// One raw rotation delta in degrees; returns the update frame to send.
    pub fn rotate_sample(&mut self, raw_delta: f64) -> Option<Frame> {
        self.selection
            .rotate_sample(&self.store, raw_delta)
            .map(update_frame)
    }

    /// Pointer released; selection survives, gesture baseline does not.
    pub fn pointer_up(&mut self) {
        self.selection.pointer_up();
    }

    // --- Entity commands ---

    /// Create an entity, disambiguating its id against the mirror.
    ///
    /// # Errors
    ///
    /// Fails only if the entity cannot be encoded.
    pub fn create_entity(&self, mut entity: Entity) -> Result<Frame, SessionError> {
        entity.id = self.store.unique_id(&entity.id);
        Ok(protocol::create_entity(&entity)?)
    }

    // --- Inspector ---

    /// Ask the backend to render an entity for inspection; the reply seeds
    /// the draft.
    #[must_use]
    pub fn open_inspector(&self, id: &str) -> Frame {
        protocol::request_entity_string(id, &self.window)
    }

    /// Discard draft edits by requesting a fresh render of the baseline.
    ///
    /// # Errors
    ///
    /// Fails when no draft is open.
    pub fn revert_draft(&self) -> Result<Frame, SessionError> {
        let Some(draft) = self.draft.as_ref() else {
            return Err(SessionError::NoDraft);
        };
        Ok(protocol::request_entity_string(draft.entity_id(), &self.window))
    }

    /// Diff the draft against its baseline and emit the save commands:
    /// a rename first if the id changed, then the property update addressed
    /// to the new id. An unchanged draft emits nothing and is confirmed
    /// locally. Nothing is mutated on error.
    ///
    /// # Errors
    ///
    /// Fails when no draft is open, the baseline entity left the scene, or
    /// the draft text does not parse.
    pub fn save_draft(&mut self) -> Result<Vec<Frame>, SessionError> {
        let Some(draft) = self.draft.as_ref() else {
            return Err(SessionError::NoDraft);
        };
        let baseline = self
            .store
            .get(draft.entity_id())
            .ok_or_else(|| SessionError::MissingBaseline(draft.entity_id().to_owned()))?;

        let change = compute_change_set(baseline, draft.fields_text(), draft.scripts())?;

        if change.is_empty() {
            // Intentional no-op save: nothing travels, the draft is in sync.
            let id = draft.entity_id().to_owned();
            if let Some(draft) = self.draft.as_mut() {
                draft.confirm_saved(id);
            }
            return Ok(Vec::new());
        }

        let target_id = change
            .rename
            .as_ref()
            .map_or_else(|| baseline.id.clone(), |rename| rename.new_id.clone());

        let mut frames = Vec::new();
        if let Some(rename) = &change.rename {
            frames.push(protocol::rename_entity(&rename.original_id, &rename.new_id));
        }
        if !change.fields.is_empty() || change.scripts.is_some() {
            frames.push(protocol::update_entity(&target_id, &change, false));
        }

        if let Some(last) = frames.last() {
            self.pending_save = Some(PendingSave { frame_id: last.id.clone(), new_id: target_id });
        }
        Ok(frames)
    }

    // --- Queries ---

    /// The window label this session owns.
    #[must_use]
    pub fn window(&self) -> &str {
        &self.window
    }

    /// The mirrored entity table.
    #[must_use]
    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// The selection/gesture state.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The scale controller.
    #[must_use]
    pub fn viewport(&self) -> &ViewportScale {
        &self.viewport
    }

    /// The open inspector draft, if any.
    #[must_use]
    pub fn draft(&self) -> Option<&InspectorDraft> {
        self.draft.as_ref()
    }

    /// Mutable access for draft edits from the inspector UI.
    #[must_use]
    pub fn draft_mut(&mut self) -> Option<&mut InspectorDraft> {
        self.draft.as_mut()
    }
}

fn update_frame(update: GestureUpdate) -> Frame {
    match update {
        GestureUpdate::Position { id, pos } => protocol::position_update(&id, pos),
        GestureUpdate::Rotation { id, rotation } => protocol::rotation_update(&id, rotation),
    }
}
