//! Selection and the drag/rotate gesture state machine.
//!
//! Selection is single-select: picking a selectable entity replaces any
//! prior selection, and clicking empty space or a protected entity clears
//! it. Each gesture captures a baseline transform from the store at its
//! *first motion sample*, not at pointer-down (which can race a snapshot
//! still in flight), and every subsequent sample is computed against that
//! baseline. Reusing a baseline across gestures accumulates drift, so the
//! baseline dies with the gesture on pointer-up.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::DELTA_ROUND;
use crate::entity::{Entity, Vec2};
use crate::store::SceneStore;

/// Transform values captured at the first motion sample of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub pos: Vec2,
    pub rotation: f64,
}

/// The gesture currently in progress, if any.
///
/// `baseline: None` means the gesture has begun but no motion sample has
/// arrived yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging { baseline: Option<Baseline> },
    Rotating { baseline: Option<Baseline> },
}

/// An absolute transform target to forward to the remote process.
///
/// Every motion sample produces one of these; each carries the full target
/// value so a dropped or reordered update is superseded by the next.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureUpdate {
    Position { id: String, pos: Vec2 },
    Rotation { id: String, rotation: f64 },
}

/// Single-select selection plus the active gesture.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<String>,
    gesture: GestureState,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected entity id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The gesture currently in progress.
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Handle a pointer-down. Selecting a selectable entity replaces any
    /// prior selection; empty space and non-selectable entities both clear
    /// it (a protected entity is never selected by accident).
    pub fn pointer_down(&mut self, target: Option<&Entity>) {
        self.gesture = GestureState::Idle;
        self.selected = match target {
            Some(entity) if entity.selectable => Some(entity.id.clone()),
            _ => None,
        };
    }

    /// Begin a drag on the current selection. No-op without one.
    pub fn begin_drag(&mut self) {
        if self.selected.is_some() {
            self.gesture = GestureState::Dragging { baseline: None };
        }
    }

    /// Begin a rotation on the current selection. No-op without one.
    pub fn begin_rotate(&mut self) {
        if self.selected.is_some() {
            self.gesture = GestureState::Rotating { baseline: None };
        }
    }

    /// Feed one raw pointer delta in device pixels, relative to the
    /// gesture's first sample. Returns the absolute target position to send.
    pub fn drag_sample(
        &mut self,
        store: &SceneStore,
        transform_scale: f64,
        raw: Vec2,
    ) -> Option<GestureUpdate> {
        let id = self.selected.clone()?;
        let GestureState::Dragging { baseline } = &mut self.gesture else {
            return None;
        };
        let base = match *baseline {
            Some(base) => base,
            None => {
                let base = capture_baseline(store.get(&id)?);
                *baseline = Some(base);
                base
            }
        };

        let delta = rotate_into_entity_frame(raw, base.rotation);
        let pos = Vec2::new(
            base.pos.x + delta.x * transform_scale,
            base.pos.y + delta.y * transform_scale,
        );
        Some(GestureUpdate::Position { id, pos })
    }

    /// Feed one raw rotation delta in degrees. Rotation deltas are neither
    /// scaled nor frame-adjusted.
    pub fn rotate_sample(&mut self, store: &SceneStore, raw_delta: f64) -> Option<GestureUpdate> {
        let id = self.selected.clone()?;
        let GestureState::Rotating { baseline } = &mut self.gesture else {
            return None;
        };
        let base = match *baseline {
            Some(base) => base,
            None => {
                let base = capture_baseline(store.get(&id)?);
                *baseline = Some(base);
                base
            }
        };

        Some(GestureUpdate::Rotation { id, rotation: base.rotation + raw_delta })
    }

    /// Pointer released: the selection survives, the gesture and its
    /// baseline do not.
    pub fn pointer_up(&mut self) {
        self.gesture = GestureState::Idle;
    }

    /// Drop the selection if its entity vanished or stopped being
    /// selectable. Call after every snapshot: selection must never reference
    /// a stale or protected entity.
    pub fn revalidate(&mut self, store: &SceneStore) {
        let still_valid = self
            .selected
            .as_deref()
            .and_then(|id| store.get(id))
            .is_some_and(|entity| entity.selectable);
        if !still_valid {
            self.clear();
        }
    }

    /// Clear the selection and any gesture in progress.
    pub fn clear(&mut self) {
        self.selected = None;
        self.gesture = GestureState::Idle;
    }
}

fn capture_baseline(entity: &Entity) -> Baseline {
    Baseline { pos: entity.pos, rotation: entity.rotation_degrees() }
}

/// Rotate a raw pointer delta into the entity's own coordinate frame.
///
/// The drag handle rotates with the entity while `pos` is stored in the
/// unrotated frame, so the raw delta must be counter-rotated before it can
/// be added to the baseline. Components are rounded to 4 decimal places to
/// shed float error before scaling.
#[must_use]
pub fn rotate_into_entity_frame(raw: Vec2, rotation_degrees: f64) -> Vec2 {
    let theta = rotation_degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    Vec2::new(
        round4(raw.x * cos - raw.y * sin),
        round4(raw.x * sin + raw.y * cos),
    )
}

fn round4(v: f64) -> f64 {
    (v * DELTA_ROUND).round() / DELTA_ROUND
}
