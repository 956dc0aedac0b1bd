//! Resize-driven scale controller.
//!
//! The scene is authored against a fixed design-time size. When the host
//! window resizes, the controller derives two scalar factors from the new
//! width: `transform_scale` converts raw pointer deltas (device px) into
//! scene units for gesture math, and `scene_scale` is the opposite direction
//! used by renderers. Resize events carry a window identifier; events for
//! any other window are ignored wholesale; honoring them corrupts the scale
//! whenever more than one window exists.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_HEIGHT, BASE_WIDTH};

/// A resize notification from the host window layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// Label of the window that was resized.
    pub window: String,
    /// New outer width in device pixels.
    pub width: f64,
    /// New outer height in device pixels.
    pub height: f64,
    /// Device pixels per CSS pixel at the time of the event.
    pub scale_factor: f64,
    /// Content-area height in CSS pixels (excludes window chrome).
    pub content_height: f64,
}

/// A follow-up size request for the host window, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
}

/// Derives the scene's scale factors from window resizes.
#[derive(Debug, Clone)]
pub struct ViewportScale {
    window: String,
    transform_scale: f64,
    scene_scale: f64,
}

impl ViewportScale {
    /// Create a controller owning the given window label.
    #[must_use]
    pub fn new(window: impl Into<String>) -> Self {
        Self { window: window.into(), transform_scale: 1.0, scene_scale: 1.0 }
    }

    /// Device-px → scene-unit factor for gesture math.
    #[must_use]
    pub fn transform_scale(&self) -> f64 {
        self.transform_scale
    }

    /// Scene-unit → CSS-px factor for rendering.
    #[must_use]
    pub fn scene_scale(&self) -> f64 {
        self.scene_scale
    }

    /// Apply a resize notification.
    ///
    /// Returns the size the host window should be snapped to, or `None` for
    /// foreign or degenerate events (which leave all state untouched). The
    /// title-bar height is recomputed on every event rather than cached,
    /// since host chrome height varies with the OS theme.
    pub fn handle_resize(&mut self, event: &ResizeEvent) -> Option<ResizeRequest> {
        if event.window != self.window {
            return None;
        }
        if event.width <= 0.0 || event.scale_factor <= 0.0 {
            return None;
        }

        let new_scale = event.width / BASE_WIDTH;
        self.transform_scale = event.scale_factor / new_scale;
        self.scene_scale = new_scale / event.scale_factor;

        let title_bar = event.height / event.scale_factor - event.content_height;

        Some(ResizeRequest {
            width: device_px(BASE_WIDTH * new_scale),
            height: device_px(BASE_HEIGHT * new_scale + title_bar * event.scale_factor),
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_px(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
