#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn event(window: &str, width: f64, height: f64, scale_factor: f64, content_height: f64) -> ResizeEvent {
    ResizeEvent {
        window: window.to_owned(),
        width,
        height,
        scale_factor,
        content_height,
    }
}

// =============================================================
// Scale factors
// =============================================================

#[test]
fn base_width_at_unit_dpr_gives_unit_scales() {
    let mut viewport = ViewportScale::new("scene");
    viewport
        .handle_resize(&event("scene", 1280.0, 720.0, 1.0, 720.0))
        .expect("own-window event");
    assert!(approx_eq(viewport.transform_scale(), 1.0));
    assert!(approx_eq(viewport.scene_scale(), 1.0));
}

#[test]
fn half_width_doubles_transform_scale() {
    let mut viewport = ViewportScale::new("scene");
    viewport
        .handle_resize(&event("scene", 640.0, 360.0, 1.0, 360.0))
        .expect("own-window event");
    assert!(approx_eq(viewport.transform_scale(), 2.0));
    assert!(approx_eq(viewport.scene_scale(), 0.5));
}

#[test]
fn hidpi_double_width_cancels_out() {
    // 2560 device px at dpr 2 is the design size in CSS px.
    let mut viewport = ViewportScale::new("scene");
    viewport
        .handle_resize(&event("scene", 2560.0, 1440.0, 2.0, 720.0))
        .expect("own-window event");
    assert!(approx_eq(viewport.transform_scale(), 1.0));
    assert!(approx_eq(viewport.scene_scale(), 1.0));
}

// =============================================================
// Foreign and degenerate events
// =============================================================

#[test]
fn foreign_window_resize_is_ignored_entirely() {
    let mut viewport = ViewportScale::new("scene");
    viewport
        .handle_resize(&event("scene", 640.0, 360.0, 1.0, 360.0))
        .expect("own-window event");
    let before = viewport.transform_scale();

    let request = viewport.handle_resize(&event("inspector", 300.0, 600.0, 1.0, 580.0));
    assert!(request.is_none());
    assert!(approx_eq(viewport.transform_scale(), before));
}

#[test]
fn zero_width_event_is_ignored() {
    let mut viewport = ViewportScale::new("scene");
    assert!(viewport.handle_resize(&event("scene", 0.0, 720.0, 1.0, 700.0)).is_none());
    assert!(approx_eq(viewport.transform_scale(), 1.0));
}

#[test]
fn zero_scale_factor_event_is_ignored() {
    let mut viewport = ViewportScale::new("scene");
    assert!(viewport.handle_resize(&event("scene", 1280.0, 720.0, 0.0, 700.0)).is_none());
}

// =============================================================
// Host resize request
// =============================================================

#[test]
fn request_snaps_to_base_aspect_plus_chrome() {
    let mut viewport = ViewportScale::new("scene");
    // 40 CSS px of title bar: 760 / 1.0 - 720.
    let request = viewport
        .handle_resize(&event("scene", 1280.0, 760.0, 1.0, 720.0))
        .expect("own-window event");
    assert_eq!(request, ResizeRequest { width: 1280, height: 760 });
}

#[test]
fn request_scales_chrome_by_device_factor() {
    let mut viewport = ViewportScale::new("scene");
    // new_scale = 2, title bar = 1500/2 - 720 = 30 CSS px -> 60 device px.
    let request = viewport
        .handle_resize(&event("scene", 2560.0, 1500.0, 2.0, 720.0))
        .expect("own-window event");
    assert_eq!(request, ResizeRequest { width: 2560, height: 1500 });
}

#[test]
fn title_bar_height_is_recomputed_every_event() {
    let mut viewport = ViewportScale::new("scene");
    let first = viewport
        .handle_resize(&event("scene", 1280.0, 760.0, 1.0, 720.0))
        .expect("event");
    // Same window size, but the chrome grew (theme change).
    let second = viewport
        .handle_resize(&event("scene", 1280.0, 760.0, 1.0, 700.0))
        .expect("event");

    assert_eq!(first.height, 760);
    assert_eq!(second.height, 780); // 720 + 60 of chrome
}

#[test]
fn request_rounds_fractional_sizes() {
    let mut viewport = ViewportScale::new("scene");
    let request = viewport
        .handle_resize(&event("scene", 1000.0, 563.0, 1.0, 562.5))
        .expect("event");
    // new_scale = 0.78125 -> height 562.5 + 0.5 of chrome, rounded.
    assert_eq!(request.width, 1000);
    assert_eq!(request.height, 563);
}
