//! Shared numeric constants for the scene crate.

// ── Design-time scene size ──────────────────────────────────────

/// Scene width in scene units; resize scale factors are derived against this.
pub const BASE_WIDTH: f64 = 1280.0;

/// Scene height in scene units.
pub const BASE_HEIGHT: f64 = 720.0;

// ── Gesture math ────────────────────────────────────────────────

/// Multiplier for rounding pointer deltas to 4 decimal places.
pub const DELTA_ROUND: f64 = 10_000.0;
