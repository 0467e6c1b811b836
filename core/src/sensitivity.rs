//! Back-gesture sensitivity to indicator width conversion
//!
//! The settings layer stores a per-edge inset *scale*; the overlay only
//! understands pixel widths. These helpers turn slider positions into the
//! widths handed to the indicator. Nothing here is persisted.

/// Slider stops, narrowest to widest
pub const INSET_SCALE_PRESETS: [f32; 6] = [0.60, 0.75, 1.00, 1.33, 1.66, 2.00];

/// Scale used when the setting has never been changed
pub const DEFAULT_INSET_SCALE: f32 = 1.0;

/// Back-gesture inset at scale 1.0, in density-independent pixels
pub const BASE_INSET_DP: f32 = 48.0;

/// Pixel width of the sensitive zone for `scale` at display `density`.
///
/// Non-finite or negative inputs yield 0.
pub fn inset_width_px(scale: f32, density: f32) -> i32 {
    let px = BASE_INSET_DP * scale * density;
    if !px.is_finite() || px <= 0.0 {
        return 0;
    }
    px.round() as i32
}

/// Slider stop closest to `scale`
pub fn nearest_preset(scale: f32) -> usize {
    INSET_SCALE_PRESETS
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - scale)
                .abs()
                .total_cmp(&(*b - scale).abs())
        })
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

pub fn preset_scale(index: usize) -> Option<f32> {
    INSET_SCALE_PRESETS.get(index).copied()
}
