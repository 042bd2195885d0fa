use portal_common::Color;

/// Debug-panel settings, two-way bound to the panel widgets.
///
/// Defaults match the original scene: a near-black warm clear color and a
/// black-to-white portal gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Renderer clear color.
    pub clear_color: Color,
    /// Portal gradient start color.
    pub portal_color_start: Color,
    /// Portal gradient end color.
    pub portal_color_end: Color,
    /// Firefly point size in pixels, before per-particle scale and
    /// pixel-ratio correction.
    pub firefly_size: f32,
}

impl Settings {
    pub const FIREFLY_SIZE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=500.0;
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clear_color: Color::from_hex("#201919").expect("default clear color"),
            portal_color_start: Color::BLACK,
            portal_color_end: Color::WHITE,
            firefly_size: 200.0,
        }
    }
}
