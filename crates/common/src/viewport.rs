/// Window viewport state: physical size plus the monitor scale factor.
///
/// # Invariants
/// - Width and height never reach zero; resizes clamp to 1.
/// - The reported pixel ratio is capped at 2 so high-density displays do not
///   quadruple the fill cost (and firefly sprites keep a consistent size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Viewport {
    pub const MAX_PIXEL_RATIO: f32 = 2.0;

    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exact width/height ratio, fed to the camera projection.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Device pixel ratio clamped to [`Self::MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f32 {
        (self.scale_factor as f32).min(Self::MAX_PIXEL_RATIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_exact_ratio() {
        let vp = Viewport::new(1280, 720, 1.0);
        assert_eq!(vp.aspect(), 1280.0 / 720.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut vp = Viewport::new(800, 600, 1.0);
        vp.resize(1920, 1080);
        assert_eq!(vp.aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn pixel_ratio_clamps_at_two() {
        let vp = Viewport::new(100, 100, 3.0);
        assert_eq!(vp.pixel_ratio(), 2.0);
        let vp = Viewport::new(100, 100, 1.5);
        assert_eq!(vp.pixel_ratio(), 1.5);
    }

    #[test]
    fn zero_size_clamps_to_one() {
        let mut vp = Viewport::new(0, 0, 1.0);
        assert_eq!((vp.width(), vp.height()), (1, 1));
        vp.resize(0, 500);
        assert_eq!(vp.width(), 1);
        assert!(vp.aspect() > 0.0);
    }
}
