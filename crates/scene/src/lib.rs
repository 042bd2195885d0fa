//! Scene state owned by the application.
//!
//! Everything here is plain data the render loop reads each frame: the
//! debug-panel settings, the generated firefly cloud, the damped orbit
//! camera, and the frame clock. None of it touches the GPU.
//!
//! # Invariants
//! - The firefly count is fixed at construction; no particle is added or
//!   removed during a session.
//! - Settings change only through the debug panel.

mod camera;
mod clock;
mod fireflies;
mod settings;

pub use camera::OrbitCamera;
pub use clock::{FrameClock, FrameTime};
pub use fireflies::{FIREFLY_COUNT, Fireflies};
pub use settings::Settings;
