//! wgpu render backend for the portal scene.
//!
//! Four pipelines share one camera bind group: the baked environment mesh
//! (textured, unlit), the two pole lights (flat warm white), the portal
//! surface (two-color time-driven gradient), and the fireflies (instanced
//! camera-facing quads, additive blend, depth-write off).
//!
//! # Invariants
//! - The renderer never mutates scene state; it reads settings, camera, and
//!   clock values each frame.
//! - Model geometry attaches after the asynchronous load; until then only
//!   the clear color and fireflies are visible.

mod gpu;
mod shaders;

pub use gpu::{FrameParams, PortalRenderer, clear_color};
