use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

/// Orbit camera with inertial damping.
///
/// Drag input accumulates into angular velocities instead of moving the
/// camera directly, and `update` decays those velocities every frame, so
/// motion keeps gliding briefly after the pointer is released.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    radius: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    /// Exponential decay rate for the damped velocities, per second.
    pub damping: f32,
}

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
const MIN_RADIUS: f32 = 1.0;
const MAX_RADIUS: f32 = 20.0;

impl Default for OrbitCamera {
    fn default() -> Self {
        // Equivalent of the original camera start at (4, 2, 4) looking at
        // the scene center: radius 6, yaw 45 degrees, pitch asin(1/3).
        Self {
            target: Vec3::ZERO,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: (2.0f32 / 6.0).asin(),
            radius: 6.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.25,
            damping: 8.0,
        }
    }
}

impl OrbitCamera {
    /// Accumulate a pointer drag into the damped angular velocities.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity += dx * self.rotate_sensitivity;
        self.pitch_velocity += dy * self.rotate_sensitivity;
    }

    /// Accumulate a scroll step into the damped zoom velocity. Positive
    /// values zoom in.
    pub fn zoom(&mut self, delta: f32) {
        self.zoom_velocity += delta * self.zoom_sensitivity;
    }

    /// Advance damping: apply the accumulated velocities and decay them.
    pub fn update(&mut self, dt: f32) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.radius = (self.radius - self.zoom_velocity).clamp(MIN_RADIUS, MAX_RADIUS);

        let decay = (-self.damping * dt.max(0.0)).exp();
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        ) * self.radius;
        self.target + offset
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// True once the damped velocities have effectively died out.
    pub fn is_settled(&self) -> bool {
        self.yaw_velocity.abs() < 1e-5
            && self.pitch_velocity.abs() < 1e-5
            && self.zoom_velocity.abs() < 1e-5
    }
}
