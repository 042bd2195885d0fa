/// WGSL shader for the baked environment mesh: unlit, textured with the
/// precomputed lighting image.
pub const BAKED_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var baked_texture: texture_2d<f32>;
@group(1) @binding(1)
var baked_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(baked_texture, baked_sampler, in.uv);
}
"#;

/// WGSL shader for the pole lights: flat warm white, no texture.
pub const POLE_LIGHT_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

// #ffffe5
const POLE_LIGHT_COLOR: vec3<f32> = vec3<f32>(1.0, 1.0, 0.898);

@vertex
fn vs_pole(vertex: VertexInput) -> @builtin(position) vec4<f32> {
    return camera.view_proj * vec4<f32>(vertex.position, 1.0);
}

@fragment
fn fs_pole() -> @location(0) vec4<f32> {
    return vec4<f32>(POLE_LIGHT_COLOR, 1.0);
}
"#;

/// WGSL shader for the portal surface: a time-animated noise gradient
/// between two configurable colors, brightening toward the rim.
pub const PORTAL_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

struct PortalParams {
    color_start: vec3<f32>,
    time: f32,
    color_end: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> params: PortalParams;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_portal(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

fn hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(127.1, 311.7))) * 43758.5453);
}

fn value_noise(p: vec2<f32>) -> f32 {
    let cell = floor(p);
    let frac = fract(p);
    let t = frac * frac * (3.0 - 2.0 * frac);

    let a = hash(cell);
    let b = hash(cell + vec2<f32>(1.0, 0.0));
    let c = hash(cell + vec2<f32>(0.0, 1.0));
    let d = hash(cell + vec2<f32>(1.0, 1.0));

    return mix(mix(a, b, t.x), mix(c, d, t.x), t.y);
}

@fragment
fn fs_portal(in: VertexOutput) -> @location(0) vec4<f32> {
    // Wobble the sample position over time so the gradient shimmers.
    let displaced = in.uv + vec2<f32>(
        value_noise(in.uv * 8.0 + vec2<f32>(params.time * 0.2, 0.0)),
        value_noise(in.uv * 8.0 - vec2<f32>(0.0, params.time * 0.2)),
    ) * 0.1;

    var strength = value_noise(displaced * 5.0 + vec2<f32>(params.time * 0.4));

    // Outer glow toward the rim of the portal surface.
    let rim = distance(in.uv, vec2<f32>(0.5));
    strength += (rim - 0.35) * 4.0;
    strength = clamp(strength, 0.0, 1.0);

    let color = mix(params.color_start, params.color_end, strength);
    return vec4<f32>(color, 1.0);
}
"#;

/// WGSL shader for the fireflies: instanced camera-facing quads sized in
/// screen pixels, drifting vertically with time, rendered as radial glows.
pub const FIREFLIES_SHADER: &str = r#"
struct FireflyParams {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    resolution: vec2<f32>,
    size: f32,
    pixel_ratio: f32,
    time: f32,
};

@group(0) @binding(0)
var<uniform> params: FireflyParams;

struct VertexInput {
    @location(0) corner: vec2<f32>,
    @location(1) instance_position: vec3<f32>,
    @location(2) instance_scale: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fireflies(vertex: VertexInput) -> VertexOutput {
    var world = vertex.instance_position;
    world.y += sin(params.time + world.x * 100.0) * vertex.instance_scale * 0.2;

    let view_pos = params.view * vec4<f32>(world, 1.0);
    var clip = params.proj * view_pos;

    // Perspective-attenuated point size in physical pixels, then offset the
    // quad corner in clip space before the divide.
    let point_px = params.size * vertex.instance_scale * params.pixel_ratio
        / max(-view_pos.z, 0.001);
    let offset_ndc = vertex.corner * point_px * 2.0 / params.resolution;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(clip.xy + offset_ndc * clip.w, clip.zw);
    out.uv = vertex.corner + vec2<f32>(0.5);
    return out;
}

@fragment
fn fs_fireflies(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = distance(in.uv, vec2<f32>(0.5));
    let glow = max(0.05 / dist - 0.1, 0.0);
    return vec4<f32>(vec3<f32>(glow), glow);
}
"#;
