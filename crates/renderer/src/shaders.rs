//! WGSL sources and checked module creation.
//!
//! Each GPU scene is one self-contained module: the shared uniform block
//! and fullscreen-triangle vertex stage, plus a fragment stage that ports
//! the scene's field function from `fieldgen`. The two implementations must
//! stay in lockstep; `fieldgen` is the reference.

use anyhow::Result;

/// Uniform block and vertex stage shared by every GPU scene. The struct
/// layout must match [`SceneUniforms`](crate::uniforms::SceneUniforms).
const SCENE_PRELUDE: &str = r#"
struct SceneUniforms {
    // width, height, scale, time
    surface: vec4<f32>,
    // fade, intensity, frequency, drift
    effect: vec4<f32>,
    // speed, thickness, time_decay, distance_decay
    ripple: vec4<f32>,
    // octaves, lacunarity, gain, unused
    fbm: vec4<f32>,
    background: vec4<f32>,
    ink: vec4<f32>,
    // x, y, started; x < 0 marks an unused slot
    clicks: array<vec4<f32>, 10>,
};

@group(0) @binding(0) var<uniform> u: SceneUniforms;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VsOut {
    var out: VsOut;
    let x = f32(i32(vertex_index & 1u) * 4 - 1);
    let y = f32(i32(vertex_index >> 1u) * 4 - 1);
    out.position = vec4<f32>(x, y, 0.0, 1.0);
    out.uv = vec2<f32>((x + 1.0) * 0.5, (1.0 - y) * 0.5);
    return out;
}
"#;

/// Layered sinusoidal plasma mapped through the theme palette.
const PLASMA_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let t = u.surface.w * 0.3;
    let uv = in.uv;

    let c1 = sin(uv.x * 10.0 + t);
    let c2 = sin(uv.y * 10.0 + t);
    let c3 = sin((uv.x + uv.y) * 10.0 + t);
    let c4 = sin(length(uv) * 10.0 + t);
    let plasma = (c1 + c2 + c3 + c4) / 4.0;

    let phase = plasma * 3.14159265;
    let intensity = u.effect.y;
    let col = vec3<f32>(
        0.5 + 0.3 * sin(phase + t),
        0.3 + 0.2 * sin(phase + t * 1.5),
        0.5 + 0.4 * sin(phase + t * 2.0),
    ) * intensity;

    return vec4<f32>(col * u.effect.x, 1.0);
}
"#;

/// Ordered-dithered fBm field with click ripples; the WGSL port of
/// `fieldgen::scene::halftone_field` plus the Bayer quantizer.
const HALFTONE_FRAGMENT: &str = r#"
fn hash3(p: vec3<f32>) -> f32 {
    return fract(sin(dot(p, vec3<f32>(12.9898, 78.233, 37.719))) * 43758.5453);
}

fn vnoise(p: vec3<f32>) -> f32 {
    let i = floor(p);
    let f = p - i;
    let c000 = hash3(i);
    let c100 = hash3(i + vec3<f32>(1.0, 0.0, 0.0));
    let c010 = hash3(i + vec3<f32>(0.0, 1.0, 0.0));
    let c110 = hash3(i + vec3<f32>(1.0, 1.0, 0.0));
    let c001 = hash3(i + vec3<f32>(0.0, 0.0, 1.0));
    let c101 = hash3(i + vec3<f32>(1.0, 0.0, 1.0));
    let c011 = hash3(i + vec3<f32>(0.0, 1.0, 1.0));
    let c111 = hash3(i + vec3<f32>(1.0, 1.0, 1.0));
    let x00 = mix(c000, c100, f.x);
    let x10 = mix(c010, c110, f.x);
    let x01 = mix(c001, c101, f.x);
    let x11 = mix(c011, c111, f.x);
    let y0 = mix(x00, x10, f.y);
    let y1 = mix(x01, x11, f.y);
    return mix(y0, y1, f.z);
}

fn fbm3(p: vec3<f32>) -> f32 {
    let octaves = i32(u.fbm.x);
    var sum = 0.0;
    var total = 0.0;
    var frequency = 1.0;
    var amplitude = 1.0;
    for (var i = 0; i < octaves; i = i + 1) {
        sum = sum + amplitude * vnoise(p * frequency);
        total = total + amplitude;
        frequency = frequency * u.fbm.y;
        amplitude = amplitude * u.fbm.z;
    }
    return sum / max(total, 1e-6);
}

var<private> BAYER: array<f32, 64> = array<f32, 64>(
     0.0, 32.0,  8.0, 40.0,  2.0, 34.0, 10.0, 42.0,
    48.0, 16.0, 56.0, 24.0, 50.0, 18.0, 58.0, 26.0,
    12.0, 44.0,  4.0, 36.0, 14.0, 46.0,  6.0, 38.0,
    60.0, 28.0, 52.0, 20.0, 62.0, 30.0, 54.0, 22.0,
     3.0, 35.0, 11.0, 43.0,  1.0, 33.0,  9.0, 41.0,
    51.0, 19.0, 59.0, 27.0, 49.0, 17.0, 57.0, 25.0,
    15.0, 47.0,  7.0, 39.0, 13.0, 45.0,  5.0, 37.0,
    63.0, 31.0, 55.0, 23.0, 61.0, 29.0, 53.0, 21.0,
);

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let px = in.uv * u.surface.xy;
    let time = u.surface.w;

    var field = fbm3(vec3<f32>(px * u.effect.z, time * u.effect.w));

    // Click rings lift, never darken, the base field.
    for (var i = 0; i < 10; i = i + 1) {
        let click = u.clicks[i];
        if (click.x < 0.0) {
            continue;
        }
        let elapsed = time - click.z;
        if (elapsed < 0.0) {
            continue;
        }
        let d = distance(px, click.xy);
        let band = (d - u.ripple.x * elapsed) / u.ripple.y;
        let ring = exp(-band * band) * exp(-u.ripple.z * elapsed) * exp(-u.ripple.w * d);
        field = max(field, ring);
    }

    let cell_x = u32(px.x) % 8u;
    let cell_y = u32(px.y) % 8u;
    let level = (BAYER[cell_y * 8u + cell_x] + 0.5) / 64.0;

    var col = u.background.rgb;
    if ((field - 0.5) > (level - 0.5)) {
        col = u.ink.rgb;
    }
    return vec4<f32>(col * u.effect.x, 1.0);
}
"#;

/// Presents the CPU painter's texture.
pub(crate) const BLIT_SHADER: &str = r#"
@group(0) @binding(0) var blit_texture: texture_2d<f32>;
@group(0) @binding(1) var blit_sampler: sampler;

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VsOut {
    var out: VsOut;
    let x = f32(i32(vertex_index & 1u) * 4 - 1);
    let y = f32(i32(vertex_index >> 1u) * 4 - 1);
    out.position = vec4<f32>(x, y, 0.0, 1.0);
    out.uv = vec2<f32>((x + 1.0) * 0.5, (1.0 - y) * 0.5);
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return textureSample(blit_texture, blit_sampler, in.uv);
}
"#;

pub(crate) fn plasma_source() -> String {
    format!("{SCENE_PRELUDE}\n{PLASMA_FRAGMENT}")
}

pub(crate) fn halftone_source() -> String {
    format!("{SCENE_PRELUDE}\n{HALFTONE_FRAGMENT}")
}

/// Creates a shader module, surfacing validation errors instead of leaving
/// them to the device's uncaptured-error handler.
///
/// On failure the implementation-provided message is logged and the module
/// is dropped; the caller is expected to fail closed.
pub(crate) fn create_shader_checked(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        tracing::error!(shader = label, "shader module rejected: {error}");
        drop(module);
        anyhow::bail!("shader module '{label}' failed validation");
    }
    Ok(module)
}
