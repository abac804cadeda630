//! Scene variants and their pure shading functions.
//!
//! Every scene boils down to one deterministic function from
//! `(pixel, field state)` to a color. The CPU painter loops over it; the GPU
//! pipelines mirror the same math in WGSL. Keeping the canonical version
//! here keeps the two paths honest and makes the field properties testable
//! without a surface.

use rand::prelude::*;

use crate::dither;
use crate::noise::{self, FbmParams};
use crate::palette::{Palette, Rgba};
use crate::ripple::{self, ClickLog, RippleParams};

/// Available background scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    /// Drifting radial-gradient blobs composited additively.
    Drift,
    /// Layered sinusoidal plasma in the theme palette.
    Plasma,
    /// Ordered-dithered fBm field with click ripples.
    Halftone,
}

impl SceneKind {
    pub fn all() -> &'static [SceneKind] {
        &[SceneKind::Drift, SceneKind::Plasma, SceneKind::Halftone]
    }

    pub fn id(&self) -> &'static str {
        match self {
            SceneKind::Drift => "drift",
            SceneKind::Plasma => "plasma",
            SceneKind::Halftone => "halftone",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Drift => "Drifting Gradients",
            SceneKind::Plasma => "Plasma",
            SceneKind::Halftone => "Halftone Waves",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "drift" => Some(SceneKind::Drift),
            "plasma" => Some(SceneKind::Plasma),
            "halftone" => Some(SceneKind::Halftone),
            _ => None,
        }
    }
}

impl Default for SceneKind {
    fn default() -> Self {
        SceneKind::Halftone
    }
}

/// Everything that parameterizes a scene's field function.
///
/// The constants here are cosmetic configuration; the defaults match the
/// shipped look.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    pub kind: SceneKind,
    pub palette: Palette,
    pub fbm: FbmParams,
    pub ripple: RippleParams,
    /// Spatial frequency of the halftone noise field, in lattice cells per
    /// surface pixel.
    pub frequency: f32,
    /// Advance rate of the noise field's time axis, in units per second.
    pub drift_rate: f32,
    /// Plasma brightness multiplier.
    pub intensity: f32,
    /// Seed for blob placement in the drift scene.
    pub seed: u64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            kind: SceneKind::default(),
            palette: Palette::default(),
            fbm: FbmParams::default(),
            ripple: RippleParams::default(),
            frequency: 0.008,
            drift_rate: 0.05,
            intensity: 0.15,
            seed: 0,
        }
    }
}

/// Per-frame generator input: elapsed field time plus the click history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldState {
    pub time: f32,
    pub clicks: ClickLog,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances field time to `seconds`; time never runs backwards.
    pub fn advance_to(&mut self, seconds: f32) -> f32 {
        let dt = (seconds - self.time).max(0.0);
        self.time += dt;
        dt
    }

    /// Records a pointer-down at the current field time.
    pub fn record_click(&mut self, x: f32, y: f32) {
        self.clicks.record(x, y, self.time);
    }
}

/// One drifting gradient blob.
#[derive(Debug, Clone, PartialEq)]
struct Blob {
    x: f32,
    y: f32,
    radius: f32,
    vx: f32,
    vy: f32,
    color: Rgba,
}

/// The drift scene's mutable state: blobs bouncing inside the surface,
/// each painting a radial gradient that falls off linearly to its radius.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftField {
    blobs: Vec<Blob>,
    width: f32,
    height: f32,
}

/// Peak blob speed in surface pixels per second.
const BLOB_SPEED: f32 = 18.0;

impl DriftField {
    pub fn new(params: &SceneParams, width: u32, height: u32) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let blobs = params
            .palette
            .accents
            .iter()
            .map(|&color| Blob {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * height,
                radius: rng.gen::<f32>() * 300.0 + 200.0,
                vx: (rng.gen::<f32>() - 0.5) * BLOB_SPEED,
                vy: (rng.gen::<f32>() - 0.5) * BLOB_SPEED,
                color,
            })
            .collect();
        Self {
            blobs,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    /// Moves every blob by `dt` seconds, reversing velocity at the edges
    /// (inflated by the blob radius, so gradients slide fully off-screen
    /// before turning around).
    pub fn advance(&mut self, dt: f32) {
        for blob in &mut self.blobs {
            blob.x += blob.vx * dt;
            blob.y += blob.vy * dt;
            if blob.x < -blob.radius || blob.x > self.width + blob.radius {
                blob.vx = -blob.vx;
            }
            if blob.y < -blob.radius || blob.y > self.height + blob.radius {
                blob.vy = -blob.vy;
            }
        }
    }

    /// Additive composite of all blob gradients over the background.
    pub fn shade(&self, x: f32, y: f32, background: Rgba) -> Rgba {
        let mut out = background;
        for blob in &self.blobs {
            let distance = ((x - blob.x).powi(2) + (y - blob.y).powi(2)).sqrt();
            if distance >= blob.radius {
                continue;
            }
            let falloff = 1.0 - distance / blob.radius;
            let weight = blob.color.a * falloff;
            out = out.add_saturating(Rgba::new(
                blob.color.r * weight,
                blob.color.g * weight,
                blob.color.b * weight,
                0.0,
            ));
        }
        out
    }
}

/// Plasma field color at normalized coordinates `(u, v)` in `[0, 1]`.
pub fn plasma_shade(u: f32, v: f32, time: f32, intensity: f32) -> Rgba {
    let t = time * 0.3;
    let c1 = (u * 10.0 + t).sin();
    let c2 = (v * 10.0 + t).sin();
    let c3 = ((u + v) * 10.0 + t).sin();
    let c4 = ((u * u + v * v).sqrt() * 10.0 + t).sin();
    let plasma = (c1 + c2 + c3 + c4) / 4.0;

    let phase = plasma * std::f32::consts::PI;
    Rgba::new(
        (0.5 + 0.3 * (phase + t).sin()) * intensity,
        (0.3 + 0.2 * (phase + t * 1.5).sin()) * intensity,
        (0.5 + 0.4 * (phase + t * 2.0).sin()) * intensity,
        1.0,
    )
}

/// Continuous halftone field before quantization: fBm base lifted by click
/// rings via `max`.
pub fn halftone_field(x: f32, y: f32, state: &FieldState, params: &SceneParams) -> f32 {
    let base = noise::fbm(
        x * params.frequency,
        y * params.frequency,
        state.time * params.drift_rate,
        &params.fbm,
    );
    let ring = ripple::contribution(&state.clicks, x, y, state.time, &params.ripple);
    base.max(ring)
}

/// A scene instance: parameters plus all per-frame state.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    params: SceneParams,
    state: FieldState,
    drift: Option<DriftField>,
    width: u32,
    height: u32,
}

impl Scene {
    pub fn new(params: SceneParams, width: u32, height: u32) -> Self {
        let drift = match params.kind {
            SceneKind::Drift => Some(DriftField::new(&params, width, height)),
            _ => None,
        };
        Self {
            params,
            state: FieldState::new(),
            drift,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        if let Some(drift) = &mut self.drift {
            drift.resize(width, height);
        }
    }

    /// Advances field time to `seconds` and steps any stateful scene parts.
    pub fn advance_to(&mut self, seconds: f32) {
        let dt = self.state.advance_to(seconds);
        if let Some(drift) = &mut self.drift {
            drift.advance(dt);
        }
    }

    /// Records a pointer-down at surface pixel `(x, y)`.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.state.record_click(x, y);
    }

    /// The canonical `(coordinate, state) -> color` function.
    pub fn shade_pixel(&self, x: u32, y: u32) -> Rgba {
        match self.params.kind {
            SceneKind::Drift => {
                let drift = self.drift.as_ref().expect("drift scene state");
                drift.shade(x as f32, y as f32, self.params.palette.background)
            }
            SceneKind::Plasma => {
                let u = x as f32 / self.width as f32;
                let v = y as f32 / self.height as f32;
                plasma_shade(u, v, self.state.time, self.params.intensity)
            }
            SceneKind::Halftone => {
                let value = halftone_field(x as f32, y as f32, &self.state, &self.params);
                if dither::quantize(value, x, y) {
                    self.params.palette.ink
                } else {
                    self.params.palette.background
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::fbm;

    #[test]
    fn scene_ids_round_trip() {
        for kind in SceneKind::all() {
            assert_eq!(SceneKind::from_id(kind.id()), Some(*kind));
        }
        assert_eq!(SceneKind::from_id("HALFTONE"), Some(SceneKind::Halftone));
        assert_eq!(SceneKind::from_id("unknown"), None);
    }

    #[test]
    fn sentinel_history_leaves_base_field_untouched() {
        let params = SceneParams::default();
        let state = FieldState {
            time: 3.7,
            clicks: ClickLog::new(),
        };
        for step in 0..40 {
            let x = step as f32 * 17.3;
            let y = step as f32 * 9.1;
            let with_history = halftone_field(x, y, &state, &params);
            let base = fbm(
                x * params.frequency,
                y * params.frequency,
                state.time * params.drift_rate,
                &params.fbm,
            );
            assert_eq!(with_history, base, "sentinel slot perturbed field at step {step}");
        }
    }

    #[test]
    fn click_brightens_field_near_its_ring_front() {
        let params = SceneParams::default();
        let mut state = FieldState::new();
        state.advance_to(1.0);
        state.record_click(200.0, 200.0);
        state.advance_to(1.1);

        // 0.1s after the click the front sits ~18px out; sample there.
        let front = params.ripple.speed * 0.1;
        let with_click = halftone_field(200.0 + front, 200.0, &state, &params);
        let base = fbm(
            (200.0 + front) * params.frequency,
            200.0 * params.frequency,
            state.time * params.drift_rate,
            &params.fbm,
        );
        assert!(with_click >= base, "ring darkened the field");
    }

    #[test]
    fn halftone_pixels_use_exactly_the_two_theme_colors() {
        let scene = Scene::new(SceneParams::default(), 64, 64);
        let palette = &scene.params().palette;
        for y in 0..64 {
            for x in 0..64 {
                let color = scene.shade_pixel(x, y);
                assert!(color == palette.ink || color == palette.background);
            }
        }
    }

    #[test]
    fn plasma_stays_within_intensity_envelope() {
        for step in 0..200 {
            let t = step as f32 * 0.13;
            let color = plasma_shade(0.3, 0.8, t, 0.15);
            for channel in [color.r, color.g, color.b] {
                assert!(channel >= 0.0);
                assert!(channel <= 0.15, "channel exceeded intensity: {channel}");
            }
        }
    }

    #[test]
    fn drift_field_is_deterministic_for_a_seed() {
        let params = SceneParams {
            kind: SceneKind::Drift,
            seed: 42,
            ..SceneParams::default()
        };
        let mut a = Scene::new(params.clone(), 320, 240);
        let mut b = Scene::new(params, 320, 240);
        a.advance_to(2.0);
        b.advance_to(2.0);
        for &(x, y) in &[(0, 0), (160, 120), (319, 239)] {
            assert_eq!(a.shade_pixel(x, y), b.shade_pixel(x, y));
        }
    }

    #[test]
    fn field_time_never_runs_backwards() {
        let mut state = FieldState::new();
        state.advance_to(5.0);
        state.advance_to(2.0);
        assert_eq!(state.time, 5.0);
    }

    #[test]
    fn clicks_are_stamped_with_field_time() {
        let mut scene = Scene::new(SceneParams::default(), 100, 100);
        scene.advance_to(4.25);
        scene.pointer_down(10.0, 20.0);
        let stamped = scene
            .state()
            .clicks
            .slots()
            .iter()
            .find(|event| !event.is_sentinel())
            .expect("recorded click");
        assert_eq!(stamped.started, 4.25);
        assert_eq!((stamped.x, stamped.y), (10.0, 20.0));
    }
}
