use std::fmt;
use std::time::Duration;

use fieldgen::{SceneKind, SceneParams};

use crate::timeline::FadeCurve;

/// Device-pixel-ratio cap applied when sizing the surface, bounding GPU
/// cost on very dense displays.
pub const SCALE_CAP: f64 = 2.0;

/// Where the per-pixel field function is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainterBackend {
    /// Nested pixel loop over the pure field function, blitted to the
    /// surface through a texture.
    Cpu,
    /// One fullscreen draw call through the scene's WGSL port.
    Gpu,
}

impl PainterBackend {
    /// Default backend per scene: drift mirrors the original 2D-context
    /// variant, the others shipped as shaders.
    pub fn default_for(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Drift => PainterBackend::Cpu,
            SceneKind::Plasma | SceneKind::Halftone => PainterBackend::Gpu,
        }
    }

    /// Whether this backend can evaluate the given scene. The drift scene's
    /// blob state lives CPU-side only.
    pub fn supports(self, kind: SceneKind) -> bool {
        !(self == PainterBackend::Gpu && kind == SceneKind::Drift)
    }
}

impl fmt::Display for PainterBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PainterBackend::Cpu => f.write_str("cpu"),
            PainterBackend::Gpu => f.write_str("gpu"),
        }
    }
}

/// Drawable surface dimensions in device pixels, plus the (capped) scale
/// that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtent {
    pub width: u32,
    pub height: u32,
    /// Effective device-pixel ratio after the [`SCALE_CAP`].
    pub scale: f64,
}

fn effective_scale(scale_factor: f64) -> f64 {
    if scale_factor > 0.0 {
        scale_factor.min(SCALE_CAP)
    } else {
        1.0
    }
}

impl SurfaceExtent {
    /// Sizes the surface from the container's logical size and the window
    /// system's reported scale factor.
    pub fn from_logical(logical_width: f64, logical_height: f64, scale_factor: f64) -> Self {
        let scale = effective_scale(scale_factor);
        Self {
            width: ((logical_width * scale).round() as u32).max(1),
            height: ((logical_height * scale).round() as u32).max(1),
            scale,
        }
    }

    /// Sizes the surface from a physical-pixel resize notification. The
    /// notification already includes the raw scale factor, so the capped
    /// scale is re-applied on top of the derived logical size.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let raw = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::from_logical(width as f64 / raw, height as f64 / raw, scale_factor)
    }

    /// Maps a pointer position from window physical coordinates into
    /// surface pixel space. The two differ only when the raw scale factor
    /// exceeds the cap.
    pub fn map_pointer(&self, x: f64, y: f64, scale_factor: f64) -> (f32, f32) {
        let raw = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        let ratio = self.scale / raw;
        ((x * ratio) as f32, (y * ratio) as f32)
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in logical pixels.
    pub window_size: (u32, u32),
    /// Scene parameters (kind, palette, field constants).
    pub scene: SceneParams,
    /// Field evaluation backend.
    pub backend: PainterBackend,
    /// Optional FPS cap; `None` renders every refresh callback.
    pub target_fps: Option<f32>,
    /// Entrance fade duration; zero disables the fade.
    pub fade_duration: Duration,
    pub fade_curve: FadeCurve,
    /// Whether the entrance fade has already played on a previous run.
    pub intro_played: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        let scene = SceneParams::default();
        let backend = PainterBackend::default_for(scene.kind);
        Self {
            window_size: (1280, 720),
            scene,
            backend,
            target_fps: None,
            fade_duration: Duration::from_secs_f32(1.2),
            fade_curve: FadeCurve::Smoothstep,
            intro_played: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_size_scales_by_device_pixel_ratio() {
        let extent = SurfaceExtent::from_logical(800.0, 600.0, 1.5);
        assert_eq!((extent.width, extent.height), (1200, 900));
        assert_eq!(extent.scale, 1.5);
    }

    #[test]
    fn scale_factor_is_capped_at_two() {
        let extent = SurfaceExtent::from_logical(800.0, 600.0, 3.0);
        assert_eq!((extent.width, extent.height), (1600, 1200));
        assert_eq!(extent.scale, SCALE_CAP);
    }

    #[test]
    fn physical_size_round_trips_below_the_cap() {
        let extent = SurfaceExtent::from_physical(1600, 1200, 2.0);
        assert_eq!((extent.width, extent.height), (1600, 1200));
    }

    #[test]
    fn physical_size_shrinks_above_the_cap() {
        // A 3x display reporting 2400x1800 physical is 800x600 logical,
        // which the cap renders at 1600x1200.
        let extent = SurfaceExtent::from_physical(2400, 1800, 3.0);
        assert_eq!((extent.width, extent.height), (1600, 1200));
    }

    #[test]
    fn nonpositive_scale_falls_back_to_identity() {
        let extent = SurfaceExtent::from_logical(640.0, 480.0, 0.0);
        assert_eq!((extent.width, extent.height), (640, 480));
        assert_eq!(extent.scale, 1.0);
    }

    #[test]
    fn pointer_mapping_accounts_for_the_cap() {
        let extent = SurfaceExtent::from_physical(2400, 1800, 3.0);
        let (x, y) = extent.map_pointer(300.0, 150.0, 3.0);
        assert_eq!((x, y), (200.0, 100.0));
    }

    #[test]
    fn pointer_mapping_is_identity_below_the_cap() {
        let extent = SurfaceExtent::from_physical(1600, 1200, 2.0);
        let (x, y) = extent.map_pointer(320.0, 240.0, 2.0);
        assert_eq!((x, y), (320.0, 240.0));
    }

    #[test]
    fn gpu_backend_rejects_the_drift_scene() {
        assert!(!PainterBackend::Gpu.supports(SceneKind::Drift));
        assert!(PainterBackend::Cpu.supports(SceneKind::Drift));
        assert!(PainterBackend::Gpu.supports(SceneKind::Halftone));
        assert_eq!(
            PainterBackend::default_for(SceneKind::Drift),
            PainterBackend::Cpu
        );
    }
}
