//! Headless scene session.
//!
//! `SceneSession` aggregates everything the window event loop mutates:
//! surface extent, field state, the frame driver, and the entrance fade.
//! Keeping it free of windowing and GPU handles makes the full
//! mount / resize / pointer / teardown choreography testable without a
//! display.

use std::time::Instant;

use fieldgen::Scene;

use crate::runtime::{FrameDriver, FramePhase, TimeSample};
use crate::timeline::FadeEnvelope;
use crate::types::{RendererConfig, SurfaceExtent};

/// Everything a painter needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub time: TimeSample,
    /// Entrance fade level, 1.0 once (or if) the envelope is done.
    pub fade: f32,
    pub extent: SurfaceExtent,
}

pub struct SceneSession {
    scene: Scene,
    extent: SurfaceExtent,
    /// Raw window scale factor, before the cap.
    raw_scale: f64,
    cursor: Option<(f64, f64)>,
    driver: FrameDriver,
    fade: Option<FadeEnvelope>,
}

impl SceneSession {
    /// Mounts the session: allocates the surface extent, seeds the scene,
    /// and transitions the frame driver Idle → Running.
    pub fn new(config: &RendererConfig, scale_factor: f64, now: Instant) -> Self {
        let extent = SurfaceExtent::from_logical(
            config.window_size.0 as f64,
            config.window_size.1 as f64,
            scale_factor,
        );
        let scene = Scene::new(config.scene.clone(), extent.width, extent.height);
        let mut driver = FrameDriver::new(config.target_fps);
        driver.start(now);
        let fade =
            FadeEnvelope::entrance(config.intro_played, config.fade_duration, config.fade_curve, now);
        Self {
            scene,
            extent,
            raw_scale: scale_factor,
            cursor: None,
            driver,
            fade,
        }
    }

    pub fn extent(&self) -> SurfaceExtent {
        self.extent
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn phase(&self) -> FramePhase {
        self.driver.phase()
    }

    /// Applies a resize notification. Zero-sized notifications are ignored
    /// and leave the previous extent in place.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) -> SurfaceExtent {
        if width == 0 || height == 0 {
            return self.extent;
        }
        self.raw_scale = scale_factor;
        self.extent = SurfaceExtent::from_physical(width, height, scale_factor);
        self.scene.resize(self.extent.width, self.extent.height);
        self.extent
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    /// Records a pointer-down at the last known cursor position,
    /// transformed into surface pixel space. Returns whether a click was
    /// recorded.
    pub fn pointer_pressed(&mut self) -> bool {
        if self.driver.phase() != FramePhase::Running {
            return false;
        }
        let Some((x, y)) = self.cursor else {
            return false;
        };
        let (sx, sy) = self.extent.map_pointer(x, y, self.raw_scale);
        self.scene.pointer_down(sx, sy);
        true
    }

    /// Samples the clock and advances the field for the next frame, or
    /// `None` when the session is not running — the liveness check a late
    /// refresh callback relies on after teardown.
    pub fn begin_frame(&mut self, now: Instant) -> Option<FrameInputs> {
        let time = self.driver.sample(now)?;
        self.scene.advance_to(time.seconds);
        let fade = match &self.fade {
            Some(envelope) => {
                let (level, finished) = envelope.level(now);
                if finished {
                    self.fade = None;
                    1.0
                } else {
                    level
                }
            }
            None => 1.0,
        };
        Some(FrameInputs {
            time,
            fade,
            extent: self.extent,
        })
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        self.driver.ready_for_frame(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.driver.next_deadline()
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.driver.mark_rendered(now);
    }

    /// Teardown: Running → Stopped, terminal.
    pub fn stop(&mut self) {
        self.driver.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fieldgen::SceneKind;

    use super::*;
    use crate::types::PainterBackend;

    fn config() -> RendererConfig {
        RendererConfig {
            window_size: (640, 480),
            backend: PainterBackend::Gpu,
            ..RendererConfig::default()
        }
    }

    #[test]
    fn mount_transitions_idle_to_running() {
        let session = SceneSession::new(&config(), 1.0, Instant::now());
        assert_eq!(session.phase(), FramePhase::Running);
        assert_eq!((session.extent().width, session.extent().height), (640, 480));
    }

    #[test]
    fn resize_tracks_the_container_within_one_notification() {
        let mut session = SceneSession::new(&config(), 1.0, Instant::now());
        let extent = session.resize(1920, 1080, 1.0);
        assert_eq!((extent.width, extent.height), (1920, 1080));
        // A 3x display is capped at 2x.
        let extent = session.resize(2400, 1800, 3.0);
        assert_eq!((extent.width, extent.height), (1600, 1200));
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut session = SceneSession::new(&config(), 1.0, Instant::now());
        let before = session.extent();
        assert_eq!(session.resize(0, 300, 1.0), before);
    }

    #[test]
    fn pointer_press_records_a_click_in_surface_space() {
        let mut session = SceneSession::new(&config(), 3.0, Instant::now());
        session.pointer_moved(300.0, 150.0);
        assert!(session.pointer_pressed());
        let click = session
            .scene()
            .state()
            .clicks
            .slots()
            .iter()
            .find(|event| !event.is_sentinel())
            .expect("click recorded");
        // Raw 3x coordinates land in capped 2x surface space.
        assert_eq!((click.x, click.y), (200.0, 100.0));
    }

    #[test]
    fn pointer_press_without_a_cursor_position_is_dropped() {
        let mut session = SceneSession::new(&config(), 1.0, Instant::now());
        assert!(!session.pointer_pressed());
    }

    #[test]
    fn frames_advance_field_time() {
        let mut session = SceneSession::new(&config(), 1.0, Instant::now());
        let start = Instant::now();
        session.begin_frame(start).expect("frame");
        session
            .begin_frame(start + Duration::from_millis(500))
            .expect("frame");
        assert!(session.scene().state().time > 0.0);
    }

    #[test]
    fn entrance_fade_rises_then_pins_at_one() {
        let mut cfg = config();
        cfg.fade_duration = Duration::from_millis(100);
        let start = Instant::now();
        let mut session = SceneSession::new(&cfg, 1.0, start);
        let early = session.begin_frame(start).expect("frame");
        assert!(early.fade < 1.0);
        let late = session
            .begin_frame(start + Duration::from_millis(200))
            .expect("frame");
        assert_eq!(late.fade, 1.0);
    }

    #[test]
    fn replayed_intro_renders_at_full_level_immediately() {
        let mut cfg = config();
        cfg.intro_played = true;
        let start = Instant::now();
        let mut session = SceneSession::new(&cfg, 1.0, start);
        let inputs = session.begin_frame(start).expect("frame");
        assert_eq!(inputs.fade, 1.0);
    }

    #[test]
    fn teardown_after_resizes_and_clicks_silences_the_loop() {
        let start = Instant::now();
        let mut session = SceneSession::new(&config(), 1.0, start);
        session.begin_frame(start).expect("frame");

        session.resize(800, 600, 1.0);
        session.resize(1024, 768, 1.0);
        session.resize(1280, 720, 1.0);
        session.pointer_moved(10.0, 10.0);
        assert!(session.pointer_pressed());
        session.pointer_moved(50.0, 60.0);
        assert!(session.pointer_pressed());

        session.stop();
        assert_eq!(session.phase(), FramePhase::Stopped);
        // The one late callback that may still fire must observe a dead
        // session, and so must everything after it.
        for step in 1..5 {
            let later = start + Duration::from_millis(16 * step);
            assert!(session.begin_frame(later).is_none());
            assert!(!session.ready_for_frame(later));
        }
        assert!(!session.pointer_pressed());
    }

    #[test]
    fn drift_scene_sessions_build_blob_state() {
        let mut cfg = config();
        cfg.scene.kind = SceneKind::Drift;
        cfg.backend = PainterBackend::Cpu;
        let mut session = SceneSession::new(&cfg, 1.0, Instant::now());
        let inputs = session.begin_frame(Instant::now()).expect("frame");
        assert!(inputs.extent.width > 0);
    }
}
