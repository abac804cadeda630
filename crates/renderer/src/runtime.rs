//! Frame scheduling: the Idle → Running → Stopped lifecycle and monotonic
//! time sampling that drive every scene.

use std::time::{Duration, Instant};

/// Lifecycle of a component's render loop.
///
/// `Stopped` is terminal: a stopped driver never produces another sample,
/// which is what lets a late refresh callback fire harmlessly after
/// teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Idle,
    Running,
    Stopped,
}

/// Snapshot of the time state supplied to a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed seconds since the driver started.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

/// Owns the frame lifecycle and the monotonic clock origin, and enforces an
/// optional FPS cap via frame deadlines.
#[derive(Debug)]
pub struct FrameDriver {
    phase: FramePhase,
    origin: Option<Instant>,
    frame: u64,
    min_interval: Option<Duration>,
    last_rendered: Option<Instant>,
}

impl FrameDriver {
    /// Creates an idle driver. A non-positive FPS cap means uncapped.
    pub fn new(target_fps: Option<f32>) -> Self {
        let min_interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            phase: FramePhase::Idle,
            origin: None,
            frame: 0,
            min_interval,
            last_rendered: None,
        }
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Idle → Running. Starting a stopped driver is a no-op; the sequence
    /// is not restartable.
    pub fn start(&mut self, now: Instant) {
        if self.phase == FramePhase::Idle {
            self.phase = FramePhase::Running;
            self.origin = Some(now);
        }
    }

    /// Transitions to the terminal `Stopped` phase.
    pub fn stop(&mut self) {
        self.phase = FramePhase::Stopped;
    }

    /// Produces the next frame's time sample, or `None` unless running.
    pub fn sample(&mut self, now: Instant) -> Option<TimeSample> {
        if self.phase != FramePhase::Running {
            return None;
        }
        let origin = *self.origin.get_or_insert(now);
        let sample = TimeSample {
            seconds: now.saturating_duration_since(origin).as_secs_f32(),
            frame_index: self.frame,
        };
        self.frame = self.frame.saturating_add(1);
        Some(sample)
    }

    /// Records that a frame was presented, arming the next FPS deadline.
    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_rendered = Some(now);
    }

    /// Whether a new frame should be requested right now.
    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if self.phase != FramePhase::Running {
            return false;
        }
        match (self.min_interval, self.last_rendered) {
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            _ => true,
        }
    }

    /// Next instant at which a capped driver becomes ready again.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.phase != FramePhase::Running {
            return None;
        }
        match (self.min_interval, self.last_rendered) {
            (Some(interval), Some(last)) => Some(last + interval),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_starts_idle_and_produces_no_samples() {
        let mut driver = FrameDriver::new(None);
        assert_eq!(driver.phase(), FramePhase::Idle);
        assert!(driver.sample(Instant::now()).is_none());
        assert!(!driver.ready_for_frame(Instant::now()));
    }

    #[test]
    fn samples_advance_monotonically_while_running() {
        let mut driver = FrameDriver::new(None);
        let start = Instant::now();
        driver.start(start);
        let first = driver.sample(start).expect("sample");
        let second = driver
            .sample(start + Duration::from_millis(16))
            .expect("sample");
        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert!(second.seconds >= first.seconds);
    }

    #[test]
    fn stop_is_terminal() {
        let mut driver = FrameDriver::new(None);
        let now = Instant::now();
        driver.start(now);
        driver.stop();
        assert_eq!(driver.phase(), FramePhase::Stopped);
        assert!(driver.sample(now).is_none());
        // A stopped sequence cannot be restarted.
        driver.start(now);
        assert_eq!(driver.phase(), FramePhase::Stopped);
        assert!(driver.sample(now).is_none());
    }

    #[test]
    fn fps_cap_enforces_a_deadline() {
        // 8 FPS keeps the interval exactly representable (125ms).
        let mut driver = FrameDriver::new(Some(8.0));
        let start = Instant::now();
        driver.start(start);
        assert!(driver.ready_for_frame(start));
        driver.mark_rendered(start);
        assert!(!driver.ready_for_frame(start + Duration::from_millis(60)));
        assert!(driver.ready_for_frame(start + Duration::from_millis(125)));
        assert_eq!(
            driver.next_deadline(),
            Some(start + Duration::from_millis(125))
        );
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let mut driver = FrameDriver::new(Some(0.0));
        let start = Instant::now();
        driver.start(start);
        driver.mark_rendered(start);
        assert!(driver.ready_for_frame(start));
        assert!(driver.next_deadline().is_none());
    }
}
