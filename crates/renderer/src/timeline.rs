//! Entrance fade envelope.
//!
//! On the very first run the scene brightens from black over a short
//! envelope; whether that first run already happened is decided by the
//! caller and injected as a boolean, so the renderer never reads global
//! state to find out.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeCurve {
    Linear,
    Smoothstep,
    EaseInOut,
}

impl FadeCurve {
    fn sample(self, t: f32) -> f32 {
        let clamped = t.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => clamped,
            FadeCurve::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
            FadeCurve::EaseInOut => {
                if clamped < 0.5 {
                    2.0 * clamped * clamped
                } else {
                    -1.0 + (4.0 - 2.0 * clamped) * clamped
                }
            }
        }
    }
}

pub struct FadeEnvelope {
    start: Instant,
    duration: Duration,
    curve: FadeCurve,
}

impl FadeEnvelope {
    /// Builds the entrance envelope, or `None` when the intro has already
    /// played on a previous run or the duration is zero.
    pub fn entrance(
        intro_played: bool,
        duration: Duration,
        curve: FadeCurve,
        now: Instant,
    ) -> Option<Self> {
        if intro_played || duration <= Duration::ZERO {
            None
        } else {
            Some(Self {
                start: now,
                duration,
                curve,
            })
        }
    }

    /// Fade level in `[0, 1]` plus whether the envelope has finished.
    pub fn level(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON);
        (self.curve.sample(progress), progress >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_curve_increases_monotonically() {
        let curve = FadeCurve::Linear;
        let mut last = 0.0;
        for step in 0..=10 {
            let sample = curve.sample(step as f32 / 10.0);
            assert!(sample >= last - f32::EPSILON);
            last = sample;
        }
    }

    #[test]
    fn smoothstep_matches_expected_values() {
        let curve = FadeCurve::Smoothstep;
        assert!((curve.sample(0.0) - 0.0).abs() < 1e-6);
        assert!((curve.sample(0.5) - 0.5).abs() < 1e-6);
        assert!((curve.sample(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ease_in_out_accelerates_then_decelerates() {
        let curve = FadeCurve::EaseInOut;
        let first = curve.sample(0.25);
        let mid = curve.sample(0.5);
        let last = curve.sample(0.75);
        assert!(first < mid);
        assert!(last > mid);
    }

    #[test]
    fn envelope_reports_progress_and_completion() {
        let start = Instant::now();
        let envelope =
            FadeEnvelope::entrance(false, Duration::from_millis(100), FadeCurve::Linear, start)
                .expect("envelope");
        let (level, finished) = envelope.level(start + Duration::from_millis(50));
        assert!((level - 0.5).abs() < 0.05);
        assert!(!finished);
        let (level, finished) = envelope.level(start + Duration::from_millis(150));
        assert_eq!(level, 1.0);
        assert!(finished);
    }

    #[test]
    fn replayed_intro_skips_the_envelope() {
        let now = Instant::now();
        assert!(
            FadeEnvelope::entrance(true, Duration::from_secs(1), FadeCurve::Smoothstep, now)
                .is_none()
        );
        assert!(
            FadeEnvelope::entrance(false, Duration::ZERO, FadeCurve::Smoothstep, now).is_none()
        );
    }
}
