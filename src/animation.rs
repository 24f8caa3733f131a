//! Time-based value animation.
//!
//! A [`ValueAnimator`] does not own a timer. The event loop samples it with
//! the current [`Instant`] on every frame and gets back the eased fraction.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::trace;

/// Interpolation curve mapping linear progress in `[0, 1]` to an animated
/// fraction. Every curve maps 0 to 0 and 1 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    Accelerate,
    Decelerate,
    #[default]
    AccelerateDecelerate,
    Bounce,
}

impl Easing {
    pub fn interpolate(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::Accelerate => t * t,
            Easing::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::AccelerateDecelerate => ((t + 1.0) * std::f64::consts::PI).cos() / 2.0 + 0.5,
            Easing::Bounce => bounce_out(t),
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    fn parabola(t: f64) -> f64 {
        t * t * 8.0
    }
    let t = t * 1.1226;
    if t < 0.3535 {
        parabola(t)
    } else if t < 0.7408 {
        parabola(t - 0.54719) + 0.7
    } else if t < 0.9644 {
        parabola(t - 0.8526) + 0.9
    } else {
        parabola(t - 1.0435) + 0.95
    }
}

/// A single restartable animation: at most one run is active at a time.
#[derive(Debug, Clone)]
pub struct ValueAnimator {
    duration: Duration,
    easing: Easing,
    started_at: Option<Instant>,
}

impl Default for ValueAnimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION, Easing::default())
    }
}

impl ValueAnimator {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(750);

    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            started_at: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts a new run at `now`, cancelling the current one if any.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            trace!("cancelling running animation before restart");
        }
        trace!(duration_ms = self.duration.as_millis() as u64, easing = ?self.easing, "animation started");
        self.started_at = Some(now);
    }

    pub fn cancel(&mut self) {
        if self.started_at.take().is_some() {
            trace!("animation cancelled");
        }
    }

    /// Linear progress of the current run, `None` when idle.
    pub fn progress(&self, now: Instant) -> Option<f64> {
        let started_at = self.started_at?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(started_at);
        Some((elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0))
    }

    /// Eased fraction of the current run, `None` when idle.
    pub fn fraction(&self, now: Instant) -> Option<f64> {
        self.progress(now).map(|t| self.easing.interpolate(t))
    }

    /// Samples the animation and stops it once the duration has elapsed.
    /// The final sample of every run is exactly `1.0`.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let progress = self.progress(now)?;
        if progress >= 1.0 {
            self.started_at = None;
            trace!("animation finished");
            return Some(1.0);
        }
        Some(self.easing.interpolate(progress))
    }
}
