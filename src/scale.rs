//! Value-to-angle arithmetic for the gauge.
//!
//! Everything here is derived from a validated [`GaugeConfig`] and is rebuilt
//! as a whole whenever one of its inputs changes.

use crate::config::GaugeConfig;
use crate::error::Result;

/// Sweep used for the long pointer when the value sits at the scale origin.
pub const MIN_POINTER_SWEEP: f64 = 1.0;

/// Angular span in degrees: starts at `start`, extends by `sweep` (negative
/// sweeps run counter-clockwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start: f64,
    pub sweep: f64,
}

impl ArcSpan {
    pub const fn new(start: f64, sweep: f64) -> Self {
        Self { start, sweep }
    }
}

/// Divider tick layout. Spacing is a percentage of the sweep, the tick
/// length comes from the value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dividers {
    /// Length of one divider arc in degrees.
    pub size: i32,
    pub count: i32,
    pub step_angle: i32,
    pub draw_first: bool,
    pub draw_last: bool,
}

impl Dividers {
    /// Indices of the dividers that are drawn.
    pub fn indices(&self) -> std::ops::Range<i32> {
        let first = if self.draw_first { 0 } else { 1 };
        let end = if self.draw_last {
            self.count + 1
        } else {
            self.count
        };
        first..end.max(first)
    }

    pub fn spans(&self, start_angle: i32) -> impl Iterator<Item = ArcSpan> + '_ {
        self.indices().map(move |i| {
            ArcSpan::new(
                f64::from(start_angle) + f64::from(i) * f64::from(self.step_angle),
                f64::from(self.size),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    start_angle: i32,
    sweep_angle: i32,
    start_value: i32,
    end_value: i32,
    point_angle: f64,
    dividers: Option<Dividers>,
}

impl Scale {
    pub fn new(config: &GaugeConfig) -> Result<Self> {
        config.validate()?;

        let point_angle =
            config.sweep_angle as f64 / (config.end_value as f64 - config.start_value as f64);

        let dividers = (config.divider_size > 0).then(|| {
            let range = i64::from(config.end_value.abs_diff(config.start_value));
            let count = 100 / config.divider_step;
            Dividers {
                size: (i64::from(config.sweep_angle) / (range / i64::from(config.divider_size)))
                    as i32,
                count,
                step_angle: config.sweep_angle / count,
                draw_first: config.divider_draw_first,
                draw_last: config.divider_draw_last,
            }
        });

        Ok(Self {
            start_angle: config.start_angle,
            sweep_angle: config.sweep_angle,
            start_value: config.start_value,
            end_value: config.end_value,
            point_angle,
            dividers,
        })
    }

    pub fn start_angle(&self) -> i32 {
        self.start_angle
    }

    pub fn sweep_angle(&self) -> i32 {
        self.sweep_angle
    }

    /// Degrees per unit of value.
    pub fn point_angle(&self) -> f64 {
        self.point_angle
    }

    pub fn dividers(&self) -> Option<&Dividers> {
        self.dividers.as_ref()
    }

    pub fn base_arc(&self) -> ArcSpan {
        ArcSpan::new(self.start_angle as f64, self.sweep_angle as f64)
    }

    pub fn angle(&self, value: i32) -> f64 {
        self.start_angle as f64 + (value as f64 - self.start_value as f64) * self.point_angle
    }

    /// Clamps `value` into the scale, whichever way round the range runs.
    pub fn clamp(&self, value: i32) -> i32 {
        let (lo, hi) = if self.start_value <= self.end_value {
            (self.start_value, self.end_value)
        } else {
            (self.end_value, self.start_value)
        };
        value.clamp(lo, hi)
    }

    /// Arc covered by the pointer at `value`.
    ///
    /// A positive `point_size` gives a fixed segment centered on the value,
    /// pushed forward so it never starts before the scale origin. Otherwise
    /// the pointer fills the scale from the origin, with a minimal sweep at
    /// the origin itself so it stays visible.
    pub fn pointer_arc(&self, value: i32, point_size: i32) -> ArcSpan {
        let current = self.angle(value);
        let direction = if self.sweep_angle < 0 { -1.0 } else { 1.0 };

        if point_size > 0 {
            let half = (point_size / 2) as f64;
            let size = point_size as f64;
            // Distance travelled along the sweep direction.
            let travelled = (current - self.start_angle as f64) * direction;
            if travelled > half {
                ArcSpan::new(current - half * direction, size * direction)
            } else {
                ArcSpan::new(current, size * direction)
            }
        } else if value == self.start_value {
            ArcSpan::new(self.start_angle as f64, MIN_POINTER_SWEEP * direction)
        } else {
            ArcSpan::new(self.start_angle as f64, current - self.start_angle as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GaugeError;

    fn scale(config: GaugeConfig) -> Scale {
        Scale::new(&config).unwrap()
    }

    #[test]
    fn test_calibration_example() {
        let s = scale(GaugeConfig::builder().sweep_angle(270).build());
        assert!((s.point_angle() - 0.27).abs() < 1e-12);
        assert!((s.angle(500) - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_endpoints_map_to_sweep_bounds() {
        for (start_angle, sweep) in [(0, 270), (135, 270), (90, -180), (270, 360)] {
            let s = scale(
                GaugeConfig::builder()
                    .start_angle(start_angle)
                    .sweep_angle(sweep)
                    .start_value(-50)
                    .end_value(150)
                    .build(),
            );
            assert!((s.angle(-50) - start_angle as f64).abs() < 1e-9);
            assert!((s.angle(150) - (start_angle + sweep) as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_angle_monotonic_with_sweep_sign() {
        let forward = scale(GaugeConfig::builder().sweep_angle(270).build());
        let reverse = scale(GaugeConfig::builder().sweep_angle(-270).build());
        let mut last_f = forward.angle(0);
        let mut last_r = reverse.angle(0);
        for value in (10..=1000).step_by(10) {
            assert!(forward.angle(value) > last_f);
            assert!(reverse.angle(value) < last_r);
            last_f = forward.angle(value);
            last_r = reverse.angle(value);
        }
    }

    #[test]
    fn test_descending_value_range() {
        let s = scale(
            GaugeConfig::builder()
                .start_value(100)
                .end_value(0)
                .sweep_angle(200)
                .build(),
        );
        assert!((s.angle(0) - 200.0).abs() < 1e-9);
        assert_eq!(s.clamp(-5), 0);
        assert_eq!(s.clamp(120), 100);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = Scale::new(&GaugeConfig::builder().end_value(0).build()).unwrap_err();
        assert!(matches!(err, GaugeError::EmptyRange(0)));
    }

    #[test]
    fn test_long_pointer_at_origin_is_one_degree() {
        let s = scale(GaugeConfig::builder().start_angle(135).sweep_angle(270).build());
        assert_eq!(s.pointer_arc(0, 0), ArcSpan::new(135.0, 1.0));
    }

    #[test]
    fn test_long_pointer_spans_from_origin() {
        let s = scale(GaugeConfig::builder().sweep_angle(270).build());
        let arc = s.pointer_arc(500, 0);
        assert_eq!(arc.start, 0.0);
        assert!((arc.sweep - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_pointer_is_centered() {
        let s = scale(GaugeConfig::builder().sweep_angle(270).build());
        let arc = s.pointer_arc(500, 10);
        assert!((arc.start - 130.0).abs() < 1e-9);
        assert_eq!(arc.sweep, 10.0);
    }

    #[test]
    fn test_short_pointer_does_not_pass_origin() {
        let s = scale(GaugeConfig::builder().start_angle(90).sweep_angle(270).build());
        // 10 units = 2.7 degrees, less than half the pointer
        let arc = s.pointer_arc(10, 10);
        assert!((arc.start - 92.7).abs() < 1e-9);
        assert_eq!(arc.sweep, 10.0);
        assert!(arc.start >= 90.0);
    }

    #[test]
    fn test_short_pointer_odd_size_halves_down() {
        let s = scale(GaugeConfig::builder().sweep_angle(1000).build());
        let arc = s.pointer_arc(500, 7);
        assert!((arc.start - 497.0).abs() < 1e-9);
        assert_eq!(arc.sweep, 7.0);
    }

    #[test]
    fn test_reverse_long_pointer_at_origin_runs_backwards() {
        let s = scale(GaugeConfig::builder().start_angle(135).sweep_angle(-270).build());
        assert_eq!(s.pointer_arc(0, 0), ArcSpan::new(135.0, -1.0));
        let arc = s.pointer_arc(500, 0);
        assert_eq!(arc.start, 135.0);
        assert!((arc.sweep + 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_short_pointer_near_origin_starts_at_value() {
        let s = scale(GaugeConfig::builder().start_angle(135).sweep_angle(-270).build());
        // 10 units = -2.7 degrees, less than half the pointer
        let arc = s.pointer_arc(10, 10);
        assert!((arc.start - 132.3).abs() < 1e-9);
        assert_eq!(arc.sweep, -10.0);
        assert!(arc.start <= 135.0);
    }

    #[test]
    fn test_reverse_short_pointer_is_centered() {
        let s = scale(GaugeConfig::builder().start_angle(135).sweep_angle(-270).build());
        // angle(500) = 0, so the segment runs from 5 down to -5
        let arc = s.pointer_arc(500, 10);
        assert!((arc.start - 5.0).abs() < 1e-9);
        assert_eq!(arc.sweep, -10.0);
    }

    #[test]
    fn test_divider_geometry() {
        let s = scale(
            GaugeConfig::builder()
                .sweep_angle(270)
                .divider_size(100)
                .divider_step(10)
                .build(),
        );
        let d = s.dividers().unwrap();
        // 270 / (1000 / 100)
        assert_eq!(d.size, 27);
        assert_eq!(d.count, 10);
        assert_eq!(d.step_angle, 27);
    }

    #[test]
    fn test_divider_count_follows_step_percent() {
        for (step, count) in [(1, 100), (3, 33), (25, 4), (100, 1)] {
            let s = scale(
                GaugeConfig::builder()
                    .divider_size(10)
                    .divider_step(step)
                    .build(),
            );
            assert_eq!(s.dividers().unwrap().count, count);
        }
    }

    #[test]
    fn test_divider_first_last_toggles() {
        let base = |first: bool, last: bool| {
            scale(
                GaugeConfig::builder()
                    .divider_size(10)
                    .divider_step(20)
                    .divider_draw_first(first)
                    .divider_draw_last(last)
                    .build(),
            )
        };
        let both = base(true, true);
        let dividers = both.dividers().unwrap();
        assert_eq!(dividers.indices().len(), 6);
        assert_eq!(base(false, true).dividers().unwrap().indices(), 1..6);
        assert_eq!(base(true, false).dividers().unwrap().indices(), 0..5);
        assert_eq!(base(false, false).dividers().unwrap().indices().len(), 4);
    }

    #[test]
    fn test_divider_spans_start_at_scale_origin() {
        let s = scale(
            GaugeConfig::builder()
                .start_angle(135)
                .sweep_angle(270)
                .divider_size(50)
                .divider_step(50)
                .build(),
        );
        let spans: Vec<_> = s.dividers().unwrap().spans(s.start_angle()).collect();
        // size: 270 / (1000 / 50) = 13, step angle: 270 / 2 = 135
        assert_eq!(
            spans,
            vec![
                ArcSpan::new(135.0, 13.0),
                ArcSpan::new(270.0, 13.0),
                ArcSpan::new(405.0, 13.0),
            ]
        );
    }

    #[test]
    fn test_divider_spans_near_angle_limit() {
        let start = i32::MAX - 100;
        let s = scale(
            GaugeConfig::builder()
                .start_angle(start)
                .sweep_angle(360)
                .divider_size(10)
                .divider_step(10)
                .build(),
        );
        let spans: Vec<_> = s.dividers().unwrap().spans(s.start_angle()).collect();
        assert_eq!(spans.len(), 11);
        assert_eq!(spans[10].start, f64::from(start) + 360.0);
    }

    #[test]
    fn test_no_dividers_by_default() {
        assert!(scale(GaugeConfig::default()).dividers().is_none());
    }
}
