use bon::Builder;
use serde::Deserialize;

use crate::animation::Easing;
use crate::color::Color;
use crate::error::{GaugeError, Result};

/// How the ends of the base arc, pointer and dividers are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
}

/// Inner spacing between the widget bounds and the gauge, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn uniform(px: f32) -> Self {
        Self {
            left: px,
            top: px,
            right: px,
            bottom: px,
        }
    }
}

/// Attribute set a gauge is constructed from.
///
/// Built with [`GaugeConfig::builder`] or deserialized from a camelCase JSON
/// object in which every key is optional.
#[derive(Debug, Clone, PartialEq, Builder, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GaugeConfig {
    // Base track
    #[builder(default = 10.0)]
    pub stroke_width: f32,
    #[builder(default = Color::GRAY)]
    pub stroke_color: Color,
    #[builder(default)]
    pub stroke_cap: StrokeCap,

    // Angles, in degrees. 0 is at 3 o'clock, positive sweeps run clockwise.
    #[builder(default = 0)]
    pub start_angle: i32,
    #[builder(default = 360)]
    pub sweep_angle: i32,

    // Value scale
    #[builder(default = 0)]
    pub start_value: i32,
    #[builder(default = 1000)]
    pub end_value: i32,
    /// Value an animation runs to, `end_value` when unset.
    pub target_value: Option<i32>,

    // Pointer
    #[builder(default = 0)]
    pub point_size: i32,
    #[builder(default = Color::WHITE)]
    pub point_start_color: Color,
    #[builder(default = Color::WHITE)]
    pub point_end_color: Color,
    #[builder(default = 10.0)]
    pub point_stroke_width: f32,

    // Dividers
    #[builder(default = Color::WHITE)]
    pub divider_color: Color,
    #[builder(default = 0)]
    pub divider_size: i32,
    #[builder(default = 0)]
    pub divider_step: i32,
    #[builder(default = true)]
    pub divider_draw_first: bool,
    #[builder(default = true)]
    pub divider_draw_last: bool,

    // Label
    #[builder(default = true)]
    pub display_value: bool,
    #[builder(default = 100.0)]
    pub text_size: f32,
    #[builder(default = Color::BLACK)]
    pub text_color: Color,

    #[builder(default)]
    pub padding: Padding,

    // Animation
    #[builder(default = false)]
    pub animate_value: bool,
    #[builder(default = 750)]
    pub animation_duration_ms: u64,
    #[builder(default)]
    pub easing: Easing,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    pub fn target_value(&self) -> i32 {
        self.target_value.unwrap_or(self.end_value)
    }

    /// Rejects attribute combinations that would make the scale degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.end_value == self.start_value {
            return Err(GaugeError::EmptyRange(self.start_value));
        }
        for (field, value) in [
            ("point_size", self.point_size),
            ("divider_size", self.divider_size),
        ] {
            if value < 0 {
                return Err(GaugeError::Negative { field, value });
            }
        }
        for (field, value) in [
            ("stroke_width", self.stroke_width),
            ("point_stroke_width", self.point_stroke_width),
            ("text_size", self.text_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GaugeError::InvalidDimension { field, value });
            }
        }
        if self.divider_size > 0 {
            if !(1..=100).contains(&self.divider_step) {
                return Err(GaugeError::InvalidDividerStep(self.divider_step));
            }
            let range = self.end_value.abs_diff(self.start_value);
            if range / self.divider_size.unsigned_abs() == 0 {
                return Err(GaugeError::DividerTooLarge {
                    size: self.divider_size,
                    range: range.min(i32::MAX as u32) as i32,
                });
            }
        }
        Ok(())
    }
}
