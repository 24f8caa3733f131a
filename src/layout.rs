//! Declarative screen description: window settings plus one attribute set
//! per gauge, loaded from JSON.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::color::Color;
use crate::config::{GaugeConfig, Padding, StrokeCap};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Layout {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub gauges: Vec<GaugeConfig>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: "Gauges".to_string(),
            width: 360,
            height: 900,
            background: Color::WHITE,
            gauges: Vec::new(),
        }
    }
}

impl Layout {
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Layout = serde_json::from_str(json)?;
        for gauge in &layout.gauges {
            gauge.validate()?;
        }
        Ok(layout)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let layout = Self::from_json(&json)?;
        debug!(path = %path.display(), gauges = layout.gauges.len(), "loaded layout");
        Ok(layout)
    }

    /// Three gauges: a speedometer-style long pointer, a full circle with a
    /// short pointer, and a dial with dividers.
    pub fn default_demo() -> Self {
        let speedometer = GaugeConfig::builder()
            .start_angle(135)
            .sweep_angle(270)
            .start_value(0)
            .end_value(1000)
            .stroke_width(14.0)
            .point_stroke_width(14.0)
            .stroke_color(Color::new(0x40, 0x40, 0x40))
            .stroke_cap(StrokeCap::Round)
            .point_start_color(Color::new(0xff, 0xc1, 0x07))
            .point_end_color(Color::new(0xd3, 0x2f, 0x2f))
            .text_size(48.0)
            .padding(Padding::uniform(10.0))
            .build();

        let ring = GaugeConfig::builder()
            .start_angle(270)
            .sweep_angle(360)
            .start_value(200)
            .end_value(700)
            .target_value(650)
            .point_size(12)
            .stroke_width(8.0)
            .point_stroke_width(16.0)
            .stroke_color(Color::new(0xcf, 0xd8, 0xdc))
            .point_start_color(Color::new(0x19, 0x76, 0xd2))
            .point_end_color(Color::new(0x00, 0xbc, 0xd4))
            .text_size(40.0)
            .padding(Padding::uniform(10.0))
            .build();

        let dial = GaugeConfig::builder()
            .start_angle(90)
            .sweep_angle(270)
            .start_value(0)
            .end_value(100)
            .target_value(75)
            .stroke_width(16.0)
            .point_stroke_width(16.0)
            .stroke_color(Color::new(0x9e, 0x9e, 0x9e))
            .point_start_color(Color::new(0x38, 0x8e, 0x3c))
            .point_end_color(Color::new(0x8b, 0xc3, 0x4a))
            .divider_size(1)
            .divider_step(10)
            .divider_color(Color::WHITE)
            .divider_draw_first(false)
            .divider_draw_last(false)
            .text_size(40.0)
            .padding(Padding::uniform(10.0))
            .build();

        Self {
            gauges: vec![speedometer, ring, dial],
            ..Self::default()
        }
    }
}
