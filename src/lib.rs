//! Arc gauge widget.
//!
//! A [`Gauge`] maps an integer value range onto an angular range and draws a
//! base arc, a pointer, optional dividers and a centered value label into an
//! RGBA frame. Value changes can be animated with an eased [`ValueAnimator`].
//!
//! ```no_run
//! use std::time::Instant;
//! use arc_gauge::{Gauge, GaugeConfig, Rect};
//!
//! let mut gauge = Gauge::new(
//!     GaugeConfig::builder()
//!         .start_angle(135)
//!         .sweep_angle(270)
//!         .end_value(1000)
//!         .animate_value(true)
//!         .build(),
//! )?;
//! gauge.layout(Rect::new(0.0, 0.0, 300.0, 300.0));
//! gauge.animate_to(750, Instant::now());
//! # Ok::<(), arc_gauge::GaugeError>(())
//! ```

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod gauge;
pub mod layout;
pub mod render;
pub mod scale;
pub mod screen;

pub use animation::{Easing, ValueAnimator};
pub use color::Color;
pub use config::{GaugeConfig, Padding, StrokeCap};
pub use error::{GaugeError, Result};
pub use gauge::Gauge;
pub use layout::Layout;
pub use render::{Canvas, DrawCommand, LabelFont, Paint, Rect, Scene};
pub use scale::{ArcSpan, Dividers, Scale};
pub use screen::DemoScreen;
