use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::animation::{Easing, ValueAnimator};
use crate::color::Color;
use crate::config::{GaugeConfig, Padding, StrokeCap};
use crate::error::Result;
use crate::render::{Canvas, DrawCommand, LabelFont, Paint, Rect, Scene};
use crate::scale::{ArcSpan, Scale};

/// A circular gauge: base arc, pointer, optional dividers and value label.
///
/// The gauge keeps its value inside `[start_value, end_value]`. Setters that
/// change the scale validate the whole attribute set first and leave the
/// gauge untouched when it is rejected.
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    scale: Scale,
    value: i32,
    bounds: Rect,
    rect: Rect,
    animator: ValueAnimator,
    dirty: bool,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Result<Self> {
        let scale = Scale::new(&config)?;
        let animator = ValueAnimator::new(
            Duration::from_millis(config.animation_duration_ms),
            config.easing,
        );
        debug!(
            start_value = config.start_value,
            end_value = config.end_value,
            start_angle = config.start_angle,
            sweep_angle = config.sweep_angle,
            point_angle = scale.point_angle(),
            "gauge created"
        );
        Ok(Self {
            value: config.start_value,
            config,
            scale,
            bounds: Rect::default(),
            rect: Rect::default(),
            animator,
            dirty: true,
        })
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// Places the gauge at `bounds` in canvas coordinates.
    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.recompute_rect();
    }

    /// Resizes the gauge, keeping its top-left corner.
    pub fn on_size_changed(&mut self, width: f32, height: f32) {
        let Rect { left, top, .. } = self.bounds;
        self.layout(Rect::new(left, top, left + width, top + height));
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Square the arcs are drawn in, in canvas coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn recompute_rect(&mut self) {
        let width = self.bounds.width();
        let height = self.bounds.height();
        let pad = self.config.padding;
        let stroke_padding = self.config.stroke_width.max(self.config.point_stroke_width);

        let local = if width < height {
            let inner = width - (pad.left + pad.right);
            Rect::new(
                pad.left + stroke_padding,
                height / 2.0 - inner / 2.0 + stroke_padding,
                width - pad.right - stroke_padding,
                height / 2.0 + inner / 2.0 - stroke_padding,
            )
        } else {
            let inner = height - (pad.top + pad.bottom);
            Rect::new(
                width / 2.0 - inner / 2.0 + stroke_padding,
                pad.top + stroke_padding,
                width / 2.0 + inner / 2.0 - stroke_padding,
                height - pad.bottom - stroke_padding,
            )
        };
        self.rect = local.offset(self.bounds.left, self.bounds.top);
        debug!(width, height, rect = ?self.rect, "gauge bounds changed");
        self.invalidate();
    }

    // ------------------------------------------------------------------------
    // Value
    // ------------------------------------------------------------------------

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Sets the current value, clamped into the scale.
    pub fn set_value(&mut self, value: i32) {
        let value = self.scale.clamp(value);
        if value != self.value {
            self.value = value;
            self.invalidate();
        }
    }

    /// Angle of the current value, in degrees.
    pub fn current_angle(&self) -> f64 {
        self.scale.angle(self.value)
    }

    pub fn target_value(&self) -> i32 {
        self.config.target_value()
    }

    /// Sets the value animations run towards. With `animate_value` set the
    /// animation (re)starts at `now`.
    pub fn set_target_value(&mut self, target: i32, now: Instant) {
        self.config.target_value = Some(target);
        if self.config.animate_value {
            self.run_animation(now);
        }
    }

    /// Moves towards `target`: animated when `animate_value` is set,
    /// immediately otherwise.
    pub fn animate_to(&mut self, target: i32, now: Instant) {
        self.set_target_value(target, now);
        if !self.config.animate_value {
            self.set_value(target);
        }
    }

    // ------------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------------

    /// Runs the value animation from the scale start to the target value,
    /// restarting it if it is already running.
    pub fn run_animation(&mut self, now: Instant) {
        trace!(target = self.target_value(), "running gauge animation");
        self.animator.start(now);
    }

    pub fn cancel_animation(&mut self) {
        self.animator.cancel();
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    pub fn animator(&self) -> &ValueAnimator {
        &self.animator
    }

    pub fn easing(&self) -> Easing {
        self.animator.easing()
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.config.easing = easing;
        self.animator.set_easing(easing);
    }

    pub fn animation_duration(&self) -> Duration {
        self.animator.duration()
    }

    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.config.animation_duration_ms = duration.as_millis().min(u64::MAX as u128) as u64;
        self.animator.set_duration(duration);
    }

    /// Advances a running animation; returns whether a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(fraction) = self.animator.tick(now) {
            let start = i64::from(self.config.start_value);
            let diff = i64::from(self.target_value()) - start;
            let step = (diff as f64 * fraction) as i64;
            let value = (start + step).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
            self.set_value(value);
        }
        self.dirty
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn pointer_arc(&self) -> ArcSpan {
        self.scale.pointer_arc(self.value, self.config.point_size)
    }

    /// Draw commands for the current state, in painting order.
    pub fn scene(&self) -> Vec<DrawCommand> {
        let config = &self.config;
        let mut commands = Vec::new();

        commands.push(DrawCommand::Arc {
            rect: self.rect,
            span: self.scale.base_arc(),
            stroke_width: config.stroke_width,
            cap: config.stroke_cap,
            paint: Paint::Solid(config.stroke_color),
        });

        commands.push(DrawCommand::Arc {
            rect: self.rect,
            span: self.pointer_arc(),
            stroke_width: config.point_stroke_width,
            cap: config.stroke_cap,
            paint: Paint::LinearGradient {
                from: (self.bounds.right, self.bounds.bottom),
                to: (self.bounds.left, self.bounds.top),
                from_color: config.point_end_color,
                to_color: config.point_start_color,
            },
        });

        if let Some(dividers) = self.scale.dividers() {
            commands.extend(dividers.spans(self.scale.start_angle()).map(|span| {
                DrawCommand::Arc {
                    rect: self.rect,
                    span,
                    stroke_width: config.stroke_width,
                    cap: config.stroke_cap,
                    paint: Paint::Solid(config.divider_color),
                }
            }));
        }

        if config.display_value {
            let (x, y) = self.bounds.center();
            commands.push(DrawCommand::Text {
                x,
                y,
                text: self.value.to_string(),
                size: config.text_size,
                color: config.text_color,
            });
        }

        commands
    }

    pub fn render(&mut self, canvas: &mut Canvas, font: Option<&LabelFont>) {
        let mut scene = Scene::new();
        scene.extend(self.scene());
        scene.render(canvas, font);
        self.mark_drawn();
    }

    /// Records that the current state has been drawn.
    pub fn mark_drawn(&mut self) {
        self.dirty = false;
    }

    // ------------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------------

    /// Applies `update` to a copy of the attributes and commits it only if
    /// the resulting scale is valid.
    fn reconfigure(&mut self, update: impl FnOnce(&mut GaugeConfig)) -> Result<()> {
        let mut config = self.config.clone();
        update(&mut config);
        let scale = Scale::new(&config)?;
        self.config = config;
        self.scale = scale;
        self.value = self.scale.clamp(self.value);
        self.recompute_rect();
        Ok(())
    }

    pub fn start_angle(&self) -> i32 {
        self.config.start_angle
    }

    pub fn set_start_angle(&mut self, start_angle: i32) -> Result<()> {
        self.reconfigure(|c| c.start_angle = start_angle)
    }

    pub fn sweep_angle(&self) -> i32 {
        self.config.sweep_angle
    }

    pub fn set_sweep_angle(&mut self, sweep_angle: i32) -> Result<()> {
        self.reconfigure(|c| c.sweep_angle = sweep_angle)
    }

    pub fn start_value(&self) -> i32 {
        self.config.start_value
    }

    pub fn set_start_value(&mut self, start_value: i32) -> Result<()> {
        self.reconfigure(|c| c.start_value = start_value)
    }

    pub fn end_value(&self) -> i32 {
        self.config.end_value
    }

    pub fn set_end_value(&mut self, end_value: i32) -> Result<()> {
        self.reconfigure(|c| c.end_value = end_value)
    }

    pub fn point_size(&self) -> i32 {
        self.config.point_size
    }

    pub fn set_point_size(&mut self, point_size: i32) -> Result<()> {
        self.reconfigure(|c| c.point_size = point_size)
    }

    pub fn stroke_width(&self) -> f32 {
        self.config.stroke_width
    }

    pub fn set_stroke_width(&mut self, stroke_width: f32) -> Result<()> {
        self.reconfigure(|c| c.stroke_width = stroke_width)
    }

    pub fn point_stroke_width(&self) -> f32 {
        self.config.point_stroke_width
    }

    pub fn set_point_stroke_width(&mut self, point_stroke_width: f32) -> Result<()> {
        self.reconfigure(|c| c.point_stroke_width = point_stroke_width)
    }

    pub fn padding(&self) -> Padding {
        self.config.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.config.padding = padding;
        self.recompute_rect();
    }

    pub fn divider_size(&self) -> i32 {
        self.config.divider_size
    }

    pub fn set_divider_size(&mut self, divider_size: i32) -> Result<()> {
        self.reconfigure(|c| c.divider_size = divider_size)
    }

    pub fn divider_step(&self) -> i32 {
        self.config.divider_step
    }

    pub fn set_divider_step(&mut self, divider_step: i32) -> Result<()> {
        self.reconfigure(|c| c.divider_step = divider_step)
    }

    pub fn divider_draw_first(&self) -> bool {
        self.config.divider_draw_first
    }

    pub fn set_divider_draw_first(&mut self, draw_first: bool) -> Result<()> {
        self.reconfigure(|c| c.divider_draw_first = draw_first)
    }

    pub fn divider_draw_last(&self) -> bool {
        self.config.divider_draw_last
    }

    pub fn set_divider_draw_last(&mut self, draw_last: bool) -> Result<()> {
        self.reconfigure(|c| c.divider_draw_last = draw_last)
    }

    pub fn text_size(&self) -> f32 {
        self.config.text_size
    }

    pub fn set_text_size(&mut self, text_size: f32) -> Result<()> {
        self.reconfigure(|c| c.text_size = text_size)
    }

    pub fn stroke_color(&self) -> Color {
        self.config.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.config.stroke_color = color;
        self.invalidate();
    }

    pub fn stroke_cap(&self) -> StrokeCap {
        self.config.stroke_cap
    }

    pub fn set_stroke_cap(&mut self, cap: StrokeCap) {
        self.config.stroke_cap = cap;
        self.invalidate();
    }

    pub fn point_start_color(&self) -> Color {
        self.config.point_start_color
    }

    pub fn set_point_start_color(&mut self, color: Color) {
        self.config.point_start_color = color;
        self.invalidate();
    }

    pub fn point_end_color(&self) -> Color {
        self.config.point_end_color
    }

    pub fn set_point_end_color(&mut self, color: Color) {
        self.config.point_end_color = color;
        self.invalidate();
    }

    pub fn divider_color(&self) -> Color {
        self.config.divider_color
    }

    pub fn set_divider_color(&mut self, color: Color) {
        self.config.divider_color = color;
        self.invalidate();
    }

    pub fn text_color(&self) -> Color {
        self.config.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.config.text_color = color;
        self.invalidate();
    }

    pub fn display_value(&self) -> bool {
        self.config.display_value
    }

    pub fn set_display_value(&mut self, display_value: bool) {
        self.config.display_value = display_value;
        self.invalidate();
    }

    pub fn animate_value(&self) -> bool {
        self.config.animate_value
    }

    pub fn set_animate_value(&mut self, animate_value: bool) {
        self.config.animate_value = animate_value;
    }
}
