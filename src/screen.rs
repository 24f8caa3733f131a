//! Demo screen: the layout's gauges stacked in rows above a button that
//! animates them.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::animation::Easing;
use crate::color::Color;
use crate::error::Result;
use crate::gauge::Gauge;
use crate::layout::Layout;
use crate::render::{Canvas, DrawCommand, LabelFont, Rect, Scene};

const BUTTON_HEIGHT: f32 = 56.0;
const BUTTON_MARGIN: f32 = 12.0;
const BUTTON_COLOR: Color = Color::new(0x3f, 0x51, 0xb5);
const BUTTON_LABEL: &str = "ANIMATE";

/// Number of gauges the button animates, counted from the top.
const ANIMATED_GAUGES: usize = 2;

#[derive(Debug)]
pub struct DemoScreen {
    gauges: Vec<Gauge>,
    background: Color,
    button: Rect,
    button_duration: Duration,
    button_easing: Easing,
    dirty: bool,
}

impl DemoScreen {
    pub fn new(layout: &Layout) -> Result<Self> {
        let gauges = layout
            .gauges
            .iter()
            .cloned()
            .map(Gauge::new)
            .collect::<Result<Vec<_>>>()?;
        let mut screen = Self {
            gauges,
            background: layout.background,
            button: Rect::default(),
            button_duration: Duration::from_millis(3000),
            button_easing: Easing::Bounce,
            dirty: true,
        };
        screen.resize(layout.width as f32, layout.height as f32);
        Ok(screen)
    }

    /// Overrides the curve the button applies before animating.
    pub fn set_button_animation(&mut self, duration: Duration, easing: Easing) {
        self.button_duration = duration;
        self.button_easing = easing;
    }

    pub fn gauges(&self) -> &[Gauge] {
        &self.gauges
    }

    pub fn button(&self) -> Rect {
        self.button
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.button = Rect::new(
            BUTTON_MARGIN,
            height - BUTTON_HEIGHT - BUTTON_MARGIN,
            width - BUTTON_MARGIN,
            height - BUTTON_MARGIN,
        );
        let available = (self.button.top - BUTTON_MARGIN).max(0.0);
        let rows = self.gauges.len().max(1) as f32;
        let row_height = available / rows;
        for (i, gauge) in self.gauges.iter_mut().enumerate() {
            let top = i as f32 * row_height;
            gauge.layout(Rect::new(0.0, top, width, top + row_height));
        }
        debug!(width, height, row_height, "screen resized");
        self.dirty = true;
    }

    /// Handles a click at `(x, y)`; returns whether it hit the button.
    pub fn on_click(&mut self, x: f32, y: f32, now: Instant) -> bool {
        if self.button.contains(x, y) {
            self.press_button(now);
            true
        } else {
            false
        }
    }

    pub fn press_button(&mut self, now: Instant) {
        info!(
            duration_ms = self.button_duration.as_millis() as u64,
            easing = ?self.button_easing,
            "animating gauges"
        );
        for (i, gauge) in self.gauges.iter_mut().enumerate() {
            if i < ANIMATED_GAUGES {
                gauge.set_animation_duration(self.button_duration);
                gauge.set_easing(self.button_easing);
                gauge.run_animation(now);
            } else if gauge.animate_value() {
                // Opted-in gauges follow along on their own curve.
                gauge.run_animation(now);
            }
        }
    }

    /// Picks a new random target inside each gauge's range. Gauges with
    /// `animate_value` set start moving towards it at `now`.
    pub fn randomize_targets<R: Rng>(&mut self, rng: &mut R, now: Instant) {
        for gauge in &mut self.gauges {
            let (lo, hi) = {
                let (a, b) = (gauge.start_value(), gauge.end_value());
                (a.min(b), a.max(b))
            };
            let target = rng.random_range(lo..=hi);
            debug!(target, "new gauge target");
            gauge.set_target_value(target, now);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.gauges.iter().any(Gauge::is_animating)
    }

    /// Advances all animations; returns whether the screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut redraw = self.dirty;
        for gauge in &mut self.gauges {
            redraw |= gauge.tick(now);
        }
        redraw
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(self.background));
        for gauge in &self.gauges {
            scene.extend(gauge.scene());
        }
        scene.add_command(DrawCommand::FillRect {
            rect: self.button,
            color: BUTTON_COLOR,
        });
        let (x, y) = self.button.center();
        scene.add_command(DrawCommand::Text {
            x,
            y,
            text: BUTTON_LABEL.to_string(),
            size: BUTTON_HEIGHT * 0.4,
            color: Color::WHITE,
        });
        scene
    }

    pub fn render(&mut self, canvas: &mut Canvas, font: Option<&LabelFont>) {
        self.scene().render(canvas, font);
        for gauge in &mut self.gauges {
            gauge.mark_drawn();
        }
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn screen() -> DemoScreen {
        DemoScreen::new(&Layout::default_demo()).unwrap()
    }

    #[test]
    fn test_gauges_stack_above_button() {
        let s = screen();
        assert_eq!(s.gauges().len(), 3);
        // 900 - 56 - 12 = 832 button top, 820 for the rows
        assert_eq!(s.button(), Rect::new(12.0, 832.0, 348.0, 888.0));
        let bounds: Vec<Rect> = s.gauges().iter().map(Gauge::bounds).collect();
        assert_eq!(bounds[0], Rect::new(0.0, 0.0, 360.0, 820.0 / 3.0));
        assert!((bounds[2].bottom - 820.0).abs() < 1e-3);
        assert!(bounds.iter().all(|b| b.bottom <= s.button().top));
    }

    #[test]
    fn test_click_outside_button_is_ignored() {
        let mut s = screen();
        assert!(!s.on_click(100.0, 100.0, Instant::now()));
        assert!(!s.is_animating());
    }

    #[test]
    fn test_click_on_button_animates_first_two_gauges() {
        let mut s = screen();
        assert!(s.on_click(180.0, 860.0, Instant::now()));
        let gauges = s.gauges();
        assert!(gauges[0].is_animating());
        assert!(gauges[1].is_animating());
        assert!(!gauges[2].is_animating());
        assert_eq!(gauges[0].easing(), Easing::Bounce);
        assert_eq!(gauges[1].animation_duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_button_animation_override() {
        let mut s = screen();
        s.set_button_animation(Duration::from_millis(100), Easing::Linear);
        let t0 = Instant::now();
        s.press_button(t0);
        assert!(s.tick(t0 + Duration::from_millis(100)));
        assert_eq!(s.gauges()[0].value(), 1000);
        assert_eq!(s.gauges()[1].value(), 650);
        assert!(!s.is_animating());
    }

    #[test]
    fn test_double_press_keeps_one_animation_per_gauge() {
        let mut s = screen();
        s.set_button_animation(Duration::from_millis(1000), Easing::Linear);
        let t0 = Instant::now();
        s.press_button(t0);
        s.press_button(t0 + Duration::from_millis(900));
        s.tick(t0 + Duration::from_millis(1400));
        assert!(s.gauges()[0].is_animating());
        assert_eq!(s.gauges()[0].value(), 500);
    }

    #[test]
    fn test_button_moves_gauges_with_animate_value() {
        let layout = Layout::from_json(include_str!("../demos/dashboard.json")).unwrap();
        let mut s = DemoScreen::new(&layout).unwrap();
        let t0 = Instant::now();
        s.press_button(t0);
        assert!(s.gauges()[2].is_animating());
        assert_eq!(s.gauges()[2].easing(), Easing::Decelerate);
        s.tick(t0 + Duration::from_secs(5));
        assert_eq!(s.gauges()[2].value(), 35);
        assert!(!s.is_animating());
    }

    #[test]
    fn test_randomize_targets_animates_opted_in_gauges() {
        let layout = Layout::from_json(include_str!("../demos/dashboard.json")).unwrap();
        let mut s = DemoScreen::new(&layout).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let t0 = Instant::now();
        s.randomize_targets(&mut rng, t0);
        assert!(!s.gauges()[0].is_animating());
        assert!(s.gauges()[2].is_animating());
        s.tick(t0 + Duration::from_secs(5));
        assert_eq!(s.gauges()[2].value(), s.gauges()[2].target_value());
    }

    #[test]
    fn test_randomize_targets_stays_in_range() {
        let mut s = screen();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            s.randomize_targets(&mut rng, Instant::now());
            for gauge in s.gauges() {
                let target = gauge.target_value();
                assert!(target >= gauge.start_value() && target <= gauge.end_value());
            }
        }
    }

    #[test]
    fn test_render_settles_until_next_change() {
        let mut s = screen();
        s.resize(120.0, 300.0);
        let mut buf = vec![0u8; 120 * 300 * 4];
        let mut canvas = Canvas::new(&mut buf, 120, 300);
        let now = Instant::now();
        assert!(s.tick(now));
        s.render(&mut canvas, None);
        assert!(!s.tick(now));
        assert_eq!(canvas.pixel(60, 280), Some(BUTTON_COLOR));

        s.press_button(now);
        assert!(s.tick(now + Duration::from_millis(100)));
    }

    #[test]
    fn test_scene_starts_with_clear_and_ends_with_button() {
        let s = screen();
        let scene = s.scene();
        let commands = scene.commands();
        assert_eq!(commands[0], DrawCommand::Clear(Color::WHITE));
        assert!(matches!(commands.last(), Some(DrawCommand::Text { text, .. }) if text == BUTTON_LABEL));
    }
}
