use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use pixels::{Pixels, SurfaceTexture};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use arc_gauge::{Canvas, DemoScreen, Easing, LabelFont, Layout};

#[derive(Parser, Debug)]
#[command(name = "gauge-demo", about = "Three arc gauges and a button that animates them", version)]
struct Cli {
    /// JSON layout describing the window and its gauges
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// TrueType/OpenType font for value labels (a system font is tried otherwise)
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Animation length applied by the button, in milliseconds
    #[arg(long, default_value_t = 3000)]
    duration_ms: u64,

    /// Interpolation curve applied by the button
    #[arg(long, value_enum, default_value_t = Easing::Bounce)]
    easing: Easing,

    /// Frame rate cap
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn load_font(path: Option<&PathBuf>) -> Result<Option<LabelFont>> {
    match path {
        Some(path) => {
            let font = LabelFont::from_file(path)
                .with_context(|| format!("loading font {}", path.display()))?;
            Ok(Some(font))
        }
        None => {
            let font = LabelFont::find_system();
            if font.is_none() {
                warn!("no system font found, value labels are disabled (pass --font)");
            }
            Ok(font)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let layout = match &cli.layout {
        Some(path) => Layout::from_file(path)
            .with_context(|| format!("loading layout {}", path.display()))?,
        None => Layout::default_demo(),
    };
    let font = load_font(cli.font.as_ref())?;
    anyhow::ensure!(cli.fps > 0.0, "--fps must be positive");

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&layout.title)
        .with_inner_size(LogicalSize::new(layout.width as f64, layout.height as f64))
        .build(&event_loop)?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut fb_width = size.width as usize;
    let mut fb_height = size.height as usize;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

    let mut screen = DemoScreen::new(&layout)?;
    screen.set_button_animation(Duration::from_millis(cli.duration_ms), cli.easing);
    screen.resize(fb_width as f32, fb_height as f32);
    info!(
        gauges = screen.gauges().len(),
        "click the button or press Space to animate, R for random targets, Esc to quit"
    );

    let frame_duration = Duration::from_secs_f64(1.0 / cli.fps);
    let mut last_frame = Instant::now();
    let mut cursor = (0.0_f32, 0.0_f32);
    let mut rng = rand::rng();
    let window_clone = window.clone();

    event_loop.run(move |event, window_target| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => window_target.exit(),
            WindowEvent::Resized(new_size) => {
                if new_size.width == 0 || new_size.height == 0 {
                    return;
                }
                if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                    error!("resizing surface: {e}");
                }
                // Keep the old frame size unless the buffer really changed.
                if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                    error!("resizing frame buffer: {e}");
                    return;
                }
                fb_width = new_size.width as usize;
                fb_height = new_size.height as usize;
                screen.resize(fb_width as f32, fb_height as f32);
            }
            WindowEvent::CursorMoved { position, .. } => {
                cursor = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                screen.on_click(cursor.0, cursor.1, Instant::now());
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Space) => screen.press_button(Instant::now()),
                Key::Named(NamedKey::Escape) => window_target.exit(),
                Key::Character(c) if c.as_str().eq_ignore_ascii_case("r") => {
                    let now = Instant::now();
                    screen.randomize_targets(&mut rng, now);
                    screen.press_button(now);
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                let frame = pixels.frame_mut();
                let mut canvas = Canvas::new(frame, fb_width, fb_height);
                screen.render(&mut canvas, font.as_ref());
                if let Err(e) = pixels.render() {
                    error!("presenting frame: {e}");
                    window_target.exit();
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if now.duration_since(last_frame) >= frame_duration {
                last_frame = now;
                if screen.tick(now) {
                    window_clone.request_redraw();
                }
            }
            window_target.set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
        }
        _ => {}
    })?;

    Ok(())
}
