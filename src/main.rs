// main.rs — 窗口驱动：拖动鼠标 → 相机 → CPU 重投影 → 上传并呈现

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cli;
mod renderer;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use renderer::Renderer;
use sphere_viewer::{CameraState, ExecutionStrategy, Reprojector, Rotation, SourcePanorama};
use stats::FrameStats;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, WindowBuilder},
};

/// Longest step handed to time-based smoothing, so a drag after an idle
/// period does not jump straight to the target.
const MAX_TICK: Duration = Duration::from_millis(100);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 启动阶段的失败（没有源图、配置非法、无 GPU）都是致命的
    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let image_path = match cli.image.clone() {
        Some(path) => path,
        None => pick_image().context("no panorama image selected")?,
    };
    let source = SourcePanorama::open(&image_path)
        .with_context(|| format!("loading panorama {}", image_path.display()))?;
    log::info!(
        "loaded {} ({} x {})",
        image_path.display(),
        source.width(),
        source.height()
    );

    let mut engine = Reprojector::new(source, &config).context("building reprojector")?;
    log::info!(
        "viewport {} x {}, fov {}°, lookup tables {:.1} MiB (A = {}), {} rendering on {} worker(s)",
        config.width,
        config.height,
        config.fov_degrees,
        engine.tables().memory_bytes() as f64 / (1024.0 * 1024.0),
        config.accuracy,
        engine.strategy().label(),
        engine.workers(),
    );

    let mut camera = CameraState::new(&config);
    let mut frame = engine.new_frame()?;
    let (frame_w, frame_h) = (frame.width(), frame.height());

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Sphere Viewer")
            .with_inner_size(LogicalSize::new(frame_w, frame_h))
            .build(&event_loop)
            .context("creating window")?,
    );
    let mut renderer = pollster::block_on(Renderer::new(window.clone(), frame_w, frame_h))?;

    let mut mouse_pressed = false;
    let mut is_fullscreen = false;
    let mut stats = FrameStats::new();
    let mut last_tick = Instant::now();

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent { event, .. } => {
            let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
            if response.repaint {
                window.request_redraw();
            }
            if response.consumed {
                return;
            }

            match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                WindowEvent::Resized(new_size) => {
                    renderer.resize(new_size);
                    window.request_redraw();
                }

                WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                    match input.virtual_keycode {
                        Some(VirtualKeyCode::Escape) => *control_flow = ControlFlow::Exit,
                        Some(VirtualKeyCode::R) => {
                            camera.reset();
                            window.request_redraw();
                        }
                        Some(VirtualKeyCode::P) => {
                            engine.set_strategy(engine.strategy().toggle());
                            log::info!("switched to {} rendering", engine.strategy().label());
                            window.request_redraw();
                        }
                        Some(VirtualKeyCode::F11) => {
                            is_fullscreen = !is_fullscreen;
                            window.set_fullscreen(is_fullscreen.then(|| Fullscreen::Borderless(None)));
                        }
                        _ => {}
                    }
                }

                WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                    mouse_pressed = state == ElementState::Pressed;
                }

                WindowEvent::CursorMoved { position, .. } => {
                    if mouse_pressed {
                        if let Some((x, y)) = window_to_frame(position, renderer.size, (frame_w, frame_h)) {
                            camera.pointer(x, y);
                            window.request_redraw();
                        }
                    }
                }

                _ => {}
            }
        }

        Event::RedrawRequested(_) => {
            let now = Instant::now();
            let rotation = camera.tick(now.duration_since(last_tick).min(MAX_TICK));
            last_tick = now;

            let start = Instant::now();
            if let Err(e) = engine.render(&rotation, &mut frame) {
                log::error!("render pass failed: {e}");
                *control_flow = ControlFlow::Exit;
                return;
            }
            stats.record(start.elapsed(), Instant::now());
            log::debug!("{}", stats.line(frame_w, frame_h));

            renderer.upload_frame(&frame);

            let mut strategy = engine.strategy();
            let mut reset = false;
            let workers = engine.workers();
            let render_result = renderer.render_with_ui(&window, |ctx| {
                draw_ui(ctx, &stats, rotation, workers, &mut strategy, &mut reset);
            });

            if strategy != engine.strategy() {
                engine.set_strategy(strategy);
                log::info!("switched to {} rendering", strategy.label());
                window.request_redraw();
            }
            if reset {
                camera.reset();
                window.request_redraw();
            }

            match render_result {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                Err(e) => log::warn!("surface error: {e:?}"),
            }
        }

        Event::MainEventsCleared => {
            // 相机仍在逼近目标时持续重绘，静止后等待事件
            if camera.is_settled() {
                *control_flow = ControlFlow::Wait;
            } else {
                *control_flow = ControlFlow::Poll;
                window.request_redraw();
            }
        }

        _ => {}
    });
}

fn pick_image() -> Result<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open equirectangular panorama")
        .add_filter("Images", &["jpg", "jpeg", "png", "bmp"])
        .pick_file()
        .context("file dialog was cancelled")
}

/// Map a cursor position in window pixels onto the frame, which is stretched
/// over the whole window. `None` while the window has no area.
fn window_to_frame(
    position: PhysicalPosition<f64>,
    window: PhysicalSize<u32>,
    frame: (u32, u32),
) -> Option<(f64, f64)> {
    if window.width == 0 || window.height == 0 {
        return None;
    }
    let x = position.x * frame.0 as f64 / window.width as f64;
    let y = position.y * frame.1 as f64 / window.height as f64;
    Some((x, y))
}

fn draw_ui(
    ctx: &egui::Context,
    stats: &FrameStats,
    rotation: Rotation,
    workers: usize,
    strategy: &mut ExecutionStrategy,
    reset: &mut bool,
) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Frame {}", stats.count));
            ui.label("|");
            ui.label(format!(
                "Pass: {:.2} ms",
                stats.last_pass.as_secs_f64() * 1000.0
            ));
            ui.label("|");
            ui.label(egui::RichText::new(format!("FPS: {:.1}", stats.fps)).color(egui::Color32::GREEN));
            ui.label("|");
            ui.label(format!("Tilt: {:.1}°", rotation.x.to_degrees()));
            ui.label("|");
            ui.label(format!("Pan: {:.1}°", rotation.y.to_degrees()));
            ui.label("|");
            ui.radio_value(strategy, ExecutionStrategy::Sequential, "Sequential");
            ui.radio_value(
                strategy,
                ExecutionStrategy::Parallel,
                format!("Parallel ({workers})"),
            );
            ui.label("|");
            if ui.button("Reset view").clicked() {
                *reset = true;
            }
        });
    });
}
