use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use broomchase_input::{MotionDirection, Viewport};
use broomchase_kernel::{FixedTimestep, SimConfig, Simulation};
use broomchase_render::RenderView;
use broomchase_render_wgpu::{SceneStyle, WgpuRenderer};
use broomchase_tools::{SimInspector, describe_event};
use clap::Parser;
use egui::Context as EguiContext;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// HUD event log length.
const EVENT_LOG_LEN: usize = 8;

#[derive(Parser)]
#[command(name = "broomchase-desktop", about = "Fly the broom, chase the snitch")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML simulation config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the config's RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Most simulation ticks run per rendered frame when catching up
    #[arg(long, default_value_t = FixedTimestep::DEFAULT_MAX_STEPS)]
    max_catch_up: u32,
}

/// Simulation plus the frame-side state that drives it.
struct AppState {
    sim: Simulation,
    clock: FixedTimestep,
    last_frame: Instant,
    show_hud: bool,
    event_log: VecDeque<String>,
}

impl AppState {
    /// The viewport is captured once; later resizes do not renormalize the pointer.
    fn new(config: SimConfig, viewport: Viewport, max_catch_up: u32) -> Self {
        Self {
            clock: FixedTimestep::new(config.tick_rate_hz).with_max_steps(max_catch_up),
            sim: Simulation::new(config, viewport),
            last_frame: Instant::now(),
            show_hud: true,
            event_log: VecDeque::with_capacity(EVENT_LOG_LEN),
        }
    }

    /// Run the simulation ticks due since the last frame.
    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.advance(dt);
    }

    /// Run the ticks due for `dt` seconds of frame time, clamped to 0.1 s.
    fn advance(&mut self, dt: f64) {
        for _ in 0..self.clock.advance(dt.min(0.1)) {
            self.sim.step();
        }
        for event in self.sim.drain_events() {
            if self.event_log.len() == EVENT_LOG_LEN {
                self.event_log.pop_front();
            }
            self.event_log.push_back(describe_event(&event));
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        let direction = match key {
            KeyCode::KeyW => Some(MotionDirection::Forward),
            KeyCode::KeyS => Some(MotionDirection::Backward),
            _ => None,
        };
        if let Some(direction) = direction {
            if pressed {
                self.sim.press_motion(direction);
            } else {
                self.sim.release_motion(direction);
            }
            return;
        }

        if pressed && key == KeyCode::F1 {
            self.show_hud = !self.show_hud;
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let summary = SimInspector::summary(&self.sim);

        egui::Window::new("Broom Chase")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Tick: {}  Time: {:.1}s", summary.tick, summary.time));
                ui.label(format!("Catches: {}", summary.catches));
                ui.label(format!("Separation: {:.2}", summary.separation));
                ui.label(format!(
                    "Snitch: {:?}  cooldown {:.1}s",
                    summary.wander, summary.cooldown
                ));
                ui.label(format!("Particles: {}", summary.live_particles));
                ui.label(format!(
                    "Steering: {}  Clock backlog: {:.1} ms",
                    if summary.turning { "turning" } else { "level" },
                    self.clock.pending() * 1000.0
                ));
                ui.separator();
                for line in &self.event_log {
                    ui.small(line);
                }
                ui.separator();
                ui.small("W/S: fly | Mouse: steer | F1: toggle HUD");
            });
    }
}

/// Everything that exists only once a window is up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, style: SceneStyle) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Broom Chase")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("broomchase_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height, style);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Draw the scene and the HUD on top of it.
    fn frame(&mut self, egui_ctx: &EguiContext, state: &AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let snapshot = state.sim.snapshot();
        let view = RenderView::from_camera(&snapshot.camera, self.aspect());
        self.renderer
            .render(&self.device, &self.queue, &target, &view, &snapshot);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct App {
    config: SimConfig,
    max_catch_up: u32,
    state: Option<AppState>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(config: SimConfig, max_catch_up: u32) -> Self {
        Self {
            config,
            max_catch_up,
            state: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let style = SceneStyle {
            snitch_radius: self.config.snitch.radius,
            ..SceneStyle::default()
        };
        let gpu = match Gpu::new(event_loop, &self.egui_ctx, style) {
            Ok(gpu) => gpu,
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let viewport = Viewport::new(gpu.config.width, gpu.config.height);
        self.state = Some(AppState::new(self.config, viewport, self.max_catch_up));
        self.gpu = Some(gpu);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(gpu), Some(state)) = (&mut self.gpu, &mut self.state) else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                state.handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.sim.pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                state.sim.pointer_left();
            }
            WindowEvent::RedrawRequested => {
                state.update();
                gpu.frame(&self.egui_ctx, state);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    tracing::info!(seed = config.seed, "broomchase-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, cli.max_catch_up);
    event_loop.run_app(&mut app)?;

    Ok(())
}
