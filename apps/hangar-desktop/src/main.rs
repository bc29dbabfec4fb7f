use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use hangar_input::{Action, HostRequest, InputRouter};
use hangar_persist::StateFile;
use hangar_render::{FrameSequencer, Viewport};
use hangar_render_wgpu::{SceneAssets, WgpuRenderer};
use hangar_scene::{FrameClock, ProgramState};
use hangar_tools::DebugOverlay;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Pixel scroll deltas are converted to wheel ticks at this rate.
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Parser)]
#[command(name = "hangar-desktop", about = "Hangar 5601 scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Program state file, loaded at startup and written on exit
    #[arg(long, default_value = "resources/program_state.txt")]
    state_file: PathBuf,

    /// Resource root holding objects/ and textures/
    #[arg(long, default_value = "resources")]
    assets: PathBuf,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 768)]
    height: u32,
}

fn action_for(key: KeyCode) -> Option<Action> {
    use hangar_common::Movement;
    match key {
        KeyCode::KeyW => Some(Action::Move(Movement::Forward)),
        KeyCode::KeyS => Some(Action::Move(Movement::Backward)),
        KeyCode::KeyA => Some(Action::Move(Movement::Left)),
        KeyCode::KeyD => Some(Action::Move(Movement::Right)),
        KeyCode::Escape => Some(Action::Exit),
        KeyCode::F1 => Some(Action::ToggleOverlay),
        _ => None,
    }
}

/// Everything the viewer owns apart from the GPU.
struct AppState {
    program: ProgramState,
    router: InputRouter,
    clock: FrameClock,
    sequencer: FrameSequencer,
    overlay: DebugOverlay,
    state_file: StateFile,
    started: Instant,
}

impl AppState {
    fn new(state_file: StateFile, viewport: Viewport) -> Self {
        Self {
            program: state_file.load(),
            router: InputRouter::new(),
            clock: FrameClock::new(),
            sequencer: FrameSequencer::new(viewport),
            overlay: DebugOverlay::new(),
            state_file,
            started: Instant::now(),
        }
    }

    fn save(&self) {
        if let Err(e) = self.state_file.save(&self.program) {
            tracing::error!("failed to save program state: {e}");
        }
    }
}

/// GPU resources, created together once the window exists.
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

struct GpuApp {
    state: AppState,
    assets: SceneAssets,
    initial_size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    /// Look input comes from raw device motion while captured and from
    /// cursor positions otherwise.
    cursor_captured: bool,
    startup_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState, assets: SceneAssets, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            state,
            assets,
            initial_size,
            gpu: None,
            egui_ctx: EguiContext::default(),
            cursor_captured: false,
            startup_error: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title(hangar_scene::timing::TITLE_PREFIX)
            .with_inner_size(self.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("hangar_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;
        let present_mode = if surface_caps
            .present_modes
            .contains(&wgpu::PresentMode::Immediate)
        {
            wgpu::PresentMode::AutoNoVsync
        } else {
            wgpu::PresentMode::AutoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &self.assets,
        )
        .context("failed to load scene assets")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?present_mode,
            "GPU initialized"
        );

        Ok(Gpu {
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

    fn handle_request(&mut self, event_loop: &ActiveEventLoop, request: HostRequest) {
        match request {
            HostRequest::Exit => event_loop.exit(),
            HostRequest::CaptureCursor => {
                if let Some(gpu) = &self.gpu {
                    capture_cursor(&gpu.window);
                    self.cursor_captured = true;
                }
            }
            HostRequest::ReleaseCursor => {
                if let Some(gpu) = &self.gpu {
                    release_cursor(&gpu.window);
                    self.cursor_captured = false;
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.state.started.elapsed().as_secs_f32();
        let timing = self.state.clock.tick(now);

        if let Some(request) = self.state.router.poll(&mut self.state.program, timing.delta) {
            self.handle_request(event_loop, request);
        }

        let plan = self
            .state
            .sequencer
            .plan(&mut self.state.program, timing.elapsed);

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if let Some(title) = &timing.title {
            gpu.window.set_title(title);
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = gpu
            .renderer
            .render(&gpu.device, &gpu.queue, &view, &plan);

        if frame.overlay {
            let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
            let overlay = &mut self.state.overlay;
            let program = &mut self.state.program;
            let full_output = self.egui_ctx.run(raw_input, |ctx| overlay.show(ctx, program));
            gpu.egui_winit
                .handle_platform_output(&gpu.window, full_output.platform_output);

            let paint_jobs = self
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [gpu.config.width, gpu.config.height],
                pixels_per_point: full_output.pixels_per_point,
            };

            for (id, image_delta) in &full_output.textures_delta.set {
                gpu.egui_renderer
                    .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
            }
            let mut encoder = gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("overlay_encoder"),
                });
            gpu.egui_renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("overlay_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
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
                gpu.egui_renderer
                    .render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            gpu.queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                gpu.egui_renderer.free_texture(id);
            }
        }

        output.present();
    }
}

fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        tracing::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

fn release_cursor(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        tracing::warn!("cursor release failed: {e}");
    }
    window.set_cursor_visible(true);
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                self.cursor_captured = !self.state.program.ui_enabled;
                if self.cursor_captured {
                    capture_cursor(&gpu.window);
                } else {
                    release_cursor(&gpu.window);
                }
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let mut consumed = false;
        if self.state.program.ui_enabled {
            if let Some(gpu) = &mut self.gpu {
                consumed = gpu.egui_winit.on_window_event(&gpu.window, &event).consumed;
            }
        }
        if consumed
            && !matches!(
                event,
                WindowEvent::KeyboardInput { .. } | WindowEvent::CursorMoved { .. }
            )
        {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                    tracing::debug!(
                        width = gpu.config.width,
                        height = gpu.config.height,
                        "surface resized"
                    );
                }
            }
            WindowEvent::Focused(false) => {
                self.state.router.release_all();
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
                let Some(action) = action_for(key) else {
                    return;
                };
                let request = self.state.router.key_event(
                    &mut self.state.program,
                    action,
                    key_state == ElementState::Pressed,
                );
                if let Some(request) = request {
                    self.handle_request(event_loop, request);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                if self.cursor_captured || consumed {
                    self.state.router.track_cursor(x, y);
                } else {
                    self.state.router.cursor_moved(&mut self.state.program, x, y);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.state.router.scroll(&mut self.state.program, dy);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.cursor_captured {
                self.state.router.mouse_delta(
                    &mut self.state.program,
                    delta.0 as f32,
                    -(delta.1 as f32),
                );
            }
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

    tracing::info!("hangar-desktop starting");

    let viewport = Viewport {
        width: cli.width,
        height: cli.height,
    };
    let state = AppState::new(StateFile::new(&cli.state_file), viewport);
    let assets = SceneAssets::new(&cli.assets);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, assets, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.startup_error.take() {
        return Err(e);
    }
    app.state.save();
    Ok(())
}
