use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use portal_assets::{AssetError, PortalModel, load_portal_model};
use portal_common::{Color, Viewport};
use portal_render_wgpu::{FrameParams, PortalRenderer};
use portal_scene::{Fireflies, FrameClock, OrbitCamera, Settings};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "portal-desktop", about = "Portal scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing baked.jpg and portal.gltf
    #[arg(long, default_value = "./assets")]
    assets: PathBuf,

    /// Initial window width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "720")]
    height: u32,
}

/// Start loading the portal model off the main thread.
///
/// The result arrives over the channel whenever the load finishes; a
/// receiver dropped during shutdown just discards it.
fn spawn_loader(assets_dir: PathBuf) -> Receiver<Result<PortalModel, AssetError>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(load_portal_model(&assets_dir));
    });
    rx
}

/// Application state outside the GPU objects.
struct AppState {
    settings: Settings,
    camera: OrbitCamera,
    clock: FrameClock,
    fireflies: Fireflies,
    viewport: Viewport,
    model_rx: Option<Receiver<Result<PortalModel, AssetError>>>,
    dragging: bool,
    shutting_down: bool,
    /// Smoothed frame time in milliseconds for the stats readout.
    frame_ms: f32,
}

impl AppState {
    fn new(assets_dir: PathBuf, width: u32, height: u32) -> Self {
        Self {
            settings: Settings::default(),
            camera: OrbitCamera::default(),
            clock: FrameClock::new(),
            fireflies: Fireflies::new(),
            viewport: Viewport::new(width, height, 1.0),
            model_rx: Some(spawn_loader(assets_dir)),
            dragging: false,
            shutting_down: false,
            frame_ms: 0.0,
        }
    }

    /// Non-blocking check of the assets-ready gate.
    fn poll_model(&mut self) -> Option<PortalModel> {
        let rx = self.model_rx.as_ref()?;
        match rx.try_recv() {
            Ok(Ok(model)) => {
                self.model_rx = None;
                Some(model)
            }
            Ok(Err(e)) => {
                tracing::error!("portal model failed to load: {e}");
                self.model_rx = None;
                None
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.model_rx = None;
                None
            }
        }
    }

    /// Update drag state from a left-button transition.
    ///
    /// A press the UI claims never starts a drag, but a release always ends
    /// one: the pointer may have moved over the debug window between press
    /// and release, and a drag that outlives its button keeps orbiting the
    /// camera with nothing held.
    fn handle_left_button(&mut self, pressed: bool, ui_claimed: bool) {
        if pressed {
            if !ui_claimed {
                self.dragging = true;
            }
        } else {
            self.dragging = false;
        }
    }

    fn note_frame(&mut self, delta_seconds: f32) {
        let ms = delta_seconds * 1000.0;
        self.frame_ms = if self.frame_ms == 0.0 {
            ms
        } else {
            self.frame_ms * 0.9 + ms * 0.1
        };
    }

    fn draw_ui(&mut self, ctx: &EguiContext, model_attached: bool) {
        egui::Area::new(egui::Id::new("frame_stats"))
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .show(ctx, |ui| {
                let fps = if self.frame_ms > 0.0 {
                    1000.0 / self.frame_ms
                } else {
                    0.0
                };
                ui.label(format!("{fps:5.1} fps / {:.2} ms", self.frame_ms));
            });

        egui::Window::new("Debug")
            .default_width(240.0)
            .show(ctx, |ui| {
                color_row(ui, "clear color", &mut self.settings.clear_color);
                color_row(ui, "portal start", &mut self.settings.portal_color_start);
                color_row(ui, "portal end", &mut self.settings.portal_color_end);
                ui.add(
                    egui::Slider::new(
                        &mut self.settings.firefly_size,
                        Settings::FIREFLY_SIZE_RANGE,
                    )
                    .step_by(1.0)
                    .text("firefly size"),
                );
                ui.separator();
                let status = if model_attached {
                    "model: loaded"
                } else if self.model_rx.is_some() {
                    "model: loading…"
                } else {
                    "model: unavailable"
                };
                ui.small(status);
            });
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) {
    ui.horizontal(|ui| {
        let mut rgb = color.to_array();
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            *color = Color::new(rgb[0], rgb[1], rgb[2]);
        }
        ui.label(label);
    });
}

struct PortalApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<PortalRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl PortalApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for PortalApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Portal")
            .with_inner_size(PhysicalSize::new(
                self.state.viewport.width(),
                self.state.viewport.height(),
            ));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("portal_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

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

        self.state.viewport = Viewport::new(size.width, size.height, window.scale_factor());
        self.state.camera.set_aspect(self.state.viewport.aspect());

        let renderer = PortalRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            &self.state.fireflies,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let ui_claimed = match &mut self.egui_winit {
            Some(egui_winit) => {
                egui_winit
                    .on_window_event(self.window.as_ref().unwrap(), &event)
                    .consumed
            }
            None => false,
        };

        // Button transitions are routed regardless of who claimed the event;
        // see handle_left_button.
        if let WindowEvent::MouseInput {
            button: MouseButton::Left,
            state: btn_state,
            ..
        } = event
        {
            self.state
                .handle_left_button(btn_state == ElementState::Pressed, ui_claimed);
            return;
        }

        if ui_claimed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                // No further redraws may be requested or honored past this
                // point; the loop winds down with this flag set.
                self.state.shutting_down = true;
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.viewport.resize(new_size.width, new_size.height);
                    self.state.camera.set_aspect(self.state.viewport.aspect());
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.state.viewport.set_scale_factor(scale_factor);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 60.0,
                };
                self.state.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                if self.state.shutting_down {
                    return;
                }

                let frame = self.state.clock.tick();
                self.state.note_frame(frame.delta);
                self.state.camera.update(frame.delta);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                // Assets-ready gate: attach the model whenever the
                // background load delivers it.
                if let Some(model) = self.state.poll_model() {
                    if let Some(renderer) = &mut self.renderer {
                        renderer.attach_model(device, queue, &model);
                    }
                }

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
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

                let model_attached = self
                    .renderer
                    .as_ref()
                    .is_some_and(PortalRenderer::has_model);
                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        &self.state.settings,
                        FrameParams {
                            elapsed: frame.elapsed,
                            viewport: self.state.viewport,
                        },
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx, model_attached);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
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
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if !self.state.shutting_down {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.dragging {
                self.state.camera.drag(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state.shutting_down {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(assets = %cli.assets.display(), "portal-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PortalApp::new(AppState::new(cli.assets, cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    use portal_assets::{BAKED_MESH, POLE_LIGHT_A_MESH, POLE_LIGHT_B_MESH, PORTAL_LIGHT_MESH};
    use serde_json::json;

    /// Write a loadable asset directory: one quad shared by all four node
    /// names, an external binary buffer, and a tiny baked image.
    fn write_test_assets(dir: &Path) {
        let positions: [[f32; 3]; 4] = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let uvs: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];

        let mut bin: Vec<u8> = Vec::new();
        for p in positions {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for uv in uvs {
            for c in uv {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        std::fs::write(dir.join("portal.bin"), &bin).unwrap();

        let document = json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "uri": "portal.bin", "byteLength": bin.len() }],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 0, "byteLength": 48 },
                { "buffer": 0, "byteOffset": 48, "byteLength": 32 },
                { "buffer": 0, "byteOffset": 80, "byteLength": 12 },
            ],
            "accessors": [
                { "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3" },
                { "bufferView": 1, "componentType": 5126, "count": 4, "type": "VEC2" },
                { "bufferView": 2, "componentType": 5123, "count": 6, "type": "SCALAR" },
            ],
            "meshes": [{
                "primitives": [{
                    "attributes": { "POSITION": 0, "TEXCOORD_0": 1 },
                    "indices": 2,
                }],
            }],
            "nodes": [
                { "name": BAKED_MESH, "mesh": 0 },
                { "name": PORTAL_LIGHT_MESH, "mesh": 0 },
                { "name": POLE_LIGHT_A_MESH, "mesh": 0 },
                { "name": POLE_LIGHT_B_MESH, "mesh": 0 },
            ],
        });
        std::fs::write(
            dir.join("portal.gltf"),
            serde_json::to_string(&document).unwrap(),
        )
        .unwrap();

        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([32, 25, 25]));
        img.save(dir.join("baked.jpg")).unwrap();
    }

    #[test]
    fn poll_model_delivers_successful_load_once() {
        let dir = tempfile::tempdir().unwrap();
        write_test_assets(dir.path());

        let mut state = AppState::new(dir.path().to_path_buf(), 640, 480);
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut model = None;
        while model.is_none() && std::time::Instant::now() < deadline {
            model = state.poll_model();
            std::thread::sleep(Duration::from_millis(5));
        }

        let model = model.expect("model arrives on the channel");
        assert_eq!(model.baked.name, BAKED_MESH);
        assert_eq!(model.portal_light.indices.len(), 6);
        // The channel is drained; later polls hand out nothing.
        assert!(state.model_rx.is_none());
        assert!(state.poll_model().is_none());
    }

    #[test]
    fn release_over_ui_still_ends_drag() {
        let mut state = AppState::new(PathBuf::from("/nonexistent/portal-assets"), 640, 480);
        state.handle_left_button(true, false);
        assert!(state.dragging);
        state.handle_left_button(false, true);
        assert!(!state.dragging);
    }

    #[test]
    fn press_over_ui_does_not_start_drag() {
        let mut state = AppState::new(PathBuf::from("/nonexistent/portal-assets"), 640, 480);
        state.handle_left_button(true, true);
        assert!(!state.dragging);
        state.handle_left_button(false, false);
        assert!(!state.dragging);
    }

    #[test]
    fn loader_reports_missing_assets_as_error() {
        let rx = spawn_loader(PathBuf::from("/nonexistent/portal-assets"));
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, Err(AssetError::Io(_))));
    }

    #[test]
    fn dropped_receiver_does_not_panic_loader() {
        let rx = spawn_loader(PathBuf::from("/nonexistent/portal-assets"));
        drop(rx);
        // The send error is swallowed; give the thread a moment to finish.
        std::thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn poll_model_consumes_load_errors() {
        let mut state = AppState::new(PathBuf::from("/nonexistent/portal-assets"), 640, 480);
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while state.model_rx.is_some() && std::time::Instant::now() < deadline {
            assert!(state.poll_model().is_none());
            std::thread::sleep(Duration::from_millis(5));
        }
        // The failed load drained the channel; later polls are no-ops.
        assert!(state.model_rx.is_none());
        assert!(state.poll_model().is_none());
    }
}
