// src/app.rs

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use winit::{event::WindowEvent, window::Window};

use crate::config::{AppConfig, SceneConfig};
use crate::engine_lib::assembler::SceneAssembler;
use crate::engine_lib::camera::Camera;
use crate::engine_lib::controller::OrbitController;
use crate::engine_lib::demo_room::create_demo_room;
use crate::engine_lib::events::{CameraChangeBus, CameraChangeEvent};
use crate::engine_lib::scene_types::{ModelFragment, PartTag, Scene};
use crate::engine_lib::visibility::VisibilityResolver;
use crate::error::{ViewerError, ViewerResult};
use crate::rendering_lib::renderer::Renderer;
use crate::rendering_lib::shader::WGSL_SHADER_SOURCE;
use crate::ui::{build_ui, PanelState};

/// Owns the whole application state. Components borrow pieces of it for the
/// duration of one call.
pub struct RoomApp {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    scene: Scene,
    camera: Camera,
    controller: OrbitController,
    camera_events: CameraChangeBus,
    resolver: Rc<RefCell<VisibilityResolver>>,
    clear_color: wgpu::Color,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

/// Reads the configured model, or the demo room when none is set.
pub fn load_fragments(scene_config: &SceneConfig) -> ViewerResult<Vec<ModelFragment>> {
    match &scene_config.model_path {
        #[cfg(not(target_arch = "wasm32"))]
        Some(path) => crate::engine_lib::model_loader::load_model(path),
        #[cfg(target_arch = "wasm32")]
        Some(path) => {
            log::warn!("Model files are not readable on the web, ignoring {}", path);
            Ok(create_demo_room())
        }
        None => {
            log::info!("No model configured, using the demo room");
            Ok(create_demo_room())
        }
    }
}

impl RoomApp {
    pub async fn new(window: Arc<Window>, app_config: &AppConfig) -> ViewerResult<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ViewerError::Gpu(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| ViewerError::Gpu("no compatible adapter".to_string()))?;

        let required_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default()
        };
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| ViewerError::Gpu(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| ViewerError::Gpu("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer = Renderer::new(&device, config.format, WGSL_SHADER_SOURCE, config.width, config.height);

        let fragments = load_fragments(&app_config.scene)?;
        let mut scene = SceneAssembler::new(&app_config.scene).assemble(fragments)?;

        let camera = Camera::from_config(&app_config.camera, config.width as f32 / config.height as f32);
        let controller = OrbitController::new(app_config.controls.clone(), config.height);

        let resolver = Rc::new(RefCell::new(VisibilityResolver::new(
            app_config.visibility.sealing_floor_policy,
        )));
        // Establish the initial state before the first camera move.
        resolver.borrow().resolve(camera.position, &mut scene)?;
        let mut camera_events = CameraChangeBus::new();
        camera_events.subscribe(Box::new(resolver.clone()));

        renderer.upload_scene(&device, &scene);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        let [r, g, b, a] = app_config.render.clear_color;

        Ok(Self {
            surface, device, queue, config, size,
            renderer, scene, camera, controller,
            camera_events, resolver,
            clear_color: wgpu::Color { r, g, b, a },
            egui_ctx, egui_state, egui_renderer,
        })
    }

    pub fn get_size(&self) -> winit::dpi::PhysicalSize<u32> { self.size }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer.resize(&self.device, new_size.width, new_size.height);
            self.camera.set_viewport(new_size.width, new_size.height);
            self.controller.resize(new_size.height);
        }
    }

    /// Advances damped camera motion and notifies subscribers when the camera
    /// actually moved.
    pub fn update(&mut self) {
        if !self.controller.update(&mut self.camera) {
            return;
        }
        let event = CameraChangeEvent {
            position: self.camera.position,
            target: self.camera.target,
        };
        if let Err(e) = self.camera_events.publish(&event, &mut self.scene) {
            log::error!("Camera change handling failed: {}", e);
        }
    }

    fn panel_state(&self) -> PanelState {
        PanelState {
            camera_position: self.camera.position,
            parts: PartTag::ALL
                .iter()
                .map(|tag| (*tag, self.scene.room_part(*tag).map(|p| p.visible).unwrap_or(false)))
                .collect(),
            visible_parts: self.scene.visible_part_count(),
            total_parts: self.scene.parts.len(),
            policy: self.resolver.borrow().policy(),
        }
    }

    fn apply_policy_change(&mut self, panel: &PanelState) {
        log::info!("Sealing/floor policy set to {:?}", panel.policy);
        let mut resolver = self.resolver.borrow_mut();
        resolver.set_policy(panel.policy);
        if let Err(e) = resolver.resolve(self.camera.position, &mut self.scene) {
            log::error!("Visibility update failed: {}", e);
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output_texture = self.surface.get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Main Command Encoder"),
        });

        let mut panel = self.panel_state();
        let raw_input = self.egui_state.take_egui_input(window);
        let mut policy_changed = false;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            policy_changed = build_ui(ctx, &mut panel);
        });
        if policy_changed {
            self.apply_policy_change(&panel);
        }

        self.renderer.render_scene(
            &self.queue, &mut encoder, &view,
            &self.scene, &self.camera,
            self.clear_color,
        );

        self.egui_state.handle_platform_output(window, full_output.platform_output);
        let tris = self.egui_ctx.tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.egui_renderer.update_buffers(&self.device, &self.queue, &mut encoder, &tris, &screen_descriptor);
        {
            let mut gui_render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view, resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None, occlusion_query_set: None, timestamp_writes: None,
            });
            self.egui_renderer.render(&mut gui_render_pass, &tris, &screen_descriptor);
        }
        for tex_id in &full_output.textures_delta.free { self.egui_renderer.free_texture(tex_id); }

        self.queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();
        Ok(())
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent, window: &Window) -> bool {
        if self.egui_state.on_window_event(window, event).consumed { return true; }
        self.controller.handle_window_event(event)
    }
}
