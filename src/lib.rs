// src/lib.rs

pub mod app;
pub mod config;
pub mod engine_lib;
pub mod error;
pub mod rendering_lib;
pub mod ui;

use std::sync::Arc;

use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::WindowBuilder,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use app::RoomApp;
use config::AppConfig;
use error::{ViewerError, ViewerResult};

fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Warn).expect("Couldn't initialize logger");
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    init_logging();
    if let Err(e) = run_viewer().await {
        log::error!("{}", e);
    }
}

async fn run_viewer() -> ViewerResult<()> {
    let app_config = AppConfig::load()?;

    let event_loop = EventLoop::new().map_err(|e| ViewerError::Window(e.to_string()))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(app_config.window.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(app_config.window.width, app_config.window.height))
            .build(&event_loop)
            .map_err(|e| ViewerError::Window(e.to_string()))?,
    );

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("wasm-viewport")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .ok_or_else(|| ViewerError::Window("couldn't append canvas to #wasm-viewport".to_string()))?;
    }

    let mut app_state = RoomApp::new(window.clone(), &app_config).await?;

    event_loop
        .run(move |event, target: &EventLoopWindowTarget<()>| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent {
                    ref event,
                    window_id,
                } if window_id == window.id() => {
                    if !app_state.handle_window_event(event, &window) {
                        match event {
                            WindowEvent::CloseRequested => {
                                target.exit();
                            }
                            WindowEvent::Resized(physical_size) => {
                                app_state.resize(*physical_size);
                            }
                            WindowEvent::RedrawRequested => { /* In AboutToWait */ }
                            _ => {}
                        }
                    }
                }
                Event::AboutToWait => {
                    app_state.update();
                    match app_state.render(&window) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            app_state.resize(app_state.get_size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("WGPU Out Of Memory! Exiting.");
                            target.exit();
                        }
                        Err(e) => log::warn!("Surface error: {:?}", e),
                    }

                    if !target.exiting() {
                        window.request_redraw();
                    }
                }
                _ => {}
            }
        })
        .map_err(|e| ViewerError::Window(e.to_string()))
}
