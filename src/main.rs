//! Fireball entry point
//!
//! Web: sets up WebGPU on the page canvas and runs the animation loop.
//! Native: renders a single frame on the CPU and writes it as a PNG.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use fireball::FrameClock;
    use fireball::Settings;
    use fireball::renderer::{FireballRenderState, GpuContext, RendererError};

    /// Everything the animation loop owns
    struct App {
        render_state: FireballRenderState,
        clock: FrameClock,
    }

    impl App {
        /// Draw one frame. Returns false when the loop must stop.
        fn frame(&mut self, now_ms: f64) -> bool {
            let elapsed = self.clock.elapsed_seconds(now_ms);
            match self.render_state.render(elapsed) {
                Ok(()) => true,
                Err(RendererError::Frame(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    self.render_state.reconfigure();
                    true
                }
                Err(RendererError::Frame(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                    false
                }
                Err(e) if e.is_fatal() => {
                    log::error!("Rendering stopped: {}", e);
                    false
                }
                Err(e) => {
                    log::warn!("Render error: {}", e);
                    true
                }
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    async fn setup(settings: &Settings) -> Result<App, RendererError> {
        let window = web_sys::window().ok_or_else(|| RendererError::Context("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RendererError::Context("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| RendererError::Context("no #canvas element".into()))?
            .dyn_into()
            .map_err(|_| RendererError::Context("#canvas is not a canvas".into()))?;

        // Sized once; resizing is not tracked
        let client_w = canvas.client_width().max(0) as u32;
        let client_h = canvas.client_height().max(0) as u32;
        let (width, height) = settings.surface_size(client_w, client_h, window.device_pixel_ratio());
        canvas.set_width(width);
        canvas.set_height(height);
        log::info!(
            "Canvas {}x{} -> surface {}x{} ({} quality)",
            client_w,
            client_h,
            width,
            height,
            settings.quality.as_str()
        );

        let ctx = GpuContext::new(
            wgpu::SurfaceTarget::Canvas(canvas),
            settings.backend.backends(),
        )
        .await?;

        let render_state = FireballRenderState::new(ctx.surface, &ctx.adapter, width, height).await?;
        if let Some(e) = render_state.program_error() {
            return Err(RendererError::ProgramUnusable(e.clone()));
        }

        Ok(App {
            render_state,
            clock: FrameClock::new(now_ms()),
        })
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Fireball starting...");

        let settings = Settings::load();

        let app = match setup(&settings).await {
            Ok(app) => app,
            Err(e) => {
                log::error!("Fireball setup failed: {}", e);
                return;
            }
        };

        if let Some(loading) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(Rc::new(RefCell::new(app)));

        log::info!("Fireball running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            render_loop(app, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("Could not schedule the next frame, animation stopped: {:?}", e);
            return;
        }
        closure.forget();
    }

    fn render_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = app.borrow_mut().frame(time);
        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use fireball::Settings;
    use fireball::scene::render_frame;

    env_logger::init();
    log::info!("Fireball (native) starting...");
    log::info!("Native mode renders a CPU preview - run with `trunk serve` for the animated web version");

    let mut args = std::env::args().skip(1);
    let time: f32 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("time must be a number of seconds, got {arg:?}"))?,
        None => 2.0,
    };
    let output = args.next().unwrap_or_else(|| "fireball.png".to_string());

    let settings = Settings::load();
    let frame = render_frame(settings.preview_width, settings.preview_height, time);

    image::save_buffer(
        &output,
        frame.as_bytes(),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
    )
    .with_context(|| format!("failed to write {output}"))?;

    log::info!("Wrote {}x{} frame at t={}s to {}", frame.width, frame.height, time, output);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
