use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, HtmlElement, MouseEvent, Window};

use crate::clock::FrameClock;
use crate::config::SiteConfig;
use crate::error::{ReportOnce, Result, VizError};
use crate::field::{ParticleField, Pointer};
use crate::frame::{RenderSurface, Scene};
use crate::globe::Globe;
use crate::network::ParticleNetwork;

use super::js_err;
use super::render::WebGlSurface;

/// Container ids, one per scene.
pub const FIELD_CONTAINER: &str = "canvas-container";
pub const GLOBE_CONTAINER: &str = "mission-canvas-container";
pub const NETWORK_CONTAINER: &str = "suite-canvas-container";

/// What a scene's drawing buffer tracks on resize.
#[derive(Debug, Clone, Copy)]
pub enum Sizing {
    Window,
    Container,
}

/// One scene bound to its container, canvas and animation loop.
pub struct SceneHost<S> {
    window: Window,
    container: HtmlElement,
    sizing: Sizing,
    surface: WebGlSurface,
    clock: FrameClock,
    scene: S,
}

impl<S: Scene + 'static> SceneHost<S> {
    /// Attach a canvas to `container_id` and build the scene.
    ///
    /// Returns `Ok(None)` if the container is not on this page; the scene is
    /// never constructed in that case.
    pub fn mount(
        window: &Window,
        document: &Document,
        container_id: &str,
        sizing: Sizing,
        build: impl FnOnce() -> S,
    ) -> Result<Option<Self>> {
        let Some(container) = document.get_element_by_id(container_id) else {
            log::debug!("#{container_id} not found, skipping scene");
            return Ok(None);
        };
        let container: HtmlElement = container
            .dyn_into()
            .map_err(|_| VizError::Js(format!("#{container_id} is not an HTML element")))?;

        let canvas = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| VizError::Js("created element is not a canvas".into()))?;
        let surface = WebGlSurface::new(canvas.clone())?;
        container.append_child(&canvas).map_err(js_err)?;

        let mut host = Self {
            window: window.clone(),
            container,
            sizing,
            surface,
            clock: FrameClock::new(),
            scene: build(),
        };
        host.resize();
        log::info!("scene mounted in #{container_id}");
        Ok(Some(host))
    }

    fn viewport(&self) -> (u32, u32) {
        match self.sizing {
            Sizing::Window => {
                let (width, height) = window_size(&self.window);
                (width as u32, height as u32)
            }
            Sizing::Container => (
                self.container.client_width().max(0) as u32,
                self.container.client_height().max(0) as u32,
            ),
        }
    }

    /// Match the surface and the camera to the current viewport.
    pub fn resize(&mut self) {
        let (width, height) = self.viewport();
        self.surface.resize(width, height);
        self.scene.camera_mut().resize(width, height);
        log::debug!("viewport resized to {width}x{height}");
    }

    /// Advance and draw one frame at the rAF timestamp `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> Result<()> {
        let (_, dt) = self.clock.tick(now_ms);
        let camera = self.scene.camera().clone();
        let frame = self.scene.advance(dt);
        self.surface.draw(&camera, &frame)
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Start the resize listener and the perpetual animation loop.
    pub fn run(self) -> Result<Rc<RefCell<Self>>> {
        let window = self.window.clone();
        let host = Rc::new(RefCell::new(self));

        let on_resize = {
            let host = host.clone();
            Closure::wrap(Box::new(move || host.borrow_mut().resize()) as Box<dyn FnMut()>)
        };
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(js_err)?;
        on_resize.forget();

        // `f` holds the animation-frame closure so that it can re-request
        // itself. Storing it in an `Option` lets us create the `Closure`
        // first and then reach it from within itself.
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let loop_host = host.clone();
        let loop_window = window.clone();
        let mut errors = ReportOnce::default();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
            if let Err(err) = loop_host.borrow_mut().frame(now_ms) {
                errors.report(&err);
            }

            if let Some(callback) = f.borrow().as_ref() {
                let scheduled =
                    loop_window.request_animation_frame(callback.as_ref().unchecked_ref());
                if let Err(err) = scheduled {
                    errors.report(&js_err(err));
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(callback) = g.borrow().as_ref() {
            window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .map_err(js_err)?;
        }
        Ok(host)
    }
}

/// Mount and start every scene whose container exists on the page.
pub fn start_all(window: &Window, document: &Document, config: &SiteConfig) -> Result<()> {
    let mut rng = rand::thread_rng();

    let field = SceneHost::mount(window, document, FIELD_CONTAINER, Sizing::Window, || {
        ParticleField::new(config.field.clone(), &mut rng)
    })?;
    if let Some(host) = field {
        let host = host.run()?;
        track_pointer(window, document, host)?;
    }

    if let Some(host) = SceneHost::mount(window, document, GLOBE_CONTAINER, Sizing::Container, || {
        Globe::new(config.globe.clone())
    })? {
        host.run()?;
    }

    if let Some(host) =
        SceneHost::mount(window, document, NETWORK_CONTAINER, Sizing::Container, || {
            ParticleNetwork::new(config.network.clone(), &mut rng)
        })?
    {
        host.run()?;
    }

    Ok(())
}

/// Feed normalized pointer positions into the background field.
fn track_pointer(
    window: &Window,
    document: &Document,
    host: Rc<RefCell<SceneHost<ParticleField>>>,
) -> Result<()> {
    let window = window.clone();
    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let (width, height) = window_size(&window);
        let pointer =
            Pointer::from_client(event.client_x() as f64, event.client_y() as f64, width, height);
        host.borrow_mut().scene_mut().set_pointer(pointer);
    }) as Box<dyn FnMut(MouseEvent)>);

    document
        .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())
        .map_err(js_err)?;
    on_move.forget();
    Ok(())
}

fn window_size(window: &Window) -> (f64, f64) {
    let dim = |value: std::result::Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}
