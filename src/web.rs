//! Browser host: mounts a [`ParticleField`] on a `<canvas>` and drives it from
//! `requestAnimationFrame`, window `resize` and pointer `mousemove`/`touchmove`.
//!
//! ```js
//! import init, { StarParticleCanvas } from "./star_particle_canvas.js";
//!
//! await init();
//! const stars = new StarParticleCanvas("StarParticleCanvas", 50);
//! // later, when the page section goes away
//! stars.unmount();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent,
    Window,
};

use crate::binding::{mount_if_present, Bindings, HostEvents};
use crate::particles::{Color, DrawingContext, FieldConfig, ParticleField, Surface, Viewport};

/// Element id looked up when JavaScript does not name a canvas.
pub const DEFAULT_CANVAS_ID: &str = "StarParticleCanvas";

#[derive(Debug, Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("element #{0} is not a <canvas>")]
    NotACanvas(String),
    #[error("canvas did not provide a 2d context")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Canvas element plus its 2D context.
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl DrawingContext for CanvasSurface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        if let Err(err) = self.ctx.set_transform(a, b, c, d, e, f) {
            log::warn!("setTransform failed: {err:?}");
        }
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_string());
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_shadow_color(&mut self, color: Color) {
        self.ctx.set_shadow_color(&color.to_string());
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.ctx.set_shadow_blur(blur);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.rect(x, y, width, height);
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}

impl Surface for CanvasSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        let style = self.canvas.style();
        for (property, value) in [("width", width), ("height", height)] {
            if let Err(err) = style.set_property(property, &format!("{value}px")) {
                log::warn!("failed to set canvas {property}: {err:?}");
            }
        }
    }
}

/// State shared by the frame callback and the event listeners.
struct Host {
    window: Window,
    field: ParticleField,
    surface: CanvasSurface,
}

impl Host {
    fn now(&self) -> f64 {
        self.window.performance().map_or(0.0, |p| p.now())
    }

    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
            self.window.device_pixel_ratio(),
        )
    }

    fn resize(&mut self) {
        let viewport = self.viewport();
        self.field.resize(viewport, &mut self.surface);
    }

    fn pointer_moved(&mut self, x: i32, y: i32) {
        let now = self.now();
        self.field.on_pointer_move(x as f32, y as f32, now);
    }

    fn frame(&mut self, now: f64) {
        self.field.frame(now, &mut self.surface);
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Window-side registrations: the listener closures and the self-rescheduling
/// frame callback.
struct WindowEvents {
    window: Window,
    frame: Rc<RefCell<Option<FrameCallback>>>,
    on_resize: Closure<dyn FnMut()>,
    on_mouse_move: Closure<dyn FnMut(MouseEvent)>,
    on_touch_move: Closure<dyn FnMut(TouchEvent)>,
}

impl WindowEvents {
    fn listener(&self, event: &str) -> Option<&js_sys::Function> {
        match event {
            "resize" => Some(self.on_resize.as_ref().unchecked_ref()),
            "mousemove" => Some(self.on_mouse_move.as_ref().unchecked_ref()),
            "touchmove" => Some(self.on_touch_move.as_ref().unchecked_ref()),
            _ => None,
        }
    }
}

impl HostEvents for WindowEvents {
    type Error = MountError;

    fn listen(&mut self, event: &'static str, passive: bool) -> Result<(), MountError> {
        let listener = self
            .listener(event)
            .ok_or_else(|| MountError::Js(format!("no listener for {event}")))?;
        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            self.window
                .add_event_listener_with_callback_and_add_event_listener_options(event, listener, &options)?;
        } else {
            self.window.add_event_listener_with_callback(event, listener)?;
        }
        Ok(())
    }

    fn unlisten(&mut self, event: &'static str) -> Result<(), MountError> {
        if let Some(listener) = self.listener(event) {
            self.window.remove_event_listener_with_callback(event, listener)?;
        }
        Ok(())
    }

    fn request_frame(&mut self) -> Result<i32, MountError> {
        let frame = self.frame.borrow();
        let callback = frame
            .as_ref()
            .ok_or_else(|| MountError::Js("frame callback already released".to_owned()))?;
        Ok(self.window.request_animation_frame(callback.as_ref().unchecked_ref())?)
    }

    fn cancel_frame(&mut self, pending: Option<i32>) -> Result<(), MountError> {
        // Dropping the callback also breaks its reference to its own slot.
        self.frame.borrow_mut().take();
        if let Some(id) = pending {
            self.window.cancel_animation_frame(id)?;
        }
        Ok(())
    }
}

/// A field wired into the page. Dropping it (or calling
/// [`unmount`](Self::unmount)) cancels the pending frame and removes every
/// listener it added.
pub struct MountedField {
    host: Rc<RefCell<Host>>,
    bindings: Bindings<WindowEvents>,
}

impl MountedField {
    pub fn live_len(&self) -> usize {
        self.host.borrow().field.live_len()
    }

    pub fn unmount(mut self) {
        if self.bindings.detach() {
            log::info!("star particle field unmounted");
        }
    }
}

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
    });
}

/// Mounts on the canvas with id `canvas_id`. A page without that element gets
/// `Ok(None)` and nothing is wired.
pub fn mount(canvas_id: &str, config: FieldConfig) -> Result<Option<MountedField>, MountError> {
    init_logging();

    let Some(window) = web_sys::window() else {
        log::warn!("no window; particle field not mounted");
        return Ok(None);
    };
    let element = window.document().and_then(|d| d.get_element_by_id(canvas_id));
    mount_if_present(canvas_id, element, |element| {
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| MountError::NotACanvas(canvas_id.to_owned()))?;
        mount_canvas(canvas, config)
    })
}

pub fn mount_canvas(canvas: HtmlCanvasElement, config: FieldConfig) -> Result<MountedField, MountError> {
    init_logging();

    let window = web_sys::window().ok_or(MountError::NoWindow)?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or(MountError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| MountError::NoContext)?;

    let seed = js_sys::Math::random().to_bits() ^ (js_sys::Date::now() as u64);
    let mut host = Host {
        window: window.clone(),
        field: ParticleField::with_seed(config, seed),
        surface: CanvasSurface { canvas, ctx },
    };
    let now = host.now();
    host.field.reset_clock(now);
    host.resize();
    let host = Rc::new(RefCell::new(host));

    let frame: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let frame_handle = Rc::new(Cell::new(None));
    {
        let host = Rc::clone(&host);
        let next = Rc::clone(&frame);
        let handle = Rc::clone(&frame_handle);
        let window = window.clone();
        *frame.borrow_mut() = Some(Closure::new(move |now: f64| {
            host.borrow_mut().frame(now);

            let scheduled = next
                .borrow()
                .as_ref()
                .map(|callback| window.request_animation_frame(callback.as_ref().unchecked_ref()));
            match scheduled {
                Some(Ok(id)) => handle.set(Some(id)),
                Some(Err(err)) => {
                    log::warn!("requestAnimationFrame failed, stopping: {err:?}");
                    handle.set(None);
                }
                None => handle.set(None),
            }
        }));
    }

    let on_resize = {
        let host = Rc::clone(&host);
        Closure::<dyn FnMut()>::new(move || host.borrow_mut().resize())
    };
    let on_mouse_move = {
        let host = Rc::clone(&host);
        Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            host.borrow_mut().pointer_moved(event.client_x(), event.client_y());
        })
    };
    let on_touch_move = {
        let host = Rc::clone(&host);
        Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                host.borrow_mut().pointer_moved(touch.client_x(), touch.client_y());
            }
        })
    };

    let events = WindowEvents {
        window,
        frame,
        on_resize,
        on_mouse_move,
        on_touch_move,
    };
    let mut mounted = MountedField {
        host,
        bindings: Bindings::with_frame_handle(events, frame_handle),
    };
    // On error `mounted` drops here and unregisters whatever was attached.
    mounted.bindings.attach()?;

    log::info!(
        "star particle field mounted (max_particles={})",
        mounted.host.borrow().field.max_particles()
    );
    Ok(mounted)
}

/// JavaScript handle for a mounted field.
#[wasm_bindgen]
pub struct StarParticleCanvas {
    mounted: Option<MountedField>,
}

#[wasm_bindgen]
impl StarParticleCanvas {
    /// Mounts on `canvasId` (default `"StarParticleCanvas"`) with a soft cap
    /// of `maxParticles` (default 50). A missing canvas yields an inert handle.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: Option<String>, max_particles: Option<u32>) -> Result<StarParticleCanvas, JsValue> {
        let canvas_id = canvas_id.as_deref().unwrap_or(DEFAULT_CANVAS_ID);
        let mut config = FieldConfig::default();
        if let Some(max) = max_particles {
            config.max_particles = max as usize;
        }
        Ok(Self {
            mounted: mount(canvas_id, config)?,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.mounted.is_some()
    }

    #[wasm_bindgen(getter, js_name = liveCount)]
    pub fn live_count(&self) -> u32 {
        self.mounted.as_ref().map_or(0, |m| m.live_len() as u32)
    }

    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.unmount();
        }
    }
}
