use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, MouseEvent, TouchEvent, Window,
};

use vault_engine::{
    FrameHost, HostError, InputEvent, PointerSource, RenderBuffer, SurfaceProvider,
    TextureId, TextureRegistry, Viewport,
};

use crate::canvas::CanvasSurfaceProvider;

fn js_err(e: JsValue) -> HostError {
    HostError::Js(format!("{:?}", e))
}

type Listener = Closure<dyn FnMut(Event)>;

/// Browser implementation of [`FrameHost`].
///
/// Frame and pointer callbacks are plain `fn`s: they reach the running loop
/// through the owner's thread-local, so the host never holds a reference back
/// to the loop that owns it.
pub struct WebHost {
    window: Window,
    document: Document,
    container: HtmlElement,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    viewport: Viewport,
    frame_callback: Closure<dyn FnMut()>,
    frame_id: Option<i32>,
    on_pointer: fn(InputEvent),
    listeners: Vec<(&'static str, Listener)>,
    images: HashMap<TextureId, HtmlImageElement>,
    surfaces: CanvasSurfaceProvider,
}

impl WebHost {
    pub fn new(container: HtmlElement, on_frame: fn(), on_pointer: fn(InputEvent)) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or_else(|| HostError::MissingElement("window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| HostError::MissingElement("document".into()))?;
        let frame_callback = Closure::wrap(Box::new(move || on_frame()) as Box<dyn FnMut()>);

        Ok(Self {
            surfaces: CanvasSurfaceProvider::new(document.clone()),
            window,
            document,
            container,
            canvas: None,
            ctx: None,
            viewport: Viewport::default(),
            frame_callback,
            frame_id: None,
            on_pointer,
            listeners: Vec::new(),
            images: HashMap::new(),
        })
    }

    /// Measure the window and container as they are laid out right now.
    pub fn measure(&self) -> Viewport {
        let window_width = self
            .window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);
        Viewport::new(
            window_width as f32,
            self.container.client_width() as f32,
            self.container.client_height() as f32,
        )
        .with_pixel_ratio(self.window.device_pixel_ratio() as f32)
    }

    /// Whether a render canvas is currently attached to the container.
    pub fn is_attached(&self) -> bool {
        self.canvas.is_some()
    }

    fn listen(&mut self, kind: &'static str, listener: Listener) -> Result<(), HostError> {
        self.container
            .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
            .map_err(js_err)?;
        self.listeners.push((kind, listener));
        Ok(())
    }

    fn install_listeners(&mut self) -> Result<(), HostError> {
        let on_pointer = self.on_pointer;

        let container = self.container.clone();
        let mouse_move = Closure::wrap(Box::new(move |event: Event| {
            if let Some(e) = event.dyn_ref::<MouseEvent>() {
                let client = Vec2::new(e.client_x() as f32, e.client_y() as f32);
                on_pointer(InputEvent::pointer_from_client(
                    client,
                    container_origin(&container),
                    PointerSource::Mouse,
                ));
            }
        }) as Box<dyn FnMut(Event)>);
        self.listen("mousemove", mouse_move)?;

        let container = self.container.clone();
        let touch_move = Closure::wrap(Box::new(move |event: Event| {
            let e = event.unchecked_ref::<TouchEvent>();
            if let Some(touch) = e.touches().get(0) {
                let client = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                on_pointer(InputEvent::pointer_from_client(
                    client,
                    container_origin(&container),
                    PointerSource::Touch,
                ));
            }
        }) as Box<dyn FnMut(Event)>);
        self.listen("touchmove", touch_move)?;

        for kind in ["mouseleave", "touchend"] {
            let leave = Closure::wrap(Box::new(move |_event: Event| {
                on_pointer(InputEvent::PointerLeave);
            }) as Box<dyn FnMut(Event)>);
            self.listen(kind, leave)?;
        }
        Ok(())
    }

    fn image_for(&mut self, id: TextureId, textures: &TextureRegistry) -> Option<HtmlImageElement> {
        if let Some(image) = self.images.get(&id) {
            return Some(image.clone());
        }
        let texture = textures.get(id)?;
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not create image for texture {}: {:?}", id.0, e);
                return None;
            }
        };
        image.set_src(&texture.data_url);
        self.images.insert(id, image.clone());
        Some(image)
    }
}

fn container_origin(container: &HtmlElement) -> Vec2 {
    let rect = container.get_bounding_client_rect();
    Vec2::new(rect.left() as f32, rect.top() as f32)
}

impl FrameHost for WebHost {
    fn attach(&mut self, viewport: Viewport) -> Result<(), HostError> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HostError::MissingElement("canvas".into()))?;

        let ratio = viewport.pixel_ratio.max(1.0);
        canvas.set_width((viewport.container_width * ratio).round() as u32);
        canvas.set_height((viewport.container_height * ratio).round() as u32);
        let style = canvas.style();
        style
            .set_property("width", &format!("{}px", viewport.container_width))
            .map_err(js_err)?;
        style
            .set_property("height", &format!("{}px", viewport.container_height))
            .map_err(js_err)?;
        style.set_property("display", "block").map_err(js_err)?;

        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| HostError::MissingElement("2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::MissingElement("2d context".into()))?;

        self.container.append_child(&canvas).map_err(js_err)?;
        self.canvas = Some(canvas);
        self.ctx = Some(ctx);
        self.viewport = viewport;

        if let Err(e) = self.install_listeners() {
            self.detach();
            return Err(e);
        }
        log::debug!("Canvas attached at {}x{} (dpr {})", viewport.container_width, viewport.container_height, ratio);
        Ok(())
    }

    fn request_frame(&mut self) -> Result<(), HostError> {
        let id = self
            .window
            .request_animation_frame(self.frame_callback.as_ref().unchecked_ref())
            .map_err(js_err)?;
        self.frame_id = Some(id);
        Ok(())
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }

    fn present(&mut self, buffer: &RenderBuffer, textures: &TextureRegistry) -> Result<(), HostError> {
        let ctx = match &self.ctx {
            Some(ctx) => ctx.clone(),
            None => return Ok(()),
        };
        let ratio = self.viewport.pixel_ratio.max(1.0) as f64;
        ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0).map_err(js_err)?;
        ctx.clear_rect(
            0.0,
            0.0,
            self.viewport.container_width as f64,
            self.viewport.container_height as f64,
        );

        for instance in buffer.iter() {
            let image = match self.image_for(instance.texture, textures) {
                Some(image) if image.complete() => image,
                _ => continue,
            };
            let half = instance.size as f64 / 2.0;
            ctx.save();
            ctx.translate(instance.x as f64, instance.y as f64).map_err(js_err)?;
            ctx.rotate(instance.rotation as f64).map_err(js_err)?;
            let drawn = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &image,
                -half,
                -half,
                instance.size as f64,
                instance.size as f64,
            );
            ctx.restore();
            drawn.map_err(js_err)?;
        }
        Ok(())
    }

    fn detach(&mut self) {
        for (kind, listener) in self.listeners.drain(..) {
            let _ = self
                .container
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
        }
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
        self.ctx = None;
        self.images.clear();
    }

    fn surfaces(&mut self) -> &mut dyn SurfaceProvider {
        &mut self.surfaces
    }
}
