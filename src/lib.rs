// Wasm backend for a page's decorative particle background: owns the field,
// drives it from requestAnimationFrame, and draws to the canvas the hosting
// page hands over. The page supplies the canvas, the frame clock, and resize
// notifications; this crate supplies everything else.

pub mod animation;
pub mod color;
pub mod config;
pub mod field;
pub mod particle;
pub mod renderer;
mod utils;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlCanvasElement};

use crate::animation::FrameLoop;
use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::renderer::CanvasRenderer;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

fn resize_canvas_and_field(
    canvas: &HtmlCanvasElement,
    field: &Rc<RefCell<ParticleField>>,
    width: f64,
    height: f64,
) {
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
    field.borrow_mut().resize(width, height);
}

#[wasm_bindgen]
pub struct ParticleBackground {
    field: Rc<RefCell<ParticleField>>,
    renderer: Rc<CanvasRenderer>,
    frame_loop: Option<FrameLoop>,
    resize_handler: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl ParticleBackground {
    // Builds the field for the canvas' current size and gets the renderer
    // ready. The one thing that can go wrong is the canvas refusing to hand
    // out a 2d context, and that is reported exactly once, here; a
    // decorative background must never break page load, so everything past
    // this point is infallible.
    pub fn create(
        canvas: HtmlCanvasElement,
        config: &FieldConfig,
    ) -> Result<ParticleBackground, JsValue> {
        let _timer = Timer::new("ParticleBackground::create");
        let renderer = CanvasRenderer::new(canvas)?;
        let width = renderer.canvas().width() as f64;
        let height = renderer.canvas().height() as f64;
        let field = ParticleField::new(width, height, *config);
        console::log_1(
            &format!("particle field ready: {} particles", field.particles().len()).into(),
        );

        Ok(ParticleBackground {
            field: Rc::new(RefCell::new(field)),
            renderer: Rc::new(renderer),
            frame_loop: None,
            resize_handler: None,
        })
    }

    pub fn advance(&self) {
        self.field.borrow_mut().advance();
    }

    pub fn render(&self) -> Result<(), JsValue> {
        self.renderer.render(&self.field.borrow())
    }

    // One advance + render per animation frame until `stop`. Draw errors
    // mid-flight are logged and the loop keeps going.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.is_running() {
            return Ok(());
        }
        let field = Rc::clone(&self.field);
        let renderer = Rc::clone(&self.renderer);
        let frame_loop = FrameLoop::start(move || {
            field.borrow_mut().advance();
            if let Err(err) = renderer.render(&field.borrow()) {
                console::error_1(&err);
            }
        })?;
        self.frame_loop = Some(frame_loop);
        Ok(())
    }

    // Cooperative: the tick already queued with the browser still completes
    pub fn stop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.as_ref().map_or(false, FrameLoop::is_running)
    }

    // Resizes the canvas backing store and regenerates the field for the new
    // bounds. Runs on the same queue as the frame ticks, so a tick observes
    // either the old field or the new one, never a mix of the two.
    pub fn resize(&self, width: f64, height: f64) {
        let _timer = Timer::new("ParticleBackground::resize");
        resize_canvas_and_field(self.renderer.canvas(), &self.field, width, height);
    }

    // Optional convenience: keep the canvas and field sized to the window,
    // for hosts that don't want to wire their own resize listener
    pub fn attach_resize_handler(&mut self) -> Result<(), JsValue> {
        if self.resize_handler.is_some() {
            return Ok(());
        }
        let field = Rc::clone(&self.field);
        let canvas = self.renderer.canvas().clone();
        let closure = Closure::wrap(Box::new(move || {
            let window = match animation::window() {
                Ok(window) => window,
                Err(_) => return,
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|width| width.as_f64())
                .unwrap_or(0.0);
            let height = window
                .inner_height()
                .ok()
                .and_then(|height| height.as_f64())
                .unwrap_or(0.0);
            resize_canvas_and_field(&canvas, &field, width, height);
        }) as Box<dyn FnMut()>);
        animation::window()?
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        self.resize_handler = Some(closure);
        Ok(())
    }

    pub fn particle_count(&self) -> usize {
        self.field.borrow().particles().len()
    }
}
