// Self-rescheduling requestAnimationFrame loop with a cooperative stop flag.
// Stopping only prevents further scheduling; a tick the browser has already
// queued still runs, sees the flag, and releases the closure.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

pub(crate) fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn request_animation_frame(closure: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(closure.as_ref().unchecked_ref::<js_sys::Function>())
}

pub struct FrameLoop {
    running: Rc<Cell<bool>>,
}

impl FrameLoop {
    // Kicks the loop off; `tick` runs once per animation frame until `stop`
    pub fn start<F>(mut tick: F) -> Result<FrameLoop, JsValue>
    where
        F: FnMut() + 'static,
    {
        let running = Rc::new(Cell::new(true));
        let handle: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        let tick_running = Rc::clone(&running);
        let tick_handle = Rc::clone(&handle);
        *handle.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if !tick_running.get() {
                // Dropping the closure here breaks the Rc cycle that keeps
                // the loop alive; wasm-bindgen defers the actual destruction
                // until this invocation returns.
                tick_handle.borrow_mut().take();
                return;
            }
            tick();
            if let Some(closure) = tick_handle.borrow().as_ref() {
                if let Err(err) = request_animation_frame(closure) {
                    console::error_1(&err);
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(closure) = handle.borrow().as_ref() {
            request_animation_frame(closure)?;
        }

        Ok(FrameLoop { running })
    }

    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}
