// Renderer struct that owns the canvas and its 2d context, and draws one
// frame of the field: clear the surface, a filled circle per particle, a
// stroked segment per connection.

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::Color;
use crate::field::ParticleField;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    // On creation grabs the 2d context from the canvas. A canvas that can't
    // hand one out now won't grow one later, so this is the single failure
    // point: callers report the error once and skip starting the loop.
    pub fn new(canvas: HtmlCanvasElement) -> Result<CanvasRenderer, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("failed to get 2d context from canvas"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(CanvasRenderer { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn clear_screen(&self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    pub fn render(&self, field: &ParticleField) -> Result<(), JsValue> {
        self.clear_screen(field.width(), field.height());
        self.render_particles(field)?;
        self.render_connections(field);
        Ok(())
    }

    fn render_particles(&self, field: &ParticleField) -> Result<(), JsValue> {
        for particle in field.particles() {
            self.context.begin_path();
            self.context.arc(
                particle.pos[0],
                particle.pos[1],
                particle.radius,
                0.0,
                PI * 2.0,
            )?;
            self.context
                .set_fill_style(&JsValue::from_str(&particle.color.to_css()));
            self.context.fill();
        }
        Ok(())
    }

    fn render_connections(&self, field: &ParticleField) {
        let base_color = Color::from_u32(field.config().base_color);
        self.context.set_line_width(field.config().line_width);
        for connection in field.connections() {
            self.context.begin_path();
            self.context.set_stroke_style(&JsValue::from_str(
                &base_color.to_css_with_alpha(connection.alpha),
            ));
            self.context.move_to(connection.from[0], connection.from[1]);
            self.context.line_to(connection.to[0], connection.to[1]);
            self.context.stroke();
        }
    }
}
