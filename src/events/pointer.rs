use super::Listeners;
use crate::config::EffectConfig;
use crate::core::{InputEvent, InputQueue};
use crate::dom;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Wires `pointermove`, `touchmove`, `click` and `resize` on the window.
/// Handlers only enqueue; the frame loop applies them.
pub fn wire_input_handlers(
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    config: &EffectConfig,
    inputs: &InputQueue,
    listeners: &mut Listeners,
) -> Result<(), JsValue> {
    for event in ["pointermove", "click"] {
        let q = inputs.clone();
        listeners.add(window, event, move |ev: web::Event| {
            if let Some(m) = ev.dyn_ref::<web::MouseEvent>() {
                push_pointer(&q, m.page_x(), m.page_y());
            }
        })?;
    }

    let q = inputs.clone();
    listeners.add(window, "touchmove", move |ev: web::Event| {
        let first = ev
            .dyn_ref::<web::TouchEvent>()
            .and_then(|t| t.target_touches().get(0));
        if let Some(touch) = first {
            push_pointer(&q, touch.page_x(), touch.page_y());
        }
    })?;

    let q = inputs.clone();
    let canvas = canvas.clone();
    let config = config.clone();
    listeners.add(window, "resize", move |_ev: web::Event| {
        let (width, height) = dom::sync_canvas_backing_size(&canvas, &config);
        q.borrow_mut().push_back(InputEvent::Resize { width, height });
    })?;

    log::debug!("[events] input listeners wired");
    Ok(())
}

#[inline]
fn push_pointer(queue: &InputQueue, x: i32, y: i32) {
    queue.borrow_mut().push_back(InputEvent::Pointer {
        x: x as f32,
        y: y as f32,
    });
}
