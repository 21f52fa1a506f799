use crate::core::{FrameDriver, InputEvent, InputQueue};
use crate::dom;
use crate::render::Renderer;
use glam::Vec2;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub driver: Rc<RefCell<FrameDriver>>,
    pub renderer: Renderer,
    pub inputs: InputQueue,
    pub canvas: web::HtmlCanvasElement,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let mut pointers: SmallVec<[Vec2; 8]> = SmallVec::new();
        let mut resize = None;
        for ev in self.inputs.borrow_mut().drain(..) {
            match ev {
                InputEvent::Pointer { x, y } => pointers.push(Vec2::new(x, y)),
                InputEvent::Resize { width, height } => resize = Some((width, height)),
            }
        }
        // Reallocate before any pass reads the field.
        if let Some((width, height)) = resize {
            self.renderer.resize(width, height);
        }

        let layout = dom::layout_size(&self.canvas);
        let mut driver = self.driver.borrow_mut();
        driver.frame(dom::performance_now(), layout, pointers);

        match self.renderer.render(&driver) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("[frame] surface lost; reconfiguring");
                self.renderer.reconfigure();
            }
            Err(e) => log::error!("[frame] render error: {:?}", e),
        }
    }
}

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Owns the running `requestAnimationFrame` chain.
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Tick,
}

impl LoopHandle {
    /// Cancels the pending frame and drops the tick closure, which releases
    /// the frame context.
    pub fn stop(&self) {
        self.running.set(false);
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        self.tick.borrow_mut().take();
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(tick: &Tick) -> Option<i32> {
    let w = web::window()?;
    let t = tick.borrow();
    let cb = t.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: Tick = Rc::new(RefCell::new(None));
    let running = Rc::new(Cell::new(true));
    let raf_id = Rc::new(Cell::new(None));

    let tick_clone = tick.clone();
    let running_tick = running.clone();
    let raf_tick = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running_tick.get() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        raf_tick.set(request_frame(&tick_clone));
    }) as Box<dyn FnMut()>));
    raf_id.set(request_frame(&tick));

    LoopHandle {
        running,
        raf_id,
        tick,
    }
}
