use crate::core::{FrameDriver, InputQueue};
use crate::dom::{self, DomPanel};
use crate::events::{self, Listeners};
use crate::frame::{self, FrameContext, LoopHandle};
use crate::panel::{self, PanelBinding};
use crate::render::Renderer;
use anyhow::anyhow;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Everything a mounted effect owns. Dropping it without
/// [`Session::teardown`] also stops the loop, detaches the listeners and
/// removes the panel.
pub struct Session {
    frame_loop: LoopHandle,
    listeners: Listeners,
    panel: Option<PanelBinding<DomPanel>>,
}

impl Session {
    pub async fn mount(canvas_id: &str) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow!("no window"))?;
        let document = window.document().ok_or_else(|| anyhow!("no document"))?;
        let canvas = dom::canvas_by_id(&document, canvas_id)?;
        let config = dom::config_from_canvas(&canvas, canvas_id);
        let (width, height) = dom::sync_canvas_backing_size(&canvas, &config);
        log::info!("[session] mounting on #{} ({}x{})", canvas_id, width, height);

        let renderer = Renderer::new(canvas.clone()).await?;
        let driver = FrameDriver::new(renderer.speed_uniforms(), renderer.output_uniforms())?;
        let driver = Rc::new(RefCell::new(driver));

        let inputs = InputQueue::default();
        let mut listeners = Listeners::new();
        events::wire_input_handlers(&window, &canvas, &config, &inputs, &mut listeners)
            .map_err(dom::dom_error)?;

        let panel = if config.panel {
            let p = DomPanel::new(&document)?;
            Some(panel::bind(Rc::new(RefCell::new(p)), driver.clone()))
        } else {
            None
        };

        let (w, h) = renderer.size();
        let frame_ctx = Rc::new(RefCell::new(FrameContext {
            driver,
            renderer,
            inputs,
            canvas,
        }));
        let frame_loop = frame::start_loop(frame_ctx);
        log::info!("[session] running at {}x{}", w, h);

        Ok(Self {
            frame_loop,
            listeners,
            panel,
        })
    }

    /// Stops the loop, detaches input listeners and releases the panel.
    pub fn teardown(mut self) {
        self.frame_loop.stop();
        self.listeners.remove_all();
        if let Some(p) = self.panel.take() {
            p.destroy();
        }
        log::info!("[session] unmounted");
    }
}
