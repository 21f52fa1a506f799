//! Blob-field background effect: a velocity field that trails the pointer
//! and a compositing pass that draws soft blobs pushed around by it.
//!
//! Everything under [`core`], [`panel`] and [`config`] is plain Rust and
//! builds on any target; the WebGPU and DOM glue only exists on wasm32.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod panel;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod render;
#[cfg(target_arch = "wasm32")]
mod session;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use crate::constants::DEFAULT_CANVAS_ID;
    use crate::dom;
    use crate::session::Session;
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    thread_local! {
        static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("blob-web starting");

        let has_canvas = dom::window_document()
            .and_then(|d| d.get_element_by_id(DEFAULT_CANVAS_ID))
            .is_some();
        if has_canvas {
            spawn_local(async move {
                if let Err(e) = mount_session(DEFAULT_CANVAS_ID).await {
                    log::error!("init error: {:?}", e);
                }
            });
        } else {
            log::info!("no #{}; waiting for mount()", DEFAULT_CANVAS_ID);
        }
        Ok(())
    }

    /// Mounts the effect on `canvas_id`, replacing any running session.
    #[wasm_bindgen]
    pub async fn mount(canvas_id: String) -> Result<(), JsValue> {
        mount_session(&canvas_id)
            .await
            .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
    }

    #[wasm_bindgen]
    pub fn unmount() {
        if let Some(session) = SESSION.with(|s| s.borrow_mut().take()) {
            session.teardown();
        }
    }

    async fn mount_session(canvas_id: &str) -> anyhow::Result<()> {
        unmount();
        let session = Session::mount(canvas_id).await?;
        SESSION.with(|s| {
            if let Some(old) = s.borrow_mut().replace(session) {
                old.teardown();
            }
        });
        Ok(())
    }
}
