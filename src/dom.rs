use crate::config::EffectConfig;
use crate::error::EffectError;
use crate::events::Listeners;
use crate::panel::{color_to_hex, hex_to_color, ControlPanel, FolderId, ROOT};
use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn dom_error(e: JsValue) -> EffectError {
    EffectError::Dom(format!("{:?}", e))
}

pub fn canvas_by_id(
    document: &web::Document,
    canvas_id: &str,
) -> Result<web::HtmlCanvasElement, EffectError> {
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| EffectError::Dom(format!("no element #{}", canvas_id)))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| EffectError::Dom(format!("#{} is not a canvas", canvas_id)))
}

/// Reads `data-max-dpr` and `data-panel` from the canvas.
pub fn config_from_canvas(canvas: &web::HtmlCanvasElement, canvas_id: &str) -> EffectConfig {
    let mut config = EffectConfig::with_canvas_id(canvas_id);
    let max_dpr = canvas.get_attribute("data-max-dpr");
    let panel = canvas.get_attribute("data-panel");
    config.apply_overrides(max_dpr.as_deref(), panel.as_deref());
    config
}

/// Matches the backing store to the laid-out size times the capped pixel
/// ratio. Returns the new size in device pixels.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    config: &EffectConfig,
) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let ratio = config.pixel_ratio(dpr);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * ratio) as u32).max(1);
    let h_px = ((rect.height() * ratio) as u32).max(1);
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    (w_px, h_px)
}

/// Laid-out canvas size in CSS pixels.
#[inline]
pub fn layout_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

#[inline]
pub fn performance_now() -> f64 {
    web::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

const PANEL_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "8px"),
    ("right", "8px"),
    ("z-index", "10"),
    ("padding", "6px"),
    ("max-height", "90vh"),
    ("overflow-y", "auto"),
    ("font", "12px sans-serif"),
    ("color", "#eee"),
    ("background", "rgba(20, 20, 24, 0.85)"),
];

/// [`ControlPanel`] built from plain form elements in a fixed overlay.
pub struct DomPanel {
    document: web::Document,
    root: web::HtmlElement,
    folders: Vec<web::Element>,
    /// Per-folder button row, kept as the folder's last child.
    actions: Vec<Option<web::Element>>,
    listeners: Listeners,
}

impl DomPanel {
    pub fn new(document: &web::Document) -> Result<Self, EffectError> {
        let root = document
            .create_element("div")
            .map_err(dom_error)?
            .dyn_into::<web::HtmlElement>()
            .map_err(|_| EffectError::Dom("div is not an HtmlElement".into()))?;
        let style = root.style();
        for (k, v) in PANEL_STYLE {
            style.set_property(k, v).map_err(dom_error)?;
        }
        let body = document
            .body()
            .ok_or_else(|| EffectError::Dom("document has no body".into()))?;
        body.append_child(&root).map_err(dom_error)?;
        let root_el: web::Element = root.clone().into();
        Ok(Self {
            document: document.clone(),
            root,
            folders: vec![root_el],
            actions: vec![None],
            listeners: Listeners::new(),
        })
    }

    fn folder(&self, id: FolderId) -> &web::Element {
        self.folders.get(id).unwrap_or(&self.folders[ROOT])
    }

    /// Inserts `node` into `folder` ahead of its button row, if any.
    fn attach(&self, folder: FolderId, node: &web::Element) -> Result<(), JsValue> {
        let anchor = self.actions.get(folder).and_then(Option::as_ref);
        self.folder(folder)
            .insert_before(node, anchor.map(AsRef::<web::Node>::as_ref))?;
        Ok(())
    }

    /// A labelled row inside `folder`.
    fn row(&self, folder: FolderId, label: &str) -> Result<web::Element, JsValue> {
        let row = self.document.create_element("label")?;
        row.set_attribute("style", "display:block;margin:2px 0")?;
        let text = self.document.create_element("span")?;
        text.set_text_content(Some(label));
        text.set_attribute("style", "display:inline-block;min-width:9em")?;
        row.append_child(&text)?;
        self.attach(folder, &row)?;
        Ok(row)
    }

    fn input(&self, kind: &str) -> Result<web::HtmlInputElement, JsValue> {
        let input = self
            .document
            .create_element("input")?
            .dyn_into::<web::HtmlInputElement>()
            .map_err(JsValue::from)?;
        input.set_type(kind);
        Ok(input)
    }

    fn try_add_folder(&mut self, parent: FolderId, title: &str) -> Result<FolderId, JsValue> {
        let fieldset = self.document.create_element("fieldset")?;
        let legend = self.document.create_element("legend")?;
        legend.set_text_content(Some(title));
        fieldset.append_child(&legend)?;
        self.attach(parent, &fieldset)?;
        self.folders.push(fieldset);
        self.actions.push(None);
        Ok(self.folders.len() - 1)
    }

    fn try_add_slider(
        &mut self,
        folder: FolderId,
        label: &str,
        range: (f32, f32),
        value: f32,
        mut on_change: Box<dyn FnMut(f32)>,
    ) -> Result<(), JsValue> {
        let row = self.row(folder, label)?;
        let input = self.input("range")?;
        input.set_min(&range.0.to_string());
        input.set_max(&range.1.to_string());
        input.set_step("any");
        input.set_value(&value.to_string());
        row.append_child(&input)?;
        let el = input.clone();
        self.listeners.add(&input, "input", move |_ev: web::Event| {
            let v = el.value_as_number();
            if v.is_finite() {
                on_change(v as f32);
            }
        })
    }

    fn try_add_color(
        &mut self,
        folder: FolderId,
        label: &str,
        value: [f32; 3],
        mut on_change: Box<dyn FnMut([f32; 3])>,
    ) -> Result<(), JsValue> {
        let row = self.row(folder, label)?;
        let input = self.input("color")?;
        input.set_value(&color_to_hex(value));
        row.append_child(&input)?;
        let el = input.clone();
        self.listeners.add(&input, "input", move |_ev: web::Event| {
            if let Some(c) = hex_to_color(&el.value()) {
                on_change(c);
            }
        })
    }

    fn try_add_button(
        &mut self,
        folder: FolderId,
        label: &str,
        mut on_click: Box<dyn FnMut()>,
    ) -> Result<(), JsValue> {
        let button = self.document.create_element("button")?;
        button.set_text_content(Some(label));
        let folder = if folder < self.folders.len() { folder } else { ROOT };
        let row = match &self.actions[folder] {
            Some(row) => row.clone(),
            None => {
                let row = self.document.create_element("div")?;
                self.folder(folder).append_child(&row)?;
                self.actions[folder] = Some(row.clone());
                row
            }
        };
        row.append_child(&button)?;
        self.listeners
            .add(&button, "click", move |_ev: web::Event| on_click())
    }
}

impl ControlPanel for DomPanel {
    fn add_folder(&mut self, parent: FolderId, title: &str) -> FolderId {
        self.try_add_folder(parent, title).unwrap_or_else(|e| {
            log::error!("[panel] folder {:?}: {:?}", title, e);
            parent
        })
    }

    fn add_slider(
        &mut self,
        folder: FolderId,
        label: &str,
        range: (f32, f32),
        value: f32,
        on_change: Box<dyn FnMut(f32)>,
    ) {
        if let Err(e) = self.try_add_slider(folder, label, range, value, on_change) {
            log::error!("[panel] slider {:?}: {:?}", label, e);
        }
    }

    fn add_color(
        &mut self,
        folder: FolderId,
        label: &str,
        value: [f32; 3],
        on_change: Box<dyn FnMut([f32; 3])>,
    ) {
        if let Err(e) = self.try_add_color(folder, label, value, on_change) {
            log::error!("[panel] color {:?}: {:?}", label, e);
        }
    }

    fn add_button(&mut self, folder: FolderId, label: &str, on_click: Box<dyn FnMut()>) {
        if let Err(e) = self.try_add_button(folder, label, on_click) {
            log::error!("[panel] button {:?}: {:?}", label, e);
        }
    }

    fn destroy(&mut self) {
        self.listeners.remove_all();
        self.folders.truncate(1);
        self.actions.truncate(1);
        self.actions[ROOT] = None;
        self.root.remove();
    }
}

impl Drop for DomPanel {
    fn drop(&mut self) {
        self.root.remove();
    }
}
