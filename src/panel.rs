//! Debug control panel wiring.
//!
//! The widget toolkit sits behind [`ControlPanel`]; the binder only needs
//! folders, sliders, color pickers and buttons. All handlers mutate the
//! shared [`FrameDriver`], so edits show up on the next frame.

use crate::constants::{BLOB_AXIS_RANGE, BLOB_SIZE_RANGE, POINTER_MULTIPLIER_RANGE};
use crate::core::{Blob, FrameDriver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type FolderId = usize;

/// Top-level folder every panel starts with.
pub const ROOT: FolderId = 0;

pub trait ControlPanel {
    fn add_folder(&mut self, parent: FolderId, title: &str) -> FolderId;
    fn add_slider(
        &mut self,
        folder: FolderId,
        label: &str,
        range: (f32, f32),
        value: f32,
        on_change: Box<dyn FnMut(f32)>,
    );
    fn add_color(
        &mut self,
        folder: FolderId,
        label: &str,
        value: [f32; 3],
        on_change: Box<dyn FnMut([f32; 3])>,
    );
    fn add_button(&mut self, folder: FolderId, label: &str, on_click: Box<dyn FnMut()>);
    /// Releases every control and its handlers.
    fn destroy(&mut self);
}

pub struct PanelBinding<P: ControlPanel> {
    panel: Rc<RefCell<P>>,
}

impl<P: ControlPanel> PanelBinding<P> {
    pub fn destroy(&self) {
        self.panel.borrow_mut().destroy();
    }
}

pub fn bind<P: ControlPanel + 'static>(
    panel: Rc<RefCell<P>>,
    driver: Rc<RefCell<FrameDriver>>,
) -> PanelBinding<P> {
    bind_with_rng(panel, driver, StdRng::from_entropy())
}

pub fn bind_with_rng<P, R>(
    panel: Rc<RefCell<P>>,
    driver: Rc<RefCell<FrameDriver>>,
    mut rng: R,
) -> PanelBinding<P>
where
    P: ControlPanel + 'static,
    R: Rng + 'static,
{
    let initial = driver.borrow().state.params.pointer_multiplier;
    let d = driver.clone();
    panel.borrow_mut().add_slider(
        ROOT,
        "cursor disturbing power",
        POINTER_MULTIPLIER_RANGE,
        initial,
        Box::new(move |v: f32| d.borrow_mut().set_pointer_multiplier(v)),
    );

    let blobs_folder = panel.borrow_mut().add_folder(ROOT, "Blobs");
    let count = driver.borrow().state.blobs.len();
    for i in 0..count {
        add_blob_controls(&panel, &driver, blobs_folder, i);
    }

    let weak_panel: Weak<RefCell<P>> = Rc::downgrade(&panel);
    let d = driver.clone();
    panel.borrow_mut().add_button(
        blobs_folder,
        "add blob",
        Box::new(move || {
            let added = d.borrow_mut().state.blobs.push(Blob::random(&mut rng));
            match added {
                Some(i) => {
                    log::info!("[panel] added blob {}", i + 1);
                    if let Some(p) = weak_panel.upgrade() {
                        add_blob_controls(&p, &d, blobs_folder, i);
                    }
                }
                None => log::debug!("[panel] blob limit reached; ignoring add"),
            }
        }),
    );

    PanelBinding { panel }
}

fn add_blob_controls<P: ControlPanel>(
    panel: &Rc<RefCell<P>>,
    driver: &Rc<RefCell<FrameDriver>>,
    parent: FolderId,
    index: usize,
) {
    let Some(blob) = driver.borrow().state.blobs.get(index).copied() else {
        return;
    };
    let mut p = panel.borrow_mut();
    let folder = p.add_folder(parent, &format!("Blob {}", index + 1));

    let d = driver.clone();
    p.add_color(
        folder,
        "color",
        blob.color,
        Box::new(move |c: [f32; 3]| edit_blob(&d, index, |b| b.color = c)),
    );
    let d = driver.clone();
    p.add_slider(
        folder,
        "X",
        BLOB_AXIS_RANGE,
        blob.position[0],
        Box::new(move |v: f32| edit_blob(&d, index, |b| b.position[0] = v)),
    );
    let d = driver.clone();
    p.add_slider(
        folder,
        "Y",
        BLOB_AXIS_RANGE,
        blob.position[1],
        Box::new(move |v: f32| edit_blob(&d, index, |b| b.position[1] = v)),
    );
    let d = driver.clone();
    p.add_slider(
        folder,
        "size",
        BLOB_SIZE_RANGE,
        blob.size,
        Box::new(move |v: f32| edit_blob(&d, index, |b| b.size = v)),
    );
}

#[inline]
fn edit_blob(driver: &Rc<RefCell<FrameDriver>>, index: usize, f: impl FnOnce(&mut Blob)) {
    if let Some(b) = driver.borrow_mut().state.blobs.get_mut(index) {
        f(b);
    }
}

/// `#rrggbb` for a color picker.
pub fn color_to_hex(c: [f32; 3]) -> String {
    let b = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", b(c[0]), b(c[1]), b(c[2]))
}

pub fn hex_to_color(hex: &str) -> Option<[f32; 3]> {
    let h = hex.strip_prefix('#').unwrap_or(hex);
    if h.len() != 6 || !h.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok().map(|v| v as f32 / 255.0);
    Some([channel(0)?, channel(2)?, channel(4)?])
}
