use blob_web::core::shader::{compile, UniformTable};
use blob_web::core::{FrameDriver, FULLSCREEN_WGSL, MAX_BLOBS, OUTPUT_WGSL, SPEED_WGSL};
use blob_web::panel::{bind_with_rng, color_to_hex, hex_to_color, ControlPanel, FolderId, ROOT};
use naga::ShaderStage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;

struct Slider {
    folder: FolderId,
    label: String,
    range: (f32, f32),
    value: f32,
    on_change: Box<dyn FnMut(f32)>,
}

struct Color {
    folder: FolderId,
    value: [f32; 3],
    on_change: Box<dyn FnMut([f32; 3])>,
}

struct Button {
    label: String,
    on_click: Box<dyn FnMut()>,
}

/// Records every control so tests can drive the handlers directly.
struct MockPanel {
    folders: Vec<(FolderId, String)>,
    sliders: Vec<Slider>,
    colors: Vec<Color>,
    buttons: Vec<Button>,
    destroyed: bool,
}

impl MockPanel {
    fn new() -> Self {
        Self {
            folders: vec![(ROOT, "root".to_string())],
            sliders: Vec::new(),
            colors: Vec::new(),
            buttons: Vec::new(),
            destroyed: false,
        }
    }

    fn folder_named(&self, title: &str) -> Option<FolderId> {
        self.folders.iter().position(|(_, t)| t == title)
    }

    fn slider(&mut self, folder: FolderId, label: &str) -> &mut Slider {
        self.sliders
            .iter_mut()
            .find(|s| s.folder == folder && s.label == label)
            .unwrap()
    }
}

impl ControlPanel for MockPanel {
    fn add_folder(&mut self, parent: FolderId, title: &str) -> FolderId {
        self.folders.push((parent, title.to_string()));
        self.folders.len() - 1
    }

    fn add_slider(
        &mut self,
        folder: FolderId,
        label: &str,
        range: (f32, f32),
        value: f32,
        on_change: Box<dyn FnMut(f32)>,
    ) {
        self.sliders.push(Slider {
            folder,
            label: label.to_string(),
            range,
            value,
            on_change,
        });
    }

    fn add_color(
        &mut self,
        folder: FolderId,
        _label: &str,
        value: [f32; 3],
        on_change: Box<dyn FnMut([f32; 3])>,
    ) {
        self.colors.push(Color {
            folder,
            value,
            on_change,
        });
    }

    fn add_button(&mut self, _folder: FolderId, label: &str, on_click: Box<dyn FnMut()>) {
        self.buttons.push(Button {
            label: label.to_string(),
            on_click,
        });
    }

    fn destroy(&mut self) {
        self.sliders.clear();
        self.colors.clear();
        self.buttons.clear();
        self.destroyed = true;
    }
}

/// Runs a button handler without holding the panel borrow, since the
/// handler adds controls to the same panel.
fn click(panel: &Rc<RefCell<MockPanel>>, label: &str) {
    let mut handler = {
        let mut p = panel.borrow_mut();
        let b = p.buttons.iter_mut().find(|b| b.label == label).unwrap();
        std::mem::replace(&mut b.on_click, Box::new(|| {}))
    };
    handler();
    let mut p = panel.borrow_mut();
    let b = p.buttons.iter_mut().find(|b| b.label == label).unwrap();
    b.on_click = handler;
}

fn setup(seed: u64) -> (Rc<RefCell<MockPanel>>, Rc<RefCell<FrameDriver>>, UniformTable) {
    let vs = compile("fullscreen", FULLSCREEN_WGSL, ShaderStage::Vertex).unwrap();
    let speed = compile("speed", SPEED_WGSL, ShaderStage::Fragment).unwrap();
    let output = compile("output", OUTPUT_WGSL, ShaderStage::Fragment).unwrap();
    let speed_table = UniformTable::for_program(&vs.module, &speed.module);
    let output_table = UniformTable::for_program(&vs.module, &output.module);
    let driver = Rc::new(RefCell::new(
        FrameDriver::new(&speed_table, &output_table).unwrap(),
    ));
    let panel = Rc::new(RefCell::new(MockPanel::new()));
    bind_with_rng(panel.clone(), driver.clone(), StdRng::seed_from_u64(seed));
    (panel, driver, output_table)
}

#[test]
fn builds_one_folder_per_seeded_blob() {
    let (panel, driver, _) = setup(1);
    let p = panel.borrow();
    assert!(p.folder_named("Blobs").is_some());
    for i in 1..=3 {
        assert!(p.folder_named(&format!("Blob {}", i)).is_some());
    }
    assert!(p.folder_named("Blob 4").is_none());
    // global slider + X/Y/size per blob
    assert_eq!(p.sliders.len(), 1 + 3 * 3);
    assert_eq!(p.colors.len(), 3);
    assert_eq!(p.buttons.len(), 1);

    let blob = *driver.borrow().state.blobs.get(1).unwrap();
    let folder = p.folder_named("Blob 2").unwrap();
    let color = p.colors.iter().find(|c| c.folder == folder).unwrap();
    assert_eq!(color.value, blob.color);
}

#[test]
fn power_slider_writes_uniform_immediately() {
    let (panel, driver, output) = setup(2);
    let h = output.get("pointer_multiplier").unwrap();
    {
        let mut p = panel.borrow_mut();
        let s = p.slider(ROOT, "cursor disturbing power");
        assert_eq!(s.range, (0.0, 0.3));
        assert_eq!(s.value, 0.051);
        (s.on_change)(0.12);
    }
    let d = driver.borrow();
    assert_eq!(d.state.params.pointer_multiplier, 0.12);
    assert_eq!(d.output_block().get_f32(h)[0], 0.12);
}

#[test]
fn blob_controls_edit_live_record() {
    let (panel, driver, _) = setup(3);
    {
        let mut p = panel.borrow_mut();
        let folder = p.folder_named("Blob 2").unwrap();
        (p.slider(folder, "X").on_change)(-0.75);
        (p.slider(folder, "Y").on_change)(0.5);
        let size = p.slider(folder, "size");
        assert_eq!(size.range, (0.1, 2.0));
        (size.on_change)(1.9);
        let color = p.colors.iter_mut().find(|c| c.folder == folder).unwrap();
        (color.on_change)([0.1, 0.2, 0.3]);
    }
    let d = driver.borrow();
    let b = d.state.blobs.get(1).unwrap();
    assert_eq!(b.position, [-0.75, 0.5]);
    assert_eq!(b.size, 1.9);
    assert_eq!(b.color, [0.1, 0.2, 0.3]);
    assert_eq!(d.state.blobs.get(0).unwrap().size, 1.0);
}

#[test]
fn add_blob_stops_at_capacity() {
    let (panel, driver, _) = setup(4);
    for expected in 4..=MAX_BLOBS {
        click(&panel, "add blob");
        assert_eq!(driver.borrow().state.blobs.len(), expected);
        assert!(panel
            .borrow()
            .folder_named(&format!("Blob {}", expected))
            .is_some());
    }

    let folders = panel.borrow().folders.len();
    let sliders = panel.borrow().sliders.len();
    click(&panel, "add blob");
    click(&panel, "add blob");
    assert_eq!(driver.borrow().state.blobs.len(), MAX_BLOBS);
    assert!(driver.borrow().state.blobs.is_full());
    assert_eq!(panel.borrow().folders.len(), folders);
    assert_eq!(panel.borrow().sliders.len(), sliders);
}

#[test]
fn added_blobs_are_within_random_bounds() {
    let (panel, driver, _) = setup(5);
    for _ in 0..7 {
        click(&panel, "add blob");
    }
    let d = driver.borrow();
    for b in d.state.blobs.iter().skip(3) {
        assert!(b.color.iter().all(|c| (0.0..=1.0).contains(c)));
        assert!(b.position.iter().all(|p| (-1.0..=1.0).contains(p)));
        assert!((0.5..1.5).contains(&b.size));
    }
}

#[test]
fn same_seed_adds_same_blob() {
    let (a_panel, a, _) = setup(99);
    let (b_panel, b, _) = setup(99);
    click(&a_panel, "add blob");
    click(&b_panel, "add blob");
    assert_eq!(a.borrow().state.blobs.get(3), b.borrow().state.blobs.get(3));
}

#[test]
fn destroy_releases_controls() {
    let (panel, driver, _) = setup(6);
    let binding = bind_with_rng(panel.clone(), driver, StdRng::seed_from_u64(6));
    binding.destroy();
    let p = panel.borrow();
    assert!(p.destroyed);
    assert!(p.sliders.is_empty() && p.buttons.is_empty());
}

#[test]
fn hex_colors() {
    assert_eq!(color_to_hex([1.0, 0.0, 0.5]), "#ff0080");
    assert_eq!(hex_to_color("#ff0000"), Some([1.0, 0.0, 0.0]));
    assert_eq!(hex_to_color("#12345"), None);
    assert_eq!(hex_to_color("#gg0000"), None);
}
