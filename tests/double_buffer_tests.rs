use blob_web::core::{DoubleBuffer, TargetSize};

#[derive(Debug, PartialEq)]
struct FakeTarget {
    id: u32,
    width: u32,
    height: u32,
}

impl TargetSize for FakeTarget {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn allocator(next_id: &mut u32) -> impl FnMut(u32, u32) -> FakeTarget + '_ {
    move |width, height| {
        *next_id += 1;
        FakeTarget {
            id: *next_id,
            width,
            height,
        }
    }
}

#[test]
fn read_and_write_never_alias() {
    let mut ids = 0;
    let mut buf = DoubleBuffer::create(64, 32, allocator(&mut ids));
    for _ in 0..5 {
        assert_ne!(buf.read().id, buf.write().id);
        assert!(!std::ptr::eq(buf.read(), buf.write()));
        buf.swap();
    }
}

#[test]
fn swap_exchanges_roles_and_two_swaps_restore() {
    let mut ids = 0;
    let mut buf = DoubleBuffer::create(8, 8, allocator(&mut ids));
    let (r, w) = (buf.read().id, buf.write().id);

    buf.swap();
    assert_eq!(buf.read().id, w);
    assert_eq!(buf.write().id, r);

    buf.swap();
    assert_eq!(buf.read().id, r);
    assert_eq!(buf.write().id, w);
}

#[test]
fn recreate_on_resize_yields_fresh_pair_of_new_size() {
    let mut ids = 0;
    let mut buf = DoubleBuffer::create(640, 480, allocator(&mut ids));
    buf.swap();
    let old_ids = [buf.read().id, buf.write().id];

    let mut ids = 2;
    assert!(buf.recreate(1280, 720, allocator(&mut ids)));
    assert_eq!(buf.size(), (1280, 720));
    assert_eq!(buf.read().size(), (1280, 720));
    assert_eq!(buf.write().size(), (1280, 720));
    assert!(!old_ids.contains(&buf.read().id));
    assert!(!old_ids.contains(&buf.write().id));
    assert_ne!(buf.read().id, buf.write().id);
}

#[test]
fn recreate_ignores_zero_sizes() {
    let mut ids = 0;
    let mut buf = DoubleBuffer::create(320, 200, allocator(&mut ids));
    let before = [buf.read().id, buf.write().id];

    let mut calls = 0;
    let mut counting = |w, h| {
        calls += 1;
        FakeTarget {
            id: 100 + calls,
            width: w,
            height: h,
        }
    };
    assert!(!buf.recreate(0, 720, &mut counting));
    assert!(!buf.recreate(1280, 0, &mut counting));
    assert_eq!(calls, 0);
    assert_eq!([buf.read().id, buf.write().id], before);
    assert_eq!(buf.size(), (320, 200));
}
