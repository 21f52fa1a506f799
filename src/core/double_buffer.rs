/// Anything with fixed pixel dimensions that a pass can render into.
pub trait TargetSize {
    fn size(&self) -> (u32, u32);
}

/// Read/write pair with O(1) role exchange.
///
/// Backs the velocity field ping-pong: one pass samples `read()` while
/// drawing into `write()`, then `swap()` relabels the pair. Contents are
/// never copied.
pub struct DoubleBuffer<T> {
    buffers: [T; 2],
    read_index: usize,
}

impl<T> DoubleBuffer<T> {
    pub fn new(read: T, write: T) -> Self {
        Self {
            buffers: [read, write],
            read_index: 0,
        }
    }

    /// Allocates both buffers at `width`×`height` with `alloc`.
    pub fn create(width: u32, height: u32, mut alloc: impl FnMut(u32, u32) -> T) -> Self {
        let read = alloc(width, height);
        let write = alloc(width, height);
        Self::new(read, write)
    }

    /// Replaces both buffers with a fresh pair at `width`×`height`, dropping
    /// the old contents. Zero-sized requests leave the pair untouched and
    /// return `false`.
    pub fn recreate(&mut self, width: u32, height: u32, alloc: impl FnMut(u32, u32) -> T) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        *self = Self::create(width, height, alloc);
        true
    }

    #[inline]
    pub fn read(&self) -> &T {
        &self.buffers[self.read_index]
    }

    #[inline]
    pub fn write(&self) -> &T {
        &self.buffers[1 - self.read_index]
    }

    #[inline]
    pub fn swap(&mut self) {
        self.read_index ^= 1;
    }
}

impl<T: TargetSize> DoubleBuffer<T> {
    pub fn size(&self) -> (u32, u32) {
        self.read().size()
    }
}
