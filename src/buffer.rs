/// Fixed-capacity input buffer whose unread bytes are always addressable as a
/// single contiguous slice.
///
/// Logically a ring: `commit` fills space at the back, `consume` frees space
/// at the front. Instead of mapping the backing memory twice, the buffer
/// slides the unread window back to offset zero whenever the writable suffix
/// runs out, so the parser never has to deal with a split window.
pub struct RingBuffer {
    buf: Box<[u8]>,
    read: usize,
    write: usize,
}

impl RingBuffer {
    pub fn with_capacity(capacity: usize) -> RingBuffer {
        RingBuffer {
            buf: vec![0; capacity].into_boxed_slice(),
            read: 0,
            write: 0,
        }
    }

    /// Unread bytes, in arrival order.
    pub fn readable(&self) -> &[u8] {
        &self.buf[self.read..self.write]
    }

    /// Space available for the next read. Empty iff the buffer is full.
    pub fn writable(&mut self) -> &mut [u8] {
        if self.write == self.buf.len() && self.read > 0 {
            self.buf.copy_within(self.read..self.write, 0);
            self.write -= self.read;
            self.read = 0;
        }
        &mut self.buf[self.write..]
    }

    /// Marks the first `n` bytes of the writable slice as filled.
    pub fn commit(&mut self, n: usize) {
        debug_assert!(self.write + n <= self.buf.len());
        self.write += n;
    }

    /// Discards `n` bytes from the front of the readable slice.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.len());
        self.read += n;
        if self.read == self.write {
            self.read = 0;
            self.write = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.write - self.read
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}
