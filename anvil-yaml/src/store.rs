use core::str::Utf8Error;

/// Handle to bytes held by a [`ValueStore`].
///
/// Valid for as long as the store that issued it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub buffer: usize,
    pub start: usize,
    pub len: usize,
}

impl Slice {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Append-only pool of byte buffers backing token text.
///
/// Buffers are allocated once with a fixed capacity and are only ever appended
/// to within that capacity, so they never move in memory.
#[derive(Debug)]
pub struct ValueStore {
    buffers: Vec<Vec<u8>>,
    baseline: usize,
}

impl Default for ValueStore {
    fn default() -> Self {
        ValueStore::with_baseline(crate::options::DEFAULT_STORE_BASELINE)
    }
}

impl ValueStore {
    #[must_use]
    pub fn with_baseline(baseline: usize) -> Self {
        ValueStore {
            buffers: Vec::new(),
            baseline: baseline.max(1),
        }
    }

    /// Copies `bytes` into the store.
    ///
    /// Goes to the buffer with the most room that can hold the whole request,
    /// otherwise to a fresh buffer of `baseline` capacity, or of exactly
    /// `bytes.len()` when the request is larger than the baseline.
    pub fn push(&mut self, bytes: &[u8]) -> Slice {
        let len = bytes.len();
        if len == 0 {
            return Slice::default();
        }

        let roomiest = self
            .buffers
            .iter()
            .enumerate()
            .map(|(idx, buf)| (idx, buf.capacity() - buf.len()))
            .filter(|&(_, free)| free >= len)
            .max_by_key(|&(_, free)| free)
            .map(|(idx, _)| idx);

        let idx = match roomiest {
            Some(idx) => idx,
            None => {
                let capacity = if len > self.baseline {
                    len
                } else {
                    self.baseline
                };
                self.buffers.push(Vec::with_capacity(capacity));
                self.buffers.len() - 1
            }
        };

        let buf = &mut self.buffers[idx];
        let start = buf.len();
        debug_assert!(buf.capacity() - start >= len);
        buf.extend_from_slice(bytes);

        Slice {
            buffer: idx,
            start,
            len,
        }
    }

    #[must_use]
    pub fn get(&self, slice: Slice) -> &[u8] {
        if slice.is_empty() {
            return &[];
        }
        &self.buffers[slice.buffer][slice.start..slice.start + slice.len]
    }

    pub fn get_str(&self, slice: Slice) -> Result<&str, Utf8Error> {
        core::str::from_utf8(self.get(slice))
    }

    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    #[must_use]
    pub fn bytes_used(&self) -> usize {
        self.buffers.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_push_touches_nothing() {
        let mut store = ValueStore::with_baseline(8);
        let slice = store.push(b"");
        assert!(slice.is_empty());
        assert_eq!(store.buffer_count(), 0);
        assert_eq!(store.get(slice), b"");
    }

    #[test]
    fn test_push_and_get() {
        let mut store = ValueStore::with_baseline(16);
        let a = store.push(b"hello");
        let b = store.push(b"world");
        assert_eq!(store.get(a), b"hello");
        assert_eq!(store.get_str(b), Ok("world"));
        assert_eq!(store.buffer_count(), 1);
        assert_eq!(store.bytes_used(), 10);
    }

    #[test]
    fn test_new_buffer_when_full() {
        let mut store = ValueStore::with_baseline(8);
        let a = store.push(b"abcdef");
        let b = store.push(b"ghij");
        assert_eq!(store.buffer_count(), 2);
        assert_ne!(a.buffer, b.buffer);
        // both have room, the second one has more
        let c = store.push(b"kl");
        assert_eq!(c.buffer, b.buffer);
        assert_eq!(store.buffer_count(), 2);
        assert_eq!(store.get(c), b"kl");
    }

    #[test]
    fn test_oversized_request_gets_dedicated_buffer() {
        let mut store = ValueStore::with_baseline(4);
        let big = store.push(b"0123456789");
        assert_eq!(store.get(big), b"0123456789");
        assert_eq!(store.buffer_count(), 1);
        // dedicated buffer is full, next push starts a baseline one
        let small = store.push(b"ab");
        assert_eq!(store.buffer_count(), 2);
        assert_eq!(store.get(small), b"ab");
    }

    #[test]
    fn test_buffers_never_move() {
        let mut store = ValueStore::with_baseline(32);
        let first = store.push(b"anchor");
        let before = store.get(first).as_ptr();
        for i in 0..200u32 {
            store.push(format!("value-{i}").as_bytes());
        }
        assert_eq!(store.get(first).as_ptr(), before);
        assert_eq!(store.get(first), b"anchor");
    }

    #[test]
    fn test_handles_keep_full_offsets() {
        let mut store = ValueStore::with_baseline(1 << 20);
        let filler = vec![b'x'; (1 << 16) + 3];
        store.push(&filler);
        let tail = store.push(b"tail");
        let start: usize = tail.start;
        assert_eq!(start, (1 << 16) + 3);
        assert_eq!(tail.len, 4);
        assert_eq!(store.get(tail), b"tail");

        let big = vec![b'y'; (1 << 20) + 1];
        let slice = store.push(&big);
        assert_eq!(slice.buffer, 1);
        assert_eq!(slice.len, (1 << 20) + 1);
        assert_eq!(store.get(slice).len(), big.len());
    }

    #[test]
    fn test_invalid_utf8() {
        let mut store = ValueStore::default();
        let slice = store.push(&[0xff, 0xfe]);
        assert!(store.get_str(slice).is_err());
    }
}
