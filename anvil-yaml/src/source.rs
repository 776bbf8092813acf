use anvil_common::Marker;
use std::io::{self, Read};
use tracing::trace;

/// Fixed-size read-ahead window over a byte reader.
///
/// The window is refilled from the reader whenever the cursor reaches the end
/// of the valid bytes. The position marker keeps counting across refills.
pub struct ChunkSource<R> {
    reader: R,
    chunk: Box<[u8]>,
    len: usize,
    cursor: usize,
    mark: Marker,
    eof: bool,
    refills: usize,
}

impl<R: Read> ChunkSource<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        ChunkSource {
            reader,
            chunk: vec![0; chunk_size.max(1)].into_boxed_slice(),
            len: 0,
            cursor: 0,
            mark: Marker::default(),
            eof: false,
            refills: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn mark(&self) -> Marker {
        self.mark
    }

    #[must_use]
    pub fn refills(&self) -> usize {
        self.refills
    }

    fn refill(&mut self) -> io::Result<()> {
        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    trace!(pos = self.mark.pos, "end of input");
                    self.eof = true;
                    self.len = 0;
                    self.cursor = 0;
                    return Ok(());
                }
                Ok(n) => {
                    self.refills += 1;
                    trace!(bytes = n, pos = self.mark.pos, "refilled chunk");
                    self.len = n;
                    self.cursor = 0;
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }

    /// Makes sure at least one unread byte is in the window, unless the input is exhausted.
    fn fill(&mut self) -> io::Result<bool> {
        if self.cursor < self.len {
            return Ok(true);
        }
        if self.eof {
            return Ok(false);
        }
        self.refill()?;
        Ok(self.cursor < self.len)
    }

    /// Next byte without consuming it, `None` at end of input.
    pub fn peek(&mut self) -> io::Result<Option<u8>> {
        Ok(if self.fill()? {
            Some(self.chunk[self.cursor])
        } else {
            None
        })
    }

    /// Consumes the byte last returned by [`ChunkSource::peek`].
    pub fn bump(&mut self) {
        debug_assert!(self.cursor < self.len);
        let byte = self.chunk[self.cursor];
        self.cursor += 1;
        self.mark.pos += 1;
        if byte == b'\n' {
            self.mark.line += 1;
            self.mark.col = 1;
        } else {
            self.mark.col += 1;
        }
    }

    /// Skips up to, but not including, the next line feed.
    pub fn skip_to_eol(&mut self) -> io::Result<()> {
        while self.fill()? {
            let window = &self.chunk[self.cursor..self.len];
            let (skip, found) = match memchr::memchr(b'\n', window) {
                Some(idx) => (idx, true),
                None => (window.len(), false),
            };
            self.cursor += skip;
            self.mark.pos += skip;
            self.mark.col += skip as u32;
            if found {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn drain<R: Read>(src: &mut ChunkSource<R>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = src.peek().unwrap() {
            out.push(b);
            src.bump();
        }
        out
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4096)]
    fn test_reads_everything(#[case] chunk_size: usize) {
        let input = b"name: \"anvil\"\nversion: 1\n";
        let mut src = ChunkSource::new(&input[..], chunk_size);
        assert_eq!(drain(&mut src), input.to_vec());
        assert_eq!(src.mark(), Marker::new(input.len(), 3, 1));
        assert_eq!(src.peek().unwrap(), None);
    }

    #[test]
    fn test_line_and_col() {
        let mut src = ChunkSource::new(&b"ab\ncd"[..], 2);
        src.peek().unwrap();
        src.bump();
        src.bump();
        assert_eq!(src.mark(), Marker::new(2, 1, 3));
        src.peek().unwrap();
        src.bump();
        assert_eq!(src.mark(), Marker::new(3, 2, 1));
        src.peek().unwrap();
        src.bump();
        assert_eq!(src.mark(), Marker::new(4, 2, 2));
    }

    #[test]
    fn test_skip_to_eol_across_chunks() {
        let mut src = ChunkSource::new(&b"# a long comment\nx"[..], 3);
        src.skip_to_eol().unwrap();
        assert_eq!(src.peek().unwrap(), Some(b'\n'));
        assert_eq!(src.mark(), Marker::new(16, 1, 17));
        src.bump();
        assert_eq!(src.peek().unwrap(), Some(b'x'));
    }

    #[test]
    fn test_skip_to_eol_at_end() {
        let mut src = ChunkSource::new(&b"# trailing"[..], 4);
        src.skip_to_eol().unwrap();
        assert_eq!(src.peek().unwrap(), None);
    }

    struct Flaky<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_retries_interrupted() {
        let reader = Flaky {
            data: b"abc",
            interrupt: false,
        };
        let mut src = ChunkSource::new(reader, 1);
        assert_eq!(drain(&mut src), b"abc".to_vec());
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_propagates_io_error() {
        let mut src = ChunkSource::new(Broken, 8);
        let err = src.peek().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
