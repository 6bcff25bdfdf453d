use std::io::{self, Read};

/// Where a [`RangeReader`] is in its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeState {
    /// Bytes before the window start have not all been discarded yet.
    Seeking,
    Serving,
    Exhausted,
}

/// Yields at most `length` bytes of `inner`, starting `start` bytes in.
///
/// The leading bytes are discarded on the first read rather than at
/// construction, so building a reader never touches the source. The
/// source only needs to support forward reads.
#[derive(Debug)]
pub struct RangeReader<R> {
    inner: R,
    start: u64,
    length: u64,
    discarded: u64,
    served: u64,
    exhausted: bool,
}

impl<R: Read> RangeReader<R> {
    pub fn new(inner: R, start: u64, length: u64) -> Self {
        Self {
            inner,
            start,
            length,
            discarded: 0,
            served: 0,
            exhausted: false,
        }
    }

    pub fn state(&self) -> RangeState {
        if self.exhausted {
            RangeState::Exhausted
        } else if self.discarded < self.start {
            RangeState::Seeking
        } else if self.served >= self.length {
            RangeState::Exhausted
        } else {
            RangeState::Serving
        }
    }

    /// Bytes handed out so far.
    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // Bytes are counted as they are discarded, so a failed skip resumes
    // where it stopped.
    fn skip_to_start(&mut self) -> io::Result<()> {
        let mut scratch = [0u8; 8 * 1024];
        while self.discarded < self.start {
            let want = (self.start - self.discarded).min(scratch.len() as u64) as usize;
            match self.inner.read(&mut scratch[..want]) {
                Ok(0) => {
                    // Source ended before the window began.
                    self.exhausted = true;
                    return Ok(());
                }
                Ok(n) => self.discarded += n as u64,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for RangeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.state() == RangeState::Seeking {
            self.skip_to_start()?;
        }
        if self.state() == RangeState::Exhausted || buf.is_empty() {
            return Ok(0);
        }

        let budget = (self.length - self.served).min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..budget])?;
        if n == 0 {
            self.exhausted = true;
        }
        self.served += n as u64;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn read_all(start: u64, length: u64, data: &[u8]) -> Vec<u8> {
        let mut reader = RangeReader::new(Cursor::new(data.to_vec()), start, length);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn windows() {
        let cases: &[(u64, u64, &[u8], &[u8])] = &[
            (0, 5, b"hello", b"hello"),
            (4, 3, b"123_456_789", b"456"),
            (0, 3, b"123_456_789", b"123"),
            (8, 100, b"123_456_789", b"789"),
            (5, 0, b"hello", b""),
            (9, 2, b"hello", b""),
        ];
        for (start, length, data, want) in cases {
            assert_eq!(read_all(*start, *length, data), want.to_vec(), "start={} length={}", start, length);
        }
    }

    #[test]
    fn state_transitions() {
        let mut reader = RangeReader::new(Cursor::new(b"123_456_789".to_vec()), 4, 3);
        assert_eq!(reader.state(), RangeState::Seeking);

        let mut buf = [0u8; 2];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"45");
        assert_eq!(reader.state(), RangeState::Serving);

        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'6');
        assert_eq!(reader.state(), RangeState::Exhausted);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.served(), 3);
    }

    #[test]
    fn construction_does_not_read() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "boom"))
            }
        }

        let mut reader = RangeReader::new(Failing, 1, 1);
        assert_eq!(reader.state(), RangeState::Seeking);
        let err = reader.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn zero_length_still_discards_leading_bytes() {
        let mut reader = RangeReader::new(Cursor::new(b"hello".to_vec()), 5, 0);
        assert_eq!(reader.state(), RangeState::Seeking);
        assert_eq!(reader.read(&mut [0u8; 8]).unwrap(), 0);
        assert_eq!(reader.state(), RangeState::Exhausted);
        assert_eq!(reader.into_inner().position(), 5);

        let mut reader = RangeReader::new(Cursor::new(b"hello".to_vec()), 0, 0);
        assert_eq!(reader.state(), RangeState::Exhausted);
        assert_eq!(reader.read(&mut [0u8; 8]).unwrap(), 0);
        assert_eq!(reader.into_inner().position(), 0);
    }

    /// Hands out two bytes per call and fails on the chosen call.
    struct Flaky {
        data: Cursor<Vec<u8>>,
        calls: usize,
        fail_on: usize,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_on {
                return Err(io::Error::new(io::ErrorKind::Other, "flaky"));
            }
            let n = buf.len().min(2);
            self.data.read(&mut buf[..n])
        }
    }

    #[test]
    fn resumes_skip_after_source_error() {
        let source = Flaky {
            data: Cursor::new(b"123_456_789".to_vec()),
            calls: 0,
            fail_on: 2,
        };
        let mut reader = RangeReader::new(source, 4, 3);

        let mut buf = [0u8; 8];
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.to_string(), "flaky");
        assert_eq!(reader.state(), RangeState::Seeking);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"456".to_vec());
    }
}
