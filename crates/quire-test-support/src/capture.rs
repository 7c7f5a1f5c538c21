//! In-memory output sink for asserting console output.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable writer; every clone appends to the same buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Written output split into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(ToString::to_string).collect()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that always fails, for exercising listener failures.
#[derive(Clone, Copy, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_buffer() -> io::Result<()> {
        let buffer = SharedBuffer::new();
        let mut writer = buffer.clone();
        writeln!(writer, "first")?;
        writeln!(writer, "second")?;
        assert_eq!(buffer.lines(), vec!["first", "second"]);

        buffer.clear();
        assert!(buffer.contents().is_empty());
        Ok(())
    }

    #[test]
    fn failing_writer_reports_broken_pipe() {
        let err = FailingWriter.write(b"x").expect_err("write fails");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
