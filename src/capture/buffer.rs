//! Shared in-memory text sink
//!
//! Capture frames, redirected raw channels and bound consoles all write into a
//! `CaptureBuffer`. Clones share the same storage.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Growable byte buffer shared between writers of one capture scope
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text to the buffer
    pub fn push_str(&self, text: &str) {
        self.lock().extend_from_slice(text.as_bytes());
    }

    /// Current contents, decoded as UTF-8 with invalid sequences replaced
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both handles point at the same storage
    pub fn same_as(&self, other: &CaptureBuffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // A writer that panicked mid-write must not make the captured text unreachable.
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl io::Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clones_share_storage() {
        let buffer = CaptureBuffer::new();
        let mut writer = buffer.clone();

        writer.write_all(b"hello ").unwrap();
        buffer.push_str("world");

        assert_eq!(buffer.contents(), "hello world");
        assert!(buffer.same_as(&writer));
        assert!(!buffer.same_as(&CaptureBuffer::new()));
    }

    #[test]
    fn test_split_multibyte_writes_decode_cleanly() {
        let mut buffer = CaptureBuffer::new();
        let bytes = "✔ done".as_bytes();

        buffer.write_all(&bytes[..1]).unwrap();
        buffer.write_all(&bytes[1..]).unwrap();

        assert_eq!(buffer.contents(), "✔ done");
        assert_eq!(buffer.len(), bytes.len());
    }
}
