//! Process-wide raw output channels
//!
//! Tool code that writes outside the styled console uses [`stdout()`] and
//! [`stderr()`] instead of the std handles. Both write to the real file
//! descriptors unless a [`StreamRedirect`] is active, in which case they write
//! into the redirect's in-memory buffers.
//!
//! The channels are shared by every thread in the process. Redirects must be
//! released in the reverse order they were acquired, which the invocation
//! runner guarantees for sequential calls.

mod redirect;

pub use redirect::StreamRedirect;

use crate::capture::CaptureBuffer;
use lazy_static::lazy_static;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

lazy_static! {
    static ref CHANNELS: Mutex<Channels> = Mutex::new(Channels::terminal());
}

/// Which raw channel a handle writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone)]
enum Channel {
    Terminal,
    Buffer(CaptureBuffer),
}

#[derive(Debug, Clone)]
struct Channels {
    stdout: Channel,
    stderr: Channel,
}

impl Channels {
    fn terminal() -> Self {
        Self {
            stdout: Channel::Terminal,
            stderr: Channel::Terminal,
        }
    }

    fn get(&self, kind: StreamKind) -> &Channel {
        match kind {
            StreamKind::Stdout => &self.stdout,
            StreamKind::Stderr => &self.stderr,
        }
    }
}

// Never log while holding this lock: the tracing writer goes through the same channels.
fn channels() -> MutexGuard<'static, Channels> {
    CHANNELS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the raw stdout channel
pub fn stdout() -> RawStream {
    RawStream {
        kind: StreamKind::Stdout,
    }
}

/// Handle to the raw stderr channel
pub fn stderr() -> RawStream {
    RawStream {
        kind: StreamKind::Stderr,
    }
}

/// Whether the given channel currently writes into a buffer
pub fn is_redirected(kind: StreamKind) -> bool {
    matches!(channels().get(kind), Channel::Buffer(_))
}

/// Writer over one raw channel, resolved at every write
#[derive(Debug, Clone, Copy)]
pub struct RawStream {
    kind: StreamKind,
}

impl RawStream {
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    fn target(&self) -> Channel {
        channels().get(self.kind).clone()
    }
}

impl Write for RawStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match (self.target(), self.kind) {
            (Channel::Buffer(mut buffer), _) => buffer.write(buf),
            (Channel::Terminal, StreamKind::Stdout) => io::stdout().write(buf),
            (Channel::Terminal, StreamKind::Stderr) => io::stderr().write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        // Resolve once so a single logical write never straddles two channels
        match (self.target(), self.kind) {
            (Channel::Buffer(mut buffer), _) => buffer.write_all(buf),
            (Channel::Terminal, StreamKind::Stdout) => io::stdout().lock().write_all(buf),
            (Channel::Terminal, StreamKind::Stderr) => io::stderr().lock().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match (self.target(), self.kind) {
            (Channel::Buffer(_), _) => Ok(()),
            (Channel::Terminal, StreamKind::Stdout) => io::stdout().flush(),
            (Channel::Terminal, StreamKind::Stderr) => io::stderr().flush(),
        }
    }
}
