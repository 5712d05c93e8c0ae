use super::{Channel, Channels, channels};
use crate::capture::CaptureBuffer;
use std::marker::PhantomData;

/// Scoped swap of both raw channels for fresh in-memory buffers
///
/// Dropping the redirect, including while unwinding, reinstalls the channels
/// that were active before it. Both channels are swapped and restored under a
/// single lock.
#[must_use = "the channels are restored as soon as the redirect is dropped"]
pub struct StreamRedirect {
    stdout: CaptureBuffer,
    stderr: CaptureBuffer,
    previous: Option<Channels>,
    _not_send: PhantomData<*const ()>,
}

impl StreamRedirect {
    /// Redirect raw stdout and stderr into new buffers
    pub fn acquire() -> Self {
        let stdout = CaptureBuffer::new();
        let stderr = CaptureBuffer::new();

        let previous = {
            let mut current = channels();
            std::mem::replace(
                &mut *current,
                Channels {
                    stdout: Channel::Buffer(stdout.clone()),
                    stderr: Channel::Buffer(stderr.clone()),
                },
            )
        };

        Self {
            stdout,
            stderr,
            previous: Some(previous),
            _not_send: PhantomData,
        }
    }

    /// Buffer receiving raw stdout writes
    pub fn stdout(&self) -> &CaptureBuffer {
        &self.stdout
    }

    /// Buffer receiving raw stderr writes
    pub fn stderr(&self) -> &CaptureBuffer {
        &self.stderr
    }

    /// Restore the previous channels and return what was captured as `(stdout, stderr)`
    pub fn release(mut self) -> (String, String) {
        self.restore();
        (self.stdout.contents(), self.stderr.contents())
    }

    fn restore(&mut self) {
        if let Some(previous) = self.previous.take() {
            *channels() = previous;
        }
    }
}

impl Drop for StreamRedirect {
    fn drop(&mut self) {
        self.restore();
    }
}
