//! Thread-scoped capture of styled console output
//!
//! Each thread owns a stack of capture frames. The console sink routes writes
//! to the top frame's buffer while the stack is non-empty, and to the terminal
//! otherwise. A frame lives exactly as long as the [`CaptureGuard`] returned by
//! [`OutputCapture::acquire`], and dropping a guard removes only its own frame,
//! so releasing an inner capture never switches off an outer one.
//!
//! Output written from threads other than the one that acquired the capture is
//! not covered and reaches the terminal.

mod buffer;

pub use buffer::CaptureBuffer;

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
    id: u64,
    buffer: CaptureBuffer,
}

/// A capture scope and the buffer it collects into
#[derive(Debug, Default)]
pub struct OutputCapture {
    buffer: CaptureBuffer,
}

impl OutputCapture {
    /// Create a capture with an empty buffer; nothing is captured until [`acquire`](Self::acquire)
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate capturing on the calling thread until the guard is dropped
    pub fn acquire(&self) -> CaptureGuard<'_> {
        let id = NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed);
        FRAMES.with(|frames| {
            frames.borrow_mut().push(Frame {
                id,
                buffer: self.buffer.clone(),
            });
        });

        CaptureGuard {
            id,
            _capture: PhantomData,
        }
    }

    /// The buffer this capture writes into
    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    /// Everything captured so far; valid before and after release
    pub fn get_output(&self) -> String {
        self.buffer.contents()
    }
}

/// Keeps a capture frame active on the thread that created it
///
/// The guard is neither `Send` nor `Sync`: the frame belongs to the acquiring
/// thread's stack.
#[must_use = "capturing stops as soon as the guard is dropped"]
pub struct CaptureGuard<'a> {
    id: u64,
    _capture: PhantomData<(&'a OutputCapture, *const ())>,
}

impl CaptureGuard<'_> {
    /// Release the capture explicitly; equivalent to dropping the guard
    pub fn release(self) {}
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        let id = self.id;
        // try_with: the guard may outlive the thread-local during thread teardown
        let _ = FRAMES.try_with(|frames| {
            frames.borrow_mut().retain(|frame| frame.id != id);
        });
    }
}

/// Whether the calling thread has an active capture
pub fn is_capturing() -> bool {
    depth() > 0
}

/// Number of active capture frames on the calling thread
pub fn depth() -> usize {
    FRAMES
        .try_with(|frames| frames.borrow().len())
        .unwrap_or(0)
}

/// Buffer of the innermost active capture on the calling thread
pub fn current() -> Option<CaptureBuffer> {
    FRAMES
        .try_with(|frames| frames.borrow().last().map(|frame| frame.buffer.clone()))
        .ok()
        .flatten()
}
