//! Panic reporting while a tool runs
//!
//! A panicking tool is reported by the runner as `Error: <message>`, so the
//! default hook's report would only leak to the real terminal. The hook
//! installed here stays silent for threads that are inside an invocation and
//! defers to the previous hook everywhere else.

use std::cell::Cell;
use std::panic;
use std::sync::Once;

static INSTALL: Once = Once::new();

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Install the hook once per process
pub(crate) fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !in_invocation() {
                previous(info);
            }
        }));
    });
}

fn in_invocation() -> bool {
    DEPTH.try_with(Cell::get).unwrap_or(0) > 0
}

/// Marks the calling thread as running a tool until dropped
pub(crate) struct ActiveInvocation {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ActiveInvocation {
    pub(crate) fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self {
            _not_send: std::marker::PhantomData,
        }
    }
}

impl Drop for ActiveInvocation {
    fn drop(&mut self) {
        let _ = DEPTH.try_with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
