//! Process-wide argument vector
//!
//! Entry points written against a global argument list read it through
//! [`args()`]. The vector is seeded from the real process arguments and can be
//! swapped for the duration of an in-process invocation with [`ArgvGuard`].
//! Every read and replacement is a mutex-guarded critical section; whole
//! invocations are not serialized.

use anyhow::{Result, bail};
use lazy_static::lazy_static;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

lazy_static! {
    // Lossy: the seed is only a fallback for readers outside an invocation
    static ref ARGV: Mutex<Vec<String>> = Mutex::new(
        std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    );
}

fn argv() -> MutexGuard<'static, Vec<String>> {
    ARGV.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Convert OS arguments without loss, rejecting any that are not valid UTF-8
pub fn from_os<I>(args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.into_string().map_err(|raw| {
                anyhow::anyhow!("argument {} is not valid UTF-8: {:?}", index, raw)
            })
        })
        .collect()
}

/// Snapshot of the current argument vector, program name first
pub fn args() -> Vec<String> {
    argv().clone()
}

/// Install a new argument vector and return the one it replaced
pub fn replace(args: Vec<String>) -> Vec<String> {
    std::mem::replace(&mut *argv(), args)
}

/// Installs an argument vector and reinstalls the previous one when dropped
#[must_use = "the previous argument vector is restored as soon as the guard is dropped"]
pub struct ArgvGuard {
    saved: Option<Vec<String>>,
}

impl ArgvGuard {
    /// Install `args`; the first element is the program name and must be present
    pub fn install(args: Vec<String>) -> Result<Self> {
        match args.first() {
            None => bail!("argument vector must start with a program name"),
            Some(program) if program.is_empty() => bail!("program name must not be empty"),
            Some(_) => {}
        }

        let saved = replace(args);
        Ok(Self { saved: Some(saved) })
    }

    /// The vector that will be restored
    pub fn saved(&self) -> &[String] {
        self.saved.as_deref().unwrap_or_default()
    }
}

impl Drop for ArgvGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            replace(saved);
        }
    }
}
