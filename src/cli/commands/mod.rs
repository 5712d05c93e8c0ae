//! Command implementations for the keyscan CLI
//!
//! Each command renders through the invocation's console and returns the
//! [`Exit`](crate::runner::Exit) the tool terminates with.

pub mod config;
pub mod patterns;
pub mod scan;
pub mod version;
