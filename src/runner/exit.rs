//! Termination values and outcome classification
//!
//! A tool finishes either by returning an [`Exit`] from its entry point or by
//! calling [`exit`], which unwinds to the runner carrying the same value. The
//! runner turns both, and any fault, into an [`Outcome`].

use std::any::Any;
use std::fmt;

/// Status carried by a termination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitPayload {
    /// Integer status code, passed through verbatim
    Code(i32),
    /// Non-integer payload; treated as success
    Message(String),
    /// No payload; treated as success
    Absent,
}

/// A tool's termination signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    payload: ExitPayload,
}

impl Exit {
    /// Terminate without a status code
    pub fn success() -> Self {
        Self {
            payload: ExitPayload::Absent,
        }
    }

    /// Terminate with an integer status code
    pub fn code(code: i32) -> Self {
        Self {
            payload: ExitPayload::Code(code),
        }
    }

    /// Terminate with a non-integer payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            payload: ExitPayload::Message(message.into()),
        }
    }

    pub fn payload(&self) -> &ExitPayload {
        &self.payload
    }

    /// The process exit code this termination stands for
    pub fn exit_code(&self) -> i32 {
        match self.payload {
            ExitPayload::Code(code) => code,
            ExitPayload::Message(_) | ExitPayload::Absent => 0,
        }
    }
}

impl Default for Exit {
    fn default() -> Self {
        Self::success()
    }
}

impl From<i32> for Exit {
    fn from(code: i32) -> Self {
        Self::code(code)
    }
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            ExitPayload::Code(code) => write!(f, "exit({})", code),
            ExitPayload::Message(message) => write!(f, "exit({:?})", message),
            ExitPayload::Absent => write!(f, "exit()"),
        }
    }
}

/// Terminate the running tool from anywhere below its entry point
///
/// Unwinds to the enclosing runner without invoking the panic hook. Calling it
/// outside a runner unwinds the thread like an uncaught panic.
pub fn exit(exit: impl Into<Exit>) -> ! {
    std::panic::resume_unwind(Box::new(exit.into()))
}

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tool terminated through its exit convention
    Exited(Exit),
    /// The tool failed; carries the fault message
    Faulted(String),
}

impl Outcome {
    /// Classify the value returned by a tool's entry point
    pub fn from_return(result: anyhow::Result<Exit>) -> Self {
        match result {
            Ok(exit) => Outcome::Exited(exit),
            Err(err) => match err.downcast::<Exit>() {
                Ok(exit) => Outcome::Exited(exit),
                Err(err) => Outcome::Faulted(format!("{:#}", err)),
            },
        }
    }

    /// Classify a payload caught while unwinding out of a tool
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Exit>() {
            Ok(exit) => return Outcome::Exited(*exit),
            Err(payload) => payload,
        };
        if let Some(message) = payload.downcast_ref::<&str>() {
            return Outcome::Faulted((*message).to_string());
        }
        if let Some(message) = payload.downcast_ref::<String>() {
            return Outcome::Faulted(message.clone());
        }
        Outcome::Faulted("tool panicked with a non-string payload".to_string())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Exited(exit) => exit.exit_code(),
            Outcome::Faulted(_) => 1,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Outcome::Faulted(_))
    }
}

impl std::error::Error for Exit {}
