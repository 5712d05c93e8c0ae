//! In-process invocation of a command-line tool
//!
//! [`Runner::run`] drives a [`Tool`]'s entry point as a function call and hands
//! back an [`InvocationResult`] instead of letting output reach the terminal or
//! the process exit. One call goes through these steps, in order:
//!
//! 1. install `[program name] + args` as the process-wide argument vector;
//! 2. redirect the raw stdout/stderr channels, then open a console capture;
//! 3. run the tool's first-run initialization;
//! 4. call the entry point;
//! 5. classify how it ended (exit code, non-integer exit, fault);
//! 6. close the capture, then the redirect;
//! 7. restore the previous argument vector;
//! 8. assemble the result.
//!
//! Steps 6 and 7 also run when steps 1-5 fail or unwind. Faults raised by the
//! tool in step 4 become exit code 1 with an `Error:` line on stderr; failures
//! in steps 1 and 3 are returned as errors.
//!
//! The argument vector and the raw channels are process-wide. Calls from
//! several threads must be serialized by the caller, and output written by
//! threads the tool spawns is not captured.

mod exit;
mod hook;

pub use exit::{Exit, ExitPayload, Outcome, exit};

use crate::argv::ArgvGuard;
use crate::capture::{CaptureBuffer, OutputCapture};
use crate::config::RunnerConfig;
use crate::console::Console;
use crate::stream::{self, RawStream, StreamRedirect};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

/// A command-line tool that can be driven in-process
pub trait Tool {
    /// Name used as argv[0] unless the runner config overrides it
    fn name(&self) -> &str;

    /// First-run setup, called before every entry-point call; must be idempotent
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Top-level command dispatch
    ///
    /// Terminates by returning an [`Exit`] or by calling [`exit`]. Returned
    /// errors and panics are reported as tool faults.
    fn main(&self, invocation: &Invocation) -> Result<Exit>;
}

/// Per-call context handed to a tool's entry point
pub struct Invocation {
    args: Vec<String>,
    console: Console,
}

impl Invocation {
    pub fn new(args: Vec<String>, console: Console) -> Self {
        Self { args, console }
    }

    /// Full argument vector, program name first
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// The console for this call; writes land in this call's capture when captured
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Raw stdout channel, for output that bypasses the console
    pub fn stdout(&self) -> RawStream {
        stream::stdout()
    }

    /// Raw stderr channel
    pub fn stderr(&self) -> RawStream {
        stream::stderr()
    }
}

/// Structured result of one in-process call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    /// Exit code the tool terminated with (0 unless it says otherwise)
    pub exit_code: i32,
    /// Captured console output followed by raw stdout
    pub stdout: String,
    /// Raw stderr followed by any runner-reported error
    pub stderr: String,
    /// Reserved for a structured decoding of the output; always empty
    pub parsed: Option<serde_json::Value>,
}

impl InvocationResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Drives a [`Tool`] as a function call
pub struct Runner<T> {
    tool: T,
    config: RunnerConfig,
}

impl<T: Tool> Runner<T> {
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            config: RunnerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn program_name(&self) -> &str {
        self.config
            .program_name
            .as_deref()
            .unwrap_or_else(|| self.tool.name())
    }

    fn argument_vector<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        std::iter::once(self.program_name().to_string())
            .chain(args.into_iter().map(Into::into))
            .collect()
    }

    fn bound_console(&self, buffer: &CaptureBuffer) -> Console {
        Console::bound(buffer.clone())
            .with_capture_width(self.config.capture_width)
            .with_tab_size(self.config.tab_size)
    }

    /// Run the tool with `args` and capture everything it prints
    ///
    /// Errors only for runner or environment faults; tool failures are
    /// reported through the result's exit code and stderr.
    pub fn run<I, S>(&self, args: I) -> Result<InvocationResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        hook::install();

        // Setup
        // No logging while any scope is installed: it would reach the terminal or the result
        let argv = self.argument_vector(args);
        let argv_guard = ArgvGuard::install(argv.clone()).context("failed to install arguments")?;

        // Acquire scopes: raw channels first, so every write below is covered
        let redirect = StreamRedirect::acquire();
        let capture = OutputCapture::new();
        let capture_guard = capture.acquire();

        // Initialize; a failure here is an environment fault and propagates
        self.tool
            .initialize()
            .with_context(|| format!("{} initialization failed", self.tool.name()))?;

        // Invoke and classify
        let invocation = Invocation::new(argv, self.bound_console(capture.buffer()));
        let outcome = self.invoke(&invocation);
        if let Outcome::Faulted(message) = &outcome {
            redirect.stderr().push_str(&format!("Error: {}\n", message));
        }

        // Release in reverse order, then restore the arguments
        drop(invocation);
        capture_guard.release();
        let (raw_stdout, raw_stderr) = redirect.release();
        drop(argv_guard);
        tracing::debug!("{} finished in-process: {:?}", self.program_name(), outcome);

        let mut stdout = capture.get_output();
        stdout.push_str(&raw_stdout);

        Ok(InvocationResult {
            exit_code: outcome.exit_code(),
            stdout,
            stderr: raw_stderr,
            parsed: None,
        })
    }

    /// Run the tool against the real terminal and return its exit code
    ///
    /// Used when the tool is launched as a process of its own: nothing is
    /// captured, faults are printed as `Error: <message>` on stderr.
    pub fn run_direct<I, S>(&self, args: I) -> Result<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        hook::install();

        let argv = self.argument_vector(args);
        let _argv_guard =
            ArgvGuard::install(argv.clone()).context("failed to install arguments")?;

        self.tool
            .initialize()
            .with_context(|| format!("{} initialization failed", self.tool.name()))?;

        let console = Console::new().with_tab_size(self.config.tab_size);
        let outcome = self.invoke(&Invocation::new(argv, console));
        if let Outcome::Faulted(message) = &outcome {
            let _ = writeln!(stream::stderr(), "Error: {}", message);
        }

        Ok(outcome.exit_code())
    }

    fn invoke(&self, invocation: &Invocation) -> Outcome {
        let _active = hook::ActiveInvocation::enter();
        match panic::catch_unwind(AssertUnwindSafe(|| self.tool.main(invocation))) {
            Ok(result) => Outcome::from_return(result),
            Err(payload) => Outcome::from_panic(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serial;
    use crate::{argv, capture, console};
    use std::cell::Cell;

    /// Tool whose entry point is a closure
    struct FnTool<F> {
        main: F,
        init_error: Option<&'static str>,
        init_calls: Cell<usize>,
    }

    impl<F> FnTool<F>
    where
        F: Fn(&Invocation) -> Result<Exit>,
    {
        fn new(main: F) -> Self {
            Self {
                main,
                init_error: None,
                init_calls: Cell::new(0),
            }
        }

        fn failing_init(main: F, message: &'static str) -> Self {
            Self {
                init_error: Some(message),
                ..Self::new(main)
            }
        }
    }

    impl<F> Tool for FnTool<F>
    where
        F: Fn(&Invocation) -> Result<Exit>,
    {
        fn name(&self) -> &str {
            "fake-tool"
        }

        fn initialize(&self) -> Result<()> {
            self.init_calls.set(self.init_calls.get() + 1);
            match self.init_error {
                Some(message) => anyhow::bail!(message),
                None => Ok(()),
            }
        }

        fn main(&self, invocation: &Invocation) -> Result<Exit> {
            (self.main)(invocation)
        }
    }

    #[test]
    fn test_integer_exit_code_is_adopted() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|_| Ok(Exit::code(3))));

        let result = runner.run(["anything"]).unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(result.parsed.is_none());
    }

    #[test]
    fn test_non_integer_exit_is_success() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|_| exit(Exit::message("finished"))));

        let result = runner.run(Vec::<String>::new()).unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn test_non_local_exit_keeps_output() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|invocation| {
            invocation.console().print("before exit");
            exit(5)
        }));

        let result = runner.run(["x"]).unwrap();

        assert_eq!(result.exit_code, 5);
        assert_eq!(result.stdout, "before exit\n");
    }

    #[test]
    fn test_returned_error_becomes_exit_one() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|invocation| {
            writeln!(invocation.stderr(), "warning: partial results")?;
            anyhow::bail!("target unreachable")
        }));

        let result = runner.run(["scan"]).unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "warning: partial results\nError: target unreachable\n");
    }

    #[test]
    fn test_error_line_ends_stderr_with_logging_on() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|_| {
            let _log = crate::logging::scoped(3);
            tracing::debug!("resolving targets");
            anyhow::bail!("target unreachable")
        }));
        let host = StreamRedirect::acquire();

        let result = {
            let _host_log = crate::logging::scoped(3);
            runner.run(["scan"]).unwrap()
        };

        let (_, host_stderr) = host.release();
        assert!(result.stderr.contains("resolving targets"));
        assert!(result.stderr.ends_with("Error: target unreachable\n"));
        assert!(!result.stderr.contains("finished in-process"));
        assert!(host_stderr.contains("finished in-process"));
    }

    #[test]
    fn test_panic_becomes_exit_one() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|_| panic!("index out of range")));

        let result = runner.run(["scan"]).unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.stderr, "Error: index out of range\n");
    }

    #[test]
    fn test_console_output_precedes_raw_stdout() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|invocation| {
            writeln!(invocation.stdout(), "raw line")?;
            invocation.console().print("console line");
            console::global().print("global console line");
            Ok(Exit::success())
        }));

        let result = runner.run(["x"]).unwrap();

        assert_eq!(result.stdout, "console line\nglobal console line\nraw line\n");
    }

    #[test]
    fn test_arguments_are_installed_and_restored() {
        let _serial = serial();
        let before = argv::args();
        let runner = Runner::new(FnTool::new(|invocation| {
            assert_eq!(argv::args(), invocation.args());
            invocation.console().print(&argv::args().join(" "));
            Ok(Exit::success())
        }));

        let result = runner.run(["scan", "--verbose"]).unwrap();

        assert_eq!(result.stdout, "fake-tool scan --verbose\n");
        assert_eq!(argv::args(), before);
    }

    #[test]
    fn test_program_name_from_config() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|invocation| {
            invocation.console().print(invocation.program());
            Ok(Exit::success())
        }))
        .with_config(RunnerConfig {
            program_name: Some("renamed".to_string()),
            ..RunnerConfig::default()
        });

        assert_eq!(runner.run(["x"]).unwrap().stdout, "renamed\n");
    }

    #[test]
    fn test_initialization_failure_propagates_and_restores() {
        let _serial = serial();
        let before = argv::args();
        let runner = Runner::new(FnTool::failing_init(
            |_| Ok(Exit::success()),
            "home directory not writable",
        ));

        let err = runner.run(["x"]).unwrap_err();

        assert!(format!("{:#}", err).contains("home directory not writable"));
        assert_eq!(argv::args(), before);
        assert!(!capture::is_capturing());
        assert!(!stream::is_redirected(stream::StreamKind::Stdout));
    }

    #[test]
    fn test_initialize_runs_on_every_call() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|_| Ok(Exit::success())));

        runner.run(["a"]).unwrap();
        runner.run(["b"]).unwrap();

        assert_eq!(runner.tool().init_calls.get(), 2);
    }

    #[test]
    fn test_state_is_clean_after_fault() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|invocation| {
            invocation.console().print("partial");
            panic!("crashed mid-write")
        }));

        runner.run(["x"]).unwrap();

        assert!(!capture::is_capturing());
        assert!(!stream::is_redirected(stream::StreamKind::Stdout));
        assert!(!stream::is_redirected(stream::StreamKind::Stderr));
    }

    #[test]
    fn test_sequential_calls_do_not_leak() {
        let _serial = serial();
        let runner = Runner::new(FnTool::new(|invocation| {
            let marker = &invocation.args()[1];
            invocation.console().print(&format!("console {}", marker));
            writeln!(invocation.stderr(), "stderr {}", marker)?;
            Ok(Exit::success())
        }));

        let first = runner.run(["alpha"]).unwrap();
        let second = runner.run(["beta"]).unwrap();

        assert!(first.stdout.contains("alpha"));
        assert!(!second.stdout.contains("alpha"));
        assert!(!second.stderr.contains("alpha"));
        assert_eq!(second.stdout, "console beta\n");
        assert_eq!(second.stderr, "stderr beta\n");
    }

    #[test]
    fn test_direct_run_returns_exit_code() {
        let _serial = serial();
        let before = argv::args();
        let runner = Runner::new(FnTool::new(|invocation| {
            assert!(!invocation.console().is_capturing());
            Ok(Exit::code(9))
        }));

        assert_eq!(runner.run_direct(["x"]).unwrap(), 9);
        assert_eq!(argv::args(), before);
    }
}
