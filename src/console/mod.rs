//! Styled console output for keyscan
//!
//! Provides consistent CLI formatting (status symbols, headers, key/value rows,
//! tables) on top of the `console` crate. Every write is routed at call time:
//!
//! - a console bound to a capture buffer always writes into that buffer;
//! - the process-wide console from [`global()`] writes into the calling
//!   thread's innermost capture when one is active;
//! - otherwise output goes to the raw stdout channel, i.e. the terminal unless
//!   a stream redirect is active.
//!
//! Captured output is rendered for a non-terminal: no ANSI codes and a fixed
//! line width, with the same layout a terminal would get.

mod render;

pub use render::{Render, RenderOptions, Rule, Table, expand_tabs};

use crate::capture::{self, CaptureBuffer};
use crate::stream::{self, StreamKind};
use console::{Term, strip_ansi_codes, style};
use lazy_static::lazy_static;
use std::io::Write;

/// Width used when output is not going to a terminal
pub const DEFAULT_WIDTH: usize = 80;

/// Columns per tab stop
pub const DEFAULT_TAB_SIZE: usize = 4;

lazy_static! {
    static ref GLOBAL: Console = Console::new();
}

/// The process-wide console shared by all callers
pub fn global() -> &'static Console {
    &GLOBAL
}

#[derive(Debug, Clone)]
enum Sink {
    Ambient,
    Bound(CaptureBuffer),
}

enum Target {
    Terminal,
    Capture(CaptureBuffer),
}

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone)]
pub struct Console {
    sink: Sink,
    verbose: u8,
    quiet: bool,
    tab_size: usize,
    capture_width: usize,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Console that follows the calling thread's capture state
    pub fn new() -> Self {
        Self {
            sink: Sink::Ambient,
            verbose: 0,
            quiet: false,
            tab_size: DEFAULT_TAB_SIZE,
            capture_width: DEFAULT_WIDTH,
        }
    }

    /// Console that always renders into `buffer`, whatever thread it is used from
    pub fn bound(buffer: CaptureBuffer) -> Self {
        Self {
            sink: Sink::Bound(buffer),
            ..Self::new()
        }
    }

    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        self.verbose = verbose;
        self.quiet = quiet;
        self
    }

    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Line width used for captured and non-terminal output
    pub fn with_capture_width(mut self, width: usize) -> Self {
        self.capture_width = width.max(1);
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Whether the next write would land in a capture buffer
    pub fn is_capturing(&self) -> bool {
        matches!(self.target(), Target::Capture(_))
    }

    fn target(&self) -> Target {
        match &self.sink {
            Sink::Bound(buffer) => Target::Capture(buffer.clone()),
            Sink::Ambient => capture::current()
                .map(Target::Capture)
                .unwrap_or(Target::Terminal),
        }
    }

    /// Render `content` followed by a newline
    ///
    /// Never fails: terminal write errors are dropped.
    pub fn print<R: Render + ?Sized>(&self, content: &R) {
        match self.target() {
            Target::Capture(buffer) => {
                let options = RenderOptions {
                    width: self.capture_width,
                    color: false,
                    tab_size: self.tab_size,
                };
                let rendered = content.render(&options);
                buffer.push_str(&strip_ansi_codes(&rendered));
                buffer.push_str("\n");
            }
            Target::Terminal => {
                let redirected = stream::is_redirected(StreamKind::Stdout);
                let term = Term::stdout();
                let options = RenderOptions {
                    width: if !redirected && term.is_term() {
                        usize::from(term.size().1)
                    } else {
                        self.capture_width
                    },
                    color: !redirected && console::colors_enabled(),
                    tab_size: self.tab_size,
                };

                let rendered = content.render(&options);
                let mut line = if options.color {
                    rendered
                } else {
                    strip_ansi_codes(&rendered).into_owned()
                };
                line.push('\n');

                if let Err(err) = stream::stdout().write_all(line.as_bytes()) {
                    tracing::trace!("dropped console write: {}", err);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print(&format!("{} {}", style("✔").green(), message));
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        self.print(&format!("{} {}", style("✖").red(), message));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.print(&format!("{} {}", style("⚠").yellow(), message));
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print(&format!("{} {}", style("ℹ").blue(), message));
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.is_verbose() && !self.quiet {
            self.print(&format!("{} {}", style("ℹ").dim(), style(message).dim()));
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            self.blank_line();
            self.print(&style(title).bold().underlined());
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.blank_line();
            self.print(&style(title).bold().cyan());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value)
            };
            self.print(&format!("  {:<14} {}", style(key).dim(), styled_value));
        }
    }

    /// Print a two-column row aligned with other rows
    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            self.print(&format!("  {:<20} {}", style(key).dim(), value));
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            self.print(&format!("  • {}", item));
        }
    }

    /// Print a status indicator with consistent styling
    pub fn status_indicator(&self, status: &str, message: &str, is_success: bool) {
        if !self.quiet {
            let (icon, status) = if is_success {
                ("✓", style(status).green())
            } else {
                ("✗", style(status).red())
            };
            self.print(&format!("{} {} {}", style(icon).bold(), status.bold(), message));
        }
    }

    /// Print a table
    pub fn table(&self, table: &Table) {
        if !self.quiet {
            self.print(table);
        }
    }

    /// Print a full-width separator
    pub fn separator(&self) {
        self.print(&Rule::new());
    }

    /// Print blank line
    pub fn blank_line(&self) {
        self.print("");
    }
}
