//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` for output gated on `--verbose`
//! - `status_*` functions for the observer's single-block status display
//!
//! # Example
//!
//! ```ignore
//! log!("relay"; "listening on {}", addr);
//! debug!("ws"; "pruned {} observers", n);
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "relay" | "http" => prefix.bright_blue().bold().to_string(),
        "ws" => prefix.bright_cyan().bold().to_string(),
        "observer" => prefix.bright_green().bold().to_string(),
        "editor" => prefix.bright_magenta().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Observer Status (one block, overwritten in place)
// ============================================================================

/// Current wall-clock time of day as HH:MM:SS (UTC).
fn now() -> String {
    let secs = crate::core::now_millis() / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Success,
    Unchanged,
    Error,
}

impl StatusKind {
    fn render(self, message: &str) -> String {
        match self {
            Self::Success => format!("{} {message}", "✓".green()),
            Self::Unchanged => message.dimmed().to_string(),
            Self::Error => format!("{} {message}", "✗".red()),
        }
    }
}

/// Status block for `watch`: each update replaces the previous one, so a
/// long-running observer only shows its latest frame.
struct ObserverStatus {
    /// Terminal lines taken by the block currently on screen.
    shown: usize,
}

static OBSERVER_STATUS: Mutex<ObserverStatus> = parking_lot::const_mutex(ObserverStatus { shown: 0 });

impl ObserverStatus {
    fn show(&mut self, kind: StatusKind, message: &str) {
        let mut stdout = stdout().lock();

        if self.shown > 0 {
            let up = u16::try_from(self.shown).unwrap_or(u16::MAX);
            execute!(stdout, cursor::MoveUp(up), Clear(ClearType::FromCursorDown)).ok();
        }

        let stamp = format!("[{}]", now());
        writeln!(stdout, "{} {}", stamp.dimmed(), kind.render(message)).ok();
        stdout.flush().ok();

        self.shown = line_count(message);
    }
}

fn join_detail(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        summary.to_owned()
    } else {
        format!("{summary}\n{detail}")
    }
}

fn line_count(message: &str) -> usize {
    message.lines().count().max(1)
}

/// Replace the status block with a success line.
pub fn status_success(message: &str) {
    OBSERVER_STATUS.lock().show(StatusKind::Success, message);
}

/// Replace the status block with a dimmed line.
pub fn status_unchanged(message: &str) {
    OBSERVER_STATUS.lock().show(StatusKind::Unchanged, message);
}

/// Replace the status block with an error and its indented detail.
pub fn status_error(summary: &str, detail: &str) {
    OBSERVER_STATUS
        .lock()
        .show(StatusKind::Error, &join_detail(summary, detail));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("frame 1440x900"), 1);
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count(&join_detail("disconnected", "reset\n  by peer")), 3);
        assert_eq!(line_count(&join_detail("disconnected", "")), 1);
    }

    #[test]
    fn test_now_format() {
        let t = now();
        assert_eq!(t.len(), 8);
        assert_eq!(t.as_bytes()[2], b':');
        assert_eq!(t.as_bytes()[5], b':');
    }

    #[test]
    fn test_status_kinds_keep_message() {
        assert!(StatusKind::Success.render("12 nodes").ends_with("12 nodes"));
        assert!(StatusKind::Error.render("gone").contains('✗'));
        assert!(StatusKind::Unchanged.render("same").contains("same"));
    }

    #[test]
    fn test_colorize_prefix_keeps_module_name() {
        assert!(colorize_prefix("relay", "relay").contains("[relay]"));
        assert!(colorize_prefix("custom", "custom").contains("[custom]"));
    }
}
