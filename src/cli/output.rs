use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set output verbosity from the global CLI flags. Quiet wins.
pub fn configure(verbose: bool, quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
    VERBOSE.store(verbose && !quiet, Ordering::Relaxed);
}

/// Whether only errors should be printed.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a success message.
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if !is_quiet() {
        println!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message. Never suppressed.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if !is_quiet() {
        println!("\n{}", msg.bold());
    }
}

/// Print a plain indented line.
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("    {msg}");
    }
}

/// Print a line only in verbose mode.
pub fn detail(msg: &str) {
    if VERBOSE.load(Ordering::Relaxed) {
        println!("    {}", msg.dimmed());
    }
}
