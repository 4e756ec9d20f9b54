//! Human-readable output.

use std::env;
use std::io::{self, IsTerminal, Write};

use colored::{Colorize, control};

use crate::platform::CheckResult;

/// Width of the line separating identifiers.
pub const DIVIDER_WIDTH: usize = 60;

/// Printed when no identifiers are given.
pub const USAGE: &str = "\
Usage: namechecker <id> [id2] [id3] ...
Examples:
  namechecker abcd
  namechecker abcd myorg testname";

/// Decide once whether stdout gets ANSI colors.
///
/// `NO_COLOR` wins, then `CLICOLOR_FORCE`, then `CLICOLOR=0`; otherwise
/// colors follow whether stdout is a terminal.
pub fn init_colors() {
    let var = |key: &str| env::var(key).ok();
    let enabled = if var("NO_COLOR").is_some() {
        false
    } else if var("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        true
    } else if var("CLICOLOR").is_some_and(|v| v == "0") {
        false
    } else {
        io::stdout().is_terminal()
    };
    control::set_override(enabled);
}

/// Write the section for one identifier.
///
/// With `divider` set, a line of `=` precedes the header. The driver sets it
/// for every identifier, including the first, whenever more than one was
/// given.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_section(
    out: &mut impl Write,
    id: &str,
    results: &[CheckResult],
    divider: bool,
) -> io::Result<()> {
    if divider {
        writeln!(out, "\n{}", "=".repeat(DIVIDER_WIDTH))?;
    }
    writeln!(out, "\nChecking availability for: {id}\n")?;
    for result in results {
        writeln!(out, "{}", result_line(result))?;
    }
    writeln!(out)
}

/// One line per platform: marker, name, profile URL and, when the name is
/// free, where to claim it.
#[must_use]
pub fn result_line(result: &CheckResult) -> String {
    let status = if result.is_available() {
        "✓ Available".green()
    } else {
        "✗ Taken".red()
    };
    if result.is_available() {
        format!(
            "{status} - {}: {} → Create: {}",
            result.platform, result.url, result.create_url
        )
    } else {
        format!("{status} - {}: {}", result.platform, result.url)
    }
}
