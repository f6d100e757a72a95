// SPDX-License-Identifier: GPL-3.0
// logging.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{fmt::Arguments, io::Write};

use crossterm::style::Stylize;
use log::{Level, LevelFilter};

/// Sets up coloured logging on stderr. `RUST_LOG` overrides the verbosity
/// given on the command line.
pub fn init_logging(verbose: u8) {

    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = colog::default_builder();
    builder.filter_level(level);
    builder.parse_default_env();
    builder.format(|buf, record| {
        buf.write_all(format_record(record.level(), record.args()).as_bytes())
    });
    builder.init();
}

/// Formats one log record for a terminal in raw mode, where output
/// processing is off and a bare line feed does not return the cursor. The
/// record first clears whatever status line is on screen, then ends with an
/// explicit carriage return so the next redraw starts at column 0.
pub fn format_record(level: Level, args: &Arguments) -> String {

    let prefix = match level {
        Level::Error => "[!]".red(),
        Level::Warn => "[#]".yellow(),
        Level::Info => "[*]".green(),
        Level::Debug => "[+]".blue(),
        Level::Trace => "[-]".magenta(),
    };

    // Continuation lines need the same treatment.
    let message = args.to_string().replace('\n', "\r\n    ");
    format!("\r\x1b[K{} {}\r\n", prefix, message)
}
