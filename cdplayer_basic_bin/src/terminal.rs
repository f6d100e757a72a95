// SPDX-License-Identifier: GPL-3.0
// terminal.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    collections::VecDeque,
    io::{self, Write},
    os::fd::RawFd,
    time::{Duration, Instant},
};

use cdplayer_core::buttons::{Button, ButtonDecoder};
use libc::{c_int, c_void};
use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

/// The largest number of bytes taken from stdin in one read.
const READ_CHUNK_BYTES: usize = 32;

/// This struct owns the controlling terminal while the player runs. It puts
/// the terminal in raw mode on creation and restores it when dropped, reads
/// buttons without blocking the loop for longer than asked and draws the
/// status line in place.
pub struct Terminal {

    // Turns raw bytes into buttons.
    decoder: ButtonDecoder,

    // Buttons decoded but not yet handed out, one is returned per call.
    queued: VecDeque<Button>,

    // How long a lone ESC is held before it counts as a button.
    escape_timeout: Duration,

    // Descriptor buttons are read from, normally stdin.
    input: RawFd,

    // Set when raw mode was switched on here and must be undone on drop.
    raw_mode: bool,
}

/// Implementation functions for the terminal.
impl Terminal {

    /// Switches the terminal to raw mode: no echo, no line buffering and no
    /// signal keys, so Ctrl-C arrives as a byte.
    pub fn new(escape_timeout: Duration) -> io::Result<Self> {

        terminal::enable_raw_mode()?;
        let mut terminal = Terminal::with_input(libc::STDIN_FILENO, escape_timeout);
        terminal.raw_mode = true;
        Ok(terminal)
    }

    /// Creates a terminal reading buttons from `input`, leaving the terminal
    /// modes alone.
    fn with_input(input: RawFd, escape_timeout: Duration) -> Self {
        Terminal {
            decoder: ButtonDecoder::new(),
            queued: VecDeque::new(),
            escape_timeout,
            input,
            raw_mode: false,
        }
    }

    /// Waits up to `wait` for a button. Returns early as soon as one is
    /// decoded. A pending ESC may extend the wait by the escape timeout.
    pub fn next_button(&mut self, wait: Duration) -> io::Result<Option<Button>> {

        if let Some(button) = self.queued.pop_front() {
            return Ok(Some(button));
        }

        let deadline = Instant::now() + wait;
        loop {
            let timeout = if self.decoder.is_pending() {
                self.escape_timeout
            } else {
                deadline.saturating_duration_since(Instant::now())
            };

            if !poll_input(self.input, timeout)? {
                if self.decoder.is_pending() {
                    if let Some(button) = self.decoder.expire() {
                        return Ok(Some(button));
                    }
                    continue;
                }
                return Ok(None);
            }

            let mut buffer = [0u8; READ_CHUNK_BYTES];
            let count = match read_input(self.input, &mut buffer)? {
                Some(0) => {
                    log::info!("keyboard input closed");
                    return Ok(Some(Button::Quit));
                },
                Some(count) => count,
                None => continue,
            };

            for byte in &buffer[..count] {
                if let Some(button) = self.decoder.feed(*byte) {
                    self.queued.push_back(button);
                }
            }

            if let Some(button) = self.queued.pop_front() {
                return Ok(Some(button));
            }
            if !self.decoder.is_pending() && Instant::now() >= deadline {
                return Ok(None);
            }
        }
    }

    /// Redraws the status line in place.
    pub fn draw_status_line(&mut self, line: &str) -> io::Result<()> {

        let mut stdout = io::stdout().lock();
        queue!(
            stdout,
            MoveToColumn(0),
            Print(line),
            Clear(ClearType::UntilNewLine)
        )?;
        stdout.flush()
    }
}

impl Drop for Terminal {

    fn drop(&mut self) {

        if !self.raw_mode {
            return;
        }

        // Leave the status line intact and start the shell prompt below it.
        let mut stdout = io::stdout();
        let _ = write!(stdout, "\r\n");
        let _ = stdout.flush();
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("could not restore terminal: {}", err);
        }
    }
}

/// Waits up to `timeout` for `input` to become readable. A wait cut short by
/// a signal reports nothing to read.
fn poll_input(input: RawFd, timeout: Duration) -> io::Result<bool> {

    let mut fds = libc::pollfd {
        fd: input,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = timeout.as_millis().min(c_int::MAX as u128) as c_int;

    let result = unsafe { libc::poll(&mut fds, 1, millis) };
    if result < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }

    Ok(result > 0)
}

/// Reads whatever `input` has ready straight from the descriptor, bypassing
/// the standard library's buffer so `poll` stays accurate. `None` means the
/// read should simply be retried.
fn read_input(input: RawFd, buffer: &mut [u8]) -> io::Result<Option<usize>> {

    let result = unsafe {
        libc::read(input, buffer.as_mut_ptr() as *mut c_void, buffer.len())
    };
    if result < 0 {
        let err = io::Error::last_os_error();
        return match err.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
            _ => Err(err),
        };
    }

    Ok(Some(result as usize))
}
