// SPDX-License-Identifier: GPL-3.0
// buttons.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

/// Escape byte.
const ESC: u8 = 0x1B;

/// Byte produced by Ctrl-C when the terminal is in raw mode.
const ETX: u8 = 0x03;

/// This enum represents the logical buttons the player reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    PlayPause,
    Previous,
    Next,
    Eject,
    Quit,
}

impl Button {

    /// Returns a short name for the button.
    pub fn name(&self) -> &'static str {
        match self {
            Button::PlayPause => "Play/pause",
            Button::Previous => "Previous",
            Button::Next => "Next",
            Button::Eject => "Eject",
            Button::Quit => "Quit",
        }
    }
}

// Where the decoder is within an escape sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DecodeState {
    Ground,
    Escape,
    Sequence,
}

/// This struct turns raw terminal bytes into buttons. A lone ESC is the
/// eject button, but it is also the first byte of every arrow key sequence,
/// so it is held back until either more bytes arrive or the caller decides
/// the lookahead window has passed and calls `expire`.
pub struct ButtonDecoder {

    // Current position within a sequence.
    state: DecodeState,
}

/// Implementation functions for the button decoder.
impl ButtonDecoder {

    /// Creates a new decoder with nothing pending.
    pub fn new() -> Self {
        ButtonDecoder {
            state: DecodeState::Ground,
        }
    }

    /// Returns true if a partial sequence is waiting for more bytes.
    pub fn is_pending(&self) -> bool {
        self.state != DecodeState::Ground
    }

    /// Feeds one byte to the decoder, returning a button once one is complete.
    pub fn feed(&mut self, byte: u8) -> Option<Button> {

        match self.state {

            DecodeState::Ground => match byte {
                b' ' => Some(Button::PlayPause),
                b'q' | b'Q' | ETX => Some(Button::Quit),
                ESC => {
                    self.state = DecodeState::Escape;
                    None
                },
                _ => None,
            },

            DecodeState::Escape => match byte {

                // CSI and SS3 introducers. Terminals in application cursor
                // mode send arrows as ESC O C rather than ESC [ C.
                b'[' | b'O' => {
                    self.state = DecodeState::Sequence;
                    None
                },

                // The previous escape stood alone, this one may start a sequence.
                ESC => Some(Button::Eject),

                // Alt-chord, dropped.
                _ => {
                    self.state = DecodeState::Ground;
                    None
                },
            },

            DecodeState::Sequence => match byte {

                // Parameter and intermediate bytes, e.g. the "1;5" of a
                // modified arrow key.
                0x20..=0x3F => None,

                b'C' => {
                    self.state = DecodeState::Ground;
                    Some(Button::Next)
                },

                b'D' => {
                    self.state = DecodeState::Ground;
                    Some(Button::Previous)
                },

                // Any other final byte (or garbage) ends the sequence unmapped.
                _ => {
                    self.state = DecodeState::Ground;
                    None
                },
            },
        }
    }

    /// Tells the decoder the lookahead window has passed without further
    /// input. A held back ESC becomes the eject button, an unfinished
    /// sequence is dropped.
    pub fn expire(&mut self) -> Option<Button> {

        let state = self.state;
        self.state = DecodeState::Ground;
        match state {
            DecodeState::Escape => Some(Button::Eject),
            _ => None,
        }
    }
}
