// SPDX-License-Identifier: GPL-3.0
// media_player.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use thiserror::Error;

/// This trait provides an implementation-opaque way of calling a media-list
/// backed playback engine from elsewhere in the system. Implementations are
/// expected to be fully set up on construction and to release the engine
/// when dropped.
pub trait MediaListPlayer {

    /// Implementations must create a media item from the supplied location,
    /// append it to their media list and hand the list to the list player.
    fn load(&mut self, location: &str) -> Result<(), PlayerError>;

    /// Implementations must start playback of the list item at `index`.
    fn play_at(&mut self, index: usize) -> Result<(), PlayerError>;

    /// Implementations must toggle between playing and paused.
    fn pause(&mut self);

    /// Implementations must force the paused state on or off. Forcing an
    /// already paused player must have no effect.
    fn set_pause(&mut self, paused: bool);

    /// Implementations must stop playback.
    fn stop(&mut self);

    /// Implementations must skip to the next list item.
    fn next(&mut self) -> Result<(), PlayerError>;

    /// Implementations must skip to the previous list item.
    fn previous(&mut self) -> Result<(), PlayerError>;

    /// Implementations must return the current engine state.
    fn state(&self) -> PlayerState;
}

/// This enum represents the playback state owned by the engine. Numeric codes
/// follow the engine's own numbering and are shown on the status line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum PlayerState {
    NothingSpecial = 0,
    Opening = 1,
    Buffering = 2,
    Playing = 3,
    Paused = 4,
    Stopped = 5,
    Ended = 6,
    Error = 7,
}

impl PlayerState {

    /// Converts an engine state code into a player state. Codes the engine
    /// should never report are treated as an error.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PlayerState::NothingSpecial,
            1 => PlayerState::Opening,
            2 => PlayerState::Buffering,
            3 => PlayerState::Playing,
            4 => PlayerState::Paused,
            5 => PlayerState::Stopped,
            6 => PlayerState::Ended,
            _ => PlayerState::Error,
        }
    }

    /// Returns the engine state code.
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Returns true when playback can go no further, either because the end
    /// of the list was reached or the engine gave up.
    pub fn is_finished(&self) -> bool {
        matches!(self, PlayerState::Ended | PlayerState::Error)
    }
}

/// Errors raised by playback engine implementations.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to initialise playback engine")]
    EngineInit,

    #[error("invalid media location {0:?}")]
    InvalidLocation(String),

    #[error("engine could not create media for {0:?}")]
    MediaCreation(String),

    #[error("no list item at index {0}")]
    NoSuchItem(usize),

    #[error("no {0} item in the list")]
    NoAdjacentItem(&'static str),
}
