// SPDX-License-Identifier: GPL-3.0
// control.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use crate::{
    buttons::Button,
    cdrom_drive::{CdromDrive, DriveCommand, DriveStatus},
    media_player::{MediaListPlayer, PlayerError, PlayerState},
};

/// The default location loaded when an audio disc is inserted.
pub const DEFAULT_SOURCE: &str = "cdda://";

/// This enum represents what the controller did during a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Load,
    FinishedEject,
    Eject,
    Next,
    Previous,
    PlayPause,
    Quit,
}

impl Action {

    /// Returns a short description for the status line.
    pub fn as_text(&self) -> &'static str {
        match self {
            Action::Load => "Loading disc",
            Action::FinishedEject => "Finished, ejecting",
            Action::Eject => "Eject",
            Action::Next => "Next",
            Action::Previous => "Previous",
            Action::PlayPause => "Play/pause",
            Action::Quit => "Quit",
        }
    }
}

/// This struct reports the outcome of a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub drive_status: DriveStatus,
    pub player_state: Option<PlayerState>,
    pub action: Option<Action>,
}

/// This struct holds everything the control loop works with: the drive, the
/// player and the little state carried between iterations.
pub struct Controller<D: CdromDrive, P: MediaListPlayer> {

    // The drive being watched and the engine driven in response.
    drive: D,
    player: P,

    // Location handed to the player when a disc goes in.
    source: String,

    // Drive status of this and the previous iteration.
    drive_status: DriveStatus,
    prev_drive_status: DriveStatus,

    // Set once the stop and eject sequence has fired for the current
    // finished episode, so it is not repeated every iteration.
    finished_handled: bool,

    // Set while the drive cannot be queried, so the failure is logged once.
    status_failing: bool,
}

/// Implementation functions for the controller.
impl<D: CdromDrive, P: MediaListPlayer> Controller<D, P> {

    /// Creates a new controller. The previous status starts as "no info", so
    /// a disc already in the drive is loaded on the first tick.
    pub fn new(drive: D, player: P, source: impl Into<String>) -> Self {
        Controller {
            drive,
            player,
            source: source.into(),
            drive_status: DriveStatus::NoInfo,
            prev_drive_status: DriveStatus::NoInfo,
            finished_handled: false,
            status_failing: false,
        }
    }

    /// Runs one iteration of the control loop, handling at most one button.
    pub fn tick(&mut self, button: Option<Button>) -> Tick {

        self.prev_drive_status = self.drive_status;
        self.drive_status = self.sample_drive_status();
        if self.drive_status != self.prev_drive_status {
            log::debug!(
                "drive status {} -> {}",
                self.prev_drive_status.as_text(),
                self.drive_status.as_text()
            );
        }

        let mut tick = Tick {
            drive_status: self.drive_status,
            player_state: None,
            action: None,
        };

        // Nothing to play: hold the player paused and ignore everything but
        // a request to quit.
        if self.drive_status != DriveStatus::DiscOk {
            self.player.set_pause(true);
            if button == Some(Button::Quit) {
                tick.action = Some(Action::Quit);
            }
            return tick;
        }

        // Set whenever stop and eject has already been sent during this tick.
        let mut ejected = false;

        // Disc just went in. The door stays locked while it plays.
        if self.prev_drive_status != DriveStatus::DiscOk {
            tick.action = Some(Action::Load);
            self.finished_handled = false;
            match self.load_and_play() {
                Ok(()) => self.send_command(DriveCommand::LockDoor),
                Err(err) => {
                    log::error!("could not start playback of {}: {}", self.source, err);
                    self.stop_and_eject();
                    self.finished_handled = true;
                    ejected = true;
                },
            }
        }

        let player_state = self.player.state();
        tick.player_state = Some(player_state);

        if self.drive_status != DriveStatus::TrayOpen && player_state.is_finished() {
            if !self.finished_handled {
                log::info!("playback finished with state {:?}, ejecting", player_state);
                self.stop_and_eject();
                self.finished_handled = true;
                ejected = true;
                tick.action = Some(Action::FinishedEject);
            }
        } else {
            self.finished_handled = false;
        }

        match button {
            Some(Button::Eject) if ejected => log::debug!("eject already sent this tick"),
            Some(button) => tick.action = Some(self.handle_button(button)),
            None => (),
        }

        tick
    }

    /// Stops playback and releases the tray, ejecting the disc if asked to
    /// and one is present. Used on every exit path.
    pub fn shutdown(&mut self, eject: bool) {

        log::info!("shutting down");
        self.player.stop();
        self.send_command(DriveCommand::UnlockDoor);
        if eject && self.drive_status == DriveStatus::DiscOk {
            self.send_command(DriveCommand::Eject);
        }
    }

    /// Consumes the controller, handing back the drive and the player.
    pub fn into_parts(self) -> (D, P) {
        (self.drive, self.player)
    }

    /// Samples the drive, treating a failed query as "no info".
    fn sample_drive_status(&mut self) -> DriveStatus {

        match self.drive.drive_status() {
            Ok(status) => {
                if self.status_failing {
                    log::info!("drive responding again");
                    self.status_failing = false;
                }
                status
            },
            Err(err) => {
                if !self.status_failing {
                    log::warn!("drive status unavailable: {}", err);
                    self.status_failing = true;
                }
                DriveStatus::NoInfo
            },
        }
    }

    /// Loads the source into the player and starts from the first item.
    fn load_and_play(&mut self) -> Result<(), PlayerError> {

        log::info!("disc inserted, loading {}", self.source);
        self.player.load(&self.source)?;
        self.player.play_at(0)
    }

    /// Performs the action mapped to a button.
    fn handle_button(&mut self, button: Button) -> Action {

        log::info!("button: {}", button.name());
        match button {
            Button::Eject => {
                self.stop_and_eject();
                Action::Eject
            },
            Button::Next => {
                if let Err(err) = self.player.next() {
                    log::debug!("next ignored: {}", err);
                }
                Action::Next
            },
            Button::Previous => {
                if let Err(err) = self.player.previous() {
                    log::debug!("previous ignored: {}", err);
                }
                Action::Previous
            },
            Button::PlayPause => {
                self.player.pause();
                Action::PlayPause
            },
            Button::Quit => Action::Quit,
        }
    }

    /// The sole recovery action: stop, unlock the door and eject.
    fn stop_and_eject(&mut self) {

        self.player.stop();
        self.send_command(DriveCommand::UnlockDoor);
        self.send_command(DriveCommand::Eject);
    }

    /// Sends a drive command, logging rather than propagating failure.
    fn send_command(&mut self, command: DriveCommand) {

        if let Err(err) = self.drive.send_command(command) {
            log::warn!("{} failed: {}", command.name(), err);
        }
    }
}

#[cfg(test)]
mod tests;
