// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{collections::VecDeque, io, path::PathBuf};

use crate::{
    buttons::Button,
    cdrom_drive::{CdromDrive, DriveCommand, DriveError, DriveStatus},
    media_player::{MediaListPlayer, PlayerError, PlayerState},
};

use super::{Action, Controller, DEFAULT_SOURCE};

// Tests for the control loop, run against fake drive and player objects.

/// A drive that replays a scripted sequence of statuses, repeating the last
/// one once the script runs out, and records every command it receives.
struct FakeDrive {
    statuses: VecDeque<Option<DriveStatus>>,
    last: Option<DriveStatus>,
    commands: Vec<DriveCommand>,
}

impl FakeDrive {

    fn new(statuses: &[DriveStatus]) -> Self {
        FakeDrive {
            statuses: statuses.iter().copied().map(Some).collect(),
            last: Some(DriveStatus::NoDisc),
            commands: vec![],
        }
    }

    /// Makes the next status query fail.
    fn push_failure(&mut self) {
        self.statuses.push_back(None);
    }
}

impl CdromDrive for FakeDrive {

    fn drive_status(&mut self) -> Result<DriveStatus, DriveError> {

        let next = match self.statuses.pop_front() {
            Some(next) => next,
            None => self.last,
        };
        self.last = next;

        next.ok_or_else(|| DriveError::Ioctl {
            path: PathBuf::from("/dev/fake"),
            request: "drive status",
            source: io::Error::other("simulated failure"),
        })
    }

    fn send_command(&mut self, command: DriveCommand) -> Result<i32, DriveError> {
        self.commands.push(command);
        Ok(0)
    }
}

/// Every call the fake player can receive.
#[derive(Clone, Debug, PartialEq, Eq)]
enum PlayerCall {
    Load(String),
    PlayAt(usize),
    Pause,
    SetPause(bool),
    Stop,
    Next,
    Previous,
}

/// A player whose state is set directly by the test, recording every call.
struct FakePlayer {
    state: PlayerState,
    calls: Vec<PlayerCall>,
    fail_load: bool,
}

impl FakePlayer {

    fn new() -> Self {
        FakePlayer {
            state: PlayerState::NothingSpecial,
            calls: vec![],
            fail_load: false,
        }
    }

    fn count(&self, call: &PlayerCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl MediaListPlayer for FakePlayer {

    fn load(&mut self, location: &str) -> Result<(), PlayerError> {
        self.calls.push(PlayerCall::Load(location.to_string()));
        if self.fail_load {
            return Err(PlayerError::MediaCreation(location.to_string()));
        }
        Ok(())
    }

    fn play_at(&mut self, index: usize) -> Result<(), PlayerError> {
        self.calls.push(PlayerCall::PlayAt(index));
        self.state = PlayerState::Playing;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(PlayerCall::Pause);
    }

    fn set_pause(&mut self, paused: bool) {
        self.calls.push(PlayerCall::SetPause(paused));
    }

    fn stop(&mut self) {
        self.calls.push(PlayerCall::Stop);
        self.state = PlayerState::Stopped;
    }

    fn next(&mut self) -> Result<(), PlayerError> {
        self.calls.push(PlayerCall::Next);
        Ok(())
    }

    fn previous(&mut self) -> Result<(), PlayerError> {
        self.calls.push(PlayerCall::Previous);
        Err(PlayerError::NoAdjacentItem("previous"))
    }

    fn state(&self) -> PlayerState {
        self.state
    }
}

fn controller(statuses: &[DriveStatus]) -> Controller<FakeDrive, FakePlayer> {
    Controller::new(FakeDrive::new(statuses), FakePlayer::new(), DEFAULT_SOURCE)
}

fn eject_sequence_count(drive: &FakeDrive) -> usize {
    drive.commands.iter().filter(|c| **c == DriveCommand::Eject).count()
}

#[test]
fn test_tick_disc_insertion_loads_once() {

    // Given a drive that goes from empty through not ready to a disc,
    let mut controller = controller(&[
        DriveStatus::NoDisc,
        DriveStatus::NotReady,
        DriveStatus::DiscOk,
        DriveStatus::DiscOk,
        DriveStatus::DiscOk,
    ]);

    let ticks: Vec<_> = (0..5).map(|_| controller.tick(None)).collect();

    // The source should be loaded and played exactly once, on the transition.
    assert_eq!(controller.player.count(&PlayerCall::Load(DEFAULT_SOURCE.to_string())), 1);
    assert_eq!(controller.player.count(&PlayerCall::PlayAt(0)), 1);
    assert_eq!(ticks[2].action, Some(Action::Load));
    assert_eq!(ticks[3].action, None);
}

#[test]
fn test_tick_disc_present_at_startup() {

    // Given a disc already in the drive when the program starts,
    let mut controller = controller(&[DriveStatus::DiscOk]);

    let tick = controller.tick(None);

    // The first tick should load it.
    assert_eq!(tick.action, Some(Action::Load));
    assert_eq!(controller.player.calls[0], PlayerCall::Load("cdda://".to_string()));
    assert_eq!(controller.player.calls[1], PlayerCall::PlayAt(0));
}

#[test]
fn test_tick_load_locks_door() {

    // Given a disc that loads and plays without trouble,
    let mut controller = controller(&[DriveStatus::DiscOk]);

    controller.tick(None);

    // The door should be locked once, and stay locked while it plays.
    assert_eq!(controller.drive.commands, vec![DriveCommand::LockDoor]);
    controller.tick(None);
    assert_eq!(controller.drive.commands, vec![DriveCommand::LockDoor]);
}

#[test]
fn test_tick_reinsertion_loads_again() {

    let mut controller = controller(&[
        DriveStatus::DiscOk,
        DriveStatus::TrayOpen,
        DriveStatus::NoDisc,
        DriveStatus::DiscOk,
    ]);

    for _ in 0..4 {
        controller.tick(None);
    }

    assert_eq!(controller.player.count(&PlayerCall::PlayAt(0)), 2);
    assert_eq!(
        controller.drive.commands,
        vec![DriveCommand::LockDoor, DriveCommand::LockDoor]
    );
}

#[test]
fn test_tick_no_disc_statuses_pause() {

    // Given every status other than a readable disc,
    let statuses = [
        DriveStatus::NoInfo,
        DriveStatus::NoDisc,
        DriveStatus::TrayOpen,
        DriveStatus::NotReady,
        DriveStatus::Unknown(9),
    ];
    let mut controller = controller(&statuses);

    for status in statuses {
        let tick = controller.tick(None);
        assert_eq!(tick.drive_status, status);
        assert_eq!(tick.player_state, None);
    }

    // The player should only ever be held paused, and the drive left alone.
    assert_eq!(controller.player.count(&PlayerCall::SetPause(true)), statuses.len());
    assert!(controller.player.calls.iter().all(|c| *c == PlayerCall::SetPause(true)));
    assert!(controller.drive.commands.is_empty());
}

#[test]
fn test_tick_ended_ejects_once_per_episode() {

    // Given no disc, no disc, disc in, playing, then the player ends,
    let mut controller = controller(&[
        DriveStatus::NoDisc,
        DriveStatus::NoDisc,
        DriveStatus::DiscOk,
        DriveStatus::DiscOk,
        DriveStatus::DiscOk,
        DriveStatus::DiscOk,
        DriveStatus::DiscOk,
    ]);

    controller.tick(None);
    controller.tick(None);
    assert_eq!(controller.tick(None).action, Some(Action::Load));
    assert_eq!(controller.tick(None).action, None);

    controller.player.state = PlayerState::Ended;
    let tick = controller.tick(None);

    // Stop, unlock and eject should follow.
    assert_eq!(tick.player_state, Some(PlayerState::Ended));
    assert_eq!(tick.action, Some(Action::FinishedEject));
    assert_eq!(
        controller.drive.commands,
        vec![DriveCommand::LockDoor, DriveCommand::UnlockDoor, DriveCommand::Eject]
    );
    assert_eq!(controller.player.count(&PlayerCall::Stop), 1);

    // The drive failed to open its tray and the engine keeps reporting the
    // end: nothing further is sent.
    controller.player.state = PlayerState::Ended;
    controller.tick(None);
    controller.tick(None);

    assert_eq!(eject_sequence_count(&controller.drive), 1);
    assert_eq!(controller.player.count(&PlayerCall::Stop), 1);
}

#[test]
fn test_tick_new_error_episode_ejects_again() {

    let mut controller = controller(&[DriveStatus::DiscOk]);

    controller.tick(None);
    controller.player.state = PlayerState::Error;
    controller.tick(None);

    // Stop moved the player out of the error state, a fresh error is a new
    // episode.
    controller.tick(None);
    controller.player.state = PlayerState::Error;
    let tick = controller.tick(None);

    assert_eq!(tick.action, Some(Action::FinishedEject));
    assert_eq!(eject_sequence_count(&controller.drive), 2);
}

#[test]
fn test_tick_eject_button_while_playing() {

    // Given a disc that is playing normally,
    let mut controller = controller(&[DriveStatus::DiscOk]);

    controller.tick(None);
    let tick = controller.tick(Some(Button::Eject));

    // Eject should still stop, unlock and eject.
    assert_eq!(tick.action, Some(Action::Eject));
    assert_eq!(tick.player_state, Some(PlayerState::Playing));
    assert_eq!(controller.player.count(&PlayerCall::Stop), 1);
    assert_eq!(
        controller.drive.commands,
        vec![DriveCommand::LockDoor, DriveCommand::UnlockDoor, DriveCommand::Eject]
    );
}

#[test]
fn test_tick_eject_button_same_tick_as_finish() {

    // Given the player ends on the same tick Esc is pressed,
    let mut controller = controller(&[DriveStatus::DiscOk]);

    controller.tick(None);
    controller.player.state = PlayerState::Ended;
    let tick = controller.tick(Some(Button::Eject));

    // The sequence should be sent once and reported as the finished eject.
    assert_eq!(tick.action, Some(Action::FinishedEject));
    assert_eq!(eject_sequence_count(&controller.drive), 1);
    assert_eq!(controller.player.count(&PlayerCall::Stop), 1);
    assert_eq!(
        controller.drive.commands,
        vec![DriveCommand::LockDoor, DriveCommand::UnlockDoor, DriveCommand::Eject]
    );
}

#[test]
fn test_tick_eject_button_same_tick_as_failed_load() {

    // Given a disc that cannot be loaded and Esc pressed on the same tick,
    let mut controller = controller(&[DriveStatus::DiscOk]);
    controller.player.fail_load = true;

    let tick = controller.tick(Some(Button::Eject));

    // Only the recovery eject should go out.
    assert_eq!(tick.action, Some(Action::Load));
    assert_eq!(eject_sequence_count(&controller.drive), 1);
}

#[test]
fn test_tick_every_button_maps_to_action() {

    let cases = [
        (Button::PlayPause, Action::PlayPause, Some(PlayerCall::Pause)),
        (Button::Next, Action::Next, Some(PlayerCall::Next)),
        (Button::Previous, Action::Previous, Some(PlayerCall::Previous)),
        (Button::Eject, Action::Eject, Some(PlayerCall::Stop)),
        (Button::Quit, Action::Quit, None),
    ];

    for (button, action, call) in cases {
        let mut controller = controller(&[DriveStatus::DiscOk]);
        controller.tick(None);
        let before = controller.player.calls.len();

        let tick = controller.tick(Some(button));

        assert_eq!(tick.action, Some(action));
        let new_calls = &controller.player.calls[before..];
        match call {
            Some(call) => assert_eq!(new_calls, &[call]),
            None => assert!(new_calls.is_empty()),
        }
    }
}

#[test]
fn test_tick_no_button_does_nothing() {

    let mut controller = controller(&[DriveStatus::DiscOk]);
    controller.tick(None);
    let before = controller.player.calls.len();

    let tick = controller.tick(None);

    assert_eq!(tick.action, None);
    assert_eq!(controller.player.calls.len(), before);
    assert_eq!(controller.drive.commands, vec![DriveCommand::LockDoor]);
}

#[test]
fn test_tick_buttons_without_disc_discarded() {

    // Given an empty drive, only quit should get through.
    let mut controller = controller(&[DriveStatus::NoDisc]);

    assert_eq!(controller.tick(Some(Button::Next)).action, None);
    assert_eq!(controller.tick(Some(Button::Eject)).action, None);
    assert_eq!(controller.tick(Some(Button::Quit)).action, Some(Action::Quit));

    assert!(controller.drive.commands.is_empty());
    assert_eq!(controller.player.count(&PlayerCall::Next), 0);
}

#[test]
fn test_tick_failed_load_ejects() {

    // Given a player that cannot create media for the source,
    let mut controller = controller(&[DriveStatus::DiscOk]);
    controller.player.fail_load = true;
    controller.player.state = PlayerState::Error;

    let tick = controller.tick(None);

    // The door should never be locked and the disc should come back out.
    assert_eq!(tick.action, Some(Action::Load));
    assert_eq!(controller.player.count(&PlayerCall::PlayAt(0)), 0);
    assert_eq!(
        controller.drive.commands,
        vec![DriveCommand::UnlockDoor, DriveCommand::Eject]
    );
}

#[test]
fn test_tick_failed_status_query_reads_no_info() {

    let mut controller = controller(&[DriveStatus::DiscOk]);
    controller.tick(None);
    controller.drive.push_failure();

    let tick = controller.tick(None);

    assert_eq!(tick.drive_status, DriveStatus::NoInfo);
    assert_eq!(controller.player.count(&PlayerCall::SetPause(true)), 1);
}

#[test]
fn test_tick_recovery_after_failed_query_reloads() {

    // Given a disc whose drive stops answering for one tick,
    let mut controller = controller(&[DriveStatus::DiscOk]);
    controller.tick(None);
    controller.drive.push_failure();
    controller.drive.statuses.push_back(Some(DriveStatus::DiscOk));

    controller.tick(None);
    let tick = controller.tick(None);

    // Its return counts as a fresh insertion.
    assert_eq!(tick.action, Some(Action::Load));
    assert_eq!(controller.player.count(&PlayerCall::PlayAt(0)), 2);
}

#[test]
fn test_shutdown_ejects_present_disc() {

    let mut controller = controller(&[DriveStatus::DiscOk]);
    controller.tick(None);

    controller.shutdown(true);

    assert_eq!(controller.player.calls.last(), Some(&PlayerCall::Stop));
    assert_eq!(
        controller.drive.commands,
        vec![DriveCommand::LockDoor, DriveCommand::UnlockDoor, DriveCommand::Eject]
    );
}

#[test]
fn test_shutdown_keep_disc() {

    let mut controller = controller(&[DriveStatus::DiscOk]);
    controller.tick(None);

    controller.shutdown(false);

    assert_eq!(
        controller.drive.commands,
        vec![DriveCommand::LockDoor, DriveCommand::UnlockDoor]
    );
}

#[test]
fn test_shutdown_without_disc() {

    // Given an open tray at exit, the door is unlocked but nothing ejected.
    let mut controller = controller(&[DriveStatus::TrayOpen]);
    controller.tick(None);

    controller.shutdown(true);

    let (drive, player) = controller.into_parts();
    assert_eq!(drive.commands, vec![DriveCommand::UnlockDoor]);
    assert_eq!(player.calls.last(), Some(&PlayerCall::Stop));
}
