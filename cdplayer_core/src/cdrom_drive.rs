// SPDX-License-Identifier: GPL-3.0
// cdrom_drive.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    io,
    path::PathBuf,
};

use thiserror::Error;

/// This module contains the default drive implementation, talking to the
/// kernel CD-ROM driver via ioctl calls. There may be others in future.
#[cfg(target_os = "linux")]
pub mod linux_cdrom_drive;

/// This trait provides an implementation-opaque way of calling optical drive
/// methods from elsewhere in the system.
pub trait CdromDrive {

    /// Implementations must query the drive and return the current status of
    /// the physical media.
    fn drive_status(&mut self) -> Result<DriveStatus, DriveError>;

    /// Implementations must send the supplied command to the drive, returning
    /// the raw result code of the underlying call.
    fn send_command(&mut self, command: DriveCommand) -> Result<i32, DriveError>;
}

/// This enum represents the physical media status reported by the drive.
/// Raw codes match the CDS_* values of the kernel CD-ROM driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriveStatus {
    NoInfo,
    NoDisc,
    TrayOpen,
    NotReady,
    DiscOk,
    Unknown(i32),
}

impl DriveStatus {

    /// Converts a raw status code into a drive status. Codes outside the
    /// known range are kept as `Unknown`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => DriveStatus::NoInfo,
            1 => DriveStatus::NoDisc,
            2 => DriveStatus::TrayOpen,
            3 => DriveStatus::NotReady,
            4 => DriveStatus::DiscOk,
            other => DriveStatus::Unknown(other),
        }
    }

    /// Returns the human readable text for this status.
    pub fn as_text(&self) -> &'static str {
        match self {
            DriveStatus::NoInfo => "No info.",
            DriveStatus::NoDisc => "No disc.",
            DriveStatus::TrayOpen => "Tray open.",
            DriveStatus::NotReady => "Drive not ready.",
            DriveStatus::DiscOk => "Disk OK.",
            DriveStatus::Unknown(_) => "Unknown status.",
        }
    }
}

/// This enum represents the commands that can be sent to the drive's tray
/// mechanism.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriveCommand {
    LockDoor,
    UnlockDoor,
    Eject,
}

impl DriveCommand {

    /// Returns a short name for the command, used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            DriveCommand::LockDoor => "lock door",
            DriveCommand::UnlockDoor => "unlock door",
            DriveCommand::Eject => "eject",
        }
    }
}

/// Errors raised while talking to the drive.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("failed to open {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} request on {} failed: {}", .request, .path.display(), .source)]
    Ioctl {
        path: PathBuf,
        request: &'static str,
        #[source]
        source: io::Error,
    },
}
