// SPDX-License-Identifier: GPL-3.0
// linux_cdrom_drive.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    fs::{File, OpenOptions},
    io::Error,
    os::{
        fd::AsRawFd,
        unix::fs::OpenOptionsExt,
    },
    path::PathBuf,
};

use libc::c_int;

use super::{CdromDrive, DriveCommand, DriveError, DriveStatus};

// Request numbers from linux/cdrom.h.
const CDROMEJECT: u64 = 0x5309;
const CDROM_DRIVE_STATUS: u64 = 0x5326;
const CDROM_LOCKDOOR: u64 = 0x5329;

// Slot selector for drives without a changer.
const CDSL_NONE: c_int = c_int::MAX - 1;

/// This struct models an optical drive exposed by the kernel as a block
/// device node. The node is opened for each request and closed again when
/// the request completes, so tray operations from other programs are never
/// blocked by a handle held here.
pub struct LinuxCdromDrive {

    // Path to the device node, e.g. /dev/sr0.
    path: PathBuf,
}

/// Implementation functions for the Linux drive itself.
impl LinuxCdromDrive {

    /// Creates a new drive object for the supplied device node.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LinuxCdromDrive {
            path: path.into(),
        }
    }

    /// Checks that the device node can be opened at all.
    pub fn check_access(&self) -> Result<(), DriveError> {
        self.open_device().map(drop)
    }

    /// Opens the device read-only and non-blocking, so a drive without media
    /// can still be queried.
    fn open_device(&self) -> Result<File, DriveError> {
        OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&self.path)
            .map_err(|source| DriveError::Open {
                path: self.path.clone(),
                source,
            })
    }

    /// Issues a single ioctl on a freshly opened handle. The handle is
    /// dropped, and therefore closed, whether or not the call succeeds.
    fn ioctl(&self, request: u64, name: &'static str, arg: c_int) -> Result<i32, DriveError> {

        let device = self.open_device()?;
        let result = unsafe { libc::ioctl(device.as_raw_fd(), request as _, arg) };
        if result < 0 {
            return Err(DriveError::Ioctl {
                path: self.path.clone(),
                request: name,
                source: Error::last_os_error(),
            });
        }

        Ok(result)
    }
}

/// Implementation functions to be called from anything that understands what
/// a CdromDrive object is.
impl CdromDrive for LinuxCdromDrive {

    /// Queries the drive status.
    fn drive_status(&mut self) -> Result<DriveStatus, DriveError> {

        let raw = self.ioctl(CDROM_DRIVE_STATUS, "drive status", CDSL_NONE)?;
        Ok(DriveStatus::from_raw(raw))
    }

    /// Sends a tray command to the drive.
    fn send_command(&mut self, command: DriveCommand) -> Result<i32, DriveError> {

        let (request, arg) = match command {
            DriveCommand::LockDoor => (CDROM_LOCKDOOR, 1),
            DriveCommand::UnlockDoor => (CDROM_LOCKDOOR, 0),
            DriveCommand::Eject => (CDROMEJECT, 0),
        };

        log::trace!("sending {} to {}", command.name(), self.path.display());
        self.ioctl(request, command.name(), arg)
    }
}
