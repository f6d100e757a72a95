// SPDX-License-Identifier: GPL-3.0
// status_line.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use crate::{
    cdrom_drive::DriveStatus,
    media_player::PlayerState,
};

/// Width of each status line field in columns.
pub const FIELD_WIDTH: usize = 20;

/// Renders the three fixed-width status line fields: the drive status text,
/// the numeric player state (blank when it was not read) and a free-form
/// note, normally the last action taken.
pub fn render_status_line(
    drive_status: DriveStatus,
    player_state: Option<PlayerState>,
    note: &str
) -> String {

    let state = player_state
        .map(|state| state.code().to_string())
        .unwrap_or_default();

    format!(
        "{:<width$}{:<width$}{:<width$}",
        drive_status.as_text(),
        state,
        note,
        width = FIELD_WIDTH
    )
}
