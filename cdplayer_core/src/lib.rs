// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// Crate-wide lines to disable specific lints:

// Components are constructed explicitly with the state they need, so there
// will be no derived Default implementations unless needed.
#![allow(clippy::new_without_default)]

/// This module contains optical drive related functionality.
pub mod cdrom_drive;

/// This module contains media playback engine related functionality.
pub mod media_player;

/// This module contains keyboard button related functionality.
pub mod buttons;

/// This module contains the status line shown while the player runs.
pub mod status_line;

/// This module contains the control loop state machine tying the drive,
/// the player and the buttons together.
pub mod control;
