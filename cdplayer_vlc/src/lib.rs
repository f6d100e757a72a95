// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// This crate drives libVLC's media list player on behalf of the core crate.
// Only the handful of libVLC 3.x calls actually needed are declared.

use std::{
    ffi::CString,
    ptr,
};

use libc::{c_char, c_int};

use cdplayer_core::media_player::{MediaListPlayer, PlayerError, PlayerState};

/// This module contains the raw libVLC declarations.
mod ffi {

    #![allow(non_camel_case_types)]

    use libc::{c_char, c_int};

    #[repr(C)]
    pub struct libvlc_instance_t {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct libvlc_media_t {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct libvlc_media_list_t {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct libvlc_media_player_t {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct libvlc_media_list_player_t {
        _private: [u8; 0],
    }

    unsafe extern "C" {
        pub fn libvlc_new(argc: c_int, argv: *const *const c_char) -> *mut libvlc_instance_t;
        pub fn libvlc_release(instance: *mut libvlc_instance_t);

        pub fn libvlc_media_new_location(
            instance: *mut libvlc_instance_t,
            mrl: *const c_char
        ) -> *mut libvlc_media_t;
        pub fn libvlc_media_release(media: *mut libvlc_media_t);

        pub fn libvlc_media_list_new(instance: *mut libvlc_instance_t) -> *mut libvlc_media_list_t;
        pub fn libvlc_media_list_release(list: *mut libvlc_media_list_t);
        pub fn libvlc_media_list_lock(list: *mut libvlc_media_list_t);
        pub fn libvlc_media_list_unlock(list: *mut libvlc_media_list_t);
        pub fn libvlc_media_list_add_media(
            list: *mut libvlc_media_list_t,
            media: *mut libvlc_media_t
        ) -> c_int;

        pub fn libvlc_media_player_new(instance: *mut libvlc_instance_t) -> *mut libvlc_media_player_t;
        pub fn libvlc_media_player_release(player: *mut libvlc_media_player_t);

        pub fn libvlc_media_list_player_new(
            instance: *mut libvlc_instance_t
        ) -> *mut libvlc_media_list_player_t;
        pub fn libvlc_media_list_player_release(list_player: *mut libvlc_media_list_player_t);
        pub fn libvlc_media_list_player_set_media_player(
            list_player: *mut libvlc_media_list_player_t,
            player: *mut libvlc_media_player_t
        );
        pub fn libvlc_media_list_player_set_media_list(
            list_player: *mut libvlc_media_list_player_t,
            list: *mut libvlc_media_list_t
        );
        pub fn libvlc_media_list_player_play_item_at_index(
            list_player: *mut libvlc_media_list_player_t,
            index: c_int
        ) -> c_int;
        pub fn libvlc_media_list_player_pause(list_player: *mut libvlc_media_list_player_t);
        pub fn libvlc_media_list_player_set_pause(
            list_player: *mut libvlc_media_list_player_t,
            do_pause: c_int
        );
        pub fn libvlc_media_list_player_stop(list_player: *mut libvlc_media_list_player_t);
        pub fn libvlc_media_list_player_next(list_player: *mut libvlc_media_list_player_t) -> c_int;
        pub fn libvlc_media_list_player_previous(
            list_player: *mut libvlc_media_list_player_t
        ) -> c_int;
        pub fn libvlc_media_list_player_get_state(
            list_player: *mut libvlc_media_list_player_t
        ) -> c_int;
    }
}

/// This struct owns a libVLC instance together with a media player, a media
/// list and the list player binding them. All handles are created by `new`
/// and released by `teardown`, which also runs on drop.
pub struct VlcMediaListPlayer {

    // Engine handles, null once torn down.
    instance: *mut ffi::libvlc_instance_t,
    player: *mut ffi::libvlc_media_player_t,
    list: *mut ffi::libvlc_media_list_t,
    list_player: *mut ffi::libvlc_media_list_player_t,
}

/// Implementation functions for the libVLC player itself.
impl VlcMediaListPlayer {

    /// Starts the engine with the supplied arguments and builds the list
    /// player.
    pub fn new(args: &[String]) -> Result<Self, PlayerError> {

        let c_args = args
            .iter()
            .map(|arg| CString::new(arg.as_str()).map_err(|_| PlayerError::EngineInit))
            .collect::<Result<Vec<_>, _>>()?;
        let argv: Vec<*const c_char> = c_args.iter().map(|arg| arg.as_ptr()).collect();

        let instance = unsafe { ffi::libvlc_new(argv.len() as c_int, argv.as_ptr()) };
        if instance.is_null() {
            return Err(PlayerError::EngineInit);
        }

        // From here on, drop cleans up whatever was created.
        let mut vlc = VlcMediaListPlayer {
            instance,
            player: ptr::null_mut(),
            list: ptr::null_mut(),
            list_player: ptr::null_mut(),
        };

        unsafe {
            vlc.player = ffi::libvlc_media_player_new(instance);
            vlc.list = ffi::libvlc_media_list_new(instance);
            vlc.list_player = ffi::libvlc_media_list_player_new(instance);
        }
        if vlc.player.is_null() || vlc.list.is_null() || vlc.list_player.is_null() {
            return Err(PlayerError::EngineInit);
        }

        unsafe { ffi::libvlc_media_list_player_set_media_player(vlc.list_player, vlc.player) };
        log::debug!("libVLC media list player ready");

        Ok(vlc)
    }

    /// Releases the list player, the list, the player and the engine, in that
    /// order. Calling this more than once is harmless.
    pub fn teardown(&mut self) {

        unsafe {
            if !self.list_player.is_null() {
                ffi::libvlc_media_list_player_release(self.list_player);
                self.list_player = ptr::null_mut();
            }
            if !self.list.is_null() {
                ffi::libvlc_media_list_release(self.list);
                self.list = ptr::null_mut();
            }
            if !self.player.is_null() {
                ffi::libvlc_media_player_release(self.player);
                self.player = ptr::null_mut();
            }
            if !self.instance.is_null() {
                ffi::libvlc_release(self.instance);
                self.instance = ptr::null_mut();
                log::debug!("libVLC released");
            }
        }
    }

    /// Returns true while the engine handles are alive.
    fn is_live(&self) -> bool {
        !self.list_player.is_null()
    }
}

/// Implementation functions to be called from anything that understands what
/// a MediaListPlayer object is.
impl MediaListPlayer for VlcMediaListPlayer {

    /// Appends a media item for the location and rebinds the list. The item
    /// handle is released once the list holds its own reference.
    fn load(&mut self, location: &str) -> Result<(), PlayerError> {

        if !self.is_live() {
            return Err(PlayerError::EngineInit);
        }

        let mrl = CString::new(location)
            .map_err(|_| PlayerError::InvalidLocation(location.to_string()))?;

        unsafe {
            let media = ffi::libvlc_media_new_location(self.instance, mrl.as_ptr());
            if media.is_null() {
                return Err(PlayerError::MediaCreation(location.to_string()));
            }

            ffi::libvlc_media_list_lock(self.list);
            let added = ffi::libvlc_media_list_add_media(self.list, media);
            ffi::libvlc_media_list_unlock(self.list);
            ffi::libvlc_media_release(media);
            if added != 0 {
                return Err(PlayerError::MediaCreation(location.to_string()));
            }

            ffi::libvlc_media_list_player_set_media_list(self.list_player, self.list);
        }

        Ok(())
    }

    /// Plays the list item at the supplied index.
    fn play_at(&mut self, index: usize) -> Result<(), PlayerError> {

        let c_index = c_int::try_from(index).map_err(|_| PlayerError::NoSuchItem(index))?;
        if !self.is_live() {
            return Err(PlayerError::NoSuchItem(index));
        }

        let result = unsafe {
            ffi::libvlc_media_list_player_play_item_at_index(self.list_player, c_index)
        };
        if result != 0 {
            return Err(PlayerError::NoSuchItem(index));
        }

        Ok(())
    }

    /// Toggles pause.
    fn pause(&mut self) {

        if self.is_live() {
            unsafe { ffi::libvlc_media_list_player_pause(self.list_player) };
        }
    }

    /// Forces the paused state.
    fn set_pause(&mut self, paused: bool) {

        if self.is_live() {
            unsafe { ffi::libvlc_media_list_player_set_pause(self.list_player, paused as c_int) };
        }
    }

    /// Stops playback.
    fn stop(&mut self) {

        if self.is_live() {
            unsafe { ffi::libvlc_media_list_player_stop(self.list_player) };
        }
    }

    /// Skips to the next list item.
    fn next(&mut self) -> Result<(), PlayerError> {

        if !self.is_live() || unsafe { ffi::libvlc_media_list_player_next(self.list_player) } != 0 {
            return Err(PlayerError::NoAdjacentItem("next"));
        }

        Ok(())
    }

    /// Skips to the previous list item.
    fn previous(&mut self) -> Result<(), PlayerError> {

        if !self.is_live() || unsafe { ffi::libvlc_media_list_player_previous(self.list_player) } != 0 {
            return Err(PlayerError::NoAdjacentItem("previous"));
        }

        Ok(())
    }

    /// Reads the engine state.
    fn state(&self) -> PlayerState {

        if !self.is_live() {
            return PlayerState::NothingSpecial;
        }

        PlayerState::from_code(unsafe { ffi::libvlc_media_list_player_get_state(self.list_player) })
    }
}

impl Drop for VlcMediaListPlayer {

    fn drop(&mut self) {
        self.teardown();
    }
}
