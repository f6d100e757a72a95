// SPDX-License-Identifier: GPL-3.0
// main.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

// This file is the core of the basic client - a terminal program that watches
// one optical drive, plays audio discs as they go in and ejects them when they
// finish. Space toggles pause, the arrow keys skip, Esc ejects and q quits.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use cdplayer_core::{
    cdrom_drive::{CdromDrive, linux_cdrom_drive::LinuxCdromDrive},
    control::{Action, Controller, DEFAULT_SOURCE},
    media_player::MediaListPlayer,
    status_line::render_status_line,
};
use cdplayer_vlc::VlcMediaListPlayer;

mod logging;
mod terminal;

use logging::init_logging;
use terminal::Terminal;

#[derive(Parser)]
#[command(
    version,
    about = "A basic terminal audio CD player driven by drive status",
    long_about = None
)]
struct CdPlayerArgs {
    #[arg(
        long = "device",
        help = "The optical drive device node",
        default_value = "/dev/sr0",
        value_name = "PATH"
    )]
    device: PathBuf,

    #[arg(
        long = "source",
        help = "The media location loaded when a disc is inserted",
        default_value = DEFAULT_SOURCE,
        value_name = "MRL"
    )]
    source: String,

    #[arg(
        long = "poll-interval-ms",
        help = "Longest wait between two drive status checks",
        default_value_t = 100
    )]
    poll_interval_ms: u64,

    #[arg(
        long = "escape-timeout-ms",
        help = "How long a lone Esc is held back before it ejects",
        default_value_t = 50
    )]
    escape_timeout_ms: u64,

    #[arg(
        long = "keep-disc",
        help = "Leave the disc in the drive on quit"
    )]
    keep_disc: bool,

    #[arg(
        long = "engine-arg",
        help = "An argument passed through to libVLC, may be repeated",
        allow_hyphen_values = true,
        value_name = "ARG"
    )]
    engine_args: Vec<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Log more detail, may be repeated",
        action = ArgAction::Count
    )]
    verbose: u8,
}

fn main() -> Result<()> {

    let args = CdPlayerArgs::parse();
    init_logging(args.verbose);

    run(&args)
}

/// Builds the components, runs the loop until asked to stop and then tears
/// everything down: playback stopped, door unlocked, disc ejected unless
/// kept, terminal restored and finally the engine released.
fn run(args: &CdPlayerArgs) -> Result<()> {

    let drive = LinuxCdromDrive::new(&args.device);
    drive.check_access()
        .with_context(|| format!("cannot use drive {}", args.device.display()))?;

    let player = VlcMediaListPlayer::new(&args.engine_args)
        .context("could not start the playback engine")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("could not install the signal handler")?;

    log::info!("watching {}", args.device.display());
    let mut controller = Controller::new(drive, player, args.source.clone());

    let mut terminal = Terminal::new(Duration::from_millis(args.escape_timeout_ms))
        .context("could not put the terminal in raw mode")?;

    let result = control_loop(
        &mut controller,
        &mut terminal,
        &running,
        Duration::from_millis(args.poll_interval_ms)
    );

    controller.shutdown(!args.keep_disc);
    drop(terminal);

    let (_drive, mut player) = controller.into_parts();
    player.teardown();

    result
}

/// Polls the drive and the keyboard until quit is pressed or a termination
/// signal arrives. Each iteration waits at most `poll_interval` for a key.
fn control_loop<D: CdromDrive, P: MediaListPlayer>(
    controller: &mut Controller<D, P>,
    terminal: &mut Terminal,
    running: &AtomicBool,
    poll_interval: Duration
) -> Result<()> {

    let mut note = "";
    while running.load(Ordering::SeqCst) {

        let button = terminal.next_button(poll_interval)
            .context("could not read the keyboard")?;
        let tick = controller.tick(button);

        if let Some(action) = tick.action {
            note = action.as_text();
        }
        terminal.draw_status_line(&render_status_line(tick.drive_status, tick.player_state, note))
            .context("could not draw the status line")?;

        if tick.action == Some(Action::Quit) {
            return Ok(());
        }
    }

    log::info!("termination signal received");
    Ok(())
}
