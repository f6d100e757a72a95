// SPDX-License-Identifier: GPL-3.0
// build.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

fn main() {
    println!("cargo:rustc-link-lib=vlc");
}
