// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Cycle-accurate core emulation of the Sharp LR35902 (the Game Boy DMG's
//! CPU), its address bus and a ROM-only cartridge mapper, as described in
//! the publicly available "Game Boy CPU Manual".
//!
//! The PPU, APU, timer, joypad, banked mappers and GBC features are out of
//! scope: this crate emulates exactly enough hardware to execute CPU
//! instructions, service interrupts and snoop the serial port for debug
//! text, the way early test ROMs use it.

pub mod bus;
pub mod config;
pub mod cpu;
pub mod emulator;
pub mod error;
pub mod host;

pub use config::Config;
pub use cpu::Cpu;
pub use emulator::Emulator;
pub use error::EmuError;
