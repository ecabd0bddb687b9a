// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The address-space map from `spec.md` §3, as `MemoryRange` constants
//! consumed by the `memory_range!`/`range_start!`/`range_end!`/`range_size!`
//! macros in [`super::memory_range`].

use super::memory_range::MemoryRange;
use crate::make_range;

/// ROM bank 0, fixed (0x0000-0x3FFF).
pub const MMAP_ROM_BANK0: MemoryRange = make_range!(0x0000, 0x3FFF);
/// ROM bank 1-N, switchable on a mapper; fixed to bank 1 here (0x4000-0x7FFF).
pub const MMAP_ROM_BANKN: MemoryRange = make_range!(0x4000, 0x7FFF);
/// Video RAM (0x8000-0x9FFF). Stubbed: the PPU is a Non-goal.
pub const MMAP_VRAM: MemoryRange = make_range!(0x8000, 0x9FFF);
/// Cartridge RAM (0xA000-0xBFFF). Always reads 0 with no mapper RAM chip.
pub const MMAP_CART_RAM: MemoryRange = make_range!(0xA000, 0xBFFF);
/// Internal work RAM (0xC000-0xDFFF).
pub const MMAP_RAM_INTERNAL: MemoryRange = make_range!(0xC000, 0xDFFF);
/// Echo RAM (0xE000-0xFDFF), mirrors [`MMAP_RAM_INTERNAL`].
pub const MMAP_RAM_ECHO: MemoryRange = make_range!(0xE000, 0xFDFF);
/// Object attribute memory (0xFE00-0xFE9F). Stubbed: the PPU is a Non-goal.
pub const MMAP_OAM: MemoryRange = make_range!(0xFE00, 0xFE9F);
/// Unusable range (0xFEA0-0xFEFF). Reads as 0, writes dropped.
pub const MMAP_UNUSABLE: MemoryRange = make_range!(0xFEA0, 0xFEFF);
/// I/O register file (0xFF00-0xFF7F). Only the serial port is live.
pub const MMAP_IO: MemoryRange = make_range!(0xFF00, 0xFF7F);
/// High RAM (0xFF80-0xFFFE).
pub const MMAP_RAM_HIGH: MemoryRange = make_range!(0xFF80, 0xFFFE);
/// Interrupt enable register (0xFFFF), a single byte.
pub const MMAP_IE: MemoryRange = make_range!(0xFFFF, 0xFFFF);
