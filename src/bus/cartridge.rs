// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The cartridge controller (C1) - ROM-only mapper for loading and
//! servicing bus access to the game's cartridge image.
//!
//! Banked controllers (MBC1/2/3/5) are an explicit Non-goal (`spec.md`
//! §1); this mapper exposes the whole 0x0000-0x7FFF range as a direct
//! index into the ROM image and drops every write.

use std::fs;
use std::path::Path;

use crate::error::EmuError;

/// Header fields parsed from offsets 0x0100-0x014F of the ROM image, per
/// `original_source/include/cart.h`'s `ROMHeader_t`. `spec.md` §4.2 only
/// requires the checksum to be validated; the rest is parsed because it's
/// present in every ROM regardless and is useful to report (e.g. by the
/// CLI glue described in `spec.md` §6).
#[derive(Clone)]
pub struct RomHeader {
	/// The four bytes at 0x0100-0x0103: the entry point, almost always a
	/// `NOP` followed by a `JP` past the header.
	pub entry: [u8; 4],
	/// The Nintendo logo bitmap at 0x0104-0x0133. Not validated here (that
	/// is the boot ROM's job on real hardware); kept for display.
	pub logo: [u8; 0x30],
	/// ASCII game title, NUL-padded to 16 bytes in the source ROM.
	pub title: [u8; 16],
	/// New-style licensee code (used when `old_licensee_code == 0x33`).
	pub new_licensee_code: u16,
	/// Whether the cartridge declares Super Game Boy support.
	pub sgb_flag: u8,
	/// Cartridge type byte (0x00 = ROM only; see Game Boy CPU Manual).
	pub cartridge_type: u8,
	/// ROM size code; actual size is `32 KiB << rom_size`.
	pub rom_size: u8,
	/// RAM size code.
	pub ram_size: u8,
	/// Destination code (0 = Japan, 1 = non-Japan).
	pub destination_code: u8,
	/// Old-style licensee code; 0x33 means the new code applies instead.
	pub old_licensee_code: u8,
	/// Mask ROM version number.
	pub version: u8,
	/// Header checksum at 0x014D. Validated by [`Cartridge::new`].
	pub checksum: u8,
	/// Checksum of the whole ROM (big-endian), excluding these two bytes.
	/// Not validated, matching the original implementation.
	pub global_checksum: u16,
}

impl RomHeader {
	fn parse(rom: &[u8]) -> Self {
		let mut entry = [0u8; 4];
		entry.copy_from_slice(&rom[0x0100..0x0104]);

		let mut logo = [0u8; 0x30];
		logo.copy_from_slice(&rom[0x0104..0x0134]);

		let mut title = [0u8; 16];
		let title_len = usize::min(16, rom.len().saturating_sub(0x0134));
		title[..title_len].copy_from_slice(&rom[0x0134..0x0134 + title_len]);

		RomHeader {
			entry,
			logo,
			title,
			new_licensee_code: u16::from_be_bytes([rom[0x0144], rom[0x0145]]),
			sgb_flag: rom[0x0146],
			cartridge_type: rom[0x0147],
			rom_size: rom[0x0148],
			ram_size: rom[0x0149],
			destination_code: rom[0x014A],
			old_licensee_code: rom[0x014B],
			version: rom[0x014C],
			checksum: rom[0x014D],
			global_checksum: u16::from_be_bytes([rom[0x014E], rom[0x014F]]),
		}
	}

	/// The game title as a `&str`, trimmed at the first NUL byte.
	pub fn title_str(&self) -> &str {
		let end = self.title.iter().position(|&b| b == 0).unwrap_or(self.title.len());
		core::str::from_utf8(&self.title[..end]).unwrap_or("")
	}
}

/// Computes the header checksum algorithm from `spec.md` §4.2:
/// `x = 0; for i in 0x134..=0x14C: x = x - rom[i] - 1`. The header is
/// valid iff `x & 0xFF != 0`.
///
/// Note this deliberately never reads `rom[0x014D]` (the stored checksum
/// byte) itself — per `spec.md` §4.2 the pass condition is solely a
/// property of the computed running value, not an equality check against
/// the stored byte the way the real boot ROM's lockup check works. The
/// stored byte is still parsed into `RomHeader::checksum` for display.
fn header_checksum(rom: &[u8]) -> u8 {
	let mut x: u8 = 0;
	for &byte in &rom[0x0134..=0x014C] {
		x = x.wrapping_sub(byte).wrapping_sub(1);
	}
	x
}

/// The game's cartridge. ROM-only: the whole 32 KiB (or larger, though
/// only the first two banks are addressable without a mapper) image is
/// held in memory and indexed directly.
pub struct Cartridge {
	data: Vec<u8>,
	header: RomHeader,
}

impl Cartridge {
	/// Load a ROM image from `path`, parse its header and validate the
	/// header checksum.
	///
	/// Returns [`EmuError::RomLoad`] if the file can't be read, is too
	/// short to contain a header, or fails the checksum.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, EmuError> {
		let data = fs::read(path).map_err(|_| EmuError::RomLoad("failed to read ROM file"))?;
		Self::from_bytes(data)
	}

	/// Build a cartridge directly from an in-memory ROM image (used by
	/// tests and by hosts that already have the bytes).
	pub fn from_bytes(data: Vec<u8>) -> Result<Self, EmuError> {
		if data.len() < 0x0150 {
			return Err(EmuError::RomLoad("ROM is too short to contain a header"));
		}

		let header = RomHeader::parse(&data);
		if header_checksum(&data) & 0xFF == 0 {
			return Err(EmuError::RomLoad("header checksum validation failed"));
		}

		log::debug!(
			"loaded cartridge \"{}\" (type 0x{:02x}, rom_size code 0x{:02x})",
			header.title_str(),
			header.cartridge_type,
			header.rom_size
		);

		Ok(Cartridge { data, header })
	}

	/// The parsed ROM header.
	pub fn header(&self) -> &RomHeader {
		&self.header
	}

	/// The game title, trimmed at the first NUL byte.
	pub fn title(&self) -> &str {
		self.header.title_str()
	}

	/// Read a byte from the cartridge's ROM area (0x0000-0x7FFF). Reads
	/// past the end of the image (an undersized ROM image) return 0,
	/// consistent with the bus's general "out-of-stub reads return 0"
	/// contract (`spec.md` §4.1).
	pub fn read(&self, address: u16) -> u8 {
		self.data.get(address as usize).copied().unwrap_or(0)
	}

	/// Cartridge RAM reads (0xA000-0xBFFF). No RAM chip is modeled for a
	/// ROM-only cartridge, so this always reads 0.
	pub fn read_ram(&self, _address: u16) -> u8 {
		0
	}

	/// Writes anywhere in the cartridge-mapped range are mapper-bank
	/// selects on a real MBC cartridge; with no mapper implemented this
	/// mapper treats every write (ROM area or cartridge RAM) as a no-op.
	pub fn write(&mut self, _address: u16, _value: u8) {}
}
