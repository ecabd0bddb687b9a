// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Emulator hardware emulation configuration and preferences.

/// The hardware model being emulated.
///
/// Only the original DMG is in scope here; GBC/SGB/GBP are out of scope
/// (`spec.md` §1 Non-goals). The enum is kept (rather than dropped in favor
/// of a unit struct) because `Config` is the seam the CLI glue described in
/// `spec.md` §6 plugs into, and a closed set of one documents the boundary
/// instead of silently pretending there's nothing to select.
pub enum HardwareModel {
	/// Original Game Boy (Sharp LR35902), the only model this core runs.
	Dmg,
}

/// Emulation settings and preferences.
pub struct Config {
	/// The model of the emulated machine.
	pub model: HardwareModel,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			model: HardwareModel::Dmg,
		}
	}
}
