// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The emulation library's front-end API (C12): wires a [`Cpu`] to a
//! host and tracks wall-clock-independent cycle accounting.

use crate::bus::cartridge::Cartridge;
use crate::bus::SystemBus;
use crate::config::Config;
use crate::cpu::Cpu;
use crate::error::EmuError;
use crate::host::{Event, HostHooks};

/// T-states per m-cycle, fixed by the hardware.
const T_STATES_PER_M_CYCLE: u64 = 4;

/// The DMG's clock speed, in T-states per second.
const CLOCK_HZ: u64 = 4_194_304;

/// The complete emulator: a CPU plus the cycle accountant driving it.
pub struct Emulator {
	/// The Game Boy's processor.
	pub cpu: Cpu,
	/// The emulator's configuration.
	pub config: Config,
	/// Total T-states elapsed since power-on.
	t_states: u64,
}

impl Emulator {
	/// Build an emulator around an already-loaded cartridge.
	pub fn new(config: Config, cartridge: Cartridge) -> Self {
		let bus = SystemBus::new(cartridge);
		Emulator { cpu: Cpu::new(bus), config, t_states: 0 }
	}

	/// Load a ROM from disk and build an emulator for it.
	pub fn from_rom_path(config: Config, path: impl AsRef<std::path::Path>) -> Result<Self, EmuError> {
		let cartridge = Cartridge::load(path)?;
		Ok(Self::new(config, cartridge))
	}

	/// Total T-states elapsed since power-on. Four T-states per m-cycle,
	/// per the Game Boy CPU Manual's definition of a machine cycle.
	pub fn t_states(&self) -> u64 {
		self.t_states
	}

	/// Run a single CPU step, reporting any host-visible events produced
	/// along the way, and return the number of m-cycles it took.
	pub fn step(&mut self, host: &mut impl HostHooks) -> Result<u32, EmuError> {
		let before = self.cpu.bus.serial_capture().len();
		let m_cycles = self.cpu.step()?;
		self.t_states += m_cycles as u64 * T_STATES_PER_M_CYCLE;

		let capture = self.cpu.bus.serial_capture();
		if capture.len() > before {
			for &byte in &capture[before..] {
				host.on_event(Event::SerialByte(byte));
			}
		}

		Ok(m_cycles)
	}

	/// Run until the host asks to quit or a step errors. Paces the host via
	/// [`HostHooks::sleep`] with the wall-clock duration each step's
	/// m-cycles represent, at the DMG's fixed clock speed.
	pub fn run(&mut self, host: &mut impl HostHooks) -> Result<(), EmuError> {
		while !host.quit_requested() {
			let m_cycles = self.step(host)?;
			let t_states = m_cycles as u64 * T_STATES_PER_M_CYCLE;
			let ms = t_states * 1000 / CLOCK_HZ;
			host.sleep(ms);
		}
		Ok(())
	}
}
