// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The interrupt controller (C9): the five interrupt sources, their
//! priority order and service vectors, matching
//! `original_source/include/interrupts.h`.

use super::Cpu;

/// The five interrupt sources the DMG defines, in priority order (lowest
/// bit / highest priority first).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Interrupt {
	/// Vertical blank, bit 0, vector 0x0040.
	VBlank,
	/// LCD STAT, bit 1, vector 0x0048.
	LcdStat,
	/// Timer overflow, bit 2, vector 0x0050.
	Timer,
	/// Serial transfer complete, bit 3, vector 0x0058.
	Serial,
	/// Joypad, bit 4, vector 0x0060.
	Joypad,
}

const ORDER: [Interrupt; 5] =
	[Interrupt::VBlank, Interrupt::LcdStat, Interrupt::Timer, Interrupt::Serial, Interrupt::Joypad];

impl Interrupt {
	/// The bit position of this source within `IE`/`IF`.
	pub fn bit(self) -> u8 {
		match self {
			Interrupt::VBlank => 0,
			Interrupt::LcdStat => 1,
			Interrupt::Timer => 2,
			Interrupt::Serial => 3,
			Interrupt::Joypad => 4,
		}
	}

	/// The service routine address this source jumps to.
	pub fn vector(self) -> u16 {
		match self {
			Interrupt::VBlank => 0x0040,
			Interrupt::LcdStat => 0x0048,
			Interrupt::Timer => 0x0050,
			Interrupt::Serial => 0x0058,
			Interrupt::Joypad => 0x0060,
		}
	}
}

impl Cpu {
	/// The highest-priority interrupt that is both requested (`IF`) and
	/// enabled (`IE`), if any. Priority is fixed by bit position, lowest
	/// bit wins, independent of `IME`.
	pub(super) fn pending_interrupt(&self) -> Option<Interrupt> {
		let active = self.bus.interrupt_flag() & self.bus.interrupt_enable();
		ORDER.into_iter().find(|i| active & (1 << i.bit()) != 0)
	}

	/// Service `interrupt`: clear its `IF` bit, disable `IME`, push `PC`
	/// and jump to the vector. Costs 5 m-cycles on real hardware: 2
	/// internal wait states, 2 for the `PC` push (charged by
	/// [`Cpu::push16`]) and 1 for the jump.
	pub(super) fn service_interrupt(&mut self, interrupt: Interrupt) {
		self.bus.clear_interrupt(interrupt.bit());
		self.ime = false;
		self.ime_pending = false;
		self.cycles += 3;
		let pc = self.regs.pc;
		self.push16(pc);
		self.regs.pc = interrupt.vector();
		log::debug!("servicing {:?} -> 0x{:04x}", interrupt, interrupt.vector());
	}
}

#[cfg(test)]
mod tests {
	use super::super::tests::test_cpu;
	use super::*;

	#[test]
	fn test_priority_is_lowest_bit_first() {
		let mut cpu = test_cpu();
		cpu.bus.write(crate::bus::IE_ADDRESS, 0xFF);
		cpu.bus.request_interrupt(Interrupt::Timer.bit());
		cpu.bus.request_interrupt(Interrupt::VBlank.bit());
		assert_eq!(Some(Interrupt::VBlank), cpu.pending_interrupt());
	}

	#[test]
	fn test_disabled_source_is_not_pending() {
		let mut cpu = test_cpu();
		cpu.bus.write(crate::bus::IE_ADDRESS, 0x00);
		cpu.bus.request_interrupt(Interrupt::VBlank.bit());
		assert_eq!(None, cpu.pending_interrupt());
	}

	#[test]
	fn test_service_pushes_pc_and_jumps_to_vector() {
		let mut cpu = test_cpu();
		cpu.bus.write(crate::bus::IE_ADDRESS, 0xFF);
		cpu.bus.request_interrupt(Interrupt::VBlank.bit());
		cpu.ime = true;
		cpu.regs.pc = 0x1234;

		let interrupt = cpu.pending_interrupt().unwrap();
		cpu.service_interrupt(interrupt);

		assert_eq!(0x0040, cpu.regs.pc);
		assert!(!cpu.ime);
		assert_eq!(0x1234, cpu.pop16());
		assert_eq!(5, cpu.cycles);
		assert_eq!(0, cpu.bus.interrupt_flag() & (1 << Interrupt::VBlank.bit()));
	}
}
