// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The Sharp LR35902 CPU core (C6-C10): registers, the primary and
//! `0xCB`-prefixed instruction sets, the stack, interrupt servicing and
//! the `step()` driver that ties them together.

pub mod cb;
pub mod execute;
pub mod fetch;
pub mod interrupts;
pub mod registers;
pub mod stack;
pub mod table;

use crate::bus::SystemBus;
use crate::error::EmuError;
use registers::Registers;

/// The CPU. Owns the register file, the system bus and the interrupt
/// master-enable latch, and drives execution one instruction at a time
/// via [`Cpu::step`].
pub struct Cpu {
	pub(crate) regs: Registers,
	/// The bus this CPU is wired to.
	pub bus: SystemBus,
	/// Interrupt master enable. Gates whether a pending, individually
	/// enabled interrupt is actually serviced.
	ime: bool,
	/// Set by `EI`; promoted to `ime` at the top of the *next* `step()`,
	/// modeling the one-instruction latency documented in §4.7. `DI` and
	/// `RETI` bypass this latch and set `ime` immediately.
	ime_pending: bool,
	/// Set by `HALT`; cleared when a pending interrupt wakes the CPU,
	/// whether or not that interrupt actually gets serviced (§4.6).
	halted: bool,
	/// m-cycles consumed by the step in progress. Reset at the top of
	/// every [`Cpu::step`] call and accumulated by every bus access and
	/// every explicit internal-delay charge along the way.
	cycles: u32,
}

impl Cpu {
	/// Build a CPU wired to `bus`, with registers at their power-on state.
	pub fn new(bus: SystemBus) -> Self {
		Cpu { regs: Registers::new(), bus, ime: false, ime_pending: false, halted: false, cycles: 0 }
	}

	/// Whether interrupts are currently enabled at the CPU (the `IME`
	/// flag, not to be confused with the `IE` register).
	pub fn interrupts_enabled(&self) -> bool {
		self.ime
	}

	/// Whether the CPU is halted, awaiting an interrupt.
	pub fn is_halted(&self) -> bool {
		self.halted
	}

	/// The program counter.
	pub fn pc(&self) -> u16 {
		self.regs.pc
	}

	/// Read a register by name. Exposed for host glue and tests that
	/// need to inspect or seed CPU state beyond the bus.
	pub fn register(&self, reg: registers::Register) -> u16 {
		self.regs.read(reg)
	}

	/// Write a register by name.
	pub fn set_register(&mut self, reg: registers::Register, value: u16) {
		self.regs.write(reg, value);
	}

	/// Test a flag bit.
	pub fn flag(&self, flag: registers::Flag) -> bool {
		self.regs.flag(flag)
	}

	/// Set or clear a flag bit.
	pub fn set_flag(&mut self, flag: registers::Flag, value: bool) {
		self.regs.set_flag(flag, value);
	}

	/// The raw flags register (`F`). Only the high nibble is meaningful.
	pub fn flags(&self) -> u8 {
		self.regs.f
	}

	fn mem_read(&mut self, address: u16) -> u8 {
		self.cycles += 1;
		self.bus.read(address)
	}

	fn mem_write(&mut self, address: u16, value: u8) {
		self.cycles += 1;
		self.bus.write(address, value);
	}

	/// Run one step of the fetch/execute/interrupt cycle and return the
	/// number of m-cycles it took.
	///
	/// Order of operations, per §4.7:
	/// 1. A delayed `EI` from the previous instruction is committed to
	///    `IME` before anything else runs.
	/// 2. If halted, check for a wakeup; a pending interrupt always wakes
	///    the CPU even if `IME` is off, it just won't be serviced.
	/// 3. If not halted (including having just woken up) and `IME` is
	///    set, service the highest-priority pending interrupt instead of
	///    fetching a new instruction.
	/// 4. Otherwise fetch, decode and execute the next instruction.
	pub fn step(&mut self) -> Result<u32, EmuError> {
		self.cycles = 0;

		if self.ime_pending {
			self.ime = true;
			self.ime_pending = false;
		}

		if self.halted {
			if let Some(interrupt) = self.pending_interrupt() {
				self.halted = false;
				log::debug!("HALT exit: woken by {:?}", interrupt);
				if self.ime {
					self.service_interrupt(interrupt);
					return Ok(self.cycles);
				}
				// IME is off: the interrupt wakes the CPU (§4.6) but
				// isn't serviced. Fall through to fetch/execute below.
			} else {
				self.cycles = 1;
				return Ok(self.cycles);
			}
		} else if self.ime {
			if let Some(interrupt) = self.pending_interrupt() {
				self.service_interrupt(interrupt);
				return Ok(self.cycles);
			}
		}

		let pc = self.regs.pc;
		let opcode = self.fetch_byte();

		if opcode == 0xCB {
			let cb_byte = self.fetch_byte();
			let insn = cb::decode_cb(cb_byte);
			self.execute_cb(insn)?;
		} else {
			let insn = table::decode(opcode);
			let fetched = self.fetch_operand(&insn);
			log::trace!("0x{:04x}: opcode 0x{:02x} -> {:?}", pc, opcode, insn.mnemonic);
			self.execute(opcode, &insn, fetched)?;
		}

		Ok(self.cycles)
	}
}
