// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Algorithmic decode and execution of `0xCB`-prefixed instructions
//! (§4.3). Unlike the primary table, every `0xCB xx` opcode is valid and
//! well-formed, so it's cheaper and less error-prone to derive the
//! operation, bit index and register straight from the second byte's
//! bit pattern than to hand-author 256 more table rows.
//!
//! Bit layout of the second byte: `ggbbbrrr` where `gg` (bits 6-7)
//! selects BIT/RES/SET (`01`/`10`/`11`) or, when `gg == 00`, a rotate/
//! shift group further selected by `bbb`; `bbb` (bits 3-5) is either the
//! rotate/shift sub-op or the bit index; `rrr` (bits 0-2) selects the
//! 8-bit register operand (`B C D E H L (HL) A`, matching the primary
//! table's LD grid ordering).

use super::registers::{Flag, Register};
use super::Cpu;
use crate::error::EmuError;

const CB_REGS: [Register; 8] =
	[Register::B, Register::C, Register::D, Register::E, Register::H, Register::L, Register::Hl, Register::A];

/// A decoded `0xCB`-prefixed instruction.
#[derive(Clone, Copy, Debug)]
pub struct CbInstruction {
	pub(super) group: CbGroup,
	pub(super) bit: u8,
	pub(super) reg: Register,
}

#[derive(Clone, Copy, Debug)]
pub(super) enum CbGroup {
	Rlc,
	Rrc,
	Rl,
	Rr,
	Sla,
	Sra,
	Swap,
	Srl,
	Bit,
	Res,
	Set,
}

/// Decode the second byte of a `0xCB`-prefixed instruction.
pub fn decode_cb(byte: u8) -> CbInstruction {
	let reg = CB_REGS[(byte & 0x07) as usize];
	let bit = (byte >> 3) & 0x07;

	let group = match byte >> 6 {
		0b01 => CbGroup::Bit,
		0b10 => CbGroup::Res,
		0b11 => CbGroup::Set,
		_ => match bit {
			0 => CbGroup::Rlc,
			1 => CbGroup::Rrc,
			2 => CbGroup::Rl,
			3 => CbGroup::Rr,
			4 => CbGroup::Sla,
			5 => CbGroup::Sra,
			6 => CbGroup::Swap,
			7 => CbGroup::Srl,
			_ => unreachable!("bit index is masked to 3 bits"),
		},
	};

	CbInstruction { group, bit, reg }
}

impl Cpu {
	/// Execute a decoded `0xCB` instruction. The two prefix bytes are
	/// already charged by the driver's fetch stage; any further cost
	/// (one bus read for a `(HL)` operand, one more for the write-back)
	/// is charged here as those accesses happen, so register-operand
	/// instructions cost nothing beyond the prefix fetch.
	pub(super) fn execute_cb(&mut self, insn: CbInstruction) -> Result<(), EmuError> {
		let operand = self.cb_read(insn.reg);

		let result = match insn.group {
			CbGroup::Rlc => self.rlc(operand),
			CbGroup::Rrc => self.rrc(operand),
			CbGroup::Rl => self.rl(operand),
			CbGroup::Rr => self.rr(operand),
			CbGroup::Sla => self.sla(operand),
			CbGroup::Sra => self.sra(operand),
			CbGroup::Swap => self.swap(operand),
			CbGroup::Srl => self.srl(operand),
			CbGroup::Bit => {
				let set = operand & (1 << insn.bit) != 0;
				self.regs.set_flag(Flag::Z, !set);
				self.regs.set_flag(Flag::N, false);
				self.regs.set_flag(Flag::H, true);
				return Ok(());
			}
			CbGroup::Res => operand & !(1 << insn.bit),
			CbGroup::Set => operand | (1 << insn.bit),
		};

		self.cb_write(insn.reg, result);
		Ok(())
	}

	fn cb_read(&mut self, reg: Register) -> u8 {
		if reg == Register::Hl {
			let addr = self.regs.read(Register::Hl);
			self.mem_read(addr)
		} else {
			self.regs.read(reg) as u8
		}
	}

	fn cb_write(&mut self, reg: Register, value: u8) {
		if reg == Register::Hl {
			let addr = self.regs.read(Register::Hl);
			self.mem_write(addr, value);
		} else {
			self.regs.write(reg, value as u16);
		}
	}

	fn rlc(&mut self, v: u8) -> u8 {
		let carry = v & 0x80 != 0;
		let result = v.rotate_left(1);
		self.set_shift_flags(result, carry);
		result
	}

	fn rrc(&mut self, v: u8) -> u8 {
		let carry = v & 0x01 != 0;
		let result = v.rotate_right(1);
		self.set_shift_flags(result, carry);
		result
	}

	fn rl(&mut self, v: u8) -> u8 {
		let carry_in = self.regs.flag(Flag::C) as u8;
		let carry_out = v & 0x80 != 0;
		let result = (v << 1) | carry_in;
		self.set_shift_flags(result, carry_out);
		result
	}

	fn rr(&mut self, v: u8) -> u8 {
		let carry_in = self.regs.flag(Flag::C) as u8;
		let carry_out = v & 0x01 != 0;
		let result = (v >> 1) | (carry_in << 7);
		self.set_shift_flags(result, carry_out);
		result
	}

	fn sla(&mut self, v: u8) -> u8 {
		let carry = v & 0x80 != 0;
		let result = v << 1;
		self.set_shift_flags(result, carry);
		result
	}

	fn sra(&mut self, v: u8) -> u8 {
		let carry = v & 0x01 != 0;
		let result = (v >> 1) | (v & 0x80);
		self.set_shift_flags(result, carry);
		result
	}

	fn swap(&mut self, v: u8) -> u8 {
		let result = (v << 4) | (v >> 4);
		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, false);
		self.regs.set_flag(Flag::C, false);
		result
	}

	fn srl(&mut self, v: u8) -> u8 {
		let carry = v & 0x01 != 0;
		let result = v >> 1;
		self.set_shift_flags(result, carry);
		result
	}

	fn set_shift_flags(&mut self, result: u8, carry: bool) {
		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, false);
		self.regs.set_flag(Flag::C, carry);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_bit_group() {
		// 0x47 = BIT 0, A
		let insn = decode_cb(0x47);
		assert!(matches!(insn.group, CbGroup::Bit));
		assert_eq!(0, insn.bit);
		assert_eq!(Register::A, insn.reg);
	}

	#[test]
	fn test_decode_res_group() {
		// 0x86 = RES 0, (HL)
		let insn = decode_cb(0x86);
		assert!(matches!(insn.group, CbGroup::Res));
		assert_eq!(0, insn.bit);
		assert_eq!(Register::Hl, insn.reg);
	}

	#[test]
	fn test_decode_rotate_group() {
		// 0x00 = RLC B
		let insn = decode_cb(0x00);
		assert!(matches!(insn.group, CbGroup::Rlc));
		assert_eq!(Register::B, insn.reg);
	}

	#[test]
	fn test_decode_set_group() {
		// 0xFF = SET 7, A
		let insn = decode_cb(0xFF);
		assert!(matches!(insn.group, CbGroup::Set));
		assert_eq!(7, insn.bit);
		assert_eq!(Register::A, insn.reg);
	}
}
