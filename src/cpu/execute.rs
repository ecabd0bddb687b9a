// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Instruction execution (C8, §4.5): one handler per mnemonic, dispatched
//! from the decoded [`Instruction`] and its [`FetchedOperand`].
//!
//! The handler split (ALU ops feeding a single `set_arith_flags` helper,
//! a shared `goto` for every control-transfer instruction) mirrors
//! `original_source/lib/cpuProc.c`'s per-mnemonic `proc_*` functions,
//! generalized from the handful that file implements to the full set.

use super::fetch::FetchedOperand;
use super::registers::{Flag, Register};
use super::table::{Condition, Instruction, Mnemonic};
use super::Cpu;
use crate::error::EmuError;

impl Cpu {
	/// Execute a decoded primary-table instruction against its fetched
	/// operand. Returns `Ok(())`, or [`EmuError::UnknownOpcode`] if the
	/// table slot was never populated (an illegal opcode).
	pub(super) fn execute(&mut self, opcode: u8, insn: &Instruction, f: FetchedOperand) -> Result<(), EmuError> {
		use Mnemonic::*;

		match insn.mnemonic {
			Mnemonic::None => {
				let pc = self.regs.pc.wrapping_sub(1);
				log::error!("unknown opcode 0x{:02x} at 0x{:04x}", opcode, pc);
				return Err(EmuError::UnknownOpcode { opcode, pc });
			}

			Nop => {}
			Stop => log::warn!("STOP executed at 0x{:04x} (no-op: no display/power states modeled)", self.regs.pc),

			Ld => self.op_ld(insn, f),
			Ldh => self.op_ld(insn, f),

			Inc => self.op_inc(insn, f),
			Dec => self.op_dec(insn, f),

			Rlca => self.op_rlca(),
			Rrca => self.op_rrca(),
			Rla => self.op_rla(),
			Rra => self.op_rra(),

			Add => self.op_add(insn, f),
			Adc => self.op_adc(f),
			Sub => self.op_sub(f),
			Sbc => self.op_sbc(f),
			And => self.op_and(f),
			Xor => self.op_xor(f),
			Or => self.op_or(f),
			Cp => self.op_cp(f),

			Daa => self.op_daa(),
			Cpl => {
				self.regs.a = !self.regs.a;
				self.regs.set_flag(Flag::N, true);
				self.regs.set_flag(Flag::H, true);
			}
			Scf => {
				self.regs.set_flag(Flag::N, false);
				self.regs.set_flag(Flag::H, false);
				self.regs.set_flag(Flag::C, true);
			}
			Ccf => {
				self.regs.set_flag(Flag::N, false);
				self.regs.set_flag(Flag::H, false);
				let c = self.regs.flag(Flag::C);
				self.regs.set_flag(Flag::C, !c);
			}

			Halt => {
				self.halted = true;
				log::debug!("HALT entered at 0x{:04x}", self.regs.pc);
			}

			Pop => {
				self.pop_reg(insn.reg1);
			}
			Push => {
				self.cycles += 1;
				self.push_reg(insn.reg1);
			}

			Jr => {
				let offset = f.data as u8 as i8;
				let target = self.regs.pc.wrapping_add(offset as i16 as u16);
				self.goto(target, insn.cond, false);
			}
			Jp => self.goto(f.data, insn.cond, false),
			JpHl => self.regs.pc = self.regs.read(Register::Hl),
			Call => self.goto(f.data, insn.cond, true),
			Ret => {
				self.ret(insn.cond);
			}
			Reti => {
				self.ime = true;
				self.ret(Condition::None);
			}
			Rst => self.goto(insn.param as u16, Condition::None, true),

			Di => {
				self.ime = false;
				self.ime_pending = false;
			}
			Ei => self.ime_pending = true,
		}

		Ok(())
	}

	fn op_ld(&mut self, insn: &Instruction, f: FetchedOperand) {
		match insn.mode {
			super::table::AddrMode::HlSpr => {
				let offset = f.data as u8 as i8 as i16 as u16;
				let sp = self.regs.sp;
				let result = sp.wrapping_add(offset);

				self.regs.set_flag(Flag::Z, false);
				self.regs.set_flag(Flag::N, false);
				self.regs.set_flag(Flag::H, (sp & 0xF) + (offset & 0xF) > 0xF);
				self.regs.set_flag(Flag::C, (sp & 0xFF) + (offset & 0xFF) > 0xFF);

				self.cycles += 1;
				self.regs.write(insn.reg1, result);
			}
			_ if f.dest_is_mem => {
				if insn.mode == super::table::AddrMode::D16R {
					self.mem_write(f.mem_dest, f.data as u8);
					self.mem_write(f.mem_dest.wrapping_add(1), (f.data >> 8) as u8);
				} else {
					self.mem_write(f.mem_dest, f.data as u8);
				}
			}
			_ => {
				if insn.reg1.is_wide() && insn.mode == super::table::AddrMode::RR {
					// LD SP, HL costs an extra internal cycle.
					self.cycles += 1;
				}
				self.regs.write(insn.reg1, f.data);
			}
		}
	}

	fn op_inc(&mut self, insn: &Instruction, f: FetchedOperand) {
		if f.dest_is_mem {
			let result = f.data.wrapping_add(1) as u8;
			self.regs.set_flag(Flag::Z, result == 0);
			self.regs.set_flag(Flag::N, false);
			self.regs.set_flag(Flag::H, (f.data as u8 & 0xF) + 1 > 0xF);
			self.mem_write(f.mem_dest, result);
			return;
		}

		if insn.reg1.is_wide() {
			self.cycles += 1;
			let result = self.regs.read(insn.reg1).wrapping_add(1);
			self.regs.write(insn.reg1, result);
			return;
		}

		let value = self.regs.read(insn.reg1) as u8;
		let result = value.wrapping_add(1);
		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, (value & 0xF) + 1 > 0xF);
		self.regs.write(insn.reg1, result as u16);
	}

	fn op_dec(&mut self, insn: &Instruction, f: FetchedOperand) {
		if f.dest_is_mem {
			let result = (f.data as u8).wrapping_sub(1);
			self.regs.set_flag(Flag::Z, result == 0);
			self.regs.set_flag(Flag::N, true);
			self.regs.set_flag(Flag::H, (f.data as u8 & 0xF) == 0);
			self.mem_write(f.mem_dest, result);
			return;
		}

		if insn.reg1.is_wide() {
			self.cycles += 1;
			let result = self.regs.read(insn.reg1).wrapping_sub(1);
			self.regs.write(insn.reg1, result);
			return;
		}

		let value = self.regs.read(insn.reg1) as u8;
		let result = value.wrapping_sub(1);
		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, true);
		self.regs.set_flag(Flag::H, (value & 0xF) == 0);
		self.regs.write(insn.reg1, result as u16);
	}

	fn op_rlca(&mut self) {
		let carry = self.regs.a & 0x80 != 0;
		self.regs.a = self.regs.a.rotate_left(1);
		self.set_rotate_a_flags(carry);
	}

	fn op_rrca(&mut self) {
		let carry = self.regs.a & 0x01 != 0;
		self.regs.a = self.regs.a.rotate_right(1);
		self.set_rotate_a_flags(carry);
	}

	fn op_rla(&mut self) {
		let carry_in = self.regs.flag(Flag::C) as u8;
		let carry_out = self.regs.a & 0x80 != 0;
		self.regs.a = (self.regs.a << 1) | carry_in;
		self.set_rotate_a_flags(carry_out);
	}

	fn op_rra(&mut self) {
		let carry_in = self.regs.flag(Flag::C) as u8;
		let carry_out = self.regs.a & 0x01 != 0;
		self.regs.a = (self.regs.a >> 1) | (carry_in << 7);
		self.set_rotate_a_flags(carry_out);
	}

	fn set_rotate_a_flags(&mut self, carry: bool) {
		// Unlike the CB-prefixed rotate group, the A-only rotates always
		// clear Z regardless of the result.
		self.regs.set_flag(Flag::Z, false);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, false);
		self.regs.set_flag(Flag::C, carry);
	}

	fn op_add(&mut self, insn: &Instruction, f: FetchedOperand) {
		match insn.mode {
			super::table::AddrMode::RR if insn.reg1 == Register::Hl => {
				let lhs = self.regs.read(Register::Hl);
				let rhs = f.data;
				let result = lhs.wrapping_add(rhs);
				self.cycles += 1;
				self.regs.set_flag(Flag::N, false);
				self.regs.set_flag(Flag::H, (lhs & 0xFFF) + (rhs & 0xFFF) > 0xFFF);
				self.regs.set_flag(Flag::C, (lhs as u32) + (rhs as u32) > 0xFFFF);
				self.regs.write(Register::Hl, result);
			}
			super::table::AddrMode::HlSpr => {
				let offset = f.data as u8 as i8 as i16 as u16;
				let sp = self.regs.sp;
				let result = sp.wrapping_add(offset);
				self.regs.set_flag(Flag::Z, false);
				self.regs.set_flag(Flag::N, false);
				self.regs.set_flag(Flag::H, (sp & 0xF) + (offset & 0xF) > 0xF);
				self.regs.set_flag(Flag::C, (sp & 0xFF) + (offset & 0xFF) > 0xFF);
				self.cycles += 2;
				self.regs.sp = result;
			}
			_ => {
				let lhs = self.regs.a;
				let rhs = f.data as u8;
				let (result, carry) = lhs.overflowing_add(rhs);
				self.regs.set_flag(Flag::Z, result == 0);
				self.regs.set_flag(Flag::N, false);
				self.regs.set_flag(Flag::H, (lhs & 0xF) + (rhs & 0xF) > 0xF);
				self.regs.set_flag(Flag::C, carry);
				self.regs.a = result;
			}
		}
	}

	fn op_adc(&mut self, f: FetchedOperand) {
		let lhs = self.regs.a;
		let rhs = f.data as u8;
		let carry_in = self.regs.flag(Flag::C) as u8;
		let result = lhs.wrapping_add(rhs).wrapping_add(carry_in);
		let carry = (lhs as u16) + (rhs as u16) + (carry_in as u16) > 0xFF;

		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, (lhs & 0xF) + (rhs & 0xF) + carry_in > 0xF);
		self.regs.set_flag(Flag::C, carry);
		self.regs.a = result;
	}

	fn op_sub(&mut self, f: FetchedOperand) {
		let lhs = self.regs.a;
		let rhs = f.data as u8;
		let (result, borrow) = lhs.overflowing_sub(rhs);

		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, true);
		self.regs.set_flag(Flag::H, (lhs & 0xF) < (rhs & 0xF));
		self.regs.set_flag(Flag::C, borrow);
		self.regs.a = result;
	}

	fn op_sbc(&mut self, f: FetchedOperand) {
		let lhs = self.regs.a;
		let rhs = f.data as u8;
		let carry_in = self.regs.flag(Flag::C) as u8;
		let result = lhs.wrapping_sub(rhs).wrapping_sub(carry_in);
		let borrow = (lhs as i16) - (rhs as i16) - (carry_in as i16) < 0;

		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, true);
		self.regs.set_flag(Flag::H, (lhs & 0xF) as i16 - (rhs & 0xF) as i16 - (carry_in as i16) < 0);
		self.regs.set_flag(Flag::C, borrow);
		self.regs.a = result;
	}

	fn op_and(&mut self, f: FetchedOperand) {
		self.regs.a &= f.data as u8;
		self.regs.set_flag(Flag::Z, self.regs.a == 0);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, true);
		self.regs.set_flag(Flag::C, false);
	}

	fn op_xor(&mut self, f: FetchedOperand) {
		self.regs.a ^= f.data as u8;
		self.regs.set_flag(Flag::Z, self.regs.a == 0);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, false);
		self.regs.set_flag(Flag::C, false);
	}

	fn op_or(&mut self, f: FetchedOperand) {
		self.regs.a |= f.data as u8;
		self.regs.set_flag(Flag::Z, self.regs.a == 0);
		self.regs.set_flag(Flag::N, false);
		self.regs.set_flag(Flag::H, false);
		self.regs.set_flag(Flag::C, false);
	}

	fn op_cp(&mut self, f: FetchedOperand) {
		let lhs = self.regs.a;
		let rhs = f.data as u8;
		let (result, borrow) = lhs.overflowing_sub(rhs);

		self.regs.set_flag(Flag::Z, result == 0);
		self.regs.set_flag(Flag::N, true);
		self.regs.set_flag(Flag::H, (lhs & 0xF) < (rhs & 0xF));
		self.regs.set_flag(Flag::C, borrow);
	}

	/// Decimal-adjust `A` after a BCD addition/subtraction, per the Game
	/// Boy CPU Manual's documented DAA algorithm.
	fn op_daa(&mut self) {
		let mut adjust = 0u8;
		let mut carry = false;
		let n = self.regs.flag(Flag::N);

		if self.regs.flag(Flag::H) || (!n && (self.regs.a & 0xF) > 9) {
			adjust |= 0x06;
		}
		if self.regs.flag(Flag::C) || (!n && self.regs.a > 0x99) {
			adjust |= 0x60;
			carry = true;
		}

		self.regs.a = if n { self.regs.a.wrapping_sub(adjust) } else { self.regs.a.wrapping_add(adjust) };

		self.regs.set_flag(Flag::Z, self.regs.a == 0);
		self.regs.set_flag(Flag::H, false);
		self.regs.set_flag(Flag::C, carry);
	}

	/// Shared control-transfer helper for `JP`/`JR`/`CALL`/`RST`. Checks
	/// `cond` against the flag register; on a taken branch, optionally
	/// pushes the return address (`CALL`/`RST`) before jumping.
	fn goto(&mut self, target: u16, cond: Condition, push_return: bool) {
		if !self.condition_met(cond) {
			return;
		}

		// One internal cycle to decide to branch, whether or not a
		// return address also needs pushing (CALL/RST charge no extra
		// cycle for the jump itself beyond the push).
		self.cycles += 1;
		if push_return {
			let pc = self.regs.pc;
			self.push16(pc);
		}

		self.regs.pc = target;
	}

	fn ret(&mut self, cond: Condition) {
		if cond != Condition::None {
			self.cycles += 1;
		}
		if !self.condition_met(cond) {
			return;
		}
		self.cycles += 1;
		let target = self.pop16();
		self.regs.pc = target;
	}

	fn condition_met(&self, cond: Condition) -> bool {
		match cond {
			Condition::None => true,
			Condition::Nz => !self.regs.flag(Flag::Z),
			Condition::Z => self.regs.flag(Flag::Z),
			Condition::Nc => !self.regs.flag(Flag::C),
			Condition::C => self.regs.flag(Flag::C),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::table::decode;
	use super::super::tests::test_cpu;
	use super::*;

	#[test]
	fn test_xor_a_a_clears_a_and_sets_zero() {
		let mut cpu = test_cpu();
		cpu.regs.a = 0x42;
		let insn = decode(0xAF); // XOR A
		let f = cpu.fetch_operand(&insn);
		cpu.execute(0xAF, &insn, f).unwrap();
		assert_eq!(0, cpu.regs.a);
		assert!(cpu.regs.flag(Flag::Z));
	}

	#[test]
	fn test_inc_b_sets_half_carry_on_nibble_overflow() {
		let mut cpu = test_cpu();
		cpu.regs.b = 0x0F;
		let insn = decode(0x04); // INC B
		let f = cpu.fetch_operand(&insn);
		cpu.execute(0x04, &insn, f).unwrap();
		assert_eq!(0x10, cpu.regs.b);
		assert!(cpu.regs.flag(Flag::H));
		assert!(!cpu.regs.flag(Flag::Z));
	}

	#[test]
	fn test_daa_after_bcd_addition() {
		let mut cpu = test_cpu();
		// 0x45 + 0x38 = 0x7D in binary, should decimal-adjust to 0x83.
		cpu.regs.a = 0x7D;
		cpu.regs.set_flag(Flag::N, false);
		cpu.regs.set_flag(Flag::H, true);
		cpu.regs.set_flag(Flag::C, false);
		cpu.op_daa();
		assert_eq!(0x83, cpu.regs.a);
	}

	#[test]
	fn test_unknown_opcode_errors() {
		let mut cpu = test_cpu();
		let insn = decode(0xD3); // illegal opcode
		let f = cpu.fetch_operand(&insn);
		let err = cpu.execute(0xD3, &insn, f);
		assert!(matches!(err, Err(EmuError::UnknownOpcode { opcode: 0xD3, .. })));
	}

	#[test]
	fn test_jp_unconditional_jumps() {
		let mut cpu = test_cpu();
		let insn = decode(0xC3); // JP a16
		let pc = cpu.regs.pc;
		cpu.bus.write(pc, 0x00);
		cpu.bus.write(pc + 1, 0x90);
		let f = cpu.fetch_operand(&insn);
		cpu.execute(0xC3, &insn, f).unwrap();
		assert_eq!(0x9000, cpu.regs.pc);
	}
}
