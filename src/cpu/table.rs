// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The primary (non-`0xCB`) opcode table (§4.3): 256 descriptor entries
//! naming a mnemonic, addressing mode, up to two register operands and a
//! branch condition. CB-prefixed opcodes are decoded algorithmically
//! instead, in [`super::cb`].
//!
//! The descriptor shape is `original_source/include/instructions.h`'s
//! `instruction` struct; the teacher's `cpu::decode` dispatches on a
//! hand-written `match` per opcode returning a function pointer instead
//! of a data table, so this is a data-driven generalization of the same
//! idea rather than a line-for-line port.

use std::sync::OnceLock;

use super::registers::Register;

/// The operation an instruction performs.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[allow(missing_docs)]
pub enum Mnemonic {
	None,
	Nop,
	Ld,
	Ldh,
	Inc,
	Dec,
	Rlca,
	Add,
	Rrca,
	Stop,
	Rla,
	Jr,
	Rra,
	Daa,
	Cpl,
	Scf,
	Ccf,
	Halt,
	Adc,
	Sub,
	Sbc,
	And,
	Xor,
	Or,
	Cp,
	Pop,
	Jp,
	Push,
	Ret,
	Call,
	Reti,
	JpHl,
	Di,
	Ei,
	Rst,
}

/// The addressing mode, describing where an instruction's operand(s)
/// come from and go to.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[allow(missing_docs)]
pub enum AddrMode {
	/// No operand.
	Imp,
	/// Single register operand.
	R,
	/// Register into register.
	RR,
	/// Immediate byte into register.
	RD8,
	/// Immediate word into register.
	RD16,
	/// `0xFF00 + immediate byte` into register.
	RA8,
	/// Immediate word (direct memory address) into register.
	RA16,
	/// Memory at register into register.
	RMr,
	/// Memory at `HL` into register, then `HL += 1`.
	RHli,
	/// Memory at `HL` into register, then `HL -= 1`.
	RHld,
	/// Register into memory at register.
	MrR,
	/// Immediate byte into memory at register.
	MrD8,
	/// Memory at register (no operand transfer; used by `INC (HL)` etc).
	Mr,
	/// Register into memory at `HL`, then `HL += 1`.
	HliR,
	/// Register into memory at `HL`, then `HL -= 1`.
	HldR,
	/// `SP + signed immediate byte` into `HL`.
	HlSpr,
	/// Immediate byte, no register.
	D8,
	/// Immediate word, no register.
	D16,
	/// Immediate word into memory (as a 16-bit store).
	D16R,
	/// Register into memory at immediate word.
	A16R,
	/// Register into memory at `0xFF00 + immediate byte`.
	A8R,
}

/// A conditional branch's predicate, evaluated against the flag register.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[allow(missing_docs)]
pub enum Condition {
	None,
	Nz,
	Z,
	Nc,
	C,
}

/// One entry of the primary opcode table.
#[derive(Clone, Copy, Debug)]
pub struct Instruction {
	/// The operation performed.
	pub mnemonic: Mnemonic,
	/// Where the operand(s) come from.
	pub mode: AddrMode,
	/// First register operand, if any.
	pub reg1: Register,
	/// Second register operand, if any.
	pub reg2: Register,
	/// Branch condition, for `JP`/`JR`/`CALL`/`RET`.
	pub cond: Condition,
	/// The literal operand for `RST` (the page to jump to, `param * 8`).
	pub param: u8,
}

const NONE: Instruction = Instruction {
	mnemonic: Mnemonic::None,
	mode: AddrMode::Imp,
	reg1: Register::None,
	reg2: Register::None,
	cond: Condition::None,
	param: 0,
};

const fn insn(mnemonic: Mnemonic, mode: AddrMode, reg1: Register, reg2: Register) -> Instruction {
	Instruction { mnemonic, mode, reg1, reg2, cond: Condition::None, param: 0 }
}

const fn insn_cond(mnemonic: Mnemonic, mode: AddrMode, cond: Condition) -> Instruction {
	Instruction { mnemonic, mode, reg1: Register::None, reg2: Register::None, cond, param: 0 }
}

static TABLE: OnceLock<[Instruction; 256]> = OnceLock::new();

/// Returns the full primary opcode table, building it on first use.
pub fn table() -> &'static [Instruction; 256] {
	TABLE.get_or_init(build_table)
}

/// Looks up a single opcode's descriptor.
pub fn decode(opcode: u8) -> Instruction {
	table()[opcode as usize]
}

fn build_table() -> [Instruction; 256] {
	use AddrMode::*;
	use Condition as Cd;
	use Mnemonic::*;
	use Register::*;

	let mut t = [NONE; 256];

	t[0x00] = insn(Nop, Imp, None, None);
	t[0x01] = insn(Ld, RD16, Bc, None);
	t[0x02] = insn(Ld, MrR, Bc, A);
	t[0x03] = insn(Inc, R, Bc, None);
	t[0x04] = insn(Inc, R, B, None);
	t[0x05] = insn(Dec, R, B, None);
	t[0x06] = insn(Ld, RD8, B, None);
	t[0x07] = insn(Rlca, Imp, None, None);
	t[0x08] = insn(Ld, D16R, None, Sp);
	t[0x09] = insn(Add, RR, Hl, Bc);
	t[0x0A] = insn(Ld, RMr, A, Bc);
	t[0x0B] = insn(Dec, R, Bc, None);
	t[0x0C] = insn(Inc, R, C, None);
	t[0x0D] = insn(Dec, R, C, None);
	t[0x0E] = insn(Ld, RD8, C, None);
	t[0x0F] = insn(Rrca, Imp, None, None);

	t[0x10] = insn(Stop, D8, None, None);
	t[0x11] = insn(Ld, RD16, De, None);
	t[0x12] = insn(Ld, MrR, De, A);
	t[0x13] = insn(Inc, R, De, None);
	t[0x14] = insn(Inc, R, D, None);
	t[0x15] = insn(Dec, R, D, None);
	t[0x16] = insn(Ld, RD8, D, None);
	t[0x17] = insn(Rla, Imp, None, None);
	t[0x18] = insn_cond(Jr, D8, Cd::None);
	t[0x19] = insn(Add, RR, Hl, De);
	t[0x1A] = insn(Ld, RMr, A, De);
	t[0x1B] = insn(Dec, R, De, None);
	t[0x1C] = insn(Inc, R, E, None);
	t[0x1D] = insn(Dec, R, E, None);
	t[0x1E] = insn(Ld, RD8, E, None);
	t[0x1F] = insn(Rra, Imp, None, None);

	t[0x20] = insn_cond(Jr, D8, Cd::Nz);
	t[0x21] = insn(Ld, RD16, Hl, None);
	t[0x22] = insn(Ld, HliR, Hl, A);
	t[0x23] = insn(Inc, R, Hl, None);
	t[0x24] = insn(Inc, R, H, None);
	t[0x25] = insn(Dec, R, H, None);
	t[0x26] = insn(Ld, RD8, H, None);
	t[0x27] = insn(Daa, Imp, None, None);
	t[0x28] = insn_cond(Jr, D8, Cd::Z);
	t[0x29] = insn(Add, RR, Hl, Hl);
	t[0x2A] = insn(Ld, RHli, A, Hl);
	t[0x2B] = insn(Dec, R, Hl, None);
	t[0x2C] = insn(Inc, R, L, None);
	t[0x2D] = insn(Dec, R, L, None);
	t[0x2E] = insn(Ld, RD8, L, None);
	t[0x2F] = insn(Cpl, Imp, None, None);

	t[0x30] = insn_cond(Jr, D8, Cd::Nc);
	t[0x31] = insn(Ld, RD16, Sp, None);
	t[0x32] = insn(Ld, HldR, Hl, A);
	t[0x33] = insn(Inc, R, Sp, None);
	t[0x34] = insn(Inc, Mr, Hl, None);
	t[0x35] = insn(Dec, Mr, Hl, None);
	t[0x36] = insn(Ld, MrD8, Hl, None);
	t[0x37] = insn(Scf, Imp, None, None);
	t[0x38] = insn_cond(Jr, D8, Cd::C);
	t[0x39] = insn(Add, RR, Hl, Sp);
	t[0x3A] = insn(Ld, RHld, A, Hl);
	t[0x3B] = insn(Dec, R, Sp, None);
	t[0x3C] = insn(Inc, R, A, None);
	t[0x3D] = insn(Dec, R, A, None);
	t[0x3E] = insn(Ld, RD8, A, None);
	t[0x3F] = insn(Ccf, Imp, None, None);

	// 0x40-0x7F: LD r, r' grid, with 0x76 (LD (HL), (HL)) replaced by HALT.
	let grid_regs = [B, C, D, E, H, L, Hl, A];
	for (dst_idx, &dst) in grid_regs.iter().enumerate() {
		for (src_idx, &src) in grid_regs.iter().enumerate() {
			let opcode = 0x40 + dst_idx * 8 + src_idx;
			if opcode == 0x76 {
				t[opcode] = insn(Halt, Imp, None, None);
				continue;
			}
			let mode = match (dst == Hl, src == Hl) {
				(true, _) => MrR,
				(_, true) => RMr,
				_ => RR,
			};
			t[opcode] = insn(Ld, mode, dst, src);
		}
	}

	// 0x80-0xBF: ALU A, r grid (ADD/ADC/SUB/SBC/AND/XOR/OR/CP).
	let alu_ops = [Add, Adc, Sub, Sbc, And, Xor, Or, Cp];
	for (op_idx, &op) in alu_ops.iter().enumerate() {
		for (src_idx, &src) in grid_regs.iter().enumerate() {
			let opcode = 0x80 + op_idx * 8 + src_idx;
			let mode = if src == Hl { RMr } else { RR };
			t[opcode] = insn(op, mode, A, src);
		}
	}

	t[0xC0] = insn_cond(Ret, Imp, Cd::Nz);
	t[0xC1] = insn(Pop, R, Bc, None);
	t[0xC2] = insn_cond(Jp, D16, Cd::Nz);
	t[0xC3] = insn_cond(Jp, D16, Cd::None);
	t[0xC4] = insn_cond(Call, D16, Cd::Nz);
	t[0xC5] = insn(Push, R, Bc, None);
	t[0xC6] = insn(Add, RD8, A, None);
	t[0xC7] = Instruction { param: 0x00, ..insn(Rst, Imp, None, None) };
	t[0xC8] = insn_cond(Ret, Imp, Cd::Z);
	t[0xC9] = insn_cond(Ret, Imp, Cd::None);
	t[0xCA] = insn_cond(Jp, D16, Cd::Z);
	// 0xCB is the CB-prefix escape; the driver intercepts it before a
	// table lookup ever happens, so no entry is needed here.
	t[0xCC] = insn_cond(Call, D16, Cd::Z);
	t[0xCD] = insn_cond(Call, D16, Cd::None);
	t[0xCE] = insn(Adc, RD8, A, None);
	t[0xCF] = Instruction { param: 0x08, ..insn(Rst, Imp, None, None) };

	t[0xD0] = insn_cond(Ret, Imp, Cd::Nc);
	t[0xD1] = insn(Pop, R, De, None);
	t[0xD2] = insn_cond(Jp, D16, Cd::Nc);
	t[0xD4] = insn_cond(Call, D16, Cd::Nc);
	t[0xD5] = insn(Push, R, De, None);
	t[0xD6] = insn(Sub, RD8, A, None);
	t[0xD7] = Instruction { param: 0x10, ..insn(Rst, Imp, None, None) };
	t[0xD8] = insn_cond(Ret, Imp, Cd::C);
	t[0xD9] = insn(Reti, Imp, None, None);
	t[0xDA] = insn_cond(Jp, D16, Cd::C);
	t[0xDC] = insn_cond(Call, D16, Cd::C);
	t[0xDE] = insn(Sbc, RD8, A, None);
	t[0xDF] = Instruction { param: 0x18, ..insn(Rst, Imp, None, None) };

	t[0xE0] = insn(Ldh, A8R, None, A);
	t[0xE1] = insn(Pop, R, Hl, None);
	t[0xE2] = insn(Ld, MrR, C, A);
	t[0xE5] = insn(Push, R, Hl, None);
	t[0xE6] = insn(And, RD8, A, None);
	t[0xE7] = Instruction { param: 0x20, ..insn(Rst, Imp, None, None) };
	t[0xE8] = insn(Add, HlSpr, Sp, None);
	t[0xE9] = insn(JpHl, Imp, None, None);
	t[0xEA] = insn(Ld, A16R, None, A);
	t[0xEE] = insn(Xor, RD8, A, None);
	t[0xEF] = Instruction { param: 0x28, ..insn(Rst, Imp, None, None) };

	t[0xF0] = insn(Ldh, RA8, A, None);
	t[0xF1] = insn(Pop, R, Af, None);
	t[0xF2] = insn(Ld, RMr, A, C);
	t[0xF3] = insn(Di, Imp, None, None);
	t[0xF5] = insn(Push, R, Af, None);
	t[0xF6] = insn(Or, RD8, A, None);
	t[0xF7] = Instruction { param: 0x30, ..insn(Rst, Imp, None, None) };
	t[0xF8] = insn(Ld, HlSpr, Hl, Sp);
	t[0xF9] = insn(Ld, RR, Sp, Hl);
	t[0xFA] = insn(Ld, RA16, A, None);
	t[0xFB] = insn(Ei, Imp, None, None);
	t[0xFE] = insn(Cp, RD8, A, None);
	t[0xFF] = Instruction { param: 0x38, ..insn(Rst, Imp, None, None) };

	t
}
