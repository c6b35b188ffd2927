// Machine Words
//
// This file is part of A24.
// Copyright (C) 2016 Jeffrey Sharp
//
// A24 is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// A24 is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with A24.  If not, see <http://www.gnu.org/licenses/>.

use a24::op::{FuncCode, OpCode};
use a24::operand::{AddrMode, Reg};

// A machine word is 24 bits.
pub const WORD_MASK: u32 = 0xFF_FFFF;

// Payload of an operand data word: 21 bits above the ARE tag.
const VALUE_MASK: u32 = 0x1F_FFFF;

// -----------------------------------------------------------------------------
// ARE - loader treatment of a word

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct Are: u32 {
        const ABSOLUTE    = 0b100;
        const RELOCATABLE = 0b010;
        const EXTERNAL    = 0b001;
    }
}

// -----------------------------------------------------------------------------
// InstructionWord
//
// Layout, MSB first:
//   bits: [23 .. 18] [17 16] [15 .. 13] [12 11] [10 .. 8] [7 .. 3] [2 .. 0]
//   field: opcode    src md   src reg   dst md   dst reg   func     ARE
//
// Built by explicit shifts; never via struct layout.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InstructionWord {
    pub op:        OpCode,
    pub func:      FuncCode,
    pub src_mode:  AddrMode,
    pub src_reg:   Option<Reg>,
    pub dest_mode: AddrMode,
    pub dest_reg:  Option<Reg>,
    pub are:       Are,
}

impl InstructionWord {
    pub fn new(op:       OpCode,        func:     FuncCode,
               src_mode: AddrMode,      src_reg:  Option<Reg>,
               dest_mode: AddrMode,     dest_reg: Option<Reg>)
              -> Self {
        InstructionWord {
            op:        op,
            func:      func,
            src_mode:  src_mode,
            src_reg:   src_reg,
            dest_mode: dest_mode,
            dest_reg:  dest_reg,
            are:       Are::ABSOLUTE,
        }
    }

    pub fn pack(&self) -> u32 {
        let mut word = self.op.bits() << 18;
        word |= self.src_mode.bits()       << 16;
        word |= reg_bits(self.src_reg)     << 13;
        word |= self.dest_mode.bits()      << 11;
        word |= reg_bits(self.dest_reg)    <<  8;
        word |= self.func.bits()           <<  3;
        word |= self.are.bits();
        word & WORD_MASK
    }
}

fn reg_bits(reg: Option<Reg>) -> u32 {
    match reg {
        Some(r) => r.num() as u32,
        None    => 0,
    }
}

// -----------------------------------------------------------------------------
// DataWord - an operand word: 21-bit two's-complement payload over ARE

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DataWord {
    pub value: i64,
    pub are:   Are,
}

impl DataWord {
    pub fn new(are: Are, value: i64) -> Self {
        DataWord { value: value, are: are }
    }

    pub fn pack(&self) -> u32 {
        (((self.value as u32) & VALUE_MASK) << 3) | self.are.bits()
    }
}

// -----------------------------------------------------------------------------
// MachineWord
//
// The instruction's total length in words (1..5) rides on its first word,
// in a field of its own, distinct from the instruction/data tag.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MachineWord {
    Instruction { word: InstructionWord, length: u8 },
    Data        (DataWord),
}

impl MachineWord {
    pub fn pack(&self) -> u32 {
        match *self {
            MachineWord::Instruction { ref word, .. } => word.pack(),
            MachineWord::Data        (ref word)       => word.pack(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use a24::op::{FuncCode, OpCode};
    use a24::operand::{AddrMode, Reg};

    #[test]
    fn pack_two_registers() {
        // mov r3, r7
        let word = InstructionWord::new(
            OpCode::Mov,        FuncCode::None,
            AddrMode::Register, Some(Reg::R3),
            AddrMode::Register, Some(Reg::R7),
        );

        assert_eq!(0x037f04, word.pack());
    }

    #[test]
    fn pack_single_operand() {
        // clr r1 - the lone operand is the destination
        let word = InstructionWord::new(
            OpCode::Single,     FuncCode::Clr,
            AddrMode::None,     None,
            AddrMode::Register, Some(Reg::R1),
        );

        assert_eq!(0x14190c, word.pack());
    }

    #[test]
    fn pack_no_operands() {
        // stop
        let word = InstructionWord::new(
            OpCode::Halt,   FuncCode::None,
            AddrMode::None, None,
            AddrMode::None, None,
        );

        assert_eq!(0x3c0004, word.pack());
    }

    #[test]
    fn pack_immediate_source() {
        // cmp #0, r2
        let word = InstructionWord::new(
            OpCode::Cmp,         FuncCode::None,
            AddrMode::Immediate, None,
            AddrMode::Register,  Some(Reg::R2),
        );

        assert_eq!(0x041a04, word.pack());
    }

    #[test]
    fn pack_data_relocatable() {
        let word = DataWord::new(Are::RELOCATABLE, 124);
        assert_eq!(0x0003e2, word.pack());
    }

    #[test]
    fn pack_data_distance() {
        // jump distance of 5 words, absolute
        let word = DataWord::new(Are::ABSOLUTE, 5);
        assert_eq!(0x00002c, word.pack());
    }

    #[test]
    fn pack_data_negative() {
        let word = DataWord::new(Are::ABSOLUTE, -1);
        assert_eq!(0xfffffc, word.pack());
    }

    #[test]
    fn pack_data_external() {
        let word = DataWord::new(Are::EXTERNAL, 0);
        assert_eq!(0x000001, word.pack());
    }

    #[test]
    fn pack_machine_words() {
        let inst = InstructionWord::new(
            OpCode::Rts,    FuncCode::None,
            AddrMode::None, None,
            AddrMode::None, None,
        );

        let a = MachineWord::Instruction { word: inst, length: 1 };
        let b = MachineWord::Data(DataWord::new(Are::ABSOLUTE, 2));

        assert_eq!(0x380004, a.pack());
        assert_eq!(0x000014, b.pack());
        assert!(a.pack() <= WORD_MASK && b.pack() <= WORD_MASK);
    }
}
