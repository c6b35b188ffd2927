// Code & Data Images
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

use a24::word::{DataWord, MachineWord};

// Total addressable machine words.
pub const MEMORY_WORDS: usize = 1200;

// Address of the first code word; the instruction counter starts here.
pub const CODE_BASE: u32 = 100;

// Words available to the code segment.
pub const CODE_CAPACITY: usize = MEMORY_WORDS - CODE_BASE as usize;

// Words the data image may hold before the combined check between passes.
pub const DATA_CAPACITY: usize = MEMORY_WORDS;

// -----------------------------------------------------------------------------
// CodeImage
//
// Slot i holds the word at address CODE_BASE + i.  A Reserved slot is an
// operand word awaiting resolution; the second pass fills each one exactly
// once.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Slot {
    Word(MachineWord),
    Reserved,
}

#[derive(Clone, Debug)]
pub struct CodeImage {
    slots: Vec<Slot>,
}

impl CodeImage {
    pub fn new() -> Self {
        CodeImage { slots: Vec::new() }
    }

    // The instruction counter: the address of the next word to be placed.
    #[inline]
    pub fn counter(&self) -> u32 {
        CODE_BASE + self.slots.len() as u32
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn emit(&mut self, word: MachineWord) -> Result<(), ()> {
        self.push(Slot::Word(word))
    }

    pub fn reserve(&mut self) -> Result<(), ()> {
        self.push(Slot::Reserved)
    }

    fn push(&mut self, slot: Slot) -> Result<(), ()> {
        if self.slots.len() >= CODE_CAPACITY {
            return Err(());
        }
        self.slots.push(slot);
        Ok(())
    }

    // Resolves a reserved operand slot.
    pub fn fill(&mut self, addr: u32, word: DataWord) {
        let slot = &mut self.slots[(addr - CODE_BASE) as usize];
        debug_assert_eq!(Slot::Reserved, *slot);
        *slot = Slot::Word(MachineWord::Data(word));
    }

    // Records an instruction's total word count on its first word.
    pub fn set_length(&mut self, addr: u32, length: u8) {
        match self.slots[(addr - CODE_BASE) as usize] {
            Slot::Word(MachineWord::Instruction { length: ref mut l, .. }) => {
                *l = length;
            },
            _ => debug_assert!(false, "length on a non-instruction slot"),
        }
    }

    pub fn length_at(&self, addr: u32) -> u8 {
        match self.slots[(addr - CODE_BASE) as usize] {
            Slot::Word(MachineWord::Instruction { length, .. }) => length,
            _                                                   => 0,
        }
    }
}

// -----------------------------------------------------------------------------
// DataImage - raw values collected from .data and .string

#[derive(Clone, Debug)]
pub struct DataImage {
    values: Vec<i64>,
}

impl DataImage {
    pub fn new() -> Self {
        DataImage { values: Vec::new() }
    }

    // The data counter.
    #[inline]
    pub fn counter(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn append(&mut self, value: i64) -> Result<(), ()> {
        if self.values.len() >= DATA_CAPACITY {
            return Err(());
        }
        self.values.push(value);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use a24::op::{FuncCode, OpCode};
    use a24::operand::AddrMode;
    use a24::word::{Are, DataWord, InstructionWord, MachineWord};

    fn stop_word() -> MachineWord {
        let word = InstructionWord::new(
            OpCode::Halt,   FuncCode::None,
            AddrMode::None, None,
            AddrMode::None, None,
        );
        MachineWord::Instruction { word: word, length: 1 }
    }

    #[test]
    fn code_counter() {
        let mut code = CodeImage::new();
        assert_eq!(100, code.counter());

        code.emit(stop_word()).unwrap();
        assert_eq!(101, code.counter());
        assert_eq!(1,   code.size());
    }

    #[test]
    fn code_reserve_and_fill() {
        let mut code = CodeImage::new();
        code.emit(stop_word()).unwrap();
        code.reserve().unwrap();
        assert_eq!(Slot::Reserved, code.slots()[1]);

        code.fill(101, DataWord::new(Are::RELOCATABLE, 124));
        match code.slots()[1] {
            Slot::Word(ref w) => assert_eq!(0x0003e2, w.pack()),
            Slot::Reserved    => panic!("slot not filled"),
        }
    }

    #[test]
    fn code_length_write_back() {
        let mut code = CodeImage::new();
        code.emit(stop_word()).unwrap();
        code.reserve().unwrap();
        code.reserve().unwrap();

        code.set_length(100, 3);
        assert_eq!(3, code.length_at(100));
    }

    #[test]
    fn code_capacity() {
        let mut code = CodeImage::new();
        for _ in 0..CODE_CAPACITY {
            code.emit(stop_word()).unwrap();
        }
        assert_eq!(Err(()), code.emit(stop_word()));
        assert_eq!(Err(()), code.reserve());
        assert_eq!(CODE_CAPACITY, code.size());
    }

    #[test]
    fn data_counter() {
        let mut data = DataImage::new();
        assert_eq!(0, data.counter());

        data.append(5).unwrap();
        data.append(-3).unwrap();
        data.append(0).unwrap();

        assert_eq!(3, data.counter());
        assert_eq!(&[5, -3, 0], data.values());
    }

    #[test]
    fn data_capacity() {
        let mut data = DataImage::new();
        for i in 0..DATA_CAPACITY {
            data.append(i as i64).unwrap();
        }
        assert_eq!(Err(()), data.append(0));
    }
}
