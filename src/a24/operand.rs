// Operands & Addressing Modes
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

use std::fmt::{self, Display, Formatter};

use a24::lexer::{is_valid_label, is_valid_number};

use self::Reg::*;

// -----------------------------------------------------------------------------
// Addressing Modes

// None marks an unused operand slot; Invalid marks an operand that has
// already been diagnosed.  Both encode as zero.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddrMode {
    Immediate,      // #value
    Direct,         // label
    Relative,       // &label
    Register,       // r0-r7
    None,
    Invalid,
}

impl AddrMode {
    pub fn bits(self) -> u32 {
        match self {
            AddrMode::Immediate => 0,
            AddrMode::Direct    => 1,
            AddrMode::Relative  => 2,
            AddrMode::Register  => 3,
            AddrMode::None      => 0,
            AddrMode::Invalid   => 0,
        }
    }
}

// -----------------------------------------------------------------------------
// Registers

#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
#[repr(u8)]
pub enum Reg { R0, R1, R2, R3, R4, R5, R6, R7 }

static REGS: [Reg; 8] = [R0, R1, R2, R3, R4, R5, R6, R7];

impl Reg {
    pub fn with_num(n: u8) -> Self {
        REGS[n as usize]
    }

    pub fn num(self) -> u8 {
        self as u8
    }
}

impl Display for Reg {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "r{}", self.num())
    }
}

// -----------------------------------------------------------------------------
// Operand - a classified operand lexeme

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operand<'a> {
    Immediate (&'a str),    // signed decimal after '#'
    Direct    (&'a str),    // symbol name
    Relative  (&'a str),    // symbol name after '&'
    Register  (Reg),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BadOperand<'a> {
    EmptyImmediate,             // lone '#'
    Immediate    (&'a str),     // '#' followed by a non-number
    Register     (&'a str),     // register-shaped, but not r0-r7
    Unrecognized (&'a str),
}

impl<'a> Operand<'a> {
    pub fn mode(&self) -> AddrMode {
        match *self {
            Operand::Immediate (..) => AddrMode::Immediate,
            Operand::Direct    (..) => AddrMode::Direct,
            Operand::Relative  (..) => AddrMode::Relative,
            Operand::Register  (..) => AddrMode::Register,
        }
    }

    pub fn register(&self) -> Option<Reg> {
        match *self {
            Operand::Register(r) => Some(r),
            _                    => Option::None,
        }
    }

    // The extra machine word this operand occupies, if any.
    pub fn needs_word(&self) -> bool {
        match *self {
            Operand::Register(_) => false,
            _                    => true,
        }
    }
}

// A name of the form 'r' + digits claims to be a register; values past r7
// are diagnosed rather than silently read as Direct symbols.
fn register_number(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();

    if bytes.first() == Some(&b'r') && bytes.len() > 1
        && bytes[1..].iter().all(|b| b.is_ascii_digit()) {
        Some(&text[1..])
    } else {
        Option::None
    }
}

pub fn classify(text: &str) -> Result<Operand, BadOperand> {
    if let Some(rest) = strip(text, b'#') {
        if rest.is_empty() {
            return Err(BadOperand::EmptyImmediate);
        }
        if !is_valid_number(rest) {
            return Err(BadOperand::Immediate(rest));
        }
        return Ok(Operand::Immediate(rest));
    }

    if let Some(rest) = strip(text, b'&') {
        if !is_valid_label(rest) {
            return Err(BadOperand::Unrecognized(text));
        }
        return Ok(Operand::Relative(rest));
    }

    if let Some(digits) = register_number(text) {
        match digits.parse::<u8>() {
            Ok(n) if n <= 7 && digits.len() == 1 => {
                return Ok(Operand::Register(Reg::with_num(n)));
            },
            _ => return Err(BadOperand::Register(text)),
        }
    }

    if is_valid_label(text) {
        return Ok(Operand::Direct(text));
    }

    Err(BadOperand::Unrecognized(text))
}

fn strip(text: &str, prefix: u8) -> Option<&str> {
    if text.as_bytes().first() == Some(&prefix) {
        Some(&text[1..])
    } else {
        Option::None
    }
}

// -----------------------------------------------------------------------------
// Tests
