// Operations
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

use self::FuncCode::*;
use self::OpCode::*;

// Counts arguments.  Yields an expression like: 1 + 1 + 1
macro_rules! count {
    ( $e:expr, $( $x:tt )+ ) => (1 + count!($( $x )+));
    ( $e:expr              ) => (1);
    (                      ) => (0);
}

// Defines the mnemonic table with automatic count.
macro_rules! ops {
    ( $( $name:expr => $op:ident / $func:ident ),* ) => (
        static OPS: [OpInfo; count!($( $name ),*)] = [
            $( OpInfo { name: $name, op: $op, func: $func } ),*
        ];
    );
}

// -----------------------------------------------------------------------------
// Operation Codes

// Operations sharing an opcode (add/sub, clr/not/inc/dec, jmp/bne/jsr) are
// distinguished by their function code.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum OpCode {
    Mov    =  0,
    Cmp    =  1,
    Math   =  2,    // add, sub
    Lea    =  4,
    Single =  5,    // clr, not, inc, dec
    Jumps  =  9,    // jmp, bne, jsr
    Red    = 12,
    Prn    = 13,
    Rts    = 14,
    Halt   = 15,
}

impl OpCode {
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn operand_count(self) -> usize {
        match self {
            Mov | Cmp | Math | Lea     => 2,
            Single | Jumps | Red | Prn => 1,
            Rts | Halt                 => 0,
        }
    }
}

// -----------------------------------------------------------------------------
// Function Codes

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum FuncCode {
    None,
    Add, Sub,
    Clr, Not, Inc, Dec,
    Jmp, Bne, Jsr,
}

impl FuncCode {
    // Field values repeat across opcode groups (add, clr, and jmp all
    // encode 1), so the value cannot be the enum discriminant.
    pub fn bits(self) -> u32 {
        match self {
            None            => 0,
            Add | Clr | Jmp => 1,
            Sub | Not | Bne => 2,
            Inc | Jsr       => 3,
            Dec             => 4,
        }
    }
}

// -----------------------------------------------------------------------------
// Mnemonic Table

#[derive(Clone, Copy, Debug)]
pub struct OpInfo {
    pub name: &'static str,
    pub op:   OpCode,
    pub func: FuncCode,
}

ops! {
    "mov"  => Mov    / None,
    "cmp"  => Cmp    / None,
    "add"  => Math   / Add,
    "sub"  => Math   / Sub,
    "lea"  => Lea    / None,
    "clr"  => Single / Clr,
    "not"  => Single / Not,
    "inc"  => Single / Inc,
    "dec"  => Single / Dec,
    "jmp"  => Jumps  / Jmp,
    "bne"  => Jumps  / Bne,
    "jsr"  => Jumps  / Jsr,
    "red"  => Red    / None,
    "prn"  => Prn    / None,
    "rts"  => Rts    / None,
    "stop" => Halt   / None
}

pub fn lookup(name: &str) -> Option<&'static OpInfo> {
    OPS.iter().find(|info| info.name == name)
}

pub fn is_mnemonic(name: &str) -> bool {
    lookup(name).is_some()
}

// -----------------------------------------------------------------------------
// Tests
