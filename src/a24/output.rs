// Output Files
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
//
// The three artifact formats, fixed for any downstream loader:
//   .ob   "<code> <data>" header, then "%07d %06x" per word
//   .ent  "<name> %07d" per entry point
//   .ext  "<name> %07d" per external reference

use std::io::{self, Write};

use a24::image::{CodeImage, DataImage, Slot, CODE_BASE};
use a24::symbol::{SymbolKind, SymbolTable};
use a24::word::WORD_MASK;

pub fn write_object<W: Write>(out:  &mut W,
                              code: &CodeImage,
                              data: &DataImage)
                             -> io::Result<()> {
    writeln!(out, "{} {}", code.size(), data.counter())?;

    let mut addr = CODE_BASE;
    for slot in code.slots() {
        let word = match *slot {
            Slot::Word(ref w) => w.pack(),
            Slot::Reserved    => 0,
        };
        writeln!(out, "{:07} {:06x}", addr, word)?;
        addr += 1;
    }

    // Data words carry their raw value; the ARE bits stay zero.
    for value in data.values() {
        writeln!(out, "{:07} {:06x}", addr, (*value as u32) & WORD_MASK)?;
        addr += 1;
    }

    Ok(())
}

pub fn has_entries(symbols: &SymbolTable) -> bool {
    symbols.entries().iter().any(|e| e.kind == SymbolKind::Entry)
}

pub fn write_entries<W: Write>(out: &mut W, symbols: &SymbolTable)
                              -> io::Result<()> {
    for entry in symbols.entries() {
        if entry.kind == SymbolKind::Entry {
            writeln!(out, "{} {:07}", entry.name, entry.address)?;
        }
    }
    Ok(())
}

// Reference records only; the declarations sit at address zero.
pub fn has_externals(symbols: &SymbolTable) -> bool {
    symbols.entries().iter()
        .any(|e| e.kind == SymbolKind::External && e.address != 0)
}

pub fn write_externals<W: Write>(out: &mut W, symbols: &SymbolTable)
                                -> io::Result<()> {
    for entry in symbols.entries() {
        if entry.kind == SymbolKind::External && entry.address != 0 {
            writeln!(out, "{} {:07}", entry.name, entry.address)?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
