// Second Pass
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
// Re-walks the expanded source against the populated symbol table:
// promotes .entry arguments, fills every reserved operand slot, and
// records each use of an external symbol.

use a24::assembler::Assembly;
use a24::image::CODE_BASE;
use a24::lexer::{self, Scanner};
use a24::message::Messages;
use a24::op::{self, OpCode};
use a24::operand::{self, Operand};
use a24::source::SourceLine;
use a24::symbol::SymbolKind;
use a24::word::{Are, DataWord};

pub fn run<'a>(lines: &[SourceLine<'a>],
               asm:   &mut Assembly,
               log:   &mut Messages<'a>)
              -> Result<(), ()> {
    let mut ic = CODE_BASE;
    for line in lines {
        process_line(line, &mut ic, asm, log)?;
    }
    Ok(())
}

fn process_line<'a>(line: &SourceLine<'a>,
                    ic:   &mut u32,
                    asm:  &mut Assembly,
                    log:  &mut Messages<'a>)
                   -> Result<(), ()> {
    let mut scan = Scanner::new(&line.text);

    scan.skip_whitespace();
    if scan.at_end() || scan.peek() == Some(b';') {
        return Ok(());
    }

    // The label's address was fixed in the first pass.
    let _ = scan.take_label();
    scan.skip_whitespace();
    if scan.at_end() {
        return Ok(());
    }

    if scan.peek() == Some(b'.') {
        let name = scan.take_directive();
        if name == ".entry" {
            return process_entry(line, scan, asm, log);
        }
        // .data/.string/.extern contributed everything in pass one.
        return Ok(());
    }

    resolve_instruction(line, scan, ic, asm, log)
}

// -----------------------------------------------------------------------------
// .entry promotion

fn process_entry<'a>(line: &SourceLine<'a>,
                     mut scan: Scanner,
                     asm:  &mut Assembly,
                     log:  &mut Messages<'a>)
                    -> Result<(), ()> {
    scan.skip_whitespace();
    if scan.at_end() {
        log.err_entry_missing(line);
        return Err(());
    }

    let mut name = scan.take_word();
    if name.starts_with('&') {
        name = &name[1..];
    }
    if !lexer::is_valid_label(name) {
        log.err_entry_invalid(line, name);
        return Err(());
    }

    // Repeating an .entry is a no-op.
    if asm.symbols.lookup_kind(name, SymbolKind::Entry).is_some() {
        return Ok(());
    }
    if asm.symbols.lookup_kind(name, SymbolKind::External).is_some() {
        log.err_entry_conflict(line, name);
        return Err(());
    }
    if !asm.symbols.promote_entry(name) {
        log.err_entry_undefined(line, name);
        return Err(());
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Operand resolution

fn resolve_instruction<'a>(line: &SourceLine<'a>,
                           mut scan: Scanner,
                           ic:   &mut u32,
                           asm:  &mut Assembly,
                           log:  &mut Messages<'a>)
                          -> Result<(), ()> {
    let start  = *ic;
    let length = asm.code.length_at(start);

    let mnemonic = scan.take_mnemonic();
    let info = match op::lookup(mnemonic) {
        Some(info) => info,
        None       => return Ok(()),    // pass one rejected the file already
    };

    // Walk the operand words behind the instruction word, in parse order.
    let mut slot = start + 1;
    for text in scan.take_operands() {
        match operand::classify(text) {
            Ok(Operand::Immediate(_)) => {
                // Encoded in pass one; never rewritten here.
                slot += 1;
            },
            Ok(Operand::Register(_)) => {},
            Ok(Operand::Direct(name)) => {
                resolve_direct(line, slot, name, asm, log)?;
                slot += 1;
            },
            Ok(Operand::Relative(name)) => {
                resolve_relative(line, slot, start, name, info.op, asm, log)?;
                slot += 1;
            },
            Err(_) => {},   // unreachable behind a clean first pass
        }
    }

    *ic = start + length as u32;
    Ok(())
}

fn resolve_direct<'a>(line: &SourceLine<'a>,
                      slot: u32,
                      name: &str,
                      asm:  &mut Assembly,
                      log:  &mut Messages<'a>)
                     -> Result<(), ()> {
    let (address, kind) = match asm.symbols.lookup(name) {
        Some(entry) => (entry.address, entry.kind),
        None => {
            log.err_sym_undefined(line, name);
            return Err(());
        },
    };

    if kind == SymbolKind::External {
        // The loader patches the word; remember where it lives.
        asm.symbols.add_reference(name, slot);
        asm.code.fill(slot, DataWord::new(Are::EXTERNAL, 0));
    } else {
        asm.code.fill(slot, DataWord::new(Are::RELOCATABLE, address as i64));
    }
    Ok(())
}

fn resolve_relative<'a>(line:  &SourceLine<'a>,
                        slot:  u32,
                        start: u32,
                        name:  &str,
                        op:    OpCode,
                        asm:   &mut Assembly,
                        log:   &mut Messages<'a>)
                       -> Result<(), ()> {
    if op != OpCode::Jumps {
        log.err_relative_misuse(line);
        return Err(());
    }

    let entry = match asm.symbols.lookup(name) {
        Some(entry) => entry,
        None => {
            log.err_sym_undefined(line, name);
            return Err(());
        },
    };

    // The target must live in the code segment; a promoted entry point
    // still qualifies when its address does.
    let is_code = match entry.kind {
        SymbolKind::Code  => true,
        SymbolKind::Entry => entry.address < asm.code.counter(),
        _                 => false,
    };
    if !is_code {
        log.err_relative_target(line, name);
        return Err(());
    }

    // Distance from the instruction's first word, not the operand word.
    let distance = entry.address as i64 - start as i64;
    asm.code.fill(slot, DataWord::new(Are::ABSOLUTE, distance));
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
