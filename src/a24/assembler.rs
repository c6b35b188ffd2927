// Assembly Pipeline
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

use std::fs::{self, File};
use std::io;

use a24::expand;
use a24::image::{CodeImage, DataImage, CODE_CAPACITY};
use a24::message::Messages;
use a24::output;
use a24::pass1;
use a24::pass2;
use a24::source::{self, SourceLine};
use a24::symbol::SymbolTable;

// -----------------------------------------------------------------------------
// Assembly - the state of one file's translation
//
// Created per input file and dropped with it; nothing survives between
// files.

#[derive(Clone, Debug)]
pub struct Assembly {
    pub code:    CodeImage,
    pub data:    DataImage,
    pub symbols: SymbolTable,
}

impl Assembly {
    pub fn new() -> Self {
        Assembly {
            code:    CodeImage::new(),
            data:    DataImage::new(),
            symbols: SymbolTable::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// Per-file pipeline

// Assembles `<base>.as`, leaving `<base>.am` plus the object, entries,
// and externals files.  Returns whether the file assembled cleanly; all
// diagnostics go to stderr.
pub fn assemble_file(base: &str) -> bool {
    let source_path = format!("{}.as", base);
    let interm_path = format!("{}.am", base);

    let file = match File::open(&source_path) {
        Ok(f) => f,
        Err(_) => {
            eprintln!("Error: Cannot open file {}", source_path);
            return false;
        },
    };
    let lines = match source::read_lines(&source_path, file) {
        Ok(lines) => lines,
        Err(_) => {
            eprintln!("Error: Cannot read file {}", source_path);
            return false;
        },
    };

    let mut log = Messages::new();

    // Macro stage: the expanded text is the input of both passes and is
    // left on disk next to the source.
    let expanded = match expand::expand(&source_path, &lines, &mut log) {
        Ok(text) => text,
        Err(()) => {
            log.print();
            return false;
        },
    };
    if fs::write(&interm_path, &expanded).is_err() {
        eprintln!("Error: Cannot create file {}", interm_path);
        return false;
    }

    let am_lines = source::lines_from_str(&interm_path, &expanded);
    let mut asm = Assembly::new();

    if run_passes(&interm_path, &am_lines, &mut asm, &mut log).is_err() {
        log.print();
        return false;
    }

    if let Err(_) = write_outputs(base, &asm) {
        eprintln!("Error: Cannot write output files for {}", base);
        return false;
    }
    true
}

// The two passes with the relocation step between them.
pub fn run_passes<'a>(file:  &'a str,
                      lines: &[SourceLine<'a>],
                      asm:   &mut Assembly,
                      log:   &mut Messages<'a>)
                     -> Result<(), ()> {
    pass1::run(lines, asm, log)?;

    if asm.code.size() + asm.data.counter() as usize > CODE_CAPACITY {
        log.err_image_overflow(file);
        return Err(());
    }

    // Data sits directly after the final instruction.
    let ic_final = asm.code.counter();
    asm.symbols.relocate_data(ic_final);

    pass2::run(lines, asm, log)
}

fn write_outputs(base: &str, asm: &Assembly) -> io::Result<()> {
    let mut object = File::create(format!("{}.ob", base))?;
    output::write_object(&mut object, &asm.code, &asm.data)?;

    if output::has_entries(&asm.symbols) {
        let mut entries = File::create(format!("{}.ent", base))?;
        output::write_entries(&mut entries, &asm.symbols)?;
    }
    if output::has_externals(&asm.symbols) {
        let mut externals = File::create(format!("{}.ext", base))?;
        output::write_externals(&mut externals, &asm.symbols)?;
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
