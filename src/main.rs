// A24 - a two-pass assembler for a 24-bit register machine
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

#[macro_use]
extern crate bitflags;
extern crate num;

mod a24;

use std::env;
use std::process;

use a24::assembler;

fn main() {
    let bases: Vec<String> = env::args().skip(1).collect();

    if bases.is_empty() {
        eprintln!("Usage: a24 <base> [<base> ...]");
        process::exit(1);
    }

    let mut success = true;
    for base in &bases {
        if !assembler::assemble_file(base) {
            success = false;
        }
    }

    process::exit(if success { 0 } else { 1 });
}
