// Source Lines
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
use std::io::{self, BufRead, BufReader, Read};

// Longest line an input file may contain, in bytes, excluding the
// line terminator.
pub const MAX_LINE: usize = 80;

// -----------------------------------------------------------------------------
// SourceLine - one line of an input file, as read

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SourceLine<'a> {
    pub file: &'a str,  // originating file name
    pub num:  u32,      // 1-based line number
    pub text: String,   // content, without terminator
}

impl<'a> SourceLine<'a> {
    pub fn new(file: &'a str, num: u32, text: &str) -> Self {
        SourceLine { file: file, num: num, text: text.to_string() }
    }
}

impl<'a> Display for SourceLine<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.num)
    }
}

// -----------------------------------------------------------------------------
// Readers

pub fn read_lines<'a, R: Read>(file: &'a str, reader: R)
                              -> io::Result<Vec<SourceLine<'a>>> {
    let mut lines = Vec::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let text = line?;
        lines.push(SourceLine { file: file, num: index as u32 + 1, text: text });
    }

    Ok(lines)
}

pub fn lines_from_str<'a>(file: &'a str, text: &str) -> Vec<SourceLine<'a>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| SourceLine::new(file, index as u32 + 1, line))
        .collect()
}

// -----------------------------------------------------------------------------
// Tests
