// Symbol Table
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

use self::SymbolKind::*;

// -----------------------------------------------------------------------------
// Symbols
//
// A name is defined at most once.  Entries of kind External come in two
// flavours sharing one representation: the declaration (address 0, from
// .extern) and reference records appended by the second pass (address of
// the operand word that uses the symbol).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    Code,
    Data,
    Entry,
    External,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SymbolEntry {
    pub name:    String,
    pub address: u32,
    pub kind:    SymbolKind,
}

// -----------------------------------------------------------------------------
// SymbolTable - insertion-ordered; linear lookup

#[derive(Clone, Debug)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn define(&mut self, name: &str, address: u32, kind: SymbolKind)
                 -> Result<(), ()> {
        if self.lookup(name).is_some() {
            return Err(());
        }
        self.entries.push(SymbolEntry {
            name:    name.to_string(),
            address: address,
            kind:    kind,
        });
        Ok(())
    }

    // First entry by name; definitions precede reference records, so this
    // always finds the defining entry when one exists.
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn lookup_kind(&self, name: &str, kind: SymbolKind) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.name == name && e.kind == kind)
    }

    fn lookup_kind_mut(&mut self, name: &str, kind: SymbolKind)
                      -> Option<&mut SymbolEntry> {
        self.entries.iter_mut().find(|e| e.name == name && e.kind == kind)
    }

    // Re-classifies a Code or Data definition as an exported entry point.
    pub fn promote_entry(&mut self, name: &str) -> bool {
        if let Some(entry) = self.lookup_kind_mut(name, Code) {
            entry.kind = Entry;
            return true;
        }
        if let Some(entry) = self.lookup_kind_mut(name, Data) {
            entry.kind = Entry;
            return true;
        }
        false
    }

    // Appends a use of an external symbol; not a definition, so no
    // uniqueness check applies.
    pub fn add_reference(&mut self, name: &str, address: u32) {
        self.entries.push(SymbolEntry {
            name:    name.to_string(),
            address: address,
            kind:    External,
        });
    }

    // Shifts the data segment to sit directly after the code segment.
    pub fn relocate_data(&mut self, offset: u32) {
        for entry in &mut self.entries {
            if entry.kind == Data {
                entry.address += offset;
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use super::SymbolKind::*;

    #[test]
    fn define_and_lookup() {
        let mut t = SymbolTable::new();

        assert_eq!(Ok(()), t.define("MAIN", 100, Code));
        assert_eq!(Ok(()), t.define("LIST", 0, Data));

        let e = t.lookup("MAIN").unwrap();
        assert_eq!(100,  e.address);
        assert_eq!(Code, e.kind);

        assert!(t.lookup("OTHER").is_none());
    }

    #[test]
    fn define_duplicate() {
        let mut t = SymbolTable::new();

        assert_eq!(Ok(()),  t.define("X", 100, Code));
        assert_eq!(Err(()), t.define("X", 0, Data));
        assert_eq!(Err(()), t.define("X", 0, External));
    }

    #[test]
    fn lookup_by_kind() {
        let mut t = SymbolTable::new();
        t.define("X", 100, Code).unwrap();

        assert!(t.lookup_kind("X", Code).is_some());
        assert!(t.lookup_kind("X", Data).is_none());
    }

    #[test]
    fn promote() {
        let mut t = SymbolTable::new();
        t.define("A", 105, Code).unwrap();
        t.define("B", 3, Data).unwrap();

        assert_eq!(true, t.promote_entry("A"));
        assert_eq!(true, t.promote_entry("B"));
        assert_eq!(false, t.promote_entry("C"));

        assert_eq!(Entry, t.lookup("A").unwrap().kind);
        assert_eq!(105,   t.lookup("A").unwrap().address);
        assert_eq!(Entry, t.lookup("B").unwrap().kind);
    }

    #[test]
    fn promote_skips_external() {
        let mut t = SymbolTable::new();
        t.define("X", 0, External).unwrap();

        assert_eq!(false, t.promote_entry("X"));
        assert_eq!(External, t.lookup("X").unwrap().kind);
    }

    #[test]
    fn references_share_a_name() {
        let mut t = SymbolTable::new();
        t.define("X", 0, External).unwrap();

        t.add_reference("X", 104);
        t.add_reference("X", 109);

        assert_eq!(3, t.entries().len());
        // lookup still resolves to the declaration
        assert_eq!(0, t.lookup("X").unwrap().address);
        assert_eq!(104, t.entries()[1].address);
        assert_eq!(109, t.entries()[2].address);
    }

    #[test]
    fn relocation() {
        let mut t = SymbolTable::new();
        t.define("MAIN", 100, Code).unwrap();
        t.define("LIST", 4, Data).unwrap();
        t.define("X", 0, External).unwrap();

        t.relocate_data(120);

        assert_eq!(100, t.lookup("MAIN").unwrap().address);
        assert_eq!(124, t.lookup("LIST").unwrap().address);
        assert_eq!(0,   t.lookup("X").unwrap().address);
    }
}
