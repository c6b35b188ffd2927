// First Pass
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
// Walks the expanded source once: grows the code and data images, records
// symbol definitions, and leaves one reserved slot per symbol-valued
// operand for the second pass to resolve.

use a24::assembler::Assembly;
use a24::lexer::{self, NumError, Scanner};
use a24::message::Messages;
use a24::op::{self, OpCode, OpInfo};
use a24::operand::{self, AddrMode, BadOperand, Operand, Reg};
use a24::source::SourceLine;
use a24::symbol::SymbolKind;
use a24::word::{Are, DataWord, InstructionWord, MachineWord};

pub fn run<'a>(lines: &[SourceLine<'a>],
               asm:   &mut Assembly,
               log:   &mut Messages<'a>)
              -> Result<(), ()> {
    for line in lines {
        process_line(line, asm, log)?;
    }
    Ok(())
}

fn process_line<'a>(line: &SourceLine<'a>,
                    asm:  &mut Assembly,
                    log:  &mut Messages<'a>)
                   -> Result<(), ()> {
    let mut scan = Scanner::new(&line.text);

    scan.skip_whitespace();
    if scan.at_end() || scan.peek() == Some(b';') {
        return Ok(());
    }

    // Optional label
    let mut label = None;
    if let Some(name) = scan.take_label() {
        if !lexer::is_valid_label(name) {
            log.err_label_invalid(line, name);
            return Err(());
        }
        if asm.symbols.lookup(name).is_some() {
            log.err_label_redefined(line, name);
            return Err(());
        }
        label = Some(name);
        scan.skip_whitespace();
    }

    // A label with nothing after it defines no symbol.
    if scan.at_end() {
        return Ok(());
    }

    if scan.peek() == Some(b'.') {
        return process_directive(line, scan, label, asm, log);
    }

    if let Some(name) = label {
        let _ = asm.symbols.define(name, asm.code.counter(), SymbolKind::Code);
    }
    process_instruction(line, scan, asm, log)
}

// -----------------------------------------------------------------------------
// Directives

fn process_directive<'a>(line:  &SourceLine<'a>,
                         mut scan: Scanner,
                         label: Option<&str>,
                         asm:   &mut Assembly,
                         log:   &mut Messages<'a>)
                        -> Result<(), ()> {
    let name = scan.take_directive();
    scan.skip_whitespace();

    match name {
        ".data" | ".string" => {
            if let Some(label) = label {
                let _ = asm.symbols.define(
                    label, asm.data.counter(), SymbolKind::Data
                );
            }
            if name == ".data" {
                process_data(line, scan, asm, log)
            } else {
                process_string(line, scan, asm, log)
            }
        },
        ".extern" => {
            // A label here is accepted and discarded.
            process_extern(line, scan, asm, log)
        },
        ".entry" => {
            if label.is_some() {
                log.err_label_on_entry(line);
                return Err(());
            }
            // The argument is resolved in the second pass.
            Ok(())
        },
        _ => {
            log.err_directive_unknown(line, name);
            Err(())
        },
    }
}

fn process_data<'a>(line: &SourceLine<'a>,
                    mut scan: Scanner,
                    asm:  &mut Assembly,
                    log:  &mut Messages<'a>)
                   -> Result<(), ()> {
    if scan.at_end() {
        log.err_data_empty(line);
        return Err(());
    }

    loop {
        let token = scan.take_operand();
        let value = data_value(line, token, log)?;

        if asm.data.append(value).is_err() {
            log.err_memory_full(line);
            return Err(());
        }

        scan.skip_whitespace();
        if scan.skip_comma() {
            scan.skip_whitespace();
            if scan.peek() == Some(b',') {
                log.err_data_double_comma(line);
                return Err(());
            }
            if scan.at_end() {
                log.err_data_trailing_comma(line);
                return Err(());
            }
        } else if !scan.at_end() {
            log.err_data_expect_comma(line);
            return Err(());
        } else {
            return Ok(());
        }
    }
}

fn data_value<'a>(line:  &SourceLine<'a>,
                  token: &str,
                  log:   &mut Messages<'a>)
                 -> Result<i64, ()> {
    if token.is_empty() {
        log.err_data_empty_number(line);
        return Err(());
    }
    if token == "+" || token == "-" {
        log.err_data_sign(line, token.chars().next().unwrap_or(' '));
        return Err(());
    }

    match lexer::parse_number(token) {
        Ok(value)                   => Ok(value),
        Err(NumError::Malformed)    => {
            log.err_data_number(line, token);
            Err(())
        },
        Err(NumError::OutOfRange)   => {
            log.err_number_range(line, token);
            Err(())
        },
    }
}

fn process_string<'a>(line: &SourceLine<'a>,
                      mut scan: Scanner,
                      asm:  &mut Assembly,
                      log:  &mut Messages<'a>)
                     -> Result<(), ()> {
    if scan.peek() != Some(b'"') {
        log.err_string_open(line);
        return Err(());
    }
    scan.advance(1);

    let rest = scan.rest();
    let content = match rest.find('"') {
        Some(end) => &rest[..end],
        None => {
            log.err_string_close(line);
            return Err(());
        },
    };
    scan.advance(content.len() + 1);

    for c in content.chars() {
        if asm.data.append(c as i64).is_err() {
            log.err_memory_full(line);
            return Err(());
        }
    }
    if asm.data.append(0).is_err() {
        log.err_memory_full(line);
        return Err(());
    }

    scan.skip_whitespace();
    if !scan.at_end() {
        log.err_string_extra(line);
        return Err(());
    }
    Ok(())
}

fn process_extern<'a>(line: &SourceLine<'a>,
                      mut scan: Scanner,
                      asm:  &mut Assembly,
                      log:  &mut Messages<'a>)
                     -> Result<(), ()> {
    let name = scan.take_word();
    if !lexer::is_valid_label(name) {
        log.err_extern_invalid(line, name);
        return Err(());
    }

    // A repeated declaration of the same external is harmless.
    let _ = asm.symbols.define(name, 0, SymbolKind::External);

    scan.skip_whitespace();
    if !scan.at_end() {
        log.err_extern_extra(line);
        return Err(());
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Instructions

fn process_instruction<'a>(line: &SourceLine<'a>,
                           mut scan: Scanner,
                           asm:  &mut Assembly,
                           log:  &mut Messages<'a>)
                          -> Result<(), ()> {
    let mnemonic = scan.take_mnemonic();
    let info = match op::lookup(mnemonic) {
        Some(info) => info,
        None => {
            log.err_op_invalid(line, mnemonic);
            return Err(());
        },
    };

    let texts = scan.take_operands();
    if !scan.at_end() {
        log.err_operand_many(line, mnemonic);
        return Err(());
    }
    check_count(line, info, mnemonic, texts.len(), log)?;

    let mut operands = Vec::with_capacity(texts.len());
    for &text in &texts {
        operands.push(classify_operand(line, text, log)?);
    }

    // Relative addressing is exclusive to the jump group.
    for operand in &operands {
        if operand.mode() == AddrMode::Relative && info.op != OpCode::Jumps {
            log.err_relative_misuse(line);
            return Err(());
        }
    }

    // First word: for a single operand, prn consumes a source while the
    // rest of the one-operand group consume a destination.
    let (src, dest) = match operands.len() {
        2 => (Some(&operands[0]), Some(&operands[1])),
        1 if info.op == OpCode::Prn => (Some(&operands[0]), None),
        1 => (None, Some(&operands[0])),
        _ => (None, None),
    };

    let word = InstructionWord::new(
        info.op, info.func,
        mode_of(src),  reg_of(src),
        mode_of(dest), reg_of(dest),
    );

    let start = asm.code.counter();
    if asm.code.emit(MachineWord::Instruction { word: word, length: 0 }).is_err() {
        log.err_memory_full(line);
        return Err(());
    }

    for operand in &operands {
        extra_word(line, operand, asm, log)?;
    }

    let length = (asm.code.counter() - start) as u8;
    asm.code.set_length(start, length);
    Ok(())
}

fn check_count<'a>(line:     &SourceLine<'a>,
                   info:     &OpInfo,
                   mnemonic: &str,
                   count:    usize,
                   log:      &mut Messages<'a>)
                  -> Result<(), ()> {
    let expected = info.op.operand_count();
    if count == expected {
        return Ok(());
    }

    match expected {
        0 => log.err_operand_none(line, mnemonic),
        1 => log.err_operand_one(line, mnemonic, count),
        _ => log.err_operand_two(line, mnemonic, count),
    }
    Err(())
}

fn classify_operand<'a, 't>(line: &SourceLine<'a>,
                            text: &'t str,
                            log:  &mut Messages<'a>)
                           -> Result<Operand<'t>, ()> {
    match operand::classify(text) {
        Ok(operand) => Ok(operand),
        Err(bad) => {
            match bad {
                BadOperand::EmptyImmediate  => log.err_immediate_missing(line),
                BadOperand::Immediate(rest) => log.err_immediate_invalid(line, rest),
                BadOperand::Register(text)  => log.err_register_invalid(line, text),
                BadOperand::Unrecognized(text) => log.err_operand_invalid(line, text),
            }
            Err(())
        },
    }
}

// Appends the operand's extra word: immediates encode now, symbol-valued
// operands reserve their slot, registers ride in the first word.
fn extra_word<'a>(line:    &SourceLine<'a>,
                  operand: &Operand,
                  asm:     &mut Assembly,
                  log:     &mut Messages<'a>)
                 -> Result<(), ()> {
    let result = match *operand {
        Operand::Immediate(digits) => {
            let value = match lexer::parse_number(digits) {
                Ok(value) => value,
                Err(_) => {
                    log.err_number_range(line, digits);
                    return Err(());
                },
            };
            asm.code.emit(MachineWord::Data(DataWord::new(Are::ABSOLUTE, value)))
        },
        Operand::Direct(_) | Operand::Relative(_) => asm.code.reserve(),
        Operand::Register(_) => return Ok(()),
    };

    if result.is_err() {
        log.err_memory_full(line);
        return Err(());
    }
    Ok(())
}

fn mode_of(operand: Option<&Operand>) -> AddrMode {
    match operand {
        Some(o) => o.mode(),
        None    => AddrMode::None,
    }
}

fn reg_of(operand: Option<&Operand>) -> Option<Reg> {
    operand.and_then(|o| o.register())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use a24::assembler::Assembly;
    use a24::image::Slot;
    use a24::message::Messages;
    use a24::source::{self, SourceLine};
    use a24::symbol::SymbolKind;

    fn lines(text: &str) -> Vec<SourceLine> {
        source::lines_from_str("t.am", text)
    }

    fn pass(text: &str) -> Result<Assembly, String> {
        let src     = lines(text);
        let mut asm = Assembly::new();
        let mut log = Messages::new();

        match run(&src, &mut asm, &mut log) {
            Ok(())  => Ok(asm),
            Err(()) => Err(log.to_string()),
        }
    }

    fn packed(asm: &Assembly, addr: u32) -> u32 {
        match asm.code.slots()[(addr - 100) as usize] {
            Slot::Word(ref w) => w.pack(),
            Slot::Reserved    => panic!("address {} still reserved", addr),
        }
    }

    #[test]
    fn register_pair() {
        let asm = pass("mov r3, r7\n").unwrap();

        assert_eq!(1, asm.code.size());
        assert_eq!(0x037f04, packed(&asm, 100));
        assert_eq!(1, asm.code.length_at(100));
    }

    #[test]
    fn comment_and_blank_lines() {
        let asm = pass("; nothing here\n\n   \n").unwrap();
        assert_eq!(0, asm.code.size());
        assert_eq!(0, asm.data.counter());
    }

    #[test]
    fn data_values() {
        let asm = pass("LIST: .data +5, -3, 0\n").unwrap();

        assert_eq!(&[5, -3, 0], asm.data.values());
        assert_eq!(3, asm.data.counter());

        let sym = asm.symbols.lookup("LIST").unwrap();
        assert_eq!(0, sym.address);
        assert_eq!(SymbolKind::Data, sym.kind);
    }

    #[test]
    fn data_label_at_preappend_counter() {
        let asm = pass(".data 9\nTAIL: .data 7\n").unwrap();
        assert_eq!(1, asm.symbols.lookup("TAIL").unwrap().address);
    }

    #[test]
    fn string_values() {
        let asm = pass("S: .string \"AB\"\n").unwrap();
        assert_eq!(&[65, 66, 0], asm.data.values());
    }

    #[test]
    fn string_without_space_after_directive() {
        let asm = pass(".string\"A\"\n").unwrap();
        assert_eq!(&[65, 0], asm.data.values());
    }

    #[test]
    fn code_label() {
        let asm = pass("stop\nMAIN: mov r1, r2\n").unwrap();

        let sym = asm.symbols.lookup("MAIN").unwrap();
        assert_eq!(101, sym.address);
        assert_eq!(SymbolKind::Code, sym.kind);
    }

    #[test]
    fn label_only_line_is_dropped() {
        let asm = pass("LONE:\nstop\n").unwrap();
        assert!(asm.symbols.lookup("LONE").is_none());
    }

    #[test]
    fn immediate_encodes_in_pass_one() {
        let asm = pass("mov #5, r2\n").unwrap();

        assert_eq!(2, asm.code.size());
        assert_eq!(2, asm.code.length_at(100));
        assert_eq!(0x00002c, packed(&asm, 101));
    }

    #[test]
    fn negative_immediate() {
        let asm = pass("cmp #-1, r2\n").unwrap();
        assert_eq!(0xfffffc, packed(&asm, 101));
    }

    #[test]
    fn direct_operand_reserves_slot() {
        let asm = pass("mov r1, X\n").unwrap();

        assert_eq!(2, asm.code.size());
        assert_eq!(Slot::Reserved, asm.code.slots()[1]);
        assert_eq!(2, asm.code.length_at(100));
    }

    #[test]
    fn two_symbol_operands_reserve_two_slots() {
        let asm = pass("lea SRC, DST\n").unwrap();

        assert_eq!(3, asm.code.size());
        assert_eq!(3, asm.code.length_at(100));
        assert_eq!(Slot::Reserved, asm.code.slots()[1]);
        assert_eq!(Slot::Reserved, asm.code.slots()[2]);
    }

    #[test]
    fn extern_declaration() {
        let asm = pass(".extern X\n").unwrap();

        let sym = asm.symbols.lookup("X").unwrap();
        assert_eq!(0, sym.address);
        assert_eq!(SymbolKind::External, sym.kind);
    }

    #[test]
    fn extern_label_is_discarded() {
        let asm = pass("L: .extern X\n").unwrap();
        assert!(asm.symbols.lookup("L").is_none());
    }

    #[test]
    fn extern_duplicate_is_ignored() {
        let asm = pass(".extern X\n.extern X\n").unwrap();
        assert_eq!(1, asm.symbols.entries().len());
    }

    #[test]
    fn entry_line_is_deferred() {
        let asm = pass(".entry SOMEWHERE\n").unwrap();
        assert!(asm.symbols.entries().is_empty());
    }

    #[test]
    fn operands_without_comma_are_accepted() {
        let asm = pass("mov r1 r2\n").unwrap();
        assert_eq!(1, asm.code.size());
    }

    // Error cases

    #[test]
    fn rejects_unknown_operation() {
        assert!(pass("foo r1\n").unwrap_err().contains("Invalid operation: foo"));
    }

    #[test]
    fn rejects_unknown_directive() {
        assert!(pass(".datax 1\n").unwrap_err().contains("Unknown directive: .datax"));
    }

    #[test]
    fn rejects_invalid_label() {
        assert!(pass("1st: stop\n").unwrap_err().contains("Invalid label name"));
    }

    #[test]
    fn rejects_redefined_label() {
        let err = pass("X: stop\nX: stop\n").unwrap_err();
        assert!(err.contains("Label X already defined"));
        assert!(err.contains("line 2"));
    }

    #[test]
    fn rejects_label_on_entry() {
        let err = pass("L: .entry X\n").unwrap_err();
        assert!(err.contains("Cannot define label for .entry"));
    }

    #[test]
    fn rejects_operand_count_mismatch() {
        assert!(pass("rts r1\n").unwrap_err().contains("does not accept any operands"));
        assert!(pass("clr\n").unwrap_err().contains("exactly one operand, got 0"));
        assert!(pass("mov r1\n").unwrap_err().contains("exactly two operands, got 1"));
        assert!(pass("mov r1, r2, r3\n").unwrap_err().contains("Too many operands for mov"));
    }

    #[test]
    fn rejects_bad_operands() {
        assert!(pass("prn #\n").unwrap_err().contains("Missing number after #"));
        assert!(pass("prn #x\n").unwrap_err().contains("Invalid immediate value"));
        assert!(pass("clr r8\n").unwrap_err().contains("must be r0-r7"));
        assert!(pass("clr 1x\n").unwrap_err().contains("Invalid operand"));
    }

    #[test]
    fn rejects_relative_outside_jumps() {
        let err = pass("mov &X, r1\n").unwrap_err();
        assert!(err.contains("jump instructions"));
    }

    #[test]
    fn accepts_relative_on_jumps() {
        let asm = pass("jmp &LOOP\nLOOP: stop\n").unwrap();
        assert_eq!(Slot::Reserved, asm.code.slots()[1]);
    }

    #[test]
    fn rejects_data_syntax() {
        assert!(pass(".data\n").unwrap_err().contains("Empty .data"));
        assert!(pass(".data 1,,2\n").unwrap_err().contains("consecutive commas"));
        assert!(pass(".data 1,\n").unwrap_err().contains("Trailing comma"));
        assert!(pass(".data 1 2\n").unwrap_err().contains("Expected comma"));
        assert!(pass(".data +\n").unwrap_err().contains("Sign '+' without a number"));
        assert!(pass(".data 1a\n").unwrap_err().contains("Invalid number '1a'"));
    }

    #[test]
    fn rejects_string_syntax() {
        assert!(pass(".string AB\"\n").unwrap_err().contains("begin with quote"));
        assert!(pass(".string \"AB\n").unwrap_err().contains("end with quote"));
        assert!(pass(".string \"AB\" junk\n").unwrap_err().contains("after string"));
    }

    #[test]
    fn rejects_extern_syntax() {
        assert!(pass(".extern 1x\n").unwrap_err().contains("Invalid external label"));
        assert!(pass(".extern X Y\n").unwrap_err().contains("after external label"));
    }
}
