// Messages
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

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::io::{stderr, Write};

use a24::source::SourceLine;

use self::MessageId::*;

#[derive(Clone, Debug)]
pub struct Messages<'a> {
    messages: Vec<Message<'a>>,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Message<'a> {
    pub file: &'a str,          // file the message concerns
    pub line: Option<u32>,      // line number; None for file-scoped messages
    pub id:   MessageId,
    pub text: Cow<'static, str>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum MessageId {
    // Lexical Messages
    LineTooLong,

    // Macro Expansion Messages
    MacroNested,
    MacroName,
    MacroExtra,
    MacroDuplicate,
    MacroStrayEnd,
    MacroLimit,
    MacroBody,
    MacroUnterminated,

    // Label Messages
    LabelInvalid,
    LabelRedefined,
    LabelOnEntry,

    // Directive Messages
    DirectiveUnknown,
    DataEmpty,
    DataNumber,
    DataSign,
    DataComma,
    NumberRange,
    StringQuote,
    StringExtra,
    ExternInvalid,
    ExternExtra,

    // Instruction Messages
    OpInvalid,
    OperandCount,
    OperandSyntax,
    ModeMisuse,

    // Resolution Messages
    SymUndefined,
    SymConflict,

    // Capacity Messages
    MemoryFull,
}

impl<'a> Messages<'a> {
    pub fn new() -> Self {
        Messages { messages: vec![] }
    }

    pub fn has_errors(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.messages.len()
    }

    fn add<T>(&mut self, file: &'a str, line: Option<u32>, id: MessageId, text: T)
             where T: Into<Cow<'static, str>> {
        self.messages.push(Message {
            file: file, line: line, id: id, text: text.into()
        });
    }

    fn at<T>(&mut self, line: &SourceLine<'a>, id: MessageId, text: T)
            where T: Into<Cow<'static, str>> {
        self.add(line.file, Some(line.num), id, text);
    }

    // Lexical

    pub fn err_line_too_long(&mut self, line: &SourceLine<'a>) {
        self.at(line, LineTooLong, "Line exceeds 80 characters");
    }

    // Macro expansion

    pub fn err_macro_nested(&mut self, line: &SourceLine<'a>) {
        self.at(line, MacroNested, "Nested macro definition not allowed");
    }

    pub fn err_macro_name_missing(&mut self, line: &SourceLine<'a>) {
        self.at(line, MacroName, "Missing macro name");
    }

    pub fn err_macro_name_invalid(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, MacroName, format!(
            "Invalid macro name '{}'", name
        ));
    }

    pub fn err_macro_extra_name(&mut self, line: &SourceLine<'a>) {
        self.at(line, MacroExtra, "Extra content after macro name not allowed");
    }

    pub fn err_macro_extra_end(&mut self, line: &SourceLine<'a>) {
        self.at(line, MacroExtra, "Extra content after mcroend not allowed");
    }

    pub fn err_macro_duplicate(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, MacroDuplicate, format!(
            "Macro '{}' already defined", name
        ));
    }

    pub fn err_macro_stray_end(&mut self, line: &SourceLine<'a>) {
        self.at(line, MacroStrayEnd, "'mcroend' without matching 'mcro'");
    }

    pub fn err_macro_limit(&mut self, line: &SourceLine<'a>) {
        self.at(line, MacroLimit, "Too many macros defined");
    }

    pub fn err_macro_body_limit(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, MacroBody, format!(
            "Too many lines in macro '{}'", name
        ));
    }

    pub fn err_macro_unterminated(&mut self, file: &'a str) {
        self.add(file, None, MacroUnterminated,
            "Unclosed macro definition at end of file"
        );
    }

    // Labels

    pub fn err_label_invalid(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, LabelInvalid, format!(
            "Invalid label name: {}", name
        ));
    }

    pub fn err_label_redefined(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, LabelRedefined, format!(
            "Label {} already defined", name
        ));
    }

    pub fn err_label_on_entry(&mut self, line: &SourceLine<'a>) {
        self.at(line, LabelOnEntry, "Cannot define label for .entry directive");
    }

    // Directives

    pub fn err_directive_unknown(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, DirectiveUnknown, format!(
            "Unknown directive: {}", name
        ));
    }

    pub fn err_data_empty(&mut self, line: &SourceLine<'a>) {
        self.at(line, DataEmpty, "Empty .data directive");
    }

    pub fn err_data_number(&mut self, line: &SourceLine<'a>, token: &str) {
        self.at(line, DataNumber, format!(
            "Invalid number '{}' - only digits allowed (with optional +/- prefix)",
            token
        ));
    }

    pub fn err_data_sign(&mut self, line: &SourceLine<'a>, sign: char) {
        self.at(line, DataSign, format!(
            "Sign '{}' without a number", sign
        ));
    }

    pub fn err_data_empty_number(&mut self, line: &SourceLine<'a>) {
        self.at(line, DataNumber, "Empty number after comma");
    }

    pub fn err_data_double_comma(&mut self, line: &SourceLine<'a>) {
        self.at(line, DataComma, "Multiple consecutive commas found");
    }

    pub fn err_data_trailing_comma(&mut self, line: &SourceLine<'a>) {
        self.at(line, DataComma, "Trailing comma with no number");
    }

    pub fn err_data_expect_comma(&mut self, line: &SourceLine<'a>) {
        self.at(line, DataComma, "Expected comma between numbers");
    }

    pub fn err_number_range(&mut self, line: &SourceLine<'a>, token: &str) {
        self.at(line, NumberRange, format!(
            "Number '{}' out of range", token
        ));
    }

    pub fn err_string_open(&mut self, line: &SourceLine<'a>) {
        self.at(line, StringQuote, "String must begin with quote");
    }

    pub fn err_string_close(&mut self, line: &SourceLine<'a>) {
        self.at(line, StringQuote, "String must end with quote");
    }

    pub fn err_string_extra(&mut self, line: &SourceLine<'a>) {
        self.at(line, StringExtra, "Unexpected content after string");
    }

    pub fn err_extern_invalid(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, ExternInvalid, format!(
            "Invalid external label: {}", name
        ));
    }

    pub fn err_extern_extra(&mut self, line: &SourceLine<'a>) {
        self.at(line, ExternExtra, "Unexpected content after external label");
    }

    pub fn err_entry_missing(&mut self, line: &SourceLine<'a>) {
        self.at(line, SymUndefined, "Missing label name for .entry directive");
    }

    pub fn err_entry_invalid(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, LabelInvalid, format!(
            "Invalid entry label: {}", name
        ));
    }

    pub fn err_entry_conflict(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, SymConflict, format!(
            "Symbol {} cannot be both external and entry", name
        ));
    }

    pub fn err_entry_undefined(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, SymUndefined, format!(
            "Undefined symbol {} for .entry", name
        ));
    }

    // Instructions

    pub fn err_op_invalid(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, OpInvalid, format!(
            "Invalid operation: {}", name
        ));
    }

    pub fn err_operand_none(&mut self, line: &SourceLine<'a>, op: &str) {
        self.at(line, OperandCount, format!(
            "Operation '{}' does not accept any operands", op
        ));
    }

    pub fn err_operand_one(&mut self, line: &SourceLine<'a>, op: &str, count: usize) {
        self.at(line, OperandCount, format!(
            "Operation '{}' requires exactly one operand, got {}", op, count
        ));
    }

    pub fn err_operand_two(&mut self, line: &SourceLine<'a>, op: &str, count: usize) {
        self.at(line, OperandCount, format!(
            "Operation '{}' requires exactly two operands, got {}", op, count
        ));
    }

    pub fn err_operand_many(&mut self, line: &SourceLine<'a>, op: &str) {
        self.at(line, OperandCount, format!(
            "Too many operands for {}", op
        ));
    }

    pub fn err_immediate_missing(&mut self, line: &SourceLine<'a>) {
        self.at(line, OperandSyntax, "Missing number after #");
    }

    pub fn err_immediate_invalid(&mut self, line: &SourceLine<'a>, text: &str) {
        self.at(line, OperandSyntax, format!(
            "Invalid immediate value '{}', must be a valid number", text
        ));
    }

    pub fn err_register_invalid(&mut self, line: &SourceLine<'a>, text: &str) {
        self.at(line, OperandSyntax, format!(
            "Invalid register '{}', must be r0-r7", text
        ));
    }

    pub fn err_operand_invalid(&mut self, line: &SourceLine<'a>, text: &str) {
        self.at(line, OperandSyntax, format!(
            "Invalid operand: {}", text
        ));
    }

    pub fn err_relative_misuse(&mut self, line: &SourceLine<'a>) {
        self.at(line, ModeMisuse,
            "Relative addressing (&) can only be used with jump \
             instructions (jmp, bne, jsr)"
        );
    }

    pub fn err_relative_target(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, ModeMisuse, format!(
            "Symbol {} must be a code label for relative addressing", name
        ));
    }

    // Resolution

    pub fn err_sym_undefined(&mut self, line: &SourceLine<'a>, name: &str) {
        self.at(line, SymUndefined, format!(
            "Undefined symbol: {}", name
        ));
    }

    // Capacity

    pub fn err_memory_full(&mut self, line: &SourceLine<'a>) {
        self.at(line, MemoryFull, "Out of memory: program exceeds machine capacity");
    }

    pub fn err_image_overflow(&mut self, file: &'a str) {
        self.add(file, None, MemoryFull,
            "Out of memory: code and data exceed machine capacity"
        );
    }

    pub fn print(&self) {
        let r = write!(stderr(), "{}", self);
        if let Err(_) = r { /*ignore*/ }
    }
}

impl<'a> Display for Messages<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for m in &self.messages {
            writeln!(f, "{}", m)?;
        }
        Ok(())
    }
}

impl<'a> Display for Message<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(n) => write!(f, "Error in {} line {}: {}", self.file, n, self.text),
            None    => write!(f, "Error: {}", self.text),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
