// Macro Expansion
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

use a24::lexer::{self, Scanner};
use a24::message::Messages;
use a24::op;
use a24::source::{SourceLine, MAX_LINE};

use self::State::*;

pub const MAX_MACROS:      usize = 50;
pub const MAX_MACRO_LINES: usize = 100;

// -----------------------------------------------------------------------------
// MacroTable - per-file; created for one expansion and dropped with it

#[derive(Clone, Debug)]
pub struct Macro {
    name:  String,
    lines: Vec<String>,     // body lines as captured, terminators stripped
}

#[derive(Clone, Debug)]
pub struct MacroTable {
    macros: Vec<Macro>,
}

impl MacroTable {
    pub fn new() -> Self {
        MacroTable { macros: Vec::new() }
    }

    fn find(&self, name: &str) -> Option<&Macro> {
        self.macros.iter().find(|m| m.name == name)
    }

    fn is_full(&self) -> bool {
        self.macros.len() >= MAX_MACROS
    }

    fn open(&mut self, name: &str) {
        self.macros.push(Macro { name: name.to_string(), lines: Vec::new() });
    }

    // Appends to the macro currently being defined.
    fn capture(&mut self, text: &str) -> Result<(), ()> {
        let current = match self.macros.last_mut() {
            Some(m) => m,
            None    => return Err(()),
        };
        if current.lines.len() >= MAX_MACRO_LINES {
            return Err(());
        }
        current.lines.push(text.to_string());
        Ok(())
    }

    fn current_name(&self) -> &str {
        match self.macros.last() {
            Some(m) => &m.name,
            None    => "",
        }
    }
}

// Names that cannot become macros.
fn is_reserved(name: &str) -> bool {
    name == "mcro" || name == "mcroend" || op::is_mnemonic(name)
}

// -----------------------------------------------------------------------------
// Expansion

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
enum State {
    Outside,
    InBody,
}

// Rewrites the source into macro-free text.  Definitions are removed,
// invocations are replaced by the captured body, everything else copies
// through unchanged.
pub fn expand<'a>(file:  &'a str,
                  lines: &[SourceLine<'a>],
                  log:   &mut Messages<'a>)
                 -> Result<String, ()> {
    let mut table = MacroTable::new();
    let mut out   = String::new();
    let mut state = Outside;

    for line in lines {
        if line.text.len() > MAX_LINE {
            log.err_line_too_long(line);
            return Err(());
        }

        let trimmed = line.text.trim();
        let keyword = first_token(trimmed);

        if state == InBody {
            match keyword {
                "mcroend" => {
                    if !only_token(trimmed, keyword) {
                        log.err_macro_extra_end(line);
                        return Err(());
                    }
                    state = Outside;
                },
                "mcro" => {
                    log.err_macro_nested(line);
                    return Err(());
                },
                _ => {
                    if table.capture(&line.text).is_err() {
                        let name = table.current_name().to_string();
                        log.err_macro_body_limit(line, &name);
                        return Err(());
                    }
                },
            }
            continue;
        }

        // Outside any definition
        if trimmed.is_empty() || trimmed.starts_with(';') {
            push_line(&mut out, &line.text);
            continue;
        }

        match keyword {
            "mcro" => {
                define(line, trimmed, &mut table, log)?;
                state = InBody;
            },
            "mcroend" => {
                log.err_macro_stray_end(line);
                return Err(());
            },
            _ => {
                match table.find(trimmed) {
                    Some(mac) => {
                        for body_line in &mac.lines {
                            push_line(&mut out, body_line);
                        }
                    },
                    None => push_line(&mut out, &line.text),
                }
            },
        }
    }

    if state == InBody {
        log.err_macro_unterminated(file);
        return Err(());
    }

    Ok(out)
}

// Validates and registers the name on a `mcro` line.
fn define<'a>(line:    &SourceLine<'a>,
              trimmed: &str,
              table:   &mut MacroTable,
              log:     &mut Messages<'a>)
             -> Result<(), ()> {
    let mut scan = Scanner::new(trimmed);
    scan.take_word();                       // the `mcro` keyword itself
    scan.skip_whitespace();

    let name = scan.take_word();
    if name.is_empty() {
        log.err_macro_name_missing(line);
        return Err(());
    }

    scan.skip_whitespace();
    if !scan.at_end() {
        log.err_macro_extra_name(line);
        return Err(());
    }

    if table.is_full() {
        log.err_macro_limit(line);
        return Err(());
    }
    if !lexer::is_valid_identifier(name) || is_reserved(name) {
        log.err_macro_name_invalid(line, name);
        return Err(());
    }
    if table.find(name).is_some() {
        log.err_macro_duplicate(line, name);
        return Err(());
    }

    table.open(name);
    Ok(())
}

fn first_token(text: &str) -> &str {
    let mut scan = Scanner::new(text);
    scan.take_word()
}

// True when the line holds the given token and nothing more.
fn only_token(text: &str, token: &str) -> bool {
    text[token.len()..].trim().is_empty()
}

fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use a24::message::Messages;
    use a24::source::{self, SourceLine};

    fn lines(text: &str) -> Vec<SourceLine> {
        source::lines_from_str("t.as", text)
    }

    fn run(text: &str) -> Result<String, String> {
        let src     = lines(text);
        let mut log = Messages::new();

        match expand("t.as", &src, &mut log) {
            Ok(out) => Ok(out),
            Err(()) => Err(log.to_string()),
        }
    }

    #[test]
    fn copies_plain_text() {
        let text = "; comment\n\nMAIN: mov r1, r2\n";
        assert_eq!(text, run(text).unwrap());
    }

    #[test]
    fn expands_invocation() {
        let out = run("mcro greet\nprn r0\nmcroend\ngreet\n").unwrap();
        assert_eq!("prn r0\n", out);
    }

    #[test]
    fn preserves_body_verbatim() {
        let out = run("mcro m\n\tmov r1 , r2\n  stop\nmcroend\nm\n").unwrap();
        assert_eq!("\tmov r1 , r2\n  stop\n", out);
    }

    #[test]
    fn expands_repeated_invocations() {
        let out = run("mcro m\ninc r3\nmcroend\nm\nrts\nm\n").unwrap();
        assert_eq!("inc r3\nrts\ninc r3\n", out);
    }

    #[test]
    fn captures_blank_and_comment_body_lines() {
        let out = run("mcro m\n; note\n\ndec r1\nmcroend\nm\n").unwrap();
        assert_eq!("; note\n\ndec r1\n", out);
    }

    #[test]
    fn invocation_requires_whole_line() {
        let out = run("mcro m\nstop\nmcroend\nm extra\n").unwrap();
        assert_eq!("m extra\n", out);
    }

    #[test]
    fn invocation_allows_leading_whitespace() {
        let out = run("mcro m\nstop\nmcroend\n   m\n").unwrap();
        assert_eq!("stop\n", out);
    }

    #[test]
    fn idempotent_on_macro_free_text() {
        let text = "MAIN: add r1, r2\n.data 1, 2\nstop\n";
        let once  = run(text).unwrap();
        let twice = run(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(text, once);
    }

    #[test]
    fn rejects_nested_definition() {
        let err = run("mcro a\nmcro b\nmcroend\n").unwrap_err();
        assert!(err.contains("Nested macro definition"));
        assert!(err.contains("line 2"));
    }

    #[test]
    fn rejects_duplicate() {
        let err = run("mcro m\nmcroend\nmcro m\nmcroend\n").unwrap_err();
        assert!(err.contains("already defined"));
    }

    #[test]
    fn rejects_missing_name() {
        let err = run("mcro\nmcroend\n").unwrap_err();
        assert!(err.contains("Missing macro name"));
    }

    #[test]
    fn rejects_reserved_name() {
        assert!(run("mcro mov\nmcroend\n").unwrap_err().contains("Invalid macro name"));
        assert!(run("mcro mcroend\n").unwrap_err().contains("Invalid macro name"));
        assert!(run("mcro 1up\nmcroend\n").unwrap_err().contains("Invalid macro name"));
    }

    #[test]
    fn accepts_underscore_name() {
        let out = run("mcro do_stop\nstop\nmcroend\ndo_stop\n").unwrap();
        assert_eq!("stop\n", out);
    }

    #[test]
    fn rejects_trailing_content() {
        assert!(run("mcro m extra\n").unwrap_err().contains("after macro name"));
        assert!(run("mcro m\nstop\nmcroend extra\n").unwrap_err().contains("after mcroend"));
    }

    #[test]
    fn rejects_stray_end() {
        let err = run("mcroend\n").unwrap_err();
        assert!(err.contains("without matching"));
    }

    #[test]
    fn rejects_unterminated() {
        let err = run("mcro m\nstop\n").unwrap_err();
        assert!(err.contains("Unclosed macro definition"));
    }

    #[test]
    fn rejects_too_many_macros() {
        let mut text = String::new();
        for i in 0..(MAX_MACROS + 1) {
            text.push_str(&format!("mcro m{}\nstop\nmcroend\n", i));
        }
        let err = run(&text).unwrap_err();
        assert!(err.contains("Too many macros"));
    }

    #[test]
    fn rejects_oversized_body() {
        let mut text = String::from("mcro m\n");
        for _ in 0..(MAX_MACRO_LINES + 1) {
            text.push_str("inc r1\n");
        }
        text.push_str("mcroend\n");
        let err = run(&text).unwrap_err();
        assert!(err.contains("Too many lines in macro 'm'"));
    }

    #[test]
    fn rejects_long_line() {
        let mut text = String::new();
        for _ in 0..81 { text.push('x'); }
        text.push('\n');
        let err = run(&text).unwrap_err();
        assert!(err.contains("exceeds 80"));
    }
}
