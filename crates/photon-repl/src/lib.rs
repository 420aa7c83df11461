//! The interactive REPL (spec §6), ground-truthed on
//! `examples/original_source/core/interpreter.py`'s `Interpreter.console`/
//! `getBlock`/`handleBlock`/`handleTokenized`/`run`: a block is not closed by
//! a blank line, it is closed by the next logical line's indentation falling
//! back to (or below) the statement that opened it, with an `elif`/`else` at
//! that same indent folded into the same statement before the block
//! genuinely ends.

use log::warn;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use photon_common::{PhotonError, PhotonResult};
use photon_engine::{Engine, EngineConfig};
use photon_parser::{assembly, LineAssembler, LogicalLine};

const PROMPT: &str = ">>> ";
const CONTINUATION_PROMPT: &str = "... ";

/// One REPL session: a persistent [`Engine`] plus whatever input state
/// survives between statements (a line read ahead of time because it turned
/// out to belong to the *next* statement, mirroring `self.line`).
pub struct Repl {
    engine: Engine,
    filename: String,
    debug: bool,
    assembler: LineAssembler,
    pending: Option<LogicalLine>,
    line_no: u32,
}

impl Repl {
    pub fn new(config: EngineConfig) -> Self {
        let debug = config.debug;
        Repl {
            engine: Engine::new(config, "<stdin>"),
            filename: "<stdin>".to_string(),
            debug,
            assembler: LineAssembler::new(),
            pending: None,
            line_no: 0,
        }
    }

    /// Drive the session to completion: read statements from the terminal,
    /// process each against the engine, and report (without crashing the
    /// session) any error that comes back -- `run()`'s `showError` behavior.
    pub fn run(&mut self) -> PhotonResult<()> {
        let mut editor = DefaultEditor::new().map_err(readline_err)?;
        loop {
            let lines = match self.next_statement(&mut editor)? {
                Some(lines) => lines,
                None => break,
            };
            let source: String = lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n");
            match assembly(&lines, &self.filename, self.debug, 0) {
                Ok(blocks) => {
                    if let Err(err) = self.engine.run(&blocks) {
                        err.eprint(&source);
                    }
                }
                Err(err) => err.eprint(&source),
            }
        }
        Ok(())
    }

    /// Gather every [`LogicalLine`] belonging to one top-level statement,
    /// recursing into nested blocks by indentation the way `getBlock` does.
    /// Returns `None` at end of input or on the literal `exit` statement.
    fn next_statement(&mut self, editor: &mut DefaultEditor) -> PhotonResult<Option<Vec<LogicalLine>>> {
        let first = match self.take_line(editor, PROMPT)? {
            Some(line) => line,
            None => return Ok(None),
        };
        if first.text.trim() == "exit" {
            return Ok(None);
        }
        let base_indent = first.indent;
        let mut lines = vec![first];
        if !opens_block(&lines[0].text) {
            return Ok(Some(lines));
        }
        loop {
            match self.take_line(editor, CONTINUATION_PROMPT)? {
                Some(next) if next.indent > base_indent => lines.push(next),
                Some(next) if next.indent == base_indent && continues_chain(&next.text) => lines.push(next),
                Some(next) => {
                    self.pending = Some(next);
                    break;
                }
                None => break,
            }
        }
        Ok(Some(lines))
    }

    /// One logical line: whatever is buffered from the previous statement's
    /// lookahead, or freshly read from the terminal (joining physical lines
    /// across an open bracket as `LineAssembler` does for file mode too).
    fn take_line(&mut self, editor: &mut DefaultEditor, prompt: &str) -> PhotonResult<Option<LogicalLine>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        loop {
            let raw = match editor.readline(prompt) {
                Ok(raw) => raw,
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(None),
                Err(e) => return Err(readline_err(e)),
            };
            let _ = editor.add_history_entry(raw.as_str());
            self.line_no += 1;
            if let Some(logical) = self.assembler.push(&raw, self.line_no) {
                return Ok(Some(logical));
            }
        }
    }
}

/// Whether `text` opens an indented block, i.e. ends a `:` (every block
/// header in the source language does -- `if`/`for`/`while`/`def`/`class`/
/// `elif`/`else`).
fn opens_block(text: &str) -> bool {
    text.trim_end().ends_with(':')
}

/// Whether `text` is an `elif`/`else` header, which folds into the
/// enclosing `if` chain rather than starting a new top-level statement even
/// though it sits back at the chain's own indent.
fn continues_chain(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with("elif ") || trimmed.starts_with("elif(") || trimmed == "else:" || trimmed.starts_with("else:")
}

fn readline_err(e: ReadlineError) -> PhotonError {
    warn!("readline failure: {e}");
    PhotonError::Io { path: std::path::PathBuf::from("<stdin>"), reason: e.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_plain_statement_does_not_open_a_block() {
        assert!(!opens_block("x = 1"));
    }

    #[test]
    fn an_if_header_opens_a_block() {
        assert!(opens_block("if x > 0:"));
    }

    #[test]
    fn an_elif_header_continues_the_chain() {
        assert!(continues_chain("elif x < 0:"));
        assert!(!continues_chain("if x > 0:"));
    }
}
