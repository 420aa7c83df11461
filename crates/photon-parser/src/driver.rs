//! The top-level driver (spec §4.B), ground-truthed on `interpreter.py`'s
//! `Interpreter.file`/`console`/`run`: feeds physical lines through the
//! [`LineAssembler`] and [`block::assemble`], one source at a time, whether
//! that source is a file on disk or an interactive REPL.

use std::fs;
use std::path::Path;

use photon_common::{PhotonError, PhotonResult};

use crate::assembler::LineAssembler;
use crate::block::{self, Block};

/// Where logical lines come from: a file already read into memory, or an
/// interactive prompt that hands lines over one at a time. The REPL
/// (`photon-repl`) implements [`LineSource`] itself to drive this
/// incrementally; `photon-cli`'s file mode uses [`parse_file`] directly.
pub trait LineSource {
    /// Returns the next physical line, or `None` at end of input.
    fn next_line(&mut self) -> Option<String>;
}

/// A fixed list of physical lines (what a file becomes once read).
pub struct StaticLines {
    lines: std::vec::IntoIter<String>,
}

impl StaticLines {
    pub fn new(source: &str) -> Self {
        StaticLines { lines: source.lines().map(str::to_string).collect::<Vec<_>>().into_iter() }
    }
}

impl LineSource for StaticLines {
    fn next_line(&mut self) -> Option<String> {
        self.lines.next()
    }
}

/// Drain `source` to completion, assembling and block-nesting every logical
/// line it produces.
pub fn drive(mut source: impl LineSource, filename: &str, debug: bool) -> PhotonResult<Vec<Block>> {
    let mut assembler = LineAssembler::new();
    let mut logical = Vec::new();
    let mut no = 0u32;
    while let Some(raw) = source.next_line() {
        no += 1;
        if let Some(line) = assembler.push(&raw, no) {
            logical.push(line);
        }
    }
    if assembler.is_pending() {
        return Err(PhotonError::syntax(filename, no, 1, "", "unterminated bracket at end of input"));
    }
    block::assemble(&logical, filename, debug)
}

/// Read and parse an entire source file (spec §6's file-mode entry point).
pub fn parse_file(path: &Path, debug: bool) -> PhotonResult<Vec<Block>> {
    let text = fs::read_to_string(path).map_err(|e| PhotonError::Io { path: path.to_path_buf(), reason: e.to_string() })?;
    let filename = path.display().to_string();
    drive(StaticLines::new(&text), &filename, debug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_parses_a_two_statement_program() {
        let blocks = drive(StaticLines::new("x = 1\nif x:\n    y = 2\n"), "t.w", false).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].body.len(), 1);
    }

    #[test]
    fn drive_rejects_unterminated_bracket() {
        let result = drive(StaticLines::new("f(a,\n"), "t.w", false);
        assert!(result.is_err());
    }
}
