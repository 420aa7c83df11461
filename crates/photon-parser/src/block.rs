//! Grouping reduced logical lines into nested blocks by indentation, ground-
//! truthed on `interpreter.py`'s `getBlock`/`handleBlock`: a line whose last
//! token is `BeginBlock` opens a nested block containing every following
//! line indented further than it, until indentation returns to its level or
//! shallower.

use photon_common::{PhotonError, PhotonResult};
use photon_token::TokenKind;

use crate::assembler::LogicalLine;
use crate::tokenized::{self, Tokenized};

/// One statement, with any nested body it opens.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmt: Tokenized,
    pub line: u32,
    pub indent: u32,
    pub body: Vec<Block>,
}

/// Parse already-assembled logical lines into a flat, indentation-nested
/// forest of [`Block`]s -- the unit the semantic engine walks.
pub fn assemble(lines: &[LogicalLine], filename: &str, debug: bool) -> PhotonResult<Vec<Block>> {
    let mut pos = 0;
    build_level(lines, &mut pos, 0, filename, debug)
}

/// Like [`assemble`], but resuming from an explicit cursor and indent
/// floor -- the form `assembly` (spec §6) needs to fold one incremental
/// batch of lines without re-driving everything seen so far.
pub fn assemble_from(
    lines: &[LogicalLine],
    pos: &mut usize,
    indent_floor: u32,
    filename: &str,
    debug: bool,
) -> PhotonResult<Vec<Block>> {
    build_level(lines, pos, indent_floor, filename, debug)
}

fn build_level(
    lines: &[LogicalLine],
    pos: &mut usize,
    indent_floor: u32,
    filename: &str,
    debug: bool,
) -> PhotonResult<Vec<Block>> {
    let mut blocks = Vec::new();
    while *pos < lines.len() {
        let line = &lines[*pos];
        if line.indent < indent_floor {
            break;
        }
        if line.indent > indent_floor {
            return Err(PhotonError::syntax(
                filename,
                line.line,
                line.indent + 1,
                line.text.clone(),
                "unexpected indent",
            ));
        }
        *pos += 1;
        let tokens = photon_lexer::tokenize(&line.text, filename, line.line, debug);
        let reduced = tokenized::reduce(tokens);
        let stmt = single_statement(reduced, filename, line)?;
        let opens_block = stmt.children().last().and_then(Tokenized::token_kind)
            == Some(TokenKind::BeginBlock)
            || stmt.token_kind() == Some(TokenKind::BeginBlock);
        let body = if opens_block {
            build_level(lines, pos, indent_floor + 1, filename, debug)?
        } else {
            Vec::new()
        };
        blocks.push(Block { stmt, line: line.line, indent: line.indent, body });
    }
    Ok(blocks)
}

fn single_statement(mut reduced: Vec<Tokenized>, filename: &str, line: &LogicalLine) -> PhotonResult<Tokenized> {
    if reduced.len() == 1 {
        Ok(reduced.pop().unwrap())
    } else {
        Err(PhotonError::syntax(
            filename,
            line.line,
            line.indent + 1,
            line.text.clone(),
            format!("line did not reduce to a single statement ({} fragments left)", reduced.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(pairs: &[(&str, u32, u32)]) -> Vec<LogicalLine> {
        pairs
            .iter()
            .map(|(text, line, indent)| LogicalLine { text: text.to_string(), line: *line, indent: *indent })
            .collect()
    }

    #[test]
    fn flat_statements_have_no_nested_body() {
        let lines = lines(&[("x = 1", 1, 0), ("y = 2", 2, 0)]);
        let blocks = assemble(&lines, "t.w", false).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].body.is_empty());
    }

    #[test]
    fn if_header_nests_following_indented_lines() {
        let lines = lines(&[("if x:", 1, 0), ("y = 1", 2, 1), ("z = 2", 3, 0)]);
        let blocks = assemble(&lines, "t.w", false).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].body.len(), 1);
    }
}
