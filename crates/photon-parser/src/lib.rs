//! Components B/C: the line assembler and the shift-reduce grammar engine.
//!
//! Exposes the two boundary-contract functions named in spec §6:
//! [`parse`] turns one already-assembled logical line into its reduced
//! parse fragments, and [`assembly`] folds a run of logical lines into the
//! indentation-nested [`Block`] forest the semantic engine walks.

pub mod assembler;
pub mod block;
pub mod driver;
pub mod tokenized;

pub use assembler::{LineAssembler, LogicalLine};
pub use block::Block;
pub use driver::{drive, parse_file, LineSource, StaticLines};
pub use tokenized::Tokenized;

use photon_common::PhotonResult;

/// Tokenize and fully reduce one logical line (spec §6: `parse(line,
/// filename, no, debug)`).
pub fn parse(line: &str, filename: &str, no: u32, debug: bool) -> Vec<Tokenized> {
    let tokens = photon_lexer::tokenize(line, filename, no, debug);
    tokenized::reduce(tokens)
}

/// Fold a batch of already-parsed logical lines into a block forest (spec
/// §6: `assembly(tokenized, block, modifier)`). `modifier` is the indent
/// floor the caller is currently nested at (0 at the top level); re-exposed
/// so a REPL can assemble one paste at a time without re-driving the whole
/// program.
pub fn assembly(lines: &[LogicalLine], filename: &str, debug: bool, modifier: u32) -> PhotonResult<Vec<Block>> {
    let mut pos = 0;
    block::assemble_from(lines, &mut pos, modifier, filename, debug)
}
