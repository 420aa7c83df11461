//! Opcode dispatch, ground-truthed on `baseTranspiler.py`'s
//! `self.instructions` table: routes each block's reduced root to the
//! handler for its `ReductionKind` (or, for bare keyword statements with no
//! reduction, its raw `TokenKind`).

use photon_common::{PhotonError, PhotonResult};
use photon_ir::{Ir, NodeId};
use photon_parser::Block;
use photon_token::{ReductionKind, TokenKind};

use crate::engine::Engine;
use crate::{assign, class, control, expr, func, module};

/// Process every block in `body` in order, letting multi-block constructs
/// (an `if`/`elif*`/`else?` chain) consume more than one entry.
pub fn process_body(engine: &mut Engine, body: &[Block]) -> PhotonResult<Vec<NodeId>> {
    let mut out = Vec::new();
    let mut idx = 0;
    while idx < body.len() {
        out.push(process(engine, body, &mut idx)?);
    }
    Ok(out)
}

/// Dispatch the block at `blocks[*idx]`, advancing `*idx` past everything
/// it consumed (more than one, for an `if` chain).
pub fn process(engine: &mut Engine, blocks: &[Block], idx: &mut usize) -> PhotonResult<NodeId> {
    let block = &blocks[*idx];
    match block.stmt.kind() {
        Some(ReductionKind::IfElif) => control::process_if_chain(engine, blocks, idx),
        Some(ReductionKind::ForLoop) => {
            *idx += 1;
            control::process_for(engine, block)
        }
        Some(ReductionKind::WhileLoop) => {
            *idx += 1;
            control::process_while(engine, block)
        }
        Some(ReductionKind::Function) => {
            *idx += 1;
            func::process_function(engine, block)
        }
        Some(ReductionKind::ClassDefinition) => {
            *idx += 1;
            class::process_class(engine, block)
        }
        Some(ReductionKind::Assign) => {
            *idx += 1;
            assign::process_assign(engine, block)
        }
        Some(ReductionKind::AugAssign) => {
            *idx += 1;
            assign::process_aug_assign(engine, block)
        }
        Some(ReductionKind::Imports) => {
            *idx += 1;
            module::process_import(engine, block)
        }
        Some(ReductionKind::FuncReturn) => {
            *idx += 1;
            control::process_return(engine, block)
        }
        Some(ReductionKind::Comment) => {
            *idx += 1;
            Ok(engine.arena.alloc(Ir::Comment))
        }
        Some(ReductionKind::PrintFunc) => {
            *idx += 1;
            expr::process_print(engine, block)
        }
        Some(ReductionKind::InputFunc) => {
            *idx += 1;
            expr::process_input_stmt(engine, block)
        }
        _ => match block.stmt.token_kind() {
            Some(TokenKind::BreakStatement) => {
                *idx += 1;
                Ok(engine.arena.alloc(Ir::Break))
            }
            Some(TokenKind::Hashtag) => {
                *idx += 1;
                Ok(engine.arena.alloc(Ir::Comment))
            }
            _ => {
                *idx += 1;
                expr::process_expr_stmt(engine, block).map_err(|err| match err {
                    PhotonError::Unsupported { .. } => engine.error_at(block, "unrecognized statement"),
                    other => other,
                })
            }
        },
    }
}
