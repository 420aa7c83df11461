//! Assignment and bidirectional type inference (spec §4.F), ground-truthed
//! on `baseTranspiler.py`'s `processAssign`/`processAugAssign`: a fresh name
//! declares a binding typed from its value; re-assigning an existing name
//! promotes the two types (or keeps the explicit cast the declaration
//! named) rather than re-declaring it.

use photon_common::PhotonResult;
use photon_ir::{make_index, Ir, NodeId, Type};
use photon_parser::{Block, Tokenized};
use photon_token::{ReductionKind, TokenKind};

use crate::engine::Engine;
use crate::expr;

use crate::expr::unwrap_expr;

fn simple_name(node: &Tokenized) -> Option<String> {
    match node {
        Tokenized::Leaf(tok) if tok.kind == TokenKind::Var => Some(tok.value.clone()),
        Tokenized::Node(ReductionKind::UnderlineVar, children) => {
            Some(children.iter().map(leaf_text).collect())
        }
        _ => None,
    }
}

fn leaf_text(node: &Tokenized) -> String {
    match node {
        Tokenized::Leaf(tok) => tok.value.clone(),
        Tokenized::Node(_, children) => children.iter().map(leaf_text).collect(),
    }
}

pub fn process_assign(engine: &mut Engine, block: &Block) -> PhotonResult<NodeId> {
    let children = block.stmt.children();
    let target = unwrap_expr(&children[0]);
    let value_node = &children[2];

    match target {
        Tokenized::Node(ReductionKind::TypeDeclaration, parts) => {
            let (type_text, name) = (leaf_text(&parts[0]), leaf_text(&parts[1]));
            let declared = Type::native(type_text);
            let value = expr::eval(engine, value_node)?;
            let index = make_index(&engine.namespace, &name, None);
            let target_id = engine.arena.alloc(Ir::Var {
                name,
                ty: declared.clone(),
                namespace: engine.namespace.clone(),
                index: index.clone(),
                index_access: None,
                attribute: None,
            });
            engine.scope.add(index, target_id);
            Ok(engine.arena.alloc(Ir::Assign {
                target: target_id,
                value,
                namespace: engine.namespace.clone(),
                in_memory: false,
                cast: Some(declared),
            }))
        }
        Tokenized::Node(ReductionKind::DotAccess, parts) => {
            let target_id = crate::dotaccess::eval(engine, parts)?;
            let value = expr::eval(engine, value_node)?;
            Ok(engine.arena.alloc(Ir::Assign {
                target: target_id,
                value,
                namespace: engine.namespace.clone(),
                in_memory: true,
                cast: None,
            }))
        }
        Tokenized::Node(ReductionKind::IndexAccess, parts) => {
            let base_name = parts[0].first_token().map(|t| t.value.clone()).unwrap_or_default();
            let index_expr = expr::eval(engine, &parts[2])?;
            let target_id = crate::vars::resolve(engine, &base_name, Some(index_expr))?;
            let value = expr::eval(engine, value_node)?;
            Ok(engine.arena.alloc(Ir::Assign {
                target: target_id,
                value,
                namespace: engine.namespace.clone(),
                in_memory: true,
                cast: None,
            }))
        }
        other => {
            let name = simple_name(other)
                .ok_or_else(|| engine.error_at(block, "left-hand side of assignment is not assignable"))?;
            let value = expr::eval(engine, value_node)?;
            let index = make_index(&engine.namespace, &name, None);
            let in_memory = engine.scope.in_memory(&index);
            let value_ty = engine.arena.get(value).ty();

            // Re-assigning an existing name never promotes the two types
            // into a third (that's only for mixed-operand expressions,
            // `Type::promote`'s actual job): a mismatch between two known
            // types keeps the name's original type and records the
            // narrowing as an explicit `cast`; if either side is merely
            // unknown, the known side wins outright.
            let (ty, cast) = if !in_memory {
                (value_ty, None)
            } else {
                let existing = engine.scope.type_of(&index, &engine.arena);
                if existing == value_ty {
                    (existing, None)
                } else if !existing.known {
                    (value_ty, None)
                } else if !value_ty.known {
                    (existing, None)
                } else {
                    (existing.clone(), Some(existing))
                }
            };

            let target_id = engine.arena.alloc(Ir::Var {
                name,
                ty,
                namespace: engine.namespace.clone(),
                index: index.clone(),
                index_access: None,
                attribute: None,
            });
            if in_memory {
                engine.scope.update(&index, target_id);
            } else {
                engine.scope.add(index, target_id);
            }
            Ok(engine.arena.alloc(Ir::Assign {
                target: target_id,
                value,
                namespace: engine.namespace.clone(),
                in_memory,
                cast,
            }))
        }
    }
}

pub fn process_aug_assign(engine: &mut Engine, block: &Block) -> PhotonResult<NodeId> {
    let children = block.stmt.children();
    let target_node = unwrap_expr(&children[0]);
    let name = simple_name(target_node)
        .ok_or_else(|| engine.error_at(block, "compound assignment target is not a plain name"))?;
    let operator: String = leaf_text(&children[1]) + &leaf_text(&children[2]);
    let target_id = crate::vars::resolve(engine, &name, None)?;
    let value = expr::eval(engine, &children[3])?;

    let index = make_index(&engine.namespace, &name, None);
    let promoted = Type::promote(&engine.arena.get(target_id).ty(), &engine.arena.get(value).ty());
    let updated = engine.arena.alloc(Ir::Var {
        name,
        ty: promoted,
        namespace: engine.namespace.clone(),
        index: index.clone(),
        index_access: None,
        attribute: None,
    });
    engine.scope.update(&index, updated);

    Ok(engine.arena.alloc(Ir::AugAssign { target: target_id, expr: value, operator }))
}
