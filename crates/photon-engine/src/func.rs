//! Function definitions, ground-truthed on `baseTranspiler.py`'s
//! `processFunc`: the name is bound before the body is walked so a function
//! can call itself, parameters get their own local scope, and kwargs stay
//! an empty set since the grammar has no default-argument syntax to
//! populate it from.

use photon_common::PhotonResult;
use photon_ir::{make_index, Ir, NodeId, Type};
use photon_parser::{Block, Tokenized};
use photon_token::{ReductionKind, TokenKind};

use crate::dispatch;
use crate::engine::Engine;

pub fn process_function(engine: &mut Engine, block: &Block) -> PhotonResult<NodeId> {
    process_function_impl(engine, block, &[])
}

/// A method inside a class body (spec §4.F): `leading_params` is prepended
/// to the method's own declared parameters before its body is walked, so
/// they're in scope the same way an ordinary parameter is --
/// `self` for every method but `new` (one `(name, class-instance type)`
/// pair), or `new`'s inherited constructor parameters merged in from every
/// parent class (P6), each carrying the type its parent class declared it
/// with.
pub fn process_method(engine: &mut Engine, block: &Block, leading_params: &[(String, Type)]) -> PhotonResult<NodeId> {
    process_function_impl(engine, block, leading_params)
}

fn process_function_impl(engine: &mut Engine, block: &Block, leading_params: &[(String, Type)]) -> PhotonResult<NodeId> {
    let children = block.stmt.children();
    let name_text = children[1].first_token().map(|t| t.value.clone()).unwrap_or_default();
    let args_node = if children.len() == 6 { Some(&children[3]) } else { None };
    let declaring_namespace = engine.namespace.clone();
    let index = make_index(&declaring_namespace, &name_text, None);

    // Reserve the binding before walking the body so a recursive call
    // resolves (invariant I1 holds even for self-reference).
    let placeholder = engine.arena.alloc(Ir::Null);
    engine.scope.add(index.clone(), placeholder);

    // I2: a function's own body (and its parameters) is walked under an
    // empty namespace, regardless of where the function itself is
    // declared -- its parameters aren't qualified by the enclosing
    // class/module path the way the function's own binding is.
    let saved_namespace = std::mem::replace(&mut engine.namespace, String::new());

    engine.scope.start_local();
    let mut arg_ids = Vec::new();
    for (name, ty) in leading_params {
        let arg_index = make_index(&engine.namespace, name, None);
        let arg_id = engine.arena.alloc(Ir::Var {
            name: name.clone(),
            ty: ty.clone(),
            namespace: engine.namespace.clone(),
            index: arg_index.clone(),
            index_access: None,
            attribute: None,
        });
        engine.scope.add(arg_index, arg_id);
        arg_ids.push(arg_id);
    }
    if let Some(node) = args_node {
        for name in collect_names(node) {
            let arg_index = make_index(&engine.namespace, &name, None);
            let arg_id = engine.arena.alloc(Ir::Var {
                name,
                ty: Type::unknown(),
                namespace: engine.namespace.clone(),
                index: arg_index.clone(),
                index_access: None,
                attribute: None,
            });
            engine.scope.add(arg_index, arg_id);
            arg_ids.push(arg_id);
        }
    }
    let code = dispatch::process_body(engine, &block.body)?;
    engine.scope.end_local();

    engine.namespace = saved_namespace;

    let return_ty = infer_return_type(engine, &code);
    let name_id = engine.arena.alloc(Ir::Var {
        name: name_text,
        ty: return_ty,
        namespace: engine.namespace.clone(),
        index: index.clone(),
        index_access: None,
        attribute: None,
    });
    let func_id = engine.arena.alloc(Ir::Function {
        name: name_id,
        args: arg_ids.clone(),
        kwargs: Vec::new(),
        code,
        signature: arg_ids,
        namespace: engine.namespace.clone(),
    });
    engine.scope.update(&index, func_id);
    Ok(func_id)
}

/// A function's return type (`processFunc`'s trailing type fold): every
/// `return` reachable in the body, found by descending into `if`/`while`/
/// `for` nested blocks (a `return` inside a conditional still determines
/// the function's type), folded pairwise with [`Type::promote`]. A
/// function with no `return` at all types as `null`, matching a bare
/// `return`'s own type.
fn infer_return_type(engine: &Engine, code: &[NodeId]) -> Type {
    let mut found = Vec::new();
    collect_returns(engine, code, &mut found);
    let mut ty = match found.first() {
        Some(id) => engine.arena.get(*id).ty(),
        None => return Type::native("null"),
    };
    for id in &found[1..] {
        ty = Type::promote(&ty, &engine.arena.get(*id).ty());
    }
    ty
}

fn collect_returns(engine: &Engine, code: &[NodeId], out: &mut Vec<NodeId>) {
    for id in code {
        match engine.arena.get(*id) {
            Ir::Return { .. } => out.push(*id),
            Ir::If { if_block, elifs, else_block, .. } => {
                collect_returns(engine, if_block, out);
                for arm in elifs {
                    collect_returns(engine, &arm.block, out);
                }
                if let Some(block) = else_block {
                    collect_returns(engine, block, out);
                }
            }
            Ir::While { block, .. } => collect_returns(engine, block, out),
            Ir::For { code: body, .. } => collect_returns(engine, body, out),
            _ => {}
        }
    }
}

/// Flatten a parameter list (a lone name, or a right-recursive `Args` tree)
/// into parameter names, in source order.
pub fn collect_names(node: &Tokenized) -> Vec<String> {
    match node {
        Tokenized::Node(ReductionKind::Args, children) if children.len() == 3 => {
            let mut left = collect_names(&children[0]);
            left.extend(collect_names(&children[2]));
            left
        }
        other => match other.first_token() {
            Some(tok) if tok.kind == TokenKind::Var => vec![tok.value.clone()],
            _ => Vec::new(),
        },
    }
}
