//! Member access (`obj.attr`), ground-truthed on `baseTranspiler.py`'s
//! `processDotAccess`: what an attribute resolves to depends entirely on
//! what the base expression's type says the receiver is --
//! class instance (member/method lookup), module (rebind to the imported
//! name's own binding), package (descend into its registered submodule),
//! or a handful of built-ins (`array`/`map` `.len`, a file's `.read()`).
//! A name the receiver's kind says should exist but doesn't is the one
//! place a [`PhotonError::NameNotFound`] is allowed to surface from
//! expression evaluation, so a forward reference inside a class body can
//! trip the per-statement recovery in `class.rs`.
//!
//! `a.b.c` parses as a left-recursive `DotAccess` chain (`DotAccess(DotAccess(a,
//! b), c)`, since `DotAccess` itself reduces back to `Expr`); this flattens
//! it into one `Ir::DotAccess` with a `chain` of every segment in order,
//! rather than nesting `DotAccess` nodes inside each other.

use photon_common::{PhotonError, PhotonResult};
use photon_ir::{Ir, NodeId, Type};
use photon_parser::Tokenized;

use crate::engine::Engine;
use crate::expr;

pub fn eval(engine: &mut Engine, children: &[Tokenized]) -> PhotonResult<NodeId> {
    let base = expr::eval(engine, &children[0])?;
    let attr_name = children[2].first_token().map(|t| t.value.clone()).unwrap_or_default();
    resolve_chain(engine, base, &attr_name)
}

fn resolve_chain(engine: &mut Engine, base: NodeId, attr_name: &str) -> PhotonResult<NodeId> {
    let base_ty = engine.arena.get(base).ty();

    if base_ty.is_class {
        let (ty, namespace) = resolve_class_member(engine, &base_ty, attr_name)?;
        return Ok(chain_node(engine, base, attr_name, ty, namespace));
    }
    if base_ty.is_module {
        let (ty, namespace) = resolve_namespaced_member(engine, base_ty.name.as_deref().unwrap_or_default(), attr_name)?;
        return Ok(chain_node(engine, base, attr_name, ty, namespace));
    }
    if base_ty.is_package {
        let (ty, namespace) = resolve_namespaced_member(engine, base_ty.name.as_deref().unwrap_or_default(), attr_name)?;
        return Ok(chain_node(engine, base, attr_name, ty, namespace));
    }
    if (base_ty.type_name == "array" || base_ty.type_name == "map") && attr_name == "len" {
        return Ok(chain_node(engine, base, attr_name, Type::native("int"), engine.namespace.clone()));
    }
    if base_ty.type_name == "file" && attr_name == "read" {
        return Ok(chain_node(engine, base, attr_name, Type::native("str"), engine.namespace.clone()));
    }

    // Receiver kind isn't known yet (an unresolved name, say): carry the
    // attribute through as unknown rather than erroring -- only a receiver
    // whose kind IS known but whose member genuinely doesn't exist fails.
    Ok(chain_node(engine, base, attr_name, Type::unknown(), engine.namespace.clone()))
}

/// Look `attr` up as either a method or a constructor parameter of the
/// class named by `class_ty.type_name` (the class's own scope index).
fn resolve_class_member(engine: &mut Engine, class_ty: &Type, attr: &str) -> PhotonResult<(Type, String)> {
    let class_id = engine.scope.get(&class_ty.type_name).map_err(|_| PhotonError::name_not_found(attr, None))?;
    match engine.arena.get(class_id) {
        Ir::Class { methods, parameters, namespace, .. } => {
            if let Some(method_id) = methods.get(attr) {
                // A method call lifts its receiver in as `self`; the
                // method's own return type isn't tracked, so the call
                // site (`call.rs`) is left to refine this.
                let _ = method_id;
                return Ok((Type::unknown(), namespace.clone()));
            }
            if let Some(param_id) = parameters.get(attr) {
                return Ok((engine.arena.get(*param_id).ty(), namespace.clone()));
            }
            Err(PhotonError::name_not_found(attr, None))
        }
        _ => Err(PhotonError::name_not_found(attr, None)),
    }
}

/// Look `attr` up under `namespace`'s exported bindings (a module's or
/// package's `namespace::attr` scope entry).
fn resolve_namespaced_member(engine: &mut Engine, namespace: &str, attr: &str) -> PhotonResult<(Type, String)> {
    let index = photon_ir::make_index(namespace, attr, None);
    let id = engine.scope.get(&index).map_err(|_| PhotonError::name_not_found(attr, None))?;
    Ok((engine.arena.get(id).ty(), engine.arena.get(id).namespace().to_string()))
}

fn chain_node(engine: &mut Engine, base: NodeId, attr_name: &str, ty: Type, namespace: String) -> NodeId {
    let attr_id = engine.arena.alloc(Ir::Var {
        name: attr_name.to_string(),
        ty: ty.clone(),
        namespace: namespace.clone(),
        index: attr_name.to_string(),
        index_access: None,
        attribute: Some(attr_name.to_string()),
    });
    let chain = match engine.arena.get(base) {
        Ir::DotAccess { chain, .. } => {
            let mut extended = chain.clone();
            extended.push(attr_id);
            extended
        }
        _ => vec![base, attr_id],
    };
    engine.arena.alloc(Ir::DotAccess { chain, ty, namespace: engine.namespace.clone() })
}
