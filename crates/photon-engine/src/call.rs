//! Calls, ground-truthed on `baseTranspiler.py`'s `processCall`: the callee
//! is first resolved against scope like any other name, and what it
//! resolves to decides the call's own namespace and signature --
//! instantiating a class wires in `new`'s merged args/kwargs (P6) under the
//! class's namespace; an ordinary function call picks up that function's
//! own declared args/kwargs and namespace, so the args bound at the call
//! site line up with the parameters the function body was walked against.

use photon_common::PhotonResult;
use photon_ir::{Ir, NodeId, Type};
use photon_parser::Tokenized;
use photon_token::ReductionKind;

use crate::engine::Engine;
use crate::expr;

pub fn eval(engine: &mut Engine, children: &[Tokenized]) -> PhotonResult<NodeId> {
    let callee = expr::eval(engine, &children[0])?;
    let args = match children.len() {
        3 => Vec::new(),
        4 => match &children[2] {
            Tokenized::Node(ReductionKind::Args, _) => expr::collect_args(engine, &children[2])?,
            other => vec![expr::eval(engine, other)?],
        },
        _ => Vec::new(),
    };

    let callee_ty = engine.arena.get(callee).ty();

    if callee_ty.is_class {
        if let Some((signature, kwargs, namespace)) = class_new_signature(engine, &callee_ty.type_name) {
            return Ok(engine.arena.alloc(Ir::Call {
                name: callee,
                args,
                kwargs,
                signature,
                namespace,
                ty: Type::class(callee_ty.type_name.clone()),
            }));
        }
        return Ok(engine.arena.alloc(Ir::Call {
            name: callee,
            args,
            kwargs: Vec::new(),
            signature: Vec::new(),
            namespace: engine.namespace.clone(),
            ty: Type::class(callee_ty.type_name),
        }));
    }

    if let Some((receiver, signature, kwargs, namespace, ty)) = method_signature(engine, callee) {
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(receiver);
        full_args.extend(args);
        return Ok(engine.arena.alloc(Ir::Call { name: callee, args: full_args, kwargs, signature, namespace, ty }));
    }

    if let Some((signature, kwargs, namespace, ty)) = ordinary_function_signature(engine, callee) {
        return Ok(engine.arena.alloc(Ir::Call { name: callee, args, kwargs, signature, namespace, ty }));
    }

    Ok(engine.arena.alloc(Ir::Call {
        name: callee,
        args,
        kwargs: Vec::new(),
        signature: Vec::new(),
        namespace: engine.namespace.clone(),
        ty: Type::unknown(),
    }))
}

/// `class_index` is the scope key a `Type::class` value carries; look the
/// class back up and hand back its `new` method's args/kwargs/namespace.
fn class_new_signature(engine: &Engine, class_index: &str) -> Option<(Vec<NodeId>, Vec<NodeId>, String)> {
    let class_id = engine.scope.get(class_index).ok()?;
    let Ir::Class { new, .. } = engine.arena.get(class_id) else { return None };
    let Ir::Function { args, kwargs, namespace, .. } = engine.arena.get(*new) else { return None };
    Some((args.clone(), kwargs.clone(), namespace.clone()))
}

/// When the callee is a bare name that itself resolves to a declared
/// function, pick up that function's own args/kwargs/namespace/inferred
/// return type as the call's signature.
fn ordinary_function_signature(engine: &Engine, callee: NodeId) -> Option<(Vec<NodeId>, Vec<NodeId>, String, Type)> {
    let Ir::Var { index, .. } = engine.arena.get(callee) else { return None };
    let func_id = engine.scope.get(index).ok()?;
    let Ir::Function { args, kwargs, namespace, name, .. } = engine.arena.get(func_id) else { return None };
    let ty = engine.arena.get(*name).ty();
    Some((args.clone(), kwargs.clone(), namespace.clone(), ty))
}

/// `obj.method(args)` (spec §4.F): the callee is a `DotAccess` whose last
/// segment names a method on the receiver's class. The receiver is lifted
/// in as the call's own first argument, ahead of whatever arguments were
/// written at the call site, matching the leading `self` parameter
/// `process_method` already bound into the method's own `args`.
fn method_signature(engine: &Engine, callee: NodeId) -> Option<(NodeId, Vec<NodeId>, Vec<NodeId>, String, Type)> {
    let Ir::DotAccess { chain, .. } = engine.arena.get(callee) else { return None };
    if chain.len() < 2 {
        return None;
    }
    let receiver = chain[chain.len() - 2];
    let attr_id = chain[chain.len() - 1];
    let Ir::Var { name: attr_name, .. } = engine.arena.get(attr_id) else { return None };
    let receiver_ty = engine.arena.get(receiver).ty();
    if !receiver_ty.is_class {
        return None;
    }
    let class_id = engine.scope.get(&receiver_ty.type_name).ok()?;
    let Ir::Class { methods, .. } = engine.arena.get(class_id) else { return None };
    let method_id = *methods.get(attr_name)?;
    let Ir::Function { args, kwargs, namespace, name, .. } = engine.arena.get(method_id) else { return None };
    let ty = engine.arena.get(*name).ty();
    Some((receiver, args.clone(), kwargs.clone(), namespace.clone(), ty))
}
