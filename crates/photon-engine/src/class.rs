//! Class definitions (spec §4.F), two-pass per `baseTranspiler.py`'s
//! `processClass`:
//!
//! 1. Collect the parent classes' parameters, merge with this class's own,
//!    and install a shell binding so the class can refer to itself
//!    (a method returning `Self`, say) while its body is still being
//!    walked.
//! 2. Re-walk the body with the class now in scope to produce the final
//!    method IRs -- every non-`new` method gets an implicit leading `self`
//!    parameter, and `new` gets every parent's own constructor parameters
//!    prepended onto its own (P6) -- recovering via [`Checkpoint`] one
//!    statement at a time if a name inside the body can't be resolved,
//!    instead of aborting the whole file (spec §7).

use photon_common::PhotonError;
use photon_ir::{make_index, Ir, NodeId, Type};
use photon_parser::Block;
use photon_token::ReductionKind;
use rustc_hash::FxHashMap;

use crate::dispatch;
use crate::engine::Engine;
use crate::func;
use crate::recovery::Checkpoint;

pub fn process_class(engine: &mut Engine, block: &Block) -> photon_common::PhotonResult<NodeId> {
    let children = block.stmt.children();
    let name_text = children[1].first_token().map(|t| t.value.clone()).unwrap_or_default();
    let parent_node = if children.len() == 6 { Some(&children[3]) } else { None };
    let index = make_index(&engine.namespace, &name_text, None);

    let parent_names = parent_node.map(func::collect_names).unwrap_or_default();
    let mut parameters = FxHashMap::default();
    let mut parent_args = Vec::new();
    let mut inherited_params: Vec<(String, Type)> = Vec::new();
    for parent in &parent_names {
        let parent_index = make_index(&engine.namespace, parent, None);
        if let Ok(parent_id) = engine.scope.get(&parent_index) {
            parent_args.push(parent_id);
            if let Ir::Class { parameters: parent_params, new: parent_new, .. } = engine.arena.get(parent_id) {
                // `parameters.update(parentClass.parameters)` in the
                // reference overwrites on a key collision, so of several
                // parents sharing a parameter name the *last* one in the
                // parent list wins, not the first.
                for (k, v) in parent_params.clone() {
                    parameters.insert(k, v);
                }
                if let Ir::Function { args: parent_new_args, .. } = engine.arena.get(*parent_new) {
                    for arg_id in parent_new_args.clone() {
                        if let Ir::Var { name, ty, .. } = engine.arena.get(arg_id) {
                            inherited_params.push((name.clone(), ty.clone()));
                        }
                    }
                }
            }
        }
    }

    let placeholder = engine.arena.alloc(Ir::Null);
    engine.scope.add(index.clone(), placeholder);

    let class_namespace =
        if engine.namespace.is_empty() { name_text.clone() } else { format!("{}::{}", engine.namespace, name_text) };
    let saved_namespace = std::mem::replace(&mut engine.namespace, class_namespace);

    let self_ty = Type::class(index.clone());
    engine.scope.start_local();
    let body_nodes = process_recoverable_body(engine, &block.body, &self_ty, &inherited_params);
    engine.scope.end_local();

    // P6: `parameters == parents merged in order ∪ own` -- the class's own
    // direct body statements (methods, data assigns, bare exprs) always
    // win over whatever a parent declared under the same name, since they
    // are folded in last (`processClass`'s own `parameters[t.name.value] =
    // t` / `parameters[t.index] = t` loop runs after the parent merge).
    let mut methods = FxHashMap::default();
    for id in &body_nodes {
        match engine.arena.get(*id) {
            Ir::Function { name, .. } => {
                if let Ir::Var { name: fname, .. } = engine.arena.get(*name) {
                    let fname = fname.clone();
                    methods.insert(fname.clone(), *id);
                    parameters.insert(fname, *id);
                }
            }
            Ir::Assign { target, .. } => {
                if let Ir::Var { name, attribute, .. } = engine.arena.get(*target) {
                    let key = attribute.clone().unwrap_or_else(|| name.clone());
                    parameters.insert(key, *id);
                }
            }
            _ => {}
        }
    }
    let new_id = methods.get("new").copied().unwrap_or(placeholder);

    engine.namespace = saved_namespace;

    let name_id = engine.arena.alloc(Ir::Var {
        name: name_text,
        ty: photon_ir::Type::unknown(),
        namespace: engine.namespace.clone(),
        index: index.clone(),
        index_access: None,
        attribute: None,
    });
    let class_id = engine.arena.alloc(Ir::Class {
        name: name_id,
        args: parent_args,
        parameters,
        methods,
        new: new_id,
        namespace: engine.namespace.clone(),
    });
    engine.scope.update(&index, class_id);
    Ok(class_id)
}

fn is_new_method(block: &Block) -> bool {
    block.stmt.children().get(1).and_then(|c| c.first_token()).map(|t| t.value.as_str()) == Some("new")
}

/// Walk a class body statement by statement, checkpointing the scope
/// before each one and rewinding (but continuing with the next statement)
/// if that one failed to resolve a name -- so a forward reference to a
/// sibling member declared later in the body doesn't take down the whole
/// class.
fn process_recoverable_body(
    engine: &mut Engine,
    body: &[Block],
    self_ty: &Type,
    inherited_params: &[(String, Type)],
) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut idx = 0;
    while idx < body.len() {
        let checkpoint = Checkpoint::capture(&engine.scope);
        let block = &body[idx];
        let result = if block.stmt.kind() == Some(ReductionKind::Function) {
            let leading: Vec<(String, Type)> =
                if is_new_method(block) { inherited_params.to_vec() } else { vec![("self".to_string(), self_ty.clone())] };
            idx += 1;
            func::process_method(engine, block, &leading)
        } else {
            dispatch::process(engine, body, &mut idx)
        };
        match result {
            Ok(id) => out.push(id),
            Err(PhotonError::NameNotFound { name, .. }) => {
                log::warn!("class body: name '{name}' could not be resolved, skipping this statement");
                checkpoint.restore(&mut engine.scope);
            }
            Err(other) => {
                log::warn!("class body: {other}, skipping this statement");
                checkpoint.restore(&mut engine.scope);
            }
        }
    }
    out
}
