//! Name resolution, ground-truthed on `baseTranspiler.py`'s `processVar`:
//! look the name up first under the current namespace, then under the
//! enclosing module's namespace, and -- unlike every other lookup in this
//! engine -- never hard-error if neither resolves. An unresolved bare name
//! just becomes a `Var` of unknown type; `Unsupported`/`NameNotFound`
//! reporting for a genuinely missing name happens downstream, at whichever
//! dot-access or call site actually needed the type to be known.

use photon_common::PhotonResult;
use photon_ir::{make_index, Ir, NodeId, Type};

use crate::engine::Engine;

/// Resolve a bare name (optionally with an `[index]` subscript already
/// evaluated) against the current scope chain.
pub fn resolve(engine: &mut Engine, name: &str, index_access: Option<NodeId>) -> PhotonResult<NodeId> {
    let current_index = make_index(&engine.namespace, name, None);
    let module_index = make_index(&engine.module_name, name, None);

    let found = engine
        .scope
        .get(&current_index)
        .ok()
        .or_else(|| (current_index != module_index).then(|| engine.scope.get(&module_index).ok()).flatten())
        .or_else(|| engine.scope.get(name).ok());

    let (ty, namespace) = match found {
        Some(id) => (engine.arena.get(id).ty(), engine.arena.get(id).namespace().to_string()),
        None => (Type::unknown(), engine.namespace.clone()),
    };

    Ok(engine.arena.alloc(Ir::Var {
        name: name.to_string(),
        ty,
        namespace,
        index: current_index,
        index_access,
        attribute: None,
    }))
}

/// Declare a fresh binding in the current scope (used by `assign.rs`,
/// `func.rs`, `class.rs`, `module.rs` wherever a *new* name is introduced
/// rather than looked up).
pub fn declare(engine: &mut Engine, name: &str, node: NodeId) {
    let index = make_index(&engine.namespace, name, None);
    engine.scope.add(index, node);
}
