//! The scope manager (spec §3/§4.E), ported from the reference `CurrentScope`
//! class: a global binding table plus a stack of local scopes pushed on
//! function/class entry and popped on exit.
//!
//! Lookup walks the local stack innermost-first before falling back to
//! global (lexical shadowing); writes go to the innermost local scope while
//! one is open, and to global otherwise.

use photon_common::{PhotonError, PhotonResult};
use photon_ir::{Arena, NodeId, Type};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct ScopeManager {
    global: FxHashMap<String, NodeId>,
    locals: Vec<FxHashMap<String, NodeId>>,
}

impl ScopeManager {
    pub fn new() -> Self {
        ScopeManager { global: FxHashMap::default(), locals: Vec::new() }
    }

    /// Open a new local scope (function body, class body, comprehension).
    pub fn start_local(&mut self) {
        self.locals.push(FxHashMap::default());
    }

    /// Close the innermost local scope and hand back its bindings, so a
    /// caller can merge captured names into an enclosing IR node if needed.
    pub fn end_local(&mut self) -> FxHashMap<String, NodeId> {
        self.locals.pop().unwrap_or_default()
    }

    fn innermost_mut(&mut self) -> &mut FxHashMap<String, NodeId> {
        self.locals.last_mut().unwrap_or(&mut self.global)
    }

    /// Bind `index` to `node` in the innermost open scope (local if any is
    /// open, else global).
    pub fn add(&mut self, index: impl Into<String>, node: NodeId) {
        self.innermost_mut().insert(index.into(), node);
    }

    /// Bind `alias` to whatever `index` currently resolves to, in the
    /// innermost open scope. Used for `from x import y as z` and `import x
    /// as y` (spec §4.G).
    pub fn add_alias(&mut self, alias: impl Into<String>, index: &str) -> PhotonResult<()> {
        let node = self.get(index)?;
        self.add(alias, node);
        Ok(())
    }

    /// Resolve `index`, searching innermost-to-outermost local scopes then
    /// global (I1: name resolution is innermost-scope-first).
    pub fn get(&self, index: &str) -> PhotonResult<NodeId> {
        for scope in self.locals.iter().rev() {
            if let Some(id) = scope.get(index) {
                return Ok(*id);
            }
        }
        self.global.get(index).copied().ok_or_else(|| PhotonError::name_not_found(index, None))
    }

    /// Whether `index` is already bound anywhere in the visible scope chain.
    pub fn in_memory(&self, index: &str) -> bool {
        self.get(index).is_ok()
    }

    /// Overwrite an existing binding in place (the scope level it was
    /// already found in), or `add` it fresh if it isn't bound yet.
    pub fn update(&mut self, index: &str, node: NodeId) {
        for scope in self.locals.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(index) {
                *slot = node;
                return;
            }
        }
        if let Some(slot) = self.global.get_mut(index) {
            *slot = node;
            return;
        }
        self.add(index.to_string(), node);
    }

    /// All bindings whose index is namespaced under `namespace::` (a
    /// module's exported names, for `from x import *`). When `modules_only`
    /// is set, only bindings whose IR type is itself a module/package are
    /// returned (nested package re-export).
    pub fn values(&self, namespace: &str, arena: &Arena, modules_only: bool) -> Vec<(String, NodeId)> {
        let prefix = format!("{namespace}::");
        let mut out = Vec::new();
        for (key, id) in self.global.iter() {
            let Some(name) = key.strip_prefix(&prefix) else { continue };
            if modules_only {
                let ty = arena.get(*id).ty();
                if !(ty.is_module || ty.is_package) {
                    continue;
                }
            }
            out.push((name.to_string(), *id));
        }
        out
    }

    pub fn type_of(&self, index: &str, arena: &Arena) -> Type {
        match self.get(index) {
            Ok(id) => arena.get(id).ty(),
            Err(_) => Type::unknown(),
        }
    }

    pub fn depth(&self) -> usize {
        self.locals.len()
    }

    /// Snapshot the innermost open local scope's contents (or the global
    /// table, if none is open), for a recovery checkpoint that needs to
    /// roll back bindings added mid-body as well as depth.
    pub fn snapshot_top(&self) -> FxHashMap<String, NodeId> {
        self.locals.last().cloned().unwrap_or_else(|| self.global.clone())
    }

    /// Replace the innermost open local scope's contents (or the global
    /// table) with a previously captured snapshot.
    pub fn restore_top(&mut self, snapshot: FxHashMap<String, NodeId>) {
        if let Some(top) = self.locals.last_mut() {
            *top = snapshot;
        } else {
            self.global = snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_ir::Ir;

    #[test]
    fn global_add_and_get_roundtrip() {
        let mut arena = Arena::new();
        let id = arena.alloc(Ir::Null);
        let mut scope = ScopeManager::new();
        scope.add("x", id);
        assert_eq!(scope.get("x").unwrap(), id);
    }

    #[test]
    fn local_shadows_global() {
        let mut arena = Arena::new();
        let outer = arena.alloc(Ir::Num { value: "1".into(), ty: Type::native("int") });
        let inner = arena.alloc(Ir::Num { value: "2".into(), ty: Type::native("int") });
        let mut scope = ScopeManager::new();
        scope.add("x", outer);
        scope.start_local();
        scope.add("x", inner);
        assert_eq!(scope.get("x").unwrap(), inner);
        scope.end_local();
        assert_eq!(scope.get("x").unwrap(), outer);
    }

    #[test]
    fn get_missing_name_is_name_not_found() {
        let scope = ScopeManager::new();
        assert!(scope.get("missing").is_err());
    }

    #[test]
    fn update_rewrites_in_place_without_changing_scope_level() {
        let mut arena = Arena::new();
        let a = arena.alloc(Ir::Bool { value: true });
        let b = arena.alloc(Ir::Bool { value: false });
        let mut scope = ScopeManager::new();
        scope.start_local();
        scope.add("flag", a);
        scope.update("flag", b);
        assert_eq!(scope.get("flag").unwrap(), b);
        assert_eq!(scope.depth(), 1);
    }

    #[test]
    fn values_filters_by_namespace_prefix() {
        let mut arena = Arena::new();
        let f = arena.alloc(Ir::Null);
        let mut scope = ScopeManager::new();
        scope.add("Math::pi", f);
        scope.add("unrelated", f);
        let found = scope.values("Math", &arena, false);
        assert_eq!(found, vec![("pi".to_string(), f)]);
    }

    #[test]
    fn add_alias_points_at_the_same_node() {
        let mut arena = Arena::new();
        let f = arena.alloc(Ir::Null);
        let mut scope = ScopeManager::new();
        scope.add("Math::pi", f);
        scope.add_alias("pi", "Math::pi").unwrap();
        assert_eq!(scope.get("pi").unwrap(), f);
    }
}
