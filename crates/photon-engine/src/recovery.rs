//! Class-body error recovery (spec §7), ground-truthed on `processClass`'s
//! `try`/`except KeyError` block: if a name inside a class body can't be
//! resolved (a forward reference to a sibling method, say), the engine
//! rewinds to a checkpoint taken right before that one statement and
//! carries on with the next statement, instead of aborting the whole class
//! body (or, transitively, the whole file).
//!
//! The checkpoint captures both the local-scope depth *and* the contents
//! of whichever scope is currently innermost, since a statement can add
//! bindings (a partial assignment, say) before the failure that a
//! depth-only rollback would leave behind.

use rustc_hash::FxHashMap;

use photon_ir::NodeId;
use photon_scope::ScopeManager;

pub struct Checkpoint {
    depth: usize,
    top: FxHashMap<String, NodeId>,
}

impl Checkpoint {
    pub fn capture(scope: &ScopeManager) -> Self {
        Checkpoint { depth: scope.depth(), top: scope.snapshot_top() }
    }

    /// Pop local scopes back down to the depth recorded at `capture` time,
    /// then restore the innermost scope's bindings to their pre-statement
    /// contents.
    pub fn restore(&self, scope: &mut ScopeManager) {
        while scope.depth() > self.depth {
            scope.end_local();
        }
        scope.restore_top(self.top.clone());
    }
}
