//! Component D: the annotated IR (spec §3) -- node kinds, arena storage, the
//! structural `Type` record, and the canonical scope-index builder.

pub mod arena;
pub mod index;
pub mod node;
pub mod ty;

pub use arena::Arena;
pub use index::make_index;
pub use node::{ElifArm, Ir, Mode, NodeId};
pub use ty::Type;
