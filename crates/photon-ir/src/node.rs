//! Component D: the IR node catalog (spec §3).
//!
//! Per the "dynamic typing -> sum types" design note, every IR kind is one
//! variant of a single [`Ir`] enum rather than a family of boxed trait
//! objects; child nodes are referenced by [`NodeId`] into an [`crate::Arena`]
//! rather than by pointer, so cyclic references (a class method referring to
//! its own class) are just two nodes joined by id.

use rustc_hash::FxHashMap;

use crate::ty::Type;

/// An arena index. `NodeId`s are only meaningful relative to the [`crate::Arena`]
/// that allocated them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Whether a node, when it appears as a top-level statement, introduces a
/// new binding (`declaration`) or is evaluated purely for its value
/// (`expression`) -- spec §3's `mode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Declaration,
    Expression,
}

#[derive(Debug, Clone)]
pub struct ElifArm {
    pub expr: NodeId,
    pub block: Vec<NodeId>,
}

/// Every IR node kind named in spec §3.
#[derive(Debug, Clone)]
pub enum Ir {
    Null,
    Num {
        value: String,
        ty: Type,
    },
    Bool {
        value: bool,
    },
    Str {
        /// The literal carcass with `{}` interpolation slots, verbatim.
        value: String,
        /// The parsed expression for each `{}` slot, in order.
        expressions: Vec<NodeId>,
    },
    Group {
        expr: NodeId,
    },
    Var {
        name: String,
        ty: Type,
        namespace: String,
        index: String,
        index_access: Option<NodeId>,
        attribute: Option<String>,
    },
    Expr {
        args: Vec<NodeId>,
        ops: Vec<String>,
        ty: Type,
    },
    Assign {
        target: NodeId,
        value: NodeId,
        namespace: String,
        in_memory: bool,
        cast: Option<Type>,
    },
    AugAssign {
        target: NodeId,
        expr: NodeId,
        operator: String,
    },
    If {
        expr: NodeId,
        if_block: Vec<NodeId>,
        elifs: Vec<ElifArm>,
        else_block: Option<Vec<NodeId>>,
    },
    While {
        expr: NodeId,
        block: Vec<NodeId>,
    },
    For {
        args: Vec<NodeId>,
        iterable: NodeId,
        code: Vec<NodeId>,
    },
    Range {
        initial: NodeId,
        end: NodeId,
        step: NodeId,
        ty: Type,
    },
    Function {
        name: NodeId,
        args: Vec<NodeId>,
        kwargs: Vec<NodeId>,
        code: Vec<NodeId>,
        signature: Vec<NodeId>,
        namespace: String,
    },
    Class {
        name: NodeId,
        args: Vec<NodeId>,
        parameters: FxHashMap<String, NodeId>,
        methods: FxHashMap<String, NodeId>,
        new: NodeId,
        namespace: String,
    },
    Call {
        name: NodeId,
        args: Vec<NodeId>,
        kwargs: Vec<NodeId>,
        signature: Vec<NodeId>,
        namespace: String,
        ty: Type,
    },
    DotAccess {
        chain: Vec<NodeId>,
        ty: Type,
        namespace: String,
    },
    Array {
        elements: Vec<NodeId>,
        ty: Type,
    },
    Map {
        entries: Vec<NodeId>,
        ty: Type,
    },
    KeyVal {
        key: NodeId,
        val: NodeId,
    },
    Return {
        expr: NodeId,
        ty: Type,
    },
    Break,
    Comment,
    Cast {
        expr: NodeId,
        cast_to: Type,
    },
    Delete {
        expr: NodeId,
    },
    Open {
        args: Vec<NodeId>,
    },
    Print {
        args: Vec<NodeId>,
    },
    Input {
        expr: Option<NodeId>,
    },
    Module {
        expr: NodeId,
        name: String,
        namespace: String,
        native: bool,
    },
    Package {
        name: String,
        submodules: FxHashMap<String, NodeId>,
    },
    Sequence {
        items: Vec<NodeId>,
    },
    Scope {
        sequence: Vec<NodeId>,
    },
}

impl Ir {
    /// The canonical scope key, if this kind of node has one (invariant I1).
    /// Bare `Var` nodes never carry an index of their own (§4.E `add`):
    /// only declarations (`Assign`, `Function`, `Class`, `Module`) do.
    pub fn index(&self) -> Option<&str> {
        match self {
            Ir::Var { index, .. } => Some(index.as_str()),
            _ => None,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Ir::Num { ty, .. } => ty.clone(),
            Ir::Bool { .. } => Type::native("bool"),
            Ir::Str { .. } => Type::native("str"),
            Ir::Var { ty, .. } => ty.clone(),
            Ir::Expr { ty, .. } => ty.clone(),
            Ir::Call { ty, .. } => ty.clone(),
            Ir::DotAccess { ty, .. } => ty.clone(),
            Ir::Array { ty, .. } => ty.clone(),
            Ir::Map { ty, .. } => ty.clone(),
            Ir::Range { ty, .. } => ty.clone(),
            Ir::Return { ty, .. } => ty.clone(),
            Ir::Cast { cast_to, .. } => cast_to.clone(),
            Ir::Null => Type::native("null"),
            _ => Type::unknown(),
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Ir::Var { namespace, .. } => namespace,
            Ir::Assign { namespace, .. } => namespace,
            Ir::Function { namespace, .. } => namespace,
            Ir::Class { namespace, .. } => namespace,
            Ir::Call { namespace, .. } => namespace,
            Ir::DotAccess { namespace, .. } => namespace,
            Ir::Module { namespace, .. } => namespace,
            _ => "",
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Ir::Assign { .. } | Ir::Function { .. } | Ir::Class { .. } | Ir::Module { .. } => {
                Mode::Declaration
            }
            _ => Mode::Expression,
        }
    }
}
