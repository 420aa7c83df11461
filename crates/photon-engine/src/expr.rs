//! Expression evaluation, ground-truthed on `baseTranspiler.py`'s
//! `processNum`/`processBool`/`processString`/`processGroup`/`processArray`/
//! `processMap`/`processKeyVal`/`processCall`/`processPrint`/`processInput`.

use photon_common::{PhotonError, PhotonResult};
use photon_ir::{Ir, NodeId, Type};
use photon_parser::{Block, Tokenized};
use photon_token::{ReductionKind, TokenKind};

use crate::engine::Engine;

/// Peel single-child `Expr` wrappers down to the concrete fragment
/// underneath (a target/callee position reduces to `Expr` like everything
/// else, spec §4.C, but some handlers need to know the real shape).
pub(crate) fn unwrap_expr(node: &Tokenized) -> &Tokenized {
    match node {
        Tokenized::Node(ReductionKind::Expr, children) if children.len() == 1 => unwrap_expr(&children[0]),
        other => other,
    }
}

/// Evaluate any expression fragment (a leaf token or a reduced node) to an
/// IR node, inferring its type along the way.
pub fn eval(engine: &mut Engine, node: &Tokenized) -> PhotonResult<NodeId> {
    match node {
        Tokenized::Leaf(tok) => eval_leaf(engine, tok),
        Tokenized::Node(kind, children) => eval_node(engine, *kind, children),
    }
}

fn eval_leaf(engine: &mut Engine, tok: &photon_token::Token) -> PhotonResult<NodeId> {
    match tok.kind {
        TokenKind::Num => Ok(engine.arena.alloc(Ir::Num { value: tok.value.clone(), ty: Type::native("int") })),
        TokenKind::Var => crate::vars::resolve(engine, &tok.value, None),
        _ => Err(PhotonError::syntax(
            engine.filename.clone(),
            tok.line,
            tok.column,
            tok.value.clone(),
            format!("'{:?}' cannot appear as an expression", tok.kind),
        )),
    }
}

fn eval_node(engine: &mut Engine, kind: ReductionKind, children: &[Tokenized]) -> PhotonResult<NodeId> {
    match kind {
        ReductionKind::Expr => eval_expr_node(engine, children),
        ReductionKind::FloatNumber => {
            let text: String = children
                .iter()
                .map(|c| match c {
                    Tokenized::Leaf(t) => t.value.as_str(),
                    _ => "",
                })
                .collect();
            Ok(engine.arena.alloc(Ir::Num { value: text, ty: Type::native("float") }))
        }
        ReductionKind::Group => {
            let inner = eval(engine, &children[1])?;
            Ok(engine.arena.alloc(Ir::Group { expr: inner }))
        }
        ReductionKind::StringLit => eval_string(engine, children),
        ReductionKind::UnderlineVar => {
            let name: String = children
                .iter()
                .map(|c| match c {
                    Tokenized::Leaf(t) => t.value.as_str(),
                    _ => "",
                })
                .collect();
            crate::vars::resolve(engine, &name, None)
        }
        ReductionKind::DotAccess => crate::dotaccess::eval(engine, children),
        ReductionKind::IndexAccess => {
            let base_tok = children[0].first_token().cloned();
            let base_name = children[0].first_token().map(|t| t.value.clone()).unwrap_or_default();
            let index_expr = eval(engine, &children[2])?;
            let _ = base_tok;
            crate::vars::resolve(engine, &base_name, Some(index_expr))
        }
        ReductionKind::Call => crate::call::eval(engine, children),
        ReductionKind::Array => eval_array(engine, children),
        ReductionKind::KeyVal => eval_keyval(engine, children),
        ReductionKind::RangeExpr => eval_range(engine, children),
        ReductionKind::Args => {
            Err(PhotonError::Unsupported { message: "bare argument list cannot appear outside a call or declaration".into() })
        }
        ReductionKind::PrintFunc | ReductionKind::InputFunc => {
            Err(PhotonError::Unsupported { message: "print/input only valid as a statement".into() })
        }
        other => Err(PhotonError::Unsupported { message: format!("{other:?} is not an expression") }),
    }
}

fn eval_expr_node(engine: &mut Engine, children: &[Tokenized]) -> PhotonResult<NodeId> {
    match children.len() {
        1 => eval(engine, &children[0]),
        2 => {
            // unary operator
            let operand = eval(engine, &children[1])?;
            let op = operator_text(&children[0]);
            let ty = engine.arena.get(operand).ty();
            Ok(engine.arena.alloc(Ir::Expr { args: vec![operand], ops: vec![op], ty }))
        }
        3 => {
            // The shift-reduce grammar only ever nests a binary chain on
            // the left (`rhs` here is always an atomic fragment, never
            // another chain), so `a + b * c` parses as the purely
            // left-associative `(a + b) * c` with no precedence awareness
            // at all. Flatten the whole chain back to its operand/operator
            // sequence and rebuild it via precedence climbing instead of
            // trusting the parse tree's own nesting (P4).
            let (operand_nodes, ops) = flatten_binary_chain(children);
            let mut operands = Vec::with_capacity(operand_nodes.len());
            for node in &operand_nodes {
                operands.push(eval(engine, node)?);
            }
            Ok(reassociate(engine, &operands, &ops))
        }
        _ => Err(PhotonError::Unsupported { message: "malformed expression".into() }),
    }
}

/// Walk a left-nested `[lhs, op, rhs]` chain down to its flat operand and
/// operator sequence, in source order (`a op1 b op2 c` -> `([a, b, c],
/// [op1, op2])`).
fn flatten_binary_chain(children: &[Tokenized]) -> (Vec<Tokenized>, Vec<String>) {
    let lhs = &children[0];
    let (mut operands, mut ops) = match lhs {
        Tokenized::Node(ReductionKind::Expr, inner) if inner.len() == 3 => flatten_binary_chain(inner),
        other => (vec![other.clone()], Vec::new()),
    };
    operands.push(children[2].clone());
    ops.push(operator_text(&children[1]));
    (operands, ops)
}

/// Binding power for each source-language operator, per spec §4.F's stated
/// precedence order (highest to lowest): `**`, then `* % /`, then `- +`,
/// then `&`, then `<< >>`, then `andnot`, then `and`, then `or`, then
/// `== !=`, then `> < >= <=`, then `is in`. Everything is left-associative
/// except `**`.
fn precedence(op: &str) -> u8 {
    match op {
        "**" => 11,
        "*" | "%" | "/" => 10,
        "-" | "+" => 9,
        "&" => 8,
        "<<" | ">>" => 7,
        "andnot" => 6,
        "and" => 5,
        "or" => 4,
        "==" | "!=" => 3,
        ">" | "<" | ">=" | "<=" => 2,
        "is" | "in" => 1,
        _ => 9,
    }
}

fn is_right_associative(op: &str) -> bool {
    op == "**"
}

/// Precedence-climbing shunting-yard over the flattened operand/operator
/// sequence, rebuilding a precedence-correct nested `Ir::Expr` tree.
fn reassociate(engine: &mut Engine, operands: &[NodeId], ops: &[String]) -> NodeId {
    let mut output: Vec<NodeId> = vec![operands[0]];
    let mut op_stack: Vec<String> = Vec::new();

    let mut pop_one = |engine: &mut Engine, op_stack: &mut Vec<String>, output: &mut Vec<NodeId>| {
        let op = op_stack.pop().unwrap();
        let rhs = output.pop().unwrap();
        let lhs = output.pop().unwrap();
        let ty = Type::promote(&engine.arena.get(lhs).ty(), &engine.arena.get(rhs).ty());
        output.push(engine.arena.alloc(Ir::Expr { args: vec![lhs, rhs], ops: vec![op], ty }));
    };

    for (i, op) in ops.iter().enumerate() {
        while let Some(top) = op_stack.last() {
            let should_pop =
                if is_right_associative(op) { precedence(top) > precedence(op) } else { precedence(top) >= precedence(op) };
            if !should_pop {
                break;
            }
            pop_one(engine, &mut op_stack, &mut output);
        }
        op_stack.push(op.clone());
        output.push(operands[i + 1]);
    }
    while !op_stack.is_empty() {
        pop_one(engine, &mut op_stack, &mut output);
    }
    output.pop().unwrap()
}

/// Flatten a fused `Operator`/`Equal` reduction chain (or a lone token) back
/// to its source text, e.g. `==`, `+=`, `>`.
fn operator_text(node: &Tokenized) -> String {
    match node {
        Tokenized::Leaf(tok) => tok.value.clone(),
        Tokenized::Node(_, children) => children.iter().map(operator_text).collect(),
    }
}

fn eval_string(engine: &mut Engine, children: &[Tokenized]) -> PhotonResult<NodeId> {
    let mut value = String::new();
    let mut expressions = Vec::new();
    flatten_string(engine, children, &mut value, &mut expressions)?;
    Ok(engine.arena.alloc(Ir::Str { value, expressions }))
}

fn flatten_string(
    engine: &mut Engine,
    children: &[Tokenized],
    value: &mut String,
    expressions: &mut Vec<NodeId>,
) -> PhotonResult<()> {
    for child in children {
        match child {
            Tokenized::Leaf(tok) => match tok.kind {
                TokenKind::StringContent => value.push_str(&tok.value),
                TokenKind::SingleQuote | TokenKind::DoubleQuote => {}
                _ => {}
            },
            Tokenized::Node(ReductionKind::StringLit, inner) => {
                flatten_string(engine, inner, value, expressions)?;
            }
            Tokenized::Node(_, _) => {
                // an interpolation splice: `{` expr `}` folded down to the
                // bare expression as its only reduced child.
                let expr = eval(engine, child)?;
                value.push_str("{}");
                expressions.push(expr);
            }
        }
    }
    Ok(())
}

/// `[...]` reduces to the same `Array` grammar node whether its elements
/// are plain expressions or `key: val` pairs (SPEC_FULL.md's resolution of
/// the map-literal Open Question); which `Ir` kind actually gets built
/// depends on whether every element turned out to be a `KeyVal`.
fn eval_array(engine: &mut Engine, children: &[Tokenized]) -> PhotonResult<NodeId> {
    if children.len() == 2 {
        return Ok(engine.arena.alloc(Ir::Array { elements: Vec::new(), ty: Type::array(Type::unknown()) }));
    }
    let elements = collect_args(engine, &children[1])?;
    let all_keyval = elements.iter().all(|id| matches!(engine.arena.get(*id), Ir::KeyVal { .. }));
    let any_keyval = elements.iter().any(|id| matches!(engine.arena.get(*id), Ir::KeyVal { .. }));
    if any_keyval && !all_keyval {
        let (line, column) = children[1].first_token().map(|t| (t.line, t.column)).unwrap_or((0, 0));
        return Err(PhotonError::syntax(engine.filename.clone(), line, column, "", "array and map elements cannot be mixed"));
    }
    if all_keyval {
        return build_map(engine, elements);
    }

    // Array element inference (spec §4.F): the single common type if every
    // element agrees, `float` if both `int` and `float` appear, else
    // `unknown` -- folded pairwise across every element, not just the
    // first (`a = [1, 2.5]` must land on `array<float>`).
    let mut elem_ty = Type::unknown();
    for (i, el) in elements.iter().enumerate() {
        let this_ty = engine.arena.get(*el).ty();
        elem_ty = if i == 0 { this_ty } else { Type::promote(&elem_ty, &this_ty) };
    }
    Ok(engine.arena.alloc(Ir::Array { elements, ty: Type::array(elem_ty) }))
}

fn eval_keyval(engine: &mut Engine, children: &[Tokenized]) -> PhotonResult<NodeId> {
    let key = eval(engine, &children[0])?;
    let val = eval(engine, &children[2])?;
    Ok(engine.arena.alloc(Ir::KeyVal { key, val }))
}

/// Map key/val inference (spec §4.F), ground-truthed on `processMap`: a
/// common key type and a common val type fold the same way array elements
/// do, but a genuine mismatch between non-promotable key (or value) types
/// is `UnsupportedConstruct`, not a silent `unknown` -- the reference
/// raises `NotImplemented('Keys of different types not implemented yet')`.
fn build_map(engine: &mut Engine, entries: Vec<NodeId>) -> PhotonResult<NodeId> {
    if entries.is_empty() {
        return Ok(engine.arena.alloc(Ir::Map { entries, ty: Type::map(Type::unknown(), Type::unknown()) }));
    }
    let mut key_ty = Type::unknown();
    let mut val_ty = Type::unknown();
    for (i, id) in entries.iter().enumerate() {
        let Ir::KeyVal { key, val } = engine.arena.get(*id) else { unreachable!() };
        let (this_key, this_val) = (engine.arena.get(*key).ty(), engine.arena.get(*val).ty());
        if i == 0 {
            key_ty = this_key;
            val_ty = this_val;
        } else {
            let promoted_key = Type::promote(&key_ty, &this_key);
            if key_ty != this_key && !promoted_key.known {
                return Err(PhotonError::Unsupported { message: "map keys of different types not implemented yet".into() });
            }
            key_ty = promoted_key;
            let promoted_val = Type::promote(&val_ty, &this_val);
            if val_ty != this_val && !promoted_val.known {
                return Err(PhotonError::Unsupported { message: "map vals of different types not implemented yet".into() });
            }
            val_ty = promoted_val;
        }
    }
    Ok(engine.arena.alloc(Ir::Map { entries, ty: Type::map(key_ty, val_ty) }))
}

/// Flatten a right-recursive `Args` tree into an ordered list of evaluated
/// expressions.
pub fn collect_args(engine: &mut Engine, node: &Tokenized) -> PhotonResult<Vec<NodeId>> {
    match node {
        Tokenized::Node(ReductionKind::Args, children) if children.len() == 3 => {
            let mut left = collect_args(engine, &children[0])?;
            let mut right = collect_args(engine, &children[2])?;
            left.append(&mut right);
            Ok(left)
        }
        other => Ok(vec![eval(engine, other)?]),
    }
}

fn eval_range(engine: &mut Engine, children: &[Tokenized]) -> PhotonResult<NodeId> {
    let initial = eval(engine, &children[0])?;
    let (end, step) = if children.len() == 7 {
        (eval(engine, &children[3])?, eval(engine, &children[6])?)
    } else {
        let end = eval(engine, &children[3])?;
        let step = engine.arena.alloc(Ir::Num { value: "1".into(), ty: Type::native("int") });
        (end, step)
    };
    Ok(engine.arena.alloc(Ir::Range { initial, end, step, ty: Type::native("int") }))
}

pub fn process_print(engine: &mut Engine, block: &Block) -> PhotonResult<NodeId> {
    let children = block.stmt.children();
    let args = if children.len() >= 3 && !matches!(children[2], Tokenized::Leaf(ref t) if t.kind == TokenKind::RParen) {
        collect_args(engine, &children[2])?
    } else {
        Vec::new()
    };
    Ok(engine.arena.alloc(Ir::Print { args }))
}

pub fn process_input_stmt(engine: &mut Engine, block: &Block) -> PhotonResult<NodeId> {
    let children = block.stmt.children();
    let expr = if children.len() >= 3 && !matches!(children[2], Tokenized::Leaf(ref t) if t.kind == TokenKind::RParen) {
        Some(eval(engine, &children[2])?)
    } else {
        None
    };
    Ok(engine.arena.alloc(Ir::Input { expr }))
}

pub fn process_expr_stmt(engine: &mut Engine, block: &Block) -> PhotonResult<NodeId> {
    eval(engine, &block.stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn assign(source: &str) -> (Engine, NodeId) {
        let blocks = photon_parser::drive(photon_parser::StaticLines::new(source), "t.w", false).unwrap();
        let mut engine = Engine::new(EngineConfig::default(), "t.w");
        engine.run(&blocks).unwrap();
        let value = match engine.arena.get(engine.sequence[0]) {
            Ir::Assign { value, .. } => *value,
            _ => panic!("expected an assign statement"),
        };
        (engine, value)
    }

    #[test]
    fn array_literal_folds_int_and_float_to_float() {
        let (engine, value) = assign("x = [1, 2.5]\n");
        let ty = engine.arena.get(value).ty();
        assert_eq!(ty.element_type.as_deref().map(|t| t.type_name.as_str()), Some("float"));
    }

    #[test]
    fn array_literal_with_one_element_uses_its_type() {
        let (engine, value) = assign("x = [1]\n");
        let ty = engine.arena.get(value).ty();
        assert_eq!(ty.element_type.as_deref().map(|t| t.type_name.as_str()), Some("int"));
    }

    #[test]
    fn bracketed_key_vals_build_a_map() {
        let (engine, value) = assign("x = [1: \"a\", 2: \"b\"]\n");
        assert!(matches!(engine.arena.get(value), Ir::Map { .. }));
        let ty = engine.arena.get(value).ty();
        assert_eq!(ty.key_type.as_deref().map(|t| t.type_name.as_str()), Some("int"));
        assert_eq!(ty.val_type.as_deref().map(|t| t.type_name.as_str()), Some("str"));
    }

    #[test]
    fn mixing_keyval_and_plain_elements_is_an_error() {
        let blocks = photon_parser::drive(photon_parser::StaticLines::new("x = [1: \"a\", 2]\n"), "t.w", false).unwrap();
        let mut engine = Engine::new(EngineConfig::default(), "t.w");
        assert!(engine.run(&blocks).is_err());
    }
}
