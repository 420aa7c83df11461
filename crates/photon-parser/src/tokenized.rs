//! The shift-reduce grammar engine (spec §4.C), run over one logical line's
//! tokens at a time. Grounded on `examples/original_source/core/grammar/generatedGrammar.py`
//! (the `patterns` table, transcribed as [`photon_token::GRAMMAR_TABLE`]) and
//! on the way `baseTranspiler.py`'s `self.instructions` dispatch table
//! consumes the reduced tree by `ReductionKind` tag.

use photon_token::{GrammarSymbol, ReductionKind, Token, TokenKind, GRAMMAR_TABLE};

/// A node on the shift-reduce stack: either an unreduced token (a terminal)
/// or a reduction with the stack slice it was built from (a nonterminal).
#[derive(Debug, Clone, PartialEq)]
pub enum Tokenized {
    Leaf(Token),
    Node(ReductionKind, Vec<Tokenized>),
}

impl Tokenized {
    fn symbol(&self) -> GrammarSymbol {
        match self {
            Tokenized::Leaf(tok) => GrammarSymbol::Token(tok.kind),
            Tokenized::Node(kind, _) => GrammarSymbol::Reduction(*kind),
        }
    }

    pub fn kind(&self) -> Option<ReductionKind> {
        match self {
            Tokenized::Node(kind, _) => Some(*kind),
            Tokenized::Leaf(_) => None,
        }
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        match self {
            Tokenized::Leaf(tok) => Some(tok.kind),
            Tokenized::Node(..) => None,
        }
    }

    pub fn children(&self) -> &[Tokenized] {
        match self {
            Tokenized::Node(_, children) => children,
            Tokenized::Leaf(_) => &[],
        }
    }

    /// The first token anywhere under this node, used for error spans.
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            Tokenized::Leaf(tok) => Some(tok),
            Tokenized::Node(_, children) => children.first().and_then(Tokenized::first_token),
        }
    }
}

/// Find the reduction that should fire next: the longest stack suffix that
/// matches a grammar pattern, breaking ties in favor of the rule listed
/// earlier in [`GRAMMAR_TABLE`] (outer-rule precedence, spec §4.C).
fn find_reduction(stack: &[Tokenized]) -> Option<(usize, ReductionKind)> {
    let max_len = GRAMMAR_TABLE.iter().map(|(pattern, _)| pattern.len()).max().unwrap_or(0);
    let longest = max_len.min(stack.len());
    for len in (1..=longest).rev() {
        let start = stack.len() - len;
        let suffix = &stack[start..];
        for (pattern, lhs) in GRAMMAR_TABLE {
            if pattern.len() != len {
                continue;
            }
            if pattern.iter().zip(suffix).all(|(sym, item)| *sym == item.symbol()) {
                return Some((start, *lhs));
            }
        }
    }
    None
}

/// Shift `tokens` onto a stack one at a time, reducing to a fixed point
/// after each shift. Returns the final stack: one item per top-level
/// statement fragment (normally a single node for a well-formed line).
pub fn reduce(tokens: Vec<Token>) -> Vec<Tokenized> {
    let mut stack: Vec<Tokenized> = Vec::new();
    for tok in tokens {
        stack.push(Tokenized::Leaf(tok));
        while let Some((start, lhs)) = find_reduction(&stack) {
            let children = stack.split_off(start);
            stack.push(Tokenized::Node(lhs, children));
        }
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use photon_lexer::tokenize;

    fn reduce_line(src: &str) -> Vec<Tokenized> {
        reduce(tokenize(src, "t.w", 1, false))
    }

    #[test]
    fn assignment_reduces_to_a_single_assign_node() {
        let stack = reduce_line("x = 1");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].kind(), Some(ReductionKind::Assign));
    }

    #[test]
    fn binary_expression_reduces_fully() {
        let stack = reduce_line("x + 1");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].kind(), Some(ReductionKind::Expr));
    }

    #[test]
    fn call_with_multiple_args_reduces_to_call() {
        let stack = reduce_line("f(x, 1)");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].kind(), Some(ReductionKind::Call));
    }

    #[test]
    fn float_number_reduces_before_dot_access() {
        let stack = reduce_line("3.14");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].kind(), Some(ReductionKind::Expr));
    }

    #[test]
    fn comparison_operator_fuses_two_equal_tokens() {
        let stack = reduce_line("x == 1");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].kind(), Some(ReductionKind::Expr));
    }

    #[test]
    fn if_header_reduces_to_if_elif() {
        let stack = reduce_line("if x > 0:");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].kind(), Some(ReductionKind::IfElif));
    }

    #[test]
    fn for_loop_header_with_range() {
        let stack = reduce_line("for i in 0..10:");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].kind(), Some(ReductionKind::ForLoop));
    }
}
