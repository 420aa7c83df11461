//! Tokenizer boundary contract (spec §6): `tokenize(line, filename, no, debug)
//! -> Vec<Token>`. Operates on one logical line at a time -- continuation
//! joining across physical lines is the line assembler's job
//! (`photon-parser::assembler`), not the lexer's.

mod cursor;

use cursor::Cursor;
use photon_token::{keyword_from_str, Token, TokenKind};

/// Tokenize one logical source line.
///
/// `no` is the 1-based physical/logical line number (used only to stamp
/// tokens; the line assembler is responsible for deciding which physical
/// lines were joined to produce this logical one). `debug` turns on a
/// `log::debug!` trace of each token as it's produced, mirroring the
/// reference implementation's `debugFunc` print stream (spec §6).
pub fn tokenize(line: &str, filename: &str, no: u32, debug: bool) -> Vec<Token> {
    let indent = leading_indent(line);
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(line);
    let mut column: u32 = 1;
    scan(&mut cursor, filename, no, indent, &mut column, &mut tokens, false);
    if debug {
        for tok in &tokens {
            log::debug!("{no}:{column}: {:?} {:?}", tok.kind, tok.value);
        }
    }
    tokens
}

/// Count of leading whitespace columns, per spec §3.
fn leading_indent(line: &str) -> u32 {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count() as u32
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic()
}
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric()
}

/// Scan `cursor` to completion, pushing tokens into `out`. `in_string`
/// selects string-interpolation mode (recursive call from inside `{...}`),
/// where scanning stops at the matching `}`.
fn scan(
    cursor: &mut Cursor,
    filename: &str,
    no: u32,
    indent: u32,
    column: &mut u32,
    out: &mut Vec<Token>,
    in_string: bool,
) {
    let _ = in_string;
    while let Some(c) = cursor.peek() {
        match c {
            ' ' | '\t' => {
                cursor.advance();
                *column += 1;
            }
            '#' => {
                out.push(Token::new(TokenKind::Hashtag, "#", indent, no, *column, filename));
                cursor.advance();
                *column += 1;
                // A comment consumes the rest of the line (spec §4.C).
                let start = cursor.pos();
                cursor.eat_while(|_| true);
                let text = cursor.slice(start, cursor.pos());
                if !text.is_empty() {
                    out.push(Token::new(TokenKind::StringContent, text, indent, no, *column, filename));
                }
                return;
            }
            '\'' | '"' => {
                let quote_kind = if c == '\'' { TokenKind::SingleQuote } else { TokenKind::DoubleQuote };
                scan_string(cursor, filename, no, indent, column, out, c, quote_kind);
            }
            '0'..='9' => {
                let start = cursor.pos();
                cursor.eat_while(|c| c.is_ascii_digit());
                let text = cursor.slice(start, cursor.pos());
                let len = text.chars().count() as u32;
                out.push(Token::new(TokenKind::Num, text, indent, no, *column, filename));
                *column += len;
            }
            '_' => {
                out.push(Token::new(TokenKind::Underline, "_", indent, no, *column, filename));
                cursor.advance();
                *column += 1;
            }
            c if is_ident_start(c) => {
                let start = cursor.pos();
                cursor.eat_while(is_ident_continue);
                let text = cursor.slice(start, cursor.pos());
                let len = text.chars().count() as u32;
                let kind = keyword_from_str(text).unwrap_or(TokenKind::Var);
                out.push(Token::new(kind, text, indent, no, *column, filename));
                *column += len;
            }
            '.' => {
                out.push(Token::new(TokenKind::Dot, ".", indent, no, *column, filename));
                cursor.advance();
                *column += 1;
            }
            '(' => push_single(cursor, filename, no, indent, column, out, TokenKind::LParen, "("),
            ')' => push_single(cursor, filename, no, indent, column, out, TokenKind::RParen, ")"),
            '[' => push_single(cursor, filename, no, indent, column, out, TokenKind::LBracket, "["),
            ']' => push_single(cursor, filename, no, indent, column, out, TokenKind::RBracket, "]"),
            ',' => push_single(cursor, filename, no, indent, column, out, TokenKind::Comma, ","),
            '=' => push_single(cursor, filename, no, indent, column, out, TokenKind::Equal, "="),
            ':' => push_single(cursor, filename, no, indent, column, out, TokenKind::BeginBlock, ":"),
            '}' if in_string => return,
            '{' => push_single(cursor, filename, no, indent, column, out, TokenKind::InterpolationStart, "{"),
            '+' | '-' | '*' | '/' | '%' | '&' | '<' | '>' | '!' | '|' => {
                let ch = cursor.advance().unwrap();
                out.push(Token::new(TokenKind::Operator, ch.to_string(), indent, no, *column, filename));
                *column += 1;
            }
            _ => {
                // Unrecognized byte: emit an Error token and skip it so the
                // rest of the line can still be scanned (error recovery).
                let ch = cursor.advance().unwrap();
                out.push(Token::new(TokenKind::Error, ch.to_string(), indent, no, *column, filename));
                *column += 1;
            }
        }
    }
}

fn push_single(
    cursor: &mut Cursor,
    filename: &str,
    no: u32,
    indent: u32,
    column: &mut u32,
    out: &mut Vec<Token>,
    kind: TokenKind,
    text: &str,
) {
    out.push(Token::new(kind, text, indent, no, *column, filename));
    cursor.advance();
    *column += 1;
}

/// Scan a quoted string run through its matching terminator, recursing into
/// `{...}` interpolation placeholders with the ordinary scanner (spec §4.C,
/// resolved per SPEC_FULL.md's `{expr}` interpolation grammar).
#[allow(clippy::too_many_arguments)]
fn scan_string(
    cursor: &mut Cursor,
    filename: &str,
    no: u32,
    indent: u32,
    column: &mut u32,
    out: &mut Vec<Token>,
    quote_char: char,
    quote_kind: TokenKind,
) {
    out.push(Token::new(quote_kind, quote_char.to_string(), indent, no, *column, filename));
    cursor.advance();
    *column += 1;
    loop {
        let start = cursor.pos();
        let start_col = *column;
        while let Some(c) = cursor.peek() {
            if c == quote_char || c == '{' {
                break;
            }
            cursor.advance();
            *column += 1;
        }
        let text = cursor.slice(start, cursor.pos());
        if !text.is_empty() {
            out.push(Token::new(TokenKind::StringContent, text, indent, no, start_col, filename));
        }
        match cursor.peek() {
            Some(c) if c == quote_char => {
                out.push(Token::new(quote_kind, quote_char.to_string(), indent, no, *column, filename));
                cursor.advance();
                *column += 1;
                return;
            }
            Some('{') => {
                out.push(Token::new(TokenKind::InterpolationStart, "{", indent, no, *column, filename));
                cursor.advance();
                *column += 1;
                scan(cursor, filename, no, indent, column, out, true);
                if cursor.peek() == Some('}') {
                    out.push(Token::new(TokenKind::InterpolationEnd, "}", indent, no, *column, filename));
                    cursor.advance();
                    *column += 1;
                }
            }
            _ => return, // unterminated string: stop at end of line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize(line, "test.w", 1, false).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn assignment_statement() {
        use TokenKind::*;
        assert_eq!(kinds("x = 1"), vec![Var, Equal, Num]);
    }

    #[test]
    fn if_statement_opens_block() {
        use TokenKind::*;
        assert_eq!(kinds("if x > 0:"), vec![IfStatement, Var, Operator, Num, BeginBlock]);
    }

    #[test]
    fn float_literal_tokens() {
        use TokenKind::*;
        assert_eq!(kinds("3.14"), vec![Num, Dot, Num]);
    }

    #[test]
    fn keyword_dispatch() {
        use TokenKind::*;
        assert_eq!(kinds("for i in x:"), vec![ForStatement, Var, InStatement, Var, BeginBlock]);
    }

    #[test]
    fn underline_qualified_identifier() {
        use TokenKind::*;
        assert_eq!(kinds("my_name"), vec![Var, Underline, Var]);
    }

    #[test]
    fn indent_is_measured_in_columns() {
        let toks = tokenize("    x = 1", "test.w", 1, false);
        assert_eq!(toks[0].indent, 4);
    }

    #[test]
    fn comment_consumes_rest_of_line() {
        use TokenKind::*;
        let toks = tokenize("x = 1 # hello there", "test.w", 1, false);
        assert_eq!(toks[0].kind, Var);
        assert!(toks.iter().any(|t| t.kind == Hashtag));
    }

    #[test]
    fn double_quoted_string_with_interpolation() {
        use TokenKind::*;
        let toks = tokenize(r#""hi {name}!""#, "test.w", 1, false);
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DoubleQuote,
                StringContent,
                InterpolationStart,
                Var,
                InterpolationEnd,
                StringContent,
                DoubleQuote
            ]
        );
    }

    #[test]
    fn operator_fusion_inputs_are_separate_tokens() {
        use TokenKind::*;
        // `==` is lexed as two Equal tokens; the `(equal, equal) -> operator`
        // grammar rule fuses them at parse time (spec §4.C).
        assert_eq!(kinds("a == b"), vec![Var, Equal, Equal, Var]);
    }
}
