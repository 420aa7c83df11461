use serde::Serialize;

/// Every kind of token the Photon lexer can produce (spec §3's closed
/// enumeration), plus the string-interpolation machinery and the two
/// special kinds every lexer needs for end-of-input/recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Identifiers & literals ─────────────────────────────────────────
    Var,
    Num,
    Underline,

    // ── Delimiters ─────────────────────────────────────────────────────
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    // ── Block / string framing ─────────────────────────────────────────
    /// Emitted at the end of a logical statement that opens a nested block
    /// (`if ...:`, `def f():`, ...).
    BeginBlock,
    SingleQuote,
    DoubleQuote,
    /// Literal text content between string delimiters/interpolations.
    StringContent,
    /// `{` opening a string interpolation placeholder.
    InterpolationStart,
    /// `}` closing a string interpolation placeholder.
    InterpolationEnd,

    // ── Operators ──────────────────────────────────────────────────────
    Equal,
    Operator,
    Hashtag,

    // ── Keyword-like statement tokens ──────────────────────────────────
    IfStatement,
    ElifStatement,
    ElseStatement,
    ForStatement,
    InStatement,
    WhileStatement,
    DefStatement,
    ClassStatement,
    ReturnStatement,
    BreakStatement,
    ImportStatement,
    FromStatement,
    Print,
    Input,
    Type,

    // ── Special ────────────────────────────────────────────────────────
    Eof,
    Error,
}

/// A single token: the parser's input unit (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub indent: u32,
    pub line: u32,
    pub column: u32,
    pub filename: String,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        value: impl Into<String>,
        indent: u32,
        line: u32,
        column: u32,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            value: value.into(),
            indent,
            line,
            column,
            filename: filename.into(),
        }
    }
}

/// Look up a keyword-like statement token from its source spelling.
/// The lexer calls this after scanning an identifier-shaped run to decide
/// whether it names a keyword or an ordinary `Var`.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match s {
        "if" => IfStatement,
        "elif" => ElifStatement,
        "else" => ElseStatement,
        "for" => ForStatement,
        "in" => InStatement,
        "while" => WhileStatement,
        "def" => DefStatement,
        "class" => ClassStatement,
        "return" => ReturnStatement,
        "break" => BreakStatement,
        "import" => ImportStatement,
        "from" => FromStatement,
        "print" => Print,
        "input" => Input,
        "type" => Type,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_all_keywords() {
        let pairs = [
            ("if", TokenKind::IfStatement),
            ("elif", TokenKind::ElifStatement),
            ("else", TokenKind::ElseStatement),
            ("for", TokenKind::ForStatement),
            ("in", TokenKind::InStatement),
            ("while", TokenKind::WhileStatement),
            ("def", TokenKind::DefStatement),
            ("class", TokenKind::ClassStatement),
            ("return", TokenKind::ReturnStatement),
            ("break", TokenKind::BreakStatement),
            ("import", TokenKind::ImportStatement),
            ("from", TokenKind::FromStatement),
            ("print", TokenKind::Print),
            ("input", TokenKind::Input),
            ("type", TokenKind::Type),
        ];
        for (text, expected) in pairs {
            assert_eq!(keyword_from_str(text), Some(expected));
        }
    }

    #[test]
    fn keyword_from_str_rejects_identifiers() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str("If"), None);
    }
}
