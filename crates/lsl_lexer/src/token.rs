use lsl_ast::ast::TypeName;
use lsl_ast::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    String(String),

    Ident(String),
    /// `integer`, `string`, `key`, ...
    Type(TypeName),

    // Keywords
    If,
    Else,
    Return,
    State,
    Default,
    Jump,
    While,
    For,
    Do,

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ;
    Dot,       // .
    At,        // @

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Bang,       // !
    Tilde,      // ~
    Eq,         // =
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PlusPlus,   // ++
    MinusMinus, // --
    EqEq,       // ==
    BangEq,     // !=
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    AmpAmp,     // &&
    PipePipe,   // ||

    Eof,

    Error(String),
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<TokenKind> {
        Some(match word {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            "state" => TokenKind::State,
            "default" => TokenKind::Default,
            "jump" => TokenKind::Jump,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "do" => TokenKind::Do,
            _ => return TypeName::from_keyword(word).map(TokenKind::Type),
        })
    }
}
