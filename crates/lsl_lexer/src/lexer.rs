use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use lsl_ast::Span;

/// Tokenizer for LSL source. Yields every token up to and including `Eof`.
///
/// Whitespace and comments never produce tokens; statement boundaries are
/// carried by `;` and braces.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            done: false,
        }
    }

    /// Skips whitespace, `//` and `/* */` comments. An unterminated block
    /// comment runs to end of input.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(char::is_whitespace);

            match (self.cursor.peek(), self.cursor.peek_next()) {
                (Some('/'), Some('/')) => {
                    self.cursor.eat_while(|ch| ch != '\n');
                }
                (Some('/'), Some('*')) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_eof() {
                        if self.cursor.peek() == Some('*') && self.cursor.peek_next() == Some('/') {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_string(&mut self) -> TokenKind {
        // Opening quote already consumed
        let mut value = String::new();
        loop {
            match self.cursor.advance() {
                None => return TokenKind::Error("unterminated string".into()),
                Some('"') => return TokenKind::String(value),
                Some('\\') => match self.cursor.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push_str("    "),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(ch) => value.push(ch),
                    None => return TokenKind::Error("unterminated string escape".into()),
                },
                Some(ch) => value.push(ch),
            }
        }
    }

    fn lex_number(&mut self, start: usize) -> TokenKind {
        let first = self.cursor.slice(start, self.cursor.pos());

        if first == "0" && matches!(self.cursor.peek(), Some('x' | 'X')) {
            self.cursor.advance();
            let digits_start = self.cursor.pos();
            self.cursor.eat_while(|ch| ch.is_ascii_hexdigit());
            let digits = self.cursor.slice(digits_start, self.cursor.pos());
            return match i64::from_str_radix(digits, 16) {
                Ok(n) => TokenKind::Int(n),
                Err(_) => TokenKind::Error(format!("invalid hex literal '0x{digits}'")),
            };
        }

        self.cursor.eat_while(|ch| ch.is_ascii_digit());
        let mut is_float = first == ".";

        if !is_float && self.cursor.peek() == Some('.') {
            self.cursor.advance();
            is_float = true;
        }
        if is_float {
            self.cursor.eat_while(|ch| ch.is_ascii_digit());
        }
        if matches!(self.cursor.peek(), Some('e' | 'E'))
            && self
                .cursor
                .peek_next()
                .is_some_and(|ch| ch.is_ascii_digit() || ch == '-' || ch == '+')
        {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|ch| ch.is_ascii_digit());
            is_float = true;
        }
        // LSL permits a trailing `f` on float literals
        if is_float {
            self.cursor.eat('f');
        }

        let text = self
            .cursor
            .slice(start, self.cursor.pos())
            .trim_end_matches('f');
        if is_float {
            match text.parse::<f64>() {
                Ok(f) => TokenKind::Float(f),
                Err(_) => TokenKind::Error(format!("invalid float literal '{text}'")),
            }
        } else {
            match text.parse::<i64>() {
                // LSL integers are 32-bit and wrap
                Ok(n) => TokenKind::Int(n as i32 as i64),
                Err(_) => TokenKind::Error(format!("invalid integer literal '{text}'")),
            }
        }
    }

    fn lex_word(&mut self, start: usize) -> TokenKind {
        self.cursor
            .eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let text = self.cursor.slice(start, self.cursor.pos());
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    /// Pick between a one-char operator and its `=`-suffixed or doubled form.
    fn pick(&mut self, doubled: Option<(char, TokenKind)>, with_eq: Option<TokenKind>, single: TokenKind) -> TokenKind {
        if let Some((ch, kind)) = doubled {
            if self.cursor.eat(ch) {
                return kind;
            }
        }
        if let Some(kind) = with_eq {
            if self.cursor.eat('=') {
                return kind;
            }
        }
        single
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.cursor.pos();
        let Some(ch) = self.cursor.advance() else {
            return Token::new(TokenKind::Eof, Span::point(start));
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '@' => TokenKind::At,
            '~' => TokenKind::Tilde,
            '^' => TokenKind::Caret,
            '%' => TokenKind::Percent,

            '.' if self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) => self.lex_number(start),
            '.' => TokenKind::Dot,

            '+' => self.pick(Some(('+', TokenKind::PlusPlus)), Some(TokenKind::PlusEq), TokenKind::Plus),
            '-' => self.pick(Some(('-', TokenKind::MinusMinus)), Some(TokenKind::MinusEq), TokenKind::Minus),
            '*' => self.pick(None, Some(TokenKind::StarEq), TokenKind::Star),
            '/' => self.pick(None, Some(TokenKind::SlashEq), TokenKind::Slash),
            '!' => self.pick(None, Some(TokenKind::BangEq), TokenKind::Bang),
            '=' => self.pick(None, Some(TokenKind::EqEq), TokenKind::Eq),
            '<' => self.pick(None, Some(TokenKind::LtEq), TokenKind::Lt),
            '>' => self.pick(None, Some(TokenKind::GtEq), TokenKind::Gt),
            '&' => self.pick(Some(('&', TokenKind::AmpAmp)), None, TokenKind::Amp),
            '|' => self.pick(Some(('|', TokenKind::PipePipe)), None, TokenKind::Pipe),

            '"' => self.lex_string(),

            ch if ch.is_ascii_digit() => self.lex_number(start),
            ch if ch.is_ascii_alphabetic() || ch == '_' => self.lex_word(start),

            _ => TokenKind::Error(format!("unexpected character '{ch}'")),
        };

        Token::new(kind, Span::new(start, self.cursor.pos()))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(tok)
    }
}
