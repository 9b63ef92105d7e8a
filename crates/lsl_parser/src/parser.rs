use lsl_ast::ast::*;
use lsl_ast::diagnostic::Diagnostic;
use lsl_ast::{Span, Spanned};
use lsl_lexer::{Lexer, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    // ── Token helpers ────────────────────────────────────────────

    pub fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn peek_span(&self) -> Span {
        self.tokens.get(self.pos).map(|t| t.span).unwrap_or_else(|| {
            self.tokens
                .last()
                .map(|t| Span::point(t.span.end))
                .unwrap_or(Span::dummy())
        })
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::dummy()));
        if self.pos < self.tokens.len() && tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token, ()> {
        if self.at(expected) {
            Ok(self.advance())
        } else {
            self.error(format!("expected {:?}, found {:?}", expected, self.peek()));
            Err(())
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(String, Span), ()> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                let tok = self.advance();
                Ok((name, tok.span))
            }
            _ => {
                self.error(format!("expected identifier, found {:?}", self.peek()));
                Err(())
            }
        }
    }

    pub(crate) fn start_span(&self) -> usize {
        self.peek_span().start
    }

    pub(crate) fn end_span(&self, start: usize) -> Span {
        let end = if self.pos > 0 {
            self.tokens[self.pos - 1].span.end
        } else {
            start
        };
        Span::new(start, end)
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let span = self.peek_span();
        // Lexer errors carry their own message; report that instead.
        let message = match self.peek() {
            TokenKind::Error(lex_msg) => lex_msg.clone(),
            _ => message.into(),
        };
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::warning(message, span));
    }

    // ── Recovery ─────────────────────────────────────────────────

    /// Skip the remainder of a broken statement: up to and including the
    /// next `;` at depth 0, or through a braced block (and any `else`
    /// branches hanging off it). Stops before a `}` that closes the
    /// enclosing block.
    pub(crate) fn recover_stmt(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        if !matches!(self.peek(), TokenKind::Else) {
                            return;
                        }
                        continue;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip a broken top-level item: a `;`-terminated declaration or a
    /// balanced `{ ... }` body.
    pub(crate) fn recover_top_level(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    self.advance();
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                    continue;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ── Script parsing ───────────────────────────────────────────

    pub fn parse(mut self) -> (Script, Vec<Diagnostic>) {
        let script = self.parse_script();
        (script, self.diagnostics)
    }

    /// Consume the parser and return its collected diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn parse_script(&mut self) -> Script {
        let mut items = Vec::new();
        while !self.at_eof() {
            let start = self.start_span();
            let parsed = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
                (TokenKind::Default, _, _) | (TokenKind::State, _, _) => {
                    self.parse_state().map(TopLevel::State)
                }
                (TokenKind::Type(_), TokenKind::Ident(_), TokenKind::LParen)
                | (TokenKind::Ident(_), TokenKind::LParen, _) => {
                    self.parse_function().map(TopLevel::Function)
                }
                (TokenKind::Type(_), _, _) => self.parse_global().map(TopLevel::Global),
                _ => {
                    self.error(format!(
                        "expected declaration, function or state, found {:?}",
                        self.peek()
                    ));
                    Err(())
                }
            };
            match parsed {
                Ok(item) => items.push(Spanned::new(item, self.end_span(start))),
                Err(()) => self.recover_top_level(),
            }
        }
        Script { items }
    }
}
