use crate::parser::Parser;
use lsl_ast::ast::*;
use lsl_ast::{Name, Spanned};
use lsl_lexer::TokenKind;

impl Parser {
    /// `{ stmt* }`. Fails only when end of input arrives before the
    /// closing brace; broken statements inside are recovered individually.
    pub(crate) fn parse_block(&mut self) -> Result<Block, ()> {
        let start = self.start_span();
        self.expect(&TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace | TokenKind::Eof) {
            stmts.push(self.parse_stmt_recovering());
        }

        if self.at_eof() {
            self.error("unexpected end of input: missing '}'");
            return Err(());
        }
        self.advance();
        Ok(Spanned::new(stmts, self.end_span(start)))
    }

    /// Parse one statement; on failure skip past it and yield `Malformed`.
    fn parse_stmt_recovering(&mut self) -> Stmt {
        let start = self.start_span();
        match self.parse_stmt() {
            Ok(stmt) => Spanned::new(stmt, self.end_span(start)),
            Err(()) => {
                self.recover_stmt();
                Spanned::new(StmtKind::Malformed, self.end_span(start))
            }
        }
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<StmtKind, ()> {
        match self.peek().clone() {
            TokenKind::LBrace => Ok(StmtKind::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.advance();
                Ok(StmtKind::Empty)
            }
            TokenKind::Type(_) => self.parse_decl_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Return => {
                self.advance();
                let value = if matches!(self.peek(), TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&TokenKind::Semicolon)?;
                Ok(StmtKind::Return(value))
            }
            TokenKind::State => {
                self.advance();
                let target = if self.eat(&TokenKind::Default) {
                    "default".to_string()
                } else {
                    self.expect_ident()?.0
                };
                self.expect(&TokenKind::Semicolon)?;
                Ok(StmtKind::StateChange(Name::from(target)))
            }
            TokenKind::While | TokenKind::For | TokenKind::Do | TokenKind::Jump | TokenKind::At => {
                self.parse_unsupported()
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let delta = if matches!(self.advance().kind, TokenKind::PlusPlus) { 1 } else { -1 };
                let (target, _) = self.expect_ident()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(StmtKind::Step {
                    target: Name::from(target),
                    delta,
                })
            }
            TokenKind::Ident(name) => {
                let op = match self.peek_at(1) {
                    TokenKind::Eq => Some(AssignOp::Eq),
                    TokenKind::PlusEq => Some(AssignOp::PlusEq),
                    TokenKind::MinusEq => Some(AssignOp::MinusEq),
                    TokenKind::StarEq => Some(AssignOp::StarEq),
                    TokenKind::SlashEq => Some(AssignOp::SlashEq),
                    _ => None,
                };
                if let Some(op) = op {
                    self.advance();
                    self.advance();
                    let value = self.parse_expr()?;
                    self.expect(&TokenKind::Semicolon)?;
                    return Ok(StmtKind::Assign {
                        target: Name::from(name),
                        op,
                        value,
                    });
                }
                if matches!(self.peek_at(1), TokenKind::PlusPlus | TokenKind::MinusMinus) {
                    self.advance();
                    let delta = if matches!(self.advance().kind, TokenKind::PlusPlus) { 1 } else { -1 };
                    self.expect(&TokenKind::Semicolon)?;
                    return Ok(StmtKind::Step {
                        target: Name::from(name),
                        delta,
                    });
                }
                self.parse_expr_stmt()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtKind, ()> {
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(StmtKind::Expr(expr))
    }

    fn parse_decl_stmt(&mut self) -> Result<StmtKind, ()> {
        let ty = self.parse_type()?;
        let (name, _) = self.expect_ident()?;
        let value = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(StmtKind::Decl {
            ty,
            name: Name::from(name),
            value,
        })
    }

    /// `if (cond) stmt [else stmt]`
    fn parse_if_stmt(&mut self) -> Result<StmtKind, ()> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;

        let then_start = self.start_span();
        let then_branch = self.parse_stmt()?;
        let then_branch = Box::new(Spanned::new(then_branch, self.end_span(then_start)));

        let else_branch = if self.eat(&TokenKind::Else) {
            let else_start = self.start_span();
            let stmt = self.parse_stmt()?;
            Some(Box::new(Spanned::new(stmt, self.end_span(else_start))))
        } else {
            None
        };

        Ok(StmtKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// Loops, jumps and labels are skipped whole so the rest of the body
    /// still parses.
    fn parse_unsupported(&mut self) -> Result<StmtKind, ()> {
        let keyword = self.advance();
        let label = match keyword.kind {
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Do => "do",
            TokenKind::Jump => "jump",
            _ => "label",
        };

        match keyword.kind {
            TokenKind::While | TokenKind::For => {
                self.skip_parenthesized()?;
                self.parse_stmt()?;
            }
            TokenKind::Do => {
                self.parse_stmt()?;
                self.expect(&TokenKind::While)?;
                self.skip_parenthesized()?;
                self.expect(&TokenKind::Semicolon)?;
            }
            _ => {
                self.expect_ident()?;
                self.expect(&TokenKind::Semicolon)?;
            }
        }

        self.warn(
            format!("'{}' is not supported and will be skipped", label),
            keyword.span,
        );
        Ok(StmtKind::Unsupported(label.to_string()))
    }

    fn skip_parenthesized(&mut self) -> Result<(), ()> {
        self.expect(&TokenKind::LParen)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                TokenKind::Eof => {
                    self.error("unexpected end of input: missing ')'");
                    return Err(());
                }
                _ => {}
            }
        }
        Ok(())
    }
}
