use crate::parser::Parser;
use lsl_ast::ast::*;
use lsl_ast::{Name, Spanned};
use lsl_lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_type(&mut self) -> Result<TypeName, ()> {
        match self.peek() {
            TokenKind::Type(ty) => {
                let ty = *ty;
                self.advance();
                Ok(ty)
            }
            _ => {
                self.error(format!("expected type, found {:?}", self.peek()));
                Err(())
            }
        }
    }

    /// `TYPE name [= expr];`
    pub(crate) fn parse_global(&mut self) -> Result<GlobalDecl, ()> {
        let ty = self.parse_type()?;
        let (name, _) = self.expect_ident()?;
        let value = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(GlobalDecl {
            ty,
            name: Name::from(name),
            value,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ()> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !matches!(self.peek(), TokenKind::RParen) {
            let ty = self.parse_type()?;
            let (name, _) = self.expect_ident()?;
            params.push(Param {
                ty,
                name: Name::from(name),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// `[TYPE] name(params) { ... }`
    pub(crate) fn parse_function(&mut self) -> Result<FnDecl, ()> {
        let return_ty = match self.peek() {
            TokenKind::Type(_) => Some(self.parse_type()?),
            _ => None,
        };
        let (name, name_span) = self.expect_ident()?;
        let params = self.parse_params()?;
        let body = self.parse_block().inspect_err(|_| {
            self.warn(format!("function '{}' dropped: unterminated body", name), name_span);
        })?;
        Ok(FnDecl {
            name: Name::from(name),
            return_ty,
            params,
            body,
        })
    }

    /// `default { handlers }` or `state name { handlers }`.
    ///
    /// A state left open at end of input keeps the handlers that did close.
    pub(crate) fn parse_state(&mut self) -> Result<StateDecl, ()> {
        let name = if self.eat(&TokenKind::Default) {
            Name::from("default")
        } else {
            self.expect(&TokenKind::State)?;
            Name::from(self.expect_ident()?.0)
        };
        self.expect(&TokenKind::LBrace)?;

        let mut handlers = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace | TokenKind::Eof) {
            let start = self.start_span();
            match self.parse_handler() {
                Ok(handler) => handlers.push(Spanned::new(handler, self.end_span(start))),
                Err(()) => self.recover_stmt(),
            }
        }

        if self.at_eof() {
            self.error(format!("state '{}' is missing its closing '}}'", name));
        } else {
            self.advance();
        }
        Ok(StateDecl { name, handlers })
    }

    /// `event(params) { ... }`
    fn parse_handler(&mut self) -> Result<HandlerDecl, ()> {
        let (event, event_span) = self.expect_ident()?;
        let params = self.parse_params()?;
        let body = self.parse_block().inspect_err(|_| {
            self.warn(format!("handler '{}' dropped: unterminated body", event), event_span);
        })?;
        Ok(HandlerDecl {
            event: Name::from(event),
            params,
            body,
        })
    }
}
