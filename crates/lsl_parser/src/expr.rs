use crate::parser::Parser;
use lsl_ast::ast::*;
use lsl_ast::{Name, Spanned};
use lsl_lexer::TokenKind;

/// Binary precedence levels, loosest first. Unary operators and casts sit
/// one level below the last entry.
const LEVEL_COUNT: u8 = 9;

fn binop_at(level: u8, kind: &TokenKind) -> Option<BinOp> {
    let op = match (level, kind) {
        (0, TokenKind::PipePipe) => BinOp::Or,
        (1, TokenKind::AmpAmp) => BinOp::And,
        (2, TokenKind::Pipe) => BinOp::BitOr,
        (3, TokenKind::Caret) => BinOp::BitXor,
        (4, TokenKind::Amp) => BinOp::BitAnd,
        (5, TokenKind::EqEq) => BinOp::Eq,
        (5, TokenKind::BangEq) => BinOp::NotEq,
        (6, TokenKind::Lt) => BinOp::Lt,
        (6, TokenKind::Gt) => BinOp::Gt,
        (6, TokenKind::LtEq) => BinOp::LtEq,
        (6, TokenKind::GtEq) => BinOp::GtEq,
        (7, TokenKind::Plus) => BinOp::Add,
        (7, TokenKind::Minus) => BinOp::Sub,
        (8, TokenKind::Star) => BinOp::Mul,
        (8, TokenKind::Slash) => BinOp::Div,
        (8, TokenKind::Percent) => BinOp::Mod,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    #[allow(clippy::result_unit_err)]
    pub fn parse_expr(&mut self) -> Result<Expr, ()> {
        self.parse_binary(0)
    }

    // ── Precedence levels ────────────────────────────────────────

    fn parse_binary(&mut self, level: u8) -> Result<Expr, ()> {
        if level == LEVEL_COUNT {
            return self.parse_unary();
        }
        let start = self.start_span();
        let mut lhs = self.parse_binary(level + 1)?;
        while let Some(op) = binop_at(level, self.peek()) {
            self.advance();
            let rhs = self.parse_binary(level + 1)?;
            lhs = Spanned::new(
                ExprKind::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                self.end_span(start),
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ()> {
        let start = self.start_span();
        let op = match self.peek() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Spanned::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                self.end_span(start),
            ));
        }

        // `(type) expr`
        if let (TokenKind::LParen, TokenKind::Type(ty), TokenKind::RParen) =
            (self.peek(), self.peek_at(1), self.peek_at(2))
        {
            let ty = *ty;
            self.advance();
            self.advance();
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Spanned::new(
                ExprKind::Cast {
                    ty,
                    expr: Box::new(expr),
                },
                self.end_span(start),
            ));
        }

        self.parse_primary()
    }

    // ── Primary expressions ──────────────────────────────────────

    fn parse_primary(&mut self) -> Result<Expr, ()> {
        let start = self.start_span();
        let node = match self.peek().clone() {
            TokenKind::Int(n) => {
                self.advance();
                ExprKind::IntLit(n)
            }
            TokenKind::Float(f) => {
                self.advance();
                ExprKind::FloatLit(f)
            }
            TokenKind::String(s) => {
                self.advance();
                ExprKind::StringLit(s)
            }
            TokenKind::Ident(name) => {
                self.advance();
                if matches!(self.peek(), TokenKind::LParen) {
                    let args = self.parse_delimited(TokenKind::LParen, TokenKind::RParen)?;
                    ExprKind::Call {
                        callee: Name::from(name),
                        args,
                    }
                } else {
                    ExprKind::Ident(Name::from(name))
                }
            }
            TokenKind::LBracket => {
                let items = self.parse_delimited(TokenKind::LBracket, TokenKind::RBracket)?;
                ExprKind::List(items)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                inner.node
            }
            TokenKind::Lt => {
                self.error("vector and rotation literals are not supported");
                return Err(());
            }
            _ => {
                self.error(format!("expected expression, found {:?}", self.peek()));
                return Err(());
            }
        };

        if matches!(self.peek(), TokenKind::Dot) {
            self.error("member access is not supported");
            return Err(());
        }
        Ok(Spanned::new(node, self.end_span(start)))
    }

    /// Comma-separated expressions between `open` and `close`.
    fn parse_delimited(&mut self, open: TokenKind, close: TokenKind) -> Result<Vec<Expr>, ()> {
        self.expect(&open)?;
        let mut items = Vec::new();
        while !self.at(&close) {
            items.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&close)?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> ExprKind {
        let (parsed, diags) = crate::parse_expr(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
        parsed.expect("expression").node
    }

    fn binop(kind: &ExprKind) -> BinOp {
        match kind {
            ExprKind::BinOp { op, .. } => *op,
            other => panic!("expected binop, got {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let e = expr("1 + 2 * 3");
        assert_eq!(binop(&e), BinOp::Add);
        let ExprKind::BinOp { rhs, .. } = e else { unreachable!() };
        assert_eq!(binop(&rhs.node), BinOp::Mul);
    }

    #[test]
    fn comparison_binds_tighter_than_logical() {
        let e = expr("a == 1 && b != 2 || c");
        assert_eq!(binop(&e), BinOp::Or);
        let ExprKind::BinOp { lhs, .. } = e else { unreachable!() };
        assert_eq!(binop(&lhs.node), BinOp::And);
    }

    #[test]
    fn bitwise_and_below_equality() {
        // `change & CHANGED_OWNER` in a condition
        let e = expr("change & CHANGED_OWNER");
        assert_eq!(binop(&e), BinOp::BitAnd);
    }

    #[test]
    fn cast_applies_to_unary_operand() {
        let e = expr("(string)level + \"x\"");
        assert_eq!(binop(&e), BinOp::Add);
        let ExprKind::BinOp { lhs, .. } = e else { unreachable!() };
        assert!(matches!(lhs.node, ExprKind::Cast { ty: TypeName::String, .. }));
    }

    #[test]
    fn parenthesized_is_not_a_cast() {
        let e = expr("(a) + 1");
        assert_eq!(binop(&e), BinOp::Add);
    }

    #[test]
    fn call_with_list_argument() {
        let e = expr("llJsonGetValue(msg, [\"type\"])");
        let ExprKind::Call { callee, args } = e else {
            panic!("expected call");
        };
        assert_eq!(callee, "llJsonGetValue");
        assert_eq!(args.len(), 2);
        assert!(matches!(&args[1].node, ExprKind::List(items) if items.len() == 1));
    }

    #[test]
    fn negated_literal_counts_as_literal() {
        assert!(expr("-5").is_literal());
        assert!(expr("[\"a\", 1, NULL_KEY]").is_literal());
        assert!(!expr("foo()").is_literal());
    }

    #[test]
    fn vector_literal_is_rejected() {
        let (parsed, diags) = crate::parse_expr("<1, 0, 0>");
        assert!(parsed.is_none());
        assert!(diags[0].message.contains("vector"));
    }
}
