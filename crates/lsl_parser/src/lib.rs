pub mod parser;
mod decl;
mod expr;
mod stmt;

pub use lsl_ast::diagnostic::{Diagnostic, Severity, SourceMap};
use lsl_ast::ast::{Expr, Script};
use parser::Parser;

/// Parse a whole script. Parsing never aborts: problems are reported as
/// diagnostics and the affected statement or declaration is skipped.
pub fn parse(source: &str) -> (Script, Vec<Diagnostic>) {
    Parser::new(source).parse()
}

/// Parse a standalone expression (used by the CLI `eval` command).
pub fn parse_expr(source: &str) -> (Option<Expr>, Vec<Diagnostic>) {
    let mut parser = Parser::new(source);
    let expr = parser.parse_expr().ok();
    if expr.is_some() && !parser.at_eof() {
        parser.error(format!("unexpected trailing input {:?}", parser.peek()));
    }
    (expr, parser.into_diagnostics())
}
