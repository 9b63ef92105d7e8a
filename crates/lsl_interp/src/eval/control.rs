use lsl_ast::ast::{Block, Stmt, StmtKind};

use crate::{Env, Flow};

use super::assign::{assign, declare, step};
use super::dispatch::eval_expr;

// ── Blocks ─────────────────────────────────────────────────────

/// Run a braced block. Stops at the first `return` that fires.
pub(crate) fn eval_block(env: &mut Env, block: &Block) -> Flow {
    env.push_scope();
    let mut flow = Flow::Normal;
    for stmt in &block.node {
        flow = exec_stmt(env, stmt);
        if matches!(flow, Flow::Return(_)) {
            break;
        }
    }
    env.pop_scope();
    flow
}

// ── Statements ─────────────────────────────────────────────────

pub(super) fn exec_stmt(env: &mut Env, stmt: &Stmt) -> Flow {
    match &stmt.node {
        StmtKind::Decl { ty, name, value } => {
            declare(env, *ty, name, value.as_ref());
            Flow::Normal
        }

        StmtKind::Assign { target, op, value } => {
            assign(env, target, *op, value);
            Flow::Normal
        }

        StmtKind::Step { target, delta } => {
            step(env, target, *delta);
            Flow::Normal
        }

        StmtKind::Expr(expr) => {
            eval_expr(env, expr);
            Flow::Normal
        }

        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let taken = eval_expr(env, condition).is_truthy();
            tracing::trace!(taken, "if");
            if taken {
                exec_stmt(env, then_branch)
            } else if let Some(else_branch) = else_branch {
                exec_stmt(env, else_branch)
            } else {
                Flow::Normal
            }
        }

        StmtKind::Return(value) => Flow::Return(value.as_ref().map(|e| eval_expr(env, e))),

        StmtKind::Block(block) => eval_block(env, block),

        StmtKind::StateChange(name) => {
            tracing::debug!(state = %name, "state change ignored");
            Flow::Normal
        }

        StmtKind::Unsupported(what) => {
            tracing::warn!(what = %what, "skipping unsupported statement");
            Flow::Normal
        }

        // Failed to parse; fail open.
        StmtKind::Malformed => Flow::Normal,

        StmtKind::Empty => Flow::Normal,
    }
}
