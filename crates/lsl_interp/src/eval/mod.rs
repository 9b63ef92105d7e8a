mod assign;
mod compare;
mod control;
mod dispatch;
mod ops;

#[cfg(test)]
mod tests;

// Re-export the crate-visible API.
pub(crate) use control::eval_block;
pub(crate) use dispatch::eval_expr;
