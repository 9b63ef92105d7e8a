use crate::{Name, Span, Spanned};

pub type Expr = Spanned<ExprKind>;
pub type Stmt = Spanned<StmtKind>;
pub type Block = Spanned<Vec<Stmt>>;

// ── Types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    Integer,
    Float,
    String,
    Key,
    List,
    Vector,
    Rotation,
}

impl TypeName {
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "integer" => TypeName::Integer,
            "float" => TypeName::Float,
            "string" => TypeName::String,
            "key" => TypeName::Key,
            "list" => TypeName::List,
            "vector" => TypeName::Vector,
            "rotation" | "quaternion" => TypeName::Rotation,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            TypeName::Integer => "integer",
            TypeName::Float => "float",
            TypeName::String => "string",
            TypeName::Key => "key",
            TypeName::List => "list",
            TypeName::Vector => "vector",
            TypeName::Rotation => "rotation",
        }
    }
}

// ── Expressions ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    Ident(Name),
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// `(string)x`
    Cast {
        ty: TypeName,
        expr: Box<Expr>,
    },
    Call {
        callee: Name,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl ExprKind {
    /// True for literal forms a constant declaration may carry:
    /// numbers (optionally negated), strings, bare names and lists of those.
    pub fn is_literal(&self) -> bool {
        match self {
            ExprKind::IntLit(_) | ExprKind::FloatLit(_) | ExprKind::StringLit(_) => true,
            ExprKind::Ident(name) => name.is_screaming(),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => matches!(operand.node, ExprKind::IntLit(_) | ExprKind::FloatLit(_)),
            ExprKind::List(items) => items.iter().all(|e| e.node.is_literal()),
            _ => false,
        }
    }
}

// ── Statements ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `integer x = 1;`
    Decl {
        ty: TypeName,
        name: Name,
        value: Option<Expr>,
    },
    Assign {
        target: Name,
        op: AssignOp,
        value: Expr,
    },
    /// `x++` / `--x` used as a statement.
    Step {
        target: Name,
        delta: i64,
    },
    Expr(Expr),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Return(Option<Expr>),
    Block(Block),
    /// `state name;`
    StateChange(Name),
    /// Loops, jumps and labels. Parsed so the surrounding body survives.
    Unsupported(String),
    /// A statement that failed to parse.
    Malformed,
    Empty,
}

// ── Declarations ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeName,
    pub name: Name,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDecl {
    pub ty: TypeName,
    pub name: Name,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Name,
    pub return_ty: Option<TypeName>,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerDecl {
    pub event: Name,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateDecl {
    pub name: Name,
    pub handlers: Vec<Spanned<HandlerDecl>>,
}

impl StateDecl {
    pub fn is_default(&self) -> bool {
        self.name == "default"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Global(GlobalDecl),
    Function(FnDecl),
    State(StateDecl),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub items: Vec<Spanned<TopLevel>>,
}

impl Script {
    pub fn globals(&self) -> impl Iterator<Item = (&GlobalDecl, Span)> {
        self.items.iter().filter_map(|item| match &item.node {
            TopLevel::Global(g) => Some((g, item.span)),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FnDecl> {
        self.items.iter().filter_map(|item| match &item.node {
            TopLevel::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn states(&self) -> impl Iterator<Item = &StateDecl> {
        self.items.iter().filter_map(|item| match &item.node {
            TopLevel::State(s) => Some(s),
            _ => None,
        })
    }

    pub fn default_state(&self) -> Option<&StateDecl> {
        self.states().find(|s| s.is_default())
    }
}
