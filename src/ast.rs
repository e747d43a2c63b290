use crate::interpreter::{registry::core::Builtin, value::core::Value};

/// An abstract syntax tree (AST) node representing a calculator expression.
///
/// `Expr` is a strict tree: the parser only ever creates new nodes, so no
/// node is shared and no cycle can exist. Each variant carries the byte offset
/// of the token that introduced it, for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The constant value.
        value:  Value,
        /// Byte offset in the input.
        offset: usize,
    },
    /// Reference to a variable by name, resolved at evaluation time.
    Variable {
        /// Name of the variable.
        name:   String,
        /// Byte offset in the input.
        offset: usize,
    },
    /// A unary operation (negation or unary plus).
    UnaryOp {
        /// The unary operator to apply.
        op:     UnaryOperator,
        /// The operand expression.
        expr:   Box<Self>,
        /// Byte offset in the input.
        offset: usize,
    },
    /// A binary operation, explicit or synthesized by implicit
    /// multiplication.
    BinaryOp {
        /// Left operand.
        left:   Box<Self>,
        /// The operator.
        op:     BinaryOperator,
        /// Right operand.
        right:  Box<Self>,
        /// Byte offset in the input.
        offset: usize,
    },
    /// Call of a builtin resolved at parse time (e.g. `sin(x)`).
    Call {
        /// The builtin being called.
        function:  Builtin,
        /// Arguments in call order.
        arguments: Vec<Self>,
        /// Byte offset in the input.
        offset:    usize,
    },
    /// Vector literal such as `[1, 2, 3]`.
    VectorLiteral {
        /// Elements of the vector.
        elements: Vec<Self>,
        /// Byte offset in the input.
        offset:   usize,
    },
    /// Matrix literal such as `[1, 2; 3, 4]`, rows already checked to be of
    /// equal length.
    MatrixLiteral {
        /// Rows of the matrix.
        rows:   Vec<Vec<Self>>,
        /// Byte offset in the input.
        offset: usize,
    },
}

impl Expr {
    /// Gets the byte offset from `self`.
    /// ## Example
    /// ```
    /// use keycalc::ast::Expr;
    ///
    /// let expr = Expr::Variable { name:   "x".to_string(),
    ///                             offset: 5, };
    ///
    /// assert_eq!(expr.offset(), 5);
    /// ```
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Literal { offset, .. }
            | Self::Variable { offset, .. }
            | Self::UnaryOp { offset, .. }
            | Self::BinaryOp { offset, .. }
            | Self::Call { offset, .. }
            | Self::VectorLiteral { offset, .. }
            | Self::MatrixLiteral { offset, .. } => *offset,
        }
    }

    /// Counts the nodes of the tree.
    ///
    /// Iterative, so arbitrarily deep trees are safe to measure.
    ///
    /// ## Example
    /// ```
    /// use keycalc::{ast::Expr, interpreter::{lexer::tokenize, parser::core::parse}};
    ///
    /// let tree = parse(&tokenize("1 + 2 * 3").unwrap()).unwrap();
    /// assert_eq!(tree.node_count(), 5);
    /// ```
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            match node {
                Self::Literal { .. } | Self::Variable { .. } => {},
                Self::UnaryOp { expr, .. } => pending.push(expr),
                Self::BinaryOp { left, right, .. } => {
                    pending.push(left);
                    pending.push(right);
                },
                Self::Call { arguments, .. } => pending.extend(arguments),
                Self::VectorLiteral { elements, .. } => pending.extend(elements),
                Self::MatrixLiteral { rows, .. } => pending.extend(rows.iter().flatten()),
            }
        }
        count
    }
}

impl Drop for Expr {
    /// Drops the tree with an explicit stack, so a long chain of boxes cannot
    /// overflow the thread's stack on the way down.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            take_children(&mut node, &mut pending);
        }
    }
}

/// Moves the children of `node` onto `pending`, leaving leaves in their place.
fn take_children(node: &mut Expr, pending: &mut Vec<Expr>) {
    match node {
        Expr::Literal { .. } | Expr::Variable { .. } => {},
        Expr::UnaryOp { expr, .. } => pending.push(std::mem::replace(&mut **expr, placeholder())),
        Expr::BinaryOp { left, right, .. } => {
            pending.push(std::mem::replace(&mut **left, placeholder()));
            pending.push(std::mem::replace(&mut **right, placeholder()));
        },
        Expr::Call { arguments, .. } => pending.append(arguments),
        Expr::VectorLiteral { elements, .. } => pending.append(elements),
        Expr::MatrixLiteral { rows, .. } => pending.extend(rows.drain(..).flatten()),
    }
}

fn placeholder() -> Expr {
    Expr::Literal { value:  Value::Real(0.0),
                    offset: 0, }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, element-wise and comparison
/// operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`, or two adjacent operands)
    Mul,
    /// Division (`/`)
    Div,
    /// Element-wise multiplication (`.*`)
    ElemMul,
    /// Element-wise division (`./`)
    ElemDiv,
    /// Exponentiation (`^`)
    Pow,
    /// Remainder (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Unary plus (e.g. `+x`); checks that the operand is numeric.
    Plus,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, Div, ElemDiv, ElemMul, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
            NotEqual, Pow, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            ElemMul => ".*",
            ElemDiv => "./",
            Pow => "^",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
                        Self::Negate => "-",
                        Self::Plus => "+",
                    })
    }
}
