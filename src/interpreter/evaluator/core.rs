use log::debug;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        context::EvaluationContext,
        environment::Environment,
        evaluator::{binary::core::evaluate_binary, guard::Guard, unary::evaluate_unary},
        registry::core::Invocation,
        value::{core::Value, matrix::Matrix},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// One unit of pending work.
///
/// `Visit` schedules the children of a node; `Reduce` runs once all of them
/// have left their values on the value stack.
enum Step<'e> {
    Visit(&'e Expr),
    Reduce(&'e Expr),
}

/// Evaluates an expression tree and returns the resulting value.
///
/// The tree is walked post-order, left to right, with an explicit work stack,
/// so the depth of the tree never turns into host recursion. The guard is
/// consulted before every node visit: once the deadline has passed or the node
/// budget is spent, evaluation stops with the corresponding error. Variables
/// are resolved against `env` here and nowhere else.
///
/// # Errors
/// - `RuntimeError::UndefinedVariable` for names missing from `env`.
/// - `RuntimeError::Timeout` and `RuntimeError::BudgetExceeded` from the
///   guard.
/// - Every error raised by an operator or builtin, unchanged.
///
/// # Example
/// ```
/// use keycalc::{
///     Environment, EvaluationContext,
///     interpreter::{evaluator::core::evaluate, lexer::tokenize, parser::core::parse, value::core::Value},
/// };
///
/// let tree = parse(&tokenize("2 * (ans + 1)").unwrap()).unwrap();
/// let mut env = Environment::new();
/// env.register("ans", Value::Real(4.0)).unwrap();
///
/// let v = evaluate(&tree, &env, &EvaluationContext::default()).unwrap();
/// assert_eq!(v, Value::Real(10.0));
/// ```
pub fn evaluate(ast: &Expr, env: &Environment, ctx: &EvaluationContext) -> EvalResult<Value> {
    let mut guard = Guard::new(ctx);
    let mut work = vec![Step::Visit(ast)];
    let mut values: Vec<Value> = Vec::new();

    while let Some(step) = work.pop() {
        match step {
            Step::Visit(expr) => {
                guard.visit(expr.offset())?;
                match expr {
                    Expr::Literal { value, .. } => values.push(value.clone()),
                    Expr::Variable { name, offset } => {
                        let value = env.lookup(name)
                                       .ok_or_else(|| RuntimeError::UndefinedVariable { name:   name.clone(),
                                                                                        offset: *offset, })?;
                        values.push(value.clone());
                    },
                    _ => {
                        work.push(Step::Reduce(expr));
                        work.extend(children(expr).into_iter().rev().map(Step::Visit));
                    },
                }
            },
            Step::Reduce(expr) => {
                let value = reduce(expr, &mut values, ctx, &mut guard)?;
                values.push(value);
            },
        }
    }

    debug!("evaluation spent {} unit(s) of {}", guard.spent(), ctx.node_budget);
    values.pop().ok_or(RuntimeError::MissingValue { offset: ast.offset() })
}

/// Direct children of a node, in evaluation order.
fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Literal { .. } | Expr::Variable { .. } => Vec::new(),
        Expr::UnaryOp { expr: operand, .. } => vec![operand.as_ref()],
        Expr::BinaryOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        Expr::Call { arguments, .. } => arguments.iter().collect(),
        Expr::VectorLiteral { elements, .. } => elements.iter().collect(),
        Expr::MatrixLiteral { rows, .. } => rows.iter().flatten().collect(),
    }
}

/// Combines the values of a node's children into the node's value.
fn reduce(expr: &Expr,
          values: &mut Vec<Value>,
          ctx: &EvaluationContext,
          guard: &mut Guard)
          -> EvalResult<Value> {
    let offset = expr.offset();
    match expr {
        Expr::UnaryOp { op, .. } => {
            let operand = take(values, 1, offset)?;
            evaluate_unary(*op, &operand[0], offset)
        },
        Expr::BinaryOp { op, .. } => {
            let operands = take(values, 2, offset)?;
            evaluate_binary(*op, &operands[0], &operands[1], offset, ctx, guard)
        },
        Expr::Call { function, arguments, .. } => {
            let args = take(values, arguments.len(), offset)?;
            function.descriptor().call(&args, &mut Invocation::new(offset, ctx, guard))
        },
        Expr::VectorLiteral { elements, .. } => {
            let entries = take(values, elements.len(), offset)?;
            let entries = entries.iter()
                                 .map(|value| entry(value, offset))
                                 .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::from(entries))
        },
        Expr::MatrixLiteral { rows, .. } => {
            let total = rows.iter().map(Vec::len).sum();
            let mut entries = take(values, total, offset)?.into_iter();
            let mut matrix = Vec::with_capacity(rows.len());
            for row in rows {
                let row = entries.by_ref()
                                 .take(row.len())
                                 .map(|value| entry(&value, offset))
                                 .collect::<EvalResult<Vec<_>>>()?;
                matrix.push(row);
            }
            Ok(Value::from(Matrix::from_rows(matrix, offset)?))
        },
        Expr::Literal { .. } | Expr::Variable { .. } => Err(RuntimeError::MissingValue { offset }),
    }
}

/// Pops the last `n` values, in evaluation order.
fn take(values: &mut Vec<Value>, n: usize, offset: usize) -> EvalResult<Vec<Value>> {
    let start = values.len()
                      .checked_sub(n)
                      .ok_or(RuntimeError::MissingValue { offset })?;
    Ok(values.split_off(start))
}

/// Checks one entry of a vector or matrix literal.
fn entry(value: &Value, offset: usize) -> EvalResult<f64> {
    match value {
        Value::Real(x) => Ok(*x),
        Value::Complex(_) => {
            Err(RuntimeError::Domain { details: "vectors and matrices hold real entries only"
                                                    .to_string(),
                                       offset })
        },
        other => Err(other.mismatch("a real entry", offset)),
    }
}
