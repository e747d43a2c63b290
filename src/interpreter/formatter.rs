use crate::interpreter::{
    context::EvaluationContext,
    value::{complex::ComplexNumber, core::Value},
};

/// Renders a value for the display.
///
/// - Reals use fixed point with `ctx.decimal_places` digits and trailing
///   zeros removed, or scientific notation when forced or when a non-zero
///   magnitude leaves `[ctx.sci_lower, ctx.sci_upper)`.
/// - Complex numbers render as `a + bi` / `a - bi`, even when `b` is zero.
/// - Vectors render as `[1, 2, 3]`, matrices as `[1, 2; 3, 4]`.
/// - Errors render as the short message of their kind.
///
/// # Example
/// ```
/// use keycalc::interpreter::{
///     context::EvaluationContext, formatter::format_value, value::core::Value,
/// };
///
/// let ctx = EvaluationContext::default();
/// assert_eq!(format_value(&Value::Real(4.0), &ctx), "4");
/// assert_eq!(format_value(&Value::Real(0.000_000_15), &ctx), "1.5e-7");
/// assert_eq!(format_value(&Value::from(vec![1.0, 2.5]), &ctx), "[1, 2.5]");
/// ```
#[must_use]
pub fn format_value(value: &Value, ctx: &EvaluationContext) -> String {
    match value {
        Value::Real(x) => format_real(*x, ctx),
        Value::Complex(c) => format_complex(*c, ctx),
        Value::Vector(v) => format!("[{}]", join(v, ctx)),
        Value::Matrix(m) => {
            let rows: Vec<String> = m.row_iter().map(|row| join(row, ctx)).collect();
            format!("[{}]", rows.join("; "))
        },
        Value::Boolean(b) => b.to_string(),
        Value::Error(kind, _) => kind.message().to_string(),
    }
}

/// Renders a real number.
///
/// # Example
/// ```
/// use keycalc::interpreter::{context::EvaluationContext, formatter::format_real};
///
/// let ctx = EvaluationContext::default();
/// assert_eq!(format_real(0.5, &ctx), "0.5");
/// assert_eq!(format_real(-0.0, &ctx), "0");
/// assert_eq!(format_real(2.5e12, &ctx), "2.5e12");
/// ```
#[must_use]
pub fn format_real(x: f64, ctx: &EvaluationContext) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }

    let magnitude = x.abs();
    if ctx.scientific_notation || magnitude >= ctx.sci_upper || magnitude < ctx.sci_lower {
        let text = format!("{x:.*e}", ctx.decimal_places);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{exponent}", trim_fraction(mantissa)),
            None => text,
        };
    }

    let text = format!("{x:.*}", ctx.decimal_places);
    match trim_fraction(&text) {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn format_complex(c: ComplexNumber, ctx: &EvaluationContext) -> String {
    let re = format_real(c.re, ctx);
    if c.im < 0.0 {
        format!("{re} - {}i", format_real(-c.im, ctx))
    } else {
        format!("{re} + {}i", format_real(c.im, ctx))
    }
}

fn join(entries: &[f64], ctx: &EvaluationContext) -> String {
    entries.iter().map(|x| format_real(*x, ctx)).collect::<Vec<_>>().join(", ")
}

/// Drops trailing zeros of a fractional part, and the point if nothing is
/// left after it.
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') { text.trim_end_matches('0').trim_end_matches('.') } else { text }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::ErrorKind, interpreter::value::matrix::Matrix};

    #[test]
    fn complex_keeps_zero_imaginary_part() {
        let ctx = EvaluationContext::default();
        assert_eq!(format_value(&ComplexNumber::new(3.0, 0.0).into(), &ctx), "3 + 0i");
        assert_eq!(format_value(&ComplexNumber::new(0.0, -1.5).into(), &ctx), "0 - 1.5i");
    }

    #[test]
    fn matrix_rows_are_separated() {
        let ctx = EvaluationContext::default();
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 0).unwrap();
        assert_eq!(format_value(&m.into(), &ctx), "[1, 2; 3, 4]");
    }

    #[test]
    fn precision_rounds() {
        let ctx = EvaluationContext { decimal_places: 3,
                                      ..EvaluationContext::default() };
        assert_eq!(format_real(2.0 / 3.0, &ctx), "0.667");
        assert_eq!(format_real(12_345.678_9, &ctx), "12345.679");
    }

    #[test]
    fn tiny_negative_rounds_to_plain_zero() {
        let ctx = EvaluationContext { decimal_places: 2,
                                      sci_lower: 0.0,
                                      ..EvaluationContext::default() };
        assert_eq!(format_real(-0.001, &ctx), "0");
    }

    #[test]
    fn forced_scientific() {
        let ctx = EvaluationContext { scientific_notation: true,
                                      ..EvaluationContext::default() };
        assert_eq!(format_real(1234.0, &ctx), "1.234e3");
    }

    #[test]
    fn errors_show_their_kind() {
        let ctx = EvaluationContext::default();
        let value = Value::Error(ErrorKind::Timeout, "details".to_string());
        assert_eq!(format_value(&value, &ctx), "Calculation timeout");
    }
}
