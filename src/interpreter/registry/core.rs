use log::trace;

use crate::{
    error::{ParseError, RuntimeError},
    interpreter::{
        context::EvaluationContext,
        evaluator::{core::EvalResult, guard::Guard},
        parser::core::ParseResult,
        registry::{
            complex, constants, hyperbolic, linalg, logarithm, numeric, special, sqrt, stats,
            trig,
        },
        value::core::Value,
    },
};

/// Largest argument count of the variadic statistics functions.
pub const MAX_ARGUMENTS: usize = 32;

/// Evaluation rule of a builtin.
///
/// Receives the evaluated arguments, whose count already lies within the
/// descriptor's arity range, and the state of the running call.
pub type Rule = fn(&[Value], &mut Invocation<'_>) -> EvalResult<Value>;

/// State available to a rule while it runs.
pub struct Invocation<'a> {
    /// Byte offset of the call, for error reporting.
    pub offset: usize,
    /// Context of the running evaluation.
    pub ctx:    &'a EvaluationContext,
    guard:      &'a mut Guard,
}

impl<'a> Invocation<'a> {
    /// Creates the invocation of a call at `offset`.
    pub const fn new(offset: usize, ctx: &'a EvaluationContext, guard: &'a mut Guard) -> Self {
        Self { offset, ctx, guard }
    }

    /// Charges `units` of work against the evaluation budget.
    ///
    /// Rules that loop over vector or matrix entries call this before doing
    /// the work, so internal iteration is bounded like node visits.
    ///
    /// # Errors
    /// `RuntimeError::Timeout` or `RuntimeError::BudgetExceeded`.
    pub fn charge(&mut self, units: usize) -> EvalResult<()> {
        self.guard.charge_elements(units, self.offset)
    }

    /// Mutable access to the guard, for rules that delegate to operators.
    pub fn guard(&mut self) -> &mut Guard {
        &mut *self.guard
    }
}

/// Predicate a real first argument must satisfy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Domain {
    /// Every real.
    Any,
    /// `x > 0`; in complex mode every non-zero real.
    Positive,
    /// `x >= 0`; in complex mode every real.
    NonNegative,
    /// `-1 <= x <= 1`.
    UnitInterval,
    /// `-1 < x < 1`.
    OpenUnitInterval,
    /// `x >= 1`.
    AtLeastOne,
}

impl Domain {
    /// Tests `x` against the predicate.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::registry::core::Domain;
    ///
    /// assert!(Domain::UnitInterval.admits(-1.0, false));
    /// assert!(!Domain::Positive.admits(-4.0, false));
    /// assert!(Domain::Positive.admits(-4.0, true));
    /// assert!(!Domain::Positive.admits(0.0, true));
    /// ```
    #[must_use]
    pub fn admits(self, x: f64, complex_mode: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Positive => x > 0.0 || (complex_mode && x < 0.0),
            Self::NonNegative => x >= 0.0 || complex_mode,
            Self::UnitInterval => (-1.0..=1.0).contains(&x),
            Self::OpenUnitInterval => x > -1.0 && x < 1.0,
            Self::AtLeastOne => x >= 1.0,
        }
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Any => "a real argument",
            Self::Positive => "a positive argument",
            Self::NonNegative => "a non-negative argument",
            Self::UnitInterval => "an argument in [-1, 1]",
            Self::OpenUnitInterval => "an argument in (-1, 1)",
            Self::AtLeastOne => "an argument of at least 1",
        }
    }
}

/// Everything known about one builtin.
pub struct FunctionDescriptor {
    /// The enumeration variant naming this builtin.
    pub builtin:   Builtin,
    /// Name as typed by the user.
    pub name:      &'static str,
    /// Fewest arguments accepted.
    pub min_arity: usize,
    /// Most arguments accepted.
    pub max_arity: usize,
    /// Budget units charged per call, on top of the node visit.
    pub cost:      usize,
    /// Predicate on a real first argument.
    pub domain:    Domain,
    rule:          Rule,
}

impl std::fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDescriptor")
         .field("name", &self.name)
         .field("min_arity", &self.min_arity)
         .field("max_arity", &self.max_arity)
         .field("cost", &self.cost)
         .field("domain", &self.domain)
         .finish_non_exhaustive()
    }
}

/// Declares the builtin table.
///
/// Each entry provides the enumeration variant, the name, an inclusive arity
/// range, a cost hint, a domain predicate and a rule. The macro produces:
/// - `Builtin`, the closed enumeration of callable functions,
/// - `BUILTIN_TABLE`, the descriptors in declaration order,
/// - `BUILTIN_FUNCTIONS`, the list of names.
macro_rules! builtin_functions {
    (
        $(
            $variant:ident => {
                name: $name:literal,
                arity: $min:literal ..= $max:expr,
                cost: $cost:literal,
                domain: $domain:ident,
                rule: $rule:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// A builtin function or constant.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }
        static BUILTIN_TABLE: &[FunctionDescriptor] = &[
            $(
                FunctionDescriptor { builtin:   Builtin::$variant,
                                     name:      $name,
                                     min_arity: $min,
                                     max_arity: $max,
                                     cost:      $cost,
                                     domain:    Domain::$domain,
                                     rule:      $rule, },
            )*
        ];
        /// Names of all builtins, in declaration order.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    Pi        => { name: "pi",        arity: 0..=0, cost: 1, domain: Any, rule: constants::pi },
    E         => { name: "e",         arity: 0..=0, cost: 1, domain: Any, rule: constants::e },
    Tau       => { name: "tau",       arity: 0..=0, cost: 1, domain: Any, rule: constants::tau },
    Phi       => { name: "phi",       arity: 0..=0, cost: 1, domain: Any, rule: constants::phi },
    I         => { name: "i",         arity: 0..=0, cost: 1, domain: Any, rule: constants::i },

    Sin       => { name: "sin",       arity: 1..=1, cost: 2, domain: Any, rule: trig::sin },
    Cos       => { name: "cos",       arity: 1..=1, cost: 2, domain: Any, rule: trig::cos },
    Tan       => { name: "tan",       arity: 1..=1, cost: 2, domain: Any, rule: trig::tan },
    Asin      => { name: "asin",      arity: 1..=1, cost: 2, domain: UnitInterval, rule: trig::asin },
    Acos      => { name: "acos",      arity: 1..=1, cost: 2, domain: UnitInterval, rule: trig::acos },
    Atan      => { name: "atan",      arity: 1..=1, cost: 2, domain: Any, rule: trig::atan },
    Atan2     => { name: "atan2",     arity: 2..=2, cost: 2, domain: Any, rule: trig::atan2 },

    Sinh      => { name: "sinh",      arity: 1..=1, cost: 2, domain: Any, rule: hyperbolic::sinh },
    Cosh      => { name: "cosh",      arity: 1..=1, cost: 2, domain: Any, rule: hyperbolic::cosh },
    Tanh      => { name: "tanh",      arity: 1..=1, cost: 2, domain: Any, rule: hyperbolic::tanh },
    Asinh     => { name: "asinh",     arity: 1..=1, cost: 2, domain: Any, rule: hyperbolic::asinh },
    Acosh     => { name: "acosh",     arity: 1..=1, cost: 2, domain: AtLeastOne, rule: hyperbolic::acosh },
    Atanh     => { name: "atanh",     arity: 1..=1, cost: 2, domain: OpenUnitInterval, rule: hyperbolic::atanh },

    Ln        => { name: "ln",        arity: 1..=1, cost: 2, domain: Positive, rule: logarithm::ln },
    Log       => { name: "log",       arity: 1..=2, cost: 2, domain: Positive, rule: logarithm::log },
    Log2      => { name: "log2",      arity: 1..=1, cost: 2, domain: Positive, rule: logarithm::log2 },
    Log10     => { name: "log10",     arity: 1..=1, cost: 2, domain: Positive, rule: logarithm::log10 },
    Exp       => { name: "exp",       arity: 1..=1, cost: 2, domain: Any, rule: logarithm::exp },
    Pow       => { name: "pow",       arity: 2..=2, cost: 2, domain: Any, rule: logarithm::pow },
    Sqrt      => { name: "sqrt",      arity: 1..=2, cost: 2, domain: NonNegative, rule: sqrt::sqrt },

    Mean      => { name: "mean",      arity: 1..=MAX_ARGUMENTS, cost: 1, domain: Any, rule: stats::mean },
    Median    => { name: "median",    arity: 1..=MAX_ARGUMENTS, cost: 1, domain: Any, rule: stats::median },
    Stddev    => { name: "stddev",    arity: 1..=MAX_ARGUMENTS, cost: 1, domain: Any, rule: stats::stddev },
    Variance  => { name: "variance",  arity: 1..=MAX_ARGUMENTS, cost: 1, domain: Any, rule: stats::variance },
    Sum       => { name: "sum",       arity: 1..=MAX_ARGUMENTS, cost: 1, domain: Any, rule: stats::sum },
    Min       => { name: "min",       arity: 1..=MAX_ARGUMENTS, cost: 1, domain: Any, rule: stats::min },
    Max       => { name: "max",       arity: 1..=MAX_ARGUMENTS, cost: 1, domain: Any, rule: stats::max },

    Abs       => { name: "abs",       arity: 1..=1, cost: 1, domain: Any, rule: numeric::abs },
    Round     => { name: "round",     arity: 1..=2, cost: 1, domain: Any, rule: numeric::round },
    Floor     => { name: "floor",     arity: 1..=1, cost: 1, domain: Any, rule: numeric::floor },
    Ceil      => { name: "ceil",      arity: 1..=1, cost: 1, domain: Any, rule: numeric::ceil },
    Trunc     => { name: "trunc",     arity: 1..=1, cost: 1, domain: Any, rule: numeric::trunc },
    Sign      => { name: "sign",      arity: 1..=1, cost: 1, domain: Any, rule: numeric::sign },
    Factorial => { name: "factorial", arity: 1..=1, cost: 1, domain: Any, rule: numeric::factorial },
    Gcd       => { name: "gcd",       arity: 2..=2, cost: 1, domain: Any, rule: numeric::gcd },
    Lcm       => { name: "lcm",       arity: 2..=2, cost: 1, domain: Any, rule: numeric::lcm },
    Degrees   => { name: "degrees",   arity: 1..=1, cost: 1, domain: Any, rule: numeric::degrees },
    Radians   => { name: "radians",   arity: 1..=1, cost: 1, domain: Any, rule: numeric::radians },
    Hypot     => { name: "hypot",     arity: 2..=2, cost: 1, domain: Any, rule: numeric::hypot },
    Fmod      => { name: "fmod",      arity: 2..=2, cost: 1, domain: Any, rule: numeric::fmod },
    Remainder => { name: "remainder", arity: 2..=2, cost: 1, domain: Any, rule: numeric::remainder },
    Copysign  => { name: "copysign",  arity: 2..=2, cost: 1, domain: Any, rule: numeric::copysign },
    Ldexp     => { name: "ldexp",     arity: 2..=2, cost: 1, domain: Any, rule: numeric::ldexp },

    Gamma     => { name: "gamma",     arity: 1..=1, cost: 4, domain: Any, rule: special::gamma },
    Lgamma    => { name: "lgamma",    arity: 1..=1, cost: 4, domain: Any, rule: special::lgamma },
    Erf       => { name: "erf",       arity: 1..=1, cost: 4, domain: Any, rule: special::erf },
    Erfc      => { name: "erfc",      arity: 1..=1, cost: 4, domain: Any, rule: special::erfc },

    Re        => { name: "re",        arity: 1..=1, cost: 1, domain: Any, rule: complex::re },
    Im        => { name: "im",        arity: 1..=1, cost: 1, domain: Any, rule: complex::im },
    Conj      => { name: "conj",      arity: 1..=1, cost: 1, domain: Any, rule: complex::conj },
    Arg       => { name: "arg",       arity: 1..=1, cost: 1, domain: Any, rule: complex::arg },

    Dot       => { name: "dot",       arity: 2..=2, cost: 1, domain: Any, rule: linalg::dot },
    Cross     => { name: "cross",     arity: 2..=2, cost: 1, domain: Any, rule: linalg::cross },
    Det       => { name: "det",       arity: 1..=1, cost: 1, domain: Any, rule: linalg::det },
    Inv       => { name: "inv",       arity: 1..=1, cost: 1, domain: Any, rule: linalg::inv },
    Transpose => { name: "transpose", arity: 1..=1, cost: 1, domain: Any, rule: linalg::transpose },
    Identity  => { name: "identity",  arity: 1..=1, cost: 1, domain: Any, rule: linalg::identity },
}

impl Builtin {
    /// The descriptor of this builtin.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::registry::core::Builtin;
    ///
    /// let log = Builtin::Log.descriptor();
    /// assert_eq!((log.name, log.min_arity, log.max_arity), ("log", 1, 2));
    /// ```
    #[must_use]
    pub fn descriptor(self) -> &'static FunctionDescriptor {
        // The table is generated in variant order.
        &BUILTIN_TABLE[self as usize]
    }

    /// Name as typed by the user.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Finds the builtin called `name`.
///
/// # Errors
/// `ParseError::UnknownFunction` if no builtin has that name; `offset` is
/// reported in the error.
///
/// # Example
/// ```
/// use keycalc::interpreter::registry::core::{Builtin, lookup};
///
/// assert_eq!(lookup("sqrt", 0).unwrap().builtin, Builtin::Sqrt);
/// assert!(lookup("system", 0).is_err());
/// ```
pub fn lookup(name: &str, offset: usize) -> ParseResult<&'static FunctionDescriptor> {
    BUILTIN_TABLE.iter()
                 .find(|descriptor| descriptor.name == name)
                 .ok_or_else(|| ParseError::UnknownFunction { name: name.to_string(),
                                                              offset })
}

/// Returns `true` if `name` is a builtin function or constant.
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

impl FunctionDescriptor {
    /// Tests whether `count` arguments are acceptable.
    #[must_use]
    pub const fn accepts(&self, count: usize) -> bool {
        count >= self.min_arity && count <= self.max_arity
    }

    /// Returns `true` for zero-arity builtins, which may be written without
    /// parentheses.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        self.max_arity == 0
    }

    /// Human readable arity, e.g. `1` or `1 to 2`.
    #[must_use]
    pub fn arity_text(&self) -> String {
        if self.min_arity == self.max_arity {
            self.min_arity.to_string()
        } else {
            format!("{} to {}", self.min_arity, self.max_arity)
        }
    }

    /// Calls the builtin.
    ///
    /// Charges the cost hint, checks the domain predicate against a real first
    /// argument and runs the rule.
    ///
    /// # Errors
    /// - `RuntimeError::ArgumentCountMismatch` if the argument count is out of
    ///   range (the parser normally rejects this first).
    /// - `RuntimeError::Domain` if the predicate fails.
    /// - Anything the rule or the guard raises.
    pub fn call(&self, args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
        invocation.charge(self.cost)?;
        if !self.accepts(args.len()) {
            return Err(RuntimeError::ArgumentCountMismatch { name:   self.name.to_string(),
                                                             found:  args.len(),
                                                             offset: invocation.offset, });
        }
        if let Some(Value::Real(x)) = args.first()
           && !self.domain.admits(*x, invocation.ctx.complex_mode)
        {
            return Err(RuntimeError::Domain { details: format!("{} needs {}, got {x}",
                                                               self.name,
                                                               self.domain.describe()),
                                              offset:  invocation.offset, });
        }
        trace!("calling {} with {} argument(s)", self.name, args.len());
        (self.rule)(args, invocation)
    }
}

/// Extracts the only argument of a one-argument rule.
pub(crate) fn single(args: &[Value], offset: usize) -> EvalResult<&Value> {
    args.first().ok_or(RuntimeError::MissingValue { offset })
}

/// Extracts the two arguments of a two-argument rule.
pub(crate) fn pair(args: &[Value], offset: usize) -> EvalResult<(&Value, &Value)> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(RuntimeError::MissingValue { offset }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_enumeration() {
        for descriptor in BUILTIN_TABLE {
            assert_eq!(descriptor.builtin.descriptor().name, descriptor.name);
        }
        assert_eq!(BUILTIN_TABLE.len(), BUILTIN_FUNCTIONS.len());
    }

    #[test]
    fn names_are_unique() {
        let mut names = BUILTIN_FUNCTIONS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BUILTIN_FUNCTIONS.len());
    }

    #[test]
    fn constants_take_no_arguments() {
        for name in ["pi", "e", "tau", "phi", "i"] {
            assert!(lookup(name, 0).unwrap().is_constant());
        }
        assert!(!lookup("sin", 0).unwrap().is_constant());
    }

    #[test]
    fn log_accepts_one_or_two_arguments() {
        let log = lookup("log", 0).unwrap();
        assert!(!log.accepts(0));
        assert!(log.accepts(1));
        assert!(log.accepts(2));
        assert!(!log.accepts(3));
        assert_eq!(log.arity_text(), "1 to 2");
    }
}
