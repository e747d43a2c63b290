use std::time::{Duration, Instant};

use log::warn;

use crate::{
    error::RuntimeError,
    interpreter::{context::EvaluationContext, evaluator::core::EvalResult},
};

/// Resource guard of one evaluation.
///
/// Tracks elapsed wall-clock time and the number of budget units spent. The
/// evaluator consults it before every node visit and builtins charge it for
/// internal iteration, so every loop in the engine passes through
/// [`Guard::charge`].
#[derive(Debug)]
pub struct Guard {
    started:  Instant,
    deadline: Duration,
    budget:   u64,
    spent:    u64,
}

impl Guard {
    /// Starts the clock for an evaluation under `ctx`.
    #[must_use]
    pub fn new(ctx: &EvaluationContext) -> Self {
        Self { started:  Instant::now(),
               deadline: ctx.deadline,
               budget:   ctx.node_budget,
               spent:    0, }
    }

    /// Accounts for one node visit.
    ///
    /// # Errors
    /// See [`Guard::charge`].
    pub fn visit(&mut self, offset: usize) -> EvalResult<()> {
        self.charge(1, offset)
    }

    /// Spends `units` of the budget after checking the deadline.
    ///
    /// A zero deadline therefore fails on the first check, which makes
    /// timeouts reproducible in tests.
    ///
    /// # Errors
    /// - `RuntimeError::Timeout` once the elapsed time reaches the deadline.
    /// - `RuntimeError::BudgetExceeded` once more units were spent than the
    ///   budget allows.
    ///
    /// # Example
    /// ```
    /// use keycalc::{
    ///     error::RuntimeError,
    ///     interpreter::{context::EvaluationContext, evaluator::guard::Guard},
    /// };
    ///
    /// let ctx = EvaluationContext { node_budget: 2,
    ///                               ..EvaluationContext::default() };
    /// let mut guard = Guard::new(&ctx);
    /// assert!(guard.visit(0).is_ok());
    /// assert!(guard.visit(0).is_ok());
    /// assert!(matches!(guard.visit(3), Err(RuntimeError::BudgetExceeded { limit: 2, offset: 3 })));
    /// ```
    pub fn charge(&mut self, units: u64, offset: usize) -> EvalResult<()> {
        if self.started.elapsed() >= self.deadline {
            warn!("evaluation aborted at offset {offset}: deadline of {:?} reached",
                  self.deadline);
            return Err(RuntimeError::Timeout { limit_ms: self.deadline.as_millis(),
                                               offset });
        }
        self.spent = self.spent.saturating_add(units);
        if self.spent > self.budget {
            warn!("evaluation aborted at offset {offset}: budget of {} exhausted", self.budget);
            return Err(RuntimeError::BudgetExceeded { limit: self.budget,
                                                      offset });
        }
        Ok(())
    }

    /// Charges one unit per element of a vector or matrix operation.
    ///
    /// # Errors
    /// See [`Guard::charge`].
    pub fn charge_elements(&mut self, count: usize, offset: usize) -> EvalResult<()> {
        self.charge(u64::try_from(count).unwrap_or(u64::MAX), offset)
    }

    /// Units spent so far.
    #[must_use]
    pub const fn spent(&self) -> u64 {
        self.spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_deadline_times_out_immediately() {
        let ctx = EvaluationContext { deadline: Duration::ZERO,
                                      ..EvaluationContext::default() };
        let mut guard = Guard::new(&ctx);
        assert_eq!(guard.visit(0), Err(RuntimeError::Timeout { limit_ms: 0, offset: 0 }));
    }

    #[test]
    fn large_charges_saturate() {
        let mut guard = Guard::new(&EvaluationContext::default());
        assert!(guard.charge(u64::MAX, 0).is_err());
        assert_eq!(guard.spent(), u64::MAX);
    }
}
