//! Predicate evaluation.

use std::cmp::Ordering;

use trial_core::Value;
use trial_parser::{BinaryOp, Expr, Literal, LiteralKind, Slot, UnaryOp};

use crate::{EvalError, EvalResult, RowEnv};

/// Predicate evaluator.
///
/// Follows the solver's semantics so that a label assigned here is the
/// label the solver would have assigned: numbers compare across int and
/// float, booleans act as the integers 0 and 1, other values of different
/// kinds are never equal, and `and`/`or` short-circuit on truthiness.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Create a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Whether the predicate holds for the bound row.
    pub fn matches(&self, expr: &Expr, env: &RowEnv<'_>) -> EvalResult<bool> {
        Ok(self.eval(expr, env)?.is_truthy())
    }

    /// Evaluate an expression against a row environment.
    pub fn eval(&self, expr: &Expr, env: &RowEnv<'_>) -> EvalResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(self.eval_literal(lit)),
            Expr::Var(slot, _) => self.eval_var(slot, env),
            Expr::BinaryOp(op, left, right, _) => self.eval_binary_op(*op, left, right, env),
            Expr::UnaryOp(UnaryOp::Not, operand, _) => {
                Ok(Value::Bool(!self.eval(operand, env)?.is_truthy()))
            }
        }
    }

    fn eval_literal(&self, lit: &Literal) -> Value {
        match &lit.kind {
            LiteralKind::None => Value::Null,
            LiteralKind::Bool(b) => Value::Bool(*b),
            LiteralKind::Int(i) => Value::Int(*i),
            LiteralKind::Float(f) => Value::Float(*f),
            LiteralKind::String(s) => Value::String(s.clone()),
        }
    }

    fn eval_var(&self, slot: &Slot, env: &RowEnv<'_>) -> EvalResult<Value> {
        env.get(&slot.name, slot.offset)
            .cloned()
            .ok_or_else(|| EvalError::unbound_slot(&slot.name, slot.offset))
    }

    fn eval_binary_op(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        env: &RowEnv<'_>,
    ) -> EvalResult<Value> {
        let left_val = self.eval(left, env)?;

        // Connectives return an operand, evaluating the right one only if needed
        match op {
            BinaryOp::And if !left_val.is_truthy() => return Ok(left_val),
            BinaryOp::Or if left_val.is_truthy() => return Ok(left_val),
            BinaryOp::And | BinaryOp::Or => return self.eval(right, env),
            _ => {}
        }

        let right_val = self.eval(right, env)?;
        self.eval_comparison(op, &left_val, &right_val).map(Value::Bool)
    }

    fn eval_comparison(&self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult<bool> {
        match op {
            BinaryOp::Eq => return Ok(self.values_equal(left, right)),
            BinaryOp::NotEq => return Ok(!self.values_equal(left, right)),
            _ => {}
        }

        let ordering = self.compare(op, left, right)?;
        Ok(match (op, ordering) {
            (_, None) => false,
            (BinaryOp::Lt, Some(o)) => o.is_lt(),
            (BinaryOp::LtEq, Some(o)) => o.is_le(),
            (BinaryOp::Gt, Some(o)) => o.is_gt(),
            (_, Some(o)) => o.is_ge(),
        })
    }

    fn values_equal(&self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            _ => match (integral(left), integral(right)) {
                (Some(a), Some(b)) => a == b,
                _ => match (numeric(left), numeric(right)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                },
            },
        }
    }

    /// Ordering of two values; `None` when a NaN is involved.
    fn compare(&self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
        if let (Value::String(a), Value::String(b)) = (left, right) {
            return Ok(Some(a.cmp(b)));
        }
        if let (Some(a), Some(b)) = (integral(left), integral(right)) {
            return Ok(Some(a.cmp(&b)));
        }
        match (numeric(left), numeric(right)) {
            (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
            _ => Err(EvalError::type_error(format!(
                "'{}' not supported between {} and {}",
                op,
                left.type_name(),
                right.type_name()
            ))),
        }
    }
}

/// Exact integer view of Int and Bool values.
fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Numeric view of Int, Float and Bool values.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        other => other.as_f64(),
    }
}
