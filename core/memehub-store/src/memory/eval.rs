//! Expression, predicate and accumulator evaluation.

use super::order::compare_values;
use crate::{StorageError, StorageResult};
use memehub_pipeline::{Accumulator, CompareOp, Expr, Predicate};
use memehub_types::{Document, get_path};
use regex_lite::{Regex, RegexBuilder};
use serde_json::Value;
use std::cmp::Ordering;

/// Reads a dotted path, treating a missing field as null.
pub(crate) fn field_value(document: &Document, path: &str) -> Value {
    get_path(document, path).cloned().unwrap_or(Value::Null)
}

// ── Numbers ─────────────────────────────────────────────────────

/// Integer arithmetic stays integral until a float operand or an overflow
/// is seen.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn from_value(value: &Value) -> Option<Self> {
        let n = value.as_number()?;
        n.as_i64()
            .map(Self::Int)
            .or_else(|| n.as_f64().map(Self::Float))
    }

    const fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn plus(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Self::Float(a as f64 + b as f64), Self::Int),
            _ => Self::Float(self.as_f64() + other.as_f64()),
        }
    }

    fn times(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_mul(b)
                .map_or_else(|| Self::Float(a as f64 * b as f64), Self::Int),
            _ => Self::Float(self.as_f64() * other.as_f64()),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Int(i) => Value::from(i),
            Self::Float(f) => Value::from(f),
        }
    }
}

fn numeric_operand(value: &Value, op: &str) -> StorageResult<Option<Num>> {
    if value.is_null() {
        return Ok(None);
    }
    Num::from_value(value)
        .map(Some)
        .ok_or_else(|| StorageError::Query(format!("{op} requires numbers, found {value}")))
}

/// Folds numeric operands; any null operand makes the result null.
fn fold_numbers(
    operands: &[Expr],
    document: &Document,
    op: &str,
    identity: Num,
    combine: fn(Num, Num) -> Num,
) -> StorageResult<Value> {
    let mut acc = identity;
    for operand in operands {
        match numeric_operand(&eval_expr(operand, document)?, op)? {
            Some(n) => acc = combine(acc, n),
            None => return Ok(Value::Null),
        }
    }
    Ok(acc.into_value())
}

// ── Expressions ─────────────────────────────────────────────────

pub(crate) fn eval_expr(expr: &Expr, document: &Document) -> StorageResult<Value> {
    match expr {
        Expr::Field(path) => Ok(field_value(document, path)),
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Size(inner) => match eval_expr(inner, document)? {
            Value::Array(items) => Ok(Value::from(items.len())),
            other => Err(StorageError::Query(format!(
                "size requires an array, found {other}"
            ))),
        },
        Expr::Add(operands) => fold_numbers(operands, document, "add", Num::Int(0), Num::plus),
        Expr::Multiply(operands) => {
            fold_numbers(operands, document, "multiply", Num::Int(1), Num::times)
        }
        Expr::DivideOrZero(numerator, denominator) => {
            let numerator = numeric_operand(&eval_expr(numerator, document)?, "divide")?;
            let denominator = numeric_operand(&eval_expr(denominator, document)?, "divide")?;
            match (numerator, denominator) {
                (_, Some(d)) if d.as_f64() == 0.0 => Ok(Value::from(0)),
                (Some(n), Some(d)) => Ok(Value::from(n.as_f64() / d.as_f64())),
                _ => Ok(Value::Null),
            }
        }
        Expr::Round(inner, places) => {
            match numeric_operand(&eval_expr(inner, document)?, "round")? {
                Some(Num::Float(f)) => Ok(Value::from(round_half_even(f, *places))),
                Some(n @ Num::Int(_)) => Ok(n.into_value()),
                None => Ok(Value::Null),
            }
        }
    }
}

fn round_half_even(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    (value * scale).round_ties_even() / scale
}

// ── Predicates ──────────────────────────────────────────────────

/// A [`Predicate`] with its regular expressions compiled once per stage.
pub(crate) enum Matcher {
    All,
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    Regex {
        field: String,
        regex: Regex,
    },
    And(Vec<Matcher>),
    Or(Vec<Matcher>),
}

impl Matcher {
    pub(crate) fn compile(predicate: &Predicate) -> StorageResult<Self> {
        Ok(match predicate {
            Predicate::All => Self::All,
            Predicate::Compare { field, op, value } => Self::Compare {
                field: field.clone(),
                op: *op,
                value: value.clone(),
            },
            Predicate::Regex {
                field,
                pattern,
                case_insensitive,
            } => Self::Regex {
                field: field.clone(),
                regex: RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .map_err(|e| StorageError::Query(format!("invalid regex {pattern:?}: {e}")))?,
            },
            Predicate::And(parts) => {
                Self::And(parts.iter().map(Self::compile).collect::<StorageResult<_>>()?)
            }
            Predicate::Or(parts) => {
                Self::Or(parts.iter().map(Self::compile).collect::<StorageResult<_>>()?)
            }
        })
    }

    pub(crate) fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Compare { field, op, value } => {
                let actual = field_value(document, field);
                match op {
                    CompareOp::Ne => !compare_matches(CompareOp::Eq, &actual, value),
                    _ => compare_matches(*op, &actual, value),
                }
            }
            Self::Regex { field, regex } => match get_path(document, field) {
                Some(Value::String(s)) => regex.is_match(s),
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|s| regex.is_match(s)),
                _ => false,
            },
            Self::And(parts) => parts.iter().all(|p| p.matches(document)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(document)),
        }
    }
}

/// Whole-value comparison, or any element when the field is an array.
fn compare_matches(op: CompareOp, actual: &Value, expected: &Value) -> bool {
    let direct = |candidate: &Value| {
        let ord = compare_values(candidate, expected);
        match op {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Ne => ord != Ordering::Equal,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
        }
    };
    direct(actual)
        || matches!(actual, Value::Array(items) if !expected.is_array() && items.iter().any(direct))
}

// ── Accumulators ────────────────────────────────────────────────

pub(crate) fn accumulate<'a>(
    accumulator: &Accumulator,
    documents: impl IntoIterator<Item = &'a Document>,
) -> StorageResult<Value> {
    match accumulator {
        Accumulator::Count => Ok(Value::from(documents.into_iter().count())),
        Accumulator::Sum(expr) => {
            let mut total = Num::Int(0);
            for document in documents {
                if let Some(n) = Num::from_value(&eval_expr(expr, document)?) {
                    total = total.plus(n);
                }
            }
            Ok(total.into_value())
        }
        Accumulator::Max(expr) => {
            let mut best = Value::Null;
            for document in documents {
                let value = eval_expr(expr, document)?;
                if !value.is_null() && compare_values(&value, &best) == Ordering::Greater {
                    best = value;
                }
            }
            Ok(best)
        }
    }
}
