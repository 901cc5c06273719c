//! Condition sublanguage for FernDB
//!
//! Parses compound boolean expressions over attribute references and
//! literals, and evaluates them against a tuple given a schema. OR binds
//! looser than AND; `=` and `==` are synonyms. Parsing returns a
//! `Result`; evaluation returns a boolean and reports coercion failures
//! through the [`Output`] side channel.

use crate::catalog::{DataType, Schema};
use crate::error::{Error, Result};
use crate::output::Output;
use crate::storage::Tuple;
use regex::Regex;
use std::cmp::Ordering;

/// Relational operator of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Try to parse an operator token
    pub fn from_token(s: &str) -> Option<CompareOp> {
        match s {
            "=" | "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Neq),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            _ => None,
        }
    }

    /// Whether an ordering between the operands satisfies this operator
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
        }
    }
}

/// Right operand of a comparison: another attribute of the same tuple, or a
/// literal kept raw and coerced at evaluation time
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Attribute(usize),
    Literal(String),
}

/// A parsed WHERE condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        attribute: usize,
        op: CompareOp,
        right: Operand,
    },
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Parse a condition string against the given schema
    pub fn parse(condition: &str, schema: &Schema) -> Result<Condition> {
        let normalized = normalize_operators(condition);
        parse_normalized(normalized.trim(), schema)
    }

    /// Evaluate this condition against a tuple. Coercion failures emit one
    /// diagnostic line and make the comparison false.
    pub fn evaluate(&self, tuple: &Tuple, schema: &Schema, out: &mut Output) -> bool {
        match self {
            Condition::And(left, right) => {
                left.evaluate(tuple, schema, out) && right.evaluate(tuple, schema, out)
            }
            Condition::Or(left, right) => {
                left.evaluate(tuple, schema, out) || right.evaluate(tuple, schema, out)
            }
            Condition::Compare {
                attribute,
                op,
                right,
            } => evaluate_compare(*attribute, *op, right, tuple, schema, out),
        }
    }
}

/// Put single spaces around relational operators so `x>=3` and `x >= 3`
/// tokenize identically.
fn normalize_operators(condition: &str) -> String {
    let re = Regex::new(r"\s*(>=|<=|!=|==|=|<|>)\s*").unwrap();
    re.replace_all(condition, " $1 ").trim().to_string()
}

fn parse_normalized(condition: &str, schema: &Schema) -> Result<Condition> {
    let stripped = strip_outer_parens(condition);

    let or_parts = split_top_level(stripped, " or ");
    if or_parts.len() > 1 {
        return fold_parts(or_parts, schema, Condition::Or);
    }

    let and_parts = split_top_level(stripped, " and ");
    if and_parts.len() > 1 {
        return fold_parts(and_parts, schema, Condition::And);
    }

    parse_comparison(stripped, schema)
}

fn fold_parts(
    parts: Vec<&str>,
    schema: &Schema,
    combine: fn(Box<Condition>, Box<Condition>) -> Condition,
) -> Result<Condition> {
    let mut iter = parts.into_iter();
    let first = iter.next().expect("split always yields at least one part");
    let mut condition = parse_normalized(first, schema)?;
    for part in iter {
        condition = combine(
            Box::new(condition),
            Box::new(parse_normalized(part, schema)?),
        );
    }
    Ok(condition)
}

/// Strip fully enclosing parenthesis pairs; inner parentheses stay to anchor
/// depth counting.
fn strip_outer_parens(condition: &str) -> &str {
    let mut current = condition.trim();
    while current.starts_with('(') && current.ends_with(')') {
        let bytes = current.as_bytes();
        let mut depth = 0i32;
        let mut close = 0usize;
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                close = i;
                break;
            }
        }
        if close == current.len() - 1 {
            current = current[1..current.len() - 1].trim();
        } else {
            break;
        }
    }
    current
}

/// Split on a case-insensitive separator at parenthesis depth zero.
fn split_top_level<'a>(input: &'a str, separator: &str) -> Vec<&'a str> {
    let bytes = input.as_bytes();
    let sep = separator.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut last = 0usize;
    let mut i = 0usize;
    while i + sep.len() <= bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {
                if depth == 0 && bytes[i..i + sep.len()].eq_ignore_ascii_case(sep) {
                    parts.push(input[last..i].trim());
                    last = i + sep.len();
                    i = last;
                    continue;
                }
            }
        }
        i += 1;
    }
    parts.push(input[last..].trim());
    parts
}

/// Parse a simple `attr op operand` comparison.
fn parse_comparison(condition: &str, schema: &Schema) -> Result<Condition> {
    let (left, rest) = split_first_token(condition)
        .ok_or_else(|| Error::InvalidCondition(condition.to_string()))?;
    let (op_token, right_raw) =
        split_first_token(rest).ok_or_else(|| Error::InvalidCondition(condition.to_string()))?;
    if right_raw.is_empty() {
        return Err(Error::InvalidCondition(condition.to_string()));
    }

    let op = CompareOp::from_token(op_token)
        .ok_or_else(|| Error::InvalidCondition(condition.to_string()))?;
    let attribute = schema
        .index_of(left)
        .ok_or_else(|| Error::AttributeNotFound(left.to_string()))?;

    let right_token = strip_quotes(right_raw);
    let right = match schema.index_of(right_token) {
        Some(index) => Operand::Attribute(index),
        None => Operand::Literal(right_token.to_string()),
    };

    Ok(Condition::Compare {
        attribute,
        op,
        right,
    })
}

/// Split off the first whitespace-delimited token; the remainder keeps its
/// interior spacing (text literals may contain spaces).
fn split_first_token(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.find(char::is_whitespace) {
        Some(pos) => Some((&trimmed[..pos], trimmed[pos..].trim_start())),
        None => Some((trimmed, "")),
    }
}

/// Trim one surrounding double quote from each end
fn strip_quotes(token: &str) -> &str {
    let token = token.strip_prefix('"').unwrap_or(token);
    token.strip_suffix('"').unwrap_or(token)
}

fn evaluate_compare(
    attribute: usize,
    op: CompareOp,
    right: &Operand,
    tuple: &Tuple,
    schema: &Schema,
    out: &mut Output,
) -> bool {
    let attr = match schema.attribute(attribute) {
        Some(attr) => attr,
        None => {
            out.line("Error evaluating condition: attribute position out of range.");
            return false;
        }
    };
    let left_value = match tuple.get(attribute) {
        Some(value) => value,
        None => {
            out.line(format!(
                "Error evaluating condition: no value for attribute '{}'.",
                attr.name
            ));
            return false;
        }
    };

    // Both sides coerce to the left attribute's declared domain.
    match attr.data_type {
        DataType::Integer => {
            let left = match left_value.as_int() {
                Some(v) => v,
                None => return coercion_failure(out, &left_value.to_string(), "integer"),
            };
            let right = match resolve_raw(right, tuple) {
                Some(raw) => match raw.trim().parse::<i32>() {
                    Ok(v) => v,
                    Err(_) => return coercion_failure(out, &raw, "integer"),
                },
                None => return coercion_failure(out, "NULL", "integer"),
            };
            op.holds(left.cmp(&right))
        }
        DataType::Float => {
            let left = match left_value.as_float() {
                Some(v) => v,
                None => return coercion_failure(out, &left_value.to_string(), "float"),
            };
            let right = match resolve_raw(right, tuple) {
                Some(raw) => match raw.trim().parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => return coercion_failure(out, &raw, "float"),
                },
                None => return coercion_failure(out, "NULL", "float"),
            };
            match left.partial_cmp(&right) {
                Some(ord) => op.holds(ord),
                None => {
                    out.line("Error evaluating condition: float operands are not comparable.");
                    false
                }
            }
        }
        DataType::Text => {
            let left = match left_value.as_text() {
                Some(v) => v,
                None => return coercion_failure(out, "NULL", "text"),
            };
            let right = match resolve_raw(right, tuple) {
                Some(raw) => raw,
                None => return coercion_failure(out, "NULL", "text"),
            };
            op.holds(left.cmp(&right))
        }
    }
}

/// Raw textual form of the right operand: the referenced attribute's value
/// rendered, or the literal as written.
fn resolve_raw(operand: &Operand, tuple: &Tuple) -> Option<String> {
    match operand {
        Operand::Attribute(index) => tuple.get(*index).and_then(|v| v.as_text()),
        Operand::Literal(raw) => Some(raw.clone()),
    }
}

fn coercion_failure(out: &mut Output, raw: &str, domain: &str) -> bool {
    out.line(format!(
        "Error evaluating condition: value '{}' is not a valid {}.",
        raw, domain
    ));
    false
}
