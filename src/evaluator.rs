// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::{ExprNode, Expression, FieldPred, Filter, Query};
use crate::document::Document;
use crate::operators::regex::cached_regex;
use crate::value::Value;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::{bail, Result};

impl Query {
    /// Evaluate the query against a document.
    ///
    /// Evaluation never mutates the compiled tree or the document, so a
    /// single compiled query may serve many documents.
    pub fn matches(&self, doc: &Document) -> Result<bool> {
        eval_filter(&self.filter, doc)
    }
}

impl Expression {
    /// Evaluate the expression against a document, yielding a value.
    /// An unresolved field reference yields [`Value::Missing`].
    pub fn eval(&self, doc: &Document) -> Result<Value> {
        eval_expr(&self.node, doc)
    }
}

fn eval_filter(filter: &Filter, doc: &Document) -> Result<bool> {
    Ok(match filter {
        Filter::And(subs) => {
            for sub in subs {
                if !eval_filter(sub, doc)? {
                    return Ok(false);
                }
            }
            true
        }
        Filter::Or(subs) => {
            for sub in subs {
                if eval_filter(sub, doc)? {
                    return Ok(true);
                }
            }
            false
        }
        Filter::Nor(subs) => {
            for sub in subs {
                if eval_filter(sub, doc)? {
                    return Ok(false);
                }
            }
            true
        }
        Filter::Not(sub) => !eval_filter(sub, doc)?,
        Filter::Expr(expr) => eval_expr(expr, doc)?.is_truthy(),
        Filter::Field(path, pred) => {
            let resolved = doc.resolve_path(path);
            eval_field_pred(pred, &resolved)?
        }
    })
}

// A predicate on an array value matches the array as a whole or any of
// its elements; this is what makes fanned-out paths match per element.
fn any_or_whole(v: &Value, pred: impl Fn(&Value) -> bool) -> bool {
    if pred(v) {
        return true;
    }
    match v {
        Value::Array(a) => a.iter().any(pred),
        _ => false,
    }
}

fn match_eq(resolved: &Value, target: &Value) -> bool {
    // { field: null } matches the absent field too.
    if target.is_null() && resolved.is_missing() {
        return true;
    }
    any_or_whole(resolved, |v| v == target)
}

// Inequalities follow the canonical cross-type ordering. An array value
// matches per element; whole-array comparison applies only against an
// array target, so `{$gt: 70}` cannot match an array by rank alone.
fn match_ord(resolved: &Value, target: &Value, accept: fn(Ordering) -> bool) -> bool {
    match resolved {
        Value::Missing => false,
        Value::Array(a) => {
            (matches!(target, Value::Array(_)) && accept(resolved.cmp(target)))
                || a.iter().any(|e| accept(e.cmp(target)))
        }
        _ => accept(resolved.cmp(target)),
    }
}

fn eval_field_pred(pred: &FieldPred, resolved: &Value) -> Result<bool> {
    Ok(match pred {
        FieldPred::Eq(t) => match_eq(resolved, t),
        FieldPred::Ne(t) => !match_eq(resolved, t),
        FieldPred::Gt(t) => match_ord(resolved, t, |o| o == Ordering::Greater),
        FieldPred::Gte(t) => match_ord(resolved, t, |o| o != Ordering::Less),
        FieldPred::Lt(t) => match_ord(resolved, t, |o| o == Ordering::Less),
        FieldPred::Lte(t) => match_ord(resolved, t, |o| o != Ordering::Greater),
        FieldPred::In(list) => list.iter().any(|t| match_eq(resolved, t)),
        FieldPred::Nin(list) => !list.iter().any(|t| match_eq(resolved, t)),
        FieldPred::Exists(expected) => !resolved.is_missing() == *expected,
        FieldPred::Type(tags) => {
            any_or_whole(resolved, |v| tags.iter().any(|tag| tag.matches(v)))
        }
        FieldPred::Size(n) => matches!(resolved, Value::Array(a) if a.len() == *n),
        FieldPred::All(items) => {
            !items.is_empty() && items.iter().all(|item| match_eq(resolved, item))
        }
        FieldPred::Mod(divisor, remainder) => any_or_whole(resolved, |v| match v {
            Value::Number(n) => (n.as_f64().trunc() as i64).wrapping_rem(*divisor) == *remainder,
            _ => false,
        }),
        FieldPred::Matches(pattern) => {
            let re = cached_regex(pattern)?;
            any_or_whole(resolved, |v| matches!(v, Value::String(s) if re.is_match(s)))
        }
        FieldPred::Not(sub) => !eval_field_pred(sub, resolved)?,
        FieldPred::AllOf(subs) => {
            for sub in subs {
                if !eval_field_pred(sub, resolved)? {
                    return Ok(false);
                }
            }
            true
        }
    })
}

fn eval_expr(node: &ExprNode, doc: &Document) -> Result<Value> {
    Ok(match node {
        ExprNode::Literal(v) => v.clone(),
        ExprNode::FieldRef(path) => doc.resolve_path(path),
        ExprNode::ArrayLit(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let v = eval_expr(item, doc)?;
                // An unresolved member reads as null inside an array literal.
                out.push(if v.is_missing() { Value::Null } else { v });
            }
            Value::from(out)
        }
        ExprNode::ObjectLit(fields) => {
            let mut m = BTreeMap::new();
            for (key, sub) in fields {
                let v = eval_expr(sub, doc)?;
                // Unresolved members are omitted from object literals.
                if !v.is_missing() {
                    m.insert(key.clone(), v);
                }
            }
            Value::from(m)
        }
        ExprNode::Op { name, fcn, args } => {
            let mut argv = Vec::with_capacity(args.len());
            for arg in args {
                argv.push(eval_expr(arg, doc)?);
            }
            fcn(name, &argv)?
        }
        ExprNode::And(args) => {
            for arg in args {
                if !eval_expr(arg, doc)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
            }
            Value::Bool(true)
        }
        ExprNode::Or(args) => {
            for arg in args {
                if eval_expr(arg, doc)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
            }
            Value::Bool(false)
        }
        ExprNode::IfNull(primary, fallback) => {
            let v = eval_expr(primary, doc)?;
            if v.is_nullish() {
                eval_expr(fallback, doc)?
            } else {
                v
            }
        }
        ExprNode::Cond {
            cond,
            then,
            otherwise,
        } => {
            // Only the taken branch is evaluated.
            if eval_expr(cond, doc)?.is_truthy() {
                eval_expr(then, doc)?
            } else {
                eval_expr(otherwise, doc)?
            }
        }
        ExprNode::Switch { branches, default } => {
            for (case, then) in branches {
                if eval_expr(case, doc)?.is_truthy() {
                    return eval_expr(then, doc);
                }
            }
            match default {
                Some(d) => eval_expr(d, doc)?,
                None => {
                    bail!("$switch could not find a matching branch, and no default was specified")
                }
            }
        }
    })
}
