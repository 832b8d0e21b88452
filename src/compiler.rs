// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::{ExprNode, Expression, FieldPred, Filter, Query, TypeTag};
use crate::operators::{self, OPERATORS};
use crate::path::Path;
use crate::value::Value;

use anyhow::{anyhow, bail, Result};

// Queries nest arbitrarily; compilation fails rather than recursing
// without bound.
const MAX_QUERY_DEPTH: usize = 64;

impl Query {
    /// Compile a match-mode query document.
    ///
    /// The result is independent of any document and may be evaluated
    /// against many documents. Unknown operators, arity mismatches and
    /// malformed branches are rejected here, before any evaluation.
    pub fn compile(query: &Value) -> Result<Query> {
        Ok(Query {
            filter: compile_match(query, 0)?,
        })
    }
}

impl Expression {
    /// Compile an expression-mode document, as accepted under `$expr`.
    pub fn compile(expr: &Value) -> Result<Expression> {
        Ok(Expression {
            node: compile_expr(expr, 0)?,
        })
    }
}

fn descend(depth: usize) -> Result<usize> {
    if depth >= MAX_QUERY_DEPTH {
        bail!("query exceeds maximum nesting depth of {MAX_QUERY_DEPTH}");
    }
    Ok(depth + 1)
}

fn compile_match(v: &Value, depth: usize) -> Result<Filter> {
    let depth = descend(depth)?;
    let obj = match v {
        Value::Object(m) => m,
        _ => bail!("query must be an object. Got `{v}` instead"),
    };

    // Multiple fields combine with an implicit $and.
    let mut parts = vec![];
    for (key, sub) in obj.iter() {
        parts.push(match key.as_str() {
            "$and" => Filter::And(compile_match_list(key, sub, depth)?),
            "$or" => Filter::Or(compile_match_list(key, sub, depth)?),
            "$nor" => Filter::Nor(compile_match_list(key, sub, depth)?),
            "$not" => Filter::Not(Box::new(compile_match(sub, depth)?)),
            "$expr" => Filter::Expr(compile_expr(sub, depth)?),
            key if key.starts_with('$') => bail!("unknown top-level operator `{key}`"),
            path => Filter::Field(Path::parse(path), compile_field_pred(sub, depth)?),
        });
    }
    Ok(match parts.len() {
        1 => parts.remove(0),
        _ => Filter::And(parts),
    })
}

fn compile_match_list(name: &str, v: &Value, depth: usize) -> Result<Vec<Filter>> {
    match v {
        Value::Array(a) => a.iter().map(|sub| compile_match(sub, depth)).collect(),
        _ => bail!("`{name}` expects an array of queries. Got `{v}` instead"),
    }
}

// A subdocument whose first key names an operator is a predicate
// document; anything else is an equality target.
fn compile_field_pred(v: &Value, depth: usize) -> Result<FieldPred> {
    let depth = descend(depth)?;
    if let Value::Object(m) = v {
        if m.keys().any(|k| k.starts_with('$')) {
            let mut preds = vec![];
            for (op, arg) in m.iter() {
                preds.push(compile_field_op(op, arg, depth)?);
            }
            return Ok(match preds.len() {
                1 => preds.remove(0),
                _ => FieldPred::AllOf(preds),
            });
        }
    }
    Ok(FieldPred::Eq(v.clone()))
}

fn compile_field_op(op: &str, arg: &Value, depth: usize) -> Result<FieldPred> {
    Ok(match op {
        "$eq" => FieldPred::Eq(arg.clone()),
        "$ne" => FieldPred::Ne(arg.clone()),
        "$gt" => FieldPred::Gt(arg.clone()),
        "$gte" => FieldPred::Gte(arg.clone()),
        "$lt" => FieldPred::Lt(arg.clone()),
        "$lte" => FieldPred::Lte(arg.clone()),
        "$in" => FieldPred::In(expect_list(op, arg)?),
        "$nin" => FieldPred::Nin(expect_list(op, arg)?),
        "$exists" => FieldPred::Exists(match arg {
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_zero(),
            _ => bail!("$exists expression must resolve to boolean"),
        }),
        "$type" => FieldPred::Type(compile_type_tags(arg)?),
        "$size" => FieldPred::Size(match arg.as_number().ok().and_then(|n| n.as_i64()) {
            Some(n) if n >= 0 => n as usize,
            _ => bail!("$size expression must resolve to non-negative integer"),
        }),
        "$all" => FieldPred::All(expect_list(op, arg)?),
        "$mod" => compile_mod(arg)?,
        "$matches" => match arg {
            Value::String(s) => FieldPred::Matches(s.clone()),
            _ => bail!("$matches expression must resolve to string"),
        },
        "$not" => FieldPred::Not(Box::new(compile_field_pred(arg, depth)?)),
        _ => {
            if OPERATORS.contains_key(op) {
                bail!("operator `{op}` is not valid in match context");
            }
            bail!("unknown operator `{op}`");
        }
    })
}

fn expect_list(op: &str, v: &Value) -> Result<Vec<Value>> {
    match v {
        Value::Array(a) => Ok(a.to_vec()),
        _ => bail!("`{op}` expects an array. Got `{v}` instead"),
    }
}

fn compile_type_tags(arg: &Value) -> Result<Vec<TypeTag>> {
    let parse = |v: &Value| -> Result<TypeTag> {
        let s = match v {
            Value::String(s) => s,
            _ => bail!("$type expression must resolve to string"),
        };
        TypeTag::parse(s).ok_or_else(|| anyhow!("unknown type name `{s}`"))
    };
    match arg {
        Value::Array(a) => a.iter().map(parse).collect(),
        v => Ok(vec![parse(v)?]),
    }
}

fn compile_mod(arg: &Value) -> Result<FieldPred> {
    let items = match arg {
        Value::Array(a) if a.len() == 2 => a,
        _ => bail!("$mod expression must resolve to array(2)"),
    };
    let as_int = |v: &Value| v.as_number().ok().map(|n| n.as_f64().trunc() as i64);
    let (Some(divisor), Some(remainder)) = (as_int(&items[0]), as_int(&items[1])) else {
        bail!("$mod expression must resolve to array of numbers");
    };
    if divisor == 0 {
        bail!("divisor cannot be 0");
    }
    Ok(FieldPred::Mod(divisor, remainder))
}

fn compile_expr(v: &Value, depth: usize) -> Result<ExprNode> {
    let depth = descend(depth)?;
    Ok(match v {
        // A string leading with `$` is a field reference, not a literal.
        Value::String(s) if s.starts_with('$') => ExprNode::FieldRef(Path::parse(&s[1..])),
        Value::Array(a) => ExprNode::ArrayLit(
            a.iter()
                .map(|e| compile_expr(e, depth))
                .collect::<Result<_>>()?,
        ),
        Value::Object(m) => {
            let operator_keys = m.keys().filter(|k| k.starts_with('$')).count();
            if operator_keys == 0 {
                let mut fields = vec![];
                for (k, sub) in m.iter() {
                    fields.push((k.clone(), compile_expr(sub, depth)?));
                }
                ExprNode::ObjectLit(fields)
            } else if m.len() == 1 {
                match m.iter().next() {
                    Some((op, arg)) => compile_expr_op(op, arg, depth)?,
                    None => bail!("internal error: empty operator object"),
                }
            } else {
                bail!(
                    "an expression object must contain exactly one operator field, found {}",
                    m.len()
                );
            }
        }
        _ => ExprNode::Literal(v.clone()),
    })
}

fn compile_expr_list(v: &Value, depth: usize) -> Result<Vec<ExprNode>> {
    match v {
        Value::Array(a) => a.iter().map(|e| compile_expr(e, depth)).collect(),
        _ => Ok(vec![compile_expr(v, depth)?]),
    }
}

fn compile_expr_op(op: &str, arg: &Value, depth: usize) -> Result<ExprNode> {
    Ok(match op {
        "$literal" => ExprNode::Literal(arg.clone()),
        // $expr nested inside an expression is transparent.
        "$expr" => compile_expr(arg, depth)?,
        "$and" => ExprNode::And(compile_expr_list(arg, depth)?),
        "$or" => ExprNode::Or(compile_expr_list(arg, depth)?),
        "$ifNull" => {
            let items = match arg {
                Value::Array(a) if a.len() == 2 => a,
                _ => bail!("$ifNull expression must resolve to array(2)"),
            };
            ExprNode::IfNull(
                Box::new(compile_expr(&items[0], depth)?),
                Box::new(compile_expr(&items[1], depth)?),
            )
        }
        "$cond" => compile_cond(arg, depth)?,
        "$switch" => compile_switch(arg, depth)?,
        _ => {
            let Some((name, (fcn, arity))) = OPERATORS.get_key_value(op) else {
                if operators::is_match_only(op) {
                    bail!("operator `{op}` is only valid in match context");
                }
                bail!("unknown operator `{op}`");
            };
            let args = match arg {
                Value::Array(a) => a
                    .iter()
                    .map(|e| compile_expr(e, depth))
                    .collect::<Result<Vec<_>>>()?,
                // Unary operators accept a bare argument.
                _ if arity.admits(1) => vec![compile_expr(arg, depth)?],
                _ => bail!("{op} expression must resolve to array({arity})"),
            };
            if !arity.admits(args.len()) {
                bail!("{op} expression must resolve to array({arity})");
            }
            ExprNode::Op {
                name: *name,
                fcn: *fcn,
                args,
            }
        }
    })
}

fn compile_cond(arg: &Value, depth: usize) -> Result<ExprNode> {
    let (cond, then, otherwise) = match arg {
        Value::Array(a) if a.len() == 3 => (&a[0], &a[1], &a[2]),
        Value::Object(m) => {
            for key in m.keys() {
                if !matches!(key.as_str(), "if" | "then" | "else") {
                    bail!("unrecognized parameter to $cond: {key}");
                }
            }
            match (m.get("if"), m.get("then"), m.get("else")) {
                (Some(c), Some(t), Some(e)) => (c, t, e),
                _ => bail!("$cond requires 'if', 'then' and 'else' parameters"),
            }
        }
        _ => bail!("$cond expression must resolve to array(3)"),
    };
    Ok(ExprNode::Cond {
        cond: Box::new(compile_expr(cond, depth)?),
        then: Box::new(compile_expr(then, depth)?),
        otherwise: Box::new(compile_expr(otherwise, depth)?),
    })
}

fn compile_switch(arg: &Value, depth: usize) -> Result<ExprNode> {
    let m = match arg {
        Value::Object(m) => m,
        _ => bail!("$switch requires an object as its argument"),
    };
    for key in m.keys() {
        if !matches!(key.as_str(), "branches" | "default") {
            bail!("$switch found an unknown argument: {key}");
        }
    }
    let list = match m.get("branches") {
        Some(Value::Array(a)) => a,
        Some(v) => bail!("$switch expected an array for 'branches'. Got `{v}` instead"),
        None => bail!("$switch requires at least one branch"),
    };
    let mut branches = vec![];
    for branch in list.iter() {
        let bm = match branch {
            Value::Object(m) => m,
            _ => bail!("$switch expected each branch to be an object"),
        };
        for key in bm.keys() {
            if !matches!(key.as_str(), "case" | "then") {
                bail!("$switch found an unknown argument to a branch: {key}");
            }
        }
        let (Some(case), Some(then)) = (bm.get("case"), bm.get("then")) else {
            bail!("$switch requires each branch to have a 'case' and a 'then'");
        };
        branches.push((compile_expr(case, depth)?, compile_expr(then, depth)?));
    }
    if branches.is_empty() {
        bail!("$switch requires at least one branch");
    }
    let default = match m.get("default") {
        Some(d) => Some(Box::new(compile_expr(d, depth)?)),
        None => None,
    };
    Ok(ExprNode::Switch { branches, default })
}
