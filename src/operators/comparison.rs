// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::operators::utils::{ensure_args_count, ensure_array};
use crate::operators::{Arity, OpEntry};
use crate::value::Value;

use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;

pub(super) fn register(m: &mut HashMap<&'static str, OpEntry>) {
    m.insert("$eq", (eq, Arity::Exact(2)));
    m.insert("$ne", (ne, Arity::Exact(2)));
    m.insert("$gt", (inequality, Arity::Exact(2)));
    m.insert("$gte", (inequality, Arity::Exact(2)));
    m.insert("$lt", (inequality, Arity::Exact(2)));
    m.insert("$lte", (inequality, Arity::Exact(2)));
    m.insert("$cmp", (cmp, Arity::Exact(2)));
    m.insert("$in", (is_in, Arity::Exact(2)));
    m.insert("$nin", (not_in, Arity::Exact(2)));
    m.insert("$not", (not, Arity::Exact(1)));
}

// Comparing against a missing operand yields null rather than a boolean.
fn ordering(args: &[Value]) -> Option<Ordering> {
    if args[0].is_missing() || args[1].is_missing() {
        return None;
    }
    Some(args[0].cmp(&args[1]))
}

fn eq(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    Ok(match ordering(args) {
        Some(ord) => Value::Bool(ord == Ordering::Equal),
        None => Value::Null,
    })
}

fn ne(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    Ok(match ordering(args) {
        Some(ord) => Value::Bool(ord != Ordering::Equal),
        None => Value::Null,
    })
}

fn inequality(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    Ok(match ordering(args) {
        Some(ord) => Value::Bool(match name {
            "$gt" => ord == Ordering::Greater,
            "$gte" => ord != Ordering::Less,
            "$lt" => ord == Ordering::Less,
            _ => ord != Ordering::Greater,
        }),
        None => Value::Null,
    })
}

fn cmp(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    Ok(match ordering(args) {
        Some(Ordering::Less) => Value::from(-1i64),
        Some(Ordering::Equal) => Value::from(0i64),
        Some(Ordering::Greater) => Value::from(1i64),
        None => Value::Null,
    })
}

fn is_in(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if args[0].is_missing() {
        return Ok(Value::Null);
    }
    let candidates = ensure_array(name, &args[1])?;
    Ok(Value::Bool(candidates.iter().any(|c| c == &args[0])))
}

fn not_in(name: &'static str, args: &[Value]) -> Result<Value> {
    match is_in(name, args)? {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        v => Ok(v),
    }
}

fn not(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}
