// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::number::Number;
use crate::operators::utils::{ensure_args_count, ensure_integer, ensure_numeric, propagate_nullish};
use crate::operators::{Arity, OpEntry};
use crate::value::Value;

use std::collections::HashMap;

use anyhow::{bail, Result};

pub(super) fn register(m: &mut HashMap<&'static str, OpEntry>) {
    m.insert("$add", (add, Arity::Variadic));
    m.insert("$subtract", (subtract, Arity::Exact(2)));
    m.insert("$multiply", (multiply, Arity::Variadic));
    m.insert("$divide", (divide, Arity::Exact(2)));
    m.insert("$mod", (modulo, Arity::Exact(2)));
    m.insert("$abs", (unary, Arity::Exact(1)));
    m.insert("$ceil", (unary, Arity::Exact(1)));
    m.insert("$floor", (unary, Arity::Exact(1)));
    m.insert("$sqrt", (unary, Arity::Exact(1)));
    m.insert("$round", (round, Arity::Range(1, 2)));
    m.insert("$trunc", (round, Arity::Range(1, 2)));
    m.insert("$max", (extremum, Arity::Variadic));
    m.insert("$min", (extremum, Arity::Variadic));
}

fn add(name: &'static str, args: &[Value]) -> Result<Value> {
    if let Some(v) = propagate_nullish(args) {
        return Ok(v);
    }
    let mut acc = Number::from(0i64);
    for arg in args {
        acc = acc.add(&ensure_numeric(name, arg)?);
    }
    Ok(Value::from(acc))
}

fn multiply(name: &'static str, args: &[Value]) -> Result<Value> {
    if let Some(v) = propagate_nullish(args) {
        return Ok(v);
    }
    let mut acc = Number::from(1i64);
    for arg in args {
        acc = acc.mul(&ensure_numeric(name, arg)?);
    }
    Ok(Value::from(acc))
}

fn subtract(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if let Some(v) = propagate_nullish(args) {
        return Ok(v);
    }
    let a = ensure_numeric(name, &args[0])?;
    let b = ensure_numeric(name, &args[1])?;
    Ok(Value::from(a.sub(&b)))
}

fn divide(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if let Some(v) = propagate_nullish(args) {
        return Ok(v);
    }
    let a = ensure_numeric(name, &args[0])?;
    let b = ensure_numeric(name, &args[1])?;
    Ok(Value::from(a.divide(&b)?))
}

fn modulo(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if let Some(v) = propagate_nullish(args) {
        return Ok(v);
    }
    let a = ensure_numeric(name, &args[0])?;
    let b = ensure_numeric(name, &args[1])?;
    Ok(Value::from(a.modulo(&b)?))
}

fn unary(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    if let Some(v) = propagate_nullish(args) {
        return Ok(v);
    }
    let n = ensure_numeric(name, &args[0])?;
    Ok(Value::from(match name {
        "$abs" => n.abs(),
        "$ceil" => n.ceil(),
        "$floor" => n.floor(),
        _ => n.sqrt(),
    }))
}

// $round and $trunc. The single-argument form may carry the value and
// place as one nested array: { $round: [[-45.39, 1]] }.
fn round(name: &'static str, args: &[Value]) -> Result<Value> {
    let unpacked;
    let args = match args {
        [Value::Array(a)] => {
            unpacked = a.clone();
            &unpacked[..]
        }
        _ => args,
    };
    if args.is_empty() || args.len() > 2 {
        bail!("`{name}` expects 1 or 2 arguments");
    }
    if let Some(v) = propagate_nullish(args) {
        return Ok(v);
    }
    let n = ensure_numeric(name, &args[0])?;
    let place = match args.get(1) {
        Some(p) => match i32::try_from(ensure_integer(name, p)?) {
            Ok(place) => place,
            Err(_) => bail!("`{name}` place out of range"),
        },
        None => 0,
    };
    Ok(Value::from(match name {
        "$round" => n.round_place(place),
        _ => n.trunc_place(place),
    }))
}

// $max and $min ignore null and missing operands; a single array
// argument spreads into operands.
fn extremum(name: &'static str, args: &[Value]) -> Result<Value> {
    let spread;
    let args = match args {
        [Value::Array(a)] => {
            spread = a.clone();
            &spread[..]
        }
        _ => args,
    };
    let mut best: Option<&Value> = None;
    for arg in args.iter().filter(|v| !v.is_nullish()) {
        best = Some(match best {
            Some(b) if (name == "$max") == (b >= arg) => b,
            _ => arg,
        });
    }
    Ok(best.cloned().unwrap_or(Value::Null))
}
