// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::number::Number;
use crate::operators::utils::ensure_args_count;
use crate::operators::{Arity, OpEntry};
use crate::value::Value;

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{bail, Result};

pub(super) fn register(m: &mut HashMap<&'static str, OpEntry>) {
    m.insert("$toString", (to_string, Arity::Exact(1)));
    m.insert("$toBool", (to_bool, Arity::Exact(1)));
    m.insert("$toBoolEx", (to_bool, Arity::Exact(1)));
    m.insert("$toLong", (to_integer, Arity::Exact(1)));
    m.insert("$toInt", (to_integer, Arity::Exact(1)));
    m.insert("$toDecimal", (to_decimal, Arity::Exact(1)));
}

fn to_string(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    Ok(match &args[0] {
        Value::Null | Value::Missing => Value::Null,
        Value::Bool(true) => Value::from("true"),
        Value::Bool(false) => Value::from("false"),
        Value::Number(n) => Value::from(n.to_string()),
        Value::String(_) => args[0].clone(),
        v => bail!("`{name}` expects bool/number/string/null argument. Got `{v}` instead"),
    })
}

// $toBool treats every string as true; $toBoolEx additionally reads
// "false" and the empty string as false. Both policies are intentional.
fn to_bool(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    Ok(match &args[0] {
        Value::Null | Value::Missing => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Bool(!n.is_zero()),
        Value::String(s) if name == "$toBoolEx" => {
            Value::Bool(!s.is_empty() && s.as_ref() != "false")
        }
        Value::String(_) => Value::Bool(true),
        _ => Value::Bool(true),
    })
}

fn to_integer(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    let n = match &args[0] {
        Value::Null | Value::Missing => return Ok(Value::Null),
        Value::Bool(b) => return Ok(Value::from(*b as i64)),
        Value::Number(n) => *n,
        Value::String(s) => match Number::from_str(s) {
            Ok(n) => n,
            _ => bail!("`{name}` could not parse string as number"),
        },
        v => bail!("`{name}` expects bool/number/string/null argument. Got `{v}` instead"),
    };
    // Fractions truncate; out-of-range values are an error.
    let truncated = n.trunc_place(0);
    let Some(i) = truncated.as_i64() else {
        bail!("`{name}` value out of range");
    };
    if name == "$toInt" && i32::try_from(i).is_err() {
        bail!("`{name}` value out of range");
    }
    Ok(Value::from(i))
}

fn to_decimal(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    Ok(match &args[0] {
        Value::Null | Value::Missing => Value::Null,
        Value::Bool(b) => Value::from(*b as i64 as f64),
        Value::Number(n) => Value::from(n.as_f64()),
        Value::String(s) => match f64::from_str(s) {
            Ok(v) => Value::from(v),
            _ => bail!("`{name}` could not parse string as number"),
        },
        v => bail!("`{name}` expects bool/number/string/null argument. Got `{v}` instead"),
    })
}
