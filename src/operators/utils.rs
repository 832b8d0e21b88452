// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::number::Number;
use crate::value::Value;
use crate::Rc;

use anyhow::{bail, Result};

pub(crate) fn ensure_args_count(fcn: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        if expected == 1 {
            bail!("`{fcn}` expects 1 argument");
        }
        bail!("`{fcn}` expects {expected} arguments");
    }
    Ok(())
}

pub(crate) fn ensure_numeric(fcn: &str, v: &Value) -> Result<Number> {
    match v {
        Value::Number(n) => Ok(*n),
        _ => bail!("`{fcn}` expects numeric argument. Got `{v}` instead"),
    }
}

pub(crate) fn ensure_string(fcn: &str, v: &Value) -> Result<Rc<str>> {
    match v {
        Value::String(s) => Ok(s.clone()),
        _ => bail!("`{fcn}` expects string argument. Got `{v}` instead"),
    }
}

pub(crate) fn ensure_array<'a>(fcn: &str, v: &'a Value) -> Result<&'a Vec<Value>> {
    match v {
        Value::Array(a) => Ok(a),
        _ => bail!("`{fcn}` expects array argument. Got `{v}` instead"),
    }
}

pub(crate) fn ensure_integer(fcn: &str, v: &Value) -> Result<i64> {
    match v {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i),
            None => bail!("`{fcn}` expects integer argument. Got `{v}` instead"),
        },
        _ => bail!("`{fcn}` expects integer argument. Got `{v}` instead"),
    }
}

/// Null/missing propagation shared by arithmetic and conversions:
/// a missing argument wins over a null one.
pub(crate) fn propagate_nullish(args: &[Value]) -> Option<Value> {
    if args.iter().any(Value::is_missing) {
        Some(Value::Missing)
    } else if args.iter().any(Value::is_null) {
        Some(Value::Null)
    } else {
        None
    }
}
