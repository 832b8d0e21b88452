// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::operators::utils::{ensure_args_count, ensure_integer, ensure_string};
use crate::operators::{Arity, OpEntry};
use crate::value::Value;

use std::collections::HashMap;

use anyhow::{bail, Result};

pub(super) fn register(m: &mut HashMap<&'static str, OpEntry>) {
    m.insert("$toLower", (change_case, Arity::Exact(1)));
    m.insert("$toUpper", (change_case, Arity::Exact(1)));
    m.insert("$concat", (concat, Arity::Variadic));
    m.insert("$split", (split, Arity::Exact(2)));
    m.insert("$substr", (substr_bytes, Arity::Exact(3)));
    m.insert("$substrBytes", (substr_bytes, Arity::Exact(3)));
    m.insert("$strLenBytes", (str_len_bytes, Arity::Exact(1)));
    m.insert("$strcasecmp", (strcasecmp, Arity::Exact(2)));
    m.insert("$contains", (contains, Arity::Exact(2)));
    m.insert("$startsWith", (starts_with, Arity::Exact(2)));
    m.insert("$endsWith", (ends_with, Arity::Exact(2)));
    m.insert("$trim", (trim, Arity::Exact(1)));
    m.insert("$ltrim", (trim, Arity::Exact(1)));
    m.insert("$rtrim", (trim, Arity::Exact(1)));
}

// String coercion for the case and comparison operators: null and
// missing read as the empty string, numbers as their decimal form.
fn stringify(fcn: &str, v: &Value) -> Result<String> {
    Ok(match v {
        Value::Null | Value::Missing => String::new(),
        Value::String(s) => s.to_string(),
        Value::Number(n) => n.to_string(),
        _ => bail!("`{fcn}` expects string argument. Got `{v}` instead"),
    })
}

fn change_case(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    let s = stringify(name, &args[0])?;
    Ok(Value::from(match name {
        "$toLower" => s.to_lowercase(),
        _ => s.to_uppercase(),
    }))
}

fn concat(name: &'static str, args: &[Value]) -> Result<Value> {
    let mut out = String::new();
    for arg in args {
        if arg.is_nullish() {
            return Ok(Value::Null);
        }
        out.push_str(&ensure_string(name, arg)?);
    }
    Ok(Value::from(out))
}

fn split(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if args[0].is_nullish() {
        return Ok(Value::Null);
    }
    let s = ensure_string(name, &args[0])?;
    let separator = ensure_string(name, &args[1])?;
    if separator.is_empty() {
        bail!("`{name}` requires a non-empty separator");
    }
    Ok(Value::from_array(
        s.split(separator.as_ref()).map(Value::from).collect(),
    ))
}

fn substr_bytes(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 3)?;
    if args[0].is_nullish() {
        return Ok(Value::from(""));
    }
    let s = ensure_string(name, &args[0])?;
    let start = ensure_integer(name, &args[1])?;
    let len = ensure_integer(name, &args[2])?;
    if start < 0 || start as usize >= s.len() {
        return Ok(Value::from(""));
    }
    let start = start as usize;
    // A negative length takes the rest of the string.
    let end = if len < 0 {
        s.len()
    } else {
        s.len().min(start.saturating_add(len as usize))
    };
    match s.get(start..end) {
        Some(sub) => Ok(Value::from(sub)),
        None => bail!("`{name}` slice is not on a UTF-8 character boundary"),
    }
}

fn str_len_bytes(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    let s = ensure_string(name, &args[0])?;
    Ok(Value::from(s.len()))
}

fn strcasecmp(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    let a = stringify(name, &args[0])?.to_ascii_lowercase();
    let b = stringify(name, &args[1])?.to_ascii_lowercase();
    Ok(Value::from(match a.as_bytes().cmp(b.as_bytes()) {
        std::cmp::Ordering::Less => -1i64,
        std::cmp::Ordering::Equal => 0i64,
        std::cmp::Ordering::Greater => 1i64,
    }))
}

fn contains(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if args[0].is_nullish() || args[1].is_nullish() {
        return Ok(Value::Bool(false));
    }
    let s = ensure_string(name, &args[0])?;
    let needle = ensure_string(name, &args[1])?;
    Ok(Value::Bool(s.contains(needle.as_ref())))
}

fn starts_with(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if args[0].is_nullish() || args[1].is_nullish() {
        return Ok(Value::Bool(false));
    }
    let s = ensure_string(name, &args[0])?;
    let prefix = ensure_string(name, &args[1])?;
    Ok(Value::Bool(s.starts_with(prefix.as_ref())))
}

fn ends_with(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 2)?;
    if args[0].is_nullish() || args[1].is_nullish() {
        return Ok(Value::Bool(false));
    }
    let s = ensure_string(name, &args[0])?;
    let suffix = ensure_string(name, &args[1])?;
    Ok(Value::Bool(s.ends_with(suffix.as_ref())))
}

// $trim, $ltrim and $rtrim take either a bare string expression or
// { input, chars } where chars is read as a set of characters.
fn trim(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    let (input, chars) = match &args[0] {
        Value::Object(m) => {
            for key in m.keys() {
                if key != "input" && key != "chars" {
                    bail!("`{name}` found an unknown argument: {key}");
                }
            }
            (m.get("input").cloned().unwrap_or(Value::Missing), m.get("chars").cloned())
        }
        other => (other.clone(), None),
    };
    if input.is_nullish() {
        return Ok(Value::Null);
    }
    let s = ensure_string(name, &input)?;
    let trimmed = match chars {
        Some(chars) if !chars.is_nullish() => {
            let set: Vec<char> = ensure_string(name, &chars)?.chars().collect();
            let pred = |c: char| set.contains(&c);
            match name {
                "$ltrim" => s.trim_start_matches(pred),
                "$rtrim" => s.trim_end_matches(pred),
                _ => s.trim_matches(pred),
            }
        }
        _ => {
            let pred = |c: char| c.is_ascii_whitespace();
            match name {
                "$ltrim" => s.trim_start_matches(pred),
                "$rtrim" => s.trim_end_matches(pred),
                _ => s.trim_matches(pred),
            }
        }
    };
    Ok(Value::from(trimmed))
}
