// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::operators::utils::ensure_args_count;
use crate::operators::{Arity, OpEntry};
use crate::value::Value;

use std::collections::HashMap;

use anyhow::Result;

pub(super) fn register(m: &mut HashMap<&'static str, OpEntry>) {
    m.insert("$isNumber", (is_number, Arity::Exact(1)));
}

fn is_number(name: &'static str, args: &[Value]) -> Result<Value> {
    ensure_args_count(name, args, 1)?;
    Ok(Value::Bool(matches!(&args[0], Value::Number(_))))
}
