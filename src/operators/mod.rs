// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod arithmetic;
mod comparison;
mod conversions;
pub(crate) mod regex;
mod strings;
mod types;
pub(crate) mod utils;

use crate::value::Value;

use core::fmt;
use std::collections::HashMap;

use anyhow::Result;
use lazy_static::lazy_static;

/// An eager expression operator: receives its evaluated arguments and
/// yields a value. Lazy operators ($cond, $switch, $and, $or, $ifNull)
/// are compiled to dedicated tree nodes instead.
pub(crate) type OpFcn = fn(&'static str, &[Value]) -> Result<Value>;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Arity {
    Exact(usize),
    Range(usize, usize),
    Variadic,
}

impl Arity {
    pub(crate) fn admits(&self, n: usize) -> bool {
        match self {
            Arity::Exact(e) => n == *e,
            Arity::Range(lo, hi) => (*lo..=*hi).contains(&n),
            Arity::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exact(e) => write!(f, "{e}"),
            Arity::Range(lo, hi) => write!(f, "{lo}..{hi}"),
            Arity::Variadic => write!(f, "..."),
        }
    }
}

pub(crate) type OpEntry = (OpFcn, Arity);

lazy_static! {
    /// Process-wide operator table. Initialized once, immutable after.
    pub(crate) static ref OPERATORS: HashMap<&'static str, OpEntry> = {
        let mut m: HashMap<&'static str, OpEntry> = HashMap::new();

        comparison::register(&mut m);
        arithmetic::register(&mut m);
        strings::register(&mut m);
        conversions::register(&mut m);
        types::register(&mut m);
        m
    };
}

/// Operators that exist only as match-mode predicates; naming one in an
/// expression gets a targeted diagnostic instead of "unknown operator".
pub(crate) fn is_match_only(name: &str) -> bool {
    matches!(
        name,
        "$exists" | "$type" | "$size" | "$all" | "$matches" | "$nor"
    )
}
