// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;

// Compiled patterns are memoized per pattern string. The cache is bounded
// by query diversity; past the limit it is dropped wholesale rather than
// tracking recency.
const CACHE_LIMIT: usize = 256;

lazy_static! {
    static ref CACHE: Mutex<HashMap<String, Regex>> = Mutex::new(HashMap::new());
}

pub(crate) fn cached_regex(pattern: &str) -> Result<Regex> {
    let mut cache = CACHE
        .lock()
        .map_err(|_| anyhow!("regex cache lock poisoned"))?;
    if let Some(re) = cache.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)
        .map_err(|e| anyhow!("invalid regular expression `{pattern}`: {e}"))?;
    if cache.len() >= CACHE_LIMIT {
        cache.clear();
    }
    cache.insert(pattern.to_string(), re.clone());
    Ok(re)
}
