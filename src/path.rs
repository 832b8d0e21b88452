// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::value::Value;
use crate::Rc;

use core::fmt;

/// A parsed dotted path such as `data.grades.0.mean`.
#[derive(Debug, Clone)]
pub(crate) struct Path {
    raw: Rc<str>,
    segments: Vec<String>,
}

impl Path {
    pub(crate) fn parse(path: &str) -> Path {
        Path {
            raw: path.into(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub(crate) fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Resolve `segments` against `value`, never mutating the input.
///
/// Objects are looked up by key. Arrays are indexed when the segment is a
/// non-negative integer; any other segment fans out across the object
/// elements of the array, collecting the non-missing resolutions of the
/// remaining path into a new array. Array elements that are themselves
/// arrays are not traversed implicitly, so an index-free path stops at a
/// second level of nesting.
pub(crate) fn resolve(value: &Value, segments: &[String]) -> Value {
    let Some((segment, rest)) = segments.split_first() else {
        return value.clone();
    };
    match value {
        Value::Object(m) => match m.get(segment.as_str()) {
            Some(child) => resolve(child, rest),
            None => Value::Missing,
        },
        Value::Array(a) => match parse_index(segment) {
            Some(i) => match a.get(i) {
                Some(element) => resolve(element, rest),
                None => Value::Missing,
            },
            None => {
                let mut collected = vec![];
                for element in a.iter() {
                    if matches!(element, Value::Object(_)) {
                        let resolved = resolve(element, segments);
                        if !resolved.is_missing() {
                            collected.push(resolved);
                        }
                    }
                }
                if collected.is_empty() {
                    Value::Missing
                } else {
                    Value::from(collected)
                }
            }
        },
        _ => Value::Missing,
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}
