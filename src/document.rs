// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::path::{self, Path};
use crate::value::Value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A raw job record as persisted by the queue.
///
/// The queue stores a flat mapping; optional fields that were never set
/// are absent from the projected document rather than null. `data` is the
/// serialized user payload and is parsed during projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    pub id: String,
    pub name: String,
    pub data: String,
    pub opts: Option<Value>,
    pub timestamp: Option<i64>,
    pub processed_on: Option<i64>,
    pub finished_on: Option<i64>,
    pub attempts_made: Option<i64>,
    pub delay: Option<i64>,
    pub priority: Option<i64>,
    pub progress: Option<Value>,
    pub returnvalue: Option<Value>,
    pub failed_reason: Option<String>,
    pub stacktrace: Option<Vec<String>>,
}

/// The queryable view of a job: the stored fields plus the computed
/// virtual fields `runtime`, `waitTime` and `responseTime`.
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Materialize the queryable document for a job record.
    ///
    /// A malformed `data` payload projects as null; it does not abort the
    /// query.
    pub fn project(job: &JobRecord) -> Document {
        let mut m = BTreeMap::new();
        m.insert("id".to_string(), Value::from(job.id.as_str()));
        m.insert("name".to_string(), Value::from(job.name.as_str()));
        m.insert(
            "data".to_string(),
            Value::from_json_str(&job.data).unwrap_or(Value::Null),
        );
        if let Some(opts) = &job.opts {
            m.insert("opts".to_string(), opts.clone());
        }
        let stored = [
            ("timestamp", &job.timestamp),
            ("processedOn", &job.processed_on),
            ("finishedOn", &job.finished_on),
            ("attemptsMade", &job.attempts_made),
            ("delay", &job.delay),
            ("priority", &job.priority),
        ];
        for (key, field) in stored {
            if let Some(n) = field {
                m.insert(key.to_string(), Value::from(*n));
            }
        }
        if let Some(progress) = &job.progress {
            m.insert("progress".to_string(), progress.clone());
        }
        if let Some(returnvalue) = &job.returnvalue {
            m.insert("returnvalue".to_string(), returnvalue.clone());
        }
        if let Some(reason) = &job.failed_reason {
            m.insert("failedReason".to_string(), Value::from(reason.as_str()));
        }
        if let Some(stacktrace) = &job.stacktrace {
            m.insert(
                "stacktrace".to_string(),
                Value::from_array(stacktrace.iter().map(|s| Value::from(s.as_str())).collect()),
            );
        }
        Document {
            root: Value::from(m),
        }
    }

    /// Wrap an arbitrary value as a document. Virtual fields still apply
    /// when the value is an object with the timing fields present.
    pub fn from_value(root: Value) -> Document {
        Document { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve a dotted path against the document, or `Missing`.
    pub fn resolve(&self, path: &str) -> Value {
        self.resolve_path(&Path::parse(path))
    }

    pub(crate) fn resolve_path(&self, path: &Path) -> Value {
        let segments = path.segments();
        if let Some(first) = segments.first() {
            // Stored fields shadow virtuals of the same name.
            if self.root[first.as_str()].is_missing() {
                if let Some(v) = self.virtual_field(first) {
                    return path::resolve(&v, &segments[1..]);
                }
            }
        }
        path::resolve(&self.root, segments)
    }

    // Virtual fields are derived on reference and resolve to Missing when
    // any input field is absent or non-numeric.
    fn virtual_field(&self, name: &str) -> Option<Value> {
        let diff = |upper: &str, lower: &str| match (&self.root[upper], &self.root[lower]) {
            (Value::Number(a), Value::Number(b)) => Value::from(a.sub(b)),
            _ => Value::Missing,
        };
        match name {
            "runtime" => Some(diff("finishedOn", "processedOn")),
            "waitTime" => Some(diff("processedOn", "timestamp")),
            "responseTime" => Some(diff("finishedOn", "timestamp")),
            _ => None,
        }
    }
}
