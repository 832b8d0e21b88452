// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A query engine for job queues: evaluates MongoDB-style filter
//! documents against the queryable projection of stored jobs.
//!
//! ```
//! # use jobquery::*;
//! # fn main() -> anyhow::Result<()> {
//! let mut source = MemorySource::new();
//! source.push(
//!     "completed",
//!     JobRecord {
//!         id: "1".to_string(),
//!         name: "resize".to_string(),
//!         data: r#"{"width": 1024}"#.to_string(),
//!         ..JobRecord::default()
//!     },
//! );
//!
//! let engine = Engine::new(source);
//! let query = Value::from_json_str(r#"{ "data.width": { "$gte": 800 } }"#)?;
//! let page = engine.filter("completed", &query, 0, 0)?;
//!
//! assert_eq!(page.count, 1);
//! assert_eq!(page.jobs[0].name, "resize");
//! # Ok(())
//! # }
//! ```

mod ast;
mod compiler;
mod document;
mod driver;
mod engine;
mod evaluator;
mod number;
mod operators;
mod path;
mod value;

pub use ast::{Expression, Query};
pub use document::{Document, JobRecord};
pub use driver::{filter_jobs, EvalFailure, FilterPage, JobSource, MemorySource, CURSOR_DONE};
pub use engine::Engine;
pub use number::Number;
pub use value::Value;

#[cfg(feature = "arc")]
pub use std::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
pub use std::rc::Rc;
