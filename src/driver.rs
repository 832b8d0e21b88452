// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::ast::Query;
use crate::document::{Document, JobRecord};
use crate::value::Value;

use std::collections::HashMap;

use anyhow::Result;
use log::{debug, trace};
use serde::Serialize;

/// Returned as the page cursor once the candidate stream is exhausted.
pub const CURSOR_DONE: i64 = -1;

/// The queue collaborator: yields the raw job records for a state, in
/// the queue's natural order. Stream errors abort the filter call.
pub trait JobSource {
    type Stream: Iterator<Item = Result<JobRecord>>;

    fn open(&self, state: &str) -> Result<Self::Stream>;
}

/// A per-document evaluation failure. The document counts as
/// non-matching; the failure travels with the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalFailure {
    pub job_id: String,
    pub error: String,
}

/// One page of filter results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPage {
    /// Next offset into the match sequence, or [`CURSOR_DONE`].
    pub cursor: i64,
    /// Candidates scanned.
    pub total: u64,
    /// Matches in this page.
    pub count: u64,
    /// Matching records, in queue order.
    pub jobs: Vec<JobRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EvalFailure>,
}

/// Stream candidates for `state`, evaluate `query` against each
/// projected document, and return the window of matches selected by
/// `cursor` and `count`.
///
/// `cursor` is a 0-based offset into the match sequence: the first
/// `cursor` matches are skipped. `count` caps the page size; zero means
/// unbounded. The returned cursor advances by the number of matches
/// returned, or becomes [`CURSOR_DONE`] when the stream ran dry.
pub fn filter_jobs<S: JobSource>(
    source: &S,
    state: &str,
    query: &Value,
    cursor: u64,
    count: u64,
) -> Result<FilterPage> {
    let query = Query::compile(query)?;
    let stream = source.open(state)?;

    let mut page = FilterPage::default();
    let mut matched: u64 = 0;
    let mut exhausted = true;
    for item in stream {
        let job = item?;
        page.total += 1;
        let doc = Document::project(&job);
        match query.matches(&doc) {
            Ok(true) => {
                if matched >= cursor && (count == 0 || (page.jobs.len() as u64) < count) {
                    page.jobs.push(job);
                }
                matched += 1;
                if count != 0 && page.jobs.len() as u64 == count {
                    // Page is full; leave the rest of the stream unread.
                    exhausted = false;
                    break;
                }
            }
            Ok(false) => {}
            Err(e) => {
                trace!("job {} failed evaluation: {e:#}", job.id);
                page.errors.push(EvalFailure {
                    job_id: job.id.clone(),
                    error: format!("{e:#}"),
                });
            }
        }
    }

    page.count = page.jobs.len() as u64;
    page.cursor = if exhausted {
        CURSOR_DONE
    } else {
        (cursor + page.count) as i64
    };
    debug!(
        "filter state={state} scanned={} matched={} page={} cursor={}",
        page.total, matched, page.count, page.cursor
    );
    Ok(page)
}

/// An in-memory job source keyed by state, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    states: HashMap<String, Vec<JobRecord>>,
}

impl MemorySource {
    pub fn new() -> MemorySource {
        MemorySource::default()
    }

    pub fn push(&mut self, state: &str, job: JobRecord) {
        self.states.entry(state.to_string()).or_default().push(job);
    }
}

impl JobSource for MemorySource {
    type Stream = std::vec::IntoIter<Result<JobRecord>>;

    fn open(&self, state: &str) -> Result<Self::Stream> {
        let jobs: Vec<Result<JobRecord>> = self
            .states
            .get(state)
            .map(|jobs| jobs.iter().cloned().map(Ok).collect())
            .unwrap_or_default();
        Ok(jobs.into_iter())
    }
}
