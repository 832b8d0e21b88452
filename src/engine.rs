// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::driver::{filter_jobs, FilterPage, JobSource};
use crate::value::Value;

use anyhow::Result;

/// Binds a job source to the compiler and driver.
#[derive(Debug, Clone)]
pub struct Engine<S: JobSource> {
    source: S,
}

impl<S: JobSource> Engine<S> {
    pub fn new(source: S) -> Engine<S> {
        Engine { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Filter the jobs in `state` with a query document.
    ///
    /// See [`filter_jobs`] for the cursor and count semantics.
    pub fn filter(
        &self,
        state: &str,
        query: &Value,
        cursor: u64,
        count: u64,
    ) -> Result<FilterPage> {
        filter_jobs(&self.source, state, query, cursor, count)
    }
}
