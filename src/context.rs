//! One aggregation context per report and rating lens.
//!
//! The context owns the submission store and the derived average. Every
//! transition recomputes the average before returning, and a failed
//! transition leaves both untouched, so callers never see a store change
//! without its matching average.

use tracing::{debug, info, warn};

use crate::aggregate::{Average, compute_average};
use crate::error::{Error, Result};
use crate::grouped::{GroupedView, build_grouped, from_wire_json};
use crate::model::{RatingType, Submission};
use crate::store::SubmissionStore;

/// Issued by `begin_fetch`; orders fetch responses that may race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
pub struct AggregationContext {
    report_id: String,
    rating_type: RatingType,
    store: SubmissionStore,
    average: Option<Average>,
    issued: u64,
    applied: u64,
}

impl AggregationContext {
    pub fn new(report_id: impl Into<String>, rating_type: RatingType) -> Self {
        Self {
            report_id: report_id.into(),
            rating_type,
            store: SubmissionStore::new(),
            average: None,
            issued: 0,
            applied: 0,
        }
    }

    /// Build a context from an already fetched snapshot.
    pub fn from_submissions(
        report_id: impl Into<String>,
        rating_type: RatingType,
        submissions: Vec<Submission>,
    ) -> Result<Self> {
        let mut ctx = Self::new(report_id, rating_type);
        ctx.replace_snapshot(submissions)?;
        Ok(ctx)
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    pub fn rating_type(&self) -> RatingType {
        self.rating_type
    }

    pub fn submissions(&self) -> &[Submission] {
        self.store.all()
    }

    pub fn average(&self) -> Option<&Average> {
        self.average.as_ref()
    }

    pub fn grouped(&self) -> GroupedView {
        build_grouped(self.rating_type, self.store.all(), self.average.as_ref())
    }

    /// Reserve a ticket for a fetch about to be sent.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Apply a fetched grouped payload as the full replacement of the store.
    ///
    /// Returns `Ok(false)` when a fetch issued later has already been applied;
    /// the stale payload is then ignored.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, grouped_json: &str) -> Result<bool> {
        if ticket.0 <= self.applied {
            warn!(
                ticket = ticket.0,
                applied = self.applied,
                "discarding stale fetch response"
            );
            return Ok(false);
        }
        let submissions = from_wire_json(grouped_json, self.rating_type)?;
        self.replace_snapshot(submissions)?;
        self.applied = ticket.0;
        info!(
            report = %self.report_id,
            rating_type = %self.rating_type,
            submissions = self.store.len(),
            "applied fetched snapshot"
        );
        Ok(true)
    }

    /// Record a submission the server confirmed as created.
    pub fn apply_created(&mut self, submission: Submission) -> Result<()> {
        if !self.rating_type.accepts(submission.kind) {
            return Err(Error::validation(format!(
                "a {} submission cannot be added to {} ratings",
                submission.kind, self.rating_type
            )));
        }
        let id = submission.id.clone();
        self.store.add(submission)?;
        self.recompute();
        info!(submission = %id, "submission added");
        Ok(())
    }

    /// Record a submission the server confirmed as deleted.
    pub fn apply_deleted(&mut self, submission_id: &str) -> Result<Submission> {
        let removed = self.store.remove(submission_id)?;
        self.recompute();
        info!(submission = %submission_id, "submission removed");
        Ok(removed)
    }

    fn replace_snapshot(&mut self, submissions: Vec<Submission>) -> Result<()> {
        if let Some(s) = submissions
            .iter()
            .find(|s| !self.rating_type.accepts(s.kind))
        {
            return Err(Error::validation(format!(
                "submission {} has type {}, which does not belong to {} ratings",
                s.id, s.kind, self.rating_type
            )));
        }
        self.store.replace_all(submissions)?;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.average = compute_average(self.store.all());
        debug!(
            submissions = self.store.len(),
            averaged = self.average.as_ref().map_or(0, |a| a.entities.len()),
            "average refreshed"
        );
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
