//! Query/mutation boundary to the submissions service.
//!
//! `SubmissionTransport` is the seam: the GraphQL client implements it for
//! real use and tests plug in an in-memory double. `Session` composes a
//! transport with an aggregation context and only touches the context after a
//! successful response.

pub mod graphql;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::AggregationContext;
use crate::error::{Error, Result};
use crate::grouped::GroupedView;
use crate::model::{AVERAGE_ID, CreateSubmissionInput, RatingType, Submission};

/// `{ success, message, data }` wrapper every operation answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Turn `success: false` into a transport error carrying the server message.
    pub fn into_data(self, op: &str) -> Result<Option<T>> {
        if !self.success {
            let detail = if self.message.is_empty() {
                format!("{op} was not successful")
            } else {
                format!("{op}: {}", self.message)
            };
            return Err(Error::Transport(detail));
        }
        Ok(self.data)
    }

    /// Like `into_data`, but a successful response must carry data.
    pub fn require_data(self, op: &str) -> Result<T> {
        self.into_data(op)?
            .ok_or_else(|| Error::transport(format!("{op}: response carried no data")))
    }
}

pub trait SubmissionTransport {
    fn fetch_grouped(&self, report_id: &str, rating_type: RatingType)
    -> Result<Envelope<String>>;

    fn create_submission(&self, input: &CreateSubmissionInput) -> Result<Envelope<Submission>>;

    fn delete_submission(&self, id: &str) -> Result<Envelope<()>>;
}

pub struct Session<T> {
    transport: T,
    context: AggregationContext,
}

impl<T: SubmissionTransport> Session<T> {
    pub fn new(transport: T, context: AggregationContext) -> Self {
        Self { transport, context }
    }

    pub fn context(&self) -> &AggregationContext {
        &self.context
    }

    /// Fetch the full grouped set and replace the local store with it.
    pub fn refresh(&mut self) -> Result<GroupedView> {
        let ticket = self.context.begin_fetch();
        let json = self
            .transport
            .fetch_grouped(self.context.report_id(), self.context.rating_type())?
            .require_data("fetchSubmissionsGrouped")?;
        self.context.apply_fetch(ticket, &json)?;
        Ok(self.context.grouped())
    }

    pub fn create(&mut self, input: &CreateSubmissionInput) -> Result<GroupedView> {
        if input.report_id != self.context.report_id() {
            return Err(Error::validation(format!(
                "submission targets report {}, but this session is for {}",
                input.report_id,
                self.context.report_id()
            )));
        }
        if !self.context.rating_type().accepts(input.kind) {
            return Err(Error::validation(format!(
                "a {} submission cannot be added to {} ratings",
                input.kind,
                self.context.rating_type()
            )));
        }
        let submission = self
            .transport
            .create_submission(input)?
            .require_data("createSubmission")?;
        self.context.apply_created(submission)?;
        Ok(self.context.grouped())
    }

    /// Delete a real submission. The average and unknown ids are rejected
    /// before any request is sent.
    pub fn delete(&mut self, id: &str) -> Result<GroupedView> {
        if id == AVERAGE_ID {
            return Err(Error::invariant(
                "the average entry is derived and cannot be deleted",
            ));
        }
        if !self.context.submissions().iter().any(|s| s.id == id) {
            return Err(Error::NotFound(id.to_string()));
        }
        self.transport
            .delete_submission(id)?
            .into_data("deleteSubmission")?;
        self.context.apply_deleted(id)?;
        info!(submission = %id, "deleted remotely");
        Ok(self.context.grouped())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
