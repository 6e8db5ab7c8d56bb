//! In-memory set of real submissions for one assessment context.
//!
//! Insertion order is kept so table output is stable; the aggregator does not
//! depend on it.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{AVERAGE_ID, Submission};

#[derive(Debug, Clone, Default)]
pub struct SubmissionStore {
    submissions: Vec<Submission>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a submission. Fails on a duplicate id or an invalid submission.
    pub fn add(&mut self, submission: Submission) -> Result<()> {
        submission.validate()?;
        if self.get(&submission.id).is_some() {
            return Err(Error::DuplicateSubmission(submission.id));
        }
        self.submissions.push(submission);
        Ok(())
    }

    /// Remove a submission by id and return it.
    pub fn remove(&mut self, id: &str) -> Result<Submission> {
        if id == AVERAGE_ID {
            return Err(Error::invariant(
                "the average entry is derived and cannot be removed",
            ));
        }
        let pos = self
            .submissions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(self.submissions.remove(pos))
    }

    /// Swap in a complete snapshot. Either every submission is accepted or
    /// the store is left untouched.
    pub fn replace_all(&mut self, submissions: Vec<Submission>) -> Result<()> {
        let mut seen = HashSet::with_capacity(submissions.len());
        for s in &submissions {
            s.validate()?;
            if !seen.insert(s.id.as_str()) {
                return Err(Error::DuplicateSubmission(s.id.clone()));
            }
        }
        self.submissions = submissions;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    pub fn all(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
