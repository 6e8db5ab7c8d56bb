//! Shared builders for unit tests.

use crate::model::{RatingPoint, Submission, SubmissionType};

/// Build a stakeholder submission from `(entity_id, entity_name, axis1, axis2)` tuples.
pub fn submission(id: &str, respondent: &str, ratings: &[(&str, &str, f64, f64)]) -> Submission {
    Submission {
        id: id.to_string(),
        respondent_id: format!("resp-{respondent}"),
        respondent_name: respondent.to_string(),
        kind: SubmissionType::Stakeholder,
        rating_points: ratings
            .iter()
            .enumerate()
            .map(|(i, (entity_id, name, a1, a2))| {
                RatingPoint::new(format!("{id}-{i}"), id, *entity_id, *name, *a1, *a2).unwrap()
            })
            .collect(),
        created_at: None,
    }
}
