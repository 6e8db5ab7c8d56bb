//! Cross-submission averages.
//!
//! The average is always rebuilt from the full set of real submissions;
//! a previous (rounded) average is never adjusted in place.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::model::{AVERAGE_ID, Dimension, RatingPoint, Submission};

/// Per-entity mean of every rating across all real submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityAverage {
    pub entity_id: String,
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub axis1: f64,
    pub axis2: f64,
    pub score: f64,
    /// Number of rating points that contributed.
    pub count: usize,
}

/// The synthetic aggregate submission. Never empty: when nothing was rated,
/// `compute_average` returns `None` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Average {
    pub entities: Vec<EntityAverage>,
}

impl Average {
    pub fn get(&self, entity_id: &str) -> Option<&EntityAverage> {
        self.entities.iter().find(|e| e.entity_id == entity_id)
    }

    /// Express the averages as rating points of the `Average` pseudo-submission.
    pub fn rating_points(&self) -> Vec<RatingPoint> {
        self.entities
            .iter()
            .map(|e| RatingPoint {
                id: format!("{AVERAGE_ID}-{}", e.entity_id),
                submission_id: AVERAGE_ID.to_string(),
                entity_id: e.entity_id.clone(),
                entity_name: e.entity_name.clone(),
                dimension: e.dimension.clone(),
                axis1: e.axis1,
                axis2: e.axis2,
                score: Some(e.score),
                description: None,
            })
            .collect()
    }
}

struct Accumulator {
    entity_name: String,
    dimension: Option<Dimension>,
    axis1_sum: f64,
    axis2_sum: f64,
    count: usize,
}

/// Slack added before rounding so values stored a hair below a half
/// (41 / 40 = 1.025 is stored as 1.02499...) still round up.
const HALF_UP_SLACK: f64 = 1e-9;

/// Round to two decimals, halves away from zero (half-up for ratings).
pub fn round2(value: f64) -> f64 {
    round_scaled(value * 100.0)
}

/// `round2(sum / count)`, scaled before dividing so exact halves stay exact.
fn mean2(sum: f64, count: usize) -> f64 {
    round_scaled(sum * 100.0 / count as f64)
}

fn round_scaled(hundredths: f64) -> f64 {
    (hundredths + HALF_UP_SLACK.copysign(hundredths)).round() / 100.0
}

/// Compute the average over `submissions`. Any entry carrying the reserved
/// average id is skipped, so a previous aggregate can never feed into a new one.
///
/// Submissions are scanned in id order, which makes both the floating-point
/// sums and the captured entity metadata independent of insertion order.
/// Two points for the same entity in one submission count as two observations.
pub fn compute_average(submissions: &[Submission]) -> Option<Average> {
    let mut ordered: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.id != AVERAGE_ID)
        .collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut order: Vec<&str> = Vec::new();
    let mut acc: HashMap<&str, Accumulator> = HashMap::new();

    for submission in &ordered {
        for point in &submission.rating_points {
            let entry = acc.entry(point.entity_id.as_str()).or_insert_with(|| {
                order.push(point.entity_id.as_str());
                Accumulator {
                    entity_name: point.entity_name.clone(),
                    dimension: point.dimension.clone(),
                    axis1_sum: 0.0,
                    axis2_sum: 0.0,
                    count: 0,
                }
            });
            entry.axis1_sum += point.axis1;
            entry.axis2_sum += point.axis2;
            entry.count += 1;
        }
    }

    if order.is_empty() {
        debug!(submissions = ordered.len(), "no rating points, average omitted");
        return None;
    }

    let entities: Vec<EntityAverage> = order
        .into_iter()
        .filter_map(|id| {
            let a = acc.remove(id)?;
            let axis1 = mean2(a.axis1_sum, a.count);
            let axis2 = mean2(a.axis2_sum, a.count);
            Some(EntityAverage {
                entity_id: id.to_string(),
                entity_name: a.entity_name,
                dimension: a.dimension,
                axis1,
                axis2,
                score: round2((axis1 + axis2) / 2.0),
                count: a.count,
            })
        })
        .collect();

    debug!(
        submissions = ordered.len(),
        entities = entities.len(),
        "average recomputed"
    );
    Some(Average { entities })
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
