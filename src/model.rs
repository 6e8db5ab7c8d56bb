//! Core value types: rating points, submissions, and the rating lens.
//!
//! Field names follow the camelCase wire format of the submissions API, so
//! these types serialize straight into request and response payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reserved key of the synthetic aggregate in the grouped wire map.
pub const AVERAGE_ID: &str = "Average";

/// Ratings at or above this value count as "high" on an axis.
pub const HIGH_THRESHOLD: f64 = 3.0;

/// Who submitted (INTERNAL / STAKEHOLDER) or which topic lens was rated
/// (IMPACT / FINANCIAL). Both taxonomies share the `type` wire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionType {
    Internal,
    Stakeholder,
    Impact,
    Financial,
}

impl SubmissionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::Stakeholder => "STAKEHOLDER",
            Self::Impact => "IMPACT",
            Self::Financial => "FINANCIAL",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INTERNAL" => Ok(Self::Internal),
            "STAKEHOLDER" => Ok(Self::Stakeholder),
            "IMPACT" => Ok(Self::Impact),
            "FINANCIAL" => Ok(Self::Financial),
            _ => Err(Error::validation(format!("unknown submission type: {s:?}"))),
        }
    }
}

/// The assessment lens of one aggregation context. Selects the axis pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingType {
    /// Stakeholder map: influence × impact.
    Stakeholder,
    /// Topic impact materiality: relevance × magnitude.
    Impact,
    /// Topic financial materiality: likelihood × magnitude.
    Financial,
}

impl RatingType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stakeholder => "STAKEHOLDER",
            Self::Impact => "IMPACT",
            Self::Financial => "FINANCIAL",
        }
    }

    /// Display names of (axis1, axis2).
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            Self::Stakeholder => ("Influence", "Impact"),
            Self::Impact => ("Relevance", "Magnitude"),
            Self::Financial => ("Likelihood", "Magnitude"),
        }
    }

    /// Whether a submission of `kind` belongs in a context of this lens.
    pub fn accepts(self, kind: SubmissionType) -> bool {
        matches!(
            (self, kind),
            (
                Self::Stakeholder,
                SubmissionType::Internal | SubmissionType::Stakeholder
            ) | (Self::Impact, SubmissionType::Impact)
                | (Self::Financial, SubmissionType::Financial)
        )
    }

    /// Submission type assumed for wire entries that omit `type`.
    pub fn default_submission_type(self) -> SubmissionType {
        match self {
            Self::Stakeholder => SubmissionType::Stakeholder,
            Self::Impact => SubmissionType::Impact,
            Self::Financial => SubmissionType::Financial,
        }
    }
}

impl fmt::Display for RatingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STAKEHOLDER" => Ok(Self::Stakeholder),
            "IMPACT" => Ok(Self::Impact),
            "FINANCIAL" => Ok(Self::Financial),
            _ => Err(Error::validation(format!("unknown rating type: {s:?}"))),
        }
    }
}

/// Display grouping for topics. Never used in aggregation math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub name: String,
}

/// One entity rated on two axes within one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    pub id: String,
    /// May be omitted inside a grouped map, where the key supplies it.
    #[serde(default)]
    pub submission_id: String,
    pub entity_id: String,
    pub entity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub axis1: f64,
    pub axis2: f64,
    /// Server-supplied combined score. Authoritative when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RatingPoint {
    /// Build a point, rejecting non-finite axis values.
    pub fn new(
        id: impl Into<String>,
        submission_id: impl Into<String>,
        entity_id: impl Into<String>,
        entity_name: impl Into<String>,
        axis1: f64,
        axis2: f64,
    ) -> Result<Self> {
        let point = Self {
            id: id.into(),
            submission_id: submission_id.into(),
            entity_id: entity_id.into(),
            entity_name: entity_name.into(),
            dimension: None,
            axis1,
            axis2,
            score: None,
            description: None,
        };
        point.validate()?;
        Ok(point)
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Combined score: the server value if supplied, else the axis midpoint.
    pub fn score(&self) -> f64 {
        self.score.unwrap_or((self.axis1 + self.axis2) / 2.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.axis1.is_finite() || !self.axis2.is_finite() {
            return Err(Error::invariant(format!(
                "rating point {} for entity {} has non-finite axis values ({}, {})",
                self.id, self.entity_id, self.axis1, self.axis2
            )));
        }
        if let Some(score) = self.score
            && !score.is_finite()
        {
            return Err(Error::invariant(format!(
                "rating point {} has a non-finite score ({score})",
                self.id
            )));
        }
        Ok(())
    }
}

/// One respondent's complete set of ratings for one context and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub respondent_id: String,
    pub respondent_name: String,
    #[serde(rename = "type")]
    pub kind: SubmissionType,
    pub rating_points: Vec<RatingPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// Check the invariants every stored submission must hold: the id is not
    /// the reserved sentinel, and every point is finite and belongs to it.
    pub fn validate(&self) -> Result<()> {
        if self.id == AVERAGE_ID {
            return Err(Error::invariant(format!(
                "submission id {AVERAGE_ID:?} collides with the reserved average key"
            )));
        }
        for point in &self.rating_points {
            point.validate()?;
            if point.submission_id != self.id {
                return Err(Error::invariant(format!(
                    "rating point {} belongs to submission {}, not {}",
                    point.id, point.submission_id, self.id
                )));
            }
        }
        Ok(())
    }
}

/// One rating in a `createSubmission` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingInput {
    pub entity_id: String,
    pub axis1: f64,
    pub axis2: f64,
}

/// Payload of a `createSubmission` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionInput {
    pub respondent_id: String,
    pub report_id: String,
    #[serde(rename = "type")]
    pub kind: SubmissionType,
    pub rating_points: Vec<RatingInput>,
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
