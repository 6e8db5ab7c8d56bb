//! Typed row schemas for the two upload formats.
//!
//! Records are validated and converted once here, so nothing downstream
//! handles stringly-typed maps.

use serde::{Deserialize, Serialize};

use super::parser::write_record;
use super::{ColumnSpec, CsvRecord, DataType};
use crate::error::{Error, Result};
use crate::model::{
    CreateSubmissionInput, Dimension, RatingInput, RatingPoint, Submission, SubmissionType,
};

/// An entity listed in a template: the rows a respondent is asked to rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
}

pub trait RatingRow: Sized {
    /// Declared columns, identity columns first and the two rating columns last.
    const COLUMNS: &'static [ColumnSpec];

    fn from_record(record: &CsvRecord) -> Result<Self>;

    fn entity(&self) -> EntityRef;

    fn axes(&self) -> (f64, f64);

    /// Identity column values of `entity`, in `COLUMNS` order.
    fn identity_fields(entity: &EntityRef) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StakeholderRatingRow {
    pub id: String,
    pub name: String,
    pub influence: f64,
    pub impact: f64,
}

impl RatingRow for StakeholderRatingRow {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id", DataType::String),
        ColumnSpec::new("Name", DataType::String),
        ColumnSpec::new("Influence", DataType::Float),
        ColumnSpec::new("Impact", DataType::Float),
    ];

    fn from_record(record: &CsvRecord) -> Result<Self> {
        Ok(Self {
            id: required_id(record)?,
            name: record.text("Name")?.to_string(),
            influence: record.number("Influence")?,
            impact: record.number("Impact")?,
        })
    }

    fn entity(&self) -> EntityRef {
        EntityRef {
            id: self.id.clone(),
            name: self.name.clone(),
            dimension: None,
        }
    }

    fn axes(&self) -> (f64, f64) {
        (self.influence, self.impact)
    }

    fn identity_fields(entity: &EntityRef) -> Vec<String> {
        vec![entity.id.clone(), entity.name.clone()]
    }
}

/// Impact materiality upload: topics rated on relevance × magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRatingRow {
    pub id: String,
    pub topic: String,
    pub dimension: String,
    pub relevance: f64,
    pub magnitude: f64,
}

impl RatingRow for TopicRatingRow {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id", DataType::String),
        ColumnSpec::new("Topic", DataType::String),
        ColumnSpec::new("Dimension", DataType::String),
        ColumnSpec::new("Relevance", DataType::Float),
        ColumnSpec::new("Magnitude", DataType::Float),
    ];

    fn from_record(record: &CsvRecord) -> Result<Self> {
        Ok(Self {
            id: required_id(record)?,
            topic: record.text("Topic")?.to_string(),
            dimension: record.text("Dimension")?.to_string(),
            relevance: record.number("Relevance")?,
            magnitude: record.number("Magnitude")?,
        })
    }

    fn entity(&self) -> EntityRef {
        topic_entity(&self.id, &self.topic, &self.dimension)
    }

    fn axes(&self) -> (f64, f64) {
        (self.relevance, self.magnitude)
    }

    fn identity_fields(entity: &EntityRef) -> Vec<String> {
        topic_identity(entity)
    }
}

/// Financial materiality upload: topics rated on likelihood × magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRatingRow {
    pub id: String,
    pub topic: String,
    pub dimension: String,
    pub likelihood: f64,
    pub magnitude: f64,
}

impl RatingRow for FinancialRatingRow {
    const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id", DataType::String),
        ColumnSpec::new("Topic", DataType::String),
        ColumnSpec::new("Dimension", DataType::String),
        ColumnSpec::new("Likelihood", DataType::Float),
        ColumnSpec::new("Magnitude", DataType::Float),
    ];

    fn from_record(record: &CsvRecord) -> Result<Self> {
        Ok(Self {
            id: required_id(record)?,
            topic: record.text("Topic")?.to_string(),
            dimension: record.text("Dimension")?.to_string(),
            likelihood: record.number("Likelihood")?,
            magnitude: record.number("Magnitude")?,
        })
    }

    fn entity(&self) -> EntityRef {
        topic_entity(&self.id, &self.topic, &self.dimension)
    }

    fn axes(&self) -> (f64, f64) {
        (self.likelihood, self.magnitude)
    }

    fn identity_fields(entity: &EntityRef) -> Vec<String> {
        topic_identity(entity)
    }
}

fn topic_entity(id: &str, topic: &str, dimension: &str) -> EntityRef {
    EntityRef {
        id: id.to_string(),
        name: topic.to_string(),
        dimension: Some(dimension.to_string()).filter(|d| !d.is_empty()),
    }
}

fn topic_identity(entity: &EntityRef) -> Vec<String> {
    vec![
        entity.id.clone(),
        entity.name.clone(),
        entity.dimension.clone().unwrap_or_default(),
    ]
}

fn required_id(record: &CsvRecord) -> Result<String> {
    let id = record.text("id")?;
    if id.is_empty() {
        return Err(Error::validation(format!(
            "row {}, column \"id\": value is required",
            record.row
        )));
    }
    Ok(id.to_string())
}

/// Parse an upload into typed rows. All-or-nothing.
pub fn parse_rows<R: RatingRow>(text: &str, uploader: &str) -> Result<Vec<R>> {
    super::parse(text, R::COLUMNS, uploader)?
        .iter()
        .map(R::from_record)
        .collect()
}

fn header<R: RatingRow>() -> Vec<&'static str> {
    R::COLUMNS.iter().map(|c| c.label).collect()
}

/// Blank download template: identity columns filled, rating columns empty.
pub fn write_template<R: RatingRow>(entities: &[EntityRef]) -> String {
    let mut out = write_record(&header::<R>());
    out.push('\n');
    for entity in entities {
        let mut fields = R::identity_fields(entity);
        fields.extend([String::new(), String::new()]);
        out.push_str(&write_record(&fields));
        out.push('\n');
    }
    out
}

/// Filled export of existing ratings, in the same layout as the template.
pub fn write_rows<R: RatingRow>(rows: &[R]) -> String {
    let mut out = write_record(&header::<R>());
    out.push('\n');
    for row in rows {
        let (a1, a2) = row.axes();
        let mut fields = R::identity_fields(&row.entity());
        fields.extend([a1.to_string(), a2.to_string()]);
        out.push_str(&write_record(&fields));
        out.push('\n');
    }
    out
}

/// The `createSubmission` payload for an uploaded file.
pub fn create_input<R: RatingRow>(
    respondent_id: &str,
    report_id: &str,
    kind: SubmissionType,
    rows: &[R],
) -> CreateSubmissionInput {
    CreateSubmissionInput {
        respondent_id: respondent_id.to_string(),
        report_id: report_id.to_string(),
        kind,
        rating_points: rows
            .iter()
            .map(|r| {
                let (axis1, axis2) = r.axes();
                RatingInput {
                    entity_id: r.entity().id,
                    axis1,
                    axis2,
                }
            })
            .collect(),
    }
}

/// Wrap uploaded rows into a submission without a server round trip.
/// Dimension names double as their ids since the upload carries no id.
pub fn into_submission<R: RatingRow>(
    submission_id: &str,
    respondent_id: &str,
    respondent_name: &str,
    kind: SubmissionType,
    rows: &[R],
) -> Result<Submission> {
    let rating_points = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let entity = r.entity();
            let (axis1, axis2) = r.axes();
            let point = RatingPoint::new(
                format!("{submission_id}-{}", i + 1),
                submission_id,
                entity.id,
                entity.name,
                axis1,
                axis2,
            )?;
            Ok(match entity.dimension {
                Some(name) => point.with_dimension(Dimension {
                    id: name.clone(),
                    name,
                }),
                None => point,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Submission {
        id: submission_id.to_string(),
        respondent_id: respondent_id.to_string(),
        respondent_name: respondent_name.to_string(),
        kind,
        rating_points,
        created_at: Some(chrono::Utc::now()),
    })
}

#[cfg(test)]
#[path = "rows_test.rs"]
mod tests;
